//! Settle-all aggregation for composite tools.
//!
//! [`settle_all`] drives every source future to completion concurrently and
//! returns one [`EndpointResult`] per source, in input order. A failing
//! source never cancels or short-circuits its siblings.

use crate::error::ToolError;
use futures::future::{BoxFuture, join_all};
use std::future::Future;

/// Outcome of one source in a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum EndpointResult<T> {
    Fulfilled(T),
    Rejected(ToolError),
}

impl<T> EndpointResult<T> {
    pub fn is_fulfilled(&self) -> bool {
        matches!(self, Self::Fulfilled(_))
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Self::Fulfilled(v) => Some(v),
            Self::Rejected(_) => None,
        }
    }

    pub fn err(&self) -> Option<&ToolError> {
        match self {
            Self::Fulfilled(_) => None,
            Self::Rejected(e) => Some(e),
        }
    }

    pub fn into_result(self) -> Result<T, ToolError> {
        self.into()
    }
}

impl<T> From<Result<T, ToolError>> for EndpointResult<T> {
    fn from(r: Result<T, ToolError>) -> Self {
        match r {
            Ok(v) => Self::Fulfilled(v),
            Err(e) => Self::Rejected(e),
        }
    }
}

impl<T> From<EndpointResult<T>> for Result<T, ToolError> {
    fn from(r: EndpointResult<T>) -> Self {
        match r {
            EndpointResult::Fulfilled(v) => Ok(v),
            EndpointResult::Rejected(e) => Err(e),
        }
    }
}

/// Await a single source, capturing its outcome instead of propagating it.
pub async fn settle<T, F>(fut: F) -> EndpointResult<T>
where
    F: Future<Output = Result<T, ToolError>>,
{
    fut.await.into()
}

/// Run every source concurrently and wait for all of them to settle.
pub async fn settle_all<'a, T>(
    sources: Vec<BoxFuture<'a, Result<T, ToolError>>>,
) -> Vec<EndpointResult<T>> {
    join_all(sources.into_iter().map(settle)).await
}
