//! Test-only helpers for the process-global environment.

/// Restores an environment variable to its previous state on drop.
///
/// Config tests that touch `MINING_STATS_*` variables hold one guard per
/// variable and run under `#[serial(env)]`.
pub struct EnvGuard {
    key: &'static str,
    prev: Option<String>,
}

impl EnvGuard {
    /// Set `key` to `val` until the guard drops.
    #[must_use]
    pub fn set(key: &'static str, val: &str) -> Self {
        let prev = std::env::var(key).ok();
        // SAFETY: callers serialize env access with `#[serial(env)]`.
        unsafe { std::env::set_var(key, val) };
        Self { key, prev }
    }

    /// Unset `key` until the guard drops.
    #[must_use]
    pub fn remove(key: &'static str) -> Self {
        let prev = std::env::var(key).ok();
        // SAFETY: callers serialize env access with `#[serial(env)]`.
        unsafe { std::env::remove_var(key) };
        Self { key, prev }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match &self.prev {
            // SAFETY: see `EnvGuard::set`.
            Some(v) => unsafe { std::env::set_var(self.key, v) },
            // SAFETY: see `EnvGuard::remove`.
            None => unsafe { std::env::remove_var(self.key) },
        }
    }
}
