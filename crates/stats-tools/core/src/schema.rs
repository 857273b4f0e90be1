//! Declarative input schemas.
//!
//! An [`InputSchema`] is the single source for both halves of a tool's input
//! contract: it validates raw caller JSON (collecting every violation, not
//! just the first) and renders the `inputSchema` object published during
//! tool discovery.

use crate::error::ToolError;
use regex::Regex;
use schemars::JsonSchema;
use serde_json::{Map, Value as Json, json};

/// Largest integer a JSON float carries exactly (2^53).
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Primitive type of an input field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldType {
    Number,
    Integer,
    String,
    Boolean,
}

impl FieldType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Integer => "integer",
            Self::String => "string",
            Self::Boolean => "boolean",
        }
    }

    fn matches(self, v: &Json) -> bool {
        match self {
            Self::Number => v.is_number(),
            Self::Integer => {
                v.is_i64()
                    || v.is_u64()
                    || v.as_f64()
                        .is_some_and(|f| f.is_finite() && f.fract() == 0.0)
            }
            Self::String => v.is_string(),
            Self::Boolean => v.is_boolean(),
        }
    }
}

/// One side of a numeric range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Bound {
    Inclusive(f64),
    Exclusive(f64),
}

/// Field-level constraint.
#[derive(Clone, Debug)]
pub enum FieldConstraint {
    /// Restrict field to specific values.
    Enum(Vec<Json>),

    /// Numeric range constraint.
    Range {
        minimum: Option<Bound>,
        maximum: Option<Bound>,
    },

    /// Regular expression the whole string must match.
    Pattern(String),
}

/// Declarative description of one input property.
#[derive(Clone, Debug)]
pub struct FieldSpec {
    pub name: &'static str,
    pub field_type: FieldType,
    pub description: &'static str,
    pub required: bool,
    pub default: Option<Json>,
    pub constraints: Vec<FieldConstraint>,
}

impl FieldSpec {
    pub fn new(name: &'static str, field_type: FieldType, description: &'static str) -> Self {
        Self {
            name,
            field_type,
            description,
            required: false,
            default: None,
            constraints: Vec::new(),
        }
    }

    pub fn number(name: &'static str, description: &'static str) -> Self {
        Self::new(name, FieldType::Number, description)
    }

    pub fn integer(name: &'static str, description: &'static str) -> Self {
        Self::new(name, FieldType::Integer, description)
    }

    pub fn string(name: &'static str, description: &'static str) -> Self {
        Self::new(name, FieldType::String, description)
    }

    pub fn boolean(name: &'static str, description: &'static str) -> Self {
        Self::new(name, FieldType::Boolean, description)
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Value filled in when the caller omits the field.
    #[must_use]
    pub fn default_value(mut self, v: impl Into<Json>) -> Self {
        self.default = Some(v.into());
        self
    }

    #[must_use]
    pub fn min(self, m: f64) -> Self {
        self.range(Some(Bound::Inclusive(m)), None)
    }

    #[must_use]
    pub fn exclusive_min(self, m: f64) -> Self {
        self.range(Some(Bound::Exclusive(m)), None)
    }

    #[must_use]
    pub fn max(self, m: f64) -> Self {
        self.range(None, Some(Bound::Inclusive(m)))
    }

    #[must_use]
    pub fn exclusive_max(self, m: f64) -> Self {
        self.range(None, Some(Bound::Exclusive(m)))
    }

    #[must_use]
    pub fn pattern(mut self, p: &str) -> Self {
        self.constraints.push(FieldConstraint::Pattern(p.to_string()));
        self
    }

    #[must_use]
    pub fn one_of<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Json>,
    {
        self.constraints.push(FieldConstraint::Enum(
            values.into_iter().map(Into::into).collect(),
        ));
        self
    }

    fn range(mut self, minimum: Option<Bound>, maximum: Option<Bound>) -> Self {
        self.constraints
            .push(FieldConstraint::Range { minimum, maximum });
        self
    }

    /// Check a present value, appending one message per failed constraint.
    fn check(&self, v: &Json, violations: &mut Vec<String>) {
        let name = self.name;
        if !self.field_type.matches(v) {
            violations.push(format!(
                "{name}: expected {}, got {}",
                self.field_type.as_str(),
                json_type_name(v)
            ));
            return;
        }
        if self.field_type == FieldType::Integer && !is_exact_integer(v) {
            violations.push(format!("{name}: integer out of range (got {v})"));
            return;
        }

        for c in &self.constraints {
            match c {
                FieldConstraint::Range { minimum, maximum } => {
                    let Some(x) = v.as_f64() else { continue };
                    match minimum {
                        Some(Bound::Inclusive(m)) if x < *m => {
                            violations.push(format!("{name}: must be >= {m} (got {x})"));
                        }
                        Some(Bound::Exclusive(m)) if x <= *m => {
                            violations.push(format!("{name}: must be > {m} (got {x})"));
                        }
                        _ => {}
                    }
                    match maximum {
                        Some(Bound::Inclusive(m)) if x > *m => {
                            violations.push(format!("{name}: must be <= {m} (got {x})"));
                        }
                        Some(Bound::Exclusive(m)) if x >= *m => {
                            violations.push(format!("{name}: must be < {m} (got {x})"));
                        }
                        _ => {}
                    }
                }
                FieldConstraint::Pattern(p) => {
                    let Some(s) = v.as_str() else { continue };
                    match Regex::new(p) {
                        Ok(re) if re.is_match(s) => {}
                        Ok(_) => violations.push(format!(
                            "{name}: must match pattern {p} (got \"{s}\")"
                        )),
                        Err(_) => violations.push(format!(
                            "{name}: pattern {p} is not a valid regular expression"
                        )),
                    }
                }
                FieldConstraint::Enum(values) => {
                    if !values.contains(v) {
                        let allowed: Vec<String> = values.iter().map(Json::to_string).collect();
                        violations.push(format!(
                            "{name}: must be one of [{}] (got {v})",
                            allowed.join(", ")
                        ));
                    }
                }
            }
        }
    }

    fn to_json(&self) -> Json {
        let mut p = Map::new();
        p.insert("type".into(), json!(self.field_type.as_str()));
        p.insert("description".into(), json!(self.description));
        for c in &self.constraints {
            match c {
                FieldConstraint::Range { minimum, maximum } => {
                    match minimum {
                        Some(Bound::Inclusive(m)) => {
                            p.insert("minimum".into(), self.bound_value(*m));
                        }
                        Some(Bound::Exclusive(m)) => {
                            p.insert("exclusiveMinimum".into(), self.bound_value(*m));
                        }
                        None => {}
                    }
                    match maximum {
                        Some(Bound::Inclusive(m)) => {
                            p.insert("maximum".into(), self.bound_value(*m));
                        }
                        Some(Bound::Exclusive(m)) => {
                            p.insert("exclusiveMaximum".into(), self.bound_value(*m));
                        }
                        None => {}
                    }
                }
                FieldConstraint::Pattern(pat) => {
                    p.insert("pattern".into(), json!(pat));
                }
                FieldConstraint::Enum(values) => {
                    p.insert("enum".into(), Json::Array(values.clone()));
                }
            }
        }
        if let Some(d) = &self.default {
            p.insert("default".into(), d.clone());
        }
        Json::Object(p)
    }

    fn bound_value(&self, m: f64) -> Json {
        if self.field_type == FieldType::Integer && m.fract() == 0.0 {
            json!(m as i64)
        } else {
            json!(m)
        }
    }
}

type RefinementCheck = fn(&Map<String, Json>) -> bool;

/// Cross-field rule, evaluated only when every named field is present and
/// passed its own checks.
#[derive(Clone, Debug)]
pub struct Refinement {
    pub fields: Vec<&'static str>,
    pub message: &'static str,
    check: RefinementCheck,
}

/// Declarative object schema for a tool's input.
#[derive(Clone, Debug, Default)]
pub struct InputSchema {
    fields: Vec<FieldSpec>,
    refinements: Vec<Refinement>,
}

impl InputSchema {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn refine(
        mut self,
        fields: &[&'static str],
        message: &'static str,
        check: RefinementCheck,
    ) -> Self {
        self.refinements.push(Refinement {
            fields: fields.to_vec(),
            message,
            check,
        });
        self
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Validate raw caller input.
    ///
    /// `null` is treated as an empty object. Unknown properties are dropped,
    /// omitted optional properties receive their defaults, and every violated
    /// constraint is reported in one `Validation` error.
    pub fn validate(&self, raw: &Json) -> Result<Map<String, Json>, ToolError> {
        let empty = Map::new();
        let obj = match raw {
            Json::Null => &empty,
            Json::Object(obj) => obj,
            other => {
                return Err(ToolError::invalid_input([format!(
                    "input: expected an object, got {}",
                    json_type_name(other)
                )]));
            }
        };

        let mut out = Map::new();
        let mut violations = Vec::new();
        let mut failed: Vec<&str> = Vec::new();

        for f in &self.fields {
            match obj.get(f.name).filter(|v| !v.is_null()) {
                None if f.required => {
                    violations.push(format!("{}: is required", f.name));
                    failed.push(f.name);
                }
                None => {
                    if let Some(d) = &f.default {
                        out.insert(f.name.to_string(), d.clone());
                    }
                }
                Some(v) => {
                    let before = violations.len();
                    f.check(v, &mut violations);
                    if violations.len() == before {
                        out.insert(f.name.to_string(), normalize(f.field_type, v));
                    } else {
                        failed.push(f.name);
                    }
                }
            }
        }

        for r in &self.refinements {
            let applicable = r
                .fields
                .iter()
                .all(|n| !failed.contains(n) && out.contains_key(*n));
            if applicable && !(r.check)(&out) {
                violations.push(format!("{}: {}", r.fields.join(", "), r.message));
            }
        }

        if violations.is_empty() {
            Ok(out)
        } else {
            Err(ToolError::invalid_input(violations))
        }
    }

    /// Render the discovery `inputSchema` object.
    pub fn to_json(&self) -> Json {
        let properties: Map<String, Json> = self
            .fields
            .iter()
            .map(|f| (f.name.to_string(), f.to_json()))
            .collect();
        let required: Vec<&str> = self
            .fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name)
            .collect();
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

/// Native JSON integers, or floats small enough to convert without loss.
fn is_exact_integer(v: &Json) -> bool {
    v.is_i64() || v.is_u64() || v.as_f64().is_some_and(|f| f.abs() <= MAX_EXACT_INTEGER)
}

/// Integers given as `5.0` are stored as `5` so typed records deserialize.
/// Only reached for values [`is_exact_integer`] accepted.
fn normalize(field_type: FieldType, v: &Json) -> Json {
    if field_type == FieldType::Integer
        && !v.is_i64()
        && !v.is_u64()
        && let Some(f) = v.as_f64()
    {
        return json!(f as i64);
    }
    v.clone()
}

fn json_type_name(v: &Json) -> &'static str {
    match v {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

/// JSON Schema for a tool's structured output, generated by schemars.
pub fn output_schema_for<T: JsonSchema>() -> Option<Json> {
    serde_json::to_value(schemars::schema_for!(T)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks_schema() -> InputSchema {
        InputSchema::new()
            .field(
                FieldSpec::integer("limit", "Number of blocks")
                    .min(1.0)
                    .max(15.0)
                    .default_value(10),
            )
            .field(FieldSpec::integer("start_height", "First height").min(0.0))
            .field(
                FieldSpec::string("period", "Window")
                    .pattern("^(24h|1w)$")
                    .default_value("1w"),
            )
            .field(FieldSpec::number("cost", "Cost").exclusive_min(0.0).required())
    }

    #[test]
    fn fills_defaults_and_ignores_unknown_fields() {
        let out = blocks_schema()
            .validate(&json!({"cost": 1.5, "extra": true}))
            .unwrap();
        assert_eq!(out.get("limit"), Some(&json!(10)));
        assert_eq!(out.get("period"), Some(&json!("1w")));
        assert!(out.get("start_height").is_none());
        assert!(out.get("extra").is_none());
    }

    #[test]
    fn reports_every_violation() {
        let err = blocks_schema()
            .validate(&json!({"limit": 99, "start_height": "x", "period": "2d"}))
            .unwrap_err();
        let ToolError::Validation { violations, .. } = err else {
            panic!("expected validation error");
        };
        assert_eq!(violations.len(), 4, "{violations:?}");
        assert!(violations.iter().any(|v| v.starts_with("limit: must be <= 15")));
        assert!(violations.iter().any(|v| v.starts_with("start_height: expected integer")));
        assert!(violations.iter().any(|v| v.starts_with("period: must match")));
        assert!(violations.iter().any(|v| v == "cost: is required"));
    }

    #[test]
    fn exclusive_bounds_reject_the_boundary() {
        let err = blocks_schema().validate(&json!({"cost": 0})).unwrap_err();
        assert!(err.to_string().contains("cost: must be > 0"));
    }

    #[test]
    fn null_input_means_all_defaults() {
        let schema = InputSchema::new().field(FieldSpec::boolean("flag", "f").default_value(true));
        let out = schema.validate(&Json::Null).unwrap();
        assert_eq!(out.get("flag"), Some(&json!(true)));
    }

    #[test]
    fn non_object_input_is_rejected() {
        let err = InputSchema::new().validate(&json!([1, 2])).unwrap_err();
        assert!(err.to_string().contains("expected an object, got array"));
    }

    #[test]
    fn integral_floats_are_normalized() {
        let out = blocks_schema()
            .validate(&json!({"cost": 1, "limit": 5.0}))
            .unwrap();
        assert_eq!(out.get("limit"), Some(&json!(5)));
    }

    #[test]
    fn refinement_runs_only_when_fields_are_valid() {
        let schema = InputSchema::new()
            .field(FieldSpec::integer("from", "from").min(0.0))
            .field(FieldSpec::integer("to", "to").min(0.0))
            .refine(&["from", "to"], "from must be <= to", |m| {
                m["from"].as_i64() <= m["to"].as_i64()
            });

        let err = schema.validate(&json!({"from": 10, "to": 5})).unwrap_err();
        assert!(err.to_string().contains("from, to: from must be <= to"));

        // A failing field suppresses the refinement instead of doubling up.
        let err = schema.validate(&json!({"from": -1, "to": 5})).unwrap_err();
        let ToolError::Validation { violations, .. } = err else {
            panic!("expected validation error");
        };
        assert_eq!(violations.len(), 1);

        assert!(schema.validate(&json!({"from": 1})).is_ok());
    }

    #[test]
    fn renders_discovery_schema() {
        let v = blocks_schema().to_json();
        assert_eq!(v["type"], "object");
        assert_eq!(v["required"], json!(["cost"]));
        assert_eq!(v["properties"]["limit"]["minimum"], json!(1));
        assert_eq!(v["properties"]["limit"]["maximum"], json!(15));
        assert_eq!(v["properties"]["limit"]["default"], json!(10));
        assert_eq!(v["properties"]["cost"]["exclusiveMinimum"], json!(0.0));
        assert_eq!(v["properties"]["period"]["pattern"], "^(24h|1w)$");
        assert_eq!(v["properties"]["period"]["type"], "string");
    }

    #[test]
    fn integer_floats_beyond_exact_range_are_rejected() {
        let schema =
            InputSchema::new().field(FieldSpec::integer("start_height", "Height").min(0.0));

        let err = schema.validate(&json!({"start_height": 1e20})).unwrap_err();
        match err {
            ToolError::Validation { violations, .. } => {
                assert_eq!(violations.len(), 1);
                assert!(violations[0].starts_with("start_height: integer out of range"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }

        let out = schema.validate(&json!({"start_height": 880_000.0})).unwrap();
        assert_eq!(out["start_height"], json!(880_000));
        let out = schema
            .validate(&json!({"start_height": 9_007_199_254_740_992.0_f64}))
            .unwrap();
        assert_eq!(out["start_height"], json!(9_007_199_254_740_992_i64));
    }

    #[test]
    fn enum_constraint() {
        let schema =
            InputSchema::new().field(FieldSpec::string("unit", "u").one_of(["EH/s", "TH/s"]));
        assert!(schema.validate(&json!({"unit": "EH/s"})).is_ok());
        let err = schema.validate(&json!({"unit": "H/s"})).unwrap_err();
        assert!(err.to_string().contains("must be one of"));
    }
}
