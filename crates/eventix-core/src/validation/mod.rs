//! Declarative request validation.
//!
//! A [`Schema`] is plain data: an ordered list of [`FieldRule`]s. One
//! generic walker evaluates any schema against a JSON payload, coercing
//! values where the wire format is loose (numbers sent as strings by
//! multipart forms, dates in several ISO 8601 shapes), applying defaults
//! and rejecting unknown keys. The first violation wins.

mod schemas;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

pub use schemas::{CREATE_EVENT, CREATE_TICKET, LOGIN, REGISTER, TICKET_DETAILS};

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex");
}

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("\"{path}\" {reason}")]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `ticketDetails.email`.
    pub path: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Character classes a text field may be required to contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Uppercase,
    Lowercase,
    Digit,
    Symbol,
}

impl CharClass {
    fn matches(self, c: char) -> bool {
        match self {
            CharClass::Uppercase => c.is_ascii_uppercase(),
            CharClass::Lowercase => c.is_ascii_lowercase(),
            CharClass::Digit => c.is_ascii_digit(),
            CharClass::Symbol => !c.is_ascii_alphanumeric(),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            CharClass::Uppercase => "uppercase letter",
            CharClass::Lowercase => "lowercase letter",
            CharClass::Digit => "digit",
            CharClass::Symbol => "symbol",
        }
    }
}

/// Constraint attached to one field.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// Non-empty string with a character-count range and required classes.
    Text {
        min: usize,
        max: Option<usize>,
        classes: &'static [CharClass],
    },
    Email,
    /// ISO 8601 date or date-time, normalized to RFC 3339 UTC.
    IsoDate,
    Integer {
        min: i64,
    },
    Number {
        min: f64,
    },
    TextList,
    Object(&'static Schema),
}

impl FieldKind {
    /// Any non-empty string.
    pub const fn text() -> Self {
        FieldKind::Text {
            min: 1,
            max: None,
            classes: &[],
        }
    }

    pub const fn text_between(min: usize, max: usize) -> Self {
        FieldKind::Text {
            min,
            max: Some(max),
            classes: &[],
        }
    }

    pub const fn text_at_least(min: usize) -> Self {
        FieldKind::Text {
            min,
            max: None,
            classes: &[],
        }
    }
}

/// Field name plus constraint, presence and default.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Integer inserted when an optional field is absent.
    pub default: Option<i64>,
}

impl FieldRule {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
            default: None,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            default: None,
        }
    }

    pub const fn with_default(mut self, value: i64) -> Self {
        self.default = Some(value);
        self
    }
}

/// Ordered set of field rules for one payload shape.
#[derive(Debug)]
pub struct Schema {
    pub fields: &'static [FieldRule],
}

impl Schema {
    pub const fn new(fields: &'static [FieldRule]) -> Self {
        Self { fields }
    }

    /// Validate and normalize `input`, returning the cleaned object.
    pub fn validate(&self, input: &Value) -> Result<Map<String, Value>, ValidationError> {
        self.validate_at(input, None)
    }

    /// Validate, then decode the normalized object into `T`.
    pub fn parse<T: DeserializeOwned>(&self, input: &Value) -> Result<T, ValidationError> {
        let normalized = self.validate(input)?;
        serde_json::from_value(Value::Object(normalized))
            .map_err(|e| ValidationError::new("value", format!("could not be decoded: {e}")))
    }

    fn validate_at(
        &self,
        input: &Value,
        prefix: Option<&str>,
    ) -> Result<Map<String, Value>, ValidationError> {
        let object = input.as_object().ok_or_else(|| {
            ValidationError::new(prefix.unwrap_or("value"), "must be of type object")
        })?;

        let mut out = Map::with_capacity(self.fields.len());

        for rule in self.fields {
            let path = join_path(prefix, rule.name);
            match object.get(rule.name) {
                None => {
                    if rule.required {
                        return Err(ValidationError::new(path, "is required"));
                    }
                    if let Some(default) = rule.default {
                        out.insert(rule.name.to_string(), Value::from(default));
                    }
                }
                Some(value) => {
                    let normalized = check_value(&rule.kind, value, &path)?;
                    out.insert(rule.name.to_string(), normalized);
                }
            }
        }

        if let Some(unknown) = object
            .keys()
            .find(|key| !self.fields.iter().any(|rule| rule.name == key.as_str()))
        {
            return Err(ValidationError::new(
                join_path(prefix, unknown),
                "is not allowed",
            ));
        }

        Ok(out)
    }
}

fn join_path(prefix: Option<&str>, name: &str) -> String {
    match prefix {
        Some(p) => format!("{p}.{name}"),
        None => name.to_string(),
    }
}

fn check_value(kind: &FieldKind, value: &Value, path: &str) -> Result<Value, ValidationError> {
    match *kind {
        FieldKind::Text { min, max, classes } => {
            let s = expect_str(value, path)?;
            let len = s.chars().count();
            if len < min {
                return Err(ValidationError::new(
                    path,
                    format!("length must be at least {min} characters long"),
                ));
            }
            if let Some(max) = max {
                if len > max {
                    return Err(ValidationError::new(
                        path,
                        format!("length must be less than or equal to {max} characters long"),
                    ));
                }
            }
            if let Some(missing) = classes
                .iter()
                .find(|class| !s.chars().any(|c| class.matches(c)))
            {
                return Err(ValidationError::new(
                    path,
                    format!("must contain at least one {}", missing.describe()),
                ));
            }
            Ok(Value::String(s.to_string()))
        }
        FieldKind::Email => {
            let s = expect_str(value, path)?;
            if !EMAIL_RE.is_match(s) {
                return Err(ValidationError::new(path, "must be a valid email"));
            }
            Ok(Value::String(s.to_string()))
        }
        FieldKind::IsoDate => {
            let s = expect_str(value, path)?;
            let parsed = parse_iso_date(s).ok_or_else(|| {
                ValidationError::new(path, "must be in ISO 8601 date format")
            })?;
            Ok(Value::String(
                parsed.to_rfc3339_opts(SecondsFormat::Millis, true),
            ))
        }
        FieldKind::Integer { min } => {
            let n = coerce_number(value, path)?;
            if n.fract() != 0.0 {
                return Err(ValidationError::new(path, "must be an integer"));
            }
            let n = n as i64;
            if n < min {
                return Err(ValidationError::new(
                    path,
                    format!("must be greater than or equal to {min}"),
                ));
            }
            Ok(Value::from(n))
        }
        FieldKind::Number { min } => {
            let n = coerce_number(value, path)?;
            if n < min {
                return Err(ValidationError::new(
                    path,
                    format!("must be greater than or equal to {min}"),
                ));
            }
            Ok(Value::from(n))
        }
        FieldKind::TextList => {
            let items = value
                .as_array()
                .ok_or_else(|| ValidationError::new(path, "must be an array"))?;
            let mut out = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                match item {
                    Value::String(s) => out.push(Value::String(s.clone())),
                    _ => {
                        return Err(ValidationError::new(format!("{path}[{i}]"), "must be a string"));
                    }
                }
            }
            Ok(Value::Array(out))
        }
        FieldKind::Object(schema) => schema.validate_at(value, Some(path)).map(Value::Object),
    }
}

fn expect_str<'a>(value: &'a Value, path: &str) -> Result<&'a str, ValidationError> {
    match value {
        Value::String(s) if s.is_empty() => {
            Err(ValidationError::new(path, "is not allowed to be empty"))
        }
        Value::String(s) => Ok(s),
        _ => Err(ValidationError::new(path, "must be a string")),
    }
}

/// Accept JSON numbers and numeric strings.
/// Largest integer an `f64` represents exactly (2^53 - 1).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

fn coerce_number(value: &Value, path: &str) -> Result<f64, ValidationError> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match n {
        Some(n) if n.abs() > MAX_SAFE_INTEGER => {
            Err(ValidationError::new(path, "must be a safe number"))
        }
        Some(n) if n.is_finite() => Ok(n),
        _ => Err(ValidationError::new(path, "must be a number")),
    }
}

/// Parse RFC 3339, a bare `YYYY-MM-DD`, or a zone-less date-time (read as UTC).
fn parse_iso_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .ok()
        .map(|dt| dt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    static INNER: Schema = Schema::new(&[FieldRule::required("code", FieldKind::text())]);

    static SAMPLE: Schema = Schema::new(&[
        FieldRule::required("label", FieldKind::text_between(2, 5)),
        FieldRule::optional("amount", FieldKind::Integer { min: 0 }).with_default(7),
        FieldRule::optional("price", FieldKind::Number { min: 0.0 }),
        FieldRule::optional("when", FieldKind::IsoDate),
        FieldRule::optional("tags", FieldKind::TextList),
        FieldRule::optional("inner", FieldKind::Object(&INNER)),
    ]);

    #[test]
    fn test_applies_default_for_missing_optional() {
        let out = SAMPLE.validate(&json!({ "label": "abc" })).unwrap();
        assert_eq!(out.get("amount"), Some(&json!(7)));
        assert!(!out.contains_key("price"));
    }

    #[test]
    fn test_reports_missing_required_field() {
        let err = SAMPLE.validate(&json!({})).unwrap_err();
        assert_eq!(err.to_string(), "\"label\" is required");
    }

    #[test]
    fn test_first_violation_wins() {
        let err = SAMPLE
            .validate(&json!({ "label": "a", "amount": -1 }))
            .unwrap_err();
        assert_eq!(err.path, "label");
    }

    #[test]
    fn test_text_length_bounds() {
        let err = SAMPLE.validate(&json!({ "label": "toolong" })).unwrap_err();
        assert_eq!(
            err.to_string(),
            "\"label\" length must be less than or equal to 5 characters long"
        );
        let err = SAMPLE.validate(&json!({ "label": "" })).unwrap_err();
        assert_eq!(err.reason, "is not allowed to be empty");
    }

    #[test]
    fn test_coerces_numeric_strings() {
        let out = SAMPLE
            .validate(&json!({ "label": "abc", "amount": "12", "price": "9.5" }))
            .unwrap();
        assert_eq!(out.get("amount"), Some(&json!(12)));
        assert_eq!(out.get("price"), Some(&json!(9.5)));
    }

    #[test]
    fn test_rejects_numbers_beyond_exact_range() {
        for amount in [
            json!(9_223_372_036_854_775_807_i64),
            json!(9_007_199_254_740_993_u64),
            json!("9007199254740993"),
        ] {
            let err = SAMPLE
                .validate(&json!({ "label": "abc", "amount": amount }))
                .unwrap_err();
            assert_eq!(err.to_string(), "\"amount\" must be a safe number");
        }

        let err = SAMPLE
            .validate(&json!({ "label": "abc", "price": 1e300 }))
            .unwrap_err();
        assert_eq!(err.reason, "must be a safe number");

        let out = SAMPLE
            .validate(&json!({ "label": "abc", "amount": 9_007_199_254_740_991_u64 }))
            .unwrap();
        assert_eq!(out.get("amount"), Some(&json!(9_007_199_254_740_991_i64)));
    }

    #[test]
    fn test_rejects_fractional_integer_and_negative_number() {
        let err = SAMPLE
            .validate(&json!({ "label": "abc", "amount": 1.5 }))
            .unwrap_err();
        assert_eq!(err.reason, "must be an integer");

        let err = SAMPLE
            .validate(&json!({ "label": "abc", "price": -0.01 }))
            .unwrap_err();
        assert_eq!(err.reason, "must be greater than or equal to 0");

        let err = SAMPLE
            .validate(&json!({ "label": "abc", "price": "free" }))
            .unwrap_err();
        assert_eq!(err.reason, "must be a number");
    }

    #[test]
    fn test_normalizes_dates() {
        let out = SAMPLE
            .validate(&json!({ "label": "abc", "when": "2025-03-01" }))
            .unwrap();
        assert_eq!(out.get("when"), Some(&json!("2025-03-01T00:00:00.000Z")));

        let out = SAMPLE
            .validate(&json!({ "label": "abc", "when": "2025-03-01T10:30:00+02:00" }))
            .unwrap();
        assert_eq!(out.get("when"), Some(&json!("2025-03-01T08:30:00.000Z")));

        let err = SAMPLE
            .validate(&json!({ "label": "abc", "when": "March 1st" }))
            .unwrap_err();
        assert_eq!(err.reason, "must be in ISO 8601 date format");
    }

    #[test]
    fn test_text_list_items_must_be_strings() {
        let err = SAMPLE
            .validate(&json!({ "label": "abc", "tags": ["ok", 3] }))
            .unwrap_err();
        assert_eq!(err.to_string(), "\"tags[1]\" must be a string");
    }

    #[test]
    fn test_nested_paths() {
        let err = SAMPLE
            .validate(&json!({ "label": "abc", "inner": {} }))
            .unwrap_err();
        assert_eq!(err.to_string(), "\"inner.code\" is required");

        let err = SAMPLE
            .validate(&json!({ "label": "abc", "inner": "nope" }))
            .unwrap_err();
        assert_eq!(err.to_string(), "\"inner\" must be of type object");
    }

    #[test]
    fn test_rejects_unknown_keys() {
        let err = SAMPLE
            .validate(&json!({ "label": "abc", "admin": true }))
            .unwrap_err();
        assert_eq!(err.to_string(), "\"admin\" is not allowed");
    }

    #[test]
    fn test_rejects_non_object_payload() {
        let err = SAMPLE.validate(&json!([1, 2])).unwrap_err();
        assert_eq!(err.to_string(), "\"value\" must be of type object");
    }
}
