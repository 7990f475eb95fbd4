//! Field checks used by the entity inputs. Each helper records at most one
//! message per field into the shared `ValidationErrors`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::errors::ValidationErrors;

// local-part @ domain . tld, no whitespace anywhere
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

pub fn is_valid_email(candidate: &str) -> bool {
    EMAIL_RE.is_match(candidate)
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

/// Required string that must not be blank after trimming.
pub fn required_string(errors: &mut ValidationErrors, field: &str, value: Option<&Value>) -> Option<String> {
    match present(value) {
        None => {
            errors.push(format!("{field} is required"));
            None
        }
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        Some(_) => {
            errors.push(format!("{field} must be a non-empty string"));
            None
        }
    }
}

pub fn email(errors: &mut ValidationErrors, field: &str, value: Option<&Value>) -> Option<String> {
    match present(value) {
        None => {
            errors.push(format!("{field} is required"));
            None
        }
        Some(Value::String(s)) if is_valid_email(s) => Some(s.clone()),
        Some(_) => {
            errors.push(format!("{field} must be a valid email address"));
            None
        }
    }
}

pub fn number(errors: &mut ValidationErrors, field: &str, value: Option<&Value>) -> Option<f64> {
    match present(value) {
        None => {
            errors.push(format!("{field} is required"));
            None
        }
        Some(v) => match v.as_f64().filter(|n| n.is_finite()) {
            Some(n) => Some(n),
            None => {
                errors.push(format!("{field} must be a number"));
                None
            }
        },
    }
}

/// Optional record reference. The outer `None` means the value was invalid.
pub fn optional_id(errors: &mut ValidationErrors, field: &str, value: Option<&Value>) -> Option<Option<u64>> {
    match present(value) {
        None => Some(None),
        Some(v) => match v.as_u64() {
            Some(id) => Some(Some(id)),
            None => {
                errors.push(format!("{field} must be a non-negative integer"));
                None
            }
        },
    }
}
