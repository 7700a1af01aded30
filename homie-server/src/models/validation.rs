//! Validation error types and the loose field parsers shared by all inputs

use std::fmt;

use serde::Deserialize;

/// Validation error for domain models
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Required field was not supplied at all
    Missing { field: &'static str },

    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// Value has the wrong shape (non-numeric id, negative power, ...)
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Referenced ids do not exist
    UnknownIds { field: &'static str, ids: Vec<i64> },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { field } => write!(f, "{} is required", field),
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::InvalidFormat { field, reason } => {
                write!(f, "{}: {}", field, reason)
            }
            Self::UnknownIds { field, ids } => {
                let ids: Vec<String> = ids.iter().map(i64::to_string).collect();
                write!(f, "{}: unknown ids {}", field, ids.join(", "))
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Maximum length for free-text fields (names, rooms, image paths)
pub const MAX_TEXT_LEN: usize = 255;

/// A JSON value that may be a number or a numeric string.
///
/// Admin forms submit every field as a string, API clients send numbers;
/// both are accepted for ids and power.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LooseNumber {
    Number(serde_json::Number),
    Text(String),
}

impl LooseNumber {
    /// Interpret as a positive row id.
    pub fn to_id(&self, field: &'static str) -> Result<i64, ValidationError> {
        let id = match self {
            Self::Number(n) => n.as_i64(),
            Self::Text(s) if s.trim().is_empty() => {
                return Err(ValidationError::Missing { field });
            }
            Self::Text(s) => s.trim().parse::<i64>().ok(),
        };

        match id {
            Some(id) if id > 0 => Ok(id),
            _ => Err(ValidationError::InvalidFormat {
                field,
                reason: "must be a positive integer",
            }),
        }
    }

    /// Interpret as a finite, non-negative quantity.
    pub fn to_non_negative(&self, field: &'static str) -> Result<f64, ValidationError> {
        let value = match self {
            Self::Number(n) => n.as_f64(),
            Self::Text(s) if s.trim().is_empty() => {
                return Err(ValidationError::Missing { field });
            }
            Self::Text(s) => s.trim().parse::<f64>().ok(),
        };

        match value {
            Some(v) if v.is_finite() && v >= 0.0 => Ok(v),
            Some(v) if v.is_finite() => Err(ValidationError::InvalidFormat {
                field,
                reason: "must not be negative",
            }),
            _ => Err(ValidationError::InvalidFormat {
                field,
                reason: "must be a number",
            }),
        }
    }
}

impl From<i64> for LooseNumber {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

/// Require an id field to be present and valid.
pub fn required_id(
    value: Option<&LooseNumber>,
    field: &'static str,
) -> Result<i64, ValidationError> {
    value
        .ok_or(ValidationError::Missing { field })?
        .to_id(field)
}

/// Require a text field to be present, non-blank and of bounded length.
///
/// Surrounding whitespace is trimmed.
pub fn required_text(value: Option<&str>, field: &'static str) -> Result<String, ValidationError> {
    let value = value.ok_or(ValidationError::Missing { field })?.trim();

    if value.is_empty() {
        return Err(ValidationError::Empty { field });
    }

    if value.chars().count() > MAX_TEXT_LEN {
        return Err(ValidationError::TooLong {
            field,
            max: MAX_TEXT_LEN,
        });
    }

    Ok(value.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> LooseNumber {
        LooseNumber::Text(s.to_owned())
    }

    #[test]
    fn error_display() {
        let err = ValidationError::TooLong {
            field: "name",
            max: 255,
        };
        assert_eq!(err.to_string(), "name exceeds maximum length of 255 characters");

        let err = ValidationError::UnknownIds {
            field: "categories",
            ids: vec![3, 7],
        };
        assert_eq!(err.to_string(), "categories: unknown ids 3, 7");
    }

    #[test]
    fn ids_accept_numbers_and_numeric_strings() {
        assert_eq!(LooseNumber::from(12).to_id("id"), Ok(12));
        assert_eq!(text(" 12 ").to_id("id"), Ok(12));
    }

    #[test]
    fn ids_reject_garbage() {
        assert!(matches!(
            text("abc").to_id("id"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            LooseNumber::from(0).to_id("id"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        let fractional: LooseNumber = serde_json::from_str("1.5").unwrap();
        assert!(fractional.to_id("id").is_err());
        assert_eq!(text("").to_id("id"), Err(ValidationError::Missing { field: "id" }));
    }

    #[test]
    fn power_parsing() {
        let watts: LooseNumber = serde_json::from_str("60").unwrap();
        assert_eq!(watts.to_non_negative("power"), Ok(60.0));
        assert_eq!(text("7.5").to_non_negative("power"), Ok(7.5));
        assert_eq!(text("0").to_non_negative("power"), Ok(0.0));
        assert!(matches!(
            text("-1").to_non_negative("power"),
            Err(ValidationError::InvalidFormat { reason: "must not be negative", .. })
        ));
        assert!(matches!(
            text("NaN").to_non_negative("power"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn required_text_rules() {
        assert_eq!(required_text(Some("  Lampe "), "name"), Ok("Lampe".to_owned()));
        assert_eq!(
            required_text(None, "name"),
            Err(ValidationError::Missing { field: "name" })
        );
        assert_eq!(
            required_text(Some("   "), "name"),
            Err(ValidationError::Empty { field: "name" })
        );
        let long = "x".repeat(MAX_TEXT_LEN + 1);
        assert!(matches!(
            required_text(Some(&long), "name"),
            Err(ValidationError::TooLong { max: MAX_TEXT_LEN, .. })
        ));
    }

    #[test]
    fn required_id_missing() {
        assert_eq!(
            required_id(None, "id"),
            Err(ValidationError::Missing { field: "id" })
        );
    }
}
