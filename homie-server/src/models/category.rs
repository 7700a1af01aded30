//! Category name validation and the category record

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::validation::{required_text, ValidationError};

/// Validated category name (trimmed, non-empty).
///
/// Names are not unique; two categories may share a name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a new category name.
    ///
    /// # Example
    /// ```
    /// use homie_server::models::CategoryName;
    ///
    /// assert_eq!(CategoryName::new(" Küche ").unwrap().as_str(), "Küche");
    /// assert!(CategoryName::new("   ").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        required_text(Some(s), "name").map(Self)
    }

    /// Validate an optional request field.
    pub fn parse(s: Option<&str>) -> Result<Self, ValidationError> {
        required_text(s, "name").map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Category with the number of devices linked to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub device_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_accepts_unicode() {
        let name = CategoryName::new("  Wohnzimmer ").unwrap();
        assert_eq!(name.as_str(), "Wohnzimmer");
        assert_eq!(CategoryName::new("Küche").unwrap().into_string(), "Küche");
    }

    #[test]
    fn rejects_empty() {
        let err = CategoryName::new("").unwrap_err();
        assert!(matches!(err, ValidationError::Empty { field: "name" }));
    }

    #[test]
    fn absent_is_missing() {
        let err = CategoryName::parse(None).unwrap_err();
        assert!(matches!(err, ValidationError::Missing { field: "name" }));
    }

    #[test]
    fn serializes_with_count() {
        let category = Category {
            id: 1,
            name: "Licht".into(),
            device_count: 2,
        };
        let json = serde_json::to_value(&category).unwrap();
        assert_eq!(json, serde_json::json!({"id": 1, "name": "Licht", "device_count": 2}));
    }
}
