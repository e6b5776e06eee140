//! Registry row model: one student per barcode ID.

use crate::errors::{AppError, AppResult};
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Student {
    pub barcode_id: String,    // ⇔ students.id (TEXT PRIMARY KEY)
    pub name: String,          // ⇔ students.name
    pub class_label: Option<String>, // ⇔ students.klass
    pub roster_id: Option<String>,   // ⇔ students.untis_student_id
}

/// Trim and reject an empty barcode ID.
pub fn validate_barcode(raw: &str) -> AppResult<String> {
    let barcode = raw.trim();
    if barcode.is_empty() {
        return Err(AppError::InvalidInput("barcode ID must not be empty".into()));
    }
    Ok(barcode.to_string())
}

/// Trim and reject an empty display name.
pub fn validate_name(raw: &str) -> AppResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::InvalidInput("name must not be empty".into()));
    }
    Ok(name.to_string())
}

/// Blank optional fields are stored as NULL.
pub fn normalize_optional(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validators_trim_and_reject_blank() {
        assert_eq!(validate_barcode("  123 ").unwrap(), "123");
        assert!(matches!(validate_barcode("   "), Err(AppError::InvalidInput(_))));
        assert_eq!(validate_name("Anna Muster ").unwrap(), "Anna Muster");
        assert!(validate_name("").is_err());
    }

    #[test]
    fn optional_blank_becomes_none() {
        assert_eq!(normalize_optional(Some("  ")), None);
        assert_eq!(normalize_optional(Some(" 5a ")), Some("5a".to_string()));
        assert_eq!(normalize_optional(None), None);
    }
}
