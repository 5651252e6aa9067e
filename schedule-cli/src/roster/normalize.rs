//! Canonical forms for free-text header names and origin values
//!
//! CSV headers and result-sheet column names arrive with arbitrary casing
//! and separators ("Civil_ID", "civil id", "CIVILID"). Everything that
//! compares them goes through [`normalize_key`] first.

use super::model::EmployeeType;

/// Trim, lower-case and drop every whitespace, `-` and `_` character.
pub fn normalize_key(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Classify a free-text origin value.
///
/// Returns `None` when the text carries no recognizable origin. Callers
/// treat that as "no opinion" and must not substitute a default.
pub fn normalize_type(value: &str) -> Option<EmployeeType> {
    let s = value.trim().to_lowercase();
    if s.is_empty() {
        return None;
    }

    if s.contains("over") || s == "o" {
        return Some(EmployeeType::Overseas);
    }
    if s.contains("local") || s == "l" {
        return Some(EmployeeType::Local);
    }

    None
}
