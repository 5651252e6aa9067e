//! Column inference for uploaded CSV headers

use super::normalize::normalize_key;

/// Header aliases that identify the civil-id column
pub const CIVIL_ID_ALIASES: &[&str] = &["civil_id", "civil id", "civilid", "cid"];

/// Header aliases that identify the origin/type column
pub const ORIGIN_ALIASES: &[&str] = &[
    "origin",
    "type",
    "employee_type",
    "driver_type",
    "local/overseas",
];

/// Guess which header holds employee names.
///
/// Only case and surrounding whitespace are ignored here; separators are
/// significant so that "driver name" can be told apart from "drivername".
/// Falls back to the first header, or `""` for an empty header list.
pub fn guess_name_column(headers: &[String]) -> String {
    let lower: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();

    if let Some(idx) = lower
        .iter()
        .position(|h| h.contains("driver") && h.contains("name"))
    {
        return headers[idx].clone();
    }

    if let Some(idx) = lower
        .iter()
        .position(|h| matches!(h.as_str(), "driver" | "drivers" | "name" | "names"))
    {
        return headers[idx].clone();
    }

    headers.first().cloned().unwrap_or_default()
}

/// Return the first header whose normalized form matches any alias, or `""`.
pub fn guess_by_aliases(headers: &[String], aliases: &[&str]) -> String {
    let targets: Vec<String> = aliases.iter().map(|a| normalize_key(a)).collect();

    headers
        .iter()
        .find(|h| targets.contains(&normalize_key(h)))
        .cloned()
        .unwrap_or_default()
}

/// Inferred column selection for one CSV file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSelection {
    pub name: String,
    /// Empty when no civil-id column is selected
    pub civil_id: String,
    /// Empty when no origin column is selected
    pub origin: String,
}

impl ColumnSelection {
    /// Run all three guesses against a header list
    pub fn infer(headers: &[String]) -> Self {
        Self {
            name: guess_name_column(headers),
            civil_id: guess_by_aliases(headers, CIVIL_ID_ALIASES),
            origin: guess_by_aliases(headers, ORIGIN_ALIASES),
        }
    }

    pub fn civil_id_column(&self) -> Option<&str> {
        Some(self.civil_id.as_str()).filter(|c| !c.is_empty())
    }

    pub fn origin_column(&self) -> Option<&str> {
        Some(self.origin.as_str()).filter(|c| !c.is_empty())
    }
}
