//! Shapes result rows into fixed-width string rows
//!
//! The scheduling service has shipped several column layouts over time and
//! mixes positional and keyed rows, so every sheet goes through here before
//! rendering.

use std::collections::HashMap;

use serde_json::Value;

use crate::roster::normalize_key;
use crate::schedule::RowLike;

/// Index of the first status column when nothing better is known
pub const DEFAULT_STATUS_START: usize = 3;

/// Display text of a JSON value: strings as-is, null as empty, whole numbers
/// without a fractional part, everything else as compact JSON
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
                    Some(f) => f.to_string(),
                    None => n.to_string(),
                }
            }
        }
        other => other.to_string(),
    }
}

/// Shape `row` to exactly `columns.len()` cells.
///
/// Positional rows are padded with `""` or truncated. Keyed rows are looked
/// up by normalized column name, so `"Civil ID"` finds `"civil_id"`. Any
/// other value yields an empty row.
pub fn row_to_array(row: &RowLike, columns: &[String]) -> Vec<String> {
    match row {
        RowLike::Values(values) => {
            let mut cells: Vec<String> = values.iter().take(columns.len()).map(cell_text).collect();
            cells.resize(columns.len(), String::new());
            cells
        }
        RowLike::Record(record) => {
            let lookup: HashMap<String, &Value> =
                record.iter().map(|(k, v)| (normalize_key(k), v)).collect();

            columns
                .iter()
                .map(|col| {
                    lookup
                        .get(&normalize_key(col))
                        .map(|v| cell_text(v))
                        .unwrap_or_default()
                })
                .collect()
        }
        RowLike::Other(_) => vec![String::new(); columns.len()],
    }
}

/// Index of the first day-of-month column.
///
/// Right after a `ReqOff` column if there is one, else two after `Type`
/// (skipping the civil id column), else [`DEFAULT_STATUS_START`].
pub fn find_status_start_index(columns: &[String]) -> usize {
    let keys: Vec<String> = columns.iter().map(|c| normalize_key(c)).collect();

    if let Some(i) = keys.iter().position(|k| k == "reqoff") {
        return i + 1;
    }
    if let Some(i) = keys.iter().position(|k| k == "type") {
        return i + 2;
    }

    DEFAULT_STATUS_START
}
