//! Result payload returned by the scheduling service
//!
//! The service's sheet schema has changed over time, so everything here is
//! deserialized leniently: missing or null sections take their defaults,
//! rows may be value lists or keyed records, numbers may arrive as strings
//! and column names may arrive as numbers. A malformed value degrades to
//! its default instead of failing the whole response.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::rules::month_number;
use crate::export::shaper::cell_text;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulePayload {
    #[serde(deserialize_with = "or_default")]
    pub meta: Meta,
    #[serde(deserialize_with = "lenient_strings")]
    pub issues: Vec<String>,
    #[serde(deserialize_with = "or_default")]
    pub sheets: Sheets,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Meta {
    #[serde(deserialize_with = "lenient_int")]
    pub year: Option<i32>,
    #[serde(deserialize_with = "lenient_month")]
    pub month: Option<MonthValue>,
    #[serde(deserialize_with = "lenient_text")]
    pub generated_at_utc: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub counts: Option<Counts>,
    pub cap_per_day_used: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Counts {
    #[serde(deserialize_with = "lenient_int")]
    pub drivers: Option<u64>,
}

/// Month as the service reports it: a number or a name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MonthValue {
    Number(u32),
    Name(String),
}

impl MonthValue {
    /// 1-based month number, if it can be determined
    pub fn number(&self) -> Option<u32> {
        match self {
            Self::Number(n) => (1..=12).contains(n).then_some(*n),
            Self::Name(name) => month_number(name),
        }
    }
}

impl Meta {
    /// `driver_schedule_<year>_<MM>.xlsx`, or `driver_schedule.xlsx` when
    /// the year or month is unknown
    pub fn export_filename(&self) -> String {
        match (self.year, self.month.as_ref().and_then(MonthValue::number)) {
            (Some(year), Some(month)) => format!("driver_schedule_{}_{:02}.xlsx", year, month),
            _ => "driver_schedule.xlsx".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sheets {
    #[serde(rename = "Matrix", deserialize_with = "or_default")]
    pub matrix: Option<ResultSheet>,
    #[serde(rename = "ByDay", deserialize_with = "or_default")]
    pub by_day: Option<ResultSheet>,
    #[serde(rename = "Summary", deserialize_with = "or_default")]
    pub summary: Option<ResultSheet>,
    #[serde(rename = "Issues", deserialize_with = "or_default")]
    pub issues: Option<ResultSheet>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultSheet {
    #[serde(deserialize_with = "lenient_columns")]
    pub columns: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient_rows")]
    pub rows: Option<Vec<RowLike>>,
    /// `status[row][col]`; a null or malformed row is kept as empty
    #[serde(deserialize_with = "lenient_status")]
    pub status: Option<Vec<Vec<CellStatus>>>,
}

impl ResultSheet {
    /// Columns and rows, or `None` if either is missing
    pub fn parts(&self) -> Option<(&[String], &[RowLike])> {
        Some((self.columns.as_deref()?, self.rows.as_deref()?))
    }

    /// Status for a cell; missing entries count as work
    pub fn status_at(&self, row: usize, col: usize) -> CellStatus {
        self.status
            .as_ref()
            .and_then(|s| s.get(row))
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or_default()
    }
}

/// One result row in either of the shapes the service produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowLike {
    /// Positional values aligned with the sheet columns
    Values(Vec<Value>),
    /// Values keyed by column name (casing and separators may differ)
    Record(Map<String, Value>),
    /// Anything else; shapes to an empty row
    Other(Value),
}

impl From<Value> for RowLike {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(values) => Self::Values(values),
            Value::Object(record) => Self::Record(record),
            other => Self::Other(other),
        }
    }
}

/// Work/off marker from a ByDay status matrix
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub enum CellStatus {
    #[serde(rename = "OFF")]
    Off,
    #[default]
    #[serde(rename = "WORK")]
    Work,
}

impl From<Value> for CellStatus {
    fn from(value: Value) -> Self {
        match value.as_str() {
            Some("OFF") => Self::Off,
            _ => Self::Work,
        }
    }
}

fn raw_value<'de, D>(deserializer: D) -> Result<Value, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.unwrap_or(Value::Null))
}

/// Null or an unexpected shape becomes `T::default()`
fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = raw_value(deserializer)?;
    if value.is_null() {
        return Ok(T::default());
    }
    Ok(serde_json::from_value(value).unwrap_or_else(|e| {
        log::warn!("Ignoring malformed schedule field: {}", e);
        T::default()
    }))
}

/// Whole number from a JSON number or numeric string
fn int_value(value: &Value) -> Option<i64> {
    let float = match value {
        Value::Number(n) => n.as_i64().map(|i| i as f64).or_else(|| n.as_f64())?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (float.is_finite() && float.fract() == 0.0).then_some(float as i64)
}

fn lenient_int<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    let value = raw_value(deserializer)?;
    Ok(int_value(&value).and_then(|i| T::try_from(i).ok()))
}

fn lenient_month<'de, D>(deserializer: D) -> Result<Option<MonthValue>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = raw_value(deserializer)?;
    if let Some(n) = int_value(&value) {
        return Ok(u32::try_from(n).ok().map(MonthValue::Number));
    }
    Ok(match value {
        Value::String(s) if !s.trim().is_empty() => Some(MonthValue::Name(s)),
        _ => None,
    })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = cell_text(&raw_value(deserializer)?);
    Ok((!text.is_empty()).then_some(text))
}

fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match raw_value(deserializer)? {
        Value::Array(items) => items
            .iter()
            .map(cell_text)
            .filter(|s| !s.is_empty())
            .collect(),
        _ => Vec::new(),
    })
}

fn lenient_columns<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match raw_value(deserializer)? {
        Value::Array(cols) => Some(cols.iter().map(cell_text).collect()),
        _ => None,
    })
}

fn lenient_rows<'de, D>(deserializer: D) -> Result<Option<Vec<RowLike>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match raw_value(deserializer)? {
        Value::Array(rows) => Some(rows.into_iter().map(RowLike::from).collect()),
        _ => None,
    })
}

fn lenient_status<'de, D>(deserializer: D) -> Result<Option<Vec<Vec<CellStatus>>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match raw_value(deserializer)? {
        Value::Array(rows) => Some(
            rows.into_iter()
                .map(|row| match row {
                    Value::Array(cells) => cells.into_iter().map(CellStatus::from).collect(),
                    _ => Vec::new(),
                })
                .collect(),
        ),
        _ => None,
    })
}
