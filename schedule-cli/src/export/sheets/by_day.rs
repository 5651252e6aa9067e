//! ByDay sheet - per-day assignments coloured from the status matrix

use super::super::layout::{CellStyle, SheetLayout};
use crate::schedule::payload::ResultSheet;

const COLUMN_WIDTH: f64 = 24.0;

/// Cell text here is usually a driver name, so colour comes from
/// `status[row][col]` rather than the text
pub fn by_day_layout(sheet: &ResultSheet) -> Option<SheetLayout> {
    let (columns, _) = sheet.parts()?;

    let layout = SheetLayout::from_sheet("ByDay", columns, sheet, |row, col, _| {
        CellStyle::DayStatus(sheet.status_at(row, col))
    });

    Some(layout.with_uniform_width(COLUMN_WIDTH).with_freeze(1, 0))
}
