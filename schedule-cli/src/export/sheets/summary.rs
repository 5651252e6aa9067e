//! Summary sheet

use super::super::layout::{CellStyle, SheetLayout};
use crate::schedule::payload::ResultSheet;

const COLUMN_WIDTH: f64 = 16.0;

pub fn summary_layout(sheet: &ResultSheet) -> Option<SheetLayout> {
    let (columns, _) = sheet.parts()?;
    let layout = SheetLayout::from_sheet("Summary", columns, sheet, |_, _, _| CellStyle::Plain);
    Some(layout.with_uniform_width(COLUMN_WIDTH))
}
