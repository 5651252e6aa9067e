//! Issues sheet - free-text problems reported by the scheduler

use super::super::layout::{CellStyle, SheetLayout};
use crate::schedule::payload::ResultSheet;

const DESCRIPTION_WIDTH: f64 = 120.0;

pub fn issues_layout(sheet: &ResultSheet) -> Option<SheetLayout> {
    let (columns, _) = sheet.parts()?;
    let mut layout = SheetLayout::from_sheet("Issues", columns, sheet, |_, _, _| CellStyle::Plain);
    layout.widths = vec![(0, DESCRIPTION_WIDTH)];
    Some(layout)
}
