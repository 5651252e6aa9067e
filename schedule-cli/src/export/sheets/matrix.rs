//! Matrix sheet - one row per driver, one column per day

use super::super::layout::{CellStyle, SheetLayout};
use super::super::shaper::find_status_start_index;
use crate::schedule::CellStatus;
use crate::schedule::payload::ResultSheet;

/// Name, civil id, type, requested off
const IDENTITY_WIDTHS: [f64; 4] = [22.0, 22.0, 12.0, 8.0];
const DAY_WIDTH: f64 = 12.0;

pub fn matrix_layout(sheet: &ResultSheet) -> Option<SheetLayout> {
    let (columns, _) = sheet.parts()?;
    let status_start = find_status_start_index(columns);

    let mut layout = SheetLayout::from_sheet("Matrix", columns, sheet, |_, col, text| {
        if col < status_start {
            CellStyle::Identity
        } else if text == "OFF" {
            CellStyle::MatrixStatus(CellStatus::Off)
        } else {
            CellStyle::MatrixStatus(CellStatus::Work)
        }
    });

    layout.widths = (0..layout.column_count())
        .map(|c| (c as u16, IDENTITY_WIDTHS.get(c).copied().unwrap_or(DAY_WIDTH)))
        .collect();

    Some(layout.with_freeze(1, status_start as u16))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sheet(value: serde_json::Value) -> ResultSheet {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_off_is_red_everything_else_green() {
        let layout = matrix_layout(&sheet(json!({
            "columns": ["Name", "Civil ID", "Type", "ReqOff", "01", "02", "03"],
            "rows": [["Ann", "100", "local", 1, "OFF", "WORK", "off"]]
        })))
        .unwrap();

        assert_eq!(layout.cell(0, 4).unwrap().style, CellStyle::Header);
        assert_eq!(layout.cell(1, 0).unwrap().style, CellStyle::Identity);
        assert_eq!(layout.cell(1, 3).unwrap().style, CellStyle::Identity);
        assert_eq!(
            layout.cell(1, 4).unwrap().style,
            CellStyle::MatrixStatus(CellStatus::Off)
        );
        assert_eq!(
            layout.cell(1, 5).unwrap().style,
            CellStyle::MatrixStatus(CellStatus::Work)
        );
        assert_eq!(
            layout.cell(1, 6).unwrap().style,
            CellStyle::MatrixStatus(CellStatus::Work)
        );
    }

    #[test]
    fn test_freeze_and_widths_follow_status_start() {
        let layout = matrix_layout(&sheet(json!({
            "columns": ["Name", "Type", "Civil ID", "01", "02"],
            "rows": [["Ann", "local", "100", "OFF", "WORK"]]
        })))
        .unwrap();

        assert_eq!(layout.freeze, Some((1, 3)));
        assert_eq!(
            layout.widths,
            vec![(0, 22.0), (1, 22.0), (2, 12.0), (3, 8.0), (4, 12.0)]
        );
        assert_eq!(layout.cell(1, 2).unwrap().style, CellStyle::Identity);
        assert_eq!(
            layout.cell(1, 3).unwrap().style,
            CellStyle::MatrixStatus(CellStatus::Off)
        );
    }

    #[test]
    fn test_padded_status_cells_are_work() {
        let layout = matrix_layout(&sheet(json!({
            "columns": ["Name", "Civil ID", "Type", "ReqOff", "01"],
            "rows": [["Ann"]]
        })))
        .unwrap();

        let cell = layout.cell(1, 4).unwrap();
        assert_eq!(cell.text, "");
        assert_eq!(cell.style, CellStyle::MatrixStatus(CellStatus::Work));
    }

    #[test]
    fn test_skipped_without_rows() {
        assert!(matrix_layout(&sheet(json!({"columns": ["Name"]}))).is_none());
    }
}
