//! Excel export of a generated schedule

mod formatting;
mod helpers;
pub mod layout;
pub mod shaper;
pub mod sheets;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use rust_xlsxwriter::*;

use crate::schedule::SchedulePayload;
use helpers::try_open_file;
use layout::SheetLayout;
use sheets::*;

/// Builds the Matrix / ByDay / Summary / Issues workbook from a payload
pub struct ScheduleExporter;

impl ScheduleExporter {
    /// Layouts for every sheet present in the payload, in workbook order
    pub fn layouts(payload: &SchedulePayload) -> Vec<SheetLayout> {
        let sheets = &payload.sheets;
        [
            sheets.matrix.as_ref().and_then(matrix_layout),
            sheets.by_day.as_ref().and_then(by_day_layout),
            sheets.summary.as_ref().and_then(summary_layout),
            sheets.issues.as_ref().and_then(issues_layout),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    pub fn build_workbook(payload: &SchedulePayload) -> Result<Workbook> {
        let layouts = Self::layouts(payload);
        if layouts.is_empty() {
            bail!("Schedule has no sheets to export");
        }

        let mut workbook = Workbook::new();
        for layout in &layouts {
            layout
                .write(&mut workbook)
                .with_context(|| format!("Failed to write sheet {}", layout.name))?;
        }
        Ok(workbook)
    }

    /// Serialize the workbook to xlsx bytes
    pub fn to_bytes(payload: &SchedulePayload) -> Result<Vec<u8>> {
        let mut workbook = Self::build_workbook(payload)?;
        workbook
            .save_to_buffer()
            .context("Failed to serialize workbook")
    }

    /// Write the workbook into `dir` under the name derived from the
    /// schedule metadata, or to `out` when given. Returns the written path.
    pub async fn export(payload: &SchedulePayload, dir: &Path, out: Option<&Path>) -> Result<PathBuf> {
        let path = match out {
            Some(path) => path.to_path_buf(),
            None => dir.join(payload.meta.export_filename()),
        };

        let bytes = Self::to_bytes(payload)?;
        tokio::fs::write(&path, &bytes)
            .await
            .with_context(|| format!("Failed to save Excel file: {}", path.display()))?;

        log::info!("Excel file exported to: {}", path.display());
        Ok(path)
    }

    /// Export and open the result with the system viewer
    pub async fn export_and_open(payload: &SchedulePayload, dir: &Path, out: Option<&Path>) -> Result<PathBuf> {
        let path = Self::export(payload, dir, out).await?;
        try_open_file(&path);
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{Data, Reader, Xlsx};
    use serde_json::json;
    use std::io::Cursor;

    fn payload() -> SchedulePayload {
        serde_json::from_value(json!({
            "meta": {"year": 2025, "month": 3},
            "issues": [],
            "sheets": {
                "Matrix": {
                    "columns": ["Name", "Civil ID", "Type", "ReqOff", "01", "02"],
                    "rows": [
                        ["Ann", "100", "local", 0, "WORK", "OFF"],
                        {"name": "Bob", "CIVIL_ID": "200", "type": "overseas", "reqoff": 1, "01": "OFF", "02": "WORK"}
                    ]
                },
                "ByDay": {
                    "columns": ["Date", "Driver"],
                    "rows": [["2025-03-01", "Ann"]],
                    "status": [["WORK", "WORK"]]
                },
                "Issues": {
                    "columns": ["Issue"],
                    "rows": [["Bob requested 1 day off"]]
                }
            }
        }))
        .unwrap()
    }

    fn read_back(bytes: Vec<u8>) -> Xlsx<Cursor<Vec<u8>>> {
        Xlsx::new(Cursor::new(bytes)).unwrap()
    }

    fn text(range: &calamine::Range<Data>, row: u32, col: u32) -> String {
        match range.get_value((row, col)) {
            Some(Data::String(s)) => s.clone(),
            other => panic!("expected string at ({}, {}), got {:?}", row, col, other),
        }
    }

    #[test]
    fn test_layouts_skip_absent_sheets() {
        let names: Vec<&str> = ScheduleExporter::layouts(&payload())
            .iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(names, vec!["Matrix", "ByDay", "Issues"]);
    }

    #[test]
    fn test_workbook_contents() {
        let bytes = ScheduleExporter::to_bytes(&payload()).unwrap();
        let mut workbook = read_back(bytes);

        assert_eq!(workbook.sheet_names(), vec!["Matrix", "ByDay", "Issues"]);

        let matrix = workbook.worksheet_range("Matrix").unwrap();
        assert_eq!(text(&matrix, 0, 0), "Name");
        assert_eq!(text(&matrix, 1, 0), "Ann");
        assert_eq!(text(&matrix, 1, 5), "OFF");
        assert_eq!(text(&matrix, 2, 1), "200");
        assert_eq!(text(&matrix, 2, 3), "1");
        assert_eq!(text(&matrix, 2, 4), "OFF");

        let issues = workbook.worksheet_range("Issues").unwrap();
        assert_eq!(text(&issues, 1, 0), "Bob requested 1 day off");
    }

    #[test]
    fn test_oversized_issue_is_truncated() {
        let long = "x".repeat(40_000);
        let payload: SchedulePayload = serde_json::from_value(json!({
            "sheets": {
                "Issues": {"columns": ["Issue"], "rows": [[long], ["Cap exceeded on 03"]]}
            }
        }))
        .unwrap();

        let bytes = ScheduleExporter::to_bytes(&payload).unwrap();
        let issues = read_back(bytes).worksheet_range("Issues").unwrap();
        assert_eq!(text(&issues, 1, 0).len(), layout::MAX_CELL_CHARS);
        assert_eq!(text(&issues, 2, 0), "Cap exceeded on 03");
    }

    #[test]
    fn test_empty_payload_is_an_error() {
        assert!(ScheduleExporter::to_bytes(&SchedulePayload::default()).is_err());
    }

    #[tokio::test]
    async fn test_export_uses_metadata_filename() {
        let dir = tempfile::tempdir().unwrap();
        let path = ScheduleExporter::export(&payload(), dir.path(), None)
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("driver_schedule_2025_03.xlsx"));
        let bytes = std::fs::read(&path).unwrap();
        assert!(read_back(bytes).sheet_names().contains(&"ByDay".to_string()));
    }

    #[tokio::test]
    async fn test_export_to_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("march.xlsx");
        let path = ScheduleExporter::export(&payload(), dir.path(), Some(&out))
            .await
            .unwrap();
        assert_eq!(path, out);
        assert!(out.exists());
    }
}
