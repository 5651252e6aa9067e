//! Sheet layouts: cell text and style decided up front, rendered to a
//! worksheet in one pass

use anyhow::Result;
use rust_xlsxwriter::*;

use super::formatting::*;
use super::shaper::row_to_array;
use crate::schedule::CellStatus;
use crate::schedule::payload::ResultSheet;

/// Longest text an xlsx cell may hold, in characters
pub const MAX_CELL_CHARS: usize = 32_767;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellStyle {
    Plain,
    Header,
    Identity,
    MatrixStatus(CellStatus),
    DayStatus(CellStatus),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub text: String,
    pub style: CellStyle,
}

impl Cell {
    pub fn new(text: impl Into<String>, style: CellStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// A fully decided worksheet. Row 0 is the header row.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    pub name: &'static str,
    pub rows: Vec<Vec<Cell>>,
    /// (column, width) pairs
    pub widths: Vec<(u16, f64)>,
    /// (row, column) of the top-left unfrozen cell
    pub freeze: Option<(u32, u16)>,
}

impl SheetLayout {
    /// Header row plus shaped data rows, styled by `style(row, col, text)`
    /// where `row` is the 0-based data row index
    pub fn from_sheet(
        name: &'static str,
        columns: &[String],
        sheet: &ResultSheet,
        style: impl Fn(usize, usize, &str) -> CellStyle,
    ) -> Self {
        let mut rows = Vec::with_capacity(sheet.rows.as_ref().map_or(0, Vec::len) + 1);
        rows.push(
            columns
                .iter()
                .map(|c| Cell::new(c.as_str(), CellStyle::Header))
                .collect(),
        );

        for (r, row) in sheet.rows.iter().flatten().enumerate() {
            let shaped = row_to_array(row, columns);
            rows.push(
                shaped
                    .into_iter()
                    .enumerate()
                    .map(|(c, text)| {
                        let style = style(r, c, &text);
                        Cell::new(text, style)
                    })
                    .collect(),
            );
        }

        Self {
            name,
            rows,
            widths: Vec::new(),
            freeze: None,
        }
    }

    pub fn column_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Same width for every column
    pub fn with_uniform_width(mut self, width: f64) -> Self {
        self.widths = (0..self.column_count() as u16).map(|c| (c, width)).collect();
        self
    }

    pub fn with_freeze(mut self, row: u32, col: u16) -> Self {
        self.freeze = Some((row, col));
        self
    }

    #[cfg(test)]
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Render into a new worksheet of `workbook`
    pub fn write(&self, workbook: &mut Workbook) -> Result<()> {
        let sheet = workbook.add_worksheet();
        sheet.set_name(self.name)?;

        let header_format = create_header_format();
        let identity_format = create_identity_format();
        let matrix_formats = [
            create_matrix_status_format(CellStatus::Work),
            create_matrix_status_format(CellStatus::Off),
        ];
        let day_formats = [
            create_day_status_format(CellStatus::Work),
            create_day_status_format(CellStatus::Off),
        ];

        for (r, row) in self.rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let (row_idx, col_idx) = (r as u32, c as u16);
                let format = match cell.style {
                    CellStyle::Plain => None,
                    CellStyle::Header => Some(&header_format),
                    CellStyle::Identity => Some(&identity_format),
                    CellStyle::MatrixStatus(s) => Some(&matrix_formats[status_slot(s)]),
                    CellStyle::DayStatus(s) => Some(&day_formats[status_slot(s)]),
                };

                let text = cell_limited(self.name, r, c, &cell.text);
                match (format, text.is_empty()) {
                    (None, true) => {}
                    (None, false) => {
                        sheet.write_string(row_idx, col_idx, text)?;
                    }
                    (Some(format), true) => {
                        sheet.write_blank(row_idx, col_idx, format)?;
                    }
                    (Some(format), false) => {
                        sheet.write_string_with_format(row_idx, col_idx, text, format)?;
                    }
                }
            }
        }

        for &(col, width) in &self.widths {
            sheet.set_column_width(col, width)?;
        }

        if let Some((row, col)) = self.freeze {
            sheet.set_freeze_panes(row, col)?;
        }

        log::debug!("Wrote sheet {} ({} rows)", self.name, self.rows.len().saturating_sub(1));
        Ok(())
    }
}

fn status_slot(status: CellStatus) -> usize {
    match status {
        CellStatus::Work => 0,
        CellStatus::Off => 1,
    }
}

/// Cut `text` to [`MAX_CELL_CHARS`] on a char boundary
fn cell_limited<'a>(sheet: &str, row: usize, col: usize, text: &'a str) -> &'a str {
    match text.char_indices().nth(MAX_CELL_CHARS) {
        Some((end, _)) => {
            log::warn!(
                "Truncated {} cell ({}, {}) to {} characters",
                sheet,
                row,
                col,
                MAX_CELL_CHARS
            );
            &text[..end]
        }
        None => text,
    }
}
