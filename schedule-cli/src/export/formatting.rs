//! Cell formats for the schedule workbook

use rust_xlsxwriter::*;

use crate::schedule::CellStatus;

pub const HEADER_FILL: u32 = 0x111827;
pub const WORK_FILL: u32 = 0x16FC05;
pub const OFF_FILL: u32 = 0xFA4343;

/// Bold white text on dark fill, centered and wrapped
pub fn create_header_format() -> Format {
    Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(HEADER_FILL))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap()
}

/// Leading Matrix columns (name, civil id, type, requested off)
pub fn create_identity_format() -> Format {
    Format::new()
        .set_bold()
        .set_align(FormatAlign::Left)
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap()
}

pub fn status_fill(status: CellStatus) -> Color {
    match status {
        CellStatus::Off => Color::RGB(OFF_FILL),
        CellStatus::Work => Color::RGB(WORK_FILL),
    }
}

/// Matrix day cell: centered black text on the status fill
pub fn create_matrix_status_format(status: CellStatus) -> Format {
    Format::new()
        .set_font_color(Color::Black)
        .set_background_color(status_fill(status))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap()
}

/// ByDay cell: white text on the status fill
pub fn create_day_status_format(status: CellStatus) -> Format {
    Format::new()
        .set_font_color(Color::White)
        .set_background_color(status_fill(status))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_fill_colors() {
        assert_eq!(status_fill(CellStatus::Off), Color::RGB(OFF_FILL));
        assert_eq!(status_fill(CellStatus::Work), Color::RGB(WORK_FILL));
        assert_ne!(status_fill(CellStatus::Off), status_fill(CellStatus::Work));
    }
}
