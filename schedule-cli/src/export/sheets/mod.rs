//! Sheet builders for the schedule workbook

pub mod by_day;
pub mod issues;
pub mod matrix;
pub mod summary;

pub use by_day::by_day_layout;
pub use issues::issues_layout;
pub use matrix::matrix_layout;
pub use summary::summary_layout;
