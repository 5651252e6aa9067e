//! Helper functions for the workbook export

use std::path::Path;

/// Try to open the exported workbook with the system spreadsheet viewer
pub fn try_open_file(file_path: &Path) {
    use std::process::Command;

    let result = if cfg!(target_os = "windows") {
        Command::new("cmd")
            .arg("/c")
            .arg("start")
            .arg("")
            .arg(file_path)
            .spawn()
    } else if cfg!(target_os = "macos") {
        Command::new("open").arg(file_path).spawn()
    } else if cfg!(target_os = "linux") {
        Command::new("xdg-open")
            .arg(file_path)
            .spawn()
            .or_else(|_| Command::new("libreoffice").arg("--calc").arg(file_path).spawn())
    } else {
        log::info!("File saved to: {}", file_path.display());
        return;
    };

    match result {
        Ok(_) => log::info!("Opened workbook: {}", file_path.display()),
        Err(e) => log::warn!(
            "Could not auto-open file: {}. Please open manually: {}",
            e,
            file_path.display()
        ),
    }
}
