//! External map actions.
//!
//! The map itself lives outside this application; the tray only needs an
//! entry point that hands the user over to it.

use tauri::AppHandle;
use tauri_plugin_shell::ShellExt;
use thiserror::Error;

/// Address of the live map page.
pub const MAP_URL: &str = "http://map.olin.edu/";

/// Failure to hand off to the external map.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("failed to open the map page: {0}")]
    OpenMap(String),
}

/// Opens the map page in the user's default browser.
pub fn open_map(app: &AppHandle) -> Result<(), ActionError> {
    app.shell()
        .open(MAP_URL, None)
        .map_err(|e| ActionError::OpenMap(e.to_string()))
}
