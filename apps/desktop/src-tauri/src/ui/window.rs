//! Preferences window behavior.
//!
//! The window is created hidden and is never destroyed while the app runs;
//! closing it only hides it, so the tray's "Preferences..." entry can
//! always bring it back.

use tauri::{AppHandle, Manager, Window};

/// Label of the preferences window in `tauri.conf.json`.
pub const PREFERENCES_WINDOW: &str = "main";

/// Shows the preferences window and brings it to the foreground.
///
/// Calling this while the window is already visible just raises it again.
pub fn show_preferences(app: &AppHandle) {
    let Some(window) = app.get_webview_window(PREFERENCES_WINDOW) else {
        log::warn!("Preferences window not found");
        return;
    };

    // On macOS, restore the Dock icon alongside the window.
    #[cfg(target_os = "macos")]
    {
        use tauri::ActivationPolicy;
        let _ = app.set_activation_policy(ActivationPolicy::Regular);
    }

    let _ = window.show();
    let _ = window.unminimize();
    let _ = window.set_focus();
}

/// Hides the window in place of a real close.
pub fn hide_to_tray(window: &Window) {
    let _ = window.hide();

    // On macOS, drop the Dock icon while only the tray remains.
    #[cfg(target_os = "macos")]
    {
        use tauri::ActivationPolicy;
        let _ = window
            .app_handle()
            .set_activation_policy(ActivationPolicy::Accessory);
    }
}
