//! Marauder's Map Desktop - Tauri desktop application.
//!
//! The preferences window is the root of the program and hides itself by
//! default; the system tray ties into the external map functions. This
//! crate handles:
//! - The launch capability check (a host without a tray cannot run)
//! - System tray integration (icon state, context menu, action dispatch)
//! - The hide-instead-of-close window lifecycle

mod actions;
mod capability;
mod ui;

use tauri::{RunEvent, WindowEvent};
use tauri_plugin_log::{Target, TargetKind};

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // No UI is constructed when the tray is missing; the reason is printed
    // and the process exits non-zero.
    if let Err(err) = capability::ensure_tray_available() {
        eprintln!("ERROR: Unable to launch Marauder's Map!");
        eprintln!("{err}");
        std::process::exit(1);
    }

    let app = tauri::Builder::default()
        .plugin(
            tauri_plugin_log::Builder::new()
                .targets([
                    Target::new(TargetKind::Stdout),
                    Target::new(TargetKind::LogDir { file_name: None }),
                ])
                .level(if cfg!(debug_assertions) {
                    log::LevelFilter::Debug
                } else {
                    log::LevelFilter::Info
                })
                .build(),
        )
        .plugin(tauri_plugin_shell::init())
        .setup(|app| {
            ui::setup_tray(app)?;
            Ok(())
        })
        .on_window_event(|window, event| {
            if let WindowEvent::CloseRequested { api, .. } = event {
                // Hide to tray instead of closing; the window object stays
                // alive for the next "Preferences..." selection.
                api.prevent_close();
                ui::window::hide_to_tray(window);
            }
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application");

    app.run(|_app_handle, event| match event {
        // An explicit quit (the tray's Quit action) carries an exit code
        // and passes through; an exit requested because no window is
        // visible does not.
        RunEvent::ExitRequested { code: None, api, .. } => {
            api.prevent_exit();
        }
        #[cfg(target_os = "macos")]
        RunEvent::Reopen { .. } => {
            ui::window::show_preferences(_app_handle);
        }
        _ => {}
    });
}
