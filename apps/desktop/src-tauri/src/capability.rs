//! Launch precondition checks.
//!
//! The tray is the application's only persistent surface, so a host that
//! cannot display one cannot run it at all. The check runs before any UI
//! is constructed.

use thiserror::Error;

/// The host cannot display a system tray icon.
#[derive(Debug, Error)]
#[error("{reason}")]
pub struct TrayUnavailable {
    reason: String,
}

/// Verifies that the host desktop can display a system tray icon.
///
/// Windows and macOS always expose a notification area. On Linux the tray
/// is provided by a `StatusNotifierWatcher` host on the D-Bus session bus,
/// which in turn needs a graphical session, so the check inspects the
/// session environment.
pub fn ensure_tray_available() -> Result<(), TrayUnavailable> {
    if cfg!(target_os = "linux") {
        session_check(&SessionEnv::from_process_env()).map_err(|reason| TrayUnavailable { reason })
    } else {
        Ok(())
    }
}

/// Snapshot of the session-related environment variables.
struct SessionEnv {
    display: bool,
    wayland_display: bool,
    session_bus: bool,
}

impl SessionEnv {
    fn from_process_env() -> Self {
        Self {
            display: env_set("DISPLAY"),
            wayland_display: env_set("WAYLAND_DISPLAY"),
            session_bus: env_set("DBUS_SESSION_BUS_ADDRESS"),
        }
    }
}

fn env_set(key: &str) -> bool {
    std::env::var_os(key).is_some_and(|value| !value.is_empty())
}

/// Decides tray support from a session snapshot.
///
/// Pure over the snapshot so the failure reasons can be exercised without
/// a live session.
fn session_check(env: &SessionEnv) -> Result<(), String> {
    if !env.display && !env.wayland_display {
        return Err(
            "failed to detect a graphical session (neither DISPLAY nor WAYLAND_DISPLAY is set)"
                .to_string(),
        );
    }
    if !env.session_bus {
        return Err(
            "failed to detect a D-Bus session bus (DBUS_SESSION_BUS_ADDRESS is not set); \
             the tray host requires one"
                .to_string(),
        );
    }
    Ok(())
}
