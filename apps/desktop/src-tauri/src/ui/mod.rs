//! Native UI components for the desktop application.
//!
//! This module handles platform-native UI elements: the system tray and
//! the preferences window's show/hide behaviors.

pub mod tray;
pub mod window;

pub use tray::setup_tray;
