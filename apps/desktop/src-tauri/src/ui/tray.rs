//! System tray integration.
//!
//! Provides the tray icon, its context menu, and the dispatch of menu
//! selections to their handlers. The menu layout is fixed data
//! ([`MENU_LAYOUT`]) and dispatch goes through the [`MenuHandlers`] seam,
//! so both can be exercised in tests without a live tray.
//!
//! The icon has two appearance states: it switches on a trigger-style
//! activation and reverts when a menu entry is selected.

use std::sync::Mutex;

use tauri::{
    image::Image,
    menu::{MenuBuilder, MenuEvent, MenuItemBuilder, PredefinedMenuItem},
    tray::{MouseButton, MouseButtonState, TrayIcon, TrayIconBuilder, TrayIconEvent},
    AppHandle, Manager,
};
use thiserror::Error;

use crate::actions;
use crate::ui::window;

/// Tooltip shown when hovering the tray icon.
const TRAY_TOOLTIP: &str = "Marauder's Map";

// ─────────────────────────────────────────────────────────────────────────────
// Menu Item Identifiers
// ─────────────────────────────────────────────────────────────────────────────

/// System tray menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MenuItemId {
    /// Opens the map in the browser.
    OpenMap,
    /// Re-runs location sensing (stub until a location backend exists).
    RefreshLocation,
    /// Current location readout (disabled, display-only).
    LocationIndicator,
    /// Manual location correction (inert placeholder).
    CorrectLocation,
    /// Free-form location entry (inert placeholder).
    OtherLocation,
    /// Hides the user from the map (inert placeholder).
    GoOffline,
    /// Shows the preferences window.
    Preferences,
    /// Quits the application.
    Quit,
}

impl MenuItemId {
    const fn id(self) -> &'static str {
        match self {
            Self::OpenMap => "open_map",
            Self::RefreshLocation => "refresh_location",
            Self::LocationIndicator => "location_indicator",
            Self::CorrectLocation => "correct_location",
            Self::OtherLocation => "other_location",
            Self::GoOffline => "go_offline",
            Self::Preferences => "preferences",
            Self::Quit => "quit",
        }
    }

    fn from_id(id: &str) -> Option<Self> {
        match id {
            "open_map" => Some(Self::OpenMap),
            "refresh_location" => Some(Self::RefreshLocation),
            "location_indicator" => Some(Self::LocationIndicator),
            "correct_location" => Some(Self::CorrectLocation),
            "other_location" => Some(Self::OtherLocation),
            "go_offline" => Some(Self::GoOffline),
            "preferences" => Some(Self::Preferences),
            "quit" => Some(Self::Quit),
            _ => None,
        }
    }

    /// Label text, verbatim. These strings are a user-visible contract.
    const fn label(self) -> &'static str {
        match self {
            Self::OpenMap => "Open Map",
            Self::RefreshLocation => "Refresh My Location",
            Self::LocationIndicator => "Location: Unknown",
            Self::CorrectLocation => "Correct My Location",
            Self::OtherLocation => "Other...",
            Self::GoOffline => "Go Offline",
            Self::Preferences => "Preferences...",
            Self::Quit => "Quit",
        }
    }

    /// The location indicator is informational and never interactive.
    const fn enabled(self) -> bool {
        !matches!(self, Self::LocationIndicator)
    }
}

/// A slot in the context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuEntry {
    Action(MenuItemId),
    Separator,
}

/// The context menu in display order. The grouping and separator placement
/// are part of what the user sees and must not be reordered.
const MENU_LAYOUT: &[MenuEntry] = &[
    MenuEntry::Action(MenuItemId::OpenMap),
    MenuEntry::Separator,
    MenuEntry::Action(MenuItemId::RefreshLocation),
    MenuEntry::Separator,
    MenuEntry::Action(MenuItemId::LocationIndicator),
    MenuEntry::Action(MenuItemId::CorrectLocation),
    MenuEntry::Action(MenuItemId::OtherLocation),
    MenuEntry::Separator,
    MenuEntry::Action(MenuItemId::GoOffline),
    MenuEntry::Action(MenuItemId::Preferences),
    MenuEntry::Separator,
    MenuEntry::Action(MenuItemId::Quit),
];

// ─────────────────────────────────────────────────────────────────────────────
// Icon State
// ─────────────────────────────────────────────────────────────────────────────

/// Tray icon appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IconState {
    Default,
    Clicked,
}

/// Events that drive the icon appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IconEvent {
    /// Trigger-style activation: left click, button released.
    /// Double-click is deliberately unhandled.
    Triggered,
    /// A menu entry was selected. This is the only menu-dismissal signal
    /// the toolkit delivers; dismissing the menu without selecting leaves
    /// the state untouched.
    MenuSelected,
}

impl IconState {
    fn transition(self, event: IconEvent) -> IconState {
        match event {
            IconEvent::Triggered => IconState::Clicked,
            IconEvent::MenuSelected => IconState::Default,
        }
    }
}

/// Holds the tray icon handle and its appearance state.
pub struct TrayState {
    tray_icon: TrayIcon,
    icon_state: Mutex<IconState>,
}

impl TrayState {
    /// Applies an icon event, swapping the icon image if the state changed.
    fn apply(&self, event: IconEvent) {
        // Only event-loop callbacks touch the state; a poisoned lock means
        // one of them panicked and there is nothing left to update for.
        let Ok(mut state) = self.icon_state.lock() else {
            return;
        };

        let next = state.transition(event);
        if next != *state {
            *state = next;
            self.set_icon_or_warn(load_icon(next));
        }
    }

    /// Sets the tray icon, logging warnings on failure.
    fn set_icon_or_warn(&self, icon: Result<Image<'static>, TrayError>) {
        match icon {
            Ok(img) => {
                if let Err(e) = self.tray_icon.set_icon(Some(img)) {
                    log::warn!("Failed to update tray icon: {}", e);
                }
            }
            Err(e) => {
                log::warn!("Failed to load tray icon: {}", e);
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Icon Loading
// ─────────────────────────────────────────────────────────────────────────────

/// Icon bytes for the default state (embedded at compile time).
const TRAY_ICON_DEFAULT: &[u8] = include_bytes!("../../icons/tray/tray-default.png");
/// Icon bytes for the clicked state.
const TRAY_ICON_CLICKED: &[u8] = include_bytes!("../../icons/tray/tray-clicked.png");

/// Decodes the icon for an appearance state.
///
/// Decode failures surface as explicit errors so a bad asset fails startup
/// instead of leaving a blank tray entry.
fn load_icon(state: IconState) -> Result<Image<'static>, TrayError> {
    let bytes = match state {
        IconState::Default => TRAY_ICON_DEFAULT,
        IconState::Clicked => TRAY_ICON_CLICKED,
    };
    Image::from_bytes(bytes).map_err(|e| TrayError::Icon(e.to_string()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Error Handling
// ─────────────────────────────────────────────────────────────────────────────

/// Errors during tray initialization.
#[derive(Debug, Error)]
pub enum TrayError {
    #[error("failed to build tray: {0}")]
    Build(String),
    #[error("failed to load tray icon: {0}")]
    Icon(String),
}

/// Extension trait for converting menu errors to `TrayError`.
trait MenuResultExt<T> {
    fn tray_err(self) -> Result<T, TrayError>;
}

impl<T, E: std::fmt::Display> MenuResultExt<T> for Result<T, E> {
    fn tray_err(self) -> Result<T, TrayError> {
        self.map_err(|e| TrayError::Build(e.to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Action Dispatch
// ─────────────────────────────────────────────────────────────────────────────

/// Handlers behind the interactive menu entries.
trait MenuHandlers {
    fn open_map(&self);
    fn refresh_location(&self);
    fn show_preferences(&self);
    fn quit(&self);
}

/// Routes a selected menu action to its handler.
///
/// `CorrectLocation`, `OtherLocation`, and `GoOffline` are intentionally
/// inert placeholders; the location indicator is disabled and never
/// dispatches.
fn dispatch(action: MenuItemId, handlers: &impl MenuHandlers) {
    match action {
        MenuItemId::OpenMap => handlers.open_map(),
        MenuItemId::RefreshLocation => handlers.refresh_location(),
        MenuItemId::Preferences => handlers.show_preferences(),
        MenuItemId::Quit => handlers.quit(),
        MenuItemId::LocationIndicator
        | MenuItemId::CorrectLocation
        | MenuItemId::OtherLocation
        | MenuItemId::GoOffline => {}
    }
}

/// Production handlers, bound to the running app.
struct AppHandlers<'a> {
    app: &'a AppHandle,
}

impl MenuHandlers for AppHandlers<'_> {
    fn open_map(&self) {
        // Failures from the external map collaborator are logged, not fatal.
        if let Err(e) = actions::open_map(self.app) {
            log::error!("Open Map failed: {}", e);
        }
    }

    fn refresh_location(&self) {
        // TODO: dispatch a real refresh once the location backend lands.
        log::debug!("Location refresh requested (not implemented)");
    }

    fn show_preferences(&self) {
        window::show_preferences(self.app);
    }

    fn quit(&self) {
        log::info!("Quit requested via tray");
        self.app.exit(0);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Event Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Handles context menu item selection.
fn on_menu_event(app: &AppHandle, event: MenuEvent) {
    // Selection dismissed the menu; restore the default icon before the
    // action runs.
    if let Some(tray_state) = app.try_state::<TrayState>() {
        tray_state.apply(IconEvent::MenuSelected);
    }

    match MenuItemId::from_id(event.id.as_ref()) {
        Some(action) => dispatch(action, &AppHandlers { app }),
        None => log::warn!("Unknown menu item: {}", event.id.as_ref()),
    }
}

/// Handles tray icon activation.
fn on_tray_click(tray: &TrayIcon, event: TrayIconEvent) {
    if matches!(
        event,
        TrayIconEvent::Click {
            button: MouseButton::Left,
            button_state: MouseButtonState::Up,
            ..
        }
    ) {
        if let Some(tray_state) = tray.app_handle().try_state::<TrayState>() {
            tray_state.apply(IconEvent::Triggered);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tray Setup
// ─────────────────────────────────────────────────────────────────────────────

/// Initializes the system tray: icon, context menu, and event handlers.
pub fn setup_tray(app: &tauri::App) -> Result<(), TrayError> {
    let icon = load_icon(IconState::Default)?;

    let mut menu = MenuBuilder::new(app);
    for entry in MENU_LAYOUT {
        match entry {
            MenuEntry::Action(action) => {
                let item = MenuItemBuilder::with_id(action.id(), action.label())
                    .enabled(action.enabled())
                    .build(app)
                    .tray_err()?;
                menu = menu.item(&item);
            }
            MenuEntry::Separator => {
                menu = menu.item(&PredefinedMenuItem::separator(app).tray_err()?);
            }
        }
    }
    let menu = menu.build().tray_err()?;

    let tray_icon = TrayIconBuilder::new()
        .icon(icon)
        .menu(&menu)
        .tooltip(TRAY_TOOLTIP)
        .on_menu_event(on_menu_event)
        .on_tray_icon_event(on_tray_click)
        .build(app)
        .tray_err()?;

    app.manage(TrayState {
        tray_icon,
        icon_state: Mutex::new(IconState::Default),
    });

    log::debug!("System tray initialized");
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    /// Counts handler invocations instead of touching a live UI.
    #[derive(Default)]
    struct RecordingHandlers {
        open_map: Cell<u32>,
        refresh_location: Cell<u32>,
        show_preferences: Cell<u32>,
        quit: Cell<u32>,
    }

    impl RecordingHandlers {
        fn totals(&self) -> [u32; 4] {
            [
                self.open_map.get(),
                self.refresh_location.get(),
                self.show_preferences.get(),
                self.quit.get(),
            ]
        }
    }

    impl MenuHandlers for RecordingHandlers {
        fn open_map(&self) {
            self.open_map.set(self.open_map.get() + 1);
        }

        fn refresh_location(&self) {
            self.refresh_location.set(self.refresh_location.get() + 1);
        }

        fn show_preferences(&self) {
            self.show_preferences.set(self.show_preferences.get() + 1);
        }

        fn quit(&self) {
            self.quit.set(self.quit.get() + 1);
        }
    }

    fn actions_in_layout() -> Vec<MenuItemId> {
        MENU_LAYOUT
            .iter()
            .filter_map(|entry| match entry {
                MenuEntry::Action(action) => Some(*action),
                MenuEntry::Separator => None,
            })
            .collect()
    }

    #[test]
    fn menu_has_eight_actions_and_four_separators() {
        let separators = MENU_LAYOUT
            .iter()
            .filter(|entry| matches!(entry, MenuEntry::Separator))
            .count();
        assert_eq!(actions_in_layout().len(), 8);
        assert_eq!(separators, 4);
    }

    #[test]
    fn separators_split_the_menu_into_the_documented_groups() {
        let groups: Vec<Vec<&str>> = MENU_LAYOUT
            .split(|entry| matches!(entry, MenuEntry::Separator))
            .map(|group| {
                group
                    .iter()
                    .filter_map(|entry| match entry {
                        MenuEntry::Action(action) => Some(action.label()),
                        MenuEntry::Separator => None,
                    })
                    .collect()
            })
            .collect();

        assert_eq!(
            groups,
            vec![
                vec!["Open Map"],
                vec!["Refresh My Location"],
                vec!["Location: Unknown", "Correct My Location", "Other..."],
                vec!["Go Offline", "Preferences..."],
                vec!["Quit"],
            ]
        );
    }

    #[test]
    fn only_the_location_indicator_is_disabled() {
        for action in actions_in_layout() {
            assert_eq!(action.enabled(), action != MenuItemId::LocationIndicator);
        }
    }

    #[test]
    fn menu_ids_round_trip() {
        for action in actions_in_layout() {
            assert_eq!(MenuItemId::from_id(action.id()), Some(action));
        }
        assert_eq!(MenuItemId::from_id("no_such_entry"), None);
    }

    #[test]
    fn open_map_dispatches_to_the_collaborator_exactly_once() {
        let handlers = RecordingHandlers::default();
        dispatch(MenuItemId::OpenMap, &handlers);
        assert_eq!(handlers.totals(), [1, 0, 0, 0]);

        dispatch(MenuItemId::OpenMap, &handlers);
        assert_eq!(handlers.open_map.get(), 2);
    }

    #[test]
    fn preferences_and_quit_dispatch_to_their_handlers() {
        let handlers = RecordingHandlers::default();
        dispatch(MenuItemId::Preferences, &handlers);
        dispatch(MenuItemId::Quit, &handlers);
        assert_eq!(handlers.totals(), [0, 0, 1, 1]);
    }

    #[test]
    fn refresh_dispatches_to_the_stub() {
        let handlers = RecordingHandlers::default();
        dispatch(MenuItemId::RefreshLocation, &handlers);
        assert_eq!(handlers.totals(), [0, 1, 0, 0]);
    }

    #[test]
    fn placeholder_entries_dispatch_nothing() {
        let handlers = RecordingHandlers::default();
        for action in [
            MenuItemId::LocationIndicator,
            MenuItemId::CorrectLocation,
            MenuItemId::OtherLocation,
            MenuItemId::GoOffline,
        ] {
            dispatch(action, &handlers);
        }
        assert_eq!(handlers.totals(), [0, 0, 0, 0]);
    }

    #[test]
    fn icon_switches_on_trigger_activation() {
        assert_eq!(
            IconState::Default.transition(IconEvent::Triggered),
            IconState::Clicked
        );
    }

    #[test]
    fn clicked_icon_stays_clicked_until_a_menu_selection() {
        // There is no close-without-selection signal, so nothing else may
        // revert the state.
        let state = IconState::Default.transition(IconEvent::Triggered);
        assert_eq!(state.transition(IconEvent::Triggered), IconState::Clicked);
        assert_eq!(state.transition(IconEvent::MenuSelected), IconState::Default);
    }

    #[test]
    fn both_icon_assets_decode() {
        assert!(load_icon(IconState::Default).is_ok());
        assert!(load_icon(IconState::Clicked).is_ok());
    }
}
