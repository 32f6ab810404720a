//! Shared component rendering context
//!
//! `ComponentContext` carries desktop state that hosted applications need
//! while rendering and handling events, so the component trait stays
//! stable as the desktop grows new modes.

use crate::locale::Locale;

/// Context passed to `Component` trait methods describing UI state.
///
/// - `focused`: whether the hosting window is the active window.
/// - `locale`: display language for component text.
/// - `emergency`: whether the desktop is in emergency mode.
/// - `selection_suppressed`: set while a window drag or resize holds the
///   pointer; components must not start or extend text selection.
#[derive(Debug, Clone, Copy)]
pub struct ComponentContext {
    focused: bool,
    locale: Locale,
    emergency: bool,
    selection_suppressed: bool,
}

impl ComponentContext {
    pub const fn new(focused: bool) -> Self {
        Self {
            focused,
            locale: Locale::Cn,
            emergency: false,
            selection_suppressed: false,
        }
    }

    pub const fn focused(&self) -> bool {
        self.focused
    }

    pub const fn locale(&self) -> Locale {
        self.locale
    }

    pub const fn emergency(&self) -> bool {
        self.emergency
    }

    pub const fn selection_suppressed(&self) -> bool {
        self.selection_suppressed
    }

    pub const fn with_focus(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub const fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub const fn with_emergency(mut self, emergency: bool) -> Self {
        self.emergency = emergency;
        self
    }

    pub const fn with_selection_suppressed(mut self, suppressed: bool) -> Self {
        self.selection_suppressed = suppressed;
        self
    }

    /// Primary foreground for content, red while in emergency mode.
    pub fn accent(&self) -> ratatui::style::Color {
        if self.emergency {
            crate::theme::alert()
        } else {
            crate::theme::content_fg()
        }
    }
}

impl Default for ComponentContext {
    fn default() -> Self {
        Self::new(false)
    }
}
