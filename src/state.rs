use crate::locale::Locale;

/// Desktop-wide toggles. Changes that something outside the desktop has to
/// act on are recorded as dirty flags and drained with the `take_*`
/// methods.
#[derive(Debug, Default, Clone, Copy)]
pub struct AppState {
    locale: Locale,
    locale_dirty: bool,
    emergency: bool,
    mouse_capture_enabled: bool,
    mouse_capture_dirty: bool,
}

impl AppState {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            locale_dirty: false,
            emergency: false,
            mouse_capture_enabled: true,
            mouse_capture_dirty: false,
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn set_locale(&mut self, locale: Locale) {
        if self.locale == locale {
            return;
        }
        self.locale = locale;
        self.locale_dirty = true;
    }

    pub fn toggle_locale(&mut self) {
        let locale = self.locale.toggled();
        self.set_locale(locale);
    }

    pub fn take_locale_change(&mut self) -> Option<Locale> {
        if self.locale_dirty {
            self.locale_dirty = false;
            Some(self.locale)
        } else {
            None
        }
    }

    pub fn emergency(&self) -> bool {
        self.emergency
    }

    pub fn toggle_emergency(&mut self) {
        self.emergency = !self.emergency;
    }

    pub fn mouse_capture_enabled(&self) -> bool {
        self.mouse_capture_enabled
    }

    pub fn set_mouse_capture_enabled(&mut self, enabled: bool) {
        if self.mouse_capture_enabled == enabled {
            return;
        }
        self.mouse_capture_enabled = enabled;
        self.mouse_capture_dirty = true;
    }

    pub fn toggle_mouse_capture(&mut self) {
        let enabled = !self.mouse_capture_enabled;
        self.set_mouse_capture_enabled(enabled);
    }

    pub fn take_mouse_capture_change(&mut self) -> Option<bool> {
        if self.mouse_capture_dirty {
            self.mouse_capture_dirty = false;
            Some(self.mouse_capture_enabled)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mouse_capture_toggle_and_take_change() {
        let mut s = AppState::new(Locale::Cn);
        assert!(s.mouse_capture_enabled());
        s.set_mouse_capture_enabled(true);
        // no change -> None
        assert!(s.take_mouse_capture_change().is_none());
        s.set_mouse_capture_enabled(false);
        assert_eq!(s.take_mouse_capture_change(), Some(false));
        // consumed
        assert!(s.take_mouse_capture_change().is_none());
        s.toggle_mouse_capture();
        assert!(s.mouse_capture_enabled());
    }

    #[test]
    fn locale_change_is_reported_once() {
        let mut s = AppState::new(Locale::Cn);
        s.set_locale(Locale::Cn);
        assert!(s.take_locale_change().is_none());
        s.toggle_locale();
        assert_eq!(s.take_locale_change(), Some(Locale::En));
        assert!(s.take_locale_change().is_none());
        assert_eq!(s.locale(), Locale::En);
    }

    #[test]
    fn emergency_toggles() {
        let mut s = AppState::new(Locale::En);
        assert!(!s.emergency());
        s.toggle_emergency();
        assert!(s.emergency());
    }
}
