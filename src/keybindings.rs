use std::collections::HashMap;
use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::apps::AppId;

/// Desktop-level commands. Keys that map to none of these go to the
/// active window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    Quit,
    Launch(AppId),
    ToggleLocale,
    CycleFocus,
    ToggleEmergency,
    ToggleMouseCapture,
    MinimizeActive,
    CloseActive,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Quit => f.write_str("Quit"),
            Action::Launch(app) => write!(f, "Launch {app}"),
            Action::ToggleLocale => f.write_str("Toggle language"),
            Action::CycleFocus => f.write_str("Focus next window"),
            Action::ToggleEmergency => f.write_str("Toggle emergency mode"),
            Action::ToggleMouseCapture => f.write_str("Toggle mouse capture"),
            Action::MinimizeActive => f.write_str("Minimize active window"),
            Action::CloseActive => f.write_str("Close active window"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        key.code == self.code && key.modifiers == self.mods
    }

    pub fn display(&self) -> String {
        let mut parts = Vec::new();
        if self.mods.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".to_string());
        }
        if self.mods.contains(KeyModifiers::SHIFT) {
            parts.push("Shift".to_string());
        }
        if self.mods.contains(KeyModifiers::ALT) {
            parts.push("Alt".to_string());
        }
        let code = match self.code {
            KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::F(n) => format!("F{}", n),
            _ => format!("{:?}", self.code),
        };
        parts.push(code);
        parts.join("+")
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[derive(Debug, Clone)]
pub struct KeyBindings {
    map: HashMap<Action, Vec<KeyCombo>>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        use Action::*;
        let mut kb = Self::new();
        kb.add(
            Quit,
            KeyCombo::new(KeyCode::Char('q'), KeyModifiers::CONTROL),
        );
        for (n, app) in (1u8..).zip(AppId::LAUNCHER) {
            kb.add(Launch(app), KeyCombo::plain(KeyCode::F(n)));
        }
        kb.add(ToggleLocale, KeyCombo::plain(KeyCode::F(5)));
        kb.add(CycleFocus, KeyCombo::plain(KeyCode::F(6)));
        kb.add(ToggleEmergency, KeyCombo::plain(KeyCode::F(7)));
        kb.add(ToggleMouseCapture, KeyCombo::plain(KeyCode::F(8)));
        kb.add(MinimizeActive, KeyCombo::plain(KeyCode::F(9)));
        kb.add(CloseActive, KeyCombo::plain(KeyCode::F(10)));
        kb
    }
}

impl KeyBindings {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn add(&mut self, action: Action, combo: KeyCombo) {
        self.map.entry(action).or_default().push(combo);
    }

    pub fn matches(&self, action: Action, key: &KeyEvent) -> bool {
        if let Some(list) = self.map.get(&action) {
            list.iter().any(|c| c.matches(key))
        } else {
            false
        }
    }

    pub fn action_for_key(&self, key: &KeyEvent) -> Option<Action> {
        for (act, list) in &self.map {
            if list.iter().any(|c| c.matches(key)) {
                return Some(*act);
            }
        }
        None
    }

    /// Every binding, ordered by action.
    pub fn help_entries(&self) -> Vec<(Action, Vec<String>)> {
        let mut v: Vec<_> = self
            .map
            .iter()
            .map(|(act, list)| (*act, list.iter().map(|c| c.display()).collect()))
            .collect();
        v.sort_by_key(|(act, _)| *act);
        v
    }
}
