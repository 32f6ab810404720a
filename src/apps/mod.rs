//! Hosted applications and the registry that maps an [`AppId`] to the
//! component drawn inside its window.

pub mod archive;
pub mod console;
pub mod files;
pub mod oracle;
pub mod personnel;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Paragraph;

use crate::components::{Component, ComponentContext};
use crate::constants::{DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH};
use crate::error::ParseAppError;
use crate::ui::UiFrame;
use crate::window::Size;

pub use console::ConsoleApp;
pub use files::FilesApp;
pub use oracle::{Deliberation, LocalDeliberation, OracleApp};
pub use personnel::PersonnelApp;

/// The closed set of applications a window can host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AppId {
    Magi,
    Files,
    Personnel,
    Terminal,
    Settings,
}

impl AppId {
    pub const ALL: [AppId; 5] = [
        AppId::Magi,
        AppId::Files,
        AppId::Personnel,
        AppId::Terminal,
        AppId::Settings,
    ];

    /// Applications offered by the launcher, in launcher order.
    pub const LAUNCHER: [AppId; 4] = [AppId::Magi, AppId::Files, AppId::Personnel, AppId::Terminal];

    pub fn as_str(self) -> &'static str {
        match self {
            AppId::Magi => "MAGI",
            AppId::Files => "FILES",
            AppId::Personnel => "PERSONNEL",
            AppId::Terminal => "TERMINAL",
            AppId::Settings => "SETTINGS",
        }
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppId {
    type Err = ParseAppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "magi" => Ok(AppId::Magi),
            "files" | "archives" => Ok(AppId::Files),
            "personnel" | "graph" => Ok(AppId::Personnel),
            "terminal" | "console" => Ok(AppId::Terminal),
            "settings" => Ok(AppId::Settings),
            _ => Err(ParseAppError(s.to_string())),
        }
    }
}

/// Default window size per application, in desktop length units.
#[derive(Debug, Clone)]
pub struct SizeTable {
    sizes: HashMap<AppId, Size>,
    fallback: Size,
}

impl Default for SizeTable {
    fn default() -> Self {
        let mut table = Self::empty();
        table.set(AppId::Magi, Size::new(900, 700));
        table.set(AppId::Personnel, Size::new(850, 650));
        table.set(AppId::Terminal, Size::new(700, 500));
        table
    }
}

impl SizeTable {
    /// A table with no entries; every lookup returns the fallback size.
    pub fn empty() -> Self {
        Self {
            sizes: HashMap::new(),
            fallback: Size::new(DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT),
        }
    }

    pub fn set(&mut self, app: AppId, size: Size) {
        self.sizes.insert(app, size);
    }

    pub fn lookup(&self, app: AppId) -> Size {
        self.sizes.get(&app).copied().unwrap_or(self.fallback)
    }
}

/// Builds the component for each application.
pub struct AppHost {
    backend: Box<dyn Fn() -> Box<dyn Deliberation>>,
}

impl Default for AppHost {
    fn default() -> Self {
        Self::new(|| Box::new(LocalDeliberation))
    }
}

impl AppHost {
    /// `backend` builds the deliberation backend for each new oracle or
    /// archives window.
    pub fn new(backend: impl Fn() -> Box<dyn Deliberation> + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    pub fn launch(&self, app: AppId) -> Box<dyn Component> {
        tracing::debug!(?app, "launching application");
        match app {
            AppId::Magi => Box::new(OracleApp::new((self.backend)())),
            AppId::Files => Box::new(FilesApp::new(archive::seed(), (self.backend)())),
            AppId::Personnel => Box::new(PersonnelApp::new()),
            AppId::Terminal => Box::new(ConsoleApp::new(archive::seed())),
            AppId::Settings => Box::new(Placeholder { app }),
        }
    }
}

/// Content for applications that have no dedicated implementation.
#[derive(Debug)]
struct Placeholder {
    app: AppId,
}

impl Component for Placeholder {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        if area.height == 0 {
            return;
        }
        let text = format!("{} // MODULE OFFLINE", self.app);
        let line = Rect {
            y: area.y + area.height / 2,
            height: 1,
            ..area
        };
        frame.render_widget(
            Paragraph::new(text)
                .alignment(Alignment::Center)
                .style(Style::default().fg(ctx.accent()).add_modifier(Modifier::DIM)),
            line,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_parse() {
        assert_eq!("archives".parse::<AppId>(), Ok(AppId::Files));
        assert_eq!("GRAPH".parse::<AppId>(), Ok(AppId::Personnel));
        assert_eq!("console".parse::<AppId>(), Ok(AppId::Terminal));
        assert_eq!(
            "nerv".parse::<AppId>(),
            Err(ParseAppError("nerv".to_string()))
        );
    }

    #[test]
    fn size_table_falls_back() {
        let table = SizeTable::default();
        assert_eq!(table.lookup(AppId::Magi), Size::new(900, 700));
        assert_eq!(table.lookup(AppId::Files), Size::new(800, 600));
        assert_eq!(table.lookup(AppId::Settings), Size::new(800, 600));
        assert_eq!(SizeTable::empty().lookup(AppId::Magi), Size::new(800, 600));
    }

    #[test]
    fn host_launches_every_app() {
        let host = AppHost::default();
        for app in AppId::ALL {
            let _component = host.launch(app);
        }
    }
}
