//! A command console over the archive tree. It dispatches a fixed set of
//! commands and never runs anything on the host.

use crossterm::event::{Event, KeyCode, KeyEventKind, MouseEventKind};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use super::AppId;
use super::archive::{Archive, FileNode};
use crate::components::{Component, ComponentContext, HostRequest, InputLine, InputOutcome};
use crate::constants::SYSTEM_VERSION;
use crate::theme;
use crate::ui::UiFrame;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryKind {
    /// An echoed command line, shown after the prompt it was typed at.
    Command,
    Output,
    Error,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub kind: HistoryKind,
    pub content: String,
    // prompt path for echoed commands
    path: Option<String>,
}

impl HistoryEntry {
    fn new(kind: HistoryKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            path: None,
        }
    }
}

const HELP: [&str; 8] = [
    "AVAILABLE COMMANDS:",
    "  ls             List directory contents",
    "  cd [dir]       Change directory (use \"..\" to go up)",
    "  cat [file]     Read file content",
    "  open [app]     Launch application (MAGI, FILES, PERSONNEL, TERMINAL)",
    "  whoami         Display current user",
    "  clear          Clear terminal",
    "  date           Display system time",
];

pub struct ConsoleApp {
    archive: Archive,
    history: Vec<HistoryEntry>,
    input: InputLine,
    // previously submitted lines, oldest first
    recall: Vec<String>,
    recall_index: Option<usize>,
    // lines scrolled up from the bottom
    scroll_back: u16,
    requests: Vec<HostRequest>,
}

impl ConsoleApp {
    pub fn new(root: FileNode) -> Self {
        Self {
            archive: Archive::new(root),
            history: vec![
                HistoryEntry::new(
                    HistoryKind::System,
                    format!("MAGI OS [Version {SYSTEM_VERSION}] (c) 2015 NERV."),
                ),
                HistoryEntry::new(HistoryKind::System, "Type \"help\" for a list of commands."),
            ],
            input: InputLine::new(),
            recall: Vec::new(),
            recall_index: None,
            scroll_back: 0,
            requests: Vec::new(),
        }
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn archive(&self) -> &Archive {
        &self.archive
    }

    pub fn prompt(&self) -> String {
        format!("NERV@MAGI:{}$ ", self.archive.path_string())
    }

    /// Run one command line. Blank lines are ignored.
    pub fn execute(&mut self, line: &str) {
        if line.trim().is_empty() {
            return;
        }
        tracing::trace!(command = %line, "console command");
        self.recall.push(line.to_string());
        self.recall_index = None;
        self.scroll_back = 0;

        let echo = HistoryEntry {
            kind: HistoryKind::Command,
            content: line.to_string(),
            path: Some(self.archive.path_string()),
        };
        let words = match shell_words::split(line) {
            Ok(words) => words,
            Err(err) => {
                self.history.push(echo);
                self.history
                    .push(HistoryEntry::new(HistoryKind::Error, format!("Parse error: {err}")));
                return;
            }
        };
        let Some((cmd, args)) = words.split_first() else {
            return;
        };
        let cmd = cmd.to_lowercase();
        if cmd == "clear" {
            self.history.clear();
            return;
        }
        let output = self.dispatch(&cmd, args);
        self.history.push(echo);
        self.history.extend(output);
    }

    fn dispatch(&mut self, cmd: &str, args: &[String]) -> Vec<HistoryEntry> {
        use HistoryKind::*;
        let out = |content: String| HistoryEntry::new(Output, content);
        let err = |content: String| HistoryEntry::new(Error, content);
        let arg = |n: usize| args.get(n).map(String::as_str);

        match cmd {
            "help" => HELP.iter().map(|line| out(line.to_string())).collect(),
            "ls" => {
                let entries = self.archive.entries();
                if entries.is_empty() {
                    return vec![out("(empty)".into())];
                }
                entries
                    .iter()
                    .map(|node| {
                        let kind = if node.is_dir() { "<DIR>" } else { "     " };
                        let level = node.security_level.as_deref().unwrap_or_default();
                        out(format!("{kind}  {:<20}  {level}", node.name).trim_end().to_string())
                    })
                    .collect()
            }
            "cd" => match arg(0) {
                None => vec![out(self.archive.path_string())],
                Some("..") => {
                    if self.archive.up() {
                        Vec::new()
                    } else {
                        vec![err("Already at root.".into())]
                    }
                }
                Some(name) => {
                    if self.archive.enter(name) {
                        Vec::new()
                    } else {
                        vec![err(format!("Directory not found: {name}"))]
                    }
                }
            },
            "cat" => match arg(0) {
                None => vec![err("Usage: cat [filename]".into())],
                Some(name) => match self.archive.find_file(name) {
                    Some(file) => vec![
                        out("--- BEGIN FILE ---".into()),
                        out(file.content().unwrap_or_default().to_string()),
                        out("--- END OF FILE ---".into()),
                    ],
                    None => vec![err(format!("File not found: {name}"))],
                },
            },
            "open" => match arg(0).map(str::parse::<AppId>) {
                Some(Ok(app)) => {
                    self.requests.push(HostRequest::Open(app));
                    vec![out(format!("Launching process: {app}..."))]
                }
                Some(Err(_)) | None => {
                    vec![err(format!("Unknown application: {}", arg(0).unwrap_or_default()))]
                }
            },
            "whoami" => vec![
                out("NERV_OPERATOR_772".into()),
                out("CLEARANCE: LEVEL 3".into()),
            ],
            "date" => vec![out(
                chrono::Local::now()
                    .format("%a %b %d %Y %H:%M:%S GMT%z")
                    .to_string(),
            )],
            "sudo" => {
                if arg(0) == Some("override") && arg(1) == Some("system") {
                    vec![
                        err("ACCESS DENIED. SECURITY CLEARANCE REJECTED.".into()),
                        HistoryEntry::new(
                            System,
                            "*** ALERT: UNAUTHORIZED ACCESS ATTEMPT DETECTED ***",
                        ),
                        HistoryEntry::new(System, "INITIATING TRACING PROTOCOL..."),
                        HistoryEntry::new(System, "YOU HAVE 20 SECONDS TO DISCONNECT."),
                    ]
                } else {
                    vec![err("sudo: command not found (permissions locked)".into())]
                }
            }
            "human_instrumentality_project" => vec![
                HistoryEntry::new(System, "TOP SECRET // LEVEL 5 // SEELE EYES ONLY"),
                out("THE FATE OF DESTRUCTION IS ALSO THE JOY OF REBIRTH.".into()),
                out("Through the union of Adam and Lilith, all souls shall become one.".into()),
                HistoryEntry::new(System, "Connection terminated by remote host."),
            ],
            _ => vec![err(format!("Command not found: {cmd}"))],
        }
    }

    fn recall_step(&mut self, older: bool) {
        if self.recall.is_empty() {
            return;
        }
        let last = self.recall.len() - 1;
        self.recall_index = match (self.recall_index, older) {
            (None, true) => Some(last),
            (None, false) => None,
            (Some(i), true) => Some(i.saturating_sub(1)),
            (Some(i), false) if i < last => Some(i + 1),
            (Some(_), false) => None,
        };
        self.input.clear();
        if let Some(i) = self.recall_index {
            for ch in self.recall[i].chars() {
                self.input.handle_key(&crossterm::event::KeyEvent::from(KeyCode::Char(ch)));
            }
        }
    }

    fn history_lines(&self, ctx: &ComponentContext) -> Vec<Line<'static>> {
        let accent = Style::default().fg(ctx.accent());
        let prompt_color = if ctx.emergency() {
            Color::Rgb(248, 113, 113)
        } else {
            theme::success_fg()
        };
        let mut lines = Vec::new();
        for entry in &self.history {
            let style = match entry.kind {
                HistoryKind::Command => accent.add_modifier(Modifier::BOLD),
                HistoryKind::Error => Style::default()
                    .fg(theme::alert())
                    .add_modifier(Modifier::BOLD),
                HistoryKind::System => Style::default()
                    .fg(theme::content_dim())
                    .add_modifier(Modifier::ITALIC),
                HistoryKind::Output => accent,
            };
            for (i, text) in entry.content.split('\n').enumerate() {
                let mut spans = Vec::new();
                if i == 0
                    && let Some(path) = &entry.path
                {
                    spans.push(Span::styled(
                        format!("NERV@MAGI:{path}$ "),
                        Style::default().fg(prompt_color),
                    ));
                }
                spans.push(Span::styled(text.to_string(), style));
                lines.push(Line::from(spans));
            }
        }
        lines
    }
}

impl Component for ConsoleApp {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        let [log, input] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);
        let lines = self.history_lines(ctx);
        let width = usize::from(log.width.max(1));
        let total: usize = lines.iter().map(|l| l.width().div_ceil(width).max(1)).sum();
        let total = u16::try_from(total).unwrap_or(u16::MAX);
        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
        let bottom = total.saturating_sub(log.height);
        self.scroll_back = self.scroll_back.min(bottom);
        frame.render_widget(paragraph.scroll((bottom - self.scroll_back, 0)), log);
        let prompt = self.prompt();
        self.input.render(frame, input, &prompt, "", ctx);
    }

    fn handle_event(&mut self, event: &Event, ctx: &ComponentContext) -> bool {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Up => {
                    self.recall_step(true);
                    true
                }
                KeyCode::Down => {
                    self.recall_step(false);
                    true
                }
                KeyCode::PageUp => {
                    self.scroll_back = self.scroll_back.saturating_add(5);
                    true
                }
                KeyCode::PageDown => {
                    self.scroll_back = self.scroll_back.saturating_sub(5);
                    true
                }
                _ => match self.input.handle_key(key) {
                    InputOutcome::Submitted(line) => {
                        self.execute(&line);
                        true
                    }
                    InputOutcome::Edited => true,
                    InputOutcome::Ignored => false,
                },
            },
            Event::Mouse(mouse) if !ctx.selection_suppressed() => match mouse.kind {
                MouseEventKind::ScrollUp => {
                    self.scroll_back = self.scroll_back.saturating_add(1);
                    true
                }
                MouseEventKind::ScrollDown => {
                    self.scroll_back = self.scroll_back.saturating_sub(1);
                    true
                }
                _ => false,
            },
            _ => false,
        }
    }

    fn take_requests(&mut self) -> Vec<HostRequest> {
        std::mem::take(&mut self.requests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apps::archive::seed;
    use crossterm::event::{KeyEvent, KeyModifiers};

    fn console() -> ConsoleApp {
        ConsoleApp::new(seed())
    }

    fn last(console: &ConsoleApp) -> &HistoryEntry {
        console.history().last().expect("history is not empty")
    }

    #[test]
    fn boots_with_banner() {
        let console = console();
        assert_eq!(console.history().len(), 2);
        assert_eq!(
            console.history()[0].content,
            "MAGI OS [Version 7.77] (c) 2015 NERV."
        );
        assert_eq!(console.prompt(), "NERV@MAGI:/ROOT$ ");
    }

    #[test]
    fn ls_and_cd_walk_the_tree() {
        let mut console = console();
        console.execute("ls");
        assert_eq!(
            last(&console).content,
            format!("<DIR>  {:<20}  LEVEL 5", "NERV_DATABANK")
        );
        console.execute("cd NERV_DATABANK");
        console.execute("cd PERSONNEL");
        console.execute("cd");
        assert_eq!(last(&console).content, "/ROOT/NERV_DATABANK/PERSONNEL");
        console.execute("cd ..");
        console.execute("cd ..");
        console.execute("cd ..");
        assert_eq!(last(&console).kind, HistoryKind::Error);
        assert_eq!(last(&console).content, "Already at root.");
        console.execute("cd NOWHERE");
        assert_eq!(last(&console).content, "Directory not found: NOWHERE");
    }

    #[test]
    fn cat_prints_framed_content() {
        let mut console = console();
        console.execute("cat");
        assert_eq!(last(&console).content, "Usage: cat [filename]");
        console.execute("cd NERV_DATABANK");
        console.execute("cd MAGI_INTERNAL");
        console.execute("cat OS_KERNEL.patch");
        let tail: Vec<&str> = console.history()[console.history().len() - 3..]
            .iter()
            .map(|e| e.content.as_str())
            .collect();
        assert_eq!(
            tail,
            [
                "--- BEGIN FILE ---",
                "Patch 777: Security vulnerability in Melchior module fixed.",
                "--- END OF FILE ---"
            ]
        );
        console.execute("cat MISSING");
        assert_eq!(last(&console).content, "File not found: MISSING");
    }

    #[test]
    fn open_requests_a_window() {
        let mut console = console();
        console.execute("open archives");
        assert_eq!(last(&console).content, "Launching process: FILES...");
        console.execute("open nerv");
        assert_eq!(last(&console).content, "Unknown application: nerv");
        assert_eq!(console.take_requests(), vec![HostRequest::Open(AppId::Files)]);
        assert!(console.take_requests().is_empty());
    }

    #[test]
    fn clear_empties_history_and_unknown_commands_error() {
        let mut console = console();
        console.execute("clear");
        assert!(console.history().is_empty());
        console.execute("FROBNICATE now");
        assert_eq!(console.history().len(), 2);
        assert_eq!(console.history()[0].kind, HistoryKind::Command);
        assert_eq!(last(&console).content, "Command not found: frobnicate");
    }

    #[test]
    fn sudo_easter_egg_and_quoting() {
        let mut console = console();
        console.execute("sudo override system");
        assert_eq!(last(&console).kind, HistoryKind::System);
        console.execute("sudo rm");
        assert_eq!(
            last(&console).content,
            "sudo: command not found (permissions locked)"
        );
        console.execute("cat \"unterminated");
        assert!(last(&console).content.starts_with("Parse error"));
    }

    #[test]
    fn up_arrow_recalls_previous_command() {
        let mut console = console();
        let ctx = ComponentContext::new(true);
        console.execute("whoami");
        console.execute("date");
        let up = Event::Key(KeyEvent::new(KeyCode::Up, KeyModifiers::NONE));
        console.handle_event(&up, &ctx);
        console.handle_event(&up, &ctx);
        let enter = Event::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        console.handle_event(&enter, &ctx);
        assert_eq!(last(&console).content, "CLEARANCE: LEVEL 3");
    }
}
