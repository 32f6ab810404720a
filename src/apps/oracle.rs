//! The MAGI oracle: three decision nodes vote on a query and a majority
//! consensus is declared.

use std::fmt;

use crossterm::event::{Event, KeyCode, KeyEventKind};
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::components::{Component, ComponentContext, InputLine, InputOutcome};
use crate::error::OracleError;
use crate::locale::Locale;
use crate::theme;
use crate::ui::UiFrame;

/// Frames spent on the boot banner before the oracle accepts input.
const BOOT_TICKS: u16 = 60;
/// Frames a query spends "processing" before the backend is consulted.
const PROCESSING_TICKS: u16 = 45;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vote {
    Approve,
    Deny,
    Conditional,
}

impl Vote {
    pub fn label(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Vote::Approve, Locale::En) => "APPROVE",
            (Vote::Deny, Locale::En) => "DENY",
            (Vote::Conditional, Locale::En) => "CONDITIONAL",
            (Vote::Approve, Locale::Cn) => "可决",
            (Vote::Deny, Locale::Cn) => "否决",
            (Vote::Conditional, Locale::Cn) => "保留",
        }
    }

    fn color(self) -> Color {
        match self {
            Vote::Approve => Color::Green,
            Vote::Deny => theme::alert(),
            Vote::Conditional => Color::Blue,
        }
    }
}

impl fmt::Display for Vote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label(Locale::En))
    }
}

/// One of the three MAGI personalities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MagiNode {
    Melchior,
    Balthasar,
    Casper,
}

impl MagiNode {
    pub const ALL: [MagiNode; 3] = [MagiNode::Melchior, MagiNode::Balthasar, MagiNode::Casper];

    pub fn name(self) -> &'static str {
        match self {
            MagiNode::Melchior => "MELCHIOR-1",
            MagiNode::Balthasar => "BALTHASAR-2",
            MagiNode::Casper => "CASPER-3",
        }
    }

    pub fn role(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (MagiNode::Melchior, Locale::En) => "SCIENTIST",
            (MagiNode::Balthasar, Locale::En) => "MOTHER",
            (MagiNode::Casper, Locale::En) => "WOMAN",
            (MagiNode::Melchior, Locale::Cn) => "科学家",
            (MagiNode::Balthasar, Locale::Cn) => "母亲",
            (MagiNode::Casper, Locale::Cn) => "女性",
        }
    }

    fn color(self) -> Color {
        match self {
            MagiNode::Melchior => theme::scientist(),
            MagiNode::Balthasar => theme::mother(),
            MagiNode::Casper => theme::woman(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeVerdict {
    pub node: MagiNode,
    pub vote: Vote,
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MagiResponse {
    pub verdicts: Vec<NodeVerdict>,
    pub consensus: String,
}

impl MagiResponse {
    pub fn verdict(&self, node: MagiNode) -> Option<&NodeVerdict> {
        self.verdicts.iter().find(|v| v.node == node)
    }
}

/// Majority of the three votes. With no strict majority the outcome is
/// conditional.
pub fn majority(votes: &[Vote]) -> Vote {
    let count = |wanted: Vote| votes.iter().filter(|v| **v == wanted).count();
    let needed = votes.len() / 2 + 1;
    if count(Vote::Approve) >= needed {
        Vote::Approve
    } else if count(Vote::Deny) >= needed {
        Vote::Deny
    } else {
        Vote::Conditional
    }
}

/// Backend that decides how each node votes on a query.
pub trait Deliberation {
    fn deliberate(&self, query: &str, locale: Locale) -> Result<MagiResponse, OracleError>;
}

/// Offline backend. Votes are a pure function of the query text, so the
/// same question always gets the same answer.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalDeliberation;

impl LocalDeliberation {
    fn vote_for(node: MagiNode, query: &str) -> Vote {
        // FNV-1a over the normalized query, salted per node
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325 ^ (node as u64 + 1);
        for byte in query.trim().to_lowercase().bytes() {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        match hash % 3 {
            0 => Vote::Approve,
            1 => Vote::Deny,
            _ => Vote::Conditional,
        }
    }

    fn reasoning(node: MagiNode, vote: Vote, locale: Locale) -> &'static str {
        let table = match locale {
            Locale::En => &REASONING_EN,
            Locale::Cn => &REASONING_CN,
        };
        let column = match vote {
            Vote::Approve => 0,
            Vote::Deny => 1,
            Vote::Conditional => 2,
        };
        table[node as usize][column]
    }
}

// Rows follow `MagiNode::ALL`; columns are approve, deny, conditional.
const REASONING_EN: [[&str; 3]; 3] = [
    [
        "Data supports the proposal. Probability of success acceptable.",
        "Insufficient evidence. Variables exceed tolerable error.",
        "Further analysis required before a conclusion.",
    ],
    [
        "Risk to personnel is low. Stability is preserved.",
        "Unacceptable danger to those under our protection.",
        "Acceptable only with safeguards in place.",
    ],
    [
        "It is what people actually want. Proceed.",
        "Nobody benefits. Reject it.",
        "Depends on who is asking, and why.",
    ],
];

const REASONING_CN: [[&str; 3]; 3] = [
    [
        "数据支持该提案，成功概率可接受。",
        "证据不足，变量超出误差容许范围。",
        "结论前需要进一步分析。",
    ],
    [
        "人员风险低，稳定性得以维持。",
        "对受保护者构成不可接受的危险。",
        "仅在具备保障措施时可以接受。",
    ],
    [
        "这正是人们真正想要的，执行。",
        "没有人会因此受益，驳回。",
        "取决于是谁在问，以及为什么。",
    ],
];

impl Deliberation for LocalDeliberation {
    fn deliberate(&self, query: &str, locale: Locale) -> Result<MagiResponse, OracleError> {
        if query.trim().is_empty() {
            return Err(OracleError::EmptyQuery);
        }
        let verdicts: Vec<NodeVerdict> = MagiNode::ALL
            .iter()
            .map(|&node| {
                let vote = Self::vote_for(node, query);
                NodeVerdict {
                    node,
                    vote,
                    reasoning: Self::reasoning(node, vote, locale).to_string(),
                }
            })
            .collect();
        let votes: Vec<Vote> = verdicts.iter().map(|v| v.vote).collect();
        let consensus = majority(&votes).label(locale).to_string();
        Ok(MagiResponse {
            verdicts,
            consensus,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OracleState {
    Initializing { remaining: u16 },
    Idle,
    Processing { query: String, remaining: u16 },
    Completed { query: String, response: MagiResponse },
    Failed(String),
}

struct OracleText {
    connecting: &'static str,
    consensus: &'static str,
    reset_hint: &'static str,
    error_header: &'static str,
    reboot_hint: &'static str,
    placeholder: &'static str,
    busy: &'static str,
}

fn oracle_text(locale: Locale) -> OracleText {
    match locale {
        Locale::En => OracleText {
            connecting: "CONNECTING TO NEURAL NETWORKS...",
            consensus: "CONSENSUS",
            reset_hint: "[ESC] RESET SYSTEM",
            error_header: "SYSTEM ERROR",
            reboot_hint: "[ENTER] REBOOT",
            placeholder: "ENTER COMMAND / QUERY",
            busy: "SYSTEM PROCESSING...",
        },
        Locale::Cn => OracleText {
            connecting: "正在连接神经网络...",
            consensus: "最终决议",
            reset_hint: "[ESC] 重置系统",
            error_header: "系统错误",
            reboot_hint: "[ENTER] 重启",
            placeholder: "输入指令 / 询问",
            busy: "系统处理中...",
        },
    }
}

pub struct OracleApp {
    backend: Box<dyn Deliberation>,
    state: OracleState,
    input: InputLine,
    locale: Locale,
}

impl OracleApp {
    pub fn new(backend: Box<dyn Deliberation>) -> Self {
        Self {
            backend,
            state: OracleState::Initializing {
                remaining: BOOT_TICKS,
            },
            input: InputLine::new(),
            locale: Locale::default(),
        }
    }

    pub fn state(&self) -> &OracleState {
        &self.state
    }

    /// Discard any result or error and wait for the next query.
    pub fn reset(&mut self) {
        self.state = OracleState::Idle;
        self.input.clear();
    }

    fn submit(&mut self, query: String) {
        if query.trim().is_empty() {
            return;
        }
        tracing::debug!(%query, "oracle query submitted");
        self.state = OracleState::Processing {
            query,
            remaining: PROCESSING_TICKS,
        };
    }

    fn consult(&mut self, query: String) {
        self.state = match self.backend.deliberate(&query, self.locale) {
            Ok(response) => {
                tracing::debug!(consensus = %response.consensus, "oracle reached consensus");
                OracleState::Completed { query, response }
            }
            Err(err) => {
                tracing::warn!(error = %err, "oracle deliberation failed");
                OracleState::Failed(err.to_string())
            }
        };
    }

    fn render_node(
        &self,
        frame: &mut UiFrame<'_>,
        area: Rect,
        node: MagiNode,
        ctx: &ComponentContext,
    ) {
        let verdict = match &self.state {
            OracleState::Completed { response, .. } => response.verdict(node),
            _ => None,
        };
        let border = match verdict {
            Some(v) => v.vote.color(),
            None => ctx.accent(),
        };
        let status = match (&self.state, verdict) {
            (_, Some(v)) => Span::styled(
                v.vote.label(ctx.locale()),
                Style::default().fg(v.vote.color()).add_modifier(Modifier::BOLD),
            ),
            (OracleState::Processing { remaining, .. }, None) => {
                let dots = ".".repeat((*remaining as usize / 5) % 4);
                Span::styled(format!("SYNC{dots}"), Style::default().fg(ctx.accent()))
            }
            _ => Span::styled("----", Style::default().fg(theme::content_dim())),
        };
        let lines = vec![
            Line::from(Span::styled(
                node.name(),
                Style::default().fg(node.color()).add_modifier(Modifier::BOLD),
            )),
            Line::from(node.role(ctx.locale())),
            Line::from(status),
        ];
        frame.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .style(Style::default().fg(ctx.accent()))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(border)),
                ),
            area,
        );
    }
}

impl Component for OracleApp {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        self.locale = ctx.locale();
        let text = oracle_text(ctx.locale());
        let accent = Style::default().fg(ctx.accent());
        if let OracleState::Initializing { .. } = self.state {
            let line = Rect {
                y: area.y + area.height / 2,
                height: 1.min(area.height),
                ..area
            };
            frame.render_widget(
                Paragraph::new(text.connecting)
                    .alignment(Alignment::Center)
                    .style(accent.add_modifier(Modifier::SLOW_BLINK)),
                line,
            );
            return;
        }

        let [nodes, consensus, input, log] = Layout::vertical([
            Constraint::Length(10),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(area);
        let [top, bottom] =
            Layout::vertical([Constraint::Length(5), Constraint::Length(5)]).areas(nodes);
        let [_, melchior, _] = Layout::horizontal([
            Constraint::Percentage(30),
            Constraint::Percentage(40),
            Constraint::Percentage(30),
        ])
        .areas(top);
        let [_, balthasar, _, casper, _] = Layout::horizontal([
            Constraint::Percentage(5),
            Constraint::Percentage(40),
            Constraint::Percentage(10),
            Constraint::Percentage(40),
            Constraint::Percentage(5),
        ])
        .areas(bottom);
        self.render_node(frame, melchior, MagiNode::Melchior, ctx);
        self.render_node(frame, balthasar, MagiNode::Balthasar, ctx);
        self.render_node(frame, casper, MagiNode::Casper, ctx);

        match &self.state {
            OracleState::Completed { response, .. } => {
                let lines = vec![
                    Line::from(text.consensus),
                    Line::from(Span::styled(
                        response.consensus.clone(),
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(text.reset_hint),
                ];
                frame.render_widget(
                    Paragraph::new(lines).alignment(Alignment::Center).style(accent),
                    consensus,
                );
                let log_lines: Vec<Line> = response
                    .verdicts
                    .iter()
                    .map(|v| {
                        Line::from(vec![
                            Span::styled(
                                format!("{} ", v.node.name()),
                                Style::default().fg(v.vote.color()).add_modifier(Modifier::BOLD),
                            ),
                            Span::styled(
                                format!("[{}] ", v.vote.label(ctx.locale())),
                                Style::default().fg(v.vote.color()),
                            ),
                            Span::styled(v.reasoning.clone(), accent),
                        ])
                    })
                    .collect();
                frame.render_widget(Paragraph::new(log_lines).wrap(Wrap { trim: true }), log);
            }
            OracleState::Failed(message) => {
                let lines = vec![
                    Line::from(text.error_header)
                        .style(Style::default().add_modifier(Modifier::BOLD)),
                    Line::from(message.as_str()),
                    Line::from(text.reboot_hint),
                ];
                frame.render_widget(
                    Paragraph::new(lines)
                        .alignment(Alignment::Center)
                        .style(Style::default().fg(theme::alert())),
                    consensus,
                );
            }
            _ => {}
        }

        let placeholder = if matches!(self.state, OracleState::Processing { .. }) {
            text.busy
        } else {
            text.placeholder
        };
        self.input.render(frame, input, "> ", placeholder, ctx);
    }

    fn handle_event(&mut self, event: &Event, ctx: &ComponentContext) -> bool {
        self.locale = ctx.locale();
        let Event::Key(key) = event else {
            return false;
        };
        if key.kind != KeyEventKind::Press {
            return false;
        }
        match &self.state {
            OracleState::Initializing { .. } | OracleState::Processing { .. } => false,
            OracleState::Failed(_) => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                    self.reset();
                    return true;
                }
                false
            }
            OracleState::Idle | OracleState::Completed { .. } => {
                if key.code == KeyCode::Esc {
                    self.reset();
                    return true;
                }
                match self.input.handle_key(key) {
                    InputOutcome::Submitted(query) => {
                        self.submit(query);
                        true
                    }
                    InputOutcome::Edited => true,
                    InputOutcome::Ignored => false,
                }
            }
        }
    }

    fn tick(&mut self) {
        match &mut self.state {
            OracleState::Initializing { remaining } => {
                *remaining = remaining.saturating_sub(1);
                if *remaining == 0 {
                    self.state = OracleState::Idle;
                }
            }
            OracleState::Processing { query, remaining } => {
                *remaining = remaining.saturating_sub(1);
                if *remaining == 0 {
                    let query = std::mem::take(query);
                    self.consult(query);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};

    struct Offline;

    impl Deliberation for Offline {
        fn deliberate(&self, _query: &str, _locale: Locale) -> Result<MagiResponse, OracleError> {
            Err(OracleError::Unavailable("main bus offline".into()))
        }
    }

    fn press(app: &mut OracleApp, code: KeyCode) {
        let ctx = ComponentContext::new(true).with_locale(Locale::En);
        app.handle_event(&Event::Key(KeyEvent::new(code, KeyModifiers::NONE)), &ctx);
    }

    fn run_ticks(app: &mut OracleApp, n: u16) {
        for _ in 0..n {
            app.tick();
        }
    }

    fn ask(app: &mut OracleApp, query: &str) {
        for ch in query.chars() {
            press(app, KeyCode::Char(ch));
        }
        press(app, KeyCode::Enter);
    }

    #[test]
    fn majority_rules() {
        use Vote::*;
        assert_eq!(majority(&[Approve, Approve, Deny]), Approve);
        assert_eq!(majority(&[Deny, Conditional, Deny]), Deny);
        assert_eq!(majority(&[Approve, Deny, Conditional]), Conditional);
    }

    #[test]
    fn reasoning_is_looked_up_per_locale() {
        assert_eq!(
            LocalDeliberation::reasoning(MagiNode::Casper, Vote::Deny, Locale::En),
            "Nobody benefits. Reject it."
        );
        assert_eq!(
            LocalDeliberation::reasoning(MagiNode::Melchior, Vote::Conditional, Locale::Cn),
            "结论前需要进一步分析。"
        );
    }

    #[test]
    fn local_backend_is_deterministic() {
        let backend = LocalDeliberation;
        let a = backend.deliberate("Activate Unit-01?", Locale::En).unwrap();
        let b = backend.deliberate("  activate unit-01?  ", Locale::En).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.verdicts.len(), 3);
        let votes: Vec<Vote> = a.verdicts.iter().map(|v| v.vote).collect();
        assert_eq!(a.consensus, majority(&votes).label(Locale::En));
        assert_eq!(
            backend.deliberate("   ", Locale::En),
            Err(OracleError::EmptyQuery)
        );
    }

    #[test]
    fn query_flows_through_processing_to_completed() {
        let mut app = OracleApp::new(Box::new(LocalDeliberation));
        ask(&mut app, "ignored while booting");
        assert!(matches!(app.state(), OracleState::Initializing { .. }));
        run_ticks(&mut app, BOOT_TICKS);
        assert_eq!(app.state(), &OracleState::Idle);

        ask(&mut app, "Deploy Unit-00?");
        assert!(matches!(app.state(), OracleState::Processing { .. }));
        run_ticks(&mut app, PROCESSING_TICKS);
        let OracleState::Completed { query, response } = app.state() else {
            panic!("expected completed state, got {:?}", app.state());
        };
        assert_eq!(query, "Deploy Unit-00?");
        assert_eq!(response.verdicts.len(), 3);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state(), &OracleState::Idle);
    }

    #[test]
    fn backend_failure_is_reported_and_reboot_resets() {
        let mut app = OracleApp::new(Box::new(Offline));
        run_ticks(&mut app, BOOT_TICKS);
        ask(&mut app, "status?");
        run_ticks(&mut app, PROCESSING_TICKS);
        assert!(matches!(
            app.state(),
            OracleState::Failed(msg) if msg.contains("main bus offline")
        ));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state(), &OracleState::Idle);
    }

    #[test]
    fn blank_query_is_not_submitted() {
        let mut app = OracleApp::new(Box::new(LocalDeliberation));
        run_ticks(&mut app, BOOT_TICKS);
        ask(&mut app, "   ");
        assert_eq!(app.state(), &OracleState::Idle);
    }
}
