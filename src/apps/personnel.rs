//! Personnel topology: a fixed relationship graph with a dossier pane for
//! the selected person.

use crossterm::event::{Event, KeyCode, KeyEventKind, MouseButton, MouseEventKind};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{self, Canvas};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::components::{Component, ComponentContext};
use crate::locale::Locale;
use crate::theme;
use crate::ui::UiFrame;

/// Width and height of the virtual plane node positions are given in.
const CANVAS_WIDTH: f64 = 800.0;
const CANVAS_HEIGHT: f64 = 600.0;
/// How far from a node, in virtual units, a click still selects it.
const PICK_RADIUS: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Command,
    Pilot,
    Tactical,
    Scientific,
    Other,
}

impl Role {
    pub fn label(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Role::Command, Locale::En) => "COMMANDER",
            (Role::Pilot, Locale::En) => "EVA PILOT",
            (Role::Tactical, Locale::En) => "TACTICAL OPS",
            (Role::Scientific, Locale::En) => "SCIENTIFIC DIV",
            (Role::Other, Locale::En) => "SPECIAL INSPECTOR",
            (Role::Command, Locale::Cn) => "最高指挥",
            (Role::Pilot, Locale::Cn) => "EVA 驾驶员",
            (Role::Tactical, Locale::Cn) => "战术作战部",
            (Role::Scientific, Locale::Cn) => "技术开发部",
            (Role::Other, Locale::Cn) => "特务监察",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Blood,
    Command,
    Love,
    Conflict,
    Friend,
    Clone,
}

impl Relation {
    pub fn label(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Relation::Blood, Locale::En) => "BLOOD RELATIVE",
            (Relation::Command, Locale::En) => "CHAIN OF COMMAND",
            (Relation::Love, Locale::En) => "AFFECTION / OBSESSION",
            (Relation::Conflict, Locale::En) => "HOSTILITY / RIVALRY",
            (Relation::Friend, Locale::En) => "ASSOCIATE",
            (Relation::Clone, Locale::En) => "CLONE / VESSEL",
            (Relation::Blood, Locale::Cn) => "血缘关系",
            (Relation::Command, Locale::Cn) => "指挥/监护",
            (Relation::Love, Locale::Cn) => "情感/执念",
            (Relation::Conflict, Locale::Cn) => "敌对/竞争",
            (Relation::Friend, Locale::Cn) => "同僚/旧识",
            (Relation::Clone, Locale::Cn) => "复制体/容器",
        }
    }

    fn color(self) -> Color {
        match self {
            Relation::Blood => Color::Rgb(239, 68, 68),
            Relation::Love => Color::Rgb(236, 72, 153),
            Relation::Conflict => Color::Rgb(245, 158, 11),
            Relation::Clone => Color::Rgb(59, 130, 246),
            Relation::Command | Relation::Friend => Color::Rgb(85, 85, 85),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Person {
    pub id: &'static str,
    pub x: f64,
    pub y: f64,
    pub role: Role,
}

#[derive(Debug, Clone, Copy)]
pub struct Link {
    pub source: &'static str,
    pub target: &'static str,
    pub relation: Relation,
}

pub const PEOPLE: [Person; 10] = [
    person("GENDO", 400.0, 80.0, Role::Command),
    person("FUYUTSUKI", 550.0, 80.0, Role::Command),
    person("YUI", 400.0, 180.0, Role::Scientific),
    person("SHINJI", 400.0, 300.0, Role::Pilot),
    person("REI", 250.0, 300.0, Role::Pilot),
    person("ASUKA", 550.0, 300.0, Role::Pilot),
    person("MISATO", 400.0, 450.0, Role::Tactical),
    person("RITSUKO", 550.0, 450.0, Role::Scientific),
    person("KAJI", 400.0, 550.0, Role::Other),
    person("KAWORU", 250.0, 450.0, Role::Pilot),
];

pub const LINKS: [Link; 15] = [
    link("GENDO", "SHINJI", Relation::Blood),
    link("GENDO", "REI", Relation::Command),
    link("GENDO", "FUYUTSUKI", Relation::Friend),
    link("GENDO", "YUI", Relation::Love),
    link("YUI", "SHINJI", Relation::Blood),
    link("MISATO", "SHINJI", Relation::Command),
    link("MISATO", "ASUKA", Relation::Command),
    link("MISATO", "KAJI", Relation::Love),
    link("MISATO", "RITSUKO", Relation::Friend),
    link("RITSUKO", "GENDO", Relation::Love),
    link("ASUKA", "SHINJI", Relation::Conflict),
    link("ASUKA", "KAJI", Relation::Love),
    link("REI", "SHINJI", Relation::Friend),
    link("KAWORU", "SHINJI", Relation::Love),
    link("REI", "YUI", Relation::Clone),
];

const fn person(id: &'static str, x: f64, y: f64, role: Role) -> Person {
    Person { id, x, y, role }
}

const fn link(source: &'static str, target: &'static str, relation: Relation) -> Link {
    Link {
        source,
        target,
        relation,
    }
}

// (id, English, Chinese)
static DOSSIERS: [(&str, &str, &str); 10] = [
    (
        "GENDO",
        "SUPREME COMMANDER. COLD, CALCULATING. GOAL: HUMAN INSTRUMENTALITY.",
        "碇源堂 - 最高司令。冷酷、计算精密。目标：人类补完计划。",
    ),
    (
        "SHINJI",
        "THIRD CHILD. UNIT-01 PILOT. CHRONIC DEPRESSION & ABANDONMENT ISSUES.",
        "碇真嗣 - 第三适格者。初号机驾驶员。由于被父亲抛弃而产生心理隔阂。",
    ),
    (
        "REI",
        "FIRST CHILD. UNIT-00 PILOT. ENIGMATIC. PASTE-LIKE HISTORY.",
        "绫波丽 - 第一适格者。零号机驾驶员。身世成谜，缺乏情感表达。",
    ),
    (
        "ASUKA",
        "SECOND CHILD. UNIT-02 PILOT. HIGH PRIDE, FRAGILE EGO.",
        "明日香 - 第二适格者。二号机驾驶员。自尊心极强，渴望被认可。",
    ),
    (
        "MISATO",
        "OPERATIONS DIRECTOR. GUARDIAN. SEEKS REVENGE ON ANGELS.",
        "葛城美里 - 作战部长。真嗣的监护人。誓要向使徒复仇。",
    ),
    (
        "RITSUKO",
        "HEAD SCIENTIST. MAINTAINS MAGI. MOTHER COMPLEX.",
        "赤木律子 - 首席科学家。MAGI 维护者。与母亲有着复杂的情感纠葛。",
    ),
    (
        "KAJI",
        "SPECIAL INSPECTOR. DOUBLE AGENT. SEEKS THE TRUTH.",
        "加持良治 - 特务监察。双面间谍。追寻第二次冲击的真相。",
    ),
    (
        "YUI",
        "DECEASED. SOUL RESIDES IN UNIT-01. THE CATALYST.",
        "碇唯 - 已故。灵魂寄宿于初号机中。一切的起因。",
    ),
    (
        "FUYUTSUKI",
        "DEPUTY COMMANDER. THE ONLY ONE WHO UNDERSTANDS GENDO.",
        "冬月耕造 - 副司令。最了解源堂过去的人。",
    ),
    (
        "KAWORU",
        "FIFTH CHILD. ANGEL. UNCONDITIONAL LOVE.",
        "渚薰 - 第五适格者。第十七使徒。给予真嗣无条件的爱。",
    ),
];

fn dossier(id: &str, locale: Locale) -> &'static str {
    DOSSIERS
        .iter()
        .find(|(person, _, _)| *person == id)
        .map_or("", |(_, en, cn)| match locale {
            Locale::En => *en,
            Locale::Cn => *cn,
        })
}

fn find(id: &str) -> Option<&'static Person> {
    PEOPLE.iter().find(|p| p.id == id)
}

/// Links touching `id`, each paired with the other endpoint and whether
/// `id` is the source.
pub fn relations_of(id: &str) -> impl Iterator<Item = (&'static str, Relation, bool)> + '_ {
    LINKS.iter().filter_map(move |l| {
        if l.source == id {
            Some((l.target, l.relation, true))
        } else if l.target == id {
            Some((l.source, l.relation, false))
        } else {
            None
        }
    })
}

#[derive(Debug, Default)]
pub struct PersonnelApp {
    selected: Option<usize>,
    // graph pane from the last render, in content-local cells
    graph_area: Rect,
}

impl PersonnelApp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&'static Person> {
        self.selected.and_then(|i| PEOPLE.get(i))
    }

    pub fn select(&mut self, id: &str) -> bool {
        match PEOPLE.iter().position(|p| p.id == id) {
            Some(index) => {
                self.selected = Some(index);
                true
            }
            None => false,
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    fn step(&mut self, forward: bool) {
        let len = PEOPLE.len();
        self.selected = Some(match (self.selected, forward) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
        });
    }

    /// Person nearest to the cell `(col, row)` of the graph pane, if one
    /// lies within pick range.
    fn pick(&self, col: u16, row: u16) -> Option<usize> {
        let area = self.graph_area;
        if area.width == 0 || area.height == 0 || !crate::layout::rect_contains(area, col, row) {
            return None;
        }
        let vx = (f64::from(col - area.x) + 0.5) * CANVAS_WIDTH / f64::from(area.width);
        let vy = (f64::from(row - area.y) + 0.5) * CANVAS_HEIGHT / f64::from(area.height);
        PEOPLE
            .iter()
            .enumerate()
            .map(|(i, p)| (i, (p.x - vx).hypot(p.y - vy)))
            .filter(|(_, d)| *d <= PICK_RADIUS)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    fn render_graph(&self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        let accent = ctx.accent();
        let selected = self.selected().map(|p| p.id);
        let locale = ctx.locale();
        let graph = Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([0.0, CANVAS_WIDTH])
            .y_bounds([0.0, CANVAS_HEIGHT])
            .paint(move |painter| {
                for link in &LINKS {
                    let (Some(a), Some(b)) = (find(link.source), find(link.target)) else {
                        continue;
                    };
                    let touches = selected.is_some_and(|id| id == link.source || id == link.target);
                    if selected.is_some() && !touches {
                        continue;
                    }
                    painter.draw(&canvas::Line {
                        x1: a.x,
                        y1: CANVAS_HEIGHT - a.y,
                        x2: b.x,
                        y2: CANVAS_HEIGHT - b.y,
                        color: link.relation.color(),
                    });
                }
                painter.layer();
                for person in &PEOPLE {
                    let is_selected = selected == Some(person.id);
                    let dimmed = selected.is_some() && !is_selected;
                    let mut style = Style::default().fg(if dimmed {
                        theme::content_dim()
                    } else {
                        accent
                    });
                    if is_selected {
                        style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
                    }
                    let label_x = person.x - person.id.len() as f64 * 5.0;
                    painter.print(
                        label_x,
                        CANVAS_HEIGHT - person.y,
                        Line::from(Span::styled(person.id, style)),
                    );
                    if !dimmed {
                        painter.print(
                            label_x,
                            CANVAS_HEIGHT - person.y - 25.0,
                            Line::from(Span::styled(
                                person.role.label(locale),
                                Style::default().fg(theme::content_dim()),
                            )),
                        );
                    }
                }
            });
        frame.render_widget(graph, area);
    }

    fn render_details(&self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        let accent = Style::default().fg(ctx.accent());
        let block = Block::default().borders(Borders::LEFT).border_style(accent);
        let locale = ctx.locale();
        let lines: Vec<Line> = match self.selected() {
            Some(person) => {
                let mut lines = vec![
                    Line::from(Span::styled(
                        person.id,
                        accent.add_modifier(Modifier::BOLD | Modifier::ITALIC),
                    )),
                    Line::from(Span::styled(
                        person.role.label(locale),
                        Style::default().fg(theme::content_dim()),
                    )),
                    Line::from(""),
                    Line::from("PROFILE DATA").style(Style::default().fg(theme::content_dim())),
                    Line::from(dossier(person.id, locale))
                        .style(Style::default().fg(Color::White)),
                    Line::from(""),
                    Line::from("RELATIONSHIPS").style(Style::default().fg(theme::content_dim())),
                ];
                for (other, relation, outgoing) in relations_of(person.id) {
                    lines.push(Line::from(vec![
                        Span::styled(format!("{other:<10} "), accent.add_modifier(Modifier::BOLD)),
                        Span::styled(relation.label(locale), Style::default().fg(relation.color())),
                        Span::raw(if outgoing { " →" } else { " ←" }),
                    ]));
                }
                lines.push(Line::from(""));
                lines.push(Line::from("[ESC] CLOSE ENTRY").style(accent));
                lines
            }
            None => {
                let prompt = match locale {
                    Locale::En => "SELECT TARGET FOR DATA",
                    Locale::Cn => "选择目标读取数据",
                };
                vec![Line::from(prompt).style(accent.add_modifier(Modifier::DIM))]
            }
        };
        frame.render_widget(
            Paragraph::new(lines).wrap(Wrap { trim: true }).block(block),
            area,
        );
    }
}

impl Component for PersonnelApp {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        let accent = Style::default().fg(ctx.accent());
        let [header, body] =
            Layout::vertical([Constraint::Length(2), Constraint::Min(0)]).areas(area);
        let (title, status) = match ctx.locale() {
            Locale::En => ("PERSONNEL TOPOLOGY", "STATUS: ACTIVE"),
            Locale::Cn => ("人员关系拓扑图", "状态：活跃"),
        };
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(title).style(accent.add_modifier(Modifier::BOLD)),
                Line::from(status).style(accent),
            ]),
            header,
        );
        let [graph, details] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(34)]).areas(body);
        self.graph_area = graph;
        self.render_graph(frame, graph, ctx);
        self.render_details(frame, details, ctx);
    }

    fn handle_event(&mut self, event: &Event, ctx: &ComponentContext) -> bool {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Tab | KeyCode::Right | KeyCode::Down => {
                    self.step(true);
                    true
                }
                KeyCode::BackTab | KeyCode::Left | KeyCode::Up => {
                    self.step(false);
                    true
                }
                KeyCode::Esc if self.selected.is_some() => {
                    self.clear_selection();
                    true
                }
                _ => false,
            },
            Event::Mouse(mouse)
                if mouse.kind == MouseEventKind::Down(MouseButton::Left)
                    && !ctx.selection_suppressed() =>
            {
                match self.pick(mouse.column, mouse.row) {
                    Some(index) => {
                        self.selected = Some(index);
                        true
                    }
                    None => false,
                }
            }
            _ => false,
        }
    }
}
