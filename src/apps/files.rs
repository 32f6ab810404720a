//! Archives: a two-pane browser over the in-memory archive tree.

use crossterm::event::{Event, KeyCode, KeyEventKind};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::archive::{Archive, FileNode};
use super::oracle::{Deliberation, MagiResponse};
use crate::components::{Component, ComponentContext, InputLine, InputOutcome, ListComponent};
use crate::locale::Locale;
use crate::theme;
use crate::ui::UiFrame;

struct Labels {
    back: &'static str,
    name: &'static str,
    size: &'static str,
    security: &'static str,
    empty: &'static str,
    preview: &'static str,
    new_folder: &'static str,
    rename: &'static str,
    confirm_delete: &'static str,
    warning: &'static str,
    consensus: &'static str,
    hints: &'static str,
}

fn labels(locale: Locale) -> Labels {
    match locale {
        Locale::En => Labels {
            back: "BACK",
            name: "FILENAME",
            size: "SIZE",
            security: "SECURITY",
            empty: "DIRECTORY EMPTY",
            preview: "PREVIEW",
            new_folder: "NEW FOLDER",
            rename: "RENAME",
            confirm_delete: "CONFIRM DELETION? [Y/N]",
            warning: "THIS ACTION IS IRREVERSIBLE.",
            consensus: "CONSENSUS",
            hints: "[ENTER] OPEN [BKSP] BACK [N] NEW [R] RENAME [D] DELETE [A] MAGI ANALYZE",
        },
        Locale::Cn => Labels {
            back: "返回",
            name: "名称",
            size: "大小",
            security: "密级",
            empty: "目录为空",
            preview: "预览",
            new_folder: "新建文件夹",
            rename: "重命名",
            confirm_delete: "确认删除此项目？[Y/N]",
            warning: "此操作不可逆。",
            consensus: "最终决议",
            hints: "[ENTER] 打开 [BKSP] 返回 [N] 新建 [R] 重命名 [D] 删除 [A] MAGI 解析",
        },
    }
}

#[derive(Debug)]
enum PromptKind {
    NewFolder,
    Rename(usize),
}

enum Modal {
    ConfirmDelete(usize),
    Prompt { kind: PromptKind, input: InputLine },
    Analysis {
        name: String,
        result: Result<MagiResponse, String>,
    },
}

pub struct FilesApp {
    archive: Archive,
    list: ListComponent,
    modal: Option<Modal>,
    backend: Box<dyn Deliberation>,
    locale: Locale,
}

impl FilesApp {
    pub fn new(root: FileNode, backend: Box<dyn Deliberation>) -> Self {
        let mut app = Self {
            archive: Archive::new(root),
            list: ListComponent::new(),
            modal: None,
            backend,
            locale: Locale::default(),
        };
        app.refresh();
        app
    }

    pub fn archive(&self) -> &Archive {
        &self.archive
    }

    pub fn selected(&self) -> Option<&FileNode> {
        self.archive.entries().get(self.list.selected())
    }

    fn refresh(&mut self) {
        let rows = self.archive.entries().iter().map(row_label).collect();
        self.list.set_items(rows);
    }

    /// Enter the selected directory. Files are already shown in the
    /// preview pane, so opening one does nothing.
    fn open_selected(&mut self) {
        if self.archive.enter_index(self.list.selected()) {
            self.list.set_selected(0);
            self.refresh();
        }
    }

    fn go_up(&mut self) {
        if self.archive.up() {
            self.list.set_selected(0);
            self.refresh();
        }
    }

    fn analyze_selected(&mut self) {
        let Some(node) = self.selected() else {
            return;
        };
        if node.is_dir() {
            return;
        }
        let name = node.name.clone();
        let prompt = match self.locale {
            Locale::En => format!(
                "Analyze this NERV archive file. Filename: {}. Content: {}",
                node.name,
                node.content().unwrap_or("Unreadable")
            ),
            Locale::Cn => format!(
                "请分析这份NERV档案文件。文件名: {}。文件内容: {}",
                node.name,
                node.content().unwrap_or("无法读取内容")
            ),
        };
        let result = self
            .backend
            .deliberate(&prompt, self.locale)
            .map_err(|err| err.to_string());
        tracing::debug!(file = %name, ok = result.is_ok(), "archive analysis finished");
        self.modal = Some(Modal::Analysis { name, result });
    }

    fn handle_modal_key(&mut self, code: KeyCode, key: &crossterm::event::KeyEvent) {
        let Some(modal) = self.modal.take() else {
            return;
        };
        match modal {
            Modal::ConfirmDelete(index) => {
                if matches!(code, KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter) {
                    if let Some(removed) = self.archive.remove(index) {
                        tracing::debug!(name = %removed.name, "archive entry deleted");
                    }
                    self.refresh();
                } else if !matches!(code, KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc) {
                    self.modal = Some(Modal::ConfirmDelete(index));
                }
            }
            Modal::Prompt { kind, mut input } => {
                if code == KeyCode::Esc {
                    return;
                }
                match input.handle_key(key) {
                    InputOutcome::Submitted(name) => {
                        let name = name.trim();
                        if name.is_empty() {
                            self.modal = Some(Modal::Prompt { kind, input });
                            return;
                        }
                        match kind {
                            PromptKind::NewFolder => {
                                let date = chrono::Local::now().format("%Y-%m-%d").to_string();
                                let node = FileNode::dir(name, Vec::new())
                                    .dated(&date)
                                    .classified("USER");
                                if let Some(index) = self.archive.insert(node) {
                                    self.refresh();
                                    self.list.set_selected(index);
                                }
                            }
                            PromptKind::Rename(index) => {
                                self.archive.rename(index, name);
                                self.refresh();
                            }
                        }
                    }
                    InputOutcome::Edited | InputOutcome::Ignored => {
                        self.modal = Some(Modal::Prompt { kind, input });
                    }
                }
            }
            Modal::Analysis { .. } => {
                if !matches!(code, KeyCode::Esc | KeyCode::Enter) {
                    self.modal = Some(modal);
                }
            }
        }
    }

    fn render_preview(&self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        let text = labels(ctx.locale());
        let accent = Style::default().fg(ctx.accent());
        let block = Block::default()
            .borders(Borders::LEFT)
            .border_style(accent)
            .title(text.preview);
        let body: Vec<Line> = match self.selected() {
            Some(node) if node.is_dir() => vec![
                Line::from(format!("<DIR> {}", node.name)),
                Line::from(format!("{} ITEMS", node.children().len())),
                Line::from(node.date.clone().unwrap_or_default()),
                Line::from(node.security_level.clone().unwrap_or_default()),
            ],
            Some(node) => {
                let mut lines = vec![
                    Line::from(Span::styled(
                        node.name.clone(),
                        accent.add_modifier(Modifier::BOLD),
                    )),
                    Line::from(format!(
                        "{} {}",
                        node.size().unwrap_or_default(),
                        node.date.clone().unwrap_or_default()
                    )),
                    Line::from(""),
                ];
                lines.extend(node.content().unwrap_or_default().lines().map(Line::from));
                lines
            }
            None => vec![Line::from(text.empty)],
        };
        frame.render_widget(
            Paragraph::new(body)
                .style(accent)
                .wrap(Wrap { trim: false })
                .block(block),
            area,
        );
    }

    fn render_modal(&self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        let Some(modal) = &self.modal else {
            return;
        };
        let text = labels(ctx.locale());
        let accent = Style::default().fg(ctx.accent());
        let popup = centered(area, 60, 9);
        frame.render_widget(Clear, popup);
        match modal {
            Modal::ConfirmDelete(index) => {
                let name = self
                    .archive
                    .entries()
                    .get(*index)
                    .map(|n| n.name.clone())
                    .unwrap_or_default();
                let alert = Style::default().fg(theme::alert());
                frame.render_widget(
                    Paragraph::new(vec![
                        Line::from(text.confirm_delete).style(alert.add_modifier(Modifier::BOLD)),
                        Line::from(name),
                        Line::from(text.warning),
                    ])
                    .style(alert)
                    .block(Block::default().borders(Borders::ALL).border_style(alert)),
                    popup,
                );
            }
            Modal::Prompt { kind, input } => {
                let title = match kind {
                    PromptKind::NewFolder => text.new_folder,
                    PromptKind::Rename(_) => text.rename,
                };
                let block = Block::default()
                    .borders(Borders::ALL)
                    .border_style(accent)
                    .title(title);
                let inner = block.inner(popup);
                frame.render_widget(block, popup);
                let line = Rect {
                    height: 1.min(inner.height),
                    ..inner
                };
                input.render(frame, line, "NAME: ", "", ctx);
            }
            Modal::Analysis { name, result } => {
                let mut lines = Vec::new();
                match result {
                    Ok(response) => {
                        for verdict in &response.verdicts {
                            lines.push(Line::from(format!(
                                "{} [{}] {}",
                                verdict.node.name(),
                                verdict.vote.label(ctx.locale()),
                                verdict.reasoning
                            )));
                        }
                        lines.push(Line::from(format!(
                            "{}: {}",
                            text.consensus, response.consensus
                        )));
                    }
                    Err(message) => lines.push(
                        Line::from(message.clone()).style(Style::default().fg(theme::alert())),
                    ),
                }
                frame.render_widget(
                    Paragraph::new(lines).style(accent).wrap(Wrap { trim: true }).block(
                        Block::default()
                            .borders(Borders::ALL)
                            .border_style(accent)
                            .title(format!("MAGI SYSTEM // {name}")),
                    ),
                    popup,
                );
            }
        }
    }
}

fn row_label(node: &FileNode) -> String {
    let kind = if node.is_dir() { "<DIR>" } else { "     " };
    format!(
        "{kind} {:<24} {:>6} {}",
        node.name,
        node.size().unwrap_or_default(),
        node.security_level.as_deref().unwrap_or_default()
    )
}

fn centered(area: Rect, width_percent: u16, height: u16) -> Rect {
    let width = (area.width as u32 * width_percent as u32 / 100) as u16;
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

impl Component for FilesApp {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        self.locale = ctx.locale();
        let text = labels(ctx.locale());
        let accent = Style::default().fg(ctx.accent());
        let [path_row, header_row, body, hint_row] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(area);

        let back_style = if self.archive.at_root() {
            Style::default().fg(theme::content_dim())
        } else {
            accent.add_modifier(Modifier::BOLD)
        };
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(format!("◂ {} ", text.back), back_style),
                Span::styled(self.archive.path_string(), accent),
            ])),
            path_row,
        );
        frame.render_widget(
            Paragraph::new(format!(
                "      {:<24} {:>6} {}",
                text.name, text.size, text.security
            ))
            .style(accent.add_modifier(Modifier::UNDERLINED)),
            header_row,
        );

        let [list_area, preview_area] =
            Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
                .areas(body);
        if self.archive.entries().is_empty() {
            frame.render_widget(
                Paragraph::new(text.empty).style(Style::default().fg(theme::content_dim())),
                list_area,
            );
        } else {
            self.list.render(frame, list_area, ctx);
        }
        self.render_preview(frame, preview_area, ctx);
        frame.render_widget(
            Paragraph::new(text.hints).style(Style::default().fg(theme::content_dim())),
            hint_row,
        );
        self.render_modal(frame, area, ctx);
    }

    fn handle_event(&mut self, event: &Event, ctx: &ComponentContext) -> bool {
        self.locale = ctx.locale();
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if self.modal.is_some() {
                    self.handle_modal_key(key.code, key);
                    return true;
                }
                match key.code {
                    KeyCode::Enter | KeyCode::Right => {
                        self.open_selected();
                        true
                    }
                    KeyCode::Backspace | KeyCode::Left => {
                        self.go_up();
                        true
                    }
                    KeyCode::Char('n') => {
                        self.modal = Some(Modal::Prompt {
                            kind: PromptKind::NewFolder,
                            input: InputLine::new(),
                        });
                        true
                    }
                    KeyCode::Char('r') if self.selected().is_some() => {
                        self.modal = Some(Modal::Prompt {
                            kind: PromptKind::Rename(self.list.selected()),
                            input: InputLine::new(),
                        });
                        true
                    }
                    KeyCode::Char('d') | KeyCode::Delete if self.selected().is_some() => {
                        self.modal = Some(Modal::ConfirmDelete(self.list.selected()));
                        true
                    }
                    KeyCode::Char('a') => {
                        self.analyze_selected();
                        true
                    }
                    _ => self.list.handle_event(event, ctx),
                }
            }
            Event::Mouse(_) if self.modal.is_none() && !ctx.selection_suppressed() => {
                let handled = self.list.handle_event(event, ctx);
                if self.list.take_activation() {
                    self.open_selected();
                }
                handled
            }
            _ => false,
        }
    }
}
