//! TUI views and rendering
//!
//! All rendering logic is contained here. Views draw from AppState but never
//! modify it. The mind map is painted on a braille canvas from the geometry
//! engine's coordinate table, gated by the current reveal stage.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Wrap};

use crate::assistant::{self, ReplyKind, Sender};
use crate::domain::TaskId;
use crate::layout::reveal::RevealStage;
use crate::layout::{CubicBezier, MindMapLayout, Point};
use crate::roadmap::PlanSession;

use super::state::{AppState, ChatSender, Pane, RoadmapRow, PROMPT_CHAR_LIMIT};

/// Branch palette, indexed by branch index modulo its length
const BRANCH_PALETTE: [Color; 8] = [
    Color::Rgb(102, 126, 234), // purple-blue
    Color::Rgb(240, 147, 251), // pink
    Color::Rgb(79, 172, 254),  // blue-cyan
    Color::Rgb(67, 233, 123),  // green-teal
    Color::Rgb(250, 112, 154), // pink-yellow
    Color::Rgb(168, 237, 234), // light teal
    Color::Rgb(255, 154, 158), // coral
    Color::Rgb(252, 182, 159), // peach
];

/// Phase accent colors, indexed by (phase - 1) modulo 4
const PHASE_PALETTE: [Color; 4] = [
    Color::Rgb(59, 130, 246),  // blue
    Color::Rgb(34, 197, 94),   // green
    Color::Rgb(168, 85, 247),  // purple
    Color::Rgb(249, 115, 22),  // orange
];

const DIM: Color = Color::DarkGray;
const SELECTED_BG: Color = Color::Rgb(40, 40, 40);
const NOTICE: Color = Color::Rgb(255, 215, 0);

pub fn branch_color(index: usize) -> Color {
    BRANCH_PALETTE[index % BRANCH_PALETTE.len()]
}

pub fn phase_color(phase_number: u32) -> Color {
    PHASE_PALETTE[(phase_number.saturating_sub(1) as usize) % PHASE_PALETTE.len()]
}

/// Main render function
pub fn render(state: &AppState, frame: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Body
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    render_header(state, frame, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(36)])
        .split(chunks[1]);

    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(0)])
        .split(body[0]);

    render_prompt(state, frame, main[0]);
    render_content(state, frame, main[1]);
    render_chat(state, frame, body[1]);
    render_footer(state, frame, chunks[2]);
}

fn focus_border(state: &AppState, pane: Pane) -> Style {
    if state.focus == pane {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(DIM)
    }
}

fn render_header(state: &AppState, frame: &mut Frame, area: Rect) {
    let mut spans = vec![
        Span::styled("planmap", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw("  "),
    ];
    if let Some(session) = &state.session {
        let plan = session.plan();
        let progress = session.progress();
        spans.push(Span::styled(
            format!(
                "{} phases · {} tasks · {}% complete",
                plan.roadmap.len(),
                progress.total_tasks(),
                progress.overall_progress().round() as u32,
            ),
            Style::default().fg(Color::Gray),
        ));
        spans.push(Span::raw("  "));
    }
    if state.generating {
        spans.push(Span::styled("Generating plan…", Style::default().fg(NOTICE)));
    } else if let Some(notice) = &state.notice {
        spans.push(Span::styled(notice.clone(), Style::default().fg(NOTICE)));
    }

    let header = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(DIM)));
    frame.render_widget(header, area);
}

fn render_prompt(state: &AppState, frame: &mut Frame, area: Rect) {
    let title = if state.generating {
        "Project idea (generating…)"
    } else {
        "Project idea (Enter to generate)"
    };
    let counter = format!("{}/{}", state.prompt_input.chars().count(), PROMPT_CHAR_LIMIT);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_border(state, Pane::Prompt))
        .title(title)
        .title_bottom(Line::from(counter).right_aligned());

    let text = if state.prompt_input.is_empty() && state.focus != Pane::Prompt {
        Line::from(Span::styled(
            "Describe your project idea, e.g. \"an e-commerce site for books with reviews\"",
            Style::default().fg(DIM),
        ))
    } else {
        Line::from(state.prompt_input.clone())
    };
    frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: false }).block(block), area);
}

fn render_content(state: &AppState, frame: &mut Frame, area: Rect) {
    let Some(session) = &state.session else {
        let hint = Paragraph::new(
            "No plan yet.\n\nType a project idea above and press Enter; the mind map \
             and roadmap will appear here.",
        )
        .style(Style::default().fg(DIM))
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(DIM)));
        frame.render_widget(hint, area);
        return;
    };

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Percentage(50),
            Constraint::Min(0),
        ])
        .split(area);

    render_overview(session, frame, parts[0]);
    render_mindmap(state, session, frame, parts[1]);

    if let Some(id) = state.active_assistant() {
        let split = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(13)])
            .split(parts[2]);
        render_roadmap(state, session, frame, split[0]);
        render_assistant(state, session, id, frame, split[1]);
    } else {
        render_roadmap(state, session, frame, parts[2]);
    }
}

fn render_overview(session: &PlanSession, frame: &mut Frame, area: Rect) {
    let plan = session.plan();
    let summary = plan.summary.lines().next().unwrap_or_default().to_string();
    let lines = vec![
        Line::from(Span::styled(summary, Style::default().fg(Color::White))),
        Line::from(vec![
            Span::styled("Tech: ", Style::default().fg(DIM)),
            Span::styled(plan.tech_stack.join(" · "), Style::default().fg(Color::Rgb(129, 140, 248))),
            Span::styled("   Estimated: ", Style::default().fg(DIM)),
            Span::styled(plan.estimated_duration.clone(), Style::default().fg(Color::Gray)),
        ]),
    ];
    let overview = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(DIM))
                .title("Overview"),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(overview, area);
}

fn render_mindmap(state: &AppState, session: &PlanSession, frame: &mut Frame, area: Rect) {
    let plan = session.plan();
    let map = MindMapLayout::compute(&plan.mind_map, state.branch_radius);
    let stage = state.reveal_stage;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_border(state, Pane::MindMap))
        .title("Mind map");

    if map.branches.is_empty() {
        let empty = Paragraph::new(format!("{}\n\n(no branches)", map.center_label))
            .style(Style::default().fg(DIM))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let bound = map.bound() + 80.0;
    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        // Terminal cells are roughly twice as tall as wide; widen the x
        // range so the circle reads as a circle
        .x_bounds([-bound * 2.2, bound * 2.2])
        .y_bounds([-bound, bound])
        .paint(|ctx| {
            if stage < RevealStage::Appearing {
                return;
            }
            for branch in &map.branches {
                let color = branch_color(branch.index);
                let solid = stage >= RevealStage::EdgesDrawn;
                draw_curve(ctx, &branch.edge, color, 24, solid);
                if stage >= RevealStage::LeavesShown {
                    for sub in &branch.subtopics {
                        // Subtopic connectors stay dashed, matching their
                        // lighter visual weight
                        draw_curve(ctx, &sub.edge, color, 12, false);
                        ctx.print(
                            sub.position.x * 2.2,
                            -sub.position.y,
                            Line::from(Span::styled(
                                sub.label.clone(),
                                Style::default().fg(Color::Gray),
                            )),
                        );
                    }
                }
                ctx.print(
                    branch.position.x * 2.2,
                    -branch.position.y,
                    Line::from(Span::styled(
                        branch.title.clone(),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    )),
                );
            }
            ctx.print(
                0.0,
                0.0,
                Line::from(Span::styled(
                    map.center_label.clone(),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                )),
            );
        });
    frame.render_widget(canvas, area);
}

/// Draw a bezier as a polyline; a dashed curve skips alternate segments.
fn draw_curve(
    ctx: &mut ratatui::widgets::canvas::Context<'_>,
    curve: &CubicBezier,
    color: Color,
    segments: usize,
    solid: bool,
) {
    let points = curve.sample(segments);
    for (i, pair) in points.windows(2).enumerate() {
        if !solid && i % 2 == 1 {
            continue;
        }
        let (a, b): (Point, Point) = (pair[0], pair[1]);
        ctx.draw(&CanvasLine {
            x1: a.x * 2.2,
            y1: -a.y,
            x2: b.x * 2.2,
            y2: -b.y,
            color,
        });
    }
}

/// A textual progress bar, `width` cells wide.
fn progress_bar(percent: f64, width: usize) -> String {
    let filled = ((percent / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn render_roadmap(state: &AppState, session: &PlanSession, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_border(state, Pane::Roadmap))
        .title("Roadmap");

    let rows = state.roadmap_rows();
    let mut lines: Vec<Line> = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let selected = state.focus == Pane::Roadmap && i == state.roadmap_cursor;
        let mut line = roadmap_row_line(session, *row, state.active_assistant());
        if selected {
            line = line.style(Style::default().bg(SELECTED_BG));
        }
        lines.push(line);
    }

    let viewport = area.height.saturating_sub(2) as usize;
    let max_scroll = rows.len().saturating_sub(viewport);
    let scroll = state
        .roadmap_cursor
        .saturating_sub(viewport / 2)
        .min(max_scroll);

    frame.render_widget(Paragraph::new(lines).scroll((scroll as u16, 0)).block(block), area);
}

fn roadmap_row_line(session: &PlanSession, row: RoadmapRow, active: Option<TaskId>) -> Line<'static> {
    let progress = session.progress();
    match row {
        RoadmapRow::Phase { position, phase_number } => {
            let phase = &session.plan().roadmap[position];
            let color = phase_color(phase_number);
            let open = session.selection().is_phase_open(phase_number);
            let arrow = if open { "▾" } else { "▸" };
            let pct = progress.phase_progress(phase_number);
            let mut spans = vec![
                Span::styled(
                    format!("{arrow} Phase {}: {}", phase_number, phase.title),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(
                        "  {} · {} · {}/{} tasks  ",
                        phase.percentage_range,
                        phase.duration,
                        progress.completed_in_phase(phase_number),
                        phase.tasks.len(),
                    ),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled(
                    format!("{} {:>3.0}%", progress_bar(pct, 10), pct),
                    Style::default().fg(color),
                ),
            ];
            if progress.is_phase_complete(phase_number) {
                spans.push(Span::styled(" ★", Style::default().fg(NOTICE)));
            }
            Line::from(spans)
        }
        RoadmapRow::Task(id) => {
            let text = session.plan().task_text(id).unwrap_or_default().to_string();
            let done = progress.is_complete(id);
            let color = phase_color(id.phase);
            let mark = if done { "✓" } else { "○" };
            let style = if done {
                Style::default().fg(color).add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default().fg(Color::Gray)
            };
            let mut spans = vec![
                Span::styled(format!("   {mark} "), Style::default().fg(color)),
                Span::styled(text, style),
            ];
            if active == Some(id) {
                spans.push(Span::styled("  [assistant]", Style::default().fg(Color::Magenta)));
            }
            Line::from(spans)
        }
    }
}

fn render_assistant(state: &AppState, session: &PlanSession, id: TaskId, frame: &mut Frame, area: Rect) {
    let task_text = session.plan().task_text(id).unwrap_or_default().to_string();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
        .title(format!("Assistant · {task_text}"));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    // Message tail, soft-wrapped to the panel width
    let width = chunks[0].width as usize;
    let mut lines: Vec<Line> = Vec::new();
    for message in session.history(id) {
        let (prefix, color) = match message.sender {
            Sender::User => ("you ", Color::Green),
            Sender::Bot => match message.kind {
                ReplyKind::Code => ("bot ", Color::Rgb(67, 233, 123)),
                ReplyKind::Checklist => ("bot ", Color::Rgb(168, 85, 247)),
                ReplyKind::Resource => ("bot ", Color::Rgb(249, 115, 22)),
                ReplyKind::Text => ("bot ", Color::Rgb(100, 149, 237)),
            },
        };
        for (i, wrapped) in wrap_text(&message.content, width.saturating_sub(4)).into_iter().enumerate() {
            let lead = if i == 0 { prefix } else { "    " };
            lines.push(Line::from(vec![
                Span::styled(lead.to_string(), Style::default().fg(color).add_modifier(Modifier::BOLD)),
                Span::styled(wrapped, Style::default().fg(Color::Gray)),
            ]));
        }
    }
    let viewport = chunks[0].height as usize;
    let scroll = lines.len().saturating_sub(viewport);
    frame.render_widget(Paragraph::new(lines).scroll((scroll as u16, 0)), chunks[0]);

    // Quick action hints
    let actions = assistant::quick_actions(id.phase, &task_text);
    let hint = actions
        .iter()
        .enumerate()
        .map(|(i, a)| format!("{} {}", i + 1, a.title))
        .collect::<Vec<_>>()
        .join(" · ");
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(hint, Style::default().fg(DIM)))),
        chunks[1],
    );

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("> ", Style::default().fg(Color::Magenta)),
            Span::raw(state.assistant_input.clone()),
        ])),
        chunks[2],
    );
}

fn render_chat(state: &AppState, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_border(state, Pane::Chat))
        .title("AI assistant");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    let width = chunks[0].width as usize;
    let mut lines: Vec<Line> = Vec::new();
    for message in &state.chat_history {
        let (prefix, color) = match message.sender {
            ChatSender::User => ("you ", Color::Green),
            ChatSender::Bot => ("bot ", Color::Rgb(100, 149, 237)),
        };
        for (i, wrapped) in wrap_text(&message.content, width.saturating_sub(4)).into_iter().enumerate() {
            let lead = if i == 0 { prefix } else { "    " };
            lines.push(Line::from(vec![
                Span::styled(lead.to_string(), Style::default().fg(color).add_modifier(Modifier::BOLD)),
                Span::styled(wrapped, Style::default().fg(Color::Gray)),
            ]));
        }
        lines.push(Line::default());
    }
    if state.chat_waiting {
        lines.push(Line::from(Span::styled("bot …", Style::default().fg(DIM))));
    }
    let viewport = chunks[0].height as usize;
    let scroll = lines.len().saturating_sub(viewport);
    frame.render_widget(Paragraph::new(lines).scroll((scroll as u16, 0)), chunks[0]);

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("> ", Style::default().fg(Color::Cyan)),
            Span::raw(state.chat_input.clone()),
        ])),
        chunks[1],
    );
}

fn render_footer(state: &AppState, frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(34), Constraint::Min(0)])
        .split(area);

    let overall = state
        .session
        .as_ref()
        .map(|s| s.progress().overall_progress())
        .unwrap_or(0.0);
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Overall"))
        .gauge_style(Style::default().fg(Color::Rgb(129, 140, 248)))
        .ratio((overall / 100.0).clamp(0.0, 1.0))
        .label(format!("{}%", overall.round() as u32));
    frame.render_widget(gauge, chunks[0]);

    let hints = if state.active_assistant().is_some() && state.focus == Pane::Roadmap {
        "type to ask · Enter send · 1-5 quick actions · Esc close · Tab pane"
    } else {
        match state.focus {
            Pane::Prompt => "Enter generate · Tab pane · Ctrl+C quit",
            Pane::MindMap => "Tab pane · q quit",
            Pane::Roadmap => "j/k move · Space toggle · a assistant · Tab pane · q quit",
            Pane::Chat => "Enter send · Tab pane · Ctrl+C quit",
        }
    };
    let footer = Paragraph::new(Line::from(Span::styled(hints, Style::default().fg(DIM))))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(DIM)));
    frame.render_widget(footer, chunks[1]);
}

/// Greedy word wrap at `width` columns; long words are split hard.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(8);
    let mut out = Vec::new();
    for raw_line in text.lines() {
        if raw_line.is_empty() {
            out.push(String::new());
            continue;
        }
        let mut current = String::new();
        for word in raw_line.split_whitespace() {
            if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
                out.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            // Hard-split words longer than the full width
            let mut word = word;
            while current.chars().count() + word.chars().count() > width {
                let take = width - current.chars().count();
                let split_at = word
                    .char_indices()
                    .nth(take)
                    .map(|(i, _)| i)
                    .unwrap_or(word.len());
                current.push_str(&word[..split_at]);
                out.push(std::mem::take(&mut current));
                word = &word[split_at..];
            }
            current.push_str(word);
        }
        if !current.is_empty() {
            out.push(current);
        }
    }
    out
}
