use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Wrap};

use crate::content::Content;

use super::super::player::PlayerState;
use super::super::playlist::{ChapterKind, Playlist};
use super::super::sync::{Highlight, ItemSpan, Viewport, classify};
use super::super::text::{format_clock, reveal_words, truncate, wrap_text};
use super::{Controller, Page, UiState};

const MIN_WIDTH: u16 = 40;
const MIN_HEIGHT: u16 = 14;
const FADE_ROWS: u16 = 1;

const ACCENT: Color = Color::Rgb(110, 170, 255);
const MUTED: Color = Color::Rgb(185, 195, 210);
const COMPLETED: Color = Color::Rgb(0, 209, 40);
const UPCOMING: Color = Color::Rgb(120, 128, 140);

pub(super) fn draw_ui(frame: &mut Frame, content: &Content, controller: &Controller, ui: &mut UiState) {
    let bg = Block::default().style(Style::default().bg(Color::Black));
    frame.render_widget(bg, frame.area());

    let area = frame.area();
    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        draw_too_small(frame, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(area);

    let page = ui.nav.current();
    draw_header(frame, chunks[0], content, page);
    match page {
        Page::Home => draw_home(frame, chunks[1], content, ui),
        Page::Reading => draw_reading(frame, chunks[1], controller, ui),
        Page::Summary => draw_summary(frame, chunks[1], content, ui),
    }

    let controls = Paragraph::new(controls_line(page, controller))
        .alignment(Alignment::Center)
        .block(panel_block("Controls"));
    frame.render_widget(controls, chunks[2]);

    let status_widget = Paragraph::new(ui.status.clone())
        .style(status_style(&ui.status))
        .block(panel_block("Status"));
    frame.render_widget(status_widget, chunks[3]);
}

fn draw_header(frame: &mut Frame, area: Rect, content: &Content, page: Page) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            content.title().to_uppercase(),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::styled("   ", Style::default()),
        Span::styled(page.title(), Style::default().fg(Color::Yellow)),
    ]))
    .alignment(Alignment::Center)
    .block(panel_block("Coverlet"));
    frame.render_widget(header, area);
}

fn draw_home(frame: &mut Frame, area: Rect, content: &Content, ui: &mut UiState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(38), Constraint::Percentage(62)])
        .split(area);

    let candidate = &content.candidate;
    let profile = Paragraph::new(vec![
        Line::from(Span::styled(
            candidate.name.clone(),
            Style::default()
                .fg(Color::Rgb(230, 235, 242))
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            candidate.designation.clone(),
            Style::default().fg(MUTED),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Applying to ", Style::default().fg(MUTED)),
            Span::styled(candidate.company.clone(), Style::default().fg(ACCENT)),
        ]),
    ])
    .wrap(Wrap { trim: true })
    .block(panel_block("Candidate"));
    frame.render_widget(profile, chunks[0]);

    let block = panel_block("Questions");
    let inner = block.inner(chunks[1]);
    let mut lines = Vec::new();
    for (idx, question) in content.questions.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(format!("{:>2}. ", idx + 1), Style::default().fg(ACCENT)),
            Span::styled(
                truncate(&question.question, inner.width.saturating_sub(4) as usize),
                Style::default().fg(Color::Rgb(230, 235, 242)),
            ),
        ]));
        if !question.answer.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("    {} point(s)", question.answer.len()),
                Style::default().fg(UPCOMING),
            )));
        }
    }
    if lines.is_empty() {
        lines.push(Line::from("No questions in this letter."));
    }
    let max_scroll = (lines.len() as u16).saturating_sub(inner.height);
    ui.home_scroll = ui.home_scroll.min(max_scroll);
    let questions = Paragraph::new(lines)
        .scroll((ui.home_scroll, 0))
        .block(block);
    frame.render_widget(questions, chunks[1]);
}

/// Lays out every chapter as wrapped rows and records where each one sits.
fn transcript_lines(
    playlist: &Playlist,
    current: usize,
    controller: &Controller,
    width: u16,
) -> (Vec<Line<'static>>, Vec<ItemSpan>) {
    let mut lines = Vec::new();
    let mut spans = Vec::with_capacity(playlist.len());
    let text_width = width.saturating_sub(4).max(1) as usize;

    for (idx, chapter) in playlist.chapters().iter().enumerate() {
        if idx > 0 && chapter.kind == ChapterKind::Question {
            lines.push(Line::from(""));
        }
        let highlight = classify(idx, current, controller.completed());
        let mut style = match highlight {
            Highlight::Completed => Style::default().fg(COMPLETED),
            Highlight::Current => Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            Highlight::Upcoming => Style::default().fg(UPCOMING),
        };
        if chapter.kind == ChapterKind::Question {
            style = style.add_modifier(Modifier::BOLD);
        }

        let top = lines.len() as u16;
        for (row, text) in wrap_text(&chapter.text, text_width).into_iter().enumerate() {
            let marker = match (row, highlight, chapter.kind) {
                (0, Highlight::Current, _) => "▸ ",
                (0, _, ChapterKind::Bullet) => "• ",
                _ => "  ",
            };
            lines.push(Line::from(vec![
                Span::styled(marker, style),
                Span::styled(text, style),
            ]));
        }
        spans.push(ItemSpan {
            top,
            height: lines.len() as u16 - top,
        });
    }
    (lines, spans)
}

fn draw_reading(frame: &mut Frame, area: Rect, controller: &Controller, ui: &mut UiState) {
    let problem = controller.error_message().or(controller.notice());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(if problem.is_some() {
            [Constraint::Min(3), Constraint::Length(5)]
        } else {
            [Constraint::Min(3), Constraint::Length(0)]
        })
        .split(area);

    let block = panel_block("Transcript");
    let inner = block.inner(chunks[0]);
    frame.render_widget(block, chunks[0]);

    let playlist = controller.playlist();
    if playlist.is_empty() {
        let empty = Paragraph::new("This letter has no chapters to narrate.")
            .style(Style::default().fg(MUTED))
            .alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    let current = controller.current_chapter();
    let (lines, spans) = transcript_lines(playlist, current, controller, inner.width);
    let viewport = Viewport {
        height: inner.height,
        reserved_bottom: FADE_ROWS,
    };

    let reading = &mut ui.reading;
    if let Some(offset) =
        reading.sync_to_chapter(current, controller.playthrough(), spans, viewport)
    {
        tracing::trace!(offset, chapter = current, "transcript scrolled to chapter");
    }

    let content_height = lines.len() as u16;
    let offset = reading.sync.offset();
    let transcript = Paragraph::new(lines).scroll((offset, 0));
    frame.render_widget(transcript, inner);

    let fade_area = Rect::new(
        inner.x,
        inner.y + inner.height.saturating_sub(FADE_ROWS),
        inner.width,
        FADE_ROWS.min(inner.height),
    );
    let more_below = offset.saturating_add(viewport.visible_height()) < content_height;
    let fade = Paragraph::new(if more_below { "···" } else { "" })
        .style(Style::default().fg(UPCOMING).bg(Color::Black))
        .alignment(Alignment::Center);
    frame.render_widget(Clear, fade_area);
    frame.render_widget(fade, fade_area);

    if let Some(message) = problem {
        let detail = controller
            .last_error()
            .map(|err| truncate(&err.to_string(), chunks[1].width.saturating_sub(6) as usize))
            .unwrap_or_default();
        let panel = Paragraph::new(vec![
            Line::from(Span::styled(message, error_style())),
            Line::from(Span::styled(detail, Style::default().fg(UPCOMING))),
            Line::from(vec![
                Span::styled(" TEST AUDIO ", pill_inactive()),
                Span::styled(" t   ", Style::default().fg(MUTED)),
                Span::styled(" FORCE RETRY ", pill_active()),
                Span::styled(" r", Style::default().fg(MUTED)),
            ]),
        ])
        .wrap(Wrap { trim: true })
        .block(modal_block("Playback"));
        frame.render_widget(panel, chunks[1]);
    }
}

fn draw_summary(frame: &mut Frame, area: Rect, content: &Content, ui: &mut UiState) {
    let candidate = &content.candidate;
    let total = candidate.summary.split_whitespace().count();
    ui.summary.revealed = ui.summary.revealed.min(total);
    let revealed = reveal_words(&candidate.summary, ui.summary.revealed);

    let mut lines = vec![
        Line::from(Span::styled(
            candidate.name.clone(),
            Style::default()
                .fg(Color::Rgb(230, 235, 242))
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("{} · {}", candidate.designation, candidate.company),
            Style::default().fg(MUTED),
        )),
        Line::from(""),
    ];
    lines.extend(
        revealed
            .split('\n')
            .map(|paragraph| Line::from(paragraph.to_string())),
    );

    let summary = Paragraph::new(lines)
        .style(Style::default().fg(Color::Rgb(230, 230, 230)))
        .wrap(Wrap { trim: true })
        .scroll((ui.summary.scroll, 0))
        .block(modal_block("Summary"));
    frame.render_widget(summary, area);
}

fn draw_too_small(frame: &mut Frame, area: Rect) {
    let text = format!(
        "Terminal too small.\n\nResize to at least {MIN_WIDTH}x{MIN_HEIGHT}.\n\nq quit"
    );
    let popup = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::Rgb(230, 235, 242)));
    frame.render_widget(popup, centered_fixed_rect(area.width, 7, area));
}

fn controls_line(page: Page, controller: &Controller) -> Line<'static> {
    let hint = Style::default().fg(MUTED);
    match page {
        Page::Home => Line::from(vec![
            Span::styled(" SUMMARISE ", pill_inactive()),
            Span::styled(" s  ", hint),
            Span::styled(" READ ME ", pill_active()),
            Span::styled(" Enter", hint),
            Span::styled("   1-9 jump  x share  ↑/↓ scroll  q quit", hint),
        ]),
        Page::Reading => {
            let chapter = match controller.playlist().position(controller.current_chapter()) {
                Some((question, None)) => format!("Q{}", question + 1),
                Some((question, Some(bullet))) => format!("Q{}.{}", question + 1, bullet + 1),
                None => "-".to_string(),
            };
            Line::from(vec![
                Span::styled(
                    format!(" {} ", controller.status_label().to_uppercase()),
                    state_pill(controller.state()),
                ),
                Span::styled(
                    format!(
                        "  {}  {}x  {chapter}",
                        format_clock(controller.position()),
                        controller.playback_rate()
                    ),
                    Style::default().fg(Color::Rgb(230, 235, 242)),
                ),
                Span::styled(
                    "   Space play/pause  ←/→ chapter  f speed  Esc back",
                    hint,
                ),
            ])
        }
        Page::Summary => Line::from(vec![
            Span::styled(" READ ME ", pill_active()),
            Span::styled(" r", hint),
            Span::styled("   Space reveal  ↑/↓ scroll  Esc back  q quit", hint),
        ]),
    }
}

fn state_pill(state: &PlayerState) -> Style {
    match state {
        PlayerState::Playing => pill_active(),
        PlayerState::Completed => Style::default()
            .bg(COMPLETED)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD),
        PlayerState::Errored(_) | PlayerState::Retrying { .. } => Style::default()
            .bg(Color::Rgb(255, 145, 120))
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD),
        PlayerState::Idle | PlayerState::Paused => pill_inactive(),
    }
}

fn panel_block(title: &'static str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(125, 135, 150)))
        .title(title)
}

fn modal_block(title: &'static str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(
            Style::default()
                .fg(Color::Rgb(160, 190, 235))
                .add_modifier(Modifier::BOLD),
        )
        .title(title)
        .padding(Padding::new(2, 2, 0, 0))
}

fn pill_active() -> Style {
    Style::default()
        .bg(ACCENT)
        .fg(Color::Black)
        .add_modifier(Modifier::BOLD)
}

fn pill_inactive() -> Style {
    Style::default()
        .bg(Color::Rgb(72, 82, 96))
        .fg(Color::Rgb(230, 235, 242))
}

fn error_style() -> Style {
    Style::default()
        .fg(Color::Rgb(255, 145, 120))
        .add_modifier(Modifier::BOLD)
}

fn status_style(status: &str) -> Style {
    if status.starts_with("ERROR:") {
        error_style()
    } else if status.starts_with("INFO:") {
        Style::default().fg(Color::Rgb(205, 165, 255))
    } else {
        Style::default().fg(Color::Rgb(230, 235, 242))
    }
}

fn centered_fixed_rect(width: u16, height: u16, area: Rect) -> Rect {
    let clamped_width = width.min(area.width.max(1));
    let clamped_height = height.min(area.height.max(1));
    let x = area.x + area.width.saturating_sub(clamped_width) / 2;
    let y = area.y + area.height.saturating_sub(clamped_height) / 2;
    Rect::new(x, y, clamped_width, clamped_height)
}
