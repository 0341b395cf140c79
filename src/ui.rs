pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;
const FORM_MAX_WIDTH: u16 = 72;

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

/// Draws the screen for the current phase, plus the exit prompt if open.
pub fn draw(app: &App, f: &mut Frame) {
    let area = f.area();
    screen::current_screen(app).render(app, area, f.buffer_mut());

    if app.confirm_exit {
        render_exit_prompt(area, f.buffer_mut());
    }
}

/// A `width` x `height` rect centred in `area`, clamped to fit.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Rows the text needs once wrapped to `width` columns, capped at `u16::MAX`.
fn wrapped_rows(text: &str, width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let rows: usize = text
        .split('\n')
        .map(|line| line.width().div_ceil(width).max(1))
        .sum();
    u16::try_from(rows).unwrap_or(u16::MAX)
}

pub fn render_input(app: &App, area: Rect, buf: &mut Buffer) {
    let form = centered_rect(
        FORM_MAX_WIDTH,
        area.height.saturating_sub(VERTICAL_MARGIN * 2),
        area,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title
            Constraint::Length(1), // subtitle
            Constraint::Length(1), // padding
            Constraint::Min(3),    // word box
            Constraint::Length(2), // instructions
            Constraint::Length(1), // validation message
            Constraint::Length(1), // legend
        ])
        .split(form);

    Paragraph::new(Span::styled("WAT SIMULATOR", bold()))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    Paragraph::new(Span::styled("Word Association Test Practice", dim()))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(" Enter Words ");
    let inner = block.inner(chunks[3]);

    let text = if app.input.is_empty() {
        Paragraph::new(vec![
            Line::styled("One per line or comma separated:", dim()),
            Line::styled("1. Book", dim()),
            Line::styled("2. Study", dim()),
            Line::styled("Or: Book, Study, Education", dim()),
        ])
    } else {
        // keep the end of the text, where typing happens, in view
        let with_cursor = format!("{}▏", app.input);
        let rows = wrapped_rows(&with_cursor, inner.width);
        let scroll = rows.saturating_sub(inner.height);
        Paragraph::new(with_cursor)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0))
    };
    text.block(block).render(chunks[3], buf);

    Paragraph::new(Span::styled(
        "Countdown 3, 2, 1, START, then each word shows for 15 seconds with a beep between words. Esc exits during the test.",
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .wrap(Wrap { trim: true })
    .render(chunks[4], buf);

    if let Some(error) = &app.error {
        Paragraph::new(Span::styled(
            error.as_str(),
            Style::default().patch(bold()).fg(Color::Red),
        ))
        .alignment(Alignment::Center)
        .render(chunks[5], buf);
    }

    Paragraph::new(Span::styled("(ctrl+s / f5) start   (esc)ape", dim()))
        .alignment(Alignment::Center)
        .render(chunks[6], buf);
}

pub fn render_countdown(app: &App, area: Rect, buf: &mut Buffer) {
    let remaining = app.controller.session().countdown_remaining;

    let lines = vec![
        Line::styled("WAT will begin in", dim()),
        Line::raw(""),
        Line::styled(remaining.to_string(), bold()),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(centered_rect(area.width, 3, area), buf);
}

pub fn render_running(app: &App, area: Rect, buf: &mut Buffer) {
    let session = app.controller.session();

    if app.showing_start() {
        Paragraph::new(Span::styled("START", bold()))
            .alignment(Alignment::Center)
            .render(centered_rect(area.width, 1, area), buf);
        return;
    }

    let word = session.current_word().unwrap_or_default().to_uppercase();
    let max_width = area.width.saturating_sub(HORIZONTAL_MARGIN * 2);
    let box_width = (word.width() as u16)
        .saturating_add(8)
        .clamp(20u16.min(max_width.max(1)), max_width.max(1));
    let rows = wrapped_rows(&word, box_width.saturating_sub(2));

    Paragraph::new(Span::styled(word, bold()))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Thick)
                .border_style(dim())
                .padding(ratatui::widgets::Padding::vertical(1)),
        )
        .render(centered_rect(box_width, rows.saturating_add(4), area), buf);

    let (position, total) = session.progress();
    let top = Rect { height: 1, ..area };
    Paragraph::new(Span::styled(format!("{position} / {total}"), dim())).render(top, buf);
    Paragraph::new(Span::styled(format!("{}s", session.time_remaining), dim()))
        .alignment(Alignment::Right)
        .render(top, buf);

    let bottom = Rect {
        y: area.bottom().saturating_sub(1),
        height: area.height.min(1),
        ..area
    };
    Paragraph::new(Span::styled("ESC to exit", dim()))
        .alignment(Alignment::Right)
        .render(bottom, buf);
}

pub fn render_completed(app: &App, area: Rect, buf: &mut Buffer) {
    let count = app.controller.session().words.len();
    let plural = if count == 1 { "" } else { "s" };

    let lines = vec![
        Line::styled("✓", Style::default().patch(bold()).fg(Color::Green)),
        Line::raw(""),
        Line::styled("SESSION COMPLETED", bold()),
        Line::raw(""),
        Line::raw(format!("{count} word{plural} completed")),
        Line::styled("JAI HIND 🇮🇳", bold()),
        Line::raw(""),
        Line::styled("(enter) new session   (esc)ape", dim()),
    ];
    let height = lines.len() as u16 + 2;

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        )
        .render(centered_rect(48, height, area), buf);
}

fn render_exit_prompt(area: Rect, buf: &mut Buffer) {
    let popup = centered_rect(50, 5, area);
    Clear.render(popup, buf);

    Paragraph::new(vec![
        Line::styled("Are you sure you want to exit the session?", bold()),
        Line::raw(""),
        Line::styled("(y)es   (n)o", dim()),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    )
    .render(popup, buf);
}
