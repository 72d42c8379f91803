//! Chat panel: transcript plus the input line.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

use rideready_core::ChatEntry;
use rideready_engine::App;
use rideready_types::sanitize_terminal_text;
use rideready_types::ui::Focus;

use crate::cards::compact_card_line;
use crate::theme::{Glyphs, Palette, spinner_frame, styles};
use crate::wrapped_line_count;

pub(crate) fn transcript_lines(
    entries: &[ChatEntry],
    width: usize,
    palette: &Palette,
    glyphs: &Glyphs,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(""));
        }
        match entry {
            ChatEntry::User(text) => {
                lines.push(Line::from(vec![
                    Span::styled(format!("{} ", glyphs.user), styles::user_name(palette)),
                    Span::styled(
                        sanitize_terminal_text(text).into_owned(),
                        Style::default().fg(palette.text_primary),
                    ),
                ]));
            }
            ChatEntry::Assistant { text, cards } => {
                for (n, part) in text.lines().enumerate() {
                    let prefix = if n == 0 {
                        format!("{} ", glyphs.assistant)
                    } else {
                        "  ".to_string()
                    };
                    lines.push(Line::from(vec![
                        Span::styled(prefix, styles::assistant_name(palette)),
                        Span::styled(part.to_string(), Style::default().fg(palette.text_primary)),
                    ]));
                }
                for item in cards {
                    lines.push(compact_card_line(item, width, palette, glyphs));
                }
            }
            ChatEntry::Status(text) => {
                lines.push(Line::from(Span::styled(
                    format!("{} {text}", glyphs.status),
                    Style::default().fg(palette.text_muted),
                )));
            }
            ChatEntry::Error(text) => {
                lines.push(Line::from(Span::styled(
                    format!("{} {text}", glyphs.error),
                    Style::default().fg(palette.error),
                )));
            }
        }
    }
    lines
}

pub(crate) fn draw_chat_panel(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.bg_border))
        .title(Span::styled(" Ask the advisor ", styles::title(palette)));
    let inner = block.inner(chunks[0]);

    let mut lines = transcript_lines(
        app.transcript().entries(),
        inner.width as usize,
        palette,
        glyphs,
    );
    if app.chat_busy() {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            format!("{} thinking...", spinner_frame(app.tick_count(), app.options())),
            Style::default().fg(palette.primary),
        )));
    }

    // Stick to the bottom.
    let total = wrapped_line_count(&lines, inner.width);
    let scroll = total.saturating_sub(inner.height);
    let transcript = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(transcript, chunks[0]);

    draw_chat_input(frame, app, chunks[1], palette);
}

fn draw_chat_input(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let focused = app.focus() == Focus::Chat;
    let border = if focused {
        Style::default().fg(palette.success)
    } else {
        Style::default().fg(palette.text_muted)
    };
    let prompt = if app.options().ascii_only { "> " } else { "❯ " };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border);
    let inner = block.inner(area);

    // Show the tail of long input.
    let text = app.chat_input();
    let room = (inner.width as usize).saturating_sub(prompt.width() + 1);
    let mut shown = text;
    while shown.width() > room {
        let mut chars = shown.chars();
        chars.next();
        shown = chars.as_str();
    }

    let line = if text.is_empty() && !focused {
        Line::from(vec![
            Span::styled(prompt, Style::default().fg(palette.text_muted)),
            Span::styled("/", styles::key_highlight(palette)),
            Span::styled(" to chat", styles::key_hint(palette)),
        ])
    } else {
        Line::from(vec![
            Span::styled(prompt, Style::default().fg(palette.success)),
            Span::styled(shown.to_string(), Style::default().fg(palette.text_primary)),
        ])
    };
    frame.render_widget(Paragraph::new(line).block(block), area);

    if focused {
        let x = inner.x + (prompt.width() + shown.width()) as u16;
        frame.set_cursor_position((x.min(inner.right().saturating_sub(1)), inner.y));
    }
}
