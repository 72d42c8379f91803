//! TUI rendering for RideReady using ratatui.

mod cards;
mod chat;
mod format;
mod input;
mod theme;
mod views;

pub use input::{InputPump, apply_event, handle_events};
pub use theme::{Glyphs, Palette, glyphs, palette, spinner_frame, styles};

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Wrap},
};

use rideready_engine::App;
use rideready_types::truncate_with_ellipsis;
use rideready_types::ui::View;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let options = app.options();
    let palette = palette(options);
    let glyphs = glyphs(options);
    let bg_block = Block::default().style(Style::default().bg(palette.bg_dark));
    frame.render_widget(bg_block, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tabs
            Constraint::Min(1),    // View
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_tabs(frame, app, chunks[0], &palette);
    match app.view() {
        View::Home => views::draw_home(frame, app, chunks[1], &palette),
        View::Advisor => views::draw_advisor(frame, app, chunks[1], &palette, &glyphs),
        View::Recommendations => {
            views::draw_recommendations(frame, app, chunks[1], &palette, &glyphs);
        }
        View::Disclaimer => views::draw_disclaimer(frame, chunks[1], &palette),
    }
    draw_status_bar(frame, app, chunks[2], &palette, &glyphs);

    if app.modal().is_some() {
        draw_modal(frame, app, &palette);
    }
}

fn draw_tabs(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let mut spans = vec![Span::styled(" RideReady ", styles::title(palette)), Span::raw(" ")];
    for (i, view) in View::ALL.into_iter().enumerate() {
        let style = if view == app.view() {
            styles::tab_active(palette)
        } else {
            styles::tab_inactive(palette)
        };
        spans.push(Span::styled(format!(" {} {} ", i + 1, view.title()), style));
        spans.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

pub(crate) fn draw_status_bar(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let (status_text, status_style) = if let Some(msg) = app.status() {
        (msg.to_string(), Style::default().fg(palette.warning))
    } else if app.is_running() {
        let spinner = spinner_frame(app.tick_count(), app.options());
        (
            format!("{spinner} Updating recommendations..."),
            Style::default().fg(palette.primary),
        )
    } else {
        match app.health() {
            Some(health) if health.offline_mode => (
                format!(
                    "{} {} {} offline mode {} {} bikes",
                    glyphs.offline,
                    app.server_url(),
                    glyphs.separator,
                    glyphs.separator,
                    health.whitelist.bikes
                ),
                Style::default().fg(palette.warning),
            ),
            Some(health) => (
                format!(
                    "{} {} {} {} bikes",
                    glyphs.online,
                    app.server_url(),
                    glyphs.separator,
                    health.whitelist.bikes
                ),
                Style::default().fg(palette.success),
            ),
            None => (
                format!("{} {} unreachable", glyphs.offline, app.server_url()),
                Style::default().fg(palette.error),
            ),
        }
    };

    let width = area.width.saturating_sub(2) as usize;
    let status = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(truncate_with_ellipsis(&status_text, width), status_style),
    ]));
    frame.render_widget(status, area);
}

fn draw_modal(frame: &mut Frame, app: &App, palette: &Palette) {
    let Some(modal) = app.modal() else {
        return;
    };
    let area = frame.area();
    let width = 64.min(area.width.saturating_sub(4));
    let inner_width = width.saturating_sub(4).max(1);

    let mut lines: Vec<Line> = modal
        .body()
        .lines()
        .map(|line| {
            Line::from(Span::styled(
                line.to_string(),
                Style::default().fg(palette.text_primary),
            ))
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(modal.hint(), styles::key_highlight(palette))));

    let height = (wrapped_line_count(&lines, inner_width) + 4).min(area.height);
    let modal_area = Rect {
        x: area.x + (area.width.saturating_sub(width) / 2),
        y: area.y + (area.height.saturating_sub(height) / 2),
        width,
        height,
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.warning))
        .style(Style::default().bg(palette.bg_popup))
        .padding(Padding::horizontal(1))
        .title(Span::styled(format!(" {} ", modal.title()), styles::title(palette)));

    frame.render_widget(Clear, modal_area);
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        modal_area,
    );
}

pub(crate) fn wrapped_line_count(lines: &[Line], width: u16) -> u16 {
    let width = width.max(1) as usize;
    let mut total: u16 = 0;

    for line in lines {
        let line_width = line.width();
        let rows = if line_width == 0 {
            1
        } else {
            ((line_width - 1) / width) + 1
        };
        total = total.saturating_add(rows as u16);
    }

    total
}

#[cfg(test)]
mod tests;
