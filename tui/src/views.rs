//! One draw function per view.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};

use rideready_engine::App;
use rideready_types::ui::{FormField, ListMode};
use rideready_types::{EMPTY_HISTORY_MESSAGE, KNOWN_BIKE_TYPES, format_usd};

use crate::cards::{CARD_HEIGHT, card_lines, skeleton_lines, timeline_lines};
use crate::chat::draw_chat_panel;
use crate::theme::{Glyphs, Palette, styles};

const CHAT_PANEL_MIN_WIDTH: u16 = 100;

fn panel<'a>(title: &'a str, palette: &Palette) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.bg_border))
        .title(Span::styled(format!(" {title} "), styles::title(palette)))
}

fn key(k: &'static str, label: &'static str, palette: &Palette) -> [Span<'static>; 2] {
    [
        Span::styled(k, styles::key_highlight(palette)),
        Span::styled(label, styles::key_hint(palette)),
    ]
}

pub(crate) fn draw_home(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let text = Style::default().fg(palette.text_primary);
    let mut lines = vec![
        Line::from(Span::styled(
            "Find a first motorcycle that fits you.",
            styles::title(palette),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Tell RideReady your experience, height, budget and the styles you like.",
            text,
        )),
        Line::from(Span::styled(
            "You'll get a short list of beginner-friendly bikes, and you can refine it by chatting.",
            text,
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("Current profile: {}", app.profile().summary()),
            Style::default().fg(palette.text_secondary),
        )),
        Line::from(""),
    ];
    let mut hint = Vec::new();
    hint.extend(key("Enter", " start  ", palette));
    hint.extend(key("3", " results  ", palette));
    hint.extend(key("4", " disclaimer  ", palette));
    hint.extend(key("q", " quit", palette));
    lines.push(Line::from(hint));

    let body = Paragraph::new(lines)
        .block(panel("RideReady", palette))
        .wrap(Wrap { trim: true });
    frame.render_widget(body, area);
}

fn form_value(app: &App, field: FormField, glyphs: &Glyphs, palette: &Palette) -> Vec<Span<'static>> {
    let form = app.form();
    let draft = form.draft();
    let value = Style::default().fg(palette.text_primary);
    match field {
        FormField::Experience => vec![Span::styled(draft.experience().label().to_string(), value)],
        FormField::Height => vec![Span::styled(format!("{} cm", draft.height_cm()), value)],
        FormField::Budget => vec![Span::styled(format_usd(draft.budget_usd()), value)],
        FormField::Count => vec![Span::styled(draft.k().to_string(), value)],
        FormField::BikeTypes => {
            let on_field = form.field() == FormField::BikeTypes;
            let mut spans = Vec::new();
            for (i, tag) in KNOWN_BIKE_TYPES.iter().enumerate() {
                let selected = draft.bike_types().contains(*tag);
                let mark = if selected { glyphs.chip_on } else { glyphs.chip_off };
                let mut style = if selected {
                    Style::default().fg(palette.accent)
                } else {
                    Style::default().fg(palette.text_muted)
                };
                if on_field && i == form.type_cursor() {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                spans.push(Span::styled(format!("{mark} {tag}"), style));
                spans.push(Span::raw("  "));
            }
            spans
        }
    }
}

pub(crate) fn draw_advisor(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let mut lines = vec![Line::from("")];
    for field in FormField::ALL {
        let active = app.form().field() == field;
        let pointer = if active { glyphs.selected } else { " " };
        let label_style = if active {
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.text_secondary)
        };
        let mut spans = vec![
            Span::styled(format!(" {pointer} "), Style::default().fg(palette.accent)),
            Span::styled(format!("{:<14}", field.label()), label_style),
        ];
        spans.extend(form_value(app, field, glyphs, palette));
        let mut line = Line::from(spans);
        if active {
            line.style = styles::selected_row(palette);
        }
        lines.push(line);
        lines.push(Line::from(""));
    }

    if app.form().draft().bike_types().is_empty() {
        lines.push(Line::from(Span::styled(
            "   No styles selected: any type is considered.",
            Style::default().fg(palette.text_muted),
        )));
        lines.push(Line::from(""));
    }

    let mut hint = vec![Span::raw(" ")];
    hint.extend(key("Up/Down", " field  ", palette));
    hint.extend(key("Left/Right", " adjust  ", palette));
    hint.extend(key("Space", " toggle style  ", palette));
    hint.extend(key("Enter", " get recommendations  ", palette));
    hint.extend(key("Esc", " home", palette));
    lines.push(Line::from(hint));

    let body = Paragraph::new(lines).block(panel("Your profile", palette));
    frame.render_widget(body, area);
}

pub(crate) fn draw_recommendations(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let chunks = if area.width >= CHAT_PANEL_MIN_WIDTH {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
            .split(area)
    } else {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(8), Constraint::Length(12)])
            .split(area)
    };

    draw_list(frame, app, chunks[0], palette, glyphs);
    draw_chat_panel(frame, app, chunks[1], palette, glyphs);
}

fn draw_list(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let title = match app.list_mode() {
        ListMode::Cards => "Recommendations",
        ListMode::Timeline => "Timeline",
    };
    let block = panel(title, palette);
    let inner = block.inner(area);
    let width = inner.width as usize;

    let mut lines: Vec<Line> = Vec::new();
    if let Some(error) = app.list_error() {
        lines.push(Line::from(Span::styled(
            format!(" {} {error}", glyphs.error),
            Style::default().fg(palette.error),
        )));
        lines.push(Line::from(""));
    }

    // Skeleton rows sit above any previous results.
    let mut offset_rows = lines.len();
    if let Some(k) = app.pending_k() {
        let skeletons = skeleton_lines(k, width.saturating_sub(4), glyphs, palette);
        offset_rows += skeletons.len();
        lines.extend(skeletons);
    }

    let (body, selected_top, selected_height) = match app.list_mode() {
        ListMode::Cards => {
            let items = app.visible_items();
            let mut body = Vec::with_capacity(items.len() * CARD_HEIGHT);
            for (i, item) in items.iter().enumerate() {
                body.extend(card_lines(item, i == app.selected(), width, palette, glyphs));
            }
            (body, app.selected() * CARD_HEIGHT, CARD_HEIGHT)
        }
        ListMode::Timeline => (
            timeline_lines(app.timeline(), app.selected(), width, palette, glyphs),
            app.selected() * 2,
            2,
        ),
    };

    if body.is_empty() && app.pending_k().is_none() {
        lines.push(Line::from(Span::styled(
            format!(" {EMPTY_HISTORY_MESSAGE}"),
            Style::default().fg(palette.text_muted),
        )));
    }
    lines.extend(body);

    let mut hint = vec![Span::raw(" ")];
    hint.extend(key("Tab", " cards/timeline  ", palette));
    hint.extend(key("r", " refresh  ", palette));
    hint.extend(key("c", " clear  ", palette));
    if app.list_mode() == ListMode::Cards {
        hint.extend(key("o", " open site  ", palette));
    }
    hint.extend(key("/", " chat", palette));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    let view_height = chunks[0].height as usize;
    let selected_bottom = offset_rows + selected_top + selected_height;
    let scroll = selected_bottom.saturating_sub(view_height);

    frame.render_widget(block, area);
    frame.render_widget(
        Paragraph::new(lines).scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0)),
        chunks[0],
    );
    frame.render_widget(Paragraph::new(Line::from(hint)), chunks[1]);
}

pub(crate) fn draw_disclaimer(frame: &mut Frame, area: Rect, palette: &Palette) {
    let text = Style::default().fg(palette.text_primary);
    let lines = vec![
        Line::from(Span::styled("Before you ride", styles::title(palette))),
        Line::from(""),
        Line::from(Span::styled(
            "RideReady suggestions are informational only. Specs and prices come from \
             public sources and may be out of date; MSRP excludes fees, taxes and dealer markup.",
            text,
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Take a certified rider training course, wear proper gear, and sit on any bike \
             before you buy it. Bikes without ABS are harder to stop safely for new riders.",
            text,
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Esc", styles::key_highlight(palette)),
            Span::styled(" back", styles::key_hint(palette)),
        ]),
    ];
    let body = Paragraph::new(lines)
        .block(panel("Disclaimer", palette))
        .wrap(Wrap { trim: true });
    frame.render_widget(body, area);
}
