//! Recommendation cards, skeletons and timeline rows.

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use rideready_types::{RecommendationItem, Snapshot, truncate_with_ellipsis};

use crate::format::{clean, headline, spec_line};
use crate::theme::{Glyphs, Palette, styles};

/// Rows per full card, including the blank spacer.
pub(crate) const CARD_HEIGHT: usize = 7;

fn abs_span<'a>(item: &RecommendationItem, palette: &Palette, glyphs: &Glyphs) -> Span<'a> {
    match item.abs {
        Some(true) => Span::styled(glyphs.abs_yes, Style::default().fg(palette.success)),
        Some(false) => Span::styled(
            glyphs.abs_no,
            Style::default()
                .fg(palette.warning)
                .add_modifier(Modifier::BOLD),
        ),
        None => Span::styled(glyphs.abs_unknown, Style::default().fg(palette.text_muted)),
    }
}

pub(crate) fn card_lines(
    item: &RecommendationItem,
    selected: bool,
    width: usize,
    palette: &Palette,
    glyphs: &Glyphs,
) -> Vec<Line<'static>> {
    let width = width.max(12);
    let pointer = if selected { glyphs.selected } else { " " };
    let name = truncate_with_ellipsis(&clean(item.display_name()), width.saturating_sub(16));
    let mut title = vec![
        Span::styled(format!("{pointer} "), Style::default().fg(palette.accent)),
        Span::styled(name, styles::title(palette)),
        Span::raw("  "),
        abs_span(item, palette, glyphs),
    ];
    if item.external {
        title.push(Span::styled(
            "  (suggested)",
            Style::default().fg(palette.text_muted),
        ));
    }

    let muted = Style::default().fg(palette.text_secondary);
    let mut lines = vec![
        Line::from(title),
        Line::from(Span::styled(
            format!("  {}", truncate_with_ellipsis(&headline(item, glyphs.separator), width - 2)),
            muted,
        )),
        Line::from(Span::styled(
            format!("  {}", truncate_with_ellipsis(&spec_line(item, glyphs.separator), width - 2)),
            muted,
        )),
    ];

    let reasons = item.shown_reasons();
    for slot in 0..2 {
        let text = reasons
            .get(slot)
            .map(|r| format!("  {} {}", glyphs.bullet, clean(r)))
            .unwrap_or_default();
        lines.push(Line::from(Span::styled(
            truncate_with_ellipsis(&text, width),
            Style::default().fg(palette.text_primary),
        )));
    }
    if reasons.len() > 2 {
        // Third reason shares the second row so cards keep a fixed height.
        if let Some(line) = lines.last_mut() {
            let third = format!("  {} {}", glyphs.bullet, clean(&reasons[2]));
            line.spans.push(Span::styled(
                truncate_with_ellipsis(&third, width.saturating_sub(line.width())),
                Style::default().fg(palette.text_primary),
            ));
        }
    }

    lines.push(Line::from(Span::styled(
        format!("  {}", truncate_with_ellipsis(item.image_or_placeholder(), width - 2)),
        Style::default().fg(palette.link),
    )));
    lines.push(Line::from(""));

    if selected {
        for line in &mut lines {
            line.style = styles::selected_row(palette);
        }
    }
    lines
}

/// Placeholder rows shown for each of the k cards of an in-flight run.
pub(crate) fn skeleton_lines(k: usize, width: usize, glyphs: &Glyphs, palette: &Palette) -> Vec<Line<'static>> {
    let style = Style::default().fg(palette.bg_border);
    let bar = |len: usize| -> String { std::iter::repeat_n(glyphs.skeleton, len).collect() };
    let width = width.max(8);

    let mut lines = Vec::with_capacity(k * CARD_HEIGHT);
    for _ in 0..k {
        lines.push(Line::from(Span::styled(format!("  {}", bar(width / 2)), style)));
        for fraction in [3, 2, 2, 3] {
            lines.push(Line::from(Span::styled(format!("  {}", bar(width * fraction / 5)), style)));
        }
        lines.push(Line::from(Span::styled(format!("  {}", bar(width / 3)), style)));
        lines.push(Line::from(""));
    }
    lines
}

/// One line per snapshot: time, profile summary, item names.
pub(crate) fn timeline_lines(
    timeline: &[Snapshot],
    selected: usize,
    width: usize,
    palette: &Palette,
    glyphs: &Glyphs,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (i, snapshot) in timeline.iter().enumerate() {
        let is_selected = i == selected;
        let pointer = if is_selected { glyphs.selected } else { " " };
        let when = snapshot.created_at().format("%H:%M:%S").to_string();
        let mut header = Line::from(vec![
            Span::styled(format!("{pointer} "), Style::default().fg(palette.accent)),
            Span::styled(when, Style::default().fg(palette.accent)),
            Span::raw("  "),
            Span::styled(
                truncate_with_ellipsis(&snapshot.profile().summary(), width.saturating_sub(14)),
                Style::default().fg(palette.text_secondary),
            ),
        ]);
        let names = snapshot
            .items()
            .iter()
            .map(|item| clean(item.display_name()))
            .collect::<Vec<_>>()
            .join(", ");
        let names = if names.is_empty() {
            "(no matches)".to_string()
        } else {
            names
        };
        let mut body = Line::from(Span::styled(
            format!("    {}", truncate_with_ellipsis(&names, width.saturating_sub(4))),
            Style::default().fg(palette.text_primary),
        ));
        if is_selected {
            header.style = styles::selected_row(palette);
            body.style = styles::selected_row(palette);
        }
        lines.push(header);
        lines.push(body);
    }
    lines
}

/// Compact single-line card echoed under an assistant reply.
pub(crate) fn compact_card_line(
    item: &RecommendationItem,
    width: usize,
    palette: &Palette,
    glyphs: &Glyphs,
) -> Line<'static> {
    let text = format!(
        "  {} {} {} {}",
        glyphs.bullet,
        clean(item.display_name()),
        glyphs.separator,
        headline(item, glyphs.separator)
    );
    Line::from(vec![
        Span::styled(
            truncate_with_ellipsis(&text, width.saturating_sub(10)),
            Style::default().fg(palette.text_secondary),
        ),
        Span::raw(" "),
        abs_span(item, palette, glyphs),
    ])
}

#[cfg(test)]
mod tests {
    use super::{CARD_HEIGHT, card_lines, skeleton_lines};
    use crate::theme::{glyphs, palette};
    use rideready_types::RecommendationItem;
    use rideready_types::ui::UiOptions;

    fn item(reasons: usize) -> RecommendationItem {
        RecommendationItem {
            id: Some("yamaha_r3".to_string()),
            name: "YZF-R3".to_string(),
            abs: Some(false),
            reasons: (0..reasons).map(|i| format!("reason {i}")).collect(),
            ..RecommendationItem::default()
        }
    }

    #[test]
    fn cards_have_fixed_height() {
        let options = UiOptions::default();
        for reasons in [0, 1, 3, 5] {
            let lines = card_lines(&item(reasons), false, 60, &palette(options), &glyphs(options));
            assert_eq!(lines.len(), CARD_HEIGHT);
        }
    }

    #[test]
    fn skeletons_match_card_height() {
        let options = UiOptions::default();
        let lines = skeleton_lines(4, 40, &glyphs(options), &palette(options));
        assert_eq!(lines.len(), 4 * CARD_HEIGHT);
    }

    #[test]
    fn card_shows_placeholder_image_when_unresolved() {
        let options = UiOptions::default();
        let lines = card_lines(&item(0), false, 80, &palette(options), &glyphs(options));
        let image_row: String = lines[5].spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(image_row.contains("motorcycle_ride.jpg"));
    }
}
