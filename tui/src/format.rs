use rideready_types::{RecommendationItem, format_usd, single_line};

/// "Yamaha · sportbike · 321 cc"
pub(crate) fn headline(item: &RecommendationItem, separator: &str) -> String {
    let mut parts: Vec<String> = Vec::new();
    if let Some(mfr) = item.manufacturer.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        parts.push(clean(mfr));
    }
    if let Some(category) = item.category.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        parts.push(clean(category));
    }
    if let Some(cc) = item.engine_cc {
        parts.push(format!("{cc} cc"));
    }
    parts.join(&format!(" {separator} "))
}

/// Seat height, weight, performance and price, omitting unknowns.
pub(crate) fn spec_line(item: &RecommendationItem, separator: &str) -> String {
    let mut parts = Vec::new();
    if let Some(mm) = item.seat_height_mm {
        parts.push(format!("seat {mm} mm"));
    }
    if let Some(kg) = item.wet_weight_kg {
        parts.push(format!("{kg} kg wet"));
    }
    if let Some(mph) = item.top_speed_mph {
        parts.push(format!("{mph} mph top"));
    }
    if let Some(secs) = item.zero_to_sixty_s {
        parts.push(format!("0-60 {secs:.1}s"));
    }
    if let Some(msrp) = item.msrp_usd {
        parts.push(format!("MSRP {}", format_usd(msrp)));
    }
    parts.join(&format!(" {separator} "))
}

/// Server text made safe for a single terminal line.
pub(crate) fn clean(text: &str) -> String {
    single_line(text)
}

#[cfg(test)]
mod tests {
    use super::{headline, spec_line};
    use rideready_types::RecommendationItem;

    #[test]
    fn unknown_fields_are_omitted() {
        let item = RecommendationItem {
            name: "Rebel 500".to_string(),
            manufacturer: Some("Honda".to_string()),
            engine_cc: Some(471),
            seat_height_mm: Some(690),
            ..RecommendationItem::default()
        };
        assert_eq!(headline(&item, "|"), "Honda | 471 cc");
        assert_eq!(spec_line(&item, "|"), "seat 690 mm");
    }

    #[test]
    fn escape_sequences_never_reach_the_terminal() {
        let item = RecommendationItem {
            manufacturer: Some("Bad\x1b[31mCo\nLine".to_string()),
            ..RecommendationItem::default()
        };
        let line = headline(&item, "|");
        assert!(!line.contains('\x1b'));
        assert!(!line.contains('\n'));
    }
}
