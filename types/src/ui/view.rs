use std::fmt;

/// Top-level screens, addressed by the routes the web client used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum View {
    #[default]
    Home,
    Advisor,
    Recommendations,
    Disclaimer,
}

impl View {
    pub const ALL: [View; 4] = [
        View::Home,
        View::Advisor,
        View::Recommendations,
        View::Disclaimer,
    ];

    #[must_use]
    pub const fn route(self) -> &'static str {
        match self {
            View::Home => "/",
            View::Advisor => "/advisor",
            View::Recommendations => "/recommendations",
            View::Disclaimer => "/disclaimer",
        }
    }

    #[must_use]
    pub fn from_route(route: &str) -> Option<Self> {
        let route = route.trim();
        let route = if route.len() > 1 {
            route.trim_end_matches('/')
        } else {
            route
        };
        Self::ALL.into_iter().find(|view| view.route() == route)
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            View::Home => "Home",
            View::Advisor => "Advisor",
            View::Recommendations => "Recommendations",
            View::Disclaimer => "Disclaimer",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.route())
    }
}

/// Recommendations page layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListMode {
    #[default]
    Cards,
    Timeline,
}

impl ListMode {
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            ListMode::Cards => ListMode::Timeline,
            ListMode::Timeline => ListMode::Cards,
        }
    }
}

/// Which pane receives keystrokes on the recommendations page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    List,
    Chat,
}

/// Rows of the advisor form, top to bottom.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormField {
    #[default]
    Experience,
    Height,
    Budget,
    BikeTypes,
    Count,
}

impl FormField {
    pub const ALL: [FormField; 5] = [
        FormField::Experience,
        FormField::Height,
        FormField::Budget,
        FormField::BikeTypes,
        FormField::Count,
    ];

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    #[must_use]
    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            FormField::Experience => "Experience",
            FormField::Height => "Height",
            FormField::Budget => "Budget",
            FormField::BikeTypes => "Bike types",
            FormField::Count => "Results",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FormField, ListMode, View};

    #[test]
    fn routes_round_trip() {
        for view in View::ALL {
            assert_eq!(View::from_route(view.route()), Some(view));
        }
        assert_eq!(View::from_route("/recommendations/"), Some(View::Recommendations));
        assert_eq!(View::from_route("/nope"), None);
    }

    #[test]
    fn form_fields_wrap() {
        assert_eq!(FormField::Count.next(), FormField::Experience);
        assert_eq!(FormField::Experience.prev(), FormField::Count);
    }

    #[test]
    fn list_mode_toggles() {
        assert_eq!(ListMode::Cards.toggle(), ListMode::Timeline);
        assert_eq!(ListMode::Timeline.toggle(), ListMode::Cards);
    }
}
