//! Blocking overlays. At most one is open at a time.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    /// Shown once per session after a run that includes a bike without ABS.
    AbsWarning,
    /// Intercepts the first outbound manufacturer link of a session.
    OutboundLink { url: String },
}

impl Modal {
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Modal::AbsWarning => "No ABS",
            Modal::OutboundLink { .. } => "Leaving RideReady",
        }
    }

    #[must_use]
    pub fn body(&self) -> String {
        match self {
            Modal::AbsWarning => "At least one recommended bike is listed without ABS. \
                Anti-lock brakes help new riders avoid lockups in panic stops; \
                check the spec sheet before you buy."
                .to_string(),
            Modal::OutboundLink { url } => format!(
                "You are about to open a manufacturer site:\n{url}\n\n\
                 Prices there may differ from the MSRP shown here."
            ),
        }
    }

    #[must_use]
    pub const fn hint(&self) -> &'static str {
        match self {
            Modal::AbsWarning => "Enter/Esc: dismiss",
            Modal::OutboundLink { .. } => "y: open link  n/Esc: cancel",
        }
    }
}
