//! Outbound links and modal dismissal.

use rideready_core::{LinkDecision, gate};
use rideready_types::ui::{ListMode, Modal};

use super::App;

impl App {
    /// Open a manufacturer link, holding the first one behind a warning.
    pub fn request_open_link(&mut self, url: &str) {
        match gate::outbound_link(&self.session, url) {
            LinkDecision::Intercept(url) => {
                tracing::debug!(url, "Outbound link intercepted");
                self.modal = Some(Modal::OutboundLink { url });
            }
            LinkDecision::Open(url) => {
                self.open_link(&url);
            }
        }
    }

    /// The official link of the selected card, if any.
    #[must_use]
    pub fn selected_link(&self) -> Option<String> {
        if self.list_mode != ListMode::Cards {
            return None;
        }
        self.history
            .visible_items()
            .get(self.selected)
            .and_then(|item| item.official_link())
            .map(ToString::to_string)
    }

    pub fn open_selected_link(&mut self) {
        match self.selected_link() {
            Some(url) => self.request_open_link(&url),
            None => self.status = Some("This bike has no manufacturer link.".to_string()),
        }
    }

    /// Accept the outbound warning: the link opens and later ones skip it.
    ///
    /// The warning only counts as accepted once a link actually opened.
    pub fn confirm_open_link(&mut self) {
        let Some(Modal::OutboundLink { url }) = self.modal.take() else {
            return;
        };
        if self.open_link(&url)
            && let Err(e) = gate::accept_outbound_warning(&mut self.session)
        {
            tracing::warn!("Failed to record outbound warning: {e}");
        }
        self.after_modal_closed();
    }

    pub fn cancel_open_link(&mut self) {
        if matches!(self.modal, Some(Modal::OutboundLink { .. })) {
            self.modal = None;
            self.after_modal_closed();
        }
    }

    pub fn dismiss_abs_warning(&mut self) {
        if matches!(self.modal, Some(Modal::AbsWarning)) {
            self.modal = None;
            self.after_modal_closed();
        }
    }

    /// Close whatever modal is open without accepting it.
    pub fn dismiss_modal(&mut self) {
        match self.modal {
            Some(Modal::AbsWarning) => self.dismiss_abs_warning(),
            Some(Modal::OutboundLink { .. }) => self.cancel_open_link(),
            None => {}
        }
    }

    fn after_modal_closed(&mut self) {
        if self.abs_check_pending {
            self.check_abs_warning();
        }
    }

    fn open_link(&mut self, url: &str) -> bool {
        match self.opener.open(url) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(url, "Failed to open link: {e}");
                self.status = Some(format!("Could not open link: {e}"));
                false
            }
        }
    }
}
