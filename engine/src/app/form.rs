//! Advisor form editing.

use rideready_types::ui::{FormField, View};
use rideready_types::{KNOWN_BIKE_TYPES, Profile};

use super::App;

const HEIGHT_STEP: i32 = 1;
const BUDGET_STEP: i32 = 250;

/// The advisor form: a draft profile plus cursor state.
///
/// The draft is only committed on submit; navigating away discards it.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    draft: Profile,
    field: FormField,
    type_cursor: usize,
}

impl FormState {
    #[must_use]
    pub fn new(profile: Profile) -> Self {
        Self {
            draft: profile,
            field: FormField::Experience,
            type_cursor: 0,
        }
    }

    #[must_use]
    pub fn draft(&self) -> &Profile {
        &self.draft
    }

    #[must_use]
    pub fn field(&self) -> FormField {
        self.field
    }

    /// Index into [`KNOWN_BIKE_TYPES`] under the cursor.
    #[must_use]
    pub fn type_cursor(&self) -> usize {
        self.type_cursor
    }

    pub(crate) fn reset_draft(&mut self, profile: Profile) {
        self.draft = profile;
    }

    fn adjust(&mut self, delta: i32) {
        let draft = &mut self.draft;
        match self.field {
            FormField::Experience => draft.set_experience(draft.experience().toggle()),
            FormField::Height => {
                draft.set_height_cm(draft.height_cm().saturating_add_signed(delta * HEIGHT_STEP));
            }
            FormField::Budget => {
                draft.set_budget_usd(draft.budget_usd().saturating_add_signed(delta * BUDGET_STEP));
            }
            FormField::BikeTypes => {
                let last = KNOWN_BIKE_TYPES.len() - 1;
                self.type_cursor = if delta < 0 {
                    self.type_cursor.saturating_sub(1)
                } else {
                    (self.type_cursor + 1).min(last)
                };
            }
            FormField::Count => draft.set_k(draft.k().saturating_add_signed(delta)),
        }
    }

    fn toggle_type(&mut self) {
        if self.field == FormField::BikeTypes
            && let Some(tag) = KNOWN_BIKE_TYPES.get(self.type_cursor)
        {
            self.draft.toggle_bike_type(tag);
        }
    }
}

impl App {
    pub fn form_next_field(&mut self) {
        self.form.field = self.form.field.next();
    }

    pub fn form_prev_field(&mut self) {
        self.form.field = self.form.field.prev();
    }

    pub fn form_increment(&mut self) {
        self.form.adjust(1);
    }

    pub fn form_decrement(&mut self) {
        self.form.adjust(-1);
    }

    pub fn form_toggle_type(&mut self) {
        self.form.toggle_type();
    }

    /// Commit the draft, persist it, and kick off a run on the results view.
    pub fn submit_profile(&mut self) {
        self.profile = self.form.draft.clone();
        self.persist_profile();
        tracing::info!(profile = %self.profile.summary(), "Profile submitted");
        self.navigate(View::Recommendations);
        self.start_run();
    }
}

#[cfg(test)]
mod tests {
    use super::FormState;
    use rideready_types::ui::FormField;
    use rideready_types::{Experience, KNOWN_BIKE_TYPES, Profile};

    #[test]
    fn adjust_clamps_through_profile_setters() {
        let mut form = FormState::new(Profile::default());
        form.field = FormField::Count;
        for _ in 0..20 {
            form.adjust(1);
        }
        assert_eq!(form.draft().k(), 6);
        for _ in 0..20 {
            form.adjust(-1);
        }
        assert_eq!(form.draft().k(), 1);

        form.field = FormField::Budget;
        for _ in 0..200 {
            form.adjust(-1);
        }
        assert_eq!(form.draft().budget_usd(), 1_000);
    }

    #[test]
    fn experience_toggles_and_types_toggle_under_cursor() {
        let mut form = FormState::new(Profile::default());
        form.adjust(1);
        assert_eq!(form.draft().experience(), Experience::SomeExperience);
        form.adjust(-1);
        assert_eq!(form.draft().experience(), Experience::NoExperience);

        form.field = FormField::BikeTypes;
        form.adjust(1);
        form.toggle_type();
        assert!(form.draft().bike_types().contains(KNOWN_BIKE_TYPES[1]));
        form.toggle_type();
        assert!(form.draft().bike_types().is_empty());
    }

    #[test]
    fn type_cursor_stays_in_bounds() {
        let mut form = FormState::new(Profile::default());
        form.field = FormField::BikeTypes;
        form.adjust(-1);
        assert_eq!(form.type_cursor(), 0);
        for _ in 0..KNOWN_BIKE_TYPES.len() + 3 {
            form.adjust(1);
        }
        assert_eq!(form.type_cursor(), KNOWN_BIKE_TYPES.len() - 1);
    }
}
