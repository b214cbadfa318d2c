//! Draft repository and disclosure state of the form

use crate::core::repository::HelmRepo;
use crate::validation::{validate_draft, ValidationResult};

/// The live draft plus the "More" toggle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub draft: HelmRepo,
    pub show_options: bool,
    // Visibility session this draft belongs to
    session: u64,
}

impl FormState {
    pub(crate) fn new(session: u64) -> Self {
        Self {
            session,
            ..Default::default()
        }
    }

    /// Discard the draft and collapse the security options
    pub(crate) fn reset(&mut self, session: u64) {
        *self = Self::new(session);
    }

    pub(crate) fn session(&self) -> u64 {
        self.session
    }

    /// Flip the security/credentials disclosure, returning the new value
    pub fn toggle_options(&mut self) -> bool {
        self.show_options = !self.show_options;
        self.show_options
    }

    /// Validation state of the current draft
    pub fn validation(&self) -> ValidationResult {
        validate_draft(&self.draft)
    }
}
