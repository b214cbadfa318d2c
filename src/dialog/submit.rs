//! Submission of the draft to the repository manager

use super::{AddRepoDialog, BusyGuard, DialogError, DialogResult};
use crate::validation::{validate_draft, FieldError};
use tracing::{debug, info, warn};

/// Result of a submit attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The manager accepted the repository; the dialog closed
    Added,
    /// The manager rejected the repository; the draft is kept for a retry
    Failed(String),
    /// The draft did not pass local validation; the manager was not called
    Invalid(Vec<FieldError>),
}

pub(crate) fn added_message(name: &str) -> String {
    format!("Helm repository {} has been added", name)
}

pub(crate) fn failed_message(name: &str, reason: &str) -> String {
    format!("Adding helm repository {} has failed: {}", name, reason)
}

impl AddRepoDialog {
    /// Add the draft to the repository manager and report the outcome.
    ///
    /// Manager failures are turned into an error notification and
    /// [`SubmitOutcome::Failed`]; they never surface as `Err`.
    pub async fn submit(&self) -> DialogResult<SubmitOutcome> {
        let _busy = BusyGuard::acquire(&self.submitting).ok_or(DialogError::Busy("Submission"))?;

        let (session, repo) = self.with_form(|form| (form.session(), form.draft.clone()));
        let notifier = &self.collaborators.notifier;

        if self.config.validate_before_submit {
            let validation = validate_draft(&repo);
            if !validation.is_valid {
                warn!(
                    "Refusing to add helm repository '{}': {}",
                    repo.name,
                    validation.summary()
                );
                notifier.notify_error(&failed_message(&repo.name, &validation.summary()));
                return Ok(SubmitOutcome::Invalid(validation.errors));
            }
        }

        debug!("Submitting helm repository '{}' ({})", repo.name, repo.url);

        match self.collaborators.manager.add_repository(&repo).await {
            Ok(()) => {
                info!("Helm repository '{}' added", repo.name);
                notifier.notify_success(&added_message(&repo.name));
                (self.on_add_repo)();

                if self.visibility.session() == session {
                    self.close();
                } else {
                    debug!("Dialog closed during submission, keeping the new draft");
                }
                Ok(SubmitOutcome::Added)
            }
            Err(e) => {
                let reason = e.to_string();
                warn!("Adding helm repository '{}' failed: {}", repo.name, reason);
                notifier.notify_error(&failed_message(&repo.name, &reason));
                Ok(SubmitOutcome::Failed(reason))
            }
        }
    }
}
