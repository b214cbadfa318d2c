//! Add-repository dialog controller
//!
//! [`AddRepoDialog`] owns the form state and sequences the two asynchronous
//! actions of the workflow: picking certificate files and submitting the draft.
//! Rendering is left to the host; everything here is observable state.
//!
//! ```rust,no_run
//! use helmrepo::dialog::{AddRepoDialog, DialogCollaborators};
//! use helmrepo::core::TomlRepositoryManager;
//! use helmrepo::events::NotificationBus;
//! # use helmrepo::dialog::{FilePicker, OpenDialogOptions, OpenDialogResult};
//! # use helmrepo::core::ServiceError;
//! # struct NoPicker;
//! # #[async_trait::async_trait]
//! # impl FilePicker for NoPicker {
//! #     async fn show_open_dialog(&self, _: OpenDialogOptions) -> Result<OpenDialogResult, ServiceError> {
//! #         Ok(OpenDialogResult::canceled())
//! #     }
//! # }
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let dialog = AddRepoDialog::new(
//!     DialogCollaborators {
//!         manager: Arc::new(TomlRepositoryManager::new("repositories.toml".into())),
//!         picker: Arc::new(NoPicker),
//!         notifier: Arc::new(NotificationBus::new()),
//!     },
//!     || println!("repository list changed"),
//! );
//!
//! helmrepo::dialog::open();
//! dialog.set_field(helmrepo::core::RepoField::Name, "stable");
//! dialog.set_field(helmrepo::core::RepoField::Url, "https://charts.example.com/stable");
//! dialog.submit().await?;
//! # Ok(())
//! # }
//! ```

pub mod file_select;
mod form;
pub mod submit;
pub mod visibility;

pub use file_select::{
    FileFilter, FilePicker, FileSelection, FileSlot, OpenDialogOptions, OpenDialogProperty,
    OpenDialogResult, CERT_EXTENSIONS, KEY_EXTENSIONS,
};
use form::FormState;
pub use submit::SubmitOutcome;
pub use visibility::{close, open, DialogVisibility, VisibilityState};

use crate::core::repository::{HelmRepo, RepoField, RepositoryManager};
use crate::core::service::{DialogConfig, ServiceError};
use crate::events::Notifier;
use crate::validation::{validate_field, FieldError, ValidationResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Workflow-level errors returned to the host
#[derive(Debug, thiserror::Error)]
pub enum DialogError {
    #[error("{0} is already in progress")]
    Busy(&'static str),

    #[error("File picker failed: {0}")]
    Picker(#[source] ServiceError),
}

pub type DialogResult<T> = Result<T, DialogError>;

/// External services the dialog talks to
#[derive(Clone)]
pub struct DialogCollaborators {
    pub manager: Arc<dyn RepositoryManager>,
    pub picker: Arc<dyn FilePicker>,
    pub notifier: Arc<dyn Notifier>,
}

/// Headless add-repository dialog
///
/// Note: This struct does not derive Debug because it holds trait objects.
pub struct AddRepoDialog {
    visibility: DialogVisibility,
    form: Mutex<FormState>,
    submitting: AtomicBool,
    selecting: AtomicBool,
    collaborators: DialogCollaborators,
    on_add_repo: Box<dyn Fn() + Send + Sync>,
    config: DialogConfig,
}

impl AddRepoDialog {
    /// Create a dialog bound to the process-wide visibility flag.
    /// `on_add_repo` runs once per successfully added repository.
    pub fn new<F>(collaborators: DialogCollaborators, on_add_repo: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let visibility = DialogVisibility::global().clone();
        Self {
            form: Mutex::new(FormState::new(visibility.session())),
            visibility,
            submitting: AtomicBool::new(false),
            selecting: AtomicBool::new(false),
            collaborators,
            on_add_repo: Box::new(on_add_repo),
            config: DialogConfig::default(),
        }
    }

    /// Bind to a different visibility flag; the draft starts over
    pub fn with_visibility(mut self, visibility: DialogVisibility) -> Self {
        self.form = Mutex::new(FormState::new(visibility.session()));
        self.visibility = visibility;
        self
    }

    pub fn with_config(mut self, config: DialogConfig) -> Self {
        self.config = config;
        self
    }

    pub fn visibility(&self) -> &DialogVisibility {
        &self.visibility
    }

    pub fn open(&self) {
        self.visibility.open();
    }

    /// Hide the dialog and discard the draft
    pub fn close(&self) {
        self.visibility.close();
        let session = self.visibility.session();
        self.with_form(|form| form.reset(session));
    }

    pub fn is_open(&self) -> bool {
        self.visibility.is_open()
    }

    /// Copy of the current draft
    pub fn draft(&self) -> HelmRepo {
        self.with_form(|form| form.draft.clone())
    }

    pub fn set_field(&self, field: RepoField, value: impl Into<String>) {
        let value = value.into();
        self.with_form(|form| *form.draft.field_mut(field) = value);
    }

    pub fn set_insecure_skip_tls_verify(&self, value: bool) {
        self.with_form(|form| form.draft.insecure_skip_tls_verify = value);
    }

    /// Apply an arbitrary edit to the draft
    pub fn edit<F>(&self, f: F)
    where
        F: FnOnce(&mut HelmRepo),
    {
        self.with_form(|form| f(&mut form.draft));
    }

    pub fn show_options(&self) -> bool {
        self.with_form(|form| form.show_options)
    }

    /// Flip the "More" section, returning whether it is now shown
    pub fn toggle_options(&self) -> bool {
        self.with_form(FormState::toggle_options)
    }

    /// Inline error for one field, if its current value is rejected
    pub fn field_error(&self, field: RepoField) -> Option<FieldError> {
        self.with_form(|form| validate_field(field, form.draft.field(field)).err())
    }

    /// Validation state of the whole draft
    pub fn validation(&self) -> ValidationResult {
        self.with_form(|form| form.validation())
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    pub fn is_selecting_file(&self) -> bool {
        self.selecting.load(Ordering::Acquire)
    }

    // Runs `f` on the form after discarding a draft left over from a closed session.
    // The lock is never held across an await point.
    fn with_form<R>(&self, f: impl FnOnce(&mut FormState) -> R) -> R {
        let mut form = self.lock_form();
        let session = self.visibility.session();
        if form.session() != session {
            form.reset(session);
        }
        f(&mut form)
    }

    fn lock_form(&self) -> MutexGuard<'_, FormState> {
        match self.form.lock() {
            Ok(form) => form,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Marks an asynchronous action as pending until dropped
struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
