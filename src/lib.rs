//! # helmrepo
//!
//! Headless implementation of the "add custom Helm repository" dialog: a draft
//! repository record, field validators, a file-selection bridge for TLS
//! material and the submission sequence that commits the draft to a
//! repository manager and reports the outcome.
//!
//! ## Architecture
//!
//! - [`dialog`]: visibility flag, form state, file selection and submission
//! - [`validation`]: pure field validators (system name, URL, path)
//! - [`events`]: user notifications
//! - [`core`]: the repository record, the manager trait and a TOML-backed store
//!
//! Front ends provide a [`dialog::FilePicker`] and a [`events::Notifier`]; the
//! `helmrepo` binary ships terminal implementations of both.

pub mod core;
pub mod dialog;
pub mod events;
pub mod validation;

pub use crate::core::repository::{HelmRepo, RepoField, RepositoryManager, TomlRepositoryManager};
pub use crate::core::service::{DialogConfig, ServiceConfig, ServiceError};
pub use dialog::{
    AddRepoDialog, DialogCollaborators, DialogError, DialogResult, DialogVisibility, FileSelection,
    FileSlot, FilePicker, SubmitOutcome,
};
pub use events::{Notification, NotificationBus, NotificationLevel, Notifier};
pub use validation::{FieldError, ValidationResult};

/// Version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging (safe for testing)
pub fn init_logging() {
    init_logging_with_default("helmrepo=warn");
}

/// Initialize logging with a fallback filter used when `RUST_LOG` is unset
pub fn init_logging_with_default(default_filter: &str) {
    // Only initialize logging once
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_filter));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish();

        // This will fail silently if already initialized
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}
