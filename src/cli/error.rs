//! CLI-specific error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Adding repository failed: {0}")]
    AddFailed(String),

    #[error("Prompt failed: {0}")]
    Prompt(String),

    #[error("Cancelled by user")]
    Cancelled,

    #[error("Dialog error: {0}")]
    Dialog(helmrepo::DialogError),
}

impl CliError {
    /// Process exit status for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Validation(_) => 2,
            CliError::Cancelled => 130,
            _ => 1,
        }
    }

    /// Whether the user has already seen this error as a notification
    pub fn is_reported(&self) -> bool {
        matches!(self, CliError::AddFailed(_) | CliError::Validation(_))
    }
}

impl From<inquire::InquireError> for CliError {
    fn from(e: inquire::InquireError) -> Self {
        match e {
            inquire::InquireError::OperationInterrupted
            | inquire::InquireError::OperationCanceled => CliError::Cancelled,
            other => CliError::Prompt(other.to_string()),
        }
    }
}

impl From<helmrepo::DialogError> for CliError {
    fn from(e: helmrepo::DialogError) -> Self {
        match e {
            helmrepo::DialogError::Picker(helmrepo::ServiceError::Interrupted) => CliError::Cancelled,
            other => CliError::Dialog(other),
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
