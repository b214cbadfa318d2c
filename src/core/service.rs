//! Service configuration and the shared collaborator error type

use std::path::PathBuf;
use tracing::debug;

/// Environment variable overriding the repositories file location
pub const REPOSITORIES_ENV_VAR: &str = "HELMREPO_REPOSITORIES";

/// File name of the repositories store inside the config directory
pub const REPOSITORIES_FILE_NAME: &str = "repositories.toml";

/// Main service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Location of the repositories store
    pub repositories_path: PathBuf,

    /// Dialog behaviour
    pub dialog: DialogConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            repositories_path: default_repositories_path(),
            dialog: DialogConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Build a configuration, resolving the repositories path in priority order:
    /// 1. explicit override
    /// 2. `HELMREPO_REPOSITORIES` environment variable
    /// 3. `<config dir>/helmrepo/repositories.toml`
    pub fn resolve(repositories_path: Option<PathBuf>) -> Self {
        let repositories_path = repositories_path
            .or_else(|| {
                std::env::var_os(REPOSITORIES_ENV_VAR)
                    .filter(|v| !v.is_empty())
                    .map(PathBuf::from)
            })
            .unwrap_or_else(default_repositories_path);

        debug!("Using repositories file: {}", repositories_path.display());

        Self {
            repositories_path,
            dialog: DialogConfig::default(),
        }
    }
}

fn default_repositories_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("helmrepo")
        .join(REPOSITORIES_FILE_NAME)
}

/// Add-repository dialog configuration
#[derive(Debug, Clone)]
pub struct DialogConfig {
    /// Validate the draft locally and refuse to call the manager when it is invalid
    pub validate_before_submit: bool,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            validate_before_submit: true,
        }
    }
}

/// Error raised by the collaborators of the dialog (repository store, file picker)
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Repository '{0}' already exists")]
    AlreadyExists(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Interrupted by user")]
    Interrupted,

    #[error("Custom error: {0}")]
    Custom(String),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_prefers_explicit_path() {
        let config = ServiceConfig::resolve(Some(PathBuf::from("/tmp/custom.toml")));
        assert_eq!(config.repositories_path, PathBuf::from("/tmp/custom.toml"));
        assert!(config.dialog.validate_before_submit);
    }

    #[test]
    fn test_default_path_ends_with_file_name() {
        let path = default_repositories_path();
        assert!(path.ends_with("helmrepo/repositories.toml"));
    }

    #[test]
    fn test_service_error_display_keeps_cause() {
        let err = ServiceError::Custom("conflict".to_string());
        assert!(err.to_string().contains("conflict"));

        let err = ServiceError::AlreadyExists("stable".to_string());
        assert_eq!(err.to_string(), "Repository 'stable' already exists");
    }
}
