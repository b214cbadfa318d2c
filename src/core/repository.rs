//! Helm repository records and the store they are added to
//!
//! The dialog only needs the `add_repository` operation; `TomlRepositoryManager`
//! is the file-backed implementation used by the CLI.

use crate::core::service::ServiceError;
use crate::validation::validate_draft;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// A Helm chart repository as entered in the add dialog
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelmRepo {
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub username: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
    #[serde(default)]
    pub insecure_skip_tls_verify: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ca_file: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub key_file: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cert_file: String,
}

impl HelmRepo {
    /// Create a repository with only the required fields set
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            ..Default::default()
        }
    }

    /// True when every field still holds its default value
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Read a text field
    pub fn field(&self, field: RepoField) -> &str {
        match field {
            RepoField::Name => &self.name,
            RepoField::Url => &self.url,
            RepoField::Username => &self.username,
            RepoField::Password => &self.password,
            RepoField::CaFile => &self.ca_file,
            RepoField::KeyFile => &self.key_file,
            RepoField::CertFile => &self.cert_file,
        }
    }

    /// Mutable access to a text field
    pub fn field_mut(&mut self, field: RepoField) -> &mut String {
        match field {
            RepoField::Name => &mut self.name,
            RepoField::Url => &mut self.url,
            RepoField::Username => &mut self.username,
            RepoField::Password => &mut self.password,
            RepoField::CaFile => &mut self.ca_file,
            RepoField::KeyFile => &mut self.key_file,
            RepoField::CertFile => &mut self.cert_file,
        }
    }
}

/// Text fields of a [`HelmRepo`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepoField {
    Name,
    Url,
    Username,
    Password,
    CaFile,
    KeyFile,
    CertFile,
}

impl RepoField {
    pub const ALL: [RepoField; 7] = [
        RepoField::Name,
        RepoField::Url,
        RepoField::Username,
        RepoField::Password,
        RepoField::CaFile,
        RepoField::KeyFile,
        RepoField::CertFile,
    ];

    /// Label shown next to the input
    pub fn label(self) -> &'static str {
        match self {
            RepoField::Name => "Helm repo name",
            RepoField::Url => "URL",
            RepoField::Username => "Username",
            RepoField::Password => "Password",
            RepoField::CaFile => "Ca file",
            RepoField::KeyFile => "Key file",
            RepoField::CertFile => "Certificate file",
        }
    }
}

impl fmt::Display for RepoField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Debug for HelmRepo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let password = if self.password.is_empty() { "" } else { "***" };
        f.debug_struct("HelmRepo")
            .field("name", &self.name)
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &password)
            .field("insecure_skip_tls_verify", &self.insecure_skip_tls_verify)
            .field("ca_file", &self.ca_file)
            .field("key_file", &self.key_file)
            .field("cert_file", &self.cert_file)
            .finish()
    }
}

/// Backing store the dialog commits repositories to
#[async_trait]
pub trait RepositoryManager: Send + Sync {
    /// Add a repository; the error's `Display` text is shown to the user on failure
    async fn add_repository(&self, repo: &HelmRepo) -> Result<(), ServiceError>;
}

/// On-disk layout of the repositories file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepositoriesConfig {
    #[serde(default)]
    pub repositories: Vec<HelmRepo>,
}

/// Repository manager persisting to a `repositories.toml` file
pub struct TomlRepositoryManager {
    config_path: PathBuf,
    // Serialises read-modify-write cycles on the file
    lock: Mutex<()>,
}

impl TomlRepositoryManager {
    /// Create a manager for the given file; the file is created on first add
    pub fn new(config_path: PathBuf) -> Self {
        Self {
            config_path,
            lock: Mutex::new(()),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load all stored repositories (empty when the file does not exist yet)
    pub async fn load(&self) -> Result<RepositoriesConfig, ServiceError> {
        if !tokio::fs::try_exists(&self.config_path).await? {
            return Ok(RepositoriesConfig::default());
        }

        let content = tokio::fs::read_to_string(&self.config_path).await?;
        toml::from_str(&content).map_err(|e| {
            ServiceError::Serialization(format!("Failed to parse repositories config: {}", e))
        })
    }

    async fn save(&self, config: &RepositoriesConfig) -> Result<(), ServiceError> {
        if let Some(parent) = self.config_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let content = toml::to_string_pretty(config).map_err(|e| {
            ServiceError::Serialization(format!("Failed to serialize repositories config: {}", e))
        })?;

        tokio::fs::write(&self.config_path, content).await?;
        Ok(())
    }
}

#[async_trait]
impl RepositoryManager for TomlRepositoryManager {
    async fn add_repository(&self, repo: &HelmRepo) -> Result<(), ServiceError> {
        let validation = validate_draft(repo);
        if !validation.is_valid {
            return Err(ServiceError::Validation(validation.summary()));
        }

        let _guard = self.lock.lock().await;

        let mut config = self.load().await?;
        if config.repositories.iter().any(|r| r.name == repo.name) {
            return Err(ServiceError::AlreadyExists(repo.name.clone()));
        }

        debug!(
            "Writing repository '{}' to {}",
            repo.name,
            self.config_path.display()
        );
        config.repositories.push(repo.clone());
        self.save(&config).await?;

        info!("Added helm repository '{}' ({})", repo.name, repo.url);
        Ok(())
    }
}
