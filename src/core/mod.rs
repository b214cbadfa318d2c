//! Core service layer modules

pub mod repository;
pub mod service;

// Re-export main types for convenience
pub use repository::{
    HelmRepo, RepoField, RepositoriesConfig, RepositoryManager, TomlRepositoryManager,
};
pub use service::{DialogConfig, ServiceConfig, ServiceError};
