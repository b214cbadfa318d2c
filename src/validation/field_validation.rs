//! Field validators for the add-repository form (required fields, formats).
//!
//! Validators are pure: they never touch the file system and never block edits.
//! They only drive inline errors and submission readiness.

use crate::core::repository::{HelmRepo, RepoField};
use crate::validation::result::{FieldError, ValidationResult};
use once_cell::sync::Lazy;
use regex::Regex;

#[allow(clippy::expect_used)]
static SYSTEM_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9-]+$").expect("system name pattern is valid"));

/// A named predicate with the message shown when it rejects a value
#[derive(Debug, Clone, Copy)]
pub struct InputValidator {
    pub name: &'static str,
    pub message: &'static str,
    validate: fn(&str) -> bool,
}

impl InputValidator {
    pub fn validate(&self, value: &str) -> bool {
        (self.validate)(value)
    }
}

/// Identifier-safe names: lowercase latin characters, digits and dashes
pub const SYSTEM_NAME: InputValidator = InputValidator {
    name: "system_name",
    message: "This field may only contain lowercase latin characters, numbers and dash.",
    validate: is_system_name,
};

/// Absolute, syntactically well-formed URLs
pub const IS_URL: InputValidator = InputValidator {
    name: "is_url",
    message: "Wrong url format",
    validate: is_url,
};

/// Strings that look like file-system paths; empty is accepted
pub const IS_PATH: InputValidator = InputValidator {
    name: "is_path",
    message: "This field must be a valid path",
    validate: is_path,
};

const REQUIRED_MESSAGE: &str = "This field is required";

pub(crate) fn is_system_name(s: &str) -> bool {
    SYSTEM_NAME_RE.is_match(s)
}

pub(crate) fn is_url(s: &str) -> bool {
    url::Url::parse(s).is_ok()
}

pub(crate) fn is_path(s: &str) -> bool {
    if s.is_empty() {
        return true;
    }
    !s.trim().is_empty() && !s.chars().any(char::is_control)
}

/// Whether the field must be filled in
pub fn is_required(field: RepoField) -> bool {
    matches!(field, RepoField::Name | RepoField::Url)
}

/// Format validators attached to a field
pub fn validators_for(field: RepoField) -> &'static [InputValidator] {
    match field {
        RepoField::Name => &[SYSTEM_NAME],
        RepoField::Url => &[IS_URL],
        RepoField::CaFile | RepoField::KeyFile | RepoField::CertFile => &[IS_PATH],
        RepoField::Username | RepoField::Password => &[],
    }
}

/// Validate a single field value, returning the first rejection
pub fn validate_field(field: RepoField, value: &str) -> Result<(), FieldError> {
    if value.is_empty() {
        if is_required(field) {
            return Err(FieldError {
                field,
                validator: "required".to_string(),
                message: REQUIRED_MESSAGE.to_string(),
            });
        }
        return Ok(());
    }

    match validators_for(field).iter().find(|v| !v.validate(value)) {
        Some(rejected) => Err(FieldError {
            field,
            validator: rejected.name.to_string(),
            message: rejected.message.to_string(),
        }),
        None => Ok(()),
    }
}

/// Validate every field of a draft
pub fn validate_draft(repo: &HelmRepo) -> ValidationResult {
    RepoField::ALL
        .iter()
        .filter_map(|field| validate_field(*field, repo.field(*field)).err())
        .fold(ValidationResult::valid(), ValidationResult::with_error)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_system_name_accepts_identifiers() {
        assert!(SYSTEM_NAME.validate("stable"));
        assert!(SYSTEM_NAME.validate("my-repo-2"));
        assert!(SYSTEM_NAME.validate("0"));
    }

    #[test]
    fn test_system_name_rejects_unsafe_names() {
        for name in ["", "My Repo", "UPPER", "repo_1", "repo.io", "ünï", "a/b"] {
            assert!(!SYSTEM_NAME.validate(name), "accepted {:?}", name);
        }
    }

    #[test]
    fn test_url_validator() {
        assert!(!IS_URL.validate("not a url"));
        assert!(IS_URL.validate("https://charts.example.com/stable"));
        assert!(IS_URL.validate("oci://registry.example.com/charts"));
        assert!(!IS_URL.validate("charts.example.com"));
    }

    #[test]
    fn test_path_validator() {
        assert!(IS_PATH.validate(""));
        assert!(IS_PATH.validate("/certs/ca.pem"));
        assert!(IS_PATH.validate("C:\\certs\\client.key"));
        assert!(IS_PATH.validate("relative/cert file.crt"));
        assert!(!IS_PATH.validate("   "));
        assert!(!IS_PATH.validate("/certs/\0ca.pem"));
        assert!(!IS_PATH.validate("/certs/ca\n.pem"));
    }

    #[test]
    fn test_validate_field_required() {
        let err = validate_field(RepoField::Name, "").unwrap_err();
        assert_eq!(err.validator, "required");
        assert_eq!(err.field, RepoField::Name);

        assert!(validate_field(RepoField::Username, "").is_ok());
        assert!(validate_field(RepoField::CaFile, "").is_ok());
    }

    #[test]
    fn test_validate_field_reports_rule_message() {
        let err = validate_field(RepoField::Url, "not a url").unwrap_err();
        assert_eq!(err.validator, "is_url");
        assert_eq!(err.message, "Wrong url format");
        assert_eq!(err.to_string(), "URL: Wrong url format");
    }

    #[test]
    fn test_validate_draft_collects_all_errors() {
        let mut repo = HelmRepo::new("Bad Name", "nope");
        repo.key_file = "\t".to_string();

        let result = validate_draft(&repo);
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 3);
        assert!(result.error_for(RepoField::Name).is_some());
        assert!(result.error_for(RepoField::Url).is_some());
        assert!(result.error_for(RepoField::KeyFile).is_some());
        assert!(result.error_for(RepoField::CaFile).is_none());
    }

    #[test]
    fn test_validate_draft_accepts_complete_repo() {
        let mut repo = HelmRepo::new("myrepo", "https://x.io");
        repo.username = "Any Thing".to_string();
        repo.cert_file = "/certs/client.crt".to_string();
        assert!(validate_draft(&repo).is_valid);
    }
}
