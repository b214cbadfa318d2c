//! Repository form validation

pub mod field_validation;
pub mod result;

// Re-export main types
pub use field_validation::{
    is_required, validate_draft, validate_field, validators_for, InputValidator, IS_PATH, IS_URL,
    SYSTEM_NAME,
};
pub use result::{FieldError, ValidationResult};
