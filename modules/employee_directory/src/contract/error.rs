use thiserror::Error;

use crate::contract::model::EmployeeId;

/// Errors that are safe to expose to presentation code
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("Employee not found: {id}")]
    NotFound { id: EmployeeId },

    #[error("Employee with email '{email}' already exists")]
    Conflict { email: String },

    #[error("Validation error: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Malformed input: {message}")]
    MalformedInput { message: String },

    #[error("Internal error")]
    Internal,
}

impl DirectoryError {
    pub fn not_found(id: EmployeeId) -> Self {
        Self::NotFound { id }
    }

    pub fn conflict(email: impl Into<String>) -> Self {
        Self::Conflict {
            email: email.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn malformed_input(message: impl Into<String>) -> Self {
        Self::MalformedInput {
            message: message.into(),
        }
    }
}

impl From<crate::domain::error::DomainError> for DirectoryError {
    fn from(domain_error: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        match domain_error {
            EmployeeNotFound { id } => Self::not_found(id),
            EmailAlreadyExists { email } => Self::conflict(email),
            Validation { field, message } => Self::validation(field, message),
            MalformedInput { message } => Self::malformed_input(message),
            Serialization { message } => {
                tracing::error!(%message, "Snapshot serialization failed");
                Self::Internal
            }
            IdsExhausted { last } => {
                tracing::error!(%last, "Employee id space exhausted");
                Self::Internal
            }
        }
    }
}
