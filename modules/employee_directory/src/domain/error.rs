use thiserror::Error;

use crate::contract::model::EmployeeId;

/// Domain-specific errors using thiserror
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Employee not found: {id}")]
    EmployeeNotFound { id: EmployeeId },

    #[error("Employee with email '{email}' already exists")]
    EmailAlreadyExists { email: String },

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Malformed input: {message}")]
    MalformedInput { message: String },

    #[error("Serialization failed: {message}")]
    Serialization { message: String },

    #[error("No employee id left after {last}")]
    IdsExhausted { last: EmployeeId },
}

impl DomainError {
    pub fn employee_not_found(id: EmployeeId) -> Self {
        Self::EmployeeNotFound { id }
    }

    pub fn email_already_exists(email: impl Into<String>) -> Self {
        Self::EmailAlreadyExists {
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

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    pub fn ids_exhausted(last: EmployeeId) -> Self {
        Self::IdsExhausted { last }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::EmployeeNotFound { .. })
    }
}
