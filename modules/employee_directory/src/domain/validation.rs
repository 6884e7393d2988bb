//! Field and form validation for the add/edit surface.
//!
//! The engine does not validate what it stores; callers run [`validate_form`]
//! before `add`/`update`. Per-field rules run first for every field, and the
//! email uniqueness check only runs once all of them pass.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use thiserror::Error;

use crate::contract::model::{Employee, EmployeeId, EmployeePatch, NewEmployee};

pub const NAME_MIN_LEN: usize = 2;
pub const NAME_MAX_LEN: usize = 50;

static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z\s\-']+$").expect("name pattern compiles"));
// Deliberately loose: local@domain.tld with no whitespace, not RFC 5322.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// Form fields in declaration order; the first failing one gets focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    FirstName,
    LastName,
    Email,
    Department,
    Role,
}

impl FormField {
    pub const ORDER: [FormField; 5] = [
        FormField::FirstName,
        FormField::LastName,
        FormField::Email,
        FormField::Department,
        FormField::Role,
    ];

    /// Wire name of the field.
    pub fn key(self) -> &'static str {
        match self {
            FormField::FirstName => "firstName",
            FormField::LastName => "lastName",
            FormField::Email => "email",
            FormField::Department => "department",
            FormField::Role => "role",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::FirstName => "First name",
            FormField::LastName => "Last name",
            FormField::Email => "Email",
            FormField::Department => "Department",
            FormField::Role => "Role",
        }
    }

    fn noun(self) -> &'static str {
        match self {
            FormField::FirstName => "first name",
            FormField::LastName => "last name",
            FormField::Email => "email",
            FormField::Department => "department",
            FormField::Role => "role",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One failed rule, carrying the user-facing reason.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("{} is required", .field.label())]
    Required { field: FormField },

    #[error("{} must be at least {min} characters", .field.label())]
    TooShort { field: FormField, min: usize },

    #[error("{} must be no more than {max} characters", .field.label())]
    TooLong { field: FormField, max: usize },

    #[error("{} can only contain letters, spaces, hyphens, and apostrophes", .field.label())]
    InvalidName { field: FormField },

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Please select a {}", .field.noun())]
    NotSelected { field: FormField },

    #[error("This email address is already in use by another employee.")]
    EmailTaken,
}

impl FieldError {
    pub fn field(&self) -> FormField {
        match self {
            FieldError::Required { field }
            | FieldError::TooShort { field, .. }
            | FieldError::TooLong { field, .. }
            | FieldError::InvalidName { field }
            | FieldError::NotSelected { field } => *field,
            FieldError::InvalidEmail | FieldError::EmailTaken => FormField::Email,
        }
    }
}

/// Lookup the uniqueness rule needs from the live collection.
pub trait EmailRegistry {
    /// True when no record other than `exclude` uses `email` (case-insensitive).
    fn is_email_unique(&self, email: &str, exclude: Option<EmployeeId>) -> bool;
}

impl EmailRegistry for [Employee] {
    fn is_email_unique(&self, email: &str, exclude: Option<EmployeeId>) -> bool {
        let wanted = email.trim().to_lowercase();
        !self
            .iter()
            .any(|e| e.email.to_lowercase() == wanted && Some(e.id) != exclude)
    }
}

impl EmailRegistry for Vec<Employee> {
    fn is_email_unique(&self, email: &str, exclude: Option<EmployeeId>) -> bool {
        self.as_slice().is_email_unique(email, exclude)
    }
}

pub fn is_required(value: &str) -> bool {
    !value.trim().is_empty()
}

pub fn is_valid_name(value: &str) -> bool {
    NAME_RE.is_match(value.trim())
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value.trim())
}

/// Run the single-field rules for `field`, stopping at the first failure.
pub fn validate_field(field: FormField, value: &str) -> Result<(), FieldError> {
    let trimmed = value.trim();

    match field {
        FormField::FirstName | FormField::LastName => {
            if trimmed.is_empty() {
                return Err(FieldError::Required { field });
            }
            let len = trimmed.chars().count();
            if len < NAME_MIN_LEN {
                return Err(FieldError::TooShort {
                    field,
                    min: NAME_MIN_LEN,
                });
            }
            if len > NAME_MAX_LEN {
                return Err(FieldError::TooLong {
                    field,
                    max: NAME_MAX_LEN,
                });
            }
            if !is_valid_name(trimmed) {
                return Err(FieldError::InvalidName { field });
            }
        }
        FormField::Email => {
            if trimmed.is_empty() {
                return Err(FieldError::Required { field });
            }
            if !is_valid_email(trimmed) {
                return Err(FieldError::InvalidEmail);
            }
        }
        // Open vocabulary: any non-empty value is accepted.
        FormField::Department | FormField::Role => {
            if trimmed.is_empty() {
                return Err(FieldError::NotSelected { field });
            }
        }
    }

    Ok(())
}

/// Check `email` against the registry. Only meaningful once the shape is valid.
pub fn validate_email_uniqueness<R: EmailRegistry + ?Sized>(
    email: &str,
    registry: &R,
    editing: Option<EmployeeId>,
) -> Result<(), FieldError> {
    if registry.is_email_unique(email, editing) {
        Ok(())
    } else {
        Err(FieldError::EmailTaken)
    }
}

/// Raw form input as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: String,
    pub role: String,
}

impl EmployeeForm {
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::FirstName => &self.first_name,
            FormField::LastName => &self.last_name,
            FormField::Email => &self.email,
            FormField::Department => &self.department,
            FormField::Role => &self.role,
        }
    }

    /// Trimmed field values, ready to store.
    pub fn to_new_employee(&self) -> NewEmployee {
        NewEmployee {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            department: self.department.trim().to_string(),
            role: self.role.trim().to_string(),
        }
    }

    /// Full replacement patch for an edit form.
    pub fn into_patch(self) -> EmployeePatch {
        let data = self.to_new_employee();
        EmployeePatch {
            first_name: Some(data.first_name),
            last_name: Some(data.last_name),
            email: Some(data.email),
            department: Some(data.department),
            role: Some(data.role),
        }
    }
}

impl From<&NewEmployee> for EmployeeForm {
    fn from(n: &NewEmployee) -> Self {
        Self {
            first_name: n.first_name.clone(),
            last_name: n.last_name.clone(),
            email: n.email.clone(),
            department: n.department.clone(),
            role: n.role.clone(),
        }
    }
}

impl From<&Employee> for EmployeeForm {
    fn from(e: &Employee) -> Self {
        Self {
            first_name: e.first_name.clone(),
            last_name: e.last_name.clone(),
            email: e.email.clone(),
            department: e.department.clone(),
            role: e.role.clone(),
        }
    }
}

/// Every failure of a form submission, in field declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormErrors(Vec<FieldError>);

impl FormErrors {
    /// Field the user should be sent to first.
    pub fn first_field(&self) -> Option<FormField> {
        self.0.first().map(FieldError::field)
    }

    pub fn get(&self, field: FormField) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field() == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", e.field(), e)?;
        }
        Ok(())
    }
}

impl std::error::Error for FormErrors {}

/// Validate a whole submission.
///
/// `editing` is the id of the record being edited, excluded from the
/// uniqueness check. On success the trimmed values are returned.
pub fn validate_form<R: EmailRegistry + ?Sized>(
    form: &EmployeeForm,
    registry: &R,
    editing: Option<EmployeeId>,
) -> Result<NewEmployee, FormErrors> {
    let errors: Vec<FieldError> = FormField::ORDER
        .iter()
        .filter_map(|&field| validate_field(field, form.value(field)).err())
        .collect();

    if !errors.is_empty() {
        return Err(FormErrors(errors));
    }

    validate_email_uniqueness(&form.email, registry, editing)
        .map_err(|e| FormErrors(vec![e]))?;

    Ok(form.to_new_employee())
}
