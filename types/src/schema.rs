//! Client-side validation schema for the sign-in form.

use std::fmt;

use crate::form::Field;

pub const REQUIRED_MESSAGE: &str = "Campo obligatorio";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    Required { message: &'static str },
}

impl FieldError {
    #[must_use]
    pub const fn required() -> Self {
        Self::Required {
            message: REQUIRED_MESSAGE,
        }
    }

    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Required { message } => *message,
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Per-field validation result. Empty means the form is valid.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    username: Option<FieldError>,
    password: Option<FieldError>,
}

impl ValidationErrors {
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&FieldError> {
        match field {
            Field::Username => self.username.as_ref(),
            Field::Password => self.password.as_ref(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.password.is_none()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        usize::from(self.username.is_some()) + usize::from(self.password.is_some())
    }

    /// Fields that currently fail validation, in form order.
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        Field::ALL
            .into_iter()
            .filter(|field| self.get(*field).is_some())
    }

    fn set(&mut self, field: Field, error: Option<FieldError>) {
        match field {
            Field::Username => self.username = error,
            Field::Password => self.password = error,
        }
    }
}

pub struct SignInSchema;

impl SignInSchema {
    /// Both fields are required. Whitespace counts as a value.
    #[must_use]
    pub fn validate(username: &str, password: &str) -> ValidationErrors {
        let mut errors = ValidationErrors::default();
        errors.set(Field::Username, required(username));
        errors.set(Field::Password, required(password));
        errors
    }
}

fn required(value: &str) -> Option<FieldError> {
    value.is_empty().then(FieldError::required)
}
