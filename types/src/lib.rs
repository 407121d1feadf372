//! Core domain types for the Almacen sign-in client.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions

mod alert;
mod auth;
mod form;
mod route;
mod schema;
pub mod ui;

pub use alert::{Alert, AlertKind};
pub use auth::{
    AuthAction, AuthState, AuthStore, Credentials, Role, RoleRecord, SignInPayload,
    UnknownRoleError,
};
pub use form::{Field, SignInForm, TextField};
pub use route::{History, NavigateOptions, Route};
pub use schema::{FieldError, REQUIRED_MESSAGE, SignInSchema, ValidationErrors};
pub use ui::{Focus, UiOptions};
