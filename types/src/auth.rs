//! Credentials, roles and the client-side auth store.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::route::Route;

/// Username/password pair sent to the sign-in endpoint.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

// Manual Debug impl to prevent leaking passwords in logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Client,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized role: {0:?}")]
pub struct UnknownRoleError(pub String);

impl Role {
    pub const ALL: [Self; 3] = [Self::Admin, Self::Client, Self::User];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN_ROLE",
            Self::Client => "CLIENT_ROLE",
            Self::User => "USER_ROLE",
        }
    }

    /// Role names are matched exactly; the backend never varies their case.
    pub fn parse(raw: &str) -> Result<Self, UnknownRoleError> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == raw)
            .ok_or_else(|| UnknownRoleError(raw.to_string()))
    }

    /// Role-to-route dispatch table.
    #[must_use]
    pub const fn landing_route(self) -> Route {
        match self {
            Self::Admin => Route::Admin,
            Self::Client => Route::Client,
            Self::User => Route::User,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the payload's `roles`. A missing or non-string `name` decodes
/// as `None` and routes nowhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRecord {
    #[serde(
        default,
        deserialize_with = "string_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
}

impl RoleRecord {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| match value {
        Value::String(name) => Some(name),
        _ => None,
    }))
}

/// Successful sign-in payload.
///
/// Only `roles` is interpreted; everything else the server sends (token, user
/// profile, ...) is kept verbatim in `extra` so the store receives the full payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignInPayload {
    pub roles: Vec<RoleRecord>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SignInPayload {
    #[must_use]
    pub fn new(roles: Vec<RoleRecord>) -> Self {
        Self {
            roles,
            extra: Map::new(),
        }
    }

    #[must_use]
    pub fn primary_role_name(&self) -> Option<&str> {
        self.roles.first().and_then(|record| record.name.as_deref())
    }

    /// `None` when the roles list is empty. A first record without a name is an
    /// unknown role with an empty name.
    #[must_use]
    pub fn primary_role(&self) -> Option<Result<Role, UnknownRoleError>> {
        self.roles
            .first()
            .map(|record| Role::parse(record.name.as_deref().unwrap_or_default()))
    }

    /// Best-effort display name for the signed-in user.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.extra
            .get("user")
            .and_then(|user| user.get("username").or_else(|| user.get("name")))
            .or_else(|| self.extra.get("username"))
            .or_else(|| self.extra.get("name"))
            .and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthAction {
    SignIn(SignInPayload),
    SignOut,
}

impl AuthAction {
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::SignIn(_) => "SIGNIN",
            Self::SignOut => "SIGNOUT",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum AuthState {
    #[default]
    SignedOut,
    SignedIn(SignInPayload),
}

impl AuthState {
    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        matches!(self, Self::SignedIn(_))
    }

    #[must_use]
    pub fn payload(&self) -> Option<&SignInPayload> {
        match self {
            Self::SignedIn(payload) => Some(payload),
            Self::SignedOut => None,
        }
    }

    #[must_use]
    pub fn reduce(self, action: AuthAction) -> Self {
        match action {
            AuthAction::SignIn(payload) => Self::SignedIn(payload),
            AuthAction::SignOut => Self::SignedOut,
        }
    }
}

/// Shared client-side state container for the signed-in session.
#[derive(Debug, Default)]
pub struct AuthStore {
    state: AuthState,
    dispatched: Vec<&'static str>,
}

impl AuthStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatch(&mut self, action: AuthAction) {
        self.dispatched.push(action.tag());
        let state = std::mem::take(&mut self.state);
        self.state = state.reduce(action);
    }

    #[must_use]
    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// Tags of every action dispatched so far, oldest first.
    #[must_use]
    pub fn dispatched(&self) -> &[&'static str] {
        &self.dispatched
    }
}
