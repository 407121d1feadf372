//! Client-side routes and navigation history.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Route {
    #[default]
    SignIn,
    Admin,
    Client,
    User,
}

impl Route {
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::SignIn => "/",
            Self::Admin => "/admin",
            Self::Client => "/client",
            Self::User => "/user",
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::SignIn => "Iniciar sesión",
            Self::Admin => "Administración",
            Self::Client => "Clientes",
            Self::User => "Usuarios",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigateOptions {
    /// Replace the current history entry instead of pushing a new one.
    pub replace: bool,
}

impl NavigateOptions {
    #[must_use]
    pub const fn replace() -> Self {
        Self { replace: true }
    }
}

/// Navigation stack. Never empty; starts at the sign-in page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    entries: Vec<Route>,
}

impl Default for History {
    fn default() -> Self {
        Self {
            entries: vec![Route::SignIn],
        }
    }
}

impl History {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn navigate(&mut self, route: Route, options: NavigateOptions) {
        if options.replace
            && let Some(current) = self.entries.last_mut()
        {
            *current = route;
            return;
        }
        self.entries.push(route);
    }

    #[must_use]
    pub fn current(&self) -> Route {
        self.entries.last().copied().unwrap_or_default()
    }

    #[must_use]
    pub fn entries(&self) -> &[Route] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
