//! User-facing alert dialogs.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlertKind {
    #[default]
    Info,
    Warning,
}

impl AlertKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    title: String,
    message: String,
    kind: AlertKind,
}

impl Alert {
    pub fn new(title: impl Into<String>, message: impl Into<String>, kind: AlertKind) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            kind,
        }
    }

    /// The one alert for every sign-in failure: bad credentials, HTTP errors and
    /// unreachable servers all look the same to the user.
    #[must_use]
    pub fn sign_in_failed() -> Self {
        Self::new(
            "Iniciar sesión",
            "Usuario y/o contraseña incorrectos",
            AlertKind::Info,
        )
    }

    /// Shown at startup when the config file exists but cannot be used.
    pub fn config_ignored(reason: impl std::fmt::Display) -> Self {
        Self::new(
            "Configuración",
            format!("Se usan los valores por defecto: {reason}"),
            AlertKind::Warning,
        )
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn kind(&self) -> AlertKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_in_failed_text() {
        let alert = Alert::sign_in_failed();
        assert_eq!(alert.title(), "Iniciar sesión");
        assert_eq!(alert.message(), "Usuario y/o contraseña incorrectos");
        assert_eq!(alert.kind(), AlertKind::Info);
    }

    #[test]
    fn config_ignored_is_a_warning() {
        let alert = Alert::config_ignored("invalid TOML at line 3");
        assert_eq!(alert.title(), "Configuración");
        assert!(alert.message().ends_with("invalid TOML at line 3"));
        assert_eq!(alert.kind(), AlertKind::Warning);
        assert_eq!(alert.kind().as_str(), "warning");
    }
}
