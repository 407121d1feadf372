//! UI state types for the TUI layer.
//!
//! Pure data types with no IO, no async, no ratatui dependency.
//! Used by both the engine (state ownership) and tui (rendering/input).

mod effect;

pub use effect::{PanelEffect, PanelEffectKind};

/// UI configuration options derived from config/environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiOptions {
    pub ascii_only: bool,
    pub high_contrast: bool,
    pub reduced_motion: bool,
}

/// Which control of the sign-in form has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Username,
    Password,
    Submit,
}

impl Focus {
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Username => Self::Password,
            Self::Password => Self::Submit,
            Self::Submit => Self::Username,
        }
    }

    #[must_use]
    pub const fn prev(self) -> Self {
        match self {
            Self::Username => Self::Submit,
            Self::Password => Self::Username,
            Self::Submit => Self::Password,
        }
    }

    #[must_use]
    pub const fn field(self) -> Option<crate::Field> {
        match self {
            Self::Username => Some(crate::Field::Username),
            Self::Password => Some(crate::Field::Password),
            Self::Submit => None,
        }
    }
}
