//! Color theme and glyphs for the Almacen TUI.
//!
//! Uses Kanagawa Wave palette by default with an optional high-contrast override.

use ratatui::style::{Color, Modifier, Style};

use almacen_engine::UiOptions;

/// Kanagawa Wave color palette constants.
mod colors {
    use super::Color;

    // === Backgrounds (Sumi Ink) ===
    pub const BG_DARK: Color = Color::Rgb(22, 22, 29); // sumiInk0
    pub const BG_PANEL: Color = Color::Rgb(31, 31, 40); // sumiInk3
    pub const BG_INPUT: Color = Color::Rgb(42, 42, 55); // sumiInk4
    pub const BG_BORDER: Color = Color::Rgb(84, 84, 109); // sumiInk6

    // === Foregrounds (Fuji) ===
    pub const TEXT_PRIMARY: Color = Color::Rgb(220, 215, 186); // fujiWhite
    pub const TEXT_SECONDARY: Color = Color::Rgb(200, 192, 147); // oldWhite
    pub const TEXT_MUTED: Color = Color::Rgb(114, 113, 105); // fujiGray
    pub const TEXT_DISABLED: Color = Color::Rgb(113, 124, 124); // katanaGray

    // === Primary/Brand ===
    pub const PRIMARY: Color = Color::Rgb(149, 127, 184); // oniViolet
    pub const PRIMARY_DIM: Color = Color::Rgb(147, 138, 169); // springViolet1

    pub const CYAN: Color = Color::Rgb(127, 180, 202); // springBlue
    pub const YELLOW: Color = Color::Rgb(230, 195, 132); // carpYellow
    pub const ORANGE: Color = Color::Rgb(255, 160, 102); // surimiOrange
    pub const RED: Color = Color::Rgb(255, 93, 98); // peachRed
}

/// Resolved theme palette used by the UI.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg_dark: Color,
    pub bg_panel: Color,
    pub bg_input: Color,
    pub bg_border: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub text_disabled: Color,
    pub primary: Color,
    pub primary_dim: Color,
    pub accent: Color,
    pub warning: Color,
    pub error: Color,
    pub peach: Color,
}

impl Palette {
    #[must_use]
    pub fn standard() -> Self {
        Self {
            bg_dark: colors::BG_DARK,
            bg_panel: colors::BG_PANEL,
            bg_input: colors::BG_INPUT,
            bg_border: colors::BG_BORDER,
            text_primary: colors::TEXT_PRIMARY,
            text_secondary: colors::TEXT_SECONDARY,
            text_muted: colors::TEXT_MUTED,
            text_disabled: colors::TEXT_DISABLED,
            primary: colors::PRIMARY,
            primary_dim: colors::PRIMARY_DIM,
            accent: colors::CYAN,
            warning: colors::YELLOW,
            error: colors::RED,
            peach: colors::ORANGE,
        }
    }

    #[must_use]
    pub fn high_contrast() -> Self {
        Self {
            bg_dark: Color::Black,
            bg_panel: Color::Black,
            bg_input: Color::DarkGray,
            bg_border: Color::Gray,
            text_primary: Color::White,
            text_secondary: Color::Gray,
            text_muted: Color::DarkGray,
            text_disabled: Color::DarkGray,
            primary: Color::White,
            primary_dim: Color::Gray,
            accent: Color::Cyan,
            warning: Color::Yellow,
            error: Color::Red,
            peach: Color::Yellow,
        }
    }

    /// Border/title color for an alert of the given kind.
    #[must_use]
    pub fn alert_color(&self, kind: almacen_engine::AlertKind) -> Color {
        use almacen_engine::AlertKind;
        match kind {
            AlertKind::Info => self.accent,
            AlertKind::Warning => self.warning,
        }
    }
}

#[must_use]
pub fn palette(options: UiOptions) -> Palette {
    if options.high_contrast {
        Palette::high_contrast()
    } else {
        Palette::standard()
    }
}

/// ASCII/Unicode glyphs for icons and spinners.
#[derive(Debug, Clone, Copy)]
pub struct Glyphs {
    pub mask: char,
    pub arrow_right: &'static str,
    pub info: &'static str,
    pub spinner_frames: &'static [&'static str],
}

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const SPINNER_FRAMES_ASCII: &[&str] = &["|", "/", "-", "\\"];

#[must_use]
pub fn glyphs(options: UiOptions) -> Glyphs {
    if options.ascii_only {
        Glyphs {
            mask: '*',
            arrow_right: "->",
            info: "i",
            spinner_frames: SPINNER_FRAMES_ASCII,
        }
    } else {
        Glyphs {
            mask: '•',
            arrow_right: "→",
            info: "ℹ",
            spinner_frames: SPINNER_FRAMES,
        }
    }
}

/// When `reduced_motion` is enabled, returns a static glyph instead of cycling.
#[must_use]
pub fn spinner_frame(tick: usize, options: UiOptions) -> &'static str {
    let frames = glyphs(options).spinner_frames;
    if options.reduced_motion {
        frames[0]
    } else {
        frames[tick % frames.len()]
    }
}

/// Pre-defined styles for common UI elements.
pub mod styles {
    use super::{Modifier, Palette, Style};

    #[must_use]
    pub fn title(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.primary)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn label(palette: &Palette, focused: bool) -> Style {
        if focused {
            Style::default()
                .fg(palette.text_primary)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.text_secondary)
        }
    }

    #[must_use]
    pub fn input_border(palette: &Palette, focused: bool, has_error: bool) -> Style {
        let color = if has_error {
            palette.error
        } else if focused {
            palette.primary
        } else {
            palette.bg_border
        };
        Style::default().fg(color)
    }

    #[must_use]
    pub fn placeholder(palette: &Palette) -> Style {
        Style::default().fg(palette.text_muted)
    }

    #[must_use]
    pub fn field_error(palette: &Palette) -> Style {
        Style::default().fg(palette.error)
    }

    #[must_use]
    pub fn button(palette: &Palette, enabled: bool, focused: bool) -> Style {
        if !enabled {
            return Style::default()
                .fg(palette.text_disabled)
                .bg(palette.bg_input)
                .add_modifier(Modifier::DIM);
        }
        let style = Style::default()
            .fg(palette.bg_dark)
            .bg(palette.primary)
            .add_modifier(Modifier::BOLD);
        if focused {
            style.add_modifier(Modifier::REVERSED)
        } else {
            style
        }
    }

    #[must_use]
    pub fn key_hint(palette: &Palette) -> Style {
        Style::default().fg(palette.text_muted)
    }

    #[must_use]
    pub fn key_highlight(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.peach)
            .add_modifier(Modifier::BOLD)
    }
}

#[cfg(test)]
mod tests {
    use almacen_engine::{AlertKind, UiOptions};

    use super::{Palette, glyphs, spinner_frame};

    #[test]
    fn spinner_frame_cycles_without_reduced_motion() {
        let options = UiOptions::default();
        let frame0 = spinner_frame(0, options);
        let frame1 = spinner_frame(1, options);
        assert_ne!(frame0, frame1, "spinner should cycle through frames");
    }

    #[test]
    fn spinner_frame_static_with_reduced_motion() {
        let options = UiOptions {
            reduced_motion: true,
            ..UiOptions::default()
        };
        let frame0 = spinner_frame(0, options);
        assert_eq!(frame0, spinner_frame(1, options));
        assert_eq!(frame0, spinner_frame(100, options));
    }

    #[test]
    fn ascii_mode_masks_with_asterisk() {
        let options = UiOptions {
            ascii_only: true,
            reduced_motion: true,
            ..UiOptions::default()
        };
        assert_eq!(glyphs(options).mask, '*');
        assert_eq!(spinner_frame(7, options), "|");
        assert_eq!(glyphs(UiOptions::default()).mask, '•');
    }

    #[test]
    fn alert_kinds_have_distinct_colors() {
        let palette = Palette::standard();
        assert_eq!(palette.alert_color(AlertKind::Info), palette.accent);
        assert_eq!(palette.alert_color(AlertKind::Warning), palette.warning);
        assert_ne!(
            palette.alert_color(AlertKind::Info),
            palette.alert_color(AlertKind::Warning)
        );
    }
}
