//! TUI rendering for Almacen using ratatui.

mod effects;
mod input;
mod theme;

pub use effects::animate_panel;
pub use input::{InputPump, apply_event, handle_events};
pub use theme::{Glyphs, Palette, glyphs, palette, spinner_frame, styles};

use std::time::Duration;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

use almacen_engine::{Alert, App, Field, Focus, PanelEffectKind, Route};

const PANEL_WIDTH: u16 = 48;
const ALERT_WIDTH: u16 = 44;
const FORGOT_PASSWORD: &str = "¿Olvidaste tu contraseña?";
const APP_TITLE: &str = "Almacen App";

/// Main draw function
pub fn draw(frame: &mut Frame, app: &mut App) {
    let options = app.ui_options();
    let palette = palette(options);
    let glyphs = glyphs(options);
    // Clear with background color
    let bg_block = Block::default().style(Style::default().bg(palette.bg_dark));
    frame.render_widget(bg_block, frame.area());

    let elapsed = app.frame_elapsed();

    match app.route() {
        Route::SignIn => draw_sign_in(frame, app, elapsed, &palette, &glyphs),
        route => draw_landing(frame, app, route, &palette),
    }

    if let Some(alert) = app.alert().cloned() {
        draw_alert(frame, app, &alert, elapsed, &palette, &glyphs);
    }
}

/// Rect of `width` x `height` centered in `area`, clamped to fit.
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Advance the active effect of `kind` and return the animated rect.
fn animated_area(
    app: &mut App,
    kind: PanelEffectKind,
    base: Rect,
    viewport: Rect,
    elapsed: Duration,
) -> Rect {
    let (rect, effect_done) = match app.panel_effect_mut() {
        Some(effect) if effect.kind() == kind => {
            effect.advance(elapsed);
            (
                animate_panel(effect, base, viewport),
                effect.is_finished(),
            )
        }
        _ => (base, false),
    };

    if effect_done {
        app.clear_panel_effect();
    }
    rect
}

fn panel_block(palette: &Palette) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.primary))
        .style(Style::default().bg(palette.bg_panel))
        .padding(Padding::new(2, 2, 1, 1))
}

fn key_hints(pairs: &[(&'static str, &'static str)], palette: &Palette) -> Line<'static> {
    let mut spans = Vec::with_capacity(pairs.len() * 2);
    for (i, (key, action)) in pairs.iter().enumerate() {
        let sep = if i + 1 == pairs.len() { "" } else { "  " };
        spans.push(Span::styled(*key, styles::key_highlight(palette)));
        spans.push(Span::styled(format!(" {action}{sep}"), styles::key_hint(palette)));
    }
    Line::from(spans)
}

fn draw_sign_in(
    frame: &mut Frame,
    app: &mut App,
    elapsed: Duration,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let area = frame.area();
    // title, spacer, 2 x (label, input, error), forgot, spacer, button, spacer, hints
    let content_height: u16 = 1 + 1 + 2 * (1 + 3 + 1) + 1 + 1 + 1 + 1 + 1;
    let base = centered_rect(area, PANEL_WIDTH, content_height + 4);
    let panel_area = animated_area(app, PanelEffectKind::SubmitBlocked, base, area, elapsed);

    frame.render_widget(Clear, panel_area);
    let block = panel_block(palette);
    let inner = block.inner(panel_area);
    frame.render_widget(block, panel_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(1),
            Constraint::Length(1), // Username label
            Constraint::Length(3), // Username input
            Constraint::Length(1), // Username error
            Constraint::Length(1), // Password label
            Constraint::Length(3), // Password input
            Constraint::Length(1), // Password error
            Constraint::Length(1), // Forgot password
            Constraint::Length(1),
            Constraint::Length(1), // Button
            Constraint::Length(1),
            Constraint::Length(1), // Hints
        ])
        .split(inner);

    let title = Paragraph::new(Line::from(Span::styled(APP_TITLE, styles::title(palette))))
        .alignment(Alignment::Center);
    frame.render_widget(title, rows[0]);

    let show_cursor = app.alert().is_none();
    draw_field(
        frame,
        app,
        Field::Username,
        [rows[2], rows[3], rows[4]],
        show_cursor,
        palette,
        glyphs,
    );
    draw_field(
        frame,
        app,
        Field::Password,
        [rows[5], rows[6], rows[7]],
        show_cursor,
        palette,
        glyphs,
    );

    let forgot = Paragraph::new(Line::from(Span::styled(
        FORGOT_PASSWORD,
        Style::default()
            .fg(palette.text_muted)
            .add_modifier(Modifier::ITALIC),
    )))
    .alignment(Alignment::Right);
    frame.render_widget(forgot, rows[8]);

    draw_submit_button(frame, app, rows[10], palette, glyphs);

    let hints = key_hints(
        &[("Tab", "siguiente"), ("Enter", "enviar"), ("Esc", "salir")],
        palette,
    );
    frame.render_widget(Paragraph::new(hints).alignment(Alignment::Center), rows[12]);
}

fn draw_field(
    frame: &mut Frame,
    app: &App,
    field: Field,
    [label_area, input_area, error_area]: [Rect; 3],
    show_cursor: bool,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let form = app.form();
    let input = form.field(field);
    let focused = app.focus().field() == Some(field);
    let error = form.visible_error(field);

    let label = Paragraph::new(Line::from(Span::styled(
        field.label(),
        styles::label(palette, focused),
    )));
    frame.render_widget(label, label_area);

    let (display, before_cursor_width) = if field.is_secret() {
        (
            std::iter::repeat_n(glyphs.mask, input.grapheme_count()).collect::<String>(),
            input.cursor(),
        )
    } else {
        (
            input.text().to_string(),
            input.text_before_cursor().width(),
        )
    };

    let inner_width = usize::from(input_area.width.saturating_sub(2)).max(1);
    // Keep the cursor inside the box by scrolling horizontally.
    let scroll = before_cursor_width.saturating_sub(inner_width - 1);

    let content = if input.is_empty() {
        let placeholder = if field.is_secret() {
            field.placeholder().chars().map(|_| glyphs.mask).collect()
        } else {
            field.placeholder().to_string()
        };
        Line::from(Span::styled(placeholder, styles::placeholder(palette)))
    } else {
        Line::from(Span::styled(
            display,
            Style::default().fg(palette.text_primary),
        ))
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(styles::input_border(palette, focused, error.is_some()))
        .style(Style::default().bg(palette.bg_input));
    let paragraph = Paragraph::new(content)
        .block(block)
        .scroll((0, u16::try_from(scroll).unwrap_or(u16::MAX)));
    frame.render_widget(paragraph, input_area);

    if let Some(error) = error {
        let line = Line::from(Span::styled(
            error.message().to_string(),
            styles::field_error(palette),
        ));
        frame.render_widget(Paragraph::new(line), error_area);
    }

    if focused && show_cursor {
        let offset = u16::try_from(before_cursor_width - scroll).unwrap_or(0);
        frame.set_cursor_position((input_area.x + 1 + offset, input_area.y + 1));
    }
}

fn draw_submit_button(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let enabled = app.submit_enabled();
    let focused = app.focus() == Focus::Submit;
    let label = if app.is_submitting() {
        format!("  {}  ", spinner_frame(app.tick_count(), app.ui_options()))
    } else {
        format!("  Iniciar sesión {}  ", glyphs.arrow_right)
    };

    let button = Paragraph::new(Line::from(Span::styled(
        label,
        styles::button(palette, enabled, focused),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(button, area);
}

fn draw_landing(frame: &mut Frame, app: &App, route: Route, palette: &Palette) {
    let area = frame.area();
    let panel_area = centered_rect(area, PANEL_WIDTH, 12);

    frame.render_widget(Clear, panel_area);
    let block = panel_block(palette).title(Line::from(Span::styled(
        format!(" {APP_TITLE} "),
        Style::default()
            .fg(palette.text_primary)
            .add_modifier(Modifier::BOLD),
    )));

    let mut lines = vec![
        Line::from(Span::styled(route.title(), styles::title(palette))),
        Line::from(Span::styled(
            route.path(),
            Style::default().fg(palette.text_muted),
        )),
        Line::from(""),
    ];

    let payload = app.store().state().payload();
    if let Some(name) = payload.and_then(|payload| payload.display_name()) {
        lines.push(Line::from(vec![
            Span::styled("Sesión iniciada como ", Style::default().fg(palette.text_secondary)),
            Span::styled(
                name.to_string(),
                Style::default()
                    .fg(palette.text_primary)
                    .add_modifier(Modifier::BOLD),
            ),
        ]));
    } else {
        lines.push(Line::from(Span::styled(
            "Sesión iniciada",
            Style::default().fg(palette.text_secondary),
        )));
    }
    if let Some(role) = payload.and_then(|payload| payload.primary_role_name()) {
        lines.push(Line::from(Span::styled(
            role.to_string(),
            Style::default().fg(palette.accent),
        )));
    }

    lines.push(Line::from(""));
    lines.push(key_hints(&[("s", "cerrar sesión"), ("q", "salir")], palette));

    frame.render_widget(
        Paragraph::new(lines).block(block).alignment(Alignment::Center),
        panel_area,
    );
}

fn draw_alert(
    frame: &mut Frame,
    app: &mut App,
    alert: &Alert,
    elapsed: Duration,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let area = frame.area();
    let color = palette.alert_color(alert.kind());

    let width = ALERT_WIDTH.min(area.width.saturating_sub(2)).max(20);
    let content_width = usize::from(width.saturating_sub(6)).max(1); // borders + padding
    let message_lines = alert.message().width().div_ceil(content_width).max(1);
    let height = u16::try_from(message_lines).unwrap_or(1) + 2 + 4;

    let base = centered_rect(area, width, height);
    let dialog_area = animated_area(app, PanelEffectKind::AlertOpening, base, area, elapsed);

    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
        .style(Style::default().bg(palette.bg_panel))
        .padding(Padding::new(2, 2, 1, 1))
        .title(Line::from(Span::styled(
            format!(" {} {} ", glyphs.info, alert.title()),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));

    let lines = vec![
        Line::from(Span::styled(
            alert.message().to_string(),
            Style::default().fg(palette.text_primary),
        )),
        Line::from(""),
        key_hints(&[("Enter", "aceptar")], palette),
    ];

    let dialog = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(dialog, dialog_area);
}
