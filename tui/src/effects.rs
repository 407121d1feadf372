//! Geometry for the alert and sign-in panel animations.

use ratatui::layout::Rect;

use almacen_engine::{PanelEffect, PanelEffectKind};

/// Size of the alert dialog, relative to its final size, when it starts opening.
const ALERT_START_SCALE: f32 = 0.6;
/// Side-to-side swings of the sign-in panel after a blocked submit.
const SUBMIT_SHAKE_SWINGS: f32 = 3.0;
/// Widest sign-in panel swing, in cells.
const SUBMIT_SHAKE_CELLS: f32 = 2.0;

/// Where `base` should be drawn at the effect's current progress.
#[must_use]
pub fn animate_panel(effect: &PanelEffect, base: Rect, viewport: Rect) -> Rect {
    match effect.kind() {
        PanelEffectKind::AlertOpening => {
            let t = ease_out_cubic(effect.progress());
            grow_from_center(base, ALERT_START_SCALE + (1.0 - ALERT_START_SCALE) * t)
        }
        PanelEffectKind::SubmitBlocked => {
            let offset = shake_offset(effect.progress());
            let viewport_left = i32::from(viewport.x);
            let viewport_right = viewport_left + i32::from(viewport.width);
            let max_x = (viewport_right - i32::from(base.width)).max(viewport_left);
            let x = (i32::from(base.x) + offset).clamp(viewport_left, max_x) as u16;
            Rect { x, ..base }
        }
    }
}

/// Damped sine: full swing at the start, back at rest when done.
fn shake_offset(progress: f32) -> i32 {
    let t = progress.clamp(0.0, 1.0);
    let swing = f32::sin(t * std::f32::consts::TAU * SUBMIT_SHAKE_SWINGS);
    (swing * SUBMIT_SHAKE_CELLS * (1.0 - t)).round() as i32
}

fn grow_from_center(base: Rect, scale: f32) -> Rect {
    let width = (f32::from(base.width) * scale).round() as u16;
    let height = (f32::from(base.height) * scale).round() as u16;
    let width = width.clamp(1, base.width.max(1));
    let height = height.clamp(1, base.height.max(1));
    Rect {
        x: base.x + base.width.saturating_sub(width) / 2,
        y: base.y + base.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

fn ease_out_cubic(t: f32) -> f32 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}
