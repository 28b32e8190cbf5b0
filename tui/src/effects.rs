//! Animation effects for modals and the answer line.

use ratatui::layout::Rect;

use tally_engine::{Effect, EffectKind};

/// Apply an effect to transform the base rectangle.
#[must_use]
pub fn apply_effect(effect: &Effect, base: Rect, viewport: Rect) -> Rect {
    match effect.kind() {
        EffectKind::PopScale => {
            let t = ease_out_cubic(effect.progress());
            let scale = 0.6 + 0.4 * t;
            scale_rect(base, scale)
        }
        EffectKind::Shake => {
            let t = effect.progress().clamp(0.0, 1.0);
            let decay = 1.0 - t;
            let oscillations = 3.0;
            let amplitude = 2.0;
            let offset = (f32::sin(t * std::f32::consts::TAU * oscillations) * amplitude * decay)
                .round() as i32;
            let viewport_left = i32::from(viewport.x);
            let viewport_right = i32::from(viewport.x) + i32::from(viewport.width);
            let max_x = (viewport_right - i32::from(base.width)).max(viewport_left);
            let x = (i32::from(base.x) + offset).clamp(viewport_left, max_x) as u16;
            Rect { x, ..base }
        }
    }
}

fn scale_rect(base: Rect, scale: f32) -> Rect {
    let width = (f32::from(base.width) * scale).round() as u16;
    let height = (f32::from(base.height) * scale).round() as u16;
    let width = width.max(1).min(base.width);
    let height = height.max(1).min(base.height);
    Rect {
        x: base.x + (base.width.saturating_sub(width) / 2),
        y: base.y + (base.height.saturating_sub(height) / 2),
        width,
        height,
    }
}

fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}
