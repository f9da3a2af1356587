//! Easing curves. Inputs are clamped to `[0, 1]`.

use std::f32::consts::PI;

/// Symmetric cosine ease, `0.5 - 0.5 * cos(PI * t)`.
#[inline]
pub fn ease_in_out_cosine(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    0.5 - 0.5 * (PI * t).cos()
}

/// Cubic ease-out, `1 - (1 - t)^3`.
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}
