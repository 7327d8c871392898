//! Easing curves for offset interpolation

/// Cubic ease-out, fast start and soft landing
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}
