//! Color helpers for the terminal preview.

use ratatui::style::Color;

/// Hue of the grid glyphs.
const GRID_HUE: f32 = 130.0;

/// Map a cell's opacity to a green shade.
///
/// Terminals have no alpha, so `resting` (the stylesheet opacity) maps to a
/// dim green and `peak` (a fully highlighted cell) to a bright one.
pub fn opacity_to_color(opacity: f64, resting: f64, peak: f64) -> Color {
    let span = (peak - resting).max(f64::EPSILON);
    let level = ((opacity - resting) / span).clamp(0.0, 1.0) as f32;

    let saturation = 0.7 + level * 0.3;
    let lightness = 0.12 + level * 0.5;
    hsl_to_rgb(GRID_HUE, saturation, lightness)
}

/// Convert HSL to RGB color.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Color {
    if s == 0.0 {
        let v = (l * 255.0) as u8;
        return Color::Rgb(v, v, v);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let h = h / 360.0;

    let channel = |t: f32| (hue_to_rgb(p, q, t) * 255.0) as u8;
    Color::Rgb(
        channel(h + 1.0 / 3.0),
        channel(h),
        channel(h - 1.0 / 3.0),
    )
}

fn hue_to_rgb(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}
