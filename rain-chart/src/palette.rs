use plotters::style::RGBColor;
use std::f64::consts::PI;

/// Rainbow colormap from purple (0.0) to red (1.0), the same curves as
/// matplotlib's `rainbow`.
pub fn rainbow(position: f64) -> RGBColor {
    let x = position.clamp(0.0, 1.0);
    RGBColor(
        channel((2.0 * x - 0.5).abs()),
        channel((PI * x).sin()),
        channel((PI * x / 2.0).cos()),
    )
}

fn channel(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Evenly spaced rainbow colors, oldest year first.
pub fn get_colors(number_of_colors: usize) -> Vec<RGBColor> {
    match number_of_colors {
        0 => Vec::new(),
        1 => vec![rainbow(0.0)],
        n => (0..n)
            .map(|idx| rainbow(idx as f64 / (n - 1) as f64))
            .collect(),
    }
}

pub fn to_hex(color: &RGBColor) -> String {
    format!("#{:02x}{:02x}{:02x}", color.0, color.1, color.2)
}
