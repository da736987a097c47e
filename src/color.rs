use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::aggregate::Aggregation;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

fn hsl_to_color32(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let hsl = Hsl::new(hue, saturation, lightness);
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

/// Generates `n` visually distinct pastel colours using evenly spaced hues.
pub fn pastel_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| hsl_to_color32((i as f32 / n as f32) * 360.0, 0.6, 0.75))
        .collect()
}

/// `n` colours interpolated linearly between two HSL stops.
pub fn gradient(n: usize, from: (f32, f32, f32), to: (f32, f32, f32)) -> Vec<Color32> {
    let lerp = |a: f32, b: f32, t: f32| a + (b - a) * t;
    (0..n)
        .map(|i| {
            let t = if n > 1 { i as f32 / (n - 1) as f32 } else { 0.0 };
            hsl_to_color32(
                lerp(from.0, to.0, t),
                lerp(from.1, to.1, t),
                lerp(from.2, to.2, t),
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Per-panel palettes
// ---------------------------------------------------------------------------

/// Colours for the `n` bars / slices of a panel, first colour for the first
/// (largest) entry.
pub fn panel_colors(aggregation: Aggregation, n: usize) -> Vec<Color32> {
    match aggregation {
        // magma
        Aggregation::TopRoutesByDelay => gradient(n, (330.0, 0.8, 0.2), (40.0, 0.95, 0.7)),
        // viridis
        Aggregation::TopRoutesByVolume => gradient(n, (280.0, 0.6, 0.3), (60.0, 0.85, 0.55)),
        // coolwarm
        Aggregation::AirlineAvgDelay => gradient(n, (0.0, 0.7, 0.55), (220.0, 0.7, 0.55)),
        Aggregation::AirlineVolume => gradient(n, (215.0, 0.8, 0.3), (205.0, 0.7, 0.8)),
        Aggregation::TopAirportsByDelay => gradient(n, (0.0, 0.85, 0.35), (10.0, 0.8, 0.8)),
        Aggregation::TopAirportsByVolume => gradient(n, (130.0, 0.7, 0.25), (110.0, 0.5, 0.75)),
        Aggregation::MonthlyCancellations => vec![Color32::LIGHT_BLUE; n],
        Aggregation::CancellationReasonShare => pastel_palette(n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palettes_have_requested_length() {
        for agg in Aggregation::ALL {
            assert_eq!(panel_colors(agg, 0).len(), 0);
            assert_eq!(panel_colors(agg, 7).len(), 7);
        }
    }

    #[test]
    fn gradient_hits_both_stops() {
        let colors = gradient(3, (0.0, 1.0, 0.5), (120.0, 1.0, 0.5));
        assert!(colors[0].r() >= 250 && colors[0].g() <= 5 && colors[0].b() <= 5);
        assert!(colors[2].g() >= 250 && colors[2].r() <= 5 && colors[2].b() <= 5);
    }

    #[test]
    fn pastel_colours_are_distinct() {
        let colors = pastel_palette(4);
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
