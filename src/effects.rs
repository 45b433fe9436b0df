//! Procedural color fields for the tintable face region.
//!
//! Both fields are pure functions of pixel coordinate and an integer phase
//! counter, so a frame is just "evaluate the field at every masked pixel".
//! All math is f32; the panel is 32 pixels wide and the color resolution is
//! 8 bits, so single precision is plenty.

use crate::Color;

/// Stripe width of the rainbow's brightness wave, in pixels.
pub const DEFAULT_STRIPE_WIDTH: f32 = 6.0;

/// Standard HSV to RGB conversion, `h` in `[0, 1)`, `s` and `v` in `[0, 1]`.
///
/// The hue circle splits into six 60-degree sectors (sector index
/// `floor(h * 6) mod 6`); within a sector the channels are built from
/// `v` (peak), `p = v(1-s)` (trough), and the two ramps
/// `q = v(1-fs)` / `t = v(1-(1-f)s)` where `f` is the position inside the
/// sector. Channels are truncated to integers and capped at 255.
pub fn from_hsv(h: f32, s: f32, v: f32) -> Color {
    let i = (h * 6.0).floor();
    let f = h * 6.0 - i;
    let v = v * 255.0;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);

    match (i as i32).rem_euclid(6) {
        0 => Color::new(v as u8, t as u8, p as u8), // Red → Yellow
        1 => Color::new(q as u8, v as u8, p as u8), // Yellow → Green
        2 => Color::new(p as u8, v as u8, t as u8), // Green → Cyan
        3 => Color::new(p as u8, q as u8, v as u8), // Cyan → Blue
        4 => Color::new(t as u8, p as u8, v as u8), // Blue → Magenta
        _ => Color::new(v as u8, p as u8, q as u8), // Magenta → Red
    }
}

/// Rainbow sweep: hue scrolls horizontally with the phase while a diagonal
/// sine wave modulates brightness.
pub fn rainbow(x: u32, y: u32, phase: u32, width: u32, stripe_width: f32) -> Color {
    let phase = phase as f32;
    let hue = (x as f32 / width as f32 + phase / 30.0) % 1.0;
    let value = (((x + y) as f32 / stripe_width + phase / 15.0).sin() + 1.5) / 2.5;
    from_hsv(hue, 1.0, value)
}

/// Fire flicker: three sine waves at different spatial and temporal rates
/// combine into an intensity in `[0.3, 1.0]`, mapped onto a red/orange/yellow
/// ramp. The 0.3 floor keeps the flame from ever going dark.
pub fn fire(x: u32, y: u32, phase: u32) -> Color {
    let xy = (x + y) as f32;
    let phase = phase as f32;

    let base = ((xy / 3.0 + phase / 15.0).sin() + 1.0) / 2.0;
    let flicker = ((phase / 8.0 + x as f32 * 0.5).sin() + 1.0) / 2.0;
    let wave = ((xy / 2.0 + phase / 20.0).sin() + 1.0) / 2.0;

    let intensity = (base * 0.6 + flicker * 0.3 + wave * 0.1).clamp(0.3, 1.0);
    ember(intensity)
}

/// Map a flame intensity onto one of three brightness tiers:
/// yellow tips, orange middle, red base.
fn ember(intensity: f32) -> Color {
    let (g_scale, b_scale) = if intensity > 0.8 {
        (200.0, 50.0)
    } else if intensity > 0.6 {
        (150.0, 30.0)
    } else {
        (80.0, 20.0)
    };
    Color::new(
        (255.0 * intensity) as u8,
        (g_scale * intensity) as u8,
        (b_scale * intensity) as u8,
    )
}

// ── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    // Sector interiors only; sector boundaries are one float ulp from
    // flipping and the field never samples them exactly anyway.
    #[rstest]
    #[case(0.0, (255, 0, 0))] // Red
    #[case(0.25, (127, 255, 0))] // Yellow-green ramp
    #[case(0.5, (0, 255, 255))] // Cyan
    #[case(0.75, (127, 0, 255))] // Violet
    fn from_hsv_known_hues_at_full_value(#[case] h: f32, #[case] rgb: (u8, u8, u8)) {
        assert_eq!(from_hsv(h, 1.0, 1.0), Color::new(rgb.0, rgb.1, rgb.2));
    }

    #[test]
    fn from_hsv_zero_saturation_is_gray() {
        assert_eq!(from_hsv(0.3, 0.0, 0.5), Color::new(127, 127, 127));
    }

    #[test]
    fn rainbow_golden_value_at_origin() {
        // phase 0, x 0, y 0: hue = 0, value = (sin 0 + 1.5) / 2.5 = 0.6,
        // sector 0 with v = 0.6 * 255 = 153.
        assert_eq!(rainbow(0, 0, 0, 32, 6.0), Color::new(153, 0, 0));
    }

    #[test]
    fn fire_golden_value_at_origin() {
        // All three waves sit at 0.5, so intensity = 0.5 and the red-base
        // tier gives (255, 80, 20) * 0.5 truncated.
        assert_eq!(fire(0, 0, 0), Color::new(127, 40, 10));
    }

    #[test]
    fn fire_stays_in_the_warm_range() {
        for phase in [0, 7, 33, 900, 9999] {
            for y in 0..32 {
                for x in 0..32 {
                    let c = fire(x, y, phase);
                    // Intensity is clamped to at least 0.3, so red never
                    // drops below 255 * 0.3 truncated.
                    assert!(c.r >= 76, "dim flame at ({x},{y}) phase {phase}: {c:?}");
                    assert!(c.r > c.g && c.g > c.b, "cold flame: {c:?}");
                }
            }
        }
    }

    #[test]
    fn rainbow_hue_wraps_with_phase() {
        // phase 30 shifts the hue by exactly one full turn, so x = 0 lands
        // back in the red sector: green and blue both zero.
        let c = rainbow(0, 0, 30, 32, 6.0);
        assert_eq!((c.g, c.b), (0, 0));
        assert!(c.r > 0);
    }
}
