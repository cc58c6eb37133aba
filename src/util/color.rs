//! Color util methods.
//!
//! Converted from https://github.com/home-assistant/core/blob/dev/homeassistant/util/color.py
//! Apache-2.0 license

use crate::zway::RgbColor;

/// Convert an rgb color to its hsv representation.
///
/// - Hue is scaled 0-360
/// - Sat is scaled 0-100
/// - Val is scaled 0-100
pub fn color_rgb_to_hsv(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let (h, s, v) = rgb_to_hsv(r / 255.0, g / 255.0, b / 255.0);
    (round(h * 360., 3), round(s * 100., 3), round(v * 100., 3))
}

/// Convert an rgb color to its hs representation.
pub fn color_rgb_to_hs(color: RgbColor) -> (f32, f32) {
    let (h, s, _) = color_rgb_to_hsv(color.r as f32, color.g as f32, color.b as f32);
    (h, s)
}

// HSV: Hue, Saturation, Value
// H: position in the spectrum
// S: color saturation ("purity")
// V: color brightness
// From: https://github.com/python/cpython/blob/3.12/Lib/colorsys.py

pub fn rgb_to_hsv(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let maxc = r.max(g).max(b);
    let minc = r.min(g).min(b);
    let rangec = maxc - minc;
    let v = maxc;

    if minc == maxc {
        return (0.0, 0.0, v);
    }
    let s = rangec / maxc;
    let rc = (maxc - r) / rangec;
    let gc = (maxc - g) / rangec;
    let bc = (maxc - b) / rangec;
    let h = if r == maxc {
        bc - gc
    } else if g == maxc {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };

    // Python's remainder takes the sign of the divisor
    ((h / 6.0).rem_euclid(1.0), s, v)
}

fn round(x: f32, decimals: u32) -> f32 {
    let y = 10i32.pow(decimals) as f32;
    (x * y).round() / y
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case((0., 0., 0.), 0., 0., 0.)]
    #[case((0., 0., 100.), 255., 255., 255.)]
    #[case((240., 100., 100.), 0., 0., 255.)]
    #[case((120., 100., 100.), 0., 255., 0.)]
    #[case((0., 100., 100.), 255., 0., 0.)]
    fn test_color_rgb_to_hsv(
        #[case] expected: (f32, f32, f32),
        #[case] r: f32,
        #[case] g: f32,
        #[case] b: f32,
    ) {
        assert_eq!(expected, color_rgb_to_hsv(r, g, b));
    }

    #[rstest]
    #[case((0., 0.), RgbColor::new(0, 0, 0))]
    #[case((0., 0.), RgbColor::new(255, 255, 255))]
    #[case((0., 100.), RgbColor::new(255, 0, 0))]
    #[case((240., 100.), RgbColor::new(0, 0, 255))]
    fn test_color_rgb_to_hs(#[case] expected: (f32, f32), #[case] color: RgbColor) {
        assert_eq!(expected, color_rgb_to_hs(color));
    }
}
