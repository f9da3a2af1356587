//! Colour helpers shared by the point clouds and the text field.
//!
//! Colours are `Vec3` RGB with channels in `0.0..=1.0`; hex strings are the
//! configuration format because that is how presets are authored.

use crate::error::ConfigError;
use glam::Vec3;

/// Default gradient used to fill title text, warm core to deep blue.
pub const TITLE_PALETTE: [&str; 5] = ["ff6030", "ffad70", "f7d297", "edb9a1", "1b3984"];

/// Parse `#rrggbb` or `rrggbb` into an RGB vector.
pub fn parse_hex_color(hex: &str) -> Result<Vec3, ConfigError> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.is_ascii() {
        return Err(ConfigError::InvalidColor(hex.to_string()));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16)
            .map(|v| v as f32 / 255.0)
            .map_err(|_| ConfigError::InvalidColor(hex.to_string()))
    };
    Ok(Vec3::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Linear mix between two colours, `t` clamped to `[0, 1]`.
#[inline]
pub fn lerp_color(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a.lerp(b, t.clamp(0.0, 1.0))
}

/// Convert a `0..1` colour to 8-bit channels.
#[inline]
pub fn to_rgb8(color: Vec3) -> [u8; 3] {
    let c = (color.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round();
    [c.x as u8, c.y as u8, c.z as u8]
}

/// Evenly spaced multi-stop colour gradient.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    stops: Vec<Vec3>,
}

impl Gradient {
    /// Build from colours, spaced evenly over `[0, 1]`.
    pub fn new(stops: Vec<Vec3>) -> Result<Self, ConfigError> {
        if stops.is_empty() {
            return Err(ConfigError::EmptyGradient);
        }
        Ok(Self { stops })
    }

    /// Build from hex strings.
    pub fn from_hex<S: AsRef<str>>(stops: &[S]) -> Result<Self, ConfigError> {
        let colors = stops
            .iter()
            .map(|s| parse_hex_color(s.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(colors)
    }

    /// The title palette.
    pub fn title() -> Self {
        Self {
            stops: TITLE_PALETTE
                .iter()
                .filter_map(|s| parse_hex_color(s).ok())
                .collect(),
        }
    }

    /// Sample at `t` in `[0, 1]`.
    pub fn sample(&self, t: f32) -> Vec3 {
        let n = self.stops.len();
        if n == 1 {
            return self.stops[0];
        }
        let scaled = t.clamp(0.0, 1.0) * (n - 1) as f32;
        let i = (scaled.floor() as usize).min(n - 2);
        lerp_color(self.stops[i], self.stops[i + 1], scaled - i as f32)
    }

    /// Number of colour stops.
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Always false: construction rejects empty gradients.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        let c = parse_hex_color("#ff6030").unwrap();
        assert!((c.x - 1.0).abs() < 1e-6);
        assert!((c.y - 96.0 / 255.0).abs() < 1e-6);
        assert!((c.z - 48.0 / 255.0).abs() < 1e-6);
        assert_eq!(parse_hex_color("1b3984").unwrap(), parse_hex_color("#1b3984").unwrap());
    }

    #[test]
    fn test_parse_hex_color_rejects_garbage() {
        assert!(parse_hex_color("#fff").is_err());
        assert!(parse_hex_color("zzzzzz").is_err());
        assert!(parse_hex_color("ééé").is_err());
    }

    #[test]
    fn test_gradient_endpoints() {
        let g = Gradient::from_hex(&["000000", "ffffff", "ff0000"]).unwrap();
        assert_eq!(g.sample(0.0), Vec3::ZERO);
        assert_eq!(g.sample(1.0), Vec3::X);
        assert!((g.sample(0.5) - Vec3::ONE).length() < 1e-6);
        assert!((g.sample(0.25) - Vec3::splat(0.5)).length() < 1e-6);
    }

    #[test]
    fn test_title_gradient_has_all_stops() {
        assert_eq!(Gradient::title().len(), TITLE_PALETTE.len());
    }

    #[test]
    fn test_to_rgb8_clamps() {
        assert_eq!(to_rgb8(Vec3::new(2.0, -1.0, 0.5)), [255, 0, 128]);
    }
}
