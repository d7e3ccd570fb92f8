use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error};
use std::{f64::consts::PI, fmt, str::FromStr};

/// The frequency applied to the cycling index when computing phase colors.
const PHASE_FREQUENCY: f64 = 0.01;

/// The default amplitude of each phase color sinusoid.
pub const PHASE_AMPLITUDE: f64 = 128.0;

/// The default offset of each phase color sinusoid.
pub const PHASE_OFFSET: f64 = 127.0;

/// An RGB color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color out of real valued channels, clamping and truncating each into a byte.
    pub fn from_channels(r: f64, g: f64, b: f64) -> Self {
        Self::new(to_byte(r), to_byte(g), to_byte(b))
    }

    /// Parse a color in `#RRGGBB` or `RRGGBB` form.
    pub fn from_hex(input: &str) -> Result<Self, ParseColorError> {
        let digits = input.strip_prefix('#').unwrap_or(input);
        let mut bytes = [0; 3];
        hex::decode_to_slice(digits, &mut bytes).map_err(|_| ParseColorError(input.to_string()))?;
        Ok(Self::new(bytes[0], bytes[1], bytes[2]))
    }

    /// Render this color as `#RRGGBB` using uppercase hex digits.
    pub fn to_hex(&self) -> String {
        format!("#{}", hex::encode_upper([self.r, self.g, self.b]))
    }

    /// The channel-wise complement of this color.
    pub fn complement(&self) -> Self {
        Self::new(255 - self.r, 255 - self.g, 255 - self.b)
    }

    /// Paint this color with the given alpha over `background`.
    pub fn blend_over(&self, background: Color, alpha: f64) -> Self {
        let alpha = alpha.clamp(0.0, 1.0);
        let mix = |top: u8, bottom: u8| top as f64 * alpha + bottom as f64 * (1.0 - alpha);
        Self::from_channels(
            mix(self.r, background.r).round(),
            mix(self.g, background.g).round(),
            mix(self.b, background.b).round(),
        )
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let input = String::deserialize(deserializer)?;
        Self::from_hex(&input).map_err(D::Error::custom)
    }
}

impl From<Color> for crossterm::style::Color {
    fn from(color: Color) -> Self {
        crossterm::style::Color::Rgb { r: color.r, g: color.g, b: color.b }
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("invalid color '{0}': expected #RRGGBB")]
pub struct ParseColorError(String);

/// Convert real valued RGB channels into a `#RRGGBB` string.
///
/// Every channel is clamped into `[0, 255]` and truncated.
pub fn rgb_to_hex(r: f64, g: f64, b: f64) -> String {
    Color::from_channels(r, g, b).to_hex()
}

/// Compute the three-phase color for cycling index `index`.
///
/// Each channel is a sinusoid at phase `0.01 * index`, shifted by `0`, `2π/3` and `4π/3`
/// respectively and scaled by `amplitude` around `offset`.
pub fn phase_color(index: u8, amplitude: f64, offset: f64) -> Color {
    let phase = PHASE_FREQUENCY * index as f64;
    let channel = |shift: f64| (phase + shift).sin() * amplitude + offset;
    Color::from_channels(channel(0.0), channel(2.0 * PI / 3.0), channel(4.0 * PI / 3.0))
}

fn to_byte(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, 255.0) as u8
}
