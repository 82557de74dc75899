use compact_str::CompactString;

use crate::error::{Result, TreemapError};

/// Our color representation, convertible to whatever the surface needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl AppColor {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Parse `#rrggbb` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TreemapError::Config(format!("bad color {hex:?}, expected #rrggbb")));
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).unwrap_or(0);
        Ok(Self::from_rgb8(channel(0), channel(2), channel(4)))
    }

    /// `#rrggbb`, alpha dropped.
    pub fn to_hex(self) -> String {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        )
    }

    /// Convert to iced's color type.
    pub fn to_iced(self) -> iced::Color {
        iced::Color::from_rgba(self.r, self.g, self.b, self.a)
    }

    /// Create a lighter version (hover highlight).
    pub fn lighten(self, amount: f32) -> Self {
        Self {
            r: (self.r + amount).min(1.0),
            g: (self.g + amount).min(1.0),
            b: (self.b + amount).min(1.0),
            a: self.a,
        }
    }
}

/// d3's `schemeCategory10`.
const CATEGORY_10: [(u8, u8, u8); 10] = [
    (0x1f, 0x77, 0xb4),
    (0xff, 0x7f, 0x0e),
    (0x2c, 0xa0, 0x2c),
    (0xd6, 0x27, 0x28),
    (0x94, 0x67, 0xbd),
    (0x8c, 0x56, 0x4b),
    (0xe3, 0x77, 0xc2),
    (0x7f, 0x7f, 0x7f),
    (0xbc, 0xbd, 0x22),
    (0x17, 0xbe, 0xcf),
];

pub fn category10() -> Vec<AppColor> {
    CATEGORY_10
        .iter()
        .map(|&(r, g, b)| AppColor::from_rgb8(r, g, b))
        .collect()
}

/// Ordinal category → color scale for one render pass.
///
/// The n-th distinct category seen gets `palette[n % palette.len()]`.
#[derive(Debug, Clone)]
pub struct ColorMapper {
    palette: Vec<AppColor>,
    seen: Vec<CompactString>,
}

impl ColorMapper {
    pub fn new(palette: &[AppColor]) -> Self {
        let palette = if palette.is_empty() {
            tracing::warn!("Empty palette, falling back to Category10");
            category10()
        } else {
            palette.to_vec()
        };
        Self {
            palette,
            seen: Vec::new(),
        }
    }

    /// Color for `category`, assigning the next palette slot on first sight.
    pub fn color_for(&mut self, category: &str) -> AppColor {
        let index = match self.seen.iter().position(|c| c.as_str() == category) {
            Some(i) => i,
            None => {
                self.seen.push(CompactString::new(category));
                self.seen.len() - 1
            }
        };
        self.palette[index % self.palette.len()]
    }

    /// Categories in first-encountered order.
    pub fn categories(&self) -> impl Iterator<Item = &str> + '_ {
        self.seen.iter().map(|c| c.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assigns_in_encounter_order_and_wraps() {
        let palette = [
            AppColor::from_rgb8(255, 0, 0),
            AppColor::from_rgb8(0, 255, 0),
        ];
        let mut colors = ColorMapper::new(&palette);
        assert_eq!(colors.color_for("Wii"), palette[0]);
        assert_eq!(colors.color_for("DS"), palette[1]);
        assert_eq!(colors.color_for("Wii"), palette[0]);
        assert_eq!(colors.color_for("X360"), palette[0]);
        assert_eq!(colors.categories().collect::<Vec<_>>(), vec!["Wii", "DS", "X360"]);
    }

    #[test]
    fn empty_palette_uses_category10() {
        let mut colors = ColorMapper::new(&[]);
        assert_eq!(colors.color_for("a"), category10()[0]);
    }

    #[test]
    fn hex_round_trip_and_rejection() {
        let c = AppColor::from_hex("#1f77b4").unwrap();
        assert_eq!(c, category10()[0]);
        assert_eq!(c.to_hex(), "#1f77b4");
        assert!(AppColor::from_hex("blue").is_err());
        assert!(AppColor::from_hex("#12345").is_err());
    }
}
