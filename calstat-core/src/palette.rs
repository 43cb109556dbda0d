//! Color assignment for group labels.

use std::hash::Hash;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{CalstatError, CalstatResult};

/// An RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(s: &str) -> CalstatResult<Self> {
        let hex = s.trim().trim_start_matches('#');
        let invalid = || CalstatError::Config(format!("Invalid color '{}', expected #rrggbb", s));

        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());

        Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Soft blue, coral, mint green, amethyst, sunflower, tomato.
pub const DEFAULT_COLORS: [Color; 6] = [
    Color::rgb(0x34, 0x98, 0xdb),
    Color::rgb(0xe6, 0x7e, 0x22),
    Color::rgb(0x2e, 0xcc, 0x71),
    Color::rgb(0x9b, 0x59, 0xb6),
    Color::rgb(0xf1, 0xc4, 0x0f),
    Color::rgb(0xe7, 0x4c, 0x3c),
];

/// An ordered, non-empty list of colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            colors: DEFAULT_COLORS.to_vec(),
        }
    }
}

impl Palette {
    /// An empty list falls back to the default palette.
    pub fn new(colors: Vec<Color>) -> Self {
        if colors.is_empty() {
            Palette::default()
        } else {
            Palette { colors }
        }
    }

    pub fn from_hex<S: AsRef<str>>(colors: &[S]) -> CalstatResult<Self> {
        let colors = colors
            .iter()
            .map(|c| Color::from_hex(c.as_ref()))
            .collect::<CalstatResult<Vec<_>>>()?;
        Ok(Palette::new(colors))
    }

    /// Map every distinct key to a color, in first-seen order.
    ///
    /// The mapping is total: past the end of the palette colors wrap around,
    /// so the n-th distinct key gets color `n % len`.
    pub fn assign<K, I>(&self, keys: I) -> IndexMap<K, Color>
    where
        K: Eq + Hash,
        I: IntoIterator<Item = K>,
    {
        let mut assignments = IndexMap::new();
        for key in keys {
            let next = self.colors[assignments.len() % self.colors.len()];
            assignments.entry(key).or_insert(next);
        }
        assignments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_is_total_and_wraps_around() {
        let palette = Palette::default();
        let keys: Vec<String> = (0..8).map(|i| format!("group {i}")).collect();

        let colors = palette.assign(keys.iter().cloned());

        assert_eq!(colors.len(), 8);
        for (i, key) in keys.iter().enumerate() {
            assert_eq!(colors[key], DEFAULT_COLORS[i % 6]);
        }
    }

    #[test]
    fn test_assign_ignores_duplicate_keys() {
        let colors = Palette::default().assign(["a", "b", "a", "c"]);

        assert_eq!(colors.keys().copied().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(colors["c"], DEFAULT_COLORS[2]);
    }

    #[test]
    fn test_assign_is_deterministic() {
        let palette = Palette::default();
        assert_eq!(palette.assign(["x", "y", "z"]), palette.assign(["x", "y", "z"]));
    }

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Color::from_hex("#3498db").unwrap(), DEFAULT_COLORS[0]);
        assert_eq!(Color::from_hex("E67E22").unwrap(), DEFAULT_COLORS[1]);
        assert_eq!(DEFAULT_COLORS[5].to_hex(), "#e74c3c");
        assert!(Color::from_hex("#12345").is_err());
        assert!(Color::from_hex("#gggggg").is_err());
    }

    #[test]
    fn test_custom_palette() {
        let palette = Palette::from_hex(&["#000000", "#ffffff"]).unwrap();
        let colors = palette.assign([1, 2, 3]);
        assert_eq!(colors[&3], Color::rgb(0, 0, 0));

        let empty: [&str; 0] = [];
        assert_eq!(Palette::from_hex(&empty).unwrap(), Palette::default());
    }
}
