//! Font selection properties.
//!
//! Weights follow the CSS 100-900 scale. The document typeface is a single
//! variable font, so any weight is reachable; named weights are shorthands.

use serde::{de, Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, Default)]
pub enum FontWeight {
    Light,
    #[default]
    Regular,
    Medium,
    SemiBold,
    Bold,
    Numeric(u16),
}

impl FontWeight {
    /// Lowest weight that reads as emphasis; faces whose default instance is
    /// lighter have to be emboldened when drawn at or above it.
    pub const EMPHASIS: u16 = 600;

    pub fn numeric_value(&self) -> u16 {
        match self {
            FontWeight::Light => 300,
            FontWeight::Regular => 400,
            FontWeight::Medium => 500,
            FontWeight::SemiBold => 600,
            FontWeight::Bold => 700,
            FontWeight::Numeric(n) => (*n).clamp(1, 1000),
        }
    }

    /// How far a registered weight is from this one, for nearest-match lookup.
    pub fn distance(&self, registered: u16) -> u32 {
        (self.numeric_value() as i32 - registered as i32).unsigned_abs()
    }

    fn parse(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(FontWeight::Light),
            "regular" | "normal" => Ok(FontWeight::Regular),
            "medium" => Ok(FontWeight::Medium),
            "semibold" | "semi-bold" => Ok(FontWeight::SemiBold),
            "bold" => Ok(FontWeight::Bold),
            other => other
                .parse::<u16>()
                .map(FontWeight::Numeric)
                .map_err(|_| format!("Invalid font weight: '{}'", s)),
        }
    }
}

impl<'de> Deserialize<'de> for FontWeight {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Str(String),
            Num(u16),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Str(s) => Self::parse(&s).map_err(de::Error::custom),
            Raw::Num(n) => Ok(FontWeight::Numeric(n)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semibold_maps_to_600() {
        assert_eq!(FontWeight::SemiBold.numeric_value(), FontWeight::EMPHASIS);
        let parsed: FontWeight = serde_json::from_str("\" SemiBold \"").unwrap();
        assert_eq!(parsed, FontWeight::SemiBold);
        let numeric: FontWeight = serde_json::from_str("650").unwrap();
        assert_eq!(numeric.numeric_value(), 650);
        assert!(serde_json::from_str::<FontWeight>("\"heavy-ish\"").is_err());
    }

    #[test]
    fn distance_is_symmetric_around_the_request() {
        assert_eq!(FontWeight::Regular.distance(600), 200);
        assert_eq!(FontWeight::Bold.distance(600), 100);
        assert_eq!(FontWeight::Numeric(0).distance(1), 0);
    }
}
