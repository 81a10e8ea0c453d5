//! Highlight palette.
//!
//! The backend stores a highlight colour as a nullable text column.  `NULL`
//! is the tombstone: a row whose colour is `NULL` renders exactly like a
//! verse that was never highlighted, and clearing a highlight is an ordinary
//! upsert of `NULL` rather than a delete.
//!
//! Older clients wrote presentation tokens (`bg-yellow-200`, and
//! `bg-transparent` for "removed").  Those are still understood on read but
//! never written.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighlightColor {
    Yellow,
    Green,
    Blue,
    Pink,
}

impl HighlightColor {
    pub const ALL: [HighlightColor; 4] = [Self::Yellow, Self::Green, Self::Blue, Self::Pink];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Pink => "pink",
        }
    }

    /// Interpret a stored column value.
    ///
    /// Returns `None` for `NULL`, for the legacy transparent token and for
    /// anything unrecognised.
    pub fn from_stored(value: Option<&str>) -> Option<Self> {
        let raw = value?.trim();
        match raw.parse::<HighlightLegacy>() {
            Ok(HighlightLegacy::Color(c)) => Some(c),
            Ok(HighlightLegacy::Transparent) => None,
            Err(()) => {
                tracing::warn!(value = %raw, "unrecognised stored highlight colour, treating as none");
                None
            }
        }
    }

    /// Column value to write for an optional colour.
    pub fn to_stored(color: Option<Self>) -> Option<&'static str> {
        color.map(|c| c.as_str())
    }
}

enum HighlightLegacy {
    Color(HighlightColor),
    Transparent,
}

impl FromStr for HighlightLegacy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        let name = lower
            .strip_prefix("bg-")
            .map(|rest| rest.split('-').next().unwrap_or(rest))
            .unwrap_or(lower.as_str());
        match name {
            "yellow" => Ok(Self::Color(HighlightColor::Yellow)),
            "green" => Ok(Self::Color(HighlightColor::Green)),
            "blue" => Ok(Self::Color(HighlightColor::Blue)),
            "pink" => Ok(Self::Color(HighlightColor::Pink)),
            "transparent" | "none" | "" => Ok(Self::Transparent),
            _ => Err(()),
        }
    }
}

impl fmt::Display for HighlightColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HighlightColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<HighlightLegacy>() {
            Ok(HighlightLegacy::Color(c)) => Ok(c),
            _ => Err(format!("not a highlight colour: {s}")),
        }
    }
}

impl Serialize for HighlightColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for HighlightColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_names_round_trip() {
        for c in HighlightColor::ALL {
            assert_eq!(c.as_str().parse::<HighlightColor>().unwrap(), c);
            assert_eq!(HighlightColor::from_stored(Some(c.as_str())), Some(c));
        }
    }

    #[test]
    fn null_is_no_highlight() {
        assert_eq!(HighlightColor::from_stored(None), None);
        assert_eq!(HighlightColor::to_stored(None), None);
    }

    #[test]
    fn legacy_tokens_are_normalised() {
        assert_eq!(
            HighlightColor::from_stored(Some("bg-yellow-200")),
            Some(HighlightColor::Yellow)
        );
        assert_eq!(
            HighlightColor::from_stored(Some("bg-pink-200")),
            Some(HighlightColor::Pink)
        );
        assert_eq!(HighlightColor::from_stored(Some("bg-transparent")), None);
    }

    #[test]
    fn unknown_values_read_as_none() {
        assert_eq!(HighlightColor::from_stored(Some("chartreuse")), None);
        assert!("chartreuse".parse::<HighlightColor>().is_err());
        assert!("bg-transparent".parse::<HighlightColor>().is_err());
    }

    #[test]
    fn serde_uses_lowercase_names() {
        assert_eq!(
            serde_json::to_string(&HighlightColor::Green).unwrap(),
            "\"green\""
        );
        let c: HighlightColor = serde_json::from_str("\"blue\"").unwrap();
        assert_eq!(c, HighlightColor::Blue);
    }
}
