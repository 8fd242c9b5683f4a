use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The six canonical battle attributes.
///
/// `key()` is the name used in attribute maps coming from the data source;
/// parsing also accepts the long-form aliases (`vitality`, `offense`, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stat {
    #[serde(rename = "hp", alias = "vitality")]
    Vitality,
    #[serde(rename = "attack", alias = "offense")]
    Offense,
    #[serde(rename = "defense")]
    Defense,
    #[serde(rename = "special-attack", alias = "special-offense")]
    SpecialOffense,
    #[serde(rename = "special-defense")]
    SpecialDefense,
    #[serde(rename = "speed")]
    Speed,
}

impl Stat {
    pub const ALL: [Stat; 6] = [
        Stat::Vitality,
        Stat::Offense,
        Stat::Defense,
        Stat::SpecialOffense,
        Stat::SpecialDefense,
        Stat::Speed,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Stat::Vitality => "hp",
            Stat::Offense => "attack",
            Stat::Defense => "defense",
            Stat::SpecialOffense => "special-attack",
            Stat::SpecialDefense => "special-defense",
            Stat::Speed => "speed",
        }
    }

    /// Human-readable label ("Special Attack").
    pub fn label(self) -> &'static str {
        match self {
            Stat::Vitality => "HP",
            Stat::Offense => "Attack",
            Stat::Defense => "Defense",
            Stat::SpecialOffense => "Special Attack",
            Stat::SpecialDefense => "Special Defense",
            Stat::Speed => "Speed",
        }
    }

    /// Default weight applied by a fresh weight configuration.
    pub fn default_weight(self) -> f64 {
        match self {
            Stat::Vitality => 1.0,
            Stat::Offense => 2.0,
            Stat::Defense => 1.5,
            Stat::SpecialOffense => 2.0,
            Stat::SpecialDefense => 1.5,
            Stat::Speed => 1.0,
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Returned when a string names none of the six stats.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown stat '{0}'")]
pub struct UnknownStat(pub String);

impl FromStr for Stat {
    type Err = UnknownStat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "hp" | "vitality" => Ok(Stat::Vitality),
            "attack" | "offense" => Ok(Stat::Offense),
            "defense" => Ok(Stat::Defense),
            "special-attack" | "special-offense" => Ok(Stat::SpecialOffense),
            "special-defense" => Ok(Stat::SpecialDefense),
            "speed" => Ok(Stat::Speed),
            _ => Err(UnknownStat(s.to_string())),
        }
    }
}

/// Formats an attribute key for display: `special-attack` -> `Special Attack`.
pub fn attribute_label(key: &str) -> String {
    if let Ok(stat) = key.parse::<Stat>() {
        return stat.label().to_string();
    }
    key.split(['-', '_'])
        .filter(|part| !part.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Upper-cases the first character and lower-cases the rest.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
