use core::fmt;
use serde::{Deserialize, Serialize};

/// Case-insensitive city identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct CityName(String);

impl CityName {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for CityName {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<&str> for CityName {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<CityName> for String {
    fn from(name: CityName) -> Self {
        name.0
    }
}

impl fmt::Display for CityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A card of the city (player) deck.
///
/// Cities are identified by name; epidemics and funded events are fungible.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Card {
    City(CityName),
    Epidemic,
    FundedEvent,
}

impl Card {
    pub fn city(name: impl AsRef<str>) -> Self {
        Card::City(CityName::new(name))
    }

    pub const fn is_epidemic(&self) -> bool {
        matches!(self, Card::Epidemic)
    }

    pub fn city_name(&self) -> Option<&CityName> {
        match self {
            Card::City(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Card::City(name) => write!(f, "{name}"),
            Card::Epidemic => f.write_str("Epidemic!"),
            Card::FundedEvent => f.write_str("Funded Event"),
        }
    }
}
