use super::card::CityName;
use super::disease::DiseaseType;
use serde::{Deserialize, Serialize};

/// Infection cubes a city can hold before the next infection outbreaks.
pub const MAX_INFECTIONS: u8 = 3;

/// Board state of one city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub name: CityName,
    pub disease: DiseaseType,
    #[serde(default)]
    pub infections: u8,
    #[serde(default)]
    pub quarantined: bool,
}

impl City {
    pub fn new(name: impl AsRef<str>, disease: DiseaseType) -> Self {
        Self {
            name: CityName::new(name),
            disease,
            infections: 0,
            quarantined: false,
        }
    }

    /// Adds a cube; returns `true` when the city was already full (an outbreak).
    pub fn infect(&mut self) -> bool {
        if self.infections >= MAX_INFECTIONS {
            return true;
        }
        self.infections += 1;
        false
    }

    pub fn epidemic(&mut self) {
        self.infections = MAX_INFECTIONS;
    }

    pub fn set_infections(&mut self, infections: u8) {
        self.infections = infections.min(MAX_INFECTIONS);
    }

    pub const fn is_full(&self) -> bool {
        self.infections >= MAX_INFECTIONS
    }
}
