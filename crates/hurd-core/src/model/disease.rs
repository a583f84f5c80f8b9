use core::fmt;
use serde::{Deserialize, Serialize};

/// Cards of a single disease needed to discover its cure.
pub const CARDS_TO_CURE: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiseaseType {
    Yellow,
    Red,
    Black,
    Blue,
    Faded,
}

impl DiseaseType {
    pub const ALL: [DiseaseType; 5] = [
        DiseaseType::Yellow,
        DiseaseType::Red,
        DiseaseType::Black,
        DiseaseType::Blue,
        DiseaseType::Faded,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            DiseaseType::Yellow => "yellow",
            DiseaseType::Red => "red",
            DiseaseType::Black => "black",
            DiseaseType::Blue => "blue",
            DiseaseType::Faded => "faded",
        }
    }
}

impl fmt::Display for DiseaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static rules attached to a disease.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiseaseData {
    pub disease: DiseaseType,
    #[serde(default)]
    pub incurable: bool,
    #[serde(default)]
    pub untreatable: bool,
    /// Drawing the city's card from the city deck infects the city.
    #[serde(default)]
    pub infect_on_city_draw: bool,
    #[serde(default = "default_cards_to_cure")]
    pub cards_to_cure: u32,
}

impl DiseaseData {
    pub const fn standard(disease: DiseaseType) -> Self {
        Self {
            disease,
            incurable: false,
            untreatable: false,
            infect_on_city_draw: false,
            cards_to_cure: CARDS_TO_CURE,
        }
    }
}

fn default_cards_to_cure() -> u32 {
    CARDS_TO_CURE
}

/// Per-disease rules for a game, supplied at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiseaseTable {
    entries: Vec<DiseaseData>,
}

impl Default for DiseaseTable {
    fn default() -> Self {
        let blue = DiseaseData {
            incurable: true,
            untreatable: true,
            ..DiseaseData::standard(DiseaseType::Blue)
        };
        let faded = DiseaseData {
            incurable: true,
            untreatable: true,
            infect_on_city_draw: true,
            ..DiseaseData::standard(DiseaseType::Faded)
        };
        Self {
            entries: vec![
                DiseaseData::standard(DiseaseType::Yellow),
                DiseaseData::standard(DiseaseType::Red),
                DiseaseData::standard(DiseaseType::Black),
                blue,
                faded,
            ],
        }
    }
}

impl DiseaseTable {
    pub fn new(entries: Vec<DiseaseData>) -> Self {
        let mut table = Self {
            entries: Vec::with_capacity(entries.len()),
        };
        for entry in entries {
            table.set(entry);
        }
        table
    }

    /// Rules for `disease`; diseases missing from the table follow the standard rules.
    pub fn get(&self, disease: DiseaseType) -> DiseaseData {
        self.entries
            .iter()
            .find(|entry| entry.disease == disease)
            .copied()
            .unwrap_or(DiseaseData::standard(disease))
    }

    /// Inserts or replaces the rules for one disease.
    pub fn set(&mut self, data: DiseaseData) {
        match self
            .entries
            .iter_mut()
            .find(|entry| entry.disease == data.disease)
        {
            Some(existing) => *existing = data,
            None => self.entries.push(data),
        }
    }

    pub fn curable(&self) -> impl Iterator<Item = DiseaseType> + '_ {
        DiseaseType::ALL
            .into_iter()
            .filter(|disease| !self.get(*disease).incurable)
    }
}
