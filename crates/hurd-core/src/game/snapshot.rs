use super::state::GameState;
use crate::deck::{CityDeck, InfectionDeck};
use crate::error::GameError;
use crate::model::city::City;
use crate::model::disease::DiseaseTable;
use serde::{Deserialize, Serialize};

/// Bumped whenever the snapshot layout changes incompatibly.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameSnapshot {
    pub version: u32,
    pub infection_rate: usize,
    #[serde(default)]
    pub outbreaks: usize,
    pub cities: Vec<City>,
    pub diseases: DiseaseTable,
    pub city_deck: CityDeck,
    pub infection_deck: InfectionDeck,
}

impl GameSnapshot {
    pub fn capture(state: &GameState) -> Self {
        GameSnapshot {
            version: SNAPSHOT_VERSION,
            infection_rate: state.infection_rate(),
            outbreaks: state.outbreaks(),
            cities: state.cities().cloned().collect(),
            diseases: state.diseases().clone(),
            city_deck: state.city_deck().clone(),
            infection_deck: state.infection_deck().clone(),
        }
    }

    pub fn restore(self) -> Result<GameState, GameError> {
        GameState::from_parts(
            self.cities,
            self.city_deck,
            self.infection_deck,
            self.diseases,
            self.infection_rate,
            self.outbreaks,
        )
    }

    pub fn to_json(state: &GameState) -> serde_json::Result<String> {
        let snapshot = Self::capture(state);
        serde_json::to_string_pretty(&snapshot)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::GameSnapshot;
    use crate::error::{DeckError, GameError};
    use crate::game::state::{GameSetup, GameState};
    use crate::model::card::CityName;
    use crate::model::city::City;
    use crate::model::disease::DiseaseType;

    fn played_game() -> GameState {
        let cities = ["Atlanta", "Chicago", "Miami", "Lima", "Cairo", "Delhi", "Tokyo", "Paris"]
            .iter()
            .zip(DiseaseType::ALL.iter().cycle())
            .map(|(name, disease)| City::new(name, *disease))
            .collect();
        let mut setup = GameSetup::new(cities, 3);
        setup.funded_events = 1;
        let mut state = GameState::new(setup).expect("valid setup");
        state.draw_city_card(&CityName::new("Lima")).unwrap();
        state.draw_funded_event().unwrap();
        state.infect(&CityName::new("Cairo")).unwrap();
        state.epidemic(&CityName::new("Delhi")).unwrap();
        state.quarantine(&CityName::new("Tokyo")).unwrap();
        state
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let state = played_game();
        let json = GameSnapshot::to_json(&state).unwrap();
        assert!(json.contains("\"version\": 1"));
        assert!(json.contains("\"infection_rate\": 2"));
        assert!(json.contains("\"funded_event\""));
    }

    #[test]
    fn roundtrip_preserves_every_query() {
        let state = played_game();
        let json = GameSnapshot::to_json(&state).unwrap();
        let restored = GameSnapshot::from_json(&json).unwrap().restore().unwrap();
        assert_eq!(restored, state);

        let before = state.cities_by_severity().unwrap();
        let after = restored.cities_by_severity().unwrap();
        assert_eq!(before, after);
        assert_eq!(
            state.epidemic_analysis().unwrap(),
            restored.epidemic_analysis().unwrap()
        );
    }

    #[test]
    fn restored_game_keeps_playing() {
        let state = played_game();
        let mut restored = GameSnapshot::capture(&state).restore().unwrap();
        restored.infect(&CityName::new("Delhi")).unwrap();
        assert_eq!(
            restored.city(&CityName::new("Delhi")).unwrap().infections,
            3
        );
    }

    #[test]
    fn restore_rejects_duplicate_cities() {
        let state = played_game();
        let mut snapshot = GameSnapshot::capture(&state);
        snapshot.cities.push(City::new("lima", DiseaseType::Red));
        assert_eq!(
            snapshot.restore(),
            Err(GameError::DuplicateCity(CityName::new("lima")))
        );
    }

    #[test]
    fn inconsistent_games_restore_with_the_same_answers() {
        let cities = vec![
            City::new("a", DiseaseType::Blue),
            City::new("b", DiseaseType::Blue),
        ];
        let mut state = GameState::new(GameSetup::new(cities, 2)).unwrap();
        state.draw_city_card(&CityName::new("a")).unwrap();
        state.draw_city_card(&CityName::new("b")).unwrap();
        assert!(!state.city_deck().model().is_consistent());

        let json = GameSnapshot::to_json(&state).unwrap();
        let restored = GameSnapshot::from_json(&json).unwrap().restore().unwrap();
        assert_eq!(restored, state);
        assert_eq!(
            restored.epidemic_analysis(),
            Err(GameError::Deck(DeckError::Inconsistent))
        );
        assert_eq!(
            restored.probability_of_city(&CityName::new("a")),
            state.probability_of_city(&CityName::new("a"))
        );
    }
}
