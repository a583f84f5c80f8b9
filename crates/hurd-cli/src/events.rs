//! Scripted game events replayed against a [`GameState`].
//!
//! A script is a YAML list of externally tagged events:
//!
//! ```yaml
//! - city_draw: Atlanta
//! - funded_event
//! - infect: Lima
//! - epidemic: Cairo
//! - set_infections: { city: Tokyo, infections: 2 }
//! - treat: Tokyo
//! ```

use crate::config::ConfigError;
use core::fmt;
use hurd_core::GameError;
use hurd_core::game::GameState;
use hurd_core::model::card::CityName;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

const LOG_TARGET: &str = "nerd_hurd::events";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameEvent {
    CityDraw(String),
    FundedEvent,
    Infect(String),
    Epidemic(String),
    Quarantine(String),
    RemoveQuarantine(String),
    SetInfections { city: String, infections: u8 },
    Treat(String),
    InfectionRate(usize),
}

impl GameEvent {
    pub fn apply(&self, game: &mut GameState) -> Result<(), GameError> {
        match self {
            GameEvent::CityDraw(city) => game.draw_city_card(&CityName::new(city)),
            GameEvent::FundedEvent => game.draw_funded_event(),
            GameEvent::Infect(city) => {
                let outbreak = game.infect(&CityName::new(city))?;
                if outbreak {
                    warn!(target: LOG_TARGET, city = %city, "infection caused an outbreak");
                }
                Ok(())
            }
            GameEvent::Epidemic(city) => game.epidemic(&CityName::new(city)),
            GameEvent::Quarantine(city) => game.quarantine(&CityName::new(city)),
            GameEvent::RemoveQuarantine(city) => game.remove_quarantine(&CityName::new(city)),
            GameEvent::SetInfections { city, infections } => {
                game.set_infections(&CityName::new(city), *infections)
            }
            GameEvent::Treat(city) => game.treat(&CityName::new(city)),
            GameEvent::InfectionRate(rate) => game.set_infection_rate(*rate),
        }
    }
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEvent::CityDraw(city) => write!(f, "city draw {city}"),
            GameEvent::FundedEvent => f.write_str("funded event"),
            GameEvent::Infect(city) => write!(f, "infect {city}"),
            GameEvent::Epidemic(city) => write!(f, "epidemic in {city}"),
            GameEvent::Quarantine(city) => write!(f, "quarantine {city}"),
            GameEvent::RemoveQuarantine(city) => write!(f, "remove quarantine from {city}"),
            GameEvent::SetInfections { city, infections } => {
                write!(f, "set {city} to {infections} infections")
            }
            GameEvent::Treat(city) => write!(f, "treat {city}"),
            GameEvent::InfectionRate(rate) => write!(f, "infection rate {rate}"),
        }
    }
}

/// Parses a YAML event script. Events with a payload are written as single-key maps.
pub fn parse_events(yaml: &str) -> Result<Vec<GameEvent>, serde_yaml::Error> {
    serde_yaml::with::singleton_map_recursive::deserialize(serde_yaml::Deserializer::from_str(yaml))
}

/// Reads an event script from disk.
pub fn load_events(path: impl AsRef<Path>) -> Result<Vec<GameEvent>, ConfigError> {
    let path = path.as_ref();
    let yaml = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        source,
        path: path.to_path_buf(),
    })?;
    parse_events(&yaml).map_err(|source| ConfigError::Parse {
        source,
        path: path.to_path_buf(),
    })
}

/// An event of a script that the game rejected.
#[derive(Debug, Error)]
#[error("event #{position} ({event}) failed: {source}")]
pub struct ReplayError {
    /// One-based position in the script.
    pub position: usize,
    pub event: GameEvent,
    #[source]
    pub source: GameError,
}

/// Applies `events` in order, stopping at the first rejected event.
pub fn replay(game: &mut GameState, events: &[GameEvent]) -> Result<usize, ReplayError> {
    for (offset, event) in events.iter().enumerate() {
        event.apply(game).map_err(|source| ReplayError {
            position: offset + 1,
            event: event.clone(),
            source,
        })?;
        debug!(target: LOG_TARGET, position = offset + 1, event = %event, "applied event");
    }
    Ok(events.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hurd_core::DeckError;
    use hurd_core::game::GameSetup;
    use hurd_core::model::city::City;
    use hurd_core::model::disease::DiseaseType;

    const SCRIPT: &str = r#"
- city_draw: Atlanta
- funded_event
- infect: Lima
- epidemic: Cairo
- quarantine: Tokyo
- remove_quarantine: Tokyo
- set_infections: { city: Lima, infections: 3 }
- treat: Lima
- infection_rate: 3
"#;

    fn game() -> GameState {
        let cities = vec![
            City::new("Atlanta", DiseaseType::Blue),
            City::new("Lima", DiseaseType::Yellow),
            City::new("Cairo", DiseaseType::Black),
            City::new("Tokyo", DiseaseType::Red),
        ];
        let mut setup = GameSetup::new(cities, 2);
        setup.funded_events = 1;
        GameState::new(setup).expect("valid setup")
    }

    #[test]
    fn parses_every_event_kind() {
        let events = parse_events(SCRIPT).expect("parse script");
        assert_eq!(events.len(), 9);
        assert_eq!(events[0], GameEvent::CityDraw("Atlanta".to_string()));
        assert_eq!(events[1], GameEvent::FundedEvent);
        assert_eq!(
            events[6],
            GameEvent::SetInfections {
                city: "Lima".to_string(),
                infections: 3
            }
        );
        assert_eq!(events[7], GameEvent::Treat("Lima".to_string()));
        assert_eq!(events[8], GameEvent::InfectionRate(3));
    }

    #[test]
    fn replay_applies_events_in_order() {
        let events = parse_events(SCRIPT).expect("parse script");
        let mut game = game();
        assert_eq!(replay(&mut game, &events).expect("replay"), 9);

        assert_eq!(game.infection_rate(), 3);
        assert_eq!(game.city_deck().epidemics_drawn(), 1);
        let cairo = game.city(&CityName::new("cairo")).expect("known");
        assert_eq!(cairo.infections, 3);
        let tokyo = game.city(&CityName::new("tokyo")).expect("known");
        assert!(!tokyo.quarantined);
        let lima = game.city(&CityName::new("lima")).expect("known");
        assert_eq!(lima.infections, 2);
    }

    #[test]
    fn loads_a_script_file_with_every_event_kind() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("events.yaml");
        fs::write(&path, SCRIPT).expect("write script");

        let events = load_events(&path).expect("load script");
        assert_eq!(
            events,
            vec![
                GameEvent::CityDraw("Atlanta".to_string()),
                GameEvent::FundedEvent,
                GameEvent::Infect("Lima".to_string()),
                GameEvent::Epidemic("Cairo".to_string()),
                GameEvent::Quarantine("Tokyo".to_string()),
                GameEvent::RemoveQuarantine("Tokyo".to_string()),
                GameEvent::SetInfections {
                    city: "Lima".to_string(),
                    infections: 3
                },
                GameEvent::Treat("Lima".to_string()),
                GameEvent::InfectionRate(3),
            ]
        );
    }

    #[test]
    fn unknown_events_are_parse_errors() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("events.yaml");
        fs::write(&path, "- teleport: Lima\n").expect("write script");

        let err = load_events(&path).expect_err("unknown event");
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert_eq!(err.path(), path.as_path());
    }

    #[test]
    fn replay_reports_the_failing_position() {
        let events = vec![
            GameEvent::Infect("Lima".to_string()),
            GameEvent::Infect("lima".to_string()),
        ];
        let mut game = game();
        let err = replay(&mut game, &events).expect_err("second draw fails");
        assert_eq!(err.position, 2);
        assert_eq!(
            err.source,
            GameError::Deck(DeckError::AlreadyDrawn {
                name: CityName::new("lima")
            })
        );
        assert!(err.to_string().starts_with("event #2 (infect lima)"));
    }

    #[test]
    fn zero_infection_rate_is_rejected() {
        let events = parse_events("- infection_rate: 2\n- infection_rate: 0\n").expect("parse");
        let mut game = game();
        let err = replay(&mut game, &events).expect_err("rate of zero");
        assert_eq!(err.position, 2);
        assert_eq!(err.source, GameError::InvalidInfectionRate);
        assert_eq!(game.infection_rate(), 2);
    }
}
