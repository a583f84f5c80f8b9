use hurd_core::deck::scenario::MAX_EPIDEMICS;
use hurd_core::game::GameSetup;
use hurd_core::game::state::DEFAULT_INFECTION_RATE;
use hurd_core::model::card::CityName;
use hurd_core::model::city::{City, MAX_INFECTIONS};
use hurd_core::model::disease::{DiseaseData, DiseaseTable, DiseaseType};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

const DEFAULT_LOG_FILE: &str = "logs/{game_name}.jsonl";
const GAME_NAME_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

/// Root game configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GameConfig {
    pub game_name: String,
    pub epidemics: usize,
    #[serde(default)]
    pub funded_events: usize,
    #[serde(default = "default_infection_rate")]
    pub infection_rate: usize,
    pub cities: Vec<CityConfig>,
    #[serde(default)]
    pub players: Vec<PlayerConfig>,
    /// Overrides of the default disease rules.
    #[serde(default)]
    pub diseases: Vec<DiseaseData>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GameConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: GameConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_game_name(&self.game_name)?;
        self.validate_counts()?;
        let known = validate_cities(&self.cities)?;
        validate_players(&self.players, &known)?;
        validate_diseases(&self.diseases)?;
        self.logging.normalize();
        Ok(())
    }

    fn validate_counts(&self) -> Result<(), ValidationError> {
        if self.epidemics == 0 || self.epidemics > MAX_EPIDEMICS {
            return Err(ValidationError::InvalidField {
                field: "epidemics".to_string(),
                message: format!("epidemics must be between 1 and {MAX_EPIDEMICS}"),
            });
        }

        if self.infection_rate == 0 {
            return Err(ValidationError::InvalidField {
                field: "infection_rate".to_string(),
                message: "infection rate must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    /// Disease rules with the configured overrides applied.
    pub fn disease_table(&self) -> DiseaseTable {
        let mut table = DiseaseTable::default();
        for data in &self.diseases {
            table.set(*data);
        }
        table
    }

    pub fn setup(&self) -> GameSetup {
        let cities = self
            .cities
            .iter()
            .map(|city| {
                let mut state = City::new(&city.name, city.disease);
                state.set_infections(city.infections);
                state
            })
            .collect();
        let mut setup = GameSetup::new(cities, self.epidemics);
        setup.funded_events = self.funded_events;
        setup.infection_rate = self.infection_rate;
        setup.start_hands = self
            .players
            .iter()
            .flat_map(|player| player.start_cards.iter().map(CityName::new))
            .collect();
        setup.diseases = self.disease_table();
        setup
    }

    /// Structured log path with `{game_name}` substituted.
    pub fn resolved_log_file(&self) -> PathBuf {
        self.logging.resolved_file(&self.game_name)
    }
}

/// One city of the board.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct CityConfig {
    pub name: String,
    pub disease: DiseaseType,
    /// Cubes already on the city when tracking starts.
    #[serde(default)]
    pub infections: u8,
}

/// A player and the city cards dealt to them.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct PlayerConfig {
    pub name: String,
    #[serde(default)]
    pub start_cards: Vec<String>,
    #[serde(default)]
    pub scientist: bool,
}

impl PlayerConfig {
    /// Cards the player's role removes from every cure.
    pub fn cure_bonus(&self) -> u32 {
        u32::from(self.scientist)
    }
}

/// Logging configuration defaults to human-readable logs on stderr.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
            log_file: default_log_file(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
        if self.log_file.trim().is_empty() {
            self.log_file = default_log_file();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }

    pub fn resolved_file(&self, game_name: &str) -> PathBuf {
        resolve_template(game_name, &self.log_file)
    }
}

fn default_infection_rate() -> usize {
    DEFAULT_INFECTION_RATE
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    DEFAULT_LOG_FILE.to_string()
}

fn validate_game_name(game_name: &str) -> Result<(), ValidationError> {
    if game_name.trim().is_empty() {
        return Err(ValidationError::InvalidField {
            field: "game_name".to_string(),
            message: "game_name must not be empty".to_string(),
        });
    }

    if !game_name.chars().all(|c| GAME_NAME_ALLOWED.contains(c)) {
        return Err(ValidationError::InvalidField {
            field: "game_name".to_string(),
            message: "game_name may only contain alphanumeric characters, '.', '_' or '-'"
                .to_string(),
        });
    }

    Ok(())
}

fn validate_cities(cities: &[CityConfig]) -> Result<HashSet<CityName>, ValidationError> {
    if cities.is_empty() {
        return Err(ValidationError::InvalidField {
            field: "cities".to_string(),
            message: "at least one city must be specified".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for city in cities {
        if city.name.trim().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "cities.name".to_string(),
                message: "city name must not be empty".to_string(),
            });
        }

        if city.infections > MAX_INFECTIONS {
            return Err(ValidationError::InvalidField {
                field: format!("cities[{}].infections", city.name),
                message: format!("a city holds at most {MAX_INFECTIONS} cubes"),
            });
        }

        if !seen.insert(CityName::new(&city.name)) {
            return Err(ValidationError::InvalidField {
                field: "cities".to_string(),
                message: format!("city '{}' defined more than once", city.name),
            });
        }
    }

    Ok(seen)
}

fn validate_players(
    players: &[PlayerConfig],
    known: &HashSet<CityName>,
) -> Result<(), ValidationError> {
    let mut names = HashSet::new();
    let mut dealt = HashSet::new();
    for player in players {
        if player.name.trim().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "players.name".to_string(),
                message: "player name must not be empty".to_string(),
            });
        }

        if !names.insert(player.name.clone()) {
            return Err(ValidationError::InvalidField {
                field: "players".to_string(),
                message: format!("player '{}' defined more than once", player.name),
            });
        }

        for card in &player.start_cards {
            let card = CityName::new(card);
            if !known.contains(&card) {
                return Err(ValidationError::InvalidField {
                    field: format!("players[{}].start_cards", player.name),
                    message: format!("'{card}' is not a configured city"),
                });
            }
            if !dealt.insert(card.clone()) {
                return Err(ValidationError::InvalidField {
                    field: format!("players[{}].start_cards", player.name),
                    message: format!("'{card}' was dealt more than once"),
                });
            }
        }
    }

    Ok(())
}

fn validate_diseases(diseases: &[DiseaseData]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for data in diseases {
        if !seen.insert(data.disease) {
            return Err(ValidationError::InvalidField {
                field: "diseases".to_string(),
                message: format!("disease '{}' overridden more than once", data.disease),
            });
        }
        if data.cards_to_cure == 0 {
            return Err(ValidationError::InvalidField {
                field: format!("diseases[{}].cards_to_cure", data.disease),
                message: "a cure needs at least one card".to_string(),
            });
        }
    }
    Ok(())
}

fn resolve_template(game_name: &str, template: &str) -> PathBuf {
    PathBuf::from(template.replace("{game_name}", game_name))
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}
