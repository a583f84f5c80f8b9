//! Deck models.
//!
//! - `scenario`: striation layouts of the city deck still consistent with observed draws.
//! - `city`: city deck bookkeeping that feeds the scenario model.
//! - `infection`: the infection deck as a stack of striations.
//! - `layout`: seeded physical city decks for replaying a realistic game.

pub mod city;
pub mod infection;
pub mod layout;
pub mod scenario;

pub use city::CityDeck;
pub use infection::{InfectionDeck, Striation};
pub use layout::DeckLayout;
pub use scenario::{EpidemicAnalysis, Scenario, ScenarioModel};
