pub mod cure;
pub mod snapshot;
pub mod state;

pub use cure::{CureRequest, cure_probability};
pub use snapshot::GameSnapshot;
pub use state::{CityOutlook, GameSetup, GameState};
