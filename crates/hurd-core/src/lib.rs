#![deny(warnings)]
pub mod combinatorics;
pub mod deck;
pub mod error;
pub mod game;
pub mod model;

pub use error::{DeckError, GameError};

pub struct AppInfo;

impl AppInfo {
    pub const fn name() -> &'static str {
        "nerd-hurd"
    }

    pub const fn codename() -> &'static str {
        "Assist-o-tron"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}
