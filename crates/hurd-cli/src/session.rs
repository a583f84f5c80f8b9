use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use hurd_core::game::{GameSnapshot, GameState};
use serde::{Deserialize, Serialize};

use crate::config::PlayerConfig;

/// A tracked game as written to disk between sessions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavedSession {
    pub game_name: String,
    #[serde(default)]
    pub players: Vec<PlayerConfig>,
    pub snapshot: GameSnapshot,
}

impl SavedSession {
    pub fn capture(game_name: &str, players: &[PlayerConfig], game: &GameState) -> Self {
        Self {
            game_name: game_name.to_string(),
            players: players.to_vec(),
            snapshot: GameSnapshot::capture(game),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating snapshot directory at {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("serialising game snapshot")?;
        fs::write(path, json)
            .with_context(|| format!("writing snapshot to {}", path.display()))?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("reading snapshot from {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("parsing snapshot {}", path.display()))
    }

    /// Rebuilds the game, consuming the session's snapshot.
    pub fn restore(self) -> Result<(String, Vec<PlayerConfig>, GameState)> {
        let game = self
            .snapshot
            .restore()
            .context("snapshot does not describe a consistent game")?;
        Ok((self.game_name, self.players, game))
    }
}
