//! Player roster persistence.
//!
//! The roster is a JSON array of players stored at `<data_dir>/players.json`.
//! Loading never fails the app: missing or unreadable files fall back to the
//! default players, and warnings go to the log.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tally_types::{EmptyNameError, ExpGain, Player, PlayerName, default_players};
use tally_utils::{atomic_write, recover_bak_file};
use thiserror::Error;

pub const ROSTER_FILE: &str = "players.json";

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("roster I/O failed at {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("roster at {} is not valid JSON: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug)]
pub struct Roster {
    /// `None` keeps the roster in memory only.
    path: Option<PathBuf>,
    players: Vec<Player>,
}

impl Roster {
    /// Open the roster in `dir`, seeding and repairing it as needed.
    #[must_use]
    pub fn open(dir: Option<&Path>) -> Self {
        let Some(dir) = dir else {
            tracing::warn!("No data directory; roster changes will not be saved");
            return Self::in_memory(default_players());
        };
        let path = dir.join(ROSTER_FILE);
        recover_bak_file(&path);

        let (players, dirty) = match read_players(&path) {
            Ok(Some(stored)) => fill_defaults(stored),
            Ok(None) => (default_players(), true),
            Err(err) => {
                tracing::warn!("{err}; using default players");
                // Leave the unreadable file untouched until the next real change.
                (default_players(), false)
            }
        };

        let roster = Self {
            path: Some(path),
            players,
        };
        if dirty && let Err(err) = roster.save() {
            tracing::warn!("Failed to seed roster: {err}");
        }
        roster
    }

    #[must_use]
    pub fn in_memory(players: Vec<Player>) -> Self {
        Self {
            path: None,
            players,
        }
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn get(&self, id: u32) -> Option<&Player> {
        self.players.iter().find(|player| player.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn save(&self) -> Result<(), RosterError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_vec_pretty(&self.players).map_err(|source| RosterError::Json {
            path: path.clone(),
            source,
        })?;
        atomic_write(path, &json).map_err(|source| RosterError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), players = self.players.len(), "Saved roster");
        Ok(())
    }

    /// Award exp to a player and persist. `None` if the id is unknown. The
    /// gain applies in memory even when saving fails.
    pub fn award_exp(&mut self, id: u32, amount: u32) -> Option<(ExpGain, Result<(), RosterError>)> {
        let player = self.players.iter_mut().find(|player| player.id == id)?;
        let gain = player.gain_exp(amount);
        Some((gain, self.save()))
    }

    /// Rename a player and persist.
    pub fn rename(&mut self, id: u32, name: &str) -> Result<bool, RenameError> {
        let name = PlayerName::new(name)?;
        let Some(player) = self.players.iter_mut().find(|player| player.id == id) else {
            return Ok(false);
        };
        player.name = name;
        self.save()?;
        Ok(true)
    }
}

#[derive(Debug, Error)]
pub enum RenameError {
    #[error(transparent)]
    Empty(#[from] EmptyNameError),
    #[error(transparent)]
    Roster(#[from] RosterError),
}

fn read_players(path: &Path) -> Result<Option<Vec<Player>>, RosterError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(RosterError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|source| RosterError::Json {
            path: path.to_path_buf(),
            source,
        })
}

/// Append any default player whose id is missing from a short roster.
/// Returns whether anything was added.
fn fill_defaults(mut players: Vec<Player>) -> (Vec<Player>, bool) {
    let defaults = default_players();
    if players.len() >= defaults.len() {
        return (players, false);
    }
    let before = players.len();
    for default in defaults {
        if players.iter().all(|player| player.id != default.id) {
            players.push(default);
        }
    }
    let added = players.len() > before;
    (players, added)
}
