//! Players and level arithmetic.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A display name guaranteed to be non-empty after trimming. Control
/// characters are stripped so a hand-edited roster cannot drive the terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerName(String);

#[derive(Debug, Error)]
#[error("player name must not be empty")]
pub struct EmptyNameError;

impl PlayerName {
    pub fn new(value: impl Into<String>) -> Result<Self, EmptyNameError> {
        let value: String = value.into().chars().filter(|c| !c.is_control()).collect();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Err(EmptyNameError)
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PlayerName {
    type Error = EmptyNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PlayerName> for String {
    fn from(value: PlayerName) -> Self {
        value.0
    }
}

impl AsRef<str> for PlayerName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Exp needed to advance from `level` to the next one.
#[must_use]
pub const fn required_exp(level: u32) -> u32 {
    50 + level.saturating_sub(1) * 25
}

/// Result of awarding exp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpGain {
    pub gained: u32,
    pub levels_gained: u32,
}

impl ExpGain {
    #[must_use]
    pub fn leveled_up(self) -> bool {
        self.levels_gained > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: u32,
    pub name: PlayerName,
    pub level: u32,
    pub exp: u32,
    pub avatar: String,
}

impl Player {
    #[must_use]
    pub fn new(id: u32, name: PlayerName, avatar: impl Into<String>) -> Self {
        Self {
            id,
            name,
            level: 1,
            exp: 0,
            avatar: avatar.into(),
        }
    }

    /// Add exp, carrying any surplus across as many level-ups as it covers.
    pub fn gain_exp(&mut self, amount: u32) -> ExpGain {
        let mut exp = self.exp.saturating_add(amount);
        let mut levels_gained = 0;
        let mut required = required_exp(self.level);
        while exp >= required {
            exp -= required;
            self.level += 1;
            levels_gained += 1;
            required = required_exp(self.level);
        }
        self.exp = exp;
        ExpGain {
            gained: amount,
            levels_gained,
        }
    }

    /// Exp still needed for the next level.
    #[must_use]
    pub fn exp_to_next(&self) -> u32 {
        required_exp(self.level).saturating_sub(self.exp)
    }

    /// Progress through the current level in `[0.0, 1.0]`.
    #[must_use]
    pub fn level_progress(&self) -> f64 {
        f64::from(self.exp) / f64::from(required_exp(self.level))
    }
}

/// The built-in roster every install starts with.
#[must_use]
pub fn default_players() -> Vec<Player> {
    [(1, "Puppy", "🐶"), (2, "Kitty", "🐱"), (3, "Panda", "🐼")]
        .into_iter()
        .filter_map(|(id, name, avatar)| {
            PlayerName::new(name)
                .ok()
                .map(|name| Player::new(id, name, avatar))
        })
        .collect()
}
