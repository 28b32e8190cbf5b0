//! Addition problems and difficulty tiers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::manipulator::Addends;

/// Difficulty tier. Decides addend ranges and the exp a correct answer earns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
    Bonus,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Bonus,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Bonus => "bonus",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Bonus => "Bonus",
        }
    }

    /// Exp earned for one correct answer.
    #[must_use]
    pub const fn exp_reward(self) -> u32 {
        match self {
            Difficulty::Easy => 10,
            Difficulty::Medium => 15,
            Difficulty::Hard => 20,
            Difficulty::Bonus => 25,
        }
    }

    /// Next tier, wrapping from Bonus back to Easy.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Bonus,
            Difficulty::Bonus => Difficulty::Easy,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One problem: two addends, or three on the bonus tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Problem {
    pub num1: u32,
    pub num2: u32,
    pub num3: Option<u32>,
}

impl Problem {
    #[must_use]
    pub const fn new(num1: u32, num2: u32, num3: Option<u32>) -> Self {
        Self { num1, num2, num3 }
    }

    #[must_use]
    pub fn answer(&self) -> u32 {
        self.num1 + self.num2 + self.num3.unwrap_or(0)
    }

    /// Addends for a manipulator session.
    #[must_use]
    pub fn addends(&self) -> Addends {
        Addends::new(self.num1, self.num2, self.num3)
    }
}

impl Default for Problem {
    fn default() -> Self {
        Self::new(1, 1, None)
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {}", self.num1, self.num2)?;
        if let Some(num3) = self.num3 {
            write!(f, " + {num3}")?;
        }
        Ok(())
    }
}
