#![no_std]

extern crate alloc;

use core::fmt;
use core::ops::BitOr;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use input::*;
pub use power::*;
pub use session::*;
pub use types::*;
pub use undo::*;
pub use view::*;

mod board;
mod cell;
mod engine;
mod error;
mod generator;
mod input;
mod power;
mod session;
mod types;
mod undo;
mod view;

/// Fraction of the board covered by mines, kept exact so the floor is computed in integers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MineRate {
    pub numerator: CellCount,
    pub denominator: CellCount,
}

impl MineRate {
    pub const fn one_in(denominator: CellCount) -> Self {
        Self {
            numerator: 1,
            denominator,
        }
    }

    /// `floor(total * rate)`
    pub const fn apply(self, total: CellCount) -> CellCount {
        if self.denominator == 0 {
            return total;
        }
        let scaled = total as u32 * self.numerator as u32 / self.denominator as u32;
        if scaled > CellCount::MAX as u32 {
            CellCount::MAX
        } else {
            scaled as CellCount
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub mine_rate: MineRate,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, mine_rate: MineRate) -> Self {
        Self { size, mine_rate }
    }

    /// Rejects shapes with fewer than two cells, which leave no room for a safe first move.
    pub fn new(size: Coord2, mine_rate: MineRate) -> Result<Self> {
        if mult(size.0, size.1) < 2 {
            return Err(GameError::TooManyMines);
        }
        Ok(Self::new_unchecked(size, mine_rate))
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    /// `max(1, floor(rows * cols * rate))`, capped so at least one cell stays safe.
    pub fn mine_count(&self) -> CellCount {
        let total = self.total_cells();
        let wanted = self.mine_rate.apply(total).max(1);
        let limit = total.saturating_sub(1).max(1);
        if wanted > limit {
            log::warn!(
                "Requested {} mines but only {} fit with a safe first move",
                wanted,
                limit
            );
        }
        wanted.min(limit)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Self::Easy, Self::Medium, Self::Hard];

    pub const fn config(self) -> GameConfig {
        use Difficulty::*;
        match self {
            Easy => GameConfig::new_unchecked((10, 10), MineRate::one_in(12)),
            Medium => GameConfig::new_unchecked((16, 16), MineRate::one_in(10)),
            Hard => GameConfig::new_unchecked((22, 22), MineRate::one_in(8)),
        }
    }

    pub const fn key(self) -> &'static str {
        use Difficulty::*;
        match self {
            Easy => "easy",
            Medium => "medium",
            Hard => "hard",
        }
    }

    pub const fn label(self) -> &'static str {
        use Difficulty::*;
        match self {
            Easy => "Easy",
            Medium => "Medium",
            Hard => "Hard",
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Easy
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|difficulty| difficulty.key().eq_ignore_ascii_case(s.trim()))
            .ok_or(GameError::UnknownDifficulty)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FlagOutcome {
    NoChange,
    Changed,
    Won,
}

impl FlagOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
            Self::Won => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    Defused,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            Defused => true,
            HitMine => true,
            Won => true,
        }
    }
}

/// Used to merge outcomes when revealing several cells in one action
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (HitMine, _) => HitMine,
            (_, HitMine) => HitMine,
            (Won, _) => Won,
            (_, Won) => Won,
            (Defused, _) => Defused,
            (_, Defused) => Defused,
            (Revealed, _) => Revealed,
            (_, Revealed) => Revealed,
            (NoChange, NoChange) => NoChange,
        }
    }
}
