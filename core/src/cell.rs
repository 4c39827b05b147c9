use serde::{Deserialize, Serialize};

/// Full logical state of one board cell.
///
/// This is a plain value type: undo snapshots are copies of it, so later
/// mutation of the live cell never leaks into a recorded batch.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub is_mine: bool,
    pub is_revealed: bool,
    pub is_flagged: bool,
    /// Mine neutralized by the firewall, always flagged and never revealed.
    pub is_defused: bool,
    pub neighbor_mines: u8,
}

impl Cell {
    /// Neither revealed nor flagged.
    pub const fn is_hidden(&self) -> bool {
        !self.is_revealed && !self.is_flagged
    }

    pub(crate) const fn visual(&self, triggered: bool) -> CellVisual {
        if self.is_defused {
            CellVisual::Defused
        } else if self.is_flagged {
            CellVisual::Flagged
        } else if self.is_revealed && self.is_mine {
            CellVisual::Mine { triggered }
        } else if self.is_revealed {
            CellVisual::Revealed(self.neighbor_mines)
        } else {
            CellVisual::Hidden
        }
    }
}

/// What a renderer should draw for a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellVisual {
    Hidden,
    Flagged,
    Revealed(u8),
    Mine { triggered: bool },
    Defused,
}

impl Default for CellVisual {
    fn default() -> Self {
        Self::Hidden
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defused_takes_priority_over_flag() {
        let cell = Cell {
            is_mine: true,
            is_flagged: true,
            is_defused: true,
            ..Default::default()
        };

        assert_eq!(cell.visual(false), CellVisual::Defused);
        assert!(!cell.is_hidden());
    }

    #[test]
    fn revealed_mine_reports_trigger() {
        let cell = Cell {
            is_mine: true,
            is_revealed: true,
            ..Default::default()
        };

        assert_eq!(cell.visual(true), CellVisual::Mine { triggered: true });
        assert_eq!(cell.visual(false), CellVisual::Mine { triggered: false });
    }
}
