use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Everything the heads-up display shows.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    pub difficulty: Difficulty,
    /// Never below zero, even with more flags than mines.
    pub mines_remaining: CellCount,
    pub elapsed_secs: u32,
    pub charges: PowerLoadout,
    pub active_power: Option<PowerUp>,
}

/// Terminal report, emitted once per game.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameReport {
    Won {
        elapsed_secs: u32,
        flags_used: CellCount,
        power_ups_used: u16,
    },
    Lost {
        elapsed_secs: u32,
        triggered: Option<Coord2>,
    },
}

impl GameReport {
    pub const fn is_win(&self) -> bool {
        matches!(self, Self::Won { .. })
    }
}

/// Short-lived messages, shown as toasts by the web UI.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notice {
    FirewallArmed,
    FirewallContained,
}

impl Notice {
    pub const fn message(self) -> &'static str {
        match self {
            Self::FirewallArmed => "Firewall auto-blocks the next incident.",
            Self::FirewallContained => "Firewall contained the incident.",
        }
    }
}

/// Port through which a [`GameSession`] notifies its presentation layer.
pub trait GameView {
    /// A new grid was built or must be laid out again; every cell follows with `cell_changed`.
    fn board_rebuilt(&mut self, size: Coord2);

    fn cell_changed(&mut self, coords: Coord2, visual: CellVisual);

    fn hud_changed(&mut self, hud: &Hud);

    fn game_ended(&mut self, report: &GameReport);

    fn notify(&mut self, _notice: Notice) {}
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ViewEvent {
    BoardRebuilt(Coord2),
    CellChanged(Coord2, CellVisual),
    HudChanged(Hud),
    GameEnded(GameReport),
    Notice(Notice),
}

/// Records view events in order, for adapters that render in batches and for tests.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventQueue {
    events: Vec<ViewEvent>,
}

impl EventQueue {
    pub fn drain(&mut self) -> impl Iterator<Item = ViewEvent> + '_ {
        self.events.drain(..)
    }

    pub fn events(&self) -> &[ViewEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl GameView for EventQueue {
    fn board_rebuilt(&mut self, size: Coord2) {
        self.events.push(ViewEvent::BoardRebuilt(size));
    }

    fn cell_changed(&mut self, coords: Coord2, visual: CellVisual) {
        self.events.push(ViewEvent::CellChanged(coords, visual));
    }

    fn hud_changed(&mut self, hud: &Hud) {
        self.events.push(ViewEvent::HudChanged(*hud));
    }

    fn game_ended(&mut self, report: &GameReport) {
        self.events.push(ViewEvent::GameEnded(*report));
    }

    fn notify(&mut self, notice: Notice) {
        self.events.push(ViewEvent::Notice(notice));
    }
}
