use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::*;

/// One player's game from difficulty selection to the terminal report.
///
/// All input goes through here. Rejected input (out-of-bounds cells, spent power-ups, moves after the game ended)
/// is logged and otherwise ignored: the methods return `false` and the view hears nothing.
pub struct GameSession<V: GameView> {
    view: V,
    rng: SmallRng,
    difficulty: Difficulty,
    loadout: PowerLoadout,
    engine: PlayEngine,
    timer_secs: u32,
    active_power: Option<PowerUp>,
    selection: Coord2,
    long_press: LongPress,
    reported: bool,
}

impl<V: GameView> GameSession<V> {
    pub fn new(view: V, seed: u64, difficulty: Difficulty) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let loadout = PowerLoadout::default();
        let engine = generate_engine(&mut rng, difficulty, loadout);
        Self::from_parts(view, rng, difficulty, loadout, engine)
    }

    /// Starts a session on a prepared engine instead of a random board.
    pub fn with_engine(view: V, seed: u64, difficulty: Difficulty, engine: PlayEngine) -> Self {
        let rng = SmallRng::seed_from_u64(seed);
        let loadout = engine.powers().remaining();
        Self::from_parts(view, rng, difficulty, loadout, engine)
    }

    fn from_parts(
        view: V,
        rng: SmallRng,
        difficulty: Difficulty,
        loadout: PowerLoadout,
        engine: PlayEngine,
    ) -> Self {
        let mut session = Self {
            view,
            rng,
            difficulty,
            loadout,
            engine,
            timer_secs: 0,
            active_power: None,
            selection: (0, 0),
            long_press: LongPress::default(),
            reported: false,
        };
        log::debug!("Session started on {}", difficulty);
        session.announce_board();
        session
    }

    /// Throws the current game away and deals a fresh board.
    pub fn start(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.engine = generate_engine(&mut self.rng, difficulty, self.loadout);
        self.timer_secs = 0;
        self.active_power = None;
        self.selection = (0, 0);
        self.long_press.cancel();
        self.reported = false;
        log::debug!("New game on {}", difficulty);
        self.announce_board();
    }

    pub fn reset(&mut self) {
        self.start(self.difficulty);
    }

    /// Replays the whole board to the view, keeping the current layout and progress.
    pub fn relayout(&mut self) {
        self.announce_board();
    }

    pub fn engine(&self) -> &PlayEngine {
        &self.engine
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.timer_secs
    }

    pub fn active_power(&self) -> Option<PowerUp> {
        self.active_power
    }

    pub fn selection(&self) -> Coord2 {
        self.selection
    }

    pub fn is_finished(&self) -> bool {
        self.engine.is_finished()
    }

    pub fn hud(&self) -> Hud {
        Hud {
            difficulty: self.difficulty,
            mines_remaining: self.engine.mines_left().max(0) as CellCount,
            elapsed_secs: self.timer_secs,
            charges: self.engine.powers().remaining(),
            active_power: self.active_power,
        }
    }

    /// Reveal request from a click or the keyboard; goes to the scanner while it is selected.
    pub fn request_reveal(&mut self, coords: Coord2) -> bool {
        if self.active_power == Some(PowerUp::Scanner) {
            return self.use_port_scanner(coords);
        }

        let result = self
            .engine
            .reveal_tile(coords, RevealOptions::PLAYER, None)
            .inspect(|outcome| {
                if matches!(outcome, RevealOutcome::Defused) {
                    self.view.notify(Notice::FirewallContained);
                }
            })
            .map(RevealOutcome::has_update);
        self.finish_action("reveal", result)
    }

    pub fn request_flag_toggle(&mut self, coords: Coord2) -> bool {
        let result = self
            .engine
            .toggle_flag(coords)
            .map(FlagOutcome::has_update);
        self.finish_action("flag", result)
    }

    pub fn request_undo(&mut self) -> bool {
        let result = self.engine.use_undo().map(|restored| restored > 0);
        self.finish_action("undo", result)
    }

    /// Player pressed a power-up button.
    ///
    /// Undo and network fire immediately, scanner toggles the target selection, firewall only announces itself.
    pub fn activate_power(&mut self, power: PowerUp) -> bool {
        if self.engine.is_finished() {
            return false;
        }

        match power {
            PowerUp::Undo => self.request_undo(),
            _ if !self.engine.powers().has_charge(power) => {
                log::debug!("{} has no charges left", power);
                false
            }
            PowerUp::Firewall => {
                self.view.notify(Notice::FirewallArmed);
                false
            }
            PowerUp::Scanner => {
                self.active_power = if self.active_power == Some(power) {
                    None
                } else {
                    Some(power)
                };
                self.publish_hud();
                true
            }
            PowerUp::Network => {
                let result = self
                    .engine
                    .reveal_cluster(&mut self.rng)
                    .map(RevealOutcome::has_update);
                self.active_power = None;
                self.finish_action("network", result)
            }
        }
    }

    fn use_port_scanner(&mut self, coords: Coord2) -> bool {
        let result = self
            .engine
            .use_port_scanner(coords)
            .map(|_| true);
        if result.is_ok() {
            self.active_power = None;
        }
        self.finish_action("scanner", result)
    }

    /// One-second tick; time stops once the game is over.
    pub fn tick(&mut self) {
        if self.engine.is_finished() {
            return;
        }
        self.timer_secs = self.timer_secs.saturating_add(1);
        self.publish_hud();
    }

    /// Returns whether anything changed, including just the cursor.
    pub fn handle_key(&mut self, key: Key) -> bool {
        match key {
            Key::Confirm => self.request_reveal(self.selection),
            Key::Flag => self.request_flag_toggle(self.selection),
            _ => {
                let next = move_selection(self.selection, key, self.engine.size());
                let moved = next != self.selection;
                self.selection = next;
                moved
            }
        }
    }

    pub fn pointer_down(&mut self, coords: Coord2, button: PointerButton) -> PointerAction {
        match button {
            PointerButton::Secondary => {
                self.request_flag_toggle(coords);
                PointerAction::None
            }
            PointerButton::Primary => {
                if let Some(previous) = self.long_press.start(coords) {
                    log::trace!("Long press at {:?} replaced", previous);
                }
                PointerAction::StartLongPress(coords)
            }
        }
    }

    /// The adapter's long-press timer fired: flag the pressed cell.
    pub fn long_press_elapsed(&mut self) -> bool {
        match self.long_press.fire() {
            Some(coords) => self.request_flag_toggle(coords),
            None => false,
        }
    }

    /// Releasing before the long press fired is a reveal.
    pub fn pointer_up(&mut self, coords: Coord2) -> bool {
        match self.long_press.cancel() {
            Some(_) => self.request_reveal(coords),
            None => false,
        }
    }

    pub fn pointer_leave(&mut self) {
        if let Some(coords) = self.long_press.cancel() {
            log::trace!("Long press at {:?} cancelled", coords);
        }
    }

    pub fn has_pending_long_press(&self) -> bool {
        self.long_press.is_pending()
    }

    fn finish_action(&mut self, action: &str, result: Result<bool>) -> bool {
        match result {
            Ok(true) => {
                self.flush_changes();
                self.publish_hud();
                self.report_if_finished();
                true
            }
            Ok(false) => false,
            Err(err) => {
                log::debug!("{} rejected: {}", action, err);
                false
            }
        }
    }

    fn flush_changes(&mut self) {
        let mut changes = self.engine.take_changes();
        changes.sort_unstable();
        changes.dedup();
        for coords in changes {
            self.view
                .cell_changed(coords, self.engine.cell_visual(coords));
        }
    }

    fn announce_board(&mut self) {
        self.engine.take_changes();
        self.view.board_rebuilt(self.engine.size());
        for coords in self.engine.board().iter_coords() {
            self.view
                .cell_changed(coords, self.engine.cell_visual(coords));
        }
        self.publish_hud();
    }

    fn publish_hud(&mut self) {
        let hud = self.hud();
        self.view.hud_changed(&hud);
    }

    fn report_if_finished(&mut self) {
        if self.reported {
            return;
        }

        let report = match self.engine.state() {
            EngineState::Won => GameReport::Won {
                elapsed_secs: self.timer_secs,
                flags_used: self.engine.flag_count(),
                power_ups_used: self.engine.powers().used_count(),
            },
            EngineState::Lost => GameReport::Lost {
                elapsed_secs: self.timer_secs,
                triggered: self.engine.triggered_mine(),
            },
            EngineState::Ready | EngineState::Active => return,
        };
        self.reported = true;
        self.active_power = None;
        self.long_press.cancel();
        log::debug!("Game over: {:?}", report);
        self.view.game_ended(&report);
    }
}

fn generate_engine(rng: &mut SmallRng, difficulty: Difficulty, loadout: PowerLoadout) -> PlayEngine {
    let generator = RandomBoardGenerator::new(rng.random());
    PlayEngine::with_powers(generator.generate(difficulty.config()), loadout)
}
