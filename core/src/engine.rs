use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::num::Saturating;
use hashbrown::HashSet;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EngineState {
    Ready,
    Active,
    Won,
    Lost,
}

impl EngineState {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::Ready
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RevealOptions {
    /// Leave mines hidden instead of detonating them.
    pub bypass_mine: bool,
    /// Part of a power-up, the caller runs the win check once at the end.
    pub from_power: bool,
}

impl RevealOptions {
    pub const PLAYER: Self = Self {
        bypass_mine: false,
        from_power: false,
    };

    pub const SCANNER: Self = Self {
        bypass_mine: true,
        from_power: true,
    };

    pub const POWER: Self = Self {
        bypass_mine: false,
        from_power: true,
    };
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayEngine {
    board: Board,
    powers: PowerState,
    undo_log: UndoLog,
    revealed_safe: Saturating<CellCount>,
    flag_count: Saturating<CellCount>,
    state: EngineState,
    first_move: bool,
    triggered_mine: Option<Coord2>,
    #[serde(skip)]
    changed: Vec<Coord2>,
}

impl PlayEngine {
    pub fn new(board: Board) -> Self {
        Self::with_powers(board, PowerLoadout::default())
    }

    pub fn with_powers(board: Board, loadout: PowerLoadout) -> Self {
        Self {
            board,
            powers: PowerState::new(loadout),
            undo_log: UndoLog::default(),
            revealed_safe: Saturating(0),
            flag_count: Saturating(0),
            state: Default::default(),
            first_move: true,
            triggered_mine: None,
            changed: Vec::new(),
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn is_first_move(&self) -> bool {
        self.first_move
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn size(&self) -> Coord2 {
        self.board.size()
    }

    pub fn total_mines(&self) -> CellCount {
        self.board.mine_count()
    }

    pub fn mines_left(&self) -> isize {
        (self.board.mine_count() as isize) - (self.flag_count.0 as isize)
    }

    pub fn flag_count(&self) -> CellCount {
        self.flag_count.0
    }

    pub fn revealed_safe(&self) -> CellCount {
        self.revealed_safe.0
    }

    pub fn powers(&self) -> &PowerState {
        &self.powers
    }

    pub fn undo_log(&self) -> &UndoLog {
        &self.undo_log
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self.board[coords]
    }

    pub fn cell_visual(&self, coords: Coord2) -> CellVisual {
        self.board[coords].visual(self.triggered_mine == Some(coords))
    }

    /// Positions touched since the last call, in mutation order, possibly repeated.
    pub fn take_changes(&mut self) -> Vec<Coord2> {
        core::mem::take(&mut self.changed)
    }

    pub fn reveal_tile(
        &mut self,
        coords: Coord2,
        options: RevealOptions,
        shared_batch: Option<&mut Batch>,
    ) -> Result<RevealOutcome> {
        let coords = self.board.validate_coords(coords)?;
        self.check_not_finished()?;

        if !self.board[coords].is_hidden() {
            return Ok(RevealOutcome::NoChange);
        }

        if self.first_move {
            self.board.ensure_first_move_safe(coords);
            self.first_move = false;
            self.mark_started();
        }

        let mut outcome = match shared_batch {
            Some(batch) => self.perform_reveal(coords, batch, options),
            None => {
                let mut batch = Batch::default();
                let outcome = self.perform_reveal(coords, &mut batch, options);
                self.undo_log.push_batch(batch);
                outcome
            }
        };

        if !options.from_power && self.check_win_condition() {
            outcome = RevealOutcome::Won;
        }
        Ok(outcome)
    }

    pub(crate) fn perform_reveal(
        &mut self,
        coords: Coord2,
        batch: &mut Batch,
        options: RevealOptions,
    ) -> RevealOutcome {
        use RevealOutcome::*;

        let prior = self.board[coords];
        if !prior.is_hidden() {
            return NoChange;
        }

        self.board[coords].is_revealed = true;
        batch.record(coords, prior);

        if prior.is_mine {
            if options.bypass_mine {
                self.board[coords] = prior;
                batch.discard_last();
                return NoChange;
            }

            if self.powers.consume(PowerUp::Firewall).is_ok() {
                let cell = &mut self.board[coords];
                cell.is_revealed = false;
                cell.is_flagged = true;
                cell.is_defused = true;
                self.flag_count += 1;
                self.changed.push(coords);
                log::info!("Firewall contained the incident at {:?}", coords);
                return Defused;
            }

            self.triggered_mine = Some(coords);
            self.changed.push(coords);
            self.reveal_all_mines();
            self.end_game(false);
            return HitMine;
        }

        self.revealed_safe += 1;
        self.changed.push(coords);
        log::debug!(
            "Revealed cell at {:?}, mine count: {}",
            coords,
            prior.neighbor_mines
        );

        if prior.neighbor_mines == 0 {
            self.flood_reveal(coords, batch);
        }
        Revealed
    }

    /// Breadth-first cascade from a zero cell; numbered cells are opened but do not spread.
    pub(crate) fn flood_reveal(&mut self, origin: Coord2, batch: &mut Batch) {
        let mut visited = HashSet::new();
        let mut to_visit = VecDeque::from([origin]);
        log::trace!("Starting flood-fill from {:?}", origin);

        while let Some(visit_coords) = to_visit.pop_front() {
            if !visited.insert(visit_coords) {
                continue;
            }

            let prior = self.board[visit_coords];
            if prior.is_mine || prior.is_flagged {
                continue;
            }

            if !prior.is_revealed {
                self.board[visit_coords].is_revealed = true;
                batch.record(visit_coords, prior);
                self.revealed_safe += 1;
                self.changed.push(visit_coords);
                log::trace!(
                    "Flood opened cell at {:?}, mine count: {}",
                    visit_coords,
                    prior.neighbor_mines
                );
            }

            if prior.neighbor_mines > 0 {
                continue;
            }

            let board = &self.board;
            to_visit.extend(board.iter_neighbors(visit_coords).filter(|&pos| {
                let cell = &board[pos];
                !cell.is_revealed && !cell.is_flagged && !cell.is_mine && !visited.contains(&pos)
            }));
        }
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<FlagOutcome> {
        let coords = self.board.validate_coords(coords)?;
        self.check_not_finished()?;

        let prior = self.board[coords];
        if prior.is_revealed || prior.is_defused {
            return Ok(FlagOutcome::NoChange);
        }

        self.board[coords].is_flagged = !prior.is_flagged;
        if prior.is_flagged {
            self.flag_count -= 1;
        } else {
            self.flag_count += 1;
        }
        self.changed.push(coords);

        let mut batch = Batch::default();
        batch.record(coords, prior);
        self.undo_log.push_batch(batch);

        Ok(if self.check_win_condition() {
            FlagOutcome::Won
        } else {
            FlagOutcome::Changed
        })
    }

    /// Reveals the 3×3 block around `center` as one undo batch, never exposing a mine.
    pub fn use_port_scanner(&mut self, center: Coord2) -> Result<RevealOutcome> {
        let center = self.board.validate_coords(center)?;
        self.check_not_finished()?;
        self.powers.check(PowerUp::Scanner)?;

        let mut batch = Batch::default();
        let mut outcome = RevealOutcome::NoChange;
        for coords in self.board.iter_area(center) {
            outcome = outcome | self.reveal_tile(coords, RevealOptions::SCANNER, Some(&mut batch))?;
        }
        log::debug!("Port scan at {:?} opened {} cells", center, batch.len());
        self.undo_log.push_batch(batch);
        self.powers.consume(PowerUp::Scanner)?;

        if self.check_win_condition() {
            outcome = RevealOutcome::Won;
        }
        Ok(outcome)
    }

    /// Opens a random hidden safe cell (and its cascade) as one undo batch.
    ///
    /// Without any candidate this is a no-op and keeps the charge.
    pub fn reveal_cluster<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<RevealOutcome> {
        self.check_not_finished()?;
        self.powers.check(PowerUp::Network)?;

        let candidates: Vec<Coord2> = self
            .board
            .iter_cells()
            .filter(|(_, cell)| cell.is_hidden() && !cell.is_mine)
            .map(|(coords, _)| coords)
            .collect();
        let Some(&origin) = candidates.choose(rng) else {
            log::debug!("Network map found no hidden safe cell");
            return Ok(RevealOutcome::NoChange);
        };

        self.first_move = false;
        self.mark_started();

        let mut batch = Batch::default();
        let mut outcome = self.perform_reveal(origin, &mut batch, RevealOptions::POWER);
        log::debug!("Network map from {:?} opened {} cells", origin, batch.len());
        self.undo_log.push_batch(batch);
        self.powers.consume(PowerUp::Network)?;

        if self.check_win_condition() {
            outcome = RevealOutcome::Won;
        }
        Ok(outcome)
    }

    /// Pops the last batch and restores every cell in it, returning how many cells were restored.
    pub fn use_undo(&mut self) -> Result<usize> {
        self.check_not_finished()?;
        self.powers.check(PowerUp::Undo)?;
        let batch = self.undo_log.pop().ok_or(GameError::EmptyUndoLog)?;

        for entry in batch.iter() {
            self.board[entry.coords] = entry.prior;
            self.changed.push(entry.coords);
        }
        self.recompute_counters();
        self.powers.consume(PowerUp::Undo)?;

        log::debug!(
            "Undo restored {} cells, {} batches left",
            batch.len(),
            self.undo_log.len()
        );
        Ok(batch.len())
    }

    /// Wins when every safe cell is open, every mine is flagged or revealed and no safe cell carries a flag.
    pub fn check_win_condition(&mut self) -> bool {
        if self.state.is_finished() {
            return false;
        }

        let all_safe_revealed = self.revealed_safe.0 >= self.board.safe_cell_count();
        let correctly_flagged = self.board.iter_cells().all(|(_, cell)| {
            if cell.is_mine {
                cell.is_flagged || cell.is_revealed
            } else {
                !cell.is_flagged
            }
        });

        if all_safe_revealed && correctly_flagged {
            self.end_game(true);
            true
        } else {
            false
        }
    }

    fn recompute_counters(&mut self) {
        self.revealed_safe = Saturating(self.board.count_revealed_safe());
        self.flag_count = Saturating(self.board.count_flags());
    }

    fn reveal_all_mines(&mut self) {
        for coords in self.board.iter_coords() {
            let cell = &mut self.board[coords];
            if cell.is_mine && cell.is_hidden() {
                cell.is_revealed = true;
                self.changed.push(coords);
            }
        }
    }

    fn mark_started(&mut self) {
        if matches!(self.state, EngineState::Ready) {
            self.state = EngineState::Active;
        }
    }

    fn end_game(&mut self, won: bool) {
        if self.state.is_finished() {
            return;
        }

        self.state = if won {
            EngineState::Won
        } else {
            EngineState::Lost
        };
        log::debug!("Game ended, won: {}", won);
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn engine(size: Coord2, mines: &[Coord2]) -> PlayEngine {
        PlayEngine::new(Board::from_mine_coords(size, mines).unwrap())
    }

    fn engine_with(size: Coord2, mines: &[Coord2], loadout: PowerLoadout) -> PlayEngine {
        PlayEngine::with_powers(Board::from_mine_coords(size, mines).unwrap(), loadout)
    }

    fn reveal(engine: &mut PlayEngine, coords: Coord2) -> RevealOutcome {
        engine
            .reveal_tile(coords, RevealOptions::PLAYER, None)
            .unwrap()
    }

    #[test]
    fn first_reveal_never_hits_a_mine() {
        let mut engine = engine((2, 2), &[(0, 0)]);

        let outcome = reveal(&mut engine, (0, 0));

        assert_eq!(outcome, RevealOutcome::Revealed);
        assert!(!engine.cell_at((0, 0)).is_mine);
        assert!(engine.cell_at((0, 1)).is_mine);
        assert_eq!(engine.total_mines(), 1);
        assert_eq!(engine.cell_visual((0, 0)), CellVisual::Revealed(1));
        assert_eq!(engine.state(), EngineState::Active);
    }

    #[test]
    fn mine_hit_without_firewall_loses_and_shows_all_mines() {
        let mut engine = engine_with((1, 5), &[(0, 0), (0, 4)], PowerLoadout::new(0, 2, 2, 3));
        reveal(&mut engine, (0, 2));

        let outcome = reveal(&mut engine, (0, 0));

        assert_eq!(outcome, RevealOutcome::HitMine);
        assert_eq!(engine.state(), EngineState::Lost);
        assert_eq!(engine.triggered_mine(), Some((0, 0)));
        assert_eq!(engine.cell_visual((0, 0)), CellVisual::Mine { triggered: true });
        assert_eq!(engine.cell_visual((0, 4)), CellVisual::Mine { triggered: false });
    }

    #[test]
    fn firewall_defuses_one_mine_hit() {
        let mut engine = engine((1, 5), &[(0, 0), (0, 4)]);
        reveal(&mut engine, (0, 2));

        let outcome = reveal(&mut engine, (0, 0));

        assert_eq!(outcome, RevealOutcome::Defused);
        assert_eq!(engine.state(), EngineState::Active);
        assert_eq!(engine.powers().charges(PowerUp::Firewall), 0);
        let cell = engine.cell_at((0, 0));
        assert!(cell.is_flagged && cell.is_defused && !cell.is_revealed);
        assert_eq!(engine.cell_visual((0, 0)), CellVisual::Defused);
        assert_eq!(engine.revealed_safe(), 3);
        assert_eq!(engine.flag_count(), 1);
        assert_eq!(engine.toggle_flag((0, 0)), Ok(FlagOutcome::NoChange));

        assert_eq!(reveal(&mut engine, (0, 4)), RevealOutcome::HitMine);
    }

    #[test]
    fn defused_mine_counts_toward_win() {
        let mut engine = engine((1, 5), &[(0, 0), (0, 4)]);
        reveal(&mut engine, (0, 2));
        reveal(&mut engine, (0, 0));

        assert_eq!(engine.toggle_flag((0, 4)), Ok(FlagOutcome::Won));
        assert_eq!(engine.state(), EngineState::Won);
        assert_eq!(engine.powers().used_count(), 1);
    }

    #[test]
    fn flood_reveal_opens_zero_region_and_stops_at_numbers() {
        let mut engine = engine((3, 3), &[(2, 2)]);

        assert_eq!(reveal(&mut engine, (0, 0)), RevealOutcome::Revealed);

        assert_eq!(engine.cell_visual((0, 0)), CellVisual::Revealed(0));
        assert_eq!(engine.cell_visual((1, 1)), CellVisual::Revealed(1));
        assert_eq!(engine.cell_visual((2, 2)), CellVisual::Hidden);
        assert_eq!(engine.revealed_safe(), 8);
        assert_eq!(engine.undo_log().len(), 1);
        assert_eq!(engine.undo_log().peek().map(Batch::len), Some(8));
    }

    #[test]
    fn flood_reveal_is_idempotent() {
        let mut engine = engine((3, 3), &[(2, 2)]);
        reveal(&mut engine, (0, 0));
        let before = engine.board().clone();

        let mut batch = Batch::default();
        engine.flood_reveal((0, 0), &mut batch);

        assert!(batch.is_empty());
        assert_eq!(engine.board(), &before);
        assert_eq!(engine.revealed_safe(), 8);
    }

    #[test]
    fn flood_reveal_skips_flagged_cells() {
        let mut engine = engine((3, 3), &[(2, 2)]);
        engine.toggle_flag((0, 2)).unwrap();

        reveal(&mut engine, (0, 0));

        assert_eq!(engine.cell_visual((0, 2)), CellVisual::Flagged);
        assert_eq!(engine.revealed_safe(), 7);
    }

    #[test]
    fn toggle_flag_adjusts_count_and_ignores_revealed() {
        let mut engine = engine((2, 2), &[(0, 0)]);

        assert_eq!(engine.toggle_flag((1, 0)), Ok(FlagOutcome::Changed));
        assert_eq!(engine.flag_count(), 1);
        assert_eq!(engine.mines_left(), 0);
        assert_eq!(engine.toggle_flag((1, 0)), Ok(FlagOutcome::Changed));
        assert_eq!(engine.flag_count(), 0);

        reveal(&mut engine, (1, 1));
        assert_eq!(engine.toggle_flag((1, 1)), Ok(FlagOutcome::NoChange));
        assert_eq!(engine.toggle_flag((2, 0)), Err(GameError::InvalidCoords));
    }

    #[test]
    fn out_of_bounds_reveal_is_rejected() {
        let mut engine = engine((2, 2), &[(0, 0)]);

        assert_eq!(
            engine.reveal_tile((5, 5), RevealOptions::PLAYER, None),
            Err(GameError::InvalidCoords)
        );
        assert!(engine.is_first_move());
    }

    #[test]
    fn win_needs_flagged_mines_on_small_board() {
        let mut engine = engine((2, 2), &[(0, 0)]);

        reveal(&mut engine, (1, 1));
        reveal(&mut engine, (0, 1));
        assert_eq!(reveal(&mut engine, (1, 0)), RevealOutcome::Revealed);
        assert_eq!(engine.state(), EngineState::Active);

        assert_eq!(engine.toggle_flag((0, 0)), Ok(FlagOutcome::Won));
        assert!(engine.is_finished());
    }

    #[test]
    fn flagged_safe_cell_blocks_win() {
        let mut engine = engine((2, 2), &[(0, 0)]);
        reveal(&mut engine, (1, 1));
        reveal(&mut engine, (0, 1));
        engine.toggle_flag((0, 0)).unwrap();

        assert_eq!(engine.toggle_flag((1, 0)), Ok(FlagOutcome::Changed));
        assert_eq!(engine.state(), EngineState::Active);

        engine.toggle_flag((1, 0)).unwrap();
        assert_eq!(reveal(&mut engine, (1, 0)), RevealOutcome::Won);
    }

    #[test]
    fn undo_restores_exact_prior_board() {
        let mut engine = engine((3, 3), &[(0, 0)]);
        reveal(&mut engine, (0, 1));
        let before = engine.board().clone();

        reveal(&mut engine, (2, 2));
        assert_eq!(engine.revealed_safe(), 8);

        assert_eq!(engine.use_undo(), Ok(7));
        assert_eq!(engine.board(), &before);
        assert_eq!(engine.revealed_safe(), 1);
        assert_eq!(engine.powers().charges(PowerUp::Undo), 2);
        assert_eq!(engine.undo_log().len(), 1);
    }

    #[test]
    fn undo_reverts_flag_toggle() {
        let mut engine = engine((2, 2), &[(0, 0)]);
        engine.toggle_flag((1, 1)).unwrap();

        engine.use_undo().unwrap();

        assert_eq!(engine.cell_visual((1, 1)), CellVisual::Hidden);
        assert_eq!(engine.flag_count(), 0);
    }

    #[test]
    fn undo_with_empty_log_keeps_charge() {
        let mut engine = engine((2, 2), &[(0, 0)]);

        assert_eq!(engine.use_undo(), Err(GameError::EmptyUndoLog));
        assert_eq!(engine.powers().charges(PowerUp::Undo), 3);
    }

    #[test]
    fn undo_without_charge_keeps_log() {
        let mut engine = engine_with((2, 2), &[(0, 0)], PowerLoadout::new(1, 2, 2, 0));
        reveal(&mut engine, (1, 1));

        assert_eq!(engine.use_undo(), Err(GameError::NoCharges(PowerUp::Undo)));
        assert_eq!(engine.undo_log().len(), 1);
        assert_eq!(engine.cell_visual((1, 1)), CellVisual::Revealed(1));
    }

    #[test]
    fn undo_after_firewall_hides_mine_again() {
        let mut engine = engine((1, 5), &[(0, 0), (0, 4)]);
        reveal(&mut engine, (0, 2));
        reveal(&mut engine, (0, 0));

        engine.use_undo().unwrap();

        assert_eq!(engine.cell_at((0, 0)), Cell {
            is_mine: true,
            neighbor_mines: 0,
            ..Default::default()
        });
        assert_eq!(engine.flag_count(), 0);
        assert_eq!(engine.powers().charges(PowerUp::Firewall), 0);
    }

    #[test]
    fn undo_keeps_first_move_relocation() {
        let mut engine = engine((2, 2), &[(0, 0)]);
        reveal(&mut engine, (0, 0));

        engine.use_undo().unwrap();

        assert_eq!(engine.cell_visual((0, 0)), CellVisual::Hidden);
        assert!(!engine.cell_at((0, 0)).is_mine);
        assert!(engine.cell_at((0, 1)).is_mine);
        assert!(!engine.is_first_move());
    }

    #[test]
    fn scanner_never_reveals_mines() {
        let mut engine = engine((3, 3), &[(0, 0), (2, 2)]);

        let outcome = engine.use_port_scanner((1, 1)).unwrap();

        assert_eq!(outcome, RevealOutcome::Revealed);
        assert_eq!(engine.cell_visual((0, 0)), CellVisual::Hidden);
        assert_eq!(engine.cell_visual((2, 2)), CellVisual::Hidden);
        assert_eq!(engine.revealed_safe(), 7);
        assert_eq!(engine.powers().charges(PowerUp::Scanner), 1);
        assert_eq!(engine.powers().charges(PowerUp::Firewall), 1);
        assert_eq!(engine.undo_log().len(), 1);
        assert_eq!(engine.state(), EngineState::Active);
    }

    #[test]
    fn scanner_batch_undoes_as_one() {
        let mut engine = engine((3, 3), &[(0, 0), (2, 2)]);
        let before = engine.board().clone();
        engine.use_port_scanner((0, 2)).unwrap();

        engine.use_undo().unwrap();

        assert_eq!(engine.board(), &before);
        assert!(engine.undo_log().is_empty());
    }

    #[test]
    fn scanner_requires_charge() {
        let mut engine = engine_with((3, 3), &[(0, 0)], PowerLoadout::new(1, 0, 2, 3));

        assert_eq!(
            engine.use_port_scanner((1, 1)),
            Err(GameError::NoCharges(PowerUp::Scanner))
        );
        assert_eq!(engine.revealed_safe(), 0);
    }

    #[test]
    fn network_never_selects_a_mine() {
        let mines = &[(0, 0), (0, 1), (0, 2), (1, 0), (1, 2), (2, 0), (2, 2)];
        for seed in 0..32 {
            let mut engine = engine((3, 3), mines);
            let mut rng = SmallRng::seed_from_u64(seed);

            let outcome = engine.reveal_cluster(&mut rng).unwrap();

            assert_eq!(outcome, RevealOutcome::Revealed);
            assert_eq!(engine.revealed_safe(), 1);
            assert!(engine.board().iter_cells().all(|(_, cell)| !(cell.is_mine && cell.is_revealed)));
            assert_eq!(engine.powers().charges(PowerUp::Network), 1);
            assert!(!engine.is_first_move());
        }
    }

    #[test]
    fn network_without_candidates_keeps_charge() {
        let mut engine = engine((1, 2), &[(0, 0)]);
        reveal(&mut engine, (0, 1));
        let mut rng = SmallRng::seed_from_u64(1);

        assert_eq!(engine.reveal_cluster(&mut rng), Ok(RevealOutcome::NoChange));
        assert_eq!(engine.powers().charges(PowerUp::Network), 2);
    }

    #[test]
    fn finished_game_rejects_moves() {
        let mut engine = engine_with((1, 5), &[(0, 0), (0, 4)], PowerLoadout::new(0, 2, 2, 3));
        reveal(&mut engine, (0, 2));
        reveal(&mut engine, (0, 4));

        assert_eq!(
            engine.reveal_tile((0, 0), RevealOptions::PLAYER, None),
            Err(GameError::AlreadyEnded)
        );
        assert_eq!(engine.toggle_flag((0, 0)), Err(GameError::AlreadyEnded));
        assert_eq!(engine.use_undo(), Err(GameError::AlreadyEnded));
        assert_eq!(engine.use_port_scanner((0, 2)), Err(GameError::AlreadyEnded));
        let mut rng = SmallRng::seed_from_u64(3);
        assert_eq!(engine.reveal_cluster(&mut rng), Err(GameError::AlreadyEnded));
        assert_eq!(engine.powers().remaining(), PowerLoadout::new(0, 2, 2, 3));
    }

    #[test]
    fn take_changes_reports_touched_cells() {
        let mut engine = engine((1, 3), &[(0, 0)]);
        reveal(&mut engine, (0, 2));

        let changes = engine.take_changes();

        assert_eq!(changes, [(0, 2), (0, 1)]);
        assert!(engine.take_changes().is_empty());
    }
}
