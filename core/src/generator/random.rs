use alloc::vec::Vec;
use ndarray::Array2;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use super::*;

/// Purely random placement: every cell is equally likely to hold a mine.
///
/// First-move safety is applied later by the engine, once the first cell is known.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomBoardGenerator {
    seed: u64,
}

impl RandomBoardGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl BoardGenerator for RandomBoardGenerator {
    fn generate(self, config: GameConfig) -> Board {
        let mine_count = usize::from(config.mine_count());
        let mut rng = SmallRng::seed_from_u64(self.seed);

        let (rows, cols) = config.size;
        let mut positions: Vec<Coord2> = (0..rows)
            .flat_map(|row| (0..cols).map(move |col| (row, col)))
            .collect();
        positions.shuffle(&mut rng);

        let mut mine_mask: Array2<bool> = Array2::default(config.size.to_nd_index());
        for &coords in positions.iter().take(mine_count) {
            mine_mask[coords.to_nd_index()] = true;
        }

        let board = Board::from_mine_mask(&mine_mask);
        if usize::from(board.mine_count()) != mine_count {
            log::warn!(
                "Generated board count mismatch, actual: {}, requested: {}",
                board.mine_count(),
                mine_count
            );
        }
        log::debug!(
            "Generated {}x{} board with {} mines (seed {})",
            rows,
            cols,
            board.mine_count(),
            self.seed
        );
        board
    }
}
