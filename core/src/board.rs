use core::ops::{Index, IndexMut};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Rectangular grid of cells, indexed by `(row, col)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<Cell>,
    mine_count: CellCount,
}

impl Board {
    pub fn from_mine_mask(mine_mask: &Array2<bool>) -> Self {
        let cells = mine_mask.map(|&is_mine| Cell {
            is_mine,
            ..Default::default()
        });
        let mine_count = mine_mask
            .iter()
            .filter(|&&is_mine| is_mine)
            .count()
            .try_into()
            .unwrap_or(CellCount::MAX);
        let mut board = Self { cells, mine_count };
        board.count_all_neighbors();
        board
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Ok(Self::from_mine_mask(&mine_mask))
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.cells.dim();
        (
            rows.try_into().unwrap_or(Coord::MAX),
            cols.try_into().unwrap_or(Coord::MAX),
        )
    }

    pub fn total_cells(&self) -> CellCount {
        self.cells.len().try_into().unwrap_or(CellCount::MAX)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords].is_mine
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.iter_neighbors(coords)
            .filter(|&pos| self[pos].is_mine)
            .count() as u8
    }

    /// Recomputes `neighbor_mines` for every cell.
    pub fn count_all_neighbors(&mut self) {
        let counts = Array2::from_shape_fn(self.cells.dim(), |(row, col)| {
            self.adjacent_mine_count((row as Coord, col as Coord))
        });
        self.cells.zip_mut_with(&counts, |cell, &count| {
            cell.neighbor_mines = count;
        });
    }

    /// Moves a mine away from `coords` so the first reveal is always safe.
    ///
    /// The mine goes to the first non-mine cell in row-major order. Returns the new mine position, or `None` when
    /// `coords` was already safe.
    pub fn ensure_first_move_safe(&mut self, coords: Coord2) -> Option<Coord2> {
        if !self[coords].is_mine {
            return None;
        }

        let target = self
            .iter_coords()
            .find(|&pos| pos != coords && !self[pos].is_mine)?;
        self[coords].is_mine = false;
        self[target].is_mine = true;
        self.count_all_neighbors();
        log::debug!("Relocated first-move mine from {:?} to {:?}", coords, target);
        Some(target)
    }

    /// Safe cells currently revealed, recounted from scratch.
    pub fn count_revealed_safe(&self) -> CellCount {
        self.cells
            .iter()
            .filter(|cell| cell.is_revealed && !cell.is_mine)
            .count() as CellCount
    }

    /// Flagged cells (defused ones included), recounted from scratch.
    pub fn count_flags(&self) -> CellCount {
        self.cells.iter().filter(|cell| cell.is_flagged).count() as CellCount
    }

    /// All positions in row-major order.
    pub fn iter_coords(&self) -> impl Iterator<Item = Coord2> + use<> {
        let (rows, cols) = self.size();
        (0..rows).flat_map(move |row| (0..cols).map(move |col| (row, col)))
    }

    pub fn iter_cells(&self) -> impl Iterator<Item = (Coord2, &Cell)> {
        self.cells
            .indexed_iter()
            .map(|((row, col), cell)| ((row as Coord, col as Coord), cell))
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.cells.iter_neighbors(coords)
    }

    pub fn iter_area(&self, coords: Coord2) -> NeighborIter {
        self.cells.iter_area(coords)
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

impl IndexMut<Coord2> for Board {
    fn index_mut(&mut self, coords: Coord2) -> &mut Self::Output {
        &mut self.cells[coords.to_nd_index()]
    }
}
