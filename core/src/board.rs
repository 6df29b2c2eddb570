use alloc::collections::VecDeque;
use core::fmt;
use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// The `rows × cols` grid of cells, addressed by `(row, col)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<Cell>,
}

impl Board {
    /// A grid with no mines, nothing revealed and nothing flagged.
    pub fn blank(size: Coord2) -> Self {
        Self {
            cells: Array2::default(size.to_nd_index()),
        }
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.cells.dim();
        (rows as Coord, cols as Coord)
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        in_bounds(coords, self.size())
    }

    pub fn cell(&self, coords: Coord2) -> Option<Cell> {
        self.contains(coords)
            .then(|| self.cells[coords.to_nd_index()])
    }

    /// Cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord2, Cell)> + '_ {
        self.cells
            .indexed_iter()
            .map(|((row, col), &cell)| ((row as Coord, col as Coord), cell))
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.cells.iter_neighbors(coords)
    }

    /// Writes the mines of `layout` into the grid and computes every safe cell's adjacent mine
    /// count. Flags already on the board are kept.
    pub fn place_mines(&mut self, layout: &MineLayout) -> Result<()> {
        if layout.size() != self.size() {
            return Err(GameError::InvalidBoardShape);
        }

        for ((row, col), cell) in self.cells.indexed_iter_mut() {
            let coords = (row as Coord, col as Coord);
            cell.is_mine = layout[coords];
            cell.neighbor_mines = if cell.is_mine {
                0
            } else {
                layout.adjacent_mine_count(coords)
            };
        }

        Ok(())
    }

    /// Randomly places `mine_count` mines anywhere except `exclude`.
    pub fn place_random_mines(
        &mut self,
        exclude: Coord2,
        mine_count: CellCount,
        seed: u64,
    ) -> Result<MineLayout> {
        let config = GameConfig::new_unchecked(self.size(), mine_count);
        let layout = RandomMineGenerator::new(seed, exclude).generate(config);
        self.place_mines(&layout)?;
        Ok(layout)
    }

    /// Reveals `coords` and, when it is a safe cell without adjacent mines, flood-fills through
    /// neighbouring blank cells and their numbered border.
    ///
    /// Out-of-bounds, revealed and flagged cells are left alone. Returns how many cells were
    /// newly revealed.
    pub fn reveal(&mut self, coords: Coord2) -> CellCount {
        if !self.cell(coords).is_some_and(Cell::can_reveal) {
            return 0;
        }

        let mut revealed = 0;
        let mut to_visit = VecDeque::from([coords]);

        while let Some(visit_coords) = to_visit.pop_front() {
            let cell = self.cells[visit_coords.to_nd_index()];
            // a cell can be queued by several blank neighbours
            if !cell.can_reveal() {
                continue;
            }

            self.cells[visit_coords.to_nd_index()].is_revealed = true;
            revealed += 1;

            if !cell.is_mine && cell.neighbor_mines == 0 {
                let cells = &self.cells;
                to_visit.extend(
                    cells
                        .iter_neighbors(visit_coords)
                        .filter(|&pos| cells[pos.to_nd_index()].can_reveal()),
                );
                log::trace!("Blank cell at {:?}, expanding", visit_coords);
            }
        }

        log::trace!("Revealed {} cells from {:?}", revealed, coords);
        revealed
    }

    /// Uncovers every mine, flagged or not.
    pub fn reveal_all_mines(&mut self) -> CellCount {
        let mut revealed = 0;
        for cell in self.cells.iter_mut().filter(|cell| cell.is_mine) {
            if !cell.is_revealed {
                cell.is_revealed = true;
                revealed += 1;
            }
        }
        revealed
    }

    /// Flips the flag on an unrevealed cell and returns the new flag state.
    pub(crate) fn toggle_flag(&mut self, coords: Coord2) -> Option<bool> {
        if !self.contains(coords) {
            return None;
        }
        let cell = &mut self.cells[coords.to_nd_index()];
        if cell.is_revealed {
            return None;
        }
        cell.is_flagged = !cell.is_flagged;
        Some(cell.is_flagged)
    }

    /// Full scan, the board is at most a few hundred cells.
    pub fn revealed_count(&self) -> CellCount {
        self.count_where(Cell::is_revealed)
    }

    pub fn flagged_count(&self) -> CellCount {
        self.count_where(Cell::is_flagged)
    }

    pub fn mine_count(&self) -> CellCount {
        self.count_where(Cell::is_mine)
    }

    fn count_where(&self, pred: impl Fn(Cell) -> bool) -> CellCount {
        self.cells.iter().filter(|&&cell| pred(cell)).count() as CellCount
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, cells) in self.cells.rows().into_iter().enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            for cell in cells {
                write!(f, "{}", cell.symbol())?;
            }
        }
        Ok(())
    }
}
