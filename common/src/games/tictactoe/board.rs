use std::fmt;
use std::ops::{Deref, DerefMut};

use super::types::{BOARD_CELLS, BOARD_SIDE, Mark};

/// Nine cells in row-major order: row `r`, column `c` lives at `3 * r + c`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Mark; BOARD_CELLS],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [Mark::Empty; BOARD_CELLS],
        }
    }

    pub fn from_cells(cells: [Mark; BOARD_CELLS]) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Mark; BOARD_CELLS] {
        &self.cells
    }

    pub fn get(&self, index: usize) -> Option<Mark> {
        self.cells.get(index).copied()
    }

    pub fn is_empty_at(&self, index: usize) -> bool {
        self.get(index) == Some(Mark::Empty)
    }

    pub fn set(&mut self, index: usize, mark: Mark) {
        self.cells[index] = mark;
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&cell| cell != Mark::Empty)
    }

    pub fn count(&self, mark: Mark) -> usize {
        self.cells.iter().filter(|&&cell| cell == mark).count()
    }

    /// Marks `index` until the returned guard is dropped, then empties it again.
    pub fn place_tentative(&mut self, index: usize, mark: Mark) -> TentativeMark<'_> {
        debug_assert!(self.is_empty_at(index));
        self.cells[index] = mark;
        TentativeMark { board: self, index }
    }
}

pub fn get_available_moves(board: &Board) -> Vec<usize> {
    board
        .cells
        .iter()
        .enumerate()
        .filter(|&(_, &cell)| cell == Mark::Empty)
        .map(|(index, _)| index)
        .collect()
}

pub struct TentativeMark<'a> {
    board: &'a mut Board,
    index: usize,
}

impl Deref for TentativeMark<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        self.board
    }
}

impl DerefMut for TentativeMark<'_> {
    fn deref_mut(&mut self) -> &mut Board {
        self.board
    }
}

impl Drop for TentativeMark<'_> {
    fn drop(&mut self) {
        self.board.cells[self.index] = Mark::Empty;
    }
}

impl fmt::Display for Board {
    /// Empty cells show the 1-based number a player types to claim them.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row_index, row) in self.cells.chunks(BOARD_SIDE).enumerate() {
            if row_index > 0 {
                writeln!(f, "---+---+---")?;
            }
            let rendered: Vec<String> = row
                .iter()
                .enumerate()
                .map(|(col, &cell)| match cell {
                    Mark::Empty => format!(" {} ", row_index * BOARD_SIDE + col + 1),
                    mark => format!(" {} ", mark),
                })
                .collect();
            writeln!(f, "{}", rendered.join("|"))?;
        }
        Ok(())
    }
}
