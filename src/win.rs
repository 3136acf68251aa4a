//! Bingo line detection over the 5x5 board.

use std::fmt;

use crate::grid::{TileCoord, CELL_COUNT, GRID_SIZE};
use crate::highlight::HighlightSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Line {
    Row(u8),
    Column(u8),
    /// `(i, i)`
    MainDiagonal,
    /// `(i, 4 - i)`
    AntiDiagonal,
}

impl Line {
    /// The 12 candidate lines: rows, then columns, then both diagonals.
    pub fn all() -> impl Iterator<Item = Line> {
        (0..GRID_SIZE)
            .map(Line::Row)
            .chain((0..GRID_SIZE).map(Line::Column))
            .chain([Line::MainDiagonal, Line::AntiDiagonal])
    }

    pub fn cells(self) -> [TileCoord; GRID_SIZE as usize] {
        let last = GRID_SIZE - 1;
        std::array::from_fn(|i| {
            let i = i as u8;
            match self {
                Line::Row(row) => TileCoord { row, col: i },
                Line::Column(col) => TileCoord { row: i, col },
                Line::MainDiagonal => TileCoord { row: i, col: i },
                Line::AntiDiagonal => TileCoord { row: i, col: last - i },
            }
        })
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Line::Row(r) => write!(f, "row {r}"),
            Line::Column(c) => write!(f, "column {c}"),
            Line::MainDiagonal => f.write_str("main diagonal"),
            Line::AntiDiagonal => f.write_str("anti-diagonal"),
        }
    }
}

/// Cells on at least one complete line, plus the lines themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WinSet {
    mask: u32,
    lines: Vec<Line>,
}

impl WinSet {
    pub fn is_bingo(&self) -> bool {
        !self.lines.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.mask == 0
    }

    pub fn len(&self) -> usize {
        self.mask.count_ones() as usize
    }

    pub fn contains(&self, coord: TileCoord) -> bool {
        self.mask & coord.bit() != 0
    }

    /// Winning lines in check order.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn cells(&self) -> impl Iterator<Item = TileCoord> + '_ {
        (0..CELL_COUNT)
            .filter(|i| self.mask & (1 << i) != 0)
            .filter_map(TileCoord::from_index)
    }
}

/// Marked-cell grid with the free space always set.
pub fn marked_grid(highlights: &HighlightSet) -> [[bool; GRID_SIZE as usize]; GRID_SIZE as usize] {
    std::array::from_fn(|row| {
        std::array::from_fn(|col| {
            let coord = TileCoord {
                row: row as u8,
                col: col as u8,
            };
            coord.is_free_space() || highlights.contains(coord)
        })
    })
}

/// Recomputes the win set from scratch. Every complete line is reported; overlapping
/// cells appear once in the union.
pub fn detect_wins(highlights: &HighlightSet) -> WinSet {
    let grid = marked_grid(highlights);
    let mut wins = WinSet::default();
    for line in Line::all() {
        let cells = line.cells();
        if cells
            .iter()
            .all(|c| grid[c.row as usize][c.col as usize])
        {
            for c in cells {
                wins.mask |= 1 << c.index();
            }
            wins.lines.push(line);
        }
    }
    wins
}
