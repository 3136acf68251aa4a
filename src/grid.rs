//! The fixed 5x5 board topology.
//!
//! Every coordinate that crosses a module boundary is a [`TileCoord`]. The free
//! space predicate, the flat-index mapping and the tile file naming all live here
//! so encode, decode, win detection and the compositor agree on them.

use std::fmt;

pub const GRID_SIZE: u8 = 5;
pub const CELL_COUNT: usize = (GRID_SIZE as usize) * (GRID_SIZE as usize);
/// Number of tiles that take part in the shuffle.
pub const PLAYABLE_COUNT: usize = CELL_COUNT - 1;

pub const FREE_SPACE: TileCoord = TileCoord { row: 2, col: 2 };

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    pub(crate) row: u8,
    pub(crate) col: u8,
}

impl TileCoord {
    /// Returns `None` when either component is outside `0..5`.
    pub fn new(row: u8, col: u8) -> Option<Self> {
        (row < GRID_SIZE && col < GRID_SIZE).then_some(Self { row, col })
    }

    pub fn row(self) -> u8 {
        self.row
    }

    pub fn col(self) -> u8 {
        self.col
    }

    #[inline]
    pub(crate) fn on_board(self) -> bool {
        self.row < GRID_SIZE && self.col < GRID_SIZE
    }

    /// Single-bit mask for this cell; zero for a coordinate off the board.
    #[inline]
    pub(crate) fn bit(self) -> u32 {
        if self.on_board() {
            1 << self.index()
        } else {
            0
        }
    }

    /// Row-major flat index in `0..25`.
    #[inline]
    pub fn index(self) -> usize {
        self.row as usize * GRID_SIZE as usize + self.col as usize
    }

    #[inline]
    pub fn from_index(index: usize) -> Option<Self> {
        if index >= CELL_COUNT {
            return None;
        }
        let size = GRID_SIZE as usize;
        Some(Self {
            row: (index / size) as u8,
            col: (index % size) as u8,
        })
    }

    #[inline]
    pub fn is_free_space(self) -> bool {
        is_free_space(self.row, self.col)
    }

    /// Asset file name, e.g. `square_0_3.png`.
    pub fn file_name(self) -> String {
        format!("{}.png", self.key())
    }

    /// Metadata key without the extension, e.g. `square_0_3`.
    pub fn key(self) -> String {
        format!("square_{}_{}", self.row, self.col)
    }

    /// Parses `square_R_C` with or without a trailing `.png`.
    pub fn parse_key(key: &str) -> Option<Self> {
        let stem = key.strip_suffix(".png").unwrap_or(key);
        let rest = stem.strip_prefix("square_")?;
        let (row, col) = rest.split_once('_')?;
        Self::new(row.parse().ok()?, col.parse().ok()?)
    }

    /// Parses `R,C` as typed on the command line.
    pub fn parse_pair(text: &str) -> Option<Self> {
        let (row, col) = text.split_once(',')?;
        Self::new(row.trim().parse().ok()?, col.trim().parse().ok()?)
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

#[inline]
pub fn is_free_space(row: u8, col: u8) -> bool {
    row == FREE_SPACE.row && col == FREE_SPACE.col
}

#[inline]
pub fn coord_to_index(row: u8, col: u8) -> usize {
    TileCoord { row, col }.index()
}

#[inline]
pub fn index_to_coord(index: usize) -> Option<TileCoord> {
    TileCoord::from_index(index)
}

/// All 25 cells in row-major order.
pub fn all_cells() -> impl Iterator<Item = TileCoord> {
    (0..CELL_COUNT).filter_map(TileCoord::from_index)
}

/// The 24 non-free cells in row-major order; the canonical pre-shuffle order.
pub fn playable_cells() -> impl Iterator<Item = TileCoord> {
    all_cells().filter(|c| !c.is_free_space())
}
