//! Which tile image lands on which grid position.

use crate::grid::{playable_cells, TileCoord, FREE_SPACE, PLAYABLE_COUNT};
use crate::rng::LcgStream;

/// An ordering of the 24 non-free tiles. Entry `k` is the source tile drawn on the
/// `k`-th non-free position in row-major order. The free space always shows itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    tiles: [TileCoord; PLAYABLE_COUNT],
}

impl Placement {
    /// Every tile on its own position.
    pub fn identity() -> Self {
        let mut tiles = [FREE_SPACE; PLAYABLE_COUNT];
        for (slot, cell) in tiles.iter_mut().zip(playable_cells()) {
            *slot = cell;
        }
        Self { tiles }
    }

    /// Shuffles the canonical order with a stream seeded by `seed`.
    /// The same seed always yields the same placement.
    pub fn shuffled(seed: u32) -> Self {
        let mut placement = Self::identity();
        LcgStream::with_seed(seed).shuffle(&mut placement.tiles);
        log::debug!("placement for seed {seed}: {:?}", placement.source_indices());
        placement
    }

    pub fn tiles(&self) -> &[TileCoord] {
        &self.tiles
    }

    /// Source tile shown at `position`.
    pub fn source_for(&self, position: TileCoord) -> TileCoord {
        if position.is_free_space() {
            return position;
        }
        let slot = playable_cells()
            .position(|c| c == position)
            .unwrap_or_default();
        self.tiles[slot]
    }

    /// `(position, source)` pairs for the 24 shuffled slots, in row-major order.
    pub fn assignments(&self) -> impl Iterator<Item = (TileCoord, TileCoord)> + '_ {
        playable_cells().zip(self.tiles.iter().copied())
    }

    /// Positions of the source tiles within the canonical order, `0..24`.
    pub fn source_indices(&self) -> Vec<usize> {
        let canonical: Vec<TileCoord> = playable_cells().collect();
        self.tiles
            .iter()
            .filter_map(|t| canonical.iter().position(|c| c == t))
            .collect()
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::identity()
    }
}
