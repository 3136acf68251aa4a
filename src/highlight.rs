//! Player marks and their compact base-36 link token.

use crate::grid::{TileCoord, CELL_COUNT, FREE_SPACE};

const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const CELL_MASK: u32 = (1 << CELL_COUNT) - 1;
const FREE_BIT: u32 = 1 << (FREE_SPACE.row as u32 * 5 + FREE_SPACE.col as u32);

/// Marked tiles, held as a bitmask over flat indices. Never contains the free space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct HighlightSet {
    mask: u32,
}

impl HighlightSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from a raw mask, dropping the free-space bit and bits past 24.
    pub fn from_mask(mask: u32) -> Self {
        Self {
            mask: mask & CELL_MASK & !FREE_BIT,
        }
    }

    pub fn mask(&self) -> u32 {
        self.mask
    }

    pub fn len(&self) -> usize {
        self.mask.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.mask == 0
    }

    pub fn contains(&self, coord: TileCoord) -> bool {
        self.mask & coord.bit() != 0
    }

    /// Flips one mark. Returns `false` without changing anything for the free space
    /// or a cell off the board.
    pub fn toggle(&mut self, coord: TileCoord) -> bool {
        if coord.is_free_space() || !coord.on_board() {
            return false;
        }
        self.mask ^= coord.bit();
        true
    }

    /// Sets a mark; ignored for the free space.
    pub fn insert(&mut self, coord: TileCoord) {
        if !coord.is_free_space() {
            self.mask |= coord.bit();
        }
    }

    /// Members in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = TileCoord> + '_ {
        let mask = self.mask;
        (0..CELL_COUNT)
            .filter(move |i| mask & (1 << i) != 0)
            .filter_map(TileCoord::from_index)
    }

    /// Base-36 rendering of the mask; the empty set encodes as `""`.
    pub fn encode(&self) -> String {
        let mut value = self.mask;
        if value == 0 {
            return String::new();
        }
        let mut out = Vec::new();
        while value > 0 {
            out.push(DIGITS[(value % 36) as usize]);
            value /= 36;
        }
        out.reverse();
        String::from_utf8(out).unwrap_or_default()
    }

    /// Inverse of [`encode`](Self::encode). Never fails: empty or unparseable tokens
    /// decode to the empty set, and bits past the last cell are ignored. Digits are
    /// case-insensitive.
    pub fn decode(token: &str) -> Self {
        let token = token.trim();
        if token.is_empty() || !token.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Self::new();
        }
        match u64::from_str_radix(token, 36) {
            Ok(value) => Self::from_mask((value & CELL_MASK as u64) as u32),
            Err(_) => {
                log::debug!("ignoring unusable highlight token {token:?}");
                Self::new()
            }
        }
    }
}

impl FromIterator<TileCoord> for HighlightSet {
    fn from_iter<I: IntoIterator<Item = TileCoord>>(iter: I) -> Self {
        let mut set = Self::new();
        for coord in iter {
            set.insert(coord);
        }
        set
    }
}
