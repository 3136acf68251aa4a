//! Tile metadata sidecar written by the extraction tooling, and the pixel geometry
//! derived from it.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{CardError, Result};
use crate::grid::{TileCoord, GRID_SIZE};
use crate::utils::{Rectangle, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SquareSize {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct GridBounds {
    pub top: i64,
    pub bottom: i64,
    pub left: i64,
    pub right: i64,
}

impl GridBounds {
    pub fn rect(&self) -> Rectangle {
        Rectangle::from_ltrb(
            self.left as f32,
            self.top as f32,
            self.right as f32,
            self.bottom as f32,
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SquareEntry {
    /// `[left, top, right, bottom]` in background pixels.
    pub extraction_bounds: [f64; 4],
    #[serde(default)]
    pub size: Option<[u32; 2]>,
}

impl SquareEntry {
    pub fn bounds(&self) -> Rectangle {
        let [l, t, r, b] = self.extraction_bounds;
        Rectangle::from_ltrb(l as f32, t as f32, r as f32, b as f32)
    }
}

/// Parsed `metadata.json`. Tile entries may sit under `squares` or at the top level,
/// keyed `square_R_C` or `square_R_C.png`; unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct TileMetadata {
    pub square_size: SquareSize,
    #[serde(default)]
    pub grid_bounds: Option<GridBounds>,
    #[serde(default)]
    squares: HashMap<String, SquareEntry>,
    #[serde(flatten)]
    rest: HashMap<String, serde_json::Value>,
}

impl TileMetadata {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| CardError::io(path, e))?;
        Self::from_json(&text).map_err(|source| CardError::Metadata {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Extraction bounds recorded for one tile, if any.
    pub fn bounds(&self, coord: TileCoord) -> Option<Rectangle> {
        self.entries().get(&coord).map(SquareEntry::bounds)
    }

    fn entries(&self) -> HashMap<TileCoord, SquareEntry> {
        let top_level = self.rest.iter().filter_map(|(key, value)| {
            let coord = TileCoord::parse_key(key)?;
            let entry = serde_json::from_value::<SquareEntry>(value.clone()).ok()?;
            Some((coord, entry))
        });
        let nested = self
            .squares
            .iter()
            .filter_map(|(key, entry)| Some((TileCoord::parse_key(key)?, entry.clone())));
        top_level.chain(nested).collect()
    }
}

/// Where every cell sits on a background of a given size.
#[derive(Debug, Clone, PartialEq)]
pub struct CardGeometry {
    pub square_size: Size,
    pub grid: Rectangle,
    bounds: HashMap<TileCoord, Rectangle>,
}

impl CardGeometry {
    /// Grid over 10%..90% of the width and 15%..90% of the height, used when no
    /// metadata is available.
    pub fn fallback(background: Size) -> Self {
        let grid = Rectangle::from_ltrb(
            (background.width * 0.10).floor(),
            (background.height * 0.15).floor(),
            (background.width * 0.90).floor(),
            (background.height * 0.90).floor(),
        );
        let cells = GRID_SIZE as f32;
        Self {
            square_size: Size::new(
                (grid.width / cells).floor(),
                (grid.height / cells).floor(),
            ),
            grid,
            bounds: HashMap::new(),
        }
    }

    pub fn from_metadata(metadata: &TileMetadata, background: Size) -> Self {
        let fallback = Self::fallback(background);
        let square_size = Size::new(
            metadata.square_size.width as f32,
            metadata.square_size.height as f32,
        );
        let grid = metadata
            .grid_bounds
            .map(|g| g.rect())
            .unwrap_or(fallback.grid);
        Self {
            square_size,
            grid,
            bounds: metadata.entries().into_iter().map(|(c, e)| (c, e.bounds())).collect(),
        }
    }

    /// Recorded bounds for `coord`, or the computed grid cell when none were recorded.
    pub fn cell_rect(&self, coord: TileCoord) -> Rectangle {
        if let Some(rect) = self.bounds.get(&coord) {
            return *rect;
        }
        Rectangle::new(
            self.grid.x + coord.col as f32 * self.square_size.width,
            self.grid.y + coord.row as f32 * self.square_size.height,
            self.square_size.width,
            self.square_size.height,
        )
    }

    pub fn has_recorded_bounds(&self, coord: TileCoord) -> bool {
        self.bounds.contains_key(&coord)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "square_size": {"width": 100, "height": 90},
        "grid_bounds": {"top": 200, "bottom": 660, "left": 50, "right": 560},
        "line_buffer": 3,
        "squares": {
            "square_0_0.png": {"row": 0, "col": 0, "extraction_bounds": [53, 203, 153, 293], "size": [100, 90]}
        },
        "square_4_4": {"extraction_bounds": [455, 563, 555, 653]}
    }"#;

    #[test]
    fn reads_nested_and_top_level_entries() {
        let meta = TileMetadata::from_json(SAMPLE).unwrap();
        assert_eq!(
            meta.bounds(TileCoord::new(0, 0).unwrap()),
            Some(Rectangle::new(53.0, 203.0, 100.0, 90.0))
        );
        assert_eq!(
            meta.bounds(TileCoord::new(4, 4).unwrap()),
            Some(Rectangle::new(455.0, 563.0, 100.0, 90.0))
        );
        assert_eq!(meta.bounds(TileCoord::new(1, 1).unwrap()), None);
    }

    #[test]
    fn missing_bounds_fall_back_to_grid_cells() {
        let meta = TileMetadata::from_json(SAMPLE).unwrap();
        let geo = CardGeometry::from_metadata(&meta, Size::new(600.0, 700.0));
        let rect = geo.cell_rect(TileCoord::new(1, 2).unwrap());
        assert_eq!(rect, Rectangle::new(250.0, 290.0, 100.0, 90.0));
    }

    #[test]
    fn fallback_geometry_matches_background_fractions() {
        let geo = CardGeometry::fallback(Size::new(1000.0, 1000.0));
        assert_eq!(geo.grid, Rectangle::new(100.0, 150.0, 800.0, 750.0));
        assert_eq!(geo.square_size, Size::new(160.0, 150.0));
    }
}
