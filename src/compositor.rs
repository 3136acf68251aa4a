//! Raster composition of a card from its background, tiles and session state.

use std::collections::HashMap;
use std::path::Path;

use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use tiny_skia::{Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

use crate::config::{AssetPaths, CardStyle, Color};
use crate::error::{CardError, Result};
use crate::grid::{all_cells, TileCoord, CELL_COUNT, GRID_SIZE};
use crate::metadata::{CardGeometry, TileMetadata};
use crate::session::Session;
use crate::utils::{Rectangle, Size};

#[cfg(feature = "text")]
use crate::layout::{anchor_in, caption_band, fit_scale, Anchors, Margins};
#[cfg(feature = "text")]
use crate::text::CaptionFont;
#[cfg(feature = "text")]
use crate::utils::Position;

const SHEET_PADDING: u32 = 2;
const COMPARISON_GUTTER: u32 = 20;
const LIGHT_GRAY: Rgb<u8> = Rgb([211, 211, 211]);
#[cfg(feature = "text")]
const LABEL_INSET: u32 = 5;
#[cfg(feature = "text")]
const TILE_LABEL_PX: f32 = 14.0;
#[cfg(feature = "text")]
const SHEET_TITLE_PX: f32 = 16.0;

/// Background, tile images and cell geometry for one card design.
pub struct CardAssets {
    background: RgbaImage,
    tiles: HashMap<TileCoord, RgbaImage>,
    geometry: CardGeometry,
}

impl CardAssets {
    pub fn new(
        background: RgbaImage,
        tiles: HashMap<TileCoord, RgbaImage>,
        geometry: CardGeometry,
    ) -> Self {
        Self {
            background,
            tiles,
            geometry,
        }
    }

    /// Loads the background, `square_R_C.png` tiles and the metadata sidecar.
    /// A missing sidecar falls back to the default grid; missing tiles are skipped.
    pub fn load(paths: &AssetPaths) -> Result<Self> {
        let background = load_rgba(&paths.background)?;
        let size = image_size(&background);

        let metadata_path = paths.metadata_path();
        let geometry = if metadata_path.exists() {
            CardGeometry::from_metadata(&TileMetadata::load(&metadata_path)?, size)
        } else {
            log::warn!(
                "{} not found; using default grid bounds",
                metadata_path.display()
            );
            CardGeometry::fallback(size)
        };

        let mut tiles = HashMap::new();
        for coord in all_cells() {
            let path = paths.tiles_dir.join(coord.file_name());
            match load_rgba(&path) {
                Ok(tile) => {
                    tiles.insert(coord, tile);
                }
                Err(e) => log::warn!("skipping tile {coord}: {e}"),
            }
        }
        if tiles.len() != CELL_COUNT {
            log::warn!("expected {CELL_COUNT} tiles, found {}", tiles.len());
        }
        Ok(Self::new(background, tiles, geometry))
    }

    pub fn geometry(&self) -> &CardGeometry {
        &self.geometry
    }
}

pub struct CardRenderer<'a> {
    assets: &'a CardAssets,
    style: &'a CardStyle,
    #[cfg(feature = "text")]
    font: Option<&'a CaptionFont>,
}

impl<'a> CardRenderer<'a> {
    pub fn new(assets: &'a CardAssets, style: &'a CardStyle) -> Self {
        Self {
            assets,
            style,
            #[cfg(feature = "text")]
            font: None,
        }
    }

    #[cfg(feature = "text")]
    pub fn with_font(mut self, font: &'a CaptionFont) -> Self {
        self.font = Some(font);
        self
    }

    /// Background, then placed tiles, then mark and win overlays, then the caption.
    pub fn render(&self, session: &Session) -> Result<RgbaImage> {
        let mut card = self.assets.background.clone();
        self.paste_tiles(&mut card, session);

        let overlay = self.overlay(session, card.width(), card.height())?;
        imageops::overlay(&mut card, &overlay, 0, 0);

        #[cfg(feature = "text")]
        self.draw_caption(&mut card, session);

        log::debug!(
            "rendered card seed={} marks={} wins={}",
            session.seed(),
            session.highlights().len(),
            session.wins().lines().len()
        );
        Ok(card)
    }

    fn paste_tiles(&self, card: &mut RgbaImage, session: &Session) {
        let geometry = &self.assets.geometry;
        for position in all_cells() {
            let source = session.placement().source_for(position);
            let Some(tile) = self.assets.tiles.get(&source) else {
                log::warn!("no image for tile {source}; leaving {position} empty");
                continue;
            };
            if !geometry.has_recorded_bounds(position) {
                log::debug!("no recorded bounds for {position}; using grid cell");
            }
            let rect = geometry.cell_rect(position);
            imageops::overlay(card, tile, rect.x.round() as i64, rect.y.round() as i64);
        }
    }

    fn overlay(&self, session: &Session, width: u32, height: u32) -> Result<RgbaImage> {
        let mut pixmap =
            Pixmap::new(width, height).ok_or(CardError::InvalidCanvas { width, height })?;
        let geometry = &self.assets.geometry;

        let highlight = paint(self.style.highlight_color);
        for position in session.highlights().iter() {
            if let Some(rect) = skia_rect(geometry.cell_rect(position)) {
                pixmap.fill_rect(rect, &highlight, Transform::identity(), None);
            }
        }

        let wins = session.wins();
        let fill = paint(self.style.win_color);
        let border = paint(self.style.border_color);
        let stroke = Stroke {
            width: self.style.border_width,
            ..Stroke::default()
        };
        for position in wins.cells() {
            let Some(rect) = skia_rect(geometry.cell_rect(position)) else {
                continue;
            };
            pixmap.fill_rect(rect, &fill, Transform::identity(), None);
            if self.style.border_width > 0.0 {
                let path = PathBuilder::from_rect(rect);
                pixmap.stroke_path(&path, &border, &stroke, Transform::identity(), None);
            }
        }

        Ok(RgbaImage::from_fn(width, height, |x, y| {
            pixmap
                .pixel(x, y)
                .map(|p| {
                    let c = p.demultiply();
                    Rgba([c.red(), c.green(), c.blue(), c.alpha()])
                })
                .unwrap_or(Rgba([0, 0, 0, 0]))
        }))
    }

    #[cfg(feature = "text")]
    fn draw_caption(&self, card: &mut RgbaImage, session: &Session) {
        let Some(font) = self.font else {
            return;
        };
        if session.name().is_empty() && session.title().is_empty() {
            return;
        }
        let text = self.style.caption_for(session.name(), session.title());
        let band = caption_band(image_size(card), self.assets.geometry.grid);
        let margins = Margins::uniform(band.height * 0.1);

        let measured = font.measure(&text, self.style.text_size);
        let px = self.style.text_size * fit_scale(band, measured, margins);
        if px < 1.0 {
            log::warn!("caption {text:?} does not fit above the grid");
            return;
        }
        let origin = anchor_in(band, font.measure(&text, px), Anchors::default(), margins);
        font.draw(card, &text, px, origin, self.style.text_color);
    }
}

/// The 25 tiles in their home positions with a thin frame around each, for checking
/// an extraction by eye. Tiles off `square_size` are resized.
pub fn verification_sheet(assets: &CardAssets) -> RgbImage {
    let (w, h) = assets.geometry.square_size.to_pixels();
    let cells = GRID_SIZE as u32;
    let mut sheet = RgbImage::from_pixel(
        (w + SHEET_PADDING) * cells + SHEET_PADDING,
        (h + SHEET_PADDING) * cells + SHEET_PADDING,
        Rgb([255, 255, 255]),
    );

    for coord in all_cells() {
        let (x, y) = sheet_origin(coord, w, h);
        if let Some(tile) = sized_tile(assets, coord, w, h) {
            imageops::replace(&mut sheet, &tile, x as i64, y as i64);
        }
        outline(&mut sheet, x, y, w, h, Rgb([0, 0, 0]));
    }
    sheet
}

/// The original card on the left and the tiles re-assembled from `grid_bounds` and
/// `square_size` on the right, separated by a light gray gutter.
pub fn comparison_sheet(original: &RgbaImage, assets: &CardAssets) -> RgbImage {
    let (orig_w, orig_h) = original.dimensions();
    let (w, h) = assets.geometry.square_size.to_pixels();
    let grid = assets.geometry.grid;

    let mut reconstructed = RgbImage::from_pixel(orig_w, orig_h, Rgb([255, 255, 255]));
    for coord in all_cells() {
        let Some(tile) = sized_tile(assets, coord, w, h) else {
            continue;
        };
        let x = grid.x.round() as i64 + coord.col as i64 * w as i64;
        let y = grid.y.round() as i64 + coord.row as i64 * h as i64;
        imageops::replace(&mut reconstructed, &tile, x, y);
    }

    let mut sheet = RgbImage::from_pixel(orig_w * 2 + COMPARISON_GUTTER, orig_h, LIGHT_GRAY);
    imageops::replace(&mut sheet, &flatten_on_white(original), 0, 0);
    imageops::replace(
        &mut sheet,
        &reconstructed,
        (orig_w + COMPARISON_GUTTER) as i64,
        0,
    );
    sheet
}

/// Writes `R{row}C{col}` in red into the corner of every cell of a verification sheet.
#[cfg(feature = "text")]
pub fn label_verification_sheet(
    sheet: &mut RgbImage,
    assets: &CardAssets,
    font: &CaptionFont,
) {
    let (w, h) = assets.geometry.square_size.to_pixels();
    let px = TILE_LABEL_PX.min(h as f32 / 3.0).max(6.0);
    let labels: Vec<(String, Position)> = all_cells()
        .map(|coord| {
            let (x, y) = sheet_origin(coord, w, h);
            let at = Position {
                x: (x + LABEL_INSET) as f32,
                y: (y + LABEL_INSET) as f32,
            };
            (format!("R{}C{}", coord.row, coord.col), at)
        })
        .collect();
    draw_labels(sheet, font, px, &labels, [255, 0, 0, 255]);
}

/// Titles the two halves of a comparison sheet built from an image `original_width` wide.
#[cfg(feature = "text")]
pub fn label_comparison_sheet(sheet: &mut RgbImage, original_width: u32, font: &CaptionFont) {
    let labels = [
        ("Original".to_string(), Position { x: 10.0, y: 10.0 }),
        (
            "Reconstructed".to_string(),
            Position {
                x: (original_width + COMPARISON_GUTTER + 10) as f32,
                y: 10.0,
            },
        ),
    ];
    draw_labels(sheet, font, SHEET_TITLE_PX, &labels, [0, 0, 0, 255]);
}

#[cfg(feature = "text")]
fn draw_labels(
    sheet: &mut RgbImage,
    font: &CaptionFont,
    px: f32,
    labels: &[(String, Position)],
    color: Color,
) {
    let mut canvas = image::DynamicImage::ImageRgb8(sheet.clone()).to_rgba8();
    for (text, at) in labels {
        font.draw(&mut canvas, text, px, *at, color);
    }
    *sheet = flatten_on_white(&canvas);
}

fn sheet_origin(coord: TileCoord, w: u32, h: u32) -> (u32, u32) {
    (
        SHEET_PADDING + coord.col as u32 * (w + SHEET_PADDING),
        SHEET_PADDING + coord.row as u32 * (h + SHEET_PADDING),
    )
}

/// The tile flattened onto white at exactly `w` x `h`.
fn sized_tile(assets: &CardAssets, coord: TileCoord, w: u32, h: u32) -> Option<RgbImage> {
    let flat = flatten_on_white(assets.tiles.get(&coord)?);
    if flat.dimensions() == (w, h) {
        return Some(flat);
    }
    log::warn!(
        "{} is {:?}, resized to {w}x{h}",
        coord.file_name(),
        flat.dimensions()
    );
    Some(imageops::resize(&flat, w, h, FilterType::Lanczos3))
}

/// Composites onto opaque white, dropping alpha.
pub fn flatten_on_white(image: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let Rgba([r, g, b, a]) = *image.get_pixel(x, y);
        let a = a as f32 / 255.0;
        let mix = |c: u8| (c as f32 * a + 255.0 * (1.0 - a)).round() as u8;
        Rgb([mix(r), mix(g), mix(b)])
    })
}

pub fn save_png(image: &RgbImage, path: &Path) -> Result<()> {
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| CardError::image(path, e))?;
    log::info!("wrote {}", path.display());
    Ok(())
}

/// Decodes any supported image file to RGBA.
pub fn load_rgba(path: &Path) -> Result<RgbaImage> {
    Ok(image::open(path)
        .map_err(|e| CardError::image(path, e))?
        .to_rgba8())
}

fn image_size(image: &RgbaImage) -> Size {
    Size::new(image.width() as f32, image.height() as f32)
}

fn paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color[0], color[1], color[2], color[3]);
    paint.anti_alias = false;
    paint
}

fn skia_rect(rect: Rectangle) -> Option<Rect> {
    Rect::from_xywh(rect.x, rect.y, rect.width, rect.height)
}

/// One-pixel frame covering `x..=x+w`, `y..=y+h`, clipped to the image.
fn outline(image: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
    let (iw, ih) = image.dimensions();
    let mut put = |px: u32, py: u32| {
        if px < iw && py < ih {
            image.put_pixel(px, py, color);
        }
    };
    for dx in 0..=w {
        put(x + dx, y);
        put(x + dx, y + h);
    }
    for dy in 0..=h {
        put(x, y + dy);
        put(x + w, y + dy);
    }
}
