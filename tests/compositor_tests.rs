#![cfg(feature = "raster")]
use std::collections::HashMap;

use bingo_card::compositor::{
    comparison_sheet, flatten_on_white, verification_sheet, CardAssets, CardRenderer,
};
use bingo_card::config::CardStyle;
use bingo_card::grid::{all_cells, TileCoord};
use bingo_card::metadata::{CardGeometry, TileMetadata};
use bingo_card::utils::Size;
use bingo_card::Session;
use image::{Rgba, RgbaImage};

const GRAY: Rgba<u8> = Rgba([128, 128, 128, 255]);

fn tile_color(coord: TileCoord) -> Rgba<u8> {
    Rgba([coord.index() as u8 * 10, 255 - coord.index() as u8 * 10, 7, 255])
}

/// 100x100 background; the default grid gives 16x15 cells starting at (10, 15).
fn assets() -> CardAssets {
    let background = RgbaImage::from_pixel(100, 100, GRAY);
    let tiles: HashMap<TileCoord, RgbaImage> = all_cells()
        .map(|c| (c, RgbaImage::from_pixel(16, 15, tile_color(c))))
        .collect();
    let geometry = CardGeometry::fallback(Size::new(100.0, 100.0));
    CardAssets::new(background, tiles, geometry)
}

/// Per-channel tolerance of one step for float round trips in alpha blending.
fn close(a: Rgba<u8>, b: Rgba<u8>) -> bool {
    a.0.iter().zip(b.0).all(|(x, y)| x.abs_diff(y) <= 1)
}

fn center_of(assets: &CardAssets, position: TileCoord) -> (u32, u32) {
    let rect = assets.geometry().cell_rect(position);
    (
        (rect.x + rect.width / 2.0) as u32,
        (rect.y + rect.height / 2.0) as u32,
    )
}

#[test]
fn tiles_land_where_the_placement_says() {
    let assets = assets();
    let style = CardStyle::default();
    let session = Session::generate("Alice", "Elf").unwrap();
    let card = CardRenderer::new(&assets, &style).render(&session).unwrap();

    assert_eq!(card.dimensions(), (100, 100));
    assert!(close(*card.get_pixel(2, 2), GRAY));
    for position in all_cells() {
        let (x, y) = center_of(&assets, position);
        let source = session.placement().source_for(position);
        assert!(
            close(*card.get_pixel(x, y), tile_color(source)),
            "at {position}"
        );
    }
}

#[test]
fn marks_tint_only_their_cells() {
    let assets = assets();
    let style = CardStyle::default();
    let mut session = Session::with_seed(3).into_unshuffled();
    let marked = TileCoord::new(0, 0).unwrap();
    session.toggle(marked);
    let card = CardRenderer::new(&assets, &style).render(&session).unwrap();

    let (x, y) = center_of(&assets, marked);
    assert!(!close(*card.get_pixel(x, y), tile_color(marked)));
    let other = TileCoord::new(0, 1).unwrap();
    let (x, y) = center_of(&assets, other);
    assert!(close(*card.get_pixel(x, y), tile_color(other)));
}

#[test]
fn winning_line_is_tinted_differently_from_plain_marks() {
    let assets = assets();
    let style = CardStyle {
        border_width: 0.0,
        ..CardStyle::default()
    };
    let mut session = Session::with_seed(3).into_unshuffled();
    for col in [0, 1, 3, 4] {
        session.toggle(TileCoord::new(2, col).unwrap());
    }
    let stray = TileCoord::new(0, 0).unwrap();
    session.toggle(stray);
    let card = CardRenderer::new(&assets, &style).render(&session).unwrap();

    let center = TileCoord::new(2, 2).unwrap();
    let (x, y) = center_of(&assets, center);
    assert!(
        !close(*card.get_pixel(x, y), tile_color(center)),
        "free space is part of the win"
    );

    let mut plain = Session::with_seed(3).into_unshuffled();
    plain.toggle(TileCoord::new(2, 0).unwrap());
    let plain_card = CardRenderer::new(&assets, &style).render(&plain).unwrap();
    let (x, y) = center_of(&assets, TileCoord::new(2, 0).unwrap());
    assert!(!close(*card.get_pixel(x, y), *plain_card.get_pixel(x, y)));
}

#[test]
fn missing_tiles_are_skipped() {
    let background = RgbaImage::from_pixel(100, 100, GRAY);
    let only = TileCoord::new(0, 0).unwrap();
    let tiles = HashMap::from([(only, RgbaImage::from_pixel(16, 15, tile_color(only)))]);
    let assets = CardAssets::new(
        background,
        tiles,
        CardGeometry::fallback(Size::new(100.0, 100.0)),
    );
    let style = CardStyle::default();
    let card = CardRenderer::new(&assets, &style)
        .render(&Session::with_seed(0).into_unshuffled())
        .unwrap();
    let (x, y) = center_of(&assets, TileCoord::new(4, 4).unwrap());
    assert!(close(*card.get_pixel(x, y), GRAY));
    let (x, y) = center_of(&assets, only);
    assert!(close(*card.get_pixel(x, y), tile_color(only)));
}

#[test]
fn recorded_bounds_override_the_grid() {
    let meta = TileMetadata::from_json(
        r#"{"square_size": {"width": 16, "height": 15},
            "squares": {"square_0_0.png": {"extraction_bounds": [60, 70, 76, 85]}}}"#,
    )
    .unwrap();
    let geometry = CardGeometry::from_metadata(&meta, Size::new(100.0, 100.0));
    let only = TileCoord::new(0, 0).unwrap();
    let tiles = HashMap::from([(only, RgbaImage::from_pixel(16, 15, tile_color(only)))]);
    let assets = CardAssets::new(RgbaImage::from_pixel(100, 100, GRAY), tiles, geometry);
    let style = CardStyle::default();
    let card = CardRenderer::new(&assets, &style)
        .render(&Session::with_seed(0).into_unshuffled())
        .unwrap();
    assert!(close(*card.get_pixel(61, 71), tile_color(only)));
    assert!(close(*card.get_pixel(11, 16), GRAY));
}

#[test]
fn flattening_blends_onto_white() {
    let img = RgbaImage::from_fn(2, 1, |x, _| {
        if x == 0 {
            Rgba([0, 0, 0, 0])
        } else {
            Rgba([0, 0, 0, 255])
        }
    });
    let flat = flatten_on_white(&img);
    assert_eq!(flat.get_pixel(0, 0).0, [255, 255, 255]);
    assert_eq!(flat.get_pixel(1, 0).0, [0, 0, 0]);
}

#[test]
fn verification_sheet_layout() {
    let assets = assets();
    let sheet = verification_sheet(&assets);
    assert_eq!(sheet.dimensions(), (18 * 5 + 2, 17 * 5 + 2));
    // frame corner of the first tile, then its interior
    assert_eq!(sheet.get_pixel(2, 2).0, [0, 0, 0]);
    let inside = tile_color(TileCoord::new(0, 0).unwrap());
    assert_eq!(sheet.get_pixel(5, 5).0, [inside.0[0], inside.0[1], inside.0[2]]);
    // padding column between tiles (0,0) and (0,1) stays white below the frame line
    assert_eq!(sheet.get_pixel(19, 5).0, [255, 255, 255]);
}

fn rgb(color: Rgba<u8>) -> [u8; 3] {
    [color.0[0], color.0[1], color.0[2]]
}

#[test]
fn comparison_sheet_puts_original_and_reconstruction_side_by_side() {
    let assets = assets();
    let original = RgbaImage::from_pixel(100, 100, GRAY);
    let sheet = comparison_sheet(&original, &assets);

    assert_eq!(sheet.dimensions(), (100 * 2 + 20, 100));
    assert_eq!(sheet.get_pixel(5, 5).0, rgb(GRAY));
    for x in 100..120 {
        assert_eq!(sheet.get_pixel(x, 50).0, [211, 211, 211], "gutter at x={x}");
    }
    // the reconstruction starts white and keeps that outside the grid
    assert_eq!(sheet.get_pixel(122, 2).0, [255, 255, 255]);
    for coord in all_cells() {
        let x = 120 + 10 + coord.col() as u32 * 16 + 8;
        let y = 15 + coord.row() as u32 * 15 + 7;
        assert_eq!(sheet.get_pixel(x, y).0, rgb(tile_color(coord)), "at {coord}");
    }
}

#[test]
fn comparison_sheet_leaves_missing_tiles_white() {
    let mut assets_tiles: HashMap<TileCoord, RgbaImage> = HashMap::new();
    let kept = TileCoord::new(1, 1).unwrap();
    assets_tiles.insert(kept, RgbaImage::from_pixel(16, 15, tile_color(kept)));
    let assets = CardAssets::new(
        RgbaImage::from_pixel(100, 100, GRAY),
        assets_tiles,
        CardGeometry::fallback(Size::new(100.0, 100.0)),
    );
    let sheet = comparison_sheet(&RgbaImage::from_pixel(100, 100, GRAY), &assets);

    assert_eq!(sheet.get_pixel(120 + 10 + 8, 15 + 7).0, [255, 255, 255]);
    assert_eq!(
        sheet.get_pixel(120 + 10 + 16 + 8, 15 + 15 + 7).0,
        rgb(tile_color(kept))
    );
}

#[test]
fn comparison_sheet_resizes_odd_tiles_to_the_square_size() {
    let tiles: HashMap<TileCoord, RgbaImage> = all_cells()
        .map(|c| (c, RgbaImage::from_pixel(32, 30, tile_color(c))))
        .collect();
    let assets = CardAssets::new(
        RgbaImage::from_pixel(100, 100, GRAY),
        tiles,
        CardGeometry::fallback(Size::new(100.0, 100.0)),
    );
    let sheet = comparison_sheet(&RgbaImage::from_pixel(100, 100, GRAY), &assets);

    let last = TileCoord::new(4, 4).unwrap();
    assert_eq!(
        sheet.get_pixel(120 + 10 + 4 * 16 + 8, 15 + 4 * 15 + 7).0,
        rgb(tile_color(last))
    );
    // past the resized grid the reconstruction is still white
    assert_eq!(sheet.get_pixel(120 + 95, 95).0, [255, 255, 255]);
}

#[cfg(feature = "text")]
mod labels {
    use super::*;
    use bingo_card::compositor::{label_comparison_sheet, label_verification_sheet};
    use bingo_card::text::CaptionFont;
    use image::{Rgb, RgbImage};
    use std::ops::Range;

    const FONT: &[u8] = include_bytes!("fixtures/DejaVuSans.ttf");

    fn font() -> CaptionFont {
        CaptionFont::from_bytes(FONT.to_vec()).unwrap()
    }

    /// White 500x500 card; the default grid gives 80x75 cells.
    fn large_assets() -> CardAssets {
        let white = Rgba([255, 255, 255, 255]);
        let tiles: HashMap<TileCoord, RgbaImage> = all_cells()
            .map(|c| (c, RgbaImage::from_pixel(80, 75, white)))
            .collect();
        CardAssets::new(
            RgbaImage::from_pixel(500, 500, white),
            tiles,
            CardGeometry::fallback(Size::new(500.0, 500.0)),
        )
    }

    fn count_in(
        sheet: &RgbImage,
        xs: Range<u32>,
        ys: Range<u32>,
        hit: impl Fn(Rgb<u8>) -> bool,
    ) -> usize {
        ys.flat_map(|y| xs.clone().map(move |x| (x, y)))
            .filter(|&(x, y)| hit(*sheet.get_pixel(x, y)))
            .count()
    }

    fn is_red(p: Rgb<u8>) -> bool {
        p.0[0] > 150 && p.0[1] < 120 && p.0[2] < 120
    }

    fn is_dark(p: Rgb<u8>) -> bool {
        p.0.iter().all(|&c| c < 120)
    }

    #[test]
    fn verification_sheet_cells_get_red_labels() {
        let assets = large_assets();
        let mut sheet = verification_sheet(&assets);
        let (w, h) = sheet.dimensions();
        assert_eq!((w, h), (82 * 5 + 2, 77 * 5 + 2));
        assert_eq!(count_in(&sheet, 0..w, 0..h, is_red), 0);

        label_verification_sheet(&mut sheet, &assets, &font());

        assert_eq!(sheet.dimensions(), (w, h));
        for coord in all_cells() {
            let x = 2 + coord.col() as u32 * 82 + 5;
            let y = 2 + coord.row() as u32 * 77 + 5;
            assert!(
                count_in(&sheet, x..x + 60, y..y + 20, is_red) > 0,
                "no label at {coord}"
            );
        }
        // the middle of a tile stays untouched
        assert_eq!(sheet.get_pixel(2 + 60, 2 + 60).0, [255, 255, 255]);
    }

    #[test]
    fn comparison_sheet_halves_are_titled() {
        let assets = large_assets();
        let original = RgbaImage::from_pixel(500, 500, Rgba([255, 255, 255, 255]));
        let mut sheet = comparison_sheet(&original, &assets);
        assert_eq!(count_in(&sheet, 0..1020, 0..40, is_dark), 0);

        label_comparison_sheet(&mut sheet, 500, &font());

        assert!(count_in(&sheet, 10..90, 10..32, is_dark) > 0);
        assert!(count_in(&sheet, 530..660, 10..32, is_dark) > 0);
        // nothing drawn in the gutter between the titles
        assert_eq!(count_in(&sheet, 500..520, 0..40, is_dark), 0);
    }

    #[test]
    fn seeded_card_with_only_a_name_gets_a_caption() {
        let assets = large_assets();
        let style = CardStyle::default();
        let font = font();
        let renderer = CardRenderer::new(&assets, &style).with_font(&font);

        let plain = renderer.render(&Session::with_seed(5)).unwrap();
        let named = renderer
            .render(&Session::with_seed(5).named("Alice", ""))
            .unwrap();

        let changed = (0..75u32)
            .flat_map(|y| (0..500u32).map(move |x| (x, y)))
            .filter(|&(x, y)| plain.get_pixel(x, y) != named.get_pixel(x, y))
            .count();
        assert!(changed > 0);
        // below the caption band the two cards are identical
        for y in (80..500).step_by(7) {
            for x in (0..500).step_by(7) {
                assert_eq!(plain.get_pixel(x, y), named.get_pixel(x, y));
            }
        }
    }
}
