//! Deterministic, personalized bingo cards.
//!
//! A (name, title) pair derives a seed, the seed shuffles the 24 non-free tiles,
//! player marks travel in share links as a base-36 token, and every change of marks
//! recomputes the winning lines. The raster side composes the card image.
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod grid;
pub mod highlight;
pub mod layout;
pub mod metadata;
pub mod placement;
pub mod rng;
pub mod seed;
pub mod session;
pub mod share;
pub mod utils;
pub mod win;

#[cfg(feature = "raster")]
pub mod compositor;
#[cfg(feature = "text")]
pub mod text;

pub use config::CardConfig;
pub use error::{CardError, Result};
pub use grid::{coord_to_index, index_to_coord, is_free_space, TileCoord, FREE_SPACE};
pub use highlight::HighlightSet;
pub use placement::Placement;
pub use rng::LcgStream;
pub use seed::derive_seed;
pub use session::Session;
pub use share::ShareLink;
pub use win::{detect_wins, Line, WinSet};
