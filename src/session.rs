//! The host-owned card session.

use crate::grid::TileCoord;
use crate::highlight::HighlightSet;
use crate::placement::Placement;
use crate::seed::{derive_seed, is_generation_ready};
use crate::share::ShareLink;
use crate::win::{detect_wins, WinSet};

/// `{seed, placement, highlights}` for one generated card. The placement is fixed
/// for the session's lifetime; highlights change only through [`Session::toggle`]
/// and [`Session::set_highlights`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    seed: u32,
    name: String,
    title: String,
    placement: Placement,
    highlights: HighlightSet,
}

impl Session {
    /// Starts a card for a player. `None` unless both trimmed fields are non-empty.
    pub fn generate(name: &str, title: &str) -> Option<Self> {
        if !is_generation_ready(name, title) {
            return None;
        }
        Some(Self::with_seed(derive_seed(name, title)).named(name, title))
    }

    /// Card for an explicit seed, e.g. a fresh random one chosen by the caller.
    pub fn with_seed(seed: u32) -> Self {
        Self::with_placement(seed, Placement::shuffled(seed))
    }

    pub fn with_placement(seed: u32, placement: Placement) -> Self {
        Self {
            seed,
            name: String::new(),
            title: String::new(),
            placement,
            highlights: HighlightSet::new(),
        }
    }

    /// Attaches the player's name and title (trimmed) without touching the seed,
    /// so a card on a caller-chosen seed still carries its caption.
    pub fn named(self, name: &str, title: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            title: title.trim().to_string(),
            ..self
        }
    }

    /// Same session with every tile on its home position.
    pub fn into_unshuffled(self) -> Self {
        Self {
            placement: Placement::identity(),
            ..self
        }
    }

    /// Rebuilds the card and marks a share link describes.
    pub fn from_share_link(link: &ShareLink) -> Option<Self> {
        let name = link.name.as_deref()?;
        let title = link.title.as_deref()?;
        let mut session = Self::generate(name, title)?;
        session.highlights = link.highlights;
        Some(session)
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    pub fn highlights(&self) -> &HighlightSet {
        &self.highlights
    }

    pub fn set_highlights(&mut self, highlights: HighlightSet) {
        self.highlights = highlights;
    }

    /// Flips the mark on `position`; the free space is left alone and `false` returned.
    pub fn toggle(&mut self, position: TileCoord) -> bool {
        self.highlights.toggle(position)
    }

    pub fn wins(&self) -> WinSet {
        detect_wins(&self.highlights)
    }

    pub fn share_link(&self) -> ShareLink {
        ShareLink::new(&self.name, &self.title, self.highlights)
    }
}
