//! Anchored placement of a box inside a container; used for the card caption.

use crate::utils::{Position, Rectangle, Size};

#[derive(Clone, Copy, Debug)]
pub enum HAnchor {
    Left,
    Center,
    Right,
}
#[derive(Clone, Copy, Debug)]
pub enum VAnchor {
    Top,
    Middle,
    Bottom,
}

#[derive(Clone, Copy, Debug)]
pub struct Anchors {
    pub h: HAnchor,
    pub v: VAnchor,
}

impl Default for Anchors {
    fn default() -> Self {
        Self {
            h: HAnchor::Center,
            v: VAnchor::Middle,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Margins {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Margins {
    pub fn uniform(m: f32) -> Self {
        Self {
            left: m,
            right: m,
            top: m,
            bottom: m,
        }
    }
}

fn content_area(container: Rectangle, margins: Margins) -> Rectangle {
    Rectangle::new(
        container.x + margins.left,
        container.y + margins.top,
        (container.width - margins.left - margins.right).max(0.0),
        (container.height - margins.top - margins.bottom).max(0.0),
    )
}

/// Top-left corner for a box of `size` anchored inside `container` after margins.
pub fn anchor_in(container: Rectangle, size: Size, anchors: Anchors, margins: Margins) -> Position {
    let content = content_area(container, margins);
    let x = match anchors.h {
        HAnchor::Left => content.x,
        HAnchor::Center => content.x + (content.width - size.width) * 0.5,
        HAnchor::Right => content.x + content.width - size.width,
    };
    let y = match anchors.v {
        VAnchor::Top => content.y,
        VAnchor::Middle => content.y + (content.height - size.height) * 0.5,
        VAnchor::Bottom => content.y + content.height - size.height,
    };
    Position { x, y }
}

/// Largest factor `<= 1` that makes `size` fit inside the container's content area.
pub fn fit_scale(container: Rectangle, size: Size, margins: Margins) -> f32 {
    let content = content_area(container, margins);
    if size.width <= 0.0 || size.height <= 0.0 {
        return 1.0;
    }
    (content.width / size.width)
        .min(content.height / size.height)
        .clamp(0.0, 1.0)
}

/// Full-width band between the top of the card and the top of the grid.
pub fn caption_band(card: Size, grid: Rectangle) -> Rectangle {
    Rectangle::new(0.0, 0.0, card.width, grid.y.clamp(0.0, card.height))
}
