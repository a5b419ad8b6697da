//! Paint command set for board rendering.
//!
//! The renderer first lowers a board into an ordered display list, then the
//! rasterizer executes it front to back: later commands occlude earlier ones.

use image::{Rgba, RgbaImage};

use super::layout::Rect;

#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    /// Fill the whole canvas
    Clear { rgba: Rgba<u8> },
    SolidRect { rect: Rect, rgba: Rgba<u8> },
    /// Outline drawn inward from `rect`'s edges, `width` pixels thick
    StrokeRect { rect: Rect, width: u32, rgba: Rgba<u8> },
    /// Paste pixels at `(x, y)` using their own alpha as the mask
    Image { x: i32, y: i32, image: RgbaImage },
    /// Thick segment between two points with round end caps
    Capsule {
        from: (i64, i64),
        to: (i64, i64),
        width: u32,
        rgba: Rgba<u8>,
    },
}

impl PaintCommand {
    pub fn name(&self) -> &'static str {
        match self {
            PaintCommand::Clear { .. } => "clear",
            PaintCommand::SolidRect { .. } => "solid-rect",
            PaintCommand::StrokeRect { .. } => "stroke-rect",
            PaintCommand::Image { .. } => "image",
            PaintCommand::Capsule { .. } => "capsule",
        }
    }
}

/// Decompose an inward stroke into the filled bands that make it up.
pub fn stroke_bands(rect: Rect, width: u32) -> Vec<Rect> {
    if width == 0 || rect.is_empty() {
        return Vec::new();
    }
    if width * 2 >= rect.width || width * 2 >= rect.height {
        return vec![rect];
    }
    let inner_h = rect.height - 2 * width;
    vec![
        Rect::new(rect.x, rect.y, rect.width, width),
        Rect::new(rect.x, rect.bottom() - width as i32, rect.width, width),
        Rect::new(rect.x, rect.y + width as i32, width, inner_h),
        Rect::new(rect.right() - width as i32, rect.y + width as i32, width, inner_h),
    ]
}
