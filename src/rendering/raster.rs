//! Rasterizer: executes a display list onto an RGBA canvas.
//!
//! Everything is integer arithmetic with hard edges; output is byte-for-byte
//! reproducible for the same display list.

use image::{Rgba, RgbaImage};

use super::layout::Rect;
use super::paint::{stroke_bands, PaintCommand};

/// `(v + 128 + ((v + 128) >> 8)) >> 8`, an exact rounding division by 255.
fn div255(v: u32) -> u8 {
    let t = v + 128;
    ((t + (t >> 8)) >> 8) as u8
}

/// Blend `src` over `dst` on every channel, alpha included, weighted by `mask`.
fn blend(src: Rgba<u8>, dst: Rgba<u8>, mask: u8) -> Rgba<u8> {
    let m = u32::from(mask);
    let mut out = [0u8; 4];
    for (i, o) in out.iter_mut().enumerate() {
        *o = div255(u32::from(src.0[i]) * m + u32::from(dst.0[i]) * (255 - m));
    }
    Rgba(out)
}

pub struct Raster {
    image: RgbaImage,
}

impl Raster {
    pub fn new(width: u32, height: u32, background: Rgba<u8>) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, background),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Intersect `rect` with the canvas as half-open pixel ranges.
    fn clip(&self, rect: Rect) -> Option<(u32, u32, u32, u32)> {
        let x0 = rect.x.max(0);
        let y0 = rect.y.max(0);
        let x1 = rect.right().min(self.width() as i32);
        let y1 = rect.bottom().min(self.height() as i32);
        (x0 < x1 && y0 < y1).then(|| (x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }

    pub fn clear(&mut self, rgba: Rgba<u8>) {
        for px in self.image.pixels_mut() {
            *px = rgba;
        }
    }

    pub fn fill_rect(&mut self, rect: Rect, rgba: Rgba<u8>) {
        if let Some((x0, y0, x1, y1)) = self.clip(rect) {
            for y in y0..y1 {
                for x in x0..x1 {
                    self.image.put_pixel(x, y, rgba);
                }
            }
        }
    }

    pub fn stroke_rect(&mut self, rect: Rect, width: u32, rgba: Rgba<u8>) {
        for band in stroke_bands(rect, width) {
            self.fill_rect(band, rgba);
        }
    }

    /// Paste `src` at `(x, y)`, using its own alpha channel as the mask.
    pub fn paste_masked(&mut self, x: i32, y: i32, src: &RgbaImage) {
        let target = Rect::new(x, y, src.width(), src.height());
        if let Some((x0, y0, x1, y1)) = self.clip(target) {
            for dy in y0..y1 {
                for dx in x0..x1 {
                    let s = *src.get_pixel((dx as i32 - x) as u32, (dy as i32 - y) as u32);
                    let d = *self.image.get_pixel(dx, dy);
                    self.image.put_pixel(dx, dy, blend(s, d, s.0[3]));
                }
            }
        }
    }

    /// Segment of thickness `width` from `from` to `to`, with discs of
    /// radius `width / 2` at both ends.
    pub fn capsule(&mut self, from: (i64, i64), to: (i64, i64), width: u32, rgba: Rgba<u8>) {
        if width == 0 {
            return;
        }
        let w = i64::from(width);
        let r = w / 2;
        let (x1, y1) = from;
        let (x2, y2) = to;
        let (vx, vy) = (x2 - x1, y2 - y1);
        let len2 = vx * vx + vy * vy;

        let min_x = (x1.min(x2) - w).max(0);
        let min_y = (y1.min(y2) - w).max(0);
        let max_x = (x1.max(x2) + w).min(i64::from(self.width()) - 1);
        let max_y = (y1.max(y2) + w).min(i64::from(self.height()) - 1);

        let in_disc = |px: i64, py: i64, cx: i64, cy: i64| (px - cx).pow(2) + (py - cy).pow(2) <= r * r;
        let in_body = |px: i64, py: i64| {
            if len2 == 0 {
                return false;
            }
            let (dx, dy) = (px - x1, py - y1);
            let along = dx * vx + dy * vy;
            if along < 0 || along > len2 {
                return false;
            }
            // Signed offset from the axis, doubled: the band is half-open so
            // axis-aligned strokes come out exactly `width` pixels thick.
            let cross = dx * vy - dy * vx;
            let lhs = 4 * cross * cross;
            let rhs = w * w * len2;
            if cross >= 0 {
                lhs < rhs
            } else {
                lhs <= rhs
            }
        };

        for py in min_y..=max_y {
            for px in min_x..=max_x {
                if in_body(px, py) || in_disc(px, py, x1, y1) || in_disc(px, py, x2, y2) {
                    self.image.put_pixel(px as u32, py as u32, rgba);
                }
            }
        }
    }

    pub fn execute(&mut self, cmd: &PaintCommand) {
        match cmd {
            PaintCommand::Clear { rgba } => self.clear(*rgba),
            PaintCommand::SolidRect { rect, rgba } => self.fill_rect(*rect, *rgba),
            PaintCommand::StrokeRect { rect, width, rgba } => self.stroke_rect(*rect, *width, *rgba),
            PaintCommand::Image { x, y, image } => self.paste_masked(*x, *y, image),
            PaintCommand::Capsule { from, to, width, rgba } => self.capsule(*from, *to, *width, *rgba),
        }
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

/// Execute `commands` in order onto a fresh `width` x `height` canvas.
pub fn rasterize(width: u32, height: u32, commands: &[PaintCommand]) -> RgbaImage {
    let mut raster = Raster::new(width, height, Rgba([0, 0, 0, 0]));
    for cmd in commands {
        raster.execute(cmd);
    }
    raster.into_image()
}

/// Copy the top-left `used` x `used` region of `board` onto a fresh canvas
/// filled with `background`, at `(offset, offset)`.
pub fn composite_centered(board: &RgbaImage, used: u32, offset: u32, canvas: u32, background: Rgba<u8>) -> RgbaImage {
    let mut out = RgbaImage::from_pixel(canvas, canvas, background);
    let used = used.min(board.width()).min(board.height());
    for y in 0..used {
        for x in 0..used {
            let (tx, ty) = (x + offset, y + offset);
            if tx < canvas && ty < canvas {
                out.put_pixel(tx, ty, *board.get_pixel(x, y));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    #[test]
    fn div255_matches_exact_rounding() {
        for v in [0u32, 127, 128, 255, 255 * 128, 255 * 255] {
            let expected = ((v as f64) / 255.0).round() as u8;
            assert_eq!(div255(v), expected, "v = {}", v);
        }
    }

    #[test]
    fn fill_rect_clips_to_canvas() {
        let mut r = Raster::new(4, 4, WHITE);
        r.fill_rect(Rect::new(-2, 2, 10, 10), RED);
        let img = r.into_image();
        assert_eq!(*img.get_pixel(0, 1), WHITE);
        assert_eq!(*img.get_pixel(0, 2), RED);
        assert_eq!(*img.get_pixel(3, 3), RED);
    }

    #[test]
    fn paste_respects_source_alpha() {
        let mut src = RgbaImage::from_pixel(2, 1, RED);
        src.put_pixel(1, 0, Rgba([255, 0, 0, 0]));
        let mut r = Raster::new(3, 1, WHITE);
        r.paste_masked(1, 0, &src);
        let img = r.into_image();
        assert_eq!(*img.get_pixel(0, 0), WHITE);
        assert_eq!(*img.get_pixel(1, 0), RED);
        assert_eq!(*img.get_pixel(2, 0), WHITE);
    }

    #[test]
    fn horizontal_capsule_is_exactly_width_thick() {
        let mut r = Raster::new(32, 32, WHITE);
        r.capsule((8, 16), (24, 16), 4, RED);
        let img = r.into_image();
        let thick = (0..32).filter(|y| *img.get_pixel(16, *y) == RED).count();
        assert_eq!(thick, 4);
        // Round cap reaches `width / 2` past the endpoint
        assert_eq!(*img.get_pixel(26, 16), RED);
        assert_eq!(*img.get_pixel(27, 16), WHITE);
    }

    #[test]
    fn degenerate_capsule_is_a_disc() {
        let mut r = Raster::new(9, 9, WHITE);
        r.capsule((4, 4), (4, 4), 4, RED);
        let img = r.into_image();
        assert_eq!(*img.get_pixel(4, 2), RED);
        assert_eq!(*img.get_pixel(4, 1), WHITE);
        assert_eq!(*img.get_pixel(2, 2), WHITE);
    }

    #[test]
    fn centered_composite_moves_board() {
        let board = RgbaImage::from_pixel(8, 8, RED);
        let out = composite_centered(&board, 4, 2, 8, WHITE);
        assert_eq!(*out.get_pixel(1, 1), WHITE);
        assert_eq!(*out.get_pixel(2, 2), RED);
        assert_eq!(*out.get_pixel(5, 5), RED);
        assert_eq!(*out.get_pixel(6, 6), WHITE);
    }
}
