//! Pixel geometry of a solved board: cells, separators, border and overlays.

use crate::board::Corner;
use crate::grid::GridParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn square(x: i32, y: i32, side: u32) -> Self {
        Self::new(x, y, side, side)
    }

    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Geometry helper over one board's grid parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardGeometry {
    pub grid_size: u32,
    pub params: GridParams,
}

impl BoardGeometry {
    pub fn new(grid_size: u32, params: GridParams) -> Self {
        Self { grid_size, params }
    }

    pub fn used_width(&self) -> u32 {
        self.params.used_width(self.grid_size)
    }

    /// Offset of the `index`-th cell along either axis.
    fn cell_offset(&self, index: usize) -> i32 {
        let p = &self.params;
        (p.border_width + index as u32 * (p.cell_width + p.line_width)) as i32
    }

    pub fn cell_rect(&self, row: usize, column: usize) -> Rect {
        Rect::square(self.cell_offset(column), self.cell_offset(row), self.params.cell_width)
    }

    /// Where the resized texture lands: the cell inset by `padding`.
    pub fn asset_rect(&self, row: usize, column: usize) -> Rect {
        let cell = self.cell_rect(row, column);
        let pad = self.params.padding as i32;
        Rect::square(cell.x + pad, cell.y + pad, self.params.asset_width)
    }

    /// Separator bands, each vertical band followed by its horizontal twin,
    /// spanning the whole used width.
    pub fn separators(&self) -> Vec<Rect> {
        let p = &self.params;
        if p.line_width == 0 {
            return Vec::new();
        }
        let used = self.used_width();
        (1..self.grid_size)
            .flat_map(|k| {
                let offset = (p.border_width + k * p.cell_width + (k - 1) * p.line_width) as i32;
                [
                    Rect::new(offset, 0, p.line_width, used),
                    Rect::new(0, offset, used, p.line_width),
                ]
            })
            .collect()
    }

    /// Outer bounds of the board; stroked inward by `border_width`.
    pub fn border_rect(&self) -> Rect {
        Rect::square(0, 0, self.used_width())
    }

    /// The two arms of an L-shaped corner bracket inside `cell`.
    ///
    /// Each arm is `thickness` thick and runs from the corner to the cell's
    /// midline, so the two brackets of a side placement meet in the middle.
    pub fn bracket_arms(cell: Rect, corner: Corner, thickness: u32) -> [Rect; 2] {
        let cw = cell.width;
        let half = cw / 2;
        let rest = cw - half;
        let (x, y, t) = (cell.x, cell.y, thickness);
        let near_x = x;
        let near_y = y;
        let mid_x = x + half as i32;
        let mid_y = y + half as i32;
        let far_x = x + cw as i32 - t as i32;
        let far_y = y + cw as i32 - t as i32;

        match corner {
            Corner::TopLeft => [Rect::new(near_x, near_y, half, t), Rect::new(near_x, near_y, t, half)],
            Corner::TopRight => [Rect::new(mid_x, near_y, rest, t), Rect::new(far_x, near_y, t, half)],
            Corner::BottomLeft => [Rect::new(near_x, far_y, half, t), Rect::new(near_x, mid_y, t, rest)],
            Corner::BottomRight => [Rect::new(mid_x, far_y, rest, t), Rect::new(far_x, mid_y, t, rest)],
        }
    }

    /// Offset at which a board narrower than `canvas` is centered.
    pub fn centering_offset(&self, canvas: u32) -> Option<u32> {
        let used = self.used_width();
        (used < canvas).then(|| (canvas - used) / 2)
    }
}
