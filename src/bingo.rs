//! Bingo detection
//!
//! Builds a completion matrix per team and finds the first fully completed
//! line. Teams are evaluated in declaration order; within a team rows come
//! first (ascending), then columns (ascending), then the main diagonal and
//! finally the anti-diagonal. The first hit wins and evaluation stops.

use image::Rgba;
use log::info;
use serde::Serialize;

use crate::board::{Item, Team};
use crate::grid::GridParams;

/// A line of cells that completes a bingo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum Line {
    Row(usize),
    Column(usize),
    /// Top-left to bottom-right
    Diagonal,
    /// Top-right to bottom-left
    AntiDiagonal,
}

impl Line {
    /// Every line of an `n`-wide grid in detection priority order.
    pub fn all(n: usize) -> impl Iterator<Item = Line> {
        (0..n)
            .map(Line::Row)
            .chain((0..n).map(Line::Column))
            .chain([Line::Diagonal, Line::AntiDiagonal])
    }

    pub fn cells(&self, n: usize) -> impl Iterator<Item = (usize, usize)> {
        let line = *self;
        (0..n).map(move |i| match line {
            Line::Row(r) => (r, i),
            Line::Column(c) => (i, c),
            Line::Diagonal => (i, i),
            Line::AntiDiagonal => (i, n - 1 - i),
        })
    }

    /// First and last cell of the line, as `(row, column)`.
    pub fn endpoints(&self, n: usize) -> ((usize, usize), (usize, usize)) {
        let last = n.saturating_sub(1);
        match *self {
            Line::Row(r) => ((r, 0), (r, last)),
            Line::Column(c) => ((0, c), (last, c)),
            Line::Diagonal => ((0, 0), (last, last)),
            Line::AntiDiagonal => ((0, last), (last, 0)),
        }
    }
}

/// Completion state of one team over the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionGrid {
    size: usize,
    cells: Vec<bool>,
}

impl CompletionGrid {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![false; size * size],
        }
    }

    /// Matrix for `team` built from every in-range item it completed.
    pub fn for_team(grid_size: u32, items: &[Item], team: &str) -> Self {
        let mut grid = Self::new(grid_size as usize);
        for item in items {
            if let Some((row, column)) = item.cell(grid_size) {
                if item.is_completed_by(team) {
                    grid.set(row, column);
                }
            }
        }
        grid
    }

    pub fn set(&mut self, row: usize, column: usize) {
        if row < self.size && column < self.size {
            self.cells[row * self.size + column] = true;
        }
    }

    pub fn get(&self, row: usize, column: usize) -> bool {
        row < self.size && column < self.size && self.cells[row * self.size + column]
    }

    pub fn is_complete(&self, line: Line) -> bool {
        line.cells(self.size).all(|(r, c)| self.get(r, c))
    }

    /// First completed line in priority order.
    pub fn first_complete_line(&self) -> Option<Line> {
        if self.size == 0 {
            return None;
        }
        Line::all(self.size).find(|line| self.is_complete(*line))
    }
}

/// The winning team and the line to stroke.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BingoResult {
    pub team: String,
    #[serde(skip)]
    pub color: Rgba<u8>,
    pub line: Line,
    /// `(row, column)` of the first cell of the line
    pub start: (usize, usize),
    /// `(row, column)` of the last cell of the line
    pub end: (usize, usize),
    /// Pixel center of the first cell, in board coordinates
    pub start_px: (i64, i64),
    /// Pixel center of the last cell, in board coordinates
    pub end_px: (i64, i64),
}

/// Pixel center of a cell in board coordinates (before any centering).
pub fn cell_center(params: &GridParams, row: usize, column: usize) -> (i64, i64) {
    let step = i64::from(params.cell_width) + i64::from(params.line_width);
    let origin = |i: usize| i64::from(params.border_width) + i as i64 * step;
    let half = i64::from(params.cell_width / 2);
    (origin(column) + half, origin(row) + half)
}

/// Find the winning team, if any. Items naming unknown teams are ignored here.
pub fn detect(grid_size: u32, items: &[Item], teams: &[Team], params: &GridParams) -> Option<BingoResult> {
    let n = grid_size as usize;
    teams.iter().find_map(|team| {
        let line = CompletionGrid::for_team(grid_size, items, &team.name).first_complete_line()?;
        let (start, end) = line.endpoints(n);
        info!("bingo for team '{}' on {:?}", team.name, line);
        Some(BingoResult {
            team: team.name.clone(),
            color: team.color,
            line,
            start,
            end,
            start_px: cell_center(params, start.0, start.1),
            end_px: cell_center(params, end.0, end.1),
        })
    })
}
