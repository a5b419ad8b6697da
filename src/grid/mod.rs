//! Grid layout solver
//!
//! Turns a grid size and a set of [`Constraints`] into exact pixel
//! measurements ([`GridParams`]) for the fixed-size canvas. The search is
//! exhaustive and deterministic; see [`solver`] for the enumeration order.
//!
//! Default layouts for every supported grid size are solved once from fixed
//! constraint presets and kept in a process-wide read-only table.

pub mod constraints;
pub mod solver;

use std::sync::OnceLock;

use log::debug;
use serde::{Deserialize, Serialize};

pub use constraints::{Constraints, SearchBounds};

use crate::{Error, Result};

/// Smallest supported grid size
pub const MIN_GRID_SIZE: u32 = 1;
/// Largest supported grid size
pub const MAX_GRID_SIZE: u32 = 9;

/// Solved pixel measurements for one grid size / constraint set.
///
/// Invariants for every value returned by [`solve`]:
/// `asset_width == cell_width - 2 * padding > 0` and the used board width
/// never exceeds [`CANVAS_SIZE`](crate::CANVAS_SIZE).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridParams {
    pub cell_width: u32,
    pub asset_width: u32,
    pub padding: u32,
    pub line_width: u32,
    pub border_width: u32,
}

impl GridParams {
    /// Width actually occupied by the board: cells, separators and both borders.
    pub fn used_width(&self, grid_size: u32) -> u32 {
        self.cell_width * grid_size + self.line_width * grid_size.saturating_sub(1) + self.border_width * 2
    }
}

pub fn check_grid_size(grid_size: u32) -> Result<()> {
    if (MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&grid_size) {
        Ok(())
    } else {
        Err(Error::InvalidGridSize(i64::from(grid_size)))
    }
}

/// Solve the layout for `grid_size` under `constraints`.
pub fn solve(grid_size: u32, constraints: &Constraints) -> Result<GridParams> {
    check_grid_size(grid_size)?;
    constraints.validate()?;

    let best = solver::best_candidate(grid_size, constraints.bounds())
        .ok_or(Error::NoValidConfiguration { grid_size })?;
    debug!(
        "solved grid {}: cell={} asset={} padding={} line={} border={} (score {})",
        grid_size,
        best.params.cell_width,
        best.params.asset_width,
        best.params.padding,
        best.params.line_width,
        best.params.border_width,
        best.score
    );
    Ok(best.params)
}

/// Constraint preset used for the cached default layout of `grid_size`.
pub fn preset_constraints(grid_size: u32) -> Result<Constraints> {
    let preset = match grid_size {
        1 => Constraints::preset(8, 0, 8, true),
        2 => Constraints::preset(3, 7, 9, true),
        3 => Constraints::preset(1, 3, 3, true),
        4 | 5 => Constraints::preset(1, 1, 3, true),
        6 => Constraints::preset(1, 1, 1, true),
        7..=9 => Constraints::preset(1, 1, 1, false),
        other => return Err(Error::InvalidGridSize(i64::from(other))),
    };
    Ok(preset)
}

static DEFAULT_PARAMS: OnceLock<Vec<Result<GridParams>>> = OnceLock::new();

fn default_table() -> &'static [Result<GridParams>] {
    DEFAULT_PARAMS.get_or_init(|| {
        (MIN_GRID_SIZE..=MAX_GRID_SIZE)
            .map(|size| preset_constraints(size).and_then(|c| solve(size, &c)))
            .collect()
    })
}

/// Force the default table to be built (call once at startup).
pub fn warm_defaults() {
    let table = default_table();
    debug!("default grid table ready ({} sizes)", table.len());
}

/// Cached default layout for `grid_size`.
pub fn default_params(grid_size: u32) -> Result<GridParams> {
    check_grid_size(grid_size)?;
    let index = (grid_size - MIN_GRID_SIZE) as usize;
    default_table()
        .get(index)
        .cloned()
        .unwrap_or(Err(Error::InvalidGridSize(i64::from(grid_size))))
}

/// Cached defaults unless the request overrides a layout-affecting key.
pub fn resolve_params(grid_size: u32, constraints: &Constraints) -> Result<GridParams> {
    if constraints.overrides_layout() {
        solve(grid_size, constraints)
    } else {
        debug!("using cached default layout for grid {}", grid_size);
        default_params(grid_size)
    }
}
