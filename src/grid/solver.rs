//! Scored exhaustive search over layout candidates.
//!
//! Candidates are generated lazily in a fixed nested order (border width,
//! then line width, then cell width, then padding, each ascending) and folded
//! keeping the first strictly-greater score. The order is observable: among
//! equally scored layouts the one generated first is canonical.

use super::constraints::SearchBounds;
use super::GridParams;
use crate::{BASE_ASSET_WIDTH, CANVAS_SIZE};

/// A valid layout together with its score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub params: GridParams,
    pub score: i64,
}

/// Asset width divides, or is divided by, the base texture unit.
pub fn is_pixel_perfect(asset_width: u32) -> bool {
    asset_width > 0 && (asset_width % BASE_ASSET_WIDTH == 0 || BASE_ASSET_WIDTH % asset_width == 0)
}

/// Canvas width left for cells once lines and borders are placed (may be negative).
fn remaining_width(grid_size: u32, line_width: u32, border_width: u32) -> i64 {
    i64::from(CANVAS_SIZE) - i64::from(line_width) * i64::from(grid_size.saturating_sub(1)) - 2 * i64::from(border_width)
}

fn cell_widths(grid_size: u32, fill_board: bool, remaining: i64) -> Option<std::ops::RangeInclusive<u32>> {
    if remaining <= 0 {
        return None;
    }
    let remaining = u32::try_from(remaining).ok()?;
    if fill_board {
        if remaining % grid_size != 0 {
            return None;
        }
        let cell_width = remaining / grid_size;
        Some(cell_width..=cell_width)
    } else {
        Some(1..=remaining / grid_size)
    }
}

fn evaluate(bounds: &SearchBounds, cell_width: u32, padding: u32, line_width: u32, border_width: u32) -> Option<Candidate> {
    let asset_width = cell_width.checked_sub(2 * padding).filter(|w| *w > 0)?;
    if bounds.pixel_perfect && !is_pixel_perfect(asset_width) {
        return None;
    }

    let score = i64::from(asset_width) * 1000
        - i64::from(padding - bounds.min_padding) * 20
        - i64::from(line_width - bounds.min_line_width) * 10
        - i64::from(border_width - bounds.min_border_width) * 10;

    Some(Candidate {
        params: GridParams {
            cell_width,
            asset_width,
            padding,
            line_width,
            border_width,
        },
        score,
    })
}

/// Every valid candidate, in canonical enumeration order.
///
/// Remaining width only shrinks as borders and lines grow, so both ranges
/// stop at the first width that leaves no room for cells. A single cell has
/// no separators: wider lines only lower its score and are never enumerated.
pub fn candidates(grid_size: u32, bounds: SearchBounds) -> impl Iterator<Item = Candidate> {
    let max_line_width = if grid_size <= 1 {
        bounds.min_line_width.min(bounds.max_line_width)
    } else {
        bounds.max_line_width
    };

    (bounds.min_border_width..=bounds.max_border_width)
        .take_while(move |&border_width| remaining_width(grid_size, bounds.min_line_width, border_width) > 0)
        .flat_map(move |border_width| {
            (bounds.min_line_width..=max_line_width)
                .take_while(move |&line_width| remaining_width(grid_size, line_width, border_width) > 0)
                .flat_map(move |line_width| {
                    let remaining = remaining_width(grid_size, line_width, border_width);
                    cell_widths(grid_size, bounds.fill_board, remaining)
                        .into_iter()
                        .flatten()
                        .flat_map(move |cell_width| {
                            let max_padding = bounds.max_padding.min(cell_width / 2);
                            (bounds.min_padding..=max_padding).filter_map(move |padding| {
                                evaluate(&bounds, cell_width, padding, line_width, border_width)
                            })
                        })
                })
        })
}

/// First maximum of the candidate sequence; a later candidate replaces the
/// current best only when its score is strictly greater.
pub fn best_candidate(grid_size: u32, bounds: SearchBounds) -> Option<Candidate> {
    candidates(grid_size, bounds).fold(None, |best, candidate| match best {
        Some(current) if candidate.score <= current.score => Some(current),
        _ => Some(candidate),
    })
}
