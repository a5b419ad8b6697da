//! Layout constraints supplied per request, plus their validation.

use serde::{Deserialize, Serialize};

use crate::{Error, Result, CANVAS_SIZE};

/// Per-request layout constraints.
///
/// Every field is optional so callers can tell "not supplied" apart from an
/// explicit value: supplying any layout-affecting key forces a fresh solve
/// instead of using the cached default profile for the grid size.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Constraints {
    pub min_padding: Option<u32>,
    pub max_padding: Option<u32>,
    pub min_line_width: Option<u32>,
    pub max_line_width: Option<u32>,
    pub min_border_width: Option<u32>,
    pub max_border_width: Option<u32>,
    /// Asset width must divide, or be divided by, `BASE_ASSET_WIDTH`
    pub pixel_perfect: Option<bool>,
    /// Cells must exactly consume the space left by lines and borders
    pub fill_board: Option<bool>,
    /// Center a board narrower than the canvas (does not affect the solve)
    pub center_board: Option<bool>,
}

/// Fully-resolved, inclusive search ranges used by the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchBounds {
    pub min_padding: u32,
    pub max_padding: u32,
    pub min_line_width: u32,
    pub max_line_width: u32,
    pub min_border_width: u32,
    pub max_border_width: u32,
    pub pixel_perfect: bool,
    pub fill_board: bool,
}

impl Constraints {
    /// Constraint profile used to build the cached default layout for a grid size.
    pub fn preset(min_padding: u32, min_line_width: u32, min_border_width: u32, pixel_perfect: bool) -> Self {
        Self {
            min_padding: Some(min_padding),
            min_line_width: Some(min_line_width),
            min_border_width: Some(min_border_width),
            pixel_perfect: Some(pixel_perfect),
            ..Default::default()
        }
    }

    /// Whether any key that changes the solved layout was supplied.
    ///
    /// `center_board` is deliberately absent: it only moves the finished board.
    pub fn overrides_layout(&self) -> bool {
        self.min_padding.is_some()
            || self.max_padding.is_some()
            || self.min_line_width.is_some()
            || self.max_line_width.is_some()
            || self.min_border_width.is_some()
            || self.max_border_width.is_some()
            || self.pixel_perfect.is_some()
            || self.fill_board.is_some()
    }

    pub fn pixel_perfect(&self) -> bool {
        self.pixel_perfect.unwrap_or(true)
    }

    pub fn fill_board(&self) -> bool {
        self.fill_board.unwrap_or(true)
    }

    pub fn center_board(&self) -> bool {
        self.center_board.unwrap_or(true)
    }

    /// Check min/max pairs, collecting every violation before failing.
    pub fn validate(&self) -> Result<()> {
        let pairs = [
            ("min_padding", self.min_padding, "max_padding", self.max_padding),
            ("min_line_width", self.min_line_width, "max_line_width", self.max_line_width),
            ("min_border_width", self.min_border_width, "max_border_width", self.max_border_width),
        ];

        let errors: Vec<String> = pairs
            .iter()
            .filter_map(|&(min_key, min, max_key, max)| match (min, max) {
                (Some(min), Some(max)) if min > max => Some(format!(
                    "Constraints: '{}': Cannot be greater than '{}' ({} > {})",
                    min_key, max_key, min, max
                )),
                _ => None,
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::InvalidConstraints(errors))
        }
    }

    /// Resolve omitted keys to their defaults.
    pub fn bounds(&self) -> SearchBounds {
        SearchBounds {
            min_padding: self.min_padding.unwrap_or(0),
            max_padding: self.max_padding.unwrap_or(CANVAS_SIZE / 2),
            min_line_width: self.min_line_width.unwrap_or(0),
            max_line_width: self.max_line_width.unwrap_or(CANVAS_SIZE),
            min_border_width: self.min_border_width.unwrap_or(0),
            max_border_width: self.max_border_width.unwrap_or(CANVAS_SIZE),
            pixel_perfect: self.pixel_perfect(),
            fill_board: self.fill_board(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_constraints_keep_defaults() {
        let c = Constraints::default();
        assert!(!c.overrides_layout());
        assert!(c.pixel_perfect());
        assert!(c.fill_board());
        assert!(c.center_board());

        let b = c.bounds();
        assert_eq!(b.max_padding, 64);
        assert_eq!(b.max_line_width, 128);
        assert_eq!(b.max_border_width, 128);
        assert_eq!(b.min_padding, 0);
    }

    #[test]
    fn center_board_alone_does_not_override_layout() {
        let c = Constraints {
            center_board: Some(false),
            ..Default::default()
        };
        assert!(!c.overrides_layout());

        let c = Constraints {
            fill_board: Some(true),
            ..Default::default()
        };
        assert!(c.overrides_layout());
    }

    #[test]
    fn validate_collects_every_inverted_pair() {
        let c = Constraints {
            min_padding: Some(4),
            max_padding: Some(2),
            min_border_width: Some(9),
            max_border_width: Some(1),
            min_line_width: Some(1),
            max_line_width: Some(1),
            ..Default::default()
        };
        match c.validate() {
            Err(Error::InvalidConstraints(errs)) => {
                assert_eq!(errs.len(), 2);
                assert!(errs[0].contains("min_padding"));
                assert!(errs[1].contains("min_border_width"));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn constraints_deserialize_from_snake_case_json() {
        let c: Constraints = serde_json::from_str(r#"{"min_padding": 2, "fill_board": false}"#).unwrap();
        assert_eq!(c.min_padding, Some(2));
        assert_eq!(c.fill_board, Some(false));
        assert!(c.max_padding.is_none());
    }
}
