//! Board model: teams, placements and placed items
//!
//! A [`Board`] is the fully-resolved input of a render: grid size, solved
//! [`GridParams`], teams in declaration order, items in input order and the
//! palette. It is built fresh per request and discarded afterwards.

use std::collections::HashMap;

use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::color::Palette;
use crate::grid::GridParams;

/// One corner bracket of a completed cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "top-left" => Some(Corner::TopLeft),
            "top-right" => Some(Corner::TopRight),
            "bottom-left" => Some(Corner::BottomLeft),
            "bottom-right" => Some(Corner::BottomRight),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Corner::TopLeft => "top-left",
            Corner::TopRight => "top-right",
            Corner::BottomLeft => "bottom-left",
            Corner::BottomRight => "bottom-right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    /// The two corner brackets adjacent to this side.
    pub fn corners(&self) -> [Corner; 2] {
        match self {
            Side::Top => [Corner::TopLeft, Corner::TopRight],
            Side::Bottom => [Corner::BottomLeft, Corner::BottomRight],
            Side::Left => [Corner::TopLeft, Corner::BottomLeft],
            Side::Right => [Corner::TopRight, Corner::BottomRight],
        }
    }
}

/// Region of a completed cell claimed by a team.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Placement {
    /// Outline around the whole cell
    Full,
    /// Both corner brackets along one side
    Side(Side),
    /// A single corner bracket
    Corner(Corner),
    /// Raw token that names no known corner; draws nothing
    Unknown(String),
}

impl Placement {
    pub fn parse(token: &str) -> Self {
        match token {
            "full" => Placement::Full,
            "top" => Placement::Side(Side::Top),
            "bottom" => Placement::Side(Side::Bottom),
            "left" => Placement::Side(Side::Left),
            "right" => Placement::Side(Side::Right),
            other => match Corner::from_token(other) {
                Some(corner) => Placement::Corner(corner),
                None => Placement::Unknown(other.to_string()),
            },
        }
    }
}

/// A team declared on the board. Declaration order is significant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub name: String,
    pub placement: Option<Placement>,
    pub color: Rgba<u8>,
}

impl Team {
    pub fn new(name: impl Into<String>, placement: Option<Placement>, color: Rgba<u8>) -> Self {
        Self {
            name: name.into(),
            placement,
            color,
        }
    }
}

/// A tile placed on the grid.
///
/// Coordinates are signed and unchecked: cells outside the current grid are
/// skipped by the renderer and the detector, never rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub row: i64,
    pub column: i64,
    pub sprite: String,
    #[serde(default)]
    pub completed: HashMap<String, bool>,
}

impl Item {
    pub fn new(row: i64, column: i64, sprite: impl Into<String>) -> Self {
        Self {
            row,
            column,
            sprite: sprite.into(),
            completed: HashMap::new(),
        }
    }

    /// Mark the item as completed by `team`.
    pub fn completed_by(mut self, team: &str) -> Self {
        self.completed.insert(team.to_string(), true);
        self
    }

    pub fn is_completed_by(&self, team: &str) -> bool {
        self.completed.get(team).copied().unwrap_or(false)
    }

    /// `(row, column)` when inside a `grid_size`-wide grid.
    pub fn cell(&self, grid_size: u32) -> Option<(usize, usize)> {
        let in_range = |v: i64| v >= 0 && v < i64::from(grid_size);
        if in_range(self.row) && in_range(self.column) {
            Some((self.row as usize, self.column as usize))
        } else {
            None
        }
    }
}

/// Resolved render input.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    pub grid_size: u32,
    pub params: GridParams,
    pub teams: Vec<Team>,
    pub items: Vec<Item>,
    pub palette: Palette,
    pub center_board: bool,
}

impl Board {
    pub fn new(grid_size: u32, params: GridParams) -> Self {
        Self {
            grid_size,
            params,
            teams: Vec::new(),
            items: Vec::new(),
            palette: Palette::default(),
            center_board: true,
        }
    }

    pub fn with_team(mut self, team: Team) -> Self {
        self.teams.push(team);
        self
    }

    pub fn with_item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_center_board(mut self, center: bool) -> Self {
        self.center_board = center;
        self
    }

    pub fn team(&self, name: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.name == name)
    }
}
