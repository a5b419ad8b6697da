//! Request document model
//!
//! The JSON shape callers send to describe a board. Decoding is lenient in
//! the same places the board service always was: missing sections fall back
//! to defaults, an empty request falls back to its `map_raw` copy, and team
//! names and colors default by declaration index.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::board::{Board, Item, Placement, Team};
use crate::color::{ColorCollector, ColorSettings};
use crate::grid::{self, Constraints};
use crate::{Error, Result};

pub const DEFAULT_GRID_SIZE: i64 = 5;
pub const DEFAULT_TEAM_NAMES: [&str; 4] = ["team1", "team2", "team3", "team4"];
pub const DEFAULT_TEAM_COLORS: [&str; 4] = ["#64FF64", "#64FFFF", "#FFFF64", "#FF6464"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamSpec {
    pub name: Option<String>,
    pub placement: Option<String>,
    pub color: Option<String>,
}

/// Board settings. Sections are optional so a present-but-empty section
/// (`"constraints": {}`) is distinguishable from an absent one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teams: Option<Vec<TeamSpec>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Constraints>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<ColorSettings>,
    /// Keys not interpreted here; they still make the section non-empty
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Settings {
    /// True when no key at all was supplied.
    pub fn is_empty(&self) -> bool {
        self.grid_size.is_none()
            && self.teams.is_none()
            && self.constraints.is_none()
            && self.colors.is_none()
            && self.extra.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapRaw {
    pub settings: Settings,
    pub items: Vec<Item>,
}

/// Top-level request: `settings` + `items`, or the same pair under `map_raw`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardRequest {
    pub settings: Settings,
    pub items: Vec<Item>,
    pub map_raw: Option<MapRaw>,
}

fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|s| !s.trim().is_empty())
}

impl BoardRequest {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The effective settings and items, honouring the `map_raw` fallback.
    pub fn effective(&self) -> (&Settings, &[Item]) {
        if self.settings.is_empty() && self.items.is_empty() {
            if let Some(raw) = &self.map_raw {
                return (&raw.settings, &raw.items);
            }
        }
        (&self.settings, &self.items)
    }

    /// Validate and resolve into a renderable [`Board`].
    ///
    /// All colors are checked before anything fails so every bad one is
    /// reported together.
    pub fn into_board(&self) -> Result<Board> {
        let (settings, items) = self.effective();

        let grid_size = settings.grid_size.unwrap_or(DEFAULT_GRID_SIZE);
        let grid_size = u32::try_from(grid_size)
            .ok()
            .filter(|g| (grid::MIN_GRID_SIZE..=grid::MAX_GRID_SIZE).contains(g))
            .ok_or(Error::InvalidGridSize(grid_size))?;

        let team_specs = settings.teams.as_deref().unwrap_or_default();
        let constraints = settings.constraints.clone().unwrap_or_default();

        let mut colors = ColorCollector::new();
        let mut teams: Vec<Team> = Vec::with_capacity(team_specs.len());
        for (i, spec) in team_specs.iter().enumerate() {
            let name = match non_empty(&spec.name).or_else(|| DEFAULT_TEAM_NAMES.get(i).copied()) {
                Some(n) => n.to_string(),
                None => return Err(Error::InvalidRequest(format!("team #{} needs a name", i + 1))),
            };
            if teams.iter().any(|t| t.name == name) {
                return Err(Error::InvalidRequest(format!("duplicate team name '{}'", name)));
            }
            let color_spec = match non_empty(&spec.color).or_else(|| DEFAULT_TEAM_COLORS.get(i).copied()) {
                Some(c) => c,
                None => return Err(Error::InvalidRequest(format!("team '{}' needs a color", name))),
            };
            let color = colors.parse(color_spec);
            let placement = non_empty(&spec.placement).map(Placement::parse);
            teams.push(Team::new(name, placement, color));
        }

        let palette = settings.colors.clone().unwrap_or_default().resolve(&mut colors);
        colors.finish()?;

        let params = grid::resolve_params(grid_size, &constraints)?;

        Ok(Board {
            grid_size,
            params,
            teams,
            items: items.to_vec(),
            palette,
            center_board: constraints.center_board(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn minimal_request_uses_defaults() {
        let board = BoardRequest::from_json("{}").unwrap().into_board().unwrap();
        assert_eq!(board.grid_size, 5);
        assert_eq!(board.params, grid::default_params(5).unwrap());
        assert!(board.teams.is_empty());
        assert!(board.center_board);
    }

    #[test]
    fn teams_default_by_index() {
        let req = BoardRequest::from_json(
            r#"{"settings": {"grid_size": 3, "teams": [{"placement": "top"}, {"name": "blue", "color": "blue"}]}}"#,
        )
        .unwrap();
        let board = req.into_board().unwrap();
        assert_eq!(board.teams[0].name, "team1");
        assert_eq!(board.teams[0].color, Rgba([0x64, 0xFF, 0x64, 255]));
        assert_eq!(board.teams[0].placement, Some(Placement::parse("top")));
        assert_eq!(board.teams[1].name, "blue");
        assert_eq!(board.teams[1].color, Rgba([0, 0, 255, 255]));
        assert_eq!(board.teams[1].placement, None);
    }

    #[test]
    fn map_raw_is_used_when_top_level_is_empty() {
        let req = BoardRequest::from_json(
            r#"{"map_raw": {"settings": {"grid_size": 2}, "items": [{"row": 0, "column": 1, "sprite": "a.png"}]}}"#,
        )
        .unwrap();
        let board = req.into_board().unwrap();
        assert_eq!(board.grid_size, 2);
        assert_eq!(board.items.len(), 1);
        assert_eq!(board.items[0].column, 1);
    }

    #[test]
    fn any_settings_key_blocks_the_map_raw_fallback() {
        let raw = r#""map_raw": {"settings": {"grid_size": 2}}"#;
        for (settings, expected) in [
            (r#"{}"#, 2),
            (r#"{"constraints": {}}"#, 5),
            (r#"{"colors": {}}"#, 5),
            (r#"{"theme": "dark"}"#, 5),
        ] {
            let json = format!(r#"{{"settings": {}, {}}}"#, settings, raw);
            let board = BoardRequest::from_json(&json).unwrap().into_board().unwrap();
            assert_eq!(board.grid_size, expected, "settings {}", settings);
        }

        let req = BoardRequest::from_json(r#"{"settings": {"constraints": {}}}"#).unwrap();
        assert!(!req.settings.is_empty());
        assert!(Settings::default().is_empty());
    }

    #[test]
    fn grid_size_out_of_range() {
        for size in [0, 10, -3] {
            let json = format!(r#"{{"settings": {{"grid_size": {}}}}}"#, size);
            let err = BoardRequest::from_json(&json).unwrap().into_board().unwrap_err();
            assert_eq!(err, Error::InvalidGridSize(size));
        }
    }

    #[test]
    fn bad_colors_are_reported_together() {
        let req = BoardRequest::from_json(
            r##"{"settings": {"teams": [{"name": "x", "color": "mauve-ish"}], "colors": {"line_color": "#zz"}}}"##,
        )
        .unwrap();
        assert_eq!(
            req.into_board().unwrap_err(),
            Error::InvalidColor(vec!["mauve-ish".to_string(), "#zz".to_string()])
        );
    }

    #[test]
    fn duplicate_team_names_are_rejected() {
        let req = BoardRequest::from_json(r#"{"settings": {"teams": [{"name": "a"}, {"name": "a"}]}}"#).unwrap();
        assert!(matches!(req.into_board(), Err(Error::InvalidRequest(_))));
    }

    #[test]
    fn fifth_team_needs_explicit_name_and_color() {
        let json = r#"{"settings": {"teams": [{}, {}, {}, {}, {}]}}"#;
        assert!(matches!(
            BoardRequest::from_json(json).unwrap().into_board(),
            Err(Error::InvalidRequest(_))
        ));
    }

    #[test]
    fn layout_keys_trigger_a_fresh_solve() {
        let req = BoardRequest::from_json(r#"{"settings": {"grid_size": 3, "constraints": {"pixel_perfect": false}}}"#).unwrap();
        let board = req.into_board().unwrap();
        assert_eq!(board.params.cell_width, 42);
        assert_eq!(board.params.padding, 0);
        assert_eq!(board.params.line_width, 1);
        assert_eq!(board.params.border_width, 0);
    }

    #[test]
    fn inverted_constraints_surface_as_errors() {
        let req = BoardRequest::from_json(r#"{"settings": {"constraints": {"min_padding": 3, "max_padding": 1}}}"#).unwrap();
        assert!(matches!(req.into_board(), Err(Error::InvalidConstraints(_))));
    }

    #[test]
    fn malformed_json_is_an_invalid_request() {
        assert!(matches!(BoardRequest::from_json("{"), Err(Error::InvalidRequest(_))));
        assert!(matches!(
            BoardRequest::from_json(r#"{"settings": {"constraints": {"min_padding": -1}}}"#),
            Err(Error::InvalidRequest(_))
        ));
    }
}
