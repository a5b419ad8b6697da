//! Board rendering
//!
//! [`render`] lowers a [`Board`] into a display list ([`paint`]) using the
//! pixel geometry in [`layout`], rasterizes it ([`raster`]) and, when the
//! board is narrower than the canvas and centering is requested, composites
//! it centered onto a fresh canvas.
//!
//! Drawing order is part of the output contract: background, separators,
//! border, then every item in input order (texture followed by its team
//! overlays), and finally the bingo stroke.

pub mod layout;
pub mod paint;
pub mod raster;

use std::io::Cursor;

use base64::Engine as _;
use image::{imageops, ImageFormat, RgbaImage};
use log::{debug, trace, warn};
use sha2::{Digest, Sha256};

use crate::bingo::{self, BingoResult};
use crate::board::{Board, Item, Placement, Team};
use crate::{Error, Result, TextureSource, CANVAS_SIZE};

use layout::BoardGeometry;
use paint::PaintCommand;

/// A rendered canvas plus the detected winner.
#[derive(Debug, Clone)]
pub struct RenderedBoard {
    pub image: RgbaImage,
    pub bingo: Option<BingoResult>,
    /// Offset applied on both axes when the board was centered
    pub offset: u32,
}

impl RenderedBoard {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Raw RGBA bytes, row-major.
    pub fn as_rgba(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut buf = Cursor::new(Vec::new());
        self.image
            .write_to(&mut buf, ImageFormat::Png)
            .map_err(|e| Error::Encode(e.to_string()))?;
        Ok(buf.into_inner())
    }

    pub fn to_png_base64(&self) -> Result<String> {
        Ok(base64::engine::general_purpose::STANDARD.encode(self.to_png()?))
    }

    /// Hex SHA-256 of the raw RGBA bytes; stable across encoders.
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(self.as_rgba()))
    }

    /// Name of the winning team, if any.
    pub fn winner(&self) -> Option<&str> {
        self.bingo.as_ref().map(|b| b.team.as_str())
    }
}

/// Lower a board into its display list, returning the bingo result too.
pub fn paint_board(board: &Board, textures: &dyn TextureSource) -> Result<(Vec<PaintCommand>, Option<BingoResult>)> {
    let geometry = BoardGeometry::new(board.grid_size, board.params);
    let params = board.params;
    let palette = &board.palette;
    let mut commands = vec![PaintCommand::Clear { rgba: palette.background }];

    commands.extend(geometry.separators().into_iter().map(|rect| PaintCommand::SolidRect {
        rect,
        rgba: palette.line,
    }));

    if params.border_width > 0 {
        commands.push(PaintCommand::StrokeRect {
            rect: geometry.border_rect(),
            width: params.border_width,
            rgba: palette.border,
        });
    }

    for item in &board.items {
        let Some((row, column)) = item.cell(board.grid_size) else {
            warn!(
                "skipping '{}' at row {}, column {}: outside {}x{} grid",
                item.sprite, item.row, item.column, board.grid_size, board.grid_size
            );
            continue;
        };
        trace!("drawing '{}' at ({}, {})", item.sprite, row, column);

        let texture = textures.load(&item.sprite)?;
        let asset = geometry.asset_rect(row, column);
        if params.asset_width > 0 {
            let resized = imageops::resize(&texture, asset.width, asset.height, imageops::FilterType::Nearest);
            commands.push(PaintCommand::Image {
                x: asset.x,
                y: asset.y,
                image: resized,
            });
        }

        for team in completing_teams(board, item, row, column)? {
            let placement = team.placement.as_ref().ok_or_else(|| unresolved(&team.name, item, row, column))?;
            if params.padding == 0 {
                continue;
            }
            overlay(&mut commands, &geometry, row, column, team, placement);
        }
    }

    let bingo = bingo::detect(board.grid_size, &board.items, &board.teams, &params);
    // A single cell is still a win, but there is no line to stroke
    if let Some(result) = bingo.as_ref().filter(|_| board.grid_size > 1) {
        commands.push(PaintCommand::Capsule {
            from: result.start_px,
            to: result.end_px,
            width: params.padding,
            rgba: result.color,
        });
    }

    Ok((commands, bingo))
}

fn unresolved(team: &str, item: &Item, row: usize, column: usize) -> Error {
    Error::UnresolvedTeam {
        team: team.to_string(),
        sprite: item.sprite.clone(),
        row,
        column,
    }
}

/// Teams that completed `item`, in declaration order. Fails on a completion
/// naming a team the board does not declare.
fn completing_teams<'a>(board: &'a Board, item: &Item, row: usize, column: usize) -> Result<Vec<&'a Team>> {
    let mut unknown: Vec<&String> = item
        .completed
        .iter()
        .filter(|(name, done)| **done && board.team(name).is_none())
        .map(|(name, _)| name)
        .collect();
    unknown.sort();
    if let Some(name) = unknown.first() {
        return Err(unresolved(name, item, row, column));
    }

    Ok(board.teams.iter().filter(|t| item.is_completed_by(&t.name)).collect())
}

fn overlay(commands: &mut Vec<PaintCommand>, geometry: &BoardGeometry, row: usize, column: usize, team: &Team, placement: &Placement) {
    let cell = geometry.cell_rect(row, column);
    let thickness = geometry.params.padding;
    let corners = match placement {
        Placement::Full => {
            commands.push(PaintCommand::StrokeRect {
                rect: cell,
                width: thickness,
                rgba: team.color,
            });
            return;
        }
        Placement::Side(side) => side.corners().to_vec(),
        Placement::Corner(corner) => vec![*corner],
        Placement::Unknown(token) => {
            warn!("team '{}' has unknown placement '{}'; no overlay drawn", team.name, token);
            return;
        }
    };

    for corner in corners {
        for arm in BoardGeometry::bracket_arms(cell, corner, thickness) {
            commands.push(PaintCommand::SolidRect { rect: arm, rgba: team.color });
        }
    }
}

/// Render `board` onto the fixed-size canvas.
///
/// Fails without producing any canvas if a texture cannot be resolved or a
/// completion names an unresolved team.
pub fn render(board: &Board, textures: &dyn TextureSource) -> Result<RenderedBoard> {
    let geometry = BoardGeometry::new(board.grid_size, board.params);
    let (commands, bingo) = paint_board(board, textures)?;
    debug!("rasterizing {} paint commands", commands.len());

    let mut image = raster::rasterize(CANVAS_SIZE, CANVAS_SIZE, &commands);
    let mut offset = 0;
    if board.center_board {
        if let Some(off) = geometry.centering_offset(CANVAS_SIZE) {
            debug!("centering {}px board at offset {}", geometry.used_width(), off);
            image = raster::composite_centered(&image, geometry.used_width(), off, CANVAS_SIZE, board.palette.outer_background);
            offset = off;
        }
    }

    Ok(RenderedBoard { image, bingo, offset })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Corner, Side};
    use crate::grid::{self, GridParams};
    use crate::texture::MemoryTextureSource;
    use image::Rgba;

    const GREEN: Rgba<u8> = Rgba([0x64, 0xFF, 0x64, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    fn textures() -> MemoryTextureSource {
        MemoryTextureSource::new().with("stone.png", RgbaImage::from_pixel(16, 16, Rgba([10, 10, 10, 255])))
    }

    fn board3() -> Board {
        Board::new(3, grid::default_params(3).unwrap())
    }

    #[test]
    fn empty_board_draws_background_lines_and_border() {
        let board = board3();
        let out = render(&board, &textures()).unwrap();
        let p = board.params;
        assert_eq!((out.width(), out.height()), (CANVAS_SIZE, CANVAS_SIZE));
        assert!(out.bingo.is_none());
        assert_eq!(*out.image.get_pixel(0, 0), board.palette.border);
        let inside = p.border_width + 1;
        assert_eq!(*out.image.get_pixel(inside, inside), board.palette.background);
        let sep = p.border_width + p.cell_width;
        assert_eq!(*out.image.get_pixel(sep, 64), board.palette.line);
    }

    #[test]
    fn textures_land_inside_padding() {
        let board = board3().with_item(Item::new(0, 0, "stone.png"));
        let out = render(&board, &textures()).unwrap();
        let a = BoardGeometry::new(3, board.params).asset_rect(0, 0);
        assert_eq!(*out.image.get_pixel(a.x as u32, a.y as u32), Rgba([10, 10, 10, 255]));
        assert_eq!(*out.image.get_pixel(a.x as u32 - 1, a.y as u32), board.palette.background);
    }

    #[test]
    fn missing_texture_aborts_render() {
        let board = board3().with_item(Item::new(0, 0, "missing.png"));
        assert_eq!(
            render(&board, &textures()).unwrap_err(),
            Error::TextureNotFound("missing.png".into())
        );
    }

    #[test]
    fn out_of_range_items_are_skipped_before_loading() {
        let board = board3().with_item(Item::new(5, 0, "missing.png"));
        assert!(render(&board, &textures()).is_ok());
    }

    #[test]
    fn unknown_completion_team_fails() {
        let board = board3().with_item(Item::new(1, 1, "stone.png").completed_by("ghost"));
        assert_eq!(
            render(&board, &textures()).unwrap_err(),
            Error::UnresolvedTeam {
                team: "ghost".into(),
                sprite: "stone.png".into(),
                row: 1,
                column: 1
            }
        );
    }

    #[test]
    fn team_without_placement_fails() {
        let board = board3()
            .with_team(Team::new("red", None, GREEN))
            .with_item(Item::new(0, 2, "stone.png").completed_by("red"));
        assert!(matches!(render(&board, &textures()), Err(Error::UnresolvedTeam { .. })));
    }

    #[test]
    fn side_placement_draws_two_brackets() {
        let board = board3()
            .with_team(Team::new("red", Some(Placement::Side(Side::Top)), GREEN))
            .with_item(Item::new(0, 0, "stone.png").completed_by("red"));
        let (commands, _) = paint_board(&board, &textures()).unwrap();
        let arms = commands
            .iter()
            .filter(|c| matches!(c, PaintCommand::SolidRect { rgba, .. } if *rgba == GREEN))
            .count();
        assert_eq!(arms, 4);
        let out = render(&board, &textures()).unwrap();
        let cell = BoardGeometry::new(3, board.params).cell_rect(0, 0);
        assert_eq!(*out.image.get_pixel(cell.x as u32, cell.y as u32), GREEN);
        assert_ne!(*out.image.get_pixel(cell.x as u32, (cell.bottom() - 1) as u32), GREEN);
    }

    #[test]
    fn overlays_follow_team_declaration_order() {
        let board = board3()
            .with_team(Team::new("a", Some(Placement::Full), GREEN))
            .with_team(Team::new("b", Some(Placement::Corner(Corner::TopLeft)), BLUE))
            .with_item(Item::new(0, 0, "stone.png").completed_by("b").completed_by("a"));
        let out = render(&board, &textures()).unwrap();
        let cell = BoardGeometry::new(3, board.params).cell_rect(0, 0);
        // "b" is declared last, so its corner covers the full outline there
        assert_eq!(*out.image.get_pixel(cell.x as u32, cell.y as u32), BLUE);
        assert_eq!(*out.image.get_pixel((cell.right() - 1) as u32, (cell.bottom() - 1) as u32), GREEN);
    }

    #[test]
    fn zero_padding_skips_overlays_but_still_validates() {
        let params = GridParams {
            cell_width: 42,
            asset_width: 42,
            padding: 0,
            line_width: 1,
            border_width: 0,
        };
        let board = Board::new(3, params)
            .with_team(Team::new("a", Some(Placement::Full), GREEN))
            .with_item(Item::new(0, 0, "stone.png").completed_by("a"));
        let (commands, _) = paint_board(&board, &textures()).unwrap();
        assert!(!commands.iter().any(|c| matches!(c, PaintCommand::StrokeRect { rgba, .. } if *rgba == GREEN)));

        let board = Board::new(3, params)
            .with_team(Team::new("a", None, GREEN))
            .with_item(Item::new(0, 0, "stone.png").completed_by("a"));
        assert!(paint_board(&board, &textures()).is_err());
    }

    #[test]
    fn bingo_stroke_is_drawn_last() {
        let mut board = board3().with_team(Team::new("a", Some(Placement::Full), BLUE));
        for c in 0..3 {
            board = board.with_item(Item::new(1, c, "stone.png").completed_by("a"));
        }
        let (commands, bingo) = paint_board(&board, &textures()).unwrap();
        assert_eq!(bingo.as_ref().map(|b| b.team.as_str()), Some("a"));
        assert_eq!(commands.last().map(|c| c.name()), Some("capsule"));

        let out = render(&board, &textures()).unwrap();
        let mid = BoardGeometry::new(3, board.params).cell_rect(1, 1);
        let center = (mid.x as u32 + board.params.cell_width / 2, mid.y as u32 + board.params.cell_width / 2);
        assert_eq!(*out.image.get_pixel(center.0, center.1), BLUE);
    }

    #[test]
    fn single_cell_win_is_reported_without_a_stroke() {
        let board = Board::new(1, grid::default_params(1).unwrap())
            .with_team(Team::new("solo", Some(Placement::Full), BLUE))
            .with_item(Item::new(0, 0, "stone.png").completed_by("solo"));
        let (commands, bingo) = paint_board(&board, &textures()).unwrap();
        assert_eq!(bingo.map(|b| b.team), Some("solo".to_string()));
        assert!(!commands.iter().any(|c| c.name() == "capsule"));

        let out = render(&board, &textures()).unwrap();
        assert_eq!(out.winner(), Some("solo"));
        assert_eq!(*out.image.get_pixel(64, 64), Rgba([10, 10, 10, 255]));
    }

    #[test]
    fn narrow_board_is_centered_on_outer_background() {
        let params = GridParams {
            cell_width: 112,
            asset_width: 96,
            padding: 8,
            line_width: 0,
            border_width: 0,
        };
        let board = Board::new(1, params).with_item(Item::new(0, 0, "stone.png"));
        let out = render(&board, &textures()).unwrap();
        assert_eq!(out.offset, 8);
        // Texture starts at centering offset + padding
        assert_eq!(*out.image.get_pixel(16, 16), Rgba([10, 10, 10, 255]));
        assert_eq!(*out.image.get_pixel(15, 15), board.palette.background);

        let out = render(&board.clone().with_center_board(false), &textures()).unwrap();
        assert_eq!(out.offset, 0);
        assert_eq!(*out.image.get_pixel(8, 8), Rgba([10, 10, 10, 255]));
    }

    #[test]
    fn rendering_is_reproducible() {
        let board = board3()
            .with_team(Team::new("a", Some(Placement::Side(Side::Left)), GREEN))
            .with_item(Item::new(0, 0, "stone.png").completed_by("a"))
            .with_item(Item::new(2, 2, "stone.png"));
        let a = render(&board, &textures()).unwrap();
        let b = render(&board, &textures()).unwrap();
        assert_eq!(a.as_rgba(), b.as_rgba());
        assert_eq!(a.digest(), b.digest());
        assert_eq!(a.digest().len(), 64);
        assert_eq!(&a.to_png().unwrap()[0..8], b"\x89PNG\r\n\x1a\n");
    }
}
