//! Bingoboard
//!
//! Renders a fixed-size square bingo board image from a declarative
//! description: a grid size, placed tiles referencing textures, per-team
//! completion marks and optional team/color/layout metadata.
//!
//! # Pipeline
//!
//! - **Grid layout** ([`grid`]): a scored exhaustive search turning a grid
//!   size and [`Constraints`] into exact pixel measurements ([`GridParams`]).
//! - **Rendering** ([`rendering`]): background, separators, border, textures
//!   and per-team completion overlays, composed in a fixed order.
//! - **Bingo detection** ([`bingo`]): finds the first team to complete a row,
//!   column or diagonal; the renderer strokes that line.
//!
//! # Example
//!
//! ```no_run
//! use bingoboard::{generate, DirTextureSource};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let request = r##"{
//!     "settings": {
//!         "grid_size": 3,
//!         "teams": [{ "name": "red", "placement": "full", "color": "#FF6464" }]
//!     },
//!     "items": [{ "row": 0, "column": 0, "sprite": "apple.png", "completed": { "red": true } }]
//! }"##;
//!
//! let textures = DirTextureSource::new("textures");
//! let board = generate(request, &textures)?;
//! std::fs::write("board.png", board.to_png()?)?;
//! println!("winner: {:?}", board.winner());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod bingo;
pub mod board;
pub mod color;
pub mod grid;
pub mod rendering;
pub mod request;
pub mod texture;

pub use bingo::{detect, BingoResult, Line};
pub use board::{Board, Corner, Item, Placement, Side, Team};
pub use color::{parse_color, Palette};
pub use grid::{solve, Constraints, GridParams};
pub use rendering::{render, RenderedBoard};
pub use request::BoardRequest;
pub use texture::{DirTextureSource, MemoryTextureSource, TextureSource};

/// Side length of the square output canvas, in pixels
pub const CANVAS_SIZE: u32 = 128;

/// Native texture size; pixel-perfect layouts scale by whole factors of it
pub const BASE_ASSET_WIDTH: u32 = 32;

/// Decode a JSON request, resolve it and render it.
pub fn generate(request_json: &str, textures: &dyn TextureSource) -> Result<RenderedBoard> {
    let request = BoardRequest::from_json(request_json)?;
    let board = request.into_board()?;
    render(&board, textures)
}
