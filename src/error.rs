//! Error types for board layout and rendering

use thiserror::Error;

/// Result type alias for board operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while solving, validating or rendering a board.
///
/// Every variant aborts the whole request: no partial canvas is ever
/// returned to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Grid size outside the supported `1..=9` range
    #[error("Invalid grid size {0} (expected 1..=9)")]
    InvalidGridSize(i64),

    /// One or more constraint values are inconsistent
    #[error("Invalid constraints: {}", .0.join("; "))]
    InvalidConstraints(Vec<String>),

    /// The constraint search space contains no valid layout
    #[error("No valid grid configuration found under given constraints (grid size {grid_size})")]
    NoValidConfiguration { grid_size: u32 },

    /// One or more color specs could not be parsed
    #[error("Invalid colors provided: {}", .0.join(", "))]
    InvalidColor(Vec<String>),

    /// A completion references a team that is unknown or lacks a placement
    #[error("Invalid team key entered ({team} in 'completed' section of '{sprite}' [row {row}, column {column}])")]
    UnresolvedTeam {
        team: String,
        sprite: String,
        row: usize,
        column: usize,
    },

    /// The texture collaborator could not resolve a sprite reference
    #[error("Invalid texture {0} provided")]
    TextureNotFound(String),

    /// The texture was found but its bytes are not a decodable image
    #[error("Failed to decode texture {sprite}: {reason}")]
    TextureDecode { sprite: String, reason: String },

    /// Malformed request document
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Failed to encode the rendered canvas
    #[error("Encoding failed: {0}")]
    Encode(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidRequest(err.to_string())
    }
}
