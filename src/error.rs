use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while loading maps, tilesets, textures and configuration.
///
/// Every variant is a content or resource error: the data shipped with the game is
/// broken and the caller is expected to abort. Per-frame queries never return these.
#[derive(Debug, Error)]
pub enum MapError {
    /// A descriptor file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// File that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A descriptor file is not valid JSON or misses a required field.
    #[error("failed to parse {}: {source}", .path.display())]
    Json {
        /// File that failed to parse.
        path: PathBuf,
        /// Underlying serde error, names the field and expected type.
        #[source]
        source: serde_json::Error,
    },
    /// Descriptor files must be Tiled JSON (`.json`, `.tmj`, `.tsj`).
    #[error("unsupported file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
    /// In-memory JSON failed to parse.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// The tileset parsed but its contents are inconsistent.
    #[error("invalid tileset '{tileset}': {reason}")]
    InvalidTileset {
        /// Tileset name.
        tileset: String,
        /// What is wrong with it.
        reason: String,
    },
    /// The map parsed but its contents are inconsistent.
    #[error("invalid map: {0}")]
    InvalidMap(String),
    /// A tile layer's data length does not match width * height.
    #[error("invalid layer size for layer '{layer}': {actual} tiles for a {width}x{height} grid")]
    InvalidLayerSize {
        /// Layer name.
        layer: String,
        /// Declared width in tiles.
        width: u32,
        /// Declared height in tiles.
        height: u32,
        /// Number of entries in `data`.
        actual: usize,
    },
    /// The tileset atlas image failed to load or decode.
    #[error("failed to load texture {}: {reason}", .path.display())]
    Texture {
        /// Image path.
        path: PathBuf,
        /// Backend message.
        reason: String,
    },
    /// A logical asset name is not present in the manifest.
    #[error("asset not found: {0}")]
    UnknownAsset(String),
    /// A spawn or warp cell lies outside the map it points into.
    #[error("{what} cell ({col}, {row}) is outside the {width}x{height} map")]
    CellOutOfBounds {
        /// What asked for the cell: `spawn` or the warp target.
        what: String,
        /// Requested column.
        col: u32,
        /// Requested row.
        row: u32,
        /// Map width in tiles.
        width: u32,
        /// Map height in tiles.
        height: u32,
    },
    /// A warp target string is not of the form `<mapFile>:<x>,<y>`.
    #[error("malformed warp target '{0}', expected <mapFile>:<x>,<y>")]
    InvalidWarp(String),
}
