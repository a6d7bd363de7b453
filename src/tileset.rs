use crate::error::MapError;
use crate::layer::Object;
use crate::loader::json_loader::{decode_tileset_file, decode_tileset_str};
use crate::properties::Properties;
use macroquad::prelude::*;
use std::path::{Path, PathBuf};

/// Name or type of the embedded object that overrides a tile's hitbox.
pub const COLLISION_BOX: &str = "collision_box";

/// One step of a tile animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationFrame {
    /// Local id shown during this frame.
    pub tile_id: u32,
    /// Milliseconds the frame stays up. 0 is accepted at load and reported at playback.
    pub duration_ms: u32,
}

impl AnimationFrame {
    /// A frame showing `tile_id` for `duration_ms` milliseconds.
    pub fn new(tile_id: u32, duration_ms: u32) -> Self {
        Self {
            tile_id,
            duration_ms,
        }
    }
}

/// Catalog entry for one local tile id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tile {
    /// Index in the tileset.
    pub local_id: u32,
    /// Per-tile image for image-collection tilesets.
    pub image: Option<String>,
    /// Width of the per-tile image, 0 without one.
    pub image_width: u32,
    /// Height of the per-tile image, 0 without one.
    pub image_height: u32,
    /// Tiled `type`, or `class` in newer files.
    pub declared_type: Option<String>,
    /// Empty for static tiles.
    pub animation: Vec<AnimationFrame>,
    /// The tile's own object layer, usually 0 or 1 `collision_box`.
    pub objects: Vec<Object>,
    /// Custom properties; `solid` drives collision.
    pub properties: Properties,
}

impl Tile {
    /// An entry with no metadata, used for ids the descriptor does not mention.
    pub fn new(local_id: u32) -> Self {
        Self {
            local_id,
            ..Default::default()
        }
    }

    /// True if the tile has animation frames.
    #[inline]
    pub fn is_animated(&self) -> bool {
        !self.animation.is_empty()
    }

    /// Tiles block movement when they carry `solid = true`.
    pub fn is_solid(&self) -> bool {
        self.properties.get_bool("solid") == Some(true)
    }

    /// The embedded object named or typed `collision_box`, if any.
    pub fn collision_box(&self) -> Option<&Object> {
        self.objects.iter().find(|o| o.is(COLLISION_BOX))
    }
}

/// A tileset: atlas geometry plus a dense tile catalog indexed by local id.
///
/// Shared read-only by every map that uses it; the texture itself lives in
/// [`TileAtlas`](crate::TileAtlas) so the catalog can be loaded without a GL context.
#[derive(Debug, Clone, PartialEq)]
pub struct Tileset {
    /// Tileset name.
    pub name: String,
    /// Tile width in pixels.
    pub tile_width: u32,
    /// Tile height in pixels.
    pub tile_height: u32,
    /// Number of tiles in the atlas.
    pub tile_count: u32,
    /// Tiles per atlas row, never 0 after load.
    pub columns: u32,
    /// `ceil(tile_count / columns)`.
    pub rows: u32,
    /// Pixels between neighbouring tiles.
    pub spacing: u32,
    /// Pixels around the atlas border.
    pub margin: u32,
    /// Atlas image, resolved against the descriptor's directory.
    pub image: PathBuf,
    /// Atlas width in pixels.
    pub image_width: u32,
    /// Atlas height in pixels.
    pub image_height: u32,
    /// Tileset-level custom properties.
    pub properties: Properties,
    /// `tiles[i].local_id == i` for every `i < tile_count`.
    pub tiles: Vec<Tile>,
}

impl Tileset {
    /// Loads a `.tsj`/`.json` tileset descriptor.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapError> {
        decode_tileset_file(path.as_ref())
    }

    /// Parses a descriptor held in memory; `base_dir` resolves the atlas image.
    pub fn load_from_str(json: &str, base_dir: impl AsRef<Path>) -> Result<Self, MapError> {
        decode_tileset_str(json, base_dir.as_ref())
    }

    /// Catalog entry for a local id.
    #[inline]
    pub fn tile(&self, local_id: u32) -> Option<&Tile> {
        self.tiles.get(local_id as usize)
    }

    /// Pixel rectangle of a local id inside the atlas.
    pub fn source_rect(&self, local_id: u32) -> Rect {
        let columns = self.columns.max(1);
        let col = (local_id % columns) as f32;
        let row = (local_id / columns) as f32;
        let (tw, th) = (self.tile_width as f32, self.tile_height as f32);
        let margin = self.margin as f32;
        let spacing = self.spacing as f32;
        Rect::new(
            margin + col * (tw + spacing),
            margin + row * (th + spacing),
            tw,
            th,
        )
    }

    /// Size of one tile in pixels.
    #[inline]
    pub fn tile_size(&self) -> Vec2 {
        vec2(self.tile_width as f32, self.tile_height as f32)
    }
}
