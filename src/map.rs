use crate::error::MapError;
use crate::layer::{Layer, Object};
use crate::loader::json_loader::{decode_map_file, decode_map_str};
use crate::properties::Properties;
use crate::spatial::Gid;
use crate::tileset::{Tile, Tileset};
use log::debug;
use macroquad::prelude::*;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Index of a layer in paint order.
pub type LayerId = usize;

/// A loaded map: grid geometry, layers in paint order and the tileset it draws from.
///
/// Maps are never edited after load. A map transition builds a new `Map` and drops the old one.
#[derive(Debug, Clone)]
pub struct Map {
    /// Width in tiles.
    pub width: u32,
    /// Height in tiles.
    pub height: u32,
    /// Cell width in pixels.
    pub tile_width: u32,
    /// Cell height in pixels.
    pub tile_height: u32,
    /// Map-level custom properties.
    pub properties: Properties,
    /// Back-to-front; collision lookups walk it in reverse.
    pub layers: Vec<Layer>,
    pub(crate) tileset: Rc<Tileset>,
    pub(crate) source: Option<PathBuf>,
}

impl Map {
    /// Loads a `.tmj`/`.json` map and wires it to `tileset`.
    pub fn load(path: impl AsRef<Path>, tileset: Rc<Tileset>) -> Result<Self, MapError> {
        decode_map_file(path.as_ref(), tileset)
    }

    /// Parses a map held in memory.
    pub fn load_from_str(json: &str, tileset: Rc<Tileset>) -> Result<Self, MapError> {
        decode_map_str(json, tileset)
    }

    /// The tileset every GID of this map refers to.
    #[inline]
    pub fn tileset(&self) -> &Tileset {
        &self.tileset
    }

    /// Shared handle to the tileset, for building the next map on a transition.
    pub fn tileset_handle(&self) -> &Rc<Tileset> {
        &self.tileset
    }

    /// File the map was loaded from, `None` for in-memory maps.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Map size in pixels.
    pub fn pixel_size(&self) -> Vec2 {
        vec2(
            self.width as f32 * self.tile_width as f32,
            self.height as f32 * self.tile_height as f32,
        )
    }

    /// Top-left pixel of a cell, `None` when the cell is outside the map.
    pub fn cell_origin(&self, col: u32, row: u32) -> Option<Vec2> {
        if col >= self.width || row >= self.height {
            return None;
        }
        Some(vec2(
            col as f32 * self.tile_width as f32,
            row as f32 * self.tile_height as f32,
        ))
    }

    /// Size of one grid cell in pixels.
    #[inline]
    pub fn tile_size(&self) -> Vec2 {
        vec2(self.tile_width as f32, self.tile_height as f32)
    }

    /// Layer at a paint-order index.
    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        let layer = self.layers.get(id);
        if layer.is_none() {
            debug!("layer index {id} out of range ({} layers)", self.layers.len());
        }
        layer
    }

    /// First layer of any kind called `name`.
    pub fn layer_by_name(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// Objects of the first object layer called `name`.
    pub fn object_layer(&self, name: &str) -> Option<&[Object]> {
        self.layers
            .iter()
            .find(|l| l.is_object_layer() && l.name == name)
            .map(Layer::objects)
    }

    /// Raw GID at a cell of one layer.
    pub fn gid_at(&self, id: LayerId, col: i32, row: i32) -> Option<Gid> {
        let gid = self.layer(id)?.gid_at(col, row);
        if gid.is_none() {
            debug!("no tile at ({col}, {row}) in layer {id}");
        }
        gid
    }

    /// The non-empty GID on the topmost tile layer at a cell, with its layer index.
    pub fn topmost_gid(&self, col: i32, row: i32) -> Option<(LayerId, Gid)> {
        self.layers
            .iter()
            .enumerate()
            .rev()
            .find_map(|(id, layer)| match layer.gid_at(col, row) {
                Some(gid) if !gid.is_empty() => Some((id, gid)),
                _ => None,
            })
    }

    /// Catalog entry of the topmost tile at a cell.
    pub fn tile_at(&self, col: i32, row: i32) -> Option<&Tile> {
        let (_, gid) = self.topmost_gid(col, row)?;
        let local = gid.local_id()?;
        let tile = self.tileset.tile(local);
        if tile.is_none() {
            debug!("tile {local} at ({col}, {row}) missing from tileset '{}'", self.tileset.name);
        }
        tile
    }

    /// Pixel rectangle of a grid cell.
    pub fn cell_rect(&self, col: i32, row: i32) -> Rect {
        Rect::new(
            col as f32 * self.tile_width as f32,
            row as f32 * self.tile_height as f32,
            self.tile_width as f32,
            self.tile_height as f32,
        )
    }
}
