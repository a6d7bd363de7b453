use crate::properties::Properties;
use crate::spatial::Gid;
use macroquad::prelude::*;

/// Geometry of a placed object. Only the bounding rectangle takes part in collision.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectShape {
    /// Plain rectangle, the default.
    Rectangle,
    /// A single point at `(x, y)`.
    Point,
    /// Closed outline, points relative to `(x, y)`.
    Polygon(Vec<Vec2>),
    /// Open outline, points relative to `(x, y)`.
    Polyline(Vec<Vec2>),
    /// Tile object referencing a GID.
    Tile {
        /// Raw GID of the placed tile.
        gid: Gid,
    },
}

/// A placed object inside an object layer or a tile's collision sub-layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    /// Tiled object id, 0 when absent.
    pub id: u32,
    /// Object name, empty when unnamed.
    pub name: String,
    /// `type` (or `class` in newer Tiled versions).
    pub declared_type: Option<String>,
    /// Left edge in pixels.
    pub x: f32,
    /// Top edge in pixels.
    pub y: f32,
    /// Width in pixels, 0 for points.
    pub width: f32,
    /// Height in pixels, 0 for points.
    pub height: f32,
    /// Editor visibility. Invisible objects still trigger.
    pub visible: bool,
    /// Geometry beyond the bounding box.
    pub shape: ObjectShape,
    /// Custom properties, fired by trigger scans.
    pub properties: Properties,
}

impl Object {
    /// Bounding rectangle in the owner's pixel space.
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// True if the object is called or typed `kind`.
    pub fn is(&self, kind: &str) -> bool {
        self.name == kind || self.declared_type.as_deref() == Some(kind)
    }
}

/// Payload of a layer.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerKind {
    /// Dense row-major grid of raw GIDs, `data.len() == width * height`.
    Tiles {
        /// Grid width in tiles.
        width: u32,
        /// Grid height in tiles.
        height: u32,
        /// GIDs as stored in the file.
        data: Vec<u32>,
    },
    /// Placed objects in file order.
    Objects {
        /// The layer's objects.
        objects: Vec<Object>,
    },
    /// Layer types the runtime does not handle (image layers, groups). Inert.
    Unsupported {
        /// The `type` string from the file.
        kind: String,
    },
}

/// One map layer. Position in `Map::layers` is its paint order.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Layer name, may be empty.
    pub name: String,
    /// Tiled `class`, if set.
    pub declared_type: Option<String>,
    /// Invisible tile layers are not drawn.
    pub visible: bool,
    /// Custom properties.
    pub properties: Properties,
    /// Tile grid, objects or an inert payload.
    pub kind: LayerKind,
}

impl Layer {
    /// Raw GID at a cell, `None` outside the grid or for non-tile layers.
    pub fn gid_at(&self, col: i32, row: i32) -> Option<Gid> {
        let LayerKind::Tiles { width, height, data } = &self.kind else {
            return None;
        };
        if col < 0 || row < 0 || col as u32 >= *width || row as u32 >= *height {
            return None;
        }
        data.get(row as usize * *width as usize + col as usize)
            .copied()
            .map(Gid)
    }

    /// Grid size in tiles for tile layers.
    pub fn grid_size(&self) -> Option<(u32, u32)> {
        match &self.kind {
            LayerKind::Tiles { width, height, .. } => Some((*width, *height)),
            _ => None,
        }
    }

    /// Objects of an object layer; empty for any other kind.
    pub fn objects(&self) -> &[Object] {
        match &self.kind {
            LayerKind::Objects { objects } => objects,
            _ => &[],
        }
    }

    /// True for tile layers.
    pub fn is_tile_layer(&self) -> bool {
        matches!(self.kind, LayerKind::Tiles { .. })
    }

    /// True for object layers.
    pub fn is_object_layer(&self) -> bool {
        matches!(self.kind, LayerKind::Objects { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile_layer() -> Layer {
        Layer {
            name: "ground".into(),
            declared_type: None,
            visible: true,
            properties: Properties::new(),
            kind: LayerKind::Tiles {
                width: 3,
                height: 2,
                data: vec![1, 2, 3, 4, 5, 0x8000_0006],
            },
        }
    }

    #[test]
    fn gid_at_is_row_major_and_bounds_checked() {
        let layer = tile_layer();
        assert_eq!(layer.gid_at(0, 0), Some(Gid(1)));
        assert_eq!(layer.gid_at(2, 0), Some(Gid(3)));
        assert_eq!(layer.gid_at(2, 1), Some(Gid(0x8000_0006)));
        assert_eq!(layer.gid_at(3, 0), None);
        assert_eq!(layer.gid_at(0, 2), None);
        assert_eq!(layer.gid_at(-1, 0), None);
        assert!(layer.objects().is_empty());
    }
}
