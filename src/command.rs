use crate::map::LayerId;
use macroquad::prelude::Rect;

/// One blit from the tileset atlas.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    /// Source layer, `None` for sprites drawn outside the map.
    pub layer: Option<LayerId>,
    /// Local id actually drawn, after animation.
    pub local_id: u32,
    /// Pixel rectangle inside the atlas.
    pub src: Rect,
    /// Destination in camera space.
    pub dest: Rect,
    /// Mirror horizontally.
    pub flip_x: bool,
    /// Mirror vertically.
    pub flip_y: bool,
}
