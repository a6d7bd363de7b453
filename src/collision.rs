//! Axis-separated AABB movement against solid tiles, plus object-layer triggers.

use crate::map::Map;
use crate::properties::Property;
use crate::spatial::{intersects, overlapped_cells};
use crate::tileset::Tile;
use log::debug;
use macroquad::prelude::*;

/// Direction a mover is looking at, used to pick its sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Facing {
    /// Towards negative x.
    Left,
    /// Towards positive x.
    Right,
    /// Towards negative y.
    Up,
    /// Towards positive y.
    #[default]
    Down,
}

impl Facing {
    /// Facing implied by a movement vector, vertical motion wins ties.
    pub fn from_delta(delta: Vec2) -> Option<Self> {
        if delta.y > 0.0 {
            Some(Facing::Down)
        } else if delta.y < 0.0 {
            Some(Facing::Up)
        } else if delta.x > 0.0 {
            Some(Facing::Right)
        } else if delta.x < 0.0 {
            Some(Facing::Left)
        } else {
            None
        }
    }
}

/// Something that moves over the map: a position plus a hitbox relative to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mover {
    /// World position of the mover's origin.
    pub position: Vec2,
    /// Hitbox offset and size relative to `position`.
    pub hitbox: Rect,
    /// Last direction the mover faced.
    pub facing: Facing,
}

impl Mover {
    /// A mover facing down.
    pub fn new(position: Vec2, hitbox: Rect) -> Self {
        Self {
            position,
            hitbox,
            facing: Facing::default(),
        }
    }

    /// Uses the tile's `collision_box` object as hitbox, or the whole tile without one.
    pub fn from_tile(tile: &Tile, tile_size: Vec2, position: Vec2) -> Self {
        let hitbox = tile
            .collision_box()
            .map(|o| o.rect())
            .unwrap_or_else(|| Rect::new(0.0, 0.0, tile_size.x, tile_size.y));
        Self::new(position, hitbox)
    }

    /// Hitbox in world pixels.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.position.x + self.hitbox.x,
            self.position.y + self.hitbox.y,
            self.hitbox.w,
            self.hitbox.h,
        )
    }

    /// Applies a resolved move: shifts the position and takes over a collision facing,
    /// otherwise faces the direction of travel.
    pub fn apply(&mut self, resolved: &ResolvedMove) {
        self.position += resolved.delta;
        if let Some(facing) = resolved.facing.or_else(|| Facing::from_delta(resolved.delta)) {
            self.facing = facing;
        }
    }
}

/// Outcome of [`resolve_move`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedMove {
    /// Requested delta with blocked axes zeroed.
    pub delta: Vec2,
    /// The X step hit a solid tile.
    pub blocked_x: bool,
    /// The Y step hit a solid tile.
    pub blocked_y: bool,
    /// Facing picked while sliding along a wall, if a collision set one.
    pub facing: Option<Facing>,
}

/// True if `rect` overlaps a cell whose topmost tile is solid.
///
/// Cells outside the map, empty cells and ids missing from the tileset never collide.
pub fn hits_solid(map: &Map, rect: &Rect) -> bool {
    let cells = overlapped_cells(rect, map.tile_width as f32, map.tile_height as f32);
    cells.iter().any(|(col, row)| {
        map.tile_at(col, row)
            .is_some_and(|tile| tile.is_solid() && intersects(&map.cell_rect(col, row), rect))
    })
}

fn shifted(rect: &Rect, dx: f32, dy: f32) -> Rect {
    Rect::new(rect.x + dx, rect.y + dy, rect.w, rect.h)
}

/// Resolves `delta` for a hitbox at `bounds`: X first, then Y from the post-X position.
///
/// A blocked axis is zeroed. Blocking on X faces the mover along its pending Y motion,
/// blocking on Y faces it along the resolved X motion.
pub fn resolve_move(map: &Map, bounds: Rect, delta: Vec2) -> ResolvedMove {
    let mut out = ResolvedMove {
        delta,
        blocked_x: false,
        blocked_y: false,
        facing: None,
    };

    if delta.x != 0.0 && hits_solid(map, &shifted(&bounds, delta.x, 0.0)) {
        out.delta.x = 0.0;
        out.blocked_x = true;
        if delta.y > 0.0 {
            out.facing = Some(Facing::Down);
        } else if delta.y < 0.0 {
            out.facing = Some(Facing::Up);
        }
    }

    let after_x = shifted(&bounds, out.delta.x, 0.0);
    if delta.y != 0.0 && hits_solid(map, &shifted(&after_x, 0.0, delta.y)) {
        out.delta.y = 0.0;
        out.blocked_y = true;
        if out.delta.x > 0.0 {
            out.facing = Some(Facing::Right);
        } else if out.delta.x < 0.0 {
            out.facing = Some(Facing::Left);
        }
    }

    out
}

/// Receives the properties of trigger objects the mover overlaps.
pub trait TriggerHandler {
    /// Called once per property of each overlapping object.
    fn on_trigger(&mut self, property: &Property);
}

impl<F: FnMut(&Property)> TriggerHandler for F {
    fn on_trigger(&mut self, property: &Property) {
        self(property)
    }
}

/// Fires `handler` once per property of every object in the object layer `layer`
/// that intersects `bounds`. Returns the number of calls made.
pub fn scan_triggers(
    map: &Map,
    layer: &str,
    bounds: &Rect,
    handler: &mut impl TriggerHandler,
) -> usize {
    let Some(objects) = map.object_layer(layer) else {
        debug!("no object layer named '{layer}'");
        return 0;
    };

    let mut fired = 0;
    for object in objects.iter().filter(|o| intersects(&o.rect(), bounds)) {
        for property in &object.properties {
            handler.on_trigger(property);
            fired += 1;
        }
    }
    fired
}

/// One movement tick: resolves and applies `delta`, then scans `trigger_layer` with the
/// mover's new bounds.
pub fn move_and_trigger(
    map: &Map,
    mover: &mut Mover,
    delta: Vec2,
    trigger_layer: &str,
    handler: &mut impl TriggerHandler,
) -> ResolvedMove {
    let resolved = resolve_move(map, mover.bounds(), delta);
    mover.apply(&resolved);
    scan_triggers(map, trigger_layer, &mover.bounds(), handler);
    resolved
}
