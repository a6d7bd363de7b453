#![warn(missing_docs)]

//! Tiled JSON map runtime for Macroquad.
//!
//! Loads `.tsj` tilesets and `.tmj` maps, draws the tile layers a camera can see with
//! per-tile animation and flip flags, and moves AABB hitboxes against `solid` tiles while
//! firing object-layer triggers such as warps.

mod animation;
mod camera;
mod collision;
mod command;
mod config;
mod error;
mod layer;
mod loader {
    pub mod json_loader;
}
mod map;
mod properties;
pub mod render;
mod session;
pub mod spatial;
mod tileset;

pub use animation::Animator;
pub use camera::Camera;
pub use collision::{
    hits_solid, move_and_trigger, resolve_move, scan_triggers, Facing, Mover, ResolvedMove,
    TriggerHandler,
};
pub use command::DrawCommand;
pub use config::{AssetManifest, AssetResolver, AssetRoot, EngineConfig, FacingSprites};
pub use error::MapError;
pub use layer::{Layer, LayerKind, Object, ObjectShape};
pub use map::{LayerId, Map};
pub use properties::{Properties, Property, PropertyValue};
pub use render::backend::{MacroquadTarget, TileAtlas};
pub use render::cull::{visible_window, ViewWindow};
pub use render::{RenderTarget, TileRenderer};
pub use session::{Session, TickOutcome, WarpTarget, WARP_TARGET_PROPERTY};
pub use spatial::{Gid, TileFlags};
pub use tileset::{AnimationFrame, Tile, Tileset, COLLISION_BOX};
