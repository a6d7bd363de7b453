//! Camera-culled tile rendering.

pub mod cull;
pub mod backend;

use crate::animation::Animator;
use crate::camera::Camera;
use crate::command::DrawCommand;
use crate::map::{LayerId, Map};
use crate::spatial::{Gid, TileFlags};
use crate::tileset::Tileset;
use macroquad::prelude::*;
use cull::visible_window;
use log::debug;
use std::collections::HashMap;

/// Receives blits. The macroquad backend draws them; a `Vec<DrawCommand>` records them.
pub trait RenderTarget {
    /// Draws or records one command.
    fn blit(&mut self, command: &DrawCommand);
}

impl RenderTarget for Vec<DrawCommand> {
    fn blit(&mut self, command: &DrawCommand) {
        self.push(command.clone());
    }
}

/// Draws the tile layers of a map and keeps per-tile animation state.
///
/// Animation state is keyed by local tile id, so every cell showing the same animated
/// tile plays in lockstep.
#[derive(Debug, Default)]
pub struct TileRenderer {
    animators: HashMap<u32, Animator>,
    /// When false, animated tiles are drawn on their base id.
    pub animate: bool,
}

impl TileRenderer {
    /// A renderer with no animation progress yet.
    pub fn new(animate: bool) -> Self {
        Self {
            animators: HashMap::new(),
            animate,
        }
    }

    /// Draws every visible tile layer back to front. Object layers are not drawn.
    pub fn draw(
        &mut self,
        map: &Map,
        camera: &Camera,
        now_ms: u64,
        target: &mut impl RenderTarget,
    ) {
        for (layer_id, layer) in map.layers.iter().enumerate() {
            if !layer.visible {
                continue;
            }
            if layer.is_tile_layer() {
                self.draw_layer(map, layer_id, camera, now_ms, target);
            }
        }
    }

    fn draw_layer(
        &mut self,
        map: &Map,
        layer_id: LayerId,
        camera: &Camera,
        now_ms: u64,
        target: &mut impl RenderTarget,
    ) {
        let layer = &map.layers[layer_id];
        let Some((width, height)) = layer.grid_size() else {
            return;
        };
        let tw = map.tile_width as f32;
        let th = map.tile_height as f32;
        let window = visible_window(camera, tw, th, width, height);

        for (col, row) in window.cells() {
            let Some(gid) = layer.gid_at(col as i32, row as i32) else {
                continue;
            };
            let Some((local, flags)) = gid.decode() else {
                continue;
            };
            let dest = vec2(
                (col - window.start_col) as f32 * tw + window.offset_x,
                (row - window.start_row) as f32 * th + window.offset_y,
            );
            self.draw_tile(map.tileset(), local, flags, dest, Some(layer_id), now_ms, target);
        }
    }

    /// Draws a raw GID at a camera-space position. Empty GIDs draw nothing.
    pub fn draw_gid(
        &mut self,
        tileset: &Tileset,
        gid: Gid,
        dest: Vec2,
        now_ms: u64,
        target: &mut impl RenderTarget,
    ) -> bool {
        match gid.decode() {
            Some((local, flags)) => {
                self.draw_tile(tileset, local, flags, dest, None, now_ms, target)
            }
            None => false,
        }
    }

    /// Draws one tile by local id, resolving its animation. Returns false when the id is
    /// not in the tileset and nothing was drawn.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_tile(
        &mut self,
        tileset: &Tileset,
        local_id: u32,
        flags: TileFlags,
        dest: Vec2,
        layer: Option<LayerId>,
        now_ms: u64,
        target: &mut impl RenderTarget,
    ) -> bool {
        let Some(tile) = tileset.tile(local_id) else {
            debug!("tile {local_id} not in tileset '{}', skipping draw", tileset.name);
            return false;
        };

        let mut shown = local_id;
        if self.animate && tile.is_animated() {
            shown = self
                .animators
                .entry(local_id)
                .or_insert_with(|| Animator::new(now_ms))
                .frame(&tile.animation, now_ms);
        }

        // Diagonal flips are approximated as a flip on both axes
        let command = DrawCommand {
            layer,
            local_id: shown,
            src: tileset.source_rect(shown),
            dest: Rect::new(
                dest.x,
                dest.y,
                tileset.tile_width as f32,
                tileset.tile_height as f32,
            ),
            flip_x: flags.flip_h() || flags.flip_d(),
            flip_y: flags.flip_v() || flags.flip_d(),
        };
        target.blit(&command);
        true
    }

    /// Forgets animation progress.
    pub fn reset(&mut self) {
        self.animators.clear();
    }
}
