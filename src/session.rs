//! The game-side world: owns the shared tileset, the current map, the camera and the player.

use crate::camera::Camera;
use crate::collision::{move_and_trigger, Mover, ResolvedMove};
use crate::config::{AssetResolver, EngineConfig};
use crate::error::MapError;
use crate::map::Map;
use crate::properties::Property;
use crate::render::{RenderTarget, TileRenderer};
use crate::spatial::TileFlags;
use crate::tileset::Tileset;
use log::info;
use macroquad::prelude::*;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

/// Property a warp object carries its destination in.
pub const WARP_TARGET_PROPERTY: &str = "target";

/// Destination of a warp trigger, written as `<mapFile>:<x>,<y>` with x and y in tiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarpTarget {
    /// Logical asset name of the destination map.
    pub map: String,
    /// Destination column.
    pub x: u32,
    /// Destination row.
    pub y: u32,
}

impl FromStr for WarpTarget {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MapError::InvalidWarp(s.to_owned());
        let (map, coords) = s.rsplit_once(':').ok_or_else(invalid)?;
        let (x, y) = coords.split_once(',').ok_or_else(invalid)?;
        if map.is_empty() {
            return Err(invalid());
        }
        Ok(Self {
            map: map.to_owned(),
            x: x.trim().parse().map_err(|_| invalid())?,
            y: y.trim().parse().map_err(|_| invalid())?,
        })
    }
}

impl fmt::Display for WarpTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{},{}", self.map, self.x, self.y)
    }
}

/// What happened during one [`Session::tick`].
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    /// Movement as resolved against the map the tick started on.
    pub resolved: ResolvedMove,
    /// Set when the player stepped on a warp and the map was replaced.
    pub warped: Option<WarpTarget>,
}

/// A running game world: the shared tileset, the current map, the camera and the player.
///
/// Everything a tick reads or writes is owned here.
pub struct Session {
    config: EngineConfig,
    assets: Box<dyn AssetResolver>,
    tileset: Rc<Tileset>,
    map: Map,
    renderer: TileRenderer,
    /// View that follows the player.
    pub camera: Camera,
    /// The player's position and hitbox.
    pub player: Mover,
}

impl Session {
    /// Loads the tileset and start map named by `config`, resolving names with the
    /// config's own resolver.
    pub fn start(config: EngineConfig) -> Result<Self, MapError> {
        let assets = config.resolver()?;
        Self::with_resolver(config, assets)
    }

    /// Like [`Session::start`] with an explicit asset resolver.
    pub fn with_resolver(
        config: EngineConfig,
        assets: Box<dyn AssetResolver>,
    ) -> Result<Self, MapError> {
        let tileset = Rc::new(Tileset::load(assets.resolve(&config.tileset)?)?);
        let map = Map::load(assets.resolve(&config.start_map)?, Rc::clone(&tileset))?;

        let [col, row] = config.spawn;
        let spawn = map
            .cell_origin(col, row)
            .ok_or_else(|| MapError::CellOutOfBounds {
                what: "spawn".into(),
                col,
                row,
                width: map.width,
                height: map.height,
            })?;
        let player = match config.player_sprites.and_then(|s| tileset.tile(s.down)) {
            Some(tile) => Mover::from_tile(tile, tileset.tile_size(), spawn),
            None => Mover::new(spawn, Rect::new(0.0, 0.0, map.tile_size().x, map.tile_size().y)),
        };

        let mut session = Self {
            renderer: TileRenderer::new(config.animate_tiles),
            camera: Camera::new(config.view_width, config.view_height),
            config,
            assets,
            tileset,
            map,
            player,
        };
        session.follow_player();
        Ok(session)
    }

    /// The current map.
    #[inline]
    pub fn map(&self) -> &Map {
        &self.map
    }

    /// The tileset shared by every map of the session.
    pub fn tileset(&self) -> &Rc<Tileset> {
        &self.tileset
    }

    /// Settings the session was started with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Moves the player by `delta`, follows a warp it lands on and re-centres the camera.
    ///
    /// Only errors when a warp points at a map that cannot be loaded or is malformed.
    pub fn tick(&mut self, delta: Vec2) -> Result<TickOutcome, MapError> {
        let mut warps: Vec<Property> = Vec::new();
        let resolved = move_and_trigger(
            &self.map,
            &mut self.player,
            delta,
            &self.config.warp_layer,
            &mut |property: &Property| {
                if property.name == WARP_TARGET_PROPERTY {
                    warps.push(property.clone());
                }
            },
        );

        let mut warped = None;
        if let Some(property) = warps.first() {
            let target: WarpTarget = property
                .as_str()
                .ok_or_else(|| MapError::InvalidWarp(format!("{:?}", property.value)))?
                .parse()?;
            self.warp(&target)?;
            warped = Some(target);
        } else {
            self.follow_player();
        }

        Ok(TickOutcome { resolved, warped })
    }

    /// Replaces the current map with `target.map` and puts the player on the target cell.
    ///
    /// The new map is fully built and the target cell checked against it before the old
    /// map is dropped; on error the session keeps the old map and player position.
    pub fn warp(&mut self, target: &WarpTarget) -> Result<(), MapError> {
        let path = self.assets.resolve(&target.map)?;
        let next = Map::load(&path, Rc::clone(&self.tileset))?;
        let position = next
            .cell_origin(target.x, target.y)
            .ok_or_else(|| MapError::CellOutOfBounds {
                what: target.to_string(),
                col: target.x,
                row: target.y,
                width: next.width,
                height: next.height,
            })?;

        self.map = next;
        self.player.position = position;
        self.follow_player();
        info!("Warped to {target}");
        Ok(())
    }

    /// Draws the map, then the player sprite when one is configured.
    pub fn draw(&mut self, now_ms: u64, target: &mut impl RenderTarget) {
        self.renderer.draw(&self.map, &self.camera, now_ms, target);

        if let Some(sprites) = self.config.player_sprites {
            let local = sprites.for_facing(self.player.facing);
            let dest = self.camera.to_view(self.player.position);
            self.renderer
                .draw_tile(&self.tileset, local, TileFlags::NONE, dest, None, now_ms, target);
        }
    }

    fn follow_player(&mut self) {
        self.camera
            .follow(self.player.bounds().center(), self.map.pixel_size());
    }
}
