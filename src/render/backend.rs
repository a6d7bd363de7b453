//! Macroquad backend: atlas texture binding and the drawing target.

use super::RenderTarget;
use crate::command::DrawCommand;
use crate::error::MapError;
use crate::tileset::Tileset;
use log::info;
use macroquad::prelude::*;

/// The tileset image uploaded as a texture. Owned by the session and outlives maps.
pub struct TileAtlas {
    texture: Texture2D,
}

impl TileAtlas {
    /// Loads and decodes `tileset.image`. A failure here means the game cannot draw.
    pub async fn load(tileset: &Tileset) -> Result<Self, MapError> {
        let path = &tileset.image;
        let path_str = path.to_str().ok_or_else(|| MapError::Texture {
            path: path.clone(),
            reason: "path is not valid UTF-8".into(),
        })?;
        let texture = load_texture(path_str)
            .await
            .map_err(|err| MapError::Texture {
                path: path.clone(),
                reason: format!("{err:?}"),
            })?;
        texture.set_filter(FilterMode::Nearest);
        info!("Loaded tileset texture {}", path.display());
        Ok(Self { texture })
    }

    /// Wraps an already uploaded texture.
    pub fn from_texture(texture: Texture2D) -> Self {
        texture.set_filter(FilterMode::Nearest);
        Self { texture }
    }

    /// The uploaded texture.
    pub fn texture(&self) -> &Texture2D {
        &self.texture
    }
}

/// Draws commands from one atlas onto the active macroquad render target.
pub struct MacroquadTarget<'a> {
    atlas: &'a TileAtlas,
    /// Screen position of the camera's top-left corner.
    pub origin: Vec2,
    /// Colour multiplied into every blit.
    pub tint: Color,
}

impl<'a> MacroquadTarget<'a> {
    /// Target drawing from `atlas` at the screen origin, untinted.
    pub fn new(atlas: &'a TileAtlas) -> Self {
        Self {
            atlas,
            origin: Vec2::ZERO,
            tint: WHITE,
        }
    }
}

impl RenderTarget for MacroquadTarget<'_> {
    fn blit(&mut self, command: &DrawCommand) {
        draw_texture_ex(
            &self.atlas.texture,
            self.origin.x + command.dest.x,
            self.origin.y + command.dest.y,
            self.tint,
            DrawTextureParams {
                dest_size: Some(vec2(command.dest.w, command.dest.h)),
                source: Some(command.src),
                flip_x: command.flip_x,
                flip_y: command.flip_y,
                ..Default::default()
            },
        );
    }
}
