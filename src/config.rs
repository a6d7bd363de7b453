//! Runtime configuration and logical asset name resolution.

use crate::collision::Facing;
use crate::error::MapError;
use log::debug;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Local tile ids of the player sprite for each facing, all in the map tileset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FacingSprites {
    /// Sprite when facing left.
    pub left: u32,
    /// Sprite when facing right.
    pub right: u32,
    /// Sprite when facing up.
    pub up: u32,
    /// Sprite when facing down.
    pub down: u32,
}

impl FacingSprites {
    /// Local id of the sprite for `facing`.
    pub fn for_facing(&self, facing: Facing) -> u32 {
        match facing {
            Facing::Left => self.left,
            Facing::Right => self.right,
            Facing::Up => self.up,
            Facing::Down => self.down,
        }
    }
}

/// Session settings, usually read from a JSON file. Every field has a default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory logical asset names are resolved against when no manifest is given.
    pub asset_root: PathBuf,
    /// Optional `assets.json` manifest mapping names to directories.
    pub manifest: Option<PathBuf>,
    /// Logical name of the map tileset.
    pub tileset: String,
    /// Logical name of the first map.
    pub start_map: String,
    /// Player start cell, in tiles.
    pub spawn: [u32; 2],
    /// Object layer scanned for warp triggers.
    pub warp_layer: String,
    /// Step tile animations; when false animated tiles show their base id.
    pub animate_tiles: bool,
    /// Camera width in pixels.
    pub view_width: f32,
    /// Camera height in pixels.
    pub view_height: f32,
    /// Player sprite ids; without them the player is not drawn.
    pub player_sprites: Option<FacingSprites>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("assets"),
            manifest: None,
            tileset: "tiles.tsj".into(),
            start_map: "home.tmj".into(),
            spawn: [1, 1],
            warp_layer: "warp".into(),
            animate_tiles: true,
            view_width: 1280.0,
            view_height: 720.0,
            player_sprites: None,
        }
    }
}

impl EngineConfig {
    /// Reads a JSON config file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let path = path.as_ref();
        let txt = std::fs::read_to_string(path).map_err(|source| MapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&txt).map_err(|source| MapError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolver for this config: the manifest if one is set, the asset root otherwise.
    pub fn resolver(&self) -> Result<Box<dyn AssetResolver>, MapError> {
        match &self.manifest {
            Some(manifest) => Ok(Box::new(AssetManifest::load(self.asset_root.join(manifest))?)),
            None => Ok(Box::new(AssetRoot::new(&self.asset_root))),
        }
    }
}

/// Maps logical asset names (`"home.tmj"`) to files.
pub trait AssetResolver {
    /// File path for `name`, or [`MapError::UnknownAsset`].
    fn resolve(&self, name: &str) -> Result<PathBuf, MapError>;
}

/// Resolves every name as a path under one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRoot {
    root: PathBuf,
}

impl AssetRoot {
    /// Resolver rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetResolver for AssetRoot {
    fn resolve(&self, name: &str) -> Result<PathBuf, MapError> {
        Ok(self.root.join(name))
    }
}

#[derive(Deserialize)]
struct JsonManifest {
    assets: Vec<JsonAsset>,
}

#[derive(Deserialize)]
struct JsonAsset {
    name: String,
    path: String,
}

/// An `assets.json` manifest: `{"assets":[{"name":"home.tmj","path":"maps"}]}`.
///
/// Directories are relative to the manifest. Every listed file must exist at load time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetManifest {
    files: HashMap<String, PathBuf>,
}

impl AssetManifest {
    /// Reads an `assets.json` manifest; entries resolve relative to its directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let path = path.as_ref();
        let txt = std::fs::read_to_string(path).map_err(|source| MapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Self::load_from_str(&txt, base)
    }

    /// Parses a manifest held in memory, resolving entries against `base_dir`.
    pub fn load_from_str(json: &str, base_dir: &Path) -> Result<Self, MapError> {
        let manifest: JsonManifest = serde_json::from_str(json)?;
        let mut files = HashMap::with_capacity(manifest.assets.len());
        for asset in manifest.assets {
            let file = base_dir.join(&asset.path).join(&asset.name);
            std::fs::metadata(&file).map_err(|source| MapError::Io {
                path: file.clone(),
                source,
            })?;
            debug!("Asset: {} {}", asset.name, file.display());
            files.insert(asset.name, file);
        }
        Ok(Self { files })
    }

    /// Number of listed assets.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// True when the manifest lists nothing.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl AssetResolver for AssetManifest {
    fn resolve(&self, name: &str) -> Result<PathBuf, MapError> {
        debug!("Looking for asset: {name} in total of {} assets", self.files.len());
        self.files
            .get(name)
            .cloned()
            .ok_or_else(|| MapError::UnknownAsset(name.to_owned()))
    }
}
