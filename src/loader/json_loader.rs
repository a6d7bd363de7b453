// src/loader/json_loader.rs
use crate::error::MapError;
use crate::layer::{Layer, LayerKind, Object, ObjectShape};
use crate::map::Map;
use crate::properties::{Properties, Property, PropertyValue};
use crate::spatial::Gid;
use crate::tileset::{AnimationFrame, Tile, Tileset};
use log::{debug, info, warn};
use macroquad::prelude::*;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};
use std::rc::Rc;

#[derive(Deserialize)]
struct JsonLayer {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    class: Option<String>,
    #[serde(default = "default_true")]
    visible: bool,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
    #[serde(default)]
    data: Option<Vec<u32>>,
    #[serde(default)]
    objects: Vec<JsonObject>,
    #[serde(default)]
    properties: Vec<JsonProperty>,
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize)]
struct JsonTilesetRef {
    firstgid: u32,
    #[serde(default)]
    source: String,
}

#[derive(Deserialize)]
struct JsonMap {
    width: u32,
    height: u32,
    tilewidth: u32,
    tileheight: u32,
    layers: Vec<JsonLayer>,
    #[serde(default)]
    tilesets: Vec<JsonTilesetRef>,
    #[serde(default)]
    properties: Vec<JsonProperty>,
}

#[derive(Deserialize)]
struct JsonTileset {
    name: String,
    tilewidth: u32,
    tileheight: u32,
    tilecount: u32,
    columns: u32,
    image: String,
    imagewidth: u32,
    imageheight: u32,
    spacing: u32,
    margin: u32,
    #[serde(default)]
    properties: Vec<JsonProperty>,
    #[serde(default)]
    tiles: Vec<JsonTile>,
}

#[derive(Deserialize)]
struct JsonProperty {
    name: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    propertytype: Option<String>,
    #[serde(default)]
    value: JsonValue,
}

#[derive(Deserialize)]
struct JsonObject {
    #[serde(default)]
    id: u32,
    #[serde(default)]
    name: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    class: Option<String>,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    #[serde(default = "default_true")]
    visible: bool,
    #[serde(default)]
    point: bool,
    #[serde(default)]
    polygon: Vec<JsonObjectPoint>,
    #[serde(default)]
    polyline: Vec<JsonObjectPoint>,
    #[serde(default)]
    gid: Option<u32>,
    #[serde(default)]
    properties: Vec<JsonProperty>,
}

#[derive(Deserialize)]
struct JsonObjectPoint {
    x: f32,
    y: f32,
}

#[derive(Deserialize, Default)]
struct JsonObjectGroup {
    #[serde(default)]
    objects: Vec<JsonObject>,
}

#[derive(Deserialize)]
struct JsonFrame {
    tileid: u32,
    duration: u32,
}

#[derive(Deserialize)]
struct JsonTile {
    id: u32,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    imagewidth: Option<u32>,
    #[serde(default)]
    imageheight: Option<u32>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    class: Option<String>,
    #[serde(default)]
    properties: Vec<JsonProperty>,
    #[serde(default)]
    animation: Vec<JsonFrame>,
    #[serde(default)]
    objectgroup: Option<JsonObjectGroup>,
}

/// Strings, numbers and bools are kept; anything else is dropped with a warning.
fn json_property_to_model(prop: JsonProperty) -> Option<Property> {
    let JsonProperty {
        name,
        kind,
        propertytype,
        value,
    } = prop;

    let value = match value {
        JsonValue::String(s) => Some(PropertyValue::String(s)),
        JsonValue::Number(n) => n.as_f64().map(PropertyValue::Number),
        JsonValue::Bool(b) => Some(PropertyValue::Bool(b)),
        _ => None,
    };
    let Some(value) = value else {
        warn!("Property '{name}' has an unsupported value type, skipping");
        return None;
    };

    Some(Property {
        name,
        declared_type: kind,
        property_type: propertytype,
        value,
    })
}

fn properties_from_json(props: Vec<JsonProperty>) -> Properties {
    props.into_iter().filter_map(json_property_to_model).collect()
}

fn object_to_model(obj: JsonObject) -> Object {
    let shape = if let Some(gid) = obj.gid {
        ObjectShape::Tile { gid: Gid(gid) }
    } else if obj.point {
        ObjectShape::Point
    } else if !obj.polygon.is_empty() {
        ObjectShape::Polygon(obj.polygon.into_iter().map(|p| vec2(p.x, p.y)).collect())
    } else if !obj.polyline.is_empty() {
        ObjectShape::Polyline(obj.polyline.into_iter().map(|p| vec2(p.x, p.y)).collect())
    } else {
        ObjectShape::Rectangle
    };

    Object {
        id: obj.id,
        name: obj.name,
        declared_type: non_empty(obj.kind).or_else(|| non_empty(obj.class)),
        x: obj.x,
        y: obj.y,
        width: obj.width,
        height: obj.height,
        visible: obj.visible,
        shape,
        properties: properties_from_json(obj.properties),
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.is_empty())
}

fn ensure_json(path: &Path) -> Result<(), MapError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json" | "tmj" | "tsj") => Ok(()),
        _ => Err(MapError::UnsupportedFormat(path.to_path_buf())),
    }
}

fn read_descriptor(path: &Path) -> Result<String, MapError> {
    ensure_json(path)?;
    std::fs::read_to_string(path).map_err(|source| MapError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_file<T: for<'de> Deserialize<'de>>(path: &Path, txt: &str) -> Result<T, MapError> {
    serde_json::from_str(txt).map_err(|source| MapError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn descriptor_dir(path: &Path) -> PathBuf {
    path.parent()
        .map(|d| d.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./"))
}

/// Reads and decodes a tileset file; the atlas path resolves next to it.
pub fn decode_tileset_file(path: &Path) -> Result<Tileset, MapError> {
    let txt = read_descriptor(path)?;
    let j: JsonTileset = parse_file(path, &txt)?;
    let tileset = tileset_from_json(j, &descriptor_dir(path))?;
    info!(
        "Loaded tileset '{}' from {}: {}x{} px tiles, {} tiles, {} bytes",
        tileset.name,
        path.display(),
        tileset.tile_width,
        tileset.tile_height,
        tileset.tile_count,
        txt.len()
    );
    Ok(tileset)
}

/// Decodes a tileset held in memory.
pub fn decode_tileset_str(json: &str, base_dir: &Path) -> Result<Tileset, MapError> {
    let j: JsonTileset = serde_json::from_str(json)?;
    tileset_from_json(j, base_dir)
}

fn tileset_from_json(j: JsonTileset, base_dir: &Path) -> Result<Tileset, MapError> {
    let invalid = |reason: String| MapError::InvalidTileset {
        tileset: j.name.clone(),
        reason,
    };

    if j.columns == 0 {
        return Err(invalid("columns must be non-zero".into()));
    }
    if j.tilewidth == 0 || j.tileheight == 0 {
        return Err(invalid("tile size must be non-zero".into()));
    }

    // Dense catalog; ids the descriptor skips stay empty
    let mut tiles: Vec<Tile> = (0..j.tilecount).map(Tile::new).collect();

    for t in &j.tiles {
        if t.id >= j.tilecount {
            return Err(invalid(format!(
                "tile id {} out of range for {} tiles",
                t.id, j.tilecount
            )));
        }
        if let Some(frame) = t.animation.iter().find(|f| f.tileid >= j.tilecount) {
            return Err(invalid(format!(
                "tile {} animates to tile id {} out of range for {} tiles",
                t.id, frame.tileid, j.tilecount
            )));
        }
    }

    for t in j.tiles {
        debug!("Loading tile id: {}", t.id);
        let id = t.id;
        tiles[id as usize] = Tile {
            local_id: id,
            image: t.image,
            image_width: t.imagewidth.unwrap_or_default(),
            image_height: t.imageheight.unwrap_or_default(),
            declared_type: non_empty(t.kind).or_else(|| non_empty(t.class)),
            animation: t
                .animation
                .into_iter()
                .map(|f| AnimationFrame::new(f.tileid, f.duration))
                .collect(),
            objects: t
                .objectgroup
                .unwrap_or_default()
                .objects
                .into_iter()
                .map(object_to_model)
                .collect(),
            properties: properties_from_json(t.properties),
        };
    }

    Ok(Tileset {
        rows: j.tilecount.div_ceil(j.columns),
        name: j.name,
        tile_width: j.tilewidth,
        tile_height: j.tileheight,
        tile_count: j.tilecount,
        columns: j.columns,
        spacing: j.spacing,
        margin: j.margin,
        image: base_dir.join(&j.image),
        image_width: j.imagewidth,
        image_height: j.imageheight,
        properties: properties_from_json(j.properties),
        tiles,
    })
}

/// Reads and decodes a map file against `tileset`.
pub fn decode_map_file(path: &Path, tileset: Rc<Tileset>) -> Result<Map, MapError> {
    let txt = read_descriptor(path)?;
    let j: JsonMap = parse_file(path, &txt)?;
    let mut map = map_from_json(j, tileset)?;
    map.source = Some(path.to_path_buf());
    info!(
        "Loaded map {}: {}x{} tiles, {} layers",
        path.display(),
        map.width,
        map.height,
        map.layers.len()
    );
    Ok(map)
}

/// Decodes a map held in memory.
pub fn decode_map_str(json: &str, tileset: Rc<Tileset>) -> Result<Map, MapError> {
    let j: JsonMap = serde_json::from_str(json)?;
    map_from_json(j, tileset)
}

fn map_from_json(j: JsonMap, tileset: Rc<Tileset>) -> Result<Map, MapError> {
    if j.tilewidth == 0 || j.tileheight == 0 {
        return Err(MapError::InvalidMap("tile size must be non-zero".into()));
    }

    // GIDs decode as localId + 1 against the single tileset
    if j.tilesets.len() > 1 {
        warn!(
            "Map references {} tilesets, only '{}' is used",
            j.tilesets.len(),
            tileset.name
        );
    }
    if let Some(ts) = j.tilesets.iter().find(|ts| ts.firstgid != 1) {
        warn!(
            "Tileset '{}' has firstgid {}, tiles will be looked up as firstgid 1",
            ts.source, ts.firstgid
        );
    }

    let mut layers = Vec::with_capacity(j.layers.len());
    for l in j.layers {
        let kind = match l.kind.as_str() {
            "tilelayer" => {
                let missing = |field: &str| {
                    MapError::InvalidMap(format!("tile layer '{}' is missing `{field}`", l.name))
                };
                let width = l.width.ok_or_else(|| missing("width"))?;
                let height = l.height.ok_or_else(|| missing("height"))?;
                let data = l.data.ok_or_else(|| missing("data"))?;
                let cells = (width as usize).checked_mul(height as usize);
                if cells != Some(data.len()) {
                    return Err(MapError::InvalidLayerSize {
                        layer: l.name,
                        width,
                        height,
                        actual: data.len(),
                    });
                }
                LayerKind::Tiles { width, height, data }
            }
            "objectgroup" => LayerKind::Objects {
                objects: l.objects.into_iter().map(object_to_model).collect(),
            },
            other => {
                debug!("Layer '{}' has unsupported type '{other}', keeping it inert", l.name);
                LayerKind::Unsupported {
                    kind: other.to_owned(),
                }
            }
        };
        layers.push(Layer {
            name: l.name,
            declared_type: non_empty(l.class),
            visible: l.visible,
            properties: properties_from_json(l.properties),
            kind,
        });
    }

    Ok(Map {
        width: j.width,
        height: j.height,
        tile_width: j.tilewidth,
        tile_height: j.tileheight,
        properties: properties_from_json(j.properties),
        layers,
        tileset,
        source: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir() -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock went backwards")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("mq_tiled_rt_{nanos}"));
        fs::create_dir_all(&dir).expect("failed to create temp dir");
        dir
    }

    const TILESET_JSON: &str = r#"{
      "name":"tiles",
      "tilewidth":16,
      "tileheight":16,
      "tilecount":8,
      "columns":4,
      "image":"tiles.png",
      "imagewidth":64,
      "imageheight":32,
      "spacing":0,
      "margin":0,
      "properties":[{"name":"biome","type":"string","value":"forest"}],
      "tiles":[
        {
          "id":2,
          "type":"wall",
          "properties":[
            {"name":"solid","type":"bool","value":true},
            {"name":"weight","type":"float","value":1.5},
            {"name":"shape","type":"class","propertytype":"Shape","value":{"r":1}}
          ],
          "objectgroup":{
            "objects":[
              {"id":1,"name":"collision_box","x":2,"y":4,"width":12,"height":10,"visible":true}
            ]
          }
        },
        {
          "id":5,
          "animation":[{"tileid":5,"duration":100},{"tileid":6,"duration":150}]
        }
      ]
    }"#;

    fn tileset() -> Rc<Tileset> {
        Rc::new(decode_tileset_str(TILESET_JSON, Path::new(".")).expect("tileset"))
    }

    #[test]
    fn parses_tile_properties_animation_and_collision_box() {
        let ts = tileset();
        assert_eq!(ts.properties.get_string("biome"), Some("forest"));

        let wall = ts.tile(2).expect("tile 2");
        assert_eq!(wall.declared_type.as_deref(), Some("wall"));
        assert!(wall.is_solid());
        assert_eq!(wall.properties.get_f64("weight"), Some(1.5));
        // object-valued property is dropped, the rest are kept
        assert_eq!(wall.properties.len(), 2);
        assert_eq!(
            wall.properties.get("solid").and_then(|p| p.declared_type.as_deref()),
            Some("bool")
        );
        let hitbox = wall.collision_box().expect("collision box");
        assert_eq!(hitbox.rect(), Rect::new(2.0, 4.0, 12.0, 10.0));

        let water = ts.tile(5).expect("tile 5");
        assert_eq!(
            water.animation,
            vec![AnimationFrame::new(5, 100), AnimationFrame::new(6, 150)]
        );
    }

    #[test]
    fn missing_required_tileset_field_is_an_error() {
        let json = r#"{"name":"t","tilewidth":16,"tileheight":16,"tilecount":1,"columns":1,
                       "imagewidth":16,"imageheight":16,"spacing":0,"margin":0}"#;
        let err = decode_tileset_str(json, Path::new(".")).expect_err("image is required");
        assert!(matches!(err, MapError::Parse(_)));
        assert!(err.to_string().contains("image"));
    }

    #[test]
    fn wrongly_typed_tileset_field_is_an_error() {
        let json = r#"{"name":"t","tilewidth":"16","tileheight":16,"tilecount":1,"columns":1,
                       "image":"a.png","imagewidth":16,"imageheight":16,"spacing":0,"margin":0}"#;
        assert!(matches!(
            decode_tileset_str(json, Path::new(".")),
            Err(MapError::Parse(_))
        ));
    }

    #[test]
    fn out_of_range_animation_frame_is_rejected() {
        let json = r#"{"name":"t","tilewidth":16,"tileheight":16,"tilecount":2,"columns":2,
                       "image":"a.png","imagewidth":32,"imageheight":16,"spacing":0,"margin":0,
                       "tiles":[{"id":0,"animation":[{"tileid":2,"duration":10}]}]}"#;
        assert!(matches!(
            decode_tileset_str(json, Path::new(".")),
            Err(MapError::InvalidTileset { .. })
        ));
    }

    #[test]
    fn parses_layers_in_source_order() {
        let map_json = r#"{
          "width":2, "height":2, "tilewidth":16, "tileheight":16,
          "properties":[{"name":"music","type":"file","value":"town.ogg"}],
          "layers":[
            {"type":"tilelayer","name":"ground","width":2,"height":2,"data":[1,2,3,2147483652]},
            {"type":"objectgroup","name":"warp","objects":[
              {"id":3,"name":"door","type":"warp","x":16,"y":0,"width":16,"height":16,
               "properties":[{"name":"target","type":"string","value":"cave.tmj:1,2"}]},
              {"id":4,"x":0,"y":0,"width":0,"height":0,"point":true}
            ]},
            {"type":"imagelayer","name":"sky"}
          ]
        }"#;
        let map = decode_map_str(map_json, tileset()).expect("map");

        assert_eq!(map.properties.get_string("music"), Some("town.ogg"));
        assert_eq!(map.layers.len(), 3);
        assert_eq!(map.layers[0].name, "ground");
        // flags stay in the stored data
        assert_eq!(map.gid_at(0, 1, 1), Some(Gid(0x8000_0004)));

        let warp = map.object_layer("warp").expect("warp layer");
        assert_eq!(warp.len(), 2);
        assert_eq!(
            warp[0].properties.get_string("target"),
            Some("cave.tmj:1,2")
        );
        assert_eq!(warp[0].declared_type.as_deref(), Some("warp"));
        assert_eq!(warp[1].shape, ObjectShape::Point);

        assert!(matches!(
            &map.layers[2].kind,
            LayerKind::Unsupported { kind } if kind == "imagelayer"
        ));
    }

    #[test]
    fn layer_size_mismatch_is_rejected_at_load() {
        let map_json = r#"{"width":2,"height":2,"tilewidth":16,"tileheight":16,
          "layers":[{"type":"tilelayer","name":"oops","width":2,"height":2,"data":[1,2,3]}]}"#;
        let err = decode_map_str(map_json, tileset()).expect_err("size mismatch");
        assert!(matches!(
            err,
            MapError::InvalidLayerSize { ref layer, actual: 3, .. } if layer == "oops"
        ));
    }

    #[test]
    fn tile_layer_without_data_is_rejected() {
        let map_json = r#"{"width":1,"height":1,"tilewidth":16,"tileheight":16,
          "layers":[{"type":"tilelayer","name":"g","width":1,"height":1}]}"#;
        let err = decode_map_str(map_json, tileset()).expect_err("data missing");
        assert!(err.to_string().contains("data"));
    }

    #[test]
    fn returns_typed_error_for_malformed_json_file() {
        let dir = temp_dir();
        let map_path = dir.join("map.tmj");
        fs::write(&map_path, "{ not json").expect("failed to write map");

        let err = decode_map_file(&map_path, tileset()).expect_err("expected decode error");
        assert!(matches!(err, MapError::Json { .. }));
    }

    #[test]
    fn returns_typed_error_for_missing_file_and_bad_extension() {
        let dir = temp_dir();
        assert!(matches!(
            decode_tileset_file(&dir.join("missing.tsj")),
            Err(MapError::Io { .. })
        ));
        assert!(matches!(
            decode_map_file(Path::new("home.tmx"), tileset()),
            Err(MapError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn tileset_image_resolves_next_to_descriptor() {
        let dir = temp_dir();
        let ts_path = dir.join("tiles.tsj");
        fs::write(&ts_path, TILESET_JSON).expect("failed to write tileset");

        let ts = decode_tileset_file(&ts_path).expect("tileset");
        assert_eq!(ts.image, dir.join("tiles.png"));
    }

    #[test]
    fn class_stands_in_for_type() {
        let ts_json = r#"{"name":"t","tilewidth":16,"tileheight":16,"tilecount":2,"columns":2,
          "image":"t.png","imagewidth":32,"imageheight":16,"spacing":0,"margin":0,
          "tiles":[
            {"id":0,"class":"water"},
            {"id":1,"type":"wall","class":"ignored"}
          ]}"#;
        let ts = decode_tileset_str(ts_json, Path::new(".")).expect("tileset");
        assert_eq!(
            ts.tile(0).and_then(|t| t.declared_type.as_deref()),
            Some("water")
        );
        assert_eq!(
            ts.tile(1).and_then(|t| t.declared_type.as_deref()),
            Some("wall")
        );

        let map_json = r#"{"width":1,"height":1,"tilewidth":16,"tileheight":16,"layers":[
          {"type":"objectgroup","name":"doors","class":"triggers","objects":[
            {"x":0,"y":0,"width":16,"height":16,"type":"","class":"warp"}
          ]}
        ]}"#;
        let map = decode_map_str(map_json, Rc::new(ts)).expect("map");
        assert_eq!(map.layers[0].declared_type.as_deref(), Some("triggers"));
        let door = &map.layers[0].objects()[0];
        assert_eq!(door.declared_type.as_deref(), Some("warp"));
        assert!(door.is("warp"));
    }

    #[test]
    fn object_shapes_follow_their_markers() {
        let map_json = r#"{"width":1,"height":1,"tilewidth":16,"tileheight":16,"layers":[
          {"type":"objectgroup","name":"shapes","objects":[
            {"id":1,"x":0,"y":0,"width":16,"height":8},
            {"id":2,"x":4,"y":4,"width":0,"height":0,"point":true},
            {"id":3,"x":0,"y":0,"width":0,"height":0,
             "polygon":[{"x":0,"y":0},{"x":8,"y":0},{"x":0,"y":8}]},
            {"id":4,"x":0,"y":0,"width":0,"height":0,
             "polyline":[{"x":0,"y":0},{"x":16,"y":16}]},
            {"id":5,"x":0,"y":16,"width":16,"height":16,"gid":2147483651}
          ]}
        ]}"#;
        let map = decode_map_str(map_json, tileset()).expect("map");
        let shapes: Vec<&ObjectShape> = map.layers[0]
            .objects()
            .iter()
            .map(|o| &o.shape)
            .collect();

        assert_eq!(shapes[0], &ObjectShape::Rectangle);
        assert_eq!(shapes[1], &ObjectShape::Point);
        assert_eq!(
            shapes[2],
            &ObjectShape::Polygon(vec![vec2(0.0, 0.0), vec2(8.0, 0.0), vec2(0.0, 8.0)])
        );
        assert_eq!(
            shapes[3],
            &ObjectShape::Polyline(vec![vec2(0.0, 0.0), vec2(16.0, 16.0)])
        );
        assert_eq!(
            shapes[4],
            &ObjectShape::Tile {
                gid: Gid(0x8000_0003)
            }
        );
        assert_eq!(
            map.layers[0].objects()[4].rect(),
            Rect::new(0.0, 16.0, 16.0, 16.0)
        );
    }

    #[test]
    fn layer_size_overflow_is_rejected() {
        let map_json = r#"{"width":1,"height":1,"tilewidth":16,"tileheight":16,
          "layers":[{"type":"tilelayer","name":"huge","width":4294967295,"height":4294967295,
                     "data":[1]}]}"#;
        assert!(matches!(
            decode_map_str(map_json, tileset()),
            Err(MapError::InvalidLayerSize { .. })
        ));
    }
}
