// tests/map_tests.rs

use macroquad_tiled_runtime::{Gid, LayerKind, Map, MapError, Tileset};
use std::rc::Rc;

const TILESET: &str = r#"
{
  "name": "t", "tilewidth": 8, "tileheight": 8, "tilecount": 4, "columns": 2,
  "image": "t.png", "imagewidth": 16, "imageheight": 16, "spacing": 0, "margin": 0
}
"#;

fn tileset() -> Rc<Tileset> {
    Rc::new(Tileset::load_from_str(TILESET, ".").unwrap())
}

const BAD_LAYER_SIZE: &str = r#"
{
  "width": 2,
  "height": 2,
  "tilewidth": 8,
  "tileheight": 8,
  "layers": [
    { "type": "tilelayer", "name": "oops", "width": 2, "height": 2, "data": [1,2,3] }
  ]
}
"#;

#[test]
fn error_on_layer_size_mismatch() {
    let err = Map::load_from_str(BAD_LAYER_SIZE, tileset()).unwrap_err();
    assert!(matches!(
        err,
        MapError::InvalidLayerSize { ref layer, width: 2, height: 2, actual: 3 } if layer == "oops"
    ));
}

const JSON_WITH_EXTRA: &str = r#"
{
  "width":1, "height":1,
  "tilewidth":8, "tileheight":8,
  "dummyField": "ignored",
  "layers": [
    {
      "type":"tilelayer",
      "name":"L",
      "width":1, "height":1,
      "data":[0],
      "opacity": 0.5,
      "properties": []
    }
  ]
}
"#;

#[test]
fn load_ignores_extra_fields() {
    let map = Map::load_from_str(JSON_WITH_EXTRA, tileset()).expect("Should ignore unknown fields");
    assert_eq!(map.layers[0].name, "L");
    match &map.layers[0].kind {
        LayerKind::Tiles { data, .. } => assert_eq!(data, &vec![0]),
        other => panic!("expected a tile layer, got {:?}", other),
    }
}

const EMPTY_NAME_JSON: &str = r#"
{
  "width":1,"height":1,"tilewidth":8,"tileheight":8,
  "layers":[ { "type":"tilelayer", "name":"", "width":1, "height":1, "data":[1] } ]
}
"#;

#[test]
fn load_allows_empty_layer_name() {
    let map = Map::load_from_str(EMPTY_NAME_JSON, tileset()).unwrap();
    assert_eq!(map.layers[0].name, "");
}

const STACKED: &str = r#"
{
  "width":2,"height":2,"tilewidth":8,"tileheight":8,
  "properties":[ {"name":"music","type":"string","value":"town.ogg"} ],
  "layers":[
    { "type":"tilelayer", "name":"ground", "width":2, "height":2, "data":[1,1,1,1] },
    { "type":"tilelayer", "name":"decor", "width":2, "height":2, "data":[0,2147483652,0,0] },
    { "type":"objectgroup", "name":"warp", "objects":[] },
    { "type":"imagelayer", "name":"sky" }
  ]
}
"#;

#[test]
fn topmost_gid_prefers_upper_layers() {
    let map = Map::load_from_str(STACKED, tileset()).unwrap();

    assert_eq!(map.topmost_gid(0, 0), Some((0, Gid(1))));
    assert_eq!(map.topmost_gid(1, 0), Some((1, Gid(0x8000_0004))));
    assert_eq!(map.tile_at(1, 0).map(|t| t.local_id), Some(3));
    assert_eq!(map.topmost_gid(5, 5), None);
}

#[test]
fn queries_outside_the_data_return_none() {
    let map = Map::load_from_str(STACKED, tileset()).unwrap();

    assert_eq!(map.gid_at(0, 1, 1), Some(Gid(1)));
    assert_eq!(map.gid_at(0, 2, 0), None);
    assert_eq!(map.gid_at(0, -1, 0), None);
    assert_eq!(map.gid_at(9, 0, 0), None);
    assert!(map.layer(9).is_none());
}

#[test]
fn layers_keep_paint_order_and_kinds() {
    let map = Map::load_from_str(STACKED, tileset()).unwrap();

    let names: Vec<&str> = map.layers.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, ["ground", "decor", "warp", "sky"]);
    assert!(map.object_layer("warp").is_some_and(|o| o.is_empty()));
    assert!(map.object_layer("ground").is_none());
    assert!(matches!(map.layers[3].kind, LayerKind::Unsupported { .. }));
    assert_eq!(map.properties.get_string("music"), Some("town.ogg"));
    assert_eq!(map.pixel_size(), macroquad::prelude::vec2(16.0, 16.0));
}

#[test]
fn pixel_size_of_a_huge_map_does_not_overflow() {
    let json = r#"{"width":300000000,"height":1,"tilewidth":16,"tileheight":16,"layers":[]}"#;
    let map = Map::load_from_str(json, tileset()).unwrap();

    let size = map.pixel_size();
    assert_eq!(size.x, 300_000_000.0 * 16.0);
    assert_eq!(size.y, 16.0);
}
