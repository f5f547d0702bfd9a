//! Tiled JSON maps and tilesets.

use crate::error::MapError;
use crate::gid::{TileId, GID_MASK};
use crate::loader::images::ImageSource;
use crate::map::{Layer, LayerKind, Map, Object, ObjectShape, Tile, Tileset};
use crate::properties::{Properties, PropertyValue};
use log::{debug, warn};
use macroquad::prelude::{vec2, Color, Rect, BLANK};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};

/// Tiled's default object group color (#a0a0a4).
const DEFAULT_OBJECT_COLOR: Color = Color::new(160.0 / 255.0, 160.0 / 255.0, 164.0 / 255.0, 1.0);

#[derive(Deserialize)]
struct JsonMap {
    width: usize,
    height: usize,
    tilewidth: u32,
    tileheight: u32,
    #[serde(default)]
    infinite: bool,
    #[serde(default)]
    backgroundcolor: Option<String>,
    #[serde(default)]
    layers: Vec<JsonLayer>,
    #[serde(default)]
    tilesets: Vec<JsonTilesetRef>,
    #[serde(default)]
    properties: Vec<JsonProperty>,
}

#[derive(Deserialize)]
struct JsonLayer {
    #[serde(default)]
    data: JsonLayerData,
    #[serde(default)]
    encoding: Option<String>,
    #[serde(default = "default_true")]
    visible: bool,
    #[serde(default = "one")]
    opacity: f32,
    #[serde(default)]
    name: String,
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    properties: Vec<JsonProperty>,
    #[serde(default)]
    objects: Vec<JsonObject>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    layers: Vec<JsonLayer>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonLayerData {
    Gids(Vec<u32>),
    Encoded(String),
}

impl Default for JsonLayerData {
    fn default() -> Self {
        JsonLayerData::Gids(Vec::new())
    }
}

fn default_true() -> bool {
    true
}
fn one() -> f32 {
    1.0
}

#[derive(Deserialize)]
struct JsonTilesetRef {
    firstgid: u32,
    #[serde(default)]
    source: Option<String>,
    #[serde(flatten)]
    embedded: JsonTileset,
}

/// Tileset body, either embedded in the map or read from an external file.
#[derive(Deserialize, Default)]
#[serde(default)]
struct JsonTileset {
    name: String,
    tilewidth: u32,
    tileheight: u32,
    tilecount: u32,
    columns: u32,
    image: Option<String>,
    spacing: u32,
    margin: u32,
    properties: Vec<JsonProperty>,
    tiles: Vec<JsonTile>,
}

#[derive(Deserialize)]
struct JsonTile {
    id: u32,
    #[serde(default)]
    image: Option<String>,
}

#[derive(Deserialize)]
struct JsonProperty {
    name: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    value: JsonValue,
}

#[derive(Deserialize)]
struct JsonObject {
    #[serde(default)]
    id: u32,
    #[serde(default)]
    name: String,
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default)]
    class: String,
    #[serde(default)]
    x: f32,
    #[serde(default)]
    y: f32,
    #[serde(default)]
    width: f32,
    #[serde(default)]
    height: f32,
    #[serde(default = "default_true")]
    visible: bool,
    #[serde(default)]
    point: bool,
    #[serde(default)]
    ellipse: bool,
    #[serde(default)]
    polygon: Vec<JsonObjectPoint>,
    #[serde(default)]
    polyline: Vec<JsonObjectPoint>,
    #[serde(default)]
    gid: Option<u32>,
    #[serde(default)]
    text: Option<JsonText>,
    #[serde(default)]
    properties: Vec<JsonProperty>,
}

#[derive(Deserialize)]
struct JsonObjectPoint {
    x: f32,
    y: f32,
}

#[derive(Deserialize)]
struct JsonText {
    #[serde(default)]
    text: String,
}

fn json_property(prop: JsonProperty) -> Result<Option<(String, PropertyValue)>, MapError> {
    let JsonProperty { name, kind, value } = prop;

    let parsed = match kind.as_deref() {
        Some("bool") => value.as_bool().map(PropertyValue::Bool),
        Some("int") | Some("object") => value.as_i64().map(PropertyValue::I64),
        Some("float") => value.as_f64().map(|n| PropertyValue::F32(n as f32)),
        Some("string") | Some("file") | Some("color") | Some("class") => {
            value.as_str().map(|s| PropertyValue::String(s.to_owned()))
        }
        Some(other) => {
            return Err(MapError::UnsupportedPropertyType {
                name,
                kind: other.to_owned(),
            });
        }
        None => {
            if let Some(v) = value.as_bool() {
                Some(PropertyValue::Bool(v))
            } else if let Some(v) = value.as_i64() {
                Some(PropertyValue::I64(v))
            } else if let Some(v) = value.as_f64() {
                Some(PropertyValue::F32(v as f32))
            } else {
                value.as_str().map(|s| PropertyValue::String(s.to_owned()))
            }
        }
    };

    Ok(parsed.map(|value| (name, value)))
}

fn properties_from_json(props: Vec<JsonProperty>) -> Result<Properties, MapError> {
    let mut out = Properties::new();
    for p in props {
        if let Some((name, value)) = json_property(p)? {
            out.insert(name, value);
        }
    }
    Ok(out)
}

/// Parses Tiled's `#RRGGBB` / `#AARRGGBB` color strings.
pub fn parse_color(s: &str) -> Result<Color, MapError> {
    let invalid = || MapError::InvalidColor(s.to_owned());
    let hex = s.strip_prefix('#').unwrap_or(s);
    if !hex.is_ascii() {
        return Err(invalid());
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());

    match hex.len() {
        6 => Ok(Color::from_rgba(byte(0)?, byte(2)?, byte(4)?, 255)),
        8 => Ok(Color::from_rgba(byte(2)?, byte(4)?, byte(6)?, byte(0)?)),
        _ => Err(invalid()),
    }
}

fn object_from_json(obj: JsonObject) -> Result<Object, MapError> {
    let shape = if let Some(gid) = obj.gid {
        ObjectShape::Tile { gid }
    } else if obj.point {
        ObjectShape::Point
    } else if obj.ellipse {
        ObjectShape::Ellipse {
            width: obj.width,
            height: obj.height,
        }
    } else if !obj.polygon.is_empty() {
        ObjectShape::Polygon(obj.polygon.into_iter().map(|p| vec2(p.x, p.y)).collect())
    } else if !obj.polyline.is_empty() {
        ObjectShape::Polyline(obj.polyline.into_iter().map(|p| vec2(p.x, p.y)).collect())
    } else if let Some(text) = obj.text {
        ObjectShape::Text { text: text.text }
    } else {
        ObjectShape::Rectangle {
            width: obj.width,
            height: obj.height,
        }
    };

    let class_name = if !obj.class.is_empty() {
        obj.class
    } else {
        obj.kind
    };

    Ok(Object {
        id: obj.id,
        name: obj.name,
        class_name,
        position: vec2(obj.x, obj.y),
        visible: obj.visible,
        shape,
        properties: properties_from_json(obj.properties)?,
    })
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, MapError> {
    let txt = std::fs::read_to_string(path).map_err(|source| MapError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&txt).map_err(|source| MapError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Number of whole tiles that fit along one image axis. Never less than 1.
fn atlas_cells(image_len: u32, tile_len: u32, margin: u32, spacing: u32) -> u32 {
    let usable = image_len
        .saturating_sub(margin.saturating_mul(2))
        .saturating_add(spacing);
    (usable / tile_len.saturating_add(spacing)).max(1)
}

fn tileset_overflow(name: &str, what: &str) -> MapError {
    MapError::InvalidMap(format!("Tileset '{}': {} overflows", name, what))
}

/// GID of local tile `local`, or an error past the 29-bit GID space.
fn local_gid(name: &str, first_gid: u32, local: u32) -> Result<u32, MapError> {
    first_gid
        .checked_add(local)
        .filter(|&gid| gid <= GID_MASK)
        .ok_or_else(|| tileset_overflow(name, "GID range"))
}

/// Pixel offset of cell `index` along one atlas axis.
fn atlas_offset(
    name: &str,
    index: u32,
    tile_len: u32,
    margin: u32,
    spacing: u32,
) -> Result<u32, MapError> {
    tile_len
        .checked_add(spacing)
        .and_then(|stride| index.checked_mul(stride))
        .and_then(|off| off.checked_add(margin))
        .ok_or_else(|| tileset_overflow(name, "atlas layout"))
}

/// Adds one tileset and its GID range to `map`. Returns the last GID it covers.
fn add_tileset(
    map: &mut Map,
    first_gid: u32,
    ts: JsonTileset,
    dir: &Path,
    images: &mut dyn ImageSource,
) -> Result<u32, MapError> {
    if first_gid == 0 || first_gid & !GID_MASK != 0 {
        return Err(MapError::InvalidMap(format!(
            "Tileset '{}' has an invalid firstgid {}",
            ts.name, first_gid
        )));
    }
    if ts.tilewidth == 0 || ts.tileheight == 0 {
        return Err(MapError::InvalidMap(format!(
            "Tileset '{}' has a zero tile size",
            ts.name
        )));
    }
    let name = ts.name;
    let mut last_gid = local_gid(&name, first_gid, ts.tilecount.saturating_sub(1))?;

    let image = match &ts.image {
        Some(rel) if !rel.is_empty() => Some(images.load_image(&dir.join(rel))?),
        _ => None,
    };

    let index = map.add_tileset(Tileset {
        name: name.clone(),
        first_gid,
        tile_w: ts.tilewidth,
        tile_h: ts.tileheight,
        image,
        properties: properties_from_json(ts.properties)?,
    });

    if let Some(img) = image {
        let (tw, th) = (ts.tilewidth, ts.tileheight);
        let fit_cols = atlas_cells(img.width, tw, ts.margin, ts.spacing);
        let fit_rows = atlas_cells(img.height, th, ts.margin, ts.spacing);
        let columns = if ts.columns > 0 { ts.columns } else { fit_cols };
        let capacity = fit_cols.saturating_mul(fit_rows);
        let count = if ts.tilecount > capacity {
            warn!(
                "Tileset '{}' declares {} tiles but its image holds {}",
                name, ts.tilecount, capacity
            );
            capacity
        } else {
            ts.tilecount
        };
        for local in 0..count {
            let sx = atlas_offset(&name, local % columns, tw, ts.margin, ts.spacing)?;
            let sy = atlas_offset(&name, local / columns, th, ts.margin, ts.spacing)?;
            map.insert_tile(
                local_gid(&name, first_gid, local)?,
                Tile {
                    tileset: index,
                    src: Rect::new(sx as f32, sy as f32, tw as f32, th as f32),
                    image: None,
                },
            );
        }
    }

    // Image-collection tiles, or per-tile overrides on an atlas.
    for tile in ts.tiles {
        let Some(rel) = tile.image.filter(|p| !p.is_empty()) else {
            continue;
        };
        let gid = local_gid(&name, first_gid, tile.id)?;
        let own = images.load_image(&dir.join(rel))?;
        map.insert_tile(
            gid,
            Tile {
                tileset: index,
                src: Rect::new(0.0, 0.0, own.width as f32, own.height as f32),
                image: Some(own),
            },
        );
        last_gid = last_gid.max(gid);
    }

    Ok(last_gid)
}

struct LayerCtx<'a, 'i> {
    cells: usize,
    max_gid: u32,
    base_dir: &'a Path,
    images: &'i mut dyn ImageSource,
}

fn layer_from_json(l: JsonLayer, ctx: &mut LayerCtx<'_, '_>) -> Result<Option<Layer>, MapError> {
    let layer_name = l.name.clone();
    let kind = match l.kind.as_deref().unwrap_or("tilelayer") {
        "tilelayer" => {
            let encoding = l.encoding.as_deref().unwrap_or("csv");
            let data = match l.data {
                JsonLayerData::Gids(data) if encoding == "csv" => data,
                _ => {
                    let encoding = l.encoding.unwrap_or_else(|| "base64".to_owned());
                    return Err(MapError::UnsupportedEncoding {
                        layer: layer_name,
                        encoding,
                    });
                }
            };
            if data.len() != ctx.cells {
                return Err(MapError::InvalidLayerSize {
                    layer: layer_name,
                    expected: ctx.cells,
                    actual: data.len(),
                });
            }
            if let Some(gid) = data
                .iter()
                .map(|&raw| TileId(raw).clean())
                .find(|&gid| gid > ctx.max_gid)
            {
                return Err(MapError::InvalidTileGid {
                    layer: layer_name,
                    gid,
                    max_gid: ctx.max_gid,
                });
            }
            LayerKind::Tiles { data }
        }
        "objectgroup" => LayerKind::Objects {
            color: match &l.color {
                Some(c) => parse_color(c)?,
                None => DEFAULT_OBJECT_COLOR,
            },
            objects: l
                .objects
                .into_iter()
                .map(object_from_json)
                .collect::<Result<Vec<_>, _>>()?,
        },
        "imagelayer" => match l.image.as_deref() {
            Some(rel) if !rel.is_empty() => LayerKind::Image {
                image: ctx.images.load_image(&ctx.base_dir.join(rel))?,
            },
            _ => {
                debug!("image layer '{}' has no image, skipping", layer_name);
                return Ok(None);
            }
        },
        "group" => {
            let mut children = Vec::with_capacity(l.layers.len());
            for child in l.layers {
                if let Some(layer) = layer_from_json(child, ctx)? {
                    children.push(layer);
                }
            }
            LayerKind::Group { layers: children }
        }
        other => {
            warn!("layer '{}' has unsupported type '{}', skipping", layer_name, other);
            return Ok(None);
        }
    };

    Ok(Some(Layer {
        name: l.name,
        visible: l.visible,
        opacity: l.opacity,
        properties: properties_from_json(l.properties)?,
        kind,
    }))
}

fn build_map(j: JsonMap, base_dir: &Path, images: &mut dyn ImageSource) -> Result<Map, MapError> {
    if j.infinite {
        return Err(MapError::InvalidMap(
            "Infinite (chunked) maps are not supported".to_owned(),
        ));
    }
    if j.tilewidth == 0 || j.tileheight == 0 {
        return Err(MapError::InvalidMap("Map tile size must be non-zero".to_owned()));
    }

    let mut map = Map::new(j.width, j.height, j.tilewidth, j.tileheight);
    map.background = match &j.backgroundcolor {
        Some(c) => parse_color(c)?,
        None => BLANK,
    };
    map.properties = properties_from_json(j.properties)?;

    let mut refs = j.tilesets;
    refs.sort_by_key(|t| t.firstgid);

    let mut max_gid = 0;
    for ts_ref in refs {
        let (body, dir) = match &ts_ref.source {
            Some(source) => {
                if !source.ends_with(".json") {
                    return Err(MapError::InvalidMap(format!(
                        "External tileset must be JSON: {}",
                        source
                    )));
                }
                let ts_path = base_dir.join(source);
                let body: JsonTileset = read_json(&ts_path)?;
                let dir = ts_path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| base_dir.to_path_buf());
                (body, dir)
            }
            None => (ts_ref.embedded, base_dir.to_path_buf()),
        };
        max_gid = max_gid.max(add_tileset(&mut map, ts_ref.firstgid, body, &dir, images)?);
    }

    let cells = j
        .width
        .checked_mul(j.height)
        .ok_or_else(|| MapError::InvalidMap("Map size overflows".to_owned()))?;
    let mut ctx = LayerCtx {
        cells,
        max_gid,
        base_dir,
        images,
    };
    for l in j.layers {
        if let Some(layer) = layer_from_json(l, &mut ctx)? {
            map.layers.push(layer);
        }
    }

    debug!(
        "built map {}x{} ({}x{} px tiles): {} tilesets, {} layers, max gid {}",
        map.width,
        map.height,
        map.tile_w,
        map.tile_h,
        map.tilesets.len(),
        map.layer_count(),
        max_gid
    );
    Ok(map)
}

/// Loads a Tiled JSON map. Tileset and image paths are resolved relative to
/// the file that references them; images go through `images`.
pub fn load_map(path: impl AsRef<Path>, images: &mut dyn ImageSource) -> Result<Map, MapError> {
    let p = path.as_ref();
    if p.extension().and_then(|e| e.to_str()) != Some("json") {
        return Err(MapError::InvalidMap(format!(
            "Map file must be a JSON file: {}",
            p.display()
        )));
    }

    let j: JsonMap = read_json(p)?;
    let map_dir = p
        .parent()
        .map(|d| d.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./"));

    build_map(j, &map_dir, images)
}

/// Builds a map from JSON text. Relative paths resolve against `base_dir`.
pub fn load_map_from_str(
    json: &str,
    base_dir: impl AsRef<Path>,
    images: &mut dyn ImageSource,
) -> Result<Map, MapError> {
    let base_dir = base_dir.as_ref();
    let j: JsonMap = serde_json::from_str(json).map_err(|source| MapError::Json {
        path: base_dir.join("<inline>"),
        source,
    })?;
    build_map(j, base_dir, images)
}
