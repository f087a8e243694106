//! Model document types and the merge rules that combine a parent chain into
//! one document.
//!
//! A document accumulates across the chain key by key, in declaration order:
//! `elements` append, `textures` and `display` insert-or-overwrite, so for
//! colliding entries whichever document is processed later wins.

use std::collections::{HashMap, HashSet};

use glam::Vec3;
use tracing::warn;

use crate::assets::raster::Raster;

/// The six cardinal faces of a cuboid element, in render submission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    North,
    South,
    West,
    East,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::Up,
        Direction::Down,
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "north" => Some(Direction::North),
            "south" => Some(Direction::South),
            "west" => Some(Direction::West),
            "east" => Some(Direction::East),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::North => "north",
            Direction::South => "south",
            Direction::West => "west",
            Direction::East => "east",
        }
    }
}

/// Rotation axis of an element pivot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "x" => Some(Axis::X),
            "y" => Some(Axis::Y),
            "z" => Some(Axis::Z),
            _ => None,
        }
    }
}

/// Integer UV rectangle in texels. Fractional JSON coordinates truncate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UvRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Default for UvRect {
    fn default() -> Self {
        UvRect {
            x: 0,
            y: 0,
            w: 16,
            h: 16,
        }
    }
}

/// One textured face of an element.
///
/// The UV rect is normalized at parse time: a descending coordinate pair is
/// swapped into ascending order and recorded as a mirror instead (`flip_x`
/// for u, `flip_y` for v). A pair of equal coordinates also sets the flip.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub uv: UvRect,
    pub flip_x: bool,
    pub flip_y: bool,
    pub rotation: i32,
    pub texture: String,
    pub cullface: String,
}

impl Default for Face {
    fn default() -> Self {
        Face {
            uv: UvRect::default(),
            flip_x: false,
            flip_y: false,
            rotation: 0,
            texture: String::new(),
            cullface: String::new(),
        }
    }
}

impl Face {
    pub fn from_value(value: &serde_json::Value) -> Self {
        let mut face = Face::default();
        let Some(map) = value.as_object() else {
            return face;
        };
        for (key, v) in map {
            match key.as_str() {
                "uv" => face.set_uv(v),
                "rotation" => face.rotation = as_i32(v),
                "texture" => face.texture = as_string(v),
                "cullface" => face.cullface = as_string(v),
                _ => {}
            }
        }
        face
    }

    fn set_uv(&mut self, value: &serde_json::Value) {
        let Some(raw) = parse_array::<4>(value) else {
            return;
        };

        let (x1, x2) = if raw[0] < raw[2] {
            (raw[0], raw[2])
        } else {
            self.flip_x = true;
            (raw[2], raw[0])
        };
        let (y1, y2) = if raw[1] < raw[3] {
            (raw[1], raw[3])
        } else {
            self.flip_y = true;
            (raw[3], raw[1])
        };

        self.uv = UvRect {
            x: x1 as i32,
            y: y1 as i32,
            w: (x2 - x1) as i32,
            h: (y2 - y1) as i32,
        };
    }
}

/// Pivot rotation of one element, degrees about a single axis.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementRotation {
    pub angle: f32,
    pub axis: Option<Axis>,
    pub origin: Vec3,
}

impl ElementRotation {
    fn from_value(value: &serde_json::Value) -> Self {
        let mut rotation = ElementRotation {
            angle: 0.0,
            axis: None,
            origin: Vec3::ZERO,
        };
        let Some(map) = value.as_object() else {
            return rotation;
        };
        for (key, v) in map {
            match key.as_str() {
                "angle" => rotation.angle = as_f32(v),
                "axis" => rotation.axis = v.as_str().and_then(Axis::parse),
                "origin" => {
                    if let Some(origin) = parse_vec3(v) {
                        rotation.origin = origin;
                    }
                }
                _ => {}
            }
        }
        rotation
    }
}

/// One cuboid element spanning `from..to` in model units (a full cube is 0..16).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub from: Vec3,
    pub to: Vec3,
    pub rotation: Option<ElementRotation>,
    pub faces: HashMap<Direction, Face>,
}

impl Element {
    pub fn from_value(value: &serde_json::Value) -> Self {
        let mut element = Element::default();
        let Some(map) = value.as_object() else {
            return element;
        };
        for (key, v) in map {
            match key.as_str() {
                "from" => {
                    if let Some(from) = parse_vec3(v) {
                        element.from = from;
                    }
                }
                "to" => {
                    if let Some(to) = parse_vec3(v) {
                        element.to = to;
                    }
                }
                "rotation" => element.rotation = Some(ElementRotation::from_value(v)),
                "faces" => element.add_faces(v),
                _ => {}
            }
        }
        element
    }

    fn add_faces(&mut self, value: &serde_json::Value) {
        let Some(map) = value.as_object() else {
            return;
        };
        for (name, v) in map {
            let Some(direction) = Direction::parse(name) else {
                continue;
            };
            self.faces.insert(direction, Face::from_value(v));
        }
    }
}

/// Display transform for one context (`gui`, `ground`, ...).
///
/// Unset fields stay zero, scale included; the geometry stage decides the
/// fallbacks.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Deserialize)]
#[serde(default)]
pub struct Display {
    pub rotation: [f32; 3],
    pub translation: [f32; 3],
    pub scale: [f32; 3],
}

/// Texture bindings in declaration order.
///
/// Order matters twice: layers composite in binding order, and texture-only
/// documents render their first binding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextureBindings {
    entries: Vec<(String, String)>,
}

impl TextureBindings {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Insert or overwrite. An overwrite keeps the original position.
    pub fn set(&mut self, name: &str, value: String) {
        match self.entries.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Document classification decided after the whole parent chain has merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelKind {
    /// Has cuboid elements and goes through the 3D rasterizer.
    Block,
    /// No elements; the first bound texture becomes the thumbnail directly.
    #[default]
    Item,
}

/// A fully merged model: the parent chain flattened plus its loaded textures.
#[derive(Debug, Clone, Default)]
pub struct ModelDocument {
    /// Namespace-qualified item id this document was resolved for.
    pub id: String,
    pub kind: ModelKind,
    pub elements: Vec<Element>,
    pub textures: TextureBindings,
    /// Loaded color rasters keyed by normalized binding key.
    pub rasters: HashMap<String, Raster>,
    pub displays: HashMap<String, Display>,
    /// Document paths merged in, in load order.
    pub loaded_paths: Vec<String>,
}

impl ModelDocument {
    pub fn new(id: impl Into<String>, kind: ModelKind) -> Self {
        ModelDocument {
            id: id.into(),
            kind,
            ..ModelDocument::default()
        }
    }

    pub fn add_elements(&mut self, value: &serde_json::Value) {
        let Some(items) = value.as_array() else {
            return;
        };
        for item in items {
            self.elements.push(Element::from_value(item));
        }
    }

    pub fn add_textures(&mut self, value: &serde_json::Value) {
        let Some(map) = value.as_object() else {
            return;
        };
        for (name, v) in map {
            if let Some(path) = v.as_str() {
                self.textures.set(name, path.to_string());
            }
        }
    }

    pub fn add_displays(&mut self, value: &serde_json::Value) {
        let Some(map) = value.as_object() else {
            return;
        };
        for (context, v) in map {
            let display = serde_json::from_value(v.clone()).unwrap_or_default();
            self.displays.insert(context.clone(), display);
        }
    }

    pub fn gui_display(&self) -> Option<&Display> {
        self.displays.get("gui")
    }

    /// Follow a face's texture reference (`#alias` chains included) to a
    /// loaded raster. `None` when the chain dead-ends or loops.
    pub fn texture(&self, reference: &str) -> Option<&Raster> {
        let mut seen = HashSet::new();
        let mut current = reference.to_string();
        loop {
            let key = if current.starts_with('#') {
                current.replace('#', "")
            } else {
                current.clone()
            };
            if let Some(raster) = self.rasters.get(&key) {
                return Some(raster);
            }
            if !seen.insert(key.clone()) {
                warn!("texture alias loop through '{key}' in '{}'", self.id);
                return None;
            }
            current = self.textures.get(&key)?.to_string();
        }
    }
}

/// Collapse layer-indexed binding keys (`layer0`, `layer1`, ...) onto the
/// shared `layer` slot. The match is a substring scan, not anchored.
pub fn normalize_texture_key(key: &str) -> &str {
    let has_layer_index = key
        .as_bytes()
        .windows(6)
        .any(|w| w.starts_with(b"layer") && w[5].is_ascii_digit());
    if has_layer_index { "layer" } else { key }
}

fn as_string(value: &serde_json::Value) -> String {
    value.as_str().unwrap_or_default().to_string()
}

fn as_f32(value: &serde_json::Value) -> f32 {
    value.as_f64().unwrap_or(0.0) as f32
}

fn as_i32(value: &serde_json::Value) -> i32 {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f as i64))
        .unwrap_or(0) as i32
}

fn parse_array<const N: usize>(value: &serde_json::Value) -> Option<[f64; N]> {
    let items = value.as_array()?;
    if items.len() != N {
        return None;
    }
    let mut out = [0.0; N];
    for (slot, item) in out.iter_mut().zip(items) {
        *slot = item.as_f64()?;
    }
    Some(out)
}

fn parse_vec3(value: &serde_json::Value) -> Option<Vec3> {
    let [x, y, z] = parse_array::<3>(value)?;
    Some(Vec3::new(x as f32, y as f32, z as f32))
}

#[cfg(test)]
#[path = "../../tests/unit/model/document.rs"]
mod tests;
