use super::*;

use crate::assets::raster::Raster;
use crate::model::document::{Display, ElementRotation};

fn assert_close(actual: Vec3, expected: Vec3) {
    assert!(
        actual.abs_diff_eq(expected, 1e-3),
        "expected {expected}, got {actual}"
    );
}

fn white_raster() -> Raster {
    Raster::filled(16, 16, [255, 255, 255, 255])
}

fn full_cube(faces: &[Direction]) -> Element {
    let mut map = HashMap::new();
    for direction in faces {
        let face = Face {
            texture: "#all".to_string(),
            ..Face::default()
        };
        map.insert(*direction, face);
    }
    Element {
        from: Vec3::ZERO,
        to: Vec3::splat(16.0),
        rotation: None,
        faces: map,
    }
}

fn doc(kind: ModelKind, element: Element) -> ModelDocument {
    let mut doc = ModelDocument::new("minecraft:test", kind);
    doc.rasters.insert("all".to_string(), white_raster());
    doc.elements.push(element);
    doc
}

#[test]
fn default_scale_centers_and_shrinks_the_cube() {
    let doc = doc(ModelKind::Item, full_cube(&[Direction::South]));
    let quads = build_quads(&doc, 16);

    assert_eq!(quads.len(), 1);
    assert_close(quads[0].corners[0], Vec3::new(-5.0, 5.0, 5.0));
    assert_close(quads[0].corners[1], Vec3::new(5.0, 5.0, 5.0));
    assert_close(quads[0].corners[2], Vec3::new(5.0, -5.0, 5.0));
    assert_close(quads[0].corners[3], Vec3::new(-5.0, -5.0, 5.0));
    assert_close(quads[0].normal, Vec3::new(0.0, 0.0, -1.0));
}

#[test]
fn block_orientation_tilts_and_spins_the_cube() {
    let doc = doc(ModelKind::Block, full_cube(&[Direction::South]));
    let quads = build_quads(&doc, 16);

    // (-5, 5, 5) through yaw 135 then pitch 30.
    assert_close(quads[0].corners[0], Vec3::new(7.0711, 4.3301, 2.5));
}

#[test]
fn gui_display_overrides_scale_and_orientation() {
    let mut doc = doc(ModelKind::Block, full_cube(&[Direction::South]));
    let display = Display {
        scale: [1.0, 1.0, 1.0],
        ..Display::default()
    };
    doc.displays.insert("gui".to_string(), display);
    let quads = build_quads(&doc, 16);

    assert_close(quads[0].corners[0], Vec3::new(-8.0, 8.0, 8.0));
}

#[test]
fn gui_display_with_zero_scale_collapses_the_cube() {
    let mut doc = doc(ModelKind::Block, full_cube(&[Direction::South]));
    doc.displays.insert("gui".to_string(), Display::default());
    let quads = build_quads(&doc, 16);

    assert_eq!(quads.len(), 1);
    assert_close(quads[0].corners[0], Vec3::ZERO);
    assert_close(quads[0].corners[2], Vec3::ZERO);
}

#[test]
fn pivot_rotates_about_the_centered_origin() {
    let mut element = full_cube(&[Direction::South]);
    element.rotation = Some(ElementRotation {
        angle: 90.0,
        axis: Some(Axis::Y),
        origin: Vec3::splat(8.0),
    });
    let mut doc = doc(ModelKind::Item, element);
    doc.displays.insert(
        "gui".to_string(),
        Display {
            scale: [1.0, 1.0, 1.0],
            ..Display::default()
        },
    );
    let quads = build_quads(&doc, 16);

    assert_close(quads[0].corners[0], Vec3::new(8.0, 8.0, 8.0));
}

#[test]
fn pivot_origin_offsets_the_rotation() {
    let mut element = full_cube(&[Direction::South]);
    element.rotation = Some(ElementRotation {
        angle: 90.0,
        axis: Some(Axis::Y),
        origin: Vec3::ZERO,
    });
    let mut doc = doc(ModelKind::Item, element);
    doc.displays.insert(
        "gui".to_string(),
        Display {
            scale: [1.0, 1.0, 1.0],
            ..Display::default()
        },
    );
    let quads = build_quads(&doc, 16);

    // The pivot corner stays fixed while the opposite corner swings around.
    assert_close(quads[0].corners[0], Vec3::new(8.0, 8.0, -8.0));
}

#[test]
fn rotation_without_an_axis_is_ignored() {
    let mut element = full_cube(&[Direction::South]);
    element.rotation = Some(ElementRotation {
        angle: 45.0,
        axis: None,
        origin: Vec3::splat(8.0),
    });
    let doc = doc(ModelKind::Item, element);
    let quads = build_quads(&doc, 16);

    assert_close(quads[0].corners[0], Vec3::new(-5.0, 5.0, 5.0));
}

#[test]
fn every_textured_face_yields_a_quad() {
    let doc = doc(ModelKind::Item, full_cube(&Direction::ALL));
    let quads = build_quads(&doc, 16);

    assert_eq!(quads.len(), 6);
    for quad in &quads {
        assert_eq!(quad.uvs[0], Vec2::new(0.0, 0.0));
        assert_eq!(quad.uvs[2], Vec2::new(1.0, 1.0));
    }
}

#[test]
fn faces_without_resolvable_textures_are_dropped() {
    let mut doc = doc(ModelKind::Item, full_cube(&Direction::ALL));
    doc.rasters.clear();

    assert!(build_quads(&doc, 16).is_empty());
}

#[test]
fn synthetic_item_element_binds_the_first_texture() {
    let mut doc = ModelDocument::new("minecraft:stick", ModelKind::Item);
    doc.textures.set("layer0", "item/stick".to_string());
    doc.textures.set("particle", "#layer0".to_string());

    let element = synthetic_item_element(&doc);
    assert_eq!(element.from, Vec3::ZERO);
    assert_eq!(element.to, Vec3::splat(16.0));
    assert_eq!(element.faces.len(), 1);
    assert_eq!(element.faces[&Direction::South].texture, "#layer");
}

#[test]
fn synthetic_item_element_without_bindings_is_bare() {
    let doc = ModelDocument::new("minecraft:air", ModelKind::Item);
    assert!(synthetic_item_element(&doc).faces.is_empty());
}
