use super::*;

use serde_json::json;

#[test]
fn uv_descending_u_swaps_and_sets_horizontal_flip() {
    let face = Face::from_value(&json!({"uv": [16, 0, 0, 16], "texture": "#all"}));
    assert_eq!(
        face.uv,
        UvRect {
            x: 0,
            y: 0,
            w: 16,
            h: 16
        }
    );
    assert!(face.flip_x);
    assert!(!face.flip_y);
}

#[test]
fn uv_descending_both_axes_sets_both_flips() {
    let face = Face::from_value(&json!({"uv": [16, 16, 0, 0], "texture": "#all"}));
    assert_eq!(
        face.uv,
        UvRect {
            x: 0,
            y: 0,
            w: 16,
            h: 16
        }
    );
    assert!(face.flip_x);
    assert!(face.flip_y);
}

#[test]
fn uv_ascending_has_no_flips() {
    let face = Face::from_value(&json!({"uv": [0, 0, 16, 16], "texture": "#all"}));
    assert!(!face.flip_x);
    assert!(!face.flip_y);
}

#[test]
fn uv_equal_pair_counts_as_descending() {
    let face = Face::from_value(&json!({"uv": [4, 0, 4, 16], "texture": "#all"}));
    assert!(face.flip_x);
    assert_eq!(face.uv.w, 0);
}

#[test]
fn uv_fractional_coordinates_truncate() {
    let face = Face::from_value(&json!({"uv": [0.9, 1.9, 8.9, 15.9], "texture": "#all"}));
    assert_eq!(
        face.uv,
        UvRect {
            x: 0,
            y: 1,
            w: 8,
            h: 14
        }
    );
}

#[test]
fn missing_uv_defaults_to_full_tile() {
    let face = Face::from_value(&json!({"texture": "#side", "rotation": 90}));
    assert_eq!(face.uv, UvRect::default());
    assert_eq!(face.rotation, 90);
    assert_eq!(face.texture, "#side");
}

#[test]
fn element_parses_positions_rotation_and_faces() {
    let element = Element::from_value(&json!({
        "from": [1, 2, 3],
        "to": [15, 14, 13],
        "rotation": {"angle": 45.0, "axis": "y", "origin": [8, 8, 8]},
        "faces": {
            "up": {"texture": "#top"},
            "sideways": {"texture": "#bogus"}
        }
    }));
    assert_eq!(element.from, Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(element.to, Vec3::new(15.0, 14.0, 13.0));
    let rotation = element.rotation.unwrap();
    assert_eq!(rotation.angle, 45.0);
    assert_eq!(rotation.axis, Some(Axis::Y));
    assert_eq!(rotation.origin, Vec3::new(8.0, 8.0, 8.0));
    assert_eq!(element.faces.len(), 1);
    assert!(element.faces.contains_key(&Direction::Up));
}

#[test]
fn element_bad_arity_keeps_default_positions() {
    let element = Element::from_value(&json!({"from": [1, 2], "to": "oops"}));
    assert_eq!(element.from, Vec3::ZERO);
    assert_eq!(element.to, Vec3::ZERO);
}

#[test]
fn bindings_overwrite_in_place_keeps_order() {
    let mut bindings = TextureBindings::default();
    bindings.set("layer0", "item/a".to_string());
    bindings.set("particle", "item/b".to_string());
    bindings.set("layer0", "item/c".to_string());
    let entries: Vec<(&str, &str)> = bindings.iter().collect();
    assert_eq!(entries, vec![("layer0", "item/c"), ("particle", "item/b")]);
}

#[test]
fn displays_overwrite_whole_context() {
    let mut doc = ModelDocument::new("minecraft:stone", ModelKind::Block);
    doc.add_displays(&json!({"gui": {"scale": [1.0, 1.0, 1.0]}}));
    doc.add_displays(&json!({"gui": {"rotation": [30.0, 135.0, 0.0]}}));
    let gui = doc.gui_display().unwrap();
    assert_eq!(gui.rotation, [30.0, 135.0, 0.0]);
    // the second document replaced the context outright, scale included
    assert_eq!(gui.scale, [0.0, 0.0, 0.0]);
}

#[test]
fn display_without_scale_stays_zero() {
    let mut doc = ModelDocument::new("minecraft:stone", ModelKind::Block);
    doc.add_displays(&json!({"gui": {"rotation": [0.0, 0.0, 0.0]}}));
    assert_eq!(doc.gui_display().unwrap().scale, [0.0, 0.0, 0.0]);
}

#[test]
fn alias_chain_resolves_to_loaded_raster() {
    let mut doc = ModelDocument::new("minecraft:stone", ModelKind::Block);
    doc.textures.set("a", "#b".to_string());
    doc.textures.set("b", "block/stone".to_string());
    doc.rasters
        .insert("b".to_string(), Raster::filled(2, 2, [1, 2, 3, 4]));
    assert!(doc.texture("#a").is_some());
    assert!(doc.texture("#b").is_some());
    assert!(doc.texture("b").is_some());
}

#[test]
fn alias_loop_returns_none() {
    let mut doc = ModelDocument::new("minecraft:stone", ModelKind::Block);
    doc.textures.set("a", "#b".to_string());
    doc.textures.set("b", "#a".to_string());
    assert!(doc.texture("#a").is_none());
}

#[test]
fn unbound_reference_returns_none() {
    let doc = ModelDocument::new("minecraft:stone", ModelKind::Block);
    assert!(doc.texture("#missing").is_none());
}

#[test]
fn layer_keys_collapse_onto_shared_slot() {
    assert_eq!(normalize_texture_key("layer0"), "layer");
    assert_eq!(normalize_texture_key("layer7"), "layer");
    assert_eq!(normalize_texture_key("xlayer0"), "layer");
    assert_eq!(normalize_texture_key("layer"), "layer");
    assert_eq!(normalize_texture_key("layers"), "layers");
    assert_eq!(normalize_texture_key("particle"), "particle");
    assert_eq!(normalize_texture_key("overlay"), "overlay");
}
