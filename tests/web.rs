//! Browser tests for the JavaScript surface.

#![cfg(target_arch = "wasm32")]

use genealogy_graph_wasm::{
    GenealogyGraphWasm, build_hierarchy, build_unified_graph, compute_generations, layout_graph_by_generation,
    layout_hierarchy_tree, node_fill,
};
use js_sys::{Array, JSON, Reflect};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const PERSONNES: &str = r#"[
    {"name": "A", "genre": "Homme", "enfants": ["C"], "conjoints": ["B"]},
    {"name": "B", "genre": "Femme", "enfants": ["C"], "conjoints": ["A"]},
    {"name": "C", "parents": ["A", "B"]}
]"#;

fn parse(json: &str) -> JsValue {
    JSON::parse(json).unwrap()
}

fn field(value: &JsValue, key: &str) -> JsValue {
    Reflect::get(value, &JsValue::from_str(key)).unwrap()
}

fn array(value: JsValue) -> Array {
    Array::from(&value)
}

#[wasm_bindgen_test]
fn unified_graph_from_js() {
    let graph = build_unified_graph(parse(PERSONNES)).unwrap();
    assert_eq!(array(field(&graph, "nodes")).length(), 3);
    assert_eq!(array(field(&graph, "links")).length(), 3);
}

#[wasm_bindgen_test]
fn generations_and_bands_from_js() {
    let graph = build_unified_graph(parse(PERSONNES)).unwrap();
    let nodes = compute_generations(field(&graph, "nodes"), field(&graph, "links")).unwrap();
    let child = array(nodes.clone()).get(2);
    assert_eq!(field(&child, "generation").as_f64(), Some(1.0));

    let laid_out = layout_graph_by_generation(nodes, field(&graph, "links"), 800.0, 600.0).unwrap();
    let placed = array(field(&laid_out, "nodes"));
    let root = placed.get(0);
    assert_eq!(field(&root, "fy").as_f64(), field(&root, "y").as_f64());
    assert_eq!(array(field(&laid_out, "links")).length(), 3);
}

#[wasm_bindgen_test]
fn hierarchy_and_tree_from_js() {
    let forest = build_hierarchy(parse(PERSONNES)).unwrap();
    assert_eq!(array(forest.clone()).length(), 2);

    let tree = layout_hierarchy_tree(forest, 1000.0, 800.0).unwrap();
    // Two roots, their child under each, plus the synthetic root
    assert_eq!(array(field(&tree, "nodes")).length(), 5);
}

#[wasm_bindgen_test]
fn invalid_input_is_an_error() {
    assert!(build_unified_graph(JsValue::from_f64(3.0)).is_err());
}

#[wasm_bindgen_test]
fn viewer_runs_a_graph() {
    let viewer = GenealogyGraphWasm::new("", 800.0, 600.0, None).unwrap();
    assert!(viewer.graph().unwrap().is_null());

    let epoch = viewer.show_persons(parse(PERSONNES)).unwrap();
    assert_eq!(viewer.epoch(), epoch);
    assert!(viewer.tick(epoch, 0.016));
    assert!(!viewer.tick(epoch - 1.0, 0.016));
    assert_eq!(viewer.positions().length(), 6);

    assert_eq!(viewer.search("a"), vec!["A".to_string()]);
    viewer.clear();
    assert!(viewer.graph().unwrap().is_null());
}

#[wasm_bindgen_test]
fn viewer_accepts_partial_config() {
    let config = parse(r#"{"hit_radius": 5.0}"#);
    assert!(GenealogyGraphWasm::new("", 800.0, 600.0, Some(config)).is_ok());
}

#[wasm_bindgen_test]
fn fill_colours() {
    assert_eq!(node_fill("Femme"), "#ffe0e0");
    assert_eq!(node_fill("Homme"), "#e0e0ff");
    assert_eq!(node_fill("?"), "#f0f0f0");
}
