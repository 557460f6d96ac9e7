// File: crates/chart-data/tests/overlays.rs
// Purpose: Validate lazy property scopes and independence of named selections.

use chart_data::{Properties, PropertyOverlay, SelectionOverlay};
use serde_json::json;

#[test]
fn properties_allocate_on_first_write_and_keep_insertion_order() {
    let mut props = Properties::new();
    assert!(!props.is_allocated());
    assert!(props.keys().is_empty());

    props.set("zeta", json!(1));
    props.set("alpha", json!("two"));
    props.set("mid", json!([3]));
    assert!(props.is_allocated());
    assert_eq!(props.keys(), ["zeta", "alpha", "mid"]);
    assert_eq!(props.get("alpha"), Some(&json!("two")));

    props.clear();
    assert!(!props.is_allocated(), "clear discards the map itself");
    assert_eq!(props.get("zeta"), None);
}

#[test]
fn removing_last_property_releases_scope() {
    let mut props = Properties::new();
    props.set("only", json!(true));
    assert_eq!(props.remove("only"), Some(json!(true)));
    assert!(props.is_empty());
}

#[test]
fn overlay_scopes_are_sparse() {
    let mut overlay: PropertyOverlay<String> = PropertyOverlay::new();
    assert_eq!(overlay.allocated(), 0);
    overlay.set("row-1".to_string(), "color", json!("red"));
    assert_eq!(overlay.allocated(), 1);
    assert_eq!(overlay.get("row-1", "color"), Some(&json!("red")));
    assert_eq!(overlay.get("row-2", "color"), None);
    overlay.clear("row-1");
    assert_eq!(overlay.allocated(), 0);
}

#[test]
fn selections_are_independent() {
    let mut sel: SelectionOverlay<(String, String)> = SelectionOverlay::new();
    let item = ("R1".to_string(), "C1".to_string());
    let other = ("R2".to_string(), "C2".to_string());

    sel.select("hilite", item.clone());
    sel.select("other", other.clone());
    assert!(sel.is_selected("hilite", &item));
    assert!(!sel.is_selected("other", &item));
    assert!(!sel.is_selected("nope", &item), "unknown ids answer false");

    sel.clear_selection("hilite");
    assert!(!sel.is_selected("hilite", &item));
    assert!(sel.is_selected("other", &other));
    assert_eq!(sel.selection_ids(), ["other"]);

    assert!(!sel.unselect("missing", &other));
    assert!(sel.unselect("other", &other));
    assert!(sel.selected_items("other").is_empty());
}

#[test]
fn string_selections_accept_borrowed_keys() {
    let mut sel: SelectionOverlay<String> = SelectionOverlay::new();
    sel.select("hilite", "B".to_string());
    assert!(sel.is_selected("hilite", "B"));
    assert!(!sel.is_selected("hilite", "A"));
    assert!(sel.unselect("hilite", "B"));
    assert!(!sel.unselect("hilite", "B"));
}
