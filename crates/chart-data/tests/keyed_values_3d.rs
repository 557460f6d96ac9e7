// File: crates/chart-data/tests/keyed_values_3d.rs
// Purpose: Validate the 3D cube: per-series sparse rows, global column backfill, payload reset, listeners.

use std::cell::RefCell;
use std::rc::Rc;

use chart_data::KeyedValues3D;
use serde_json::json;

fn sample() -> KeyedValues3D {
    let mut cube = KeyedValues3D::new();
    cube.add("S1", "R1", "C1", Some(1.0), false);
    cube.add("S1", "R2", "C1", Some(2.0), false);
    cube.add("S2", "R3", "C1", Some(3.0), false);
    cube
}

#[test]
fn rows_are_sparse_per_series() {
    let cube = sample();
    assert_eq!(cube.series_count(), 2);
    assert_eq!(cube.row_keys(), ["R1", "R2", "R3"]);
    assert_eq!(cube.series_row_keys("S1").unwrap(), ["R1", "R2"]);
    assert_eq!(cube.series_row_keys("S2").unwrap(), ["R3"]);

    // R1 exists globally but not within S2
    assert!(cube.row_index("R1").is_some());
    assert!(!cube.has_row("S2", "R1"));
    assert_eq!(cube.value_by_key("S2", "R1", "C1"), None);
    assert_eq!(cube.value(1, 0, 0), None);
    assert_eq!(cube.value(1, 2, 0), Some(3.0));
}

#[test]
fn new_column_backfills_every_series() {
    let mut cube = sample();
    cube.add("S2", "R3", "C2", Some(30.0), false);
    assert_eq!(cube.column_count(), 2);
    assert_eq!(cube.value_by_key("S1", "R1", "C2"), None);
    assert_eq!(cube.value_by_key("S1", "R2", "C2"), None);
    assert_eq!(cube.value_by_key("S2", "R3", "C2"), Some(30.0));
    assert_eq!(cube.value_by_key("S1", "R2", "C1"), Some(2.0));

    // a later row in S1 is sized to the current column count
    cube.add("S1", "R4", "C2", Some(4.0), false);
    assert_eq!(cube.value_by_key("S1", "R4", "C1"), None);
    assert_eq!(cube.value_by_key("S1", "R4", "C2"), Some(4.0));
    assert!(!cube.has_row("S2", "R4"));
}

#[test]
fn unknown_keys_resolve_to_absence() {
    let cube = sample();
    assert_eq!(cube.value_by_key("S9", "R1", "C1"), None);
    assert_eq!(cube.value_by_key("S1", "R1", "C9"), None);
    assert_eq!(cube.series_index("S9"), None);
    assert_eq!(cube.series_row_keys("S9"), None);
}

#[test]
fn empty_payload_loads_empty_cube() {
    let mut cube = sample();
    cube.parse("{}", false).unwrap();
    assert!(cube.is_empty());
    assert_eq!((cube.row_count(), cube.column_count(), cube.series_count()), (0, 0, 0));
    assert_eq!(cube.column_index("C1"), None);
    assert_eq!(cube.value_by_key("S1", "R1", "C1"), None);
}

#[test]
fn payload_load_resets_properties() {
    let mut cube = sample();
    cube.set_property("S1", "R1", "C1", "note", json!("x"), false).unwrap();
    cube.set_dataset_property("title", json!("cube"), false);
    assert!(cube.set_property("S2", "R1", "C1", "note", json!("x"), false).is_err());
    assert_eq!(cube.property_keys("S1", "R1", "C1"), ["note"]);

    cube.parse(
        r#"{"columnKeys": ["C1", "C2"], "rowKeys": ["R1"],
            "series": [{"seriesKey": "S1", "rows": [{"rowKey": "R1", "values": [1.0, 2.0]}]},
                       {"seriesKey": "S2", "rows": [{"rowKey": "R5", "values": [null, 5.0]}]}]}"#,
        false,
    )
    .unwrap();
    assert!(cube.property_keys("S1", "R1", "C1").is_empty());
    assert!(cube.dataset_property_keys().is_empty());
    assert_eq!(cube.row_keys(), ["R1", "R5"]);
    assert_eq!(cube.value_by_key("S2", "R5", "C2"), Some(5.0));
    assert_eq!(cube.value_by_key("S2", "R1", "C2"), None);

    let back = KeyedValues3D::from_payload(cube.to_payload()).unwrap();
    assert_eq!(back.to_payload(), cube.to_payload());
}

#[test]
fn selections_use_fully_qualified_cells() {
    let mut cube = sample();
    cube.select("hilite", "S1", "R1", "C1", false);
    assert!(cube.is_selected("hilite", "S1", "R1", "C1"));
    assert!(!cube.is_selected("hilite", "S2", "R1", "C1"));
    cube.unselect("hilite", "S1", "R1", "C1", false);
    assert!(!cube.is_selected("hilite", "S1", "R1", "C1"));
}

#[test]
fn listeners_see_structural_changes_in_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut cube = KeyedValues3D::new();
    let first = {
        let log = Rc::clone(&log);
        cube.add_listener(move |c: &KeyedValues3D| {
            log.borrow_mut().push(format!("first:{}/{}/{}", c.series_count(), c.row_count(), c.column_count()))
        })
    };
    {
        let log = Rc::clone(&log);
        cube.add_listener(move |c: &KeyedValues3D| {
            log.borrow_mut().push(format!("second:{}/{}/{}", c.series_count(), c.row_count(), c.column_count()))
        });
    }

    cube.add("S1", "R1", "C1", Some(1.0), false);
    cube.set_property("S1", "R1", "C1", "note", json!("n"), false).unwrap();
    assert!(log.borrow().is_empty(), "suppressed calls stay silent");

    cube.add("S2", "R2", "C2", Some(2.0), true);
    assert_eq!(*log.borrow(), ["first:2/2/2", "second:2/2/2"]);

    // the row exists globally but not in S2, so nothing changes and nobody hears
    assert!(cube.set_property("S2", "R1", "C1", "note", json!("x"), true).is_err());
    assert_eq!(log.borrow().len(), 2);

    assert!(cube.remove_listener(first));
    cube.parse("{}", true).unwrap();
    assert_eq!(log.borrow()[2..], ["second:0/0/0"]);
}
