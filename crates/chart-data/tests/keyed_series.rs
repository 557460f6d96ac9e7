// File: crates/chart-data/tests/keyed_series.rs
// Purpose: Validate the XY series store: key generation, upsert, reindexing, bounds, listeners.

use std::cell::RefCell;
use std::rc::Rc;

use chart_data::{DataError, KeyedSeries};
use serde_json::json;

#[test]
fn add_generates_increasing_keys_per_series() {
    let mut xy = KeyedSeries::new();
    let a = xy.add("S1", Some(1.0), Some(2.0), false);
    let b = xy.add("S1", Some(2.0), Some(3.0), false);
    let c = xy.add("S2", Some(5.0), None, false);
    assert_eq!((a.as_str(), b.as_str(), c.as_str()), ("0", "1", "0"));
    assert_eq!(xy.series_count(), 2);
    assert_eq!(xy.item_index("S1", "1"), Some(1));
    assert_eq!(xy.item_index("S2", "0"), Some(0));

    // explicit key that collides with the counter is skipped over
    xy.add_by_key("S1", "2", Some(9.0), Some(9.0), false);
    let d = xy.add("S1", Some(3.0), Some(4.0), false);
    assert_eq!(d, "3");
}

#[test]
fn add_series_rejects_duplicates() {
    let mut xy = KeyedSeries::new();
    xy.add_series("S1", false).unwrap();
    assert!(matches!(xy.add_series("S1", false), Err(DataError::DuplicateKey { .. })));
    assert_eq!(xy.series_count(), 1);
}

#[test]
fn add_by_key_upserts_in_place() {
    let mut xy = KeyedSeries::new();
    xy.add_by_key("S1", "k1", Some(1.0), Some(1.0), false);
    xy.add_by_key("S1", "k2", Some(2.0), Some(2.0), false);
    xy.add_by_key("S1", "k1", Some(10.0), None, false);
    assert_eq!(xy.item_count(0), 2);
    assert_eq!(xy.x(0, 0), Some(10.0));
    assert_eq!(xy.y(0, 0), None);
    assert_eq!(xy.item_key(0, 1), Some("k2"));
}

#[test]
fn remove_reindexes_later_items() {
    let mut xy = KeyedSeries::new();
    let keys: Vec<String> = (0..5).map(|i| xy.add("S1", Some(i as f64), Some(i as f64), false)).collect();
    let before: Vec<usize> = keys.iter().map(|k| xy.item_index("S1", k).unwrap()).collect();

    xy.select("hilite", "S1", &keys[2], false);
    xy.set_item_property("S1", &keys[2], "label", json!("gone"), false).unwrap();
    xy.remove(0, 2, false).unwrap();

    assert_eq!(xy.item_index("S1", &keys[2]), None);
    for (k, pos) in keys.iter().zip(before) {
        match pos {
            p if p < 2 => assert_eq!(xy.item_index("S1", k), Some(p)),
            p if p > 2 => assert_eq!(xy.item_index("S1", k), Some(p - 1)),
            _ => {}
        }
    }
    assert!(!xy.is_selected("hilite", "S1", &keys[2]));
    assert_eq!(xy.get_item_property("S1", &keys[2], "label"), None);

    xy.remove_by_key("S1", &keys[4], false).unwrap();
    assert_eq!(xy.item_count(0), 3);
    assert!(matches!(xy.remove_by_key("S1", &keys[4], false), Err(DataError::KeyNotFound { .. })));
    assert!(matches!(xy.remove(0, 99, false), Err(DataError::IndexOutOfBounds { .. })));
}

#[test]
fn remove_series_reindexes_following_series() {
    let mut xy = KeyedSeries::new();
    for s in ["A", "B", "C"] {
        xy.add(s, Some(1.0), Some(1.0), false);
    }
    xy.set_series_property("B", "color", json!("blue"), false).unwrap();
    xy.remove_series("B", false).unwrap();
    assert_eq!(xy.series_keys(), ["A", "C"]);
    assert_eq!(xy.series_index("C"), Some(1));
    assert_eq!(xy.get_series_property("B", "color"), None);
    assert!(xy.remove_series("B", false).is_err());
}

#[test]
fn bounds_ignore_absent_coordinates() {
    let empty = KeyedSeries::new();
    assert_eq!(empty.bounds(), [f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY]);

    let mut xy = KeyedSeries::new();
    xy.add("S1", Some(-1.0), Some(5.0), false);
    xy.add("S1", Some(4.0), None, false);
    xy.add("S2", Some(2.0), Some(-3.0), false);
    xy.add("S2", None, Some(-1.0), false);
    assert_eq!(xy.xbounds(), [-1.0, 4.0]);
    assert_eq!(xy.ybounds(), [-3.0, 5.0]);
    assert_eq!(xy.bounds(), [-1.0, 4.0, -3.0, 5.0]);
}

#[test]
fn selection_is_per_series_item() {
    let mut xy = KeyedSeries::new();
    let k = xy.add("S1", Some(1.0), Some(1.0), false);
    xy.add("S2", Some(1.0), Some(1.0), false);
    xy.select("hilite", "S1", &k, false);
    assert!(xy.is_selected("hilite", "S1", &k));
    assert!(!xy.is_selected("hilite", "S2", &k), "item keys are only unique within a series");
    assert!(!xy.is_selected("other", "S1", &k));
}

#[test]
fn payload_generates_missing_keys_without_collisions() {
    let mut xy = KeyedSeries::new();
    xy.parse(
        r#"{"series": [{"seriesKey": "S1", "items": [
            {"x": 1.0, "y": 1.0}, {"key": "0", "x": 2.0, "y": null}, {"x": 3.0, "y": 3.0}]}]}"#,
        false,
    )
    .unwrap();
    assert_eq!(xy.item_count(0), 3);
    assert_eq!(xy.item_key(0, 1), Some("0"));
    let generated = [xy.item_key(0, 0).unwrap(), xy.item_key(0, 2).unwrap()];
    assert!(!generated.contains(&"0"));
    assert_ne!(generated[0], generated[1]);

    let back = KeyedSeries::from_payload(xy.to_payload()).unwrap();
    assert_eq!(back.to_payload(), xy.to_payload());

    xy.parse("{}", false).unwrap();
    assert!(xy.is_empty());
}

#[test]
fn absent_x_survives_payloads() {
    let mut xy = KeyedSeries::new();
    xy.parse(r#"{"series": [{"seriesKey": "S1", "items": [{"key": "a", "y": 2.0}]}]}"#, false)
        .unwrap();
    assert_eq!(xy.x(0, 0), None);
    assert_eq!(xy.y(0, 0), Some(2.0));
    assert_eq!(xy.xbounds(), [f64::INFINITY, f64::NEG_INFINITY]);
    let back = KeyedSeries::from_payload(xy.to_payload()).unwrap();
    assert_eq!(back.item_by_key("S1", "a").map(|i| (i.x, i.y)), Some((None, Some(2.0))));
}

#[test]
fn listeners_see_structural_changes_in_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut xy = KeyedSeries::new();
    let first = {
        let log = Rc::clone(&log);
        xy.add_listener(move |s: &KeyedSeries| log.borrow_mut().push(format!("first:{}", s.item_count(0))))
    };
    {
        let log = Rc::clone(&log);
        xy.add_listener(move |s: &KeyedSeries| log.borrow_mut().push(format!("second:{}", s.item_count(0))));
    }

    let k = xy.add("S1", Some(1.0), Some(1.0), false);
    xy.add_by_key("S1", "k", Some(2.0), None, false);
    assert!(log.borrow().is_empty(), "suppressed calls stay silent");

    xy.add("S1", Some(3.0), Some(3.0), true);
    assert_eq!(*log.borrow(), ["first:3", "second:3"]);

    xy.remove_by_key("S1", &k, true).unwrap();
    assert_eq!(log.borrow()[2..], ["first:2", "second:2"]);

    assert!(xy.add_series("S1", true).is_err());
    assert_eq!(log.borrow().len(), 4);

    assert!(xy.remove_listener(first));
    xy.remove_series("S1", true).unwrap();
    assert_eq!(log.borrow()[4..], ["second:0"]);
    assert_eq!(xy.listener_count(), 1);
}
