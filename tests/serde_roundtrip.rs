//! Replica state survives a trip through a wire format.

#![cfg(feature = "serde")]

use lww_dict::events::DictOp;
use lww_dict::prelude::*;

fn ts(secs: f64) -> Timestamp {
    Timestamp::try_from(secs).unwrap()
}

#[test]
fn replica_state_survives_json() {
    let mut d: LWWDict<String, Vec<u8>> = LWWDict::new();
    d.add_with_timestamp("a".into(), vec![1, 2], ts(10.25));
    d.add_with_timestamp("b".into(), vec![3], ts(11.0));
    d.remove_with_timestamp("b".into(), ts(12.0));

    let json = serde_json::to_string(&d).unwrap();
    let back: LWWDict<String, Vec<u8>> = serde_json::from_str(&json).unwrap();

    assert_eq!(back, d);
    assert_eq!(back.lookup(&"a".to_string()), Some(&vec![1, 2]));
    assert_eq!(back.lookup(&"b".to_string()), None);
}

#[test]
fn received_state_merges_like_local_state() {
    let mut local: LWWDict<String, u32> = LWWDict::new();
    local.add_with_timestamp("k".into(), 20, ts(10.0));

    let mut remote: LWWDict<String, u32> = LWWDict::new();
    remote.add_with_timestamp("k".into(), 33, ts(13.0));
    let wire = serde_json::to_vec(&remote).unwrap();

    let received: LWWDict<String, u32> = serde_json::from_slice(&wire).unwrap();
    local.merge(&received);
    assert_eq!(local.lookup(&"k".to_string()), Some(&33));
}

#[test]
fn timestamps_are_plain_seconds_on_the_wire() {
    assert_eq!(serde_json::to_string(&ts(1.5)).unwrap(), "1.5");
    let op: DictOp<String, u32> = serde_json::from_str(
        r#"{"Remove":{"key":"k","timestamp":12.0}}"#,
    )
    .unwrap();
    assert_eq!(op, DictOp::remove("k".to_string(), ts(12.0)));
}

#[test]
fn negative_zero_is_normalized_on_decode() {
    let decoded: Timestamp = serde_json::from_str("-0.0").unwrap();
    assert_eq!(decoded, Timestamp::ZERO);
}
