use super::*;

#[test]
fn wrap_frame_keeps_in_range_values() {
    assert_eq!(wrap_frame(0), 0);
    assert_eq!(wrap_frame(11), 11);
}

#[test]
fn wrap_frame_wraps_negative_steps() {
    assert_eq!(wrap_frame(-1), 11);
    assert_eq!(wrap_frame(-13), 11);
}

#[test]
fn wrap_frame_wraps_overflowing_steps() {
    assert_eq!(wrap_frame(12), 0);
    assert_eq!(wrap_frame(25), 1);
}

#[test]
fn displayed_frame_defaults_to_zero() {
    let frames = FrameTable::new();
    assert_eq!(displayed_frame(&frames, "alice"), 0);
}

#[test]
fn set_frame_reports_creation_as_change() {
    let mut frames = FrameTable::new();
    assert!(set_frame(&mut frames, "alice", 0));
    assert_eq!(frames.get("alice"), Some(&0));
}

#[test]
fn set_frame_same_value_is_not_a_change() {
    let mut frames = FrameTable::new();
    frames.insert("alice".into(), 4);
    assert!(!set_frame(&mut frames, "alice", 4));
    assert!(set_frame(&mut frames, "alice", 5));
    assert_eq!(displayed_frame(&frames, "alice"), 5);
}
