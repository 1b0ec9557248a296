#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn absent_pointer_is_idle() {
    assert!(is_idle(None, 0.0));
    assert!(is_idle(None, 123_456.0));
}

#[test]
fn recent_pointer_is_active() {
    let p = PointerState::new(ScreenPoint::new(1.0, 2.0), 1000.0);
    assert!(!is_idle(Some(&p), 1000.0));
    assert!(!is_idle(Some(&p), 3999.0));
}

#[test]
fn pointer_becomes_idle_at_threshold() {
    let p = PointerState::new(ScreenPoint::new(1.0, 2.0), 1000.0);
    assert!(is_idle(Some(&p), 4000.0));
    assert!(is_idle(Some(&p), 10_000.0));
}

#[test]
fn force_stale_makes_pointer_idle_immediately() {
    let mut p = PointerState::new(ScreenPoint::new(1.0, 2.0), 50.0);
    assert!(!is_idle(Some(&p), 60.0));
    p.force_stale();
    assert_eq!(p.last_change_at_ms, STALE_POINTER_MS);
    assert!(is_idle(Some(&p), 60.0));
    assert_eq!(p.position, ScreenPoint::new(1.0, 2.0));
}
