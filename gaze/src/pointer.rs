//! Pointer state and the idle predicate that gates the two update paths.

#[cfg(test)]
#[path = "pointer_test.rs"]
mod pointer_test;

use crate::consts::{POINTER_IDLE_MS, STALE_POINTER_MS};
use crate::table::ScreenPoint;

/// Last known pointer position and when it last changed (host clock, ms).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    pub position: ScreenPoint,
    pub last_change_at_ms: f64,
}

impl PointerState {
    #[must_use]
    pub fn new(position: ScreenPoint, at_ms: f64) -> Self {
        Self { position, last_change_at_ms: at_ms }
    }

    /// Push the last change far into the past so the pointer reads as idle.
    pub fn force_stale(&mut self) {
        self.last_change_at_ms = STALE_POINTER_MS;
    }
}

/// Whether the idle animation should govern the frame table at `now_ms`.
///
/// A pointer that never moved is always idle.
#[must_use]
pub fn is_idle(pointer: Option<&PointerState>, now_ms: f64) -> bool {
    pointer.is_none_or(|p| now_ms - p.last_change_at_ms >= POINTER_IDLE_MS)
}
