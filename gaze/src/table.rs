//! Avatar identifiers, frame indices, and the per-avatar tables.
//!
//! The tables are plain maps keyed by [`AvatarId`]. Iteration order never
//! comes from the maps: callers pass the ordered avatar list alongside them.

#[cfg(test)]
#[path = "table_test.rs"]
mod table_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::consts::FRAME_COUNT;

/// Account name identifying one avatar.
pub type AvatarId = String;

/// Which of the twelve captured frames an avatar shows. Always in `[0, 12)`.
pub type FrameIndex = usize;

/// A point in page (document) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Measured avatar centers. Absent until the first layout pass.
pub type PositionTable = HashMap<AvatarId, ScreenPoint>;

/// Current frame per avatar. Absent means frame 0 is displayed.
pub type FrameTable = HashMap<AvatarId, FrameIndex>;

/// Wrap any signed step result into `[0, FRAME_COUNT)`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss)]
pub fn wrap_frame(value: i64) -> FrameIndex {
    value.rem_euclid(FRAME_COUNT as i64) as FrameIndex
}

/// Frame shown for `id`, falling back to 0 when nothing was computed yet.
#[must_use]
pub fn displayed_frame(frames: &FrameTable, id: &str) -> FrameIndex {
    frames.get(id).copied().unwrap_or(0)
}

/// Write `index` for `id`, returning whether the table changed.
pub fn set_frame(frames: &mut FrameTable, id: &str, index: FrameIndex) -> bool {
    match frames.get_mut(id) {
        Some(current) if *current == index => false,
        Some(current) => {
            *current = index;
            true
        }
        None => {
            frames.insert(id.to_owned(), index);
            true
        }
    }
}
