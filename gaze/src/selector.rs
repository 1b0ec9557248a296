//! Pointer-driven frame selection.
//!
//! An avatar "looks at" the pointer by showing the frame whose capture angle
//! matches the direction from the avatar center to the pointer. Frame 0 is
//! the pointer sitting straight below the avatar; indices grow clockwise in
//! twelfths of a turn.

#[cfg(test)]
#[path = "selector_test.rs"]
mod selector_test;

use std::f64::consts::TAU;

use crate::consts::{FRAME_COUNT, GAZE_BIAS_PX};
use crate::table::{AvatarId, FrameIndex, FrameTable, PositionTable, ScreenPoint, set_frame};

/// Remainder of `value / limit` shifted into `[0, limit)`.
///
/// Non-finite input collapses to 0 so callers never see NaN leak into an index.
#[must_use]
pub fn cap(value: f64, limit: f64) -> f64 {
    if !value.is_finite() || !limit.is_finite() || limit <= 0.0 {
        return 0.0;
    }
    let rest = value % limit;
    if rest >= 0.0 {
        return rest;
    }
    // A tiny negative remainder plus `limit` can round up to `limit` itself.
    let wrapped = rest + limit;
    if wrapped >= limit { 0.0 } else { wrapped }
}

/// Direction of `(dx, dy)` as a fraction of a full turn, quarter-turn offset, in `[0, 1)`.
#[must_use]
pub fn angle_fraction(dx: f64, dy: f64) -> f64 {
    cap(dy.atan2(dx) / TAU + 0.25, 1.0)
}

/// Frame index for a turn fraction. Fractions are wrapped first, so `f` and `f + 1` agree.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn frame_for_fraction(fraction: f64) -> FrameIndex {
    let index = (cap(fraction, 1.0) * FRAME_COUNT as f64).floor() as FrameIndex;
    index.min(FRAME_COUNT - 1)
}

/// Frame an avatar centered at `center` should show for a pointer at `pointer`.
#[must_use]
pub fn select_frame(center: ScreenPoint, pointer: ScreenPoint) -> FrameIndex {
    let dx = center.x - pointer.x + GAZE_BIAS_PX;
    let dy = center.y - pointer.y + GAZE_BIAS_PX;
    frame_for_fraction(angle_fraction(dx, dy))
}

/// Recompute every measured avatar's frame for the given pointer.
///
/// Avatars without a measured position keep whatever they had. Returns
/// whether any entry changed, so the caller can skip a redraw.
pub fn update_frames(
    avatars: &[AvatarId],
    positions: &PositionTable,
    pointer: ScreenPoint,
    frames: &mut FrameTable,
) -> bool {
    let mut changed = false;
    for id in avatars {
        let Some(center) = positions.get(id) else {
            continue;
        };
        changed |= set_frame(frames, id, select_frame(*center, pointer));
    }
    changed
}
