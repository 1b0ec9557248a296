//! The gaze engine: owner of every per-avatar table.
//!
//! `GazeEngine` holds the ordered avatar list, the measured positions, the
//! frame table and the pointer state, and decides per call which update path
//! applies. Pointer moves drive [`crate::selector::update_frames`]; periodic
//! ticks drive the [`IdleAnimator`], but only once the pointer is idle.
//!
//! Switching idle modes marks the pointer stale twice: immediately, and again
//! after [`RESTALE_DELAY_MS`] through a deferred action that fires on the first
//! call at or past its deadline. A pointer event landing inside that window is
//! overridden, so the new pattern shows without the usual inactivity wait.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use crate::accounts::frame_image_path;
use crate::consts::RESTALE_DELAY_MS;
use crate::idle::{IdleAnimator, IdleMode};
use crate::pointer::{PointerState, is_idle};
use crate::selector::update_frames;
use crate::table::{AvatarId, FrameIndex, FrameTable, PositionTable, ScreenPoint, displayed_frame};

/// Layout measurement collaborator: the center of an avatar in page coordinates.
pub trait LayoutSource {
    /// Returns `None` when the avatar is not laid out (yet).
    fn measure(&self, id: &str) -> Option<ScreenPoint>;
}

impl LayoutSource for PositionTable {
    fn measure(&self, id: &str) -> Option<ScreenPoint> {
        self.get(id).copied()
    }
}

#[derive(Default)]
pub struct GazeEngine {
    avatars: Vec<AvatarId>,
    positions: PositionTable,
    frames: FrameTable,
    pointer: Option<PointerState>,
    idle: IdleAnimator,
    /// Deadline of the pending second stale-marking, if a mode switch armed one.
    restale_at_ms: Option<f64>,
}

impl GazeEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine whose idle animator uses a fixed seed.
    #[must_use]
    pub fn with_animator(idle: IdleAnimator) -> Self {
        Self { idle, ..Self::default() }
    }

    // --- Data inputs ---

    /// Replace the ordered avatar list. Entries for avatars no longer listed are dropped.
    pub fn set_avatars(&mut self, avatars: Vec<AvatarId>) {
        self.positions.retain(|id, _| avatars.contains(id));
        self.frames.retain(|id, _| avatars.contains(id));
        self.avatars = avatars;
    }

    /// Replace measured positions, then re-aim at the pointer if one is known.
    pub fn set_positions(&mut self, positions: impl IntoIterator<Item = (AvatarId, ScreenPoint)>) -> bool {
        for (id, point) in positions {
            if self.avatars.contains(&id) {
                self.positions.insert(id, point);
            }
        }
        self.refresh_from_pointer()
    }

    /// Re-measure every listed avatar through `layout`, then re-aim at the pointer.
    ///
    /// Avatars the layout cannot measure keep their previous position.
    pub fn measure_layout(&mut self, layout: &impl LayoutSource) -> bool {
        for id in &self.avatars {
            if let Some(point) = layout.measure(id) {
                self.positions.insert(id.clone(), point);
            }
        }
        self.refresh_from_pointer()
    }

    /// Record a pointer move and turn every measured avatar toward it.
    pub fn pointer_moved(&mut self, position: ScreenPoint, now_ms: f64) -> bool {
        self.fire_due(now_ms);
        self.pointer = Some(PointerState::new(position, now_ms));
        update_frames(&self.avatars, &self.positions, position, &mut self.frames)
    }

    /// One idle tick. Runs the idle pattern only while the pointer is idle.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        self.fire_due(now_ms);
        if !self.pointer_is_idle(now_ms) {
            return false;
        }
        self.idle.tick(&self.avatars, &mut self.frames, now_ms)
    }

    /// Switch the idle pattern and make it take effect on the next tick.
    pub fn set_idle_mode(&mut self, mode: IdleMode, now_ms: f64) {
        self.idle.set_mode(mode);
        if let Some(pointer) = self.pointer.as_mut() {
            pointer.force_stale();
            self.restale_at_ms = Some(now_ms + RESTALE_DELAY_MS);
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn pointer_is_idle(&self, now_ms: f64) -> bool {
        is_idle(self.pointer.as_ref(), now_ms)
    }

    #[must_use]
    pub fn idle_mode(&self) -> IdleMode {
        self.idle.mode()
    }

    #[must_use]
    pub fn avatars(&self) -> &[AvatarId] {
        &self.avatars
    }

    #[must_use]
    pub fn positions(&self) -> &PositionTable {
        &self.positions
    }

    #[must_use]
    pub fn frames(&self) -> &FrameTable {
        &self.frames
    }

    #[must_use]
    pub fn pointer(&self) -> Option<&PointerState> {
        self.pointer.as_ref()
    }

    /// Frame currently displayed for `id` (0 until computed).
    #[must_use]
    pub fn frame_of(&self, id: &str) -> FrameIndex {
        displayed_frame(&self.frames, id)
    }

    /// Image path the renderer should show for `id`.
    #[must_use]
    pub fn frame_path(&self, id: &str) -> String {
        frame_image_path(id, self.frame_of(id))
    }

    /// Whether a deferred stale-marking is still pending.
    #[must_use]
    pub fn has_pending_restale(&self) -> bool {
        self.restale_at_ms.is_some()
    }

    // --- Internals ---

    fn refresh_from_pointer(&mut self) -> bool {
        let Some(pointer) = self.pointer else {
            return false;
        };
        update_frames(&self.avatars, &self.positions, pointer.position, &mut self.frames)
    }

    fn fire_due(&mut self, now_ms: f64) {
        let Some(at) = self.restale_at_ms else {
            return;
        };
        if now_ms < at {
            return;
        }
        self.restale_at_ms = None;
        if let Some(pointer) = self.pointer.as_mut() {
            pointer.force_stale();
        }
    }
}
