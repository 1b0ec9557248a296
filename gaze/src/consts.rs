//! Shared numeric constants for the gaze crate.

// ── Frames ──────────────────────────────────────────────────────

/// Number of frames captured per avatar (one full turn).
pub const FRAME_COUNT: usize = 12;

/// Offset added to both axes of the avatar-to-pointer delta, in pixels.
pub const GAZE_BIAS_PX: f64 = 10.0;

// ── Pointer / idle ──────────────────────────────────────────────

/// A pointer unchanged for at least this long is considered idle.
pub const POINTER_IDLE_MS: f64 = 3000.0;

/// Period of the idle animation tick.
pub const IDLE_TICK_MS: u64 = 25;

/// Timestamp written into the pointer state to mark it stale.
pub const STALE_POINTER_MS: f64 = -100_000.0;

/// Delay before the second stale-marking after an idle mode switch.
pub const RESTALE_DELAY_MS: f64 = 10.0;

/// Per-tick chance that an avatar steps in `Random` idle mode.
pub const RANDOM_STEP_PROBABILITY: f64 = 0.025;

// ── Capture ─────────────────────────────────────────────────────

/// Duration of one full turn while capturing.
pub const TURN_TIME_MS: f64 = 5000.0;

/// Countdown value shown when a capture is started.
pub const COUNTDOWN_FROM: u32 = 3;

/// Time between countdown steps.
pub const COUNTDOWN_STEP_MS: f64 = 1000.0;
