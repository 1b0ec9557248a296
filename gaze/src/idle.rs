//! Idle animation patterns.
//!
//! When the pointer rests, the grid keeps moving on its own. Each
//! [`IdleMode`] is a small function of the clock (and, for `Random`, of an
//! RNG) that rewrites the frame table on every 25 ms tick. Patterns that
//! alternate between avatars use the position in the ordered avatar list,
//! never map iteration order.

#[cfg(test)]
#[path = "idle_test.rs"]
mod idle_test;

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::consts::{FRAME_COUNT, RANDOM_STEP_PROBABILITY};
use crate::table::{AvatarId, FrameIndex, FrameTable, displayed_frame, set_frame, wrap_frame};

/// Which canned pattern runs while the pointer is idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum IdleMode {
    /// Each avatar occasionally turns one step left or right.
    #[default]
    #[serde(rename = "RANDOM")]
    Random,
    /// Neighbours nod between two frames facing down.
    #[serde(rename = "NODDING")]
    Nodding,
    /// Neighbours rock between two side-facing frames.
    #[serde(rename = "ROCK")]
    Rock,
    /// Every avatar spins in lockstep.
    #[serde(rename = "ROCK_2")]
    Rock2,
    /// Every avatar sweeps back and forth along a sine.
    #[serde(rename = "ARC")]
    Arc,
}

impl IdleMode {
    /// All modes in the order they are offered to the user.
    pub const ALL: [Self; 5] = [Self::Random, Self::Nodding, Self::Rock, Self::Rock2, Self::Arc];

    /// Wire/form value, e.g. `ROCK_2`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Random => "RANDOM",
            Self::Nodding => "NODDING",
            Self::Rock => "ROCK",
            Self::Rock2 => "ROCK_2",
            Self::Arc => "ARC",
        }
    }

    /// Human-readable label for the mode picker.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Random => "Random",
            Self::Nodding => "Nodding",
            Self::Rock => "Rock",
            Self::Rock2 => "Rock 2",
            Self::Arc => "Arc",
        }
    }
}

impl fmt::Display for IdleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown idle mode name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownIdleMode(pub String);

impl fmt::Display for UnknownIdleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown idle mode: {}", self.0)
    }
}

impl std::error::Error for UnknownIdleMode {}

impl FromStr for IdleMode {
    type Err = UnknownIdleMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownIdleMode(s.to_owned()))
    }
}

// =============================================================================
// CLOCK-DRIVEN CYCLES
// =============================================================================

/// 0/1 toggle shared by `Nodding` and `Rock`; flips every quarter second.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn two_phase_cycle(now_ms: f64) -> FrameIndex {
    let steps = (2.0 * (now_ms / 1000.0) * 2.0).floor() as i64;
    usize::from(steps.rem_euclid(2) == 1)
}

/// Lockstep spin index for `Rock2`: one and a half turns per second.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn spin_cycle(now_ms: f64) -> FrameIndex {
    wrap_frame((12.0 * (now_ms / 1000.0) * 1.5).floor() as i64)
}

/// Sine sweep index for `Arc`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn arc_cycle(now_ms: f64) -> FrameIndex {
    let sin = (1.0 + (now_ms * 0.0015).sin()) / 2.0;
    wrap_frame((12.0 * sin).floor() as i64)
}

// =============================================================================
// ANIMATOR
// =============================================================================

/// Runs the active [`IdleMode`] over the frame table.
pub struct IdleAnimator {
    mode: IdleMode,
    rng: StdRng,
}

impl Default for IdleAnimator {
    fn default() -> Self {
        Self::new(IdleMode::default())
    }
}

impl IdleAnimator {
    #[must_use]
    pub fn new(mode: IdleMode) -> Self {
        Self { mode, rng: StdRng::from_os_rng() }
    }

    /// Animator with a fixed RNG seed, for reproducible `Random` walks.
    #[must_use]
    pub fn with_seed(mode: IdleMode, seed: u64) -> Self {
        Self { mode, rng: StdRng::seed_from_u64(seed) }
    }

    #[must_use]
    pub fn mode(&self) -> IdleMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: IdleMode) {
        self.mode = mode;
    }

    /// Apply one tick of the active pattern. Returns whether a redraw is needed.
    ///
    /// `Random` reports a change only when some index actually moved; the
    /// other patterns report one whenever there is an avatar to write.
    pub fn tick(&mut self, avatars: &[AvatarId], frames: &mut FrameTable, now_ms: f64) -> bool {
        match self.mode {
            IdleMode::Random => self.random_walk(avatars, frames),
            IdleMode::Nodding => {
                let cycle = two_phase_cycle(now_ms);
                alternate(avatars, frames, 10 - cycle, 3 + cycle)
            }
            IdleMode::Rock => {
                let cycle = two_phase_cycle(now_ms);
                alternate(avatars, frames, 2 + cycle, 8 - cycle)
            }
            IdleMode::Rock2 => fill(avatars, frames, spin_cycle(now_ms)),
            IdleMode::Arc => fill(avatars, frames, arc_cycle(now_ms)),
        }
    }

    #[allow(clippy::cast_possible_wrap)]
    fn random_walk(&mut self, avatars: &[AvatarId], frames: &mut FrameTable) -> bool {
        let mut changed = false;
        for id in avatars {
            if self.rng.random::<f64>() >= RANDOM_STEP_PROBABILITY {
                continue;
            }
            let step = if self.rng.random_bool(0.5) { 1 } else { -1 };
            let current = displayed_frame(frames, id) as i64;
            changed |= set_frame(frames, id, wrap_frame(current + step));
        }
        changed
    }
}

/// Even list positions get `even`, odd positions get `odd`.
fn alternate(avatars: &[AvatarId], frames: &mut FrameTable, even: FrameIndex, odd: FrameIndex) -> bool {
    for (i, id) in avatars.iter().enumerate() {
        let index = if i % 2 == 0 { even } else { odd };
        frames.insert(id.clone(), index % FRAME_COUNT);
    }
    !avatars.is_empty()
}

fn fill(avatars: &[AvatarId], frames: &mut FrameTable, index: FrameIndex) -> bool {
    for id in avatars {
        frames.insert(id.clone(), index % FRAME_COUNT);
    }
    !avatars.is_empty()
}
