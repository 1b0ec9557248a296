//! Capture flow for recording a new avatar.
//!
//! The editor walks through four modes: idle, a 3-2-1 countdown, capturing
//! (the user turns around while twelve frames are grabbed over five seconds)
//! and results. `CaptureMachine` models that as an explicit state machine
//! with a single armed timer. The host feeds it the clock through
//! [`CaptureMachine::advance`], which fires every due timer in order and
//! returns what happened. Grabbing pixels and uploading stay with the host.
//!
//! Because the pending timer is a value rather than a chain of nested
//! callbacks, [`CaptureMachine::cancel`] can abort mid-countdown or
//! mid-capture cleanly.

#[cfg(test)]
#[path = "capture_test.rs"]
mod capture_test;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{COUNTDOWN_FROM, COUNTDOWN_STEP_MS, FRAME_COUNT, TURN_TIME_MS};
use crate::table::FrameIndex;

/// Interval between two frame grabs while capturing.
#[allow(clippy::cast_precision_loss)]
pub const CAPTURE_INTERVAL_MS: f64 = TURN_TIME_MS / FRAME_COUNT as f64;

/// Current editor mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureMode {
    /// Waiting for the user to press start.
    Idle,
    /// Counting down before capture; `countdown` is the number on screen.
    Prepare { countdown: u32 },
    /// Grabbing frames while the user turns.
    Capturing,
    /// All frames grabbed; waiting for send or retry.
    Results,
}

/// Something the host must react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureEvent {
    /// Show this countdown value.
    Countdown(u32),
    /// Grab the current camera image as frame `index`.
    CaptureFrame(FrameIndex),
    /// Capture is over; show the results.
    Finished,
}

/// One pending transition and when it is due.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Timer {
    due_at_ms: f64,
    action: TimerAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerAction {
    CountdownStep,
    GrabFrame,
    Finish,
}

/// Form fields for one frame upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    pub account_name: String,
    pub index: FrameIndex,
}

#[derive(Debug, Clone)]
pub struct CaptureMachine {
    mode: CaptureMode,
    timer: Option<Timer>,
    capture_started_at_ms: f64,
    next_frame: FrameIndex,
    captured: Vec<FrameIndex>,
    direction: f64,
    last_frame_at_ms: Option<f64>,
}

impl Default for CaptureMachine {
    fn default() -> Self {
        Self {
            mode: CaptureMode::Idle,
            timer: None,
            capture_started_at_ms: 0.0,
            next_frame: 0,
            captured: Vec::new(),
            direction: 0.0,
            last_frame_at_ms: None,
        }
    }
}

impl CaptureMachine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn mode(&self) -> CaptureMode {
        self.mode
    }

    /// Frames grabbed so far, in capture order.
    #[must_use]
    pub fn captured(&self) -> &[FrameIndex] {
        &self.captured
    }

    /// Rotation guide position, in turns.
    #[must_use]
    pub fn direction(&self) -> f64 {
        self.direction
    }

    /// When the next timer fires, if one is armed.
    #[must_use]
    pub fn next_deadline(&self) -> Option<f64> {
        self.timer.map(|t| t.due_at_ms)
    }

    /// Start the countdown. Ignored unless idle.
    pub fn start(&mut self, now_ms: f64) -> Vec<CaptureEvent> {
        if self.mode != CaptureMode::Idle {
            return Vec::new();
        }
        self.mode = CaptureMode::Prepare { countdown: COUNTDOWN_FROM };
        self.arm(now_ms + COUNTDOWN_STEP_MS, TimerAction::CountdownStep);
        vec![CaptureEvent::Countdown(COUNTDOWN_FROM)]
    }

    /// Fire every timer due at or before `now_ms`, in order.
    pub fn advance(&mut self, now_ms: f64) -> Vec<CaptureEvent> {
        let mut events = Vec::new();
        while let Some(timer) = self.timer {
            if timer.due_at_ms > now_ms {
                break;
            }
            self.timer = None;
            self.fire(timer, &mut events);
        }
        events
    }

    /// Per-frame animation update. Advances the rotation guide while capturing.
    pub fn animate(&mut self, now_ms: f64) {
        let previous = self.last_frame_at_ms.replace(now_ms);
        let Some(previous) = previous else {
            return;
        };
        let delta = now_ms - previous;
        if delta > 0.0 && self.mode == CaptureMode::Capturing {
            self.direction += delta / TURN_TIME_MS;
        }
    }

    /// Abort a countdown or capture in progress and return to idle.
    ///
    /// Returns whether anything was cancelled.
    pub fn cancel(&mut self) -> bool {
        match self.mode {
            CaptureMode::Prepare { .. } | CaptureMode::Capturing => {
                self.reset();
                true
            }
            CaptureMode::Idle | CaptureMode::Results => false,
        }
    }

    /// Discard the results and go back to idle.
    pub fn retry(&mut self) -> bool {
        if self.mode != CaptureMode::Results {
            return false;
        }
        self.reset();
        true
    }

    /// One upload per captured frame, all under `account_name`.
    #[must_use]
    pub fn upload_plan(&self, account_name: &str) -> Vec<UploadRequest> {
        self.captured
            .iter()
            .map(|&index| UploadRequest { account_name: account_name.to_owned(), index })
            .collect()
    }

    fn fire(&mut self, timer: Timer, events: &mut Vec<CaptureEvent>) {
        match timer.action {
            TimerAction::CountdownStep => match self.mode {
                CaptureMode::Prepare { countdown } if countdown > 1 => {
                    let next = countdown - 1;
                    self.mode = CaptureMode::Prepare { countdown: next };
                    self.arm(timer.due_at_ms + COUNTDOWN_STEP_MS, TimerAction::CountdownStep);
                    events.push(CaptureEvent::Countdown(next));
                }
                CaptureMode::Prepare { .. } => self.begin_capture(timer.due_at_ms, events),
                _ => {}
            },
            TimerAction::GrabFrame => {
                self.grab(events);
                self.arm_after_grab();
            }
            TimerAction::Finish => {
                self.mode = CaptureMode::Results;
                events.push(CaptureEvent::Finished);
            }
        }
    }

    fn begin_capture(&mut self, at_ms: f64, events: &mut Vec<CaptureEvent>) {
        self.mode = CaptureMode::Capturing;
        self.capture_started_at_ms = at_ms;
        self.next_frame = 0;
        self.grab(events);
        self.arm_after_grab();
    }

    fn grab(&mut self, events: &mut Vec<CaptureEvent>) {
        let index = self.next_frame;
        self.captured.push(index);
        self.next_frame += 1;
        events.push(CaptureEvent::CaptureFrame(index));
    }

    #[allow(clippy::cast_precision_loss)]
    fn arm_after_grab(&mut self) {
        if self.next_frame < FRAME_COUNT {
            let due = self.capture_started_at_ms + self.next_frame as f64 * CAPTURE_INTERVAL_MS;
            self.arm(due, TimerAction::GrabFrame);
        } else {
            self.arm(self.capture_started_at_ms + TURN_TIME_MS, TimerAction::Finish);
        }
    }

    fn arm(&mut self, due_at_ms: f64, action: TimerAction) {
        self.timer = Some(Timer { due_at_ms, action });
    }

    fn reset(&mut self) {
        self.mode = CaptureMode::Idle;
        self.timer = None;
        self.next_frame = 0;
        self.captured.clear();
        self.direction = 0.0;
    }
}

/// Account name to upload under: the trimmed input, or random digits when blank.
pub fn resolve_account_name(input: &str, rng: &mut impl Rng) -> String {
    let trimmed = input.trim();
    if !trimmed.is_empty() {
        return trimmed.to_owned();
    }
    (0..16).map(|_| char::from(b'0' + rng.random_range(0..10u8))).collect()
}
