//! Gaze engine for the turntable avatar grid.
//!
//! Every avatar is a ring of twelve pre-captured frames. This crate decides
//! which frame each avatar shows: while the pointer moves, every avatar turns
//! toward it; once the pointer rests for a few seconds, a canned idle pattern
//! takes over. It also carries the capture-side state machine that produces
//! those twelve frames, and the account index document shared with the
//! upload server.
//!
//! Everything here is single-threaded and synchronous. The host (a browser
//! shell, or a test) feeds timestamps and pointer positions in and reads the
//! resulting frame table out.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`selector`] | Pointer-driven frame selection (angle to frame index) |
//! | [`idle`] | Idle animation patterns and [`idle::IdleMode`] |
//! | [`engine`] | [`engine::GazeEngine`], the owner of all per-avatar tables |
//! | [`pointer`] | Pointer state and the idle predicate |
//! | [`table`] | Avatar ids, frame indices and the position/frame tables |
//! | [`subscription`] | Scoped listener registry with drop-based teardown |
//! | [`view`] | The mounted Show view wiring window events to the engine |
//! | [`capture`] | Countdown/capture/results state machine for the editor |
//! | [`accounts`] | `accounts.json` wire document and frame image naming |
//! | [`consts`] | Shared numeric constants |

pub mod accounts;
pub mod capture;
pub mod consts;
pub mod engine;
pub mod idle;
pub mod pointer;
pub mod selector;
pub mod subscription;
pub mod table;
pub mod view;
