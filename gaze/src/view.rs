//! The mounted Show view.
//!
//! [`WindowEvents`] stands in for the host window: pointer moves, resizes
//! and the idle timer each have their own [`Listeners`]. [`ShowView::mount`]
//! wires a [`GazeEngine`] to those sources and holds the resulting
//! subscriptions; dropping the view tears all of them down.
//!
//! Handlers never render. They set a redraw flag that the host drains with
//! [`ShowView::take_redraw`] once per animation frame.

#[cfg(test)]
#[path = "view_test.rs"]
mod view_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use crate::consts::IDLE_TICK_MS;
use crate::engine::{GazeEngine, LayoutSource};
use crate::subscription::{Listeners, Subscription};
use crate::table::ScreenPoint;

/// Pointer moved to `position` (page coordinates) at `at_ms`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerMove {
    pub position: ScreenPoint,
    pub at_ms: f64,
}

/// The viewport was resized; avatar centers must be re-measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resize;

/// The idle timer fired at `at_ms`. The host emits one every [`Tick::PERIOD`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub at_ms: f64,
}

impl Tick {
    pub const PERIOD: Duration = Duration::from_millis(IDLE_TICK_MS);
}

/// Event sources provided by the host window.
#[derive(Default)]
pub struct WindowEvents {
    pub pointer_move: Listeners<PointerMove>,
    pub resize: Listeners<Resize>,
    pub tick: Listeners<Tick>,
}

impl WindowEvents {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total listeners across all sources.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.pointer_move.len() + self.resize.len() + self.tick.len()
    }
}

pub struct ShowView {
    engine: Rc<RefCell<GazeEngine>>,
    redraw: Rc<Cell<bool>>,
    subscriptions: Vec<Subscription>,
}

impl ShowView {
    /// Measure the initial layout and subscribe the engine to `events`.
    pub fn mount<L>(events: &WindowEvents, engine: Rc<RefCell<GazeEngine>>, layout: L) -> Self
    where
        L: LayoutSource + 'static,
    {
        let layout = Rc::new(layout);
        let redraw = Rc::new(Cell::new(false));

        if let Ok(mut e) = engine.try_borrow_mut() {
            redraw.set(e.measure_layout(layout.as_ref()));
        }

        let on_move = {
            let engine = Rc::clone(&engine);
            let redraw = Rc::clone(&redraw);
            events.pointer_move.subscribe(move |event: &PointerMove| {
                if let Ok(mut e) = engine.try_borrow_mut() {
                    if e.pointer_moved(event.position, event.at_ms) {
                        redraw.set(true);
                    }
                }
            })
        };

        let on_resize = {
            let engine = Rc::clone(&engine);
            let redraw = Rc::clone(&redraw);
            events.resize.subscribe(move |_: &Resize| {
                if let Ok(mut e) = engine.try_borrow_mut() {
                    if e.measure_layout(layout.as_ref()) {
                        redraw.set(true);
                    }
                }
            })
        };

        let on_tick = {
            let engine = Rc::clone(&engine);
            let redraw = Rc::clone(&redraw);
            events.tick.subscribe(move |event: &Tick| {
                if let Ok(mut e) = engine.try_borrow_mut() {
                    if e.tick(event.at_ms) {
                        redraw.set(true);
                    }
                }
            })
        };

        Self { engine, redraw, subscriptions: vec![on_move, on_resize, on_tick] }
    }

    #[must_use]
    pub fn engine(&self) -> &Rc<RefCell<GazeEngine>> {
        &self.engine
    }

    /// Whether something changed since the last call. Clears the flag.
    pub fn take_redraw(&self) -> bool {
        self.redraw.replace(false)
    }

    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }
}
