//! Per-frame control loop: drains input, stops on quit/cancel, and runs one
//! compose-and-present cycle per redraw tick.

pub mod macroquad_events;

use crate::map::Map;
use crate::render::backend::RenderBackend;
use crate::render::compositor::compose;
use log::{info, trace};
use macroquad::prelude::BLANK;
use serde::{Deserialize, Serialize};

/// Keys the driver can be told about. Only the configured cancel key matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Escape.
    Escape,
    /// Enter or return.
    Enter,
    /// Space bar.
    Space,
    /// The Q key.
    Q,
    /// Any other key, by backend key code.
    Other(u32),
}

/// Input seen by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameEvent {
    /// The window or the user asked to quit.
    QuitRequested,
    /// A key went down.
    KeyPressed(Key),
    /// Redraw request from the fixed-period timer.
    TimerTick,
}

/// Non-blocking event queue. Returns `None` once drained.
pub trait EventSource {
    /// Next pending event, without blocking.
    fn poll_event(&mut self) -> Option<FrameEvent>;
}

/// Lifecycle of a [`FrameDriver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Still handling events.
    Running,
    /// Quit or cancel seen. Terminal.
    Stopped,
}

/// Runs one compose-and-present cycle per redraw tick until cancelled.
pub struct FrameDriver {
    state: DriverState,
    cancel_key: Key,
    frames: u64,
}

impl FrameDriver {
    /// Running driver that stops on quit or on `cancel_key`.
    pub fn new(cancel_key: Key) -> Self {
        Self {
            state: DriverState::Running,
            cancel_key,
            frames: 0,
        }
    }

    /// Current state.
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Number of compose-and-present cycles run so far.
    pub fn frames_presented(&self) -> u64 {
        self.frames
    }

    /// One loop iteration.
    ///
    /// Ticks drained in the same iteration coalesce into a single frame. A quit
    /// seen in the same batch as a tick still lets that frame finish; the
    /// driver stops afterwards.
    pub fn step<E, B>(&mut self, events: &mut E, target: &mut B, map: &Map) -> DriverState
    where
        E: EventSource + ?Sized,
        B: RenderBackend + ?Sized,
    {
        if self.state == DriverState::Stopped {
            return self.state;
        }

        let mut stop = false;
        let mut ticks = 0u32;
        while let Some(event) = events.poll_event() {
            match event {
                FrameEvent::QuitRequested => stop = true,
                FrameEvent::KeyPressed(key) if key == self.cancel_key => stop = true,
                FrameEvent::KeyPressed(_) => {}
                FrameEvent::TimerTick => ticks += 1,
            }
        }

        if ticks > 0 {
            if ticks > 1 {
                trace!("coalesced {} redraw ticks", ticks);
            }
            self.render(target, map);
        }

        if stop {
            info!("stop requested after {} frames", self.frames);
            self.state = DriverState::Stopped;
        }
        self.state
    }

    /// Steps until stopped. There is no other exit.
    pub fn run<E, B>(&mut self, events: &mut E, target: &mut B, map: &Map)
    where
        E: EventSource + ?Sized,
        B: RenderBackend + ?Sized,
    {
        while self.step(events, target, map) == DriverState::Running {}
    }

    fn render<B: RenderBackend + ?Sized>(&mut self, target: &mut B, map: &Map) {
        target.clear(BLANK);
        compose(target, map);
        target.present();
        self.frames += 1;
        trace!("presented frame {}", self.frames);
    }
}

/// Fixed-period redraw timer driven by an external clock.
#[derive(Debug, Clone)]
pub struct Ticker {
    period: f64,
    next_due: Option<f64>,
}

impl Ticker {
    /// `period` in seconds.
    pub fn new(period: f64) -> Self {
        Self {
            period,
            next_due: None,
        }
    }

    /// Period given in milliseconds.
    pub fn from_millis(ms: u64) -> Self {
        Self::new(ms as f64 / 1000.0)
    }

    /// `true` at most once per call when a period has elapsed. Periods missed
    /// while nobody polled are coalesced into that one tick.
    pub fn poll(&mut self, now: f64) -> bool {
        let Some(due) = self.next_due else {
            self.next_due = Some(now + self.period);
            return false;
        };
        if now < due {
            return false;
        }
        let mut next = due + self.period;
        if next <= now {
            next = now + self.period;
        }
        self.next_due = Some(next);
        true
    }
}
