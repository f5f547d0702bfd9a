//! Macroquad input as [`FrameEvent`]s.

use super::{EventSource, FrameEvent, Key, Ticker};
use macroquad::input::{get_keys_pressed, is_quit_requested, prevent_quit, KeyCode};
use macroquad::time::get_time;
use std::collections::VecDeque;

/// Event source over macroquad's input state plus a redraw [`Ticker`].
///
/// Macroquad only refreshes input between display frames, so [`pump`] must be
/// called once per frame before the driver drains the queue.
///
/// [`pump`]: MacroquadEvents::pump
pub struct MacroquadEvents {
    ticker: Ticker,
    queue: VecDeque<FrameEvent>,
}

impl MacroquadEvents {
    /// Needs a live macroquad context: takes over window-close handling so it
    /// arrives as [`FrameEvent::QuitRequested`].
    pub fn new(ticker: Ticker) -> Self {
        prevent_quit();
        Self {
            ticker,
            queue: VecDeque::new(),
        }
    }

    /// Queues this frame's quit request, key presses and timer tick.
    pub fn pump(&mut self) {
        if is_quit_requested() {
            self.queue.push_back(FrameEvent::QuitRequested);
        }
        for code in get_keys_pressed() {
            self.queue.push_back(FrameEvent::KeyPressed(map_key(code)));
        }
        if self.ticker.poll(get_time()) {
            self.queue.push_back(FrameEvent::TimerTick);
        }
    }
}

impl EventSource for MacroquadEvents {
    fn poll_event(&mut self) -> Option<FrameEvent> {
        self.queue.pop_front()
    }
}

/// Maps a macroquad key code to a driver [`Key`].
pub fn map_key(code: KeyCode) -> Key {
    match code {
        KeyCode::Escape => Key::Escape,
        KeyCode::Enter | KeyCode::KpEnter => Key::Enter,
        KeyCode::Space => Key::Space,
        KeyCode::Q => Key::Q,
        other => Key::Other(other as u32),
    }
}
