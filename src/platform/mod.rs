//! Platform abstraction layer
//!
//! Turns host key events into per-tick input. The simulation polls a
//! `TickInput` once per tick; this layer owns the held-key state between ticks.
//! On wasm32 the `web` module hosts the session in the browser.

#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::sim::TickInput;

/// Logical control a key maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Left,
    Right,
    Thrust,
    Fire,
}

impl Control {
    /// Map a `KeyboardEvent.code` string (Arrow keys, WASD, Space)
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowLeft" | "KeyA" => Some(Control::Left),
            "ArrowRight" | "KeyD" => Some(Control::Right),
            "ArrowUp" | "KeyW" => Some(Control::Thrust),
            "Space" => Some(Control::Fire),
            _ => None,
        }
    }
}

/// Held-key state between ticks
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyState {
    left: bool,
    right: bool,
    thrust: bool,
    fire_held: bool,
    /// Set on a fresh press, consumed by exactly one poll
    fire_latched: bool,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key transition. Returns true if the code is a game control.
    pub fn apply_key(&mut self, code: &str, pressed: bool) -> bool {
        let Some(control) = Control::from_code(code) else {
            return false;
        };
        self.apply(control, pressed);
        true
    }

    /// Record a control transition
    pub fn apply(&mut self, control: Control, pressed: bool) {
        match control {
            Control::Left => self.left = pressed,
            Control::Right => self.right = pressed,
            Control::Thrust => self.thrust = pressed,
            Control::Fire => {
                // Key repeat must not turn into autofire
                if pressed && !self.fire_held {
                    self.fire_latched = true;
                }
                self.fire_held = pressed;
            }
        }
    }

    /// Input for the next tick; a latched shot is handed out once
    pub fn poll(&mut self) -> TickInput {
        let input = TickInput {
            left: self.left,
            right: self.right,
            thrust: self.thrust,
            fire: self.fire_latched,
        };
        self.fire_latched = false;
        input
    }

    /// Drop everything held (focus loss)
    pub fn release_all(&mut self) {
        *self = Self::default();
    }
}
