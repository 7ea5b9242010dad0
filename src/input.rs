//! Keyboard state tracking for the window layer.
//!
//! Tracks both instantaneous events (key just pressed this frame) and
//! continuous state (key held). Only the keys the show console uses are
//! named; everything else lands in `Other`.

use std::collections::HashSet;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};

/// Keys the show console responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// Digits 0-9, used for arming a property by index.
    Digit(u8),
    Up,
    Down,
    Space,
    S,
    Escape,
    Other(u32),
}

impl From<WinitKeyCode> for KeyCode {
    fn from(key: WinitKeyCode) -> Self {
        match key {
            WinitKeyCode::Digit0 => KeyCode::Digit(0),
            WinitKeyCode::Digit1 => KeyCode::Digit(1),
            WinitKeyCode::Digit2 => KeyCode::Digit(2),
            WinitKeyCode::Digit3 => KeyCode::Digit(3),
            WinitKeyCode::Digit4 => KeyCode::Digit(4),
            WinitKeyCode::Digit5 => KeyCode::Digit(5),
            WinitKeyCode::Digit6 => KeyCode::Digit(6),
            WinitKeyCode::Digit7 => KeyCode::Digit(7),
            WinitKeyCode::Digit8 => KeyCode::Digit(8),
            WinitKeyCode::Digit9 => KeyCode::Digit(9),
            WinitKeyCode::ArrowUp => KeyCode::Up,
            WinitKeyCode::ArrowDown => KeyCode::Down,
            WinitKeyCode::Space => KeyCode::Space,
            WinitKeyCode::KeyS => KeyCode::S,
            WinitKeyCode::Escape => KeyCode::Escape,
            _ => KeyCode::Other(key as u32),
        }
    }
}

/// Keyboard state tracker.
#[derive(Debug, Default)]
pub struct Input {
    keys_held: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,
    keys_released: HashSet<KeyCode>,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a key was pressed this frame (just went down).
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Check if a key is currently held down.
    pub fn key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Check if a key was released this frame (just went up).
    pub fn key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    /// The digit pressed this frame, if any. Lowest wins on a chord.
    pub fn digit_pressed(&self) -> Option<u8> {
        (0..10).find(|&d| self.key_pressed(KeyCode::Digit(d)))
    }

    /// Called at the start of each frame to clear per-frame state.
    pub(crate) fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
    }

    /// Process a winit window event.
    pub(crate) fn handle_event(&mut self, event: &WindowEvent) {
        if let WindowEvent::KeyboardInput { event, .. } = event {
            if let PhysicalKey::Code(keycode) = event.physical_key {
                let key = KeyCode::from(keycode);
                match event.state {
                    ElementState::Pressed => {
                        // Only fire pressed event if not already held (no repeat)
                        if !self.keys_held.contains(&key) {
                            self.keys_pressed.insert(key);
                        }
                        self.keys_held.insert(key);
                    }
                    ElementState::Released => {
                        self.keys_held.remove(&key);
                        self.keys_released.insert(key);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_state() {
        let mut input = Input::new();

        assert!(!input.key_held(KeyCode::Space));
        assert!(!input.key_pressed(KeyCode::Space));

        // Simulate key press via direct state manipulation (normally done via handle_event)
        input.keys_pressed.insert(KeyCode::Space);
        input.keys_held.insert(KeyCode::Space);

        assert!(input.key_held(KeyCode::Space));
        assert!(input.key_pressed(KeyCode::Space));

        // After begin_frame, pressed is cleared but held remains
        input.begin_frame();
        assert!(input.key_held(KeyCode::Space));
        assert!(!input.key_pressed(KeyCode::Space));
    }

    #[test]
    fn test_digit_pressed() {
        let mut input = Input::new();
        assert_eq!(input.digit_pressed(), None);
        input.keys_pressed.insert(KeyCode::Digit(7));
        assert_eq!(input.digit_pressed(), Some(7));
    }

    #[test]
    fn test_keycode_from_winit() {
        assert_eq!(KeyCode::from(WinitKeyCode::Digit3), KeyCode::Digit(3));
        assert_eq!(KeyCode::from(WinitKeyCode::ArrowUp), KeyCode::Up);
        assert_eq!(KeyCode::from(WinitKeyCode::KeyS), KeyCode::S);
        assert!(matches!(KeyCode::from(WinitKeyCode::KeyQ), KeyCode::Other(_)));
    }
}
