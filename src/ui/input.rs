/// Keyboard input tracker.
///
/// Collects every key press that arrived since the previous frame, giving
/// "pressed this frame" semantics: one physical press is seen by exactly
/// one update.
///
/// Release events (only reported by terminals with keyboard enhancement)
/// are dropped. Repeat events are dropped too, so holding W walks one tile
/// per press rather than sliding across the map.

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub struct InputState {
    /// Key presses collected during the most recent drain_events() call.
    presses: Vec<KeyEvent>,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            presses: Vec::with_capacity(8),
        }
    }

    /// Drain all pending terminal events.
    /// Call this once per frame, before the update.
    pub fn drain_events(&mut self) {
        self.presses.clear();

        // Read all available events without blocking
        while poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    self.presses.push(key);
                }
                Ok(_) => {}
                Err(e) => {
                    log::warn!("terminal event read failed: {e}");
                    break;
                }
            }
        }
    }

    /// Was this key pressed this frame?
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.presses.iter().any(|k| k.code == code)
    }

    /// Convenience: was any of these keys pressed?
    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }

    /// First digit 1-9 pressed this frame, as a level number.
    pub fn digit_pressed(&self) -> Option<usize> {
        self.presses.iter().find_map(|k| match k.code {
            KeyCode::Char(c @ '1'..='9') => c.to_digit(10).map(|d| d as usize),
            _ => None,
        })
    }

    /// Check if any press this frame is Ctrl+C
    pub fn ctrl_c_pressed(&self) -> bool {
        self.presses.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }

    #[cfg(test)]
    fn push(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        self.presses.push(KeyEvent::new(code, modifiers));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_map_to_levels() {
        let mut kb = InputState::new();
        assert_eq!(kb.digit_pressed(), None);
        kb.push(KeyCode::Char('x'), KeyModifiers::NONE);
        kb.push(KeyCode::Char('3'), KeyModifiers::NONE);
        assert_eq!(kb.digit_pressed(), Some(3));
    }

    #[test]
    fn zero_is_not_a_level() {
        let mut kb = InputState::new();
        kb.push(KeyCode::Char('0'), KeyModifiers::NONE);
        assert_eq!(kb.digit_pressed(), None);
    }

    #[test]
    fn ctrl_c_needs_modifier() {
        let mut kb = InputState::new();
        kb.push(KeyCode::Char('c'), KeyModifiers::NONE);
        assert!(!kb.ctrl_c_pressed());
        kb.push(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(kb.ctrl_c_pressed());
    }

    #[test]
    fn any_pressed_matches_set() {
        let mut kb = InputState::new();
        kb.push(KeyCode::Left, KeyModifiers::NONE);
        assert!(kb.any_pressed(&[KeyCode::Char('a'), KeyCode::Left]));
        assert!(!kb.any_pressed(&[KeyCode::Right]));
    }
}
