use std::collections::HashSet;

use super::types::{Event, Modifiers, MouseButton};

/// Pointer and modifier state of one window.
///
/// Platform events for clicks and drops carry no position, so the last
/// cursor position is tracked here and stamped onto them.
#[derive(Debug, Default)]
pub struct InputState {
    pub modifiers: Modifiers,
    pub focused: bool,
    /// Pointer position in physical pixels.
    pub pointer_pos: Option<(f32, f32)>,
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    pub fn apply(&mut self, event: &Event) {
        match event {
            Event::MouseMove { x, y } => self.pointer_pos = Some((*x, *y)),
            Event::ClickPress { button, x, y } => {
                self.pointer_pos = Some((*x, *y));
                self.buttons_down.insert(*button);
            }
            Event::ClickRelease { button, x, y } => {
                self.pointer_pos = Some((*x, *y));
                self.buttons_down.remove(button);
            }
            Event::KeyPress(k) | Event::KeyRelease(k) => self.modifiers = k.modifiers,
            _ => {}
        }
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if !focused {
            // Avoid stuck buttons when focus changes mid-press.
            self.buttons_down.clear();
        }
    }

    pub fn pointer_left(&mut self) {
        self.pointer_pos = None;
    }

    pub fn pointer(&self) -> (f32, f32) {
        self.pointer_pos.unwrap_or((0.0, 0.0))
    }

    pub fn button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clicks_track_buttons_and_position() {
        let mut s = InputState::default();
        s.apply(&Event::MouseMove { x: 5.0, y: 6.0 });
        assert_eq!(s.pointer(), (5.0, 6.0));

        s.apply(&Event::ClickPress { button: MouseButton::Left, x: 7.0, y: 8.0 });
        assert!(s.button_down(MouseButton::Left));
        assert_eq!(s.pointer(), (7.0, 8.0));

        s.apply(&Event::ClickRelease { button: MouseButton::Left, x: 7.0, y: 8.0 });
        assert!(!s.button_down(MouseButton::Left));
    }

    #[test]
    fn focus_loss_releases_buttons() {
        let mut s = InputState::default();
        s.apply(&Event::ClickPress { button: MouseButton::Right, x: 0.0, y: 0.0 });
        s.set_focused(false);
        assert!(s.buttons_down.is_empty());
    }
}
