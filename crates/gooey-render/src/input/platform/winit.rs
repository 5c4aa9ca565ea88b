use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{Key, ModifiersState, NamedKey, PhysicalKey};

use crate::input::{DropEvent, Event, InputState, KeyEvent, Modifiers, MouseButton};

/// Pixels per scroll line when the platform reports pixel deltas.
const PIXELS_PER_LINE: f32 = 20.0;

/// Translates a winit `WindowEvent` into an [`Event`], updating `state`.
///
/// Returns `None` for events not represented by the input subsystem.
/// Resize, close and redraw are handled by the runtime directly.
pub(crate) fn translate_window_event(state: &mut InputState, event: &WindowEvent) -> Option<Event> {
    let ev = match event {
        WindowEvent::ModifiersChanged(m) => {
            state.modifiers = map_modifiers(m.state());
            return None;
        }

        WindowEvent::Focused(f) => {
            state.set_focused(*f);
            return None;
        }

        WindowEvent::CursorLeft { .. } => {
            state.pointer_left();
            return None;
        }

        WindowEvent::CursorMoved { position, .. } => Event::MouseMove {
            x: position.x as f32,
            y: position.y as f32,
        },

        WindowEvent::MouseInput { state: st, button, .. } => {
            // winit 0.30 does not expose a cursor query; use the tracked position.
            let (x, y) = state.pointer();
            let button = map_mouse_button(*button);
            match st {
                ElementState::Pressed => Event::ClickPress { button, x, y },
                ElementState::Released => Event::ClickRelease { button, x, y },
            }
        }

        WindowEvent::MouseWheel { delta, .. } => {
            let (x, y) = match delta {
                MouseScrollDelta::LineDelta(x, y) => (*x, *y),
                MouseScrollDelta::PixelDelta(p) => {
                    (p.x as f32 / PIXELS_PER_LINE, p.y as f32 / PIXELS_PER_LINE)
                }
            };
            Event::MouseScroll { x, y }
        }

        WindowEvent::KeyboardInput { event, .. } => {
            let key = KeyEvent {
                value: key_value(&event.logical_key),
                keycode: map_keycode(event.physical_key),
                modifiers: state.modifiers,
                repeat: event.repeat,
            };
            match event.state {
                ElementState::Pressed => Event::KeyPress(key),
                ElementState::Released => Event::KeyRelease(key),
            }
        }

        WindowEvent::DroppedFile(path) => {
            let (x, y) = state.pointer();
            Event::Drop(DropEvent {
                path: path.clone(),
                x,
                y,
            })
        }

        _ => return None,
    };

    state.apply(&ev);
    Some(ev)
}

fn map_modifiers(m: ModifiersState) -> Modifiers {
    Modifiers {
        shift: m.shift_key(),
        ctrl: m.control_key(),
        alt: m.alt_key(),
        meta: m.super_key(),
    }
}

fn map_mouse_button(b: WinitMouseButton) -> MouseButton {
    match b {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Back,
        WinitMouseButton::Forward => MouseButton::Forward,
        WinitMouseButton::Other(v) => MouseButton::Other(v),
    }
}

fn map_keycode(pk: PhysicalKey) -> u32 {
    match pk {
        PhysicalKey::Code(code) => code as u32,
        // winit 0.30 uses NativeKeyCode; no stable numeric is guaranteed here.
        PhysicalKey::Unidentified(_) => 0,
    }
}

/// Widget-facing key value: produced text, or a keysym-style name.
fn key_value(key: &Key) -> String {
    match key {
        Key::Character(s) => s.to_string(),
        Key::Named(named) => named_key(*named),
        Key::Unidentified(_) | Key::Dead(_) => String::new(),
    }
}

fn named_key(named: NamedKey) -> String {
    let name = match named {
        NamedKey::Enter => "Return",
        NamedKey::Backspace => "BackSpace",
        NamedKey::Tab => "Tab",
        NamedKey::Escape => "Escape",
        NamedKey::Space => " ",
        NamedKey::Delete => "Delete",
        NamedKey::Insert => "Insert",
        NamedKey::Home => "Home",
        NamedKey::End => "End",
        NamedKey::PageUp => "Page_Up",
        NamedKey::PageDown => "Page_Down",
        NamedKey::ArrowUp => "Up",
        NamedKey::ArrowDown => "Down",
        NamedKey::ArrowLeft => "Left",
        NamedKey::ArrowRight => "Right",
        NamedKey::Shift => "Shift",
        NamedKey::Control => "Control",
        NamedKey::Alt => "Alt",
        NamedKey::Super => "Super",
        other => return format!("{other:?}"),
    };
    name.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_values() {
        assert_eq!(key_value(&Key::Character("x".into())), "x");
        assert_eq!(key_value(&Key::Named(NamedKey::Enter)), "Return");
        assert_eq!(key_value(&Key::Named(NamedKey::F5)), "F5");
    }

    #[test]
    fn clicks_use_tracked_pointer() {
        let mut state = InputState::default();
        state.apply(&Event::MouseMove { x: 12.0, y: 34.0 });
        let ev = translate_window_event(
            &mut state,
            &WindowEvent::MouseInput {
                device_id: winit::event::DeviceId::dummy(),
                state: ElementState::Pressed,
                button: WinitMouseButton::Left,
            },
        );
        assert_eq!(
            ev,
            Some(Event::ClickPress { button: MouseButton::Left, x: 12.0, y: 34.0 })
        );
        assert!(state.button_down(MouseButton::Left));
    }
}
