use std::fmt;
use std::path::PathBuf;

/// Mouse button identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

/// Modifier keys state.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// Key press or release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// Text the key produces, or its name for non-printing keys (`"Return"`,
    /// `"BackSpace"`, `"Left"`, ...).
    pub value: String,
    /// Stable platform code of the physical key.
    pub keycode: u32,
    pub modifiers: Modifiers,
    pub repeat: bool,
}

/// File dropped onto a window.
#[derive(Debug, Clone, PartialEq)]
pub struct DropEvent {
    pub path: PathBuf,
    pub x: f32,
    pub y: f32,
}

/// Window-system event delivered to widget code.
///
/// Coordinates are physical pixels relative to the window's top-left corner,
/// the same space the drawing primitives use.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    ClickPress { button: MouseButton, x: f32, y: f32 },
    ClickRelease { button: MouseButton, x: f32, y: f32 },
    MouseMove { x: f32, y: f32 },
    /// Scroll amount in lines; pixel deltas are converted at 20 px per line.
    MouseScroll { x: f32, y: f32 },
    KeyPress(KeyEvent),
    KeyRelease(KeyEvent),
    WindowClose,
    Expose,
    Resize { width: u32, height: u32 },
    RedrawRequest,
    Drop(DropEvent),
}

impl Event {
    /// Pointer position carried by the event, if any.
    pub fn position(&self) -> Option<(f32, f32)> {
        match *self {
            Event::ClickPress { x, y, .. }
            | Event::ClickRelease { x, y, .. }
            | Event::MouseMove { x, y } => Some((x, y)),
            Event::Drop(ref d) => Some((d.x, d.y)),
            _ => None,
        }
    }
}

/// The key value of a key event (`GetKeyFromCode`).
pub fn key_name(event: &Event) -> Option<&str> {
    match event {
        Event::KeyPress(k) | Event::KeyRelease(k) => Some(&k.value),
        _ => None,
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::ClickPress { button, x, y } => write!(f, "click press {button:?} at ({x}, {y})"),
            Event::ClickRelease { button, x, y } => write!(f, "click release {button:?} at ({x}, {y})"),
            Event::MouseMove { x, y } => write!(f, "mouse move ({x}, {y})"),
            Event::MouseScroll { x, y } => write!(f, "scroll ({x}, {y})"),
            Event::KeyPress(k) => write!(f, "key press {:?}", k.value),
            Event::KeyRelease(k) => write!(f, "key release {:?}", k.value),
            Event::WindowClose => f.write_str("window close"),
            Event::Expose => f.write_str("expose"),
            Event::Resize { width, height } => write!(f, "resize {width}x{height}"),
            Event::RedrawRequest => f.write_str("redraw request"),
            Event::Drop(d) => write!(f, "drop {} at ({}, {})", d.path.display(), d.x, d.y),
        }
    }
}
