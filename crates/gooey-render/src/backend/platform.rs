//! Desktop services shared by the windowed backends.

use std::path::{Path, PathBuf};

use winit::window::CursorIcon;

use super::{CursorKind, FileFilter};

pub(crate) fn cursor_icon(kind: CursorKind) -> CursorIcon {
    match kind {
        CursorKind::Arrow => CursorIcon::Default,
        CursorKind::Hand => CursorIcon::Pointer,
        CursorKind::Text => CursorIcon::Text,
        CursorKind::Crosshair => CursorIcon::Crosshair,
        CursorKind::ResizeH => CursorIcon::EwResize,
        CursorKind::ResizeV => CursorIcon::NsResize,
    }
}

pub(crate) fn clipboard_text() -> Option<String> {
    match arboard::Clipboard::new().and_then(|mut cb| cb.get_text()) {
        Ok(text) => Some(text),
        Err(err) => {
            log::warn!("get_clipboard_text: {err}");
            None
        }
    }
}

pub(crate) fn set_clipboard_text(text: &str) -> bool {
    match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text.to_owned())) {
        Ok(()) => true,
        Err(err) => {
            log::warn!("set_clipboard_text: {err}");
            false
        }
    }
}

/// Windowing platform the process runs on.
pub(crate) fn platform_name() -> &'static str {
    if cfg!(target_os = "windows") {
        "Windows"
    } else if cfg!(target_os = "macos") {
        "macOS"
    } else if cfg!(unix) {
        unix_platform_name(env_is_set("WAYLAND_DISPLAY"), env_is_set("DISPLAY"))
    } else {
        "Unknown"
    }
}

/// winit prefers Wayland when both display servers are reachable.
fn unix_platform_name(wayland: bool, x11: bool) -> &'static str {
    match (wayland, x11) {
        (true, _) => "Linux Wayland",
        (false, true) => "Linux X11",
        (false, false) => "Unknown",
    }
}

fn env_is_set(var: &str) -> bool {
    std::env::var_os(var).is_some_and(|value| !value.is_empty())
}

/// Clear color of a window shown at `opacity`, premultiplied for a
/// compositing surface.
pub(crate) fn translucent_clear(color: [f32; 4], opacity: f32) -> [f32; 4] {
    let opacity = opacity.clamp(0.0, 1.0);
    color.map(|c| c * opacity)
}

/// Blocking native "open file" dialog.
pub(crate) fn pick_file(start: Option<&Path>, filters: &[FileFilter]) -> Option<PathBuf> {
    let mut dialog = rfd::FileDialog::new();
    if let Some(dir) = start {
        dialog = dialog.set_directory(dir);
    }
    for filter in filters {
        dialog = dialog.add_filter(&filter.name, filter.extensions.as_slice());
    }
    let picked = dialog.pick_file();
    log::debug!("open_file_dialog: {picked:?}");
    picked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wayland_wins_over_x11() {
        assert_eq!(unix_platform_name(true, true), "Linux Wayland");
        assert_eq!(unix_platform_name(false, true), "Linux X11");
        assert_eq!(unix_platform_name(false, false), "Unknown");
    }

    #[test]
    fn translucent_clear_premultiplies() {
        assert_eq!(translucent_clear([0.5, 0.2, 1.0, 1.0], 0.5), [0.25, 0.1, 0.5, 0.5]);
        assert_eq!(translucent_clear([0.5, 0.2, 1.0, 1.0], 3.0), [0.5, 0.2, 1.0, 1.0]);
        assert_eq!(translucent_clear([0.5, 0.2, 1.0, 1.0], -1.0), [0.0; 4]);
    }

    #[test]
    fn cursor_kinds_map_to_distinct_icons() {
        assert_eq!(cursor_icon(CursorKind::Arrow), CursorIcon::Default);
        assert_ne!(cursor_icon(CursorKind::ResizeH), cursor_icon(CursorKind::ResizeV));
    }
}
