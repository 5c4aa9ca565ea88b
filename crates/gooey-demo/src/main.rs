use std::cell::Cell;
use std::rc::Rc;

use gooey_render::backend::{Callbacks, CursorKind};
use gooey_render::input::Event;
use gooey_render::logging::{init_logging, LoggingConfig};
use gooey_render::resources::TextureId;
use gooey_render::{create_backend, Backend, BackendKind, RendererConfig, WindowId};

const BADGE: &[u8] = include_bytes!("../assets/badge.svg");

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let mut config = RendererConfig::from_env();
    if let Some(arg) = std::env::args().nth(1) {
        config.backend = arg.parse::<BackendKind>()?;
    }
    log::info!("starting demo on the {} backend", config.backend);

    let mut backend = create_backend(config);
    backend.init()?;
    log::info!("platform: {}", backend.get_platform_name());

    let window = backend
        .create_window("Gooey Showcase", 820, 560)
        .ok_or_else(|| anyhow::anyhow!("window creation failed"))?;
    let badge = backend.load_image_from_bin(BADGE);
    if badge.is_none() {
        log::warn!("badge image unavailable, skipping it");
    }

    // Animation phase, advanced by the timer and read by the redraw callback.
    let phase = Rc::new(Cell::new(0.0_f32));

    let timer = backend
        .create_timer()
        .ok_or_else(|| anyhow::anyhow!("timer creation failed"))?;
    let tick = Rc::clone(&phase);
    backend.set_timer_callback(
        timer,
        16,
        Box::new(move |backend: &mut dyn Backend| {
            tick.set((tick.get() + 2.0) % 360.0);
            backend.request_redraw(window);
        }),
    );

    let draw_phase = Rc::clone(&phase);
    backend.setup_callbacks(Callbacks {
        redraw: Some(Box::new(move |backend: &mut dyn Backend, id: WindowId| {
            paint(backend, id, badge, draw_phase.get());
            backend.render(id);
        })),
        event: Some(Box::new(|backend: &mut dyn Backend, id: WindowId, event: &Event| {
            on_event(backend, id, event);
        })),
    });

    backend.run()?;
    backend.cleanup();
    Ok(())
}

fn paint(backend: &mut dyn Backend, window: WindowId, badge: Option<TextureId>, phase: f32) {
    let Some((width, height)) = backend.get_win_dim(window) else {
        return;
    };
    let (w, h) = (width as f32, height as f32);

    // Header
    backend.fill_rectangle(0.0, 0.0, w, 56.0, 0x1E2233, window, false, 0.0);
    backend.draw_text(20.0, 18.0, "Gooey render showcase", 0xE8ECF4, 22.0, window);
    let fps = format!("{:.0} fps", backend.get_win_framerate(window));
    let fps_width = backend.get_text_width(&fps, 16.0);
    backend.draw_text(w - fps_width - 20.0, 22.0, &fps, 0x8FD694, 16.0, window);

    // Cards
    backend.fill_rectangle(20.0, 76.0, 240.0, 160.0, 0x2D3350, window, true, 14.0);
    backend.draw_rectangle(20.0, 76.0, 240.0, 160.0, 0x6C7BD0, 2.0, window, true, 14.0);
    backend.fill_rectangle(280.0, 76.0, 240.0, 160.0, 0x3A2D50, window, false, 0.0);
    backend.draw_rectangle(280.0, 76.0, 240.0, 160.0, 0xB07CE0, 3.0, window, false, 0.0);

    // Grid
    for i in 0..=10 {
        let x = 20.0 + i as f32 * 50.0;
        backend.draw_line(x, 260.0, x, h - 20.0, 0x3C4258, window);
    }
    backend.draw_line(20.0, h - 20.0, 520.0, 260.0, 0xF07167, window);

    // Spinner
    backend.fill_arc(650.0, 160.0, 120.0, 120.0, 0.0, 360.0, 0x2A2F45, window);
    backend.fill_arc(650.0, 160.0, 120.0, 120.0, phase, phase + 90.0, 0xF5C542, window);
    backend.fill_arc(650.0, 160.0, 60.0, 60.0, -phase, -phase + 180.0, 0x4CC9F0, window);

    if let Some(texture) = badge {
        backend.draw_image(texture, 618.0, 300.0, 64.0, 64.0, window);
    }

    let caption = "arcs, rounded rects, lines, images and text";
    let caption_height = backend.get_text_height(caption, 14.0);
    backend.draw_text(20.0, h - caption_height - 4.0, caption, 0x9AA3BD, 14.0, window);
}

fn on_event(backend: &mut dyn Backend, window: WindowId, event: &Event) {
    match event {
        Event::KeyPress(_) => match backend.get_key_from_code(event) {
            Some("Escape") => backend.request_close(),
            Some("c") => {
                if let Some(text) = backend.get_clipboard_text() {
                    log::info!("clipboard: {text:?}");
                }
            }
            Some(key) => log::debug!("key {key}"),
            None => {}
        },
        Event::ClickPress { x, y, .. } => {
            backend.set_cursor(CursorKind::Hand);
            log::info!("click at ({x}, {y}) in {window}");
        }
        Event::ClickRelease { .. } => backend.set_cursor(CursorKind::Arrow),
        Event::Drop(drop) => log::info!("dropped {}", drop.path.display()),
        Event::WindowClose => backend.request_close(),
        _ => {}
    }
}
