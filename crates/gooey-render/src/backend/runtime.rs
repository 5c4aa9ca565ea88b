use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow};

use crate::coords::Extent;
use crate::input::platform::translate_window_event;
use crate::input::Event;

use super::common::{dispatch_event, dispatch_redraw, fire_timers};
use super::gpu::GpuBackend;
use super::Backend;

/// winit driver for [`GpuBackend::run`].
///
/// Redraws are invalidation-based: a window repaints when the OS asks, when
/// widget code calls `request_redraw`, or after it received an event.
pub(super) struct Runtime<'a> {
    backend: &'a mut GpuBackend,
}

impl<'a> Runtime<'a> {
    pub fn new(backend: &'a mut GpuBackend) -> Self {
        Self { backend }
    }

    fn should_exit(&self) -> bool {
        self.backend.core.close_requested || self.backend.active_window_count() == 0
    }

    /// Work that may have been queued by a callback: new windows, close requests.
    fn settle(&mut self, event_loop: &ActiveEventLoop) {
        self.backend.realize_pending(event_loop);
        if self.should_exit() {
            event_loop.exit();
        }
    }
}

impl ApplicationHandler for Runtime<'_> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        self.settle(event_loop);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        fire_timers(&mut *self.backend, Instant::now());
        self.settle(event_loop);

        let flow = match self.backend.core.timers.next_deadline() {
            Some(at) => ControlFlow::WaitUntil(at),
            None => ControlFlow::Wait,
        };
        event_loop.set_control_flow(flow);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(&id) = self.backend.by_native.get(&window_id) else {
            return;
        };
        let backend = &mut *self.backend;

        match &event {
            WindowEvent::CloseRequested => {
                dispatch_event(backend, id, &Event::WindowClose);
                backend.destroy_window_from_id(id);
            }

            WindowEvent::Resized(size) => {
                backend.resize(id, Extent::new(size.width, size.height));
                let ev = Event::Resize {
                    width: size.width,
                    height: size.height,
                };
                backend.push_event(id, &ev);
                dispatch_event(backend, id, &ev);
            }

            WindowEvent::Occluded(false) => {
                backend.push_event(id, &Event::Expose);
                dispatch_event(backend, id, &Event::Expose);
            }

            WindowEvent::RedrawRequested => {
                dispatch_redraw(backend, id);
                backend.render(id);
            }

            _ => {
                let translated = backend
                    .windows
                    .get_mut(id)
                    .and_then(|state| translate_window_event(&mut state.input, &event));
                if let Some(ev) = translated {
                    backend.push_event(id, &ev);
                    dispatch_event(backend, id, &ev);
                }
            }
        }

        self.settle(event_loop);
    }
}
