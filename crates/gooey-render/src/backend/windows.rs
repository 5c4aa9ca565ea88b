use std::time::Instant;

use crate::batch::VertexBatch;
use crate::coords::Extent;
use crate::input::{EventQueue, InputState};
use crate::time::FrameRate;

use super::WindowId;

/// Backend-independent state of one window. `N` is whatever the backend
/// attaches once the window is realized (a swapchain, a canvas).
pub(crate) struct WindowState<N> {
    pub title: String,
    pub extent: Extent,
    pub batch: VertexBatch,
    pub frame_rate: FrameRate,
    pub events: EventQueue,
    pub input: InputState,
    pub visible: bool,
    pub resizable: bool,
    pub decorated: bool,
    /// Window opacity in `[0, 1]`; below 1 the window is composited as transparent.
    pub opacity: f32,
    pub blur: bool,
    pub native: Option<N>,
}

impl<N> WindowState<N> {
    pub fn new(title: &str, extent: Extent, batch: VertexBatch, visible: bool) -> Self {
        Self {
            title: title.to_string(),
            extent,
            batch,
            frame_rate: FrameRate::new(Instant::now()),
            events: EventQueue::default(),
            input: InputState::default(),
            visible,
            resizable: true,
            decorated: true,
            opacity: 1.0,
            blur: false,
            native: None,
        }
    }
}

/// Window table indexed by [`WindowId`]. Destroyed windows leave an empty
/// slot so ids stay stable and are never handed out twice.
pub(crate) struct WindowSlots<N> {
    slots: Vec<Option<WindowState<N>>>,
}

impl<N> Default for WindowSlots<N> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<N> WindowSlots<N> {
    pub fn insert(&mut self, state: WindowState<N>) -> WindowId {
        self.slots.push(Some(state));
        WindowId(self.slots.len() - 1)
    }

    pub fn get(&self, id: WindowId) -> Option<&WindowState<N>> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: WindowId) -> Option<&mut WindowState<N>> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn remove(&mut self, id: WindowId) -> Option<WindowState<N>> {
        self.slots.get_mut(id.0).and_then(Option::take)
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn total_count(&self) -> usize {
        self.slots.len()
    }

    pub fn ids(&self) -> Vec<WindowId> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|_| WindowId(i)))
            .collect()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (WindowId, &mut WindowState<N>)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(i, s)| s.as_mut().map(|w| (WindowId(i), w)))
    }

    /// Removes every window, returning them in id order.
    pub fn drain(&mut self) -> Vec<(WindowId, WindowState<N>)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(i, s)| s.take().map(|w| (WindowId(i), w)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> WindowState<()> {
        WindowState::new("w", Extent::new(10, 10), VertexBatch::new(), true)
    }

    #[test]
    fn ids_are_never_reused() {
        let mut w = WindowSlots::default();
        let a = w.insert(state());
        let b = w.insert(state());
        assert!(w.remove(a).is_some());
        let c = w.insert(state());

        assert_eq!((a, b, c), (WindowId(0), WindowId(1), WindowId(2)));
        assert!(w.get(a).is_none());
        assert_eq!(w.active_count(), 2);
        assert_eq!(w.total_count(), 3);
        assert_eq!(w.ids(), vec![b, c]);
    }

    #[test]
    fn drain_empties_the_table() {
        let mut w = WindowSlots::default();
        w.insert(state());
        w.insert(state());
        assert_eq!(w.drain().len(), 2);
        assert_eq!(w.active_count(), 0);
        assert_eq!(w.total_count(), 2);
    }
}
