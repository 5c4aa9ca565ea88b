use std::fmt;
use std::time::Duration;

use crate::batch::VertexBatch;
use crate::coords::Extent;
use crate::error::FrameError;

use super::device::{FenceWait, FrameDevice};
use super::state::{FrameOutcome, FrameState};

pub const DEFAULT_FRAMES_IN_FLIGHT: usize = 2;
pub const DEFAULT_FENCE_TIMEOUT: Duration = Duration::from_secs(1);
pub const DEFAULT_CLEAR_COLOR: [f32; 4] = [0.1, 0.1, 0.1, 1.0];

/// Frame Submission Engine for one window.
///
/// Tracks two sets of fences: one per frame-in-flight slot, bounding how far
/// the CPU runs ahead, and one per swapchain image, so an image is never
/// recorded into while an earlier submission still targets it. Every tracked
/// image fence is also held by a frame slot; a fence is released to the
/// device only after both sets have dropped it.
#[derive(Debug)]
pub struct FrameEngine<F> {
    state: FrameState,
    current_frame: usize,
    in_flight: Vec<Option<F>>,
    images_in_flight: Vec<Option<F>>,
    fence_timeout: Duration,
    clear_color: [f32; 4],
    frames_presented: u64,
}

impl<F> Default for FrameEngine<F>
where
    F: Clone + PartialEq + fmt::Debug,
{
    fn default() -> Self {
        Self::new(DEFAULT_FRAMES_IN_FLIGHT, DEFAULT_FENCE_TIMEOUT)
    }
}

impl<F> FrameEngine<F>
where
    F: Clone + PartialEq + fmt::Debug,
{
    pub fn new(frames_in_flight: usize, fence_timeout: Duration) -> Self {
        Self {
            state: FrameState::Idle,
            current_frame: 0,
            in_flight: vec![None; frames_in_flight.max(1)],
            images_in_flight: Vec::new(),
            fence_timeout,
            clear_color: DEFAULT_CLEAR_COLOR,
            frames_presented: 0,
        }
    }

    pub fn with_clear_color(mut self, color: [f32; 4]) -> Self {
        self.set_clear_color(color);
        self
    }

    /// Clear value used from the next frame on.
    pub fn set_clear_color(&mut self, color: [f32; 4]) {
        self.clear_color = color;
    }

    #[inline]
    pub fn state(&self) -> FrameState {
        self.state
    }

    #[inline]
    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    #[inline]
    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Runs one full frame if the batch needs a redraw.
    ///
    /// On success the batch is reset and the frame slot advances. On failure
    /// the batch is left untouched so the same content is retried next time.
    pub fn render<D>(&mut self, device: &mut D, batch: &mut VertexBatch, extent: Extent) -> FrameOutcome
    where
        D: FrameDevice<Fence = F>,
    {
        if !batch.needs_redraw() {
            return FrameOutcome::Idle;
        }

        let outcome = match self.run_frame(device, batch, extent) {
            Ok(()) => {
                batch.reset();
                self.current_frame = (self.current_frame + 1) % self.in_flight.len();
                self.frames_presented += 1;
                FrameOutcome::Presented
            }
            Err(err) => {
                log::warn!(
                    "FrameEngine: frame slot {} skipped in {:?}: {err}",
                    self.current_frame,
                    self.state
                );
                FrameOutcome::Skipped(err)
            }
        };
        self.state = FrameState::Idle;
        outcome
    }

    fn run_frame<D>(&mut self, device: &mut D, batch: &VertexBatch, extent: Extent) -> Result<(), FrameError>
    where
        D: FrameDevice<Fence = F>,
    {
        if !extent.is_valid() {
            return Err(FrameError::ZeroExtent);
        }

        self.state = FrameState::Acquiring;
        let slot = self.current_frame;
        if let Some(fence) = self.in_flight[slot].clone() {
            self.await_fence(device, fence)?;
        }

        let image = device.acquire_image()?;
        if image >= self.images_in_flight.len() {
            self.images_in_flight.resize(image + 1, None);
        }
        if let Some(fence) = self.images_in_flight[image].clone() {
            if let Err(err) = self.await_fence(device, fence) {
                device.abandon(image);
                return Err(err);
            }
        }

        self.state = FrameState::Recording;
        if let Err(err) = device.upload(batch.vertices(), batch.commands()) {
            device.abandon(image);
            return Err(err);
        }
        device.begin_pass(image, self.clear_color, extent);
        for (index, command) in batch.commands().iter().enumerate() {
            device.draw(index, command);
        }

        let fence = match device.submit(image) {
            Ok(fence) => fence,
            Err(err) => {
                device.abandon(image);
                return Err(err);
            }
        };
        self.state = FrameState::Submitted;
        self.in_flight[slot] = Some(fence.clone());
        self.images_in_flight[image] = Some(fence);

        device.present(image)
    }

    /// Bounded wait; on success every slot holding `fence` is cleared.
    fn await_fence<D>(&mut self, device: &mut D, fence: F) -> Result<(), FrameError>
    where
        D: FrameDevice<Fence = F>,
    {
        match device.wait_fence(&fence, self.fence_timeout) {
            FenceWait::Signaled => {
                self.retire(device, fence);
                Ok(())
            }
            FenceWait::TimedOut => Err(FrameError::FenceTimeout(self.fence_timeout)),
            FenceWait::Lost => Err(FrameError::DeviceLost),
        }
    }

    fn retire<D>(&mut self, device: &mut D, fence: F)
    where
        D: FrameDevice<Fence = F>,
    {
        for slot in self.in_flight.iter_mut().chain(self.images_in_flight.iter_mut()) {
            if slot.as_ref() == Some(&fence) {
                *slot = None;
            }
        }
        device.release_fence(fence);
    }

    /// Forgets which image each fence targeted, after the swapchain was rebuilt.
    pub fn reset_image_tracking(&mut self) {
        self.images_in_flight.clear();
    }

    /// Waits for every outstanding submission, e.g. before tearing the window down.
    ///
    /// Returns `false` if any wait timed out or the device was lost.
    pub fn wait_all<D>(&mut self, device: &mut D) -> bool
    where
        D: FrameDevice<Fence = F>,
    {
        let mut all_signaled = true;
        for slot in 0..self.in_flight.len() {
            let Some(fence) = self.in_flight[slot].clone() else {
                continue;
            };
            if let Err(err) = self.await_fence(device, fence) {
                log::warn!("FrameEngine: frame slot {slot} not idle at teardown: {err}");
                all_signaled = false;
            }
        }
        if all_signaled {
            self.images_in_flight.clear();
        }
        all_signaled
    }

    /// Number of submissions not yet known to have completed.
    pub fn pending_fences(&self) -> usize {
        self.in_flight.iter().flatten().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::{Binding, ShapeType};
    use crate::draw::Encoder;
    use crate::frame::mock::{Call, MockDevice};
    use crate::resources::ImageData;

    const EXTENT: Extent = Extent { width: 200, height: 200 };

    fn engine() -> FrameEngine<u64> {
        FrameEngine::new(2, Duration::from_millis(10))
    }

    fn fill(batch: &mut VertexBatch, color: u32) {
        Encoder::new(batch, EXTENT).fill_rectangle(0.0, 0.0, 100.0, 100.0, color, false, 0.0);
    }

    // ── ordering ──────────────────────────────────────────────────────────

    #[test]
    fn replays_commands_in_push_order() {
        let mut device = MockDevice::new(3);
        let mut batch = VertexBatch::new();
        let mut enc = Encoder::new(&mut batch, EXTENT);
        enc.fill_rectangle(0.0, 0.0, 10.0, 10.0, 0xFF0000, false, 0.0);
        enc.draw_line(0.0, 0.0, 50.0, 50.0, 0x00FF00);
        enc.fill_arc(100.0, 100.0, 40.0, 40.0, 0.0, 90.0, 0x0000FF);
        enc.draw_rectangle(5.0, 5.0, 30.0, 30.0, 0xFFFFFF, 2.0, true, 4.0);

        let out = engine().render(&mut device, &mut batch, EXTENT);
        assert_eq!(out, FrameOutcome::Presented);

        let draws: Vec<(usize, Option<ShapeType>)> = device
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::Draw { index, shape, .. } => Some((*index, *shape)),
                _ => None,
            })
            .collect();
        assert_eq!(
            draws,
            vec![
                (0, Some(ShapeType::Rect)),
                (1, Some(ShapeType::Line)),
                (2, Some(ShapeType::Arc)),
                (3, Some(ShapeType::Rect)),
            ]
        );

        let steps: Vec<&Call> = device
            .calls
            .iter()
            .filter(|c| !matches!(c, Call::Draw { .. }))
            .collect();
        assert!(matches!(
            steps.as_slice(),
            [
                Call::Acquire(0),
                Call::Upload { commands: 4, .. },
                Call::BeginPass(0),
                Call::Submit(_),
                Call::Present(0)
            ]
        ));
    }

    #[test]
    fn last_writer_wins_on_overlap() {
        let mut device = MockDevice::new(2);
        let mut batch = VertexBatch::new();
        fill(&mut batch, 0xFF0000);
        fill(&mut batch, 0x0000FF);

        engine().render(&mut device, &mut batch, EXTENT);

        assert_eq!(device.canvas.pixel(50, 50), Some(0x0000FF));
        assert_eq!(device.canvas.pixel(150, 150), Some(0x1A1A1A));
    }

    // ── batch lifecycle ───────────────────────────────────────────────────

    #[test]
    fn presented_frame_resets_batch_exactly() {
        let mut device = MockDevice::new(2);
        let mut engine = engine();
        let mut batch = VertexBatch::new();
        for _ in 0..5 {
            fill(&mut batch, 0xFF0000);
        }
        assert_eq!(engine.render(&mut device, &mut batch, EXTENT), FrameOutcome::Presented);
        assert_eq!((batch.vertex_count(), batch.command_count()), (0, 0));
        assert!(!batch.needs_redraw());

        for color in [1, 2, 3] {
            fill(&mut batch, color);
        }
        device.calls.clear();
        engine.render(&mut device, &mut batch, EXTENT);

        assert!(device.calls.contains(&Call::Upload { vertices: 18, commands: 3 }));
        assert_eq!(device.draw_count(), 3);
    }

    #[test]
    fn clean_batch_is_idle() {
        let mut device = MockDevice::new(2);
        let mut engine = engine();
        let mut batch = VertexBatch::new();
        engine.render(&mut device, &mut batch, EXTENT);
        device.calls.clear();

        assert_eq!(engine.render(&mut device, &mut batch, EXTENT), FrameOutcome::Idle);
        assert!(device.calls.is_empty());
    }

    #[test]
    fn discarded_batch_still_presents_clear_color() {
        let mut device = MockDevice::new(2);
        let mut engine = engine();
        let mut batch = VertexBatch::new();
        engine.render(&mut device, &mut batch, EXTENT);

        fill(&mut batch, 0xFF0000);
        batch.discard();
        assert_eq!(engine.render(&mut device, &mut batch, EXTENT), FrameOutcome::Presented);
        assert_eq!(device.canvas.pixel(10, 10), Some(0x1A1A1A));
    }

    #[test]
    fn zero_extent_touches_nothing() {
        let mut device = MockDevice::new(2);
        let mut batch = VertexBatch::new();
        let out = engine().render(&mut device, &mut batch, Extent::new(0, 0));
        assert_eq!(out, FrameOutcome::Skipped(FrameError::ZeroExtent));
        assert!(device.calls.is_empty());
        assert!(batch.needs_redraw());
    }

    // ── failures ──────────────────────────────────────────────────────────

    #[test]
    fn failed_acquire_keeps_batch_for_retry() {
        let mut device = MockDevice::new(2);
        let mut engine = engine();
        let mut batch = VertexBatch::new();
        fill(&mut batch, 0xFF0000);

        device.fail_acquire = Some(FrameError::Outdated);
        assert_eq!(
            engine.render(&mut device, &mut batch, EXTENT),
            FrameOutcome::Skipped(FrameError::Outdated)
        );
        assert_eq!(batch.command_count(), 1);
        assert_eq!(engine.state(), FrameState::Idle);
        assert_eq!(engine.current_frame(), 0);

        device.fail_acquire = None;
        assert_eq!(engine.render(&mut device, &mut batch, EXTENT), FrameOutcome::Presented);
        assert_eq!(device.canvas.pixel(10, 10), Some(0xFF0000));
    }

    #[test]
    fn failed_upload_abandons_the_image() {
        let mut device = MockDevice::new(2);
        let mut batch = VertexBatch::new();
        fill(&mut batch, 0xFF0000);

        device.fail_upload = true;
        let out = engine().render(&mut device, &mut batch, EXTENT);
        assert_eq!(out, FrameOutcome::Skipped(FrameError::OutOfMemory));
        assert_eq!(device.calls.last(), Some(&Call::Abandon(0)));
        assert_eq!(device.draw_count(), 0);
    }

    #[test]
    fn hung_fence_skips_frame_instead_of_blocking() {
        let mut device = MockDevice::new(3);
        let mut engine = engine();
        let mut batch = VertexBatch::new();

        fill(&mut batch, 1);
        engine.render(&mut device, &mut batch, EXTENT);
        fill(&mut batch, 2);
        engine.render(&mut device, &mut batch, EXTENT);

        device.hang_all = true;
        fill(&mut batch, 3);
        let out = engine.render(&mut device, &mut batch, EXTENT);
        assert_eq!(out, FrameOutcome::Skipped(FrameError::FenceTimeout(Duration::from_millis(10))));
        assert_eq!(batch.command_count(), 1);
        assert_eq!(engine.pending_fences(), 2);

        device.hang_all = false;
        assert_eq!(engine.render(&mut device, &mut batch, EXTENT), FrameOutcome::Presented);
    }

    // ── fence discipline ──────────────────────────────────────────────────

    #[test]
    fn never_records_into_a_busy_image_or_waits_on_a_freed_fence() {
        // Out-of-order acquisition forces per-image waits; freed fences are
        // poisoned by the mock and panic when waited on.
        let mut device = MockDevice::new(3).with_acquire_order(vec![0, 1, 1, 0, 2, 2, 1, 0, 0, 2, 1, 1]);
        let mut engine = engine();
        let mut batch = VertexBatch::new();

        for frame in 0..12u32 {
            fill(&mut batch, frame);
            assert_eq!(engine.render(&mut device, &mut batch, EXTENT), FrameOutcome::Presented);
        }
        assert!(device.calls.iter().any(|c| matches!(c, Call::Release(_))));

        assert!(engine.wait_all(&mut device));
        assert_eq!(engine.pending_fences(), 0);
        assert_eq!(device.pending_fences(), 0);
    }

    #[test]
    fn swapchain_rebuild_keeps_frame_fences() {
        let mut device = MockDevice::new(2);
        let mut engine = engine();
        let mut batch = VertexBatch::new();
        fill(&mut batch, 1);
        engine.render(&mut device, &mut batch, EXTENT);

        engine.reset_image_tracking();
        assert_eq!(engine.pending_fences(), 1);
        assert!(engine.wait_all(&mut device));
        assert_eq!(device.pending_fences(), 0);
    }

    // ── textures ──────────────────────────────────────────────────────────

    #[test]
    fn png_image_draw_binds_its_texture() {
        let png = {
            let img = image::RgbaImage::from_pixel(4, 4, image::Rgba([0, 128, 255, 255]));
            let mut bytes = Vec::new();
            img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
                .expect("encode png");
            bytes
        };
        let mut device = MockDevice::new(2);
        let id = device.textures.insert(ImageData::from_bytes(&png).expect("decode png"));

        let mut batch = VertexBatch::new();
        Encoder::new(&mut batch, EXTENT).draw_image(id, 20.0, 20.0, 4.0, 4.0);
        assert_eq!(batch.command_count(), 1);

        engine().render(&mut device, &mut batch, EXTENT);

        let draws: Vec<&Call> = device.calls.iter().filter(|c| matches!(c, Call::Draw { .. })).collect();
        assert_eq!(
            draws,
            vec![&Call::Draw {
                index: 0,
                shape: Some(ShapeType::Rect),
                use_texture: true,
                binding: Binding::Texture(id),
            }]
        );
        assert_eq!(device.canvas.pixel(21, 21), Some(0x0080FF));
    }
}
