//! In-memory [`FrameDevice`] that records every call, poisons released fences
//! and rasterizes draws with the CPU rasterizer.

use std::collections::HashMap;
use std::time::Duration;

use crate::batch::{Binding, DrawCommand, ShapeType, Vertex};
use crate::coords::{rgb_to_hex, Extent, Rgb};
use crate::error::FrameError;
use crate::raster::{draw_command, Canvas, Texels};
use crate::resources::{ImageData, TextureStore};

use super::device::{FenceWait, FrameDevice};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Wait(u64),
    Release(u64),
    Acquire(usize),
    Upload { vertices: usize, commands: usize },
    BeginPass(usize),
    Draw {
        index: usize,
        shape: Option<ShapeType>,
        use_texture: bool,
        binding: Binding,
    },
    Submit(u64),
    Present(usize),
    Abandon(usize),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum FenceStatus {
    Pending,
    Signaled,
    Freed,
}

pub struct MockDevice {
    pub calls: Vec<Call>,
    pub canvas: Canvas,
    pub textures: TextureStore<ImageData>,
    pub fail_acquire: Option<FrameError>,
    pub fail_upload: bool,
    /// Every wait times out while set.
    pub hang_all: bool,
    image_count: usize,
    acquire_order: Vec<usize>,
    acquires: usize,
    fences: HashMap<u64, FenceStatus>,
    next_fence: u64,
    /// Fence of the last submission that targeted each image.
    image_owner: HashMap<usize, u64>,
    vertices: Vec<Vertex>,
}

impl MockDevice {
    pub fn new(image_count: usize) -> Self {
        Self {
            calls: Vec::new(),
            canvas: Canvas::new(Extent::new(1, 1), 0),
            textures: TextureStore::new(),
            fail_acquire: None,
            fail_upload: false,
            hang_all: false,
            image_count,
            acquire_order: Vec::new(),
            acquires: 0,
            fences: HashMap::new(),
            next_fence: 1,
            image_owner: HashMap::new(),
            vertices: Vec::new(),
        }
    }

    /// Scripted image indices, cycled; defaults to round-robin.
    pub fn with_acquire_order(mut self, order: Vec<usize>) -> Self {
        self.acquire_order = order;
        self
    }

    pub fn draw_count(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, Call::Draw { .. })).count()
    }

    pub fn pending_fences(&self) -> usize {
        self.fences.values().filter(|s| **s == FenceStatus::Pending).count()
    }
}

impl FrameDevice for MockDevice {
    type Fence = u64;

    fn wait_fence(&mut self, fence: &u64, _timeout: Duration) -> FenceWait {
        self.calls.push(Call::Wait(*fence));
        match self.fences.get(fence) {
            None => panic!("wait on unknown fence {fence}"),
            Some(FenceStatus::Freed) => panic!("wait on freed fence {fence}"),
            Some(_) if self.hang_all => FenceWait::TimedOut,
            Some(_) => {
                self.fences.insert(*fence, FenceStatus::Signaled);
                FenceWait::Signaled
            }
        }
    }

    fn release_fence(&mut self, fence: u64) {
        self.calls.push(Call::Release(fence));
        match self.fences.insert(fence, FenceStatus::Freed) {
            Some(FenceStatus::Signaled) => {}
            other => panic!("release of fence {fence} in state {other:?}"),
        }
    }

    fn acquire_image(&mut self) -> Result<usize, FrameError> {
        if let Some(err) = self.fail_acquire.clone() {
            return Err(err);
        }
        let image = if self.acquire_order.is_empty() {
            self.acquires % self.image_count
        } else {
            self.acquire_order[self.acquires % self.acquire_order.len()]
        };
        self.acquires += 1;
        self.calls.push(Call::Acquire(image));
        Ok(image)
    }

    fn upload(&mut self, vertices: &[Vertex], commands: &[DrawCommand]) -> Result<(), FrameError> {
        if self.fail_upload {
            return Err(FrameError::OutOfMemory);
        }
        self.calls.push(Call::Upload {
            vertices: vertices.len(),
            commands: commands.len(),
        });
        self.vertices = vertices.to_vec();
        Ok(())
    }

    fn begin_pass(&mut self, image: usize, clear: [f32; 4], extent: Extent) {
        if let Some(owner) = self.image_owner.get(&image) {
            assert_ne!(
                self.fences.get(owner),
                Some(&FenceStatus::Pending),
                "image {image} recorded while fence {owner} is pending"
            );
        }
        self.calls.push(Call::BeginPass(image));
        let clear = rgb_to_hex(Rgb::new(clear[0], clear[1], clear[2]));
        self.canvas.resize(extent, clear);
    }

    fn draw(&mut self, index: usize, command: &DrawCommand) {
        self.calls.push(Call::Draw {
            index,
            shape: command.params.shape(),
            use_texture: command.params.uses_texture(),
            binding: command.binding,
        });
        let texels = match command.binding {
            Binding::Texture(id) => self.textures.get(id).map_or(Texels::None, Texels::Image),
            _ => Texels::None,
        };
        draw_command(&mut self.canvas, &self.vertices, command, texels);
    }

    fn submit(&mut self, image: usize) -> Result<u64, FrameError> {
        let fence = self.next_fence;
        self.next_fence += 1;
        self.fences.insert(fence, FenceStatus::Pending);
        self.image_owner.insert(image, fence);
        self.calls.push(Call::Submit(fence));
        Ok(fence)
    }

    fn present(&mut self, image: usize) -> Result<(), FrameError> {
        self.calls.push(Call::Present(image));
        Ok(())
    }

    fn abandon(&mut self, image: usize) {
        self.calls.push(Call::Abandon(image));
    }
}
