use super::{Binding, DrawCommand, ShapeParams, Vertex};

pub const DEFAULT_VERTEX_CAPACITY: usize = 1024;
pub const DEFAULT_COMMAND_CAPACITY: usize = 64;

/// Per-window accumulation of vertices and draw commands for the frame in progress.
///
/// Capacities double on overflow, mirroring the GPU buffers sized from them.
/// Commands are stored and replayed strictly in push order.
#[derive(Debug, Clone)]
pub struct VertexBatch {
    vertices: Vec<Vertex>,
    commands: Vec<DrawCommand>,
    vertex_capacity: usize,
    command_capacity: usize,
    needs_redraw: bool,
}

impl Default for VertexBatch {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_VERTEX_CAPACITY, DEFAULT_COMMAND_CAPACITY)
    }
}

impl VertexBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// New batches start dirty so the first frame presents the clear color.
    pub fn with_capacity(vertex_capacity: usize, command_capacity: usize) -> Self {
        let vertex_capacity = vertex_capacity.max(6);
        let command_capacity = command_capacity.max(1);
        Self {
            vertices: Vec::with_capacity(vertex_capacity),
            commands: Vec::with_capacity(command_capacity),
            vertex_capacity,
            command_capacity,
            needs_redraw: true,
        }
    }

    /// Appends `vertices` as one draw command and returns its index.
    ///
    /// Returns `None` for an empty vertex slice.
    pub fn push(
        &mut self,
        vertices: &[Vertex],
        params: ShapeParams,
        binding: Binding,
    ) -> Option<usize> {
        if vertices.is_empty() {
            log::debug!("VertexBatch::push: empty vertex slice ignored");
            return None;
        }

        self.grow_vertices(vertices.len());
        self.grow_commands();

        let vertex_offset = self.vertices.len() as u32;
        self.vertices.extend_from_slice(vertices);
        self.commands.push(DrawCommand {
            vertex_offset,
            vertex_count: vertices.len() as u32,
            params,
            binding,
        });
        self.needs_redraw = true;

        Some(self.commands.len() - 1)
    }

    fn grow_vertices(&mut self, incoming: usize) {
        let required = self.vertices.len() + incoming;
        if required <= self.vertex_capacity {
            return;
        }
        let mut cap = self.vertex_capacity;
        while cap < required {
            cap *= 2;
        }
        log::trace!("VertexBatch: vertex capacity {} -> {cap}", self.vertex_capacity);
        self.vertices.reserve_exact(cap - self.vertices.len());
        self.vertex_capacity = cap;
    }

    fn grow_commands(&mut self) {
        if self.commands.len() < self.command_capacity {
            return;
        }
        let cap = self.command_capacity * 2;
        self.commands.reserve_exact(cap - self.commands.len());
        self.command_capacity = cap;
    }

    /// Drops every queued vertex and command after a presented frame.
    ///
    /// Capacity is retained; the redraw flag is cleared.
    pub fn reset(&mut self) {
        self.vertices.clear();
        self.commands.clear();
        self.needs_redraw = false;
    }

    /// Drops queued work but keeps the window scheduled for a (clear-only) frame.
    pub fn discard(&mut self) {
        self.vertices.clear();
        self.commands.clear();
        self.needs_redraw = true;
    }

    pub fn mark_dirty(&mut self) {
        self.needs_redraw = true;
    }

    #[inline]
    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[inline]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    #[inline]
    pub fn vertex_capacity(&self) -> usize {
        self.vertex_capacity
    }

    #[inline]
    pub fn command_capacity(&self) -> usize {
        self.command_capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad(seed: u32) -> [Vertex; 6] {
        let f = seed as f32;
        std::array::from_fn(|i| {
            let k = f * 6.0 + i as f32;
            Vertex::new([k, -k], [k * 0.5, k * 0.25, k * 0.125], [i as f32, f])
        })
    }

    // ── push ──────────────────────────────────────────────────────────────

    #[test]
    fn push_records_contiguous_ranges() {
        let mut b = VertexBatch::new();
        let a = b.push(&quad(0), ShapeParams::default(), Binding::Solid);
        let c = b.push(&quad(1), ShapeParams::default(), Binding::Solid);
        assert_eq!((a, c), (Some(0), Some(1)));
        assert_eq!(b.commands()[0].vertex_range(), 0..6);
        assert_eq!(b.commands()[1].vertex_range(), 6..12);
    }

    #[test]
    fn empty_push_is_ignored() {
        let mut b = VertexBatch::new();
        b.reset();
        assert_eq!(b.push(&[], ShapeParams::default(), Binding::Solid), None);
        assert!(b.is_empty());
        assert!(!b.needs_redraw());
    }

    // ── growth ────────────────────────────────────────────────────────────

    #[test]
    fn growth_preserves_every_vertex_byte_for_byte() {
        let mut b = VertexBatch::with_capacity(12, 2);
        let mut expected = Vec::new();
        for i in 0..500 {
            let q = quad(i);
            expected.extend_from_slice(&q);
            b.push(&q, ShapeParams::default(), Binding::Solid);
        }
        assert_eq!(b.vertex_count(), 3000);
        assert_eq!(
            bytemuck::cast_slice::<Vertex, u8>(b.vertices()),
            bytemuck::cast_slice::<Vertex, u8>(&expected),
        );
        for (i, cmd) in b.commands().iter().enumerate() {
            assert_eq!(cmd.vertex_offset, i as u32 * 6);
        }
    }

    #[test]
    fn capacity_doubles() {
        let mut b = VertexBatch::with_capacity(12, 2);
        for i in 0..3 {
            b.push(&quad(i), ShapeParams::default(), Binding::Solid);
        }
        assert_eq!(b.vertex_capacity(), 24);
        assert_eq!(b.command_capacity(), 4);
        for i in 3..5 {
            b.push(&quad(i), ShapeParams::default(), Binding::Solid);
        }
        assert_eq!(b.vertex_capacity(), 48);
        assert_eq!(b.command_capacity(), 8);
    }

    #[test]
    fn oversized_push_jumps_several_doublings() {
        let mut b = VertexBatch::with_capacity(6, 1);
        let big = vec![Vertex::default(); 100];
        b.push(&big, ShapeParams::default(), Binding::Solid);
        assert_eq!(b.vertex_capacity(), 192);
    }

    // ── reset ─────────────────────────────────────────────────────────────

    #[test]
    fn reset_keeps_capacity_and_forgets_content() {
        let mut b = VertexBatch::with_capacity(6, 1);
        for i in 0..10 {
            b.push(&quad(i), ShapeParams::default(), Binding::Solid);
        }
        let cap = b.vertex_capacity();
        b.reset();
        assert_eq!((b.vertex_count(), b.command_count()), (0, 0));
        assert_eq!(b.vertex_capacity(), cap);
        assert!(!b.needs_redraw());
    }

    #[test]
    fn discard_keeps_window_dirty() {
        let mut b = VertexBatch::new();
        b.push(&quad(0), ShapeParams::default(), Binding::Solid);
        b.discard();
        assert!(b.is_empty());
        assert!(b.needs_redraw());
    }
}
