/// Where a window's frame currently is in the submission cycle.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum FrameState {
    #[default]
    Idle,
    /// Waiting on the frame slot's fence, then acquiring a swapchain image.
    Acquiring,
    /// Image acquired; commands are being recorded.
    Recording,
    /// Work submitted and presented; bookkeeping not yet finished.
    Submitted,
}

/// Result of one [`FrameEngine::render`](super::FrameEngine::render) call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Nothing queued and no redraw requested.
    Idle,
    /// Frame presented; the batch has been reset.
    Presented,
    /// Frame abandoned; the batch is kept for the next attempt.
    Skipped(crate::error::FrameError),
}
