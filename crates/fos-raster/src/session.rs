//! Drawing session controller
//!
//! Reference counted begin/end scope over the device frame. Only the 0 -> 1
//! and 1 -> 0 transitions reach the device. A session can be suspended
//! (clip layer popped, frame ended, count kept) for direct pixel access and
//! resumed afterwards.

use crate::clip::ClipRegion;
use crate::device::RenderDevice;

#[derive(Debug, Default)]
pub struct DrawingSession {
    depth: usize,
}

impl DrawingSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current nesting depth
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_active(&self) -> bool {
        self.depth > 0
    }

    pub fn enter<D: RenderDevice>(&mut self, device: &mut D) {
        self.depth += 1;
        if self.depth == 1 {
            device.begin_draw();
        }
    }

    /// Leave one level; an unmatched leave is ignored
    pub fn leave<D: RenderDevice>(&mut self, device: &mut D) {
        let Some(depth) = self.depth.checked_sub(1) else {
            tracing::warn!("Drawing session left more often than entered");
            return;
        };
        self.depth = depth;
        if depth == 0 {
            end_frame(device);
        }
    }

    /// End the device frame without changing the depth
    pub fn suspend<D: RenderDevice>(&self, device: &mut D, clip: &ClipRegion<D>) {
        if self.depth == 0 {
            return;
        }
        clip.suspend(device);
        end_frame(device);
    }

    /// Reopen the frame ended by [`suspend`](Self::suspend)
    pub fn resume<D: RenderDevice>(&self, device: &mut D, clip: &ClipRegion<D>) {
        if self.depth == 0 {
            return;
        }
        device.begin_draw();
        clip.resume(device);
    }
}

fn end_frame<D: RenderDevice>(device: &mut D) {
    if let Err(error) = device.end_draw() {
        tracing::error!(tags = %error.tags, "Error during drawing: {}", error.message);
    }
}
