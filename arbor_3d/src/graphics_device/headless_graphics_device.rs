/// Headless graphics device (no GPU required)
///
/// Keeps uploaded buffers in memory. Used by the demo driver and by every
/// buffer-lifecycle test; `lose_context()` simulates the platform dropping
/// the rendering context.

use rustc_hash::FxHashMap;
use crate::error::Result;
use crate::{engine_bail, engine_debug};
use super::graphics_device::{
    GraphicsDevice, BufferHandle, BufferTarget, GraphicsDeviceStats,
};

#[derive(Debug, Clone)]
struct HeadlessBuffer {
    target: Option<BufferTarget>,
    data: Vec<u8>,
}

/// In-memory GraphicsDevice
#[derive(Debug, Default)]
pub struct HeadlessGraphicsDevice {
    buffers: FxHashMap<BufferHandle, HeadlessBuffer>,
    next_name: u32,
    handle_limit: Option<u32>,
    stats: GraphicsDeviceStats,
    context_generation: u32,
}

impl HeadlessGraphicsDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Device that refuses to hold more than `limit` live buffers
    pub fn with_handle_limit(limit: u32) -> Self {
        Self {
            handle_limit: Some(limit),
            ..Self::default()
        }
    }

    /// Drop every buffer without any delete call, as a lost context does.
    ///
    /// Names are never reused, so stale handles held by resources stay
    /// unknown to the device afterwards.
    pub fn lose_context(&mut self) {
        engine_debug!("arbor3d::HeadlessGraphicsDevice",
            "Context lost, {} buffers invalidated", self.buffers.len());
        self.buffers.clear();
        self.stats.live_buffers = 0;
        self.context_generation += 1;
    }

    /// Number of times the context has been lost
    pub fn context_generation(&self) -> u32 {
        self.context_generation
    }

    /// True if `handle` names a live buffer
    pub fn is_live(&self, handle: BufferHandle) -> bool {
        self.buffers.contains_key(&handle)
    }

    /// Contents of a live buffer
    pub fn buffer_data(&self, handle: BufferHandle) -> Option<&[u8]> {
        self.buffers.get(&handle).map(|b| b.data.as_slice())
    }

    /// Binding target of a live buffer (None until first upload)
    pub fn buffer_target(&self, handle: BufferHandle) -> Option<BufferTarget> {
        self.buffers.get(&handle).and_then(|b| b.target)
    }
}

impl GraphicsDevice for HeadlessGraphicsDevice {
    fn generate_buffer(&mut self) -> Result<BufferHandle> {
        if let Some(limit) = self.handle_limit {
            if self.buffers.len() as u32 >= limit {
                crate::engine_error!("arbor3d::HeadlessGraphicsDevice",
                    "Buffer limit of {} reached", limit);
                return Err(crate::error::Error::OutOfMemory);
            }
        }
        self.next_name += 1;
        let handle = BufferHandle(self.next_name);
        self.buffers.insert(handle, HeadlessBuffer { target: None, data: Vec::new() });
        self.stats.generated += 1;
        self.stats.live_buffers = self.buffers.len() as u32;
        Ok(handle)
    }

    fn upload_buffer(&mut self, handle: BufferHandle, target: BufferTarget, data: &[u8]) -> Result<()> {
        let Some(buffer) = self.buffers.get_mut(&handle) else {
            engine_bail!("arbor3d::HeadlessGraphicsDevice", BackendError =>
                "Upload to unknown buffer {}", handle);
        };
        buffer.target = Some(target);
        buffer.data.clear();
        buffer.data.extend_from_slice(data);
        self.stats.uploaded_bytes += data.len() as u64;
        Ok(())
    }

    fn delete_buffer(&mut self, handle: BufferHandle) -> Result<()> {
        if self.buffers.remove(&handle).is_none() {
            engine_bail!("arbor3d::HeadlessGraphicsDevice", BackendError =>
                "Delete of unknown buffer {}", handle);
        }
        self.stats.deleted += 1;
        self.stats.live_buffers = self.buffers.len() as u32;
        Ok(())
    }

    fn stats(&self) -> GraphicsDeviceStats {
        self.stats
    }
}

#[cfg(test)]
#[path = "headless_graphics_device_tests.rs"]
mod tests;
