/// GraphicsDevice trait - buffer object interface used by geometry resources

use std::fmt;
use crate::error::Result;

// ============================================================================
// Buffer handle
// ============================================================================

/// Opaque buffer object name handed out by a graphics device.
///
/// Validity is tracked purely through the sentinel: a resource with no
/// allocated buffer holds `BufferHandle::NONE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct BufferHandle(pub u32);

impl BufferHandle {
    /// The "no buffer" sentinel
    pub const NONE: BufferHandle = BufferHandle(0);

    pub fn is_valid(&self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for BufferHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Binding target of an uploaded buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// Per-vertex attribute data
    Array,
    /// Index data
    ElementArray,
}

/// Device statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphicsDeviceStats {
    /// Buffers currently alive on the device
    pub live_buffers: u32,
    /// Total buffers generated since creation
    pub generated: u32,
    /// Total buffers deleted since creation
    pub deleted: u32,
    /// Total bytes uploaded since creation
    pub uploaded_bytes: u64,
}

// ============================================================================
// GraphicsDevice trait
// ============================================================================

/// Buffer object factory
///
/// All calls happen on the thread that owns the rendering context; the
/// scene graph never synchronizes against that thread itself.
pub trait GraphicsDevice: Send {
    /// Reserve a new buffer object name
    ///
    /// # Errors
    ///
    /// `OutOfMemory` when the device cannot hand out more names,
    /// `BackendError` on any other device failure.
    fn generate_buffer(&mut self) -> Result<BufferHandle>;

    /// Upload `data` into a previously generated buffer
    fn upload_buffer(&mut self, handle: BufferHandle, target: BufferTarget, data: &[u8]) -> Result<()>;

    /// Release a buffer object
    fn delete_buffer(&mut self, handle: BufferHandle) -> Result<()>;

    /// Device statistics
    fn stats(&self) -> GraphicsDeviceStats {
        GraphicsDeviceStats::default()
    }
}
