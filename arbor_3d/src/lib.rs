/*!
# Arbor 3D

Retained-mode scene graph core for real-time 3D applications.

The crate keeps a tree of spatial nodes, composes their transforms,
maintains hierarchical bounding volumes for ray picking, animates node
translations with keyframe timelines, and manages the device buffer
lifecycle of mesh geometry through a graphics device abstraction.

## Architecture

- **SceneGraph**: node arena (containers, lights, geometry, pick boxes)
- **GeometryStore**: mesh data with shared-buffer clones
- **Timeline**: keyframe animation of a node's translation
- **Camera**: view/projection and screen-space pick rays
- **GraphicsDevice**: buffer allocation seam (headless device included)
- **Drawer**: per-node draw strategy invoked by the scene traversal

Nothing here binds to a window or issues rasterization commands; a
rendering backend implements `GraphicsDevice` and `Drawer`.
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod intersection;
pub mod graphics_device;
pub mod resource;
pub mod animation;
pub mod scene;
pub mod camera;

// Main arbor3d namespace module
pub mod arbor3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine singleton (logging)
    pub use crate::engine::Engine;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, LogConfig, DefaultLogger};
    }

    pub mod scene {
        pub use crate::scene::*;
    }

    pub mod intersection {
        pub use crate::intersection::*;
    }

    pub mod animation {
        pub use crate::animation::*;
    }

    pub mod resource {
        pub use crate::resource::*;
    }

    pub mod graphics_device {
        pub use crate::graphics_device::*;
    }

    pub mod camera {
        pub use crate::camera::*;
    }
}

// Re-export math library at crate root
pub use glam;
