/// Graphics device module - the buffer-object seam between the scene graph
/// and whatever owns the rendering context

mod graphics_device;
mod headless_graphics_device;

pub use graphics_device::*;
pub use headless_graphics_device::HeadlessGraphicsDevice;
