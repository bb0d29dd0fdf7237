//! Rasterization backend: buffers and the primitive rasterizer.

pub mod framebuffer;
pub mod rasterizer;
pub mod renderer;

pub use framebuffer::FrameBuffer;
pub use rasterizer::{Primitive, RasterBackend, ScanlineRasterizer};
pub use renderer::Renderer;
