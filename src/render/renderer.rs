//! Buffer ownership and frame-level drawing state.
//!
//! The [`Renderer`] owns the color and depth buffers for the lifetime of
//! the engine; the rasterizer borrows them through a [`FrameBuffer`] view
//! for the duration of one frame, and the presenter reads the color
//! buffer as bytes afterwards.

use super::framebuffer::FrameBuffer;
use crate::colors;

pub struct Renderer {
    color_buffer: Vec<u32>,
    depth_buffer: Vec<f32>,
    width: u32,
    height: u32,
}

impl Renderer {
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width * height) as usize;
        Self {
            color_buffer: vec![colors::BACKGROUND; size],
            // 1.0 = background at infinity under the 1 - 1/w depth key
            depth_buffer: vec![1.0; size],
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn clear(&mut self, color: u32) {
        self.color_buffer.fill(color);
    }

    /// Reset every depth cell to 1.0 to prepare for a new frame.
    #[inline]
    pub fn clear_depth(&mut self) {
        self.depth_buffer.fill(1.0);
    }

    /// The color buffer as ARGB8888 bytes for presentation.
    pub fn as_bytes(&self) -> &[u8] {
        unsafe {
            std::slice::from_raw_parts(
                self.color_buffer.as_ptr() as *const u8,
                self.color_buffer.len() * 4,
            )
        }
    }

    /// Get a mutable FrameBuffer view into the color and depth buffers.
    pub fn as_framebuffer(&mut self) -> FrameBuffer<'_> {
        FrameBuffer::new(
            &mut self.color_buffer,
            &mut self.depth_buffer,
            self.width,
            self.height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_resets_both_buffers() {
        let mut renderer = Renderer::new(4, 4);
        {
            let mut fb = renderer.as_framebuffer();
            fb.set_pixel_with_depth(1, 1, 0.25, 0xFFFF0000);
        }

        renderer.clear(colors::BACKGROUND);
        renderer.clear_depth();

        let fb = renderer.as_framebuffer();
        assert_eq!(fb.get_pixel(1, 1), Some(colors::BACKGROUND));
        assert_eq!(fb.get_depth(1, 1), Some(1.0));
    }

    #[test]
    fn byte_view_matches_buffer_size() {
        let renderer = Renderer::new(8, 4);
        assert_eq!(renderer.as_bytes().len(), 8 * 4 * 4);
    }
}
