use std::num::NonZeroU32;
use std::sync::Arc;

use softbuffer::{Buffer, Context, SoftBufferError, Surface};
use winit::window::Window;

/// CPU framebuffer for the window
pub struct Renderer {
    _context: Context<Arc<Window>>,
    surface: Surface<Arc<Window>, Arc<Window>>,
    width: u32,
    height: u32,
}

impl Renderer {
    pub fn new(window: Arc<Window>) -> Result<Self, SoftBufferError> {
        let context = Context::new(Arc::clone(&window))?;
        let surface = Surface::new(&context, Arc::clone(&window))?;
        let size = window.inner_size();

        let mut renderer = Self {
            _context: context,
            surface,
            width: 0,
            height: 0,
        };
        renderer.resize(size.width, size.height)?;
        Ok(renderer)
    }

    /// Zero-sized requests (minimized windows) are ignored
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), SoftBufferError> {
        let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) else {
            return Ok(());
        };
        self.surface.resize(w, h)?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Get mutable access to softbuffer's internal buffer for direct drawing
    /// Important: Call .present() on the returned buffer when done, don't drop it early!
    pub fn lock_buffer(&mut self) -> Result<Buffer<'_, Arc<Window>, Arc<Window>>, SoftBufferError> {
        self.surface.buffer_mut()
    }
}
