// Mouse input handling for ViewerApp

use winit::event::MouseScrollDelta;

use super::app::ViewerApp;

/// Pixels per wheel notch
const LINE_SCROLL: f32 = 40.;

impl ViewerApp {
    /// Returns whether the canvas moved
    pub fn handle_mouse_wheel(&mut self, delta: MouseScrollDelta) -> bool {
        // Wheel up (positive y) scrolls toward older messages
        let pixels = match delta {
            MouseScrollDelta::LineDelta(_x, y) => y * LINE_SCROLL,
            MouseScrollDelta::PixelDelta(pos) => pos.y as f32,
        };
        if pixels == 0. {
            return false;
        }
        self.scroll_by(-pixels)
    }
}
