pub mod app;
pub mod canvas;
pub mod drawing;
mod keyboard;
mod mouse;
pub mod renderer;
pub mod surface;
pub mod text_rasterizing;
pub mod theme;

pub use app::{Status, ViewerApp};
pub use keyboard::InputResult;

/// Custom events for cross-thread communication with the event loop
#[derive(Debug, Clone)]
pub enum ViewerEvent {
    /// Export worker sent progress or finished - wake event loop
    ExportUpdate,
}
