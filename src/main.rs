use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use transcript_viewer::ui::{InputResult, ViewerApp, ViewerEvent};
use transcript_viewer::{Transcript, ViewState, ViewerConfig};

use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy},
    window::{Window, WindowId},
};

const WINDOW_WIDTH: f64 = 900.;
const WINDOW_HEIGHT: f64 = 800.;

/// Browse an exported chat transcript as message bubbles
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Exported chat (result.json)
    file: PathBuf,

    /// Sender id substring that marks your own messages
    #[arg(long)]
    self_id: Option<String>,

    /// Messages per page
    #[arg(long)]
    page_size: Option<usize>,

    /// Config file instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,
}

struct App {
    window: Option<Arc<Window>>,
    viewer: Option<ViewerApp>,
    /// Handed to the viewer on first resume
    initial: Option<(ViewState, ViewerConfig)>,
    event_proxy: EventLoopProxy<ViewerEvent>,
    error: Option<anyhow::Error>,
}

impl ApplicationHandler<ViewerEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let Some((view, config)) = self.initial.take() else {
            return;
        };

        let window_attributes = Window::default_attributes()
            .with_title(format!("{} - Transcript Viewer", view.chat_name()))
            .with_inner_size(LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT))
            .with_min_inner_size(LogicalSize::new(360., 300.));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.error = Some(anyhow::Error::new(e).context("Failed to create window"));
                event_loop.exit();
                return;
            }
        };

        match ViewerApp::new(Arc::clone(&window), view, config, self.event_proxy.clone()) {
            Ok(viewer) => {
                self.viewer = Some(viewer);
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                self.error = Some(anyhow::anyhow!("Failed to create framebuffer: {}", e));
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(viewer) = &mut self.viewer else {
            return;
        };
        match event {
            WindowEvent::CloseRequested => {
                if viewer.is_exporting() {
                    viewer.cancel_export();
                }
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                viewer.resize(size);
                viewer.request_redraw();
            }
            WindowEvent::RedrawRequested => {
                viewer.render();
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                viewer.update_modifiers(modifiers.state());
            }
            WindowEvent::KeyboardInput { event, .. } => match viewer.handle_keyboard(event) {
                InputResult::Quit => {
                    if viewer.is_exporting() {
                        viewer.cancel_export();
                    }
                    event_loop.exit();
                }
                InputResult::Redraw => viewer.request_redraw(),
                InputResult::Unchanged => {}
            },
            WindowEvent::MouseWheel { delta, .. } => {
                if viewer.handle_mouse_wheel(delta) {
                    viewer.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        // Nothing animates; the export worker wakes us through the proxy
        event_loop.set_control_flow(ControlFlow::Wait);
        if let Some(viewer) = &self.viewer {
            if viewer.window_dirty {
                viewer.request_redraw();
            }
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: ViewerEvent) {
        match event {
            ViewerEvent::ExportUpdate => {
                if let Some(viewer) = &mut self.viewer {
                    if viewer.poll_export() {
                        viewer.request_redraw();
                    }
                }
            }
        }
    }
}

fn main() -> Result<()> {
    transcript_viewer::init_logging();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ViewerConfig::load_from(path),
        None => ViewerConfig::load(),
    }
    .context("Failed to load config")?;
    if args.self_id.is_some() {
        config.self_id = args.self_id;
    }
    if let Some(page_size) = args.page_size {
        config.page_size = page_size;
    }

    let transcript = Transcript::load(&args.file, config.self_id())
        .with_context(|| format!("Failed to load {}", args.file.display()))?;
    let view = ViewState::new(config.page_size).load(transcript);
    log::info!("{}", view.stats());

    let event_loop = EventLoop::<ViewerEvent>::with_user_event()
        .build()
        .context("Failed to create event loop")?;
    let event_proxy = event_loop.create_proxy();
    let mut app = App {
        window: None,
        viewer: None,
        initial: Some((view, config)),
        event_proxy,
        error: None,
    };

    event_loop.run_app(&mut app).context("Event loop failed")?;
    match app.error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
