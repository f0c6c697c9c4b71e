//! The interactive window: header, message canvas, footer, and the export
//! worker it may be running.

use std::path::PathBuf;
use std::sync::Arc;

use softbuffer::SoftBufferError;
use winit::dpi::PhysicalSize;
use winit::event_loop::EventLoopProxy;
use winit::keyboard::ModifiersState;
use winit::window::Window;

use super::canvas::CanvasRenderer;
use super::drawing::{FrameSink, Painter, PixelSink};
use super::renderer::Renderer;
use super::surface::Surface;
use super::text_rasterizing::TextRenderer;
use super::theme::{self, Palette};
use super::ViewerEvent;
use crate::config::ViewerConfig;
use crate::export::{
    default_export_file_name, next_export_count, spawn_export, ExportError, ExportEvent,
    ExportHandle, ExportJob, ExportOptions, ExportSnapshot,
};
use crate::layout::{CharWidthMeasure, FontSpec, Point, Rect, TextMeasure, TextRun};
use crate::view::{step_page_size, PageNav, ViewState};

pub const HEADER_HEIGHT: f32 = 56.;
pub const FOOTER_HEIGHT: f32 = 36.;
const BAR_PADDING: f32 = 16.;

const TITLE_FONT: FontSpec = FontSpec::new(16., theme::FONT_WEIGHT_BOLD, 8.);
const STATS_FONT: FontSpec = FontSpec::new(12., theme::FONT_WEIGHT_REGULAR, 6.);
const FOOTER_FONT: FontSpec = FontSpec::new(13., theme::FONT_WEIGHT_REGULAR, 7.);

const SEARCH_PLACEHOLDER: &str = "Type to search";

/// Footer hint naming how many messages Ctrl+E will export
fn export_hint(count: usize, displayed: usize) -> String {
    format!("Ctrl+E export {} · Ctrl+N count", count.min(displayed))
}

/// One line of feedback in the footer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub text: String,
    pub is_error: bool,
}

impl Status {
    fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

pub struct ViewerApp {
    window: Arc<Window>,
    renderer: Renderer,
    text: TextRenderer,
    approx: CharWidthMeasure,
    /// Glyph measurement when any font face is available
    use_glyphs: bool,

    config: ViewerConfig,
    view: ViewState,
    canvas: CanvasRenderer,
    palette: Palette,

    pub width: u32,
    pub height: u32,
    pub modifiers: ModifiersState,

    status: Option<Status>,
    /// Messages the next export takes, before capping at the displayed count
    export_count: usize,
    export: Option<ExportHandle>,
    event_proxy: EventLoopProxy<ViewerEvent>,

    /// Set whenever the next frame differs from the last
    pub window_dirty: bool,
}

impl ViewerApp {
    pub fn new(
        window: Arc<Window>,
        view: ViewState,
        config: ViewerConfig,
        event_proxy: EventLoopProxy<ViewerEvent>,
    ) -> Result<Self, SoftBufferError> {
        let renderer = Renderer::new(Arc::clone(&window))?;
        let (width, height) = renderer.size();

        let text = TextRenderer::with_font_file(config.font_path.as_deref());
        let use_glyphs = text.has_fonts();
        if !use_glyphs {
            log::warn!("No font faces found: falling back to approximate layout, text will not be drawn");
        }

        let mut app = Self {
            window,
            renderer,
            text,
            approx: CharWidthMeasure,
            use_glyphs,
            canvas: CanvasRenderer::new(config.canvas_style()),
            export_count: config.export_options().max_messages,
            config,
            view,
            palette: Palette::dark(),
            width,
            height,
            modifiers: ModifiersState::empty(),
            status: None,
            export: None,
            event_proxy,
            window_dirty: true,
        };
        app.relayout();
        Ok(app)
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn canvas(&self) -> &CanvasRenderer {
        &self.canvas
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }

    /// Region of the window the message canvas occupies
    pub fn canvas_viewport(&self) -> Rect {
        let h = (self.height as f32 - HEADER_HEIGHT - FOOTER_HEIGHT).max(0.);
        Rect::new(0., HEADER_HEIGHT, self.width as f32, h)
    }

    fn relayout(&mut self) {
        let viewport = self.canvas_viewport();
        let measure: &mut dyn TextMeasure = if self.use_glyphs {
            &mut self.text
        } else {
            &mut self.approx
        };
        self.canvas.relayout(&self.view, viewport, measure);
        self.window_dirty = true;
    }

    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        if let Err(e) = self.renderer.resize(size.width, size.height) {
            log::error!("Failed to resize framebuffer: {}", e);
            return;
        }
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.width = size.width;
        self.height = size.height;
        self.relayout();
    }

    pub fn update_modifiers(&mut self, modifiers: ModifiersState) {
        self.modifiers = modifiers;
    }

    fn set_view(&mut self, view: ViewState) {
        self.view = view;
        self.relayout();
    }

    /// Returns whether the page changed
    pub fn navigate(&mut self, nav: PageNav) -> bool {
        match self.view.navigate(nav) {
            Some(view) => {
                self.set_view(view);
                true
            }
            None => false,
        }
    }

    pub fn set_query(&mut self, query: &str) {
        if query == self.view.query_text() {
            return;
        }
        let view = self.view.with_query(query);
        self.set_view(view);
    }

    pub fn push_query_text(&mut self, text: &str) {
        let mut query = self.view.query_text().to_string();
        query.push_str(text);
        self.set_query(&query);
    }

    pub fn pop_query_char(&mut self) {
        let mut query = self.view.query_text().to_string();
        if query.pop().is_some() {
            self.set_query(&query);
        }
    }

    /// Grow or shrink the page by one step; returns whether it changed
    pub fn step_page_size(&mut self, grow: bool) -> bool {
        let current = self.view.pagination().page_size();
        let page_size = step_page_size(current, grow);
        if page_size == current {
            return false;
        }
        log::debug!("Page size {} -> {}", current, page_size);
        let view = self.view.with_page_size(page_size);
        self.set_view(view);
        true
    }

    pub fn scroll_by(&mut self, delta: f32) -> bool {
        let changed = self.canvas.scroll_by(delta);
        if changed {
            self.window_dirty = true;
        }
        changed
    }

    // ------------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------------

    pub fn is_exporting(&self) -> bool {
        self.export.is_some()
    }

    pub fn export_count(&self) -> usize {
        self.export_count
    }

    /// Move to the next export count choice for the displayed set
    pub fn cycle_export_count(&mut self) -> bool {
        let displayed = self.view.displayed().len();
        let next = next_export_count(self.export_count, displayed);
        if next == self.export_count {
            return false;
        }
        self.export_count = next;
        if self.export.is_none() {
            self.status = None;
        }
        self.window_dirty = true;
        true
    }

    /// Start exporting the most recent messages of the displayed set
    pub fn start_export(&mut self) {
        if self.export.is_some() {
            self.status = Some(Status::info("Export already running"));
            self.window_dirty = true;
            return;
        }
        match self.spawn_export() {
            Ok(handle) => {
                self.export = Some(handle);
                self.status = Some(Status::info("Exporting..."));
            }
            Err(e) => {
                log::warn!("Export not started: {}", e);
                self.status = Some(Status::error(e.to_string()));
            }
        }
        self.window_dirty = true;
    }

    fn spawn_export(&self) -> Result<ExportHandle, ExportError> {
        if !self.use_glyphs {
            return Err(ExportError::BackendUnavailable);
        }
        let options = ExportOptions {
            max_messages: self.export_count,
            ..self.config.export_options()
        };
        let snapshot = ExportSnapshot::from_view(&self.view, options.max_messages);
        if snapshot.is_empty() {
            return Err(ExportError::NothingToExport);
        }

        let file_name = default_export_file_name(&snapshot.chat_name, snapshot.len());
        let output: PathBuf = self.config.export_directory().join(file_name);
        let job = ExportJob {
            snapshot,
            options,
            output,
            font_path: self.config.font_path.clone(),
        };

        let proxy = self.event_proxy.clone();
        spawn_export(job, move || {
            let _ = proxy.send_event(ViewerEvent::ExportUpdate);
        })
    }

    pub fn cancel_export(&mut self) -> bool {
        match &self.export {
            Some(handle) => {
                handle.cancel();
                self.status = Some(Status::info("Cancelling export..."));
                self.window_dirty = true;
                true
            }
            None => false,
        }
    }

    /// Drain worker events; returns whether anything visible changed
    pub fn poll_export(&mut self) -> bool {
        let Some(handle) = self.export.as_mut() else {
            return false;
        };

        let mut changed = false;
        let mut finished = false;
        while let Some(event) = handle.try_event() {
            changed = true;
            match event {
                ExportEvent::Progress(progress) => {
                    self.status = Some(Status::info(format!(
                        "Exporting... {}%",
                        progress.percent()
                    )));
                }
                ExportEvent::Finished(Ok(summary)) => {
                    self.status = Some(Status::info(format!(
                        "Saved {}",
                        summary.path.display()
                    )));
                    finished = true;
                }
                ExportEvent::Finished(Err(e)) => {
                    self.status = Some(Status::error(format!("Export failed: {}", e)));
                    finished = true;
                }
            }
        }

        if !finished && handle.is_finished() {
            self.status = Some(Status::error("Export failed: worker stopped"));
            finished = true;
            changed = true;
        }
        if finished {
            if let Some(handle) = self.export.take() {
                handle.join();
            }
        }
        if changed {
            self.window_dirty = true;
        }
        changed
    }

    // ------------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------------

    fn header_runs(&mut self) -> Vec<(TextRun, u32)> {
        let width = self.width as f32;
        let page_label = self.view.page_label();
        let measure: &mut dyn TextMeasure = if self.use_glyphs {
            &mut self.text
        } else {
            &mut self.approx
        };
        let page_width = measure.text_width(&page_label, &STATS_FONT);

        vec![
            (
                TextRun {
                    text: self.view.chat_name().to_string(),
                    origin: Point::new(BAR_PADDING, 8.),
                    font: TITLE_FONT,
                },
                theme::TEXT,
            ),
            (
                TextRun {
                    text: self.view.stats().to_string(),
                    origin: Point::new(BAR_PADDING, 32.),
                    font: STATS_FONT,
                },
                theme::STATUS_TEXT,
            ),
            (
                TextRun {
                    text: page_label,
                    origin: Point::new((width - BAR_PADDING - page_width).max(0.), 10.),
                    font: STATS_FONT,
                },
                theme::STATUS_TEXT,
            ),
        ]
    }

    fn footer_runs(&mut self) -> Vec<(TextRun, u32)> {
        let width = self.width as f32;
        let y = self.height as f32 - FOOTER_HEIGHT + 10.;

        let (search, search_colour) = if self.view.query_text().is_empty() {
            (SEARCH_PLACEHOLDER.to_string(), theme::PLACEHOLDER_TEXT)
        } else {
            (format!("🔍 {}", self.view.query_text()), theme::TEXT)
        };
        let (right, right_colour) = match &self.status {
            Some(status) if status.is_error => (status.text.clone(), theme::STATUS_ERROR),
            Some(status) => (status.text.clone(), theme::STATUS_TEXT),
            None => (
                export_hint(self.export_count, self.view.displayed().len()),
                theme::PLACEHOLDER_TEXT,
            ),
        };

        let measure: &mut dyn TextMeasure = if self.use_glyphs {
            &mut self.text
        } else {
            &mut self.approx
        };
        let right_width = measure.text_width(&right, &FOOTER_FONT);

        vec![
            (
                TextRun {
                    text: search,
                    origin: Point::new(BAR_PADDING, y),
                    font: FOOTER_FONT,
                },
                search_colour,
            ),
            (
                TextRun {
                    text: right,
                    origin: Point::new((width - BAR_PADDING - right_width).max(0.), y),
                    font: FOOTER_FONT,
                },
                right_colour,
            ),
        ]
    }

    pub fn render(&mut self) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let header = self.header_runs();
        let footer = self.footer_runs();
        let width = self.width as usize;
        let (w, h) = (self.width as f32, self.height as f32);
        let viewport = self.canvas_viewport();

        let mut buffer = match self.renderer.lock_buffer() {
            Ok(buffer) => buffer,
            Err(e) => {
                log::error!("Failed to lock framebuffer: {}", e);
                return;
            }
        };

        {
            let mut sink = FrameSink::new(&mut buffer, width);
            sink.fill(theme::WINDOW_BG);
            {
                let text = self.use_glyphs.then_some(&mut self.text);
                let mut painter = Painter::new(&mut sink, text);
                painter.fill_rect(Rect::new(0., HEADER_HEIGHT - 1., w, 1.), theme::HAIRLINE);
                painter.fill_rect(Rect::new(0., h - FOOTER_HEIGHT, w, 1.), theme::HAIRLINE);
                for (run, colour) in header.iter().chain(footer.iter()) {
                    painter.draw_text(run, *colour);
                }
            }

            let text = self.use_glyphs.then_some(&mut self.text);
            let mut canvas_painter = Painter::new(&mut sink, text)
                .with_origin(self.canvas.origin())
                .with_clip(viewport);
            self.canvas.draw(&mut canvas_painter, &self.palette);
        }

        if let Err(e) = buffer.present() {
            log::error!("Failed to present frame: {}", e);
        }
        self.window_dirty = false;
    }
}
