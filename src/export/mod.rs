//! Rendering a slice of the transcript into a single tall PNG.
//!
//! The exporter uses the same layout engine and drawing surface as the
//! canvas, with the larger [`LayoutStyle::export`] metrics and glyph
//! measurement. Rendering runs on a worker thread (see [`worker`]).

pub mod worker;
pub mod writer;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::RgbaImage;
use thiserror::Error;

use crate::layout::{FontSpec, LayoutStyle, Point, SequenceLayouter, TextMeasure, TextRun};
use crate::types::Message;
use crate::ui::drawing::{PixelSink, Painter};
use crate::ui::surface::{draw_item, Surface};
use crate::ui::text_rasterizing::TextRenderer;
use crate::ui::theme::{self, Palette};
use crate::view::{DisplayedSet, ViewState};

pub use worker::{spawn_export, CancelToken, ExportEvent, ExportHandle, ExportJob};
pub use writer::{save_png, ExportSummary};

/// Vertical budget per message when sizing the canvas up front
const HEIGHT_PER_MESSAGE: u32 = 80;
/// Title block and bottom margin allowance
const HEIGHT_OVERHEAD: u32 = 200;
/// Stop placing messages once the cursor is this close to the bottom
const BOTTOM_RESERVE: f32 = 100.;
/// Space kept below the last message when cropping
const CROP_MARGIN: f32 = 50.;
/// Progress is reported after every this many messages
const PROGRESS_EVERY: usize = 10;

const COUNT_PRESETS: [usize; 3] = [20, 50, 100];
const MAX_COUNT_PRESET: usize = 200;

const TITLE_FONT: FontSpec = FontSpec::new(24., theme::FONT_WEIGHT_BOLD, 13.);
const SUBTITLE_FONT: FontSpec = FontSpec::new(14., theme::FONT_WEIGHT_REGULAR, 7.);
const TITLE_Y: f32 = 30.;
const SUBTITLE_Y: f32 = 70.;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No usable font faces for rendering")]
    BackendUnavailable,

    #[error("Nothing to export")]
    NothingToExport,

    #[error("Export cancelled")]
    Cancelled,

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Export produced an empty file at {path}")]
    EmptyOutput { path: PathBuf },

    #[error("Could not start export worker: {0}")]
    Worker(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExportError>;

/// Export dimensions and limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    pub width: u32,
    /// Ceiling on the pre-allocated image height
    pub max_height: u32,
    pub max_messages: usize,
    /// Body characters before the ellipsis; 0 = unlimited
    pub truncate: usize,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            width: 1200,
            max_height: 8000,
            max_messages: 50,
            truncate: 300,
        }
    }
}

impl ExportOptions {
    pub fn style(&self) -> LayoutStyle {
        LayoutStyle::export().with_truncate_budget(self.truncate)
    }
}

/// The most recent `max_count` displayed messages (all of them if fewer)
pub fn select_recent(displayed: &DisplayedSet, max_count: usize) -> Vec<Message> {
    let skip = displayed.len().saturating_sub(max_count);
    displayed.iter().skip(skip).cloned().collect()
}

/// Pre-allocated height for `count` messages, capped at `max_height`
pub fn estimate_height(count: usize, max_height: u32) -> u32 {
    let count = u32::try_from(count).unwrap_or(u32::MAX);
    count
        .saturating_mul(HEIGHT_PER_MESSAGE)
        .saturating_add(HEIGHT_OVERHEAD)
        .min(max_height)
}

/// `<chat name>_chat_<count>msg.png`, with the name reduced to a single
/// path component: spaces, separators, characters Windows rejects and control
/// characters become `_`, and leading dots are dropped.
pub fn default_export_file_name(chat_name: &str, count: usize) -> String {
    let stem: String = chat_name
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("{}_chat_{}msg.png", stem.trim_start_matches('.'), count)
}

/// Count choices offered for a displayed set of `total` messages
pub fn export_count_options(total: usize) -> Vec<usize> {
    let mut options: Vec<usize> = COUNT_PRESETS.into_iter().filter(|&n| n <= total).collect();
    let maximum = total.min(MAX_COUNT_PRESET);
    if maximum > 0 && !options.contains(&maximum) {
        options.push(maximum);
    }
    options
}

/// Count that follows `current` among [`export_count_options`], wrapping
/// back to the smallest. With nothing displayed `current` is kept.
pub fn next_export_count(current: usize, total: usize) -> usize {
    let options = export_count_options(total);
    options
        .iter()
        .copied()
        .find(|&n| n > current)
        .or_else(|| options.first().copied())
        .unwrap_or(current)
}

/// Fail early when neither the system nor `font_path` provides a face to
/// render with.
pub fn check_render_backend(font_path: Option<&Path>) -> Result<()> {
    if TextRenderer::with_font_file(font_path).has_fonts() {
        Ok(())
    } else {
        Err(ExportError::BackendUnavailable)
    }
}

/// What the worker renders: owned, so later view changes can't touch it
#[derive(Debug, Clone)]
pub struct ExportSnapshot {
    pub chat_name: String,
    pub messages: Arc<[Message]>,
}

impl ExportSnapshot {
    /// The most recent `max_count` messages of the current displayed set
    pub fn from_view(view: &ViewState, max_count: usize) -> Self {
        Self {
            chat_name: view.chat_name().to_string(),
            messages: select_recent(view.displayed(), max_count).into(),
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportProgress {
    pub done: usize,
    pub total: usize,
}

impl ExportProgress {
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        (self.done * 100 / self.total).min(100) as u8
    }
}

fn centered_run(text: String, y: f32, font: FontSpec, width: f32, measure: &mut dyn TextMeasure) -> TextRun {
    let text_width = measure.text_width(&text, &font);
    TextRun {
        text,
        origin: Point::new(((width - text_width) / 2.).max(0.), y),
        font,
    }
}

/// Render `messages` top to bottom under a title block.
///
/// Messages stop being placed once the cursor passes `height - 100`, and the
/// image is cropped to the content. Cancellation is checked between messages.
pub fn render_export(
    messages: &[Message],
    chat_name: &str,
    options: &ExportOptions,
    text: &mut TextRenderer,
    progress: &mut dyn FnMut(ExportProgress),
    cancel: &CancelToken,
) -> Result<RgbaImage> {
    if messages.is_empty() {
        return Err(ExportError::NothingToExport);
    }
    if !text.has_fonts() {
        return Err(ExportError::BackendUnavailable);
    }

    let style = options.style();
    let palette = Palette {
        background: theme::WINDOW_BG,
        ..Palette::dark()
    };
    let width = options.width as f32;
    let height = estimate_height(messages.len(), options.max_height);
    let mut img = RgbaImage::new(options.width, height);
    PixelSink::fill(&mut img, palette.background);

    let title = centered_run(format!("💬 {}", chat_name), TITLE_Y, TITLE_FONT, width, text);
    let subtitle = centered_run(
        format!("Last {} messages", messages.len()),
        SUBTITLE_Y,
        SUBTITLE_FONT,
        width,
        text,
    );
    {
        let mut painter = Painter::new(&mut img, Some(&mut *text));
        painter.draw_text(&title, theme::TITLE_TEXT);
        painter.draw_text(&subtitle, theme::SUBTITLE_TEXT);
    }

    let limit = height as f32 - BOTTOM_RESERVE;
    let total = messages.len();
    let mut layouter = SequenceLayouter::new(&style, width);
    let mut placed = 0;

    for (i, message) in messages.iter().enumerate() {
        if cancel.is_cancelled() {
            log::info!("Export cancelled after {} of {} messages", i, total);
            return Err(ExportError::Cancelled);
        }
        if layouter.cursor() > limit {
            log::info!("Export height limit reached after {} of {} messages", i, total);
            break;
        }

        let before = layouter.len();
        layouter.push(message, text);
        let mut painter = Painter::new(&mut img, Some(&mut *text));
        for item in &layouter.items()[before..] {
            draw_item(&mut painter, item, &palette);
        }
        placed += 1;

        if placed % PROGRESS_EVERY == 0 {
            progress(ExportProgress { done: placed, total });
        }
    }
    progress(ExportProgress { done: total, total });

    let content = layouter.cursor();
    let final_height = ((content + CROP_MARGIN).ceil() as u32).min(height);
    log::debug!(
        "Rendered {} messages into {}x{} (allocated {})",
        placed,
        options.width,
        final_height,
        height
    );

    if final_height == height {
        return Ok(img);
    }
    Ok(image::imageops::crop_imm(&img, 0, 0, options.width, final_height).to_image())
}
