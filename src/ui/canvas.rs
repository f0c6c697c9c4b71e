//! Interactive message canvas: the current page, laid out and scrollable.

use crate::layout::{layout_sequence, LayoutStyle, MeasureMode, PageLayout, Point, Rect, TextMeasure, TextRun};
use crate::view::ViewState;

use super::surface::{draw_page, Surface};
use super::theme::Palette;

/// Shown in place of the stream when nothing matches
pub const EMPTY_NOTICE: &str = "No messages found";

/// Projection of a [`ViewState`] page onto a scrollable viewport.
///
/// Coordinates inside are content coordinates; [`CanvasRenderer::origin`]
/// maps them into the host frame.
#[derive(Debug)]
pub struct CanvasRenderer {
    style: LayoutStyle,
    page: PageLayout,
    viewport: Rect,
    scroll: f32,
    notice: Option<TextRun>,
    mode: Option<MeasureMode>,
}

impl CanvasRenderer {
    pub fn new(style: LayoutStyle) -> Self {
        Self {
            style,
            page: PageLayout::default(),
            viewport: Rect::default(),
            scroll: 0.,
            notice: None,
            mode: None,
        }
    }

    pub fn style(&self) -> &LayoutStyle {
        &self.style
    }

    pub fn page(&self) -> &PageLayout {
        &self.page
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    /// Lay out the current page of `view` for `viewport` and snap to the
    /// bottom. Call on resize, page change and filter change.
    pub fn relayout(&mut self, view: &ViewState, viewport: Rect, measure: &mut dyn TextMeasure) {
        let mode = measure.mode();
        if self.mode != Some(mode) {
            log::info!("Canvas text measurement: {:?}", mode);
            self.mode = Some(mode);
        }

        self.viewport = viewport;
        self.page = layout_sequence(view.page_messages(), viewport.w, &self.style, measure);

        self.notice = view.displayed().is_empty().then(|| {
            let font = self.style.body_font;
            let width = measure.text_width(EMPTY_NOTICE, &font);
            TextRun {
                text: EMPTY_NOTICE.to_string(),
                origin: Point::new(
                    ((viewport.w - width) / 2.).max(0.),
                    ((viewport.h - font.size) / 2.).max(0.),
                ),
                font,
            }
        });

        self.scroll = self.max_scroll();
        log::trace!(
            "Relayout: {} items, content height {}",
            self.page.items.len(),
            self.content_height()
        );
    }

    /// Scrollable height: stacked content plus bottom slack
    pub fn content_height(&self) -> f32 {
        self.page.content_bottom + self.style.bottom_slack
    }

    pub fn max_scroll(&self) -> f32 {
        (self.content_height() - self.viewport.h).max(0.)
    }

    /// Scroll by `delta` pixels (positive = down), clamped. Returns whether
    /// the position changed.
    pub fn scroll_by(&mut self, delta: f32) -> bool {
        let next = (self.scroll + delta).clamp(0., self.max_scroll());
        let changed = next != self.scroll;
        self.scroll = next;
        changed
    }

    /// Where content `(0, 0)` lands in the host frame
    pub fn origin(&self) -> Point {
        Point::new(self.viewport.x, self.viewport.y - self.scroll)
    }

    /// Paint the background and visible items in content coordinates.
    /// Returns the number of items drawn.
    pub fn draw(&self, surface: &mut dyn Surface, palette: &Palette) -> usize {
        let visible = Rect::new(0., self.scroll, self.viewport.w, self.viewport.h);
        surface.fill_rect(visible, palette.background);

        if let Some(notice) = &self.notice {
            let run = TextRun {
                origin: notice.origin.translated(0., self.scroll),
                ..notice.clone()
            };
            surface.draw_text(&run, palette.time);
            return 0;
        }
        draw_page(surface, &self.page, palette, visible.y, visible.bottom())
    }
}
