//! Layout engine: messages in, positioned shapes and text runs out.
//!
//! Nothing in here touches pixels. Both the interactive canvas and the image
//! exporter consume [`PageLayout`] through the same drawing surface.

pub mod engine;
pub mod geometry;
pub mod measure;
pub mod page;
pub mod style;
pub mod wrap;

pub use engine::{
    layout_date_separator, layout_message, wrap_text, BubbleLayout, DateSeparatorLayout,
    MessageLayout, ServiceLayout, Side, TextRun,
};
pub use geometry::{Point, Rect};
pub use measure::{CharWidthMeasure, FontSpec, MeasureMode, TextMeasure};
pub use page::{layout_sequence, LayoutItem, PageLayout, SequenceLayouter};
pub use style::{LayoutStyle, TailStyle};
pub use wrap::{wrap_by_chars, wrap_by_width, wrap_words};
