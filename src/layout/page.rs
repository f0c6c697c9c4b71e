//! Stacking message layouts into a page, with date separators folded in.

use crate::types::Message;

use super::engine::{layout_date_separator, layout_message, DateSeparatorLayout, MessageLayout};
use super::measure::TextMeasure;
use super::style::LayoutStyle;

#[derive(Debug, Clone, PartialEq)]
pub enum LayoutItem {
    DateSeparator(DateSeparatorLayout),
    Message(MessageLayout),
}

impl LayoutItem {
    pub fn top(&self) -> f32 {
        match self {
            LayoutItem::DateSeparator(d) => d.pill.y,
            LayoutItem::Message(m) => m.top(),
        }
    }

    /// Lowest painted y, tail included
    pub fn bottom(&self) -> f32 {
        match self {
            LayoutItem::DateSeparator(d) => d.pill.bottom(),
            LayoutItem::Message(m) => m.top() + m.height(),
        }
    }

    pub fn translated(self, dx: f32, dy: f32) -> Self {
        match self {
            LayoutItem::DateSeparator(d) => LayoutItem::DateSeparator(d.translated(dx, dy)),
            LayoutItem::Message(m) => LayoutItem::Message(m.translated(dx, dy)),
        }
    }
}

/// A laid-out page in content coordinates
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub items: Vec<LayoutItem>,
    /// Cursor after the last item
    pub content_bottom: f32,
    pub width: f32,
}

impl PageLayout {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn message_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item, LayoutItem::Message(_)))
            .count()
    }

    pub fn separator_count(&self) -> usize {
        self.items.len() - self.message_count()
    }

    /// Items whose span intersects `[top, bottom)`
    pub fn visible(&self, top: f32, bottom: f32) -> impl Iterator<Item = &LayoutItem> {
        self.items
            .iter()
            .filter(move |item| item.top() < bottom && item.bottom() > top)
    }
}

/// Incremental fold over messages.
///
/// Tracks the vertical cursor and the last date label; a separator is emitted
/// whenever a message's date label differs from the previous one, including
/// before the very first message.
pub struct SequenceLayouter<'a> {
    style: &'a LayoutStyle,
    width: f32,
    cursor: f32,
    last_date: Option<String>,
    items: Vec<LayoutItem>,
}

impl<'a> SequenceLayouter<'a> {
    pub fn new(style: &'a LayoutStyle, width: f32) -> Self {
        Self {
            style,
            width,
            cursor: style.top,
            last_date: None,
            items: Vec::new(),
        }
    }

    pub fn cursor(&self) -> f32 {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items placed so far, in order
    pub fn items(&self) -> &[LayoutItem] {
        &self.items
    }

    /// Lay out `message` below everything pushed so far
    pub fn push(&mut self, message: &Message, measure: &mut dyn TextMeasure) {
        let date = message.date_label();
        if self.last_date.as_deref() != Some(date.as_str()) {
            let separator = layout_date_separator(&date, self.width, self.style, measure)
                .translated(0., self.cursor);
            self.cursor += self.style.date_pill_height + self.style.date_gap;
            self.items.push(LayoutItem::DateSeparator(separator));
            self.last_date = Some(date);
        }

        let layout = layout_message(message, self.width, self.style, measure);
        let advance = layout.advance(self.style);
        self.items
            .push(LayoutItem::Message(layout.translated(0., self.cursor)));
        self.cursor += advance;
    }

    pub fn finish(self) -> PageLayout {
        PageLayout {
            items: self.items,
            content_bottom: self.cursor,
            width: self.width,
        }
    }
}

/// Lay out a run of messages top to bottom
pub fn layout_sequence<'m, I>(
    messages: I,
    width: f32,
    style: &LayoutStyle,
    measure: &mut dyn TextMeasure,
) -> PageLayout
where
    I: IntoIterator<Item = &'m Message>,
{
    let mut layouter = SequenceLayouter::new(style, width);
    for message in messages {
        layouter.push(message, measure);
    }
    layouter.finish()
}
