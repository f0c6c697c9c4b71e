//! The drawing capability both renderers share, and the code that paints
//! layout items through it.

use crate::layout::{
    BubbleLayout, DateSeparatorLayout, FontSpec, LayoutItem, MessageLayout, PageLayout, Point,
    Rect, ServiceLayout, Side, TextRun,
};

use super::theme::Palette;

/// Minimal drawing surface: filled shapes and text runs, colours in ARGB
pub trait Surface {
    fn fill_rect(&mut self, rect: Rect, colour: u32);
    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, colour: u32);
    fn fill_polygon(&mut self, points: &[Point], colour: u32);
    fn draw_text(&mut self, run: &TextRun, colour: u32);
}

/// One recorded call against a [`CommandRecorder`]
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Rect {
        rect: Rect,
        colour: u32,
    },
    RoundedRect {
        rect: Rect,
        radius: f32,
        colour: u32,
    },
    Polygon {
        points: Vec<Point>,
        colour: u32,
    },
    Text {
        text: String,
        origin: Point,
        font: FontSpec,
        colour: u32,
    },
}

/// Surface that remembers what it was asked to draw
#[derive(Debug, Default)]
pub struct CommandRecorder {
    pub commands: Vec<DrawCommand>,
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Surface for CommandRecorder {
    fn fill_rect(&mut self, rect: Rect, colour: u32) {
        self.commands.push(DrawCommand::Rect { rect, colour });
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, colour: u32) {
        self.commands.push(DrawCommand::RoundedRect {
            rect,
            radius,
            colour,
        });
    }

    fn fill_polygon(&mut self, points: &[Point], colour: u32) {
        self.commands.push(DrawCommand::Polygon {
            points: points.to_vec(),
            colour,
        });
    }

    fn draw_text(&mut self, run: &TextRun, colour: u32) {
        self.commands.push(DrawCommand::Text {
            text: run.text.clone(),
            origin: run.origin,
            font: run.font,
            colour,
        });
    }
}

pub fn draw_bubble(surface: &mut dyn Surface, bubble: &BubbleLayout, palette: &Palette) {
    let fill = match bubble.side {
        Side::Right => palette.bubble_own,
        Side::Left => palette.bubble_other,
    };
    surface.fill_rounded_rect(bubble.rect, bubble.radius, fill);
    surface.fill_polygon(&bubble.tail, fill);

    if let Some(sender) = &bubble.sender {
        surface.draw_text(sender, palette.sender);
    }
    for line in &bubble.lines {
        surface.draw_text(line, palette.text);
    }
    surface.draw_text(&bubble.time, palette.time);
}

pub fn draw_service(surface: &mut dyn Surface, service: &ServiceLayout, palette: &Palette) {
    surface.draw_text(&service.line, palette.service);
}

pub fn draw_date_separator(
    surface: &mut dyn Surface,
    separator: &DateSeparatorLayout,
    palette: &Palette,
) {
    surface.fill_rounded_rect(separator.pill, separator.pill.h / 2., palette.date_pill);
    surface.draw_text(&separator.label, palette.date_text);
}

pub fn draw_item(surface: &mut dyn Surface, item: &LayoutItem, palette: &Palette) {
    match item {
        LayoutItem::DateSeparator(separator) => draw_date_separator(surface, separator, palette),
        LayoutItem::Message(MessageLayout::Bubble(bubble)) => draw_bubble(surface, bubble, palette),
        LayoutItem::Message(MessageLayout::Service(service)) => {
            draw_service(surface, service, palette)
        }
    }
}

/// Paint the items of `page` intersecting content rows `[top, bottom)`
pub fn draw_page(
    surface: &mut dyn Surface,
    page: &PageLayout,
    palette: &Palette,
    top: f32,
    bottom: f32,
) -> usize {
    let mut drawn = 0;
    for item in page.visible(top, bottom) {
        draw_item(surface, item, palette);
        drawn += 1;
    }
    drawn
}
