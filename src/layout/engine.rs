//! Message → geometry.
//!
//! Everything here is computed at `y = 0`; the page fold in
//! [`super::page`] stacks results by translating them.

use crate::types::Message;

use super::geometry::{Point, Rect};
use super::measure::{FontSpec, MeasureMode, TextMeasure};
use super::style::LayoutStyle;
use super::wrap::{wrap_by_chars, wrap_by_width};

/// Which edge of the canvas a bubble hugs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Other participants
    Left,
    /// Own messages
    Right,
}

/// A single run of text, anchored at its top-left corner
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub origin: Point,
    pub font: FontSpec,
}

impl TextRun {
    fn translated(mut self, dx: f32, dy: f32) -> Self {
        self.origin = self.origin.translated(dx, dy);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BubbleLayout {
    pub side: Side,
    pub rect: Rect,
    pub radius: f32,
    /// Base, tip, base
    pub tail: [Point; 3],
    /// Sender name row, other-party messages only
    pub sender: Option<TextRun>,
    pub lines: Vec<TextRun>,
    pub time: TextRun,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceLayout {
    /// Centered `actor action • time` line
    pub line: TextRun,
    /// Row advance
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MessageLayout {
    Bubble(BubbleLayout),
    Service(ServiceLayout),
}

impl MessageLayout {
    pub fn top(&self) -> f32 {
        match self {
            MessageLayout::Bubble(b) => b.rect.y,
            MessageLayout::Service(s) => s.line.origin.y,
        }
    }

    /// Vertical space taken, not counting the gap after it
    pub fn height(&self) -> f32 {
        match self {
            MessageLayout::Bubble(b) => b.rect.h,
            MessageLayout::Service(s) => s.height,
        }
    }

    /// Distance from this row's top to the next row's top
    pub fn advance(&self, style: &LayoutStyle) -> f32 {
        match self {
            MessageLayout::Bubble(b) => b.rect.h + style.message_gap,
            MessageLayout::Service(s) => s.height,
        }
    }

    pub fn translated(self, dx: f32, dy: f32) -> Self {
        match self {
            MessageLayout::Bubble(b) => MessageLayout::Bubble(BubbleLayout {
                rect: b.rect.translated(dx, dy),
                tail: b.tail.map(|p| p.translated(dx, dy)),
                sender: b.sender.map(|s| s.translated(dx, dy)),
                lines: b.lines.into_iter().map(|l| l.translated(dx, dy)).collect(),
                time: b.time.translated(dx, dy),
                ..b
            }),
            MessageLayout::Service(s) => MessageLayout::Service(ServiceLayout {
                line: s.line.translated(dx, dy),
                height: s.height,
            }),
        }
    }

    pub fn as_bubble(&self) -> Option<&BubbleLayout> {
        match self {
            MessageLayout::Bubble(b) => Some(b),
            MessageLayout::Service(_) => None,
        }
    }
}

/// Date change marker between rows
#[derive(Debug, Clone, PartialEq)]
pub struct DateSeparatorLayout {
    pub pill: Rect,
    pub label: TextRun,
}

impl DateSeparatorLayout {
    pub fn translated(self, dx: f32, dy: f32) -> Self {
        Self {
            pill: self.pill.translated(dx, dy),
            label: self.label.translated(dx, dy),
        }
    }
}

/// Wrap `text` for a canvas `canvas_width` wide with whichever policy the
/// measurer supports
pub fn wrap_text(
    text: &str,
    canvas_width: f32,
    style: &LayoutStyle,
    measure: &mut dyn TextMeasure,
) -> Vec<String> {
    match measure.mode() {
        MeasureMode::Approximate => wrap_by_chars(text, style.chars_per_line_limit(canvas_width)),
        MeasureMode::Glyph => wrap_by_width(
            text,
            style.text_width_limit(canvas_width),
            measure,
            &style.body_font,
        ),
    }
}

/// Lay out one message for a canvas `canvas_width` pixels wide, top at `y = 0`
pub fn layout_message(
    message: &Message,
    canvas_width: f32,
    style: &LayoutStyle,
    measure: &mut dyn TextMeasure,
) -> MessageLayout {
    if message.is_service() {
        MessageLayout::Service(layout_service(message, canvas_width, style, measure))
    } else {
        MessageLayout::Bubble(layout_bubble(message, canvas_width, style, measure))
    }
}

fn layout_service(
    message: &Message,
    canvas_width: f32,
    style: &LayoutStyle,
    measure: &mut dyn TextMeasure,
) -> ServiceLayout {
    let text = message.service_line();
    let width = measure.text_width(&text, &style.service_font);
    let x = (canvas_width.max(0.) - width) / 2.;
    ServiceLayout {
        line: TextRun {
            text,
            origin: Point::new(x.max(0.), 0.),
            font: style.service_font,
        },
        height: style.service_height,
    }
}

fn layout_bubble(
    message: &Message,
    canvas_width: f32,
    style: &LayoutStyle,
    measure: &mut dyn TextMeasure,
) -> BubbleLayout {
    let own = message.is_own;
    let text = message.display_text(style.truncate_budget);
    let lines = wrap_text(&text, canvas_width, style, measure);

    let longest = lines
        .iter()
        .map(|line| measure.text_width(line, &style.body_font))
        .fold(0.0f32, f32::max);

    let width = (longest + 2. * style.padding)
        .clamp(style.min_bubble_width, style.bubble_width_limit(canvas_width));

    let show_name = !own && !message.sender.is_empty();
    let name_height = if show_name { style.name_height } else { 0. };
    let height = 2. * style.padding
        + name_height
        + lines.len() as f32 * style.line_height
        + style.time_height;

    let canvas_width = canvas_width.max(0.);
    let (side, x) = if own {
        (Side::Right, (canvas_width - width - style.margin).max(0.))
    } else {
        (Side::Left, style.margin)
    };
    let rect = Rect::new(x, 0., width, height);

    let t = &style.tail;
    let tail = match side {
        Side::Right => [
            Point::new(rect.right(), height - t.base_top),
            Point::new(rect.right() + t.reach, height - t.tip),
            Point::new(rect.right(), height - t.base_bottom),
        ],
        Side::Left => [
            Point::new(rect.x, height - t.base_top),
            Point::new(rect.x - t.reach, height - t.tip),
            Point::new(rect.x, height - t.base_bottom),
        ],
    };

    let text_x = rect.x + style.padding;
    let mut text_y = style.padding;

    let sender = show_name.then(|| {
        let run = TextRun {
            text: message.sender.clone(),
            origin: Point::new(text_x, text_y),
            font: style.sender_font,
        };
        text_y += name_height;
        run
    });

    let lines = lines
        .into_iter()
        .map(|line| {
            let run = TextRun {
                text: line,
                origin: Point::new(text_x, text_y),
                font: style.body_font,
            };
            text_y += style.line_height;
            run
        })
        .collect();

    let time_text = message.time_label();
    let time_width = measure.text_width(&time_text, &style.time_font);
    let time = TextRun {
        text: time_text,
        origin: Point::new(
            rect.right() - style.padding - time_width,
            height - style.time_height - style.time_inset,
        ),
        font: style.time_font,
    };

    BubbleLayout {
        side,
        rect,
        radius: style.corner_radius,
        tail,
        sender,
        lines,
        time,
    }
}

/// Centered date pill sized to its label, top at `y = 0`
pub fn layout_date_separator(
    label: &str,
    canvas_width: f32,
    style: &LayoutStyle,
    measure: &mut dyn TextMeasure,
) -> DateSeparatorLayout {
    let text_width = measure.text_width(label, &style.date_font);
    let pill_width = text_width + 2. * style.date_pill_padding;
    let x = ((canvas_width.max(0.) - pill_width) / 2.).max(0.);
    let pill = Rect::new(x, 0., pill_width, style.date_pill_height);

    // Vertically centre the label's em box in the pill
    let text_y = ((style.date_pill_height - style.date_font.size * 1.2) / 2.).max(0.);

    DateSeparatorLayout {
        pill,
        label: TextRun {
            text: label.to_string(),
            origin: Point::new(x + style.date_pill_padding, text_y),
            font: style.date_font,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::measure::CharWidthMeasure;
    use crate::types::{Message, RawMessage, RawText};

    fn message(from: &str, from_id: &str, text: &str) -> Message {
        let raw = RawMessage {
            from: Some(from.to_string()),
            from_id: Some(from_id.to_string()),
            date: Some("2024-01-01T10:00:00".to_string()),
            text: RawText::Plain(text.to_string()),
            ..Default::default()
        };
        Message::normalize(&raw, Some("me"))
    }

    fn bubble(layout: MessageLayout) -> BubbleLayout {
        match layout {
            MessageLayout::Bubble(b) => b,
            other => panic!("expected bubble, got {:?}", other),
        }
    }

    #[test]
    fn test_other_message_left_with_name() {
        let style = LayoutStyle::canvas();
        let b = bubble(layout_message(
            &message("Alice", "user1", "hi"),
            800.,
            &style,
            &mut CharWidthMeasure,
        ));
        assert_eq!(b.side, Side::Left);
        assert_eq!(b.rect.x, style.margin);
        assert_eq!(b.rect.w, style.min_bubble_width);
        assert_eq!(b.sender.as_ref().unwrap().text, "Alice");
        // padding*2 + name + 1 line + time
        assert_eq!(b.rect.h, 24. + 20. + 18. + 15.);
        // Tail on the left, pointing outward
        assert!(b.tail[1].x < b.rect.x);
    }

    #[test]
    fn test_own_message_right_without_name() {
        let style = LayoutStyle::canvas();
        let b = bubble(layout_message(
            &message("Me", "user_me", "yo"),
            800.,
            &style,
            &mut CharWidthMeasure,
        ));
        assert_eq!(b.side, Side::Right);
        assert_eq!(b.rect.right(), 800. - style.margin);
        assert!(b.sender.is_none());
        assert_eq!(b.rect.h, 24. + 18. + 15.);
        assert!(b.tail[1].x > b.rect.right());
        assert_eq!(b.time.text, "10:00");
        assert!(b.time.origin.x + 30. <= b.rect.right());
    }

    #[test]
    fn test_width_clamped_to_max() {
        let style = LayoutStyle::canvas();
        let long = "word ".repeat(30);
        let b = bubble(layout_message(
            &message("Alice", "user1", &long),
            800.,
            &style,
            &mut CharWidthMeasure,
        ));
        assert!(b.rect.w <= style.max_bubble_width);
        assert!(b.rect.w >= style.min_bubble_width);
        assert!(b.lines.len() > 1);
        for line in &b.lines {
            assert!(line.text.chars().count() <= style.max_chars_per_line);
        }
    }

    #[test]
    fn test_unbreakable_word_still_clamped() {
        let style = LayoutStyle::canvas();
        let b = bubble(layout_message(
            &message("Alice", "user1", &"x".repeat(150)),
            800.,
            &style,
            &mut CharWidthMeasure,
        ));
        assert_eq!(b.lines.len(), 1);
        assert_eq!(b.rect.w, style.max_bubble_width);
    }

    #[test]
    fn test_blank_body_gets_placeholder() {
        let style = LayoutStyle::canvas();
        let mut raw = RawMessage {
            from: Some("Alice".to_string()),
            text: RawText::Plain("  \n ".to_string()),
            media_type: Some("voice_message".to_string()),
            ..Default::default()
        };
        let b = bubble(layout_message(
            &Message::normalize(&raw, None),
            800.,
            &style,
            &mut CharWidthMeasure,
        ));
        assert_eq!(b.lines.len(), 1);
        assert_eq!(b.lines[0].text, "🎤 Voice message");

        raw.media_type = None;
        let b = bubble(layout_message(
            &Message::normalize(&raw, None),
            800.,
            &style,
            &mut CharWidthMeasure,
        ));
        assert!(!b.lines[0].text.is_empty());
    }

    #[test]
    fn test_zero_width_canvas_degrades() {
        let style = LayoutStyle::canvas();
        let b = bubble(layout_message(
            &message("Me", "me", "yo"),
            0.,
            &style,
            &mut CharWidthMeasure,
        ));
        assert_eq!(b.rect.x, 0.);
        let sep = layout_date_separator("01.01.2024", 0., &style, &mut CharWidthMeasure);
        assert_eq!(sep.pill.x, 0.);
    }

    #[test]
    fn test_service_centered() {
        let style = LayoutStyle::canvas();
        let raw = RawMessage {
            kind: Some("service".to_string()),
            actor: Some("Alice".to_string()),
            action: Some("left_chat".to_string()),
            date: Some("2024-01-01T10:00:00".to_string()),
            ..Default::default()
        };
        let layout = layout_message(&Message::normalize(&raw, None), 800., &style, &mut CharWidthMeasure);
        let MessageLayout::Service(service) = layout else {
            panic!("expected service layout");
        };
        assert_eq!(service.line.text, "Alice left the chat • 10:00");
        let width = service.line.text.chars().count() as f32 * style.service_font.approx_glyph_width;
        assert!((service.line.origin.x + width / 2. - 400.).abs() < 0.01);
    }

    /// Glyph-mode measurer with fixed per-character advances
    struct FixedGlyphs;

    impl TextMeasure for FixedGlyphs {
        fn mode(&self) -> MeasureMode {
            MeasureMode::Glyph
        }

        fn text_width(&mut self, text: &str, font: &FontSpec) -> f32 {
            let scale = font.size / 15.;
            text.chars()
                .map(|c| match c {
                    'i' | 'l' | '.' | ' ' => 4.,
                    'm' | 'w' | 'M' | 'W' => 12.,
                    _ => 8.,
                })
                .sum::<f32>()
                * scale
        }
    }

    fn words(lines: &[TextRun]) -> Vec<&str> {
        lines.iter().flat_map(|l| l.text.split_whitespace()).collect()
    }

    #[test]
    fn test_glyph_wrap_fits_pixel_width() {
        let style = LayoutStyle::canvas().with_truncate_budget(0);
        let text = "swim will mill illicit wombats in the lowland meadows while \
                    the moon wanes; a Mammoth wanders home at midnight "
            .repeat(3);
        let b = bubble(layout_message(
            &message("Alice", "user1", &text),
            800.,
            &style,
            &mut FixedGlyphs,
        ));

        assert!(b.lines.len() > 1);
        for line in &b.lines {
            let width = FixedGlyphs.text_width(&line.text, &style.body_font);
            let single_word = line.text.split_whitespace().count() == 1;
            assert!(width <= style.max_text_width() || single_word, "{:?}", line.text);
        }
        assert_eq!(words(&b.lines), text.split_whitespace().collect::<Vec<_>>());
        assert!(b.rect.w >= style.min_bubble_width);
        assert!(b.rect.w <= style.max_bubble_width);
    }

    #[test]
    fn test_glyph_wrap_keeps_long_word_whole() {
        let style = LayoutStyle::canvas();
        let long = "m".repeat(60);
        let text = format!("before {} after", long);
        let b = bubble(layout_message(
            &message("Alice", "user1", &text),
            800.,
            &style,
            &mut FixedGlyphs,
        ));
        let texts: Vec<&str> = b.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["before", long.as_str(), "after"]);
        assert_eq!(b.rect.w, style.max_bubble_width);
    }

    #[test]
    fn test_narrow_canvas_rewraps() {
        let style = LayoutStyle::canvas().with_truncate_budget(0);
        let text = "lorem ipsum dolor sit amet consectetur ".repeat(10);
        let measures: [&mut dyn TextMeasure; 2] = [&mut CharWidthMeasure, &mut FixedGlyphs];

        for measure in measures {
            let wide = bubble(layout_message(&message("Alice", "user1", &text), 800., &style, measure));
            let narrow = bubble(layout_message(&message("Alice", "user1", &text), 360., &style, measure));

            assert_eq!(narrow.rect.x, style.margin);
            assert!(narrow.rect.right() <= 360. - style.margin);
            assert!(narrow.lines.len() > wide.lines.len());
            assert!(narrow.time.origin.x >= narrow.rect.x);
            assert!(narrow.tail[1].x >= 0.);
            for line in &narrow.lines {
                let width = measure.text_width(&line.text, &style.body_font);
                assert!(narrow.rect.x + style.padding + width <= narrow.rect.right() + 0.01);
            }

            let own = bubble(layout_message(&message("Me", "me", &text), 360., &style, measure));
            assert!(own.rect.x >= style.margin);
            assert_eq!(own.rect.right(), 360. - style.margin);
        }
    }

    #[test]
    fn test_translate_moves_everything() {
        let style = LayoutStyle::canvas();
        let layout = layout_message(&message("Alice", "u", "hi"), 800., &style, &mut CharWidthMeasure);
        let moved = layout.clone().translated(0., 100.);
        let (a, b) = (layout.as_bubble().unwrap(), moved.as_bubble().unwrap());
        assert_eq!(b.rect.y, a.rect.y + 100.);
        assert_eq!(b.tail[1].y, a.tail[1].y + 100.);
        assert_eq!(b.time.origin.y, a.time.origin.y + 100.);
        assert_eq!(b.lines[0].origin.y, a.lines[0].origin.y + 100.);
    }
}
