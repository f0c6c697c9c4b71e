//! Text measurement seam between the layout engine and the drawing surface.
//!
//! Bubble sizes differ measurably between the two modes: approximate
//! measurement wraps by character count and sizes by a fixed glyph width,
//! glyph measurement wraps and sizes by shaped advances.

/// How a [`TextMeasure`] arrives at widths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureMode {
    /// Character count × fixed average glyph width
    Approximate,
    /// Shaped glyph advances from a real font
    Glyph,
}

/// Font parameters for one kind of text run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    /// Pixel size
    pub size: f32,
    pub weight: u16,
    /// Average glyph advance used by approximate measurement
    pub approx_glyph_width: f32,
}

impl FontSpec {
    pub const fn new(size: f32, weight: u16, approx_glyph_width: f32) -> Self {
        Self {
            size,
            weight,
            approx_glyph_width,
        }
    }
}

pub trait TextMeasure {
    fn mode(&self) -> MeasureMode;

    /// Advance width of `text` set in `font`, in pixels
    fn text_width(&mut self, text: &str, font: &FontSpec) -> f32;
}

/// Fallback measurer for when no font is available (and for tests)
#[derive(Debug, Clone, Copy, Default)]
pub struct CharWidthMeasure;

impl TextMeasure for CharWidthMeasure {
    fn mode(&self) -> MeasureMode {
        MeasureMode::Approximate
    }

    fn text_width(&mut self, text: &str, font: &FontSpec) -> f32 {
        text.chars().count() as f32 * font.approx_glyph_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_width_counts_chars_not_bytes() {
        let font = FontSpec::new(14., 400, 8.);
        let mut measure = CharWidthMeasure;
        assert_eq!(measure.text_width("hello", &font), 40.);
        assert_eq!(measure.text_width("привет", &font), 48.);
        assert_eq!(measure.text_width("", &font), 0.);
    }
}
