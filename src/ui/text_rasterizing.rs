use std::collections::HashMap;
use std::path::Path;

use cosmic_text::{
    Attrs, Buffer, Family, FontSystem, Metrics, Shaping, SwashCache, SwashContent, Weight,
};

use super::drawing::PixelSink;
use super::theme::rgba_to_argb;
use crate::layout::{FontSpec, MeasureMode, Point, Rect, TextMeasure};

/// Cached widths are dropped wholesale past this many entries
const MAX_CACHED_WIDTHS: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct WidthKey {
    text: String,
    size_bits: u32,
    weight: u16,
}

/// Shapes and rasterizes text with cosmic-text.
///
/// Uses the system sans-serif family unless an extra font file is given, in
/// which case that file's family is preferred.
pub struct TextRenderer {
    font_system: FontSystem,
    swash_cache: SwashCache,
    family: Option<String>,
    widths: HashMap<WidthKey, f32>,
}

fn attrs(family: Option<&str>, weight: u16) -> Attrs<'_> {
    let family = match family {
        Some(name) => Family::Name(name),
        None => Family::SansSerif,
    };
    Attrs::new().family(family).weight(Weight(weight))
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::with_font_file(None)
    }

    /// System fonts plus, optionally, one font file. A file that fails to
    /// load is logged and ignored.
    pub fn with_font_file(font_path: Option<&Path>) -> Self {
        let mut font_system = FontSystem::new();
        let mut family = None;

        if let Some(path) = font_path {
            let db = font_system.db_mut();
            match db.load_font_file(path) {
                Ok(()) => {
                    family = db
                        .faces()
                        .last()
                        .and_then(|face| face.families.first())
                        .map(|(name, _)| name.clone());
                    log::info!("Loaded font {} ({:?})", path.display(), family);
                }
                Err(e) => log::warn!("Could not load font {}: {}", path.display(), e),
            }
        }

        let renderer = Self {
            font_system,
            swash_cache: SwashCache::new(),
            family,
            widths: HashMap::new(),
        };
        log::debug!("Text renderer ready with {} font faces", renderer.face_count());
        renderer
    }

    pub fn face_count(&self) -> usize {
        self.font_system.db().faces().count()
    }

    /// Whether any face is available to rasterize with
    pub fn has_fonts(&self) -> bool {
        self.face_count() > 0
    }

    fn shape(&mut self, text: &str, font: &FontSpec) -> Buffer {
        let attrs = attrs(self.family.as_deref(), font.weight);
        let metrics = Metrics::relative(font.size, 1.2);
        let mut buffer = Buffer::new(&mut self.font_system, metrics);

        buffer.set_size(&mut self.font_system, None, None);
        buffer.set_text(&mut self.font_system, text, &attrs, Shaping::Advanced);
        buffer.shape_until_scroll(&mut self.font_system, false);
        buffer
    }

    /// Measure the width of text without rendering it
    pub fn measure_text_width(&mut self, text: &str, font: &FontSpec) -> f32 {
        if text.is_empty() {
            return 0.;
        }
        let key = WidthKey {
            text: text.to_string(),
            size_bits: font.size.to_bits(),
            weight: font.weight,
        };
        if let Some(width) = self.widths.get(&key) {
            return *width;
        }

        let buffer = self.shape(text, font);
        let width = buffer.layout_runs().fold(0.0f32, |max_width, run| {
            let run_width = run
                .glyphs
                .iter()
                .fold(0.0f32, |w, glyph| (glyph.x + glyph.w).max(w));
            max_width.max(run_width)
        });

        if self.widths.len() >= MAX_CACHED_WIDTHS {
            self.widths.clear();
        }
        self.widths.insert(key, width);
        width
    }

    /// Draw `text` with its top-left corner at `origin`, clipped to `clip`.
    /// Returns the drawn width.
    pub fn draw_text<S: PixelSink + ?Sized>(
        &mut self,
        sink: &mut S,
        text: &str,
        origin: Point,
        font: &FontSpec,
        colour: u32, // [ARGB]
        clip: Rect,
    ) -> f32 {
        if text.is_empty() {
            return 0.;
        }
        let buffer = self.shape(text, font);

        let (sink_w, sink_h) = sink.size();
        let x_min = clip.x.max(0.) as isize;
        let y_min = clip.y.max(0.) as isize;
        let x_max = (clip.right().max(0.) as isize).min(sink_w as isize);
        let y_max = (clip.bottom().max(0.) as isize).min(sink_h as isize);

        let mut text_width = 0.0f32;
        for run in buffer.layout_runs() {
            let baseline_offset = run.line_y;

            for glyph in run.glyphs {
                text_width = text_width.max(glyph.x + glyph.w);
                let physical_glyph = glyph.physical((origin.x, origin.y), 1.);

                let Some(image) = self
                    .swash_cache
                    .get_image(&mut self.font_system, physical_glyph.cache_key)
                else {
                    continue;
                };

                let glyph_x = physical_glyph.x + image.placement.left;
                let glyph_y = physical_glyph.y + baseline_offset as i32 - image.placement.top;
                let glyph_width = image.placement.width as usize;
                let glyph_height = image.placement.height as usize;

                for cy in 0..glyph_height {
                    let final_y = glyph_y as isize + cy as isize;
                    if final_y < y_min || final_y >= y_max {
                        continue;
                    }
                    for cx in 0..glyph_width {
                        let final_x = glyph_x as isize + cx as isize;
                        if final_x < x_min || final_x >= x_max {
                            continue;
                        }
                        let i = cy * glyph_width + cx;
                        let (pixel_colour, alpha) = match image.content {
                            SwashContent::Mask => (colour, image.data[i]),
                            SwashContent::Color => {
                                let px = &image.data[i * 4..i * 4 + 4];
                                (rgba_to_argb([px[0], px[1], px[2], 0xFF]), px[3])
                            }
                            SwashContent::SubpixelMask => {
                                let px = &image.data[i * 4..i * 4 + 3];
                                let average = (px[0] as u16 + px[1] as u16 + px[2] as u16) / 3;
                                (colour, average as u8)
                            }
                        };
                        if alpha > 0 {
                            sink.blend(final_x as usize, final_y as usize, pixel_colour, alpha);
                        }
                    }
                }
            }
        }
        text_width
    }
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextMeasure for TextRenderer {
    fn mode(&self) -> MeasureMode {
        MeasureMode::Glyph
    }

    fn text_width(&mut self, text: &str, font: &FontSpec) -> f32 {
        self.measure_text_width(text, font)
    }
}
