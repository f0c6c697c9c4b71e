//! Shared drawing primitives
//!
//! These work on any [`PixelSink`]: the window's `&mut [u32]` frame and the
//! `RgbaImage` used for export go through the same rasterizers.

use image::RgbaImage;
use rayon::prelude::*;

use super::surface::Surface;
use super::text_rasterizing::TextRenderer;
use super::theme::{argb_to_rgba, rgba_to_argb};
use crate::layout::{Point, Rect, TextRun};

/// Vertical sub-scanlines per pixel row for polygon coverage
const POLYGON_SUBSAMPLES: usize = 4;

/// A writable grid of ARGB pixels
pub trait PixelSink {
    /// `(width, height)` in pixels
    fn size(&self) -> (usize, usize);

    fn read(&self, x: usize, y: usize) -> u32;

    fn write(&mut self, x: usize, y: usize, argb: u32);

    /// Overwrite every pixel
    fn fill(&mut self, argb: u32);

    /// Alpha-blend `colour` over the pixel at `(x, y)` with `coverage`.
    /// The colour's own alpha scales the coverage. Out-of-range is ignored.
    fn blend(&mut self, x: usize, y: usize, colour: u32, coverage: u8) {
        let (w, h) = self.size();
        if x >= w || y >= h {
            return;
        }
        let alpha = (coverage as u32 * (colour >> 24) / 255) as u8;
        match alpha {
            0 => {}
            255 => self.write(x, y, colour),
            _ => {
                let bg = self.read(x, y);
                self.write(x, y, blend_argb(bg, colour, alpha));
            }
        }
    }
}

/// Blend two ARGB pixels, all four channels at once in u64 lanes
#[inline]
pub fn blend_argb(bg: u32, fg: u32, alpha: u8) -> u32 {
    let mut colour = fg as u64;
    colour = (colour | (colour << 16)) & 0x0000FFFF0000FFFF;
    colour = (colour | (colour << 8)) & 0x00FF00FF00FF00FF;

    let mut bg = bg as u64;
    bg = (bg | (bg << 16)) & 0x0000FFFF0000FFFF;
    bg = (bg | (bg << 8)) & 0x00FF00FF00FF00FF;

    // 0..=255 onto 0..=256 so both extremes are exact after the shift
    let alpha = alpha as u64 + (alpha as u64 >> 7);
    let inv_alpha = 256 - alpha;

    let mut blended = bg * inv_alpha + colour * alpha;
    blended = (blended >> 8) & 0x00FF00FF00FF00FF;
    blended = (blended | (blended >> 8)) & 0x0000FFFF0000FFFF;
    blended = blended | (blended >> 16);
    blended as u32
}

/// Softbuffer frame: row-major ARGB
pub struct FrameSink<'a> {
    pixels: &'a mut [u32],
    width: usize,
    height: usize,
}

impl<'a> FrameSink<'a> {
    /// Wrap a frame; the height is derived from the slice length
    pub fn new(pixels: &'a mut [u32], width: usize) -> Self {
        let height = if width == 0 { 0 } else { pixels.len() / width };
        Self {
            pixels,
            width,
            height,
        }
    }
}

impl PixelSink for FrameSink<'_> {
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    #[inline]
    fn read(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.width + x]
    }

    #[inline]
    fn write(&mut self, x: usize, y: usize, argb: u32) {
        self.pixels[y * self.width + x] = argb;
    }

    fn fill(&mut self, argb: u32) {
        if self.width == 0 {
            return;
        }
        self.pixels
            .par_chunks_mut(self.width)
            .for_each(|row| row.fill(argb));
    }
}

impl PixelSink for RgbaImage {
    fn size(&self) -> (usize, usize) {
        (self.width() as usize, self.height() as usize)
    }

    #[inline]
    fn read(&self, x: usize, y: usize) -> u32 {
        rgba_to_argb(self.get_pixel(x as u32, y as u32).0)
    }

    #[inline]
    fn write(&mut self, x: usize, y: usize, argb: u32) {
        self.put_pixel(x as u32, y as u32, image::Rgba(argb_to_rgba(argb)));
    }

    fn fill(&mut self, argb: u32) {
        let rgba = argb_to_rgba(argb);
        let buf: &mut [u8] = &mut **self;
        buf.par_chunks_mut(4).for_each(|px| px.copy_from_slice(&rgba));
    }
}

/// Integer pixel bounds `[x0, x1) × [y0, y1)` of `rect` ∩ `clip` ∩ sink
fn pixel_bounds(rect: Rect, clip: Rect, size: (usize, usize)) -> Option<(usize, usize, usize, usize)> {
    let bounds = Rect::new(0., 0., size.0 as f32, size.1 as f32);
    let r = rect.intersect(&clip)?.intersect(&bounds)?;
    let x0 = r.x.floor().max(0.) as usize;
    let y0 = r.y.floor().max(0.) as usize;
    let x1 = (r.right().ceil() as usize).min(size.0);
    let y1 = (r.bottom().ceil() as usize).min(size.1);
    (x1 > x0 && y1 > y0).then_some((x0, y0, x1, y1))
}

/// Fill a rectangle, edges rounded to whole pixels
pub fn fill_rect<S: PixelSink + ?Sized>(sink: &mut S, rect: Rect, colour: u32, clip: Rect) {
    let snapped = Rect::new(
        rect.x.round(),
        rect.y.round(),
        (rect.right().round() - rect.x.round()).max(0.),
        (rect.bottom().round() - rect.y.round()).max(0.),
    );
    let Some((x0, y0, x1, y1)) = pixel_bounds(snapped, clip, sink.size()) else {
        return;
    };
    for y in y0..y1 {
        for x in x0..x1 {
            sink.blend(x, y, colour, 255);
        }
    }
}

/// Fill an anti-aliased rounded rectangle
pub fn fill_rounded_rect<S: PixelSink + ?Sized>(
    sink: &mut S,
    rect: Rect,
    radius: f32,
    colour: u32,
    clip: Rect,
) {
    let r = radius.min(rect.w / 2.).min(rect.h / 2.);
    if r < 0.5 {
        fill_rect(sink, rect, colour, clip);
        return;
    }
    let Some((x0, y0, x1, y1)) = pixel_bounds(rect, clip, sink.size()) else {
        return;
    };

    // Inner rect whose r-neighbourhood is the rounded shape
    let (ix0, iy0) = (rect.x + r, rect.y + r);
    let (ix1, iy1) = (rect.right() - r, rect.bottom() - r);

    for y in y0..y1 {
        let py = y as f32 + 0.5;
        let dy = (iy0 - py).max(py - iy1).max(0.);
        for x in x0..x1 {
            let px = x as f32 + 0.5;
            let dx = (ix0 - px).max(px - ix1).max(0.);
            let distance = if dx == 0. { dy } else if dy == 0. { dx } else { dx.hypot(dy) };
            let coverage = (r - distance + 0.5).clamp(0., 1.);
            if coverage > 0. {
                sink.blend(x, y, colour, (coverage * 255.) as u8);
            }
        }
    }
}

/// Fill a simple polygon (even-odd rule), vertically supersampled
pub fn fill_polygon<S: PixelSink + ?Sized>(sink: &mut S, points: &[Point], colour: u32, clip: Rect) {
    if points.len() < 3 {
        return;
    }
    let (min_x, max_x, min_y, max_y) = points.iter().fold(
        (f32::MAX, f32::MIN, f32::MAX, f32::MIN),
        |(a, b, c, d), p| (a.min(p.x), b.max(p.x), c.min(p.y), d.max(p.y)),
    );
    let hull = Rect::new(min_x, min_y, max_x - min_x, max_y - min_y);
    let Some((x0, y0, x1, y1)) = pixel_bounds(hull, clip, sink.size()) else {
        return;
    };

    let mut coverage = vec![0f32; x1 - x0];
    let mut crossings = Vec::with_capacity(points.len());
    let step = 1. / POLYGON_SUBSAMPLES as f32;

    for y in y0..y1 {
        coverage.iter_mut().for_each(|c| *c = 0.);

        for sub in 0..POLYGON_SUBSAMPLES {
            let sy = y as f32 + (sub as f32 + 0.5) * step;
            crossings.clear();
            for (i, a) in points.iter().enumerate() {
                let b = points[(i + 1) % points.len()];
                if (a.y <= sy && b.y > sy) || (b.y <= sy && a.y > sy) {
                    crossings.push(a.x + (sy - a.y) / (b.y - a.y) * (b.x - a.x));
                }
            }
            crossings.sort_by(f32::total_cmp);

            for span in crossings.chunks_exact(2) {
                let (sx0, sx1) = (span[0].max(x0 as f32), span[1].min(x1 as f32));
                if sx1 <= sx0 {
                    continue;
                }
                let first = sx0.floor() as usize;
                let last = (sx1.ceil() as usize).min(x1);
                for x in first..last {
                    let left = (x as f32).max(sx0);
                    let right = ((x + 1) as f32).min(sx1);
                    if right > left {
                        coverage[x - x0] += (right - left) * step;
                    }
                }
            }
        }

        for (i, c) in coverage.iter().enumerate() {
            if *c > 0. {
                sink.blend(x0 + i, y, colour, (c.min(1.) * 255.) as u8);
            }
        }
    }
}

/// [`Surface`] over a pixel sink.
///
/// Layout coordinates are shifted by `origin` and everything is clipped to
/// `clip` (sink coordinates). Without a text renderer, text runs are skipped.
pub struct Painter<'a, S: PixelSink + ?Sized> {
    sink: &'a mut S,
    text: Option<&'a mut TextRenderer>,
    origin: Point,
    clip: Rect,
}

impl<'a, S: PixelSink + ?Sized> Painter<'a, S> {
    pub fn new(sink: &'a mut S, text: Option<&'a mut TextRenderer>) -> Self {
        let (w, h) = sink.size();
        Self {
            sink,
            text,
            origin: Point::default(),
            clip: Rect::new(0., 0., w as f32, h as f32),
        }
    }

    /// Where layout `(0, 0)` lands in the sink
    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_clip(mut self, clip: Rect) -> Self {
        self.clip = self.clip.intersect(&clip).unwrap_or_default();
        self
    }

    fn place(&self, rect: Rect) -> Rect {
        rect.translated(self.origin.x, self.origin.y)
    }
}

impl<S: PixelSink + ?Sized> Surface for Painter<'_, S> {
    fn fill_rect(&mut self, rect: Rect, colour: u32) {
        let rect = self.place(rect);
        fill_rect(self.sink, rect, colour, self.clip);
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, colour: u32) {
        let rect = self.place(rect);
        fill_rounded_rect(self.sink, rect, radius, colour, self.clip);
    }

    fn fill_polygon(&mut self, points: &[Point], colour: u32) {
        let placed: Vec<Point> = points
            .iter()
            .map(|p| p.translated(self.origin.x, self.origin.y))
            .collect();
        fill_polygon(self.sink, &placed, colour, self.clip);
    }

    fn draw_text(&mut self, run: &TextRun, colour: u32) {
        let Some(text) = self.text.as_deref_mut() else {
            return;
        };
        let origin = run.origin.translated(self.origin.x, self.origin.y);
        text.draw_text(self.sink, &run.text, origin, &run.font, colour, self.clip);
    }
}
