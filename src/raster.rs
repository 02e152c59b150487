// Text -> sample points.
// Visual expectation: nothing is shown from here. The text is drawn into an
// off-screen scratch buffer, every `gap`-th opaque pixel becomes a SamplePoint,
// and the scratch buffer is wiped again. Only particles ever reach the screen.

use crate::font::Typeface;
use crate::gradient::{ColorStop, FIRE_STOPS, GradientLut};
use crate::types::{Rgb, SamplePoint};
use image::{GrayImage, Rgba, RgbaImage};

/// How the text is laid out and painted before sampling.
#[derive(Clone, Debug)]
pub struct TextStyle {
    pub font_size: f32,         // em size in pixels
    pub line_height_ratio: f32, // line height = font_size * ratio
    pub letter_spacing: f32,    // extra pixels after each glyph
    pub stroke_width: f32,      // outline width in pixels (0 = no outline)
    pub stroke_color: Rgb,
    pub vertical_offset: f32,   // pushes the whole block down
    pub stops: Vec<ColorStop>,  // horizontal fill gradient
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 80.0,
            line_height_ratio: 0.99,
            letter_spacing: 5.0,
            stroke_width: 3.0,
            stroke_color: Rgb::WHITE,
            vertical_offset: 20.0,
            stops: FIRE_STOPS.to_vec(),
        }
    }
}

impl TextStyle {
    pub fn line_height(&self) -> f32 {
        self.font_size * self.line_height_ratio
    }
}

/// Result of one rasterization.
#[derive(Debug, Default)]
pub struct TextRaster {
    pub points: Vec<SamplePoint>, // row-major, top-to-bottom, left-to-right
    pub line_count: usize,
    pub first_line_y: f32,        // vertical middle of the first line
}

/// Greedy word wrap. Words are never split; a word wider than `max_width`
/// simply gets a line of its own. Empty or space-only text gives no lines.
pub fn wrap_lines(face: &dyn Typeface, text: &str, style: &TextStyle, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split(' ').filter(|w| !w.is_empty()) {
        if line.is_empty() {
            line.push_str(word);
            continue;
        }
        let candidate = format!("{line} {word}");
        if face.measure(&candidate, style.font_size, style.letter_spacing) > max_width {
            lines.push(std::mem::replace(&mut line, word.to_string()));
        } else {
            line = candidate;
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

pub struct Rasterizer {
    face: Box<dyn Typeface>,
    style: TextStyle,
    gap: usize,
    scratch: RgbaImage,   // off-screen paint target; transparent between calls
    coverage: GrayImage,  // glyph coverage for the current text
    gradient: GradientLut,
}

impl Rasterizer {
    pub fn new(face: Box<dyn Typeface>, style: TextStyle, gap: usize) -> Self {
        let gradient = GradientLut::new(&style.stops, 1);
        Self {
            face,
            style,
            gap: gap.max(1),
            scratch: RgbaImage::new(1, 1),
            coverage: GrayImage::new(1, 1),
            gradient,
        }
    }

    pub fn gap(&self) -> usize {
        self.gap
    }

    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    pub fn face(&self) -> &dyn Typeface {
        self.face.as_ref()
    }

    /// True when nothing is left behind in the scratch buffer.
    pub fn scratch_is_clear(&self) -> bool {
        self.scratch.iter().all(|b| *b == 0)
    }

    /// Wrap, center, paint and sample `text` on a `width x height` surface.
    /// Visual: no change on screen; the returned points are where particles will settle.
    pub fn wrap_text(&mut self, text: &str, width: usize, height: usize, max_text_width: f32) -> TextRaster {
        let (width, height) = (width.max(1), height.max(1));
        self.ensure_size(width, height);

        let lines = wrap_lines(self.face.as_ref(), text, &self.style, max_text_width);
        let line_height = self.style.line_height();
        // Middles of the first and last line sit symmetric around the surface middle.
        let block = line_height * lines.len().saturating_sub(1) as f32;
        let first_line_y = height as f32 * 0.5 - block * 0.5 + self.style.vertical_offset;

        if lines.is_empty() {
            return TextRaster { points: Vec::new(), line_count: 0, first_line_y };
        }

        // 1) Glyph coverage for every line, horizontally centered.
        let text_x = width as f32 * 0.5;
        for (i, line) in lines.iter().enumerate() {
            let middle = first_line_y + i as f32 * line_height;
            self.draw_line(line, text_x, middle);
        }

        // 2) Fill + outline into the scratch buffer.
        self.paint();

        // 3) Harvest every gap-th opaque pixel.
        let points = self.sample();

        // 4) Leave nothing behind.
        self.scratch.fill(0);
        self.coverage.fill(0);

        TextRaster { points, line_count: lines.len(), first_line_y }
    }

    fn ensure_size(&mut self, width: usize, height: usize) {
        let (w, h) = (width as u32, height as u32);
        if self.scratch.dimensions() != (w, h) {
            self.scratch = RgbaImage::new(w, h);
            self.coverage = GrayImage::new(w, h);
        }
        if self.gradient.width() != width {
            self.gradient = GradientLut::new(&self.style.stops, width);
        }
    }

    fn draw_line(&mut self, line: &str, center_x: f32, middle: f32) {
        let size = self.style.font_size;
        let spacing = self.style.letter_spacing;
        let mut pen = center_x - self.face.measure(line, size, spacing) * 0.5;
        for ch in line.chars() {
            self.face.draw_glyph(ch, size, pen, middle, &mut self.coverage);
            pen += self.face.advance(ch, size) + spacing;
        }
    }

    /// Gradient fill everywhere there is coverage, then a solid outline
    /// straddling the glyph edges (half inside, half outside).
    fn paint(&mut self) {
        let (w, h) = self.coverage.dimensions();
        let (w, h) = (w as i32, h as i32);
        let inside: Vec<bool> = self.coverage.iter().map(|c| *c >= 128).collect();
        let ring = stroke_offsets(self.style.stroke_width);
        let stroke = self.style.stroke_color;

        for y in 0..h {
            for x in 0..w {
                let idx = (y * w + x) as usize;
                let here = inside[idx];
                let on_edge = ring.iter().any(|&(dx, dy)| {
                    let (nx, ny) = (x + dx, y + dy);
                    nx >= 0 && ny >= 0 && nx < w && ny < h && inside[(ny * w + nx) as usize] != here
                });

                let px = if on_edge {
                    Rgba([stroke.r, stroke.g, stroke.b, 255])
                } else {
                    let c = self.coverage.as_raw()[idx];
                    if c == 0 {
                        continue;
                    }
                    let fill = self.gradient.at(x as usize);
                    Rgba([fill.r, fill.g, fill.b, c])
                };
                self.scratch.put_pixel(x as u32, y as u32, px);
            }
        }
    }

    fn sample(&self) -> Vec<SamplePoint> {
        let (w, h) = self.scratch.dimensions();
        let mut points = Vec::new();
        for y in (0..h).step_by(self.gap) {
            for x in (0..w).step_by(self.gap) {
                let Rgba([r, g, b, a]) = *self.scratch.get_pixel(x, y);
                if a > 0 {
                    points.push(SamplePoint { x: x as f32, y: y as f32, color: Rgb::new(r, g, b) });
                }
            }
        }
        points
    }
}

/// Neighbour offsets within half the stroke width (a small disc).
fn stroke_offsets(stroke_width: f32) -> Vec<(i32, i32)> {
    let r = stroke_width * 0.5;
    if r < 0.5 {
        return Vec::new();
    }
    let ri = r.ceil() as i32;
    let mut out = Vec::new();
    for dy in -ri..=ri {
        for dx in -ri..=ri {
            if (dx, dy) != (0, 0) && ((dx * dx + dy * dy) as f32) <= r * r {
                out.push((dx, dy));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::BitmapFace;

    fn rasterizer(gap: usize) -> Rasterizer {
        Rasterizer::new(Box::new(BitmapFace), TextStyle::default(), gap)
    }

    #[test]
    fn wraps_greedily_without_breaking_words() {
        let style = TextStyle::default();
        // Bitmap face at 80px: 53px per glyph including spacing.
        let lines = wrap_lines(&BitmapFace, "Hello Lets Code", &style, 320.0);
        assert_eq!(lines, vec!["Hello", "Lets", "Code"]);
        let lines = wrap_lines(&BitmapFace, "a b c", &style, 320.0);
        assert_eq!(lines, vec!["a b c"]);
        // Wider than the limit on its own: still one line, not split
        let lines = wrap_lines(&BitmapFace, "Supercalifragilistic", &style, 100.0);
        assert_eq!(lines, vec!["Supercalifragilistic"]);
    }

    #[test]
    fn empty_and_space_only_text_give_nothing() {
        let mut r = rasterizer(3);
        for text in ["", "   "] {
            let out = r.wrap_text(text, 400, 500, 320.0);
            assert_eq!(out.line_count, 0);
            assert!(out.points.is_empty());
        }
    }

    #[test]
    fn hi_produces_samples_on_the_gap_grid() {
        let mut r = rasterizer(3);
        let out = r.wrap_text("Hi", 400, 500, 320.0);
        assert_eq!(out.line_count, 1);
        assert!(!out.points.is_empty());
        assert!(out.points.len() <= 134 * 167);
        for p in &out.points {
            assert_eq!(p.x as usize % 3, 0);
            assert_eq!(p.y as usize % 3, 0);
            assert!(p.x < 400.0 && p.y < 500.0);
        }
        // Row-major order
        assert!(out.points.windows(2).all(|w| (w[0].y, w[0].x) < (w[1].y, w[1].x)));
    }

    #[test]
    fn sample_count_is_bounded_by_the_grid() {
        let mut r = rasterizer(4);
        let out = r.wrap_text("WWWW MMMM #### @@@@ WWWW MMMM", 101, 203, 80.0);
        assert!(out.points.len() <= 101usize.div_ceil(4) * 203usize.div_ceil(4));
    }

    #[test]
    fn scratch_is_cleared_after_sampling() {
        let mut r = rasterizer(3);
        let out = r.wrap_text("Hi", 400, 500, 320.0);
        assert!(!out.points.is_empty());
        assert!(r.scratch_is_clear());
    }

    #[test]
    fn block_is_vertically_centered_with_offset() {
        let mut r = rasterizer(3);
        let one = r.wrap_text("Hi", 400, 500, 320.0);
        assert_eq!(one.first_line_y, 250.0 + 20.0);
        let three = r.wrap_text("Hello Lets Code", 400, 500, 320.0);
        assert_eq!(three.line_count, 3);
        let lh = 80.0 * 0.99;
        assert!((three.first_line_y - (250.0 - lh + 20.0)).abs() < 1e-3);
    }

    #[test]
    fn colors_are_gradient_fill_or_white_outline() {
        let mut r = rasterizer(1);
        let out = r.wrap_text("Hi", 400, 500, 320.0);
        assert!(out.points.iter().any(|p| p.color == Rgb::WHITE));
        assert!(out.points.iter().any(|p| p.color != Rgb::WHITE));
        // Fill colors come from the red->yellow ramp: full red, no blue
        for p in out.points.iter().filter(|p| p.color != Rgb::WHITE) {
            assert_eq!((p.color.r, p.color.b), (255, 0), "{:?}", p.color);
        }
    }

    #[test]
    fn text_is_centered_horizontally() {
        let mut r = rasterizer(1);
        let out = r.wrap_text("I", 400, 500, 320.0);
        let min_x = out.points.iter().map(|p| p.x).fold(f32::MAX, f32::min);
        let max_x = out.points.iter().map(|p| p.x).fold(f32::MIN, f32::max);
        // Glyph + 5px trailing spacing is centered, so the ink sits slightly left.
        let mid = (min_x + max_x) * 0.5;
        assert!((mid - 193.5).abs() <= 1.0, "ink middle at {mid}");
    }

    #[test]
    fn stroke_offsets_form_a_small_disc() {
        assert!(stroke_offsets(0.0).is_empty());
        assert_eq!(stroke_offsets(3.0).len(), 8);
    }
}
