// Typefaces: how text is measured and turned into glyph coverage.
// Visual: nothing on screen directly; the rasterizer stamps this coverage into
// the scratch buffer and the particles are sampled from there.
//
// Two faces:
// 1) BitmapFace - the built-in 5x7 bitmap font, scaled up to the font size. Always available.
// 2) TrueTypeFace - any .ttf/.otf file, rasterized with rusttype.

use crate::error::Error;
use image::GrayImage;
use log::{info, warn};
use rusttype::{Font, Scale, point};
use std::path::Path;

/// Measurement + coverage for one font.
///
/// `draw_glyph` writes coverage (0 = empty, 255 = solid) into `mask`, keeping
/// the maximum where glyphs overlap. `left` is the glyph's pen position and
/// `middle` the vertical middle of the em box.
pub trait Typeface {
    fn name(&self) -> &str;

    /// Horizontal advance of `ch` at `size` pixels, without letter spacing.
    fn advance(&self, ch: char, size: f32) -> f32;

    fn draw_glyph(&self, ch: char, size: f32, left: f32, middle: f32, mask: &mut GrayImage);

    /// Width of `text` with `spacing` added after every glyph (canvas `letterSpacing`).
    fn measure(&self, text: &str, size: f32, spacing: f32) -> f32 {
        text.chars().map(|ch| self.advance(ch, size) + spacing).sum()
    }
}

/// Load the font at `path`, or fall back to the built-in bitmap face.
/// Visual: with no font file the text looks blocky (5x7 cells), otherwise smooth.
pub fn load_or_builtin(path: Option<&Path>) -> Box<dyn Typeface> {
    let Some(path) = path else {
        info!("Using built-in 5x7 bitmap face");
        return Box::new(BitmapFace);
    };
    match TrueTypeFace::load(path) {
        Ok(face) => {
            info!("Loaded font {}", face.name());
            Box::new(face)
        }
        Err(e) => {
            warn!("{e}; falling back to built-in bitmap face");
            Box::new(BitmapFace)
        }
    }
}

/// Raise coverage at (x,y) to at least `v`, ignoring out-of-bounds pixels.
#[inline]
fn cover(mask: &mut GrayImage, x: i32, y: i32, v: u8) {
    if x < 0 || y < 0 || x as u32 >= mask.width() || y as u32 >= mask.height() {
        return;
    }
    let px = mask.get_pixel_mut(x as u32, y as u32);
    if v > px.0[0] {
        px.0[0] = v;
    }
}

/* ---------- Built-in 5x7 bitmap face ---------- */

/// Pixels per bitmap cell = font size / CELLS_PER_EM.
/// A glyph is 7 cells tall, so caps fill ~70% of the em like a regular font.
const CELLS_PER_EM: f32 = 10.0;
/// 5 cells of glyph + 1 cell of built-in spacing.
const ADVANCE_CELLS: f32 = 6.0;

pub struct BitmapFace;

impl Typeface for BitmapFace {
    fn name(&self) -> &str {
        "built-in 5x7"
    }

    fn advance(&self, _ch: char, size: f32) -> f32 {
        ADVANCE_CELLS * size / CELLS_PER_EM
    }

    fn draw_glyph(&self, ch: char, size: f32, left: f32, middle: f32, mask: &mut GrayImage) {
        let Some(rows) = glyph5x7(ch) else { return };
        let cell = size / CELLS_PER_EM;
        let top = middle - 3.5 * cell;
        let (w, h) = (mask.width() as f32, mask.height() as f32);

        for (ry, rowbits) in rows.iter().enumerate() {
            // Rounding both edges keeps neighbouring cells seamless.
            // Clamped to the mask so huge sizes only visit pixels that exist.
            let y0 = (top + ry as f32 * cell).round().clamp(0.0, h) as i32;
            let y1 = (top + (ry + 1) as f32 * cell).round().clamp(0.0, h) as i32;
            if y0 >= y1 {
                continue;
            }
            for rx in 0..5 {
                if (rowbits & (1 << (4 - rx))) == 0 {
                    continue;
                }
                let x0 = (left + rx as f32 * cell).round().clamp(0.0, w) as i32;
                let x1 = (left + (rx + 1) as f32 * cell).round().clamp(0.0, w) as i32;
                for y in y0..y1 {
                    for x in x0..x1 {
                        cover(mask, x, y, 255);
                    }
                }
            }
        }
    }
}

/// Return a 5x7 glyph bitmap. Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
/// Lowercase maps to uppercase; whitespace is blank; anything else unknown draws a box.
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    // Helper macro to define a glyph quickly
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    if ch.is_whitespace() {
        return None;
    }

    match ch.to_ascii_uppercase() {
        // Digits 0..9
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        // Letters
        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'J' => g!(0b00111,0b00010,0b00010,0b00010,0b00010,0b10010,0b01100),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),

        // Punctuation
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        ',' => g!(0b00000,0b00000,0b00000,0b00000,0b00110,0b00100,0b01000),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        ';' => g!(0b00000,0b00110,0b00110,0b00000,0b00110,0b00100,0b01000),
        '!' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00000,0b00100),
        '?' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b00000,0b00100),
        '\'' => g!(0b00100,0b00100,0b01000,0b00000,0b00000,0b00000,0b00000),
        '"' => g!(0b01010,0b01010,0b01010,0b00000,0b00000,0b00000,0b00000),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        '+' => g!(0b00000,0b00100,0b00100,0b11111,0b00100,0b00100,0b00000),
        '=' => g!(0b00000,0b00000,0b11111,0b00000,0b11111,0b00000,0b00000),
        '_' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b11111),
        '/' => g!(0b00000,0b00001,0b00010,0b00100,0b01000,0b10000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        '(' => g!(0b00010,0b00100,0b01000,0b01000,0b01000,0b00100,0b00010),
        ')' => g!(0b01000,0b00100,0b00010,0b00010,0b00010,0b00100,0b01000),
        '<' => g!(0b00010,0b00100,0b01000,0b10000,0b01000,0b00100,0b00010),
        '>' => g!(0b01000,0b00100,0b00010,0b00001,0b00010,0b00100,0b01000),
        '#' => g!(0b01010,0b01010,0b11111,0b01010,0b11111,0b01010,0b01010),
        '&' => g!(0b01100,0b10010,0b10100,0b01000,0b10101,0b10010,0b01101),
        '*' => g!(0b00000,0b00100,0b10101,0b01110,0b10101,0b00100,0b00000),
        '@' => g!(0b01110,0b10001,0b00001,0b01101,0b10101,0b10101,0b01110),
        '$' => g!(0b00100,0b01111,0b10100,0b01110,0b00101,0b11110,0b00100),
        '^' => g!(0b00100,0b01010,0b10001,0b00000,0b00000,0b00000,0b00000),
        '\\' => g!(0b00000,0b10000,0b01000,0b00100,0b00010,0b00001,0b00000),
        '%' => g!(0b11000,0b11001,0b00010,0b00100,0b01000,0b10011,0b00011),

        // Unknown: hollow box so the character still takes visible space
        _ => g!(0b11111,0b10001,0b10001,0b10001,0b10001,0b10001,0b11111),
    }
}

/* ---------- TrueType face ---------- */

pub struct TrueTypeFace {
    name: String,
    font: Font<'static>,
}

impl TrueTypeFace {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let bytes = std::fs::read(path)
            .map_err(|e| Error::FontLoad(format!("{}: {e}", path.display())))?;
        let font = Font::try_from_vec(bytes)
            .ok_or_else(|| Error::FontLoad(format!("{}: not a TrueType/OpenType font", path.display())))?;
        Ok(Self { name: path.display().to_string(), font })
    }
}

impl Typeface for TrueTypeFace {
    fn name(&self) -> &str {
        &self.name
    }

    fn advance(&self, ch: char, size: f32) -> f32 {
        self.font.glyph(ch).scaled(Scale::uniform(size)).h_metrics().advance_width
    }

    fn draw_glyph(&self, ch: char, size: f32, left: f32, middle: f32, mask: &mut GrayImage) {
        let scale = Scale::uniform(size);
        let v = self.font.v_metrics(scale);
        // descent is negative; this puts the em box middle on `middle`
        let baseline = middle + (v.ascent + v.descent) * 0.5;
        let glyph = self.font.glyph(ch).scaled(scale).positioned(point(left, baseline));
        let Some(bb) = glyph.pixel_bounding_box() else { return };
        glyph.draw(|gx, gy, coverage| {
            let v = (coverage * 255.0).round().clamp(0.0, 255.0) as u8;
            if v > 0 {
                cover(mask, bb.min.x + gx as i32, bb.min.y + gy as i32, v);
            }
        });
    }
}
