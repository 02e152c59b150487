// Horizontal fill gradient for the text, precomputed once per surface width.
// Visual: letters on the left glow red, the middle orange, the right yellow.

use crate::types::Rgb;

/// One color stop; `offset` is a fraction of the surface width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Rgb,
}

/// red -> orange -> yellow, with stops at 30/50/70% of the width.
pub const FIRE_STOPS: [ColorStop; 3] = [
    ColorStop { offset: 0.3, color: Rgb::new(255, 0, 0) },
    ColorStop { offset: 0.5, color: Rgb::new(255, 165, 0) },
    ColorStop { offset: 0.7, color: Rgb::new(255, 255, 0) },
];

pub struct GradientLut {
    // column x -> fill color
    columns: Vec<Rgb>,
}

impl GradientLut {
    /// Build the per-column table for a surface `width` pixels wide.
    /// Stops must be sorted by offset. Outside the first/last stop the end color is held.
    pub fn new(stops: &[ColorStop], width: usize) -> Self {
        let width = width.max(1);
        let columns = (0..width)
            .map(|x| {
                // Sample at the pixel center, like a canvas gradient does
                let t = (x as f32 + 0.5) / width as f32;
                color_at(stops, t)
            })
            .collect();
        Self { columns }
    }

    #[inline]
    pub fn at(&self, x: usize) -> Rgb {
        let last = self.columns.len() - 1;
        self.columns[x.min(last)]
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }
}

fn color_at(stops: &[ColorStop], t: f32) -> Rgb {
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return Rgb::WHITE;
    };
    if t <= first.offset {
        return first.color;
    }
    if t >= last.offset {
        return last.color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = (b.offset - a.offset).max(f32::EPSILON);
            let k = (t - a.offset) / span;
            return Rgb::new(lerp_u8(a.color.r, b.color.r, k), lerp_u8(a.color.g, b.color.g, k), lerp_u8(a.color.b, b.color.b, k));
        }
    }
    last.color
}

#[inline]
fn lerp_u8(a: u8, b: u8, k: f32) -> u8 {
    (a as f32 + (b as f32 - a as f32) * k).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ends_hold_the_outer_stop_colors() {
        let lut = GradientLut::new(&FIRE_STOPS, 100);
        assert_eq!(lut.at(0), Rgb::new(255, 0, 0));
        assert_eq!(lut.at(99), Rgb::new(255, 255, 0));
        // Out of range columns clamp to the last one
        assert_eq!(lut.at(5000), Rgb::new(255, 255, 0));
    }

    #[test]
    fn middle_column_is_orange() {
        let lut = GradientLut::new(&FIRE_STOPS, 1000);
        let c = lut.at(499);
        assert_eq!(c.r, 255);
        assert!((c.g as i32 - 165).abs() <= 1, "got {c:?}");
        assert_eq!(c.b, 0);
    }

    #[test]
    fn green_rises_monotonically_across_the_width() {
        let lut = GradientLut::new(&FIRE_STOPS, 400);
        let greens: Vec<u8> = (0..lut.width()).map(|x| lut.at(x).g).collect();
        assert!(greens.windows(2).all(|w| w[0] <= w[1]));
    }
}
