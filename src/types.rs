// Core types shared by the rasterizer, the particle field and the window.

/// The visible screen: what the window shows every frame.
#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    /// Black buffer of `width * height` pixels (both clamped to at least 1).
    pub fn new(width: usize, height: usize) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        Self { width, height, pixels: vec![0u32; width * height] }
    }

    /// Reallocate for a new window size. Contents are reset to black.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width.max(1);
        self.height = height.max(1);
        self.pixels.clear();
        self.pixels.resize(self.width * self.height, 0);
    }

    /// Visual: the whole screen becomes `color`.
    pub fn clear(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    /// Opaque axis-aligned rectangle, clipped to the buffer.
    /// Visual: one solid square (a particle) appears at (x,y).
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u32) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = x.saturating_add(w).min(self.width as i32);
        let y1 = y.saturating_add(h).min(self.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        for py in y0..y1 {
            let row = py as usize * self.width;
            self.pixels[row + x0 as usize..row + x1 as usize].fill(color);
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }
}

/// Opaque color sampled from the scratch buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Pack as 0x00RRGGBB for the framebuffer.
    #[inline]
    pub fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

/// One opaque pixel harvested from rendered text; seeds exactly one particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SamplePoint {
    pub x: f32,
    pub y: f32,
    pub color: Rgb,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_rect_clips_to_bounds() {
        let mut fb = FrameBuffer::new(4, 4);
        fb.fill_rect(-2, 3, 4, 4, 0x00FF0000);
        assert_eq!(fb.get(0, 3), Some(0x00FF0000));
        assert_eq!(fb.get(1, 3), Some(0x00FF0000));
        assert_eq!(fb.get(2, 3), Some(0));
        assert_eq!(fb.get(0, 2), Some(0));
        // Entirely outside: nothing happens, no panic.
        fb.fill_rect(10, 10, 3, 3, 0x00FFFFFF);
        assert_eq!(fb.pixels.iter().filter(|p| **p != 0).count(), 2);
    }

    #[test]
    fn fill_rect_at_the_edge_of_i32_does_not_overflow() {
        let mut fb = FrameBuffer::new(4, 4);
        fb.fill_rect(i32::MAX, i32::MAX, 3, 3, 0x00FFFFFF);
        fb.fill_rect(i32::MAX - 1, 0, i32::MAX, 2, 0x00FFFFFF);
        assert!(fb.pixels.iter().all(|p| *p == 0));
    }

    #[test]
    fn zero_sized_buffers_are_clamped() {
        let mut fb = FrameBuffer::new(0, 0);
        assert_eq!((fb.width, fb.height), (1, 1));
        fb.resize(0, 7);
        assert_eq!((fb.width, fb.height, fb.pixels.len()), (1, 7, 7));
    }

    #[test]
    fn rgb_packs_for_minifb() {
        assert_eq!(Rgb::new(0x12, 0x34, 0x56).to_u32(), 0x0012_3456);
    }
}
