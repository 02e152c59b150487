// Particle field: one square particle per sampled text pixel.
// Visual outcomes:
// - On every new text the particles fly in from the bottom edge and settle into the letters.
// - Moving the mouse through the letters scatters nearby particles; they drift back home.

use crate::pointer::{PointerPos, SharedPointer};
use crate::raster::Rasterizer;
use crate::ticker::Tick;
use crate::types::{FrameBuffer, Rgb, SamplePoint};
use log::{debug, info};
use rand::Rng;
use rand::rngs::StdRng;
use std::ops::Range;

/// Floor for the squared distance in the force term, so a pointer sitting
/// exactly on a particle gives a large but finite kick.
const MIN_DISTANCE_SQ: f32 = 1.0;

/// Screen background between frames.
pub const BACKGROUND: u32 = 0x00_00_00_00;

/// Per-particle randomization ranges.
#[derive(Clone, Debug)]
pub struct Motion {
    pub friction: Range<f32>, // velocity damping per tick
    pub ease: Range<f32>,     // fraction of the way home per tick
}

impl Default for Motion {
    fn default() -> Self {
        Self { friction: 0.15..0.75, ease: 0.005..0.105 }
    }
}

/// One square of the text. Visual: a `size x size` block of `color`.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub original_x: f32, // home: where it sits inside the glyph
    pub original_y: f32,
    pub x: f32,          // where it is drawn this frame
    pub y: f32,
    pub vx: f32,         // scatter velocity, decays by `friction` every tick
    pub vy: f32,
    pub color: Rgb,
    pub size: f32,
    pub friction: f32,
    pub ease: f32,
}

impl Particle {
    /// Home at the sample point, spawned at (x, y) at rest.
    pub fn new(sample: &SamplePoint, x: f32, y: f32, size: f32, friction: f32, ease: f32) -> Self {
        Self {
            original_x: sample.x,
            original_y: sample.y,
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            color: sample.color,
            size,
            friction,
            ease,
        }
    }

    /// One physics step: pointer kick (if close enough), friction, then pull toward home.
    /// Visual: near the cursor the square jumps away; everywhere it glides back.
    pub fn update(&mut self, pointer: Option<PointerPos>, radius: f32) {
        if let Some(p) = pointer {
            let dx = p.x - self.x;
            let dy = p.y - self.y;
            let distance_sq = dx * dx + dy * dy;
            if distance_sq < radius {
                // Negative force along the particle->pointer angle = push away.
                let force = -radius / distance_sq.max(MIN_DISTANCE_SQ);
                let angle = dy.atan2(dx);
                self.vx += force * angle.cos();
                self.vy += force * angle.sin();
            }
        }

        self.vx *= self.friction;
        self.vy *= self.friction;
        self.x += self.vx + (self.original_x - self.x) * self.ease;
        self.y += self.vy + (self.original_y - self.y) * self.ease;
    }

    /// Visual: an opaque square appears at the particle's current position.
    /// Particles kicked beyond the i32 pixel range are not drawn this frame.
    pub fn draw(&self, screen: &mut FrameBuffer) {
        let (x, y) = (self.x.floor(), self.y.floor());
        if !in_pixel_range(x) || !in_pixel_range(y) {
            return;
        }
        let side = self.size.ceil() as i32;
        screen.fill_rect(x as i32, y as i32, side, side, self.color.to_u32());
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldState {
    Empty,
    Populated,
}

pub struct ParticleField {
    rasterizer: Rasterizer,
    pointer: SharedPointer,
    motion: Motion,
    rng: StdRng,
    particles: Vec<Particle>,
    width: usize,
    height: usize,
    max_width_ratio: f32,
    // recentering parameters, refreshed by `resize`
    text_x: f32,
    text_y: f32,
    max_text_width: f32,
    text: String,     // source of the current generation
    generation: u64,
}

impl ParticleField {
    pub fn new(
        rasterizer: Rasterizer,
        pointer: SharedPointer,
        motion: Motion,
        max_width_ratio: f32,
        width: usize,
        height: usize,
        rng: StdRng,
    ) -> Self {
        let mut field = Self {
            rasterizer,
            pointer,
            motion,
            rng,
            particles: Vec::new(),
            width: 1,
            height: 1,
            max_width_ratio,
            text_x: 0.0,
            text_y: 0.0,
            max_text_width: 0.0,
            text: String::new(),
            generation: 0,
        };
        field.resize(width, height);
        field
    }

    /// Replace the whole particle set with one built from `text`.
    /// The new set is fully constructed before it is swapped in.
    /// Visual: the old letters vanish; new squares rise from the bottom edge into the new text.
    pub fn rebuild(&mut self, text: &str) -> usize {
        let raster = self.rasterizer.wrap_text(text, self.width, self.height, self.max_text_width);
        self.text_y = raster.first_line_y;

        let size = self.rasterizer.gap() as f32;
        let bottom = self.height as f32;
        let width = self.width as f32;
        let fresh: Vec<Particle> = raster
            .points
            .iter()
            .map(|s| {
                let x = self.rng.gen_range(0.0..width);
                let friction = sample(&mut self.rng, &self.motion.friction);
                let ease = sample(&mut self.rng, &self.motion.ease);
                Particle::new(s, x, bottom, size, friction, ease)
            })
            .collect();

        self.particles = fresh;
        self.text = text.to_string();
        self.generation += 1;
        info!(
            "Generation {}: {} line(s), {} particles from {:?}",
            self.generation,
            raster.line_count,
            self.particles.len(),
            self.text
        );
        self.particles.len()
    }

    /// Re-rasterize the current text (after a resize).
    pub fn refresh(&mut self) -> usize {
        let text = std::mem::take(&mut self.text);
        self.rebuild(&text)
    }

    /// Update then draw every particle, in list order.
    pub fn render(&mut self, screen: &mut FrameBuffer) {
        // One snapshot per frame: every particle reacts to the same pointer.
        let pointer = self.pointer.position();
        let radius = self.pointer.radius();
        for particle in &mut self.particles {
            particle.update(pointer, radius);
            particle.draw(screen);
        }
    }

    /// New surface size. Zero sizes are clamped to 1. Particles are not rebuilt here.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width.max(1);
        self.height = height.max(1);
        self.text_x = self.width as f32 * 0.5;
        self.text_y = self.height as f32 * 0.5;
        self.max_text_width = self.width as f32 * self.max_width_ratio;
        debug!("Field resized to {}x{}", self.width, self.height);
    }

    pub fn state(&self) -> FieldState {
        if self.particles.is_empty() { FieldState::Empty } else { FieldState::Populated }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// (text_x, text_y, max_text_width)
    pub fn layout(&self) -> (f32, f32, f32) {
        (self.text_x, self.text_y, self.max_text_width)
    }
}

impl Tick for ParticleField {
    /// Visual: one animation frame (black background + all particles one step further).
    fn tick(&mut self, screen: &mut FrameBuffer) {
        screen.clear(BACKGROUND);
        self.render(screen);
    }
}

#[inline]
fn in_pixel_range(v: f32) -> bool {
    v.is_finite() && v >= i32::MIN as f32 && v < i32::MAX as f32
}

fn sample(rng: &mut StdRng, range: &Range<f32>) -> f32 {
    if range.is_empty() { range.start } else { rng.gen_range(range.clone()) }
}
