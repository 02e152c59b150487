// Particle text: text rasterized into square particles that scatter away from
// the pointer and ease back into the glyphs.
//
// Pipeline: Settings -> Typeface + Rasterizer -> ParticleField (rebuilt per text)
// -> FrameLoop ticks the field into a FrameBuffer -> Drawer presents it.

pub mod config;
pub mod draw;
pub mod error;
pub mod font;
pub mod gradient;
pub mod input;
pub mod particle;
pub mod pointer;
pub mod raster;
pub mod ticker;
pub mod types;
