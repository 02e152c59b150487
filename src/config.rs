// Settings: every tunable constant in one place, optionally overridden from a TOML file.
// Missing keys keep their defaults; nonsensical values are clamped with a warning.

use crate::error::Error;
use crate::particle::Motion;
use crate::raster::TextStyle;
use log::{info, warn};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Looked up in the working directory when no path is given on the command line.
pub const DEFAULT_SETTINGS_FILE: &str = "particle-text.toml";

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Initial window size in pixels.
    pub width: usize,
    pub height: usize,
    /// Text shown before anything is typed.
    pub initial_text: String,
    pub font_size: f32,
    pub line_height_ratio: f32,
    /// Wrap width as a fraction of the window width.
    pub max_text_width_ratio: f32,
    pub vertical_offset: f32,
    pub letter_spacing: f32,
    pub stroke_width: f32,
    /// Sampling stride and particle size.
    pub gap: usize,
    /// Squared-distance reach of the pointer repulsion.
    pub pointer_radius: f32,
    /// [min, max) per-particle friction.
    pub friction: [f32; 2],
    /// [min, max) per-particle ease.
    pub ease: [f32; 2],
    /// Optional .ttf/.otf file; the built-in bitmap face is used otherwise.
    pub font_path: Option<PathBuf>,
    pub target_fps: usize,
    pub resize_debounce_ms: u64,
    /// Fixed RNG seed for reproducible spawn positions.
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: 400,
            height: 500,
            initial_text: "Hello Lets Code".to_string(),
            font_size: 80.0,
            line_height_ratio: 0.99,
            max_text_width_ratio: 0.8,
            vertical_offset: 20.0,
            letter_spacing: 5.0,
            stroke_width: 3.0,
            gap: 3,
            pointer_radius: 20_000.0,
            friction: [0.15, 0.75],
            ease: [0.005, 0.105],
            font_path: None,
            target_fps: 60,
            resize_debounce_ms: 120,
            seed: None,
        }
    }
}

impl Settings {
    /// Parse TOML text and clamp the result.
    pub fn from_toml(text: &str) -> Result<Self, Error> {
        let settings: Settings = toml::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        Ok(settings.sanitized())
    }

    /// Load from `path`, or from DEFAULT_SETTINGS_FILE if it exists, or use defaults.
    /// An explicitly given path that cannot be read is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_SETTINGS_FILE), false),
        };
        match std::fs::read_to_string(&path) {
            Ok(text) => {
                let settings = Self::from_toml(&text)
                    .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
                info!("Loaded settings from {}", path.display());
                Ok(settings)
            }
            Err(e) if explicit => Err(Error::Config(format!("{}: {e}", path.display()))),
            Err(_) => {
                info!("No {DEFAULT_SETTINGS_FILE}; using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Clamp values the rest of the program cannot work with.
    pub fn sanitized(mut self) -> Self {
        let d = Settings::default();
        if self.width == 0 || self.height == 0 {
            warn!("Window size {}x{} clamped to at least 1x1", self.width, self.height);
            self.width = self.width.max(1);
            self.height = self.height.max(1);
        }
        if self.gap == 0 {
            warn!("gap must be >= 1; using 1");
            self.gap = 1;
        }
        if !(self.font_size.is_finite() && self.font_size > 0.0) {
            warn!("font_size {} invalid; using {}", self.font_size, d.font_size);
            self.font_size = d.font_size;
        }
        if !(self.pointer_radius.is_finite() && self.pointer_radius >= 0.0) {
            warn!("pointer_radius {} invalid; using {}", self.pointer_radius, d.pointer_radius);
            self.pointer_radius = d.pointer_radius;
        }
        self.line_height_ratio = non_negative(self.line_height_ratio, d.line_height_ratio, "line_height_ratio");
        self.letter_spacing = non_negative(self.letter_spacing, d.letter_spacing, "letter_spacing");
        self.max_text_width_ratio = non_negative(self.max_text_width_ratio, d.max_text_width_ratio, "max_text_width_ratio");
        self.stroke_width = non_negative(self.stroke_width, d.stroke_width, "stroke_width");
        if !self.vertical_offset.is_finite() {
            warn!("vertical_offset {} invalid; using {}", self.vertical_offset, d.vertical_offset);
            self.vertical_offset = d.vertical_offset;
        }
        self.friction = bounds(self.friction, d.friction, "friction");
        self.ease = bounds(self.ease, d.ease, "ease");
        self.target_fps = self.target_fps.max(1);
        self
    }

    pub fn text_style(&self) -> TextStyle {
        TextStyle {
            font_size: self.font_size,
            line_height_ratio: self.line_height_ratio,
            letter_spacing: self.letter_spacing,
            stroke_width: self.stroke_width.max(0.0),
            vertical_offset: self.vertical_offset,
            ..TextStyle::default()
        }
    }

    pub fn motion(&self) -> Motion {
        Motion {
            friction: self.friction[0]..self.friction[1],
            ease: self.ease[0]..self.ease[1],
        }
    }
}

fn non_negative(value: f32, default: f32, name: &str) -> f32 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        warn!("{name} {value} invalid; using {default}");
        default
    }
}

/// Finite, non-negative and ordered; anything else falls back to `default`.
fn bounds([lo, hi]: [f32; 2], default: [f32; 2], name: &str) -> [f32; 2] {
    if !(lo.is_finite() && hi.is_finite() && lo >= 0.0 && hi >= 0.0) {
        warn!("{name} range [{lo}, {hi}) invalid; using {default:?}");
        return default;
    }
    if lo <= hi {
        [lo, hi]
    } else {
        warn!("{name} range [{lo}, {hi}) reversed; swapping");
        [hi, lo]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_effect() {
        let s = Settings::default();
        assert_eq!((s.width, s.height, s.gap), (400, 500, 3));
        assert_eq!(s.pointer_radius, 20_000.0);
        assert_eq!(s.motion().friction, 0.15..0.75);
        assert_eq!(s.text_style().line_height(), 80.0 * 0.99);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let s = Settings::from_toml("gap = 4\ninitial_text = \"Rust\"\nfont_path = \"/tmp/x.ttf\"\n").unwrap();
        assert_eq!(s.gap, 4);
        assert_eq!(s.initial_text, "Rust");
        assert_eq!(s.font_path.as_deref(), Some(Path::new("/tmp/x.ttf")));
        assert_eq!(s.width, 400);
    }

    #[test]
    fn bad_values_are_clamped() {
        let s = Settings::from_toml("gap = 0\nwidth = 0\nfriction = [0.9, 0.2]\nfont_size = -3.0\n").unwrap();
        assert_eq!(s.gap, 1);
        assert_eq!(s.width, 1);
        assert_eq!(s.friction, [0.2, 0.9]);
        assert_eq!(s.font_size, 80.0);
    }

    #[test]
    fn non_finite_and_negative_values_fall_back_to_defaults() {
        let s = Settings::from_toml(
            "friction = [0.1, inf]\nease = [-0.5, 0.1]\nline_height_ratio = nan\n\
             letter_spacing = -inf\nmax_text_width_ratio = -0.8\nstroke_width = inf\n\
             vertical_offset = nan\n",
        )
        .unwrap();
        let d = Settings::default();
        assert_eq!(s.friction, d.friction);
        assert_eq!(s.ease, d.ease);
        assert_eq!(s.line_height_ratio, d.line_height_ratio);
        assert_eq!(s.letter_spacing, d.letter_spacing);
        assert_eq!(s.max_text_width_ratio, d.max_text_width_ratio);
        assert_eq!(s.stroke_width, d.stroke_width);
        assert_eq!(s.vertical_offset, d.vertical_offset);
    }

    #[test]
    fn sanitized_ranges_can_seed_a_field() {
        use crate::font::BitmapFace;
        use crate::particle::ParticleField;
        use crate::pointer::SharedPointer;
        use crate::raster::Rasterizer;
        use rand::SeedableRng;
        use rand::rngs::StdRng;

        let s = Settings::from_toml("friction = [0.1, inf]\nease = [inf, 0.2]\n").unwrap();
        let rasterizer = Rasterizer::new(Box::new(BitmapFace), s.text_style(), s.gap);
        let mut field = ParticleField::new(
            rasterizer,
            SharedPointer::new(s.pointer_radius),
            s.motion(),
            s.max_text_width_ratio,
            s.width,
            s.height,
            StdRng::seed_from_u64(1),
        );
        assert!(field.rebuild("Hi") > 0);
        assert!(field.particles().iter().all(|p| p.friction.is_finite() && p.ease.is_finite()));
    }

    #[test]
    fn unknown_keys_and_bad_types_are_errors() {
        assert!(matches!(Settings::from_toml("colour = 1"), Err(Error::Config(_))));
        assert!(matches!(Settings::from_toml("gap = \"three\""), Err(Error::Config(_))));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = Settings::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(err.to_string().contains("here.toml"));
    }
}
