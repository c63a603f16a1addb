//! Font capability used to print label identifiers.
//!
//! The encoder never loads fonts itself. It is handed a [`LabelFace`], normally the
//! process-wide face from [`default_face`], which is resolved once: the preferred
//! TrueType font when one can be found, otherwise the built-in bitmap glyphs.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use ab_glyph::{Font, FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};

use super::paint::{draw_glyph_text, glyph_text_size};

/// Point size used for the preferred TrueType face.
pub const LABEL_FONT_SIZE: f32 = 24.0;

/// Environment variable naming a font file to try before the well-known locations.
pub const FONT_ENV: &str = "QRLABEL_FONT";

const BITMAP_SCALE: u32 = 2;

const ARIAL_CANDIDATES: &[&str] = &[
    "arial.ttf",
    "/usr/share/fonts/truetype/msttcorefonts/Arial.ttf",
    "/usr/share/fonts/truetype/msttcorefonts/arial.ttf",
    "/usr/share/fonts/TTF/arial.ttf",
    "/usr/share/fonts/corefonts/arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Something that can measure and draw a single line of label text.
pub trait LabelFace: Send + Sync {
    fn name(&self) -> &str;

    /// Width and height in pixels of the rendered `text`.
    fn measure(&self, text: &str) -> (u32, u32);

    fn draw(&self, canvas: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>, text: &str);
}

/// A scalable font loaded from a TrueType/OpenType file.
pub struct TrueTypeFace {
    name: String,
    font: FontVec,
    scale: PxScale,
}

impl TrueTypeFace {
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>, size: f32) -> Option<Self> {
        let font = FontVec::try_from_vec(bytes).ok()?;
        let scale = em_scale(size, font.height_unscaled(), font.units_per_em()?);
        Some(Self {
            name: name.into(),
            font,
            scale,
        })
    }

    pub fn load(path: &Path, size: f32) -> Option<Self> {
        let bytes = fs::read(path).ok()?;
        Self::from_bytes(path.display().to_string(), bytes, size)
    }
}

impl LabelFace for TrueTypeFace {
    fn name(&self) -> &str {
        &self.name
    }

    fn measure(&self, text: &str) -> (u32, u32) {
        text_size(self.scale, &self.font, text)
    }

    fn draw(&self, canvas: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>, text: &str) {
        draw_text_mut(canvas, color, x, y, self.scale, &self.font, text);
    }
}

/// Scale at which one em is `em_px` pixels.
///
/// `PxScale` measures ascent to descent, which for most faces is taller than the em square.
fn em_scale(em_px: f32, height_unscaled: f32, units_per_em: f32) -> PxScale {
    PxScale::from(em_px * height_unscaled / units_per_em)
}

/// Built-in 5x7 glyphs; always available.
#[derive(Debug, Clone, Copy)]
pub struct BitmapFace {
    scale: u32,
}

impl BitmapFace {
    pub fn new(scale: u32) -> Self {
        Self {
            scale: scale.max(1),
        }
    }
}

impl Default for BitmapFace {
    fn default() -> Self {
        Self::new(BITMAP_SCALE)
    }
}

impl LabelFace for BitmapFace {
    fn name(&self) -> &str {
        "builtin-5x7"
    }

    fn measure(&self, text: &str) -> (u32, u32) {
        glyph_text_size(text, self.scale)
    }

    fn draw(&self, canvas: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>, text: &str) {
        draw_glyph_text(canvas, x, y, text, color, self.scale);
    }
}

/// Candidate font files, most specific first.
pub fn font_candidates(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut out = Vec::new();
    if let Some(path) = explicit {
        out.push(path.to_path_buf());
    }
    if let Some(path) = std::env::var_os(FONT_ENV) {
        out.push(PathBuf::from(path));
    }
    out.extend(ARIAL_CANDIDATES.iter().map(PathBuf::from));
    out
}

/// Try each candidate in order and fall back to the bitmap face.
///
/// A missing font is not an error; the fallback is only reported through `tracing`.
pub fn resolve_face(candidates: &[PathBuf]) -> Arc<dyn LabelFace> {
    for path in candidates {
        if let Some(face) = TrueTypeFace::load(path, LABEL_FONT_SIZE) {
            tracing::debug!(font = %path.display(), "using TrueType label font");
            return Arc::new(face);
        }
    }
    tracing::warn!(
        tried = candidates.len(),
        "preferred label font unavailable, falling back to built-in glyphs"
    );
    Arc::new(BitmapFace::default())
}

static DEFAULT_FACE: OnceLock<Arc<dyn LabelFace>> = OnceLock::new();

/// Process-wide face, resolved on first use and shared read-only afterwards.
///
/// `explicit` only has an effect on the call that performs the resolution.
pub fn default_face(explicit: Option<&Path>) -> Arc<dyn LabelFace> {
    DEFAULT_FACE
        .get_or_init(|| resolve_face(&font_candidates(explicit)))
        .clone()
}
