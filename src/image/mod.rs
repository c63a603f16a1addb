//! Raster helpers and the font capability used to composite labels.

pub mod font;
mod paint;

pub use font::{BitmapFace, LabelFace, TrueTypeFace, default_face, resolve_face};
pub(crate) use paint::{BLACK, WHITE, encode_png, paint_modules, paste, stretch_to_rgb};
