//! Output assembly: turning a finished label batch into downloadable buffers.
//!
//! Each deployment mode is an [`Assembler`]. Adding a mode means adding an
//! implementation here; the encoder is not involved.

mod archiver;
mod tiler;

pub use archiver::{ARCHIVE_NAME, Archive, ZipArchiver, archive, entry_name, preview};
pub use tiler::{Canvas, TILE_GAP_PX, TwoUpTiler, tile};

use crate::core::label::RenderedLabel;
use crate::error::Result;

/// An in-memory file: name plus contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedBuffer {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl NamedBuffer {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// What an assembler hands back: files to offer for download and images to show first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assembly {
    pub outputs: Vec<NamedBuffer>,
    pub previews: Vec<NamedBuffer>,
}

/// Strategy that consumes the complete label set of a batch.
pub trait Assembler: Send + Sync {
    fn name(&self) -> &'static str;
    fn assemble(&self, labels: &[RenderedLabel]) -> Result<Assembly>;
}

/// Deployment modes shipped with the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Tile,
    Archive { preview_count: usize },
}

impl OutputMode {
    pub fn assembler(self) -> Box<dyn Assembler> {
        match self {
            OutputMode::Tile => Box::new(TwoUpTiler),
            OutputMode::Archive { preview_count } => Box::new(ZipArchiver { preview_count }),
        }
    }
}
