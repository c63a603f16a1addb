//! Batch QR label generation.
//!
//! Records are encoded into labels (a QR block sized in millimetres at a given DPI,
//! with the record identifier printed below), then handed to one output strategy:
//! two-up sheets or a zip bundle.

pub mod config;
pub mod core;
pub mod error;
pub mod image;
pub mod output;

pub use crate::config::{LabelSpec, RunConfig};
pub use crate::core::{
    Columns, LabelEncoder, LabelImage, RenderedLabel, SampleRecord, encode, load_records,
    read_records,
};
pub use crate::error::{ErrorKind, LabelError, Result};
pub use crate::image::{BitmapFace, LabelFace, TrueTypeFace, default_face, resolve_face};
pub use crate::output::{
    Archive, Assembler, Assembly, Canvas, NamedBuffer, OutputMode, TwoUpTiler, ZipArchiver,
    archive, preview, tile,
};

/// Encode all records and assemble the result with `assembler`.
///
/// The whole batch is encoded before assembly starts; any failing record aborts it.
pub fn run_batch(
    encoder: &LabelEncoder,
    records: &[SampleRecord],
    assembler: &dyn Assembler,
) -> Result<Assembly> {
    let labels = encoder.encode_all(records)?;
    let assembly = assembler.assemble(&labels)?;
    tracing::info!(
        mode = assembler.name(),
        outputs = assembly.outputs.len(),
        previews = assembly.previews.len(),
        "assembled batch"
    );
    Ok(assembly)
}
