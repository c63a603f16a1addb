use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::config::DEFAULT_PREVIEW_COUNT;
use crate::core::label::RenderedLabel;
use crate::error::Result;

use super::{Assembler, Assembly, NamedBuffer};

pub const ARCHIVE_NAME: &str = "qrcodes.zip";

/// Archive entry name for a label identifier.
pub fn entry_name(label_id: &str) -> String {
    format!("qrcode_{label_id}.png")
}

/// A zip bundle of PNG labels held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
    /// Entry names in the order they were written.
    pub entries: Vec<String>,
    pub bytes: Vec<u8>,
}

impl Archive {
    pub fn file_name(&self) -> &'static str {
        ARCHIVE_NAME
    }
}

/// Bundle every label as a deflated PNG entry, in input order.
///
/// A repeated identifier keeps the position of its first occurrence but the
/// image of its last, matching what unpacking a zip with duplicate names yields.
pub fn archive(labels: &[RenderedLabel]) -> Result<Archive> {
    let mut staged: Vec<(String, Vec<u8>)> = Vec::with_capacity(labels.len());
    for label in labels {
        let name = entry_name(&label.label_id);
        let png = label.image.to_png()?;
        match staged.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => {
                tracing::warn!(entry = %name, "duplicate label id, later image replaces earlier");
                slot.1 = png;
            }
            None => staged.push((name, png)),
        }
    }

    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, png) in &staged {
        zip.start_file(name.as_str(), options)?;
        zip.write_all(png)?;
    }
    let bytes = zip.finish()?.into_inner();

    tracing::info!(entries = staged.len(), bytes = bytes.len(), "built label archive");
    Ok(Archive {
        entries: staged.into_iter().map(|(name, _)| name).collect(),
        bytes,
    })
}

/// The first `count` labels, in input order, for on-screen preview.
pub fn preview(labels: &[RenderedLabel], count: usize) -> &[RenderedLabel] {
    &labels[..labels.len().min(count)]
}

/// Zip bundling with a short preview strip.
#[derive(Debug, Clone, Copy)]
pub struct ZipArchiver {
    pub preview_count: usize,
}

impl Default for ZipArchiver {
    fn default() -> Self {
        Self {
            preview_count: DEFAULT_PREVIEW_COUNT,
        }
    }
}

impl Assembler for ZipArchiver {
    fn name(&self) -> &'static str {
        "archive"
    }

    fn assemble(&self, labels: &[RenderedLabel]) -> Result<Assembly> {
        let bundle = archive(labels)?;
        let previews = preview(labels, self.preview_count)
            .iter()
            .map(|label| Ok(NamedBuffer::new(entry_name(&label.label_id), label.image.to_png()?)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Assembly {
            outputs: vec![NamedBuffer::new(bundle.file_name(), bundle.bytes)],
            previews,
        })
    }
}
