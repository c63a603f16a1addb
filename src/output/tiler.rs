use image::RgbImage;

use crate::core::label::{LabelImage, RenderedLabel};
use crate::error::{LabelError, Result};
use crate::image::{WHITE, encode_png, paste};

use super::{Assembler, Assembly, NamedBuffer};

/// Horizontal gap between the two labels on a sheet.
pub const TILE_GAP_PX: u32 = 10;

/// A two-up sheet. `sequence` is 1-based.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    pub sequence: usize,
    pub image: RgbImage,
}

impl Canvas {
    pub fn file_name(&self) -> String {
        format!("combined_qrcode_{}.png", self.sequence)
    }

    pub fn to_png(&self) -> Result<Vec<u8>> {
        encode_png(&self.image)
    }
}

/// Pair labels side by side, one canvas per consecutive pair.
///
/// Canvas width comes from the first label; height is the tallest label. An odd
/// trailing label leaves the right slot white.
pub fn tile<L: AsRef<LabelImage>>(labels: &[L]) -> Result<Vec<Canvas>> {
    let first = labels.first().ok_or(LabelError::EmptyInput)?;
    let label_width = first.as_ref().width();
    let width = 2 * label_width + TILE_GAP_PX;
    let height = labels.iter().map(|l| l.as_ref().height()).max().unwrap_or(0);

    let canvases = labels
        .chunks(2)
        .enumerate()
        .map(|(idx, pair)| {
            let mut image = RgbImage::from_pixel(width, height, WHITE);
            paste(&mut image, pair[0].as_ref().as_rgb(), 0, 0);
            if let Some(right) = pair.get(1) {
                paste(&mut image, right.as_ref().as_rgb(), label_width + TILE_GAP_PX, 0);
            }
            Canvas {
                sequence: idx + 1,
                image,
            }
        })
        .collect();
    Ok(canvases)
}

/// Two-up sheet layout; every canvas is both an output and a preview.
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoUpTiler;

impl Assembler for TwoUpTiler {
    fn name(&self) -> &'static str {
        "tile"
    }

    fn assemble(&self, labels: &[RenderedLabel]) -> Result<Assembly> {
        let canvases = tile(labels)?;

        let outputs = canvases
            .iter()
            .map(|canvas| Ok(NamedBuffer::new(canvas.file_name(), canvas.to_png()?)))
            .collect::<Result<Vec<_>>>()?;
        tracing::info!(labels = labels.len(), canvases = outputs.len(), "tiled labels");

        Ok(Assembly {
            previews: outputs.clone(),
            outputs,
        })
    }
}
