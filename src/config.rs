//! Label geometry and run configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::label::TEXT_BAND_PX;
use crate::error::{LabelError, Result};
use crate::output::TILE_GAP_PX;

const MM_PER_INCH: f64 = 25.4;

pub const DEFAULT_DPI: u32 = 500;
pub const DEFAULT_WIDTH_MM: f64 = 12.0;
pub const DEFAULT_HEIGHT_MM: f64 = 12.0;
pub const DEFAULT_CONTENT_COLUMN: &str = "Sample Name";
pub const DEFAULT_LABEL_COLUMN: &str = "Code_ID";
pub const DEFAULT_PREVIEW_COUNT: usize = 4;
/// Largest edge, in pixels, of any raster the pipeline will allocate.
pub const MAX_RASTER_PX: u32 = 65_535;

/// Physical footprint of the QR block and the resolution it is printed at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelSpec {
    pub dpi: u32,
    pub width_mm: f64,
    pub height_mm: f64,
}

impl Default for LabelSpec {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            width_mm: DEFAULT_WIDTH_MM,
            height_mm: DEFAULT_HEIGHT_MM,
        }
    }
}

impl LabelSpec {
    pub fn new(dpi: u32, width_mm: f64, height_mm: f64) -> Self {
        Self {
            dpi,
            width_mm,
            height_mm,
        }
    }

    /// Pixel width of the QR block.
    pub fn pixel_width(&self) -> u32 {
        mm_to_px(self.width_mm, self.dpi)
    }

    /// Pixel height of the QR block, excluding the text band.
    pub fn pixel_height(&self) -> u32 {
        mm_to_px(self.height_mm, self.dpi)
    }

    /// Reject geometry that cannot produce a non-empty raster.
    pub fn validate(&self) -> Result<()> {
        if self.dpi == 0 {
            return Err(LabelError::InvalidInput("dpi must be positive".into()));
        }
        for (name, mm) in [("width", self.width_mm), ("height", self.height_mm)] {
            if !mm.is_finite() || mm <= 0.0 {
                return Err(LabelError::InvalidInput(format!(
                    "{name} must be a positive number of millimetres, got {mm}"
                )));
            }
        }
        if self.pixel_width() == 0 || self.pixel_height() == 0 {
            return Err(LabelError::InvalidInput(format!(
                "{}x{} mm at {} dpi rounds to an empty image",
                self.width_mm, self.height_mm, self.dpi
            )));
        }
        // Two-up sheets are the widest raster, labels with their text band the tallest.
        let sheet_width = u64::from(self.pixel_width()) * 2 + u64::from(TILE_GAP_PX);
        let label_height = u64::from(self.pixel_height()) + u64::from(TEXT_BAND_PX);
        if sheet_width > u64::from(MAX_RASTER_PX) || label_height > u64::from(MAX_RASTER_PX) {
            return Err(LabelError::InvalidInput(format!(
                "{}x{} mm at {} dpi exceeds the {MAX_RASTER_PX}px raster limit",
                self.width_mm, self.height_mm, self.dpi
            )));
        }
        Ok(())
    }
}

fn mm_to_px(mm: f64, dpi: u32) -> u32 {
    (mm / MM_PER_INCH * dpi as f64).round() as u32
}

/// Settings for one batch run, usually read from a JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub label: LabelSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_path: Option<PathBuf>,
    pub content_column: String,
    pub label_column: String,
    pub preview_count: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            label: LabelSpec::default(),
            font_path: None,
            content_column: DEFAULT_CONTENT_COLUMN.to_string(),
            label_column: DEFAULT_LABEL_COLUMN.to_string(),
            preview_count: DEFAULT_PREVIEW_COUNT,
        }
    }
}

impl RunConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|err| {
            LabelError::InvalidInput(format!("bad config {}: {err}", path.display()))
        })
    }
}
