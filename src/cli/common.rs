//! Flags shared by every output mode.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use qrlabel::{Columns, LabelEncoder, RunConfig, SampleRecord, load_records};

use crate::cli::utils::{explain, load_config};

/// Input, output and label geometry for one batch.
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// CSV sample sheet.
    pub input: PathBuf,
    /// Directory the generated files are written to.
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,
    /// JSON run configuration; flags below override it.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Print resolution in dots per inch.
    #[arg(long)]
    pub dpi: Option<u32>,
    /// QR block width in millimetres.
    #[arg(long = "width-mm")]
    pub width_mm: Option<f64>,
    /// QR block height in millimetres.
    #[arg(long = "height-mm")]
    pub height_mm: Option<f64>,
    /// TrueType font for the identifier line.
    #[arg(long)]
    pub font: Option<PathBuf>,
    /// Header of the column holding the encoded payload.
    #[arg(long = "content-column")]
    pub content_column: Option<String>,
    /// Header of the column holding the printed identifier.
    #[arg(long = "label-column")]
    pub label_column: Option<String>,
}

impl BatchArgs {
    /// Merge the optional config file with explicit flags.
    pub fn run_config(&self) -> Result<RunConfig> {
        let mut cfg = match &self.config {
            Some(path) => load_config(path)?,
            None => RunConfig::default(),
        };
        if let Some(dpi) = self.dpi {
            cfg.label.dpi = dpi;
        }
        if let Some(width) = self.width_mm {
            cfg.label.width_mm = width;
        }
        if let Some(height) = self.height_mm {
            cfg.label.height_mm = height;
        }
        if let Some(font) = &self.font {
            cfg.font_path = Some(font.clone());
        }
        if let Some(column) = &self.content_column {
            cfg.content_column = column.clone();
        }
        if let Some(column) = &self.label_column {
            cfg.label_column = column.clone();
        }
        Ok(cfg)
    }
}

/// Everything a mode handler needs before assembly.
pub struct Prepared {
    pub config: RunConfig,
    pub records: Vec<SampleRecord>,
    pub encoder: LabelEncoder,
}

/// Resolve configuration, read the sheet and build the encoder.
pub fn prepare(args: &BatchArgs) -> Result<Prepared> {
    let config = args.run_config()?;
    let records = load_records(&args.input, &Columns::from(&config))
        .map_err(|err| explain(err, &format!("failed to read {}", args.input.display())))?;
    let encoder = LabelEncoder::with_default_face(config.label, config.font_path.as_deref())
        .map_err(|err| explain(err, "invalid label geometry"))?;
    tracing::info!(
        records = records.len(),
        dpi = config.label.dpi,
        width_mm = config.label.width_mm,
        height_mm = config.label.height_mm,
        face = encoder.face().name(),
        "prepared batch"
    );
    Ok(Prepared {
        config,
        records,
        encoder,
    })
}
