//! `qrlabel archive`: every label in one zip.

use anyhow::Result;
use clap::Args;
use qrlabel::{OutputMode, run_batch};

use crate::cli::common::{BatchArgs, prepare};
use crate::cli::utils::{explain, write_buffers};

/// Args for `qrlabel archive`.
#[derive(Args, Debug)]
pub struct ArchiveArgs {
    #[command(flatten)]
    pub batch: BatchArgs,
    /// Also write the preview labels next to the archive.
    #[arg(long)]
    pub previews: bool,
    /// Number of labels to preview (overrides the config file).
    #[arg(long = "preview-count")]
    pub preview_count: Option<usize>,
}

pub fn handle(args: ArchiveArgs) -> Result<()> {
    let prepared = prepare(&args.batch)?;
    let preview_count = args.preview_count.unwrap_or(prepared.config.preview_count);
    let assembler = OutputMode::Archive { preview_count }.assembler();
    let assembly = run_batch(&prepared.encoder, &prepared.records, assembler.as_ref())
        .map_err(|err| explain(err, "failed to build label archive"))?;

    write_buffers(&args.batch.output, &assembly.outputs)?;
    if args.previews {
        write_buffers(&args.batch.output.join("preview"), &assembly.previews)?;
    }
    for shown in &assembly.previews {
        println!("preview: {}", shown.name);
    }
    println!(
        "Archived {} label(s) to {}",
        prepared.records.len(),
        args.batch.output.join(qrlabel::output::ARCHIVE_NAME).display()
    );
    Ok(())
}
