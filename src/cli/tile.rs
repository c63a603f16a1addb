//! `qrlabel tile`: two labels per output image.

use anyhow::Result;
use clap::Args;
use qrlabel::{OutputMode, run_batch};

use crate::cli::common::{BatchArgs, prepare};
use crate::cli::utils::{explain, write_buffers};

/// Args for `qrlabel tile`.
#[derive(Args, Debug)]
pub struct TileArgs {
    #[command(flatten)]
    pub batch: BatchArgs,
}

pub fn handle(args: TileArgs) -> Result<()> {
    let prepared = prepare(&args.batch)?;
    let assembler = OutputMode::Tile.assembler();
    let assembly = run_batch(&prepared.encoder, &prepared.records, assembler.as_ref())
        .map_err(|err| explain(err, "failed to build label sheets"))?;

    write_buffers(&args.batch.output, &assembly.outputs)?;
    println!(
        "Wrote {} sheet(s) for {} label(s) to {}",
        assembly.outputs.len(),
        prepared.records.len(),
        args.batch.output.display()
    );
    Ok(())
}
