//! Command-line interface wiring for the `qrlabel` binary.
//!
//! The binary stands in for the surrounding application: it reads the sample
//! sheet, runs one batch and writes the resulting buffers to a directory.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod archive;
pub mod common;
pub mod tile;
pub mod utils;

/// Parsed CLI entrypoint for the `qrlabel` binary.
#[derive(Parser, Debug)]
#[command(name = "qrlabel", version, about = "Generate printable QR labels from a sample sheet")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Output modes.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Pair labels two per image, one PNG per pair.
    Tile(tile::TileArgs),
    /// Bundle every label into a single zip.
    Archive(archive::ArchiveArgs),
}

/// Execute the requested command.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Tile(args) => tile::handle(args),
        Command::Archive(args) => archive::handle(args),
    }
}
