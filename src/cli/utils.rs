//! Convenience helpers shared across command handlers.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use qrlabel::{ErrorKind, LabelError, NamedBuffer, RunConfig};

/// Load a JSON run configuration, attaching path context to any error.
pub fn load_config(path: &Path) -> Result<RunConfig> {
    RunConfig::load(path).with_context(|| format!("failed to load config {}", path.display()))
}

/// Turn a library error into a message that says which kind of problem occurred.
pub fn explain(err: LabelError, action: &str) -> anyhow::Error {
    let hint = match err.kind() {
        ErrorKind::InvalidInput => "check the sample sheet and label settings",
        ErrorKind::EncodingCapacityExceeded => "shorten the content or allow a larger symbol",
        ErrorKind::EmptyInput => "the sample sheet has no rows",
        ErrorKind::IoFailure => "could not read or write data",
    };
    anyhow!(err).context(format!("{action} ({hint})"))
}

/// Write every buffer into `dir`, creating it first.
pub fn write_buffers(dir: &Path, buffers: &[NamedBuffer]) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;
    for buffer in buffers {
        let target = dir.join(&buffer.name);
        fs::write(&target, &buffer.bytes)
            .with_context(|| format!("failed to write {}", target.display()))?;
    }
    Ok(())
}
