//! Trace loading
//!
//! A trace is either a JSON array of snapshot objects or JSON Lines with one
//! snapshot object per line. Blank lines are skipped.

use anyhow::{Context, Result};
use std::fs;
use std::io::Read;
use std::path::Path;
use wavedrom_recorder::Snapshot;

/// Read a trace from a file, or from stdin when `path` is `-`
pub fn load_trace(path: &Path) -> Result<Vec<Snapshot>> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read trace from stdin")?;
        buf
    } else {
        fs::read_to_string(path).with_context(|| format!("Failed to read trace file: {:?}", path))?
    };

    parse_trace(&content).with_context(|| format!("Failed to parse trace: {:?}", path))
}

/// Parse trace text in either supported layout
pub fn parse_trace(content: &str) -> Result<Vec<Snapshot>> {
    if content.trim_start().starts_with('[') {
        log::debug!("Detected JSON array trace");
        return serde_json::from_str::<Vec<Snapshot>>(content).context("Invalid JSON array of snapshots");
    }

    log::debug!("Detected JSON Lines trace");
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str::<Snapshot>(line).with_context(|| format!("Invalid snapshot on line {}", index + 1))
        })
        .collect()
}
