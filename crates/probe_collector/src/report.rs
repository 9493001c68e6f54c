//! JSON report writers for collected items.

use crate::item::ProbeItem;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Error types for report writing.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Underlying writer error
    #[error("write error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Serialize)]
struct Report<'a> {
    item_count: usize,
    items: Vec<&'a ProbeItem>,
}

/// Writes a snapshot of collected items as a pretty-printed JSON report.
pub fn write_json<W: Write>(items: &[Arc<ProbeItem>], out: &mut W) -> Result<(), ReportError> {
    let report = Report {
        item_count: items.len(),
        items: items.iter().map(Arc::as_ref).collect(),
    };

    serde_json::to_writer_pretty(&mut *out, &report)?;
    out.write_all(b"\n")?;
    Ok(())
}

/// Renders a snapshot of collected items to a JSON string.
pub fn to_json_string(items: &[Arc<ProbeItem>]) -> Result<String, ReportError> {
    let report = Report {
        item_count: items.len(),
        items: items.iter().map(Arc::as_ref).collect(),
    };

    let mut rendered = serde_json::to_string_pretty(&report)?;
    rendered.push('\n');
    Ok(rendered)
}

/// Writes the report to a file, creating or truncating it.
pub fn write_json_file(items: &[Arc<ProbeItem>], path: impl AsRef<Path>) -> Result<(), ReportError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_json(items, &mut writer)?;
    writer.flush()?;
    Ok(())
}
