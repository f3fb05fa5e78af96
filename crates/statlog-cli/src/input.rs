//! JSON-lines status record input.
//!
//! One record per line, tagged with the entity it belongs to:
//!
//! ```text
//! {"entity":"mysql/0","status":"idle","info":"","since":"2026-10-01T08:30:00Z","kind":"juju-unit"}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use anyhow::{Context, Result};
use serde::Deserialize;
use statlog_core::{MemoryHistoryStore, StatusRecord};
use std::io::BufRead;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct InputLine {
    entity: String,
    #[serde(flatten)]
    record: StatusRecord,
}

/// Parse JSON-lines records from `reader` into a store holding at most
/// `capacity` records per entity.
pub fn load_records(reader: impl BufRead, capacity: usize) -> Result<MemoryHistoryStore> {
    let mut store = MemoryHistoryStore::new(capacity)
        .with_context(|| format!("invalid window capacity {capacity}"))?;
    let mut loaded = 0usize;
    let mut evicted = 0usize;

    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read line {}", idx + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let parsed: InputLine = serde_json::from_str(trimmed)
            .with_context(|| format!("line {}: not a status record", idx + 1))?;
        if store.record(&parsed.entity, parsed.record).is_some() {
            evicted += 1;
        }
        loaded += 1;
    }

    tracing::info!(loaded, evicted, capacity, "loaded status records");
    Ok(store)
}

/// Open `path` and load it with [`load_records`].
pub fn load_file(path: &Path, capacity: usize) -> Result<MemoryHistoryStore> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    load_records(std::io::BufReader::new(file), capacity)
        .with_context(|| format!("Failed to parse {}", path.display()))
}
