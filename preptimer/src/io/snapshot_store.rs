//! Order files: a JSON array of `{ "id": ..., <snapshot fields> }` records.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::core::snapshot::OrderSnapshot;

/// Snapshot keyed by the order system's identifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRecord {
    pub id: String,
    #[serde(flatten)]
    pub snapshot: OrderSnapshot,
}

impl OrderRecord {
    pub fn new(id: impl Into<String>, snapshot: OrderSnapshot) -> Self {
        Self {
            id: id.into(),
            snapshot,
        }
    }
}

/// Decode order records from a parsed JSON document.
///
/// The document must be an array. Entries without a string or numeric `id`
/// are skipped with a warning; everything else about an entry is decoded
/// leniently (see [`OrderSnapshot::from_value`]).
pub fn decode_records(document: &Value) -> Result<Vec<OrderRecord>> {
    let Some(entries) = document.as_array() else {
        bail!("order file must contain a JSON array of orders");
    };
    let mut records = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let id = match entry.get("id") {
            Some(Value::String(id)) if !id.is_empty() => id.clone(),
            Some(Value::Number(id)) => id.to_string(),
            _ => {
                warn!(index, "skipping order without id");
                continue;
            }
        };
        records.push(OrderRecord::new(id, OrderSnapshot::from_value(entry)));
    }
    Ok(records)
}

/// Load order records from disk.
pub fn load_orders(path: &Path) -> Result<Vec<OrderRecord>> {
    debug!(path = %path.display(), "loading orders");
    let contents =
        fs::read_to_string(path).with_context(|| format!("read orders {}", path.display()))?;
    let document: Value = serde_json::from_str(&contents)
        .with_context(|| format!("parse orders {}", path.display()))?;
    let records =
        decode_records(&document).with_context(|| format!("decode orders {}", path.display()))?;
    debug!(count = records.len(), "orders loaded");
    Ok(records)
}

/// Atomically write order records to disk (temp file + rename).
pub fn write_orders(path: &Path, records: &[OrderRecord]) -> Result<()> {
    debug!(path = %path.display(), count = records.len(), "writing orders");
    let mut buf = serde_json::to_string_pretty(records)?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("orders path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp orders {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace orders {}", path.display()))?;
    Ok(())
}
