//! JSON parser for `project_openrank_detail` monthly documents.

use serde::Deserialize;
use serde_json::Value;

use crate::error::FetchError;
use crate::snapshot::{Snapshot, SnapshotRecord};

#[derive(Deserialize)]
struct RawDocument {
    nodes: Vec<RawNode>,
}

// Every field is loosely typed so one odd node cannot fail the whole month.
#[derive(Deserialize)]
struct RawNode {
    #[serde(default)]
    n: Option<Value>,
    #[serde(default)]
    r: Option<Value>,
    #[serde(default)]
    v: Option<Value>,
}

impl From<RawNode> for SnapshotRecord {
    fn from(node: RawNode) -> Self {
        SnapshotRecord {
            entity_id: node.n.and_then(|n| n.as_str().map(str::to_string)),
            rank_weight: node.r.as_ref().and_then(Value::as_f64),
            magnitude: node.v.as_ref().and_then(Value::as_f64),
        }
    }
}

/// Decodes a monthly document into a [`Snapshot`] for `period_key`.
///
/// Only `nodes[].n`, `nodes[].r` and `nodes[].v` are read; `links` and any
/// other node fields are ignored.
///
/// # Errors
///
/// Returns [`FetchError::Parse`] if the bytes are not JSON or have no `nodes`
/// array.
pub fn parse_snapshot(bytes: &[u8], period_key: &str) -> Result<Snapshot, FetchError> {
    let document: RawDocument = serde_json::from_slice(bytes)?;
    let records = document.nodes.into_iter().map(SnapshotRecord::from).collect();
    Ok(Snapshot::new(period_key, records))
}
