//! Versioned JSON codec for [`SessionState`] snapshots.
//!
//! # Format
//! ```json
//! { "v": 1, "filterSection": "", "sortMode": "random", "order": [2, 0, 1],
//!   "pool": [0, 1, 2], "cursor": 0, "attempts": 3, "correct": 2,
//!   "datasetSize": 3 }
//! ```
//!
//! Decoding is lenient about everything except the version and the order:
//! out-of-range indices are dropped and counters are clamped.

use super::state::SessionState;
use crate::error::RestoreError;
use crate::types::SortMode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Snapshot format version. Snapshots with any other version are rejected.
pub const PROGRESS_VERSION: u64 = 1;

const COUNTER_CAP: i64 = 1_000_000_000;
const MAX_INDICES: usize = 100_000;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot<'a> {
    v: u64,
    filter_section: &'a str,
    sort_mode: SortMode,
    order: &'a [usize],
    pool: &'a [usize],
    cursor: i64,
    attempts: u32,
    correct: u32,
    dataset_size: usize,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct StoredSnapshot {
    v: Option<Value>,
    filter_section: Option<Value>,
    sort_mode: Option<Value>,
    order: Option<Value>,
    pool: Option<Value>,
    cursor: Option<Value>,
    attempts: Option<Value>,
    correct: Option<Value>,
}

/// Serialize a session for a dataset of `dataset_size` entries.
pub fn encode(state: &SessionState, dataset_size: usize) -> serde_json::Result<String> {
    let order = &state.order[..state.order.len().min(MAX_INDICES)];
    let pool = &state.pool[..state.pool.len().min(MAX_INDICES)];
    let cursor = state
        .cursor
        .filter(|&c| c < order.len())
        .map_or(-1, |c| c as i64);

    serde_json::to_string(&Snapshot {
        v: PROGRESS_VERSION,
        filter_section: &state.filter_section,
        sort_mode: state.sort_mode,
        order,
        pool,
        cursor,
        attempts: state.attempts,
        correct: state.correct.min(state.attempts),
        dataset_size,
    })
}

/// Restore a session, validating it against the current dataset size.
pub fn decode(raw: &str, dataset_size: usize) -> Result<SessionState, RestoreError> {
    let stored: StoredSnapshot = serde_json::from_str(raw)?;

    let found = stored.v.as_ref().and_then(Value::as_u64);
    if found != Some(PROGRESS_VERSION) {
        return Err(RestoreError::VersionMismatch {
            found,
            expected: PROGRESS_VERSION,
        });
    }

    let raw_order = match stored.order {
        Some(Value::Array(items)) if !items.is_empty() => items,
        _ => return Err(RestoreError::MissingOrder),
    };
    let order = valid_indices(&raw_order, dataset_size);
    if order.is_empty() {
        return Err(RestoreError::StaleOrder { dataset_size });
    }

    let pool = match stored.pool {
        Some(Value::Array(items)) => valid_indices(&items, dataset_size),
        _ => Vec::new(),
    };
    let pool = if pool.is_empty() { order.clone() } else { pool };

    let filter_section = match stored.filter_section {
        Some(Value::String(section)) => section,
        _ => String::new(),
    };
    let sort_mode = match stored.sort_mode.as_ref().and_then(Value::as_str) {
        Some("random") => SortMode::Random,
        _ => SortMode::Sequential,
    };

    let cursor = stored.cursor.as_ref().and_then(as_integer).unwrap_or(-1);
    let cursor = if cursor < 0 {
        None
    } else {
        Some((cursor as usize).min(order.len() - 1))
    };

    let attempts = stored
        .attempts
        .as_ref()
        .and_then(as_integer)
        .unwrap_or(0)
        .clamp(0, COUNTER_CAP);
    let correct = stored
        .correct
        .as_ref()
        .and_then(as_integer)
        .unwrap_or(0)
        .clamp(0, attempts);

    Ok(SessionState {
        pool,
        order,
        cursor,
        attempts: attempts as u32,
        correct: correct as u32,
        filter_section,
        sort_mode,
    })
}

fn as_integer(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite())
            .map(|f| f.trunc().clamp(i64::MIN as f64, i64::MAX as f64) as i64)
    })
}

fn valid_indices(items: &[Value], dataset_size: usize) -> Vec<usize> {
    items
        .iter()
        .filter_map(|item| {
            item.as_u64().or_else(|| {
                item.as_f64()
                    .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
                    .map(|f| f as u64)
            })
        })
        .filter_map(|i| usize::try_from(i).ok())
        .filter(|&i| i < dataset_size)
        .collect()
}
