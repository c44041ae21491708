//! Record loader
//!
//! Reads one tool directory of exported GitHub data into a typed `ToolData`.
//! The exports are uneven: top-level files may be JSON arrays or objects
//! keyed by source filename, per-PR sub-tables are objects keyed
//! `"<pr_id>.json"`, and individual records may be malformed. Loading is
//! therefore lenient at two levels:
//!
//! - a missing or unreadable file degrades to an empty table with a warning;
//! - a record that fails typed conversion is dropped with a warning, the
//!   rest of the file is kept.
//!
//! Neither case aborts the batch.

use crate::models::ToolData;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// File-level loading failures. All of them are downgraded to warnings by
/// `load_tool`; the type exists so helpers can report what went wrong.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid CSV in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
}

/// Load everything for one tool. Never fails: each table independently
/// degrades to empty on error.
pub fn load_tool(name: &str, dir: &Path) -> ToolData {
    let mut data = ToolData::new(name);

    data.prs = load_records(&dir.join("prs.json"));
    data.commits = load_keyed(&dir.join("pr_commits.json"));
    data.reviews = load_keyed(&dir.join("pr_reviews.json"));
    data.review_comments = load_keyed(&dir.join("pr_review_comments.json"));
    data.comments = load_keyed(&dir.join("pr_comments.json"));
    data.timelines = load_keyed(&dir.join("pr_timelines.json"));
    data.issues = load_records(&dir.join("issues.json"));
    data.developers = load_records(&dir.join("developer_metadata.json"));
    data.repos = load_records(&dir.join("repo_metadata.json"));
    data.conventional_commits = load_csv(&dir.join("gpt_conventional_commits.csv"));
    data.related_issues = load_csv(&dir.join("related_issues.csv"));

    debug!(
        tool = name,
        prs = data.prs.len(),
        issues = data.issues.len(),
        repos = data.repos.len(),
        "loaded tool data"
    );
    data
}

/// Read a flat record list. Accepts a JSON array or an object whose values
/// are the records (exports keyed by source filename).
pub fn load_records<T: DeserializeOwned>(path: &Path) -> Vec<T> {
    let value = match read_json(path) {
        Ok(v) => v,
        Err(err) => {
            warn!("{err}");
            return Vec::new();
        }
    };
    parse_records(flatten_records(value), path)
}

/// Read a per-PR map: a JSON object whose keys are `"<pr_id>.json"` and
/// whose values are record arrays. Keys are normalized to the bare PR id.
pub fn load_keyed<T: DeserializeOwned>(path: &Path) -> HashMap<String, Vec<T>> {
    let value = match read_json(path) {
        Ok(v) => v,
        Err(err) => {
            warn!("{err}");
            return HashMap::new();
        }
    };

    let Value::Object(map) = value else {
        warn!("{}: expected a JSON object keyed by PR id", path.display());
        return HashMap::new();
    };

    let mut out = HashMap::with_capacity(map.len());
    for (key, entry) in map {
        let pr_id = key.strip_suffix(".json").unwrap_or(&key).to_string();
        match entry {
            Value::Array(items) => {
                out.insert(pr_id, parse_records(items, path));
            }
            Value::Null => {
                out.insert(pr_id, Vec::new());
            }
            _ => warn!(
                "{}: entry for PR {} is not an array, skipped",
                path.display(),
                pr_id
            ),
        }
    }
    out
}

/// Read a CSV table, dropping undecodable rows.
pub fn load_csv<T: DeserializeOwned>(path: &Path) -> Vec<T> {
    let mut reader = match csv::Reader::from_path(path) {
        Ok(r) => r,
        Err(source) => {
            warn!(
                "{}",
                DataError::Csv {
                    path: path.display().to_string(),
                    source,
                }
            );
            return Vec::new();
        }
    };

    let mut rows = Vec::new();
    for (i, record) in reader.deserialize::<T>().enumerate() {
        match record {
            Ok(row) => rows.push(row),
            Err(err) => warn!("{}: dropped row {}: {err}", path.display(), i + 1),
        }
    }
    rows
}

fn read_json(path: &Path) -> Result<Value, DataError> {
    let raw = std::fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| DataError::Json {
        path: path.display().to_string(),
        source,
    })
}

/// Normalize a record container to its element list.
fn flatten_records(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(map) => map.into_values().collect(),
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

/// Element-wise typed conversion; bad records are dropped, not fatal.
fn parse_records<T: DeserializeOwned>(items: Vec<Value>, path: &Path) -> Vec<T> {
    let mut out = Vec::with_capacity(items.len());
    let mut dropped = 0usize;
    for item in items {
        match serde_json::from_value::<T>(item) {
            Ok(record) => out.push(record),
            Err(err) => {
                dropped += 1;
                debug!("{}: record failed to parse: {err}", path.display());
            }
        }
    }
    if dropped > 0 {
        warn!("{}: dropped {dropped} malformed record(s)", path.display());
    }
    out
}

// `prs.csv` is also present in exports but duplicates prs.json; it is
// deliberately not loaded. See DESIGN.md.
