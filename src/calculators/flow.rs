//! Flow metrics
//!
//! Throughput of the PR pipeline. The state partition is strict: a merged PR
//! counts only as merged, never additionally as closed, so
//! `open + closed + merged` adds up to the PR total and the merge rate never
//! double-counts its denominator.

use crate::models::{hours_between, RecordState, ToolData};
use crate::stats::Summary;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct FlowMetrics {
    pub total_prs: usize,
    pub prs_open: usize,
    /// Closed without being merged.
    pub prs_closed: usize,
    pub prs_merged: usize,
    /// merged / total; undefined when there are no PRs.
    pub merge_rate: Option<f64>,
    /// Hours between consecutive commits across the whole tool dataset.
    pub hours_between_commits: Option<Summary>,
    pub time_to_merge_hours: Option<Summary>,
}

pub fn calculate(data: &ToolData) -> FlowMetrics {
    let mut open = 0usize;
    let mut closed = 0usize;
    let mut merged = 0usize;
    let mut merge_hours = Vec::new();

    for pr in &data.prs {
        if pr.is_merged() {
            merged += 1;
            if let (Some(created), Some(merged_at)) = (pr.created_at, pr.merged_at()) {
                let hours = hours_between(created, merged_at);
                if hours >= 0.0 {
                    merge_hours.push(hours);
                }
            }
        } else {
            match pr.state {
                Some(RecordState::Open) => open += 1,
                // Missing or unknown state on an unmerged PR reads as
                // closed, keeping the partition exhaustive.
                _ => closed += 1,
            }
        }
    }

    let total = data.prs.len();
    let merge_rate = if total > 0 {
        Some(merged as f64 / total as f64)
    } else {
        None
    };

    // Commit cadence across every PR of the tool, not per PR.
    let mut all_times: Vec<_> = data
        .commits
        .values()
        .flatten()
        .filter_map(|c| c.authored_at())
        .collect();
    all_times.sort();
    let gaps: Vec<f64> = all_times
        .windows(2)
        .map(|w| hours_between(w[0], w[1]))
        .collect();

    FlowMetrics {
        total_prs: total,
        prs_open: open,
        prs_closed: closed,
        prs_merged: merged,
        merge_rate,
        hours_between_commits: Summary::from_values(&gaps),
        time_to_merge_hours: Summary::from_values(&merge_hours),
    }
}
