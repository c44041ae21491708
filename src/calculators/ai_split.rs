//! PRs with vs without AI involvement
//!
//! Per-PR averages computed separately for the two partitions of the PR set.
//! Merge time is averaged over the merged subset of each partition.

use crate::calculators::pr_has_ai;
use crate::classifier::Classifier;
use crate::models::{hours_between, PullRequest, ToolData};
use crate::stats::mean;
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct GroupStats {
    pub count: usize,
    pub mean_comments: Option<f64>,
    pub mean_reviews: Option<f64>,
    pub mean_commits: Option<f64>,
    pub mean_time_to_merge_hours: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AiSplitComparison {
    pub with_ai: GroupStats,
    pub without_ai: GroupStats,
}

fn group_stats(data: &ToolData, prs: &[&PullRequest]) -> GroupStats {
    if prs.is_empty() {
        return GroupStats::default();
    }

    let comments: Vec<f64> = prs
        .iter()
        .map(|pr| (data.comments_for(pr).len() + data.review_comments_for(pr).len()) as f64)
        .collect();
    let reviews: Vec<f64> = prs
        .iter()
        .map(|pr| data.reviews_for(pr).len() as f64)
        .collect();
    let commits: Vec<f64> = prs
        .iter()
        .map(|pr| data.commits_for(pr).len() as f64)
        .collect();
    let merge_hours: Vec<f64> = prs
        .iter()
        .filter_map(|pr| {
            let created = pr.created_at?;
            let merged = pr.merged_at()?;
            let hours = hours_between(created, merged);
            (hours >= 0.0).then_some(hours)
        })
        .collect();

    GroupStats {
        count: prs.len(),
        mean_comments: Some(mean(&comments)),
        mean_reviews: Some(mean(&reviews)),
        mean_commits: Some(mean(&commits)),
        mean_time_to_merge_hours: if merge_hours.is_empty() {
            None
        } else {
            Some(mean(&merge_hours))
        },
    }
}

pub fn calculate(data: &ToolData, classifier: &Classifier) -> AiSplitComparison {
    let (with_ai, without_ai): (Vec<&PullRequest>, Vec<&PullRequest>) = data
        .prs
        .iter()
        .partition(|pr| pr_has_ai(data, pr, classifier));

    AiSplitComparison {
        with_ai: group_stats(data, &with_ai),
        without_ai: group_stats(data, &without_ai),
    }
}
