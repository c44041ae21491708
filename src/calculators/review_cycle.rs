//! Review cycle time
//!
//! Hours from PR creation to the end of its first review cycle: the earliest
//! APPROVED review when one exists, otherwise the merge. PRs with neither
//! have no cycle and contribute nothing. Split by AI involvement.

use crate::calculators::pr_has_ai;
use crate::classifier::Classifier;
use crate::models::{hours_between, PullRequest, ToolData};
use crate::stats::Summary;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ReviewCycleComparison {
    pub with_ai: Option<Summary>,
    pub without_ai: Option<Summary>,
}

fn cycle_hours(data: &ToolData, pr: &PullRequest) -> Option<f64> {
    let created = pr.created_at?;
    let end = data
        .reviews_for(pr)
        .iter()
        .filter(|r| r.is_approval())
        .filter_map(|r| r.submitted_at)
        .min()
        .or_else(|| pr.merged_at())?;
    let hours = hours_between(created, end);
    (hours >= 0.0).then_some(hours)
}

pub fn calculate(data: &ToolData, classifier: &Classifier) -> ReviewCycleComparison {
    let mut with_ai = Vec::new();
    let mut without_ai = Vec::new();

    for pr in &data.prs {
        let Some(hours) = cycle_hours(data, pr) else {
            continue;
        };
        if pr_has_ai(data, pr, classifier) {
            with_ai.push(hours);
        } else {
            without_ai.push(hours);
        }
    }

    ReviewCycleComparison {
        with_ai: Summary::from_values(&with_ai),
        without_ai: Summary::from_values(&without_ai),
    }
}
