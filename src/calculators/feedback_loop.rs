//! Feedback-loop metrics
//!
//! How quickly work on a PR comes back to its author: time to merge, review
//! and comment volume, time to the first review, and the span from creation
//! to the last review. Each statistic is computed only over the PRs where
//! the underlying value is defined; a PR without reviews contributes nothing
//! to the review statistics, it is not a zero.

use crate::models::{hours_between, ToolData};
use crate::stats::Summary;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct FeedbackLoopMetrics {
    pub time_to_merge_hours: Option<Summary>,
    pub reviews_per_pr: Option<Summary>,
    pub comments_per_pr: Option<Summary>,
    pub time_to_first_review_hours: Option<Summary>,
    /// Hours from PR creation to the last submitted review.
    pub review_span_hours: Option<Summary>,
}

pub fn calculate(data: &ToolData) -> FeedbackLoopMetrics {
    let mut merge_hours = Vec::new();
    let mut review_counts = Vec::new();
    let mut comment_counts = Vec::new();
    let mut first_review_hours = Vec::new();
    let mut review_span_hours = Vec::new();

    for pr in &data.prs {
        let created = pr.created_at;

        if let (Some(created), Some(merged)) = (created, pr.merged_at()) {
            let hours = hours_between(created, merged);
            // Negative spans are clock skew in the export; drop them.
            if hours >= 0.0 {
                merge_hours.push(hours);
            }
        }

        let reviews = data.reviews_for(pr);
        if !reviews.is_empty() {
            review_counts.push(reviews.len() as f64);

            if let Some(created) = created {
                let submitted: Vec<_> =
                    reviews.iter().filter_map(|r| r.submitted_at).collect();
                if let Some(first) = submitted.iter().min() {
                    let hours = hours_between(created, *first);
                    if hours >= 0.0 {
                        first_review_hours.push(hours);
                    }
                }
                if let Some(last) = submitted.iter().max() {
                    let hours = hours_between(created, *last);
                    if hours >= 0.0 {
                        review_span_hours.push(hours);
                    }
                }
            }
        }

        let comments = data.comments_for(pr).len() + data.review_comments_for(pr).len();
        if comments > 0 {
            comment_counts.push(comments as f64);
        }
    }

    FeedbackLoopMetrics {
        time_to_merge_hours: Summary::from_values(&merge_hours),
        reviews_per_pr: Summary::from_values(&review_counts),
        comments_per_pr: Summary::from_values(&comment_counts),
        time_to_first_review_hours: Summary::from_values(&first_review_hours),
        review_span_hours: Summary::from_values(&review_span_hours),
    }
}
