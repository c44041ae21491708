//! Per-PR records
//!
//! One row per pull request with the raw counts and percentages the
//! correlation pass and the per-tool CSV exports consume.

use crate::calculators::pr_has_ai;
use crate::classifier::Classifier;
use crate::models::{hours_between, ToolData};
use crate::stats::percentage;
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Serialize)]
pub struct PrRecord {
    pub pr_id: u64,
    pub total_commits: usize,
    pub ai_commits: usize,
    pub human_commits: usize,
    pub ai_commit_percentage: Option<f64>,
    pub total_comments: usize,
    pub ai_comments: usize,
    pub human_comments: usize,
    pub ai_comment_percentage: Option<f64>,
    pub total_reviews: usize,
    pub ai_reviews: usize,
    pub human_reviews: usize,
    pub ai_review_percentage: Option<f64>,
    pub time_to_merge_hours: Option<f64>,
    pub has_related_issue: bool,
    pub has_ai_involvement: bool,
    pub is_merged: bool,
}

pub fn calculate(data: &ToolData, classifier: &Classifier) -> Vec<PrRecord> {
    let linked: HashSet<&str> = data
        .related_issues
        .iter()
        .map(|r| r.pr_id.trim())
        .collect();

    data.prs
        .iter()
        .map(|pr| {
            let commits = data.commits_for(pr);
            let ai_commits = commits
                .iter()
                .filter(|c| classifier.is_ai_opt(c.author_id()))
                .count();

            let mut total_comments = 0usize;
            let mut ai_comments = 0usize;
            for login in data
                .comments_for(pr)
                .iter()
                .map(|c| c.user.as_ref().map(|u| u.login.as_str()))
                .chain(
                    data.review_comments_for(pr)
                        .iter()
                        .map(|c| c.user.as_ref().map(|u| u.login.as_str())),
                )
            {
                total_comments += 1;
                if classifier.is_ai_opt(login) {
                    ai_comments += 1;
                }
            }

            let reviews = data.reviews_for(pr);
            let ai_reviews = reviews
                .iter()
                .filter(|r| classifier.is_ai_opt(r.reviewer_login()))
                .count();

            let time_to_merge_hours = pr.created_at.and_then(|created| {
                pr.merged_at().and_then(|merged| {
                    let hours = hours_between(created, merged);
                    (hours >= 0.0).then_some(hours)
                })
            });

            PrRecord {
                pr_id: pr.id,
                total_commits: commits.len(),
                ai_commits,
                human_commits: commits.len() - ai_commits,
                ai_commit_percentage: percentage(ai_commits, commits.len()),
                total_comments,
                ai_comments,
                human_comments: total_comments - ai_comments,
                ai_comment_percentage: percentage(ai_comments, total_comments),
                total_reviews: reviews.len(),
                ai_reviews,
                human_reviews: reviews.len() - ai_reviews,
                ai_review_percentage: percentage(ai_reviews, reviews.len()),
                time_to_merge_hours,
                has_related_issue: linked.contains(pr.id.to_string().as_str()),
                has_ai_involvement: pr_has_ai(data, pr, classifier),
                is_merged: pr.is_merged(),
            }
        })
        .collect()
}
