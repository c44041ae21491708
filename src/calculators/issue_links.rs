//! Issue-to-PR links
//!
//! Joins `related_issues.csv` rows against the issue table and the per-PR
//! activity tables, producing one row per resolvable link with the AI
//! involvement detail of the linked PR. Links whose issue or PR cannot be
//! resolved are skipped.

use crate::classifier::Classifier;
use crate::models::ToolData;
use crate::stats::percentage;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Serialize)]
pub struct IssueLinkRow {
    pub issue_number: u64,
    pub issue_title: String,
    pub issue_reporter: String,
    pub reporter_is_human: bool,
    pub issue_state: String,
    pub issue_created_at: Option<DateTime<Utc>>,
    pub issue_closed_at: Option<DateTime<Utc>>,
    pub pr_id: u64,
    pub total_commits: usize,
    pub ai_commits: usize,
    pub ai_commit_percentage: Option<f64>,
    pub total_comments: usize,
    pub ai_comments: usize,
    pub ai_comment_percentage: Option<f64>,
    pub total_reviews: usize,
    pub ai_reviews: usize,
    pub ai_review_percentage: Option<f64>,
    pub has_ai_review: bool,
    pub has_ai_involvement: bool,
    /// Distinct AI identities seen on the linked PR, sorted.
    pub bot_names: Vec<String>,
}

pub fn calculate(data: &ToolData, classifier: &Classifier) -> Vec<IssueLinkRow> {
    let mut rows = Vec::new();

    for link in &data.related_issues {
        let Some(issue) = data.issue_by_number(&link.issue_number) else {
            continue;
        };
        let pr_key = link.pr_id.trim();
        let Some(pr) = data.prs.iter().find(|p| p.key() == pr_key) else {
            continue;
        };

        let mut bots: BTreeSet<String> = BTreeSet::new();
        let mut note_bot = |login: Option<&str>| {
            if let Some(login) = login {
                if classifier.is_ai(login) {
                    bots.insert(login.to_string());
                }
            }
        };

        let commits = data.commits_for(pr);
        let mut ai_commits = 0usize;
        for commit in commits {
            if classifier.is_ai_opt(commit.author_id()) {
                ai_commits += 1;
                note_bot(commit.author_id());
            }
        }

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
                note_bot(login);
            }
        }

        let reviews = data.reviews_for(pr);
        let mut ai_reviews = 0usize;
        for review in reviews {
            if classifier.is_ai_opt(review.reviewer_login()) {
                ai_reviews += 1;
                note_bot(review.reviewer_login());
            }
        }

        let reporter = issue.reporter_login().unwrap_or("").to_string();
        let reporter_is_human = !classifier.is_ai(&reporter);

        rows.push(IssueLinkRow {
            issue_number: issue.number,
            issue_title: issue.title.clone().unwrap_or_default(),
            issue_reporter: reporter,
            reporter_is_human,
            issue_state: match issue.state {
                Some(crate::models::RecordState::Open) => "open".to_string(),
                Some(crate::models::RecordState::Closed) => "closed".to_string(),
                _ => String::new(),
            },
            issue_created_at: issue.created_at,
            issue_closed_at: issue.closed_at,
            pr_id: pr.id,
            total_commits: commits.len(),
            ai_commits,
            ai_commit_percentage: percentage(ai_commits, commits.len()),
            total_comments,
            ai_comments,
            ai_comment_percentage: percentage(ai_comments, total_comments),
            total_reviews: reviews.len(),
            ai_reviews,
            ai_review_percentage: percentage(ai_reviews, reviews.len()),
            has_ai_review: ai_reviews > 0,
            has_ai_involvement: super::pr_has_ai(data, pr, classifier),
            bot_names: bots.into_iter().collect(),
        });
    }

    rows
}
