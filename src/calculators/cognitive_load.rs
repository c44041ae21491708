//! Cognitive-load indicators
//!
//! Proxies for how much context a contributor has to juggle: conventional
//! commit volume, comment volume, issue churn, the cadence of commits inside
//! a PR, how many files a PR's commit messages touch, and code churn
//! (commits per PR).

use crate::models::ToolData;
use crate::stats::Summary;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::OnceLock;

static PATH_TOKEN: OnceLock<Regex> = OnceLock::new();

/// Path-like tokens in commit messages ("src/loader/mod.rs", "docs/readme").
fn path_token() -> &'static Regex {
    PATH_TOKEN.get_or_init(|| {
        Regex::new(r"[A-Za-z0-9_.-]+(?:/[A-Za-z0-9_.-]+)+").expect("path token pattern")
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct CognitiveLoadMetrics {
    pub conventional_commit_total: usize,
    pub total_comments: usize,
    pub issues_open: usize,
    pub issues_closed: usize,
    /// Closed minus open; positive means the backlog shrank.
    pub issues_delta: i64,
    /// Per-PR mean hours between consecutive commits.
    pub commit_interval_hours: Option<Summary>,
    /// Distinct path-like tokens mentioned by a PR's commit messages.
    pub files_mentioned_per_pr: Option<Summary>,
    /// Commits per PR.
    pub code_churn: Option<Summary>,
}

pub fn calculate(data: &ToolData) -> CognitiveLoadMetrics {
    let total_comments = data.comments.values().map(Vec::len).sum::<usize>()
        + data.review_comments.values().map(Vec::len).sum::<usize>();

    let mut issues_open = 0usize;
    let mut issues_closed = 0usize;
    for issue in &data.issues {
        match issue.state {
            Some(crate::models::RecordState::Open) => issues_open += 1,
            Some(crate::models::RecordState::Closed) if issue.closed_at.is_some() => {
                issues_closed += 1
            }
            _ => {}
        }
    }

    let mut interval_means = Vec::new();
    let mut files_mentioned = Vec::new();
    let mut churn = Vec::new();

    for commits in data.commits.values() {
        if commits.is_empty() {
            continue;
        }
        churn.push(commits.len() as f64);

        let mut times: Vec<_> = commits.iter().filter_map(|c| c.authored_at()).collect();
        if times.len() > 1 {
            times.sort();
            let intervals: Vec<f64> = times
                .windows(2)
                .map(|w| crate::models::hours_between(w[0], w[1]))
                .collect();
            interval_means.push(crate::stats::mean(&intervals));
        }

        let mut paths: HashSet<&str> = HashSet::new();
        for commit in commits {
            for m in path_token().find_iter(commit.message()) {
                paths.insert(m.as_str());
            }
        }
        if !paths.is_empty() {
            files_mentioned.push(paths.len() as f64);
        }
    }

    CognitiveLoadMetrics {
        conventional_commit_total: data.conventional_commits.len(),
        total_comments,
        issues_open,
        issues_closed,
        issues_delta: issues_closed as i64 - issues_open as i64,
        commit_interval_hours: Summary::from_values(&interval_means),
        files_mentioned_per_pr: Summary::from_values(&files_mentioned),
        code_churn: Summary::from_values(&churn),
    }
}
