//! AI vs human attribution
//!
//! Splits commits, comments and issue reports between AI agents and humans
//! using the classifier, and surfaces the most active contributors on each
//! side. A commit with no resolvable identity counts as human work but joins
//! no contributor set.

use crate::classifier::Classifier;
use crate::models::ToolData;
use crate::stats::percentage;
use serde::Serialize;
use std::collections::HashMap;

const TOP_N: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContributorCount {
    pub login: String,
    pub count: usize,
}

/// Descending by count, then ascending by login, truncated to `TOP_N`.
fn top_contributors(counts: HashMap<String, usize>) -> Vec<ContributorCount> {
    let mut list: Vec<ContributorCount> = counts
        .into_iter()
        .map(|(login, count)| ContributorCount { login, count })
        .collect();
    list.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.login.cmp(&b.login)));
    list.truncate(TOP_N);
    list
}

#[derive(Debug, Clone, Serialize)]
pub struct CommitAttribution {
    pub ai_commits: usize,
    pub human_commits: usize,
    pub total_commits: usize,
    pub ai_percentage: Option<f64>,
    pub ai_author_count: usize,
    pub human_author_count: usize,
    pub top_human_committers: Vec<ContributorCount>,
}

pub fn commit_attribution(data: &ToolData, classifier: &Classifier) -> CommitAttribution {
    let mut ai = 0usize;
    let mut human = 0usize;
    let mut ai_authors: HashMap<String, usize> = HashMap::new();
    let mut human_authors: HashMap<String, usize> = HashMap::new();

    for commit in data.commits.values().flatten() {
        match commit.author_id() {
            Some(id) if classifier.is_ai(id) => {
                ai += 1;
                *ai_authors.entry(id.to_string()).or_default() += 1;
            }
            Some(id) => {
                human += 1;
                *human_authors.entry(id.to_string()).or_default() += 1;
            }
            // Anonymous commits count as human work, attributed to no one.
            None => human += 1,
        }
    }

    let total = ai + human;
    CommitAttribution {
        ai_commits: ai,
        human_commits: human,
        total_commits: total,
        ai_percentage: percentage(ai, total),
        ai_author_count: ai_authors.len(),
        human_author_count: human_authors.len(),
        top_human_committers: top_contributors(human_authors),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentAttribution {
    pub ai_comments: usize,
    pub human_comments: usize,
    pub total_comments: usize,
    pub ai_percentage: Option<f64>,
    pub ai_reviewer_count: usize,
    pub human_reviewer_count: usize,
    pub top_human_commenters: Vec<ContributorCount>,
}

/// Comments from both tables feed the counts; review submitters additionally
/// feed the reviewer sets so a silent approver is still counted as present.
pub fn comment_attribution(data: &ToolData, classifier: &Classifier) -> CommentAttribution {
    let mut ai = 0usize;
    let mut human = 0usize;
    let mut ai_reviewers: HashMap<String, usize> = HashMap::new();
    let mut human_reviewers: HashMap<String, usize> = HashMap::new();

    let mut tally = |login: Option<&str>| {
        match login {
            Some(l) if !l.is_empty() && classifier.is_ai(l) => {
                ai += 1;
                *ai_reviewers.entry(l.to_string()).or_default() += 1;
            }
            Some(l) if !l.is_empty() => {
                human += 1;
                *human_reviewers.entry(l.to_string()).or_default() += 1;
            }
            _ => human += 1,
        };
    };

    for comment in data.comments.values().flatten() {
        tally(comment.user.as_ref().map(|u| u.login.as_str()));
    }
    for comment in data.review_comments.values().flatten() {
        tally(comment.user.as_ref().map(|u| u.login.as_str()));
    }

    let total = ai + human;

    for review in data.reviews.values().flatten() {
        if let Some(login) = review.reviewer_login() {
            if classifier.is_ai(login) {
                ai_reviewers.entry(login.to_string()).or_default();
            } else {
                human_reviewers.entry(login.to_string()).or_default();
            }
        }
    }

    CommentAttribution {
        ai_comments: ai,
        human_comments: human,
        total_comments: total,
        ai_percentage: percentage(ai, total),
        ai_reviewer_count: ai_reviewers.len(),
        human_reviewer_count: human_reviewers.len(),
        top_human_commenters: top_contributors(human_reviewers),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IssueReporterBreakdown {
    pub human_reporter_count: usize,
    pub ai_reporter_count: usize,
    pub issues_by_humans: usize,
    pub issues_by_ai: usize,
    pub top_human_reporters: Vec<ContributorCount>,
    pub top_ai_reporters: Vec<ContributorCount>,
}

pub fn issue_reporters(data: &ToolData, classifier: &Classifier) -> IssueReporterBreakdown {
    let mut ai_reporters: HashMap<String, usize> = HashMap::new();
    let mut human_reporters: HashMap<String, usize> = HashMap::new();

    for issue in &data.issues {
        let Some(login) = issue.reporter_login() else {
            continue;
        };
        let bucket = if classifier.is_ai(login) {
            &mut ai_reporters
        } else {
            &mut human_reporters
        };
        *bucket.entry(login.to_string()).or_default() += 1;
    }

    IssueReporterBreakdown {
        human_reporter_count: human_reporters.len(),
        ai_reporter_count: ai_reporters.len(),
        issues_by_humans: human_reporters.values().sum(),
        issues_by_ai: ai_reporters.values().sum(),
        top_human_reporters: top_contributors(human_reporters),
        top_ai_reporters: top_contributors(ai_reporters),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculators::testutil::*;
    use crate::models::{RecordState, ReviewState, ToolData};

    #[test]
    fn test_commit_split_and_percentage() {
        let classifier = Classifier::default();
        let mut data = ToolData::new("t");
        data.commits.insert(
            "1".into(),
            vec![
                commit("alice", "2024-01-01T00:00:00Z", "a"),
                commit("alice", "2024-01-01T01:00:00Z", "b"),
                commit("alice", "2024-01-01T02:00:00Z", "c"),
                commit("claude[bot]", "2024-01-01T03:00:00Z", "d"),
                commit("claude[bot]", "2024-01-01T04:00:00Z", "e"),
            ],
        );

        let attribution = commit_attribution(&data, &classifier);
        assert_eq!(attribution.total_commits, 5);
        assert_eq!(attribution.ai_commits, 2);
        assert_eq!(attribution.human_commits, 3);
        assert_eq!(attribution.ai_percentage, Some(40.0));
        assert_eq!(attribution.ai_author_count, 1);
        assert_eq!(attribution.human_author_count, 1);
        assert_eq!(attribution.top_human_committers[0].login, "alice");
        assert_eq!(attribution.top_human_committers[0].count, 3);
    }

    #[test]
    fn test_anonymous_commits_count_human_but_join_no_set() {
        let classifier = Classifier::default();
        let mut data = ToolData::new("t");
        let mut anonymous = commit("x", "2024-01-01T00:00:00Z", "msg");
        anonymous.author = None;
        anonymous.commit.author.as_mut().unwrap().name = None;
        data.commits.insert("1".into(), vec![anonymous]);

        let attribution = commit_attribution(&data, &classifier);
        assert_eq!(attribution.human_commits, 1);
        assert_eq!(attribution.human_author_count, 0);
    }

    #[test]
    fn test_reviewers_join_sets_without_comment_counts() {
        let classifier = Classifier::default();
        let mut data = ToolData::new("t");
        data.comments
            .insert("1".into(), vec![comment("bob", "2024-01-01T00:00:00Z")]);
        data.reviews.insert(
            "1".into(),
            vec![
                review("carol", ReviewState::Approved, "2024-01-01T01:00:00Z"),
                review("copilot", ReviewState::Commented, "2024-01-01T02:00:00Z"),
            ],
        );

        let attribution = comment_attribution(&data, &classifier);
        assert_eq!(attribution.total_comments, 1);
        assert_eq!(attribution.human_comments, 1);
        assert_eq!(attribution.human_reviewer_count, 2); // bob and carol
        assert_eq!(attribution.ai_reviewer_count, 1); // copilot
    }

    #[test]
    fn test_top_contributors_order_and_truncation() {
        let mut counts = HashMap::new();
        for (login, n) in [("zed", 3), ("amy", 3), ("bea", 1)] {
            counts.insert(login.to_string(), n);
        }
        let top = top_contributors(counts);
        assert_eq!(top[0].login, "amy"); // login breaks the tie
        assert_eq!(top[1].login, "zed");
        assert_eq!(top[2].login, "bea");
    }

    #[test]
    fn test_issue_reporter_breakdown() {
        let classifier = Classifier::default();
        let mut data = ToolData::new("t");
        data.issues.push(issue(1, "alice", RecordState::Open));
        data.issues.push(issue(2, "alice", RecordState::Closed));
        data.issues.push(issue(3, "dependabot", RecordState::Open));

        let breakdown = issue_reporters(&data, &classifier);
        assert_eq!(breakdown.human_reporter_count, 1);
        assert_eq!(breakdown.ai_reporter_count, 1);
        assert_eq!(breakdown.issues_by_humans, 2);
        assert_eq!(breakdown.issues_by_ai, 1);
        assert_eq!(breakdown.top_human_reporters[0].login, "alice");
    }
}
