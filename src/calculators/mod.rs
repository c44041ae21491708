//! Metric calculators
//!
//! One module per metric family. Every calculator is a pure, single-pass
//! reduction `(tables, classifier) -> statistics`; the engine runs all of
//! them for every tool and bundles the results into a `ToolReport`.

pub mod ai_attribution;
pub mod ai_split;
pub mod cognitive_load;
pub mod correlation;
mod engine;
pub mod feedback_loop;
pub mod flow;
pub mod intervention;
pub mod issue_links;
pub mod pr_level;
pub mod profile;
pub mod review_cycle;
pub mod text_patterns;

pub use engine::{compute_all, compute_tool_report, EngineOptions};

use crate::classifier::Classifier;
use crate::models::{PullRequest, ToolData};
use serde::Serialize;

/// Calculator names and descriptions, for `prlens metrics`.
pub const CALCULATORS: &[(&str, &str)] = &[
    (
        "feedback-loop",
        "Time to merge, reviews and comments per PR, time to first review",
    ),
    (
        "cognitive-load",
        "Conventional commits, issue churn, commit intervals, code churn",
    ),
    ("flow", "PR state partition, merge rate, commit cadence"),
    ("profile", "Developer, repository and language profile"),
    (
        "text-patterns",
        "Conventional-commit taxonomy over commit messages and review comments",
    ),
    (
        "ai-attribution",
        "AI vs human commits, comments, reviewers and issue reporters",
    ),
    (
        "ai-split",
        "Per-PR averages for PRs with vs without AI involvement",
    ),
    (
        "review-cycle",
        "Hours from PR creation to first approval or merge, split by AI involvement",
    ),
    (
        "intervention",
        "AI comments answered by human commits within the configured window",
    ),
    ("issue-links", "Issue-to-PR joins with AI involvement detail"),
    ("pr-level", "One row of counts and percentages per PR"),
    (
        "correlations",
        "Spearman rank correlations over the PR-level rows",
    ),
];

/// All metric families computed for one tool.
#[derive(Debug, Clone, Serialize)]
pub struct ToolReport {
    pub tool: String,
    pub ruleset_version: String,
    pub feedback_loop: feedback_loop::FeedbackLoopMetrics,
    pub cognitive_load: cognitive_load::CognitiveLoadMetrics,
    pub flow: flow::FlowMetrics,
    pub profile: profile::ProfileMetrics,
    pub text_patterns: text_patterns::TextPatternBreakdown,
    pub commit_attribution: ai_attribution::CommitAttribution,
    pub comment_attribution: ai_attribution::CommentAttribution,
    pub issue_reporters: ai_attribution::IssueReporterBreakdown,
    pub ai_split: ai_split::AiSplitComparison,
    pub review_cycle: review_cycle::ReviewCycleComparison,
    pub intervention: intervention::InterventionSummary,
    pub issue_links: Vec<issue_links::IssueLinkRow>,
    pub pr_rows: Vec<pr_level::PrRecord>,
    pub correlations: Vec<correlation::CorrelationResult>,
}

/// Whether a PR shows any AI involvement: an AI-attributed commit, comment
/// or review, or a generated-by marker in the PR body. The single predicate
/// shared by every calculator that partitions PRs.
pub(crate) fn pr_has_ai(data: &ToolData, pr: &PullRequest, classifier: &Classifier) -> bool {
    if pr
        .body
        .as_deref()
        .is_some_and(|b| classifier.body_has_marker(b))
    {
        return true;
    }
    if data
        .commits_for(pr)
        .iter()
        .any(|c| classifier.is_ai_opt(c.author_id()))
    {
        return true;
    }
    if data
        .comments_for(pr)
        .iter()
        .any(|c| classifier.is_ai_opt(c.user.as_ref().map(|u| u.login.as_str())))
    {
        return true;
    }
    if data
        .review_comments_for(pr)
        .iter()
        .any(|c| classifier.is_ai_opt(c.user.as_ref().map(|u| u.login.as_str())))
    {
        return true;
    }
    data.reviews_for(pr)
        .iter()
        .any(|r| classifier.is_ai_opt(r.reviewer_login()))
}

#[cfg(test)]
pub(crate) mod testutil {
    //! Shared fixture builders for calculator tests.

    use crate::models::*;
    use chrono::{DateTime, Utc};

    pub fn ts(s: &str) -> DateTime<Utc> {
        s.parse().expect("timestamp")
    }

    pub fn actor(login: &str) -> Option<Actor> {
        Some(Actor {
            login: login.to_string(),
        })
    }

    pub fn pr(id: u64, created: &str) -> PullRequest {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "number": id,
            "state": "open",
            "created_at": format!("{created}"),
        }))
        .expect("pr fixture")
    }

    pub fn merged_pr(id: u64, created: &str, merged: &str) -> PullRequest {
        let mut pr = pr(id, created);
        pr.state = Some(RecordState::Closed);
        pr.closed_at = Some(ts(merged));
        pr.merged_at = Some(ts(merged));
        pr
    }

    pub fn commit(login: &str, date: &str, message: &str) -> Commit {
        Commit {
            sha: format!("{login}-{date}"),
            author: actor(login),
            commit: CommitDetail {
                message: Some(message.to_string()),
                author: Some(GitIdentity {
                    name: Some(login.to_string()),
                    email: None,
                    date: Some(ts(date)),
                }),
                committer: None,
            },
        }
    }

    pub fn comment(login: &str, date: &str) -> Comment {
        Comment {
            user: actor(login),
            body: Some(format!("comment by {login}")),
            created_at: Some(ts(date)),
        }
    }

    pub fn review(login: &str, state: ReviewState, date: &str) -> Review {
        Review {
            user: actor(login),
            state: Some(state),
            submitted_at: Some(ts(date)),
            body: None,
        }
    }

    pub fn issue(number: u64, reporter: &str, state: RecordState) -> Issue {
        Issue {
            number,
            title: Some(format!("issue {number}")),
            state: Some(state),
            created_at: Some(ts("2024-01-01T00:00:00Z")),
            closed_at: if state == RecordState::Closed {
                Some(ts("2024-01-05T00:00:00Z"))
            } else {
                None
            },
            body: None,
            user: actor(reporter),
            assignee: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use testutil::*;

    #[test]
    fn test_pr_has_ai_via_body_marker() {
        let classifier = Classifier::default();
        let mut data = ToolData::new("t");
        let mut p = pr(1, "2024-01-01T00:00:00Z");
        p.body = Some("Generated with Claude Code".to_string());
        data.prs.push(p);
        assert!(pr_has_ai(&data, &data.prs[0], &classifier));
    }

    #[test]
    fn test_pr_has_ai_via_commit_author() {
        let classifier = Classifier::default();
        let mut data = ToolData::new("t");
        let p = pr(2, "2024-01-01T00:00:00Z");
        data.commits.insert(
            p.key(),
            vec![commit("claude[bot]", "2024-01-01T01:00:00Z", "feat: x")],
        );
        data.prs.push(p);
        assert!(pr_has_ai(&data, &data.prs[0], &classifier));
    }

    #[test]
    fn test_pr_without_ai() {
        let classifier = Classifier::default();
        let mut data = ToolData::new("t");
        let p = pr(3, "2024-01-01T00:00:00Z");
        data.commits.insert(
            p.key(),
            vec![commit("alice", "2024-01-01T01:00:00Z", "feat: x")],
        );
        data.comments
            .insert(p.key(), vec![comment("bob", "2024-01-01T02:00:00Z")]);
        data.prs.push(p);
        assert!(!pr_has_ai(&data, &data.prs[0], &classifier));
    }
}
