//! Core data models for prlens
//!
//! Typed, immutable snapshots of the GitHub records a tool directory
//! contains. Everything GitHub may omit is an explicit `Option`; calculators
//! decide per field whether absence excludes a record. Nothing here is
//! mutated after load.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A GitHub user reference (`user`, `actor`, `assignee`, ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Actor {
    /// Deleted accounts export an explicit `"login": null`; both that and a
    /// missing field read as the empty string, which classifies as human.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub login: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Name/email/date identity attached to a git commit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GitIdentity {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

/// Nested `pull_request` object on issue-shaped PR records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PullRequestRef {
    #[serde(default)]
    pub merged_at: Option<DateTime<Utc>>,
}

/// State of a pull request or issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordState {
    Open,
    Closed,
    #[serde(other)]
    Unknown,
}

/// A pull request, as exported either in PR shape (top-level `merged_at`)
/// or issue shape (nested `pull_request.merged_at`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    pub id: u64,
    #[serde(default)]
    pub number: Option<u64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub user: Option<Actor>,
    #[serde(default)]
    pub state: Option<RecordState>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub merged_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pull_request: Option<PullRequestRef>,
    #[serde(default)]
    pub comments: Option<u64>,
}

impl PullRequest {
    /// Merge timestamp, resolving both export shapes.
    pub fn merged_at(&self) -> Option<DateTime<Utc>> {
        self.merged_at
            .or_else(|| self.pull_request.as_ref().and_then(|p| p.merged_at))
    }

    pub fn is_merged(&self) -> bool {
        self.merged_at().is_some()
    }

    pub fn author_login(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.login.as_str())
    }

    /// Key used by the per-PR sub-file maps.
    pub fn key(&self) -> String {
        self.id.to_string()
    }
}

/// Commit detail under the `commit` field of a commit record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommitDetail {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub author: Option<GitIdentity>,
    #[serde(default)]
    pub committer: Option<GitIdentity>,
}

/// A commit associated with exactly one pull request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    pub sha: String,
    /// GitHub account the commit is attributed to, when resolved.
    #[serde(default)]
    pub author: Option<Actor>,
    #[serde(default)]
    pub commit: CommitDetail,
}

impl Commit {
    /// Identity string for classification: login when resolved, otherwise
    /// the raw git author name.
    pub fn author_id(&self) -> Option<&str> {
        if let Some(actor) = &self.author {
            if !actor.login.is_empty() {
                return Some(actor.login.as_str());
            }
        }
        self.commit
            .author
            .as_ref()
            .and_then(|a| a.name.as_deref())
            .filter(|n| !n.is_empty())
    }

    pub fn authored_at(&self) -> Option<DateTime<Utc>> {
        self.commit.author.as_ref().and_then(|a| a.date)
    }

    pub fn message(&self) -> &str {
        self.commit.message.as_deref().unwrap_or("")
    }
}

/// Review verdicts; unknown values are kept, not dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewState {
    Approved,
    ChangesRequested,
    Commented,
    Dismissed,
    Pending,
    #[serde(other)]
    Other,
}

/// A submitted review on a pull request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    #[serde(default)]
    pub user: Option<Actor>,
    #[serde(default)]
    pub state: Option<ReviewState>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub body: Option<String>,
}

impl Review {
    pub fn reviewer_login(&self) -> Option<&str> {
        self.user
            .as_ref()
            .map(|u| u.login.as_str())
            .filter(|l| !l.is_empty())
    }

    pub fn is_approval(&self) -> bool {
        self.state == Some(ReviewState::Approved)
    }
}

/// A comment anchored to a specific diff line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewComment {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub position: Option<i64>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub user: Option<Actor>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A PR-level conversation comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub user: Option<Actor>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Typed timeline entry. `committed` entries look like bare commit objects:
/// top-level `sha`, git `author`, `message`, no `created_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEvent {
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub actor: Option<Actor>,
    #[serde(default)]
    pub sha: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub author: Option<GitIdentity>,
}

impl TimelineEvent {
    pub fn is_commit(&self) -> bool {
        self.event.as_deref() == Some("committed")
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.created_at
            .or_else(|| self.author.as_ref().and_then(|a| a.date))
    }

    /// Identity string of whoever produced the event.
    pub fn actor_id(&self) -> Option<&str> {
        if let Some(actor) = &self.actor {
            if !actor.login.is_empty() {
                return Some(actor.login.as_str());
            }
        }
        self.author
            .as_ref()
            .and_then(|a| a.name.as_deref())
            .filter(|n| !n.is_empty())
    }
}

/// An issue, optionally linked to PRs through `related_issues.csv`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub number: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub state: Option<RecordState>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub user: Option<Actor>,
    #[serde(default)]
    pub assignee: Option<Actor>,
}

impl Issue {
    pub fn reporter_login(&self) -> Option<&str> {
        self.user
            .as_ref()
            .map(|u| u.login.as_str())
            .filter(|l| !l.is_empty())
    }
}

/// Public profile of a developer active in the dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeveloperProfile {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub public_repos: Option<u64>,
    #[serde(default)]
    pub followers: Option<u64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Metadata of a repository contributing records to the dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: Option<u64>,
    #[serde(default)]
    pub forks_count: Option<u64>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub topics: Vec<String>,
}

/// Row of `gpt_conventional_commits.csv`: a commit pre-labelled with its
/// conventional type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConventionalCommit {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// Row of `related_issues.csv`: a derived issue-to-PR link reconstructed
/// from text matching. Ids kept as strings since exports mix formats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelatedIssue {
    pub pr_id: String,
    pub issue_number: String,
}

/// Everything loaded for one tool context.
#[derive(Debug, Clone, Default)]
pub struct ToolData {
    /// Display name of the tool (e.g. "claude_code").
    pub tool: String,
    pub prs: Vec<PullRequest>,
    /// Per-PR tables, keyed by the PR id as a decimal string.
    pub commits: HashMap<String, Vec<Commit>>,
    pub reviews: HashMap<String, Vec<Review>>,
    pub review_comments: HashMap<String, Vec<ReviewComment>>,
    pub comments: HashMap<String, Vec<Comment>>,
    pub timelines: HashMap<String, Vec<TimelineEvent>>,
    pub issues: Vec<Issue>,
    pub developers: Vec<DeveloperProfile>,
    pub repos: Vec<RepositoryMetadata>,
    pub conventional_commits: Vec<ConventionalCommit>,
    pub related_issues: Vec<RelatedIssue>,
}

impl ToolData {
    pub fn new(tool: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            ..Default::default()
        }
    }

    pub fn commits_for(&self, pr: &PullRequest) -> &[Commit] {
        self.commits.get(&pr.key()).map_or(&[], Vec::as_slice)
    }

    pub fn reviews_for(&self, pr: &PullRequest) -> &[Review] {
        self.reviews.get(&pr.key()).map_or(&[], Vec::as_slice)
    }

    pub fn review_comments_for(&self, pr: &PullRequest) -> &[ReviewComment] {
        self.review_comments
            .get(&pr.key())
            .map_or(&[], Vec::as_slice)
    }

    pub fn comments_for(&self, pr: &PullRequest) -> &[Comment] {
        self.comments.get(&pr.key()).map_or(&[], Vec::as_slice)
    }

    pub fn timeline_for(&self, pr: &PullRequest) -> &[TimelineEvent] {
        self.timelines.get(&pr.key()).map_or(&[], Vec::as_slice)
    }

    pub fn issue_by_number(&self, number: &str) -> Option<&Issue> {
        let number: u64 = number.trim().parse().ok()?;
        self.issues.iter().find(|i| i.number == number)
    }
}

/// Hours between two instants, for the duration-style metrics.
pub fn hours_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start).num_milliseconds() as f64 / 3_600_000.0
}
