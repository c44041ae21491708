//! AI/bot attribution classifier
//!
//! Labels an author identity (login or display name) as AI/bot or human.
//! The policy is an explicit ordered rule list with first-match-wins
//! precedence:
//!
//! 1. literal `[bot]` substring in the identity
//! 2. allowlist of known bot login substrings
//! 3. login regex patterns (`-bot` suffix, `bot-` prefix, ...)
//!
//! PR bodies are checked separately for literal generated-by markers.
//! An identity matching any rule is AI; no match is human. There is no
//! uncertain category. The built-in rule set is versioned and can be
//! extended or replaced through `prlens.toml`.

use crate::config::ClassifierConfig;
use anyhow::{Context, Result};
use regex::Regex;

/// Version tag of the built-in rule set. Bumped whenever the allowlist or
/// patterns change, so exported reports can record which rules labelled them.
pub const BUILTIN_RULESET_VERSION: &str = "2025.08";

/// Known bot login substrings, matched case-insensitively anywhere in the
/// identity. Hand-maintained; extend via config rather than editing reports.
const BUILTIN_BOT_LOGINS: &[&str] = &[
    "copilot",
    "claude",
    "cursor",
    "codecov",
    "changeset-bot",
    "dependabot",
    "renovate",
    "github-actions",
    "greenkeeper",
    "imgbot",
    "stale",
    "semantic-release-bot",
    "allcontributors",
    "gitguardian",
    "snyk-bot",
    "codefactor-io",
    "codacy",
    "deepsource-io",
    "sonarcloud",
    "lgtm-com",
    "circleci",
    "travis-ci",
    "netlify",
    "vercel",
    "heroku",
    "gitlab-bot",
    "bitbucket-pipelines",
    "azure-pipelines",
    "jenkins",
    "bugbot",
    "greptile",
    "ellipsis",
    "cubic",
    "gemini",
];

/// Login shape patterns applied after the allowlist.
const BUILTIN_BOT_PATTERNS: &[&str] = &[r"-bot$", r"^bot-", r"bot-", r"-agent$", r"-ci$"];

/// Literal markers tools append to PR bodies they generate.
const BUILTIN_BODY_MARKERS: &[&str] = &[
    "generated with claude code",
    "co-authored-by: claude",
    "co-authored-by: copilot",
    "created by cursor",
    "generated by copilot",
];

/// A single ordered classification rule.
#[derive(Debug, Clone)]
enum Rule {
    /// Case-insensitive substring match on the identity.
    LoginSubstring(String),
    /// Compiled regex match on the lowercased identity.
    LoginPattern(Regex),
}

/// Ordered-rule AI/bot classifier.
#[derive(Debug)]
pub struct Classifier {
    ruleset_version: String,
    rules: Vec<Rule>,
    body_markers: Vec<String>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::from_config(&ClassifierConfig::default())
            .expect("built-in classifier patterns compile")
    }
}

impl Classifier {
    /// Build the rule list from config. With `extend = true` (the default)
    /// configured entries are appended after the built-ins; otherwise they
    /// replace them.
    pub fn from_config(config: &ClassifierConfig) -> Result<Self> {
        let mut rules = Vec::new();
        let mut body_markers = Vec::new();

        // The `[bot]` marker always takes precedence; GitHub reserves it for
        // machine accounts.
        rules.push(Rule::LoginSubstring("[bot]".to_string()));

        if config.extend {
            for login in BUILTIN_BOT_LOGINS {
                rules.push(Rule::LoginSubstring((*login).to_string()));
            }
        }
        for login in &config.bot_logins {
            rules.push(Rule::LoginSubstring(login.to_lowercase()));
        }

        if config.extend {
            for pattern in BUILTIN_BOT_PATTERNS {
                rules.push(Rule::LoginPattern(Regex::new(pattern)?));
            }
        }
        for pattern in &config.bot_patterns {
            rules.push(Rule::LoginPattern(
                Regex::new(pattern)
                    .with_context(|| format!("invalid classifier pattern: {pattern}"))?,
            ));
        }

        if config.extend {
            body_markers.extend(BUILTIN_BODY_MARKERS.iter().map(|m| m.to_string()));
        }
        body_markers.extend(config.body_markers.iter().map(|m| m.to_lowercase()));

        let ruleset_version = config
            .ruleset_version
            .clone()
            .unwrap_or_else(|| BUILTIN_RULESET_VERSION.to_string());

        Ok(Self {
            ruleset_version,
            rules,
            body_markers,
        })
    }

    pub fn ruleset_version(&self) -> &str {
        &self.ruleset_version
    }

    /// Classify an author identity. Empty identities are human: absence of
    /// evidence never promotes a record to AI.
    pub fn is_ai(&self, identity: &str) -> bool {
        if identity.is_empty() {
            return false;
        }
        let identity = identity.to_lowercase();
        self.rules.iter().any(|rule| match rule {
            Rule::LoginSubstring(s) => identity.contains(s.as_str()),
            Rule::LoginPattern(re) => re.is_match(&identity),
        })
    }

    /// Classify an optional identity; `None` is human.
    pub fn is_ai_opt(&self, identity: Option<&str>) -> bool {
        identity.is_some_and(|id| self.is_ai(id))
    }

    /// Whether a PR body carries a literal generated-by marker.
    pub fn body_has_marker(&self, body: &str) -> bool {
        if body.is_empty() {
            return false;
        }
        let body = body.to_lowercase();
        self.body_markers.iter().any(|m| body.contains(m.as_str()))
    }
}
