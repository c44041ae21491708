//! Developer and repository profile
//!
//! Aggregates of the `developer_metadata` and `repo_metadata` tables: who
//! works in this dataset and what the repositories look like.

use crate::models::ToolData;
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
pub struct ProfileMetrics {
    pub developer_count: usize,
    pub repo_count: usize,
    pub unique_languages: usize,
    /// Most common primary language; lexicographically smallest on a tie.
    pub primary_language: Option<String>,
    pub total_stars: u64,
    pub total_forks: u64,
    pub mean_followers: Option<f64>,
    pub mean_public_repos: Option<f64>,
}

pub fn calculate(data: &ToolData) -> ProfileMetrics {
    // BTreeMap keeps tie-breaking deterministic.
    let mut languages: BTreeMap<&str, usize> = BTreeMap::new();
    let mut stars = 0u64;
    let mut forks = 0u64;
    for repo in &data.repos {
        if let Some(lang) = repo.language.as_deref().filter(|l| !l.is_empty()) {
            *languages.entry(lang).or_default() += 1;
        }
        stars += repo.stargazers_count.unwrap_or(0);
        forks += repo.forks_count.unwrap_or(0);
    }
    // Highest count first, then lexicographically smallest language.
    let primary_language = languages
        .iter()
        .min_by_key(|(lang, count)| (Reverse(**count), **lang))
        .map(|(lang, _)| lang.to_string());

    let followers: Vec<f64> = data
        .developers
        .iter()
        .filter_map(|d| d.followers)
        .map(|f| f as f64)
        .collect();
    let public_repos: Vec<f64> = data
        .developers
        .iter()
        .filter_map(|d| d.public_repos)
        .map(|r| r as f64)
        .collect();

    ProfileMetrics {
        developer_count: data.developers.len(),
        repo_count: data.repos.len(),
        unique_languages: languages.len(),
        primary_language,
        total_stars: stars,
        total_forks: forks,
        mean_followers: if followers.is_empty() {
            None
        } else {
            Some(crate::stats::mean(&followers))
        },
        mean_public_repos: if public_repos.is_empty() {
            None
        } else {
            Some(crate::stats::mean(&public_repos))
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DeveloperProfile, RepositoryMetadata, ToolData};

    fn repo(name: &str, language: Option<&str>, stars: u64, forks: u64) -> RepositoryMetadata {
        serde_json::from_value(serde_json::json!({
            "name": name,
            "language": language,
            "stargazers_count": stars,
            "forks_count": forks,
        }))
        .unwrap()
    }

    #[test]
    fn test_primary_language_is_mode() {
        let mut data = ToolData::new("t");
        data.repos.push(repo("a", Some("Rust"), 10, 1));
        data.repos.push(repo("b", Some("Rust"), 5, 0));
        data.repos.push(repo("c", Some("Python"), 3, 2));
        data.repos.push(repo("d", None, 0, 0));

        let metrics = calculate(&data);
        assert_eq!(metrics.repo_count, 4);
        assert_eq!(metrics.unique_languages, 2);
        assert_eq!(metrics.primary_language.as_deref(), Some("Rust"));
        assert_eq!(metrics.total_stars, 18);
        assert_eq!(metrics.total_forks, 3);
    }

    #[test]
    fn test_language_tie_breaks_lexicographically() {
        let mut data = ToolData::new("t");
        data.repos.push(repo("a", Some("Rust"), 0, 0));
        data.repos.push(repo("b", Some("Go"), 0, 0));
        let metrics = calculate(&data);
        assert_eq!(metrics.primary_language.as_deref(), Some("Go"));

        // Still the smallest among a three-way tie, wherever it sorts.
        data.repos.push(repo("c", Some("Zig"), 0, 0));
        let metrics = calculate(&data);
        assert_eq!(metrics.primary_language.as_deref(), Some("Go"));

        // A higher count beats lexicographic order.
        data.repos.push(repo("d", Some("Rust"), 0, 0));
        let metrics = calculate(&data);
        assert_eq!(metrics.primary_language.as_deref(), Some("Rust"));
    }

    #[test]
    fn test_developer_means_skip_missing_fields() {
        let mut data = ToolData::new("t");
        data.developers.push(DeveloperProfile {
            login: "alice".into(),
            followers: Some(10),
            public_repos: Some(4),
            ..serde_json::from_value(serde_json::json!({"login": "alice"})).unwrap()
        });
        data.developers
            .push(serde_json::from_value(serde_json::json!({"login": "bob"})).unwrap());

        let metrics = calculate(&data);
        assert_eq!(metrics.developer_count, 2);
        assert_eq!(metrics.mean_followers, Some(10.0));
        assert_eq!(metrics.mean_public_repos, Some(4.0));
    }

    #[test]
    fn test_empty_profile() {
        let metrics = calculate(&ToolData::new("t"));
        assert_eq!(metrics.primary_language, None);
        assert_eq!(metrics.mean_followers, None);
        assert_eq!(metrics.total_stars, 0);
    }
}
