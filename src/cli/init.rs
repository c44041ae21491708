//! Init command - write an example prlens.toml

use crate::config::{CONFIG_FILE_NAME, EXAMPLE_CONFIG};
use anyhow::{Context, Result};
use console::style;
use std::path::Path;

/// Run the init command
pub fn run(path: &Path) -> Result<()> {
    let root = path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", path.display()))?;
    if !root.is_dir() {
        anyhow::bail!("Path is not a directory: {}", root.display());
    }

    let config_path = root.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        println!(
            "{} {} already exists at {}",
            style("✓").green(),
            CONFIG_FILE_NAME,
            style(config_path.display()).cyan()
        );
        return Ok(());
    }

    std::fs::write(&config_path, EXAMPLE_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!(
        "{} Created {}",
        style("✓").green(),
        style(config_path.display()).cyan()
    );
    println!("\nNext steps:");
    println!(
        "  {} Point [tools] at your exported data directories",
        style("edit prlens.toml").cyan()
    );
    println!("  {} Run the analysis", style("prlens analyze .").cyan());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_parseable_config() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path()).unwrap();
        let config = crate::config::Config::load(dir.path()).unwrap();
        assert_eq!(config.tools.len(), 3);
    }

    #[test]
    fn test_init_does_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[tools]\nmine = \"mine\"\n").unwrap();
        run(dir.path()).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("mine"));
    }
}
