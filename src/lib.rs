//! prlens - pull request analytics for AI coding tools
//!
//! Loads per-tool GitHub exports, classifies AI vs human activity with a
//! versioned rule set, computes comparable metric families per tool, and
//! writes the cross-tool CSV tables.

pub mod calculators;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod loader;
pub mod models;
pub mod reporters;
pub mod stats;
