//! JSON reporter
//!
//! Outputs the full batch of tool reports as pretty-printed JSON, one
//! element per tool. Useful for piping to jq or further processing.

use crate::calculators::ToolReport;
use anyhow::Result;

/// Render the batch as JSON
pub fn render(reports: &[ToolReport]) -> Result<String> {
    Ok(serde_json::to_string_pretty(reports)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_reports;

    #[test]
    fn test_json_render_valid() {
        let reports = test_reports();
        let json_str = render(&reports).expect("render JSON");
        let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("parse JSON");
        let batch = parsed.as_array().expect("report array");
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0]["tool"], "demo_tool");
        assert_eq!(batch[0]["flow"]["total_prs"], 1);
    }

    #[test]
    fn test_undefined_metrics_serialize_as_null() {
        let reports = test_reports();
        let parsed: serde_json::Value =
            serde_json::from_str(&render(&reports).unwrap()).unwrap();
        // No reviews in the fixture, so the review summary is null, not 0.
        assert!(parsed[0]["feedback_loop"]["reviews_per_pr"].is_null());
    }
}
