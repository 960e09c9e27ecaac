use std::sync::LazyLock;

use serde::Deserialize;

use crate::brief::CampaignBrief;
use crate::record::CampaignRecord;

const SAMPLE_JSON: &str = include_str!("../assets/sample_campaign.json");

#[derive(Deserialize)]
struct Sample {
    brief: CampaignBrief,
    result: CampaignRecord,
}

static SAMPLE: LazyLock<Sample> =
    LazyLock::new(|| serde_json::from_str(SAMPLE_JSON).expect("bundled sample is valid JSON"));

/// The FlowState launch brief shown by the `sample` command.
pub fn sample_brief() -> CampaignBrief {
    SAMPLE.brief.clone()
}

/// A complete agent result for [`sample_brief`].
pub fn sample_result() -> CampaignRecord {
    SAMPLE.result.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_is_complete() {
        let brief = sample_brief();
        assert!(brief.validate().is_ok());
        assert_eq!(brief.brand_tone, "bold");
        assert_eq!(brief.content_types, vec!["blog", "social"]);

        let result = sample_result();
        assert!(result.summary.contains("FlowState"));
        assert!(!result.campaign_overview.is_empty());
        assert!(result.written_content.starts_with("# FlowState"));
        assert!(!result.revision_flags.is_empty());
    }
}
