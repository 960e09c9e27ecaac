use serde::{Deserialize, Serialize};

/// Normalized campaign output recovered from an upstream agent response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignRecord {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub campaign_overview: String,
    #[serde(default)]
    pub written_content: String,
    #[serde(default)]
    pub seo_recommendations: String,
    #[serde(default)]
    pub visual_assets: String,
    #[serde(default)]
    pub consistency_notes: String,
    #[serde(default)]
    pub revision_flags: String,
}

impl CampaignRecord {
    /// Use `ancestor` as the summary when this record has none.
    pub fn with_summary_fallback(self, ancestor: Option<&str>) -> Self {
        match ancestor {
            Some(summary) if self.summary.is_empty() => CampaignRecord {
                summary: summary.to_string(),
                ..self
            },
            _ => self,
        }
    }

    /// "Copy all" export: every content field under a banner, blank line between sections.
    pub fn to_plain_text(&self) -> String {
        [
            "=== CAMPAIGN OVERVIEW ===",
            &self.campaign_overview,
            "",
            "=== WRITTEN CONTENT ===",
            &self.written_content,
            "",
            "=== SEO RECOMMENDATIONS ===",
            &self.seo_recommendations,
            "",
            "=== VISUAL ASSETS ===",
            &self.visual_assets,
            "",
            "=== CONSISTENCY NOTES ===",
            &self.consistency_notes,
        ]
        .join("\n")
    }
}
