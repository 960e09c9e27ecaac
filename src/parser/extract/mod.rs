pub mod checklist;
pub mod keywords;
pub mod visuals;

use serde::Serialize;

pub use checklist::{extract_checklist, extract_meta_descriptions};
pub use keywords::{extract_keyword_tiers, KeywordSet};
pub use visuals::{VisualAssetEntry, VisualAssetScanner};

use crate::record::CampaignRecord;

/// Structured facts mined from the SEO recommendations field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeoInsights {
    pub keywords: KeywordSet,
    pub meta_descriptions: Vec<String>,
    pub checklist: Vec<String>,
}

impl SeoInsights {
    pub fn from_text(text: &str) -> Self {
        SeoInsights {
            keywords: extract_keyword_tiers(text),
            meta_descriptions: extract_meta_descriptions(text),
            checklist: extract_checklist(text),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty() && self.meta_descriptions.is_empty() && self.checklist.is_empty()
    }
}

/// Everything derived from a record's free-text fields for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CampaignInsights {
    pub seo: SeoInsights,
    pub visual_assets: Vec<VisualAssetEntry>,
}

impl CampaignInsights {
    pub fn derive(record: &CampaignRecord, scanner: &VisualAssetScanner) -> Self {
        CampaignInsights {
            seo: SeoInsights::from_text(&record.seo_recommendations),
            visual_assets: scanner.scan(&record.visual_assets),
        }
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample;

    #[test]
    fn sample_insights() {
        let record = sample::sample_result();
        let insights = CampaignInsights::derive(&record, &VisualAssetScanner::default());

        assert_eq!(insights.seo.keywords.primary.len(), 5);
        assert_eq!(insights.seo.keywords.primary[2], "FlowState");
        assert_eq!(insights.seo.keywords.secondary.len(), 5);
        assert_eq!(insights.seo.keywords.long_tail.len(), 3);
        assert_eq!(insights.seo.meta_descriptions.len(), 2);
        assert_eq!(insights.seo.checklist.len(), 8);
        assert_eq!(insights.visual_assets.len(), 4);
        assert!(insights
            .visual_assets
            .iter()
            .all(|a| !a.specifications.starts_with("All assets")));
    }

    #[test]
    fn empty_record_has_no_insights() {
        let insights =
            CampaignInsights::derive(&CampaignRecord::default(), &VisualAssetScanner::default());
        assert!(insights.seo.is_empty());
        assert!(insights.visual_assets.is_empty());
    }

    #[test]
    fn insights_are_rederived_identically() {
        let record = sample::sample_result();
        let scanner = VisualAssetScanner::default();
        assert_eq!(
            CampaignInsights::derive(&record, &scanner),
            CampaignInsights::derive(&record, &scanner)
        );
    }
}
