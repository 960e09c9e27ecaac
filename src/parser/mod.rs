pub mod extract;
pub mod markdown;
pub mod resolve;

use serde::Serialize;
use serde_json::Value;

use crate::record::CampaignRecord;
use extract::{CampaignInsights, VisualAssetScanner};

/// A resolved record together with what was mined from its text fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessedCampaign {
    pub record: CampaignRecord,
    pub insights: CampaignInsights,
}

impl ProcessedCampaign {
    pub fn from_record(record: CampaignRecord, scanner: &VisualAssetScanner) -> Self {
        let insights = CampaignInsights::derive(&record, scanner);
        ProcessedCampaign { record, insights }
    }
}

/// Two-pass pipeline: envelope → record → derived insights.
pub fn process_payload(payload: &Value, scanner: &VisualAssetScanner) -> Option<ProcessedCampaign> {
    resolve::resolve(payload).map(|record| ProcessedCampaign::from_record(record, scanner))
}
