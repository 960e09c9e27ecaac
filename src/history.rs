use chrono::{Datelike, Local, NaiveDate};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::brief::CampaignBrief;
use crate::record::CampaignRecord;

/// Store slot holding the serialized history list.
pub const HISTORY_SLOT: &str = "marketing_hub_history";
pub const HISTORY_LIMIT: usize = 20;

const ID_LEN: usize = 12;
const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignHistoryEntry {
    pub id: String,
    pub topic: String,
    #[serde(default)]
    pub tone: String,
    #[serde(default)]
    pub audience: String,
    pub timestamp: String,
    pub result: CampaignRecord,
}

impl CampaignHistoryEntry {
    /// Entry for a freshly generated campaign, stamped with today's local date.
    pub fn new(brief: &CampaignBrief, result: CampaignRecord) -> Self {
        CampaignHistoryEntry {
            id: generate_id(),
            topic: brief.topic.clone(),
            tone: brief.brand_tone.clone(),
            audience: brief.target_audience.clone(),
            timestamp: format_date(Local::now().date_naive()),
            result,
        }
    }
}

/// 12 random base-36 characters.
pub fn generate_id() -> String {
    let mut rng = rand::thread_rng();
    (0..ID_LEN)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

/// `M/D/YYYY`, no zero padding.
pub fn format_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.month(), date.day(), date.year())
}

/// Prepend `entry` and keep the newest `limit` entries.
pub fn push_entry(list: &mut Vec<CampaignHistoryEntry>, entry: CampaignHistoryEntry, limit: usize) {
    list.insert(0, entry);
    list.truncate(limit);
}

/// Drop the entry with `id`. Returns whether anything was removed.
pub fn remove_entry(list: &mut Vec<CampaignHistoryEntry>, id: &str) -> bool {
    let before = list.len();
    list.retain(|e| e.id != id);
    list.len() != before
}

pub fn find_entry<'a>(list: &'a [CampaignHistoryEntry], id: &str) -> Option<&'a CampaignHistoryEntry> {
    list.iter().find(|e| e.id == id)
}

// ── Tests ──
