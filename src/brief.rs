use serde::{Deserialize, Serialize};

/// Content types offered by the brief form, as (key, label).
pub const CONTENT_TYPES: &[(&str, &str)] = &[
    ("blog", "Blog Post"),
    ("social", "Social Media"),
    ("email", "Email Campaign"),
];

/// Brand tones offered by the brief form.
pub const TONES: &[&str] = &["professional", "casual", "bold"];

const DEFAULT_CONTENT_TYPES: &str = "blog post, social media";
const DEFAULT_AUDIENCE: &str = "General audience";
const DEFAULT_TONE: &str = "professional";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BriefError {
    #[error("Please enter a campaign topic")]
    EmptyTopic,
}

/// What the user asks the coordinator agent to produce.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignBrief {
    pub topic: String,
    #[serde(default)]
    pub content_types: Vec<String>,
    #[serde(default)]
    pub target_audience: String,
    #[serde(default)]
    pub brand_tone: String,
}

impl CampaignBrief {
    pub fn validate(&self) -> Result<(), BriefError> {
        if self.topic.trim().is_empty() {
            return Err(BriefError::EmptyTopic);
        }
        Ok(())
    }

    /// Brief as the four-line prompt the coordinator agent expects.
    pub fn to_prompt(&self) -> String {
        let content_types = if self.content_types.is_empty() {
            DEFAULT_CONTENT_TYPES.to_string()
        } else {
            self.content_types.join(", ")
        };
        format!(
            "Campaign Topic: {}\nContent Types: {}\nTarget Audience: {}\nBrand Tone: {}",
            self.topic,
            content_types,
            or_default(&self.target_audience, DEFAULT_AUDIENCE),
            or_default(&self.brand_tone, DEFAULT_TONE),
        )
    }
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.is_empty() {
        default
    } else {
        value
    }
}
