use std::time::Duration;

use reqwest::StatusCode;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::history::generate_id;
use crate::settings::Settings;

pub const MANAGER_AGENT_ID: &str = "698b3c45f5a3c496d902339d";
pub const CONTENT_WRITER_ID: &str = "698b3bc4530a77dfe1db90d6";
pub const SEO_ANALYST_ID: &str = "698b3bf79b3205af189627aa";
pub const GRAPHICS_GENERATOR_ID: &str = "698b3c0ef5a3c496d902339c";

pub const BASE_BACKOFF_MS: u64 = 2000;
const MAX_BACKOFF: Duration = Duration::from_secs(60);

pub struct Agent {
    pub id: &'static str,
    pub name: &'static str,
    pub role: &'static str,
}

pub static AGENTS: [Agent; 4] = [
    Agent {
        id: MANAGER_AGENT_ID,
        name: "Marketing Coordinator",
        role: "Manager - Orchestrates all sub-agents",
    },
    Agent {
        id: CONTENT_WRITER_ID,
        name: "Content Writer",
        role: "Drafts marketing copy and blog posts",
    },
    Agent {
        id: SEO_ANALYST_ID,
        name: "SEO Analyst",
        role: "Keyword research and optimization guidance",
    },
    Agent {
        id: GRAPHICS_GENERATOR_ID,
        name: "Graphics Generator",
        role: "Creates visual asset descriptions",
    },
];

pub fn find_agent(id: &str) -> Option<&'static Agent> {
    AGENTS.iter().find(|a| a.id == id)
}

pub fn agent_name(id: &str) -> Option<&'static str> {
    find_agent(id).map(|a| a.name)
}

/// Correlation id shared by one generation request: `<agent_id>-<12 base-36 chars>`.
pub fn new_session_id(agent_id: &str) -> String {
    format!("{}-{}", agent_id, generate_id())
}

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("agent request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("agent service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

/// HTTP client for the upstream agent inference endpoint.
pub struct AgentClient {
    http: reqwest::Client,
    url: String,
    api_key: Option<String>,
    max_retries: u32,
    backoff: Duration,
}

impl AgentClient {
    pub fn new(settings: &Settings) -> Result<Self, AgentError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(AgentClient {
            http,
            url: settings.api_url.clone(),
            api_key: settings.api_key.clone(),
            max_retries: settings.max_retries,
            backoff: Duration::from_millis(settings.retry_backoff_ms),
        })
    }

    /// Send `message` to `agent_id` and return the response envelope.
    ///
    /// Rate limits and server errors are retried with exponential backoff.
    /// Bodies that are not a success envelope are wrapped in one, keeping the
    /// raw text under `raw_response`.
    pub async fn invoke(&self, message: &str, agent_id: &str, session_id: &str) -> Result<Value, AgentError> {
        let body = json!({
            "message": message,
            "agent_id": agent_id,
            "session_id": session_id,
            "user_id": session_id,
        });

        let mut attempt = 0u32;
        loop {
            let outcome = self.send_once(&body).await;

            let retryable = match &outcome {
                Err(AgentError::Status { status, .. }) => is_retryable(*status),
                Err(AgentError::Transport(e)) => e.is_timeout() || e.is_connect(),
                Ok(_) => false,
            };
            if !retryable || attempt >= self.max_retries {
                return outcome;
            }

            let backoff = backoff_for(self.backoff, attempt);
            attempt += 1;
            warn!(
                "Agent call failed (attempt {}/{}), backing off {:.1}s",
                attempt,
                self.max_retries,
                backoff.as_secs_f64()
            );
            tokio::time::sleep(backoff).await;
        }
    }

    async fn send_once(&self, body: &Value) -> Result<Value, AgentError> {
        let mut request = self.http.post(&self.url).json(body);
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        debug!(status = status.as_u16(), bytes = text.len(), "agent response");

        if !status.is_success() {
            return Err(AgentError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        info!("Agent responded with {} bytes", text.len());
        Ok(envelope(&text))
    }
}

/// `base * 2^attempt`, capped at one minute.
fn backoff_for(base: Duration, attempt: u32) -> Duration {
    let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
    base.saturating_mul(factor).min(MAX_BACKOFF)
}

fn is_retryable(status: u16) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS.as_u16() || (500..600).contains(&status)
}

/// Wrap a successful response body in the `{ success, response, raw_response }` shape.
pub fn envelope(body: &str) -> Value {
    match serde_json::from_str::<Value>(body) {
        Ok(parsed) if parsed.get("success").is_some() => parsed,
        Ok(parsed) => json!({ "success": true, "response": parsed, "raw_response": body }),
        Err(_) => json!({ "success": true, "raw_response": body }),
    }
}

// ── Tests ──
