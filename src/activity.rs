use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Local};
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_tungstenite::tungstenite::{self, Message};
use tracing::debug;

use crate::agent::{
    agent_name, find_agent, Agent, AGENTS, CONTENT_WRITER_ID, GRAPHICS_GENERATOR_ID,
    MANAGER_AGENT_ID, SEO_ANALYST_ID,
};
use crate::parser::resolve::{coerce_string, is_truthy};

/// How long a live feed may stay silent before simulated steps take over.
pub const FALLBACK_AFTER: Duration = Duration::from_secs(8);

const INIT_LABEL: &str = "Initializing campaign orchestration...";
const MAX_TEXT_LABEL: usize = 100;

// Checked in order; the first agent with a matching fragment wins.
const AGENT_KEYWORDS: [(&[&str], &str); 4] = [
    (&["seo", "keyword"], SEO_ANALYST_ID),
    (&["content", "copy", "writing", "blog"], CONTENT_WRITER_ID),
    (&["graphic", "visual", "image", "design"], GRAPHICS_GENERATOR_ID),
    (&["coordinat", "manag", "orchestrat", "campaign"], MANAGER_AGENT_ID),
];

#[derive(Debug, Clone, Copy)]
pub struct ActivityStep {
    pub label: &'static str,
    pub agent_id: &'static str,
    /// Offset from the start of the request.
    pub delay: Duration,
}

/// Simulated progress shown while the coordinator works.
pub const FALLBACK_STEPS: [ActivityStep; 5] = [
    ActivityStep {
        label: "Analyzing campaign brief...",
        agent_id: MANAGER_AGENT_ID,
        delay: Duration::from_secs(0),
    },
    ActivityStep {
        label: "Researching keywords and SEO strategy...",
        agent_id: SEO_ANALYST_ID,
        delay: Duration::from_secs(3),
    },
    ActivityStep {
        label: "Drafting marketing copy and content...",
        agent_id: CONTENT_WRITER_ID,
        delay: Duration::from_secs(7),
    },
    ActivityStep {
        label: "Generating visual asset concepts...",
        agent_id: GRAPHICS_GENERATOR_ID,
        delay: Duration::from_secs(12),
    },
    ActivityStep {
        label: "Compiling and reviewing campaign...",
        agent_id: MANAGER_AGENT_ID,
        delay: Duration::from_secs(16),
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventStatus {
    Active,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEvent {
    pub id: String,
    pub label: String,
    pub agent: String,
    pub agent_id: String,
    pub status: EventStatus,
    pub timestamp: DateTime<Local>,
}

impl ActivityEvent {
    pub fn new(id: impl Into<String>, label: &str, agent_id: &str, status: EventStatus) -> Self {
        ActivityEvent {
            id: id.into(),
            label: label.to_string(),
            agent: agent_name(agent_id).unwrap_or("Marketing Coordinator").to_string(),
            agent_id: agent_id.to_string(),
            status,
            timestamp: Local::now(),
        }
    }

    pub fn active(id: impl Into<String>, label: &str, agent_id: &str) -> Self {
        Self::new(id, label, agent_id, EventStatus::Active)
    }
}

/// Ordered activity events; at most one is active once a new agent starts.
#[derive(Debug, Default)]
pub struct ActivityLog {
    events: Vec<ActivityEvent>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace (by id) an event.
    ///
    /// Earlier active events of the same agent are completed. A new id also
    /// completes every other active event.
    pub fn add(&mut self, event: ActivityEvent) {
        for e in self.events.iter_mut() {
            if e.status == EventStatus::Active && e.agent_id == event.agent_id && e.id != event.id {
                e.status = EventStatus::Completed;
            }
        }

        if let Some(existing) = self.events.iter_mut().find(|e| e.id == event.id) {
            *existing = event;
            return;
        }

        for e in self.events.iter_mut() {
            if e.status == EventStatus::Active {
                e.status = EventStatus::Completed;
            }
        }
        self.events.push(event);
    }

    pub fn complete_all(&mut self) {
        for e in self.events.iter_mut() {
            e.status = EventStatus::Completed;
        }
    }

    pub fn events(&self) -> &[ActivityEvent] {
        &self.events
    }

    pub fn active(&self) -> Option<&ActivityEvent> {
        self.events.iter().rev().find(|e| e.status == EventStatus::Active)
    }
}

// ── Live metrics ──

#[derive(Debug)]
pub enum LiveUpdate {
    Event(ActivityEvent),
    /// The connection failed.
    Failed,
}

/// Progress reported by the metrics websocket for one session.
pub struct LiveFeed {
    rx: mpsc::Receiver<LiveUpdate>,
    task: Option<JoinHandle<()>>,
}

impl LiveFeed {
    /// Open the stream in the background. Failures arrive as [`LiveUpdate::Failed`].
    pub fn connect(url: String) -> Self {
        let (tx, rx) = mpsc::channel(32);
        let task = tokio::spawn(async move {
            match stream_metrics(&url, &tx).await {
                Ok(()) => debug!("Metrics stream closed"),
                Err(e) => {
                    debug!("Metrics stream failed: {}", e);
                    let _ = tx.send(LiveUpdate::Failed).await;
                }
            }
        });
        LiveFeed {
            rx,
            task: Some(task),
        }
    }

    #[cfg(test)]
    fn from_receiver(rx: mpsc::Receiver<LiveUpdate>) -> Self {
        LiveFeed { rx, task: None }
    }
}

pub fn metrics_url(base: &str, session_id: &str, api_key: &str) -> String {
    format!("{}/{}?x-api-key={}", base.trim_end_matches('/'), session_id, api_key)
}

async fn stream_metrics(url: &str, tx: &mpsc::Sender<LiveUpdate>) -> Result<(), tungstenite::Error> {
    let (mut ws, _) = tokio_tungstenite::connect_async(url).await?;
    debug!("Metrics stream connected");

    let mut seq = 0usize;
    while let Some(message) = ws.next().await {
        let text = match message? {
            Message::Text(text) => text,
            Message::Binary(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Message::Close(_) => break,
            _ => continue,
        };
        seq += 1;
        let Some(event) = live_event(&text, seq) else {
            continue;
        };
        if tx.send(LiveUpdate::Event(event)).await.is_err() {
            break;
        }
    }
    Ok(())
}

/// Turn one metrics message into an activity event.
///
/// JSON messages are attributed with [`resolve_agent`]; their label comes from
/// `message`, `text`, `content` or `status`, else from the `type`/`event` kind.
/// Other text becomes a coordinator event. Blank text yields nothing.
pub fn live_event(text: &str, seq: usize) -> Option<ActivityEvent> {
    let Ok(data) = serde_json::from_str::<Value>(text) else {
        if text.trim().is_empty() {
            return None;
        }
        let label = if text.chars().count() > MAX_TEXT_LABEL {
            format!("{}...", text.chars().take(MAX_TEXT_LABEL).collect::<String>())
        } else {
            text.to_string()
        };
        return Some(ActivityEvent::active(format!("live-text-{}", seq), &label, MANAGER_AGENT_ID));
    };

    let agent = resolve_agent(&data);
    let kind = |key: &str, want: &str| data.get(key).and_then(Value::as_str) == Some(want);
    let label = first_text(&data, &["message", "text", "content", "status"]).unwrap_or_else(|| {
        if kind("type", "start") || kind("event", "start") {
            format!("{} starting task...", agent.name)
        } else if kind("type", "complete") || kind("event", "complete") || kind("type", "done") {
            format!("{} completed task", agent.name)
        } else if kind("type", "thinking") || kind("event", "thinking") {
            format!("{} analyzing...", agent.name)
        } else {
            format!("{} processing...", agent.name)
        }
    });

    let done = kind("type", "complete")
        || kind("event", "complete")
        || kind("type", "done")
        || kind("status", "completed");
    let status = if done { EventStatus::Completed } else { EventStatus::Active };
    Some(ActivityEvent::new(format!("live-{}", seq), &label, agent.id, status))
}

/// Which agent a metrics message is about: an explicit known id, then an agent
/// name in the message text, then keyword heuristics, then the coordinator.
pub fn resolve_agent(data: &Value) -> &'static Agent {
    let id = first_text(data, &["agent_id", "agentId"]).unwrap_or_default();
    if let Some(agent) = find_agent(&id) {
        return agent;
    }

    let text = first_text(data, &["message", "text", "content", "agent_name", "agentName"])
        .unwrap_or_default()
        .to_lowercase();
    if let Some(agent) = AGENTS.iter().find(|a| text.contains(&a.name.to_lowercase())) {
        return agent;
    }

    AGENT_KEYWORDS
        .iter()
        .find(|(words, _)| words.iter().any(|w| text.contains(*w)))
        .and_then(|(_, id)| find_agent(id))
        .unwrap_or(&AGENTS[0])
}

/// First truthy value among `keys`, as text.
fn first_text(data: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| data.get(*key))
        .find(|value| is_truthy(value))
        .map(coerce_string)
        .filter(|text| !text.is_empty())
}

// ── Simulated progress ──

/// Emit each step at its offset until the steps run out or the receiver is dropped.
pub async fn simulate(steps: Vec<ActivityStep>, tx: mpsc::Sender<ActivityEvent>) {
    let start = Instant::now();
    for (idx, step) in steps.into_iter().enumerate() {
        tokio::time::sleep_until(start + step.delay).await;
        let event = ActivityEvent::active(format!("fallback-{}", idx), step.label, step.agent_id);
        if tx.send(event).await.is_err() {
            break;
        }
    }
}

pub fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

type PendingSteps = Option<(Vec<ActivityStep>, mpsc::Sender<ActivityEvent>)>;

/// Drive `work` to completion while streaming progress onto `pb`.
///
/// Events from `live` are shown as they arrive. The simulated `steps` start
/// right away without a feed, as soon as the feed fails, or when it has
/// reported nothing within [`FALLBACK_AFTER`].
pub async fn track<F, T>(
    work: F,
    live: Option<LiveFeed>,
    steps: Vec<ActivityStep>,
    pb: ProgressBar,
) -> (T, ActivityLog)
where
    F: Future<Output = T>,
{
    let (tx, mut fallback_rx) = mpsc::channel::<ActivityEvent>(steps.len().max(1));
    let mut pending: PendingSteps = Some((steps, tx));
    let mut fallback = None;
    let mut log = ActivityLog::new();

    let (mut live_rx, live_task) = match live {
        Some(feed) => {
            record(&mut log, &pb, ActivityEvent::active("live-init", INIT_LABEL, MANAGER_AGENT_ID));
            (Some(feed.rx), feed.task)
        }
        None => {
            fallback = start_fallback(&mut pending);
            (None, None)
        }
    };
    let mut live_seen = false;

    let timer = tokio::time::sleep(FALLBACK_AFTER);
    tokio::pin!(work, timer);
    let output = loop {
        tokio::select! {
            out = &mut work => break out,
            update = next_update(&mut live_rx), if live_rx.is_some() => match update {
                Some(LiveUpdate::Event(event)) => {
                    live_seen = true;
                    record(&mut log, &pb, event);
                }
                Some(LiveUpdate::Failed) => {
                    live_rx = None;
                    fallback = fallback.or_else(|| start_fallback(&mut pending));
                }
                None => live_rx = None,
            },
            _ = &mut timer, if !live_seen && pending.is_some() => {
                debug!("No live progress after {:?}, simulating", FALLBACK_AFTER);
                fallback = start_fallback(&mut pending);
            }
            Some(event) = fallback_rx.recv() => record(&mut log, &pb, event),
        }
    };

    for task in [live_task, fallback].into_iter().flatten() {
        task.abort();
    }
    log.complete_all();
    pb.finish_and_clear();
    (output, log)
}

fn start_fallback(pending: &mut PendingSteps) -> Option<JoinHandle<()>> {
    pending.take().map(|(steps, tx)| tokio::spawn(simulate(steps, tx)))
}

async fn next_update(rx: &mut Option<mpsc::Receiver<LiveUpdate>>) -> Option<LiveUpdate> {
    match rx {
        Some(rx) => rx.recv().await,
        None => None,
    }
}

fn record(log: &mut ActivityLog, pb: &ProgressBar, event: ActivityEvent) {
    debug!(agent = %event.agent, at = %event.timestamp.format("%H:%M:%S"), "{}", event.label);
    log.add(event);
    if let Some(current) = log.active() {
        pb.set_message(format!("{}: {}", current.agent, current.label));
    }
}

// ── Tests ──
