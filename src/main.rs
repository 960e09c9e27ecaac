mod activity;
mod agent;
mod brief;
mod db;
mod history;
mod parser;
mod record;
mod report;
mod sample;
mod settings;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};

use crate::activity::{LiveFeed, FALLBACK_STEPS};
use crate::agent::{agent_name, AgentClient, AGENTS};
use crate::brief::{CampaignBrief, CONTENT_TYPES, TONES};
use crate::history::CampaignHistoryEntry;
use crate::parser::extract::VisualAssetScanner;
use crate::parser::ProcessedCampaign;
use crate::settings::Settings;

const GENERATE_FAILED: &str = "Failed to generate campaign. Please check your connection and try again.";
const PARSE_FAILED: &str = "Could not parse the campaign results. Please try again.";

#[derive(Parser)]
#[command(name = "campaign_hub", about = "Marketing campaign generator backed by a multi-agent service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a campaign brief to the coordinator agent and show the result
    Generate {
        /// What the campaign is about
        topic: String,
        /// Content types to produce (blog, social, email); repeatable
        #[arg(short = 't', long = "type")]
        content_types: Vec<String>,
        /// Who the campaign targets
        #[arg(short, long, default_value = "")]
        audience: String,
        /// Brand tone (professional, casual, bold)
        #[arg(long, default_value = "professional")]
        tone: String,
        /// Print the parsed campaign as JSON
        #[arg(long)]
        json: bool,
    },
    /// Resolve saved agent responses (JSON envelopes) into campaigns
    Parse {
        files: Vec<PathBuf>,
        /// Print the parsed campaigns as JSON
        #[arg(long)]
        json: bool,
    },
    /// List saved campaigns, newest first
    History,
    /// Show a saved campaign
    Show { id: String },
    /// Print a saved campaign as plain text (all sections)
    Export {
        id: String,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Remove a saved campaign
    Delete { id: String },
    /// Remove all saved campaigns
    Clear,
    /// Show the built-in sample brief and campaign
    Sample {
        #[arg(long)]
        json: bool,
    },
    /// List the agents and the brief options they understand
    Agents,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?;
    let scanner = settings.visual_scanner();

    let result = match cli.command {
        Commands::Generate {
            topic,
            content_types,
            audience,
            tone,
            json,
        } => {
            let brief = CampaignBrief {
                topic,
                content_types,
                target_audience: audience,
                brand_tone: tone,
            };
            generate(&settings, &scanner, brief, json).await
        }
        Commands::Parse { files, json } => parse_files(&files, &scanner, json),
        Commands::History => {
            let conn = open_store(&settings)?;
            let entries = db::load_history(&conn)?;
            if entries.is_empty() {
                println!("No saved campaigns. Run 'generate' first.");
                return Ok(());
            }
            println!("{}", report::history_table(&entries));
            println!("\n{} campaigns | show with: campaign_hub show <id>", entries.len());
            Ok(())
        }
        Commands::Show { id } => {
            let conn = open_store(&settings)?;
            let entries = db::load_history(&conn)?;
            let entry = history::find_entry(&entries, &id)
                .with_context(|| format!("No saved campaign with id {}", id))?;
            println!("{} | {} | {}\n", entry.topic, entry.tone, entry.timestamp);
            let campaign = ProcessedCampaign::from_record(entry.result.clone(), &scanner);
            println!("{}", report::campaign_report(&campaign));
            Ok(())
        }
        Commands::Export { id, output } => {
            let conn = open_store(&settings)?;
            let entries = db::load_history(&conn)?;
            let entry = history::find_entry(&entries, &id)
                .with_context(|| format!("No saved campaign with id {}", id))?;
            let text = entry.result.to_plain_text();
            match output {
                Some(path) => {
                    std::fs::write(&path, text)
                        .with_context(|| format!("Failed to write {:?}", path))?;
                    println!("Exported {} to {}", id, path.display());
                }
                None => println!("{}", text),
            }
            Ok(())
        }
        Commands::Delete { id } => {
            let conn = open_store(&settings)?;
            let mut entries = db::load_history(&conn)?;
            if history::remove_entry(&mut entries, &id) {
                db::save_history(&conn, &entries)?;
                println!("Deleted {} ({} remaining)", id, entries.len());
            } else {
                println!("No saved campaign with id {}", id);
            }
            Ok(())
        }
        Commands::Clear => {
            let conn = open_store(&settings)?;
            db::clear_history(&conn)?;
            println!("History cleared.");
            Ok(())
        }
        Commands::Sample { json } => {
            let brief = sample::sample_brief();
            let campaign = ProcessedCampaign::from_record(sample::sample_result(), &scanner);
            if json {
                println!("{}", serde_json::to_string_pretty(&campaign)?);
            } else {
                println!("{}\n", brief.to_prompt());
                println!("{}", report::campaign_report(&campaign));
            }
            Ok(())
        }
        Commands::Agents => {
            for agent in &AGENTS {
                println!("{:<22} {}  {}", agent.name, agent.id, agent.role);
            }
            let types: Vec<String> = CONTENT_TYPES
                .iter()
                .map(|(key, label)| format!("{} ({})", key, label))
                .collect();
            println!("\nContent types: {}", types.join(", "));
            println!("Tones:         {}", TONES.join(", "));
            println!("\nVisual asset lists end at: {}", scanner.closing_prefixes().join(" | "));
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn open_store(settings: &Settings) -> anyhow::Result<rusqlite::Connection> {
    let conn = db::connect(&settings.db_path)?;
    db::init_schema(&conn)?;
    Ok(conn)
}

async fn generate(
    settings: &Settings,
    scanner: &VisualAssetScanner,
    brief: CampaignBrief,
    json: bool,
) -> anyhow::Result<()> {
    brief.validate()?;

    let client = AgentClient::new(settings)?;
    let session_id = agent::new_session_id(&settings.agent_id);
    let prompt = brief.to_prompt();
    info!(
        session = %session_id,
        agent = agent_name(&settings.agent_id).unwrap_or("custom agent"),
        "Submitting campaign brief"
    );

    let live = match settings.api_key.as_deref() {
        Some(key) => Some(LiveFeed::connect(activity::metrics_url(
            &settings.metrics_url,
            &session_id,
            key,
        ))),
        None => {
            debug!("No API key; progress is simulated");
            None
        }
    };

    let (outcome, log) = activity::track(
        client.invoke(&prompt, &settings.agent_id, &session_id),
        live,
        FALLBACK_STEPS.to_vec(),
        activity::spinner(),
    )
    .await;
    info!("{} agent steps observed", log.events().len());

    let payload = match outcome {
        Ok(payload) => payload,
        Err(e) => {
            warn!("Agent call failed: {}", e);
            bail!(GENERATE_FAILED);
        }
    };

    let Some(campaign) = parser::process_payload(&payload, scanner) else {
        bail!(PARSE_FAILED);
    };

    let conn = open_store(settings)?;
    let mut entries = db::load_history(&conn)?;
    let entry = CampaignHistoryEntry::new(&brief, campaign.record.clone());
    let id = entry.id.clone();
    history::push_entry(&mut entries, entry, settings.history_limit);
    db::save_history(&conn, &entries)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&campaign)?);
    } else {
        println!("{}", report::campaign_report(&campaign));
        println!("\nSaved as {}", id);
    }
    Ok(())
}

/// Resolve each envelope file in parallel, then print in input order.
fn parse_files(files: &[PathBuf], scanner: &VisualAssetScanner, json: bool) -> anyhow::Result<()> {
    use rayon::prelude::*;

    if files.is_empty() {
        println!("No files given.");
        return Ok(());
    }

    let results: Vec<_> = files
        .par_iter()
        .map(|path| (path, parse_file(path, scanner)))
        .collect();

    let mut resolved = 0usize;
    let mut campaigns = Vec::new();
    for (path, outcome) in results {
        match outcome {
            Ok(Some(campaign)) => {
                resolved += 1;
                if json {
                    campaigns.push(serde_json::json!({
                        "file": path.display().to_string(),
                        "campaign": campaign,
                    }));
                } else {
                    println!("==> {} <==\n{}\n", path.display(), report::campaign_report(&campaign));
                }
            }
            Ok(None) => {
                warn!("No campaign found in {}", path.display());
                if !json {
                    println!("==> {} <==\n{}\n", path.display(), PARSE_FAILED);
                }
            }
            Err(e) => warn!("Skipping {}: {:#}", path.display(), e),
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&campaigns)?);
    } else {
        println!("Resolved {} of {} files.", resolved, files.len());
    }
    Ok(())
}

fn parse_file(path: &Path, scanner: &VisualAssetScanner) -> anyhow::Result<Option<ProcessedCampaign>> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    let record = parser::resolve::resolve_str(&raw)?;
    Ok(record.map(|r| ProcessedCampaign::from_record(r, scanner)))
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_fixture_files() {
        let scanner = VisualAssetScanner::default();
        let found = parse_file(Path::new("tests/fixtures/nested_envelope.json"), &scanner).unwrap();
        assert!(found.is_some());
        let missing = parse_file(Path::new("tests/fixtures/error_envelope.json"), &scanner).unwrap();
        assert!(missing.is_none());
        assert!(parse_file(Path::new("tests/fixtures/does_not_exist.json"), &scanner).is_err());
    }

    #[test]
    fn durations() {
        use std::time::Duration;
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.5s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
        assert_eq!(format_duration(Duration::from_secs(3725)), "1h 2m 5s");
    }
}
