//! carevoice binary: session setup and offline tooling for the voice assistant.
//!
//! Issues LiveKit tokens, provisions rooms, queries the asset index, and
//! rehearses the pre-inference hook from stdin.

use anyhow::{Context, Result};
use carevoice_agent::{
    load_config, AssistantHooks, Config, LoggingConfig, RehearsalDriver, VoiceSessionDriver,
};
use carevoice_search::VespaClient;
use carevoice_voice::{SessionDescriptor, TokenIssuer};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "carevoice")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Healthcare voice assistant session tooling", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, env = "CAREVOICE_CONFIG_PATH", default_value = "carevoice.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Issue join tokens for an end user and the agent
    Tokens {
        /// Room both participants join
        #[arg(long, default_value = "carevoice-room")]
        room: String,
    },

    /// Create a room on the LiveKit server
    Provision {
        #[arg(long)]
        name: String,

        #[arg(long, default_value_t = 20)]
        max_participants: u32,

        /// Seconds an empty room is kept before it is reclaimed
        #[arg(long, default_value_t = 600)]
        empty_timeout_secs: u32,
    },

    /// Look up asset text by document id or free-text query
    Search {
        #[arg(long, conflicts_with = "query", required_unless_present = "query")]
        id: Option<String>,

        #[arg(long)]
        query: Option<String>,
    },

    /// Run the pre-inference hook over user turns read from stdin
    Rehearse,
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    if logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Local overrides first; neither file is required.
    dotenvy::from_filename(".env.local").ok();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = load_config(Some(&cli.config)).with_context(|| {
        format!("failed to load configuration from {}", cli.config.display())
    })?;

    init_tracing(&config.logging);
    tracing::info!(path = %cli.config.display(), "resolved configuration");

    match cli.command {
        Commands::Tokens { room } => tokens(&config, &room).await,
        Commands::Provision {
            name,
            max_participants,
            empty_timeout_secs,
        } => {
            let descriptor = SessionDescriptor::new(name)
                .with_max_participants(max_participants)
                .with_empty_timeout_secs(empty_timeout_secs);
            provision(&config, &descriptor).await
        }
        Commands::Search { id, query } => search(&config, id.as_deref(), query.as_deref()).await,
        Commands::Rehearse => rehearse(&config).await,
    }
}

async fn tokens(config: &Config, room: &str) -> Result<()> {
    let issuer = TokenIssuer::new(config.livekit.clone());
    let pair = issuer
        .issue_pair(room)
        .await
        .context("failed to issue LiveKit tokens")?;
    println!("{}", serde_json::to_string_pretty(&pair)?);
    Ok(())
}

async fn provision(config: &Config, descriptor: &SessionDescriptor) -> Result<()> {
    let issuer = TokenIssuer::new(config.livekit.clone());
    let handle = issuer
        .provision_session(descriptor)
        .await
        .with_context(|| format!("failed to create room {}", descriptor.name))?;
    println!("{}", serde_json::to_string_pretty(&handle)?);
    Ok(())
}

async fn search(config: &Config, id: Option<&str>, query: Option<&str>) -> Result<()> {
    let client = VespaClient::new(config.search.clone())?;
    let snippets = client
        .lookup(id, query)
        .await
        .context("asset search failed")?;

    if snippets.is_empty() {
        tracing::info!("no matching assets");
    }
    for snippet in snippets {
        println!("{snippet}");
    }
    Ok(())
}

async fn rehearse(config: &Config) -> Result<()> {
    let client = Arc::new(VespaClient::new(config.search.clone())?);
    let hooks = Arc::new(AssistantHooks::from_settings(client, &config.agent)?);

    let mut driver = RehearsalDriver::new(config.agent.initial_context());
    driver.register_hooks(hooks);

    tracing::info!(
        llm_model = %config.agent.llm_model,
        stt_provider = %config.agent.stt_provider,
        tts_provider = %config.agent.tts_provider,
        allow_interruptions = config.agent.allow_interruptions,
        max_history = config.agent.max_history,
        "rehearsing voice pipeline"
    );
    println!("pipeline: {}", config.agent.pipeline_summary());

    println!("assistant: {}", driver.greet(&config.agent.greeting)?);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let utterance = line.trim();
        if utterance.is_empty() {
            continue;
        }

        let report = driver.user_turn(utterance).await?;
        match report.retrieved {
            Some(context) if !context.is_empty() => println!("context: {context}"),
            _ => println!("context: <none>"),
        }
        tracing::debug!(history_len = report.history_len, "turn rehearsed");
    }

    Ok(())
}
