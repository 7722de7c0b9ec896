use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use rand::Rng;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use clients::{HttpLookupClient, RedisEventSource, RedisSink};
use events::{normalize, CandidateRestaurant, RawEvent, ScoredCandidate};
use pipeline::{PipelineConfig, PipelineDriver};
use scoring::rank;
use windowing::{aggregate, WindowSet};

/// GrubRecs - Group Dining Recommendation Pipeline
#[derive(Parser)]
#[command(name = "grub-recs")]
#[command(about = "Group dining recommendation pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline against Redis and the candidate lookup service
    ///
    /// Configuration comes from the environment: WINDOW_SECS, TOP_K,
    /// REDIS_URL, LOOKUP_URL, EVENT_STREAM, RECS_KEY.
    Run,

    /// Drive synthetic preference events through the pipeline offline
    Simulate {
        /// Number of dining groups to simulate
        #[arg(long, default_value = "3")]
        groups: usize,

        /// Number of preference events to generate
        #[arg(long, default_value = "40")]
        events: usize,

        /// Number of ranked candidates to keep per group
        #[arg(long, default_value = "10")]
        top_k: usize,
    },

    /// Aggregate and rank a single window from JSON files
    Score {
        /// Path to a JSON array of raw preference events
        #[arg(long)]
        events: PathBuf,

        /// Path to a JSON array of candidate restaurants
        #[arg(long)]
        candidates: PathBuf,

        /// Number of ranked candidates to keep
        #[arg(long, default_value = "10")]
        top_k: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => handle_run().await?,
        Commands::Simulate {
            groups,
            events,
            top_k,
        } => handle_simulate(groups, events, top_k)?,
        Commands::Score {
            events,
            candidates,
            top_k,
        } => handle_score(events, candidates, top_k)?,
    }

    Ok(())
}

/// Handle the 'run' command: wire real clients and run until ctrl-c.
async fn handle_run() -> Result<()> {
    let config = PipelineConfig::from_env().context("Failed to read pipeline configuration")?;
    println!(
        "{} Starting pipeline ({}s windows, top-{})",
        "✓".green(),
        config.window.as_secs(),
        config.top_k
    );

    let lookup = Arc::new(HttpLookupClient::new(config.lookup_url.clone()));
    let sink = Arc::new(
        RedisSink::connect(&config.redis_url, config.recs_key.clone())
            .await
            .context("Failed to connect recommendation sink")?,
    );
    let source = RedisEventSource::connect(&config.redis_url, config.event_stream.clone())
        .await
        .context("Failed to connect event source")?;

    let (event_tx, event_rx) = tokio::sync::mpsc::channel(1024);
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

    tokio::spawn(async move {
        if let Err(e) = source.run(event_tx).await {
            eprintln!("Event source stopped: {}", e);
        }
    });
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(true);
        }
    });

    let driver = PipelineDriver::new(config.window, config.top_k, lookup, sink);
    driver.run(event_rx, shutdown_rx).await
}

/// Handle the 'simulate' command: random events through one window.
fn handle_simulate(groups: usize, events: usize, top_k: usize) -> Result<()> {
    anyhow::ensure!(groups > 0, "need at least one group");

    const CUISINES: &[&str] = &[
        "mexican", "thai", "korean", "italian", "indian", "american", "japanese",
    ];
    const DIETARY: &[&str] = &["vegan", "vegetarian", "gluten-free", "halal"];
    const LOCATIONS: &[&str] = &["Oakland", "Shadyside", "Downtown", "Squirrel Hill"];
    const BUDGETS: &[&str] = &["$", "$$", "$$$"];

    let window_ms: u64 = 5_000;
    let mut rng = rand::rng();
    let mut windows = WindowSet::new(window_ms);
    let mut locations: HashMap<String, String> = HashMap::new();

    for i in 0..events {
        let group = format!("group-{}", rng.random_range(0..groups));

        let mut picked: Vec<&str> = Vec::new();
        for cuisine in CUISINES {
            if rng.random_bool(0.3) {
                picked.push(cuisine);
            }
        }
        let mut restrictions: Vec<&str> = Vec::new();
        for diet in DIETARY {
            if rng.random_bool(0.15) {
                restrictions.push(diet);
            }
        }

        let mut raw = RawEvent::new();
        raw.insert("userId".to_string(), format!("user-{}", i));
        raw.insert("groupId".to_string(), group.clone());
        raw.insert(
            "location".to_string(),
            LOCATIONS[rng.random_range(0..LOCATIONS.len())].to_string(),
        );
        raw.insert("cuisines".to_string(), serde_json::to_string(&picked)?);
        raw.insert("dietary".to_string(), serde_json::to_string(&restrictions)?);
        raw.insert(
            "budget".to_string(),
            BUDGETS[rng.random_range(0..BUDGETS.len())].to_string(),
        );

        match normalize(&raw) {
            Ok(record) => {
                locations.insert(record.group_id.clone(), record.location.clone());
                // all simulated events land in the first window slice
                windows.observe(record, 1_000);
            }
            Err(e) => eprintln!("Dropping malformed event: {}", e),
        }
    }

    let candidates = sample_candidates();
    println!(
        "{}",
        format!(
            "Simulated {} events across {} groups ({} candidates on file)",
            events,
            groups,
            candidates.len()
        )
        .bold()
        .blue()
    );

    for (key, agg) in windows.close_due(window_ms) {
        let location = locations
            .get(&key.group_id)
            .cloned()
            .unwrap_or_else(|| "unknown".to_string());
        println!();
        println!(
            "{} (near {})",
            key.group_id.bold().green(),
            location
        );
        println!(
            "  wants: {} | dietary: {} | budget level {}",
            agg.top_cuisines.join(", "),
            if agg.dietary_restrictions.is_empty() {
                "none".to_string()
            } else {
                agg.dietary_restrictions
                    .iter()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ")
            },
            agg.budget_level
        );

        let ranked = rank(&agg, candidates.clone(), top_k);
        print_ranked(&ranked);
    }

    Ok(())
}

/// Handle the 'score' command: one window from files, printed.
fn handle_score(events_path: PathBuf, candidates_path: PathBuf, top_k: usize) -> Result<()> {
    let raw_events: Vec<RawEvent> = read_json(&events_path)?;
    let candidates: Vec<CandidateRestaurant> = read_json(&candidates_path)?;

    let mut records = Vec::new();
    for raw in &raw_events {
        match normalize(raw) {
            Ok(record) => records.push(record),
            Err(e) => eprintln!("Dropping malformed event: {}", e),
        }
    }

    let Some(agg) = aggregate(&records) else {
        println!("No valid preference records; nothing to rank.");
        return Ok(());
    };

    println!(
        "{}",
        format!(
            "Aggregate over {} records: cuisines [{}], budget level {}",
            records.len(),
            agg.top_cuisines.join(", "),
            agg.budget_level
        )
        .bold()
        .blue()
    );

    let ranked = rank(&agg, candidates, top_k);
    print_ranked(&ranked);
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &PathBuf) -> Result<T> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Helper to format and print a ranked candidate list.
fn print_ranked(ranked: &[ScoredCandidate]) {
    if ranked.is_empty() {
        println!("  (no candidates)");
        return;
    }
    for (i, rec) in ranked.iter().enumerate() {
        let name = rec
            .candidate
            .name
            .clone()
            .unwrap_or_else(|| rec.candidate.id.clone());
        println!(
            "  {}. {} [{}] - score {}",
            (i + 1).to_string().green(),
            name,
            rec.candidate.categories.join(", "),
            rec.score
        );
    }
}

/// Canned candidate list for offline simulation.
fn sample_candidates() -> Vec<CandidateRestaurant> {
    let build = |id: &str, name: &str, categories: &[&str], price: u8, flags: &[&str]| {
        CandidateRestaurant {
            id: id.to_string(),
            name: Some(name.to_string()),
            categories: categories.iter().map(|c| c.to_string()).collect(),
            price_level: Some(price),
            dietary_flags: flags.iter().map(|f| f.to_string()).collect(),
            rating: None,
            address: None,
        }
    };

    vec![
        build("c1", "La Palapa", &["mexican", "tacos"], 2, &["vegetarian"]),
        build("c2", "Pad Thai Noodle", &["thai"], 1, &["vegan", "gluten-free"]),
        build("c3", "Seoul BBQ", &["korean", "kbbq"], 3, &[]),
        build("c4", "Trattoria Nonna", &["italian"], 3, &["vegetarian"]),
        build("c5", "Curry Corner", &["indian"], 1, &["vegan", "halal"]),
        build("c6", "Union Grill", &["american", "burgers"], 2, &[]),
        build("c7", "Sakura Sushi", &["japanese", "sushi"], 2, &["gluten-free"]),
        build("c8", "Green Bowl", &["vegetarian"], 1, &["vegan", "vegetarian"]),
    ]
}
