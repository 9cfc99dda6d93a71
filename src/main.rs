//! Delver replay: inspect and summarize recorded simulation episodes.
//!
//! Subcommands:
//!
//! - `stats`    -- Incrementally refresh and print an agent's victory stats
//! - `verify`   -- Compare incremental stats against a full rescan
//! - `inspect`  -- Summarize one saved episode
//! - `frame`    -- Print the interpolated world state at a point in time
//! - `demo`     -- Record synthetic episodes with mock entities

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use delver_replay::config::StoreConfig;
use delver_replay::entity::{LiveEntity, MockEntity, MockSkeletalEntity};
use delver_replay::store::StoreRegistry;
use delver_replay::trajectory::{DelverAction, EpisodeTrajectory, RunDirection, StateReplay};

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

/// Delver replay: inspect and summarize recorded simulation episodes
#[derive(Parser)]
#[command(name = "delver-replay", version, about)]
struct Cli {
    /// Path to a JSON store configuration (uses defaults if not provided).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the directory holding per-agent data.
    #[arg(long, global = true)]
    data_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Refresh and print victory statistics for an agent.
    Stats { agent: String },

    /// Check incremental statistics against a full rescan.
    Verify { agent: String },

    /// Summarize one saved episode.
    Inspect { agent: String, index: u64 },

    /// Print the interpolated frame `time` seconds into an episode.
    Frame {
        agent: String,
        index: u64,
        time: f64,
    },

    /// Record synthetic episodes using mock entities.
    Demo {
        agent: String,

        /// Number of episodes to record.
        #[arg(long, default_value_t = 4)]
        episodes: usize,

        /// Samples per second.
        #[arg(long, default_value_t = 20)]
        rate: u32,
    },
}

// ---------------------------------------------------------------------------
// Entrypoint
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing (reads RUST_LOG env var, defaults to info).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => StoreConfig::load_from_file(path)?,
        None => StoreConfig::default(),
    };
    if let Some(root) = cli.data_root {
        config.data_root = root;
    }

    let registry = StoreRegistry::new(config);

    match cli.command {
        Commands::Stats { agent } => cmd_stats(&registry, &agent).await,
        Commands::Verify { agent } => cmd_verify(&registry, &agent).await,
        Commands::Inspect { agent, index } => cmd_inspect(&registry, &agent, index).await,
        Commands::Frame { agent, index, time } => cmd_frame(&registry, &agent, index, time).await,
        Commands::Demo {
            agent,
            episodes,
            rate,
        } => cmd_demo(&registry, &agent, episodes, rate).await,
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_stats(registry: &StoreRegistry, agent: &str) -> Result<()> {
    let calculator = registry.stats_calculator(agent).await?;
    let refresh = calculator.refresh().await?;

    println!("Agent: {agent}");
    println!("  Trajectories: {}", refresh.stats.amount);
    println!("  Victories:    {}", refresh.stats.victories);
    if refresh.stats.amount > 0 {
        println!(
            "  Win rate:     {:.1}%",
            refresh.stats.victories as f64 / refresh.stats.amount as f64 * 100.0
        );
    }
    if refresh.skipped > 0 {
        println!("  Unreadable:   {}", refresh.skipped);
    }
    Ok(())
}

async fn cmd_verify(registry: &StoreRegistry, agent: &str) -> Result<()> {
    let calculator = registry.stats_calculator(agent).await?;
    let incremental = calculator.get_stats().await?;
    let legacy = calculator.get_stats_legacy().await?;

    if incremental != legacy {
        bail!("Stats mismatch for {agent}: incremental {incremental:?}, full rescan {legacy:?}");
    }
    tracing::info!(
        agent,
        amount = incremental.amount,
        victories = incremental.victories,
        "Incremental stats match full rescan"
    );
    Ok(())
}

async fn cmd_inspect(registry: &StoreRegistry, agent: &str, index: u64) -> Result<()> {
    let episode = load_episode(registry, agent, index).await?;

    let mut kinds: BTreeMap<&str, usize> = BTreeMap::new();
    for frame in &episode.frame_snapshots {
        for entity in &frame.entities {
            *kinds.entry(entity.entity_type()).or_default() += 1;
        }
    }

    println!("Trajectory {index} of {agent}");
    println!("  Rate:       {} samples/s", episode.actions_per_second);
    println!("  Duration:   {:.2}s", episode.duration_secs());
    println!("  Victorious: {}", episode.victorious);
    if !episode.level_hash.is_empty() {
        println!("  Level:      {}", episode.level_hash);
    }
    println!("  Actions:    {}", episode.delver_actions.len());
    println!("  Frames:     {}", episode.frame_snapshots.len());
    for (kind, count) in &kinds {
        println!("    {kind}: {count} snapshots");
    }
    Ok(())
}

async fn cmd_frame(registry: &StoreRegistry, agent: &str, index: u64, time: f64) -> Result<()> {
    let episode = load_episode(registry, agent, index).await?;

    let frame = StateReplay::new(&episode)
        .frame_at(time)
        .context("Failed to interpolate frame")?;
    match frame {
        Some(frame) => println!("{}", serde_json::to_string_pretty(&frame)?),
        None => println!("Trajectory {index} has no frame snapshots"),
    }
    Ok(())
}

async fn cmd_demo(registry: &StoreRegistry, agent: &str, episodes: usize, rate: u32) -> Result<()> {
    let saver = registry.saver(agent).await?;
    let dt = 1.0 / rate.max(1) as f64;

    for ep in 0..episodes {
        let mut delver = MockSkeletalEntity::spawn_delver([16.0, 16.0]);
        let mut boulder = MockEntity::spawn([64.0, 48.0]).with_velocity([-8.0, 0.0]);
        let mut episode = EpisodeTrajectory::new(rate).with_level_hash("demo");

        for tick in 0..rate as usize * 2 {
            let jump = tick % 10 == 0;
            delver.body.velocity = [24.0, if jump { 12.0 } else { 0.0 }];
            episode.add_delver_action(DelverAction::new(RunDirection::Right, jump));
            delver.step(dt);
            boulder.step(dt);
            episode.record_frame([&delver as &dyn LiveEntity, &boulder as &dyn LiveEntity]);
        }
        episode.set_victorious(ep % 2 == 0);

        let index = saver.save(&episode).await?;
        tracing::info!(agent, index, "Recorded demo episode");
    }
    Ok(())
}

async fn load_episode(
    registry: &StoreRegistry,
    agent: &str,
    index: u64,
) -> Result<EpisodeTrajectory> {
    let loader = registry.loader(agent).await?;
    match loader
        .load(index)
        .await
        .with_context(|| format!("Failed to load trajectory {index} of {agent}"))?
    {
        Some(episode) => Ok(episode),
        None => bail!("Trajectory {index} of {agent} does not exist"),
    }
}
