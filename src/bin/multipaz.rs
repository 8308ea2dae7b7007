use anyhow::Context;
use clap::Parser;
use pazaak_rs::agents::{MoveProvider, RendezvousAgent};
use pazaak_rs::cli::{exit_code, init_logging, player_agent};
use pazaak_rs::config::{MatchConfig, DEFAULT_ROUND_LIMIT};
use pazaak_rs::deck::SidePool;
use pazaak_rs::engine::MatchEngine;
use pazaak_rs::server;
use pazaak_rs::sidedeck::AutoSideDecks;
use pazaak_rs::stats::Stats;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

/// Play a bot (seat 1) against a human (seat 2) connected over HTTP.
#[derive(Parser, Debug)]
#[command(name = "multipaz", version, about)]
struct Cli {
    /// Bot program (with arguments) or `builtin:stand15|target`
    #[arg(long)]
    player: String,

    /// Address for the `/state` and `/move` routes
    #[arg(long, default_value = "127.0.0.1:8087")]
    listen: SocketAddr,

    #[arg(long, default_value_t = DEFAULT_ROUND_LIMIT)]
    round_limit: u32,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    stats: Option<PathBuf>,

    /// Per-move limit for the bot program
    #[arg(long, default_value_t = 5000)]
    timeout_ms: u64,

    /// How long the human has for each move
    #[arg(long, default_value_t = 60)]
    deadline_secs: u64,

    /// Keep serving the final view this long after the match ends
    #[arg(long, default_value_t = 5)]
    linger_secs: u64,

    #[arg(short, long)]
    quiet: bool,
}

async fn run(cli: Cli) -> anyhow::Result<usize> {
    let bot = player_agent(&cli.player, cli.round_limit, Duration::from_millis(cli.timeout_ms))?;
    let human = Arc::new(
        RendezvousAgent::new("human").with_deadline(Duration::from_secs(cli.deadline_secs)),
    );

    let listener = tokio::net::TcpListener::bind(cli.listen)
        .await
        .with_context(|| format!("failed to bind {}", cli.listen))?;
    let http = tokio::spawn(server::serve(listener, human.clone()));

    let mut config = MatchConfig::default().with_round_limit(cli.round_limit);
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    let agents: Vec<Arc<dyn MoveProvider>> = vec![bot, human as Arc<dyn MoveProvider>];
    let mut engine = MatchEngine::new(agents, &mut AutoSideDecks(SidePool::All), config)
        .context("failed to set up match")?;
    let outcome = engine.run().await?;

    if let Some(path) = &cli.stats {
        Stats::record(path, &outcome)
            .with_context(|| format!("failed to update stats in {}", path.display()))?;
    }
    tokio::time::sleep(Duration::from_secs(cli.linger_secs)).await;
    http.abort();
    Ok(outcome.winner)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.quiet);
    exit_code(run(cli).await)
}
