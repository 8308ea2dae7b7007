use anyhow::{bail, Context};
use clap::Parser;
use pazaak_rs::cli::{exit_code, init_logging, player_agent};
use pazaak_rs::config::{MatchConfig, DEFAULT_ROUND_LIMIT};
use pazaak_rs::engine::MatchEngine;
use pazaak_rs::sidedeck::{FixedSideDecks, ReaderSideDecks, SideDeckSource};
use pazaak_rs::stats::Stats;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

/// Run a pazaak match between two bot programs. Exits with the winner's seat.
#[derive(Parser, Debug)]
#[command(name = "pazaak", version, about)]
struct Cli {
    /// Bot program (with arguments) or `builtin:stand15|target`; give exactly two
    #[arg(long = "player", required = true)]
    players: Vec<String>,

    /// Side deck for player 1: ten card identifiers, `auto`, `auto-simple` or `auto-flip`
    #[arg(long, requires = "deck2")]
    deck1: Option<String>,

    /// Side deck for player 2; without both decks they are read from stdin, one per line
    #[arg(long, requires = "deck1")]
    deck2: Option<String>,

    /// JSON file accumulating per-card win statistics
    #[arg(long)]
    stats: Option<PathBuf>,

    #[arg(long, default_value_t = DEFAULT_ROUND_LIMIT)]
    round_limit: u32,

    /// Rig player 1's deck so this value comes up first each round (0 disables)
    #[arg(long, default_value_t = 0)]
    p1_force_value: i32,

    #[arg(long)]
    seed: Option<u64>,

    /// Per-move limit for bot programs
    #[arg(long, default_value_t = 5000)]
    timeout_ms: u64,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

async fn run(cli: Cli) -> anyhow::Result<usize> {
    if cli.players.len() != 2 {
        bail!("need exactly two --player arguments, got {}", cli.players.len());
    }
    let timeout = Duration::from_millis(cli.timeout_ms);
    let agents = cli
        .players
        .iter()
        .map(|p| player_agent(p, cli.round_limit, timeout))
        .collect::<Result<Vec<_>, _>>()?;

    let mut config = MatchConfig::default()
        .with_round_limit(cli.round_limit)
        .with_forced_p1_value(cli.p1_force_value);
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }

    let mut engine = {
        let mut source: Box<dyn SideDeckSource> = match (cli.deck1, cli.deck2) {
            (Some(a), Some(b)) => Box::new(FixedSideDecks([a, b])),
            _ => Box::new(ReaderSideDecks::new(io::stdin().lock())),
        };
        MatchEngine::new(agents, source.as_mut(), config).context("failed to set up match")?
    };
    let outcome = engine.run().await?;

    if let Some(path) = &cli.stats {
        Stats::record(path, &outcome)
            .with_context(|| format!("failed to update stats in {}", path.display()))?;
    }
    Ok(outcome.winner)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.quiet);
    exit_code(run(cli).await)
}
