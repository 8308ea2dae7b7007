//! Bot program for `pazaak --player`: one view on stdin, one move on stdout.

use anyhow::Context;
use clap::Parser;
use pazaak_rs::bots::{BotProfile, Strategy};
use pazaak_rs::config::DEFAULT_ROUND_LIMIT;
use pazaak_rs::game::GameView;
use std::io::{self, Read, Write};

#[derive(Parser, Debug)]
#[command(name = "pazaak-bot", version, about = "Reference pazaak bot")]
struct Cli {
    #[arg(long, default_value_t = Strategy::Stand15)]
    strategy: Strategy,

    /// Round wins the match is played to
    #[arg(long, default_value_t = DEFAULT_ROUND_LIMIT)]
    round_limit: u32,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut input = Vec::new();
    io::stdin().read_to_end(&mut input).context("failed to read game view")?;
    let view: GameView = serde_json::from_slice(&input).context("malformed game view")?;

    let m = BotProfile::new(cli.strategy).with_round_limit(cli.round_limit).decide(&view);
    let mut out = io::stdout().lock();
    serde_json::to_writer(&mut out, &m)?;
    writeln!(out)?;
    Ok(())
}
