//! pazaak-rs: a match runner for the card game Pazaak.
//!
//! Two players race to a board value as close to 20 as possible without going
//! over. Each turn the acting player draws from their own main deck and may play
//! one card from a four-card hand dealt from their side deck. The first player
//! to win the configured number of rounds takes the match.
//!
//! Players are move providers behind the [`agents::MoveProvider`] trait: external
//! programs fed JSON on stdin, humans reached over HTTP, or in-process bots.
//!
//! ## Quick start: run a match between two built-in bots
//! ```
//! use pazaak_rs::cli::player_agent;
//! use pazaak_rs::config::MatchConfig;
//! use pazaak_rs::engine::MatchEngine;
//! use pazaak_rs::sidedeck::AutoSideDecks;
//! use std::time::Duration;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let agents = vec![
//!     player_agent("builtin:stand15", 3, Duration::from_secs(1)).unwrap(),
//!     player_agent("builtin:target", 3, Duration::from_secs(1)).unwrap(),
//! ];
//! let config = MatchConfig::default().with_seed(7);
//! let mut engine = MatchEngine::new(agents, &mut AutoSideDecks::default(), config).unwrap();
//! let outcome = engine.run().await.unwrap();
//! assert!(outcome.winner == 1 || outcome.winner == 2);
//! # });
//! ```
//!
//! ## Programs
//! ```sh
//! cargo run --bin pazaak -- --player builtin:stand15 --player ./my-bot --deck1 auto --deck2 auto
//! cargo run --bin multipaz -- --player builtin:target
//! cargo run --bin pazaak-human
//! ```

pub mod agents;
pub mod bots;
pub mod cards;
pub mod cli;
pub mod config;
pub mod deck;
pub mod engine;
pub mod game;
pub mod hand;
pub mod server;
pub mod sidedeck;
pub mod stats;
pub mod tui;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
