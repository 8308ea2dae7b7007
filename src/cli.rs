//! Pieces shared by the command-line programs.

use crate::agents::{ForkAgent, InProcessAgent, MoveProvider};
use crate::bots::{BotProfile, Strategy, StrategyParseError};
use crate::game::GameView;
use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

/// Prefix selecting an in-process bot instead of a program, e.g. `builtin:target`.
pub const BUILTIN_PREFIX: &str = "builtin:";

/// Exit status for setup failures and aborted matches; 1 and 2 name the winner.
pub const EXIT_FAILURE: u8 = 3;

/// Install the `env_logger` backend with `[LEVEL] message` lines on stderr.
/// `RUST_LOG` overrides the default level.
pub fn init_logging(quiet: bool) {
    let level = if quiet { "error" } else { "info" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .try_init();
}

/// Build the provider for a `--player` argument: either `builtin:<strategy>` or a
/// program followed by its arguments, separated by whitespace.
///
/// ```
/// use pazaak_rs::cli::player_agent;
/// use std::time::Duration;
///
/// let bot = player_agent("builtin:stand15", 3, Duration::from_secs(1)).unwrap();
/// assert_eq!(bot.to_string(), "builtin:stand15");
/// let prog = player_agent("./bot --fast", 3, Duration::from_secs(1)).unwrap();
/// assert_eq!(prog.to_string(), "./bot");
/// ```
pub fn player_agent(
    spec: &str,
    round_limit: u32,
    timeout: Duration,
) -> Result<Arc<dyn MoveProvider>, StrategyParseError> {
    if let Some(name) = spec.strip_prefix(BUILTIN_PREFIX) {
        let strategy: Strategy = name.parse()?;
        let profile = BotProfile::new(strategy).with_round_limit(round_limit);
        let decide = move |view: &GameView| profile.decide(view);
        return Ok(Arc::new(InProcessAgent::new(format!("{BUILTIN_PREFIX}{strategy}"), decide)));
    }
    let mut words = spec.split_whitespace();
    let program = words.next().unwrap_or_default();
    Ok(Arc::new(ForkAgent::new(program).with_args(words).with_timeout(timeout)))
}

/// Turn a match result into the process exit status.
pub fn exit_code(result: anyhow::Result<usize>) -> ExitCode {
    match result {
        Ok(winner) => ExitCode::from(u8::try_from(winner).unwrap_or(EXIT_FAILURE)),
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_builtin_is_rejected() {
        assert!(player_agent("builtin:psychic", 3, Duration::from_secs(1)).is_err());
    }

    #[tokio::test]
    async fn builtin_agent_decides() {
        let bot = player_agent("builtin:stand15", 3, Duration::from_secs(1)).unwrap();
        let mut view = GameView::default();
        view.current_player.board_value = 16;
        assert!(bot.request_move(&view).await.unwrap().stand);
    }
}
