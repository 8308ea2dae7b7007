use super::{MoveError, MoveProvider};
use crate::game::{GameView, Move};
use async_trait::async_trait;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};

/// Runs an external program once per move: the view goes to its stdin as JSON,
/// one move document is read back from its stdout.
#[derive(Debug, Clone)]
pub struct ForkAgent {
    program: PathBuf,
    args: Vec<String>,
    timeout: Duration,
}

impl ForkAgent {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into(), args: Vec::new(), timeout: Self::DEFAULT_TIMEOUT }
    }

    /// Extra arguments passed to the program on every move.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl fmt::Display for ForkAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())
    }
}

#[async_trait]
impl MoveProvider for ForkAgent {
    async fn request_move(&self, view: &GameView) -> Result<Move, MoveError> {
        let input = serde_json::to_vec(view).map_err(MoveError::Encode)?;
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| MoveError::Spawn { program: self.to_string(), source })?;
        let stdin = child.stdin.take();
        let stdout = child.stdout.take();

        let exchanged =
            tokio::time::timeout(self.timeout, exchange(&mut child, stdin, stdout, &input)).await;
        let (status, output) = match exchanged {
            Ok(res) => res?,
            Err(_) => {
                // kill() also reaps the child
                if let Err(e) = child.kill().await {
                    log::warn!("Player {}: failed to kill subprocess after timeout: {}", self, e);
                }
                return Err(MoveError::Timeout(self.timeout));
            }
        };
        if !status.success() {
            return Err(MoveError::Exit(status));
        }
        Ok(Move::decode(&output)?)
    }
}

/// Feed the view, collect stdout until EOF, then wait for exit.
async fn exchange(
    child: &mut Child,
    stdin: Option<ChildStdin>,
    stdout: Option<ChildStdout>,
    input: &[u8],
) -> io::Result<(ExitStatus, Vec<u8>)> {
    let feed = async move {
        let Some(mut stdin) = stdin else {
            return Ok(());
        };
        match stdin.write_all(input).await {
            // the program answered without reading its input
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
            other => other,
        }
    };
    let drain = async move {
        let mut out = Vec::new();
        if let Some(mut stdout) = stdout {
            stdout.read_to_end(&mut out).await?;
        }
        Ok::<_, io::Error>(out)
    };
    let (fed, output) = tokio::join!(feed, drain);
    fed?;
    let output = output?;
    let status = child.wait().await?;
    Ok((status, output))
}
