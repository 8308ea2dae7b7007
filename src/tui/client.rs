use crate::game::{GameView, Move};
use crate::server::TIME_LEFT_HEADER;
use reqwest::blocking;
use reqwest::StatusCode;
use std::time::Duration;

pub const DEFAULT_SERVER: &str = "http://127.0.0.1:8087";

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server sent a malformed view: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Rejected(String),
}

/// What `GET /state` returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub view: GameView,
    pub time_left: Option<Duration>,
}

/// Blocking HTTP client for the match server's `/state` and `/move` routes.
#[derive(Debug, Clone)]
pub struct Client {
    base: String,
    http: blocking::Client,
}

impl Client {
    pub fn new(base: impl Into<String>) -> Result<Self, ClientError> {
        let http = blocking::Client::builder().timeout(Duration::from_secs(2)).build()?;
        let base = base.into().trim_end_matches('/').to_string();
        Ok(Self { base, http })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// `None` until the match has published its first view.
    pub fn fetch_state(&self) -> Result<Option<Snapshot>, ClientError> {
        let resp = self.http.get(format!("{}/state", self.base)).send()?;
        if resp.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        let resp = resp.error_for_status()?;
        let time_left = resp
            .headers()
            .get(TIME_LEFT_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis);
        let view = serde_json::from_slice(&resp.bytes()?)?;
        Ok(Some(Snapshot { view, time_left }))
    }

    pub fn submit(&self, m: &Move) -> Result<(), ClientError> {
        let resp = self.http.post(format!("{}/move", self.base)).json(m).send()?;
        if resp.status().is_success() {
            return Ok(());
        }
        let body: serde_json::Value = resp.json()?;
        let msg = body.get("error").and_then(|e| e.as_str()).unwrap_or("rejected");
        Err(ClientError::Rejected(msg.to_string()))
    }
}
