//! HTTP front end for a human seat. The engine waits on the rendezvous agent;
//! a client reads the published view from `GET /state` and answers with
//! `POST /move`.

use crate::agents::RendezvousAgent;
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;

/// Milliseconds left before the pending move request expires.
pub const TIME_LEFT_HEADER: &str = "x-time-left-ms";

pub fn router(agent: Arc<RendezvousAgent>) -> Router {
    Router::new()
        .route("/state", get(state_handler))
        .route("/move", post(move_handler))
        .with_state(agent)
}

async fn state_handler(State(agent): State<Arc<RendezvousAgent>>) -> Response {
    let Some(body) = agent.published() else {
        return StatusCode::NO_CONTENT.into_response();
    };
    let mut resp = ([(header::CONTENT_TYPE, "application/json")], body).into_response();
    if let Some(deadline) = agent.deadline() {
        let left = deadline.saturating_duration_since(Instant::now()).as_millis();
        if let Ok(v) = HeaderValue::from_str(&left.to_string()) {
            resp.headers_mut().insert(TIME_LEFT_HEADER, v);
        }
    }
    resp
}

async fn move_handler(State(agent): State<Arc<RendezvousAgent>>, body: Bytes) -> Response {
    match agent.submit(&body) {
        Ok(()) => (StatusCode::OK, Json(serde_json::json!({ "status": "accepted" }))).into_response(),
        Err(e) => {
            log::info!("Rejected move from {}: {}", agent, e);
            (StatusCode::BAD_REQUEST, Json(serde_json::json!({ "error": e.to_string() })))
                .into_response()
        }
    }
}

/// Serve the routes on an already bound listener until the task is dropped.
pub async fn serve(listener: TcpListener, agent: Arc<RendezvousAgent>) -> Result<()> {
    log::info!("Waiting for moves on http://{}", listener.local_addr()?);
    axum::serve(listener, router(agent)).await.context("http server failed")?;
    Ok(())
}
