//! Terminal client for a human seat: polls the match server and sends moves.

pub mod app;
pub mod client;
pub mod controller;
pub mod ui;
