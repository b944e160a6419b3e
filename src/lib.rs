// src/lib.rs

use std::sync::Arc;

pub mod actions;
pub mod api;
pub mod blockchain;
pub mod config;
pub mod handlers;
pub mod runtime;
pub mod utils;

/// Application state shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: config::Config,
    /// The agent runtime every request is routed through
    pub runtime: Arc<runtime::AgentRuntime>,
}

impl AppState {
    pub fn new(config: config::Config, runtime: Arc<runtime::AgentRuntime>) -> Self {
        Self { config, runtime }
    }
}
