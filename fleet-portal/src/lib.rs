pub mod api;
pub mod config;
pub mod forms;
pub mod guard;
pub mod handlers;
pub mod models;
pub mod session;
pub mod startup;

use api::FleetApi;
use std::sync::Arc;

/// Shared application state containing the fleet API client
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<FleetApi>,
}

impl AppState {
    pub fn new(api: Arc<FleetApi>) -> Self {
        Self { api }
    }
}
