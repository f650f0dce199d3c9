use axum::extract::FromRef;

use crate::gallery::ArtworkAggregator;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedAggregator = Arc<ArtworkAggregator>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub aggregator: GuardedAggregator,
    pub hash: String,
}

impl ServerState {
    pub fn new(config: ServerConfig, aggregator: GuardedAggregator) -> ServerState {
        ServerState {
            config,
            start_time: Instant::now(),
            aggregator,
            hash: env!("BUILD_HASH").to_owned(),
        }
    }
}

impl FromRef<ServerState> for GuardedAggregator {
    fn from_ref(input: &ServerState) -> Self {
        input.aggregator.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
