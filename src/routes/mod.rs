// Route exports
pub mod direct;
pub mod health;
pub mod matching;
pub mod messages;

use actix_web::web;
use std::sync::Arc;

use crate::auth::SessionVerifier;
use crate::config::Settings;
use crate::services::{
    AuthorizationGuard, DirectChannel, MatchChannel, MatchMaker, OrientationAggregator, PostgresClient,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub postgres: PostgresClient,
    pub orientation: Arc<OrientationAggregator>,
    pub matchmaker: Arc<MatchMaker>,
    pub match_channel: Arc<MatchChannel>,
    pub direct_channel: Arc<DirectChannel>,
    pub sessions: Arc<SessionVerifier>,
}

impl AppState {
    /// Wire every component to the one storage handle
    pub fn new(postgres: PostgresClient, settings: &Settings) -> Self {
        let pool = postgres.pool().clone();
        let guard = AuthorizationGuard::new(pool.clone());

        Self {
            orientation: Arc::new(OrientationAggregator::new(pool.clone())),
            matchmaker: Arc::new(MatchMaker::new(
                pool.clone(),
                settings.matching.min_orientation_gap,
                settings.matching.candidate_window,
            )),
            match_channel: Arc::new(MatchChannel::new(pool.clone(), guard)),
            direct_channel: Arc::new(DirectChannel::new(pool)),
            sessions: Arc::new(SessionVerifier::from_settings(&settings.auth)),
            postgres,
        }
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure)
        .configure(matching::configure)
        .configure(messages::configure)
        .configure(direct::configure);
}
