// Service exports
pub mod direct_channel;
pub mod guard;
pub mod match_channel;
pub mod matchmaker;
pub mod orientation;
pub mod postgres;

pub use direct_channel::DirectChannel;
pub use guard::AuthorizationGuard;
pub use match_channel::MatchChannel;
pub use matchmaker::{MatchMaker, MATCHMAKING_LOCK_KEY};
pub use orientation::OrientationAggregator;
pub use postgres::{PoolOptions, PostgresClient, PostgresError};
