//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` owns the bingo service wired to whichever store the config
//! selects: Postgres when `DATABASE_URL` is set, otherwise a process-local
//! in-memory store. Either way a placeholder pool is installed on first
//! start. Clone is cheap; the service holds only `Arc`s.

use std::sync::Arc;

use tracing::info;

use crate::bingo::BingoError;
use crate::clock::{Clock, SystemClock};
use crate::config::AppConfig;
use crate::db;
use crate::services::bingo::BingoService;
use crate::store::{BingoStore, MemoryStore, PgStore};

#[derive(Clone)]
pub struct AppState {
    pub bingo: BingoService,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn BingoStore>, clock: Arc<dyn Clock>) -> Self {
        Self { bingo: BingoService::new(store, clock) }
    }

    /// Connect the configured store and make sure a tile pool exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database is unreachable or migrations fail.
    pub async fn from_config(config: &AppConfig) -> Result<Self, BingoError> {
        let store: Arc<dyn BingoStore> = match &config.database_url {
            Some(url) => {
                let pool = db::init_pool(url, config.db_max_connections).await?;
                info!(max_connections = config.db_max_connections, "using postgres store");
                Arc::new(PgStore::new(pool))
            }
            None => {
                info!("DATABASE_URL not set; using in-memory store");
                Arc::new(MemoryStore::new())
            }
        };

        let state = Self::new(store, Arc::new(SystemClock));
        state.bingo.seed_tiles().await?;
        Ok(state)
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
