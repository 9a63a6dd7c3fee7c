use sqlx::MySqlPool;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use tracing::debug;

use crate::error::Result;

/// Owns the single MySQL connection an import run works through.
///
/// The pool is capped at one connection so every statement of a run is
/// executed sequentially on the same session.
pub struct Database {
    pool: MySqlPool,
}

impl Database {
    pub async fn connect(options: MySqlConnectOptions) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        debug!("MySQL connection established");

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}
