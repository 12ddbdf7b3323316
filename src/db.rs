use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::Config;

/// Builds the connection pool the whole application shares.
///
/// The pool is created once in `main` and handed to handlers through
/// `web::Data<PgPool>`; nothing else in the crate holds database state.
pub async fn connect(config: &Config) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(20))
        .connect(&config.database_url)
        .await
}
