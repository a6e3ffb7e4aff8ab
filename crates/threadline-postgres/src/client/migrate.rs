//! Embedded schema migrations applied at startup.

use std::time::{Duration, Instant};

use diesel_async::AsyncPgConnection;
use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_async::pooled_connection::PoolableConnection;
use diesel_migrations::MigrationHarness;
use tokio::task::spawn_blocking;

use crate::{MIGRATIONS, PgClient, PgError, PgResult, TRACING_TARGET_MIGRATION};

/// Outcome of a migration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationResult {
    /// Total duration of the migration run.
    pub duration: Duration,
    /// Versions applied by this run, in order.
    pub applied_versions: Vec<String>,
}

impl MigrationResult {
    /// Returns whether the schema was already up to date.
    pub fn is_no_op(&self) -> bool {
        self.applied_versions.is_empty()
    }

    /// Returns the last version applied by this run, if any.
    pub fn last_applied_version(&self) -> Option<&str> {
        self.applied_versions.last().map(String::as_str)
    }
}

/// Migration support for [`PgClient`].
pub trait PgClientMigrationExt {
    /// Applies every embedded migration that has not been applied yet.
    ///
    /// Safe to call on every startup; an up-to-date schema is a no-op.
    fn run_pending_migrations(&self) -> impl Future<Output = PgResult<MigrationResult>> + Send;
}

impl PgClientMigrationExt for PgClient {
    async fn run_pending_migrations(&self) -> PgResult<MigrationResult> {
        run_pending_migrations(self).await
    }
}

/// Applies all pending embedded migrations on a pooled connection.
///
/// Diesel's migration harness is synchronous, so the run happens on the
/// blocking thread pool through [`AsyncConnectionWrapper`].
#[tracing::instrument(skip(pg), target = TRACING_TARGET_MIGRATION)]
pub async fn run_pending_migrations(pg: &PgClient) -> PgResult<MigrationResult> {
    tracing::info!(target: TRACING_TARGET_MIGRATION, "Starting database migrations");

    let started = Instant::now();
    let mut conn = pg.get_connection().await?.into_inner();
    inspect_connection(&mut conn, "pre_migrate");

    let mut conn: AsyncConnectionWrapper<_> = conn.into();
    let joined = spawn_blocking(move || {
        let result = conn
            .run_pending_migrations(MIGRATIONS)
            .map(|versions| versions.iter().map(ToString::to_string).collect::<Vec<_>>());
        (result, conn)
    })
    .await;

    let duration = started.elapsed();
    let (result, mut conn) = joined.map_err(|err| {
        tracing::error!(
            target: TRACING_TARGET_MIGRATION,
            duration = ?duration,
            error = %err,
            "Migration task failed to complete"
        );
        PgError::Migration(err.into())
    })?;

    inspect_connection(&mut conn, "post_migrate");
    let applied_versions = result.map_err(|err| {
        tracing::error!(
            target: TRACING_TARGET_MIGRATION,
            duration = ?duration,
            error = %err,
            "Database migrations failed"
        );
        PgError::Migration(err)
    })?;

    let result = MigrationResult {
        duration,
        applied_versions,
    };

    if result.is_no_op() {
        tracing::info!(target: TRACING_TARGET_MIGRATION, "Database schema is up to date");
    } else {
        tracing::info!(
            target: TRACING_TARGET_MIGRATION,
            duration = ?duration,
            applied = result.applied_versions.len(),
            version = result.last_applied_version(),
            "Database migrations applied"
        );
    }

    Ok(result)
}

fn inspect_connection(conn: &mut AsyncPgConnection, hook: &'static str) {
    if conn.is_broken() {
        tracing::error!(
            target: TRACING_TARGET_MIGRATION,
            hook,
            "Migration connection is broken"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migration_result_no_op() {
        let result = MigrationResult {
            duration: Duration::from_millis(5),
            applied_versions: vec![],
        };
        assert!(result.is_no_op());
        assert_eq!(result.last_applied_version(), None);
    }

    #[test]
    fn migration_result_last_version() {
        let result = MigrationResult {
            duration: Duration::from_millis(5),
            applied_versions: vec!["20250101000000".into(), "20250115000000".into()],
        };
        assert!(!result.is_no_op());
        assert_eq!(result.last_applied_version(), Some("20250115000000"));
    }
}
