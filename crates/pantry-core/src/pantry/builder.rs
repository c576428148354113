//! Builder for opening a [`Pantry`].

use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use log::{info, warn};
use tokio::task;

use super::Pantry;
use crate::{
    db::{Database, MigrationRunner},
    error::{Result, StoreError},
    seed,
};

const SLOW_STARTUP: Duration = Duration::from_secs(2);

/// Builder for creating and configuring Pantry instances.
#[derive(Debug, Clone, Default)]
pub struct PantryBuilder {
    database_path: Option<PathBuf>,
    in_memory: bool,
    seed: bool,
    migrations: Option<MigrationRunner>,
}

impl PantryBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/pantry/pantry.db` or `~/.local/share/pantry/pantry.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Uses a private in-memory database instead of a file.
    pub fn in_memory(mut self) -> Self {
        self.in_memory = true;
        self
    }

    /// Seeds the sample recipes when the store has no active recipes.
    pub fn with_seed(mut self, seed: bool) -> Self {
        self.seed = seed;
        self
    }

    /// Replaces the built-in migration list.
    pub fn with_migrations(mut self, migrations: MigrationRunner) -> Self {
        self.migrations = Some(migrations);
        self
    }

    /// Opens the connection, brings the schema up to date and seeds if
    /// requested.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::FileSystem` if the database directory cannot be
    /// created, `StoreError::Database` if the connection cannot be opened,
    /// `StoreError::MigrationFailed` or `StoreError::SeedFailed` from the
    /// startup steps.
    pub async fn build(self) -> Result<Pantry> {
        let db_path = if self.in_memory {
            None
        } else if let Some(path) = self.database_path {
            Some(path)
        } else {
            Some(Self::default_database_path()?)
        };

        if let Some(parent) = db_path.as_deref().and_then(Path::parent) {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| StoreError::FileSystem {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let migrations = self.migrations.unwrap_or_else(MigrationRunner::with_builtin);
        let seed = self.seed;

        let (db, migrations) = task::spawn_blocking(move || {
            let started = Instant::now();
            let db = match &db_path {
                Some(path) => Database::open(path)?,
                None => Database::open_in_memory()?,
            };
            migrations.run_migrations(&db)?;
            if seed && seed::needs_seeding(&db)? {
                seed::seed_database(&db)?;
            }

            let elapsed = started.elapsed();
            if elapsed > SLOW_STARTUP {
                warn!("Database initialization took {elapsed:?}");
            } else {
                info!("Database initialization completed in {elapsed:?}");
            }
            Ok::<_, StoreError>((db, migrations))
        })
        .await
        .map_err(|e| StoreError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        Ok(Pantry::new(db, migrations))
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("pantry")
            .place_data_file("pantry.db")
            .map_err(|e| StoreError::XdgDirectory(e.to_string()))
    }
}
