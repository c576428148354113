//! Versioned schema migrations tracked through `PRAGMA user_version`.

use log::{info, warn};
use serde::Serialize;

use super::Database;
use crate::error::{Result, StoreError};

/// Body of a migration step. Bodies should be idempotent
/// (`CREATE ... IF NOT EXISTS`, `DROP ... IF EXISTS`).
pub type MigrationFn = fn(&Database) -> Result<()>;

/// A single versioned schema change.
#[derive(Clone, Copy)]
pub struct Migration {
    pub version: u32,
    pub name: &'static str,
    pub description: &'static str,
    pub up: MigrationFn,
    pub down: MigrationFn,
}

impl std::fmt::Debug for Migration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Migration")
            .field("version", &self.version)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Applied/pending flag for one registered migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationState {
    pub version: u32,
    pub name: &'static str,
    pub description: &'static str,
    pub applied: bool,
}

/// Diagnostic snapshot of the schema version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationStatus {
    pub current_version: u32,
    pub latest_version: u32,
    pub pending_count: usize,
    pub is_up_to_date: bool,
    pub migrations: Vec<MigrationState>,
}

/// Ordered list of migrations and the logic to apply or revert them.
#[derive(Debug, Clone, Default)]
pub struct MigrationRunner {
    migrations: Vec<Migration>,
}

impl MigrationRunner {
    /// Creates a runner with no migrations registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a runner with the application's schema history registered.
    pub fn with_builtin() -> Self {
        let mut migrations = super::schema::builtin_migrations();
        migrations.sort_by_key(|m| m.version);
        Self { migrations }
    }

    /// Adds a migration, keeping the list sorted by version.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Configuration` if the version is already
    /// registered.
    pub fn register(&mut self, migration: Migration) -> Result<()> {
        if let Some(existing) = self
            .migrations
            .iter()
            .find(|m| m.version == migration.version)
        {
            return Err(StoreError::Configuration {
                message: format!(
                    "Migration version {} registered twice ({} and {})",
                    migration.version, existing.name, migration.name
                ),
            });
        }
        self.migrations.push(migration);
        self.migrations.sort_by_key(|m| m.version);
        Ok(())
    }

    /// Registered migrations in ascending version order.
    pub fn migrations(&self) -> &[Migration] {
        &self.migrations
    }

    /// Highest registered version, 0 when empty.
    pub fn latest_version(&self) -> u32 {
        self.migrations.last().map_or(0, |m| m.version)
    }

    /// Migrations whose version exceeds the stored version.
    pub fn pending_migrations(&self, db: &Database) -> Result<Vec<Migration>> {
        let current = db.user_version()?;
        Ok(self
            .migrations
            .iter()
            .filter(|m| m.version > current)
            .copied()
            .collect())
    }

    /// Applies every pending migration in ascending order and returns how
    /// many were applied. Stops at the first failure; the stored version then
    /// names the last migration that succeeded.
    pub fn run_migrations(&self, db: &Database) -> Result<usize> {
        let pending = self.pending_migrations(db)?;
        if pending.is_empty() {
            info!("No pending migrations to run");
            return Ok(0);
        }

        info!("Running {} pending migrations...", pending.len());
        for migration in &pending {
            self.run_migration(db, migration)?;
        }
        info!("All migrations completed successfully");
        Ok(pending.len())
    }

    /// Applies one migration and records its version in the same
    /// transaction.
    pub fn run_migration(&self, db: &Database, migration: &Migration) -> Result<()> {
        info!(
            "Running migration {}: {}",
            migration.version, migration.name
        );
        db.transaction(|db| {
            (migration.up)(db)?;
            db.set_user_version(migration.version)
        })
        .map_err(|e| StoreError::MigrationFailed {
            version: migration.version,
            name: migration.name,
            operation: "apply",
            source: Box::new(e),
        })?;
        info!("Migration {} completed successfully", migration.version);
        Ok(())
    }

    /// Reverts every applied migration above `target`, newest first. Returns
    /// the number reverted.
    pub fn rollback_to_version(&self, db: &Database, target: u32) -> Result<usize> {
        let current = db.user_version()?;
        if target >= current {
            info!("Already at version {current}, no rollback needed");
            return Ok(0);
        }

        let to_revert: Vec<&Migration> = self
            .migrations
            .iter()
            .rev()
            .filter(|m| m.version > target && m.version <= current)
            .collect();

        info!(
            "Rolling back {} migrations to version {target}...",
            to_revert.len()
        );
        for migration in &to_revert {
            self.rollback_migration(db, migration)?;
        }
        info!("Rollback to version {target} completed successfully");
        Ok(to_revert.len())
    }

    /// Reverts one migration; the stored version drops to the next lower
    /// registered version.
    pub fn rollback_migration(&self, db: &Database, migration: &Migration) -> Result<()> {
        info!(
            "Rolling back migration {}: {}",
            migration.version, migration.name
        );
        let previous = self.previous_version(migration.version);
        db.transaction(|db| {
            (migration.down)(db)?;
            db.set_user_version(previous)
        })
        .map_err(|e| StoreError::MigrationFailed {
            version: migration.version,
            name: migration.name,
            operation: "revert",
            source: Box::new(e),
        })?;
        info!("Migration {} rolled back successfully", migration.version);
        Ok(())
    }

    fn previous_version(&self, version: u32) -> u32 {
        self.migrations
            .iter()
            .rev()
            .map(|m| m.version)
            .find(|v| *v < version)
            .unwrap_or(0)
    }

    /// True when the stored version is at or beyond the latest registered
    /// one.
    pub fn is_up_to_date(&self, db: &Database) -> Result<bool> {
        Ok(db.user_version()? >= self.latest_version())
    }

    /// Reports current and latest versions with a per-migration applied flag.
    pub fn status(&self, db: &Database) -> Result<MigrationStatus> {
        let current_version = db.user_version()?;
        let latest_version = self.latest_version();
        let migrations: Vec<MigrationState> = self
            .migrations
            .iter()
            .map(|m| MigrationState {
                version: m.version,
                name: m.name,
                description: m.description,
                applied: m.version <= current_version,
            })
            .collect();

        Ok(MigrationStatus {
            current_version,
            latest_version,
            pending_count: migrations.iter().filter(|m| !m.applied).count(),
            is_up_to_date: current_version >= latest_version,
            migrations,
        })
    }

    /// Runs every `down` body newest first, skipping failures, then sets the
    /// version to 0.
    pub fn reset(&self, db: &Database) -> Result<()> {
        info!("Resetting database to version 0...");
        for migration in self.migrations.iter().rev() {
            if let Err(e) = (migration.down)(db) {
                warn!(
                    "Failed to roll back migration {} during reset: {e}",
                    migration.version
                );
            }
        }
        db.set_user_version(0)?;
        info!("Database reset completed");
        Ok(())
    }
}
