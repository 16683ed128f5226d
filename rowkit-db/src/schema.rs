// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Store creation and the one-time table creation script.
//!
//! The schema version lives in `PRAGMA user_version`. A store reading 0 is
//! new and gets its tables created; any other mismatch is stamped with the
//! requested version without migrating.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags};
use tracing::{debug, error, warn};

use crate::config::StoreConfig;
use crate::connection::OpenMode;
use crate::error::{Error, Result};

/// Supplier of the DDL statements run when a store is first created.
pub trait Schema {
    /// Statements executed verbatim, in order.
    fn table_creation_statements(&self) -> Vec<String>;
}

impl Schema for Vec<String> {
    fn table_creation_statements(&self) -> Vec<String> {
        self.clone()
    }
}

impl Schema for &'static [&'static str] {
    fn table_creation_statements(&self) -> Vec<String> {
        self.iter().map(|s| (*s).to_string()).collect()
    }
}

/// Outcome of running the table creation script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaCreation {
    /// Every statement ran
    Complete { statements: usize },
    /// A statement failed; the ones after it were skipped
    Incomplete {
        executed: usize,
        failed_statement: String,
        reason: String,
    },
}

impl SchemaCreation {
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete { .. })
    }
}

/// Owns the location, version and creation script of one store.
pub struct DbHelper {
    directory: PathBuf,
    name: String,
    version: u32,
    foreign_keys: bool,
    schema: Box<dyn Schema>,
    last_creation: Option<SchemaCreation>,
}

impl DbHelper {
    /// Helper for store `name` in `directory` at version 1.
    pub fn new(
        directory: impl Into<PathBuf>,
        name: impl Into<String>,
        schema: impl Schema + 'static,
    ) -> Self {
        Self {
            directory: directory.into(),
            name: name.into(),
            version: 1,
            foreign_keys: true,
            schema: Box::new(schema),
            last_creation: None,
        }
    }

    /// Helper at an explicit version, which must be at least 1.
    pub fn with_version(
        directory: impl Into<PathBuf>,
        name: impl Into<String>,
        version: u32,
        schema: impl Schema + 'static,
    ) -> Result<Self> {
        if version == 0 {
            return Err(Error::InvalidVersion(version));
        }
        let mut helper = Self::new(directory, name, schema);
        helper.version = version;
        Ok(helper)
    }

    /// Helper built from configuration, using its `schema` statements.
    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        Ok(Self::with_version(
            &config.directory,
            &config.name,
            config.version,
            config.schema.clone(),
        )?
        .with_foreign_keys(config.foreign_keys))
    }

    /// Enable or disable foreign key enforcement on writable handles.
    pub fn with_foreign_keys(mut self, enabled: bool) -> Self {
        self.foreign_keys = enabled;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.name)
    }

    /// Whether the store file exists.
    pub fn exists(&self) -> bool {
        self.path().exists()
    }

    /// Outcome of the last table creation run by this helper, if any.
    pub fn last_creation(&self) -> Option<&SchemaCreation> {
        self.last_creation.as_ref()
    }

    /// Open the store, creating it and its tables if absent.
    ///
    /// A failed creation script does not fail the open; inspect
    /// [`DbHelper::last_creation`].
    pub fn open(&mut self, mode: OpenMode) -> Result<Connection> {
        match mode {
            OpenMode::ReadWrite => self.open_writable(),
            OpenMode::ReadOnly => {
                if !self.exists() {
                    drop(self.open_writable()?);
                }
                let path = self.path();
                let conn = Connection::open_with_flags(&path, OpenFlags::SQLITE_OPEN_READ_ONLY)
                    .map_err(|e| open_error(&path, e))?;
                debug!("Opened store {} read-only", path.display());
                Ok(conn)
            }
        }
    }

    fn open_writable(&mut self) -> Result<Connection> {
        let path = self.path();
        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE,
        )
        .map_err(|e| open_error(&path, e))?;

        if self.foreign_keys {
            conn.execute_batch("PRAGMA foreign_keys = ON;")
                .map_err(|e| open_error(&path, e))?;
        }

        let current: u32 = conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .map_err(|e| open_error(&path, e))?;

        if current != self.version {
            let tx = conn
                .unchecked_transaction()
                .map_err(|e| open_error(&path, e))?;
            if current == 0 {
                self.last_creation = Some(self.on_create(&tx));
            } else {
                self.on_upgrade(current, self.version);
            }
            tx.execute_batch(&format!("PRAGMA user_version = {};", self.version))
                .and_then(|()| tx.commit())
                .map_err(|e| open_error(&path, e))?;
        }

        debug!("Opened store {} read-write", path.display());
        Ok(conn)
    }

    fn on_create(&self, conn: &Connection) -> SchemaCreation {
        debug!("Creating tables for {}", self.name);
        let statements = self.schema.table_creation_statements();
        for (executed, statement) in statements.iter().enumerate() {
            if let Err(e) = conn.execute_batch(statement) {
                error!("Table creation failed: {e}");
                return SchemaCreation::Incomplete {
                    executed,
                    failed_statement: statement.clone(),
                    reason: e.to_string(),
                };
            }
        }
        debug!("Table creation completed successfully");
        SchemaCreation::Complete {
            statements: statements.len(),
        }
    }

    /// Versioning is not supported: the new version is stamped as is.
    fn on_upgrade(&self, old: u32, new: u32) {
        warn!(
            "Store {} moves from version {old} to {new} without migration",
            self.name
        );
    }
}

impl std::fmt::Debug for DbHelper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbHelper")
            .field("path", &self.path())
            .field("version", &self.version)
            .field("foreign_keys", &self.foreign_keys)
            .field("last_creation", &self.last_creation)
            .finish_non_exhaustive()
    }
}

fn open_error(path: &Path, source: rusqlite::Error) -> Error {
    Error::DatabaseOpen {
        path: path.to_owned(),
        source,
    }
}
