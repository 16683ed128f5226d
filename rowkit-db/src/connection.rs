// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Handle lifecycle of the transaction manager.

use std::fmt;
use std::str::FromStr;

use rusqlite::Connection;
use tracing::debug;

use crate::error::{Error, Result};
use crate::schema::DbHelper;

/// Database open mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Read-only access
    ReadOnly,
    /// Read-write access, creating the store if needed
    ReadWrite,
}

impl FromStr for OpenMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "read-only" | "readonly" | "ro" => Ok(Self::ReadOnly),
            "read-write" | "readwrite" | "rw" => Ok(Self::ReadWrite),
            other => Err(Error::InvalidOpenMode(other.to_string())),
        }
    }
}

impl fmt::Display for OpenMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ReadOnly => "read-only",
            Self::ReadWrite => "read-write",
        })
    }
}

/// Executes CRUD against one store through per-call transactions.
///
/// Holds at most one open handle. Expected failures come back as
/// [`Error::Storage`] after the transaction has been rolled back; using the
/// manager while closed is [`Error::NotOpen`].
pub struct DbManager {
    helper: DbHelper,
    conn: Option<(Connection, OpenMode)>,
}

impl DbManager {
    pub fn new(helper: DbHelper) -> Self {
        Self { helper, conn: None }
    }

    /// Open the store. Reopening while open replaces the handle.
    pub fn open(&mut self, mode: OpenMode) -> Result<()> {
        if let Some((old, old_mode)) = self.conn.take() {
            debug!("Rebinding {old_mode} handle as {mode}");
            drop(old);
        }
        let conn = self.helper.open(mode)?;
        self.conn = Some((conn, mode));
        Ok(())
    }

    /// Close the open handle.
    pub fn close(&mut self) -> Result<()> {
        let (conn, mode) = self.conn.take().ok_or(Error::NotOpen)?;
        if let Err((conn, e)) = conn.close() {
            // Keep the handle so a later close can retry
            self.conn = Some((conn, mode));
            return Err(Error::DatabaseClose {
                path: self.helper.path(),
                source: e,
            });
        }
        debug!("Closed store {}", self.helper.name());
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Mode of the open handle.
    pub fn mode(&self) -> Option<OpenMode> {
        self.conn.as_ref().map(|(_, mode)| *mode)
    }

    pub fn helper(&self) -> &DbHelper {
        &self.helper
    }

    /// Get raw connection (for advanced usage).
    pub fn connection(&self) -> Option<&Connection> {
        self.conn.as_ref().map(|(conn, _)| conn)
    }

    pub(crate) fn conn(&self) -> Result<&Connection> {
        self.connection().ok_or(Error::NotOpen)
    }

    pub(crate) fn conn_mut(&mut self) -> Result<&mut Connection> {
        self.conn.as_mut().map(|(conn, _)| conn).ok_or(Error::NotOpen)
    }
}

impl fmt::Debug for DbManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbManager")
            .field("helper", &self.helper)
            .field("mode", &self.mode())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("read-only", OpenMode::ReadOnly)]
    #[case("readonly", OpenMode::ReadOnly)]
    #[case("ro", OpenMode::ReadOnly)]
    #[case("read-write", OpenMode::ReadWrite)]
    #[case("rw", OpenMode::ReadWrite)]
    fn parse_mode(#[case] input: &str, #[case] expected: OpenMode) {
        assert_eq!(input.parse::<OpenMode>().unwrap(), expected);
    }

    #[test]
    fn test_invalid_mode() {
        assert!(matches!(
            "append".parse::<OpenMode>(),
            Err(Error::InvalidOpenMode(m)) if m == "append"
        ));
    }
}
