// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Write operations of the transaction manager.
//!
//! Every call runs in its own transaction. Engine errors roll the
//! transaction back and come out as [`Error::Storage`]; nothing from the
//! engine escapes untranslated.

use rusqlite::types::Value;
use rusqlite::{Connection, Transaction, params_from_iter};
use tracing::{debug, error};

use crate::connection::DbManager;
use crate::error::{Error, FailureReason, Operation, Result, StorageFailure};
use crate::query::{quote_identifier, where_suffix};
use crate::values::RowValues;

/// Helper trait for translating engine errors raised during an operation
trait FailureContext<T> {
    fn failed(self, operation: Operation) -> std::result::Result<T, StorageFailure>;
}

impl<T> FailureContext<T> for rusqlite::Result<T> {
    fn failed(self, operation: Operation) -> std::result::Result<T, StorageFailure> {
        self.map_err(|e| StorageFailure::from_sqlite(operation, &e))
    }
}

/// Run `body` in a transaction, committing only if it succeeds.
fn in_transaction<T>(
    conn: &mut Connection,
    operation: Operation,
    body: impl FnOnce(&Transaction<'_>) -> std::result::Result<T, StorageFailure>,
) -> Result<T> {
    let outcome = conn.transaction().failed(operation).and_then(|tx| {
        let value = body(&tx)?;
        tx.commit().failed(operation)?;
        Ok(value)
    });
    outcome.map_err(|failure| {
        error!("{failure}");
        Error::Storage(failure)
    })
}

fn insert_row(tx: &Transaction<'_>, table: &str, row: &RowValues) -> std::result::Result<i64, StorageFailure> {
    let sql = if row.is_empty() {
        format!("INSERT INTO {} DEFAULT VALUES", quote_identifier(table))
    } else {
        let columns = row.columns().map(quote_identifier).collect::<Vec<_>>();
        let placeholders = (1..=columns.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>();
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_identifier(table),
            columns.join(", "),
            placeholders.join(", ")
        )
    };
    tx.execute(&sql, params_from_iter(row.values()))
        .failed(Operation::Insert)?;
    Ok(tx.last_insert_rowid())
}

impl DbManager {
    /// Insert one row, returning its rowid.
    ///
    /// Constraint violations fail the insert instead of being ignored.
    pub fn insert(&mut self, table: &str, row: &RowValues) -> Result<i64> {
        let conn = self.conn_mut()?;
        let id = in_transaction(conn, Operation::Insert, |tx| insert_row(tx, table, row))?;
        debug!("Inserted row {id} into {table}");
        Ok(id)
    }

    /// Insert all rows in one transaction: either every row is stored or
    /// none is.
    pub fn insert_batch(&mut self, table: &str, rows: &[RowValues]) -> Result<usize> {
        let conn = self.conn_mut()?;
        in_transaction(conn, Operation::Insert, |tx| {
            for row in rows {
                insert_row(tx, table, row)?;
            }
            Ok(rows.len())
        })
    }

    /// Update matching rows, returning how many changed.
    ///
    /// Placeholders in `where_clause` must be plain `?`; they bind
    /// `where_args` after the new values. With `force_update`, matching no
    /// row is a [`FailureReason::NothingUpdated`] failure.
    pub fn update(
        &mut self,
        table: &str,
        row: &RowValues,
        where_clause: Option<&str>,
        where_args: &[Value],
        force_update: bool,
    ) -> Result<usize> {
        let conn = self.conn_mut()?;
        in_transaction(conn, Operation::Update, |tx| {
            if row.is_empty() {
                return Err(StorageFailure::new(
                    Operation::Update,
                    FailureReason::QueryConstruction,
                    "Empty values",
                ));
            }
            let assignments = row
                .columns()
                .enumerate()
                .map(|(i, column)| format!("{} = ?{}", quote_identifier(column), i + 1))
                .collect::<Vec<_>>();
            let sql = format!(
                "UPDATE {} SET {}{}",
                quote_identifier(table),
                assignments.join(", "),
                where_suffix(where_clause)
            );
            let updated = tx
                .execute(&sql, params_from_iter(row.values().chain(where_args)))
                .failed(Operation::Update)?;
            if force_update && updated == 0 {
                return Err(StorageFailure::new(
                    Operation::Update,
                    FailureReason::NothingUpdated,
                    "Nothing updated",
                ));
            }
            Ok(updated)
        })
    }

    /// Update every row of `table`.
    pub fn update_all(&mut self, table: &str, row: &RowValues) -> Result<usize> {
        self.update(table, row, None, &[], false)
    }

    /// Delete matching rows, returning how many were removed. Without a
    /// where clause every row is removed.
    pub fn delete(
        &mut self,
        table: &str,
        where_clause: Option<&str>,
        where_args: &[Value],
    ) -> Result<usize> {
        let conn = self.conn_mut()?;
        let sql = format!(
            "DELETE FROM {}{}",
            quote_identifier(table),
            where_suffix(where_clause)
        );
        let deleted = in_transaction(conn, Operation::Delete, |tx| {
            tx.execute(&sql, params_from_iter(where_args))
                .failed(Operation::Delete)
        })?;
        debug!("Deleted {deleted} rows from {table}");
        Ok(deleted)
    }
}
