// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Read operations of the transaction manager.

use rusqlite::types::Value;
use rusqlite::{Connection, params_from_iter};
use tracing::error;

use crate::connection::DbManager;
use crate::cursor::RowSource;
use crate::error::{Error, Operation, Result, StorageFailure};

/// Parameters of a select. Clauses are raw SQL fragments without their
/// keyword; `selection_args` bind to `?` placeholders in `selection` and
/// `having`, in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectParams {
    pub table: String,
    /// Columns or expressions to return, verbatim; empty selects `*`
    pub columns: Vec<String>,
    pub selection: Option<String>,
    pub selection_args: Vec<Value>,
    pub group_by: Option<String>,
    pub having: Option<String>,
    pub order_by: Option<String>,
    pub limit: Option<String>,
}

impl SelectParams {
    /// Select every column of `table`.
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Default::default()
        }
    }

    /// Build the SQL statement.
    pub fn to_sql(&self) -> String {
        let columns = if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns.join(", ")
        };
        let mut sql = format!("SELECT {columns} FROM {}", quote_identifier(&self.table));
        let clauses = [
            ("WHERE", &self.selection),
            ("GROUP BY", &self.group_by),
            ("HAVING", &self.having),
            ("ORDER BY", &self.order_by),
            ("LIMIT", &self.limit),
        ];
        for (keyword, clause) in clauses {
            if let Some(clause) = clause.as_deref().filter(|c| !c.trim().is_empty()) {
                sql.push(' ');
                sql.push_str(keyword);
                sql.push(' ');
                sql.push_str(clause);
            }
        }
        sql
    }
}

/// Double-quote an identifier for generated SQL.
pub(crate) fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// ` WHERE clause`, or nothing for a missing or blank clause.
pub(crate) fn where_suffix(where_clause: Option<&str>) -> String {
    match where_clause.filter(|w| !w.trim().is_empty()) {
        Some(clause) => format!(" WHERE {clause}"),
        None => String::new(),
    }
}

impl DbManager {
    /// Run a select and materialise its rows.
    ///
    /// Reads are not wrapped in a transaction. A query that cannot be
    /// prepared or run is logged and returned as a storage failure.
    pub fn select(&self, params: &SelectParams) -> Result<RowSource> {
        let conn = self.conn()?;
        let sql = params.to_sql();
        query_rows(conn, &sql, &params.selection_args).map_err(|e| {
            error!("Selection failed: {e}");
            Error::from(StorageFailure::from_sqlite(Operation::Select, &e))
        })
    }

    /// Select `columns` of `table` with only a limit.
    pub fn select_limit(
        &self,
        table: &str,
        columns: &[&str],
        limit: Option<&str>,
    ) -> Result<RowSource> {
        self.select(&SelectParams {
            table: table.to_string(),
            columns: columns.iter().map(|c| (*c).to_string()).collect(),
            limit: limit.map(str::to_string),
            ..Default::default()
        })
    }

    /// Count rows matching an optional where clause.
    pub fn count(&self, table: &str, where_clause: Option<&str>, where_args: &[Value]) -> Result<u64> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT COUNT(*) FROM {}{}",
            quote_identifier(table),
            where_suffix(where_clause)
        );
        let count: i64 = conn
            .query_row(&sql, params_from_iter(where_args.iter()), |row| row.get(0))
            .map_err(|e| {
                error!("Selection failed: {e}");
                Error::from(StorageFailure::from_sqlite(Operation::Select, &e))
            })?;
        Ok(count as u64)
    }
}

fn query_rows(conn: &Connection, sql: &str, args: &[Value]) -> rusqlite::Result<RowSource> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let width = columns.len();
    let mut rows = stmt.query(params_from_iter(args.iter()))?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let values = (0..width)
            .map(|i| row.get::<_, Value>(i))
            .collect::<rusqlite::Result<Vec<_>>>()?;
        out.push(values);
    }
    Ok(RowSource::new(columns, out))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(SelectParams::table("users"), r#"SELECT * FROM "users""#)]
    #[case(
        SelectParams {
            table: "users".into(),
            columns: vec!["id".into(), "name".into()],
            selection: Some("id > ?".into()),
            order_by: Some("id DESC".into()),
            limit: Some("10".into()),
            ..Default::default()
        },
        r#"SELECT id, name FROM "users" WHERE id > ? ORDER BY id DESC LIMIT 10"#
    )]
    #[case(
        SelectParams {
            table: "t".into(),
            columns: vec!["kind".into()],
            group_by: Some("kind".into()),
            having: Some("count(*) > 1".into()),
            selection: Some("  ".into()),
            ..Default::default()
        },
        r#"SELECT kind FROM "t" GROUP BY kind HAVING count(*) > 1"#
    )]
    #[case(SelectParams::table("we\"ird"), r#"SELECT * FROM "we""ird""#)]
    fn build_sql(#[case] params: SelectParams, #[case] expected: &str) {
        assert_eq!(params.to_sql(), expected);
    }

    #[rstest]
    #[case(None, "")]
    #[case(Some(""), "")]
    #[case(Some("   "), "")]
    #[case(Some("id = ?"), " WHERE id = ?")]
    fn build_where_suffix(#[case] clause: Option<&str>, #[case] expected: &str) {
        assert_eq!(where_suffix(clause), expected);
    }
}
