// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Versioned SQLite store with transactional CRUD and row-to-model mapping.
//!
//! **Architecture**: a [`DbHelper`] owns the store file, its version and the
//! one-time table creation script. A [`DbManager`] holds one open handle and
//! runs every write in its own transaction, turning expected engine failures
//! into [`Error::Storage`] values. Selects return an owned [`RowSource`],
//! which a [`RowMapper`] converts into typed [`Model`] instances.
//!
//! # Example
//!
//! ```ignore
//! use rowkit_db::{DbHelper, DbManager, OpenMode, RowMapper, RowValues, SelectParams};
//!
//! let helper = DbHelper::new("/var/lib/app", "app.db", TABLES);
//! let mut db = DbManager::new(helper);
//! db.open(OpenMode::ReadWrite)?;
//!
//! db.insert("users", &RowValues::new().with("id", 1).with("name", "Ann".to_string()))?;
//!
//! let mut rows = db.select(&SelectParams::table("users"))?;
//! let users: Vec<User> = RowMapper::new().map(&mut rows)?;
//! ```

mod column;
mod config;
mod connection;
mod cursor;
mod dates;
mod error;
mod extract;
mod mapper;
mod model;
pub mod naming;
mod query;
mod schema;
mod values;
mod write;

pub use column::{Column, ColumnType};
pub use config::StoreConfig;
pub use connection::{DbManager, OpenMode};
pub use cursor::RowSource;
pub use dates::{DateFormat, STORE_DATE_FORMAT};
pub use error::{Error, FailureReason, Operation, Result, StorageFailure};
pub use extract::{FieldValue, FromField, extract};
pub use mapper::{MapperOptions, RowMapper, UnmappedColumns};
pub use model::{Bindings, Model, attribute_key};
pub use query::SelectParams;
pub use schema::{DbHelper, Schema, SchemaCreation};
pub use values::RowValues;

/// Value type bound into statements and stored in result rows.
pub use rusqlite::types::Value;
