// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Column values supplied to insert and update.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use rusqlite::types::Value;

use crate::dates::DateFormat;
use crate::error::Result;

/// Mapping from column name to the value written into it.
///
/// Columns are kept in name order so generated statements are stable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowValues {
    values: BTreeMap<String, Value>,
}

impl RowValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`RowValues::put`].
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.put(column, value);
        self
    }

    /// Set a column, replacing any previous value.
    pub fn put(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(column.into(), value.into());
    }

    /// Set a column to SQL NULL.
    pub fn put_null(&mut self, column: impl Into<String>) {
        self.values.insert(column.into(), Value::Null);
    }

    /// Set a DATE column, formatted for storage.
    pub fn put_date(
        &mut self,
        column: impl Into<String>,
        value: &NaiveDateTime,
        format: &DateFormat,
    ) -> Result<()> {
        let text = format.format(value)?;
        self.values.insert(column.into(), Value::Text(text));
        Ok(())
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    pub fn remove(&mut self, column: &str) -> Option<Value> {
        self.values.remove(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub(crate) fn values(&self) -> impl Iterator<Item = &Value> {
        self.values.values()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for RowValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Self::new();
        for (column, value) in iter {
            row.put(column, value);
        }
        row
    }
}
