// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Date-time text format used for DATE columns.

use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{Local, NaiveDate, NaiveDateTime, TimeDelta};

use crate::error::{Error, Result};

/// Default format of DATE columns in the store.
pub const STORE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A validated strftime-style pattern for DATE columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormat(String);

impl DateFormat {
    /// Validate a strftime pattern.
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        if StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error)) {
            return Err(Error::InvalidDateFormat(pattern));
        }
        Ok(Self(pattern))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse stored text, returning `None` when it does not match.
    ///
    /// Date-only patterns parse to midnight.
    pub fn parse(&self, text: &str) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(text, &self.0)
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(text, &self.0)
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            })
    }

    /// Format a timestamp for storage.
    pub fn format(&self, value: &NaiveDateTime) -> Result<String> {
        let mut out = String::new();
        // Patterns needing an offset (%z, %Z) fail on naive timestamps
        write!(out, "{}", value.format(&self.0))
            .map_err(|_| Error::InvalidDateFormat(self.0.clone()))?;
        Ok(out)
    }

    /// Current local time as stored text.
    pub fn current_time(&self) -> Result<String> {
        self.format(&Local::now().naive_local())
    }

    /// Local time shifted by `delta` as stored text.
    pub fn time_delta(&self, delta: TimeDelta) -> Result<String> {
        self.format(&(Local::now().naive_local() + delta))
    }
}

impl Default for DateFormat {
    fn default() -> Self {
        Self(STORE_DATE_FORMAT.to_string())
    }
}
