// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Store configuration loaded from TOML.

use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dates::{DateFormat, STORE_DATE_FORMAT};
use crate::error::{Error, Result};
use crate::mapper::{MapperOptions, UnmappedColumns};

fn default_directory() -> PathBuf {
    PathBuf::from(".")
}

fn default_name() -> String {
    "rowkit.db".into()
}

fn default_version() -> u32 {
    1
}

fn default_date_format() -> String {
    STORE_DATE_FORMAT.into()
}

fn default_foreign_keys() -> bool {
    true
}

fn default_log_level() -> String {
    "info".into()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Directory holding the store file
    #[serde(default = "default_directory")]
    pub directory: PathBuf,

    /// Store file name
    #[serde(default = "default_name")]
    pub name: String,

    /// Schema version, at least 1
    #[serde(default = "default_version")]
    pub version: u32,

    /// strftime pattern of DATE columns
    #[serde(default = "default_date_format")]
    pub date_format: String,

    #[serde(default)]
    pub unmapped_columns: UnmappedColumns,

    /// Enforce foreign keys on writable handles
    #[serde(default = "default_foreign_keys")]
    pub foreign_keys: bool,

    /// Default log filter for binaries
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Table creation statements, run once when the store is created
    #[serde(default)]
    pub schema: Vec<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            name: default_name(),
            version: default_version(),
            date_format: default_date_format(),
            unmapped_columns: UnmappedColumns::default(),
            foreign_keys: default_foreign_keys(),
            log_level: default_log_level(),
            schema: Vec::new(),
        }
    }
}

impl StoreConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = read_to_string(path).map_err(|e| Error::ConfigRead {
            path: path.to_owned(),
            source: e,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.version == 0 {
            return Err(Error::InvalidVersion(self.version));
        }
        DateFormat::new(self.date_format.as_str())?;
        Ok(())
    }

    /// Full path of the store file.
    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.name)
    }

    pub fn mapper_options(&self) -> Result<MapperOptions> {
        Ok(MapperOptions {
            date_format: DateFormat::new(self.date_format.as_str())?,
            unmapped_columns: self.unmapped_columns,
        })
    }
}
