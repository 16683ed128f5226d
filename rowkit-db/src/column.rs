// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Column descriptors declared by mapped models.

use std::fmt;

/// Semantic type of a mapped column.
///
/// Selects how the value extractor decodes the stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    /// 32-bit signed integer
    Integer,
    /// 64-bit signed integer
    Long,
    /// Single-precision float
    Float,
    /// Double-precision float
    Double,
    /// UTF-8 text
    String,
    /// Raw bytes
    Blob,
    /// Text in the store date format
    Date,
    /// Integer, true when greater than zero
    Boolean,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Integer => "INTEGER",
            Self::Long => "LONG",
            Self::Float => "FLOAT",
            Self::Double => "DOUBLE",
            Self::String => "STRING",
            Self::Blob => "BLOB",
            Self::Date => "DATE",
            Self::Boolean => "BOOLEAN",
        })
    }
}

/// Storage name and semantic type of one mapped attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Column {
    name: &'static str,
    kind: ColumnType,
}

impl Column {
    pub const fn new(name: &'static str, kind: ColumnType) -> Self {
        Self { name, kind }
    }

    pub const fn integer(name: &'static str) -> Self {
        Self::new(name, ColumnType::Integer)
    }

    pub const fn long(name: &'static str) -> Self {
        Self::new(name, ColumnType::Long)
    }

    pub const fn float(name: &'static str) -> Self {
        Self::new(name, ColumnType::Float)
    }

    pub const fn double(name: &'static str) -> Self {
        Self::new(name, ColumnType::Double)
    }

    pub const fn string(name: &'static str) -> Self {
        Self::new(name, ColumnType::String)
    }

    pub const fn blob(name: &'static str) -> Self {
        Self::new(name, ColumnType::Blob)
    }

    pub const fn date(name: &'static str) -> Self {
        Self::new(name, ColumnType::Date)
    }

    pub const fn boolean(name: &'static str) -> Self {
        Self::new(name, ColumnType::Boolean)
    }

    /// Column name as stored.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Declared semantic type.
    pub const fn kind(&self) -> ColumnType {
        self.kind
    }
}
