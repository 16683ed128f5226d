// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Type-directed decoding of stored values.

use chrono::NaiveDateTime;
use rusqlite::types::Value;

use crate::column::{Column, ColumnType};
use crate::cursor::RowSource;
use crate::dates::DateFormat;
use crate::error::{Error, Result};

/// A stored value decoded according to its column's semantic type.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Integer(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    Blob(Vec<u8>),
    /// `None` when the stored text did not match the date format
    Date(Option<NaiveDateTime>),
    Boolean(bool),
}

impl FieldValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "NULL",
            Self::Integer(_) => "INTEGER",
            Self::Long(_) => "LONG",
            Self::Float(_) => "FLOAT",
            Self::Double(_) => "DOUBLE",
            Self::String(_) => "STRING",
            Self::Blob(_) => "BLOB",
            Self::Date(_) => "DATE",
            Self::Boolean(_) => "BOOLEAN",
        }
    }
}

fn storage_class(value: &Value) -> &'static str {
    match value {
        Value::Null => "NULL",
        Value::Integer(_) => "INTEGER",
        Value::Real(_) => "REAL",
        Value::Text(_) => "TEXT",
        Value::Blob(_) => "BLOB",
    }
}

/// Decode column `index` of the current row as `column`'s semantic type.
///
/// SQL NULL decodes to [`FieldValue::Null`], except for DATE columns where
/// it decodes to `Date(None)` like unparsable text does.
pub fn extract(
    source: &RowSource,
    index: usize,
    column: &Column,
    dates: &DateFormat,
) -> Result<FieldValue> {
    let raw = source
        .value(index)
        .ok_or_else(|| Error::ColumnNotFound(column.name().to_string()))?;
    if let Value::Null = raw {
        return Ok(match column.kind() {
            ColumnType::Date => FieldValue::Date(None),
            _ => FieldValue::Null,
        });
    }

    let decoded = match column.kind() {
        ColumnType::Integer => source.get_int(index).map(FieldValue::Integer),
        ColumnType::Long => source.get_long(index).map(FieldValue::Long),
        ColumnType::Float => source.get_float(index).map(FieldValue::Float),
        ColumnType::Double => source.get_double(index).map(FieldValue::Double),
        ColumnType::String => source
            .get_string(index)
            .map(|s| FieldValue::String(s.to_owned())),
        ColumnType::Blob => source
            .get_blob(index)
            .map(|b| FieldValue::Blob(b.to_vec())),
        ColumnType::Boolean => source.get_long(index).map(|v| FieldValue::Boolean(v > 0)),
        ColumnType::Date => source
            .get_string(index)
            .map(|s| FieldValue::Date(dates.parse(s))),
    };

    decoded.ok_or_else(|| Error::Decode {
        column: column.name().to_string(),
        expected: column.kind(),
        found: match raw {
            Value::Integer(_) if column.kind() == ColumnType::Integer => {
                "INTEGER out of 32-bit range"
            }
            other => storage_class(other),
        },
    })
}

/// Conversion from a decoded value into an attribute's Rust type.
///
/// Returns `None` when the value cannot be held by the type.
pub trait FromField: Sized {
    fn from_field(value: FieldValue) -> Option<Self>;
}

impl FromField for i32 {
    fn from_field(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Integer(v) => Some(v),
            _ => None,
        }
    }
}

impl FromField for i64 {
    fn from_field(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Long(v) => Some(v),
            FieldValue::Integer(v) => Some(i64::from(v)),
            _ => None,
        }
    }
}

impl FromField for f32 {
    fn from_field(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Float(v) => Some(v),
            _ => None,
        }
    }
}

impl FromField for f64 {
    fn from_field(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Double(v) => Some(v),
            FieldValue::Float(v) => Some(f64::from(v)),
            _ => None,
        }
    }
}

impl FromField for bool {
    fn from_field(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Boolean(v) => Some(v),
            _ => None,
        }
    }
}

impl FromField for String {
    fn from_field(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::String(v) => Some(v),
            _ => None,
        }
    }
}

impl FromField for Vec<u8> {
    fn from_field(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Blob(v) => Some(v),
            _ => None,
        }
    }
}

impl FromField for NaiveDateTime {
    fn from_field(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Date(v) => v,
            _ => None,
        }
    }
}

impl<T: FromField> FromField for Option<T> {
    fn from_field(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Null | FieldValue::Date(None) => Some(None),
            other => T::from_field(other).map(Some),
        }
    }
}
