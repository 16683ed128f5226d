// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Positioned view over a materialised query result.

use rusqlite::types::Value;

/// Rows and column names returned by a select, with a movable position.
///
/// The position starts before the first row; `move_to_first` or
/// `move_to_next` must be called before reading. Getters return `None` when
/// the position is not on a row or the column index is out of range, and
/// also when the stored value is of another type family.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSource {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    position: Option<usize>,
}

impl RowSource {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            columns,
            rows,
            position: None,
        }
    }

    /// Number of rows.
    pub fn count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// Index of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Current row index, `None` before the first row or on an empty set.
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    pub fn move_to_first(&mut self) -> bool {
        self.move_to_position(0)
    }

    pub fn move_to_last(&mut self) -> bool {
        match self.rows.len().checked_sub(1) {
            Some(last) => self.move_to_position(last),
            None => false,
        }
    }

    /// Advance one row; returns `false` and stays put at the end.
    pub fn move_to_next(&mut self) -> bool {
        let next = self.position.map_or(0, |p| p + 1);
        self.move_to_position(next)
    }

    /// Step back one row; returns `false` and stays put at the start.
    pub fn move_to_previous(&mut self) -> bool {
        match self.position.and_then(|p| p.checked_sub(1)) {
            Some(prev) => self.move_to_position(prev),
            None => false,
        }
    }

    pub fn move_to_position(&mut self, index: usize) -> bool {
        if index < self.rows.len() {
            self.position = Some(index);
            true
        } else {
            false
        }
    }

    /// Raw value of a column in the current row.
    pub fn value(&self, index: usize) -> Option<&Value> {
        self.position
            .and_then(|p| self.rows.get(p))
            .and_then(|row| row.get(index))
    }

    pub fn is_null(&self, index: usize) -> bool {
        matches!(self.value(index), Some(Value::Null))
    }

    pub fn get_long(&self, index: usize) -> Option<i64> {
        match self.value(index)? {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// 32-bit integer; `None` when the stored value does not fit.
    pub fn get_int(&self, index: usize) -> Option<i32> {
        self.get_long(index).and_then(|v| i32::try_from(v).ok())
    }

    pub fn get_double(&self, index: usize) -> Option<f64> {
        match self.value(index)? {
            Value::Real(v) => Some(*v),
            Value::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn get_float(&self, index: usize) -> Option<f32> {
        self.get_double(index).map(|v| v as f32)
    }

    pub fn get_string(&self, index: usize) -> Option<&str> {
        match self.value(index)? {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn get_blob(&self, index: usize) -> Option<&[u8]> {
        match self.value(index)? {
            Value::Blob(v) => Some(v),
            _ => None,
        }
    }

    /// Iterate rows as slices, independent of the position.
    pub fn rows(&self) -> impl Iterator<Item = &[Value]> {
        self.rows.iter().map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RowSource {
        RowSource::new(
            vec!["id".into(), "name".into(), "score".into()],
            vec![
                vec![Value::Integer(1), Value::Text("a".into()), Value::Real(1.5)],
                vec![Value::Integer(2), Value::Null, Value::Integer(3)],
                vec![
                    Value::Integer(i64::from(i32::MAX) + 1),
                    Value::Blob(vec![1, 2]),
                    Value::Null,
                ],
            ],
        )
    }

    #[test]
    fn test_navigation() {
        let mut rows = sample();
        assert_eq!(rows.position(), None);
        assert_eq!(rows.get_long(0), None);
        assert!(!rows.move_to_previous());

        assert!(rows.move_to_next());
        assert_eq!(rows.position(), Some(0));
        assert!(rows.move_to_next());
        assert!(rows.move_to_next());
        assert!(!rows.move_to_next());
        assert_eq!(rows.position(), Some(2));

        assert!(rows.move_to_previous());
        assert_eq!(rows.position(), Some(1));
        assert!(rows.move_to_first());
        assert!(!rows.move_to_previous());
        assert!(rows.move_to_last());
        assert_eq!(rows.position(), Some(2));
        assert!(!rows.move_to_position(3));
    }

    #[test]
    fn test_typed_getters() {
        let mut rows = sample();
        assert_eq!(rows.column_index("score"), Some(2));
        assert_eq!(rows.column_index("missing"), None);

        rows.move_to_first();
        assert_eq!(rows.get_int(0), Some(1));
        assert_eq!(rows.get_string(1), Some("a"));
        assert_eq!(rows.get_double(2), Some(1.5));
        assert_eq!(rows.get_float(2), Some(1.5));
        assert_eq!(rows.get_string(0), None);
        assert_eq!(rows.get_long(9), None);

        rows.move_to_next();
        assert!(rows.is_null(1));
        assert_eq!(rows.get_double(2), Some(3.0));

        rows.move_to_next();
        assert_eq!(rows.get_int(0), None);
        assert_eq!(rows.get_long(0), Some(i64::from(i32::MAX) + 1));
        assert_eq!(rows.get_blob(1), Some(&[1u8, 2][..]));
    }

    #[test]
    fn test_empty_source() {
        let mut rows = RowSource::new(vec!["id".into()], Vec::new());
        assert!(rows.is_empty());
        assert!(!rows.move_to_first());
        assert!(!rows.move_to_next());
        assert!(!rows.move_to_last());
        assert_eq!(rows.position(), None);
    }
}
