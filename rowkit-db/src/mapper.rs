// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Row-to-model mapping.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::cursor::RowSource;
use crate::dates::DateFormat;
use crate::error::{Error, Result};
use crate::extract::{FieldValue, extract};
use crate::model::{Bindings, Model, attribute_key};

/// What to do with a declared column that has no bound attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnmappedColumns {
    /// Leave the attribute at its default and continue
    #[default]
    Skip,
    /// Fail the mapping with [`Error::NoSuchAttribute`]
    Fail,
}

/// Mapper settings, usually derived from the store configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapperOptions {
    pub date_format: DateFormat,
    pub unmapped_columns: UnmappedColumns,
}

/// Maps result rows to instances of `M`.
///
/// The binding table is resolved once on construction; reuse the mapper
/// for every result set of the same model.
pub struct RowMapper<M: Model> {
    bindings: Bindings<M>,
    keys: Vec<String>,
    options: MapperOptions,
}

impl<M: Model> RowMapper<M> {
    pub fn new() -> Self {
        Self::with_options(MapperOptions::default())
    }

    pub fn with_options(options: MapperOptions) -> Self {
        let keys = M::columns()
            .iter()
            .map(|column| attribute_key(column.name()))
            .collect();
        Self {
            bindings: M::bindings(),
            keys,
            options,
        }
    }

    pub fn options(&self) -> &MapperOptions {
        &self.options
    }

    /// Map every row, in row order.
    ///
    /// The source is left positioned on its first row, also when mapping
    /// fails.
    pub fn map(&self, source: &mut RowSource) -> Result<Vec<M>> {
        let mut models = Vec::with_capacity(source.count());
        if source.move_to_first() {
            let outcome = self.map_rows(source, &mut models);
            source.move_to_first();
            outcome?;
        }
        trace!("Mapped {} rows", models.len());
        Ok(models)
    }

    /// Map only the first row.
    pub fn map_first(&self, source: &mut RowSource) -> Result<Option<M>> {
        if !source.move_to_first() {
            return Ok(None);
        }
        let indexes = self.column_indexes(source)?;
        self.create_model(source, &indexes).map(Some)
    }

    fn map_rows(&self, source: &mut RowSource, models: &mut Vec<M>) -> Result<()> {
        let indexes = self.column_indexes(source)?;
        loop {
            models.push(self.create_model(source, &indexes)?);
            if !source.move_to_next() {
                return Ok(());
            }
        }
    }

    /// Result-set index of every bound column; `None` for unbound ones,
    /// which the result set need not carry.
    fn column_indexes(&self, source: &RowSource) -> Result<Vec<Option<usize>>> {
        M::columns()
            .iter()
            .zip(&self.keys)
            .map(|(column, key)| {
                if self.bindings.resolve(key).is_none() {
                    return Ok(None);
                }
                source
                    .column_index(column.name())
                    .map(Some)
                    .ok_or_else(|| Error::ColumnNotFound(column.name().to_string()))
            })
            .collect()
    }

    fn create_model(&self, source: &RowSource, indexes: &[Option<usize>]) -> Result<M> {
        let mut model = M::default();
        for ((column, key), index) in M::columns().iter().zip(&self.keys).zip(indexes) {
            let (Some(assign), Some(index)) = (self.bindings.resolve(key), *index) else {
                match self.options.unmapped_columns {
                    UnmappedColumns::Skip => continue,
                    UnmappedColumns::Fail => {
                        return Err(Error::NoSuchAttribute {
                            column: column.name().to_string(),
                            attribute: key.clone(),
                        });
                    }
                }
            };

            let value = extract(source, index, column, &self.options.date_format)?;
            let found = value.type_name();
            let unparsed_date = value == FieldValue::Date(None);
            if assign(&mut model, value).is_none() {
                // A date that does not parse leaves a non-optional attribute at its default
                if unparsed_date {
                    continue;
                }
                return Err(Error::AttributeType {
                    column: column.name().to_string(),
                    attribute: key.clone(),
                    found,
                });
            }
        }
        Ok(model)
    }
}

impl<M: Model> Default for RowMapper<M> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};
    use rusqlite::types::Value;

    use super::*;
    use crate::column::Column;

    #[derive(Debug, Default, PartialEq)]
    struct Event {
        event_id: i64,
        title: String,
        starts_at: Option<NaiveDateTime>,
        payload: Vec<u8>,
        weight: f32,
        archived: bool,
        note: Option<String>,
    }

    impl Event {
        fn set_title(&mut self, title: String) {
            self.title = title;
        }
    }

    static EVENT_COLUMNS: [Column; 8] = [
        Column::long("event_id"),
        Column::string("title"),
        Column::date("starts_at"),
        Column::blob("payload"),
        Column::float("weight"),
        Column::boolean("archived"),
        Column::string("note"),
        Column::string("legacy_code"),
    ];

    impl Model for Event {
        fn columns() -> &'static [Column] {
            &EVENT_COLUMNS
        }

        fn bindings() -> Bindings<Self> {
            Bindings::new()
                .field("event_id", |e: &mut Event| &mut e.event_id)
                .setter("title", Event::set_title)
                .field("starts_at", |e: &mut Event| &mut e.starts_at)
                .field("payload", |e: &mut Event| &mut e.payload)
                .field("weight", |e: &mut Event| &mut e.weight)
                .field("archived", |e: &mut Event| &mut e.archived)
                .field("note", |e: &mut Event| &mut e.note)
        }
    }

    fn columns() -> Vec<String> {
        EVENT_COLUMNS.iter().map(|c| c.name().to_string()).collect()
    }

    fn row(id: i64, title: &str, starts_at: &str, note: Option<&str>) -> Vec<Value> {
        vec![
            Value::Integer(id),
            Value::Text(title.into()),
            Value::Text(starts_at.into()),
            Value::Blob(vec![id as u8]),
            Value::Real(0.25),
            Value::Integer(id % 2),
            note.map_or(Value::Null, |n| Value::Text(n.into())),
            Value::Text("L".into()),
        ]
    }

    #[test]
    fn test_maps_rows_in_order() {
        let mut source = RowSource::new(
            columns(),
            vec![
                row(3, "third", "2021-05-06 07:08:09", Some("n")),
                row(1, "first", "bogus", None),
                row(2, "second", "2021-01-01 00:00:00", None),
            ],
        );

        let events = RowMapper::<Event>::new().map(&mut source).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(
            events.iter().map(|e| e.event_id).collect::<Vec<_>>(),
            [3, 1, 2]
        );
        assert_eq!(
            events[0],
            Event {
                event_id: 3,
                title: "third".into(),
                starts_at: NaiveDate::from_ymd_opt(2021, 5, 6).and_then(|d| d.and_hms_opt(7, 8, 9)),
                payload: vec![3],
                weight: 0.25,
                archived: true,
                note: Some("n".into()),
            }
        );
        // Unparsable dates degrade to None without failing the row
        assert_eq!(events[1].starts_at, None);
        assert!(events[1].archived);
        assert!(!events[2].archived);
        assert_eq!(events[2].note, None);
        assert_eq!(source.position(), Some(0));
    }

    #[test]
    fn test_empty_source_maps_to_nothing() {
        let mut source = RowSource::new(columns(), Vec::new());
        let events = RowMapper::<Event>::new().map(&mut source).unwrap();
        assert!(events.is_empty());
        assert!(
            RowMapper::<Event>::new()
                .map_first(&mut source)
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_unmapped_column_policy() {
        let mut source = RowSource::new(columns(), vec![row(1, "a", "", None)]);
        let strict = RowMapper::<Event>::with_options(MapperOptions {
            unmapped_columns: UnmappedColumns::Fail,
            ..Default::default()
        });
        match strict.map(&mut source) {
            Err(Error::NoSuchAttribute { column, attribute }) => {
                assert_eq!(column, "legacy_code");
                assert_eq!(attribute, "legacyCode");
            }
            other => panic!("expected NoSuchAttribute, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_result_column() {
        let mut names = columns();
        names[1] = "headline".into();
        let mut source = RowSource::new(names, vec![row(1, "a", "", None)]);
        assert!(matches!(
            RowMapper::<Event>::new().map(&mut source),
            Err(Error::ColumnNotFound(c)) if c == "title"
        ));
    }

    #[test]
    fn test_null_into_required_attribute() {
        let mut values = row(1, "a", "", None);
        values[1] = Value::Null;
        let mut source = RowSource::new(columns(), vec![values]);
        assert!(matches!(
            RowMapper::<Event>::new().map(&mut source),
            Err(Error::AttributeType { attribute, found: "NULL", .. }) if attribute == "title"
        ));
    }

    #[test]
    fn test_unbound_column_absent_from_result() {
        let mut names = columns();
        names.pop();
        let mut values = row(4, "no legacy", "", None);
        values.pop();
        let mut source = RowSource::new(names, vec![values]);

        let events = RowMapper::<Event>::new().map(&mut source).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "no legacy");

        let strict = RowMapper::<Event>::with_options(MapperOptions {
            unmapped_columns: UnmappedColumns::Fail,
            ..Default::default()
        });
        assert!(matches!(
            strict.map(&mut source),
            Err(Error::NoSuchAttribute { column, .. }) if column == "legacy_code"
        ));
    }

    #[test]
    fn test_failed_map_restores_position() {
        let mut broken = row(2, "b", "", None);
        broken[1] = Value::Null;
        let mut source = RowSource::new(
            columns(),
            vec![row(1, "a", "", None), broken, row(3, "c", "", None)],
        );
        assert!(RowMapper::<Event>::new().map(&mut source).is_err());
        assert_eq!(source.position(), Some(0));
    }

    #[derive(Debug, Default, PartialEq)]
    struct Stamped {
        at: NaiveDateTime,
    }

    static STAMPED_COLUMNS: [Column; 1] = [Column::date("at")];

    impl Model for Stamped {
        fn columns() -> &'static [Column] {
            &STAMPED_COLUMNS
        }

        fn bindings() -> Bindings<Self> {
            Bindings::new().field("at", |s: &mut Stamped| &mut s.at)
        }
    }

    #[test]
    fn test_unparsable_date_keeps_required_default() {
        let mut source = RowSource::new(
            vec!["at".into()],
            vec![
                vec![Value::Text("bogus".into())],
                vec![Value::Text("2021-05-06 07:08:09".into())],
                vec![Value::Null],
            ],
        );
        let stamps = RowMapper::<Stamped>::new().map(&mut source).unwrap();
        assert_eq!(stamps[0], Stamped::default());
        assert_eq!(
            Some(stamps[1].at),
            NaiveDate::from_ymd_opt(2021, 5, 6).and_then(|d| d.and_hms_opt(7, 8, 9))
        );
        assert_eq!(stamps[2], Stamped::default());
    }
}
