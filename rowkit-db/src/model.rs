// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Model contract and attribute binding tables.
//!
//! A model declares its columns and an explicit table of how each attribute
//! receives a decoded value: through a setter or by direct field access.
//! Both column names and attribute names are reduced to the same lookup
//! key (lowerCamelCase), so `created_at`, `createdAt`-style keys and Rust
//! `snake_case` field names all meet.
//!
//! # Example
//!
//! ```
//! use rowkit_db::{Bindings, Column, Model};
//!
//! #[derive(Debug, Default)]
//! struct User {
//!     id: i32,
//!     name: String,
//!     active: bool,
//! }
//!
//! impl User {
//!     fn set_active(&mut self, active: bool) {
//!         self.active = active;
//!     }
//! }
//!
//! static USER_COLUMNS: [Column; 3] = [
//!     Column::integer("id"),
//!     Column::string("name"),
//!     Column::boolean("active"),
//! ];
//!
//! impl Model for User {
//!     fn columns() -> &'static [Column] {
//!         &USER_COLUMNS
//!     }
//!
//!     fn bindings() -> Bindings<Self> {
//!         Bindings::new()
//!             .field("id", |u: &mut User| &mut u.id)
//!             .field("name", |u: &mut User| &mut u.name)
//!             .setter("active", User::set_active)
//!     }
//! }
//! ```

use std::collections::HashMap;
use std::fmt;

use crate::column::Column;
use crate::extract::{FieldValue, FromField};
use crate::naming::to_lower_camel_case;

/// A type that can be built from a result row.
///
/// `Default` is the no-argument constructor used for every row.
pub trait Model: Default + Sized + 'static {
    /// Ordered column descriptors.
    fn columns() -> &'static [Column];

    /// Attribute binding table, resolved once per mapper.
    fn bindings() -> Bindings<Self>;
}

/// Assigns a decoded value, returning `None` when the attribute type cannot
/// hold it.
pub(crate) type Assign<M> = Box<dyn Fn(&mut M, FieldValue) -> Option<()>>;

/// Lookup key shared by column names and attribute names.
pub fn attribute_key(name: &str) -> String {
    to_lower_camel_case(name)
}

/// Setter and field bindings of a model, keyed by attribute key.
pub struct Bindings<M> {
    setters: HashMap<String, Assign<M>>,
    fields: HashMap<String, Assign<M>>,
}

impl<M: 'static> Bindings<M> {
    pub fn new() -> Self {
        Self {
            setters: HashMap::new(),
            fields: HashMap::new(),
        }
    }

    /// Bind an attribute to a setter taking the attribute's type.
    pub fn setter<T, F>(mut self, attribute: &str, set: F) -> Self
    where
        T: FromField + 'static,
        F: Fn(&mut M, T) + 'static,
    {
        self.setters.insert(
            attribute_key(attribute),
            Box::new(move |model: &mut M, value: FieldValue| {
                set(model, T::from_field(value)?);
                Some(())
            }),
        );
        self
    }

    /// Bind an attribute to direct field access.
    pub fn field<T, F>(mut self, attribute: &str, access: F) -> Self
    where
        T: FromField + 'static,
        F: for<'a> Fn(&'a mut M) -> &'a mut T + 'static,
    {
        self.fields.insert(
            attribute_key(attribute),
            Box::new(move |model: &mut M, value: FieldValue| {
                *access(model) = T::from_field(value)?;
                Some(())
            }),
        );
        self
    }

    /// Setter first, then field.
    pub(crate) fn resolve(&self, key: &str) -> Option<&Assign<M>> {
        self.setters.get(key).or_else(|| self.fields.get(key))
    }

    pub fn len(&self) -> usize {
        self.setters
            .keys()
            .chain(self.fields.keys().filter(|k| !self.setters.contains_key(*k)))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.setters.is_empty() && self.fields.is_empty()
    }
}

impl<M: 'static> Default for Bindings<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> fmt::Debug for Bindings<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bindings")
            .field("setters", &self.setters.keys().collect::<Vec<_>>())
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Probe {
        created_at: i64,
        label: String,
        setter_calls: u32,
    }

    impl Probe {
        fn set_label(&mut self, label: String) {
            self.label = label.to_uppercase();
            self.setter_calls += 1;
        }
    }

    fn bindings() -> Bindings<Probe> {
        Bindings::new()
            .field("created_at", |p: &mut Probe| &mut p.created_at)
            .field("label", |p: &mut Probe| &mut p.label)
            .setter("label", Probe::set_label)
    }

    #[test]
    fn test_keys_follow_naming_convention() {
        let b = bindings();
        assert!(b.resolve("createdAt").is_some());
        assert!(b.resolve("created_at").is_none());
        assert_eq!(b.len(), 2);
    }

    #[test]
    fn test_setter_wins_over_field() {
        let b = bindings();
        let mut probe = Probe::default();
        let assign = b.resolve("label").unwrap();
        assert_eq!(assign(&mut probe, FieldValue::String("ann".into())), Some(()));
        assert_eq!(probe.label, "ANN");
        assert_eq!(probe.setter_calls, 1);
    }

    #[test]
    fn test_type_mismatch_reports_none() {
        let b = bindings();
        let mut probe = Probe::default();
        let assign = b.resolve("createdAt").unwrap();
        assert_eq!(assign(&mut probe, FieldValue::String("x".into())), None);
        assert_eq!(assign(&mut probe, FieldValue::Integer(9)), Some(()));
        assert_eq!(probe.created_at, 9);
    }
}
