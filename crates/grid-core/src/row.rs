//! Rows and the row store

use crate::schema::ID_FIELD;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Generate a fresh opaque row identity
pub fn new_row_id() -> String {
    Uuid::new_v4().to_string()
}

/// A data row: an opaque identity plus an open field→value mapping.
/// A row need not carry a value for every declared column; missing
/// fields read as empty downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Unique, immutable identity token
    pub id: String,
    /// Values keyed by column field
    pub values: BTreeMap<String, Value>,
}

impl Row {
    /// Create an empty row with a fresh identity
    pub fn new() -> Self {
        Self::with_id(new_row_id())
    }

    /// Create an empty row with a given identity
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            values: BTreeMap::new(),
        }
    }

    /// Value for a field; missing fields read as `Empty`
    pub fn get(&self, field: &str) -> &Value {
        self.values.get(field).unwrap_or(&Value::Empty)
    }

    /// Set a field's value (identity is not a data field)
    pub fn set(&mut self, field: impl Into<String>, value: Value) {
        let field = field.into();
        if field != ID_FIELD {
            self.values.insert(field, value);
        }
    }
}

impl Default for Row {
    fn default() -> Self {
        Self::new()
    }
}

/// Owner of all committed rows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowStore {
    rows: Vec<Row>,
}

impl RowStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from pre-made rows (demo/seed data)
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Insert a row at the front, so recent additions list first
    pub fn insert(&mut self, row: Row) {
        self.rows.insert(0, row);
    }

    /// Remove a row by id; unknown ids are a no-op
    pub fn delete(&mut self, id: &str) {
        self.rows.retain(|r| r.id != id);
    }

    /// Replace the whole collection (import)
    pub fn replace_all(&mut self, rows: Vec<Row>) {
        self.rows = rows;
    }

    /// Write a single cell verbatim; the caller coerces beforehand.
    /// Unknown ids are a no-op.
    pub fn update_cell(&mut self, id: &str, field: &str, value: Value) {
        if let Some(row) = self.rows.iter_mut().find(|r| r.id == id) {
            row.set(field, value);
        }
    }

    /// All rows in storage order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Find a row by id
    pub fn find(&self, id: &str) -> Option<&Row> {
        self.rows.iter().find(|r| r.id == id)
    }

    /// Whether a row with this id exists
    pub fn contains(&self, id: &str) -> bool {
        self.rows.iter().any(|r| r.id == id)
    }

    /// Number of committed rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the store has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_row_ids_are_unique_and_non_empty() {
        let a = Row::new();
        let b = Row::new();
        assert!(!a.id.is_empty());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_insert_prepends() {
        let mut store = RowStore::new();
        let first = Row::new();
        let second = Row::new();
        let second_id = second.id.clone();

        store.insert(first);
        store.insert(second);

        assert_eq!(store.rows()[0].id, second_id);
    }

    #[test]
    fn test_delete_unknown_id_is_noop() {
        let mut store = RowStore::new();
        store.insert(Row::new());
        store.delete("no-such-id");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_update_cell() {
        let mut store = RowStore::new();
        let row = Row::new();
        let id = row.id.clone();
        store.insert(row);

        store.update_cell(&id, "name", Value::Text("Neha".to_string()));
        assert_eq!(
            store.find(&id).unwrap().get("name"),
            &Value::Text("Neha".to_string())
        );

        // unknown id is a no-op
        store.update_cell("missing", "name", Value::Text("x".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_missing_field_reads_empty() {
        let row = Row::new();
        assert_eq!(row.get("anything"), &Value::Empty);
    }

    #[test]
    fn test_id_is_not_a_data_field() {
        let mut row = Row::new();
        row.set("id", Value::Text("overwrite".to_string()));
        assert_eq!(row.get("id"), &Value::Empty);
    }
}
