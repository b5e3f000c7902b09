//! Draft session: staged edits and pending new rows
//!
//! All edits are staged here and only reach the row store through an
//! all-or-nothing [`DraftSession::save_all`]. Cancelling discards every
//! staged value without touching the store.

use crate::error::{Error, Result};
use crate::row::{new_row_id, Row, RowStore};
use crate::schema::SchemaRegistry;
use crate::value::{cast, validate};
use std::collections::BTreeMap;

/// Staged state for one row
#[derive(Debug, Clone, Default)]
pub struct RowDraft {
    /// Pending textual value per field; presence of a field means that
    /// cell is currently in edit mode
    pub fields: BTreeMap<String, String>,
    /// True for rows that do not exist in the store yet
    pub is_new: bool,
    /// Staging order, newest highest
    seq: u64,
}

/// Tracks all in-flight edits until commit or cancel
#[derive(Debug, Clone, Default)]
pub struct DraftSession {
    drafts: BTreeMap<String, RowDraft>,
    next_seq: u64,
}

impl DraftSession {
    /// Create an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin editing a cell, seeding the draft with the cell's current
    /// display text. Refused (returns false) for non-editable columns.
    pub fn start_edit(
        &mut self,
        schema: &SchemaRegistry,
        id: &str,
        field: &str,
        current_text: String,
    ) -> bool {
        match schema.find(field) {
            Some(col) if col.editable => {}
            _ => return false,
        }
        let seq = self.bump_seq();
        let draft = self.drafts.entry(id.to_string()).or_insert_with(|| RowDraft {
            seq,
            ..RowDraft::default()
        });
        draft.fields.entry(field.to_string()).or_insert(current_text);
        true
    }

    /// Overwrite a staged value (keystroke). Creates the entry if the
    /// cell was not already in edit mode.
    pub fn set_value(&mut self, id: &str, field: &str, text: String) {
        let seq = self.bump_seq();
        let draft = self.drafts.entry(id.to_string()).or_insert_with(|| RowDraft {
            seq,
            ..RowDraft::default()
        });
        draft.fields.insert(field.to_string(), text);
    }

    /// Stage a brand-new row: every currently visible column gets an
    /// empty draft, so the whole row starts in edit mode. Returns the
    /// new pending identity.
    pub fn add_row(&mut self, schema: &SchemaRegistry) -> String {
        let id = new_row_id();
        let mut fields = BTreeMap::new();
        for col in schema.visible_columns() {
            fields.insert(col.field.clone(), String::new());
        }
        let seq = self.bump_seq();
        self.drafts.insert(
            id.clone(),
            RowDraft {
                fields,
                is_new: true,
                seq,
            },
        );
        tracing::debug!(id = %id, "staged new row");
        id
    }

    /// Whether a cell is currently in edit mode
    pub fn is_editing(&self, id: &str, field: &str) -> bool {
        self.drafts
            .get(id)
            .is_some_and(|d| d.fields.contains_key(field))
    }

    /// Staged text for a cell, if any
    pub fn draft_text(&self, id: &str, field: &str) -> Option<&str> {
        self.drafts
            .get(id)
            .and_then(|d| d.fields.get(field))
            .map(String::as_str)
    }

    /// Whether this id is a staged row not yet in the store
    pub fn is_pending_new(&self, id: &str) -> bool {
        self.drafts.get(id).is_some_and(|d| d.is_new)
    }

    /// Ids of pending new rows, most recently staged first
    pub fn pending_new_ids(&self) -> Vec<&str> {
        let mut ids: Vec<(&str, u64)> = self
            .drafts
            .iter()
            .filter(|(_, d)| d.is_new)
            .map(|(id, d)| (id.as_str(), d.seq))
            .collect();
        ids.sort_by(|a, b| b.1.cmp(&a.1));
        ids.into_iter().map(|(id, _)| id).collect()
    }

    /// Whether anything is staged
    pub fn is_active(&self) -> bool {
        !self.drafts.is_empty()
    }

    /// Number of rows with staged drafts
    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    /// Whether the session has no drafts
    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }

    /// Commit every staged draft into the row store, atomically.
    ///
    /// First validates every non-empty draft value; any failure aborts
    /// the whole commit with the offending column's header and leaves
    /// every draft staged and the store untouched. On success, pending
    /// new rows are synthesized from visible columns (missing fields
    /// default to empty) and inserted; existing rows get each touched
    /// cell coerced and written. All draft state is then cleared.
    pub fn save_all(&mut self, schema: &SchemaRegistry, store: &mut RowStore) -> Result<()> {
        for draft in self.drafts.values() {
            for (field, text) in &draft.fields {
                if text.is_empty() {
                    continue;
                }
                if let Some(col) = schema.find(field) {
                    if !validate(col.r#type, text) {
                        return Err(Error::ValidationFailure {
                            column: col.header_name.clone(),
                        });
                    }
                }
            }
        }

        for (id, draft) in &self.drafts {
            if draft.is_new {
                let mut row = Row::with_id(id.clone());
                for col in schema.visible_columns() {
                    let raw = draft.fields.get(&col.field).map(String::as_str).unwrap_or("");
                    row.set(col.field.clone(), cast(col.r#type, raw));
                }
                store.insert(row);
            } else {
                for (field, text) in &draft.fields {
                    let value = match schema.find(field) {
                        Some(col) => cast(col.r#type, text),
                        None => cast(crate::value::ColumnType::String, text),
                    };
                    store.update_cell(id, field, value);
                }
            }
        }

        tracing::info!(rows = self.drafts.len(), "committed drafts");
        self.drafts.clear();
        Ok(())
    }

    /// Drop every staged value for one row (row deletion)
    pub fn discard_row(&mut self, id: &str) {
        self.drafts.remove(id);
    }

    /// Discard all staged drafts and pending rows; the store is untouched
    pub fn cancel_all(&mut self) {
        self.drafts.clear();
    }

    fn bump_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{ColumnType, Value};

    fn test_schema() -> SchemaRegistry {
        let mut schema = SchemaRegistry::new();
        schema
            .add_column(Some("Name"), None, ColumnType::String)
            .unwrap();
        schema
            .add_column(Some("Email"), None, ColumnType::Email)
            .unwrap();
        schema
            .add_column(Some("Age"), None, ColumnType::Number)
            .unwrap();
        schema
    }

    #[test]
    fn test_add_row_stages_all_visible_fields() {
        let schema = test_schema();
        let mut session = DraftSession::new();
        let id = session.add_row(&schema);

        assert!(session.is_pending_new(&id));
        assert!(session.is_editing(&id, "name"));
        assert!(session.is_editing(&id, "email"));
        assert!(session.is_editing(&id, "age"));
        assert_eq!(session.draft_text(&id, "name"), Some(""));
    }

    #[test]
    fn test_add_row_skips_hidden_columns() {
        let mut schema = test_schema();
        schema.set_visibility("email", false);
        let mut session = DraftSession::new();
        let id = session.add_row(&schema);

        assert!(!session.is_editing(&id, "email"));
        assert!(session.is_editing(&id, "name"));
    }

    #[test]
    fn test_start_edit_seeds_current_text() {
        let schema = test_schema();
        let mut session = DraftSession::new();
        assert!(session.start_edit(&schema, "r1", "name", "Aarav".to_string()));
        assert_eq!(session.draft_text("r1", "name"), Some("Aarav"));

        // unknown columns are refused
        assert!(!session.start_edit(&schema, "r1", "missing", String::new()));
        assert!(!session.is_editing("r1", "missing"));
    }

    #[test]
    fn test_save_all_commits_new_row() {
        let schema = test_schema();
        let mut store = RowStore::new();
        let mut session = DraftSession::new();

        let id = session.add_row(&schema);
        session.set_value(&id, "name", "Priya Iyer".to_string());
        session.set_value(&id, "age", "24".to_string());

        session.save_all(&schema, &mut store).unwrap();

        assert!(session.is_empty());
        let row = store.find(&id).unwrap();
        assert_eq!(row.get("name"), &Value::Text("Priya Iyer".to_string()));
        assert_eq!(row.get("age"), &Value::Number(24.0));
        // untouched visible field committed as empty
        assert_eq!(row.get("email"), &Value::Empty);
    }

    #[test]
    fn test_save_all_updates_existing_row() {
        let schema = test_schema();
        let mut store = RowStore::new();
        let mut row = Row::new();
        let id = row.id.clone();
        row.set("name", Value::Text("Rahul".to_string()));
        store.insert(row);

        let mut session = DraftSession::new();
        session.start_edit(&schema, &id, "name", "Rahul".to_string());
        session.set_value(&id, "name", "Rahul Gupta".to_string());
        session.save_all(&schema, &mut store).unwrap();

        assert_eq!(
            store.find(&id).unwrap().get("name"),
            &Value::Text("Rahul Gupta".to_string())
        );
    }

    #[test]
    fn test_save_all_is_atomic_on_validation_failure() {
        let schema = test_schema();
        let mut store = RowStore::new();
        let mut session = DraftSession::new();

        let good = session.add_row(&schema);
        session.set_value(&good, "name", "Neha".to_string());
        let bad = session.add_row(&schema);
        session.set_value(&bad, "age", "not a number".to_string());

        let before = store.clone();
        let err = session.save_all(&schema, &mut store).unwrap_err();

        assert!(matches!(err, Error::ValidationFailure { column } if column == "Age"));
        assert_eq!(store, before);
        // everything stays staged for the user to fix
        assert_eq!(session.len(), 2);
        assert!(session.is_pending_new(&good));
    }

    #[test]
    fn test_empty_draft_values_skip_validation() {
        let schema = test_schema();
        let mut store = RowStore::new();
        let mut session = DraftSession::new();

        // an empty age is accepted even though "" is not a number
        let id = session.add_row(&schema);
        session.set_value(&id, "age", String::new());
        session.save_all(&schema, &mut store).unwrap();

        assert_eq!(store.find(&id).unwrap().get("age"), &Value::Empty);
    }

    #[test]
    fn test_cancel_all_discards_everything() {
        let schema = test_schema();
        let mut store = RowStore::new();
        let mut session = DraftSession::new();

        session.add_row(&schema);
        session.set_value("existing", "name", "changed".to_string());
        session.cancel_all();

        assert!(session.is_empty());
        assert_eq!(session.pending_new_ids().len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_pending_new_ids_newest_first() {
        let schema = test_schema();
        let mut session = DraftSession::new();
        let first = session.add_row(&schema);
        let second = session.add_row(&schema);

        let pending = session.pending_new_ids();
        assert_eq!(pending, vec![second.as_str(), first.as_str()]);
    }
}
