//! Column definitions and the schema registry

use crate::error::{Error, Result};
use crate::value::ColumnType;
use serde::{Deserialize, Serialize};

/// Reserved per-row identity key, never a data column
pub const ID_FIELD: &str = "id";

/// Default display width for newly created columns
pub const DEFAULT_COLUMN_WIDTH: u32 = 180;

/// A column definition shared by all rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Stable lowercase/underscored identity token
    pub field: String,
    /// Display label
    pub header_name: String,
    /// Declared value type
    pub r#type: ColumnType,
    /// Whether the display layer shows this column
    pub visible: bool,
    /// Whether cells in this column accept edits
    pub editable: bool,
    /// Display width hint, ignored by core logic
    pub width: u32,
}

impl ColumnDef {
    /// Create a visible, editable column with the default width
    pub fn new(field: impl Into<String>, header_name: impl Into<String>, ty: ColumnType) -> Self {
        Self {
            field: field.into(),
            header_name: header_name.into(),
            r#type: ty,
            visible: true,
            editable: true,
            width: DEFAULT_COLUMN_WIDTH,
        }
    }
}

/// Normalize a header into a field token: trim, lowercase, collapse
/// whitespace runs into single underscores.
pub fn normalize_field(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_gap = false;
    for ch in raw.trim().chars() {
        if ch.is_whitespace() {
            in_gap = true;
            continue;
        }
        if in_gap {
            out.push('_');
            in_gap = false;
        }
        for lc in ch.to_lowercase() {
            out.push(lc);
        }
    }
    out
}

/// Derive a display header from a field token: underscores become spaces,
/// each word is title-cased.
pub fn title_case(field: &str) -> String {
    field
        .split(['_', ' '])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Ordered set of column definitions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaRegistry {
    columns: Vec<ColumnDef>,
}

impl SchemaRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from pre-made columns (demo/seed data)
    pub fn from_columns(columns: Vec<ColumnDef>) -> Self {
        Self { columns }
    }

    /// Add a column, deriving whichever of field/header is missing.
    ///
    /// With only a header, the field is the normalized header; with only
    /// a field, the header is the title-cased field. Fails without state
    /// change if the resulting field is empty, reserved, or a duplicate.
    pub fn add_column(
        &mut self,
        header_name: Option<&str>,
        field: Option<&str>,
        ty: ColumnType,
    ) -> Result<()> {
        let field = match (field, header_name) {
            (Some(f), _) => normalize_field(f),
            (None, Some(h)) => normalize_field(h),
            (None, None) => String::new(),
        };
        if field.is_empty() {
            return Err(Error::EmptyColumnName);
        }
        // the identity key is already taken by every row
        if field == ID_FIELD || self.contains(&field) {
            return Err(Error::DuplicateColumn(field));
        }

        let header_name = match header_name {
            Some(h) if !h.trim().is_empty() => h.trim().to_string(),
            _ => title_case(&field),
        };

        tracing::debug!(field = %field, ty = %ty, "adding column");
        self.columns.push(ColumnDef::new(field, header_name, ty));
        Ok(())
    }

    /// Toggle a column's visibility; unknown fields are a no-op.
    /// Hiding a column never deletes its data from existing rows.
    pub fn set_visibility(&mut self, field: &str, visible: bool) {
        if let Some(col) = self.columns.iter_mut().find(|c| c.field == field) {
            col.visible = visible;
        }
    }

    /// All columns in insertion order
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// Visible columns in insertion order
    pub fn visible_columns(&self) -> impl Iterator<Item = &ColumnDef> {
        self.columns.iter().filter(|c| c.visible)
    }

    /// Find a column by field
    pub fn find(&self, field: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.field == field)
    }

    /// Whether a field is already declared
    pub fn contains(&self, field: &str) -> bool {
        self.columns.iter().any(|c| c.field == field)
    }

    /// Number of declared columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the registry has no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_field() {
        assert_eq!(normalize_field("Full Name"), "full_name");
        assert_eq!(normalize_field("  Phone   Number "), "phone_number");
        assert_eq!(normalize_field("age"), "age");
        assert_eq!(normalize_field("   "), "");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("full_name"), "Full Name");
        assert_eq!(title_case("age"), "Age");
    }

    #[test]
    fn test_add_column_derives_field_from_header() {
        let mut schema = SchemaRegistry::new();
        schema
            .add_column(Some("Full Name"), None, ColumnType::String)
            .unwrap();
        let col = schema.find("full_name").unwrap();
        assert_eq!(col.header_name, "Full Name");
        assert!(col.visible);
        assert!(col.editable);
    }

    #[test]
    fn test_add_column_derives_header_from_field() {
        let mut schema = SchemaRegistry::new();
        schema
            .add_column(None, Some("phone_number"), ColumnType::String)
            .unwrap();
        assert_eq!(schema.find("phone_number").unwrap().header_name, "Phone Number");
    }

    #[test]
    fn test_add_duplicate_column_fails_without_change() {
        let mut schema = SchemaRegistry::new();
        schema
            .add_column(Some("Name"), None, ColumnType::String)
            .unwrap();
        let before = schema.len();

        // "  name " normalizes to the existing field
        let err = schema
            .add_column(Some("  Name "), None, ColumnType::Number)
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateColumn(f) if f == "name"));
        assert_eq!(schema.len(), before);
    }

    #[test]
    fn test_add_empty_or_reserved_name_fails() {
        let mut schema = SchemaRegistry::new();
        assert!(matches!(
            schema.add_column(Some("   "), None, ColumnType::String),
            Err(Error::EmptyColumnName)
        ));
        // the reserved identity key collides with every row's id
        assert!(matches!(
            schema.add_column(Some("id"), None, ColumnType::String),
            Err(Error::DuplicateColumn(f)) if f == "id"
        ));
        assert!(schema.is_empty());
    }

    #[test]
    fn test_set_visibility() {
        let mut schema = SchemaRegistry::new();
        schema
            .add_column(Some("Name"), None, ColumnType::String)
            .unwrap();

        schema.set_visibility("name", false);
        assert!(!schema.find("name").unwrap().visible);
        assert_eq!(schema.visible_columns().count(), 0);

        // unknown field is a no-op
        schema.set_visibility("missing", true);
        assert_eq!(schema.len(), 1);
    }
}
