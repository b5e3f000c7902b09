//! Import reconciler
//!
//! Maps an externally supplied tabular payload with arbitrary headers
//! onto the current schema, extending the schema for unknown headers
//! and recasting every value, then replaces the row store wholesale.

use crate::csv::ImportPayload;
use crate::error::{Error, Result};
use crate::row::{new_row_id, Row, RowStore};
use crate::schema::{normalize_field, SchemaRegistry, ID_FIELD};
use crate::value::{cast, ColumnType};

/// Outcome counts for a completed import
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    /// Rows now in the store
    pub rows: usize,
    /// Columns created for headers with no existing field
    pub columns_added: usize,
}

/// Reconcile a payload against the schema and replace all rows.
///
/// Fails with [`Error::EmptyImport`] before touching any state if the
/// payload has no rows. Otherwise: headers are normalized into field
/// tokens (empty ones dropped), unknown fields become new visible
/// editable columns (`age` is numeric, everything else text), and each
/// raw row is rebuilt against the extended schema with values cast per
/// the declaring column's type. A raw `id` value is kept when present
/// and non-empty; otherwise a fresh identity is generated.
pub fn reconcile(
    schema: &mut SchemaRegistry,
    store: &mut RowStore,
    payload: &ImportPayload,
) -> Result<ImportSummary> {
    if payload.rows.is_empty() {
        return Err(Error::EmptyImport);
    }

    // Normalized (field, display header) pairs, source order
    let normalized: Vec<(String, String)> = payload
        .headers
        .iter()
        .map(|h| (normalize_field(h), h.trim().to_string()))
        .filter(|(field, _)| !field.is_empty())
        .collect();

    let mut columns_added = 0;
    for (field, header) in &normalized {
        if field != ID_FIELD && !schema.contains(field) {
            let ty = if field == "age" {
                ColumnType::Number
            } else {
                ColumnType::String
            };
            schema.add_column(Some(header.as_str()), Some(field.as_str()), ty)?;
            columns_added += 1;
        }
    }

    let mut rows = Vec::with_capacity(payload.rows.len());
    for raw in &payload.rows {
        let id = raw
            .get(ID_FIELD)
            .filter(|v| !v.is_empty())
            .cloned()
            .unwrap_or_else(new_row_id);
        let mut row = Row::with_id(id);

        for (field, _) in &normalized {
            if field == ID_FIELD {
                continue;
            }
            let raw_value = raw
                .iter()
                .find(|(key, _)| &normalize_field(key) == field)
                .map(|(_, v)| v.as_str())
                .unwrap_or("");
            let ty = schema
                .find(field)
                .map(|c| c.r#type)
                .unwrap_or(ColumnType::String);
            row.set(field.clone(), cast(ty, raw_value));
        }
        rows.push(row);
    }

    let summary = ImportSummary {
        rows: rows.len(),
        columns_added,
    };
    store.replace_all(rows);
    tracing::info!(rows = summary.rows, columns_added, "import reconciled");
    Ok(summary)
}
