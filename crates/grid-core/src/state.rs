//! The table state container
//!
//! Single owner of schema, rows, drafts, and view state. Every mutation
//! goes through a named operation so the invariants stay enforced in
//! one place; the display layer only ever reads [`PageView`]s.

use crate::csv::{self, ImportPayload};
use crate::draft::DraftSession;
use crate::error::Result;
use crate::import::{self, ImportSummary};
use crate::query::{self, SortSpec};
use crate::row::{Row, RowStore};
use crate::schema::{ColumnDef, SchemaRegistry};
use crate::value::{ColumnType, Value};

/// Default rows per page
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// One rendered cell
#[derive(Debug, Clone, PartialEq)]
pub struct PageCell {
    /// Declaring column's field
    pub field: String,
    /// Display text: the staged draft if the cell is in edit mode,
    /// otherwise the committed value
    pub text: String,
    /// Whether the cell is currently in edit mode
    pub editing: bool,
}

/// One rendered row
#[derive(Debug, Clone, PartialEq)]
pub struct PageRow {
    pub id: String,
    /// True for staged rows not yet committed
    pub pending_new: bool,
    /// Cells in visible-column order
    pub cells: Vec<PageCell>,
}

/// Display-ready slice of the table
#[derive(Debug, Clone)]
pub struct PageView {
    /// Visible column definitions in display order
    pub columns: Vec<ColumnDef>,
    /// Rows on the requested page
    pub rows: Vec<PageRow>,
    /// Total rows across all pages (pending rows included)
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}

/// System of record for the whole editor
#[derive(Debug, Clone, Default)]
pub struct TableState {
    schema: SchemaRegistry,
    rows: RowStore,
    drafts: DraftSession,
    search: String,
    sort: Option<SortSpec>,
    page: usize,
    page_size: usize,
}

impl TableState {
    /// Empty table
    pub fn new() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            ..Self::default()
        }
    }

    /// The built-in demo dataset loaded on every fresh start
    pub fn demo() -> Self {
        let schema = SchemaRegistry::from_columns(vec![
            ColumnDef {
                width: 200,
                ..ColumnDef::new("name", "Name", ColumnType::String)
            },
            ColumnDef {
                width: 240,
                ..ColumnDef::new("email", "Email", ColumnType::Email)
            },
            ColumnDef {
                width: 120,
                ..ColumnDef::new("age", "Age", ColumnType::Number)
            },
            ColumnDef {
                width: 160,
                ..ColumnDef::new("role", "Role", ColumnType::String)
            },
        ]);

        let people = [
            ("Aarav Sharma", "aarav@example.com", 26.0, "Engineer"),
            ("Neha Verma", "neha@example.com", 29.0, "Designer"),
            ("Rahul Gupta", "rahul@example.com", 33.0, "Manager"),
            ("Priya Iyer", "priya@example.com", 24.0, "Engineer"),
        ];
        let rows = people
            .iter()
            .map(|(name, email, age, role)| {
                let mut row = Row::new();
                row.set("name", Value::Text(name.to_string()));
                row.set("email", Value::Text(email.to_string()));
                row.set("age", Value::Number(*age));
                row.set("role", Value::Text(role.to_string()));
                row
            })
            .collect();

        Self {
            schema,
            rows: RowStore::from_rows(rows),
            ..Self::new()
        }
    }

    // --- view state ---

    /// Set the search text; resets to the first page
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page = 0;
    }

    /// Header click: cycle the sort on `field`. Does not reset paging.
    pub fn toggle_sort(&mut self, field: &str) {
        self.sort = query::cycle_sort(self.sort.as_ref(), field);
    }

    /// Jump to a zero-based page
    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    /// Change rows-per-page; zero is ignored
    pub fn set_page_size(&mut self, page_size: usize) {
        if page_size > 0 {
            self.page_size = page_size;
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    // --- schema ---

    /// Add a column by header name (field derived) with the given type
    pub fn add_column(
        &mut self,
        header_name: Option<&str>,
        field: Option<&str>,
        ty: ColumnType,
    ) -> Result<()> {
        self.schema.add_column(header_name, field, ty)?;
        Ok(())
    }

    /// Show or hide a column; its data stays on the rows either way
    pub fn set_column_visibility(&mut self, field: &str, visible: bool) {
        self.schema.set_visibility(field, visible);
    }

    pub fn schema(&self) -> &SchemaRegistry {
        &self.schema
    }

    pub fn rows(&self) -> &RowStore {
        &self.rows
    }

    // --- editing ---

    /// Stage a new row; every visible cell opens in edit mode.
    /// Returns the pending identity.
    pub fn add_row(&mut self) -> String {
        self.drafts.add_row(&self.schema)
    }

    /// Double-click on a cell: enter edit mode seeded with the current
    /// display text. Returns false for non-editable columns.
    pub fn start_edit(&mut self, id: &str, field: &str) -> bool {
        let current = self
            .drafts
            .draft_text(id, field)
            .map(str::to_string)
            .unwrap_or_else(|| {
                self.rows
                    .find(id)
                    .map(|r| r.get(field).to_string_value())
                    .unwrap_or_default()
            });
        self.drafts.start_edit(&self.schema, id, field, current)
    }

    /// Keystroke: overwrite the staged text for a cell
    pub fn set_draft(&mut self, id: &str, field: &str, text: impl Into<String>) {
        self.drafts.set_value(id, field, text.into());
    }

    /// Delete a row immediately. A pending row is discarded from the
    /// session; a committed row leaves the store along with any staged
    /// edits against it. Unknown ids are a no-op.
    pub fn delete_row(&mut self, id: &str) {
        if self.drafts.is_pending_new(id) {
            self.drafts.discard_row(id);
        } else {
            self.rows.delete(id);
            self.drafts.discard_row(id);
        }
    }

    /// Commit every staged edit atomically; on any validation failure
    /// nothing is written and all drafts stay staged
    pub fn save_all(&mut self) -> Result<()> {
        self.drafts.save_all(&self.schema, &mut self.rows)
    }

    /// Discard every staged edit and pending row
    pub fn cancel_all(&mut self) {
        self.drafts.cancel_all();
    }

    /// Whether any draft or pending row is staged (display layer swaps
    /// Add-Row for Save/Cancel controls on this)
    pub fn is_editing(&self) -> bool {
        self.drafts.is_active()
    }

    pub fn drafts(&self) -> &DraftSession {
        &self.drafts
    }

    // --- import/export ---

    /// Run the import reconciler over a parsed payload and reset to the
    /// first page. State is untouched when the payload has no rows.
    pub fn import(&mut self, payload: &ImportPayload) -> Result<ImportSummary> {
        let summary = import::reconcile(&mut self.schema, &mut self.rows, payload)?;
        self.page = 0;
        Ok(summary)
    }

    /// Parse CSV text and import it
    pub fn import_csv_str(&mut self, content: &str) -> Result<ImportSummary> {
        let payload = csv::parse_csv_str(content)?;
        self.import(&payload)
    }

    /// Export every committed row's visible fields as CSV text
    pub fn export_csv(&self) -> Result<String> {
        csv::export_csv(&self.schema, &self.rows)
    }

    // --- derived view ---

    /// Build the current page.
    ///
    /// Pending new rows are prepended ahead of the filtered/sorted
    /// committed rows and are exempt from search and sort; the page
    /// slice applies to the combined sequence, so pending rows count
    /// against the page size.
    pub fn current_page(&self) -> PageView {
        let columns: Vec<ColumnDef> = self.schema.visible_columns().cloned().collect();

        let filtered = query::filter_and_sort(self.rows.rows(), &self.search, self.sort.as_ref());
        let pending = self.drafts.pending_new_ids();
        let total = pending.len() + filtered.len();

        let range = query::page_range(total, self.page, self.page_size);
        let mut rows = Vec::with_capacity(range.len());
        for idx in range {
            let page_row = if idx < pending.len() {
                self.render_pending(pending[idx], &columns)
            } else {
                self.render_committed(filtered[idx - pending.len()], &columns)
            };
            rows.push(page_row);
        }

        PageView {
            columns,
            rows,
            total,
            page: self.page,
            page_size: self.page_size,
        }
    }

    fn render_pending(&self, id: &str, columns: &[ColumnDef]) -> PageRow {
        let cells = columns
            .iter()
            .map(|col| PageCell {
                field: col.field.clone(),
                text: self
                    .drafts
                    .draft_text(id, &col.field)
                    .unwrap_or("")
                    .to_string(),
                editing: self.drafts.is_editing(id, &col.field),
            })
            .collect();
        PageRow {
            id: id.to_string(),
            pending_new: true,
            cells,
        }
    }

    fn render_committed(&self, row: &Row, columns: &[ColumnDef]) -> PageRow {
        let cells = columns
            .iter()
            .map(|col| {
                let editing = self.drafts.is_editing(&row.id, &col.field);
                let text = if editing {
                    self.drafts
                        .draft_text(&row.id, &col.field)
                        .unwrap_or("")
                        .to_string()
                } else {
                    row.get(&col.field).to_string_value()
                };
                PageCell {
                    field: col.field.clone(),
                    text,
                    editing,
                }
            })
            .collect();
        PageRow {
            id: row.id.clone(),
            pending_new: false,
            cells,
        }
    }
}
