//! grid-core: Core library for the in-memory data grid editor
//!
//! This library provides the engine behind a spreadsheet-like table
//! editor:
//! - A schema registry of typed, toggleable columns
//! - A row store keyed by opaque identities
//! - Type-aware validation and casting of cell text
//! - A draft session with atomic save-all / cancel-all semantics
//! - Search, sort, and pagination over the stored rows
//! - A CSV import reconciler that extends the schema for unknown
//!   headers, plus visible-column CSV export

pub mod csv;
pub mod draft;
pub mod error;
pub mod import;
pub mod prefs;
pub mod query;
pub mod row;
pub mod schema;
pub mod state;
pub mod value;

pub use self::csv::{export_csv, parse_csv_file, parse_csv_str, ImportPayload, DEFAULT_EXPORT_NAME};
pub use draft::{DraftSession, RowDraft};
pub use error::{Error, Result};
pub use import::{reconcile, ImportSummary};
pub use prefs::{Preferences, Theme};
pub use query::{cycle_sort, SortDirection, SortSpec};
pub use row::{new_row_id, Row, RowStore};
pub use schema::{normalize_field, title_case, ColumnDef, SchemaRegistry, ID_FIELD};
pub use state::{PageCell, PageRow, PageView, TableState, DEFAULT_PAGE_SIZE};
pub use value::{cast, validate, ColumnType, Value};
