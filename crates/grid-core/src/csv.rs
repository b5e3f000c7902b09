//! CSV reading and writing
//!
//! Reading produces an [`ImportPayload`] for the reconciler: the raw
//! header list in source order plus raw header→text maps per row.
//! Writing emits the visible columns over every committed row.

use crate::error::{Error, Result};
use crate::row::RowStore;
use crate::schema::SchemaRegistry;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Fixed default file name offered for downloads
pub const DEFAULT_EXPORT_NAME: &str = "table_export.csv";

/// Transient input to the import reconciler
#[derive(Debug, Clone, Default)]
pub struct ImportPayload {
    /// Header names exactly as they appeared, in source order
    pub headers: Vec<String>,
    /// Raw header → raw textual value per row
    pub rows: Vec<BTreeMap<String, String>>,
}

/// Parse CSV text whose first line is the header row. Empty lines are
/// skipped; quoting follows standard CSV rules.
pub fn parse_csv_str(content: &str) -> Result<ImportPayload> {
    read_payload(csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes()))
}

/// Parse a CSV file from disk
pub fn parse_csv_file<P: AsRef<Path>>(path: P) -> Result<ImportPayload> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    read_payload(
        csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(BufReader::new(file)),
    )
}

fn read_payload<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<ImportPayload> {
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() {
        return Err(Error::CsvParse("no header row found".to_string()));
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let mut row = BTreeMap::new();
        for (i, header) in headers.iter().enumerate() {
            let raw = record.get(i).unwrap_or("");
            row.insert(header.clone(), raw.to_string());
        }
        rows.push(row);
    }

    Ok(ImportPayload { headers, rows })
}

/// Serialize the table to CSV: header is the visible columns' fields in
/// display order; body covers every row in the store, unfiltered,
/// unsorted, and unpaginated, with missing values as empty strings.
pub fn export_csv(schema: &SchemaRegistry, store: &RowStore) -> Result<String> {
    let fields: Vec<&str> = schema.visible_columns().map(|c| c.field.as_str()).collect();

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&fields)?;
    for row in store.rows() {
        let record: Vec<String> = fields
            .iter()
            .map(|f| row.get(f).to_string_value())
            .collect();
        writer.write_record(&record)?;
    }

    let bytes = writer.into_inner().map_err(|e| Error::CsvParse(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| Error::CsvParse(e.to_string()))
}
