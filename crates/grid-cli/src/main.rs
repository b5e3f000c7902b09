//! Grid editor CLI
//!
//! Command-line front end over grid-core: view a CSV as a searched,
//! sorted, paginated table, apply batched edits with validation,
//! manage columns, re-export, and keep display preferences.

use clap::{Parser, Subcommand};
use grid_core::{parse_csv_file, ColumnType, Preferences, TableState, DEFAULT_EXPORT_NAME};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "grid-cli")]
#[command(about = "Data grid table editor", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a table page (the built-in demo dataset unless a file is given)
    View {
        /// CSV file to import before viewing
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Search text matched against every field
        #[arg(short, long, default_value = "")]
        search: String,

        /// Column field to sort by
        #[arg(long)]
        sort: Option<String>,

        /// Sort descending instead of ascending
        #[arg(long)]
        desc: bool,

        /// Zero-based page index
        #[arg(short, long, default_value_t = 0)]
        page: usize,

        /// Rows per page
        #[arg(long, default_value_t = grid_core::DEFAULT_PAGE_SIZE)]
        page_size: usize,
    },

    /// Import a CSV and export the visible columns back out
    Export {
        /// CSV file to import
        #[arg(short, long)]
        file: PathBuf,

        /// Output path (defaults to the standard export name)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Apply a batch of edits from a JSON file, atomically
    Edit {
        /// CSV file to import
        #[arg(short, long)]
        file: PathBuf,

        /// Path to the edit file (JSON)
        #[arg(short, long)]
        edits: PathBuf,

        /// Output path for the edited CSV
        #[arg(short, long)]
        output: PathBuf,
    },

    /// List columns, optionally adding or hiding some first
    Columns {
        /// CSV file to import (defaults to the demo dataset)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Add a column with this header name
        #[arg(long)]
        add: Option<String>,

        /// Type for the added column (string, number, email)
        #[arg(long, default_value = "string")]
        r#type: ColumnType,

        /// Fields to hide
        #[arg(long)]
        hide: Vec<String>,
    },

    /// Show or change persisted display preferences
    Prefs {
        /// Directory holding the preference store
        #[arg(long, default_value = ".")]
        store: PathBuf,

        /// Preference namespace
        #[arg(long, default_value = "grid")]
        namespace: String,

        /// Set the theme (light or dark)
        #[arg(long)]
        theme: Option<String>,

        /// Set the default rows per page
        #[arg(long)]
        page_size: Option<usize>,
    },
}

/// A single staged edit, addressing a row by its 1-based position in
/// import order
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EditSpec {
    row: usize,
    field: String,
    value: String,
}

/// Edit batch file format
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EditFile {
    edits: Vec<EditSpec>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> grid_core::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::View {
            file,
            search,
            sort,
            desc,
            page,
            page_size,
        } => cmd_view(file, &search, sort.as_deref(), desc, page, page_size),
        Commands::Export { file, output } => cmd_export(&file, output),
        Commands::Edit {
            file,
            edits,
            output,
        } => cmd_edit(&file, &edits, &output),
        Commands::Columns {
            file,
            add,
            r#type,
            hide,
        } => cmd_columns(file, add.as_deref(), r#type, &hide),
        Commands::Prefs {
            store,
            namespace,
            theme,
            page_size,
        } => cmd_prefs(&store, &namespace, theme.as_deref(), page_size),
    }
}

fn load_state(file: Option<&PathBuf>) -> grid_core::Result<TableState> {
    match file {
        Some(path) => {
            let mut state = TableState::new();
            let payload = parse_csv_file(path)?;
            let summary = state.import(&payload)?;
            println!(
                "Imported {} rows ({} new columns) from {}",
                summary.rows,
                summary.columns_added,
                path.display()
            );
            Ok(state)
        }
        None => Ok(TableState::demo()),
    }
}

fn cmd_view(
    file: Option<PathBuf>,
    search: &str,
    sort: Option<&str>,
    desc: bool,
    page: usize,
    page_size: usize,
) -> grid_core::Result<()> {
    let mut state = load_state(file.as_ref())?;

    state.set_search(search);
    if let Some(field) = sort {
        state.toggle_sort(field);
        if desc {
            state.toggle_sort(field);
        }
    }
    state.set_page_size(page_size);
    state.set_page(page);

    print_page(&state);
    Ok(())
}

fn print_page(state: &TableState) {
    let view = state.current_page();

    let header: Vec<&str> = view.columns.iter().map(|c| c.header_name.as_str()).collect();
    println!("{}", header.join("\t"));
    println!("{}", "-".repeat(header.len() * 12));

    for row in &view.rows {
        let values: Vec<&str> = row.cells.iter().map(|c| c.text.as_str()).collect();
        println!("{}", values.join("\t"));
    }

    let pages = view.total.div_ceil(view.page_size).max(1);
    println!();
    println!(
        "Page {} of {} ({} rows total)",
        view.page + 1,
        pages,
        view.total
    );
}

fn cmd_export(file: &PathBuf, output: Option<PathBuf>) -> grid_core::Result<()> {
    let state = load_state(Some(file))?;

    let output = output.unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_NAME));
    let csv = state.export_csv()?;
    fs::write(&output, csv)?;

    println!("Exported {} rows to {}", state.rows().len(), output.display());
    Ok(())
}

fn cmd_edit(file: &PathBuf, edits_path: &PathBuf, output: &PathBuf) -> grid_core::Result<()> {
    let mut state = load_state(Some(file))?;

    let content = fs::read_to_string(edits_path).map_err(|e| grid_core::Error::FileRead {
        path: edits_path.clone(),
        source: e,
    })?;
    let edit_file: EditFile = serde_json::from_str(&content)?;
    println!("Loaded {} edits from {}", edit_file.edits.len(), edits_path.display());

    // Rows are addressed by import order, which the store preserves
    let ids: Vec<String> = state.rows().rows().iter().map(|r| r.id.clone()).collect();

    for edit in &edit_file.edits {
        let Some(id) = edit.row.checked_sub(1).and_then(|i| ids.get(i)) else {
            eprintln!("Warning: edit addresses row {} which does not exist, skipping", edit.row);
            continue;
        };
        let id = id.clone();
        if !state.start_edit(&id, &edit.field) {
            eprintln!(
                "Warning: column '{}' is unknown or not editable, skipping",
                edit.field
            );
            continue;
        }
        state.set_draft(&id, &edit.field, edit.value.clone());
    }

    // all-or-nothing: a single invalid value aborts the whole batch
    state.save_all()?;

    let csv = state.export_csv()?;
    fs::write(output, csv)?;
    println!("Wrote edited table to {}", output.display());
    Ok(())
}

fn cmd_columns(
    file: Option<PathBuf>,
    add: Option<&str>,
    ty: ColumnType,
    hide: &[String],
) -> grid_core::Result<()> {
    let mut state = load_state(file.as_ref())?;

    if let Some(header) = add {
        state.add_column(Some(header), None, ty)?;
        println!("Added column '{}'", header);
    }
    for field in hide {
        state.set_column_visibility(field, false);
    }

    println!("{:<20} {:<20} {:<8} {:<8} editable", "field", "header", "type", "visible");
    for col in state.schema().columns() {
        println!(
            "{:<20} {:<20} {:<8} {:<8} {}",
            col.field, col.header_name, col.r#type, col.visible, col.editable
        );
    }
    Ok(())
}

fn cmd_prefs(
    store: &PathBuf,
    namespace: &str,
    theme: Option<&str>,
    page_size: Option<usize>,
) -> grid_core::Result<()> {
    let path = Preferences::path_for(store, namespace);
    let mut prefs = Preferences::load(&path)?;

    let mut changed = false;
    if let Some(theme) = theme {
        prefs.theme = match theme.to_lowercase().as_str() {
            "light" => grid_core::Theme::Light,
            "dark" => grid_core::Theme::Dark,
            other => {
                eprintln!("Unknown theme '{}', expected light or dark", other);
                std::process::exit(1);
            }
        };
        changed = true;
    }
    if let Some(size) = page_size {
        prefs.page_size = size;
        changed = true;
    }

    if changed {
        prefs.save(&path)?;
        println!("Saved preferences to {}", path.display());
    }

    println!("theme: {}", prefs.theme);
    println!("page_size: {}", prefs.page_size);
    println!("updated: {}", prefs.updated);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_file_round_trip() {
        let file = EditFile {
            edits: vec![EditSpec {
                row: 1,
                field: "name".to_string(),
                value: "Renamed".to_string(),
            }],
        };
        let json = serde_json::to_string_pretty(&file).unwrap();
        let loaded: EditFile = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.edits.len(), 1);
        assert_eq!(loaded.edits[0].field, "name");
    }

    #[test]
    fn test_edit_batch_applies_and_exports() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.csv");
        let edits = dir.path().join("edits.json");
        let output = dir.path().join("out.csv");

        fs::write(&input, "Name,Age\nAarav,26\nNeha,29\n").unwrap();
        fs::write(
            &edits,
            r#"{"edits":[{"row":2,"field":"age","value":"30"}]}"#,
        )
        .unwrap();

        cmd_edit(&input, &edits, &output).unwrap();

        let exported = fs::read_to_string(&output).unwrap();
        assert!(exported.contains("Neha,30"));
        assert!(exported.contains("Aarav,26"));
    }

    #[test]
    fn test_edit_batch_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.csv");
        let edits = dir.path().join("edits.json");
        let output = dir.path().join("out.csv");

        fs::write(&input, "Name,Age\nAarav,26\n").unwrap();
        fs::write(
            &edits,
            r#"{"edits":[{"row":1,"field":"age","value":"first prime"}]}"#,
        )
        .unwrap();

        assert!(cmd_edit(&input, &edits, &output).is_err());
        assert!(!output.exists());
    }
}
