//! C FFI bindings for grid-core
//!
//! This crate exposes the table state behind an opaque handle so a
//! C/C++ display layer can render pages and forward user gestures
//! (search changes, header clicks, cell edits, save/cancel) into the
//! core.

use grid_core::TableState;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

/// Opaque handle to a table state
pub struct GridState {
    inner: TableState,
}

fn to_c_string(s: String) -> *mut c_char {
    CString::new(s).map(|s| s.into_raw()).unwrap_or(ptr::null_mut())
}

/// Create a table state seeded with the demo dataset
#[no_mangle]
pub extern "C" fn grid_state_new_demo() -> *mut GridState {
    Box::into_raw(Box::new(GridState {
        inner: TableState::demo(),
    }))
}

/// Create an empty table state
#[no_mangle]
pub extern "C" fn grid_state_new_empty() -> *mut GridState {
    Box::into_raw(Box::new(GridState {
        inner: TableState::new(),
    }))
}

/// Free a table state
///
/// # Safety
/// - `state` must be a valid pointer returned by a `grid_state_new_*`
///   function, or null
#[no_mangle]
pub unsafe extern "C" fn grid_state_free(state: *mut GridState) {
    if !state.is_null() {
        drop(Box::from_raw(state));
    }
}

/// Import CSV text, replacing all rows
///
/// Returns 0 on success, -1 on failure (the state is unchanged on
/// failure).
///
/// # Safety
/// - `state` must be a valid pointer returned by `grid_state_new_*`
/// - `csv` must be a valid C string
#[no_mangle]
pub unsafe extern "C" fn grid_state_import_csv(state: *mut GridState, csv: *const c_char) -> i32 {
    if state.is_null() || csv.is_null() {
        return -1;
    }
    let Ok(content) = CStr::from_ptr(csv).to_str() else {
        return -1;
    };
    match (*state).inner.import_csv_str(content) {
        Ok(_) => 0,
        Err(_) => -1,
    }
}

/// Export the visible columns of every row as CSV text
///
/// # Safety
/// - `state` must be a valid pointer returned by `grid_state_new_*`
/// - Caller must free the returned string with `grid_free_string`
#[no_mangle]
pub unsafe extern "C" fn grid_state_export_csv(state: *const GridState) -> *mut c_char {
    if state.is_null() {
        return ptr::null_mut();
    }
    match (*state).inner.export_csv() {
        Ok(csv) => to_c_string(csv),
        Err(_) => ptr::null_mut(),
    }
}

/// Set the search text (resets to the first page)
///
/// # Safety
/// - `state` must be a valid pointer returned by `grid_state_new_*`
/// - `search` must be a valid C string
#[no_mangle]
pub unsafe extern "C" fn grid_state_set_search(state: *mut GridState, search: *const c_char) {
    if state.is_null() || search.is_null() {
        return;
    }
    if let Ok(s) = CStr::from_ptr(search).to_str() {
        (*state).inner.set_search(s);
    }
}

/// Header click: cycle the sort on a column (asc, desc, none)
///
/// # Safety
/// - `state` must be a valid pointer returned by `grid_state_new_*`
/// - `field` must be a valid C string
#[no_mangle]
pub unsafe extern "C" fn grid_state_toggle_sort(state: *mut GridState, field: *const c_char) {
    if state.is_null() || field.is_null() {
        return;
    }
    if let Ok(f) = CStr::from_ptr(field).to_str() {
        (*state).inner.toggle_sort(f);
    }
}

/// Jump to a zero-based page
///
/// # Safety
/// - `state` must be a valid pointer returned by `grid_state_new_*`
#[no_mangle]
pub unsafe extern "C" fn grid_state_set_page(state: *mut GridState, page: usize) {
    if !state.is_null() {
        (*state).inner.set_page(page);
    }
}

/// Change the rows-per-page
///
/// # Safety
/// - `state` must be a valid pointer returned by `grid_state_new_*`
#[no_mangle]
pub unsafe extern "C" fn grid_state_set_page_size(state: *mut GridState, page_size: usize) {
    if !state.is_null() {
        (*state).inner.set_page_size(page_size);
    }
}

/// Total rows in the current view, pending rows included
///
/// # Safety
/// - `state` must be a valid pointer returned by `grid_state_new_*`
#[no_mangle]
pub unsafe extern "C" fn grid_state_total_rows(state: *const GridState) -> usize {
    if state.is_null() {
        return 0;
    }
    (*state).inner.current_page().total
}

/// Number of rows on the current page
///
/// # Safety
/// - `state` must be a valid pointer returned by `grid_state_new_*`
#[no_mangle]
pub unsafe extern "C" fn grid_state_page_row_count(state: *const GridState) -> usize {
    if state.is_null() {
        return 0;
    }
    (*state).inner.current_page().rows.len()
}

/// Number of visible columns
///
/// # Safety
/// - `state` must be a valid pointer returned by `grid_state_new_*`
#[no_mangle]
pub unsafe extern "C" fn grid_state_visible_col_count(state: *const GridState) -> usize {
    if state.is_null() {
        return 0;
    }
    (*state).inner.schema().visible_columns().count()
}

/// Display header of a visible column by index
///
/// # Safety
/// - `state` must be a valid pointer returned by `grid_state_new_*`
/// - Returns null if the index is out of bounds
/// - Caller must free the returned string with `grid_free_string`
#[no_mangle]
pub unsafe extern "C" fn grid_state_col_header(
    state: *const GridState,
    index: usize,
) -> *mut c_char {
    if state.is_null() {
        return ptr::null_mut();
    }
    (*state)
        .inner
        .schema()
        .visible_columns()
        .nth(index)
        .map(|c| to_c_string(c.header_name.clone()))
        .unwrap_or(ptr::null_mut())
}

/// Display text of a cell on the current page
///
/// # Safety
/// - `state` must be a valid pointer returned by `grid_state_new_*`
/// - Returns null if row or col is out of bounds
/// - Caller must free the returned string with `grid_free_string`
#[no_mangle]
pub unsafe extern "C" fn grid_state_cell(
    state: *const GridState,
    row: usize,
    col: usize,
) -> *mut c_char {
    if state.is_null() {
        return ptr::null_mut();
    }
    (*state)
        .inner
        .current_page()
        .rows
        .get(row)
        .and_then(|r| r.cells.get(col))
        .map(|c| to_c_string(c.text.clone()))
        .unwrap_or(ptr::null_mut())
}

/// Identity of a row on the current page
///
/// # Safety
/// - `state` must be a valid pointer returned by `grid_state_new_*`
/// - Returns null if the index is out of bounds
/// - Caller must free the returned string with `grid_free_string`
#[no_mangle]
pub unsafe extern "C" fn grid_state_row_id(state: *const GridState, row: usize) -> *mut c_char {
    if state.is_null() {
        return ptr::null_mut();
    }
    (*state)
        .inner
        .current_page()
        .rows
        .get(row)
        .map(|r| to_c_string(r.id.clone()))
        .unwrap_or(ptr::null_mut())
}

/// Stage a new row with every visible cell in edit mode
///
/// # Safety
/// - `state` must be a valid pointer returned by `grid_state_new_*`
/// - Caller must free the returned identity with `grid_free_string`
#[no_mangle]
pub unsafe extern "C" fn grid_state_add_row(state: *mut GridState) -> *mut c_char {
    if state.is_null() {
        return ptr::null_mut();
    }
    to_c_string((*state).inner.add_row())
}

/// Begin editing a cell; returns 0 on success, -1 if the column is
/// unknown or not editable
///
/// # Safety
/// - `state` must be a valid pointer returned by `grid_state_new_*`
/// - `id` and `field` must be valid C strings
#[no_mangle]
pub unsafe extern "C" fn grid_state_start_edit(
    state: *mut GridState,
    id: *const c_char,
    field: *const c_char,
) -> i32 {
    if state.is_null() || id.is_null() || field.is_null() {
        return -1;
    }
    let (Ok(id), Ok(field)) = (CStr::from_ptr(id).to_str(), CStr::from_ptr(field).to_str()) else {
        return -1;
    };
    if (*state).inner.start_edit(id, field) {
        0
    } else {
        -1
    }
}

/// Overwrite the staged text for a cell (keystroke)
///
/// # Safety
/// - `state` must be a valid pointer returned by `grid_state_new_*`
/// - `id`, `field`, and `text` must be valid C strings
#[no_mangle]
pub unsafe extern "C" fn grid_state_set_draft(
    state: *mut GridState,
    id: *const c_char,
    field: *const c_char,
    text: *const c_char,
) {
    if state.is_null() || id.is_null() || field.is_null() || text.is_null() {
        return;
    }
    if let (Ok(id), Ok(field), Ok(text)) = (
        CStr::from_ptr(id).to_str(),
        CStr::from_ptr(field).to_str(),
        CStr::from_ptr(text).to_str(),
    ) {
        (*state).inner.set_draft(id, field, text);
    }
}

/// Delete a row immediately (pending or committed)
///
/// # Safety
/// - `state` must be a valid pointer returned by `grid_state_new_*`
/// - `id` must be a valid C string
#[no_mangle]
pub unsafe extern "C" fn grid_state_delete_row(state: *mut GridState, id: *const c_char) {
    if state.is_null() || id.is_null() {
        return;
    }
    if let Ok(id) = CStr::from_ptr(id).to_str() {
        (*state).inner.delete_row(id);
    }
}

/// Commit every staged edit atomically
///
/// Returns 0 on success. On failure returns -1, writes nothing, keeps
/// all drafts staged, and (if `message` is non-null) stores an error
/// string the caller must free with `grid_free_string`.
///
/// # Safety
/// - `state` must be a valid pointer returned by `grid_state_new_*`
/// - `message`, when non-null, must point to writable storage
#[no_mangle]
pub unsafe extern "C" fn grid_state_save_all(
    state: *mut GridState,
    message: *mut *mut c_char,
) -> i32 {
    if state.is_null() {
        return -1;
    }
    match (*state).inner.save_all() {
        Ok(()) => 0,
        Err(e) => {
            if !message.is_null() {
                *message = to_c_string(e.to_string());
            }
            -1
        }
    }
}

/// Discard every staged edit and pending row
///
/// # Safety
/// - `state` must be a valid pointer returned by `grid_state_new_*`
#[no_mangle]
pub unsafe extern "C" fn grid_state_cancel_all(state: *mut GridState) {
    if !state.is_null() {
        (*state).inner.cancel_all();
    }
}

/// Whether anything is staged for commit
///
/// # Safety
/// - `state` must be a valid pointer returned by `grid_state_new_*`
#[no_mangle]
pub unsafe extern "C" fn grid_state_is_editing(state: *const GridState) -> bool {
    if state.is_null() {
        return false;
    }
    (*state).inner.is_editing()
}

/// Free a string returned by other grid_* functions
///
/// # Safety
/// - `s` must be a valid pointer returned by a grid_* function, or null
#[no_mangle]
pub unsafe extern "C" fn grid_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}
