//! Search, sort, and pagination over the row store
//!
//! Everything here reads rows and derives a view; nothing mutates the
//! store.

use crate::row::Row;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::ops::Range;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// The single active sort, if any
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

/// Advance the sort state for a header click.
///
/// Clicking the active column cycles asc → desc → none; clicking a
/// different column starts it at asc and replaces the prior sort.
pub fn cycle_sort(current: Option<&SortSpec>, field: &str) -> Option<SortSpec> {
    match current {
        Some(spec) if spec.field == field => match spec.direction {
            SortDirection::Asc => Some(SortSpec {
                field: field.to_string(),
                direction: SortDirection::Desc,
            }),
            SortDirection::Desc => None,
        },
        _ => Some(SortSpec {
            field: field.to_string(),
            direction: SortDirection::Asc,
        }),
    }
}

/// Case-insensitive substring match against every field except the
/// identity. An empty query matches every row.
pub fn row_matches(row: &Row, query: &str) -> bool {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return true;
    }
    row.values
        .values()
        .any(|v| v.to_string_value().to_lowercase().contains(&q))
}

/// Compare two cell values for sorting.
///
/// Unset values sort before any defined value ascending and after it
/// descending; two values with numeric views compare numerically,
/// anything else compares as case-sensitive text.
pub fn compare(a: &Value, b: &Value, direction: SortDirection) -> Ordering {
    let ord = compare_asc(a, b);
    match direction {
        SortDirection::Asc => ord,
        SortDirection::Desc => ord.reverse(),
    }
}

fn compare_asc(a: &Value, b: &Value) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => {}
    }
    if let (Some(an), Some(bn)) = (a.as_number(), b.as_number()) {
        return an.partial_cmp(&bn).unwrap_or(Ordering::Equal);
    }
    a.to_string_value().cmp(&b.to_string_value())
}

/// Filter by search text, then sort. Returns references into the store
/// in display order; the store itself is untouched.
pub fn filter_and_sort<'a>(
    rows: &'a [Row],
    search: &str,
    sort: Option<&SortSpec>,
) -> Vec<&'a Row> {
    let mut out: Vec<&Row> = rows.iter().filter(|r| row_matches(r, search)).collect();
    if let Some(spec) = sort {
        out.sort_by(|a, b| compare(a.get(&spec.field), b.get(&spec.field), spec.direction));
    }
    out
}

/// Index range of a zero-based page over a sequence of `len` items.
/// Pages past the end come back empty.
pub fn page_range(len: usize, page: usize, page_size: usize) -> Range<usize> {
    let start = page.saturating_mul(page_size).min(len);
    let end = start.saturating_add(page_size).min(len);
    start..end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, Value)]) -> Row {
        let mut r = Row::new();
        for (field, value) in pairs {
            r.set(*field, value.clone());
        }
        r
    }

    fn ages(rows: &[&Row]) -> Vec<f64> {
        rows.iter()
            .map(|r| r.get("age").as_number().unwrap())
            .collect()
    }

    #[test]
    fn test_sort_cycle_sequence() {
        let first = cycle_sort(None, "age");
        assert_eq!(
            first,
            Some(SortSpec {
                field: "age".to_string(),
                direction: SortDirection::Asc
            })
        );
        let second = cycle_sort(first.as_ref(), "age");
        assert_eq!(second.as_ref().unwrap().direction, SortDirection::Desc);
        let third = cycle_sort(second.as_ref(), "age");
        assert_eq!(third, None);
    }

    #[test]
    fn test_sort_cycle_switching_column_starts_asc() {
        let on_age = cycle_sort(None, "age");
        let on_name = cycle_sort(on_age.as_ref(), "name");
        let spec = on_name.unwrap();
        assert_eq!(spec.field, "name");
        assert_eq!(spec.direction, SortDirection::Asc);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let r = row(&[("name", Value::Text("Aarav Sharma".to_string()))]);
        assert!(row_matches(&r, "sharma"));
        assert!(row_matches(&r, "SHA"));
        assert!(row_matches(&r, ""));
        assert!(!row_matches(&r, "verma"));
    }

    #[test]
    fn test_search_ignores_identity() {
        let r = row(&[("name", Value::Text("Neha".to_string()))]);
        // the identity token is not searchable data
        assert!(!row_matches(&r, &r.id));
    }

    #[test]
    fn test_numeric_sort() {
        let rows: Vec<Row> = [33.0, 24.0, 29.0, 26.0]
            .iter()
            .map(|n| row(&[("age", Value::Number(*n))]))
            .collect();

        let asc = filter_and_sort(
            &rows,
            "",
            Some(&SortSpec {
                field: "age".to_string(),
                direction: SortDirection::Asc,
            }),
        );
        assert_eq!(ages(&asc), vec![24.0, 26.0, 29.0, 33.0]);

        let desc = filter_and_sort(
            &rows,
            "",
            Some(&SortSpec {
                field: "age".to_string(),
                direction: SortDirection::Desc,
            }),
        );
        assert_eq!(ages(&desc), vec![33.0, 29.0, 26.0, 24.0]);
    }

    #[test]
    fn test_numeric_text_sorts_numerically() {
        // "7" vs 12: lexical order would put "12" first
        let a = Value::Text("7".to_string());
        let b = Value::Number(12.0);
        assert_eq!(compare(&a, &b, SortDirection::Asc), Ordering::Less);
    }

    #[test]
    fn test_empty_sorts_first_asc_last_desc() {
        let unset = Value::Empty;
        let set = Value::Text("x".to_string());
        assert_eq!(compare(&unset, &set, SortDirection::Asc), Ordering::Less);
        assert_eq!(compare(&unset, &set, SortDirection::Desc), Ordering::Greater);
        assert_eq!(compare(&unset, &Value::Empty, SortDirection::Asc), Ordering::Equal);
    }

    #[test]
    fn test_lexical_sort_is_case_sensitive() {
        let a = Value::Text("Apple".to_string());
        let b = Value::Text("apple".to_string());
        assert_eq!(compare(&a, &b, SortDirection::Asc), Ordering::Less);
    }

    #[test]
    fn test_page_range() {
        assert_eq!(page_range(10, 0, 4), 0..4);
        assert_eq!(page_range(10, 2, 4), 8..10);
        assert_eq!(page_range(10, 5, 4), 10..10);
        assert_eq!(page_range(0, 0, 10), 0..0);
    }

    #[test]
    fn test_filter_does_not_mutate_store_order() {
        let rows = vec![
            row(&[("name", Value::Text("Bravo".to_string()))]),
            row(&[("name", Value::Text("Alpha".to_string()))]),
        ];
        let sorted = filter_and_sort(
            &rows,
            "",
            Some(&SortSpec {
                field: "name".to_string(),
                direction: SortDirection::Asc,
            }),
        );
        assert_eq!(sorted[0].get("name").to_string_value(), "Alpha");
        // original slice unchanged
        assert_eq!(rows[0].get("name").to_string_value(), "Bravo");
    }
}
