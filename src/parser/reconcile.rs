//! Merging the two markup regions of a result-list page.
//!
//! A list page describes each hit twice: a hidden reservation form carries
//! the full citation, while the visible table row carries the display
//! number. The two regions are keyed by record id and do not always agree
//! on membership, so the merge attaches table numbers where available and
//! falls back to form discovery order for the rest.

use std::collections::HashMap;

use crate::models::{BibliographicRecord, RecordBuilder};
use crate::parser::bibbr::CitationFields;

/// One record extracted from the hidden-form region, in discovery order.
#[derive(Debug, Clone)]
pub struct FormRecord {
    pub record_id: String,
    pub fields: CitationFields,
    pub raw_citation: String,
}

/// One row extracted from the visible-table region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableEntry {
    pub record_id: String,
    pub display_number: usize,
}

/// Merge form-derived records with table-derived display numbers.
///
/// Records whose parsed title is empty are discarded. The output is sorted
/// ascending by the resolved display number, so table order takes
/// precedence over discovery order whenever both exist.
pub fn merge(form_records: Vec<FormRecord>, table_entries: &[TableEntry]) -> Vec<BibliographicRecord> {
    let numbers: HashMap<&str, usize> = table_entries
        .iter()
        .map(|entry| (entry.record_id.as_str(), entry.display_number))
        .collect();

    let mut records: Vec<BibliographicRecord> = form_records
        .into_iter()
        .enumerate()
        .filter(|(_, form)| !form.fields.title.is_empty())
        .map(|(index, form)| {
            let ordinal = numbers
                .get(form.record_id.as_str())
                .copied()
                .unwrap_or(index + 1);

            let mut builder = RecordBuilder::new(&form.record_id, &form.fields.title)
                .raw_citation(&form.raw_citation)
                .ordinal(ordinal);
            if let Some(author) = form.fields.author {
                builder = builder.author(author);
            }
            if let Some(publisher) = form.fields.publisher {
                builder = builder.publisher(publisher);
            }
            if let Some(year) = form.fields.year {
                builder = builder.year(year);
            }
            if let Some(edition) = form.fields.edition {
                builder = builder.edition(edition);
            }
            if let Some(series) = form.fields.series {
                builder = builder.series(series);
            }
            builder.build()
        })
        .collect();

    records.sort_by_key(|record| record.ordinal);
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(record_id: &str, title: &str) -> FormRecord {
        FormRecord {
            record_id: record_id.to_string(),
            fields: CitationFields {
                title: title.to_string(),
                ..CitationFields::default()
            },
            raw_citation: title.to_string(),
        }
    }

    #[test]
    fn test_table_order_takes_precedence() {
        let forms = vec![form("BB1", "一冊目"), form("BB2", "二冊目")];
        let table = vec![
            TableEntry { record_id: "BB2".into(), display_number: 1 },
            TableEntry { record_id: "BB1".into(), display_number: 2 },
        ];

        let merged = merge(forms, &table);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].record_id, "BB2");
        assert_eq!(merged[0].ordinal, 1);
        assert_eq!(merged[1].record_id, "BB1");
        assert_eq!(merged[1].ordinal, 2);
    }

    #[test]
    fn test_missing_table_entry_falls_back_to_form_position() {
        let forms = vec![form("BB1", "一冊目"), form("BB2", "二冊目")];
        let table = vec![TableEntry { record_id: "BB1".into(), display_number: 1 }];

        let merged = merge(forms, &table);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[1].record_id, "BB2");
        assert_eq!(merged[1].ordinal, 2);
    }

    #[test]
    fn test_empty_title_discarded() {
        let forms = vec![form("BB1", "一冊目"), form("BB2", ""), form("BB3", "三冊目")];
        let merged = merge(forms, &[]);

        assert_eq!(merged.len(), 2);
        assert!(merged.iter().all(|r| !r.title.is_empty()));
        assert!(merged.iter().all(|r| r.record_id != "BB2"));
    }

    #[test]
    fn test_output_never_exceeds_form_count() {
        let forms = vec![form("BB1", "一冊目")];
        let table = vec![
            TableEntry { record_id: "BB1".into(), display_number: 1 },
            TableEntry { record_id: "BB9".into(), display_number: 2 },
        ];

        let merged = merge(forms, &table);
        assert_eq!(merged.len(), 1);
    }
}
