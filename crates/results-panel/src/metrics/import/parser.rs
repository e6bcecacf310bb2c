use super::normalizer::{clean_field, header_key};
use crate::metrics::domain::{DataKind, MetricRecord};
use crate::metrics::fraction::migrate_legacy;
use std::io::Read;

/// First-column values that mark a header line.
const HEADER_KEYS: &[&str] = &["MES", "MONTH", "ZONA", "ZONE"];

#[derive(Debug, Default)]
pub(crate) struct ParsedRows {
    pub(crate) records: Vec<MetricRecord>,
    pub(crate) header_skipped: bool,
    pub(crate) migrated_fractions: usize,
}

pub(crate) fn parse_records<R: Read>(reader: R, kind: DataKind) -> Result<ParsedRows, csv::Error> {
    let mut tsv_reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(reader);
    let mut parsed = ParsedRows::default();
    let mut first_row = true;

    for row in tsv_reader.byte_records() {
        let row = row?;
        let fields: Vec<String> = row
            .iter()
            .map(|field| clean_field(&String::from_utf8_lossy(field)))
            .collect();

        if fields.iter().all(|field| field.is_empty()) {
            continue;
        }

        if first_row {
            first_row = false;
            if is_header(&fields) {
                parsed.header_skipped = true;
                continue;
            }
        }

        let mut record = record_from_fields(kind, fields);
        if let Some(migrated) = migrate_legacy(&record.fraction_text) {
            record.fraction_text = migrated;
            parsed.migrated_fractions += 1;
        }
        parsed.records.push(record);
    }

    Ok(parsed)
}

fn is_header(fields: &[String]) -> bool {
    fields
        .first()
        .map(|first| HEADER_KEYS.contains(&header_key(first).as_str()))
        .unwrap_or(false)
}

/// Fills the kind's columns in order; missing trailing fields stay empty.
fn record_from_fields(kind: DataKind, fields: Vec<String>) -> MetricRecord {
    let mut record = MetricRecord::default();
    for (column, value) in kind.columns().iter().zip(fields) {
        *column.slot(&mut record) = value;
    }
    record
}
