use crate::metrics::domain::{Column, DataKind, MetricRecord};
use crate::metrics::fraction::migrate_legacy;
use std::io::Write;

use super::MetricImportError;

/// Header line written ahead of a kind's records.
pub fn export_header(kind: DataKind) -> Vec<&'static str> {
    kind.columns().iter().map(|column| column.header()).collect()
}

/// Writes records as tab-separated lines in the kind's column layout.
///
/// Legacy `(A|B)` fractions are written in the canonical `(A/B)` form.
pub fn write_records<W: Write>(
    writer: W,
    kind: DataKind,
    records: &[MetricRecord],
) -> Result<(), MetricImportError> {
    let mut tsv_writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(writer);

    tsv_writer.write_record(export_header(kind))?;
    for record in records {
        let fraction = migrate_legacy(&record.fraction_text);
        let fields = kind.columns().iter().map(|column| match column {
            Column::Fraction => fraction.as_deref().unwrap_or(&record.fraction_text),
            other => other.value(record),
        });
        tsv_writer.write_record(fields)?;
    }

    tsv_writer.flush()?;
    Ok(())
}

pub fn export_to_string(
    kind: DataKind,
    records: &[MetricRecord],
) -> Result<String, MetricImportError> {
    let mut buffer = Vec::new();
    write_records(&mut buffer, kind, records)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
