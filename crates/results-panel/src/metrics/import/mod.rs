//! Tab-separated import and export of metric records.

mod export;
mod normalizer;
mod parser;

use crate::metrics::domain::{DataKind, MetricRecord};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

pub use export::{export_header, export_to_string, write_records};
pub(crate) use normalizer::clean_field;

#[derive(Debug)]
pub enum MetricImportError {
    Io(std::io::Error),
    Tsv(csv::Error),
}

impl std::fmt::Display for MetricImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricImportError::Io(err) => write!(f, "failed to read metrics file: {}", err),
            MetricImportError::Tsv(err) => write!(f, "invalid tab-separated metrics data: {}", err),
        }
    }
}

impl std::error::Error for MetricImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MetricImportError::Io(err) => Some(err),
            MetricImportError::Tsv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for MetricImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for MetricImportError {
    fn from(err: csv::Error) -> Self {
        Self::Tsv(err)
    }
}

/// Outcome of reading one metrics file.
#[derive(Debug, Clone, Default)]
pub struct MetricImport {
    pub records: Vec<MetricRecord>,
    pub header_skipped: bool,
    pub migrated_fractions: usize,
}

pub struct MetricImporter;

impl MetricImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<MetricImport, MetricImportError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        debug!(path = %path.display(), "reading metrics file");
        Self::from_reader(file)
    }

    /// Reads a daily zone file, the layout the results views consume.
    pub fn from_reader<R: Read>(reader: R) -> Result<MetricImport, MetricImportError> {
        Self::from_reader_as(DataKind::DailyZone, reader)
    }

    pub fn from_reader_as<R: Read>(
        kind: DataKind,
        reader: R,
    ) -> Result<MetricImport, MetricImportError> {
        let parsed = parser::parse_records(reader, kind)?;

        if parsed.migrated_fractions > 0 {
            debug!(
                migrated = parsed.migrated_fractions,
                "rewrote legacy (A|B) fractions to (A/B)"
            );
        }
        info!(
            kind = %kind,
            records = parsed.records.len(),
            header_skipped = parsed.header_skipped,
            "metrics file parsed"
        );

        Ok(MetricImport {
            records: parsed.records,
            header_skipped: parsed.header_skipped,
            migrated_fractions: parsed.migrated_fractions,
        })
    }
}
