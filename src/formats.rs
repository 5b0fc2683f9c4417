//! CSV output and the error type shared by all exporters.

use crate::model::Record;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from the CSV and XLSX writers. A failed write leaves the file incomplete.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to create output file: {path}: {source}")]
    CreateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to write workbook archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// Price as a decimal that always carries a fractional part (`10.0`, not `10`), using the
/// shortest digits that parse back to the same value.
pub(crate) fn format_price(price: f64) -> String {
    format!("{:?}", price)
}

/// Write records as UTF-8 CSV with a `Title,Price,Rating,Availability,URL` header. Overwrites `path`.
pub fn write_csv(records: &[Record], path: &Path) -> Result<(), ExportError> {
    let file = std::fs::File::create(path).map_err(|e| ExportError::CreateFile {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut wtr = csv::Writer::from_writer(file);
    wtr.write_record(Record::HEADERS)?;
    for r in records {
        let price = format_price(r.price);
        let rating = r.rating.as_u8().to_string();
        wtr.write_record([
            r.title.as_str(),
            price.as_str(),
            rating.as_str(),
            r.availability.as_str(),
            r.url.as_str(),
        ])?;
    }
    wtr.flush()?;
    log::debug!("wrote {} rows to {}", records.len(), path.display());
    Ok(())
}
