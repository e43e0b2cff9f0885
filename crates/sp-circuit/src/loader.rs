//! CSV sentry-list loader.
//!
//! # CSV format
//!
//! ```csv
//! name,card,id
//! Alice,Card 1,0xA1
//! Bob,Card 2,0xB2
//! ```

use std::io::Read;
use std::path::Path;

use crate::{CircuitError, SentryAssignment};

/// Load the on-duty sentries from a CSV file.
pub fn load_sentries_csv(path: &Path) -> Result<Vec<SentryAssignment>, CircuitError> {
    let file = std::fs::File::open(path).map_err(CircuitError::Io)?;
    load_sentries_reader(file)
}

/// Like [`load_sentries_csv`] but accepts any `Read` source.
pub fn load_sentries_reader<R: Read>(reader: R) -> Result<Vec<SentryAssignment>, CircuitError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    csv_reader
        .deserialize::<SentryAssignment>()
        .map(|row| row.map_err(|e| CircuitError::Parse(e.to_string())))
        .collect()
}
