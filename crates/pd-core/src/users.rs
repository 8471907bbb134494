//! User row logging.
//!
//! Rows arrive as a CSV export of the `users` table. The header row supplies
//! the column names; each row is logged at INFO as `col=val;col=val;...`
//! through the user-data logger, which redacts the PII columns.

use std::io::Read;

use thiserror::Error;
use tracing::debug;

use crate::logging::{LogError, Logger};
use pd_redact::SEPARATOR;

#[derive(Error, Debug)]
pub enum UsersError {
    #[error("failed to read user rows: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Log(#[from] LogError),
}

/// Render one row as `col=val;` pairs.
///
/// Columns and values are paired positionally; surplus entries on either
/// side are ignored.
pub fn row_message<C, V>(columns: &[C], values: &[V]) -> String
where
    C: AsRef<str>,
    V: AsRef<str>,
{
    columns
        .iter()
        .zip(values)
        .map(|(col, val)| format!("{}={}{}", col.as_ref(), val.as_ref(), SEPARATOR))
        .collect()
}

/// Log every row of a CSV export through `logger`.
///
/// Returns the number of rows read. Rows below the logger's threshold are
/// still counted.
pub fn log_rows<R: Read>(reader: R, logger: &Logger) -> Result<usize, UsersError> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns: Vec<String> = csv.headers()?.iter().map(str::to_string).collect();
    debug!(columns = columns.len(), "read user export header");

    let mut count = 0;
    for row in csv.records() {
        let row = row?;
        let values: Vec<&str> = row.iter().collect();
        logger.info(&row_message(&columns, &values))?;
        count += 1;
    }

    debug!(rows = count, "logged user rows");
    Ok(count)
}
