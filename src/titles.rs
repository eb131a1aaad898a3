//! Title list loading.
//!
//! The input is a CSV file whose first row is a header. Only the first column
//! of each following row is used; rows whose first cell is blank are skipped.
//! A UTF-8 byte order mark (common in spreadsheet exports) is tolerated.

use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TitlesError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Read titles from the CSV at `path`, in file order.
pub fn load_titles(path: &Path) -> Result<Vec<String>, TitlesError> {
    let content = fs::read_to_string(path)?;
    parse_titles(&content)
}

/// Parse titles from CSV text.
pub fn parse_titles(content: &str) -> Result<Vec<String>, TitlesError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut titles = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(title) = record.get(0).map(str::trim).filter(|t| !t.is_empty()) {
            titles.push(title.to_string());
        }
    }
    Ok(titles)
}
