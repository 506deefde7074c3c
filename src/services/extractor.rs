use crate::domain::member_set::MemberSet;
use crate::error::{GroupSyncError, Result};
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::Path;

/// Header of the column holding device names in the inventory export.
pub const MEMBER_COLUMN: &str = "Computer Name";

pub fn extract_members(path: &Path, column: &str) -> Result<MemberSet> {
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => GroupSyncError::FileNotFound(path.display().to_string()),
        _ => GroupSyncError::from(e),
    })?;

    let reader = BufReader::new(file);
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let index = csv_reader
        .headers()?
        .iter()
        .position(|header| header.trim_start_matches('\u{feff}') == column)
        .ok_or_else(|| GroupSyncError::MissingColumn {
            column: column.to_string(),
            path: path.display().to_string(),
        })?;

    let mut members = MemberSet::new();
    for (row, result) in csv_reader.records().enumerate() {
        let record = result?;
        match record.get(index) {
            Some(name) if !name.is_empty() => {
                if !members.insert(name) {
                    log::debug!("Duplicate device '{}' on data row {}", name, row + 1);
                }
            }
            _ => log::warn!("Skipping data row {} with empty '{}'", row + 1, column),
        }
    }

    Ok(members)
}
