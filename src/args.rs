use crate::error::{GroupSyncError, Result};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationParams {
    pub group_id: String,
    pub group_name: String,
    pub csv_path: PathBuf,
}

pub fn usage(program: &str) -> String {
    format!(
        "Usage: {} <group_id> <group_name> <csv_path>\n\
         Example: {} 42 \"Lab Macs\" computers.csv",
        program, program
    )
}

impl InvocationParams {
    /// Validates raw argv (program name first). Performs no I/O.
    pub fn from_args<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = args.into_iter().map(Into::<String>::into);
        let program = args
            .next()
            .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());

        let mut next_non_empty = || args.next().filter(|a| !a.trim().is_empty());
        let group_id = next_non_empty();
        let group_name = next_non_empty();
        let csv_path = next_non_empty();

        let (group_id, group_name, csv_path) = match (group_id, group_name, csv_path) {
            (Some(id), Some(name), Some(path)) => (id, name, path),
            _ => return Err(GroupSyncError::Usage(usage(&program))),
        };

        let extra = args.count();
        if extra > 0 {
            log::warn!("Ignoring {} extra argument(s)", extra);
        }

        Ok(InvocationParams {
            group_id: group_id.trim().to_string(),
            group_name,
            csv_path: PathBuf::from(csv_path),
        })
    }
}
