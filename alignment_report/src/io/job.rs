//! Exchange files passed between the report client and the job runner.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Alignment names published for the client to choose from (`AlignmentName.json`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentNames {
    pub name: Vec<String>,
}

/// Report request naming the selected alignment (`AlignmentNameForReport.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub name: String,
}

pub fn write_alignment_names(path: &str, names: &AlignmentNames) -> Result<()> {
    let json = serde_json::to_string(names)?;
    crate::io::write_string(path, &json)?;
    Ok(())
}

pub fn read_alignment_names(path: &str) -> Result<AlignmentNames> {
    let contents = crate::io::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

pub fn read_report_request(path: &str) -> Result<ReportRequest> {
    let contents = crate::io::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}
