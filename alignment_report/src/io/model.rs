use crate::error::Result;
use crate::source::AlignmentSet;

/// Reads an alignment model snapshot stored as JSON.
pub fn read_alignments_json(path: &str) -> Result<AlignmentSet> {
    let contents = crate::io::read_to_string(path)?;
    parse_alignments_json(&contents)
}

/// Parses an alignment model snapshot from a JSON string.
pub fn parse_alignments_json(json: &str) -> Result<AlignmentSet> {
    Ok(serde_json::from_str(json)?)
}

/// Writes an alignment model snapshot as pretty-printed JSON.
pub fn write_alignments_json(path: &str, set: &AlignmentSet) -> Result<()> {
    let json = serde_json::to_string_pretty(set)?;
    crate::io::write_string(path, &json)?;
    Ok(())
}
