use serde::{Deserialize, Serialize};

use crate::alignment::Alignment;
use crate::error::{Error, Result};

/// Snapshot of the alignments exposed by a model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlignmentSet {
    pub alignments: Vec<Alignment>,
}

impl AlignmentSet {
    pub fn new(alignments: Vec<Alignment>) -> Self {
        Self { alignments }
    }

    /// Names of all alignments in model order.
    pub fn names(&self) -> Vec<String> {
        self.alignments.iter().map(|a| a.name.clone()).collect()
    }

    /// Looks up an alignment by exact name.
    pub fn find(&self, name: &str) -> Result<&Alignment> {
        self.alignments
            .iter()
            .find(|a| a.name == name)
            .ok_or_else(|| Error::NotFound {
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_is_exact() {
        let set = AlignmentSet::new(vec![
            Alignment::new("Main Road", 1000.0, Vec::new()),
            Alignment::new("Ramp A", 100.0, Vec::new()),
        ]);
        assert_eq!(set.names(), vec!["Main Road", "Ramp A"]);
        assert_eq!(set.find("Ramp A").unwrap().station_index_increment, 100.0);
        assert!(matches!(set.find("ramp a"), Err(Error::NotFound { .. })));
        assert!(matches!(set.find("Main"), Err(Error::NotFound { .. })));
    }
}
