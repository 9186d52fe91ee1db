//! Per-unit remap counters.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Counters collected while remapping one or more units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemapStats {
    /// Identifier occurrences visited.
    pub names_visited: usize,
    /// Occurrences that produced a rename edit.
    pub renamed: usize,
    /// Occurrences skipped for lack of a usable binding.
    pub unresolved: usize,
    /// Occurrences skipped because the mapping set has no entry.
    pub unmapped: usize,
    /// Method, constructor and lambda frames opened.
    pub frames_entered: usize,
}

impl RemapStats {
    /// Add another set of counters into this one.
    pub fn merge(&mut self, other: &RemapStats) {
        self.names_visited += other.names_visited;
        self.renamed += other.renamed;
        self.unresolved += other.unresolved;
        self.unmapped += other.unmapped;
        self.frames_entered += other.frames_entered;
    }
}

impl fmt::Display for RemapStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} name(s), {} renamed, {} unresolved, {} unmapped, {} frame(s)",
            self.names_visited, self.renamed, self.unresolved, self.unmapped, self.frames_entered
        )
    }
}
