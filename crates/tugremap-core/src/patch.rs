//! Edit IR: Span, NodeId, RenameEdit and the sinks that collect them.
//!
//! The remap engine never touches source text. It proposes [`RenameEdit`]s,
//! each naming one identifier node and its replacement text, and hands them
//! to an [`EditSink`]. This module provides:
//! - Byte spans and node identities shared by the tree and the edits
//! - The [`EditSink`] seam plus [`EditBatch`], an at-most-one-edit-per-node sink
//! - [`apply_edits`], which materializes a batch against source text with
//!   bounds, overlap and staleness checks

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

// ============================================================================
// Core Types
// ============================================================================

/// Stable identifier of a node within one compilation unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a new node ID.
    pub fn new(id: u32) -> Self {
        NodeId(id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node_{}", self.0)
    }
}

/// Byte offsets into unit source text.
///
/// Spans are half-open intervals: `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: u64,
    /// End byte offset (exclusive).
    pub end: u64,
}

impl Span {
    /// Create a new span.
    ///
    /// # Panics
    /// Panics if `start > end`.
    pub fn new(start: u64, end: u64) -> Self {
        assert!(
            start <= end,
            "Span start ({}) must be <= end ({})",
            start,
            end
        );
        Span { start, end }
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    /// Check if span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check if this span overlaps with another.
    ///
    /// Adjacent spans (one ends where another starts) do NOT overlap.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Check if this span contains another span entirely.
    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

// ============================================================================
// Rename Edits
// ============================================================================

/// A proposed replacement of one identifier node's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameEdit {
    /// The identifier node being renamed.
    pub node: NodeId,
    /// Where the identifier sits in the unit's source text.
    pub span: Span,
    /// The identifier text the edit expects to replace.
    pub old_name: String,
    /// The replacement identifier text.
    pub new_name: String,
}

impl RenameEdit {
    /// Propose renaming `current` to `target`.
    ///
    /// Returns `None` when the names are already equal, so a remap against
    /// already-renamed source produces no edits.
    pub fn between(node: NodeId, span: Span, current: &str, target: &str) -> Option<Self> {
        if current == target {
            return None;
        }
        Some(RenameEdit {
            node,
            span,
            old_name: current.to_string(),
            new_name: target.to_string(),
        })
    }
}

impl fmt::Display for RenameEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {} -> {}",
            self.node, self.span, self.old_name, self.new_name
        )
    }
}

/// Receives rename edits as the engine proposes them.
pub trait EditSink {
    /// Accept one proposed edit.
    fn submit(&mut self, edit: RenameEdit);
}

impl EditSink for Vec<RenameEdit> {
    fn submit(&mut self, edit: RenameEdit) {
        self.push(edit);
    }
}

/// An edit sink holding at most one edit per node, ordered by node id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditBatch {
    edits: BTreeMap<NodeId, RenameEdit>,
}

impl EditBatch {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of edits in the batch.
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Whether the batch holds no edits.
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// The edit proposed for `node`, if any.
    pub fn get(&self, node: NodeId) -> Option<&RenameEdit> {
        self.edits.get(&node)
    }

    /// Iterate edits in node order.
    pub fn iter(&self) -> impl Iterator<Item = &RenameEdit> {
        self.edits.values()
    }

    /// Consume the batch, returning edits ordered by span start.
    pub fn into_edits(self) -> Vec<RenameEdit> {
        let mut edits: Vec<RenameEdit> = self.edits.into_values().collect();
        edits.sort_by_key(|edit| edit.span.start);
        edits
    }

    /// Apply every edit in the batch to `source`.
    pub fn apply(&self, source: &str) -> EditResult<String> {
        let edits: Vec<RenameEdit> = self.edits.values().cloned().collect();
        apply_edits(source, &edits)
    }
}

impl EditSink for EditBatch {
    fn submit(&mut self, edit: RenameEdit) {
        match self.edits.get(&edit.node) {
            Some(existing) if existing.new_name != edit.new_name => {
                tracing::warn!(
                    "conflicting edits for {}: keeping '{}', dropping '{}'",
                    edit.node,
                    existing.new_name,
                    edit.new_name
                );
            }
            Some(_) => {}
            None => {
                self.edits.insert(edit.node, edit);
            }
        }
    }
}

// ============================================================================
// Edit Application
// ============================================================================

/// Errors raised while applying edits to source text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// A span extends beyond the source text length.
    #[error("span {span} is out of bounds for source of length {source_len}")]
    SpanOutOfBounds { span: Span, source_len: u64 },

    /// Two spans overlap.
    #[error("overlapping spans: {first} and {second}")]
    OverlappingSpans { first: Span, second: Span },

    /// The text at a span is not the identifier the edit expects to replace.
    #[error("stale edit at {span}: expected '{expected}', found '{found}'")]
    StaleEdit {
        span: Span,
        expected: String,
        found: String,
    },
}

/// Result type for edit application.
pub type EditResult<T> = Result<T, EditError>;

/// Apply rename edits to `source`, returning the edited text.
///
/// All edits are validated before any is applied. Edits are then applied from
/// end to start so earlier spans stay valid as text lengths change. An empty
/// edit list returns the source unchanged.
pub fn apply_edits(source: &str, edits: &[RenameEdit]) -> EditResult<String> {
    let source_len = source.len() as u64;

    let mut ordered: Vec<&RenameEdit> = edits.iter().collect();
    ordered.sort_by(|a, b| b.span.start.cmp(&a.span.start));

    for edit in &ordered {
        let span = edit.span;
        let found = if span.end > source_len {
            None
        } else {
            source.get(span.start as usize..span.end as usize)
        };
        let Some(found) = found else {
            return Err(EditError::SpanOutOfBounds { span, source_len });
        };
        if found != edit.old_name {
            return Err(EditError::StaleEdit {
                span,
                expected: edit.old_name.clone(),
                found: found.to_string(),
            });
        }
    }

    // After the reverse sort, prev.start >= curr.start
    for pair in ordered.windows(2) {
        let (prev, curr) = (pair[0], pair[1]);
        if curr.span.end > prev.span.start {
            return Err(EditError::OverlappingSpans {
                first: curr.span,
                second: prev.span,
            });
        }
    }

    let mut result = source.to_string();
    for edit in ordered {
        result.replace_range(
            edit.span.start as usize..edit.span.end as usize,
            &edit.new_name,
        );
    }
    Ok(result)
}

// ============================================================================
// Tests
// ============================================================================
