//! Error types for tugremap.
//!
//! Remapping distinguishes three outcomes for a single identifier occurrence:
//!
//! - **Unresolvable**: no binding, or a declaring type without a binary name.
//!   Skipped silently; never an error.
//! - **Unmapped**: the mapping set has no entry for the symbol. Skipped
//!   silently; never an error.
//! - **Invariant violation**: the resolved tree contradicts itself (a parameter
//!   with no declaring method, a frame popped for the wrong declaration).
//!   Fatal to the unit being traversed, and only to that unit.
//!
//! Only the last category surfaces as a [`RemapError`]. The remaining variants
//! cover the ambient failures around the engine: descriptor parsing,
//! configuration loading and edit application.

use thiserror::Error;

use crate::patch::{EditError, NodeId};

// ============================================================================
// Unified Error Type
// ============================================================================

/// Errors produced while remapping a compilation unit or preparing its inputs.
#[derive(Debug, Error)]
pub enum RemapError {
    /// A parameter binding reported no declaring method.
    #[error("parameter '{name}' at {node} has no declaring method")]
    OrphanParameter { name: String, node: NodeId },

    /// A scope was left that does not match the innermost open frame.
    #[error("frame mismatch: leaving {leaving} but innermost frame belongs to {}", describe_frame(innermost))]
    FrameMismatch {
        leaving: NodeId,
        innermost: Option<NodeId>,
    },

    /// A JVM descriptor string could not be parsed.
    #[error("invalid descriptor '{descriptor}'")]
    InvalidDescriptor { descriptor: String },

    /// Configuration could not be read or parsed.
    #[error("config error: {message}")]
    Config { message: String },

    /// The worker pool for parallel remapping could not be built.
    #[error("thread pool error: {message}")]
    ThreadPool { message: String },

    /// Proposed edits could not be applied to source text.
    #[error("edit error: {0}")]
    Edit(#[from] EditError),
}

/// Result type for remap operations.
pub type RemapResult<T> = Result<T, RemapError>;

fn describe_frame(innermost: &Option<NodeId>) -> String {
    match innermost {
        Some(node) => node.to_string(),
        None => "nothing".to_string(),
    }
}

// ============================================================================
// Classification
// ============================================================================

impl RemapError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        RemapError::Config {
            message: message.into(),
        }
    }

    /// Create an invalid descriptor error.
    pub fn invalid_descriptor(descriptor: impl Into<String>) -> Self {
        RemapError::InvalidDescriptor {
            descriptor: descriptor.into(),
        }
    }

    /// Whether this error reports an internal inconsistency of the resolved tree.
    ///
    /// Invariant violations abort the current unit's traversal. They are never
    /// produced for missing bindings or missing mappings.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            RemapError::OrphanParameter { .. } | RemapError::FrameMismatch { .. }
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
