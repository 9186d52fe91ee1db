//! Tugremap: binding-driven identifier remapping for resolved JVM source trees.
//!
//! Renames classes, constructors, methods, fields and parameters according to
//! a mapping set, proposing minimal idempotent edits that leave unmapped
//! symbols untouched.

// Core infrastructure - re-exported from tugremap-core
pub use tugremap_core::config;
pub use tugremap_core::descriptor;
pub use tugremap_core::error;
pub use tugremap_core::mappings;
pub use tugremap_core::patch;

// Resolved tree model - re-exported from tugremap-tree
pub use tugremap_tree::binding;
pub use tugremap_tree::nodes;
pub use tugremap_tree::visitor;

// Remap engine - re-exported from tugremap-java
pub use tugremap_java::driver;
pub use tugremap_java::remapper;
pub use tugremap_java::slots;
pub use tugremap_java::stats;
pub use tugremap_java::{Remapper, ResolvedUnit, UnitOutcome};

// Project-level entry point
pub mod project;
