//! Core infrastructure for tugremap.
//!
//! This crate provides the language-agnostic pieces the remap engine is built on:
//! - Edit IR: spans, node ids, rename edits, edit sinks and text application
//! - JVM descriptors and the erased signatures used as mapping keys
//! - The mapping store (class → method/field → parameter) with inheritance completion
//! - Error types
//! - Configuration loading

pub mod config;
pub mod descriptor;
pub mod error;
pub mod mappings;
pub mod patch;
