//! JVM identifier remapping for tugremap.
//!
//! This crate provides the remap engine:
//! - [`slots`]: JVM local variable slot layout and per-scope parameter frames
//! - [`remapper`]: identifier classification and rename proposal for one unit
//! - [`driver`]: parallel remapping of many units
//! - [`stats`]: per-unit counters
//!
//! # Example
//!
//! ```ignore
//! use tugremap_core::mappings::{ClassHierarchy, MappingSet};
//! use tugremap_java::Remapper;
//!
//! let mappings = MappingSet::new();
//! let hierarchy = ClassHierarchy::new();
//! let edits = Remapper::new(&mappings, &hierarchy).remap_unit(&unit, &bindings)?;
//! let renamed = edits.apply(&unit.source)?;
//! ```

pub mod driver;
pub mod remapper;
pub mod slots;
pub mod stats;

pub use driver::{total_stats, ResolvedUnit, UnitOutcome, UnitRemap};
pub use remapper::Remapper;
pub use slots::{parameter_slot, Frame, FrameStack};
pub use stats::RemapStats;
