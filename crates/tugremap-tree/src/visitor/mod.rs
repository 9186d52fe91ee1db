// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor infrastructure for resolved tree traversal.
//!
//! # Traversal Order
//!
//! - **Depth-first, pre-order** for `visit_*` methods
//! - **Post-order** for `leave_*` methods
//! - Children are visited in source order
//!
//! # Visitor Pattern
//!
//! ```ignore
//! use tugremap_tree::visitor::{walk_unit, Visitor, VisitResult};
//!
//! struct MethodCounter {
//!     count: usize,
//! }
//!
//! impl Visitor for MethodCounter {
//!     fn visit_method_declaration(&mut self, _node: &Node) -> VisitResult {
//!         self.count += 1;
//!         VisitResult::Continue
//!     }
//! }
//! ```

mod dispatch;
mod name_collector;
mod traits;

pub use dispatch::*;
pub use name_collector::{NameCollector, NameOccurrence};
pub use traits::{VisitResult, Visitor};
