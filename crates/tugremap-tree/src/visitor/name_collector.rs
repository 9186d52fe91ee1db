// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! NameCollector visitor for identifier occurrence extraction.
//!
//! Collects every [`NodeKind::SimpleName`](crate::nodes::NodeKind::SimpleName)
//! in a unit, in source order, together with its span and the scope depth
//! (number of enclosing method and lambda frames) at which it occurs.

use serde::Serialize;

use tugremap_core::patch::{NodeId, Span};

use super::dispatch::walk_unit;
use super::traits::{VisitResult, Visitor};
use crate::nodes::{CompilationUnit, Node};

/// One identifier occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameOccurrence {
    pub node: NodeId,
    pub span: Span,
    pub identifier: String,
    /// Enclosing method and lambda declarations.
    pub frame_depth: usize,
}

/// A visitor that collects identifier occurrences.
#[derive(Debug, Default)]
pub struct NameCollector {
    names: Vec<NameOccurrence>,
    frame_depth: usize,
}

impl NameCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect all identifier occurrences in `unit`.
    pub fn collect(unit: &CompilationUnit) -> Vec<NameOccurrence> {
        let mut collector = NameCollector::new();
        walk_unit(&mut collector, unit);
        collector.into_names()
    }

    pub fn into_names(self) -> Vec<NameOccurrence> {
        self.names
    }
}

impl Visitor for NameCollector {
    fn visit_method_declaration(&mut self, _node: &Node) -> VisitResult {
        self.frame_depth += 1;
        VisitResult::Continue
    }

    fn leave_method_declaration(&mut self, _node: &Node) {
        self.frame_depth -= 1;
    }

    fn visit_lambda_expression(&mut self, _node: &Node) -> VisitResult {
        self.frame_depth += 1;
        VisitResult::Continue
    }

    fn leave_lambda_expression(&mut self, _node: &Node) {
        self.frame_depth -= 1;
    }

    fn visit_simple_name(&mut self, node: &Node) -> VisitResult {
        if let Some(identifier) = node.identifier() {
            self.names.push(NameOccurrence {
                node: node.id,
                span: node.span,
                identifier: identifier.to_string(),
                frame_depth: self.frame_depth,
            });
        }
        VisitResult::SkipChildren
    }
}
