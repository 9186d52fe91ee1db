// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Walk functions for resolved tree traversal.
//!
//! - **Pre-order**: `visit_*` is called before descending into children
//! - **Post-order**: `leave_*` is called after all children have been visited
//! - **Source order**: Children are visited in the order they appear
//!
//! # Control Flow
//!
//! - `VisitResult::Continue` - traverse into children
//! - `VisitResult::SkipChildren` - skip children but still call `leave_*`
//! - `VisitResult::Stop` - halt traversal immediately (no `leave_*` called)

use super::traits::{VisitResult, Visitor};
use crate::nodes::{CompilationUnit, Node, NodeKind};

/// Walk a [`CompilationUnit`] and its tree.
///
/// Traversal order:
/// 1. `visit_compilation_unit`
/// 2. Walk each child of the root (in source order)
/// 3. `leave_compilation_unit`
pub fn walk_unit<V: Visitor>(visitor: &mut V, unit: &CompilationUnit) -> VisitResult {
    let result = visitor.visit_compilation_unit(unit);
    match result {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            if walk_children(visitor, &unit.root) == VisitResult::Stop {
                return VisitResult::Stop;
            }
        }
    }
    visitor.leave_compilation_unit(unit);
    VisitResult::Continue
}

/// Walk a [`Node`], dispatching to the hooks for its kind.
pub fn walk_node<V: Visitor>(visitor: &mut V, node: &Node) -> VisitResult {
    let result = match &node.kind {
        NodeKind::TypeDeclaration => visitor.visit_type_declaration(node),
        NodeKind::AnonymousClass => visitor.visit_anonymous_class(node),
        NodeKind::MethodDeclaration => visitor.visit_method_declaration(node),
        NodeKind::LambdaExpression => visitor.visit_lambda_expression(node),
        NodeKind::SimpleName { .. } => visitor.visit_simple_name(node),
        NodeKind::Block | NodeKind::Unit => visitor.visit_block(node),
    };
    match result {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            if walk_children(visitor, node) == VisitResult::Stop {
                return VisitResult::Stop;
            }
        }
    }
    match &node.kind {
        NodeKind::TypeDeclaration => visitor.leave_type_declaration(node),
        NodeKind::AnonymousClass => visitor.leave_anonymous_class(node),
        NodeKind::MethodDeclaration => visitor.leave_method_declaration(node),
        NodeKind::LambdaExpression => visitor.leave_lambda_expression(node),
        NodeKind::SimpleName { .. } => visitor.leave_simple_name(node),
        NodeKind::Block | NodeKind::Unit => visitor.leave_block(node),
    }
    VisitResult::Continue
}

fn walk_children<V: Visitor>(visitor: &mut V, node: &Node) -> VisitResult {
    for child in &node.children {
        if walk_node(visitor, child) == VisitResult::Stop {
            return VisitResult::Stop;
        }
    }
    VisitResult::Continue
}
