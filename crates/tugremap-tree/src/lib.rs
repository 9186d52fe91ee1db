// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Resolved syntax tree support for tugremap.
//!
//! This crate provides the tree the remap engine walks:
//! - [`nodes`]: tree nodes, compilation units and [`UnitBuilder`](nodes::UnitBuilder)
//! - [`binding`]: resolved bindings and the [`BindingProvider`](binding::BindingProvider) seam
//! - [`visitor`]: visit/leave hooks and walk functions

pub mod binding;
pub mod nodes;
pub mod visitor;

pub use binding::{
    Binding, BindingKey, BindingKind, BindingProvider, BindingTable, MethodBinding, TypeBinding,
    VariableBinding, VariableKind,
};
pub use nodes::{CompilationUnit, Node, NodeKind, UnitBuilder};
