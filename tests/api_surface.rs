//! Compile-only test to verify public API surface.
//!
//! This file serves as a compile-time contract for the public API.
//! If this file fails to compile, the public API has regressed.
//!
//! Run with: cargo test -p tugremap -- api_surface

// Allow unused imports - this test is about compile-time verification, not runtime usage
#![allow(unused_imports)]

// ============================================================================
// Core Infrastructure Types
// ============================================================================

// patch module - edit IR and application
use tugremap::patch::{
    apply_edits, EditBatch, EditError, EditResult, EditSink, NodeId, RenameEdit, Span,
};

// error module
use tugremap::error::{RemapError, RemapResult};

// config module
use tugremap::config::{RemapConfig, CONFIG_DIR, CONFIG_FILE};

// descriptor module - JVM descriptors and mapping keys
use tugremap::descriptor::{
    parse_field_descriptor, parse_method_descriptor, BaseType, FieldSignature, FieldType,
    MethodDescriptor, MethodSignature, ReturnType,
};

// mappings module - mapping store and inheritance completion
use tugremap::mappings::{
    internal_name, simple_name, ClassHierarchy, ClassInfo, ClassMapping, FieldMapping,
    InheritanceProvider, MappingSet, MemberAccess, MethodMapping, ParameterMapping, SlotIndex,
};

// ============================================================================
// Tree Types
// ============================================================================

use tugremap::binding::{
    Binding, BindingKey, BindingKind, BindingProvider, BindingTable, MethodBinding, TypeBinding,
    VariableBinding, VariableKind,
};
use tugremap::nodes::{CompilationUnit, Node, NodeKind, UnitBuilder};
use tugremap::visitor::{walk_node, walk_unit, NameCollector, NameOccurrence, VisitResult, Visitor};

// ============================================================================
// Engine Types
// ============================================================================

use tugremap::driver::{total_stats, ResolvedUnit, UnitOutcome, UnitRemap};
use tugremap::project::{remap_project, ProjectRemap};
use tugremap::remapper::Remapper;
use tugremap::slots::{first_slot, parameter_slot, Frame, FrameStack};
use tugremap::stats::RemapStats;

// Top-level re-exports
use tugremap::{Remapper as _, ResolvedUnit as _, UnitOutcome as _};

#[test]
fn api_surface_compiles() {
    // This test exists only to ensure the imports above compile.
}
