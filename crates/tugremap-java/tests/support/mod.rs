//! Shared test support utilities.
//!
//! Builders for method and parameter bindings with predictable keys, and a
//! one-call remap helper that returns the rewritten source.

#![allow(dead_code)]

use std::sync::OnceLock;

use tugremap_core::descriptor::{parse_method_descriptor, MethodSignature};
use tugremap_core::mappings::{InheritanceProvider, MappingSet};
use tugremap_core::patch::EditBatch;
use tugremap_java::Remapper;
use tugremap_tree::binding::{BindingTable, MethodBinding, TypeBinding, VariableBinding};
use tugremap_tree::nodes::CompilationUnit;

static TRACING: OnceLock<()> = OnceLock::new();

/// Install a test subscriber once; honors `RUST_LOG`.
pub fn init_tracing() {
    TRACING.get_or_init(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn sig(name: &str, desc: &str) -> MethodSignature {
    MethodSignature::parse(name, desc).expect("valid descriptor")
}

/// A method binding keyed `class.name(desc)`, with parameter keys `key#param`.
pub fn method(class: &str, name: &str, desc: &str, is_static: bool, params: &[&str]) -> MethodBinding {
    let key = format!("{}.{}{}", class, name, desc);
    let mut binding = MethodBinding::new(
        key.clone(),
        name,
        parse_method_descriptor(desc).expect("valid descriptor"),
    )
    .declared_in(TypeBinding::named(class))
    .with_static(is_static);
    for param in params {
        binding = binding.with_parameter(format!("{}#{}", key, param));
    }
    binding
}

/// A constructor binding (`<init>`) for `class`.
pub fn constructor(class: &str, desc: &str, params: &[&str]) -> MethodBinding {
    method(class, "<init>", desc, false, params).constructor()
}

/// The parameter binding declared at `position` of `method`.
pub fn param(method: &MethodBinding, position: usize) -> VariableBinding {
    let key = method.parameters[position].clone();
    let name = key
        .as_str()
        .rsplit_once('#')
        .map_or(key.as_str(), |(_, name)| name)
        .to_string();
    VariableBinding::parameter(key.0.clone(), name, Some(method.key.clone()), position)
}

/// Remap `unit` and return the edits plus the rewritten source.
pub fn remap(
    mappings: &MappingSet,
    inheritance: &dyn InheritanceProvider,
    unit: &CompilationUnit,
    bindings: &BindingTable,
) -> (EditBatch, String) {
    init_tracing();
    let batch = Remapper::new(mappings, inheritance)
        .remap_unit(unit, bindings)
        .expect("remap succeeds");
    let source = batch.apply(&unit.source).expect("edits apply");
    (batch, source)
}
