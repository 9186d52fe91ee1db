// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Resolved bindings and the provider seam that attaches them to nodes.
//!
//! A binding is the semantic identity behind an identifier occurrence: which
//! type, method or variable it names, where that symbol is declared, and its
//! erased signature. Bindings come from a type checker; the remapper only reads
//! them through [`BindingProvider`].
//!
//! Binding identity is a [`BindingKey`], not a name: two parameters with the
//! same name in nested scopes have distinct keys.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use tugremap_core::descriptor::{FieldSignature, FieldType, MethodDescriptor, MethodSignature};
use tugremap_core::patch::NodeId;

use crate::nodes::Node;

// ============================================================================
// Binding Identity
// ============================================================================

/// Stable identity of a binding within one resolution pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BindingKey(pub String);

impl BindingKey {
    pub fn new(key: impl Into<String>) -> Self {
        BindingKey(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BindingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Bindings
// ============================================================================

/// A resolved type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeBinding {
    pub key: BindingKey,
    /// Binary name; absent for anonymous, local and synthetic types.
    pub binary_name: Option<String>,
}

impl TypeBinding {
    /// A named type whose key is its binary name.
    pub fn named(binary_name: &str) -> Self {
        TypeBinding {
            key: BindingKey::new(binary_name),
            binary_name: Some(binary_name.to_string()),
        }
    }

    /// A type without a binary name.
    pub fn anonymous(key: impl Into<String>) -> Self {
        TypeBinding {
            key: BindingKey::new(key),
            binary_name: None,
        }
    }
}

/// A resolved method, constructor or lambda.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodBinding {
    pub key: BindingKey,
    pub name: String,
    pub declaring_class: Option<TypeBinding>,
    /// Erased descriptor.
    pub descriptor: MethodDescriptor,
    pub is_static: bool,
    pub is_constructor: bool,
    /// Keys of the declared parameter bindings, in declaration order.
    pub parameters: Vec<BindingKey>,
}

impl MethodBinding {
    pub fn new(key: impl Into<String>, name: impl Into<String>, descriptor: MethodDescriptor) -> Self {
        MethodBinding {
            key: BindingKey::new(key),
            name: name.into(),
            declaring_class: None,
            descriptor,
            is_static: false,
            is_constructor: false,
            parameters: Vec::new(),
        }
    }

    pub fn declared_in(mut self, class: TypeBinding) -> Self {
        self.declaring_class = Some(class);
        self
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn constructor(mut self) -> Self {
        self.is_constructor = true;
        self
    }

    pub fn with_parameter(mut self, key: impl Into<String>) -> Self {
        self.parameters.push(BindingKey::new(key));
        self
    }

    /// Binary name of the declaring class, if it has one.
    pub fn declaring_binary_name(&self) -> Option<&str> {
        self.declaring_class
            .as_ref()
            .and_then(|class| class.binary_name.as_deref())
    }

    /// The erased signature used as a mapping key.
    pub fn signature(&self) -> MethodSignature {
        MethodSignature::new(self.name.clone(), self.descriptor.clone())
    }
}

/// What a variable binding names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariableKind {
    Field,
    Parameter,
    Local,
}

/// A resolved field, parameter or local variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableBinding {
    pub key: BindingKey,
    pub name: String,
    pub kind: VariableKind,
    /// Declaring class of a field.
    pub declaring_class: Option<TypeBinding>,
    /// Declaring method of a parameter.
    pub declaring_method: Option<BindingKey>,
    /// Declaration-order position of a parameter.
    pub position: usize,
    /// Erased type, when known.
    pub ty: Option<FieldType>,
}

impl VariableBinding {
    fn new(key: impl Into<String>, name: impl Into<String>, kind: VariableKind) -> Self {
        VariableBinding {
            key: BindingKey::new(key),
            name: name.into(),
            kind,
            declaring_class: None,
            declaring_method: None,
            position: 0,
            ty: None,
        }
    }

    pub fn field(key: impl Into<String>, name: impl Into<String>, class: TypeBinding) -> Self {
        let mut binding = Self::new(key, name, VariableKind::Field);
        binding.declaring_class = Some(class);
        binding
    }

    pub fn parameter(
        key: impl Into<String>,
        name: impl Into<String>,
        method: Option<BindingKey>,
        position: usize,
    ) -> Self {
        let mut binding = Self::new(key, name, VariableKind::Parameter);
        binding.declaring_method = method;
        binding.position = position;
        binding
    }

    pub fn local(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(key, name, VariableKind::Local)
    }

    pub fn with_type(mut self, ty: FieldType) -> Self {
        self.ty = Some(ty);
        self
    }

    /// Binary name of the declaring class, if it has one.
    pub fn declaring_binary_name(&self) -> Option<&str> {
        self.declaring_class
            .as_ref()
            .and_then(|class| class.binary_name.as_deref())
    }

    /// The field signature used as a mapping key.
    pub fn field_signature(&self) -> FieldSignature {
        FieldSignature::new(self.name.clone(), self.ty.clone())
    }
}

/// The classification of a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BindingKind {
    Class,
    Method,
    Constructor,
    Field,
    Parameter,
    Local,
}

impl BindingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BindingKind::Class => "class",
            BindingKind::Method => "method",
            BindingKind::Constructor => "constructor",
            BindingKind::Field => "field",
            BindingKind::Parameter => "parameter",
            BindingKind::Local => "local",
        }
    }
}

impl fmt::Display for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    Type(TypeBinding),
    Method(MethodBinding),
    Variable(VariableBinding),
}

impl Binding {
    pub fn kind(&self) -> BindingKind {
        match self {
            Binding::Type(_) => BindingKind::Class,
            Binding::Method(method) if method.is_constructor => BindingKind::Constructor,
            Binding::Method(_) => BindingKind::Method,
            Binding::Variable(variable) => match variable.kind {
                VariableKind::Field => BindingKind::Field,
                VariableKind::Parameter => BindingKind::Parameter,
                VariableKind::Local => BindingKind::Local,
            },
        }
    }

    pub fn key(&self) -> &BindingKey {
        match self {
            Binding::Type(ty) => &ty.key,
            Binding::Method(method) => &method.key,
            Binding::Variable(variable) => &variable.key,
        }
    }
}

impl From<TypeBinding> for Binding {
    fn from(binding: TypeBinding) -> Self {
        Binding::Type(binding)
    }
}

impl From<MethodBinding> for Binding {
    fn from(binding: MethodBinding) -> Self {
        Binding::Method(binding)
    }
}

impl From<VariableBinding> for Binding {
    fn from(binding: VariableBinding) -> Self {
        Binding::Variable(binding)
    }
}

// ============================================================================
// Provider
// ============================================================================

/// Resolves nodes to bindings.
///
/// Declaration nodes (methods, lambdas) resolve to the binding they declare;
/// identifier nodes resolve to the binding they name. `None` means the node
/// could not be resolved.
pub trait BindingProvider {
    fn resolve(&self, node: &Node) -> Option<&Binding>;
}

/// Bindings keyed by node id.
#[derive(Debug, Clone, Default)]
pub struct BindingTable {
    bindings: HashMap<NodeId, Binding>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a binding to a node, replacing any previous one.
    pub fn insert(&mut self, node: NodeId, binding: impl Into<Binding>) {
        self.bindings.insert(node, binding.into());
    }

    pub fn with(mut self, node: NodeId, binding: impl Into<Binding>) -> Self {
        self.insert(node, binding);
        self
    }

    pub fn get(&self, node: NodeId) -> Option<&Binding> {
        self.bindings.get(&node)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl BindingProvider for BindingTable {
    fn resolve(&self, node: &Node) -> Option<&Binding> {
        self.get(node.id)
    }
}
