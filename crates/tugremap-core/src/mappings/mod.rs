//! Mapping store: class → method/field → parameter name mappings.
//!
//! A [`MappingSet`] is a forest of [`ClassMapping`]s keyed by internal binary
//! name (`a/b/C$D`). Each class owns method mappings keyed by erased
//! [`MethodSignature`] and field mappings keyed by [`FieldSignature`]; each
//! method owns parameter mappings keyed by JVM local variable [`SlotIndex`].
//!
//! # Mutation Model
//!
//! The set is read-mostly during a remap pass. Two operations write:
//! - [`MappingSet::get_or_create_class`] inserts an identity mapping for a
//!   class that has none
//! - [`ClassMapping::complete`] populates a class's inherited methods, at most
//!   once per class (see [`inheritance`])
//!
//! Both are safe to call concurrently from parallel unit traversals.

pub mod inheritance;

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::descriptor::{FieldSignature, MethodSignature};

pub use inheritance::{ClassHierarchy, ClassInfo, InheritanceProvider, MemberAccess};

// ============================================================================
// Slot Index
// ============================================================================

/// Position of a parameter in JVM local variable storage.
///
/// Slot 0 holds the receiver of instance methods and constructors; `long`
/// and `double` parameters occupy two consecutive slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotIndex(pub u32);

impl SlotIndex {
    pub fn new(index: u32) -> Self {
        SlotIndex(index)
    }

    /// The slot `width` slots after this one.
    pub fn advance(self, width: u32) -> Self {
        SlotIndex(self.0 + width)
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot_{}", self.0)
    }
}

// ============================================================================
// Binary Names
// ============================================================================

/// Normalize a binary name to internal form (`a.b.C$D` → `a/b/C$D`).
pub fn internal_name(binary_name: &str) -> String {
    binary_name.replace('.', "/")
}

/// The simple name of a binary name: the segment after the last `/` and `$`.
pub fn simple_name(binary_name: &str) -> &str {
    let after_package = binary_name
        .rsplit_once('/')
        .map_or(binary_name, |(_, name)| name);
    after_package
        .rsplit_once('$')
        .map_or(after_package, |(_, name)| name)
}

// ============================================================================
// Member Mappings
// ============================================================================

/// Target name for one method parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterMapping {
    slot: SlotIndex,
    deobfuscated: String,
}

impl ParameterMapping {
    pub fn new(slot: SlotIndex, deobfuscated: impl Into<String>) -> Self {
        Self {
            slot,
            deobfuscated: deobfuscated.into(),
        }
    }

    pub fn slot(&self) -> SlotIndex {
        self.slot
    }

    pub fn deobfuscated_name(&self) -> &str {
        &self.deobfuscated
    }
}

/// Target name for one method, plus its parameter mappings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodMapping {
    signature: MethodSignature,
    deobfuscated: String,
    parameters: BTreeMap<SlotIndex, ParameterMapping>,
}

impl MethodMapping {
    pub fn new(signature: MethodSignature, deobfuscated: impl Into<String>) -> Self {
        Self {
            signature,
            deobfuscated: deobfuscated.into(),
            parameters: BTreeMap::new(),
        }
    }

    /// Add a parameter mapping at `slot`.
    pub fn with_parameter(mut self, slot: u32, deobfuscated: impl Into<String>) -> Self {
        let slot = SlotIndex::new(slot);
        self.parameters
            .insert(slot, ParameterMapping::new(slot, deobfuscated));
        self
    }

    pub fn signature(&self) -> &MethodSignature {
        &self.signature
    }

    pub fn obfuscated_name(&self) -> &str {
        &self.signature.name
    }

    pub fn deobfuscated_name(&self) -> &str {
        &self.deobfuscated
    }

    /// The parameter mapping at `slot`, if any.
    pub fn parameter(&self, slot: SlotIndex) -> Option<&ParameterMapping> {
        self.parameters.get(&slot)
    }

    /// Parameter mappings in slot order.
    pub fn parameters(&self) -> impl Iterator<Item = &ParameterMapping> {
        self.parameters.values()
    }
}

/// Target name for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    signature: FieldSignature,
    deobfuscated: String,
}

impl FieldMapping {
    pub fn new(signature: FieldSignature, deobfuscated: impl Into<String>) -> Self {
        Self {
            signature,
            deobfuscated: deobfuscated.into(),
        }
    }

    pub fn signature(&self) -> &FieldSignature {
        &self.signature
    }

    pub fn deobfuscated_name(&self) -> &str {
        &self.deobfuscated
    }
}

// ============================================================================
// Class Mapping
// ============================================================================

/// Inherited method mappings, filled in by completion.
pub(crate) type InheritedMethods = HashMap<MethodSignature, Arc<MethodMapping>>;

/// Mappings for one class.
///
/// Built by value with the `with_*` methods, then shared through a
/// [`MappingSet`]. Declared members are immutable once inserted; inherited
/// methods are added exactly once by [`ClassMapping::complete`].
#[derive(Debug)]
pub struct ClassMapping {
    obfuscated: String,
    deobfuscated: String,
    methods: HashMap<MethodSignature, Arc<MethodMapping>>,
    fields: HashMap<FieldSignature, FieldMapping>,
    fields_by_name: HashMap<String, FieldSignature>,
    inherited: OnceLock<InheritedMethods>,
}

impl ClassMapping {
    /// Create a mapping from `obfuscated` to `deobfuscated` binary name.
    pub fn new(obfuscated: &str, deobfuscated: &str) -> Self {
        Self {
            obfuscated: internal_name(obfuscated),
            deobfuscated: internal_name(deobfuscated),
            methods: HashMap::new(),
            fields: HashMap::new(),
            fields_by_name: HashMap::new(),
            inherited: OnceLock::new(),
        }
    }

    /// A mapping that keeps the class's own name.
    pub fn identity(binary_name: &str) -> Self {
        Self::new(binary_name, binary_name)
    }

    /// Add a method mapping.
    pub fn with_method(mut self, method: MethodMapping) -> Self {
        self.methods
            .insert(method.signature().clone(), Arc::new(method));
        self
    }

    /// Add a field mapping.
    pub fn with_field(mut self, field: FieldMapping) -> Self {
        let signature = field.signature().clone();
        self.fields_by_name
            .entry(signature.name.clone())
            .or_insert_with(|| signature.clone());
        self.fields.insert(signature, field);
        self
    }

    pub fn obfuscated_name(&self) -> &str {
        &self.obfuscated
    }

    pub fn deobfuscated_name(&self) -> &str {
        &self.deobfuscated
    }

    /// The simple target name, used for constructors and type references.
    pub fn simple_deobfuscated_name(&self) -> &str {
        simple_name(&self.deobfuscated)
    }

    /// Look up a method mapping: declared methods first, then inherited ones.
    ///
    /// Inherited methods are only visible after [`ClassMapping::complete`].
    pub fn method(&self, signature: &MethodSignature) -> Option<Arc<MethodMapping>> {
        if let Some(method) = self.methods.get(signature) {
            return Some(Arc::clone(method));
        }
        self.inherited
            .get()
            .and_then(|inherited| inherited.get(signature))
            .cloned()
    }

    /// Declared method mappings.
    pub fn methods(&self) -> impl Iterator<Item = &Arc<MethodMapping>> {
        self.methods.values()
    }

    /// Whether `signature` names a method declared on this class.
    pub fn declares_method(&self, signature: &MethodSignature) -> bool {
        self.methods.contains_key(signature)
    }

    /// Look up a field mapping.
    ///
    /// An untyped signature matches by name. A typed signature matches
    /// exactly, falling back to a mapping registered without a type under the
    /// same name.
    pub fn field(&self, signature: &FieldSignature) -> Option<&FieldMapping> {
        if signature.ty.is_none() {
            let key = self.fields_by_name.get(&signature.name)?;
            return self.fields.get(key);
        }
        self.fields
            .get(signature)
            .or_else(|| self.fields.get(&FieldSignature::untyped(signature.name.clone())))
    }

    /// Declared field mappings.
    pub fn fields(&self) -> impl Iterator<Item = &FieldMapping> {
        self.fields.values()
    }

    /// Whether inheritance completion has run for this class.
    pub fn is_completed(&self) -> bool {
        self.inherited.get().is_some()
    }

    /// Declared and inherited method mappings together.
    pub(crate) fn effective_methods(&self) -> Vec<(Arc<MethodMapping>, bool)> {
        let declared = self.methods.values().map(|m| (Arc::clone(m), true));
        let inherited = self
            .inherited
            .get()
            .into_iter()
            .flat_map(|inherited| inherited.values())
            .map(|m| (Arc::clone(m), false));
        declared.chain(inherited).collect()
    }

    pub(crate) fn inherited_cell(&self) -> &OnceLock<InheritedMethods> {
        &self.inherited
    }
}

// ============================================================================
// Mapping Set
// ============================================================================

/// All class mappings for a remap pass.
#[derive(Debug, Default)]
pub struct MappingSet {
    classes: DashMap<String, Arc<ClassMapping>>,
}

impl MappingSet {
    /// Create an empty mapping set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) a class mapping.
    pub fn insert(&self, class: ClassMapping) -> Arc<ClassMapping> {
        let class = Arc::new(class);
        self.classes
            .insert(class.obfuscated_name().to_string(), Arc::clone(&class));
        class
    }

    /// Look up the mapping for `binary_name` without creating one.
    pub fn get_class(&self, binary_name: &str) -> Option<Arc<ClassMapping>> {
        self.classes
            .get(&internal_name(binary_name))
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Look up the mapping for `binary_name`, creating an identity mapping if absent.
    pub fn get_or_create_class(&self, binary_name: &str) -> Arc<ClassMapping> {
        let key = internal_name(binary_name);
        let entry = self
            .classes
            .entry(key.clone())
            .or_insert_with(|| Arc::new(ClassMapping::identity(&key)));
        Arc::clone(entry.value())
    }

    /// Whether a mapping exists for `binary_name`.
    pub fn contains(&self, binary_name: &str) -> bool {
        self.classes.contains_key(&internal_name(binary_name))
    }

    /// Number of class mappings.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether the set holds no class mappings.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
