//! Inheritance completion for class mappings.
//!
//! An overriding method must remap to the same name as the method it
//! overrides, even when only the ancestor carries a mapping. Completion copies
//! the ancestor's method mappings into the subclass mapping.
//!
//! # Algorithm
//!
//! For class `C` with [`ClassInfo`] from an [`InheritanceProvider`]:
//!
//! 1. Visit parents in order: superclass first, then interfaces.
//! 2. Gather each parent's effective methods. A mapped parent is completed
//!    first (memoized) and contributes declared plus inherited methods. An
//!    unmapped parent is walked through transiently so grandparents still
//!    contribute.
//! 3. Keep methods `C` may inherit. A method the parent declares needs the
//!    parent's `ClassInfo` to report an inheritable [`MemberAccess`]; a method
//!    the parent itself inherited passes through.
//! 4. Declared methods of `C` win over inherited ones; earlier parents win
//!    over later ones.
//!
//! # Concurrency
//!
//! Results are stored in a `OnceLock` per class: the first caller computes,
//! concurrent callers wait and reuse the result. A class that reappears on the
//! current completion chain (a cyclic hierarchy) contributes nothing. Cycles
//! that span two threads completing each other's classes are not detected;
//! JVM hierarchies are acyclic.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::descriptor::MethodSignature;
use crate::mappings::{internal_name, ClassMapping, InheritedMethods, MappingSet, MethodMapping};

// ============================================================================
// Class Info
// ============================================================================

/// How a method may be inherited by subclasses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberAccess {
    Public,
    Protected,
    /// Package-private: inherited only within the same package.
    Package,
    /// Never inherited (private methods).
    Private,
}

impl MemberAccess {
    /// Whether a subclass may inherit a member with this access.
    pub fn is_inheritable(self, same_package: bool) -> bool {
        match self {
            MemberAccess::Public | MemberAccess::Protected => true,
            MemberAccess::Package => same_package,
            MemberAccess::Private => false,
        }
    }
}

/// Supertypes and method access of one class, as reported by a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassInfo {
    name: String,
    superclass: Option<String>,
    interfaces: Vec<String>,
    methods: HashMap<MethodSignature, MemberAccess>,
}

impl ClassInfo {
    pub fn new(binary_name: &str) -> Self {
        Self {
            name: internal_name(binary_name),
            superclass: None,
            interfaces: Vec::new(),
            methods: HashMap::new(),
        }
    }

    pub fn with_superclass(mut self, binary_name: &str) -> Self {
        self.superclass = Some(internal_name(binary_name));
        self
    }

    pub fn with_interface(mut self, binary_name: &str) -> Self {
        self.interfaces.push(internal_name(binary_name));
        self
    }

    /// Record a method declared by this class.
    pub fn with_method(mut self, signature: MethodSignature, access: MemberAccess) -> Self {
        self.methods.insert(signature, access);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The package part of the binary name (empty for the default package).
    pub fn package(&self) -> &str {
        self.name.rsplit_once('/').map_or("", |(package, _)| package)
    }

    /// Direct supertypes: superclass first, then interfaces in declaration order.
    pub fn parents(&self) -> impl Iterator<Item = &str> {
        self.superclass
            .iter()
            .chain(self.interfaces.iter())
            .map(String::as_str)
    }

    /// Access of a method this class declares.
    pub fn method_access(&self, signature: &MethodSignature) -> Option<MemberAccess> {
        self.methods.get(signature).copied()
    }

    /// Whether this class inherits `signature` as declared by `parent`.
    ///
    /// Unknown methods are not inherited.
    pub fn can_inherit(&self, parent: &ClassInfo, signature: &MethodSignature) -> bool {
        parent
            .method_access(signature)
            .is_some_and(|access| access.is_inheritable(self.package() == parent.package()))
    }
}

/// Supplies supertype information during completion.
pub trait InheritanceProvider: Send + Sync {
    /// Class info for `binary_name` (internal form), or `None` if unknown.
    fn provide(&self, binary_name: &str) -> Option<ClassInfo>;
}

/// An in-memory inheritance provider.
#[derive(Debug, Clone, Default)]
pub struct ClassHierarchy {
    classes: HashMap<String, ClassInfo>,
}

impl ClassHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the info for a class.
    pub fn insert(&mut self, info: ClassInfo) {
        self.classes.insert(info.name().to_string(), info);
    }

    pub fn with_class(mut self, info: ClassInfo) -> Self {
        self.insert(info);
        self
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl InheritanceProvider for ClassHierarchy {
    fn provide(&self, binary_name: &str) -> Option<ClassInfo> {
        self.classes.get(&internal_name(binary_name)).cloned()
    }
}

// ============================================================================
// Completion
// ============================================================================

impl ClassMapping {
    /// Populate inherited method mappings from supertypes.
    ///
    /// Idempotent; the work runs at most once per class even when called
    /// concurrently.
    pub fn complete(&self, mappings: &MappingSet, provider: &dyn InheritanceProvider) {
        let mut chain = HashSet::new();
        self.complete_within(mappings, provider, &mut chain);
    }

    fn complete_within(
        &self,
        mappings: &MappingSet,
        provider: &dyn InheritanceProvider,
        chain: &mut HashSet<String>,
    ) {
        if self.is_completed() {
            return;
        }
        self.inherited_cell().get_or_init(|| {
            chain.insert(self.obfuscated_name().to_string());
            let inherited =
                collect_inherited(self.obfuscated_name(), Some(self), mappings, provider, chain);
            chain.remove(self.obfuscated_name());
            tracing::trace!(
                "completed {}: {} inherited method(s)",
                self.obfuscated_name(),
                inherited.len()
            );
            inherited
        });
    }
}

fn collect_inherited(
    class: &str,
    own: Option<&ClassMapping>,
    mappings: &MappingSet,
    provider: &dyn InheritanceProvider,
    chain: &mut HashSet<String>,
) -> InheritedMethods {
    let mut inherited = InheritedMethods::new();
    let Some(info) = provider.provide(class) else {
        return inherited;
    };

    for parent_name in info.parents() {
        if chain.contains(parent_name) {
            continue;
        }
        let Some(parent_info) = provider.provide(parent_name) else {
            continue;
        };
        for (method, declared_by_parent) in parent_methods(parent_name, mappings, provider, chain) {
            let signature = method.signature();
            if own.is_some_and(|own| own.declares_method(signature))
                || inherited.contains_key(signature)
            {
                continue;
            }
            if declared_by_parent && !info.can_inherit(&parent_info, signature) {
                continue;
            }
            inherited.insert(signature.clone(), method);
        }
    }
    inherited
}

/// Effective methods of `parent`, each flagged with whether `parent` declares it.
fn parent_methods(
    parent: &str,
    mappings: &MappingSet,
    provider: &dyn InheritanceProvider,
    chain: &mut HashSet<String>,
) -> Vec<(Arc<MethodMapping>, bool)> {
    match mappings.get_class(parent) {
        Some(mapping) => {
            mapping.complete_within(mappings, provider, chain);
            mapping.effective_methods()
        }
        None => {
            chain.insert(parent.to_string());
            let methods = collect_inherited(parent, None, mappings, provider, chain)
                .into_values()
                .map(|method| (method, false))
                .collect();
            chain.remove(parent);
            methods
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
