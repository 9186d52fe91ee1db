//! The remap engine: classify identifier occurrences and propose renames.
//!
//! # Classification
//!
//! Each [`NodeKind::SimpleName`] is resolved through the unit's
//! [`BindingProvider`] and handled by binding kind:
//!
//! | Kind        | Class mapping        | Completion | Target                               |
//! |-------------|----------------------|------------|--------------------------------------|
//! | Class       | lookup               | no         | simple deobfuscated class name       |
//! | Method      | lookup or create     | yes        | method mapping by erased signature   |
//! | Constructor | lookup or create     | no         | simple deobfuscated class name       |
//! | Field       | lookup               | no         | field mapping by name and type       |
//! | Parameter   | lookup               | unless ctor| parameter mapping by frame slot      |
//! | Local       | none                 | no         | never renamed                        |
//!
//! Any missing piece (binding, binary name, class, member, frame, slot) skips
//! the occurrence. A method whose parameter list disagrees with its descriptor
//! opens an opaque frame, so its parameters are skipped too. Only a parameter
//! binding without a declaring method or a frame closed out of order fails the
//! unit.

use tugremap_core::config::RemapConfig;
use tugremap_core::error::{RemapError, RemapResult};
use tugremap_core::mappings::{InheritanceProvider, MappingSet};
use tugremap_core::patch::{EditBatch, EditSink, RenameEdit};
use tugremap_tree::binding::{
    Binding, BindingKind, BindingProvider, MethodBinding, TypeBinding, VariableBinding,
    VariableKind,
};
use tugremap_tree::nodes::{CompilationUnit, Node};
use tugremap_tree::visitor::{walk_unit, VisitResult, Visitor};

use crate::slots::{Frame, FrameStack};
use crate::stats::RemapStats;

// ============================================================================
// Remapper
// ============================================================================

/// Renames identifiers using a shared mapping set.
///
/// A `Remapper` holds no per-unit state and may be shared across threads;
/// every call to [`remap_unit`](Self::remap_unit) gets its own frame stack.
pub struct Remapper<'m> {
    mappings: &'m MappingSet,
    inheritance: &'m dyn InheritanceProvider,
    config: RemapConfig,
}

impl<'m> Remapper<'m> {
    pub fn new(mappings: &'m MappingSet, inheritance: &'m dyn InheritanceProvider) -> Self {
        Remapper {
            mappings,
            inheritance,
            config: RemapConfig::default(),
        }
    }

    pub fn with_config(mut self, config: RemapConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &RemapConfig {
        &self.config
    }

    pub fn mappings(&self) -> &MappingSet {
        self.mappings
    }

    /// Remap one unit, returning its proposed edits.
    pub fn remap_unit<B>(&self, unit: &CompilationUnit, bindings: &B) -> RemapResult<EditBatch>
    where
        B: BindingProvider + ?Sized,
    {
        let mut batch = EditBatch::new();
        self.remap_unit_into(unit, bindings, &mut batch)?;
        Ok(batch)
    }

    /// Remap one unit, submitting edits to `sink`.
    ///
    /// On error the sink may already hold edits for occurrences visited
    /// before the failure; callers should discard them.
    pub fn remap_unit_into<B, S>(
        &self,
        unit: &CompilationUnit,
        bindings: &B,
        sink: &mut S,
    ) -> RemapResult<RemapStats>
    where
        B: BindingProvider + ?Sized,
        S: EditSink + ?Sized,
    {
        let mut visitor = RemapVisitor {
            remapper: self,
            bindings,
            sink,
            frames: FrameStack::new(),
            stats: RemapStats::default(),
            error: None,
        };
        walk_unit(&mut visitor, unit);

        if let Some(err) = visitor.error {
            return Err(err);
        }
        if let Some(frame) = visitor.frames.innermost() {
            return Err(RemapError::FrameMismatch {
                leaving: unit.root.id,
                innermost: Some(frame.owner()),
            });
        }
        tracing::debug!("remapped {}: {}", unit.path, visitor.stats);
        Ok(visitor.stats)
    }

    fn enabled(&self, kind: BindingKind) -> bool {
        match kind {
            BindingKind::Class => self.config.classes,
            BindingKind::Method => self.config.methods,
            BindingKind::Constructor => self.config.constructors,
            BindingKind::Field => self.config.fields,
            BindingKind::Parameter => self.config.parameters,
            BindingKind::Local => false,
        }
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Outcome of looking up the target name for one occurrence.
enum Resolution {
    Target(String),
    Unresolved(&'static str),
    Unmapped(&'static str),
    Ignored,
}

struct RemapVisitor<'r, 'm, B: ?Sized, S: ?Sized> {
    remapper: &'r Remapper<'m>,
    bindings: &'r B,
    sink: &'r mut S,
    frames: FrameStack,
    stats: RemapStats,
    error: Option<RemapError>,
}

impl<B, S> RemapVisitor<'_, '_, B, S>
where
    B: BindingProvider + ?Sized,
    S: EditSink + ?Sized,
{
    fn fail(&mut self, err: RemapError) -> VisitResult {
        tracing::debug!("remap aborted: {}", err);
        self.error = Some(err);
        VisitResult::Stop
    }

    fn enter_frame(&mut self, node: &Node) -> VisitResult {
        if self.error.is_some() {
            return VisitResult::Stop;
        }
        let frame = match self.bindings.resolve(node) {
            Some(Binding::Method(method)) => match Frame::enter(node.id, method) {
                Some(frame) => frame,
                None => {
                    tracing::trace!(
                        "{}: '{}' lists {} parameter(s) for descriptor {}",
                        node.id,
                        method.name,
                        method.parameters.len(),
                        method.descriptor
                    );
                    self.stats.unresolved += 1;
                    Frame::opaque(node.id)
                }
            },
            _ => {
                tracing::trace!("{}: declaration without method binding", node.id);
                Frame::opaque(node.id)
            }
        };
        self.frames.push(frame);
        self.stats.frames_entered += 1;
        VisitResult::Continue
    }

    fn leave_frame(&mut self, node: &Node) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.frames.pop(node.id) {
            self.fail(err);
        }
    }

    fn remap_name(&mut self, node: &Node) -> RemapResult<()> {
        let Some(identifier) = node.identifier() else {
            return Ok(());
        };
        self.stats.names_visited += 1;

        let resolution = match self.bindings.resolve(node) {
            None => Resolution::Unresolved("no binding"),
            Some(Binding::Variable(variable))
                if variable.kind == VariableKind::Parameter
                    && variable.declaring_method.is_none() =>
            {
                return Err(RemapError::OrphanParameter {
                    name: variable.name.clone(),
                    node: node.id,
                });
            }
            Some(binding) if !self.remapper.enabled(binding.kind()) => Resolution::Ignored,
            Some(Binding::Type(ty)) => self.class_target(ty),
            Some(Binding::Method(method)) if method.is_constructor => {
                self.constructor_target(method)
            }
            Some(Binding::Method(method)) => self.method_target(method),
            Some(Binding::Variable(variable)) => match variable.kind {
                VariableKind::Field => self.field_target(variable),
                VariableKind::Parameter => self.parameter_target(node, variable)?,
                VariableKind::Local => Resolution::Ignored,
            },
        };

        match resolution {
            Resolution::Target(target) => {
                if let Some(edit) = RenameEdit::between(node.id, node.span, identifier, &target) {
                    tracing::trace!("{}", edit);
                    self.sink.submit(edit);
                    self.stats.renamed += 1;
                }
            }
            Resolution::Unresolved(reason) => {
                tracing::trace!("{} '{}' unresolved: {}", node.id, identifier, reason);
                self.stats.unresolved += 1;
            }
            Resolution::Unmapped(reason) => {
                tracing::trace!("{} '{}' unmapped: {}", node.id, identifier, reason);
                self.stats.unmapped += 1;
            }
            Resolution::Ignored => {}
        }
        Ok(())
    }

    fn class_target(&self, ty: &TypeBinding) -> Resolution {
        let Some(binary_name) = ty.binary_name.as_deref() else {
            return Resolution::Unresolved("type has no binary name");
        };
        match self.remapper.mappings.get_class(binary_name) {
            Some(class) => Resolution::Target(class.simple_deobfuscated_name().to_string()),
            None => Resolution::Unmapped("no class mapping"),
        }
    }

    fn constructor_target(&self, method: &MethodBinding) -> Resolution {
        let Some(binary_name) = method.declaring_binary_name() else {
            return Resolution::Unresolved("declaring type has no binary name");
        };
        let class = self.remapper.mappings.get_or_create_class(binary_name);
        Resolution::Target(class.simple_deobfuscated_name().to_string())
    }

    fn method_target(&self, method: &MethodBinding) -> Resolution {
        let Some(binary_name) = method.declaring_binary_name() else {
            return Resolution::Unresolved("declaring type has no binary name");
        };
        let class = self.remapper.mappings.get_or_create_class(binary_name);
        class.complete(self.remapper.mappings, self.remapper.inheritance);
        match class.method(&method.signature()) {
            Some(mapping) => Resolution::Target(mapping.deobfuscated_name().to_string()),
            None => Resolution::Unmapped("no method mapping"),
        }
    }

    fn field_target(&self, field: &VariableBinding) -> Resolution {
        let Some(binary_name) = field.declaring_binary_name() else {
            return Resolution::Unresolved("declaring type has no binary name");
        };
        let Some(class) = self.remapper.mappings.get_class(binary_name) else {
            return Resolution::Unmapped("no class mapping");
        };
        match class.field(&field.field_signature()) {
            Some(mapping) => Resolution::Target(mapping.deobfuscated_name().to_string()),
            None => Resolution::Unmapped("no field mapping"),
        }
    }

    fn parameter_target(&self, node: &Node, parameter: &VariableBinding) -> RemapResult<Resolution> {
        let Some(declaring) = parameter.declaring_method.as_ref() else {
            return Err(RemapError::OrphanParameter {
                name: parameter.name.clone(),
                node: node.id,
            });
        };
        let Some(frame) = self.frames.find(declaring) else {
            return Ok(Resolution::Unresolved("declaring method has no open frame"));
        };
        let Some(method) = frame.method() else {
            return Ok(Resolution::Unresolved("frame has no method binding"));
        };
        if method.parameters.get(parameter.position) != Some(&parameter.key) {
            return Ok(Resolution::Unresolved("parameter position disagrees with its method"));
        }
        let Some(binary_name) = method.declaring_binary_name() else {
            return Ok(Resolution::Unresolved("declaring type has no binary name"));
        };
        let Some(class) = self.remapper.mappings.get_class(binary_name) else {
            return Ok(Resolution::Unmapped("no class mapping"));
        };
        if !method.is_constructor {
            class.complete(self.remapper.mappings, self.remapper.inheritance);
        }
        let Some(mapping) = class.method(&method.signature()) else {
            return Ok(Resolution::Unmapped("no method mapping"));
        };
        let Some(slot) = frame.slot(&parameter.key) else {
            return Ok(Resolution::Unmapped("parameter not declared by its frame"));
        };
        Ok(match mapping.parameter(slot) {
            Some(param) => Resolution::Target(param.deobfuscated_name().to_string()),
            None => Resolution::Unmapped("no parameter mapping at slot"),
        })
    }
}

impl<B, S> Visitor for RemapVisitor<'_, '_, B, S>
where
    B: BindingProvider + ?Sized,
    S: EditSink + ?Sized,
{
    fn visit_method_declaration(&mut self, node: &Node) -> VisitResult {
        self.enter_frame(node)
    }

    fn leave_method_declaration(&mut self, node: &Node) {
        self.leave_frame(node);
    }

    fn visit_lambda_expression(&mut self, node: &Node) -> VisitResult {
        self.enter_frame(node)
    }

    fn leave_lambda_expression(&mut self, node: &Node) {
        self.leave_frame(node);
    }

    fn visit_simple_name(&mut self, node: &Node) -> VisitResult {
        if self.error.is_some() {
            return VisitResult::Stop;
        }
        match self.remap_name(node) {
            Ok(()) => VisitResult::SkipChildren,
            Err(err) => self.fail(err),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
