//! Parameter slot tracking: JVM local variable slots for declared parameters.
//!
//! # Slot Layout
//!
//! - Instance methods and constructors reserve slot 0 for the receiver
//! - `long` and `double` parameters occupy two consecutive slots
//! - Every other parameter occupies one slot
//!
//! # Frames
//!
//! A [`Frame`] is opened when traversal enters a method, constructor or lambda
//! declaration. It walks the declared parameters once, in declaration order,
//! and records each parameter binding's slot. Parameter lookups inside the
//! scope read that table. Frames live on a [`FrameStack`] owned by a single
//! unit traversal and are discarded on scope exit, so a lambda's parameters
//! never leak into the enclosing method's table.

use std::collections::HashMap;

use tugremap_core::descriptor::FieldType;
use tugremap_core::error::{RemapError, RemapResult};
use tugremap_core::mappings::SlotIndex;
use tugremap_core::patch::NodeId;
use tugremap_tree::binding::{BindingKey, MethodBinding};

// ============================================================================
// Slot Formula
// ============================================================================

/// Slot of the first parameter.
pub fn first_slot(is_static: bool) -> SlotIndex {
    SlotIndex::new(if is_static { 0 } else { 1 })
}

/// Slot of the parameter at `position`, computed from the preceding types.
///
/// Returns `None` when `position` is past the last parameter.
pub fn parameter_slot(params: &[FieldType], is_static: bool, position: usize) -> Option<SlotIndex> {
    if position >= params.len() {
        return None;
    }
    let width: u32 = params[..position].iter().map(FieldType::slot_width).sum();
    Some(first_slot(is_static).advance(width))
}

// ============================================================================
// Frames
// ============================================================================

/// Parameter slots for one method, constructor or lambda scope.
#[derive(Debug, Clone)]
pub struct Frame {
    owner: NodeId,
    method: Option<MethodBinding>,
    slots: HashMap<BindingKey, SlotIndex>,
}

impl Frame {
    /// Open a frame for the declaration at `owner`.
    ///
    /// Returns `None` when the binding lists a different number of parameters
    /// than its descriptor; no slot can be trusted then.
    pub fn enter(owner: NodeId, method: &MethodBinding) -> Option<Frame> {
        let params = &method.descriptor.params;
        if method.parameters.len() != params.len() {
            return None;
        }

        let mut slots = HashMap::with_capacity(params.len());
        let mut slot = first_slot(method.is_static);
        for (position, (key, ty)) in method.parameters.iter().zip(params).enumerate() {
            debug_assert_eq!(Some(slot), parameter_slot(params, method.is_static, position));
            slots.insert(key.clone(), slot);
            slot = slot.advance(ty.slot_width());
        }

        Some(Frame {
            owner,
            method: Some(method.clone()),
            slots,
        })
    }

    /// A frame for a declaration whose binding could not be resolved.
    ///
    /// It keeps scope nesting balanced but resolves no parameters.
    pub fn opaque(owner: NodeId) -> Frame {
        Frame {
            owner,
            method: None,
            slots: HashMap::new(),
        }
    }

    /// The declaration node that opened this frame.
    pub fn owner(&self) -> NodeId {
        self.owner
    }

    pub fn method(&self) -> Option<&MethodBinding> {
        self.method.as_ref()
    }

    /// Whether this frame belongs to the method with binding key `method`.
    pub fn declares(&self, method: &BindingKey) -> bool {
        self.method.as_ref().is_some_and(|m| &m.key == method)
    }

    /// The slot of a declared parameter.
    pub fn slot(&self, parameter: &BindingKey) -> Option<SlotIndex> {
        self.slots.get(parameter).copied()
    }

    /// Number of parameters with a recorded slot.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// The open frames of one unit traversal, innermost last.
#[derive(Debug, Default)]
pub struct FrameStack {
    frames: Vec<Frame>,
}

impl FrameStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    /// Close the innermost frame, which must belong to `owner`.
    ///
    /// On mismatch the stack is left unchanged.
    pub fn pop(&mut self, owner: NodeId) -> RemapResult<Frame> {
        match self.frames.last() {
            Some(frame) if frame.owner == owner => {}
            innermost => {
                return Err(RemapError::FrameMismatch {
                    leaving: owner,
                    innermost: innermost.map(Frame::owner),
                })
            }
        }
        self.frames.pop().ok_or(RemapError::FrameMismatch {
            leaving: owner,
            innermost: None,
        })
    }

    /// The innermost open frame for the method with binding key `method`.
    pub fn find(&self, method: &BindingKey) -> Option<&Frame> {
        self.frames.iter().rev().find(|frame| frame.declares(method))
    }

    pub fn innermost(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
