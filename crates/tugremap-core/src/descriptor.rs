//! JVM type descriptors and the erased signatures used as mapping keys.
//!
//! Methods are keyed by name plus erased descriptor (`getValue(JI)Ljava/lang/String;`),
//! fields by name plus an optional erased type. Descriptors are parsed from and
//! formatted back to their JVM string form.

use std::fmt;
use std::str::FromStr;

use crate::error::{RemapError, RemapResult};

// ============================================================================
// Field Types
// ============================================================================

/// A primitive JVM type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Boolean,
}

impl BaseType {
    /// The descriptor character for this type.
    pub fn descriptor_char(self) -> char {
        match self {
            BaseType::Byte => 'B',
            BaseType::Char => 'C',
            BaseType::Double => 'D',
            BaseType::Float => 'F',
            BaseType::Int => 'I',
            BaseType::Long => 'J',
            BaseType::Short => 'S',
            BaseType::Boolean => 'Z',
        }
    }

    fn from_descriptor_char(c: char) -> Option<Self> {
        Some(match c {
            'B' => BaseType::Byte,
            'C' => BaseType::Char,
            'D' => BaseType::Double,
            'F' => BaseType::Float,
            'I' => BaseType::Int,
            'J' => BaseType::Long,
            'S' => BaseType::Short,
            'Z' => BaseType::Boolean,
            _ => return None,
        })
    }
}

/// An erased JVM value type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    Base(BaseType),
    /// Class type by internal binary name (`java/lang/String`).
    Object(String),
    Array(Box<FieldType>),
}

impl FieldType {
    /// Class type from a binary name in either `.` or `/` form.
    pub fn object(binary_name: &str) -> Self {
        FieldType::Object(binary_name.replace('.', "/"))
    }

    /// Whether this type occupies two local variable slots (`long`, `double`).
    pub fn is_wide(&self) -> bool {
        matches!(
            self,
            FieldType::Base(BaseType::Long) | FieldType::Base(BaseType::Double)
        )
    }

    /// Number of local variable slots a value of this type occupies.
    pub fn slot_width(&self) -> u32 {
        if self.is_wide() {
            2
        } else {
            1
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Base(base) => write!(f, "{}", base.descriptor_char()),
            FieldType::Object(name) => write!(f, "L{};", name),
            FieldType::Array(component) => write!(f, "[{}", component),
        }
    }
}

impl FromStr for FieldType {
    type Err = RemapError;

    fn from_str(s: &str) -> RemapResult<Self> {
        parse_field_descriptor(s)
    }
}

/// The return type of a method descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReturnType {
    Void,
    Type(FieldType),
}

impl fmt::Display for ReturnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnType::Void => write!(f, "V"),
            ReturnType::Type(ty) => write!(f, "{}", ty),
        }
    }
}

/// An erased method descriptor: ordered parameter types plus return type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodDescriptor {
    pub params: Vec<FieldType>,
    pub return_type: ReturnType,
}

impl MethodDescriptor {
    pub fn new(params: Vec<FieldType>, return_type: ReturnType) -> Self {
        Self {
            params,
            return_type,
        }
    }

    /// Total slots consumed by the parameters, excluding any receiver.
    pub fn parameter_slots(&self) -> u32 {
        self.params.iter().map(FieldType::slot_width).sum()
    }
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for param in &self.params {
            write!(f, "{}", param)?;
        }
        write!(f, "){}", self.return_type)
    }
}

impl FromStr for MethodDescriptor {
    type Err = RemapError;

    fn from_str(s: &str) -> RemapResult<Self> {
        parse_method_descriptor(s)
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Parse a complete field descriptor (`I`, `[Ljava/lang/String;`).
pub fn parse_field_descriptor(desc: &str) -> RemapResult<FieldType> {
    let (ty, rest) = parse_field_type(desc)?;
    if !rest.is_empty() {
        return Err(RemapError::invalid_descriptor(desc));
    }
    Ok(ty)
}

/// Parse a complete method descriptor (`(JI)V`).
pub fn parse_method_descriptor(desc: &str) -> RemapResult<MethodDescriptor> {
    let Some(mut rest) = desc.strip_prefix('(') else {
        return Err(RemapError::invalid_descriptor(desc));
    };

    let mut params = Vec::new();
    loop {
        if let Some(after) = rest.strip_prefix(')') {
            rest = after;
            break;
        }
        if rest.is_empty() {
            return Err(RemapError::invalid_descriptor(desc));
        }
        let (param, after) = parse_field_type(rest).map_err(|_| RemapError::invalid_descriptor(desc))?;
        params.push(param);
        rest = after;
    }

    let (return_type, rest) = if let Some(after) = rest.strip_prefix('V') {
        (ReturnType::Void, after)
    } else {
        let (ty, after) = parse_field_type(rest).map_err(|_| RemapError::invalid_descriptor(desc))?;
        (ReturnType::Type(ty), after)
    };

    if !rest.is_empty() {
        return Err(RemapError::invalid_descriptor(desc));
    }

    Ok(MethodDescriptor {
        params,
        return_type,
    })
}

fn parse_field_type(input: &str) -> RemapResult<(FieldType, &str)> {
    let mut chars = input.chars();
    let Some(first) = chars.next() else {
        return Err(RemapError::invalid_descriptor(input));
    };
    if let Some(base) = BaseType::from_descriptor_char(first) {
        return Ok((FieldType::Base(base), &input[1..]));
    }
    match first {
        'L' => match input.find(';') {
            Some(end) if end > 1 => Ok((FieldType::Object(input[1..end].to_string()), &input[end + 1..])),
            _ => Err(RemapError::invalid_descriptor(input)),
        },
        '[' => {
            let (component, rest) = parse_field_type(&input[1..])?;
            Ok((FieldType::Array(Box::new(component)), rest))
        }
        _ => Err(RemapError::invalid_descriptor(input)),
    }
}

// ============================================================================
// Signatures
// ============================================================================

/// A method's erased signature: name plus descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodSignature {
    pub name: String,
    pub descriptor: MethodDescriptor,
}

impl MethodSignature {
    pub fn new(name: impl Into<String>, descriptor: MethodDescriptor) -> Self {
        Self {
            name: name.into(),
            descriptor,
        }
    }

    /// Build a signature from a name and a descriptor string.
    pub fn parse(name: impl Into<String>, descriptor: &str) -> RemapResult<Self> {
        Ok(Self::new(name, parse_method_descriptor(descriptor)?))
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.descriptor)
    }
}

/// A field's signature: name plus erased type, when known.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldSignature {
    pub name: String,
    pub ty: Option<FieldType>,
}

impl FieldSignature {
    pub fn new(name: impl Into<String>, ty: Option<FieldType>) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    /// Signature matching by name only.
    pub fn untyped(name: impl Into<String>) -> Self {
        Self::new(name, None)
    }

    /// Build a signature from a name and a field descriptor string.
    pub fn parse(name: impl Into<String>, descriptor: &str) -> RemapResult<Self> {
        Ok(Self::new(name, Some(parse_field_descriptor(descriptor)?)))
    }
}

impl fmt::Display for FieldSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.ty {
            Some(ty) => write!(f, "{}:{}", self.name, ty),
            None => write!(f, "{}", self.name),
        }
    }
}
