//! Type model for the language.
//!
//! This module defines the type descriptors shared by every pass:
//!
//! - Primitive types (void, boolean, char, integer, string)
//! - Arrays, with an element type and a declared size
//! - Functions and prototypes, with a return type and parameters
//! - `auto`, a placeholder the type checker replaces
//!
//! Types are plain values. Copies are deep (`Clone`) and equality is
//! structural (`Type::compare`), never by identity.

use std::fmt::Display;

use crate::resolver::symbol::SymbolRef;

/// The tag of a `Type`, without any of its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Void,
    Boolean,
    Character,
    Integer,
    String,
    Array,
    Function,
    Prototype,
    Auto,
}

#[derive(Debug, Clone)]
pub enum Type {
    Void,
    Boolean,
    Character,
    Integer,
    String,
    Array(ArrayType),
    Function(FunctionType),
    /// A function declared without a body.
    Prototype(FunctionType),
    Auto,
}

/// An array of `size` elements of `subtype`. A size of 0 means unspecified.
#[derive(Debug, Clone)]
pub struct ArrayType {
    pub subtype: Box<Type>,
    pub size: usize,
}

/// The shape of a function or prototype. `subtype` is the return type.
#[derive(Debug, Clone)]
pub struct FunctionType {
    pub subtype: Box<Type>,
    pub params: Vec<Param>,
}

/// A named function parameter.
///
/// `symbol` is filled in by the resolver and gives the parameter its
/// position in the callee's frame.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub ty: Type,
    pub symbol: Option<SymbolRef>,
}

impl Param {
    pub fn new(name: &str, ty: Type) -> Self {
        Param {
            name: name.to_string(),
            ty,
            symbol: None,
        }
    }
}

impl Type {
    /// Builds a type from its parts. Parts that the kind has no use for are
    /// ignored, and a missing subtype defaults to void.
    pub fn create(kind: TypeKind, subtype: Option<Type>, params: Vec<Param>, size: usize) -> Type {
        let subtype = Box::new(subtype.unwrap_or(Type::Void));

        match kind {
            TypeKind::Void => Type::Void,
            TypeKind::Boolean => Type::Boolean,
            TypeKind::Character => Type::Character,
            TypeKind::Integer => Type::Integer,
            TypeKind::String => Type::String,
            TypeKind::Array => Type::Array(ArrayType { subtype, size }),
            TypeKind::Function => Type::Function(FunctionType { subtype, params }),
            TypeKind::Prototype => Type::Prototype(FunctionType { subtype, params }),
            TypeKind::Auto => Type::Auto,
        }
    }

    pub fn array(subtype: Type, size: usize) -> Type {
        Type::create(TypeKind::Array, Some(subtype), vec![], size)
    }

    pub fn function(subtype: Type, params: Vec<Param>) -> Type {
        Type::create(TypeKind::Function, Some(subtype), params, 0)
    }

    pub fn prototype(subtype: Type, params: Vec<Param>) -> Type {
        Type::create(TypeKind::Prototype, Some(subtype), params, 0)
    }

    pub fn kind(&self) -> TypeKind {
        match self {
            Type::Void => TypeKind::Void,
            Type::Boolean => TypeKind::Boolean,
            Type::Character => TypeKind::Character,
            Type::Integer => TypeKind::Integer,
            Type::String => TypeKind::String,
            Type::Array(_) => TypeKind::Array,
            Type::Function(_) => TypeKind::Function,
            Type::Prototype(_) => TypeKind::Prototype,
            Type::Auto => TypeKind::Auto,
        }
    }

    /// Structural equality.
    ///
    /// Arrays compare by element type only; their sizes are ignored.
    /// Functions and prototypes compare by return type and by parameter
    /// types in order, ignoring parameter names. A function never equals a
    /// prototype.
    pub fn compare(&self, other: &Type) -> bool {
        match (self, other) {
            (Type::Array(a), Type::Array(b)) => a.subtype.compare(&b.subtype),
            (Type::Function(a), Type::Function(b)) | (Type::Prototype(a), Type::Prototype(b)) => {
                a.compare(b)
            }
            (a, b) => a.kind() == b.kind(),
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Type::Integer)
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Type::Boolean)
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, Type::Auto)
    }

    pub fn is_function_like(&self) -> bool {
        matches!(self, Type::Function(_) | Type::Prototype(_))
    }

    pub fn as_function(&self) -> Option<&FunctionType> {
        match self {
            Type::Function(function) | Type::Prototype(function) => Some(function),
            _ => None,
        }
    }

    pub fn as_function_mut(&mut self) -> Option<&mut FunctionType> {
        match self {
            Type::Function(function) | Type::Prototype(function) => Some(function),
            _ => None,
        }
    }

    /// Replaces the return type of a function or prototype. Other types are
    /// left untouched.
    pub fn set_return_type(&mut self, subtype: Type) {
        if let Some(function) = self.as_function_mut() {
            function.subtype = Box::new(subtype);
        }
    }

    /// Turns a prototype into a full function in place.
    pub fn promote_prototype(&mut self) {
        *self = match std::mem::replace(self, Type::Auto) {
            Type::Prototype(function) => Type::Function(function),
            other => other,
        };
    }

    pub fn into_prototype(self) -> Type {
        match self {
            Type::Function(function) => Type::Prototype(function),
            other => other,
        }
    }
}

impl FunctionType {
    pub fn compare(&self, other: &FunctionType) -> bool {
        self.subtype.compare(&other.subtype) && params_compare(&self.params, &other.params)
    }
}

/// Compares two parameter lists by type, position by position.
pub fn params_compare(a: &[Param], b: &[Param]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.ty.compare(&y.ty))
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Void => write!(f, "void"),
            Type::Boolean => write!(f, "boolean"),
            Type::Character => write!(f, "char"),
            Type::Integer => write!(f, "integer"),
            Type::String => write!(f, "string"),
            Type::Auto => write!(f, "auto"),
            Type::Array(array) => {
                if array.size == 0 {
                    write!(f, "array [] {}", array.subtype)
                } else {
                    write!(f, "array [{}] {}", array.size, array.subtype)
                }
            }
            Type::Function(function) | Type::Prototype(function) => {
                write!(f, "function {} (", function.subtype)?;
                for (i, param) in function.params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", param)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl Display for Param {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.ty)
    }
}
