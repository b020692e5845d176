//! Declared-type tags for contract method signatures.
//!
//! A [`TypeTag`] names the exact declared type of a parameter or return
//! value. Boxing and unboxing across the interception boundary is keyed on
//! these tags: a value is admitted only with the exact declared width, never
//! through implicit widening.

use crate::{Name, StringInterner};
use std::fmt;

/// Declared type of a parameter or return value.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeTag {
    /// Boolean primitive.
    Bool,
    /// Character primitive.
    Char,
    /// 8-bit signed integer primitive.
    I8,
    /// 16-bit signed integer primitive.
    I16,
    /// 32-bit signed integer primitive.
    I32,
    /// 64-bit signed integer primitive.
    I64,
    /// 32-bit float primitive.
    F32,
    /// 64-bit float primitive.
    F64,
    /// String reference.
    Str,
    /// Void; legal only as a return type.
    Unit,
    /// Reference to an object implementing the named contract.
    Object(Name),
}

impl TypeTag {
    /// True for exact-width primitive tags (everything that unboxes).
    #[inline]
    pub const fn is_primitive(self) -> bool {
        matches!(
            self,
            TypeTag::Bool
                | TypeTag::Char
                | TypeTag::I8
                | TypeTag::I16
                | TypeTag::I32
                | TypeTag::I64
                | TypeTag::F32
                | TypeTag::F64
        )
    }

    /// True for reference tags, which admit `Null`.
    #[inline]
    pub const fn is_reference(self) -> bool {
        matches!(self, TypeTag::Str | TypeTag::Object(_))
    }

    /// True for the void return tag.
    #[inline]
    pub const fn is_void(self) -> bool {
        matches!(self, TypeTag::Unit)
    }

    /// Format the tag for display (requires interner for object tags).
    pub fn display<'a>(self, interner: &'a StringInterner) -> TagDisplay<'a> {
        TagDisplay { tag: self, interner }
    }
}

/// Helper for displaying a `TypeTag` with resolved contract names.
pub struct TagDisplay<'a> {
    tag: TypeTag,
    interner: &'a StringInterner,
}

impl fmt::Display for TagDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tag {
            TypeTag::Bool => write!(f, "bool"),
            TypeTag::Char => write!(f, "char"),
            TypeTag::I8 => write!(f, "i8"),
            TypeTag::I16 => write!(f, "i16"),
            TypeTag::I32 => write!(f, "i32"),
            TypeTag::I64 => write!(f, "i64"),
            TypeTag::F32 => write!(f, "f32"),
            TypeTag::F64 => write!(f, "f64"),
            TypeTag::Str => write!(f, "str"),
            TypeTag::Unit => write!(f, "void"),
            TypeTag::Object(name) => write!(f, "{}", self.interner.lookup(name)),
        }
    }
}
