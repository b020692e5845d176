//! Resolved method signature handles.
//!
//! A [`MethodSig`] identifies one contract method: the declaring contract,
//! the method name, the exact parameter and return tags, and the method's
//! slot within its declaring contract. One shared handle per merged
//! signature is resolved when a generated type initializes, and the same
//! handle is passed to the interception handler on every forwarded call.

use crate::{DeclId, Name, StringInterner, TypeTag};
use smallvec::SmallVec;
use std::fmt;

/// Resolved signature of one contract method.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodSig {
    /// Identity of the declaring contract.
    pub declaring: DeclId,
    /// Qualified name of the declaring contract.
    pub declaring_name: Name,
    /// Method name.
    pub name: Name,
    /// Ordered parameter tags.
    pub params: SmallVec<[TypeTag; 4]>,
    /// Declared return tag.
    pub ret: TypeTag,
    /// Declared failure kinds, by name.
    pub throws: SmallVec<[Name; 1]>,
    /// Slot of this method within its declaring contract.
    pub slot: u16,
}

impl MethodSig {
    /// True for void-returning methods.
    #[inline]
    pub fn is_void(&self) -> bool {
        self.ret.is_void()
    }

    /// Format the signature for display (requires interner).
    pub fn display<'a>(&'a self, interner: &'a StringInterner) -> SigDisplay<'a> {
        SigDisplay { sig: self, interner }
    }
}

/// Helper for displaying a `MethodSig` with resolved names.
pub struct SigDisplay<'a> {
    sig: &'a MethodSig,
    interner: &'a StringInterner,
}

impl fmt::Display for SigDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}::{}(",
            self.interner.lookup(self.sig.declaring_name),
            self.interner.lookup(self.sig.name)
        )?;
        for (i, param) in self.sig.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", param.display(self.interner))?;
        }
        write!(f, ") -> {}", self.sig.ret.display(self.interner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn test_sig_display() {
        let interner = StringInterner::new();
        let sig = MethodSig {
            declaring: crate::TypeDecl::interface("demos.Greeter", &interner)
                .build()
                .id(),
            declaring_name: interner.intern("demos.Greeter"),
            name: interner.intern("bar"),
            params: smallvec![TypeTag::Str, TypeTag::I32],
            ret: TypeTag::Str,
            throws: SmallVec::new(),
            slot: 0,
        };
        assert_eq!(
            format!("{}", sig.display(&interner)),
            "demos.Greeter::bar(str, i32) -> str"
        );
    }
}
