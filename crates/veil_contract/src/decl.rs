//! Contract descriptors.
//!
//! A [`TypeDecl`] describes a named runtime type. Interface-kind descriptors
//! (behavioral contracts: method declarations only, no state) are the inputs
//! the proxy engine implements; record-kind descriptors exist so that
//! state-carrying types are representable and rejectable.

use crate::{Name, StringInterner, TypeTag};
use smallvec::SmallVec;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Process-wide descriptor identity counter.
static NEXT_DECL_ID: AtomicU64 = AtomicU64::new(0);

/// Identity of a [`TypeDecl`].
///
/// Assigned once at declaration and never reused; two descriptors with the
/// same qualified name are still distinct identities.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct DeclId(u64);

impl DeclId {
    fn next() -> Self {
        DeclId(NEXT_DECL_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Visibility of a declared type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Visible everywhere.
    #[default]
    Public,

    /// Visible only within the declaring namespace.
    Private,
}

/// A method declared by an interface-kind descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodDecl {
    /// Method name.
    pub name: Name,
    /// Ordered parameter tags.
    pub params: SmallVec<[TypeTag; 4]>,
    /// Declared return tag ([`TypeTag::Unit`] for void).
    pub ret: TypeTag,
    /// Declared failure kinds, by name.
    pub throws: SmallVec<[Name; 1]>,
}

/// A field declared by a record-kind descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldDecl {
    /// Field name.
    pub name: Name,
    /// Field type tag.
    pub ty: TypeTag,
}

/// The kind of a declared type.
#[derive(Clone, Debug)]
pub enum TypeKind {
    /// A behavioral contract: method signatures only, no state.
    Interface {
        /// Declared methods, in declaration order (the order fixes each
        /// method's slot within the contract).
        methods: Vec<MethodDecl>,
    },

    /// A state-carrying record. Never proxyable.
    Record {
        /// Declared fields.
        fields: Vec<FieldDecl>,
    },
}

/// A named runtime type descriptor.
#[derive(Debug)]
pub struct TypeDecl {
    id: DeclId,
    name: Name,
    namespace: Name,
    visibility: Visibility,
    kind: TypeKind,
}

impl TypeDecl {
    /// Start building an interface-kind descriptor.
    ///
    /// `name` is the qualified name; the namespace is its dot-separated
    /// prefix (empty for a bare name).
    pub fn interface<'a>(name: &str, interner: &'a StringInterner) -> TypeDeclBuilder<'a> {
        TypeDeclBuilder {
            name: interner.intern(name),
            namespace: intern_namespace(name, interner),
            visibility: Visibility::Public,
            methods: Vec::new(),
            interner,
        }
    }

    /// Build a record-kind descriptor directly.
    pub fn record(name: &str, fields: Vec<FieldDecl>, interner: &StringInterner) -> Arc<TypeDecl> {
        Arc::new(TypeDecl {
            id: DeclId::next(),
            name: interner.intern(name),
            namespace: intern_namespace(name, interner),
            visibility: Visibility::Public,
            kind: TypeKind::Record { fields },
        })
    }

    /// Descriptor identity.
    #[inline]
    pub fn id(&self) -> DeclId {
        self.id
    }

    /// Qualified name.
    #[inline]
    pub fn name(&self) -> Name {
        self.name
    }

    /// Namespace (dot-separated prefix of the qualified name).
    #[inline]
    pub fn namespace(&self) -> Name {
        self.namespace
    }

    /// Declared visibility.
    #[inline]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Declared kind.
    #[inline]
    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    /// True for interface-kind descriptors.
    pub fn is_interface(&self) -> bool {
        matches!(self.kind, TypeKind::Interface { .. })
    }

    /// Declared methods; empty for record-kind descriptors.
    pub fn methods(&self) -> &[MethodDecl] {
        match &self.kind {
            TypeKind::Interface { methods } => methods,
            TypeKind::Record { .. } => &[],
        }
    }

    /// Find a method by name and exact parameter tags.
    ///
    /// Returns the method's slot within this contract.
    pub fn method_index(&self, name: Name, params: &[TypeTag]) -> Option<usize> {
        self.methods()
            .iter()
            .position(|m| m.name == name && m.params.as_slice() == params)
    }

    /// Format the qualified name for display.
    pub fn display<'a>(&self, interner: &'a StringInterner) -> DeclDisplay<'a> {
        DeclDisplay {
            name: interner.lookup(self.name),
        }
    }
}

/// Helper for displaying a descriptor's qualified name.
pub struct DeclDisplay<'a> {
    name: &'a str,
}

impl fmt::Display for DeclDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Builder for interface-kind descriptors.
pub struct TypeDeclBuilder<'a> {
    name: Name,
    namespace: Name,
    visibility: Visibility,
    methods: Vec<MethodDecl>,
    interner: &'a StringInterner,
}

impl TypeDeclBuilder<'_> {
    /// Mark the contract private to its namespace.
    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }

    /// Declare a method.
    pub fn method(
        mut self,
        name: &str,
        params: impl IntoIterator<Item = TypeTag>,
        ret: TypeTag,
    ) -> Self {
        self.methods.push(MethodDecl {
            name: self.interner.intern(name),
            params: params.into_iter().collect(),
            ret,
            throws: SmallVec::new(),
        });
        self
    }

    /// Declare a method with declared failure kinds.
    pub fn fallible_method(
        mut self,
        name: &str,
        params: impl IntoIterator<Item = TypeTag>,
        ret: TypeTag,
        throws: impl IntoIterator<Item = &'static str>,
    ) -> Self {
        self.methods.push(MethodDecl {
            name: self.interner.intern(name),
            params: params.into_iter().collect(),
            ret,
            throws: throws.into_iter().map(|t| self.interner.intern(t)).collect(),
        });
        self
    }

    /// Finish the descriptor.
    pub fn build(self) -> Arc<TypeDecl> {
        Arc::new(TypeDecl {
            id: DeclId::next(),
            name: self.name,
            namespace: self.namespace,
            visibility: self.visibility,
            kind: TypeKind::Interface {
                methods: self.methods,
            },
        })
    }
}

/// Intern the dot-separated prefix of a qualified name.
fn intern_namespace(qualified: &str, interner: &StringInterner) -> Name {
    match qualified.rfind('.') {
        Some(dot) => interner.intern(&qualified[..dot]),
        None => Name::EMPTY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builder_assigns_slots_in_declaration_order() {
        let interner = StringInterner::new();
        let decl = TypeDecl::interface("demos.Greeter", &interner)
            .method("bar", [TypeTag::Str], TypeTag::Str)
            .method("baz", [TypeTag::Str], TypeTag::Unit)
            .build();

        assert!(decl.is_interface());
        assert_eq!(decl.methods().len(), 2);
        let bar = interner.intern("bar");
        let baz = interner.intern("baz");
        assert_eq!(decl.method_index(bar, &[TypeTag::Str]), Some(0));
        assert_eq!(decl.method_index(baz, &[TypeTag::Str]), Some(1));
        assert_eq!(decl.method_index(bar, &[TypeTag::I32]), None);
    }

    #[test]
    fn test_namespace_is_qualified_prefix() {
        let interner = StringInterner::new();
        let decl = TypeDecl::interface("app.internal.Task", &interner).build();
        assert_eq!(interner.lookup(decl.namespace()), "app.internal");

        let bare = TypeDecl::interface("Task", &interner).build();
        assert_eq!(bare.namespace(), Name::EMPTY);
    }

    #[test]
    fn test_identity_is_per_declaration() {
        let interner = StringInterner::new();
        let a = TypeDecl::interface("demos.Greeter", &interner).build();
        let b = TypeDecl::interface("demos.Greeter", &interner).build();
        assert_eq!(a.name(), b.name());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_fallible_method_records_failure_kinds() {
        let interner = StringInterner::new();
        let decl = TypeDecl::interface("demos.Source", &interner)
            .fallible_method("next", [], TypeTag::I64, ["demos.Exhausted"])
            .build();
        let throws = &decl.methods()[0].throws;
        assert_eq!(throws.len(), 1);
        assert_eq!(interner.lookup(throws[0]), "demos.Exhausted");
    }

    #[test]
    fn test_record_is_not_interface() {
        let interner = StringInterner::new();
        let point = TypeDecl::record(
            "demos.Point",
            vec![
                FieldDecl {
                    name: interner.intern("x"),
                    ty: TypeTag::I64,
                },
                FieldDecl {
                    name: interner.intern("y"),
                    ty: TypeTag::I64,
                },
            ],
            &interner,
        );
        assert!(!point.is_interface());
        assert!(point.methods().is_empty());
    }
}
