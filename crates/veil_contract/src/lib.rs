//! Veil Contract - shared data model for the Veil proxy engine.
//!
//! This crate carries everything the engine and its callers agree on:
//!
//! - Interned [`Name`]s and the [`StringInterner`] / [`SharedInterner`]
//! - The exact-width declared-type domain ([`TypeTag`]) and the uniform
//!   boxed value domain ([`Value`])
//! - Contract descriptors ([`TypeDecl`], [`MethodDecl`], [`Visibility`])
//! - Resolved signature handles ([`MethodSig`])
//! - Dynamic objects ([`DynObject`], [`Instance`]) and their bound native
//!   method tables
//! - The interception protocol ([`InterceptHandler`], [`Invoker`]) and the
//!   runtime call failure domain ([`CallError`])
//!
//! The engine itself (normalization, synthesis, linkage, caching) lives in
//! `veil_engine`.

mod decl;
pub mod errors;
mod interner;
mod invoke;
mod name;
mod object;
mod sig;
mod tag;
mod value;

pub use decl::{
    DeclDisplay, DeclId, FieldDecl, MethodDecl, TypeDecl, TypeDeclBuilder, TypeKind, Visibility,
};
pub use errors::{CallError, CallResult};
pub use interner::{InternError, SharedInterner, StringInterner};
pub use invoke::{check_args, narrow_return, InterceptHandler, Invoker};
pub use name::Name;
pub use object::{
    BindError, DynObject, Instance, InstanceBuilder, NativeFn, ObjectRef, TypeDefId,
};
pub use sig::{MethodSig, SigDisplay};
pub use tag::{TagDisplay, TypeTag};
pub use value::Value;
