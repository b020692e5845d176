//! Veil Engine - runtime proxy synthesis.
//!
//! The engine turns a caller-specified set of behavioral contracts into a
//! generated dispatch type whose every method forwards to one
//! caller-supplied interception handler, defines that type in a loading
//! context exactly once, and caches it per (context, canonical set).
//!
//! # Architecture
//!
//! - `normalize`: validates and canonicalizes a requested contract list
//! - `synthesize`: merges method signatures into a pure type blueprint
//! - `generated`: resolves blueprints into dispatch slots with bound invokers
//! - `linkage`: [`LoadingContext`] with exactly-once type definition
//! - `registry`: append-only type and constructor caches
//! - [`ProxyEngine`]: the public façade
//!
//! # Re-exports
//!
//! The shared data model from `veil_contract` (values, descriptors,
//! signatures, the interception protocol) is re-exported for convenience.

mod engine;
pub mod errors;
mod generated;
mod linkage;
mod normalize;
mod proxy;
mod registry;
mod synthesize;

pub use engine::ProxyEngine;
pub use errors::ConfigError;
pub use generated::GeneratedType;
pub use linkage::{ContextId, LoadingContext};
pub use normalize::{normalize, ContractSet, GEN_NAMESPACE};
pub use proxy::{Proxy, ProxyInstance};

// Re-export the shared data model from veil_contract
pub use veil_contract::{
    check_args, narrow_return, BindError, CallError, CallResult, DeclId, DynObject, FieldDecl,
    Instance, InstanceBuilder, InterceptHandler, InternError, Invoker, MethodDecl, MethodSig,
    Name, NativeFn, ObjectRef, SharedInterner, StringInterner, TypeDecl, TypeDeclBuilder,
    TypeDefId, TypeKind, TypeTag, Value, Visibility,
};
