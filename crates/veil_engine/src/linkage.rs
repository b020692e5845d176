//! Loading contexts: type definition and linkage.
//!
//! A [`LoadingContext`] is an isolated, append-only namespace of defined
//! types. Definition is exactly-once per qualified name: the per-name gate
//! serializes definers, and an already-present name is an engine bug (names
//! are allocated uniquely upstream), reported as a panic and never retried.

use crate::generated::GeneratedType;
use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use veil_contract::{Name, StringInterner};

/// Process-wide loading-context identity counter.
static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(0);

/// Identity of a loading context.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct ContextId(u64);

/// An isolated namespace for generated type definitions.
pub struct LoadingContext {
    id: ContextId,
    label: Box<str>,
    types: RwLock<FxHashMap<Name, Arc<GeneratedType>>>,
    gates: Mutex<FxHashMap<Name, Arc<Mutex<()>>>>,
}

impl LoadingContext {
    /// Create a new, empty loading context.
    pub fn new(label: &str) -> Arc<LoadingContext> {
        Arc::new(LoadingContext {
            id: ContextId(NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed)),
            label: label.into(),
            types: RwLock::new(FxHashMap::default()),
            gates: Mutex::new(FxHashMap::default()),
        })
    }

    /// Context identity.
    #[inline]
    pub fn id(&self) -> ContextId {
        self.id
    }

    /// Human-readable label for diagnostics.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether a type is defined under the given qualified name.
    pub fn contains(&self, name: Name) -> bool {
        self.types.read().contains_key(&name)
    }

    /// The type defined under the given qualified name, if any.
    pub fn get(&self, name: Name) -> Option<Arc<GeneratedType>> {
        self.types.read().get(&name).cloned()
    }

    /// Number of types defined in this context.
    pub fn defined_count(&self) -> usize {
        self.types.read().len()
    }

    /// Define a type under `name`, exactly once.
    ///
    /// `build` runs under the per-name gate; the built type is published
    /// whole, so readers never observe a partially constructed type.
    ///
    /// # Panics
    /// Panics if `name` is already defined. Names are allocated uniquely by
    /// the normalizer, so a collision is an engine bug, never a retry path.
    pub(crate) fn define_with(
        &self,
        name: Name,
        interner: &StringInterner,
        build: impl FnOnce() -> Arc<GeneratedType>,
    ) -> Arc<GeneratedType> {
        let gate = { self.gates.lock().entry(name).or_default().clone() };
        let _held = gate.lock();

        if self.types.read().contains_key(&name) {
            panic!(
                "cannot define already loaded type `{}` in context `{}`",
                interner.lookup(name),
                self.label
            );
        }

        let ty = build();
        tracing::debug!(
            name = interner.lookup(name),
            context = &*self.label,
            slots = ty.slot_count(),
            "defined generated type"
        );
        self.types.write().insert(name, ty.clone());
        ty
    }
}

impl fmt::Debug for LoadingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LoadingContext({}, {} type(s))",
            self.label,
            self.defined_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::synthesize::synthesize;
    use veil_contract::{SharedInterner, TypeDecl, TypeTag};

    fn resolved(
        context: &Arc<LoadingContext>,
        name: &str,
        interner: &SharedInterner,
    ) -> Arc<GeneratedType> {
        let contract = TypeDecl::interface("demos.Pinger", interner)
            .method("ping", [], TypeTag::Unit)
            .build();
        let set = match normalize(&[contract], interner) {
            Ok(set) => set,
            Err(err) => panic!("normalize failed: {err}"),
        };
        let blueprint = match synthesize(&set, interner.intern(name), interner) {
            Ok(bp) => bp,
            Err(err) => panic!("synthesize failed: {err}"),
        };
        GeneratedType::resolve(blueprint, context.id(), interner)
    }

    #[test]
    fn test_define_publishes_whole_type() {
        let interner = SharedInterner::new();
        let context = LoadingContext::new("test");
        let name = interner.intern("veil.gen.Proxy900");
        assert!(!context.contains(name));

        let ty = context.define_with(name, &interner, || resolved(&context, "veil.gen.Proxy900", &interner));
        assert!(context.contains(name));
        assert_eq!(context.defined_count(), 1);
        let found = match context.get(name) {
            Some(found) => found,
            None => panic!("defined type not found"),
        };
        assert_eq!(found.id(), ty.id());
    }

    #[test]
    #[should_panic(expected = "already loaded")]
    fn test_redefinition_is_fatal() {
        let interner = SharedInterner::new();
        let context = LoadingContext::new("test");
        let name = interner.intern("veil.gen.Proxy901");
        let _ = context.define_with(name, &interner, || resolved(&context, "veil.gen.Proxy901", &interner));
        let _ = context.define_with(name, &interner, || resolved(&context, "veil.gen.Proxy901", &interner));
    }
}
