//! Memoization of generated types and their constructors.
//!
//! Two append-only concurrent maps: (context, canonical contract key) →
//! generated type, and generated-type identity → constructor. The first
//! caller for a key synthesizes and defines while holding the key's map
//! entry; concurrent same-key callers block on the entry and then observe
//! the published type. The loading context's per-name gate remains the
//! exactly-once backstop. Neither map is ever pruned.

use crate::errors::ConfigError;
use crate::generated::GeneratedType;
use crate::linkage::{ContextId, LoadingContext};
use crate::normalize::ContractSet;
use crate::proxy::Proxy;
use crate::synthesize::synthesize;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use veil_contract::{DeclId, InterceptHandler, Name, SharedInterner, TypeDefId, Value};

/// Instantiation function of one generated type.
pub(crate) type Constructor = Arc<dyn Fn(Arc<dyn InterceptHandler>) -> Proxy + Send + Sync>;

/// Cache identity: one loading context plus one canonical contract key.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
struct CacheKey {
    context: ContextId,
    contracts: Box<[DeclId]>,
}

/// Engine-owned caches of generated types and constructors.
pub(crate) struct GeneratedRegistry {
    types: DashMap<CacheKey, Arc<GeneratedType>>,
    ctors: DashMap<TypeDefId, Constructor>,
}

impl GeneratedRegistry {
    pub(crate) fn new() -> Self {
        GeneratedRegistry {
            types: DashMap::new(),
            ctors: DashMap::new(),
        }
    }

    /// The generated type for (context, set), defining it on first request.
    pub(crate) fn lookup_or_define(
        &self,
        context: &Arc<LoadingContext>,
        set: &ContractSet,
        name: Name,
        interner: &SharedInterner,
    ) -> Result<Arc<GeneratedType>, ConfigError> {
        let key = CacheKey {
            context: context.id(),
            contracts: set.key(),
        };
        // Fast path: already defined.
        if let Some(existing) = self.types.get(&key) {
            return Ok(existing.clone());
        }
        match self.types.entry(key) {
            Entry::Occupied(entry) => Ok(entry.get().clone()),
            Entry::Vacant(entry) => {
                let blueprint = synthesize(set, name, interner)?;
                let ty = context.define_with(name, interner, || {
                    GeneratedType::resolve(blueprint, context.id(), interner)
                });
                entry.insert(ty.clone());
                Ok(ty)
            }
        }
    }

    /// The constructor of a generated type, computed at most once.
    pub(crate) fn constructor(&self, ty: &Arc<GeneratedType>) -> Constructor {
        self.ctors
            .entry(ty.id())
            .or_insert_with(|| {
                let ty = ty.clone();
                Arc::new(move |handler| Proxy::new(ty.clone(), handler))
            })
            .clone()
    }

    /// Whether `ty` was generated through this registry.
    pub(crate) fn is_generated_type(&self, ty: &Arc<GeneratedType>) -> bool {
        self.ctors.contains_key(&ty.id())
    }

    /// Whether `value` instantiates a type generated through this registry.
    pub(crate) fn is_generated_instance(&self, value: &Value) -> bool {
        value
            .as_object()
            .and_then(|obj| obj.generated_type())
            .is_some_and(|id| self.ctors.contains_key(&id))
    }
}
