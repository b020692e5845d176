//! The proxy engine façade.
//!
//! Wires normalization, synthesis, linkage, and the caches into the public
//! entry points. All registries are owned by the engine instance: they start
//! empty, are never torn down, and are never shared between engines.

use crate::errors::ConfigError;
use crate::generated::GeneratedType;
use crate::linkage::LoadingContext;
use crate::normalize::{allocate_type_name, normalize};
use crate::proxy::Proxy;
use crate::registry::GeneratedRegistry;
use std::sync::Arc;
use veil_contract::{InterceptHandler, SharedInterner, TypeDecl, Value};

/// Runtime proxy synthesis engine.
///
/// Passive and synchronous: it owns no background execution and may be
/// called from arbitrary threads. Contract descriptors must be built
/// against this engine's interner (see [`ProxyEngine::interner`]).
pub struct ProxyEngine {
    interner: SharedInterner,
    registry: GeneratedRegistry,
}

impl ProxyEngine {
    /// Create an engine with a fresh interner.
    pub fn new() -> ProxyEngine {
        ProxyEngine::with_interner(SharedInterner::new())
    }

    /// Create an engine sharing an existing interner.
    pub fn with_interner(interner: SharedInterner) -> ProxyEngine {
        ProxyEngine {
            interner,
            registry: GeneratedRegistry::new(),
        }
    }

    /// The interner contract descriptors for this engine must use.
    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    /// Create a proxy implementing `contracts` in `context`, forwarding
    /// every contract method to `handler`.
    ///
    /// The generated type is defined at most once per (context, canonical
    /// contract set); repeated requests reuse the cached type and its
    /// constructor. Fails with [`ConfigError`] before any definition side
    /// effect if the contract set is invalid.
    #[tracing::instrument(level = "debug", skip_all, fields(contracts = contracts.len()))]
    pub fn create_proxy(
        &self,
        context: &Arc<LoadingContext>,
        contracts: &[Arc<TypeDecl>],
        handler: Arc<dyn InterceptHandler>,
    ) -> Result<Proxy, ConfigError> {
        let set = normalize(contracts, &self.interner)?;
        let name = allocate_type_name(set.namespace(), &self.interner);
        let ty = self
            .registry
            .lookup_or_define(context, &set, name, &self.interner)?;
        let ctor = self.registry.constructor(&ty);
        Ok((*ctor)(handler))
    }

    /// Whether `ty` was generated by this engine.
    pub fn is_generated_type(&self, ty: &Arc<GeneratedType>) -> bool {
        self.registry.is_generated_type(ty)
    }

    /// Whether `value` is an instance of a type generated by this engine.
    ///
    /// Non-object values (including `Null`) and objects of foreign types
    /// answer `false`.
    pub fn is_generated_instance(&self, value: &Value) -> bool {
        self.registry.is_generated_instance(value)
    }
}

impl Default for ProxyEngine {
    fn default() -> Self {
        Self::new()
    }
}
