//! Interface set normalization.
//!
//! Turns a requested contract list into its canonical [`ContractSet`]:
//! interface-kind validation, identity deduplication, the single-namespace
//! rule for non-public contracts, and the canonical ordering that makes two
//! requests for the same contracts hit one cache key regardless of input
//! order. Also allocates qualified names for generated types.

use crate::errors::{duplicate_contract, mixed_visibility, not_an_interface, ConfigError};
use rustc_hash::FxHashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use veil_contract::{DeclId, Name, StringInterner, TypeDecl, Visibility};

/// Namespace owning generated types when every contract is public.
pub const GEN_NAMESPACE: &str = "veil.gen";

/// Process-wide suffix counter for generated type names.
///
/// Monotone across all engines; a suffix is consumed per request, including
/// requests later satisfied from cache. Uniqueness, not density, is the
/// guarantee.
static NEXT_SUFFIX: AtomicU64 = AtomicU64::new(0);

/// A validated, canonically ordered contract set.
#[derive(Clone, Debug)]
pub struct ContractSet {
    contracts: Vec<Arc<TypeDecl>>,
    namespace: Name,
}

impl ContractSet {
    /// Contracts in canonical order (qualified name, identity tie-break).
    pub fn contracts(&self) -> &[Arc<TypeDecl>] {
        &self.contracts
    }

    /// Namespace the generated type must live in: the shared namespace of
    /// the non-public contracts, or the engine-owned namespace.
    pub fn namespace(&self) -> Name {
        self.namespace
    }

    /// Canonical identity key of this set.
    pub(crate) fn key(&self) -> Box<[DeclId]> {
        self.contracts.iter().map(|c| c.id()).collect()
    }
}

/// Validate and canonicalize a requested contract list.
pub fn normalize(
    contracts: &[Arc<TypeDecl>],
    interner: &StringInterner,
) -> Result<ContractSet, ConfigError> {
    let mut seen = FxHashSet::default();
    let mut shared_namespace: Option<Name> = None;

    for contract in contracts {
        if !contract.is_interface() {
            return Err(not_an_interface(interner.lookup(contract.name())));
        }
        if !seen.insert(contract.id()) {
            return Err(duplicate_contract(interner.lookup(contract.name())));
        }
        // Non-public contracts pin the generated type to their namespace,
        // so all of them must agree on exactly one.
        if contract.visibility() == Visibility::Private {
            match shared_namespace {
                None => shared_namespace = Some(contract.namespace()),
                Some(ns) if ns == contract.namespace() => {}
                Some(ns) => {
                    return Err(mixed_visibility(
                        interner.lookup(ns),
                        interner.lookup(contract.namespace()),
                    ));
                }
            }
        }
    }

    let mut ordered: Vec<Arc<TypeDecl>> = contracts.to_vec();
    ordered.sort_by(|a, b| {
        interner
            .lookup(a.name())
            .cmp(interner.lookup(b.name()))
            .then(a.id().cmp(&b.id()))
    });

    let namespace = match shared_namespace {
        Some(ns) => ns,
        None => interner.intern(GEN_NAMESPACE),
    };

    Ok(ContractSet {
        contracts: ordered,
        namespace,
    })
}

/// Allocate a fresh qualified name for a generated type in `namespace`.
pub(crate) fn allocate_type_name(namespace: Name, interner: &StringInterner) -> Name {
    let suffix = NEXT_SUFFIX.fetch_add(1, Ordering::Relaxed);
    let ns = interner.lookup_static(namespace);
    if ns.is_empty() {
        interner.intern(&format!("Proxy{suffix}"))
    } else {
        interner.intern(&format!("{ns}.Proxy{suffix}"))
    }
}
