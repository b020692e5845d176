//! Resolved generated types.
//!
//! A [`GeneratedType`] is the initialized form of a blueprint: one dispatch
//! slot per merged signature, each holding the shared signature handle
//! (resolved once, here) and an invoker bound to it. Signature resolution
//! looks the method up on its declaring contract by name and parameter
//! tags; a miss is an engine bug and panics.

use crate::linkage::ContextId;
use crate::synthesize::TypeBlueprint;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;
use veil_contract::{
    DeclId, Invoker, MethodSig, Name, SharedInterner, TypeDecl, TypeDefId, TypeTag,
};

/// One dispatch slot of a generated type.
pub(crate) struct DispatchSlot {
    pub(crate) sig: Arc<MethodSig>,
    pub(crate) invoker: Invoker,
}

/// A synthesized dispatch type, defined in exactly one loading context.
pub struct GeneratedType {
    id: TypeDefId,
    name: Name,
    context: ContextId,
    contracts: Vec<Arc<TypeDecl>>,
    slots: Vec<DispatchSlot>,
    by_name: FxHashMap<Name, SmallVec<[u16; 2]>>,
    by_origin: FxHashMap<(DeclId, u16), u16>,
    interner: SharedInterner,
}

impl GeneratedType {
    /// Initialize a blueprint into a generated type.
    ///
    /// # Panics
    /// Panics if a merged method cannot be resolved on its declaring
    /// contract, or if the slot count overflows the dispatch index width.
    /// Both indicate engine bugs, not caller errors.
    pub(crate) fn resolve(
        blueprint: TypeBlueprint,
        context: ContextId,
        interner: &SharedInterner,
    ) -> Arc<GeneratedType> {
        let mut slots = Vec::with_capacity(blueprint.methods.len());
        let mut by_name: FxHashMap<Name, SmallVec<[u16; 2]>> = FxHashMap::default();
        let mut by_key: FxHashMap<(Name, SmallVec<[TypeTag; 4]>), u16> = FxHashMap::default();

        for (dispatch_index, merged) in blueprint.methods.iter().enumerate() {
            let declaring = &merged.declaring;
            let Some(decl) = declaring.methods().get(merged.index) else {
                panic!(
                    "dispatch slot {dispatch_index} of `{}` references a missing method",
                    interner.lookup(blueprint.name)
                );
            };
            // Resolved-handle initialization: look the method up on its
            // declaring contract by name and exact parameter tags.
            let Some(contract_slot) = declaring.method_index(decl.name, &decl.params) else {
                panic!(
                    "method `{}` not resolvable on `{}` during type initialization",
                    interner.lookup(decl.name),
                    interner.lookup(declaring.name()),
                );
            };
            let contract_slot = to_slot_index(contract_slot, interner, blueprint.name);
            let dispatch_index = to_slot_index(dispatch_index, interner, blueprint.name);

            let sig = Arc::new(MethodSig {
                declaring: declaring.id(),
                declaring_name: declaring.name(),
                name: decl.name,
                params: decl.params.clone(),
                ret: decl.ret,
                throws: decl.throws.clone(),
                slot: contract_slot,
            });
            by_name.entry(decl.name).or_default().push(dispatch_index);
            by_key.insert((decl.name, decl.params.clone()), dispatch_index);
            slots.push(DispatchSlot {
                invoker: Invoker::new(sig.clone(), interner.clone()),
                sig,
            });
        }

        // Every (contract, contract-slot) origin resolves to its dispatch
        // slot, including signatures collapsed into another declarer's slot.
        let mut by_origin: FxHashMap<(DeclId, u16), u16> = FxHashMap::default();
        for contract in &blueprint.contracts {
            for (index, decl) in contract.methods().iter().enumerate() {
                let index = to_slot_index(index, interner, blueprint.name);
                if let Some(&dispatch_index) = by_key.get(&(decl.name, decl.params.clone())) {
                    by_origin.insert((contract.id(), index), dispatch_index);
                }
            }
        }

        Arc::new(GeneratedType {
            id: TypeDefId::next(),
            name: blueprint.name,
            context,
            contracts: blueprint.contracts,
            slots,
            by_name,
            by_origin,
            interner: interner.clone(),
        })
    }

    /// Identity of this generated type.
    #[inline]
    pub fn id(&self) -> TypeDefId {
        self.id
    }

    /// Qualified name this type is defined under.
    #[inline]
    pub fn qualified_name(&self) -> Name {
        self.name
    }

    /// Identity of the loading context this type was defined in.
    #[inline]
    pub fn context(&self) -> ContextId {
        self.context
    }

    /// The canonical contract list this type implements.
    pub fn contracts(&self) -> &[Arc<TypeDecl>] {
        &self.contracts
    }

    /// Number of dispatch slots (distinct merged signatures).
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Whether this type implements the contract with the given identity.
    pub fn implements(&self, contract: DeclId) -> bool {
        self.contracts.iter().any(|c| c.id() == contract)
    }

    /// Whether this type implements a contract with the given name, or is
    /// itself named by it.
    pub fn implements_name(&self, name: Name) -> bool {
        name == self.name || self.contracts.iter().any(|c| c.name() == name)
    }

    pub(crate) fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    pub(crate) fn slot(&self, index: u16) -> Option<&DispatchSlot> {
        self.slots.get(usize::from(index))
    }

    pub(crate) fn slots_for_name(&self, name: Name) -> &[u16] {
        self.by_name.get(&name).map_or(&[], |slots| slots.as_slice())
    }

    pub(crate) fn slot_by_origin(&self, contract: DeclId, contract_slot: u16) -> Option<&DispatchSlot> {
        self.by_origin
            .get(&(contract, contract_slot))
            .and_then(|&index| self.slot(index))
    }
}

impl fmt::Debug for GeneratedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GeneratedType({}, {} slot(s))",
            self.interner.lookup(self.name),
            self.slots.len()
        )
    }
}

/// Narrow a slot count to the dispatch index width.
fn to_slot_index(index: usize, interner: &SharedInterner, name: Name) -> u16 {
    u16::try_from(index).unwrap_or_else(|_| {
        panic!(
            "`{}` exceeds the dispatch slot limit",
            interner.lookup(name)
        )
    })
}
