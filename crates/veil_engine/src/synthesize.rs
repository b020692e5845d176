//! Dispatch-type synthesis.
//!
//! Merges every method across a canonical contract set into one dispatch
//! slot per distinct structural signature (name + parameter tags) and
//! produces a pure [`TypeBlueprint`]. Synthesis has no side effects; the
//! blueprint only becomes observable once the loading context defines it.

use crate::errors::{conflicting_return_types, ConfigError};
use crate::normalize::ContractSet;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::sync::Arc;
use veil_contract::{Name, StringInterner, TypeDecl, TypeTag};

/// One merged method: its declaring contract and the method's index there.
#[derive(Clone, Debug)]
pub(crate) struct BlueprintMethod {
    pub declaring: Arc<TypeDecl>,
    pub index: usize,
}

/// A synthesized dispatch-type definition, not yet defined anywhere.
#[derive(Clone, Debug)]
pub(crate) struct TypeBlueprint {
    pub name: Name,
    pub contracts: Vec<Arc<TypeDecl>>,
    pub methods: Vec<BlueprintMethod>,
}

/// Merge a contract set into a blueprint under the given qualified name.
///
/// Duplicate-but-compatible signatures (same name, same parameter tags,
/// same return tag) collapse to the slot of their first declarer, in
/// canonical set order. The same structural signature with a different
/// return tag is a structurally invalid merge and is rejected before any
/// definition happens.
pub(crate) fn synthesize(
    set: &ContractSet,
    name: Name,
    interner: &StringInterner,
) -> Result<TypeBlueprint, ConfigError> {
    let mut methods: Vec<BlueprintMethod> = Vec::new();
    let mut merged: FxHashMap<(Name, SmallVec<[TypeTag; 4]>), TypeTag> = FxHashMap::default();

    for contract in set.contracts() {
        for (index, decl) in contract.methods().iter().enumerate() {
            let key = (decl.name, decl.params.clone());
            if let Some(&ret) = merged.get(&key) {
                if ret != decl.ret {
                    return Err(conflicting_return_types(
                        interner.lookup(decl.name),
                        ret.display(interner).to_string(),
                        decl.ret.display(interner).to_string(),
                    ));
                }
                continue;
            }
            merged.insert(key, decl.ret);
            methods.push(BlueprintMethod {
                declaring: contract.clone(),
                index,
            });
        }
    }

    tracing::debug!(
        name = interner.lookup(name),
        contracts = set.contracts().len(),
        slots = methods.len(),
        "synthesized dispatch type"
    );

    Ok(TypeBlueprint {
        name,
        contracts: set.contracts().to_vec(),
        methods,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use pretty_assertions::assert_eq;
    use veil_contract::{SharedInterner, TypeDecl};

    fn blueprint_for(
        contracts: &[Arc<TypeDecl>],
        interner: &SharedInterner,
    ) -> Result<TypeBlueprint, ConfigError> {
        let set = match normalize(contracts, interner) {
            Ok(set) => set,
            Err(err) => panic!("normalize failed: {err}"),
        };
        synthesize(&set, interner.intern("veil.gen.Proxy0"), interner)
    }

    #[test]
    fn test_compatible_duplicates_collapse() {
        let interner = SharedInterner::new();
        let a = TypeDecl::interface("demos.Reader", &interner)
            .method("id", [], TypeTag::Str)
            .method("read", [TypeTag::I64], TypeTag::Str)
            .build();
        let b = TypeDecl::interface("demos.Writer", &interner)
            .method("id", [], TypeTag::Str)
            .method("write", [TypeTag::Str], TypeTag::Unit)
            .build();

        let blueprint = match blueprint_for(&[a, b], &interner) {
            Ok(bp) => bp,
            Err(err) => panic!("synthesize failed: {err}"),
        };
        // id collapses to one slot; read and write stay distinct.
        assert_eq!(blueprint.methods.len(), 3);
    }

    #[test]
    fn test_same_name_different_params_stay_distinct() {
        let interner = SharedInterner::new();
        let a = TypeDecl::interface("demos.Overloaded", &interner)
            .method("get", [TypeTag::I32], TypeTag::Str)
            .method("get", [TypeTag::Str], TypeTag::Str)
            .build();
        let blueprint = match blueprint_for(&[a], &interner) {
            Ok(bp) => bp,
            Err(err) => panic!("synthesize failed: {err}"),
        };
        assert_eq!(blueprint.methods.len(), 2);
    }

    #[test]
    fn test_conflicting_returns_are_rejected() {
        let interner = SharedInterner::new();
        let a = TypeDecl::interface("demos.IntSource", &interner)
            .method("next", [], TypeTag::I32)
            .build();
        let b = TypeDecl::interface("demos.StrSource", &interner)
            .method("next", [], TypeTag::Str)
            .build();
        let result = blueprint_for(&[a, b], &interner);
        assert_eq!(
            result.err(),
            Some(ConfigError::ConflictingReturnTypes {
                method: "next".to_owned(),
                first: "i32".to_owned(),
                second: "str".to_owned(),
            })
        );
    }
}
