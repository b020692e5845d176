//! Dynamic objects: invocation targets with per-contract method tables.
//!
//! A [`DynObject`] names its type, answers contract-membership queries, and
//! dispatches a resolved slot. [`Instance`] is the concrete target kind:
//! it binds one native function per contract method at construction, stored
//! in a dense per-contract table so a resolved slot is a direct index, never
//! a name-hashed lookup.

use crate::errors::{does_not_implement, no_such_method, CallResult};
use crate::{DeclId, MethodSig, Name, SharedInterner, TypeDecl, Value};
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Process-wide generated-type identity counter.
static NEXT_TYPE_DEF_ID: AtomicU64 = AtomicU64::new(0);

/// Identity of a synthesized dispatch type.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct TypeDefId(u64);

impl TypeDefId {
    /// Allocate the next identity. Called by the engine when a type is
    /// resolved; identities are never reused.
    pub fn next() -> Self {
        TypeDefId(NEXT_TYPE_DEF_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Shared reference to a dynamic object.
pub type ObjectRef = Arc<dyn DynObject>;

/// A bound native method: receives the boxed argument sequence.
pub type NativeFn = Arc<dyn Fn(&[Value]) -> CallResult + Send + Sync>;

/// An invocation target.
pub trait DynObject: Send + Sync {
    /// Qualified name of this object's runtime type.
    fn type_name(&self) -> Name;

    /// Whether this object implements the contract with the given identity.
    fn implements(&self, contract: DeclId) -> bool;

    /// Whether this object implements a contract with the given qualified
    /// name (used by reference-tag checked casts).
    fn implements_name(&self, contract: Name) -> bool;

    /// Dispatch a resolved slot on this object.
    fn invoke_slot(&self, sig: &MethodSig, args: &[Value]) -> CallResult;

    /// Identity of the synthesized type this object instantiates, if any.
    fn generated_type(&self) -> Option<TypeDefId> {
        None
    }
}

/// Error when binding method implementations to an [`Instance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    /// The descriptor is not interface-kind.
    NotAnInterface {
        /// Qualified name of the offending descriptor.
        name: String,
    },
    /// The provided table does not match the contract's method count.
    WrongMethodCount {
        /// Qualified name of the contract.
        contract: String,
        /// Declared method count.
        expected: usize,
        /// Functions actually provided.
        provided: usize,
    },
    /// The contract was already bound on this builder.
    AlreadyBound {
        /// Qualified name of the contract.
        contract: String,
    },
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindError::NotAnInterface { name } => {
                write!(f, "`{name}` is not an interface-kind descriptor")
            }
            BindError::WrongMethodCount {
                contract,
                expected,
                provided,
            } => write!(
                f,
                "`{contract}` declares {expected} method(s), {provided} provided"
            ),
            BindError::AlreadyBound { contract } => {
                write!(f, "`{contract}` is already bound on this instance")
            }
        }
    }
}

impl std::error::Error for BindError {}

/// A concrete invocation target with bound method implementations.
pub struct Instance {
    type_name: Name,
    contracts: Vec<Arc<TypeDecl>>,
    tables: FxHashMap<DeclId, Vec<NativeFn>>,
    interner: SharedInterner,
}

impl Instance {
    /// Start building an instance with the given type name.
    pub fn builder(type_name: &str, interner: &SharedInterner) -> InstanceBuilder {
        InstanceBuilder {
            type_name: interner.intern(type_name),
            contracts: Vec::new(),
            tables: FxHashMap::default(),
            interner: interner.clone(),
        }
    }
}

impl DynObject for Instance {
    fn type_name(&self) -> Name {
        self.type_name
    }

    fn implements(&self, contract: DeclId) -> bool {
        self.tables.contains_key(&contract)
    }

    fn implements_name(&self, contract: Name) -> bool {
        self.contracts.iter().any(|c| c.name() == contract)
    }

    fn invoke_slot(&self, sig: &MethodSig, args: &[Value]) -> CallResult {
        let Some(table) = self.tables.get(&sig.declaring) else {
            return Err(does_not_implement(
                self.interner.lookup(self.type_name),
                self.interner.lookup(sig.declaring_name),
            ));
        };
        let Some(method) = table.get(usize::from(sig.slot)) else {
            return Err(no_such_method(
                self.interner.lookup(sig.name),
                self.interner.lookup(self.type_name),
            ));
        };
        method(args)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Instance({}, {} contract(s))",
            self.interner.lookup(self.type_name),
            self.contracts.len()
        )
    }
}

/// Builder binding per-contract method tables.
pub struct InstanceBuilder {
    type_name: Name,
    contracts: Vec<Arc<TypeDecl>>,
    tables: FxHashMap<DeclId, Vec<NativeFn>>,
    interner: SharedInterner,
}

impl InstanceBuilder {
    /// Bind implementations for one contract.
    ///
    /// `methods` must provide one function per declared method, in
    /// declaration (slot) order.
    pub fn implement(
        mut self,
        contract: &Arc<TypeDecl>,
        methods: Vec<NativeFn>,
    ) -> Result<Self, BindError> {
        if !contract.is_interface() {
            return Err(BindError::NotAnInterface {
                name: self.interner.lookup(contract.name()).to_owned(),
            });
        }
        if self.tables.contains_key(&contract.id()) {
            return Err(BindError::AlreadyBound {
                contract: self.interner.lookup(contract.name()).to_owned(),
            });
        }
        let expected = contract.methods().len();
        if methods.len() != expected {
            return Err(BindError::WrongMethodCount {
                contract: self.interner.lookup(contract.name()).to_owned(),
                expected,
                provided: methods.len(),
            });
        }
        self.tables.insert(contract.id(), methods);
        self.contracts.push(contract.clone());
        Ok(self)
    }

    /// Finish the instance.
    pub fn build(self) -> ObjectRef {
        Arc::new(Instance {
            type_name: self.type_name,
            contracts: self.contracts,
            tables: self.tables,
            interner: self.interner,
        })
    }
}
