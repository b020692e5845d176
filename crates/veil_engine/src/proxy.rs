//! Proxy instances.
//!
//! A [`Proxy`] instantiates a generated type: it holds exactly one immutable
//! handler reference, set at construction. Every call selects a dispatch
//! slot, validates the boxed argument sequence against the declared
//! parameter tags, invokes the handler exactly once, and narrows the
//! handler's result to the declared return tag. Proxies are themselves
//! dynamic objects, so an invoker applied to a proxy re-enters interception.

use crate::generated::{DispatchSlot, GeneratedType};
use std::fmt;
use std::sync::{Arc, Weak};
use veil_contract::errors::{does_not_implement, no_such_method};
use veil_contract::{
    check_args, narrow_return, CallResult, DeclId, DynObject, InterceptHandler, MethodSig, Name,
    TypeDefId, Value,
};

/// Backing state of a proxy: the generated type and its bound handler.
pub struct ProxyInstance {
    ty: Arc<GeneratedType>,
    handler: Arc<dyn InterceptHandler>,
    self_ref: Weak<ProxyInstance>,
}

impl ProxyInstance {
    fn dispatch_name(&self, method: &str, args: &[Value]) -> CallResult {
        let interner = self.ty.interner();
        let type_name = interner.lookup(self.ty.qualified_name());
        let Some(name) = interner.get(method) else {
            return Err(no_such_method(method, type_name));
        };
        let candidates = self.ty.slots_for_name(name);
        // Single candidate: report the precise admission failure. Several
        // candidates (overloads): first one admitting the arguments wins.
        if let [index] = candidates {
            let Some(slot) = self.ty.slot(*index) else {
                return Err(no_such_method(method, type_name));
            };
            check_args(&slot.sig, args, interner)?;
            return self.dispatch_slot(slot, args);
        }
        for &index in candidates {
            if let Some(slot) = self.ty.slot(index) {
                if check_args(&slot.sig, args, interner).is_ok() {
                    return self.dispatch_slot(slot, args);
                }
            }
        }
        Err(no_such_method(method, type_name))
    }

    /// Forward one validated call through the handler.
    fn dispatch_slot(&self, slot: &DispatchSlot, args: &[Value]) -> CallResult {
        let Some(this) = self.self_ref.upgrade() else {
            unreachable!("proxy dispatched without a live self reference")
        };
        let proxy = Value::object(this);
        let result = self.handler.intercept(&proxy, &slot.sig, &slot.invoker, args)?;
        narrow_return(&slot.sig, result, self.ty.interner())
    }
}

impl DynObject for ProxyInstance {
    fn type_name(&self) -> Name {
        self.ty.qualified_name()
    }

    fn implements(&self, contract: DeclId) -> bool {
        self.ty.implements(contract)
    }

    fn implements_name(&self, contract: Name) -> bool {
        self.ty.implements_name(contract)
    }

    fn invoke_slot(&self, sig: &MethodSig, args: &[Value]) -> CallResult {
        let interner = self.ty.interner();
        match self.ty.slot_by_origin(sig.declaring, sig.slot) {
            Some(slot) => self.dispatch_slot(slot, args),
            None => Err(does_not_implement(
                interner.lookup(self.ty.qualified_name()),
                interner.lookup(sig.declaring_name),
            )),
        }
    }

    fn generated_type(&self) -> Option<TypeDefId> {
        Some(self.ty.id())
    }
}

impl fmt::Debug for ProxyInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ProxyInstance({})",
            self.ty.interner().lookup(self.ty.qualified_name())
        )
    }
}

/// A proxy over a generated type.
///
/// Cloning shares the same instance (and handler).
#[derive(Clone)]
pub struct Proxy {
    inner: Arc<ProxyInstance>,
}

impl Proxy {
    pub(crate) fn new(ty: Arc<GeneratedType>, handler: Arc<dyn InterceptHandler>) -> Proxy {
        Proxy {
            inner: Arc::new_cyclic(|self_ref| ProxyInstance {
                ty,
                handler,
                self_ref: self_ref.clone(),
            }),
        }
    }

    /// Invoke a contract method by name with a boxed argument sequence.
    pub fn call(&self, method: &str, args: &[Value]) -> CallResult {
        self.inner.dispatch_name(method, args)
    }

    /// The generated type this proxy instantiates.
    pub fn generated_type(&self) -> &Arc<GeneratedType> {
        &self.inner.ty
    }

    /// This proxy as a boxed value (e.g. for use as an invoker target).
    pub fn as_value(&self) -> Value {
        Value::object(self.inner.clone())
    }
}

impl fmt::Debug for Proxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}
