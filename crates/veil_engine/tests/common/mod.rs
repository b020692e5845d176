//! Shared fixtures for the engine integration tests.

// Each test binary uses a subset of these fixtures.
#![allow(dead_code)]

use parking_lot::Mutex;
use std::sync::Arc;
use veil_engine::{
    CallResult, Instance, InterceptHandler, Invoker, MethodSig, NativeFn, SharedInterner,
    TypeDecl, TypeTag, Value,
};

/// `demos.Greeter`: `bar(str) -> str`, `baz(str) -> void`.
pub fn greeter(interner: &SharedInterner) -> Arc<TypeDecl> {
    TypeDecl::interface("demos.Greeter", interner)
        .method("bar", [TypeTag::Str], TypeTag::Str)
        .method("baz", [TypeTag::Str], TypeTag::Unit)
        .build()
}

/// `demos.Closer`: `close() -> void`.
pub fn closer(interner: &SharedInterner) -> Arc<TypeDecl> {
    TypeDecl::interface("demos.Closer", interner)
        .method("close", [], TypeTag::Unit)
        .build()
}

/// A target implementing `demos.Greeter`: `bar` echoes its argument,
/// `baz` completes silently.
pub fn echo_target(interner: &SharedInterner, contract: &Arc<TypeDecl>) -> Value {
    let bar: NativeFn = Arc::new(|args| Ok(args[0].clone()));
    let baz: NativeFn = Arc::new(|_args| Ok(Value::Unit));
    let instance = Instance::builder("demos.EchoTarget", interner)
        .implement(contract, vec![bar, baz])
        .unwrap()
        .build();
    Value::object(instance)
}

/// Handler that forwards every call to a fixed target through the invoker.
pub struct Delegating {
    target: Value,
}

impl Delegating {
    pub fn to(target: Value) -> Arc<dyn InterceptHandler> {
        Arc::new(Delegating { target })
    }
}

impl InterceptHandler for Delegating {
    fn intercept(
        &self,
        _proxy: &Value,
        _sig: &MethodSig,
        invoker: &Invoker,
        args: &[Value],
    ) -> CallResult {
        invoker.invoke(&self.target, args)
    }
}

/// Handler that answers every call with a fixed value.
pub struct Returning(pub Value);

impl InterceptHandler for Returning {
    fn intercept(
        &self,
        _proxy: &Value,
        _sig: &MethodSig,
        _invoker: &Invoker,
        _args: &[Value],
    ) -> CallResult {
        Ok(self.0.clone())
    }
}

/// Handler that raises a fixed failure value on every call.
pub struct Raising(pub Value);

impl InterceptHandler for Raising {
    fn intercept(
        &self,
        _proxy: &Value,
        _sig: &MethodSig,
        _invoker: &Invoker,
        _args: &[Value],
    ) -> CallResult {
        Err(veil_engine::CallError::Raised(self.0.clone()))
    }
}

/// Handler that records the declared return tag of every observed call
/// and answers with the `Unit` sentinel.
#[derive(Default)]
pub struct Recording {
    pub seen: Mutex<Vec<TypeTag>>,
}

impl InterceptHandler for Recording {
    fn intercept(
        &self,
        _proxy: &Value,
        sig: &MethodSig,
        _invoker: &Invoker,
        _args: &[Value],
    ) -> CallResult {
        self.seen.lock().push(sig.ret);
        Ok(Value::Unit)
    }
}
