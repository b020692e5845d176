//! The interception protocol: handler contract and invoker thunks.
//!
//! Every forwarded call reaches the proxy's [`InterceptHandler`] exactly
//! once, together with the resolved signature handle and an [`Invoker`]
//! bound to that signature. The invoker performs the literal underlying
//! call: checked-cast of the target, exact unboxing of each argument,
//! direct slot dispatch, and boxing of the result.

use crate::errors::{
    arg_mismatch, does_not_implement, not_an_object, null_unboxed, return_mismatch,
    wrong_arg_count, CallError, CallResult,
};
use crate::{MethodSig, SharedInterner, StringInterner, Value};
use std::fmt;
use std::sync::Arc;

/// Interception handler bound to a proxy instance.
///
/// Invoked exactly once per forwarded call, synchronously, on the calling
/// thread. The engine applies no synchronization around the invocation;
/// implementations own their thread safety. Failures returned here
/// propagate to the proxy's caller unmodified.
pub trait InterceptHandler: Send + Sync {
    /// Process a forwarded call and produce its result.
    ///
    /// `proxy` is the proxy instance the call was made on, `sig` the
    /// resolved signature of the invoked method, `invoker` the thunk for
    /// the literal underlying call, and `args` the boxed argument sequence.
    fn intercept(
        &self,
        proxy: &Value,
        sig: &MethodSig,
        invoker: &Invoker,
        args: &[Value],
    ) -> CallResult;
}

/// Pre-resolved invocation thunk, bound to one method signature.
#[derive(Clone)]
pub struct Invoker {
    sig: Arc<MethodSig>,
    interner: SharedInterner,
}

impl Invoker {
    /// Bind an invoker to a resolved signature.
    pub fn new(sig: Arc<MethodSig>, interner: SharedInterner) -> Self {
        Invoker { sig, interner }
    }

    /// The signature this invoker is bound to.
    pub fn sig(&self) -> &Arc<MethodSig> {
        &self.sig
    }

    /// Invoke the underlying method on `target` with `args`.
    ///
    /// The target must be an object implementing the declaring contract;
    /// each argument must match its declared tag exactly. The result is
    /// boxed per the declared return tag (void yields the `Unit` sentinel).
    /// Failures raised by the underlying method pass through unmodified.
    pub fn invoke(&self, target: &Value, args: &[Value]) -> CallResult {
        let Some(obj) = target.as_object() else {
            return Err(not_an_object(target.kind_name()));
        };
        if !obj.implements(self.sig.declaring) {
            return Err(does_not_implement(
                self.interner.lookup(obj.type_name()),
                self.interner.lookup(self.sig.declaring_name),
            ));
        }
        check_args(&self.sig, args, &self.interner)?;
        let result = obj.invoke_slot(&self.sig, args)?;
        narrow_return(&self.sig, result, &self.interner)
    }
}

impl fmt::Debug for Invoker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invoker({})", self.sig.display(&self.interner))
    }
}

/// Check a boxed argument sequence against a signature's parameter tags.
///
/// Arity first, then exact tag admission per position. Null where a
/// primitive is declared reports the null-unboxing failure; any other
/// mismatch reports the offending position.
pub fn check_args(
    sig: &MethodSig,
    args: &[Value],
    interner: &StringInterner,
) -> Result<(), CallError> {
    if args.len() != sig.params.len() {
        return Err(wrong_arg_count(
            interner.lookup(sig.name),
            sig.params.len(),
            args.len(),
        ));
    }
    for (index, (param, arg)) in sig.params.iter().zip(args).enumerate() {
        if !arg.conforms_to(*param) {
            return Err(if arg.is_null() && param.is_primitive() {
                null_unboxed(param.display(interner).to_string())
            } else {
                arg_mismatch(
                    interner.lookup(sig.name),
                    index,
                    param.display(interner).to_string(),
                    arg.kind_name(),
                )
            });
        }
    }
    Ok(())
}

/// Narrow a result value to a signature's declared return tag.
///
/// Void discards the value and yields the `Unit` sentinel. Primitive tags
/// require the exact variant (null fails with the null-unboxing error);
/// reference tags checked-cast.
pub fn narrow_return(sig: &MethodSig, value: Value, interner: &StringInterner) -> CallResult {
    if sig.ret.is_void() {
        return Ok(Value::Unit);
    }
    if value.conforms_to(sig.ret) {
        return Ok(value);
    }
    Err(if value.is_null() && sig.ret.is_primitive() {
        null_unboxed(sig.ret.display(interner).to_string())
    } else {
        return_mismatch(sig.ret.display(interner).to_string(), value.kind_name())
    })
}
