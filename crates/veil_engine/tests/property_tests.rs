//! Property-based tests for contract-set normalization.
//!
//! These use proptest to permute a pool of contracts and verify:
//! 1. Order insensitivity: any input order of one set resolves to the same
//!    generated type, with exactly one definition.
//! 2. Duplicate rejection: injecting a repeated contract at any position is
//!    always a configuration error, never a definition.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::doc_markdown,
    clippy::uninlined_format_args,
    clippy::redundant_closure_for_method_calls,
    reason = "Proptest macros generate code with these patterns"
)]

mod common;

use common::Recording;
use proptest::prelude::*;
use std::sync::Arc;
use veil_engine::{
    ConfigError, LoadingContext, ProxyEngine, SharedInterner, TypeDecl, TypeTag,
};

const POOL: usize = 6;

/// A pool of distinct single-method contracts.
fn pool(interner: &SharedInterner) -> Vec<Arc<TypeDecl>> {
    (0..POOL)
        .map(|i| {
            TypeDecl::interface(&format!("demos.Pool{i}"), interner)
                .method(&format!("op{i}"), [TypeTag::I64], TypeTag::I64)
                .build()
        })
        .collect()
}

fn permutation() -> impl Strategy<Value = Vec<usize>> {
    Just((0..POOL).collect::<Vec<_>>()).prop_shuffle()
}

proptest! {
    #[test]
    fn normalization_is_order_insensitive(perm in permutation()) {
        let engine = ProxyEngine::new();
        let context = LoadingContext::new("prop");
        let pool = pool(engine.interner());
        let permuted: Vec<_> = perm.iter().map(|&i| pool[i].clone()).collect();

        let shuffled = engine
            .create_proxy(&context, &permuted, Arc::new(Recording::default()))
            .unwrap();
        let declared = engine
            .create_proxy(&context, &pool, Arc::new(Recording::default()))
            .unwrap();

        prop_assert_eq!(
            shuffled.generated_type().id(),
            declared.generated_type().id()
        );
        prop_assert_eq!(context.defined_count(), 1);
    }

    #[test]
    fn duplicate_injection_is_always_rejected(
        perm in permutation(),
        dup in 0..POOL,
    ) {
        let engine = ProxyEngine::new();
        let context = LoadingContext::new("prop");
        let pool = pool(engine.interner());
        let mut contracts: Vec<_> = perm.iter().map(|&i| pool[i].clone()).collect();
        contracts.push(pool[dup].clone());

        let result = engine.create_proxy(&context, &contracts, Arc::new(Recording::default()));
        let is_duplicate = matches!(result, Err(ConfigError::DuplicateContract { .. }));
        prop_assert!(is_duplicate);
        prop_assert_eq!(context.defined_count(), 0);
    }
}
