//! Property tests: atomicity, result length and equivalence with running the
//! same operations one at a time.

use std::sync::Arc;

use arbor_namespace::{Namespace, NamespaceTree};
use arbor_tests::prelude::*;
use arbor_transaction::TransactionExecutor;
use arbor_watch::NotificationTrigger;
use proptest::prelude::*;

const PATHS: &[&str] = &["/a", "/b", "/a/x", "/a/y", "/b/z", "/a/x/deep"];

fn arb_op() -> impl Strategy<Value = Op> {
    let path = prop::sample::select(PATHS);
    let version = -1i32..3;
    prop_oneof![
        (path.clone(), "[a-z]{0,3}").prop_map(|(p, d)| Op::create(p, d)),
        (path.clone(), version.clone()).prop_map(|(p, v)| Op::delete(p, v)),
        (path.clone(), "[a-z]{0,3}", version.clone()).prop_map(|(p, d, v)| Op::set_data(p, d, v)),
        (path, version).prop_map(|(p, v)| Op::check(p, v)),
    ]
}

fn executor() -> TransactionExecutor {
    TransactionExecutor::new(Arc::new(Namespace::new()), Arc::new(NotificationTrigger::new()))
}

/// Paths and payloads, ignoring zxid-dependent metadata.
fn contents(tree: &NamespaceTree) -> Vec<(String, Vec<u8>, i32)> {
    let mut contents: Vec<_> = tree
        .paths()
        .filter_map(|p| tree.get(p).map(|n| (p.to_string(), n.data().to_vec(), n.version())))
        .collect();
    contents.sort();
    contents
}

proptest! {
    #[test]
    fn test_batches_are_all_or_nothing(
        seed in prop::collection::vec(arb_op(), 0..6),
        batch in prop::collection::vec(arb_op(), 0..8),
    ) {
        let executor = executor();
        for op in &seed {
            executor.execute(std::slice::from_ref(op));
        }
        let before = executor.namespace().snapshot().detach();

        let response = executor.execute(&batch);
        let after = executor.namespace().snapshot().detach();

        prop_assert_eq!(response.len(), batch.len());
        if response.is_committed() {
            prop_assert!(response.results().iter().all(|r| !r.is_error()));
            if !batch.is_empty() {
                prop_assert_eq!(after.last_zxid(), before.last_zxid() + 1);
            }
        } else {
            prop_assert_eq!(&before, &after);
            let index = response.failed_index().unwrap();
            for (i, result) in response.results().iter().enumerate() {
                if i == index {
                    prop_assert_eq!(result.code(), response.outcome());
                    prop_assert_ne!(result.code(), ErrorCode::TransactionAborted);
                } else {
                    prop_assert_eq!(result.code(), ErrorCode::TransactionAborted);
                }
            }
        }
    }

    #[test]
    fn test_batch_matches_one_at_a_time(batch in prop::collection::vec(arb_op(), 1..8)) {
        let batched = executor();
        let single = executor();

        let response = batched.execute(&batch);

        let mut first_failure = None;
        for (i, op) in batch.iter().enumerate() {
            let step = single.execute(std::slice::from_ref(op));
            if !step.is_committed() {
                first_failure = Some((i, step.outcome()));
                break;
            }
        }

        match first_failure {
            None => {
                prop_assert!(response.is_committed());
                prop_assert_eq!(
                    contents(&batched.namespace().snapshot().detach()),
                    contents(&single.namespace().snapshot().detach())
                );
            }
            Some((index, code)) => {
                prop_assert_eq!(response.failed_index(), Some(index));
                prop_assert_eq!(response.outcome(), code);
                prop_assert_eq!(batched.namespace().last_zxid(), 0);
            }
        }
    }
}
