//! Sync and async submission, completion delivery and the authority gate.

use std::sync::Arc;
use std::time::Duration;

use arbor_tests::prelude::*;
use crossbeam::channel::unbounded;
use pretty_assertions::assert_eq;

const WAIT: Duration = Duration::from_secs(5);

fn session() -> Session {
    init_tracing();
    Session::new(ServerConfig::default()).unwrap()
}

#[test]
fn test_async_batch_completes_once_with_results() {
    // GIVEN a session
    let session = session();
    let (tx, rx) = unbounded();

    // WHEN a batch is submitted asynchronously
    session.execute_async(
        vec![Op::create("/a", "1"), Op::set_data("/a", "2", 0)],
        move |response| tx.send(response).unwrap(),
    );

    // THEN the completion runs exactly once with both results
    let response = rx.recv_timeout(WAIT).unwrap();
    assert!(response.is_committed());
    assert_eq!(response.results()[0], OpResult::Create { path: "/a".to_string() });
    assert_eq!(response.results()[1].stat().map(|s| s.version), Some(1));
    assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
}

#[test]
fn test_async_batches_run_in_submission_order() {
    // GIVEN a chain where each batch needs the previous one
    let session = session();
    let (tx, rx) = unbounded();
    let mut path = String::new();
    for i in 0..20 {
        path.push_str(&format!("/n{i}"));
        let tx = tx.clone();
        session.execute_async(vec![Op::create(path.clone(), "")], move |r| {
            tx.send((i, r)).unwrap()
        });
    }

    // THEN every batch commits, completions arrive in order, zxids ascend
    let mut last_zxid = 0;
    for expected in 0..20 {
        let (i, response) = rx.recv_timeout(WAIT).unwrap();
        assert_eq!(i, expected);
        assert!(response.is_committed(), "batch {i} failed: {}", response.outcome());
        let zxid = response.zxid().unwrap();
        assert!(zxid > last_zxid);
        last_zxid = zxid;
    }
}

#[test]
fn test_async_abort_reports_index() {
    let session = session();
    let (tx, rx) = unbounded();

    session
        .transaction()
        .create("/a", "", CreateMode::Persistent)
        .create("/a", "", CreateMode::Persistent)
        .commit_async(move |r| tx.send(r).unwrap());

    let response = rx.recv_timeout(WAIT).unwrap();
    let err = response.into_result().unwrap_err();
    assert_eq!(err.code(), ErrorCode::NodeExists);
    assert_eq!(err.index(), Some(1));
    assert_eq!(err.results()[0].code(), ErrorCode::TransactionAborted);
    assert!(session.exists("/a").unwrap().is_none());
}

#[test]
fn test_unavailable_batch_never_touches_store() {
    // GIVEN a node that is not authoritative
    let session = session();
    session.set_authoritative(false);
    let events = session.subscribe();
    let (tx, rx) = unbounded();

    // WHEN sync and async batches are submitted
    let sync = session.execute_sync(&[Op::create("/a", ""), Op::create("/b", "")]);
    session.execute_async(vec![Op::create("/c", "")], move |r| tx.send(r).unwrap());

    // THEN both complete Unavailable in every entry, nothing changed
    assert_eq!(sync.outcome(), ErrorCode::Unavailable);
    assert_eq!(sync.failed_index(), None);
    assert_eq!(
        sync.results().iter().map(|r| r.code()).collect::<Vec<_>>(),
        vec![ErrorCode::Unavailable, ErrorCode::Unavailable]
    );
    let async_response = rx.recv_timeout(WAIT).unwrap();
    assert_eq!(async_response.outcome(), ErrorCode::Unavailable);
    assert_eq!(session.namespace().last_zxid(), 0);
    assert!(events.try_recv().is_err());
}

#[test]
fn test_shutdown_drains_queued_batches() {
    // GIVEN many queued async batches
    let session = session();
    let (tx, rx) = unbounded();
    for i in 0..50 {
        let tx = tx.clone();
        session.execute_async(vec![Op::create(format!("/n{i}"), "")], move |r| {
            tx.send(r).unwrap()
        });
    }
    drop(tx);

    // WHEN the session shuts down
    session.shutdown();

    // THEN every queued batch completed exactly once and committed
    let responses: Vec<MultiResponse> = rx.iter().collect();
    assert_eq!(responses.len(), 50);
    assert!(responses.iter().all(MultiResponse::is_committed));
    assert_eq!(session.get_children("/").unwrap().len(), 50);

    // AND later submissions are refused
    let (tx, rx) = unbounded();
    session.execute_async(vec![Op::create("/late", "")], move |r| tx.send(r).unwrap());
    assert_eq!(rx.recv_timeout(WAIT).unwrap().outcome(), ErrorCode::Unavailable);
}

#[test]
fn test_completion_can_submit_follow_up() {
    // GIVEN a completion that chains a second batch
    let session = Arc::new(session());
    let chained = Arc::clone(&session);
    let (tx, rx) = unbounded();

    session.execute_async(vec![Op::create("/job", "")], move |first| {
        assert!(first.is_committed());
        let follow_up = tx.clone();
        chained.execute_async(vec![Op::create("/job/done", "")], move |r| {
            follow_up.send(r).unwrap()
        });
    });

    // THEN the follow-up commits after the first batch
    let response = rx.recv_timeout(WAIT).unwrap();
    assert!(response.is_committed());
    assert!(session.exists("/job/done").unwrap().is_some());
}

#[test]
fn test_subscriber_sees_commit_order() {
    let session = session();
    let events = session.subscribe();

    session.execute_sync(&[Op::create("/p", ""), Op::create("/p/q", "")]);
    session.execute_sync(&[Op::delete("/p/q", ANY_VERSION)]);

    let seen: Vec<(String, EventKind, i64)> = events
        .try_iter()
        .map(|e| (e.path.to_string(), e.kind, e.zxid))
        .collect();
    assert_eq!(
        seen,
        vec![
            ("/p".to_string(), EventKind::NodeCreated, 1),
            ("/p/q".to_string(), EventKind::NodeCreated, 1),
            ("/p/q".to_string(), EventKind::NodeDeleted, 2),
        ]
    );
}

#[test]
fn test_sync_from_completion_after_shutdown_is_refused() {
    // GIVEN a completion that submits a sync batch once the session shuts down
    let session = Arc::new(session());
    let inner = Arc::clone(&session);
    let (tx, rx) = unbounded();
    session.execute_async(vec![Op::create("/first", "")], move |_| {
        let deadline = std::time::Instant::now() + WAIT;
        while !inner.is_shut_down() && std::time::Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(1));
        }
        tx.send(inner.execute_sync(&[Op::create("/late", "")])).unwrap();
    });

    // WHEN the session shuts down while that completion runs
    session.shutdown();

    // THEN the late batch is refused and never applied
    let late = rx.recv_timeout(WAIT).unwrap();
    assert_eq!(late.outcome(), ErrorCode::Unavailable);
    assert_eq!(late.results()[0].code(), ErrorCode::Unavailable);
    assert!(session.exists("/first").unwrap().is_some());
    assert!(session.exists("/late").unwrap().is_none());
}

#[test]
fn test_async_submit_does_not_wait_on_full_queue() {
    // GIVEN a one-slot queue whose worker is held inside a completion
    init_tracing();
    let session = Session::new(ServerConfig::default().with_queue_depth(1)).unwrap();
    let (started_tx, started_rx) = unbounded();
    let (gate_tx, gate_rx) = unbounded::<()>();
    session.execute_async(vec![Op::create("/held", "")], move |_| {
        started_tx.send(()).unwrap();
        let _ = gate_rx.recv_timeout(WAIT);
    });
    started_rx.recv_timeout(WAIT).unwrap();

    // AND a second batch filling the only slot
    let (queued_tx, queued_rx) = unbounded();
    session.execute_async(vec![Op::create("/queued", "")], move |r| queued_tx.send(r).unwrap());

    // WHEN a third batch is submitted
    let (overflow_tx, overflow_rx) = unbounded();
    session.execute_async(vec![Op::create("/overflow", "")], move |r| {
        overflow_tx.send(r).unwrap()
    });

    // THEN it has already completed Unavailable, without waiting for the worker
    let overflow = overflow_rx.try_recv().unwrap();
    assert_eq!(overflow.outcome(), ErrorCode::Unavailable);
    assert!(overflow.outcome().is_retryable());

    // AND the queued batch still commits once the worker is released
    drop(gate_tx);
    assert!(queued_rx.recv_timeout(WAIT).unwrap().is_committed());
    assert!(session.exists("/overflow").unwrap().is_none());
}
