//! Loading server configuration from disk.

use std::fs;

use arbor_session::SessionError;
use arbor_tests::prelude::*;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[test]
fn test_load_from_file_applies_limits() {
    // GIVEN a config file with tight limits
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("arbor.toml");
    fs::write(
        &path,
        "max_data_len = 2\nmax_batch_ops = 2\nqueue_depth = 8\nworker_name = \"limited\"\n",
    )
    .unwrap();

    // WHEN a session is opened with it
    let config = ServerConfig::load(&path).unwrap();
    let session = Session::new(config.clone()).unwrap();

    // THEN the limits are enforced
    assert_eq!(session.config(), &config);
    let too_big = session.execute_sync(&[Op::create("/a", "abc")]);
    assert_eq!(too_big.outcome(), ErrorCode::BadArguments);
    assert_eq!(too_big.failed_index(), Some(0));

    let too_many = session.execute_sync(&[
        Op::create("/a", ""),
        Op::create("/b", ""),
        Op::create("/c", ""),
    ]);
    assert_eq!(too_many.outcome(), ErrorCode::BadArguments);
    assert_eq!(too_many.failed_index(), None);
    assert_eq!(session.namespace().last_zxid(), 0);
}

#[test]
fn test_invalid_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "queue_depth = \"deep\"").unwrap();

    let err = ServerConfig::load(&path).unwrap_err();

    assert!(matches!(err, SessionError::ConfigParse(_)));
}

#[test]
fn test_session_refuses_invalid_config() {
    let err = Session::new(ServerConfig::default().with_max_batch_ops(0)).unwrap_err();

    assert!(matches!(err, SessionError::InvalidConfig { .. }));
}
