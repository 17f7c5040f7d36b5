//! Real child processes through SystemSpawner and RuntimeRunner

#![cfg(unix)]

use ocsight::error::LaunchError;
use ocsight::runner::{RuntimeRunner, SpawnError, Spawner, SystemSpawner};
use std::ffi::OsString;

fn sh(script: &str) -> Vec<OsString> {
    vec![OsString::from("-c"), OsString::from(script)]
}

#[tokio::test]
async fn test_exit_code_is_returned_verbatim() {
    let spawner = SystemSpawner::new(false);
    for code in [0, 1, 7, 42, 255] {
        let result = spawner.run("sh", &sh(&format!("exit {}", code))).await;
        assert_eq!(result.unwrap(), code);
    }
}

#[tokio::test]
async fn test_signal_death_maps_to_128_plus_signal() {
    let spawner = SystemSpawner::new(true);
    let code = spawner.run("sh", &sh("kill -TERM $$")).await.unwrap();
    assert_eq!(code, 128 + 15);
}

#[tokio::test]
async fn test_missing_program_is_a_start_failure() {
    let spawner = SystemSpawner::default();
    let result = spawner
        .run("ocsight-no-such-runtime-binary", &sh("exit 0"))
        .await;
    assert!(matches!(result, Err(SpawnError::Start(_))));
}

#[tokio::test]
async fn test_runner_falls_back_to_next_runtime() {
    let runner = RuntimeRunner::new(
        SystemSpawner::new(true),
        vec!["ocsight-no-such-runtime-binary".to_string(), "sh".to_string()],
    );
    assert_eq!(runner.run(&sh("exit 3")).await.unwrap(), 3);
}

#[tokio::test]
async fn test_runner_reports_unavailable_runtimes() {
    let runner = RuntimeRunner::new(
        SystemSpawner::new(true),
        vec!["ocsight-missing-one".to_string(), "ocsight-missing-two".to_string()],
    );
    match runner.run(&sh("exit 0")).await {
        Err(LaunchError::RuntimeUnavailable { tried, .. }) => assert_eq!(tried.len(), 2),
        other => panic!("expected RuntimeUnavailable, got {:?}", other),
    }
}
