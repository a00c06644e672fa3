//! Integration tests for Patchpath
//!
//! These run the binary and the crates together: CLI, snapshot files and the
//! HTTP server over a shared store.

use std::process::Command;
use std::sync::Arc;

use patchpath_core::{PathError, PathResult, Resolver, TitleId};
use patchpath_server::{serve, ServerState};
use patchpath_store::{load_snapshot, save_snapshot, seed, MemoryStore, NewPatch};
use serde_json::Value;
use tempfile::TempDir;
use tokio::net::TcpListener;

fn patchpath() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_patchpath"));
    // keep the tests independent of any config in the working directory
    cmd.current_dir(std::env::temp_dir());
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Test that the CLI can be invoked
#[test]
fn test_cli_invocation() {
    let output = patchpath().arg("--help").output().expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Cheapest patch sequences between game versions"));
    assert!(stdout.contains("resolve"));
}

#[test]
fn test_version_command() {
    let output = patchpath().arg("version").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_resolve_command_prints_result() {
    let output = patchpath()
        .args(["resolve", "1", "1.0.0", "1.4.0"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let result: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["found"], true);
    assert_eq!(result["totalSizeBytes"], 450_000_000u64);
    assert_eq!(result["steps"].as_array().unwrap().len(), 2);
}

#[test]
fn test_resolve_command_reports_missing_version() {
    let output = patchpath()
        .args(["resolve", "1", "1.0.0", "9.9.9"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let result: PathResult = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result, PathResult::NotFound(PathError::TargetVersionNotFound));
}

#[test]
fn test_seed_then_resolve_from_snapshot() {
    let dir = TempDir::new().unwrap();
    let snapshot = dir.path().join("data").join("store.json");

    let output = patchpath().arg("seed").arg(&snapshot).output().unwrap();
    assert!(output.status.success());
    assert!(snapshot.exists());

    let output = patchpath()
        .arg("--data")
        .arg(&snapshot)
        .args(["resolve", "2", "1.0.0", "1.1.0"])
        .output()
        .unwrap();
    let result: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["totalSizeBytes"], 480_000_000u64);
}

#[test]
fn test_bad_config_file_fails() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("patchpath.toml");
    std::fs::write(&config, "[server]\nport = -1\n").unwrap();

    let output = patchpath()
        .arg("--config")
        .arg(&config)
        .arg("version")
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to parse config file"));
}

/// A snapshot edited on disk changes the path the resolver picks.
#[tokio::test]
async fn test_snapshot_edit_changes_resolution() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.json");

    let store = MemoryStore::new();
    seed(&store).await.unwrap();
    save_snapshot(&store, &path).await.unwrap();

    let store = Arc::new(load_snapshot(&path).unwrap().unwrap());
    let v100 = store.version_by_label(TitleId(1), "1.0.0").await.unwrap();
    let v130 = store.version_by_label(TitleId(1), "1.3.0").await.unwrap();
    store
        .add_patch(NewPatch {
            from_version_id: v100.id,
            to_version_id: v130.id,
            file_name: "sf_1.0.0_to_1.3.0.patch".to_string(),
            size_bytes: 100_000_000,
            checksum: String::new(),
        })
        .await
        .unwrap();

    let resolver = Resolver::new(store.clone(), store.clone());
    let result = resolver.resolve(TitleId(1), "1.0.0", "1.4.0").await.unwrap();
    let path = result.path().unwrap();
    assert_eq!(path.total_size_bytes, 200_000_000);
    assert_eq!(path.steps[0].file_name, "sf_1.0.0_to_1.3.0.patch");
    assert_eq!(path.steps[1].from_label, "1.3.0");
}

/// Records created over HTTP are visible to the resolver sharing the store.
#[tokio::test]
async fn test_server_and_resolver_share_store() {
    let store = Arc::new(MemoryStore::new());
    seed(&store).await.unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let state = Arc::new(ServerState::new(store.clone()));
    tokio::spawn(async move {
        serve(listener, state).await.unwrap();
    });

    let client = reqwest::Client::new();
    let response = client
        .post(format!("{base}/api/titles/3/versions"))
        .json(&serde_json::json!({ "label": "1.1.0" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);

    let resolver = Resolver::new(store.clone(), store.clone());
    let result = resolver.resolve(TitleId(3), "1.0.0", "1.1.0").await.unwrap();
    assert_eq!(result, PathResult::NotFound(PathError::NoPathExists));

    let body: Value = client
        .get(format!("{base}/api/titles/3/versions/latest"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["label"], "1.1.0");
}
