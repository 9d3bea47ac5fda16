use serde_json::json;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use std::time::{Duration, Instant};

use tempfile::TempDir;

use vmount::auth::PasswordDigest;
use vmount::users::{self, UserStore};
use vmount::{Operation, Session, VfsError, authenticate};

// Helper to write a config file and return its path
fn write_config(dir: &Path, value: serde_json::Value) -> String {
    let path = dir.join("config.json");
    fs::write(&path, value.to_string()).unwrap();
    path.to_str().unwrap().to_string()
}

fn full_permissions() -> serde_json::Value {
    json!({
        "list": true, "download": true, "upload": true, "overwrite": true,
        "delete": true, "rename": true, "create_dir": true, "remove_dir": true
    })
}

// Helper to build a single-user store over the given mount roots
fn store_for(
    config_dir: &Path,
    password: &str,
    permissions: serde_json::Value,
    mounts: &[(&str, &Path)],
) -> UserStore {
    let hash = PasswordDigest::generate(password).to_string();
    let mounts: Vec<_> = mounts
        .iter()
        .map(|(name, root)| json!({ "name": name, "root": root }))
        .collect();
    let path = write_config(
        config_dir,
        json!({
            "users": [{
                "username": "alice",
                "password_hash": hash,
                "permissions": permissions,
                "mounts": mounts
            }]
        }),
    );
    UserStore::load(&path).unwrap()
}

fn login(store: &UserStore, password: &str) -> Session {
    authenticate(store, "alice", password).unwrap()
}

#[test]
fn test_full_session_flow() {
    let config_dir = TempDir::new().unwrap();
    let docs = TempDir::new().unwrap();
    let media = TempDir::new().unwrap();

    let store = store_for(
        config_dir.path(),
        "swordfish",
        full_permissions(),
        &[("media", media.path()), ("docs", docs.path())],
    );
    let session = login(&store, "swordfish");

    // The root lists mount names sorted, independent of registration order.
    session.check(Operation::List, "/").unwrap();
    let root = session.fs().list("/").unwrap();
    let names: Vec<_> = root.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["docs", "media"]);

    // Create a directory and upload into it.
    session.check(Operation::CreateDir, "/docs/reports").unwrap();
    session.fs().create_directory("/docs/reports").unwrap();

    let target = "/docs/reports/q1.csv";
    assert!(!session.fs().exists(target).unwrap());
    session.check(Operation::Upload, target).unwrap();
    let mut file = session.fs().open_for_write(target).unwrap();
    file.write_all(b"region,revenue\nwest,100\n").unwrap();
    drop(file);

    // Redundant segments reach the same file.
    let spelled = "/docs/reports/../reports/q1.csv";
    assert!(session.fs().exists(spelled).unwrap());
    let meta = session.fs().metadata(spelled).unwrap();
    assert_eq!(meta.name, "q1.csv");
    assert_eq!(meta.size, 24);

    // Download it back.
    session.check(Operation::Download, target).unwrap();
    let mut contents = String::new();
    session
        .fs()
        .open_for_read(target)
        .unwrap()
        .read_to_string(&mut contents)
        .unwrap();
    assert_eq!(contents, "region,revenue\nwest,100\n");

    // Rename, delete, and remove the directory again.
    session.check(Operation::Rename, target).unwrap();
    session
        .fs()
        .rename(target, "/docs/reports/q1-final.csv")
        .unwrap();
    session
        .check(Operation::Delete, "/docs/reports/q1-final.csv")
        .unwrap();
    session.fs().delete_file("/docs/reports/q1-final.csv").unwrap();
    session.check(Operation::RemoveDir, "/docs/reports").unwrap();
    session.fs().remove_directory("/docs/reports").unwrap();

    assert!(fs::read_dir(docs.path()).unwrap().next().is_none());
}

#[test]
fn test_traversal_attempts_are_forbidden() {
    let config_dir = TempDir::new().unwrap();
    let docs = TempDir::new().unwrap();
    let store = store_for(
        config_dir.path(),
        "swordfish",
        full_permissions(),
        &[("c", docs.path())],
    );
    let session = login(&store, "swordfish");

    for vpath in [
        "/c/../../etc/passwd",
        "/c/..",
        "/c/a/../../b",
        "/../c",
        "/..",
    ] {
        let err = session.fs().metadata(vpath).unwrap_err();
        assert!(
            matches!(err, VfsError::Forbidden(_)),
            "{} escaped with {:?}",
            vpath,
            err
        );
    }

    // Traversal is refused as forbidden, not reported as missing.
    let err = session.fs().exists("/c/../../etc/passwd").unwrap_err();
    assert!(matches!(err, VfsError::Forbidden(_)));
}

#[test]
fn test_cross_mount_rename_is_forbidden() {
    let config_dir = TempDir::new().unwrap();
    let docs = TempDir::new().unwrap();
    let media = TempDir::new().unwrap();
    fs::write(docs.path().join("clip.mp4"), b"data").unwrap();

    let store = store_for(
        config_dir.path(),
        "swordfish",
        full_permissions(),
        &[("docs", docs.path()), ("media", media.path())],
    );
    let session = login(&store, "swordfish");

    // Both endpoints resolve, yet the rename is refused.
    assert!(session.fs().exists("/docs/clip.mp4").unwrap());
    let err = session
        .fs()
        .rename("/docs/clip.mp4", "/media/clip.mp4")
        .unwrap_err();
    assert!(matches!(err, VfsError::Forbidden(_)));
    assert!(docs.path().join("clip.mp4").exists());
}

#[test]
fn test_denied_upload_leaves_no_trace() {
    let config_dir = TempDir::new().unwrap();
    let docs = TempDir::new().unwrap();
    let store = store_for(
        config_dir.path(),
        "swordfish",
        json!({ "list": true, "download": true }),
        &[("docs", docs.path())],
    );
    let session = login(&store, "swordfish");

    let err = session.check(Operation::Upload, "/docs/new.txt").unwrap_err();
    assert!(matches!(err, VfsError::Forbidden(_)));

    // The gate failed before any filesystem call: nothing was created.
    assert!(!docs.path().join("new.txt").exists());
    assert!(!session.fs().exists("/docs/new.txt").unwrap());
}

#[test]
fn test_upload_and_overwrite_are_distinct_gates() {
    let config_dir = TempDir::new().unwrap();
    let docs = TempDir::new().unwrap();
    fs::write(docs.path().join("existing.txt"), b"old").unwrap();

    let store = store_for(
        config_dir.path(),
        "swordfish",
        json!({ "list": true, "upload": true }),
        &[("docs", docs.path())],
    );
    let session = login(&store, "swordfish");

    // New file: upload alone suffices.
    assert!(!session.fs().exists("/docs/new.txt").unwrap());
    session.check(Operation::Upload, "/docs/new.txt").unwrap();

    // Existing file: overwrite is additionally required.
    assert!(session.fs().exists("/docs/existing.txt").unwrap());
    let err = session
        .check(Operation::Overwrite, "/docs/existing.txt")
        .unwrap_err();
    assert!(matches!(err, VfsError::Forbidden(_)));
    assert_eq!(fs::read(docs.path().join("existing.txt")).unwrap(), b"old");
}

#[test]
fn test_wrong_password_and_unknown_user_are_indistinguishable() {
    let config_dir = TempDir::new().unwrap();
    let store = store_for(
        config_dir.path(),
        "right password",
        full_permissions(),
        &[],
    );

    let wrong = authenticate(&store, "alice", "wrong password").unwrap_err();
    let unknown = authenticate(&store, "mallory", "wrong password").unwrap_err();
    assert!(matches!(wrong, VfsError::InvalidCredential));
    assert!(matches!(unknown, VfsError::InvalidCredential));
    assert_eq!(wrong.to_string(), unknown.to_string());

    // Warm both paths before timing them.
    for _ in 0..100 {
        let _ = authenticate(&store, "alice", "wrong password");
        let _ = authenticate(&store, "mallory", "wrong password");
    }

    let time_batch = |username: &str| -> Duration {
        let start = Instant::now();
        for _ in 0..2000 {
            let _ = authenticate(&store, username, "wrong password");
        }
        start.elapsed()
    };

    let known = time_batch("alice");
    let unknown = time_batch("mallory");

    // Both failure paths do the same digest work; a skipped computation
    // would show up as an order-of-magnitude gap. The bound is generous
    // to stay robust on noisy machines.
    let (slow, fast) = if known > unknown {
        (known, unknown)
    } else {
        (unknown, known)
    };
    let ratio = slow.as_secs_f64() / fast.as_secs_f64().max(f64::EPSILON);
    assert!(
        ratio < 5.0,
        "timing ratio {:.2} too large (known {:?}, unknown {:?})",
        ratio,
        known,
        unknown
    );
}

#[test]
fn test_reload_affects_only_new_sessions() {
    let config_dir = TempDir::new().unwrap();
    let before = TempDir::new().unwrap();
    let after = TempDir::new().unwrap();
    fs::write(before.path().join("before.txt"), b"b").unwrap();
    fs::write(after.path().join("after.txt"), b"a").unwrap();

    let hash = PasswordDigest::generate("swordfish").to_string();
    let path = write_config(
        config_dir.path(),
        json!({
            "users": [{
                "username": "alice",
                "password_hash": hash,
                "permissions": full_permissions(),
                "mounts": [{ "name": "docs", "root": before.path() }]
            }]
        }),
    );

    let shared = UserStore::load(&path).unwrap().into_shared();
    let old_session = authenticate(&shared.read(), "alice", "swordfish").unwrap();

    // Point the mount somewhere else and reload.
    write_config(
        config_dir.path(),
        json!({
            "users": [{
                "username": "alice",
                "password_hash": hash,
                "permissions": full_permissions(),
                "mounts": [{ "name": "docs", "root": after.path() }]
            }]
        }),
    );
    users::reload(&shared, &path).unwrap();

    // The old session keeps its snapshot.
    let names: Vec<_> = old_session
        .fs()
        .list("/docs")
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(names, ["before.txt"]);

    // A fresh session sees the new table.
    let new_session = authenticate(&shared.read(), "alice", "swordfish").unwrap();
    let names: Vec<_> = new_session
        .fs()
        .list("/docs")
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(names, ["after.txt"]);
}

#[test]
fn test_mount_points_are_protected() {
    let config_dir = TempDir::new().unwrap();
    let docs = TempDir::new().unwrap();
    let store = store_for(
        config_dir.path(),
        "swordfish",
        full_permissions(),
        &[("docs", docs.path())],
    );
    let session = login(&store, "swordfish");

    let err = session.fs().remove_directory("/docs").unwrap_err();
    assert!(matches!(err, VfsError::Forbidden(_)));
    assert!(docs.path().is_dir());

    let err = session.fs().remove_directory("/").unwrap_err();
    assert!(matches!(err, VfsError::Forbidden(_)));

    // The permission gate refuses root mutations on its own.
    let err = session.check(Operation::RemoveDir, "/").unwrap_err();
    assert!(matches!(err, VfsError::Forbidden(_)));
}

#[test]
fn test_locked_account_cannot_log_in() {
    let config_dir = TempDir::new().unwrap();
    let path = write_config(
        config_dir.path(),
        json!({
            "users": [{ "username": "alice", "mounts": [] }]
        }),
    );
    let store = UserStore::load(&path).unwrap();
    assert!(store.user("alice").unwrap().is_locked());

    let err = authenticate(&store, "alice", "").unwrap_err();
    assert!(matches!(err, VfsError::InvalidCredential));
    let err = authenticate(&store, "alice", "anything").unwrap_err();
    assert!(matches!(err, VfsError::InvalidCredential));
}
