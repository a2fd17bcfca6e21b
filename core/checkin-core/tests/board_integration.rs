//! Integration tests: statuses written by one user and read back by everyone.

use checkin_core::{
    html, Aggregator, CaptureSession, CheckinConfig, FsStatusStore, Identity, KeyInput, NoView,
    ScriptedKeys, StatusChange,
};
use chrono::{Duration, Utc};
use std::fs::{self, File};
use std::path::Path;
use tempfile::TempDir;

fn board() -> (TempDir, CheckinConfig) {
    let root = TempDir::new().unwrap();
    let config = CheckinConfig {
        users_root: root.path().to_path_buf(),
        ..CheckinConfig::default()
    };
    (root, config)
}

fn user(root: &Path, name: &str) -> Identity {
    let home = root.join(name);
    fs::create_dir_all(&home).unwrap();
    Identity::new(name, home)
}

fn age(path: &Path, days: i64) {
    File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified((Utc::now() - Duration::days(days)).into())
        .unwrap();
}

fn texts(config: &CheckinConfig, store: &FsStatusStore) -> Vec<String> {
    let mut texts: Vec<_> = Aggregator::new(store, config.freshness_days)
        .statuses(Utc::now())
        .unwrap()
        .filter(|r| !r.is_empty())
        .map(|r| r.text)
        .collect();
    texts.sort();
    texts
}

#[test]
fn test_written_statuses_are_listed() {
    let (root, config) = board();
    let store = FsStatusStore::new(&config, config.label("checkin").unwrap());

    store.apply(&user(root.path(), "alice"), "~alice: baking").unwrap();
    store.apply(&user(root.path(), "bob"), "~bob is asleep").unwrap();
    user(root.path(), "carol");

    assert_eq!(texts(&config, &store), vec!["~alice: baking", "~bob is asleep"]);
}

#[test]
fn test_unreadable_and_stale_files_are_skipped() {
    let (root, config) = board();
    let store = FsStatusStore::new(&config, config.label("checkin").unwrap());
    for name in ["alice", "bob", "carol", "dave"] {
        store
            .apply(&user(root.path(), name), &format!("~{} here", name))
            .unwrap();
    }

    age(&root.path().join("carol/.checkin"), 20);
    // A directory where the status file should be cannot be read.
    let dave = root.path().join("dave/.checkin");
    fs::remove_file(&dave).unwrap();
    fs::create_dir(&dave).unwrap();

    assert_eq!(texts(&config, &store), vec!["~alice here", "~bob here"]);
}

#[test]
fn test_labels_keep_separate_boards() {
    let (root, config) = board();
    let checkins = FsStatusStore::new(&config, config.label("checkin").unwrap());
    let ventures = FsStatusStore::new(&config, config.label("venture").unwrap());
    let alice = user(root.path(), "alice");

    checkins.apply(&alice, "~alice: at work").unwrap();
    ventures.apply(&alice, "~alice: into the woods").unwrap();

    assert_eq!(texts(&config, &checkins), vec!["~alice: at work"]);
    assert_eq!(texts(&config, &ventures), vec!["~alice: into the woods"]);
}

#[test]
fn test_empty_status_clears_board_entry() {
    let (root, config) = board();
    let store = FsStatusStore::new(&config, config.label("checkin").unwrap());
    let alice = user(root.path(), "alice");

    store.apply(&alice, "~alice: here").unwrap();
    assert!(matches!(store.apply(&alice, "").unwrap(), StatusChange::Removed(_)));
    assert!(matches!(
        store.apply(&alice, "").unwrap(),
        StatusChange::AlreadyAbsent(_)
    ));
    assert!(texts(&config, &store).is_empty());
}

#[test]
fn test_hand_edited_file_is_normalized_to_its_owner() {
    let (root, config) = board();
    let store = FsStatusStore::new(&config, config.label("checkin").unwrap());
    user(root.path(), "mallory");
    fs::write(root.path().join("mallory/.checkin"), "~alice: i am alice\nreally\n").unwrap();

    assert_eq!(
        texts(&config, &store),
        vec!["~mallory: ~alice: i am alice really"]
    );
}

#[test]
fn test_captured_status_round_trips_to_html() {
    let (root, config) = board();
    let store = FsStatusStore::new(&config, config.label("checkin").unwrap());
    let alice = user(root.path(), "alice");

    let mut keys = ScriptedKeys::typed("reading https://example.com/a?b=1&c=2").then(KeyInput::Enter);
    let outcome = CaptureSession::new("What's ~alice up to?", alice.tilde())
        .run(&mut keys, &mut NoView)
        .unwrap();
    assert!(!outcome.is_cancelled());
    store.apply(&alice, &outcome.status).unwrap();

    let records = Aggregator::new(&store, config.freshness_days)
        .statuses(Utc::now())
        .unwrap();
    let lines = html::render_list(records, &config.site);
    assert_eq!(
        lines,
        vec![
            "<ul>".to_string(),
            "<li><a href=\"https://tilde.town/~alice/\">~alice</a> reading \
             <a href=\"https://example.com/a?b=1&amp;c=2\">https://example.com/a?b=1&amp;c=2</a></li>"
                .to_string(),
            "</ul>".to_string(),
        ]
    );
}
