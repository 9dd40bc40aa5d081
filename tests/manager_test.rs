// tests/manager_test.rs
use git_vertag::config::Config;
use git_vertag::domain::{BuildId, PreReleaseId, Semver};
use git_vertag::manager::TagManager;
use git_vertag::store::{DryRunStore, MockStore};
use git_vertag::VertagError;

fn config(prefix: &str) -> Config {
    Config {
        prefix: prefix.to_string(),
        ..Config::default()
    }
}

fn pre(ids: &[&str]) -> Vec<PreReleaseId> {
    ids.iter().map(|s| s.parse().unwrap()).collect()
}

fn build(ids: &[&str]) -> Vec<BuildId> {
    ids.iter().map(|s| s.parse().unwrap()).collect()
}

#[test]
fn test_get_ver_without_tags_is_zero() {
    let store = MockStore::new();
    let man = TagManager::new(&store, Config::default());
    assert_eq!(man.get_ver().unwrap(), Semver::new(0, 0, 0));
}

#[test]
fn test_get_ver_skips_unparsable_tags() {
    let store = MockStore::with_tags(["1.3.0", "var", "v2", "0.3,1", "foo"]);
    let man = TagManager::new(&store, config(""));
    assert_eq!(
        man.get_ver().unwrap(),
        Semver::new(2, 0, 0),
        "'v2' should be read tolerantly and the rest ignored"
    );
}

#[test]
fn test_get_ver_picks_highest_precedence() {
    let store = MockStore::with_tags(["v1.0.0", "v1.1.0-rc.1", "v1.0.10", "v1.1.0-beta.2"]);
    let man = TagManager::new(&store, Config::default());
    assert_eq!(man.get_ver().unwrap().to_string(), "1.1.0-rc.1");
}

#[test]
fn test_update_patch_creates_tag() {
    let store = MockStore::with_tags(["v1.2.3"]);
    let man = TagManager::new(&store, Config::default());

    let change = man.update_patch(vec![], vec![], &[], None).unwrap();
    assert_eq!(change.previous, "v1.2.3");
    assert_eq!(change.next, "v1.2.4");
    assert_eq!(store.command_lines(), vec!["git tag -l", "git tag v1.2.4"]);
}

#[test]
fn test_update_minor_with_pre_release_and_message() {
    let store = MockStore::with_tags(["v1.2.3"]);
    let man = TagManager::new(&store, Config::default());

    let messages = vec!["Release candidate".to_string()];
    let change = man
        .update_minor(pre(&["rc", "1"]), vec![], &messages, None)
        .unwrap();
    assert_eq!(change.next, "v1.3.0-rc.1");
    assert_eq!(
        store.command_lines().last().unwrap(),
        "git tag --message \"Release candidate\" v1.3.0-rc.1"
    );
}

#[test]
fn test_update_major_with_build() {
    let store = MockStore::with_tags(["v1.2.3-beta"]);
    let man = TagManager::new(&store, Config::default());

    let change = man
        .update_major(vec![], build(&["sha", "5114f85"]), &[], Some("notes.txt"))
        .unwrap();
    assert_eq!(change.next, "v2.0.0+sha.5114f85");
    assert_eq!(
        store.command_lines().last().unwrap(),
        "git tag --file notes.txt v2.0.0+sha.5114f85"
    );
}

#[test]
fn test_update_pre_increments_current() {
    let store = MockStore::with_tags(["v1.0.0-rc.1"]);
    let man = TagManager::new(&store, Config::default());

    let change = man.update_pre(vec![], vec![], &[], None).unwrap();
    assert_eq!(change.next, "v1.0.0-rc.2");
}

#[test]
fn test_update_pre_rewind_is_rejected() {
    let store = MockStore::with_tags(["v1.2.3"]);
    let man = TagManager::new(&store, Config::default());

    let err = man.update_pre(pre(&["alpha"]), vec![], &[], None).unwrap_err();
    assert!(
        matches!(err, VertagError::OrderRewind { .. }),
        "expected OrderRewind, got {:?}",
        err
    );
    assert_eq!(store.tags(), vec!["v1.2.3"], "nothing should be written");
    assert_eq!(store.command_lines(), vec!["git tag -l"]);
}

#[test]
fn test_release_drops_pre_release() {
    let store = MockStore::with_tags(["v1.0.0-rc.3"]);
    let man = TagManager::new(&store, Config::default());

    let change = man.release(vec![], &[], None).unwrap();
    assert_eq!(change.previous, "v1.0.0-rc.3");
    assert_eq!(change.next, "v1.0.0");
}

#[test]
fn test_build_on_release_fails_when_tag_exists() {
    let store = MockStore::with_tags(["v1.0.0+b1"]);
    let man = TagManager::new(&store, Config::default());

    let change = man.build(build(&["b2"]), &[], None).unwrap();
    assert_eq!(change.next, "v1.0.0+b2");

    let err = man.build(build(&["b2"]), &[], None).unwrap_err();
    assert!(matches!(err, VertagError::Store(_)));
}

#[test]
fn test_failed_create_is_reported_without_push() {
    let store = MockStore::with_tags(["v1.0.0"]).fail_on("v1.0.1");
    let man = TagManager::new(
        &store,
        Config {
            push_to: Some("origin".to_string()),
            ..Config::default()
        },
    );

    assert!(man.update_patch(vec![], vec![], &[], None).is_err());
    assert_eq!(store.tags(), vec!["v1.0.0"]);
    assert!(
        !store.command_lines().iter().any(|c| c.starts_with("git push")),
        "a tag that was not created must not be pushed"
    );
}

#[test]
fn test_failed_create_leaves_ancestors_alone() {
    let store = MockStore::with_tags(["v1.0.0", "v1.0", "v1"]).fail_on("v1.0.1");
    let man = TagManager::new(
        &store,
        Config {
            ancestors: true,
            push_to: Some("origin".to_string()),
            ..Config::default()
        },
    );

    assert!(man.update_patch(vec![], vec![], &[], None).is_err());
    assert_eq!(store.tags(), vec!["v1.0.0", "v1.0", "v1"]);
    assert_eq!(
        store.command_lines(),
        vec!["git tag -l", "git tag v1.0.1"],
        "no ancestor may be touched once the version tag failed"
    );
}

#[test]
fn test_push_follows_create() {
    let store = MockStore::with_tags(["v0.1.0"]);
    let man = TagManager::new(
        &store,
        Config {
            push_to: Some("upstream".to_string()),
            ..Config::default()
        },
    );

    man.update_minor(vec![], vec![], &[], None).unwrap();
    assert_eq!(
        store.command_lines(),
        vec!["git tag -l", "git tag v0.2.0", "git push upstream v0.2.0"]
    );
}

#[test]
fn test_ancestors_are_moved_after_release() {
    let store = MockStore::with_tags(["v1.2.3", "v1.2", "v1"]);
    let man = TagManager::new(
        &store,
        Config {
            ancestors: true,
            ..Config::default()
        },
    );

    let change = man.update_patch(vec![], vec![], &[], None).unwrap();
    assert_eq!(change.next, "v1.2.4");
    assert_eq!(
        store.command_lines(),
        vec![
            "git tag -l",
            "git tag v1.2.4",
            "git tag -d v1.2",
            "git tag v1.2",
            "git tag -d v1",
            "git tag v1",
        ]
    );
    assert_eq!(man.get_ver().unwrap().to_string(), "1.2.4");
}

#[test]
fn test_missing_ancestors_are_created() {
    let store = MockStore::with_tags(["v1.2.3"]);
    let man = TagManager::new(
        &store,
        Config {
            ancestors: true,
            ..Config::default()
        },
    );

    man.update_major(vec![], vec![], &[], None).unwrap();
    let mut tags = store.tags();
    tags.sort();
    assert_eq!(tags, vec!["v1.2.3", "v2", "v2.0", "v2.0.0"]);
}

#[test]
fn test_ancestors_skip_pre_releases() {
    let store = MockStore::with_tags(["v1.2.3"]);
    let man = TagManager::new(
        &store,
        Config {
            ancestors: true,
            ..Config::default()
        },
    );

    man.update_major(pre(&["rc", "1"]), vec![], &[], None).unwrap();
    assert_eq!(store.tags(), vec!["v1.2.3", "v2.0.0-rc.1"]);
    assert_eq!(man.get_ver().unwrap().to_string(), "2.0.0-rc.1");
}

#[test]
fn test_delete_ver() {
    let store = MockStore::with_tags(["v1.0.0", "v1.1.0"]);
    let man = TagManager::new(&store, Config::default());

    let current = man.get_ver().unwrap();
    man.delete_ver(&current).unwrap();
    assert_eq!(store.tags(), vec!["v1.0.0"]);
    assert_eq!(man.get_ver().unwrap(), Semver::new(1, 0, 0));
}

#[test]
fn test_delete_ver_missing_tag_fails() {
    let store = MockStore::new();
    let man = TagManager::new(&store, Config::default());
    assert!(man.delete_ver(&Semver::new(1, 0, 0)).is_err());
}

#[test]
fn test_delete_ver_with_ancestors_and_push() {
    let store = MockStore::with_tags(["v1.1.0", "v1.1"]);
    let man = TagManager::new(
        &store,
        Config {
            ancestors: true,
            push_to: Some("origin".to_string()),
            ..Config::default()
        },
    );

    man.delete_ver(&Semver::new(1, 1, 0)).unwrap();
    assert!(store.tags().is_empty());
    assert_eq!(
        store.command_lines(),
        vec![
            "git tag -d v1.1.0",
            "git push origin :v1.1.0",
            "git tag -d v1.1",
            "git push origin :v1.1",
            "git tag -d v1",
            "git push origin :v1",
        ]
    );
}

#[test]
fn test_replace_ver_recreates_tag() {
    let store = MockStore::with_tags(["v3.0.0"]);
    let man = TagManager::new(&store, Config::default());

    let messages = vec!["Fixed notes".to_string()];
    man.replace_ver(&Semver::new(3, 0, 0), &messages, None).unwrap();
    assert_eq!(store.tags(), vec!["v3.0.0"]);
    assert_eq!(
        store.command_lines(),
        vec!["git tag -d v3.0.0", "git tag --message \"Fixed notes\" v3.0.0"]
    );
}

#[test]
fn test_dry_run_leaves_tags_untouched() {
    let inner = MockStore::with_tags(["v1.0.0"]);
    let store = DryRunStore::new(&inner);
    let man = TagManager::new(&store, Config::default());

    let change = man.update_minor(vec![], vec![], &[], None).unwrap();
    assert_eq!(change.next, "v1.1.0");
    assert_eq!(inner.tags(), vec!["v1.0.0"]);

    let planned: Vec<String> = store.planned().iter().map(|c| c.to_string()).collect();
    assert_eq!(planned, vec!["git tag v1.1.0"]);
}
