//! Transactions starting, reading what changed, and finishing

use crate::common::*;

#[test]
fn snapshot_then_success_serves_exact_delta() {
    let client = Client::new();
    let epoch = EpochId::new();

    client.start(&[100], &snapshot(epoch, 0));
    assert_eq!(client.log.get_latest_known_version(), Some(pos(epoch, 0)));

    client.start(&[200], &locks(epoch, 1, 5));
    let map = client.cache.get_timestamp_to_version_map(&ts_set(&[100, 200]));
    assert_eq!(map[&100], Some(pos(epoch, 0)));
    assert_eq!(map[&200], Some(pos(epoch, 5)));

    // 100 started before e1..e5 and sees all of them
    let events = client.events_until(100, pos(epoch, 5));
    assert!(!events.started_from_snapshot);
    assert_eq!(events.sequences(), vec![1, 2, 3, 4, 5]);

    // 200 started at 5: nothing happened since
    let events = client.events_until(200, pos(epoch, 5));
    assert!(!events.started_from_snapshot);
    assert!(events.is_empty());
}

#[test]
fn transaction_started_at_snapshot_sees_nothing_new() {
    let client = Client::new();
    let epoch = EpochId::new();
    client.start(&[100], &snapshot(epoch, 7));

    let events = client.events_until(100, pos(epoch, 7));
    assert!(!events.started_from_snapshot);
    assert!(events.is_empty());

    // The first event after the snapshot is an exact delta too
    client.cache.process_update(&locks(epoch, 8, 8));
    let events = client.events_since_start(100);
    assert!(!events.started_from_snapshot);
    assert_eq!(events.sequences(), vec![8]);
}

#[test]
fn timestamp_mapping_follows_removal() {
    let client = Client::new();
    let epoch = EpochId::new();
    client.cache.process_update(&snapshot(epoch, 0));

    client.start(&[1, 2, 3], &locks(epoch, 1, 3));
    let v1 = pos(epoch, 3);
    let all = ts_set(&[1, 2, 3]);
    assert!(client
        .cache
        .get_timestamp_to_version_map(&all)
        .values()
        .all(|v| *v == Some(v1)));

    client.cache.remove_timestamp_from_cache(2);
    let map = client.cache.get_timestamp_to_version_map(&all);
    assert_eq!(map[&1], Some(v1));
    assert_eq!(map[&2], None);
    assert_eq!(map[&3], Some(v1));
}

#[test]
fn touched_rows_reflect_locks_and_unlocks() {
    let client = Client::new();
    let epoch = EpochId::new();
    client.start(&[7], &snapshot(epoch, 0));

    client.cache.process_update(&LockWatchStateUpdate::success(
        epoch,
        3,
        vec![lock(1, "alice"), lock(2, "bob"), unlock(3, "alice")],
    ));

    let events = client.events_since_start(7);
    let touched = events.touched_descriptors();
    assert!(touched.contains(&row("alice")));
    assert!(touched.contains(&row("bob")));
    assert!(!touched.contains(&row("carol")));
}

#[test]
fn unknown_timestamp_gets_snapshot_rooted_answer() {
    let client = Client::new();
    let epoch = EpochId::new();
    client.cache.process_update(&LockWatchStateUpdate::snapshot(
        epoch,
        0,
        vec![row("held")],
        vec![LockWatchReference::entire_table("accounts")],
    ));
    client.cache.process_update(&locks(epoch, 1, 2));

    let events = client.events_since_start(404);
    assert!(events.started_from_snapshot);
    assert_eq!(events.sequences(), vec![0, 1, 2]);
    match &events.events[0] {
        LockWatchEvent::LockWatchCreated {
            references,
            lock_descriptors,
            ..
        } => {
            assert!(references.contains(&LockWatchReference::entire_table("accounts")));
            assert!(lock_descriptors.contains(&row("held")));
        }
        other => panic!("expected synthetic snapshot event, got {:?}", other),
    }
}

#[test]
fn batch_query_matches_individual_queries() {
    let client = Client::new();
    let epoch = EpochId::new();

    client.start(&[1], &snapshot(epoch, 0));
    client.start(&[2, 3], &locks(epoch, 1, 4));
    client.start(&[4], &locks(epoch, 5, 9));

    let end = pos(epoch, 9);
    let all = ts_set(&[1, 2, 3, 4, 5]);
    let batched = client.cache.get_events_for_timestamps(&all, end).unwrap();

    assert_eq!(batched.len(), 5);
    for ts in all {
        assert_eq!(batched.get(ts).unwrap(), &client.events_until(ts, end));
    }
}

#[test]
fn query_ahead_of_log_is_contract_violation() {
    let client = Client::new();
    let epoch = EpochId::new();
    client.start(&[1], &snapshot(epoch, 0));
    client.cache.process_update(&locks(epoch, 1, 2));

    let err = client
        .cache
        .get_events_for_timestamps(&ts_set(&[1]), pos(epoch, 3))
        .unwrap_err();
    assert_eq!(
        err,
        LockWatchError::VersionAheadOfLog {
            requested: pos(epoch, 3),
            latest: pos(epoch, 2),
        }
    );
}

#[test]
fn updates_survive_json_transport() {
    let client = Client::new();
    let epoch = EpochId::new();

    for update in [snapshot(epoch, 0), locks(epoch, 1, 3)] {
        let json = serde_json::to_string(&update).unwrap();
        let decoded: LockWatchStateUpdate = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, update);
        client.start(&[update.last_known_position().unwrap().sequence], &decoded);
    }

    let events = client.events_since_start(0);
    assert_eq!(events.sequences(), vec![1, 2, 3]);
    assert_eq!(client.events_since_start(3).len(), 0);
}

#[test]
fn config_loads_from_json() {
    let config: EventCacheConfig =
        serde_json::from_str(r#"{"compaction_enabled":true,"retained_sequences":4}"#).unwrap();
    let client = Client::with_config(config);
    assert_eq!(client.cache.config().retained_sequences, 4);
}
