//! Leadership changes and failed updates

use crate::common::*;

#[test]
fn success_from_new_leader_discards_log() {
    let client = Client::new();
    let old = EpochId::new();
    client.start(&[1], &snapshot(old, 0));
    client.cache.process_update(&locks(old, 1, 3));

    let new = EpochId::new();
    client.start(&[2], &locks(new, 4, 4));

    assert_eq!(client.log.get_latest_known_version(), None);
    assert!(client.log.retained_events().is_empty());
    // No position was known, so the new transaction stays unmapped
    let map = client.cache.get_timestamp_to_version_map(&ts_set(&[1, 2]));
    assert_eq!(map[&1], Some(pos(old, 0)));
    assert_eq!(map[&2], None);

    assert_eq!(
        client
            .cache
            .get_events_for_timestamps(&ts_set(&[1]), pos(old, 3))
            .unwrap_err(),
        LockWatchError::UnknownVersion
    );
}

#[test]
fn failed_update_then_snapshot_recovers() {
    let client = Client::new();
    let epoch = EpochId::new();
    client.start(&[1], &snapshot(epoch, 0));
    client.cache.process_update(&locks(epoch, 1, 3));

    client.cache.process_update(&LockWatchStateUpdate::failed(epoch));
    assert_eq!(client.log.get_latest_known_version(), None);

    let next = EpochId::new();
    client.start(&[2], &snapshot(next, 40));
    client.cache.process_update(&locks(next, 41, 42));

    // Started in the old epoch: answered from the new snapshot
    let old_txn = client.events_since_start(1);
    assert!(old_txn.started_from_snapshot);
    assert_eq!(old_txn.sequences(), vec![40, 41, 42]);

    let new_txn = client.events_since_start(2);
    assert!(!new_txn.started_from_snapshot);
    assert_eq!(new_txn.sequences(), vec![41, 42]);
}

#[test]
fn snapshot_under_new_epoch_replaces_state() {
    let client = Client::new();
    let old = EpochId::new();
    client.cache.process_update(&snapshot(old, 0));
    client.cache.process_update(&locks(old, 1, 5));

    let new = EpochId::new();
    let position = client.log.process_update(&LockWatchStateUpdate::snapshot(
        new,
        2,
        vec![row("survivor")],
        vec![],
    ));

    assert_eq!(position, Some(pos(new, 2)));
    assert!(client.log.retained_events().is_empty());
    assert_eq!(client.log.baseline().locked().len(), 1);
    assert!(client.log.baseline().locked().contains(&row("survivor")));
}

#[test]
fn stale_epoch_end_position_is_rejected() {
    let client = Client::new();
    let old = EpochId::new();
    client.start(&[1], &snapshot(old, 0));

    let new = EpochId::new();
    client.cache.process_update(&snapshot(new, 0));

    let err = client
        .cache
        .get_events_for_timestamps(&ts_set(&[1]), pos(old, 0))
        .unwrap_err();
    assert!(matches!(err, LockWatchError::EpochMismatch { .. }));
    assert_eq!(err.latest(), Some(pos(new, 0)));
}

#[test]
fn compaction_ignores_transactions_from_previous_epoch() {
    let client = Client::new();
    let old = EpochId::new();
    client.start(&[1], &snapshot(old, 0));

    let new = EpochId::new();
    client.start(&[2], &snapshot(new, 10));
    client.start(&[3], &locks(new, 11, 15));
    client.cache.process_update(&locks(new, 16, 18));

    // Transaction 1 from the old epoch does not pin the new log
    client.cache.remove_timestamp_from_cache(2);
    assert_eq!(client.cache.earliest_live_position(), Some(pos(new, 15)));
    assert_eq!(client.log.oldest_retained_sequence(), Some(15));
}
