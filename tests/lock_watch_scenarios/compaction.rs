//! Finishing transactions compacts history no live transaction needs

use crate::common::*;

/// ts 10 at the snapshot, ts 20 after e1..e4, then e5..e8 arrive
fn two_transactions(client: &Client) -> EpochId {
    let epoch = EpochId::new();
    client.start(&[10], &snapshot(epoch, 0));
    client.start(&[20], &locks(epoch, 1, 4));
    client.cache.process_update(&locks(epoch, 5, 8));
    epoch
}

#[test]
fn query_below_compaction_point_is_snapshot_rooted() {
    let client = Client::new();
    let epoch = EpochId::new();
    client.cache.process_update(&snapshot(epoch, 0));
    client.cache.process_update(&locks(epoch, 1, 8));

    client.log.remove_old_entries(pos(epoch, 5));

    let events = client
        .log
        .get_events_between_versions(Some(pos(epoch, 3)), pos(epoch, 8))
        .unwrap();
    assert!(events.started_from_snapshot);
    assert_eq!(events.sequences(), vec![4, 5, 6, 7, 8]);

    // The synthetic event carries everything compacted
    let baseline = events.events[0].lock_descriptors();
    for name in ["r1", "r2", "r3", "r4"] {
        assert!(baseline.contains(&row(name)));
    }
}

#[test]
fn finishing_oldest_transaction_keeps_others_exact() {
    let client = Client::new();
    let epoch = two_transactions(&client);

    client.cache.remove_timestamp_from_cache(10);
    assert_eq!(client.log.oldest_retained_sequence(), Some(4));
    assert_eq!(client.cache.earliest_live_position(), Some(pos(epoch, 4)));

    let events = client.events_since_start(20);
    assert!(!events.started_from_snapshot);
    assert_eq!(events.sequences(), vec![5, 6, 7, 8]);

    let folded = client.log.baseline();
    for name in ["r1", "r2", "r3"] {
        assert!(folded.locked().contains(&row(name)));
    }
}

#[test]
fn finishing_last_transaction_compacts_to_latest() {
    let client = Client::new();
    two_transactions(&client);

    client.cache.remove_timestamp_from_cache(10);
    client.cache.remove_timestamp_from_cache(20);

    assert_eq!(client.cache.tracked_timestamps(), 0);
    assert_eq!(client.log.oldest_retained_sequence(), Some(8));
}

#[test]
fn retained_sequences_keep_extra_history() {
    let client = Client::with_config(EventCacheConfig::new().with_retained_sequences(2));
    two_transactions(&client);

    client.cache.remove_timestamp_from_cache(10);
    assert_eq!(client.log.oldest_retained_sequence(), Some(2));
}

#[test]
fn disabled_compaction_keeps_full_history() {
    let client = Client::with_config(EventCacheConfig::for_testing());
    two_transactions(&client);

    client.cache.remove_timestamp_from_cache(10);
    client.cache.remove_timestamp_from_cache(20);

    assert_eq!(client.log.oldest_retained_sequence(), Some(1));
    assert_eq!(client.log.retained_events().len(), 8);
}

#[test]
fn unknown_timestamp_removal_is_noop() {
    let client = Client::new();
    two_transactions(&client);

    client.cache.remove_timestamp_from_cache(999);
    assert_eq!(client.cache.tracked_timestamps(), 2);
    assert_eq!(client.log.oldest_retained_sequence(), Some(1));
}
