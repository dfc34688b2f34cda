//! # Event Subscription Flows
//!
//! Merges on a `LocalHub` and the typed feeds a `HubClient` receives for
//! them: commit ordering, filter selection, no backlog, cancellation,
//! lagging subscribers and hub shutdown.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use hub_bus::{BusConfig, EventFilters, EventType, HubEvent, SubscriptionEnd, SubscriptionState};
    use hub_client::LocalHub;
    use hub_types::{HubError, IdRegistryEvent, Message, NameRegistryEvent};

    /// The four merges used by most flows, in commit order.
    struct Scenario {
        id_event: IdRegistryEvent,
        name_event: NameRegistryEvent,
        signer_add: Message,
        cast_add: Message,
    }

    impl Scenario {
        fn new() -> Self {
            Self {
                id_event: id_registry_event(2, 100),
                name_event: name_registry_event("alice", 101),
                signer_add: signer_add(2, 1_000, &key(0x42)),
                cast_add: cast_add(2, 1_001, "gm"),
            }
        }

        fn merge_into(&self, hub: &LocalHub) {
            assert!(hub.merge_id_registry_event(self.id_event.clone()));
            assert!(hub.merge_name_registry_event(self.name_event.clone()));
            assert!(hub.merge_message(self.signer_add.clone()));
            assert!(hub.merge_message(self.cast_add.clone()));
        }
    }

    // =========================================================================
    // FILTERS AND ORDERING
    // =========================================================================

    #[tokio::test]
    async fn test_no_filter_delivers_everything_in_commit_order() {
        let (hub, client) = local_client();
        let mut events = client.subscribe(EventFilters::all()).await.unwrap();
        assert_eq!(events.state(), SubscriptionState::Open);

        let scenario = Scenario::new();
        scenario.merge_into(&hub);
        assert!(hub.prune_message(&scenario.cast_add.hash));
        assert!(hub.revoke_message(&scenario.signer_add.hash));

        assert_eq!(
            expect_event(&mut events).await,
            HubEvent::MergeIdRegistryEvent(scenario.id_event.clone())
        );
        assert_eq!(
            expect_event(&mut events).await,
            HubEvent::MergeNameRegistryEvent(scenario.name_event.clone())
        );
        assert_eq!(
            expect_event(&mut events).await,
            HubEvent::MergeMessage(scenario.signer_add.clone())
        );
        assert_eq!(
            expect_event(&mut events).await,
            HubEvent::MergeMessage(scenario.cast_add.clone())
        );
        assert_eq!(
            expect_event(&mut events).await,
            HubEvent::PruneMessage(scenario.cast_add.clone())
        );
        assert_eq!(
            expect_event(&mut events).await,
            HubEvent::RevokeMessage(scenario.signer_add.clone())
        );
        assert_eq!(events.state(), SubscriptionState::Streaming);
        assert!(is_quiet(&mut events).await);
    }

    #[tokio::test]
    async fn test_merge_message_filter_skips_registry_events() {
        let (hub, client) = local_client();
        let mut events = client
            .subscribe(EventFilters::of([EventType::MergeMessage]))
            .await
            .unwrap();

        let scenario = Scenario::new();
        scenario.merge_into(&hub);

        let first = expect_event(&mut events).await;
        let second = expect_event(&mut events).await;
        assert_eq!(first.message(), Some(&scenario.signer_add));
        assert_eq!(second.message(), Some(&scenario.cast_add));
        assert!(is_quiet(&mut events).await);
    }

    #[tokio::test]
    async fn test_multi_type_filter_keeps_order() {
        let (hub, client) = local_client();
        let mut events = client
            .subscribe(EventFilters::of([
                EventType::MergeMessage,
                EventType::MergeIdRegistryEvent,
                EventType::MergeNameRegistryEvent,
            ]))
            .await
            .unwrap();

        let scenario = Scenario::new();
        scenario.merge_into(&hub);

        let mut received = Vec::new();
        for _ in 0..4 {
            received.push(expect_event(&mut events).await.event_type());
        }
        assert_eq!(
            received,
            vec![
                EventType::MergeIdRegistryEvent,
                EventType::MergeNameRegistryEvent,
                EventType::MergeMessage,
                EventType::MergeMessage,
            ]
        );
    }

    #[tokio::test]
    async fn test_no_backlog_before_subscription() {
        let (hub, client) = local_client();
        hub.merge_message(cast_add(3, 10, "before"));

        let mut events = client.subscribe(EventFilters::all()).await.unwrap();
        let after = cast_add(3, 11, "after");
        hub.merge_message(after.clone());

        assert_eq!(expect_event(&mut events).await, HubEvent::MergeMessage(after));
        assert!(is_quiet(&mut events).await);
    }

    #[tokio::test]
    async fn test_duplicate_merge_emits_nothing() {
        let (hub, client) = local_client();
        let mut events = client.subscribe(EventFilters::all()).await.unwrap();
        let message = cast_add(4, 20, "once");
        let event = id_registry_event(4, 7);

        assert!(hub.merge_message(message.clone()));
        assert!(!hub.merge_message(message.clone()));
        assert!(hub.merge_id_registry_event(event.clone()));
        assert!(!hub.merge_id_registry_event(event));

        assert_eq!(expect_event(&mut events).await, HubEvent::MergeMessage(message));
        assert_eq!(
            expect_event(&mut events).await.event_type(),
            EventType::MergeIdRegistryEvent
        );
        assert!(is_quiet(&mut events).await);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_merges_seen_in_one_order() {
        let (hub, client) = local_client();
        let mut first = client.subscribe(EventFilters::all()).await.unwrap();
        let mut second = client.subscribe(EventFilters::all()).await.unwrap();

        let writers: Vec<_> = (0..4u64)
            .map(|writer| {
                let hub = hub.clone();
                tokio::spawn(async move {
                    for n in 0..10u32 {
                        hub.merge_message(amp(writer + 1, n, 100 + u64::from(n)));
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.await.unwrap();
        }

        let mut seen_first = Vec::new();
        let mut seen_second = Vec::new();
        for _ in 0..40 {
            seen_first.push(expect_event(&mut first).await);
            seen_second.push(expect_event(&mut second).await);
        }
        assert_eq!(seen_first, seen_second);
        assert_eq!(hub.message_count(), 40);
    }

    // =========================================================================
    // CANCELLATION
    // =========================================================================

    #[tokio::test]
    async fn test_cancel_stops_delivery() {
        let (hub, client) = local_client();
        let mut events = client.subscribe(EventFilters::all()).await.unwrap();
        assert_eq!(hub.subscriber_count(), 1);

        hub.merge_message(cast_add(5, 1, "buffered"));
        events.cancel();
        hub.merge_message(cast_add(5, 2, "late"));

        assert_eq!(next_event(&mut events).await, None);
        assert_eq!(events.state(), SubscriptionState::Closed);
        assert_eq!(events.termination(), Some(SubscriptionEnd::Cancelled));
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_cancel_handle_wakes_waiting_consumer() {
        let (hub, client) = local_client();
        let mut events = client.subscribe(EventFilters::all()).await.unwrap();
        let handle = events.cancel_handle();

        let consumer = tokio::spawn(async move {
            let mut received = 0;
            while let Some(item) = events.recv().await {
                item.unwrap();
                received += 1;
            }
            (received, events.termination())
        });

        hub.merge_message(cast_add(6, 1, "one"));
        tokio::time::sleep(QUIET_PERIOD).await;
        handle.cancel();

        let (received, end) = tokio::time::timeout(EVENT_TIMEOUT, consumer)
            .await
            .expect("consumer did not stop")
            .unwrap();
        assert_eq!(received, 1);
        assert_eq!(end, Some(SubscriptionEnd::Cancelled));
    }

    #[tokio::test]
    async fn test_cancel_handle_releases_registration_without_polling() {
        let (hub, client) = local_client();
        let mut events = client.subscribe(EventFilters::all()).await.unwrap();
        assert_eq!(hub.subscriber_count(), 1);

        let handle = events.cancel_handle();
        handle.cancel();
        assert_eq!(hub.subscriber_count(), 0);

        for n in 1..=3 {
            hub.merge_message(cast_add(8, n, "after cancel"));
        }
        assert_eq!(hub.subscriber_count(), 0);

        assert_eq!(next_event(&mut events).await, None);
        assert_eq!(events.termination(), Some(SubscriptionEnd::Cancelled));
    }

    #[tokio::test]
    async fn test_cancel_one_leaves_others_streaming() {
        let (hub, client) = local_client();
        let mut kept = client.subscribe(EventFilters::all()).await.unwrap();
        let mut dropped = client
            .subscribe(EventFilters::of([EventType::MergeMessage]))
            .await
            .unwrap();

        dropped.cancel();
        drop(dropped);

        let message = cast_add(7, 1, "still here");
        hub.merge_message(message.clone());

        assert_eq!(expect_event(&mut kept).await, HubEvent::MergeMessage(message));
        assert_eq!(hub.subscriber_count(), 1);
    }

    // =========================================================================
    // FAULTS AND SHUTDOWN
    // =========================================================================

    #[tokio::test]
    async fn test_lagging_subscriber_fails_with_unavailable() {
        let (hub, client) = local_client_with(LocalHub::with_bus_config(BusConfig { capacity: 2 }));
        let mut slow = client.subscribe(EventFilters::all()).await.unwrap();

        for n in 0..3 {
            hub.merge_message(cast_add(8, n, "flood"));
        }
        // subscribers registered after the fault are unaffected
        let mut fresh = client.subscribe(EventFilters::all()).await.unwrap();
        let latest = cast_add(8, 10, "after");
        hub.merge_message(latest.clone());

        assert!(matches!(
            next_event(&mut slow).await,
            Some(Err(HubError::Unavailable(_)))
        ));
        assert_eq!(next_event(&mut slow).await, None);
        assert!(slow.termination().is_some_and(|end| end.is_fault()));

        assert_eq!(expect_event(&mut fresh).await, HubEvent::MergeMessage(latest));
    }

    #[tokio::test]
    async fn test_hub_shutdown_drains_then_completes() {
        let (hub, client) = local_client();
        let mut events = client.subscribe(EventFilters::all()).await.unwrap();
        let message = cast_add(9, 1, "last words");

        hub.merge_message(message.clone());
        hub.close_subscriptions();

        assert_eq!(expect_event(&mut events).await, HubEvent::MergeMessage(message));
        assert_eq!(next_event(&mut events).await, None);
        assert_eq!(events.termination(), Some(SubscriptionEnd::Completed));
    }

    #[tokio::test]
    async fn test_submitted_messages_reach_subscribers() {
        let (hub, client) = local_client();
        let mut events = client
            .subscribe(EventFilters::of([EventType::MergeMessage]))
            .await
            .unwrap();

        let message = cast_add(10, 1, "via facade");
        let stored = client.submit_message(&message).await.unwrap();
        assert_eq!(stored, message);

        assert_eq!(expect_event(&mut events).await, HubEvent::MergeMessage(message));
        assert_eq!(hub.message_count(), 1);
    }
}
