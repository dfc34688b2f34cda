//! # Client Facade Flows
//!
//! Every query family of `HubClient` run end to end against a `LocalHub`:
//! arguments are converted to wire form, answered from the store, and the
//! responses decoded back to typed values.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use hub_client::HubClient;
    use hub_client::LocalHub;
    use hub_types::{bytes_to_hex, CastId, HubError, Message, ReactionType, UserDataType};
    use std::sync::Arc;

    /// A hub with a small social graph: fid 2 casts, fid 3 replies and
    /// reacts, fid 4 amps fid 2.
    struct Graph {
        hub: Arc<LocalHub>,
        client: HubClient<LocalHub>,
        root: Message,
        reply: Message,
        like: Message,
        recast: Message,
        amp: Message,
    }

    async fn graph() -> Graph {
        let (hub, client) = local_client();
        let root = cast_add(2, 100, "root");
        let reply = reply(3, 101, &root, vec![2]);
        let like = reaction(3, 102, ReactionType::Like, &root);
        let recast = reaction(3, 103, ReactionType::Recast, &root);
        let amp = amp(4, 104, 2);

        for message in [&root, &reply, &like, &recast, &amp] {
            client.submit_message(message).await.unwrap();
        }

        Graph {
            hub,
            client,
            root,
            reply,
            like,
            recast,
            amp,
        }
    }

    // =========================================================================
    // CASTS
    // =========================================================================

    #[tokio::test]
    async fn test_cast_queries() {
        let g = graph().await;

        let found = g.client.get_cast(2, &g.root.ts_hash).await.unwrap();
        assert_eq!(found, g.root);

        assert_eq!(g.client.get_casts_by_fid(3).await.unwrap(), vec![g.reply.clone()]);
        assert_eq!(
            g.client.get_casts_by_parent(&g.root.cast_id()).await.unwrap(),
            vec![g.reply.clone()]
        );
        assert_eq!(g.client.get_casts_by_mention(2).await.unwrap(), vec![g.reply]);
    }

    #[tokio::test]
    async fn test_cast_lookup_accepts_uppercase_hex() {
        let g = graph().await;
        let upper = format!("0x{}", g.root.ts_hash[2..].to_uppercase());

        let found = g.client.get_cast(2, &upper).await.unwrap();
        assert_eq!(found.hash, g.root.hash);
    }

    #[tokio::test]
    async fn test_unknown_cast_is_not_found() {
        let g = graph().await;
        let missing = bytes_to_hex(&[0x77; 24]);

        let err = g.client.get_cast(2, &missing).await.unwrap_err();
        assert!(matches!(err, HubError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_empty_collection_is_ok() {
        let g = graph().await;
        assert!(g.client.get_casts_by_fid(99).await.unwrap().is_empty());
        assert!(g.client.get_all_signer_messages_by_fid(99).await.unwrap().is_empty());
    }

    // =========================================================================
    // REACTIONS AND AMPS
    // =========================================================================

    #[tokio::test]
    async fn test_reaction_queries() {
        let g = graph().await;
        let target = g.root.cast_id();

        assert_eq!(
            g.client
                .get_reaction(3, ReactionType::Recast, &target)
                .await
                .unwrap(),
            g.recast
        );
        assert_eq!(
            g.client.get_reactions_by_fid(3, None).await.unwrap(),
            vec![g.like.clone(), g.recast.clone()]
        );
        assert_eq!(
            g.client
                .get_reactions_by_fid(3, Some(ReactionType::Like))
                .await
                .unwrap(),
            vec![g.like.clone()]
        );
        assert_eq!(
            g.client
                .get_reactions_by_cast(&target, Some(ReactionType::Recast))
                .await
                .unwrap(),
            vec![g.recast]
        );
        assert_eq!(
            g.client
                .get_all_reaction_messages_by_fid(3)
                .await
                .unwrap()
                .len(),
            2
        );
    }

    #[tokio::test]
    async fn test_amp_queries() {
        let g = graph().await;

        assert_eq!(g.client.get_amp(4, 2).await.unwrap(), g.amp);
        assert_eq!(g.client.get_amps_by_fid(4).await.unwrap(), vec![g.amp.clone()]);
        assert_eq!(g.client.get_amps_by_user(2).await.unwrap(), vec![g.amp.clone()]);
        assert_eq!(g.client.get_all_amp_messages_by_fid(4).await.unwrap(), vec![g.amp]);
        assert!(matches!(
            g.client.get_amp(4, 3).await,
            Err(HubError::NotFound(_))
        ));
    }

    // =========================================================================
    // VERIFICATIONS, SIGNERS, USER DATA
    // =========================================================================

    #[tokio::test]
    async fn test_verification_signer_and_user_data_queries() {
        let (hub, client) = local_client();
        let delegate = key(0x99);
        let verification = verification(5, 10, 0xAB);
        let signer = signer_add(5, 11, &delegate);
        let old_bio = user_data(5, 12, UserDataType::Bio, "old");
        let new_bio = user_data(5, 13, UserDataType::Bio, "new");
        let pfp = user_data(5, 14, UserDataType::Pfp, "https://example.com/p.png");

        for message in [&verification, &signer, &old_bio, &new_bio, &pfp] {
            assert!(hub.merge_message(message.clone()));
        }

        assert_eq!(
            client.get_verification(5, &eth_address(0xAB)).await.unwrap(),
            verification
        );
        assert_eq!(
            client.get_verifications_by_fid(5).await.unwrap(),
            vec![verification.clone()]
        );
        assert_eq!(
            client.get_all_verification_messages_by_fid(5).await.unwrap(),
            vec![verification]
        );

        let signer_hex = bytes_to_hex(delegate.public_key().as_bytes());
        assert_eq!(client.get_signer(5, &signer_hex).await.unwrap(), signer);
        assert_eq!(client.get_signers_by_fid(5).await.unwrap(), vec![signer]);

        assert_eq!(
            client.get_user_data(5, UserDataType::Bio).await.unwrap(),
            new_bio
        );
        assert_eq!(client.get_user_data_by_fid(5).await.unwrap().len(), 3);
        assert_eq!(
            client.get_all_user_data_messages_by_fid(5).await.unwrap(),
            vec![old_bio, new_bio, pfp]
        );
        assert!(matches!(
            client.get_user_data(5, UserDataType::Url).await,
            Err(HubError::NotFound(_))
        ));
    }

    // =========================================================================
    // REGISTRY EVENTS
    // =========================================================================

    #[tokio::test]
    async fn test_registry_event_queries() {
        let (hub, client) = local_client();
        let id_event = id_registry_event(6, 500);
        let name_event = name_registry_event("bob", 501);
        let renewed = hub_types::NameRegistryEvent {
            block_number: 600,
            event_type: hub_types::NameRegistryEventType::Renew,
            ..name_event.clone()
        };

        hub.merge_id_registry_event(id_event.clone());
        hub.merge_name_registry_event(name_event);
        hub.merge_name_registry_event(renewed.clone());

        assert_eq!(client.get_id_registry_event(6).await.unwrap(), id_event);
        assert_eq!(client.get_name_registry_event("bob").await.unwrap(), renewed);
        assert!(matches!(
            client.get_name_registry_event("carol").await,
            Err(HubError::NotFound(_))
        ));
    }

    // =========================================================================
    // VALIDATION AND SUBMISSION
    // =========================================================================

    #[tokio::test]
    async fn test_invalid_arguments_rejected_before_dispatch() {
        let g = graph().await;

        assert!(matches!(
            g.client.get_cast(2, "not-hex").await,
            Err(HubError::InvalidInput(_))
        ));
        assert!(matches!(
            g.client.get_verification(2, "0x1234").await,
            Err(HubError::InvalidInput(_))
        ));
        assert!(matches!(
            g.client.get_name_registry_event("Not A Name").await,
            Err(HubError::InvalidInput(_))
        ));
        assert!(matches!(
            g.client
                .get_casts_by_parent(&CastId {
                    fid: 0,
                    ts_hash: g.root.ts_hash.clone(),
                })
                .await,
            Err(HubError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_resubmission_is_idempotent() {
        let g = graph().await;
        let count = g.hub.message_count();

        let again = g.client.submit_message(&g.root).await.unwrap();

        assert_eq!(again, g.root);
        assert_eq!(g.hub.message_count(), count);
    }

    #[tokio::test]
    async fn test_pruned_message_disappears_from_queries() {
        let g = graph().await;

        assert!(g.hub.prune_message(&g.like.hash));

        assert_eq!(
            g.client.get_reactions_by_fid(3, None).await.unwrap(),
            vec![g.recast]
        );
    }
}
