//! # Lifecycle Flows
//!
//! Disconnects from either side, identifier collisions, a third peer
//! knocking on a connected session, and loss of the signaling connection.

#[cfg(test)]
mod tests {
    use crate::integration::support::{code, next_event, next_text, wait_status, Network};
    use pl_02_connection::{ConnectionError, PeerIdentifier, PreconditionError};
    use shared_bus::{EventFilter, EventTopic, SessionEvent};
    use shared_types::{SessionStatus, TransportError};

    #[tokio::test]
    async fn test_remote_disconnect_returns_survivor_to_initialized() {
        let net = Network::new();
        let a = net.spawn_ready("A", 12_345).await;
        let b = net.spawn_ready("B", 67_890).await;
        b.handle().connect(12_345).await.expect("connect");
        wait_status(&a, SessionStatus::Connected).await;

        b.handle().disconnect().await;

        assert_eq!(b.handle().status(), SessionStatus::Disconnected);
        wait_status(&a, SessionStatus::Initialized).await;
        assert!(!net.hub.is_registered(&PeerIdentifier::new("p2p-link-67890")));
        assert_eq!(net.hub.channel_count(), 0);

        // The survivor is free to connect elsewhere.
        let c = net.spawn_ready("C", 55_555).await;
        a.handle().connect(55_555).await.expect("reconnect");
        wait_status(&c, SessionStatus::Connected).await;
    }

    #[tokio::test]
    async fn test_disconnect_is_final_and_idempotent() {
        let net = Network::new();
        let a = net.spawn_ready("A", 12_345).await;

        a.handle().disconnect().await;
        a.handle().disconnect().await;

        assert_eq!(a.handle().status(), SessionStatus::Disconnected);
        assert_eq!(a.handle().start().await, Ok(false));
        assert_eq!(
            a.handle().connect(67_890).await,
            Err(ConnectionError::Precondition(PreconditionError::TransportNotReady))
        );
        assert_eq!(net.hub.peer_count(), 0);
    }

    #[tokio::test]
    async fn test_shutdown_before_registration_is_seen_frees_the_code() {
        let net = Network::new();
        let early = net.spawn("early", 12_345);
        early.shutdown().await.expect("shutdown");
        assert_eq!(net.hub.peer_count(), 0);

        let later = net.spawn_ready("later", 12_345).await;
        assert!(net
            .hub
            .is_registered(&PeerIdentifier::new("p2p-link-12345")));
        later.shutdown().await.expect("shutdown later");
    }

    #[tokio::test]
    async fn test_disconnect_right_after_spawn_releases_registration() {
        let net = Network::new();
        let a = net.spawn("A", 12_345);

        a.handle().disconnect().await;

        assert_eq!(a.handle().status(), SessionStatus::Disconnected);
        assert_eq!(net.hub.peer_count(), 0);
        let b = net.spawn_ready("B", 12_345).await;
        assert_eq!(b.handle().own_code(), code(12_345));
    }

    #[tokio::test]
    async fn test_code_collision_fails_startup_until_freed() {
        let net = Network::new();
        let mut failures = net.bus.subscribe(EventFilter::topics(vec![EventTopic::Failures]));
        let first = net.spawn_ready("first", 12_345).await;
        let second = net.spawn("second", 12_345);

        assert!(matches!(
            next_event(&mut failures).await,
            SessionEvent::TransportFailed {
                error: TransportError::IdentifierTaken(_),
                ..
            }
        ));
        assert_eq!(second.handle().status(), SessionStatus::Disconnected);
        assert_eq!(
            second.handle().connect(67_890).await,
            Err(ConnectionError::Precondition(PreconditionError::TransportNotReady))
        );

        first.shutdown().await.expect("shutdown first");
        assert_eq!(second.handle().start().await, Ok(true));
        wait_status(&second, SessionStatus::Initialized).await;
        assert_eq!(second.handle().own_code(), code(12_345));
    }

    #[tokio::test]
    async fn test_third_peer_is_not_reciprocated() {
        let net = Network::new();
        let a = net.spawn_ready("A", 12_345).await;
        let b = net.spawn_ready("B", 67_890).await;
        let c = net.spawn_ready("C", 55_555).await;
        let mut a_inbox = a.subscribe(EventFilter::topics(vec![EventTopic::Messages]));
        let mut b_inbox = b.subscribe(EventFilter::topics(vec![EventTopic::Messages]));

        b.handle().connect(12_345).await.expect("b connects");
        wait_status(&a, SessionStatus::Connected).await;

        c.handle().connect(12_345).await.expect("c connects");
        c.handle().send_message("from C").await.expect("c sends");

        // A still hears C, but its own channel stays with B.
        match next_event(&mut a_inbox).await {
            SessionEvent::MessageReceived { from_code, text, .. } => {
                assert_eq!(from_code, Some(code(55_555)));
                assert_eq!(text, "from C");
            }
            other => panic!("expected a message, got {other:?}"),
        }
        a.handle().send_message("to B only").await.expect("a sends");
        assert_eq!(next_text(&mut b_inbox).await, "to B only");
        // B->A, A->B, C->A
        assert_eq!(net.hub.channel_count(), 3);
    }

    #[tokio::test]
    async fn test_node_shutdown_releases_registration() {
        let net = Network::new();
        let a = net.spawn_ready("A", 12_345).await;
        let b = net.spawn_ready("B", 67_890).await;
        b.handle().connect(12_345).await.expect("connect");
        wait_status(&a, SessionStatus::Connected).await;

        b.shutdown().await.expect("shutdown");

        wait_status(&a, SessionStatus::Initialized).await;
        assert_eq!(net.hub.peer_count(), 1);
    }

    #[tokio::test]
    async fn test_signaling_loss_tears_down_session() {
        let net = Network::new();
        let a = net.spawn_ready("A", 12_345).await;
        let b = net.spawn_ready("B", 67_890).await;
        b.handle().connect(12_345).await.expect("connect");
        wait_status(&a, SessionStatus::Connected).await;

        net.hub.disconnect_peer(&PeerIdentifier::new("p2p-link-12345"));

        wait_status(&a, SessionStatus::Disconnected).await;
        wait_status(&b, SessionStatus::Initialized).await;
        assert_eq!(a.handle().start().await, Ok(false));
    }
}
