//! # Rendezvous Flows
//!
//! 1. **Code connect**: B dials A's code, A answers with its own channel
//! 2. **Messaging**: text flows both ways, unmodified
//! 3. **Rejections**: second connect, unknown code, invalid code
//! 4. **Simultaneous connect**: both sides dial at once

#[cfg(test)]
mod tests {
    use crate::integration::support::{code, next_event, next_text, wait_status, Network};
    use pl_02_connection::{ConnectionError, PeerIdentifier, PreconditionError};
    use shared_bus::{EventFilter, EventTopic, SessionEvent};
    use shared_types::{SessionStatus, TransportError};

    #[tokio::test]
    async fn test_code_connect_is_reciprocated() {
        let net = Network::new();
        let a = net.spawn_ready("A", 12_345).await;
        let b = net.spawn_ready("B", 67_890).await;
        let mut a_lifecycle = a.subscribe(EventFilter::topics(vec![EventTopic::Lifecycle]));

        b.handle().connect("12345").await.expect("connect");

        wait_status(&a, SessionStatus::Connected).await;
        wait_status(&b, SessionStatus::Connected).await;

        // A sees the request first, then opens its return channel.
        assert!(matches!(
            next_event(&mut a_lifecycle).await,
            SessionEvent::InboundRequest { remote, .. } if remote.as_str() == "p2p-link-67890"
        ));
        assert!(matches!(
            next_event(&mut a_lifecycle).await,
            SessionEvent::ChannelOpened { remote, reciprocated: true, .. } if remote.as_str() == "p2p-link-67890"
        ));

        // One channel each way and no more.
        assert_eq!(net.hub.channel_count(), 2);
    }

    #[tokio::test]
    async fn test_messages_flow_both_ways_unmodified() {
        let net = Network::new();
        let a = net.spawn_ready("A", 12_345).await;
        let b = net.spawn_ready("B", 67_890).await;
        let mut a_inbox = a.subscribe(EventFilter::topics(vec![EventTopic::Messages]));
        let mut b_inbox = b.subscribe(EventFilter::topics(vec![EventTopic::Messages]));

        b.handle().connect(12_345).await.expect("connect");
        wait_status(&a, SessionStatus::Connected).await;

        b.handle().send_message("héllo  A\n").await.expect("b sends");
        a.handle().send_message("").await.expect("a sends empty");
        a.handle().send_message("hi B").await.expect("a sends");

        assert_eq!(next_text(&mut a_inbox).await, "héllo  A\n");
        assert_eq!(next_text(&mut b_inbox).await, "");
        assert_eq!(next_text(&mut b_inbox).await, "hi B");
    }

    #[tokio::test]
    async fn test_received_messages_carry_the_sender_code() {
        let net = Network::new();
        let a = net.spawn_ready("A", 12_345).await;
        let b = net.spawn_ready("B", 67_890).await;
        let mut a_inbox = a.subscribe(EventFilter::topics(vec![EventTopic::Messages]));

        b.handle().connect(12_345).await.expect("connect");
        b.handle().send_message("ping").await.expect("send");

        match next_event(&mut a_inbox).await {
            SessionEvent::MessageReceived {
                session,
                from,
                from_code,
                ..
            } => {
                assert_eq!(session, code(12_345));
                assert_eq!(from, PeerIdentifier::new("p2p-link-67890"));
                assert_eq!(from_code, Some(code(67_890)));
            }
            other => panic!("expected a message, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_second_connect_is_rejected_without_side_effects() {
        let net = Network::new();
        let a = net.spawn_ready("A", 12_345).await;
        let b = net.spawn_ready("B", 67_890).await;
        let _c = net.spawn_ready("C", 55_555).await;

        b.handle().connect(12_345).await.expect("connect");
        wait_status(&a, SessionStatus::Connected).await;

        assert_eq!(
            b.handle().connect(55_555).await,
            Err(ConnectionError::Precondition(PreconditionError::ConnectionExists {
                remote: PeerIdentifier::new("p2p-link-12345"),
            }))
        );
        assert_eq!(net.hub.channel_count(), 2);
        assert_eq!(b.handle().status(), SessionStatus::Connected);
    }

    #[tokio::test]
    async fn test_invalid_code_is_rejected_before_the_transport() {
        let net = Network::new();
        let b = net.spawn_ready("B", 67_890).await;

        for input in ["1234", "123456", "12a45", ""] {
            let result = b.handle().connect(input).await;
            assert!(
                matches!(
                    result,
                    Err(ConnectionError::Precondition(PreconditionError::InvalidCode { .. }))
                ),
                "{input:?} gave {result:?}"
            );
        }
        assert_eq!(net.hub.channel_count(), 0);
        assert_eq!(b.handle().status(), SessionStatus::Initialized);
    }

    #[tokio::test]
    async fn test_unknown_code_fails_asynchronously() {
        let net = Network::new();
        let b = net.spawn_ready("B", 67_890).await;
        let mut failures = b.subscribe(EventFilter::topics(vec![EventTopic::Failures]));

        // The channel is held until the transport reports the miss.
        b.handle().connect(12_345).await.expect("connect is accepted");

        assert!(matches!(
            next_event(&mut failures).await,
            SessionEvent::TransportFailed {
                error: TransportError::PeerUnavailable(remote),
                ..
            } if remote.as_str() == "p2p-link-12345"
        ));
        wait_status(&b, SessionStatus::Initialized).await;

        // And the session may dial again once the peer exists.
        let a = net.spawn_ready("A", 12_345).await;
        b.handle().connect(12_345).await.expect("second attempt");
        wait_status(&a, SessionStatus::Connected).await;
    }

    #[tokio::test]
    async fn test_simultaneous_connect_settles_on_one_pair() {
        let net = Network::new();
        let a = net.spawn_ready("A", 12_345).await;
        let b = net.spawn_ready("B", 67_890).await;

        let (from_a, from_b) = tokio::join!(a.handle().connect(67_890), b.handle().connect(12_345));

        // Whichever side saw the other's channel first reciprocated; its own
        // connect then found a channel already held.
        for result in [&from_a, &from_b] {
            assert!(
                matches!(
                    result,
                    Ok(_) | Err(ConnectionError::Precondition(PreconditionError::ConnectionExists { .. }))
                ),
                "unexpected {result:?}"
            );
        }
        assert!(from_a.is_ok() || from_b.is_ok());

        wait_status(&a, SessionStatus::Connected).await;
        wait_status(&b, SessionStatus::Connected).await;
        assert_eq!(net.hub.channel_count(), 2);
    }
}
