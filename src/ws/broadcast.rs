//! Fan-out of accepted wishes to every live push connection.

use axum::extract::ws::{CloseFrame, Message};

use super::{unregister, ConnectionRegistry, ConnectionSender};
use crate::wishes::store::Wish;

/// Broadcast an accepted wish as a JSON text frame to all connections.
///
/// The wish is serialized once. Membership is snapshotted at broadcast
/// start: connections added mid-broadcast may miss this message, but every
/// member of the snapshot is attempted exactly once. A failed send prunes
/// that connection from the live registry and delivery continues.
pub fn broadcast_wish(registry: &ConnectionRegistry, wish: &Wish) {
    let json = match serde_json::to_string(wish) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("Failed to serialize wish for broadcast: {}", e);
            return;
        }
    };
    let msg = Message::Text(json.into());

    let snapshot: Vec<(u64, ConnectionSender)> = registry
        .iter()
        .map(|entry| (*entry.key(), entry.value().sender.clone()))
        .collect();

    let mut pruned = 0usize;
    for (id, sender) in snapshot {
        if sender.send(msg.clone()).is_err() {
            unregister(registry, id);
            pruned += 1;
        }
    }

    if pruned > 0 {
        tracing::debug!("Broadcast pruned {} dead connections", pruned);
    }
}

/// Send a close frame to every registered connection (process shutdown).
pub fn close_all(registry: &ConnectionRegistry, code: u16, reason: &str) {
    let close_frame = CloseFrame {
        code,
        reason: reason.to_string().into(),
    };
    for entry in registry.iter() {
        let _ = entry
            .value()
            .sender
            .send(Message::Close(Some(close_frame.clone())));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ws::{new_connection_registry, register};
    use chrono::Utc;
    use tokio::sync::mpsc;

    fn sample_wish() -> Wish {
        Wish {
            author: "Anonymous".to_string(),
            message: "Happy new year!".to_string(),
            region: "Unknown".to_string(),
            submitted_at: Utc::now(),
        }
    }

    #[test]
    fn failed_send_prunes_only_the_dead_connection() {
        let registry = new_connection_registry();

        let mut receivers = Vec::new();
        let mut ids = Vec::new();
        for i in 0..5 {
            let (tx, rx) = mpsc::unbounded_channel();
            ids.push(register(&registry, tx));
            if i == 2 {
                // Connection #3's channel is dead: receiver dropped
                drop(rx);
            } else {
                receivers.push(rx);
            }
        }

        broadcast_wish(&registry, &sample_wish());

        // The four live connections each received the frame
        for rx in &mut receivers {
            let msg = rx.try_recv().expect("live connection should receive");
            assert!(matches!(msg, Message::Text(_)));
        }

        // The dead connection is gone; the rest remain registered
        assert_eq!(registry.len(), 4);
        assert!(!registry.contains_key(&ids[2]));
        for (i, id) in ids.iter().enumerate() {
            if i != 2 {
                assert!(registry.contains_key(id));
            }
        }
    }

    #[test]
    fn broadcast_serializes_wish_as_json() {
        let registry = new_connection_registry();
        let (tx, mut rx) = mpsc::unbounded_channel();
        register(&registry, tx);

        let wish = sample_wish();
        broadcast_wish(&registry, &wish);

        let msg = rx.try_recv().unwrap();
        let Message::Text(text) = msg else {
            panic!("expected text frame");
        };
        let value: serde_json::Value = serde_json::from_str(text.as_str()).unwrap();
        assert_eq!(value["message"], "Happy new year!");
        assert_eq!(value["author"], "Anonymous");
    }

    #[test]
    fn unregister_twice_is_a_no_op() {
        let registry = new_connection_registry();
        let (tx_a, _rx_a) = mpsc::unbounded_channel();
        let (tx_b, _rx_b) = mpsc::unbounded_channel();
        let id_a = register(&registry, tx_a);
        register(&registry, tx_b);

        unregister(&registry, id_a);
        unregister(&registry, id_a);

        assert_eq!(registry.len(), 1);
    }
}
