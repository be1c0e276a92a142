use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures_util::{
    stream::{SplitSink, StreamExt},
    SinkExt,
};

use crate::realtime::broadcaster::Broadcaster;
use crate::realtime::protocol::{ClientMessage, ServerMessage};
use crate::realtime::registry::Interest;
use crate::realtime::ConnectionId;
use crate::state::AppState;

// GET /ws
pub async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.broadcaster.clone()))
}

/// Runs one connection: inbound commands mutate the registry, the fan-out
/// receiver drains onto the socket. Cleanup happens exactly once, whichever
/// way the loop exits.
async fn handle_socket(socket: WebSocket, broadcaster: Arc<Broadcaster>) {
    let (mut sink, mut stream) = socket.split();
    let connection = ConnectionId::new();
    let mut events = broadcaster.connect(connection);

    tracing::info!(%connection, "websocket connected");

    loop {
        tokio::select! {
            frame = stream.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        let reply = match serde_json::from_str::<ClientMessage>(&text) {
                            Ok(command) => apply_command(&broadcaster, connection, command),
                            Err(err) => ServerMessage::Error {
                                message: format!("invalid message: {err}"),
                            },
                        };
                        if send(&mut sink, &reply).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Binary(_))) => {
                        let reply = ServerMessage::Error {
                            message: "binary frames are not supported".to_string(),
                        };
                        if send(&mut sink, &reply).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if sink.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Pong(_))) => {}
                    Some(Ok(Message::Close(_))) | None => {
                        break;
                    }
                    Some(Err(err)) => {
                        tracing::warn!(%connection, "websocket receive error: {err}");
                        break;
                    }
                }
            }

            event = events.recv() => {
                match event {
                    Some(message) => {
                        if send(&mut sink, &message).await.is_err() {
                            break;
                        }
                    }
                    // Sender dropped: the broadcaster no longer knows us.
                    None => break,
                }
            }
        }
    }

    broadcaster.disconnect(connection);
    tracing::info!(%connection, "websocket disconnected");
}

fn apply_command(
    broadcaster: &Broadcaster,
    connection: ConnectionId,
    command: ClientMessage,
) -> ServerMessage {
    match command {
        ClientMessage::Subscribe { match_id } => {
            broadcaster.subscribe(connection, Interest::Match(match_id));
            ServerMessage::Subscribed {
                match_id: Some(match_id),
            }
        }
        ClientMessage::Unsubscribe { match_id } => {
            broadcaster.unsubscribe(connection, Interest::Match(match_id));
            ServerMessage::Unsubscribed {
                match_id: Some(match_id),
            }
        }
        ClientMessage::SubscribeAll => {
            broadcaster.subscribe(connection, Interest::AllMatches);
            ServerMessage::Subscribed { match_id: None }
        }
        ClientMessage::UnsubscribeAll => {
            broadcaster.unsubscribe(connection, Interest::AllMatches);
            ServerMessage::Unsubscribed { match_id: None }
        }
        ClientMessage::Ping => ServerMessage::Pong,
    }
}

async fn send(
    sink: &mut SplitSink<WebSocket, Message>,
    message: &ServerMessage,
) -> std::result::Result<(), axum::Error> {
    match serde_json::to_string(message) {
        Ok(json) => sink.send(Message::Text(json)).await,
        Err(err) => {
            // Leave the connection up; only this message is lost.
            tracing::error!("failed to serialize server message: {err}");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribe_command_registers_interest() {
        let broadcaster = Broadcaster::new();
        let connection = ConnectionId::new();
        let mut rx = broadcaster.connect(connection);

        let reply = apply_command(&broadcaster, connection, ClientMessage::Subscribe { match_id: 7 });
        assert!(matches!(reply, ServerMessage::Subscribed { match_id: Some(7) }));

        let entry: crate::models::commentary::CommentaryEntry =
            serde_json::from_value(serde_json::json!({
                "id": 1, "matchId": 7, "minute": 5, "sequence": null, "period": null,
                "eventType": null, "actor": null, "team": null, "message": null,
                "metadata": null, "tags": null, "createdAt": "2025-01-01T10:05:00Z",
            }))
            .unwrap();
        broadcaster.publish_commentary(7, &entry);
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn ping_gets_pong() {
        let broadcaster = Broadcaster::new();
        let connection = ConnectionId::new();
        let reply = apply_command(&broadcaster, connection, ClientMessage::Ping);
        assert!(matches!(reply, ServerMessage::Pong));
    }
}
