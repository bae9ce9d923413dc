use crate::auth::AuthenticatedUser;
use crate::state::AppState;
use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures::{SinkExt, stream::StreamExt};
use tokio::sync::broadcast::error::RecvError;
use types::ids::UserId;

/// Upgrade to a feed of the caller's new matches
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state, user.user_id))
}

async fn handle_socket(socket: WebSocket, state: AppState, user_id: UserId) {
    // Subscribe before anything else so no match created from here on is missed.
    let mut events = state.match_events.subscribe();
    let (mut sender, mut receiver) = socket.split();
    tracing::debug!(user_id = %user_id, "Match feed connected");

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) if event.involves(user_id) => {
                    let payload = match serde_json::to_string(&event) {
                        Ok(payload) => payload,
                        Err(err) => {
                            tracing::error!(error = %err, "Failed to encode match event");
                            continue;
                        }
                    };
                    if sender.send(Message::Text(payload.into())).await.is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(user_id = %user_id, skipped, "Match feed lagged");
                }
                Err(RecvError::Closed) => break,
            },
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                Some(Ok(_)) => {}
            },
        }
    }

    tracing::debug!(user_id = %user_id, "Match feed disconnected");
}
