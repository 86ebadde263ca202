use std::net::SocketAddr;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        ConnectInfo, State,
    },
    response::IntoResponse,
};
use futures::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::sync::{broadcast::error::RecvError, Mutex};

use crate::{
    events::Event,
    model::{
        message::{Ack, ClientMessage, ServerMessage},
        presence::ConnectionId,
    },
    service::presence::PresenceService,
    AppState,
};

pub async fn presence(
    ws: WebSocketUpgrade,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_presence_socket(socket, addr, state))
}

async fn handle_presence_socket(socket: WebSocket, addr: SocketAddr, state: AppState) {
    let connection_id = ConnectionId::new();
    let (mut socket_tx, mut socket_rx) = socket.split();
    let (mut event_receiver, snapshot) = state.presence.lock().await.attach_viewer();
    tracing::info!("New client connected: {connection_id} ({addr})");

    if let Err(e) = send_message(&mut socket_tx, &ServerMessage::RosterUpdate(snapshot)).await {
        tracing::error!("Error sending message to {addr}: {e}");
        return;
    }

    loop {
        tokio::select! {
            event = event_receiver.recv() => match event {
                Ok(Event::RosterUpdate(snapshot)) => {
                    if let Err(e) = send_message(&mut socket_tx, &ServerMessage::RosterUpdate(snapshot)).await {
                        tracing::error!("Error sending message to {addr}: {e}");
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    // the next snapshot is complete, so skipping is enough to catch up
                    tracing::warn!("{connection_id} lagged behind by {skipped} roster updates");
                }
                Err(RecvError::Closed) => break,
            },
            msg = socket_rx.next() => match msg {
                Some(Ok(Message::Text(text))) => {
                    let reply = handle_text(&state.presence, connection_id, &text).await;
                    if let Err(e) = send_message(&mut socket_tx, &reply).await {
                        tracing::error!("Error sending message to {addr}: {e}");
                        break;
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => (),
                Some(Err(e)) => {
                    tracing::debug!("Error receiving messages from {addr}: {e}");
                    break;
                }
            },
        }
    }

    state.presence.lock().await.handle_disconnect(connection_id);
    tracing::info!("Client disconnected: {connection_id} ({addr})");
}

async fn send_message(
    socket_tx: &mut SplitSink<WebSocket, Message>,
    message: &ServerMessage,
) -> Result<(), axum::Error> {
    let text = serde_json::to_string(message).map_err(axum::Error::new)?;
    socket_tx.send(Message::Text(text)).await
}

async fn handle_text(
    presence: &Mutex<PresenceService>,
    connection_id: ConnectionId,
    text: &str,
) -> ServerMessage {
    match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => dispatch(presence, connection_id, message).await,
        Err(e) => {
            tracing::debug!("Unreadable frame from {connection_id}: {e}");
            ServerMessage::Error {
                message: e.to_string(),
            }
        }
    }
}

async fn dispatch(
    presence: &Mutex<PresenceService>,
    connection_id: ConnectionId,
    message: ClientMessage,
) -> ServerMessage {
    let request = message.request();
    let mut presence = presence.lock().await;
    let result = match message {
        ClientMessage::Login(payload) => presence
            .login(
                connection_id,
                &payload.identity,
                &payload.credential,
                payload.display_name.as_deref(),
            )
            .map(|identity| Ack::success("Logged in successfully").with_identity(identity)),
        ClientMessage::UpdateStatus(payload) => presence
            .update_status(connection_id, &payload.status)
            .map(|_| Ack::success("Status updated")),
        ClientMessage::UpdateDisplayName(payload) => presence
            .update_display_name(connection_id, &payload.display_name)
            .map(|_| Ack::success("Display name updated")),
        ClientMessage::Logout => {
            presence.logout(connection_id);
            Ok(Ack::success("Logged out"))
        }
    };
    let result = result.unwrap_or_else(|e| {
        tracing::debug!("{request:?} from {connection_id} failed: {e}");
        Ack::from(e)
    });
    ServerMessage::Ack { request, result }
}
