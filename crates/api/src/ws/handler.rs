use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::state::AppState;
use crate::ws::manager::WsManager;
use crate::ws::protocol::{handle_command, CommandReply};

/// GET /api/v1/ws
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.ws_manager))
}

/// Drive one upgraded connection until either side gives up.
///
/// Outbound frames (events, command replies, pings) flow through the
/// manager's channel; inbound text frames are subscription commands.
async fn handle_socket(socket: WebSocket, ws_manager: Arc<WsManager>) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    let rx = ws_manager.add(conn_id.clone()).await;
    tracing::info!(%conn_id, "WebSocket connected");

    let (sink, stream) = socket.split();
    let mut outbound = tokio::spawn(forward_outbound(rx, sink));
    let mut inbound = tokio::spawn(read_commands(
        stream,
        Arc::clone(&ws_manager),
        conn_id.clone(),
    ));

    tokio::select! {
        _ = &mut outbound => inbound.abort(),
        _ = &mut inbound => outbound.abort(),
    }

    let topics = ws_manager.topics_of(&conn_id).await.len();
    ws_manager.remove(&conn_id).await;
    tracing::info!(%conn_id, topics, "WebSocket disconnected");
}

async fn forward_outbound(
    mut rx: UnboundedReceiver<Message>,
    mut sink: SplitSink<WebSocket, Message>,
) {
    while let Some(message) = rx.recv().await {
        let closing = matches!(message, Message::Close(_));
        if sink.send(message).await.is_err() || closing {
            break;
        }
    }
}

async fn read_commands(
    mut stream: SplitStream<WebSocket>,
    ws_manager: Arc<WsManager>,
    conn_id: String,
) {
    while let Some(frame) = stream.next().await {
        let reply = match frame {
            Ok(Message::Text(text)) => handle_command(&ws_manager, &conn_id, text.as_str()).await,
            Ok(Message::Binary(_)) => CommandReply::Error {
                message: "binary frames are not supported".to_string(),
            },
            Ok(Message::Close(_)) => break,
            Ok(Message::Ping(_) | Message::Pong(_)) => continue,
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "WebSocket receive error");
                break;
            }
        };
        ws_manager.send_to(&conn_id, reply.to_message()).await;
    }
}
