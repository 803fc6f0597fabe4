//! REST gateway for the chat engine.
//!
//! `POST /rest/v1/messages` publishes on behalf of an existing user;
//! `GET /rest/v1/messages` returns the history, optionally filtered by
//! `userId` and/or `roomId` query parameters.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::chat::{ChatService, Message, PublishInput};

/// POST body: the caller names an existing user and room.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMessage {
    #[serde(default)]
    pub user_id: usize,
    #[serde(default)]
    pub room_id: usize,
    #[serde(default)]
    pub text: String,
}

/// Optional history filters; both absent means the full history.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageFilter {
    pub user_id: Option<usize>,
    pub room_id: Option<usize>,
}

/// JSON error body, mirroring the HTTP status.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    status_code: u16,
    message: String,
}

struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            status_code: self.status.as_u16(),
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Build the gateway router.
pub fn router(service: Arc<ChatService>) -> Router {
    Router::new()
        .route("/rest/v1/messages", get(get_messages).post(post_message))
        .with_state(service)
}

async fn post_message(
    State(service): State<Arc<ChatService>>,
    Json(body): Json<PostMessage>,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    if body.user_id == 0 || body.text.is_empty() {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "UserId or Text is empty",
        ));
    }
    if service.get_user(body.user_id).await.is_none() {
        return Err(ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "User not found",
        ));
    }
    if body.room_id != 0 && service.get_room(body.room_id).await.is_none() {
        return Err(ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Room not found",
        ));
    }

    let input = PublishInput {
        room: body.room_id,
        text: body.text,
    };
    let message = service
        .publish(input, body.user_id, false)
        .await
        .map_err(|e| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok((StatusCode::CREATED, Json(message)))
}

async fn get_messages(
    State(service): State<Arc<ChatService>>,
    Query(filter): Query<MessageFilter>,
) -> Json<Vec<Message>> {
    Json(filter_messages(service.get_messages().await, &filter))
}

/// Three-way filter: userId-only, roomId-only, or both; no filters returns
/// everything.
fn filter_messages(messages: Vec<Message>, filter: &MessageFilter) -> Vec<Message> {
    match (filter.user_id, filter.room_id) {
        (None, None) => messages,
        (Some(user_id), None) => messages
            .into_iter()
            .filter(|m| m.user_id == user_id)
            .collect(),
        (None, Some(room_id)) => messages
            .into_iter()
            .filter(|m| m.room_id == room_id)
            .collect(),
        (Some(user_id), Some(room_id)) => messages
            .into_iter()
            .filter(|m| m.user_id == user_id && m.room_id == room_id)
            .collect(),
    }
}

/// Run the REST gateway.
///
/// Binds to `0.0.0.0:port`. This is a long-running task that should be
/// spawned in the background.
pub async fn run_http_server(port: u16, service: Arc<ChatService>) {
    let app = router(service);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind HTTP server on {}: {}", addr, e);
            return;
        }
    };
    info!("REST gateway listening on {}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        error!("HTTP server error: {}", e);
    }
}
