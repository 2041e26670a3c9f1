use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::Router;
use futures_util::future::join_all;

use crate::handlers::{self, App};
use crate::line::{self, LineClient, WebhookRequest};

pub struct WebhookState {
    pub app: App,
    pub client: LineClient,
    pub channel_secret: String,
}

pub fn router(state: Arc<WebhookState>) -> Router {
    Router::new()
        .route("/webhook", post(webhook))
        .with_state(state)
}

async fn webhook(
    State(state): State<Arc<WebhookState>>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let signature = headers
        .get("x-line-signature")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if !line::verify_signature(&state.channel_secret, &body, signature) {
        log::warn!("rejected webhook delivery with a bad signature");
        return StatusCode::UNAUTHORIZED;
    }

    let request: WebhookRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            log::warn!("could not parse webhook body: {e}");
            return StatusCode::BAD_REQUEST;
        }
    };

    log::debug!("webhook delivery with {} event(s)", request.events.len());

    // Events in a batch are independent, process them concurrently. A
    // failure in one must not cost the others their replies.
    join_all(
        request
            .events
            .into_iter()
            .map(|event| process_event(&state, event)),
    )
    .await;

    StatusCode::OK
}

async fn process_event(state: &WebhookState, event: line::Event) {
    log::debug!("event: {event:?}");

    if let Some((reply_token, message)) = handlers::handle_event(&state.app, event).await {
        if let Err(e) = state.client.reply(&reply_token, &message).await {
            log::error!("could not send reply: {e}");
        }
    }
}
