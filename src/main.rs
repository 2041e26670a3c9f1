mod activity;
mod handlers;
mod line;
mod menus;
mod messages;
mod store;
mod webhook;

use std::sync::Arc;

use handlers::App;
use line::LineClient;
use webhook::WebhookState;

#[tokio::main]
async fn main() {
    env_logger::init();
    log::info!("Starting bot...");

    let access_token =
        std::env::var("LINE_CHANNEL_ACCESS_TOKEN").expect("LINE_CHANNEL_ACCESS_TOKEN must be set");
    let channel_secret =
        std::env::var("LINE_CHANNEL_SECRET").expect("LINE_CHANNEL_SECRET must be set");
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|port| port.parse().ok())
        .unwrap_or(3000);

    let client = LineClient::new(access_token).expect("could not build the API client");
    let app = App::new(Box::new(client.clone()));
    let state = Arc::new(WebhookState {
        app,
        client,
        channel_secret,
    });

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .expect("could not bind the webhook port");
    log::info!("Bot running on port {port}");

    axum::serve(listener, webhook::router(state))
        .await
        .expect("server error");
}
