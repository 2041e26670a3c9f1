use chrono::Utc;

use crate::activity::{resolve_command, Action, ActivityKind};
use crate::line::{Event, MessageContent, OutgoingMessage, PostbackData, ProfileSource};
use crate::store::{ConversationState, RegisteredUser, StateStore, UserStore};
use crate::{menus, messages};

/// Shared bot state handed to every handler.
pub struct App {
    pub users: UserStore,
    pub states: StateStore,
    pub profiles: Box<dyn ProfileSource>,
}

impl App {
    pub fn new(profiles: Box<dyn ProfileSource>) -> Self {
        Self {
            users: UserStore::default(),
            states: StateStore::default(),
            profiles,
        }
    }
}

/// Routes one inbound event to its handler. Returns the reply token and the
/// reply, if the event warrants one.
pub async fn handle_event(app: &App, event: Event) -> Option<(String, OutgoingMessage)> {
    match event {
        Event::Message {
            reply_token,
            source,
            message: MessageContent::Text { text },
        } => {
            let user_id = source.user_id?;
            let reply = handle_text(app, &user_id, &text).await?;
            Some((reply_token, reply))
        }
        Event::Postback {
            reply_token,
            source,
            postback,
        } => {
            let user_id = source.user_id?;
            let reply = handle_postback(app, &user_id, &postback.data).await?;
            Some((reply_token, reply))
        }
        _ => None,
    }
}

pub async fn handle_text(app: &App, user_id: &str, raw_text: &str) -> Option<OutgoingMessage> {
    let text = raw_text.trim();

    if text.starts_with('/') {
        return handle_command(app, user_id, text).await;
    }

    let lower = text.to_lowercase();
    if matches!(lower.as_str(), "menu" | "start" | "help") {
        return handle_command(app, user_id, &format!("/{lower}")).await;
    }

    match app.states.get(user_id).await {
        ConversationState::AwaitingName => Some(handle_name_input(app, user_id, text).await),
        ConversationState::AwaitingClass { name } => {
            Some(handle_class_input(app, user_id, &name, text).await)
        }
        ConversationState::AwaitingQuantity { kind } => {
            if !app.users.is_registered(user_id).await {
                // should not happen, states are only set for registered users
                return Some(menus::registration_menu());
            }
            Some(handle_quantity_input(app, user_id, kind, text).await)
        }
        ConversationState::Idle => {
            if lower.contains("help") || lower.contains("bot") {
                Some(OutgoingMessage::text(messages::usage_hint()))
            } else {
                None
            }
        }
    }
}

async fn handle_command(app: &App, user_id: &str, text: &str) -> Option<OutgoingMessage> {
    let token = text.split_whitespace().next()?;
    let command = token.to_lowercase();
    let rest = text[token.len()..].trim();

    let Some(action) = resolve_command(&command) else {
        return Some(OutgoingMessage::text(messages::unknown_command()));
    };

    let registered = app.users.is_registered(user_id).await;

    match action {
        // Registration is the one command open to everyone.
        Action::Register => Some(quick_registration(app, user_id, rest).await),
        _ if !registered => Some(menus::registration_menu()),
        Action::Menu => Some(menus::main_menu()),
        Action::Leaderboard => Some(OutgoingMessage::text(messages::leaderboard_placeholder())),
        Action::Activity(kind) => {
            let value = rest
                .split_whitespace()
                .next()
                .and_then(|arg| arg.parse::<f64>().ok())
                .filter(|v| v.is_finite() && *v > 0.0);

            match value {
                Some(value) => Some(log_activity(app, user_id, kind, value).await),
                None => Some(OutgoingMessage::text(messages::missing_quantity(
                    kind, &command,
                ))),
            }
        }
    }
}

pub async fn handle_postback(app: &App, user_id: &str, data: &str) -> Option<OutgoingMessage> {
    let data = PostbackData::parse(data);

    if data.action.as_deref() == Some("start_registration") {
        app.states.set(user_id, ConversationState::AwaitingName).await;
        return Some(OutgoingMessage::text(messages::registration_step1()));
    }

    if !app.users.is_registered(user_id).await {
        return Some(menus::registration_menu());
    }

    match data.action.as_deref() {
        Some("record") => return Some(menus::activity_menu_page1()),
        Some("activities_page2") => return Some(menus::activity_menu_page2()),
        _ => {}
    }

    if let Some(kind) = data
        .activity
        .as_deref()
        .and_then(|name| name.parse::<ActivityKind>().ok())
    {
        app.states
            .set(user_id, ConversationState::AwaitingQuantity { kind })
            .await;
        return Some(OutgoingMessage::text(messages::activity_selected(kind)));
    }

    match data.action.as_deref() {
        Some("leaderboard") => Some(OutgoingMessage::text(messages::leaderboard_placeholder())),
        Some("photo") => Some(OutgoingMessage::text(messages::photo_placeholder())),
        _ => None,
    }
}

/// `/register` with no arguments starts the guided flow; `/register Name,
/// Class` registers in one step.
async fn quick_registration(app: &App, user_id: &str, rest: &str) -> OutgoingMessage {
    if rest.is_empty() {
        app.states.set(user_id, ConversationState::AwaitingName).await;
        return OutgoingMessage::text(messages::registration_step1());
    }

    let parts: Vec<&str> = rest.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [name, class] if !name.is_empty() && !class.is_empty() => {
            complete_registration(app, user_id, name, class).await
        }
        _ => OutgoingMessage::text(messages::invalid_registration_format()),
    }
}

async fn handle_name_input(app: &App, user_id: &str, name: &str) -> OutgoingMessage {
    if name.chars().count() < 2 {
        // keep the state, let the user retry
        return OutgoingMessage::text(messages::invalid_name());
    }

    app.states
        .set(
            user_id,
            ConversationState::AwaitingClass {
                name: name.to_owned(),
            },
        )
        .await;
    OutgoingMessage::text(messages::registration_step2(name))
}

async fn handle_class_input(app: &App, user_id: &str, name: &str, class: &str) -> OutgoingMessage {
    if class.chars().count() < 4 {
        return OutgoingMessage::text(messages::invalid_class());
    }

    complete_registration(app, user_id, name, class).await
}

async fn complete_registration(
    app: &App,
    user_id: &str,
    name: &str,
    class: &str,
) -> OutgoingMessage {
    // Best effort: a failed profile lookup must not block registration.
    let display_name = match app.profiles.display_name(user_id).await {
        Ok(display_name) => display_name,
        Err(e) => {
            log::warn!("could not fetch profile for {user_id}: {e}");
            "Unknown".to_owned()
        }
    };

    app.users
        .insert(
            user_id,
            RegisteredUser {
                name: name.to_owned(),
                class: class.to_owned(),
                display_name,
                registered_at: Utc::now(),
            },
        )
        .await;
    app.states.clear(user_id).await;

    OutgoingMessage::text(messages::registration_complete(name, class))
}

async fn handle_quantity_input(
    app: &App,
    user_id: &str,
    kind: ActivityKind,
    text: &str,
) -> OutgoingMessage {
    // one bad value aborts the flow, valid or not the state is consumed
    app.states.clear(user_id).await;

    let value = text
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0);

    match value {
        Some(value) => log_activity(app, user_id, kind, value).await,
        None => OutgoingMessage::text(messages::invalid_quantity()),
    }
}

/// Activity Logger: converts the raw quantity, emits the audit record and
/// builds the confirmation. Callers have already validated the quantity.
async fn log_activity(app: &App, user_id: &str, kind: ActivityKind, value: f64) -> OutgoingMessage {
    let Some(user) = app.users.get(user_id).await else {
        return menus::registration_menu();
    };

    let equivalent = kind.running_equivalent(value);

    log::info!(
        "activity logged: {}",
        serde_json::json!({
            "userId": user_id,
            "name": user.name,
            "class": user.class,
            "displayName": user.display_name,
            "activityType": kind.to_string(),
            "value": value,
            "equivalent": equivalent,
            "timestamp": Utc::now().to_rfc3339(),
        })
    );

    OutgoingMessage::text(messages::activity_logged(&user, kind, value, equivalent))
}
