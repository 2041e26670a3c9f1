use std::time::Duration;

use base64::prelude::*;
use futures_core::future::BoxFuture;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

const API_BASE: &str = "https://api.line.me";

#[derive(Debug, Error)]
pub enum Error {
    #[error("messaging API request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("messaging API returned status {0}")]
    Status(reqwest::StatusCode),
}

/// One webhook delivery: an ordered batch of independent events.
#[derive(Debug, Deserialize)]
pub struct WebhookRequest {
    #[serde(default)]
    pub events: Vec<Event>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    Message {
        #[serde(rename = "replyToken")]
        reply_token: String,
        source: Source,
        message: MessageContent,
    },
    Postback {
        #[serde(rename = "replyToken")]
        reply_token: String,
        source: Source,
        postback: Postback,
    },
    /// Follows, joins, unsends and so on. The bot ignores them.
    #[serde(other)]
    Other,
}

#[derive(Debug, Default, Deserialize)]
pub struct Source {
    /// Absent for some group and room events.
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    Text { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
pub struct Postback {
    pub data: String,
}

/// Flat `key=value` pairs from a button's postback data string,
/// e.g. `action=record` or `activity=rowing`.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PostbackData {
    pub action: Option<String>,
    pub activity: Option<String>,
}

impl PostbackData {
    pub fn parse(data: &str) -> Self {
        let mut parsed = Self::default();
        for pair in data.split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            match key {
                "action" => parsed.action = Some(value.to_owned()),
                "activity" => parsed.activity = Some(value.to_owned()),
                _ => {}
            }
        }
        parsed
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutgoingMessage {
    Text {
        text: String,
    },
    Template {
        #[serde(rename = "altText")]
        alt_text: String,
        template: Template,
    },
}

impl OutgoingMessage {
    pub fn text(text: impl Into<String>) -> Self {
        OutgoingMessage::Text { text: text.into() }
    }

    pub fn buttons(
        alt_text: impl Into<String>,
        text: impl Into<String>,
        actions: Vec<TemplateAction>,
    ) -> Self {
        OutgoingMessage::Template {
            alt_text: alt_text.into(),
            template: Template::Buttons {
                text: text.into(),
                actions,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Template {
    Buttons {
        text: String,
        actions: Vec<TemplateAction>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TemplateAction {
    Postback { label: String, data: String },
}

impl TemplateAction {
    pub fn postback(label: impl Into<String>, data: impl Into<String>) -> Self {
        TemplateAction::Postback {
            label: label.into(),
            data: data.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Profile {
    #[serde(rename = "displayName")]
    pub display_name: String,
}

/// Checks the platform signature header: base64(HMAC-SHA256(secret, body)).
pub fn verify_signature(channel_secret: &str, body: &[u8], signature: &str) -> bool {
    let Ok(signature) = BASE64_STANDARD.decode(signature) else {
        return false;
    };

    let mut mac = Hmac::<Sha256>::new_from_slice(channel_secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(body);
    mac.verify_slice(&signature).is_ok()
}

/// Best-effort source of a user's platform display name. Implemented by the
/// real API client; tests substitute a stub.
pub trait ProfileSource: Send + Sync {
    fn display_name<'a>(&'a self, user_id: &'a str) -> BoxFuture<'a, Result<String, Error>>;
}

#[derive(Clone)]
pub struct LineClient {
    http: reqwest::Client,
    access_token: String,
}

impl LineClient {
    pub fn new(access_token: String) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { http, access_token })
    }

    /// Sends one message for the given reply token.
    pub async fn reply(&self, reply_token: &str, message: &OutgoingMessage) -> Result<(), Error> {
        let body = serde_json::json!({
            "replyToken": reply_token,
            "messages": [message],
        });

        let response = self
            .http
            .post(format!("{API_BASE}/v2/bot/message/reply"))
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Status(response.status()));
        }
        Ok(())
    }

    pub async fn profile(&self, user_id: &str) -> Result<Profile, Error> {
        let response = self
            .http
            .get(format!("{API_BASE}/v2/bot/profile/{user_id}"))
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Status(response.status()));
        }
        Ok(response.json().await?)
    }
}

impl ProfileSource for LineClient {
    fn display_name<'a>(&'a self, user_id: &'a str) -> BoxFuture<'a, Result<String, Error>> {
        Box::pin(async move { Ok(self.profile(user_id).await?.display_name) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_text_message_event() {
        let json = r#"{
            "events": [{
                "type": "message",
                "replyToken": "r-123",
                "source": {"type": "user", "userId": "U-abc"},
                "message": {"id": "1", "type": "text", "text": "/run 5.2"}
            }]
        }"#;
        let request: WebhookRequest = serde_json::from_str(json).unwrap();
        match &request.events[0] {
            Event::Message {
                reply_token,
                source,
                message: MessageContent::Text { text },
            } => {
                assert_eq!(reply_token, "r-123");
                assert_eq!(source.user_id.as_deref(), Some("U-abc"));
                assert_eq!(text, "/run 5.2");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn parses_postback_and_unknown_events() {
        let json = r#"{
            "events": [
                {
                    "type": "postback",
                    "replyToken": "r-1",
                    "source": {"userId": "U-abc"},
                    "postback": {"data": "activity=rowing"}
                },
                {"type": "follow", "replyToken": "r-2", "source": {"userId": "U-abc"}}
            ]
        }"#;
        let request: WebhookRequest = serde_json::from_str(json).unwrap();
        assert!(matches!(
            &request.events[0],
            Event::Postback { postback, .. } if postback.data == "activity=rowing"
        ));
        assert!(matches!(request.events[1], Event::Other));
    }

    #[test]
    fn non_text_messages_are_preserved_as_other_content() {
        let json = r#"{
            "type": "message",
            "replyToken": "r-1",
            "source": {"userId": "U-abc"},
            "message": {"id": "5", "type": "sticker"}
        }"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert!(matches!(
            event,
            Event::Message {
                message: MessageContent::Other,
                ..
            }
        ));
    }

    #[test]
    fn postback_data_parsing() {
        assert_eq!(
            PostbackData::parse("action=record"),
            PostbackData {
                action: Some("record".into()),
                activity: None,
            }
        );
        assert_eq!(
            PostbackData::parse("activity=rowing&action=record"),
            PostbackData {
                action: Some("record".into()),
                activity: Some("rowing".into()),
            }
        );
        assert_eq!(PostbackData::parse("garbage"), PostbackData::default());
        assert_eq!(
            PostbackData::parse("color=red"),
            PostbackData::default(),
            "unrecognized keys are ignored"
        );
    }

    #[test]
    fn signature_verification_accepts_only_the_matching_body() {
        let secret = "channel-secret";
        let body = br#"{"events":[]}"#;

        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(body);
        let signature = BASE64_STANDARD.encode(mac.finalize().into_bytes());

        assert!(verify_signature(secret, body, &signature));
        assert!(!verify_signature(secret, b"tampered", &signature));
        assert!(!verify_signature("other-secret", body, &signature));
        assert!(!verify_signature(secret, body, "not base64 !!!"));
    }

    #[test]
    fn template_message_serializes_to_the_platform_shape() {
        let menu = OutgoingMessage::buttons(
            "Please Register",
            "Welcome! Please register first:",
            vec![TemplateAction::postback(
                "Register Now",
                "action=start_registration",
            )],
        );

        let value = serde_json::to_value(&menu).unwrap();
        assert_eq!(value["type"], "template");
        assert_eq!(value["altText"], "Please Register");
        assert_eq!(value["template"]["type"], "buttons");
        assert_eq!(
            value["template"]["actions"][0],
            serde_json::json!({
                "type": "postback",
                "label": "Register Now",
                "data": "action=start_registration"
            })
        );
    }
}
