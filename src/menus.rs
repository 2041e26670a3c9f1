//! Buttons-template menus. Postback data strings here must stay in sync
//! with what the postback handler recognizes.

use crate::line::{OutgoingMessage, TemplateAction};

pub fn main_menu() -> OutgoingMessage {
    OutgoingMessage::buttons(
        "Running Group Menu",
        "What would you like to do?",
        vec![
            TemplateAction::postback("📊 Record Activity", "action=record"),
            TemplateAction::postback("🏆 View Leaderboard", "action=leaderboard"),
            TemplateAction::postback("📸 Share Photo", "action=photo"),
        ],
    )
}

/// Shown to anyone who tries to use the bot before registering.
pub fn registration_menu() -> OutgoingMessage {
    OutgoingMessage::buttons(
        "Please Register",
        "👋 Welcome! Please register first:",
        vec![TemplateAction::postback(
            "📝 Register Now",
            "action=start_registration",
        )],
    )
}

pub fn activity_menu_page1() -> OutgoingMessage {
    OutgoingMessage::buttons(
        "Select Activity Type",
        "What type of activity?",
        vec![
            TemplateAction::postback("🏃 Running", "activity=running"),
            TemplateAction::postback("🚴 Cycling", "activity=cycling"),
            TemplateAction::postback("🏊 Swimming", "activity=swimming"),
            TemplateAction::postback("➡️ More Activities...", "action=activities_page2"),
        ],
    )
}

pub fn activity_menu_page2() -> OutgoingMessage {
    OutgoingMessage::buttons(
        "Select Activity Type",
        "More activity types:",
        vec![
            TemplateAction::postback("🚣 Rowing", "activity=rowing"),
            TemplateAction::postback("💪 Strength Training", "activity=strength"),
            TemplateAction::postback("🏋️ Cardio", "activity=cardio"),
            TemplateAction::postback("⬅️ Back", "action=record"),
        ],
    )
}
