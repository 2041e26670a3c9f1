//! Every user-visible reply text in one place.

use crate::activity::ActivityKind;
use crate::store::RegisteredUser;

/// Raw quantities render the way users typed them: `7` not `7.00`.
fn quantity(value: f64) -> String {
    format!("{value}")
}

pub fn unknown_command() -> String {
    "❌ Unknown command.\n\nTry: /run 5.2 or type \"menu\"".to_owned()
}

pub fn usage_hint() -> String {
    "👋 Hi! Type \"menu\" to get started!\n\nQuick commands:\n/register Name, Class\n/run 5.2"
        .to_owned()
}

pub fn missing_quantity(kind: ActivityKind, command: &str) -> String {
    format!(
        "Include {}.\n\nExample: {} {}",
        kind.unit(),
        command,
        kind.example_value()
    )
}

pub fn registration_step1() -> String {
    "📝 Registration - Step 1 of 2\n\nWhat is your name?".to_owned()
}

pub fn registration_step2(name: &str) -> String {
    format!("📝 Registration - Step 2 of 2\n\nHi {name}!\n\nWhat is your class/year?\n(e.g., Class of 2020)")
}

pub fn invalid_name() -> String {
    "❌ Please enter a valid name (at least 2 characters)".to_owned()
}

pub fn invalid_class() -> String {
    "❌ Please enter your class/year (e.g., Class of 2020)".to_owned()
}

pub fn invalid_registration_format() -> String {
    "❌ Invalid format.\n\nUse:\n/register YourName, ClassYear\n\nOr just type /register for step-by-step"
        .to_owned()
}

pub fn registration_complete(name: &str, class: &str) -> String {
    format!(
        "✅ Welcome {name}!\n\nClass: {class}\n\nRegistration complete! 🎉\n\nType \"menu\" to get started!"
    )
}

pub fn activity_selected(kind: ActivityKind) -> String {
    format!(
        "{kind} selected!\n\nEnter {} (e.g., {})",
        kind.unit(),
        kind.example_value()
    )
}

pub fn invalid_quantity() -> String {
    "❌ Invalid number. Try again.".to_owned()
}

pub fn activity_logged(
    user: &RegisteredUser,
    kind: ActivityKind,
    value: f64,
    equivalent: f64,
) -> String {
    let (label, unit) = if kind.is_calorie_based() {
        ("Calories", "cal")
    } else {
        ("Distance", "km")
    };

    format!(
        "✅ Activity logged!\n\nUser: {}\nActivity: {kind}\n{label}: {} {unit}\nRunning equivalent: {equivalent:.2} km",
        user.name,
        quantity(value),
    )
}

pub fn leaderboard_placeholder() -> String {
    "🏆 Leaderboard\n\n(Coming soon!)".to_owned()
}

pub fn photo_placeholder() -> String {
    "📸 Photo Upload\n\n(Coming soon!)".to_owned()
}
