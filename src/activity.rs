use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("unknown activity kind")]
pub struct UnknownActivity(());

/// The activity kinds members can log. `Strength` and `Cardio` are reported
/// in calories, everything else in kilometers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityKind {
    Running,
    Cycling,
    Swimming,
    Rowing,
    Strength,
    Cardio,
}

impl ActivityKind {
    /// Multiplier that turns a raw quantity into a running-equivalent
    /// distance in km.
    pub fn conversion_rate(self) -> f64 {
        match self {
            ActivityKind::Running => 1.0,
            ActivityKind::Cycling => 0.3,
            ActivityKind::Swimming => 4.0,
            ActivityKind::Rowing => 0.3,
            ActivityKind::Strength => 0.0083,
            ActivityKind::Cardio => 0.005,
        }
    }

    pub fn is_calorie_based(self) -> bool {
        matches!(self, ActivityKind::Strength | ActivityKind::Cardio)
    }

    /// Label of the raw input unit, for prompts and confirmations.
    pub fn unit(self) -> &'static str {
        if self.is_calorie_based() {
            "calories"
        } else {
            "km"
        }
    }

    /// Example quantity shown in usage hints.
    pub fn example_value(self) -> &'static str {
        if self.is_calorie_based() {
            "350"
        } else {
            "5.2"
        }
    }

    /// Running-equivalent distance in km, rounded to two decimals.
    pub fn running_equivalent(self, quantity: f64) -> f64 {
        (quantity * self.conversion_rate() * 100.0).round() / 100.0
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActivityKind::Running => "running",
            ActivityKind::Cycling => "cycling",
            ActivityKind::Swimming => "swimming",
            ActivityKind::Rowing => "rowing",
            ActivityKind::Strength => "strength",
            ActivityKind::Cardio => "cardio",
        };
        f.write_str(name)
    }
}

impl FromStr for ActivityKind {
    type Err = UnknownActivity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(ActivityKind::Running),
            "cycling" => Ok(ActivityKind::Cycling),
            "swimming" => Ok(ActivityKind::Swimming),
            "rowing" => Ok(ActivityKind::Rowing),
            "strength" => Ok(ActivityKind::Strength),
            "cardio" => Ok(ActivityKind::Cardio),
            _ => Err(UnknownActivity(())),
        }
    }
}

/// What a recognized slash command resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Activity(ActivityKind),
    Menu,
    Leaderboard,
    Register,
}

lazy_static! {
    static ref COMMAND_ALIASES: HashMap<&'static str, Action> = {
        use ActivityKind::*;
        let mut m = HashMap::new();
        m.insert("/run", Action::Activity(Running));
        m.insert("/running", Action::Activity(Running));
        m.insert("/bike", Action::Activity(Cycling));
        m.insert("/cycling", Action::Activity(Cycling));
        m.insert("/cycle", Action::Activity(Cycling));
        m.insert("/swim", Action::Activity(Swimming));
        m.insert("/swimming", Action::Activity(Swimming));
        m.insert("/row", Action::Activity(Rowing));
        m.insert("/rowing", Action::Activity(Rowing));
        m.insert("/strength", Action::Activity(Strength));
        m.insert("/gym", Action::Activity(Strength));
        m.insert("/weights", Action::Activity(Strength));
        m.insert("/cardio", Action::Activity(Cardio));
        m.insert("/menu", Action::Menu);
        m.insert("/start", Action::Menu);
        m.insert("/help", Action::Menu);
        m.insert("/leaderboard", Action::Leaderboard);
        m.insert("/board", Action::Leaderboard);
        m.insert("/register", Action::Register);
        m
    };
}

/// Resolves a lowercased command token (leading `/` included) to its action.
pub fn resolve_command(command: &str) -> Option<Action> {
    COMMAND_ALIASES.get(command).copied()
}
