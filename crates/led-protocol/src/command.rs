//! The closed command set.
//!
//! Commands are a tagged variant dispatched by match; the queue and worker
//! never inspect parameter payloads.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::payload::LayoutPayload;

/// Command priority. Higher values overtake lower ones at the queue head
/// and may preempt a running animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Low = 0,
    Medium = 1,
    High = 2,
}

impl Priority {
    /// All priorities, highest first (queue pop order).
    pub const DESCENDING: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];
}

/// Static symbol scenes. The set is closed; aliases kept from the original
/// producers are accepted on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symbol {
    #[serde(alias = "w")]
    #[serde(alias = "wifi_connected")]
    Wifi,
    WifiError,
    #[serde(alias = "t")]
    #[serde(alias = "tunnel_active")]
    Tunnel,
    #[serde(alias = "d")]
    #[serde(alias = "discord_active")]
    Discord,
    #[serde(alias = "checkmark")]
    Check,
    #[serde(alias = "x")]
    Error,
    Hourglass,
    Dot,
    AllOn,
    Connected,
}

impl Symbol {
    /// Every symbol, in the order the self-test shows them.
    pub const ALL: [Symbol; 10] = [
        Symbol::Wifi,
        Symbol::WifiError,
        Symbol::Tunnel,
        Symbol::Discord,
        Symbol::Check,
        Symbol::Error,
        Symbol::Hourglass,
        Symbol::Dot,
        Symbol::AllOn,
        Symbol::Connected,
    ];

    /// Canonical wire name.
    pub fn name(self) -> &'static str {
        match self {
            Symbol::Wifi => "wifi",
            Symbol::WifiError => "wifi_error",
            Symbol::Tunnel => "tunnel",
            Symbol::Discord => "discord",
            Symbol::Check => "check",
            Symbol::Error => "error",
            Symbol::Hourglass => "hourglass",
            Symbol::Dot => "dot",
            Symbol::AllOn => "all_on",
            Symbol::Connected => "connected",
        }
    }

    /// How long the coordinator keeps the symbol on the panel before it
    /// dispatches the next command.
    pub fn default_duration(self) -> Duration {
        match self {
            Symbol::Connected => Duration::from_secs(3),
            _ => Duration::from_secs(2),
        }
    }
}

/// Animated scenes. `Boot` is finite; the rest loop until stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Animation {
    Boot,
    WifiSearching,
    Activity,
    Idle,
}

impl Animation {
    /// Every animation, in the order the self-test shows them.
    pub const ALL: [Animation; 4] = [
        Animation::Boot,
        Animation::WifiSearching,
        Animation::Activity,
        Animation::Idle,
    ];

    /// Canonical wire name.
    pub fn name(self) -> &'static str {
        match self {
            Animation::Boot => "boot",
            Animation::WifiSearching => "wifi_searching",
            Animation::Activity => "activity",
            Animation::Idle => "idle",
        }
    }

    /// Default delay between frames.
    pub fn default_frame_delay(self) -> Duration {
        match self {
            Animation::Boot => Duration::from_millis(50),
            Animation::WifiSearching => Duration::from_millis(400),
            Animation::Activity => Duration::from_millis(500),
            Animation::Idle => Duration::from_millis(300),
        }
    }

    /// Number of frames for finite animations; `None` loops forever.
    pub fn frame_count(self) -> Option<u32> {
        match self {
            Animation::Boot => Some(40),
            _ => None,
        }
    }
}

/// Parameters of `show_symbol`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowSymbolParams {
    pub symbol: Symbol,
    /// Display duration in seconds; defaults per symbol.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Overrides the symbol's primary color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<[u8; 3]>,
}

/// Parameters of `show_animation`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowAnimationParams {
    pub animation: Animation,
    /// Cap in seconds for looping animations; ignored for finite ones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Seconds between frames; defaults per animation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_delay: Option<f64>,
}

/// Parameters of `show_progress`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowProgressParams {
    pub percentage: f32,
}

/// Parameters of `show_layout`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowLayoutParams {
    pub payload: LayoutPayload,
}

/// A decoded command, ready for the queue.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    ShowSymbol(ShowSymbolParams),
    ShowAnimation(ShowAnimationParams),
    ShowProgress(ShowProgressParams),
    ShowLayout(ShowLayoutParams),
    StopAnimation,
    Clear,
    Test,
    Shutdown,
}

impl Command {
    /// Canonical wire name of the command kind.
    pub fn name(&self) -> &'static str {
        match self {
            Command::ShowSymbol(_) => "show_symbol",
            Command::ShowAnimation(_) => "show_animation",
            Command::ShowProgress(_) => "show_progress",
            Command::ShowLayout(_) => "show_layout",
            Command::StopAnimation => "stop_animation",
            Command::Clear => "clear",
            Command::Test => "test",
            Command::Shutdown => "shutdown",
        }
    }

    /// Whether this kind is forced to [`Priority::High`] regardless of the
    /// caller-supplied priority.
    pub fn forces_high_priority(&self) -> bool {
        matches!(self, Command::StopAnimation | Command::Shutdown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_ordering() {
        assert!(Priority::High > Priority::Medium);
        assert!(Priority::Medium > Priority::Low);
    }

    #[test]
    fn priority_wire_names_are_uppercase() {
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"HIGH\"");
        let p: Priority = serde_json::from_str("\"LOW\"").unwrap();
        assert_eq!(p, Priority::Low);
    }

    #[test]
    fn symbol_aliases_parse() {
        for (alias, expected) in [
            ("\"w\"", Symbol::Wifi),
            ("\"wifi_connected\"", Symbol::Wifi),
            ("\"t\"", Symbol::Tunnel),
            ("\"d\"", Symbol::Discord),
            ("\"checkmark\"", Symbol::Check),
            ("\"x\"", Symbol::Error),
            ("\"all_on\"", Symbol::AllOn),
        ] {
            let parsed: Symbol = serde_json::from_str(alias).unwrap();
            assert_eq!(parsed, expected, "alias {alias}");
        }
    }

    #[test]
    fn unknown_symbol_is_rejected() {
        assert!(serde_json::from_str::<Symbol>("\"rainbow\"").is_err());
    }

    #[test]
    fn symbol_serializes_to_canonical_name() {
        for symbol in Symbol::ALL {
            let json = serde_json::to_string(&symbol).unwrap();
            assert_eq!(json, format!("\"{}\"", symbol.name()));
        }
    }

    #[test]
    fn boot_is_the_only_finite_animation() {
        assert_eq!(Animation::Boot.frame_count(), Some(40));
        for animation in [Animation::WifiSearching, Animation::Activity, Animation::Idle] {
            assert_eq!(animation.frame_count(), None);
        }
    }

    #[test]
    fn stop_and_shutdown_force_high() {
        assert!(Command::StopAnimation.forces_high_priority());
        assert!(Command::Shutdown.forces_high_priority());
        assert!(!Command::Clear.forces_high_priority());
    }
}
