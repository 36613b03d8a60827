//! Request parsing and serialization.
//!
//! Decoding is two-stage so the error taxonomy stays precise: the envelope
//! (`command`, `priority`, `params`) is parsed first, then the parameters
//! are decoded against the named command. An unknown command maps to
//! `InvalidCommand`; a bad envelope or bad parameters map to
//! `InvalidParams`.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::command::{Command, Priority};
use crate::response::ErrorCode;

/// Decoding failures, each mapping onto a wire [`ErrorCode`].
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed request: {0}")]
    Malformed(String),
    #[error("unknown command {0:?}")]
    UnknownCommand(String),
    #[error("invalid parameters for {command}: {reason}")]
    InvalidParams { command: &'static str, reason: String },
}

impl ProtocolError {
    /// The error code reported to the producer.
    pub fn code(&self) -> ErrorCode {
        match self {
            ProtocolError::Malformed(_) => ErrorCode::InvalidParams,
            ProtocolError::UnknownCommand(_) => ErrorCode::InvalidCommand,
            ProtocolError::InvalidParams { .. } => ErrorCode::InvalidParams,
        }
    }
}

#[derive(Deserialize)]
struct Envelope {
    command: String,
    #[serde(default)]
    priority: Option<Priority>,
    #[serde(default)]
    params: Value,
}

/// A fully decoded request.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub command: Command,
    pub priority: Priority,
}

impl Request {
    /// Build a request, applying the forced-High rule for `stop_animation`
    /// and `shutdown`.
    pub fn new(command: Command, priority: Priority) -> Self {
        let priority = if command.forces_high_priority() {
            Priority::High
        } else {
            priority
        };
        Self { command, priority }
    }

    /// Parse one protocol line (without or with its trailing newline).
    pub fn parse_line(line: &str) -> Result<Request, ProtocolError> {
        let envelope: Envelope = serde_json::from_str(line.trim_end())
            .map_err(|e| ProtocolError::Malformed(e.to_string()))?;

        fn params<T: serde::de::DeserializeOwned>(
            command: &'static str,
            value: Value,
        ) -> Result<T, ProtocolError> {
            serde_json::from_value(value).map_err(|e| ProtocolError::InvalidParams {
                command,
                reason: e.to_string(),
            })
        }

        let command = match envelope.command.as_str() {
            "show_symbol" => Command::ShowSymbol(params("show_symbol", envelope.params)?),
            "show_animation" => Command::ShowAnimation(params("show_animation", envelope.params)?),
            "show_progress" => Command::ShowProgress(params("show_progress", envelope.params)?),
            "show_layout" => Command::ShowLayout(params("show_layout", envelope.params)?),
            "stop_animation" => Command::StopAnimation,
            "clear" => Command::Clear,
            "test" => Command::Test,
            "shutdown" => Command::Shutdown,
            other => return Err(ProtocolError::UnknownCommand(other.to_owned())),
        };

        Ok(Request::new(
            command,
            envelope.priority.unwrap_or(Priority::Medium),
        ))
    }

    /// Serialize as one protocol line, newline included.
    pub fn to_line(&self) -> String {
        let params = match &self.command {
            Command::ShowSymbol(p) => serde_json::to_value(p),
            Command::ShowAnimation(p) => serde_json::to_value(p),
            Command::ShowProgress(p) => serde_json::to_value(p),
            Command::ShowLayout(p) => serde_json::to_value(p),
            Command::StopAnimation | Command::Clear | Command::Test | Command::Shutdown => {
                Ok(Value::Object(serde_json::Map::new()))
            }
        }
        // Parameter structs contain only JSON-representable fields.
        .unwrap_or(Value::Null);

        let mut line = serde_json::json!({
            "command": self.command.name(),
            "priority": self.priority,
            "params": params,
        })
        .to_string();
        line.push('\n');
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Animation, Symbol};
    use crate::payload::Layout;

    #[test]
    fn parses_show_symbol() {
        let req = Request::parse_line(
            r#"{"command":"show_symbol","priority":"HIGH","params":{"symbol":"error"}}"#,
        )
        .unwrap();
        assert_eq!(req.priority, Priority::High);
        match req.command {
            Command::ShowSymbol(p) => {
                assert_eq!(p.symbol, Symbol::Error);
                assert_eq!(p.duration, None);
            }
            other => panic!("wrong command: {other:?}"),
        }
    }

    #[test]
    fn missing_priority_defaults_to_medium() {
        let req =
            Request::parse_line(r#"{"command":"show_progress","params":{"percentage":40}}"#)
                .unwrap();
        assert_eq!(req.priority, Priority::Medium);
    }

    #[test]
    fn bare_commands_need_no_params() {
        let req = Request::parse_line(r#"{"command":"clear"}"#).unwrap();
        assert_eq!(req.command, Command::Clear);
    }

    #[test]
    fn stop_animation_is_forced_high() {
        let req =
            Request::parse_line(r#"{"command":"stop_animation","priority":"LOW","params":{}}"#)
                .unwrap();
        assert_eq!(req.priority, Priority::High);
    }

    #[test]
    fn shutdown_is_forced_high() {
        let req = Request::parse_line(r#"{"command":"shutdown","priority":"LOW"}"#).unwrap();
        assert_eq!(req.priority, Priority::High);
    }

    #[test]
    fn unknown_command_maps_to_invalid_command() {
        let err = Request::parse_line(r#"{"command":"dance"}"#).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidCommand);
    }

    #[test]
    fn malformed_json_maps_to_invalid_params() {
        let err = Request::parse_line("{not json}").unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidParams);
    }

    #[test]
    fn bad_params_map_to_invalid_params() {
        let err = Request::parse_line(
            r#"{"command":"show_symbol","params":{"symbol":"no_such_symbol"}}"#,
        )
        .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidParams);
    }

    #[test]
    fn request_round_trips_through_its_own_line() {
        let original = Request::new(
            Command::ShowAnimation(crate::command::ShowAnimationParams {
                animation: Animation::Idle,
                duration: None,
                frame_delay: Some(0.3),
            }),
            Priority::Low,
        );
        let parsed = Request::parse_line(&original.to_line()).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn layout_request_round_trips() {
        let json = r#"{"command":"show_layout","priority":"LOW","params":{"payload":{
            "layout":"sprint_view",
            "project":{"name":"Demo","percentage":50},
            "sprints":[{"name":"S1","percentage":100,"user_stories":[]}]
        }}}"#;
        let req = Request::parse_line(json).unwrap();
        let reparsed = Request::parse_line(&req.to_line()).unwrap();
        assert_eq!(req, reparsed);
        match reparsed.command {
            Command::ShowLayout(p) => assert_eq!(p.payload.layout, Layout::SprintView),
            other => panic!("wrong command: {other:?}"),
        }
    }
}
