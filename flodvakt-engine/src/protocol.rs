//! Command protocol: decoding viewer control messages and applying them to
//! the shared scenario.
//!
//! Wire form: `{"action": "SET_MODE", "value": "<SCENARIO>"}`. Nothing is
//! ever sent back; a rejected message is simply dropped.

use flodvakt_core::{Scenario, SharedScenario};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

const SET_MODE: &str = "SET_MODE";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SetMode(Scenario),
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Malformed command: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Unknown action: {0:?}")]
    UnknownAction(String),

    #[error("Command {0} is missing its value")]
    MissingValue(&'static str),

    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),
}

impl CommandError {
    /// Short label used for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            CommandError::Malformed(_) => "malformed",
            CommandError::UnknownAction(_) => "unknown_action",
            CommandError::MissingValue(_) => "missing_value",
            CommandError::UnknownScenario(_) => "unknown_scenario",
        }
    }
}

#[derive(Deserialize)]
struct RawCommand {
    action: String,
    #[serde(default)]
    value: Option<Value>,
}

impl Command {
    /// Decodes one text frame. Only fully valid commands come out as `Ok`.
    pub fn decode(text: &str) -> Result<Self, CommandError> {
        let raw: RawCommand = serde_json::from_str(text)?;
        if raw.action != SET_MODE {
            return Err(CommandError::UnknownAction(raw.action));
        }
        match raw.value {
            None | Some(Value::Null) => Err(CommandError::MissingValue(SET_MODE)),
            Some(Value::String(id)) => id
                .parse::<Scenario>()
                .map(Command::SetMode)
                .map_err(|_| CommandError::UnknownScenario(format!("{id:?}"))),
            Some(other) => Err(CommandError::UnknownScenario(other.to_string())),
        }
    }

    /// Overwrites the shared scenario and returns the value it replaced.
    pub fn apply(self, state: &SharedScenario) -> Scenario {
        match self {
            Command::SetMode(scenario) => state.set(scenario),
        }
    }
}

/// Outcome of a command that made it past validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Applied {
    pub previous: Scenario,
    pub current: Scenario,
}

impl Applied {
    pub fn changed(&self) -> bool {
        self.previous != self.current
    }
}

/// Decodes `text` and, only if it is valid, applies it to `state`.
pub fn handle_message(text: &str, state: &SharedScenario) -> Result<Applied, CommandError> {
    let command = Command::decode(text)?;
    let previous = command.apply(state);
    let Command::SetMode(current) = command;
    Ok(Applied { previous, current })
}
