//! Wire event types delivered by the rendering host.
//!
//! `SessionEvent` is the JSON form of the host's discrete user actions:
//! a button press on one of the counter controls, or a chat submission.
//! Unknown buttons and unknown event tags fail deserialization at the
//! boundary; they never reach the state machine.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// One of the three counter control buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterButton {
    Increment,
    Decrement,
    Reset,
}

impl fmt::Display for CounterButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CounterButton::Increment => write!(f, "increment"),
            CounterButton::Decrement => write!(f, "decrement"),
            CounterButton::Reset => write!(f, "reset"),
        }
    }
}

impl FromStr for CounterButton {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "increment" => Ok(CounterButton::Increment),
            "decrement" => Ok(CounterButton::Decrement),
            "reset" => Ok(CounterButton::Reset),
            other => Err(format!("invalid counter button: '{other}'")),
        }
    }
}

/// A discrete user action delivered by the rendering host.
///
/// Clients send JSON-encoded text frames matching one of these variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A counter control button was pressed.
    ButtonPressed { button: CounterButton },
    /// The chat input was submitted with `value`.
    TextSubmitted { value: String },
}
