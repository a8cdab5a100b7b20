use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AgentError;
use crate::message::{Message, Role};

/// How the transcript is presented to the model on every round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryMode {
    /// Instructions plus one user message holding the whole transcript as text.
    #[default]
    Scratchpad,
    /// Instructions plus one message per appended turn.
    Messages,
}

impl fmt::Display for HistoryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryMode::Scratchpad => f.write_str("scratchpad"),
            HistoryMode::Messages => f.write_str("messages"),
        }
    }
}

impl FromStr for HistoryMode {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scratchpad" => Ok(HistoryMode::Scratchpad),
            "messages" => Ok(HistoryMode::Messages),
            other => Err(AgentError::Configuration(format!(
                "unknown history mode `{other}`, expected `scratchpad` or `messages`"
            ))),
        }
    }
}

/// Context sent to the model. The first message is always the instructions;
/// mutation only happens through [`History::append`].
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    mode: HistoryMode,
    messages: Vec<Message>,
}

impl History {
    pub fn new(instructions: impl Into<String>, mode: HistoryMode) -> Self {
        let mut messages = vec![Message::system(instructions)];
        if mode == HistoryMode::Scratchpad {
            messages.push(Message::user(String::new()));
        }
        Self { mode, messages }
    }

    pub fn mode(&self) -> HistoryMode {
        self.mode
    }

    /// Appends with the default assistant role.
    pub fn append(&mut self, content: impl Into<String>) {
        self.append_as(content, Role::Assistant);
    }

    /// In scratchpad mode the role is ignored and the content is added as a
    /// new line of the scratchpad.
    pub fn append_as(&mut self, content: impl Into<String>, role: Role) {
        let content = content.into();
        match self.mode {
            HistoryMode::Scratchpad => {
                // scratchpad is always the last message
                if let Some(pad) = self.messages.last_mut() {
                    pad.content.push_str(&content);
                    pad.content.push('\n');
                }
            }
            HistoryMode::Messages => self.messages.push(Message::new(role, content)),
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn instructions(&self) -> &str {
        &self.messages[0].content
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn to_vec(&self) -> Vec<Message> {
        self.messages.clone()
    }
}
