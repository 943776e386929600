//! Per-agent conversation memory entries.

use serde::{Deserialize, Serialize};

/// Role of a memory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Assistant,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Assistant => "assistant",
            Role::User => "user",
        }
    }
}

/// Text buffer of a memory entry that output can be appended to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputBuffer {
    /// Raw reasoning output (assistant entries)
    ModelOutput,
    /// Output only the owning agent sees (user entries)
    Personal,
    /// Broadcast fragments from other agents (user entries)
    Global,
}

impl OutputBuffer {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputBuffer::ModelOutput => "model_output",
            OutputBuffer::Personal => "personal_output",
            OutputBuffer::Global => "global_output",
        }
    }
}

/// One entry in an agent's memory.
///
/// An assistant entry holds what the agent said on its turn; a user entry
/// accumulates everything the agent observes until its next turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum MemoryMessage {
    Assistant {
        model_output: String,
    },
    User {
        personal_output: String,
        global_output: String,
    },
}

impl MemoryMessage {
    /// A fresh entry with empty buffers
    pub fn empty(role: Role) -> Self {
        match role {
            Role::Assistant => MemoryMessage::Assistant {
                model_output: String::new(),
            },
            Role::User => MemoryMessage::User {
                personal_output: String::new(),
                global_output: String::new(),
            },
        }
    }

    pub fn user(personal_output: impl Into<String>) -> Self {
        MemoryMessage::User {
            personal_output: personal_output.into(),
            global_output: String::new(),
        }
    }

    pub fn role(&self) -> Role {
        match self {
            MemoryMessage::Assistant { .. } => Role::Assistant,
            MemoryMessage::User { .. } => Role::User,
        }
    }

    /// Mutable access to a buffer, if this entry has it
    pub fn buffer_mut(&mut self, buffer: OutputBuffer) -> Option<&mut String> {
        match (self, buffer) {
            (MemoryMessage::Assistant { model_output }, OutputBuffer::ModelOutput) => {
                Some(model_output)
            }
            (MemoryMessage::User { personal_output, .. }, OutputBuffer::Personal) => {
                Some(personal_output)
            }
            (MemoryMessage::User { global_output, .. }, OutputBuffer::Global) => {
                Some(global_output)
            }
            _ => None,
        }
    }
}
