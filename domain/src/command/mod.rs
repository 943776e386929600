//! Agent commands
//!
//! The reasoning engine answers with a JSON command list. Each entry is
//! queued as a [`QueuedCommand`] and validated into a [`Command`] only when
//! it is dispatched, so one malformed entry costs the agent an `[ERROR]`
//! line and nothing else.

pub mod effects;
pub mod entities;
pub mod parsing;
pub mod script;

pub use effects::Effect;
pub use entities::{Command, CommandError, MAX_TRAVERSAL_COUNT, QueuedCommand, StartNode};
pub use parsing::parse_command_queue;
pub use script::{ScriptFormatError, extract_script};
