//! Rendering memory into reasoning context and plain-text transcripts.

use super::chat::ChatMessage;
use super::message::MemoryMessage;

fn user_block(personal_output: &str, global_output: &str) -> String {
    format!(
        "PERSONAL OUTPUT:\n\n{}\n\nGLOBAL OUTPUT:\n\n{}\n\n",
        personal_output, global_output
    )
}

/// Convert one memory entry into a chat message
pub fn to_chat_message(message: &MemoryMessage) -> ChatMessage {
    match message {
        MemoryMessage::Assistant { model_output } => ChatMessage::assistant(model_output.clone()),
        MemoryMessage::User {
            personal_output,
            global_output,
        } => ChatMessage::user(user_block(personal_output, global_output)),
    }
}

/// Build the Reason-stage context: system prompt followed by the agent's
/// memory as alternating assistant/user turns.
///
/// A trailing assistant entry is the slot the upcoming response will be
/// written into, so it is left out.
pub fn reasoning_context(system_prompt: &str, memory: &[MemoryMessage]) -> Vec<ChatMessage> {
    let visible = match memory.last() {
        Some(MemoryMessage::Assistant { .. }) => &memory[..memory.len() - 1],
        _ => memory,
    };

    std::iter::once(ChatMessage::system(system_prompt))
        .chain(visible.iter().map(to_chat_message))
        .collect()
}

/// Render memory entries as a transcript for the planner and summarizer
pub fn interaction_text(messages: &[MemoryMessage]) -> String {
    let mut text = String::new();

    for message in messages {
        text.push_str(&format!(
            "** ROLE: {} **\n\n",
            message.role().as_str().to_uppercase()
        ));

        match message {
            MemoryMessage::Assistant { model_output } => text.push_str(model_output),
            MemoryMessage::User {
                personal_output,
                global_output,
            } => text.push_str(&format!(
                "PERSONAL OUTPUT:\n\n{}\n\nGLOBAL OUTPUT:\n\n{}",
                personal_output, global_output
            )),
        }

        text.push_str("\n\n");
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::chat::ChatRole;
    use crate::memory::message::Role;

    #[test]
    fn test_reasoning_context_skips_open_assistant_slot() {
        let memory = vec![
            MemoryMessage::user("hello"),
            MemoryMessage::Assistant {
                model_output: "{\"commands\": []}".to_string(),
            },
            MemoryMessage::user("next"),
            MemoryMessage::empty(Role::Assistant),
        ];

        let context = reasoning_context("SYSTEM", &memory);
        assert_eq!(context.len(), 4);
        assert_eq!(context[0].role, ChatRole::System);
        assert_eq!(context[1].role, ChatRole::User);
        assert_eq!(context[2].role, ChatRole::Assistant);
        assert_eq!(context[3].role, ChatRole::User);
        assert!(context[3].content.starts_with("PERSONAL OUTPUT:\n\nnext"));
    }

    #[test]
    fn test_interaction_text() {
        let memory = vec![
            MemoryMessage::Assistant {
                model_output: "out".to_string(),
            },
            MemoryMessage::User {
                personal_output: "p".to_string(),
                global_output: "g".to_string(),
            },
        ];
        let text = interaction_text(&memory);
        assert_eq!(
            text,
            "** ROLE: ASSISTANT **\n\nout\n\n** ROLE: USER **\n\nPERSONAL OUTPUT:\n\np\n\nGLOBAL OUTPUT:\n\ng\n\n"
        );
    }
}
