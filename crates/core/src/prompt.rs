//! Prompt and response classification
//!
//! LLM calls made by the agent come in a few recognisable shapes. Which one
//! a call is decides what gets logged, so the decision is made once here,
//! against injected [`PromptMarkers`], and expressed as an enum.

use crate::error::{Error, Result};
use crate::event::{ChatMessage, MessageRole};
use crate::markers::PromptMarkers;
use crate::parse::{parse_message_content, RefineContext};

/// Kind of prompt sent to the model, judged by its last message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    /// No messages at all
    Empty,
    /// Last message was not written by the user
    NotUser(MessageRole),
    /// The top-level user query, routed through the query engine tool
    UserQuery {
        /// Query with the router marker removed
        raw_input: String,
        /// Full message content as sent
        content: String,
    },
    /// Tool output injected as context for the QA prompt
    ToolOutput {
        /// Full message content as sent
        content: String,
    },
    /// Refinement of an earlier answer with new context
    Refine(RefineContext),
}

impl PromptKind {
    /// Classify a prompt
    ///
    /// # Errors
    ///
    /// `InvariantViolation` when the last message is a context-injection
    /// prompt but the first message does not carry the QA system prompt.
    pub fn classify(messages: &[ChatMessage], markers: &PromptMarkers) -> Result<Self> {
        let Some(last) = messages.last() else {
            return Ok(PromptKind::Empty);
        };

        if last.role != MessageRole::User {
            return Ok(PromptKind::NotUser(last.role));
        }

        let content = &last.content;
        if content.contains(markers.router_marker.as_str()) {
            let suffix = format!("\n{}", markers.router_marker);
            return Ok(PromptKind::UserQuery {
                raw_input: content.replace(&suffix, ""),
                content: content.clone(),
            });
        }

        if content.contains(markers.context_marker.as_str()) {
            let has_system_prompt = messages
                .first()
                .map(|m| m.content.contains(markers.qa_system_prompt.as_str()))
                .unwrap_or(false);
            if !has_system_prompt {
                return Err(Error::InvariantViolation(
                    "the first message should be the QA system prompt".to_string(),
                ));
            }
            return Ok(PromptKind::ToolOutput {
                content: content.clone(),
            });
        }

        Ok(PromptKind::Refine(parse_message_content(content, markers)))
    }
}

/// Kind of assistant response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// The agent is about to call a tool
    ToolUse,
    /// The agent answers without further tools
    FinalAnswer,
    /// Anything else the assistant said
    Other,
}

impl ResponseKind {
    /// Classify assistant response content by its leading phrase
    pub fn classify(content: &str, markers: &PromptMarkers) -> Self {
        if content.starts_with(markers.tool_use_phrase.as_str()) {
            ResponseKind::ToolUse
        } else if content.starts_with(markers.final_answer_phrase.as_str()) {
            ResponseKind::FinalAnswer
        } else {
            ResponseKind::Other
        }
    }

    /// Whether the entry for this response reserves a field for manual grading
    pub fn is_gradable(&self) -> bool {
        !matches!(self, ResponseKind::ToolUse)
    }
}
