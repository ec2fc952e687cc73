//! Marker strings used to recognise prompt and response kinds
//!
//! The agent's prompts are plain text, so the only way to tell a router
//! query from a context-injection prompt or a refine prompt is to look for
//! known substrings. These are collected here and injected into the
//! classifier instead of being scattered through it. Defaults match the
//! prompts shipped with the chatbot; any subset can be overridden from a
//! config file.

use serde::{Deserialize, Serialize};

/// Sentinel appended to the top-level user query by the router tool prompt
pub const DEFAULT_ROUTER_MARKER: &str =
    "Use the query engine tool to answer any question about the indexed knowledge base.";

/// Opening line of the framework's context-injection prompt
pub const DEFAULT_CONTEXT_MARKER: &str = "Context information is below.";

/// The framework's default text-QA system prompt
pub const DEFAULT_QA_SYSTEM_PROMPT: &str = "You are an expert Q&A system that is trusted around the world.\n\
Always answer the query using the provided context information, and not prior knowledge.\n\
Some rules to follow:\n\
1. Never directly reference the given context in your answer.\n\
2. Avoid statements like 'Based on the context, ...' or 'The context information ...' or anything along those lines.";

/// Prefix of a ReAct response that is about to call a tool
pub const DEFAULT_TOOL_USE_PHRASE: &str =
    "Thought: I need to use a tool to help me answer the question.";

/// Prefix of a ReAct response that answers directly
pub const DEFAULT_FINAL_ANSWER_PHRASE: &str =
    "Thought: I can answer without using any more tools.";

/// Marker of a tool observation echoed back into the prompt
pub const DEFAULT_OBSERVATION_MARKER: &str = "Observation:";

/// Marker strings for prompt classification and refine-prompt parsing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptMarkers {
    /// Sentinel identifying the top-level user query
    pub router_marker: String,
    /// Substring identifying a tool-output injection prompt
    pub context_marker: String,
    /// System prompt required on tool-output injection prompts
    pub qa_system_prompt: String,
    /// Response prefix when the agent decides to call a tool
    pub tool_use_phrase: String,
    /// Response prefix when the agent answers without tools
    pub final_answer_phrase: String,
    /// Substring marking an observation echo rather than a refine prompt
    pub observation_marker: String,
    /// Delimiter opening the retrieved context in a refine prompt
    pub context_start: String,
    /// Delimiter closing the retrieved context
    pub context_end: String,
    /// Delimiter opening the previous answer
    pub answer_start: String,
    /// Delimiter closing the previous answer
    pub answer_end: String,
}

impl Default for PromptMarkers {
    fn default() -> Self {
        Self {
            router_marker: DEFAULT_ROUTER_MARKER.to_string(),
            context_marker: DEFAULT_CONTEXT_MARKER.to_string(),
            qa_system_prompt: DEFAULT_QA_SYSTEM_PROMPT.to_string(),
            tool_use_phrase: DEFAULT_TOOL_USE_PHRASE.to_string(),
            final_answer_phrase: DEFAULT_FINAL_ANSWER_PHRASE.to_string(),
            observation_marker: DEFAULT_OBSERVATION_MARKER.to_string(),
            context_start: "New Context:".to_string(),
            context_end: "Query:".to_string(),
            answer_start: "Original Answer:".to_string(),
            answer_end: "New Answer:".to_string(),
        }
    }
}

impl PromptMarkers {
    /// Replace the router marker
    pub fn with_router_marker(mut self, marker: impl Into<String>) -> Self {
        self.router_marker = marker.into();
        self
    }

    /// Replace the required QA system prompt
    pub fn with_qa_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.qa_system_prompt = prompt.into();
        self
    }
}
