//! Inbound event model
//!
//! The agent loop reports every step as a pair of notifications, a start
//! and an end, each tagged with an [`EventKind`] and carrying a [`Payload`].
//! Only a few kinds are interpreted; the rest exist so that the full
//! category set emitted by the orchestration framework can be named,
//! ignored, or reported.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Category of an agent event
///
/// Serialized with the framework's snake_case names (`"llm"`,
/// `"function_call"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Splitting documents into chunks
    Chunking,
    /// Parsing documents into nodes
    NodeParsing,
    /// Computing embeddings
    Embedding,
    /// A call to the language model
    Llm,
    /// A query against an engine
    Query,
    /// Retrieval from the vector store
    Retrieve,
    /// Response synthesis
    Synthesize,
    /// Tree index construction
    Tree,
    /// Sub-question generation
    SubQuestion,
    /// Prompt templating
    Templating,
    /// A tool / function invocation
    FunctionCall,
    /// Reranking of retrieved nodes
    Reranking,
    /// An exception raised inside the agent loop
    Exception,
    /// One step of the agent
    AgentStep,
}

impl EventKind {
    /// All event kinds, in framework order
    pub const ALL: [EventKind; 14] = [
        EventKind::Chunking,
        EventKind::NodeParsing,
        EventKind::Embedding,
        EventKind::Llm,
        EventKind::Query,
        EventKind::Retrieve,
        EventKind::Synthesize,
        EventKind::Tree,
        EventKind::SubQuestion,
        EventKind::Templating,
        EventKind::FunctionCall,
        EventKind::Reranking,
        EventKind::Exception,
        EventKind::AgentStep,
    ];

    /// Name written into the `event_type` field of a log entry
    pub fn log_name(&self) -> &'static str {
        match self {
            EventKind::Chunking => "CHUNKING",
            EventKind::NodeParsing => "NODE_PARSING",
            EventKind::Embedding => "EMBEDDING",
            EventKind::Llm => "LLM",
            EventKind::Query => "QUERY",
            EventKind::Retrieve => "RETRIEVE",
            EventKind::Synthesize => "SYNTHESIZE",
            EventKind::Tree => "TREE",
            EventKind::SubQuestion => "SUB_QUESTION",
            EventKind::Templating => "TEMPLATING",
            EventKind::FunctionCall => "FUNCTION_CALL",
            EventKind::Reranking => "RERANKING",
            EventKind::Exception => "EXCEPTION",
            EventKind::AgentStep => "AGENT_STEP",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.log_name())
    }
}

/// Whether a notification precedes or follows the operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventPhase {
    /// Notification sent before the operation runs
    Start,
    /// Notification sent after the operation completed
    End,
}

impl EventPhase {
    /// Suffix appended to `event_type` for entries emitted in this phase
    pub fn suffix(&self) -> &'static str {
        match self {
            EventPhase::Start => " start",
            EventPhase::End => " end",
        }
    }
}

/// Role of a chat message author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    /// System prompt
    System,
    /// End user
    User,
    /// The model
    Assistant,
    /// Function result message
    Function,
    /// Tool result message
    Tool,
    /// Chatbot persona
    Chatbot,
    /// Model turn, as some providers name the assistant
    Model,
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author role
    pub role: MessageRole,
    /// Message text
    #[serde(default)]
    pub content: String,
}

impl ChatMessage {
    /// Create a message
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

/// A completed LLM response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The generated message
    pub message: ChatMessage,
}

/// Payload attached to an event notification
///
/// Every field is optional; which ones are present depends on the event
/// kind and phase:
///
/// | Kind | Phase | Fields |
/// |------|-------|--------|
/// | Llm | start | `messages`, `serialized` |
/// | Llm | end | `messages`, `response` |
/// | Templating | start | `template_vars`, `template` |
/// | FunctionCall | end | `function_output` |
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    /// Chat messages sent to the model
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<ChatMessage>,
    /// Serialized model parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serialized: Option<Value>,
    /// Model response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<ChatResponse>,
    /// Variables substituted into the template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_vars: Option<Map<String, Value>>,
    /// Template text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    /// Output of the invoked tool
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_output: Option<String>,
}

impl Payload {
    /// Payload for an LLM start event
    pub fn llm_start(messages: Vec<ChatMessage>, serialized: Value) -> Self {
        Self {
            messages,
            serialized: Some(serialized),
            ..Self::default()
        }
    }

    /// Payload for an LLM end event
    pub fn llm_end(response: ChatMessage) -> Self {
        Self {
            response: Some(ChatResponse { message: response }),
            ..Self::default()
        }
    }

    /// Payload for a templating start event
    pub fn templating(template: impl Into<String>, template_vars: Map<String, Value>) -> Self {
        Self {
            template: Some(template.into()),
            template_vars: Some(template_vars),
            ..Self::default()
        }
    }

    /// Payload for a function call end event
    pub fn function_output(output: impl Into<String>) -> Self {
        Self {
            function_output: Some(output.into()),
            ..Self::default()
        }
    }
}
