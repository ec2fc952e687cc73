//! Event classification.
//!
//! Turns one notification into an [`Action`] on the trace. Classification
//! never touches the trace itself; the handler applies the action.

use serde_json::Value;
use tracelog_core::{
    EventKind, LogEntry, MessageRole, Payload, PromptKind, PromptMarkers, ResponseKind,
    SUBJECTIVE_GRADE_KEY,
};
use tracing::{debug, warn};

/// What a notification does to the trace
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Action {
    /// Nothing is logged
    Skip,
    /// Append an entry at the active level
    Log(LogEntry),
    /// Open a function-call section on the last entry
    OpenSection,
    /// Close the current section, then append an entry
    CloseSection(LogEntry),
}

/// Classifies notifications against a set of prompt markers
#[derive(Debug, Clone, Default)]
pub(crate) struct EventClassifier {
    markers: PromptMarkers,
}

impl EventClassifier {
    pub(crate) fn new(markers: PromptMarkers) -> Self {
        Self { markers }
    }

    pub(crate) fn markers(&self) -> &PromptMarkers {
        &self.markers
    }

    pub(crate) fn on_start(
        &self,
        kind: EventKind,
        payload: Option<&Payload>,
    ) -> tracelog_core::Result<Action> {
        match kind {
            EventKind::Llm => self.llm_start(payload),
            EventKind::FunctionCall => Ok(Action::OpenSection),
            EventKind::Templating => Ok(match payload.filter(|p| has_template(p)) {
                Some(payload) => Action::Log(
                    LogEntry::for_kind(kind)
                        .with("instructions", payload.template.clone().unwrap_or_default())
                        .with(
                            "retrieved_chunk",
                            Value::Object(payload.template_vars.clone().unwrap_or_default()),
                        ),
                ),
                None => {
                    debug!("on_event_start: templating event without template payload");
                    Action::Skip
                }
            }),
            _ => {
                warn!(
                    "on_event_start: event_type {} was not caught by the logging handler",
                    kind
                );
                Ok(Action::Skip)
            }
        }
    }

    pub(crate) fn on_end(&self, kind: EventKind, payload: Option<&Payload>) -> Action {
        match kind {
            EventKind::Llm => self.llm_end(payload),
            EventKind::FunctionCall => {
                let output = payload
                    .and_then(|p| p.function_output.clone())
                    .unwrap_or_default();
                Action::CloseSection(LogEntry::for_kind(kind).with("tool_output", output))
            }
            EventKind::Templating => Action::Skip,
            _ => {
                warn!(
                    "on_event_end: event_type {} was not caught by the logging handler",
                    kind
                );
                Action::Skip
            }
        }
    }

    fn llm_start(&self, payload: Option<&Payload>) -> tracelog_core::Result<Action> {
        let messages = payload.map(|p| p.messages.as_slice()).unwrap_or_default();
        let entry = LogEntry::for_kind(EventKind::Llm);

        let action = match PromptKind::classify(messages, &self.markers)? {
            PromptKind::UserQuery { raw_input, content } => {
                let model_params = payload
                    .and_then(|p| p.serialized.clone())
                    .unwrap_or_else(|| Value::Object(Default::default()));
                Action::Log(
                    entry
                        .with("model_params", model_params)
                        .with("user_raw_input", raw_input)
                        .with("LLM_input", content),
                )
            }
            PromptKind::ToolOutput { content } => Action::Log(entry.with("tool_output", content)),
            PromptKind::Refine(refine) => Action::Log(
                entry
                    .with("retrieved_context", nullable(refine.retrieved_context))
                    .with("previous_answer", nullable(refine.previous_answer)),
            ),
            PromptKind::NotUser(role) => {
                warn!(
                    "on_event_start: LLM event whose last message has role {:?} was not caught by the logging handler",
                    role
                );
                Action::Skip
            }
            PromptKind::Empty => {
                warn!("on_event_start: LLM event without messages was not caught by the logging handler");
                Action::Skip
            }
        };
        Ok(action)
    }

    fn llm_end(&self, payload: Option<&Payload>) -> Action {
        let Some(response) = payload.and_then(|p| p.response.as_ref()) else {
            warn!("on_event_end: LLM event without a response was not caught by the logging handler");
            return Action::Skip;
        };
        let message = &response.message;
        if message.role != MessageRole::Assistant {
            warn!(
                "on_event_end: LLM response with role {:?} was not caught by the logging handler",
                message.role
            );
            return Action::Skip;
        }

        let mut entry =
            LogEntry::for_kind(EventKind::Llm).with("LLM_response", message.content.clone());
        if ResponseKind::classify(&message.content, &self.markers).is_gradable() {
            entry.insert(SUBJECTIVE_GRADE_KEY, "");
        }
        Action::Log(entry)
    }
}

fn has_template(payload: &Payload) -> bool {
    payload.template.is_some() || payload.template_vars.is_some()
}

fn nullable(value: Option<String>) -> Value {
    value.map(Value::String).unwrap_or(Value::Null)
}
