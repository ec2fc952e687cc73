//! Refine-prompt parser
//!
//! When the agent refines an earlier answer with a newly retrieved chunk,
//! the prompt it sends has the shape:
//!
//! ```text
//! ... New Context: <context> Query: <question> Original Answer: <answer> New Answer:
//! ```
//!
//! [`parse_message_content`] pulls the context and the previous answer out
//! of such a prompt. Lookup failures are never propagated: they are logged
//! and surface as `None` fields.

use crate::markers::PromptMarkers;
use tracing::warn;

/// Fields recovered from a refine prompt
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefineContext {
    /// Text between `New Context:` and `Query:`, trimmed
    pub retrieved_context: Option<String>,
    /// Text between `Original Answer:` and `New Answer:`, trimmed
    pub previous_answer: Option<String>,
}

impl RefineContext {
    /// Both fields absent
    pub fn none() -> Self {
        Self::default()
    }
}

/// Extract the retrieved context and the previous answer from a refine prompt
///
/// Text containing the observation marker is a tool observation echo and
/// yields no fields. Otherwise all four delimiters must be present; the
/// first occurrence of each is used.
pub fn parse_message_content(text: &str, markers: &PromptMarkers) -> RefineContext {
    if text.contains(markers.observation_marker.as_str()) {
        return RefineContext::none();
    }

    let spans = span_between(text, &markers.context_start, &markers.context_end).and_then(
        |context| {
            span_between(text, &markers.answer_start, &markers.answer_end)
                .map(|answer| (context, answer))
        },
    );

    match spans {
        Ok((context, answer)) => RefineContext {
            retrieved_context: Some(context.trim().to_string()),
            previous_answer: Some(answer.trim().to_string()),
        },
        Err(missing) => {
            warn!(
                "parse_message_content: delimiter {:?} not found in message content",
                missing
            );
            RefineContext::none()
        }
    }
}

/// Slice between the end of `open` and the start of `close`
///
/// Returns the missing delimiter on failure. A `close` found before the end
/// of `open` yields an empty slice.
fn span_between<'a, 'd>(text: &'a str, open: &'d str, close: &'d str) -> Result<&'a str, &'d str> {
    let start = text.find(open).ok_or(open)? + open.len();
    let end = text.find(close).ok_or(close)?;
    Ok(if start <= end { &text[start..end] } else { "" })
}
