//! Trace file persistence

use super::*;
use tracelog_durability::{encode_pretty, read_trace, JSON_LOG_DIR};

fn assert_file_matches_trace(handler: &JsonLoggingHandler) {
    let expected = encode_pretty(&handler.trace()).unwrap();
    assert_eq!(file_text(handler).into_bytes(), expected);
}

#[test]
fn test_file_starts_as_empty_array() {
    let (temp, handler) = create_handler();
    let path = handler.log_path().unwrap();
    assert_eq!(path.parent().unwrap(), temp.path().join(JSON_LOG_DIR));
    assert_eq!(path.extension().unwrap(), "log");
    assert_eq!(file_text(&handler), "[]");
}

#[test]
fn test_file_matches_trace_after_every_event() {
    let (_temp, mut handler) = create_handler();

    start(&mut handler, EventKind::Llm, Some(&user_query("What is MEV?")));
    assert_file_matches_trace(&handler);

    start(&mut handler, EventKind::FunctionCall, None);
    assert_file_matches_trace(&handler);

    start(&mut handler, EventKind::Llm, Some(&tool_prompt("MEV is ...")));
    assert_file_matches_trace(&handler);

    end(
        &mut handler,
        EventKind::FunctionCall,
        Some(&Payload::function_output("MEV is ...")),
    );
    assert_file_matches_trace(&handler);

    end(&mut handler, EventKind::Llm, Some(&response("MEV stands for ...")));
    assert_file_matches_trace(&handler);
}

#[test]
fn test_file_uses_four_space_indent() {
    let (_temp, mut handler) = create_handler();
    start(&mut handler, EventKind::Llm, Some(&user_query("q")));

    let text = file_text(&handler);
    assert!(text.starts_with("[\n    {\n        \"event_type\": \"LLM start\""));
}

#[test]
fn test_key_order_is_preserved() {
    let (_temp, mut handler) = create_handler();
    start(&mut handler, EventKind::Llm, Some(&user_query("q")));

    let text = file_text(&handler);
    let positions: Vec<usize> = ["event_type", "model_params", "user_raw_input", "LLM_input"]
        .iter()
        .map(|key| text.find(&format!("\"{}\"", key)).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_rejected_event_leaves_file_untouched() {
    let (_temp, mut handler) = create_handler();

    // Nothing to attach a function call to yet
    let err = handler
        .on_event_start(EventKind::FunctionCall, None, "1", "root")
        .unwrap_err();
    assert!(err.is_malformed_state());
    assert_eq!(file_text(&handler), "[]");

    start(&mut handler, EventKind::Llm, Some(&user_query("q")));
    let before = file_text(&handler);

    // Tool-output prompt without the QA system prompt
    let bad = Payload::llm_start(
        vec![ChatMessage::user("Context information is below.\nchunk")],
        json!({}),
    );
    let err = handler
        .on_event_start(EventKind::Llm, Some(&bad), "2", "root")
        .unwrap_err();
    assert!(err.is_invariant_violation());
    assert_eq!(file_text(&handler), before);
    assert_eq!(handler.store().entry_count(), 1);
}

#[test]
fn test_atomic_mode_leaves_no_temp_file() {
    let temp = TempDir::new().unwrap();
    let mut handler = builder(&temp).atomic().build().unwrap();

    start(&mut handler, EventKind::Llm, Some(&user_query("q")));
    end(&mut handler, EventKind::Llm, Some(&response("a")));
    assert_file_matches_trace(&handler);

    let names: Vec<String> = fs::read_dir(temp.path().join(JSON_LOG_DIR))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names.len(), 1);
    assert!(names[0].ends_with(".log"));
}

#[test]
fn test_runs_never_share_a_file() {
    let temp = TempDir::new().unwrap();
    let first = builder(&temp).build().unwrap();
    let second = builder(&temp).build().unwrap();
    assert_ne!(first.log_path(), second.log_path());
}

#[test]
fn test_trace_file_reads_back() {
    let (_temp, mut handler) = create_handler();
    start(&mut handler, EventKind::Llm, Some(&user_query("q")));

    let value = read_trace(handler.log_path().unwrap()).unwrap();
    assert_eq!(value, handler.trace());
    assert_eq!(value, file_json(&handler));
}
