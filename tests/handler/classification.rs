//! Entry classification, tagging and filtering

use super::*;
use tracelog_durability::MemorySink;

fn memory_handler() -> JsonLoggingHandler<MemorySink> {
    TraceLoggerBuilder::new()
        .router_marker(ROUTER)
        .build_with_sink(MemorySink::new())
}

#[test]
fn test_router_marker_is_stripped() {
    let (_temp, mut handler) = create_handler();
    start(&mut handler, EventKind::Llm, Some(&user_query("What is MEV?")));

    let entry = &file_json(&handler)[0];
    assert_eq!(entry["user_raw_input"], json!("What is MEV?"));
    assert_eq!(entry["LLM_input"], json!(format!("What is MEV?\n{}", ROUTER)));
    assert_eq!(entry["model_params"], json!({"model": "gpt-4", "temperature": 0}));
}

#[test]
fn test_phase_suffixes() {
    let (_temp, mut handler) = create_handler();
    start(&mut handler, EventKind::Llm, Some(&user_query("q")));
    start(&mut handler, EventKind::FunctionCall, None);
    start(
        &mut handler,
        EventKind::Templating,
        Some(&Payload::templating("tmpl", Default::default())),
    );
    end(&mut handler, EventKind::FunctionCall, None);
    end(&mut handler, EventKind::Llm, Some(&response("a")));

    let trace = file_json(&handler);
    assert_eq!(trace[0]["event_type"], json!("LLM start"));
    assert_eq!(
        trace[0]["additional_content"][0]["function_call"][0]["event_type"],
        json!("TEMPLATING start")
    );
    assert_eq!(trace[1]["event_type"], json!("FUNCTION_CALL end"));
    assert_eq!(trace[2]["event_type"], json!("LLM end"));
}

#[test]
fn test_refine_prompt_fields() {
    let (_temp, mut handler) = create_handler();
    let refine = Payload::llm_start(
        vec![ChatMessage::user(
            "New Context: fresh chunk\nQuery: q\nOriginal Answer: old\nNew Answer:",
        )],
        json!({}),
    );
    start(&mut handler, EventKind::Llm, Some(&refine));

    let entry = &file_json(&handler)[0];
    assert_eq!(entry["retrieved_context"], json!("fresh chunk"));
    assert_eq!(entry["previous_answer"], json!("old"));
}

#[test]
fn test_observation_prompt_has_null_fields() {
    let (_temp, mut handler) = create_handler();
    let observation = Payload::llm_start(
        vec![ChatMessage::user("Observation: New Context: x Query: y")],
        json!({}),
    );
    start(&mut handler, EventKind::Llm, Some(&observation));

    assert_eq!(
        file_json(&handler)[0],
        json!({"event_type": "LLM start", "retrieved_context": null, "previous_answer": null})
    );
}

#[test]
fn test_grade_field_only_on_answers() {
    let (_temp, mut handler) = create_handler();
    end(
        &mut handler,
        EventKind::Llm,
        Some(&response(
            "Thought: I need to use a tool to help me answer the question.\nAction: query",
        )),
    );
    end(&mut handler, EventKind::Llm, Some(&response("Answer: 42")));

    let trace = file_json(&handler);
    assert!(trace[0].get("subjective grade from 1 to 10").is_none());
    assert_eq!(trace[1]["subjective grade from 1 to 10"], json!(""));
}

#[test]
fn test_empty_entries_are_not_persisted() {
    let mut handler = memory_handler();

    // Unhandled kinds, missing payloads and non-assistant responses
    handler
        .on_event_start(EventKind::Retrieve, None, "1", "root")
        .unwrap();
    handler
        .on_event_end(EventKind::Templating, None, "2", "root")
        .unwrap();
    handler
        .on_event_start(EventKind::Llm, None, "3", "root")
        .unwrap();
    handler
        .on_event_end(
            EventKind::Llm,
            Some(&Payload::llm_end(ChatMessage::user("echo"))),
            "4",
            "root",
        )
        .unwrap();

    assert_eq!(handler.sink().writes(), 0);
    assert!(handler.store().is_empty());
}

#[test]
fn test_ignore_lists_drop_events() {
    let temp = TempDir::new().unwrap();
    let mut handler = builder(&temp)
        .ignore_start(EventKind::Templating)
        .ignore_end(EventKind::Llm)
        .build()
        .unwrap();

    start(
        &mut handler,
        EventKind::Templating,
        Some(&Payload::templating("tmpl", Default::default())),
    );
    end(&mut handler, EventKind::Llm, Some(&response("a")));
    assert_eq!(file_text(&handler), "[]");

    // Only the listed phase is ignored
    start(&mut handler, EventKind::Llm, Some(&user_query("q")));
    assert_eq!(file_json(&handler).as_array().unwrap().len(), 1);
}

#[test]
fn test_config_file_drives_handler() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("tracelog.json");
    fs::write(
        &config_path,
        json!({
            "log_root": temp.path(),
            "event_starts_to_ignore": ["llm"],
            "markers": {"router_marker": ROUTER}
        })
        .to_string(),
    )
    .unwrap();

    let config = LoggerConfig::from_json_file(&config_path).unwrap();
    let mut handler = TraceLoggerBuilder::new().config(config).build().unwrap();
    assert_eq!(handler.markers().router_marker, ROUTER);

    start(&mut handler, EventKind::Llm, Some(&user_query("q")));
    assert_eq!(file_text(&handler), "[]");
}
