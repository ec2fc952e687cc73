//! Function-call sections

use super::*;

#[test]
fn test_start_then_end_returns_to_root() {
    let (_temp, mut handler) = create_handler();
    start(&mut handler, EventKind::Llm, Some(&user_query("q")));
    start(&mut handler, EventKind::FunctionCall, None);
    assert_eq!(handler.store().depth(), 1);

    end(&mut handler, EventKind::FunctionCall, None);
    assert!(handler.cursor().is_root());

    let trace = file_json(&handler);
    assert_eq!(
        trace[0]["additional_content"],
        json!([{"function_call": []}])
    );
    assert_eq!(
        trace[1],
        json!({"event_type": "FUNCTION_CALL end", "tool_output": ""})
    );
}

#[test]
fn test_entries_inside_call_go_into_section() {
    let (_temp, mut handler) = create_handler();
    start(&mut handler, EventKind::Llm, Some(&user_query("q")));
    start(&mut handler, EventKind::FunctionCall, None);
    start(&mut handler, EventKind::Llm, Some(&tool_prompt("chunk")));
    end(&mut handler, EventKind::Llm, Some(&response("partial")));

    let trace = file_json(&handler);
    assert_eq!(trace.as_array().unwrap().len(), 1);
    let section = &trace[0]["additional_content"][0]["function_call"];
    assert_eq!(section[0]["event_type"], json!("LLM start"));
    assert_eq!(section[1]["event_type"], json!("LLM end"));
}

#[test]
fn test_consecutive_calls_attach_to_last_entry() {
    let (_temp, mut handler) = create_handler();
    start(&mut handler, EventKind::Llm, Some(&user_query("q")));
    start(&mut handler, EventKind::FunctionCall, None);
    end(&mut handler, EventKind::FunctionCall, None);
    start(&mut handler, EventKind::FunctionCall, None);
    end(&mut handler, EventKind::FunctionCall, None);

    let trace = file_json(&handler);
    assert_eq!(trace[1]["additional_content"], json!([{"function_call": []}]));
    assert_eq!(trace[2]["event_type"], json!("FUNCTION_CALL end"));
    assert!(trace[0].get("additional_content").is_some());
}

fn nested_calls(handler: &mut JsonLoggingHandler) {
    start(handler, EventKind::Llm, Some(&user_query("q")));
    start(handler, EventKind::FunctionCall, None);
    start(handler, EventKind::Llm, Some(&tool_prompt("chunk")));
    start(handler, EventKind::FunctionCall, None);
    end(handler, EventKind::Llm, Some(&response("inner")));
    end(handler, EventKind::FunctionCall, Some(&Payload::function_output("inner")));
    end(handler, EventKind::FunctionCall, Some(&Payload::function_output("outer")));
}

#[test]
fn test_stack_policy_restores_enclosing_section() {
    let (_temp, mut handler) = create_handler();
    nested_calls(&mut handler);
    assert!(handler.cursor().is_root());

    let trace = file_json(&handler);
    let outer = &trace[0]["additional_content"][0]["function_call"];
    let inner = &outer[0]["additional_content"][0]["function_call"];
    assert_eq!(inner[0]["LLM_response"], json!("inner"));
    assert_eq!(outer[1], json!({"event_type": "FUNCTION_CALL end", "tool_output": "inner"}));
    assert_eq!(trace[1], json!({"event_type": "FUNCTION_CALL end", "tool_output": "outer"}));
    assert_eq!(trace.as_array().unwrap().len(), 2);
}

#[test]
fn test_replace_policy_returns_to_root() {
    let temp = TempDir::new().unwrap();
    let mut handler = builder(&temp)
        .nesting(NestingPolicy::Replace)
        .build()
        .unwrap();
    nested_calls(&mut handler);

    let trace = file_json(&handler);
    let outer = &trace[0]["additional_content"][0]["function_call"];
    assert_eq!(outer.as_array().unwrap().len(), 1);
    assert_eq!(trace[1]["tool_output"], json!("inner"));
    assert_eq!(trace[2]["tool_output"], json!("outer"));
}

#[test]
fn test_reject_policy_keeps_file() {
    let temp = TempDir::new().unwrap();
    let mut handler = builder(&temp)
        .nesting(NestingPolicy::Reject)
        .build()
        .unwrap();
    start(&mut handler, EventKind::Llm, Some(&user_query("q")));
    start(&mut handler, EventKind::FunctionCall, None);
    start(&mut handler, EventKind::Llm, Some(&tool_prompt("chunk")));
    let before = file_text(&handler);

    let err = handler
        .on_event_start(EventKind::FunctionCall, None, "4", "3")
        .unwrap_err();
    assert!(matches!(err, Error::NestedSection { depth: 1 }));
    assert_eq!(file_text(&handler), before);
}

#[test]
fn test_stray_end_at_root_is_logged() {
    let (_temp, mut handler) = create_handler();
    end(&mut handler, EventKind::FunctionCall, None);

    assert!(handler.cursor().is_root());
    assert_eq!(
        file_json(&handler),
        json!([{"event_type": "FUNCTION_CALL end", "tool_output": ""}])
    );
}
