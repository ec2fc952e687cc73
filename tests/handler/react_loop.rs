//! A complete agent turn

use super::*;

#[test]
fn test_full_react_turn() {
    let (_temp, mut handler) = create_handler();
    handler.start_trace(Some("query"));

    // The router hands the question to the agent
    start(&mut handler, EventKind::Llm, Some(&user_query("What is MEV?")));
    end(
        &mut handler,
        EventKind::Llm,
        Some(&response(
            "Thought: I need to use a tool to help me answer the question.\nAction: query_engine",
        )),
    );

    // The tool retrieves and synthesizes
    start(&mut handler, EventKind::FunctionCall, None);
    start(&mut handler, EventKind::Retrieve, None);
    end(&mut handler, EventKind::Retrieve, None);
    let mut vars = serde_json::Map::new();
    vars.insert("context_str".to_string(), json!("MEV is maximal extractable value"));
    start(
        &mut handler,
        EventKind::Templating,
        Some(&Payload::templating("Context: {context_str}", vars)),
    );
    start(&mut handler, EventKind::Llm, Some(&tool_prompt("MEV is ...")));
    end(&mut handler, EventKind::Llm, Some(&response("MEV is maximal extractable value.")));
    end(
        &mut handler,
        EventKind::FunctionCall,
        Some(&Payload::function_output("MEV is maximal extractable value.")),
    );

    // The agent answers
    end(
        &mut handler,
        EventKind::Llm,
        Some(&response(
            "Thought: I can answer without using any more tools.\nAnswer: MEV is ...",
        )),
    );
    handler.end_trace(Some("query"), None);

    let trace = file_json(&handler);
    let roots = trace.as_array().unwrap();
    assert_eq!(roots.len(), 4);

    let event_types: Vec<&str> = roots
        .iter()
        .map(|e| e["event_type"].as_str().unwrap())
        .collect();
    assert_eq!(
        event_types,
        ["LLM start", "LLM end", "FUNCTION_CALL end", "LLM end"]
    );

    // The section hangs off the tool-use response
    assert!(roots[0].get("additional_content").is_none());
    let section = roots[1]["additional_content"][0]["function_call"]
        .as_array()
        .unwrap();
    assert_eq!(section.len(), 3);
    assert_eq!(
        section[0]["retrieved_chunk"],
        json!({"context_str": "MEV is maximal extractable value"})
    );
    assert_eq!(section[1]["tool_output"], json!("Context information is below.\nMEV is ..."));
    assert_eq!(section[2]["subjective grade from 1 to 10"], json!(""));

    assert!(roots[1].get("subjective grade from 1 to 10").is_none());
    assert_eq!(roots[3]["subjective grade from 1 to 10"], json!(""));
    assert_eq!(handler.store().entry_count(), 7);
    assert_eq!(handler.store().section_count(), 1);
}
