//! Properties over arbitrary event sequences

use super::*;
use proptest::prelude::*;
use tracelog_durability::MemorySink;

#[derive(Debug, Clone)]
enum Step {
    Query,
    Answer,
    CallStart,
    CallEnd,
    Retrieve,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        Just(Step::Query),
        Just(Step::Answer),
        Just(Step::CallStart),
        Just(Step::CallEnd),
        Just(Step::Retrieve),
    ]
}

fn policy() -> impl Strategy<Value = NestingPolicy> {
    prop_oneof![
        Just(NestingPolicy::Stack),
        Just(NestingPolicy::Replace),
        Just(NestingPolicy::Reject),
    ]
}

fn apply(handler: &mut JsonLoggingHandler<MemorySink>, step: &Step) -> Result<()> {
    match step {
        Step::Query => handler.on_event_start(EventKind::Llm, Some(&user_query("q")), "e", "r"),
        Step::Answer => handler.on_event_end(EventKind::Llm, Some(&response("a")), "e", "r"),
        Step::CallStart => handler.on_event_start(EventKind::FunctionCall, None, "e", "r"),
        Step::CallEnd => handler.on_event_end(EventKind::FunctionCall, None, "e", "r"),
        Step::Retrieve => handler.on_event_start(EventKind::Retrieve, None, "e", "r"),
    }
}

proptest! {
    #[test]
    fn test_last_persisted_snapshot_is_the_trace(
        steps in prop::collection::vec(step(), 0..40),
        nesting in policy(),
    ) {
        let mut handler = TraceLoggerBuilder::new()
            .router_marker(ROUTER)
            .nesting(nesting)
            .build_with_sink(MemorySink::new());

        for step in &steps {
            let before = handler.trace();
            if apply(&mut handler, step).is_err() {
                prop_assert_eq!(handler.trace(), before);
            }
            let persisted = handler.sink().last().cloned().unwrap_or_else(|| json!([]));
            prop_assert_eq!(persisted, handler.trace());
        }
    }

    #[test]
    fn test_closing_every_call_returns_to_root(
        steps in prop::collection::vec(step(), 0..40),
    ) {
        let mut handler = TraceLoggerBuilder::new()
            .router_marker(ROUTER)
            .build_with_sink(MemorySink::new());

        for step in &steps {
            let _ = apply(&mut handler, step);
        }
        while !handler.cursor().is_root() {
            apply(&mut handler, &Step::CallEnd).unwrap();
        }
        prop_assert_eq!(handler.store().depth(), 0);
    }
}
