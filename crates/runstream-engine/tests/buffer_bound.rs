use runstream_engine::{LineIds, RunStream, StreamAction};
use runstream_testing::assertions;
use runstream_testing::fixtures::EventBuilder;
use serde_json::json;
use std::collections::HashSet;

fn console_line(n: usize) -> runstream_types::Envelope {
    EventBuilder::new("console.line")
        .after(n as i64)
        .payload(json!({"message": format!("line {}", n)}))
        .build()
}

#[test]
fn test_buffer_keeps_last_capacity_lines_in_order() {
    for capacity in [1usize, 3, 10] {
        for appended in [capacity, capacity + 1, capacity * 3 + 2] {
            let mut stream = RunStream::with_line_ids(capacity, LineIds::seeded("b"));
            stream.extend((0..appended).map(console_line));

            let snapshot = stream.snapshot();
            assert_eq!(snapshot.console_lines.len(), capacity);

            let messages: Vec<String> = snapshot.lines().map(|l| l.message.clone()).collect();
            let expected: Vec<String> = (appended - capacity..appended)
                .map(|n| format!("line {}", n))
                .collect();
            assert_eq!(messages, expected, "capacity {} appended {}", capacity, appended);

            let json = serde_json::to_value(snapshot).expect("snapshot serializes");
            assertions::assert_unique_line_ids(&json).expect("ids are unique");
        }
    }
}

#[test]
fn test_ids_never_reused_across_resets() {
    let mut stream = RunStream::with_line_ids(4, LineIds::seeded("r"));
    let mut seen = HashSet::new();

    for round in 0..5 {
        stream.extend((0..6).map(console_line));
        for line in stream.snapshot().lines() {
            seen.insert(line.id.clone());
        }
        match round % 3 {
            0 => stream.reset(Some(format!("run-{}", round)), Vec::new()),
            1 => stream.dispatch(StreamAction::ClearConsole),
            _ => stream.dispatch(StreamAction::AttachRun {
                run_id: None,
                run_mode: None,
            }),
        }
    }

    // Capacity 4 and 6 appends per round evict anything carried over,
    // so every round shows 4 ids nobody has seen before.
    assert_eq!(seen.len(), 5 * 4);
    assert!(seen.iter().all(|id| id.ends_with("-r")));
}

#[test]
fn test_separate_streams_get_distinct_ids() {
    let envelope = console_line(0);
    let mut a = RunStream::new(5);
    let mut b = RunStream::new(5);
    a.dispatch_envelope(envelope.clone());
    b.dispatch_envelope(envelope);

    let id_a = a.snapshot().lines().next().map(|l| l.id.clone());
    let id_b = b.snapshot().lines().next().map(|l| l.id.clone());
    assert_ne!(id_a, id_b);
}

#[test]
fn test_line_ids_carry_event_time() {
    let mut stream = RunStream::with_line_ids(10, LineIds::seeded("t"));
    stream.dispatch_envelope(
        EventBuilder::new("console.line")
            .without_timestamp()
            .payload(json!({"message": "no clock"}))
            .build(),
    );
    stream.dispatch_envelope(
        EventBuilder::new("console.line")
            .at(json!(1_748_779_200_250i64))
            .payload(json!({"message": "epoch millis"}))
            .build(),
    );

    let lines: Vec<_> = stream.snapshot().lines().collect();
    assert_eq!(lines[0].id, "run-na-0-t");
    assert_eq!(lines[0].timestamp, "");
    assert_eq!(lines[1].id, "run-1748779200250-1-t");
    assert!(!lines[1].timestamp.is_empty());
}
