use runstream_types::{Envelope, LineOrigin};

use crate::aliases::{CanonicalOp, resolve_alias};
use crate::payload::EventPayload;

/// Namespaces that belong to the run stream besides `run.*`
const RUN_NAMESPACES: &[&str] = &["run.", "engine.", "config."];
const BUILD_NAMESPACE: &str = "build.";

/// Which stream the caller is reading from, when it knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamContext {
    /// Mixed or unknown: console lines are routed by their `scope`
    #[default]
    Mixed,
    /// Build stream: console lines are always build-origin
    Build,
}

/// Envelope after classification and payload lifting
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedEvent {
    pub origin: LineOrigin,
    /// `None` for unrecognized or unclassified envelopes
    pub op: Option<CanonicalOp>,
    pub payload: EventPayload,
}

/// Classify an envelope and lift its payload. Never fails.
pub fn normalize(envelope: &Envelope, context: StreamContext) -> NormalizedEvent {
    let event_type = envelope.event_type();

    if let Some(op) = resolve_alias(event_type) {
        let payload = EventPayload::lift(op, envelope.payload());
        let origin = match (&payload, context) {
            (EventPayload::ConsoleLine(_), StreamContext::Build) => LineOrigin::Build,
            (EventPayload::ConsoleLine(line), StreamContext::Mixed) if line.is_build_scope() => {
                LineOrigin::Build
            }
            _ => op.origin(),
        };

        return NormalizedEvent {
            origin,
            op: Some(op),
            payload,
        };
    }

    let payload = envelope.payload().clone();

    if event_type.starts_with(BUILD_NAMESPACE) {
        tracing::debug!(event_type, "unrecognized build event");
        return NormalizedEvent {
            origin: LineOrigin::Build,
            op: None,
            payload: EventPayload::Unrecognized(payload),
        };
    }

    if RUN_NAMESPACES.iter().any(|ns| event_type.starts_with(ns)) {
        tracing::debug!(event_type, "unrecognized run event");
        return NormalizedEvent {
            origin: LineOrigin::Run,
            op: None,
            payload: EventPayload::Unrecognized(payload),
        };
    }

    tracing::debug!(event_type, "unclassified envelope");
    NormalizedEvent {
        origin: LineOrigin::Raw,
        op: None,
        payload: EventPayload::Unclassified(envelope.raw().clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn envelope(event_type: &str, payload: Value) -> Envelope {
        Envelope::new(event_type, Some(json!("2025-01-01T00:00:00Z")), payload)
    }

    #[test]
    fn test_console_line_scope_routing() {
        let build_line = envelope("console.line", json!({"scope": "build", "message": "x"}));
        let run_line = envelope("console.line", json!({"message": "y"}));

        assert_eq!(
            normalize(&build_line, StreamContext::Mixed).origin,
            LineOrigin::Build
        );
        assert_eq!(
            normalize(&run_line, StreamContext::Mixed).origin,
            LineOrigin::Run
        );
    }

    #[test]
    fn test_build_context_overrides_scope() {
        let line = envelope("console.line", json!({"scope": "run", "message": "x"}));
        assert_eq!(
            normalize(&line, StreamContext::Build).origin,
            LineOrigin::Build
        );
    }

    #[test]
    fn test_unknown_operation_in_known_namespace() {
        let event = normalize(
            &envelope("run.totally_unknown_event", json!({"foo": 1})),
            StreamContext::Mixed,
        );
        assert_eq!(event.origin, LineOrigin::Run);
        assert_eq!(event.op, None);
        assert_eq!(event.payload, EventPayload::Unrecognized(json!({"foo": 1})));

        let event = normalize(&envelope("build.mystery", Value::Null), StreamContext::Mixed);
        assert_eq!(event.origin, LineOrigin::Build);
    }

    #[test]
    fn test_unknown_namespace_is_raw() {
        let env = Envelope::from_value(json!({"type": "telemetry.ping", "payload": 3}));
        let event = normalize(&env, StreamContext::Mixed);
        assert_eq!(event.origin, LineOrigin::Raw);
        assert_eq!(event.payload, EventPayload::Unclassified(env.raw().clone()));
    }

    #[test]
    fn test_engine_and_config_namespaces_are_run_origin() {
        for event_type in ["engine.something_new", "config.reloaded"] {
            let event = normalize(&envelope(event_type, json!({})), StreamContext::Mixed);
            assert_eq!(event.origin, LineOrigin::Run, "{}", event_type);
        }
    }
}
