use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

// NOTE: Envelope Design
//
// The transport hands us `{type, created_at, run_id?, payload?}`, but nothing
// guarantees that shape. Older producers wrote `timestamp` / `correlation_id`,
// some messages arrive as bare strings, and payloads may be any JSON value.
//
// Parsing therefore never fails: whatever arrives becomes an Envelope, and the
// original JSON is retained untouched so diagnostic lines can point back at
// exactly what was received. Fields are read-only after construction.

/// Epoch values at or above this are milliseconds, below are seconds.
const EPOCH_MILLIS_THRESHOLD: f64 = 1e12;

/// One telemetry message.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    event_type: String,
    created_at: Option<Value>,
    correlation_id: Option<String>,
    payload: Value,
    raw: Value,
}

impl Envelope {
    /// Build an envelope from its parts. The retained raw JSON mirrors the wire shape.
    pub fn new(event_type: impl Into<String>, created_at: Option<Value>, payload: Value) -> Self {
        Self::with_run_id(event_type, created_at, None, payload)
    }

    pub fn with_run_id(
        event_type: impl Into<String>,
        created_at: Option<Value>,
        correlation_id: Option<String>,
        payload: Value,
    ) -> Self {
        let event_type = event_type.into();

        let mut raw = Map::new();
        raw.insert("type".to_string(), Value::String(event_type.clone()));
        if let Some(ts) = &created_at {
            raw.insert("created_at".to_string(), ts.clone());
        }
        if let Some(run_id) = &correlation_id {
            raw.insert("run_id".to_string(), Value::String(run_id.clone()));
        }
        if !payload.is_null() {
            raw.insert("payload".to_string(), payload.clone());
        }

        Self {
            event_type,
            created_at,
            correlation_id,
            payload,
            raw: Value::Object(raw),
        }
    }

    /// Lift any JSON value into an envelope.
    ///
    /// Non-object values and objects without a string `type` yield an empty
    /// type, which classification treats as raw.
    pub fn from_value(value: Value) -> Self {
        let Value::Object(map) = &value else {
            return Self {
                event_type: String::new(),
                created_at: None,
                correlation_id: None,
                payload: Value::Null,
                raw: value,
            };
        };

        let event_type = map
            .get("type")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        let created_at = map
            .get("created_at")
            .or_else(|| map.get("timestamp"))
            .filter(|v| !v.is_null())
            .cloned();

        let correlation_id = map
            .get("run_id")
            .or_else(|| map.get("correlation_id"))
            .and_then(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            });

        let payload = map.get("payload").cloned().unwrap_or(Value::Null);

        Self {
            event_type,
            created_at,
            correlation_id,
            payload,
            raw: value,
        }
    }

    /// Strictly parse a JSON document, then lift it leniently.
    pub fn from_json_str(input: &str) -> crate::Result<Self> {
        let value: Value = serde_json::from_str(input)?;
        Ok(Self::from_value(value))
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn created_at(&self) -> Option<&Value> {
        self.created_at.as_ref()
    }

    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// The message exactly as received.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Parsed event time, if the envelope carries a usable one.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_ref().and_then(parse_event_time)
    }
}

impl Serialize for Envelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Envelope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Envelope::from_value)
    }
}

/// Parse an ISO-8601 string or an epoch number (seconds or milliseconds).
pub fn parse_event_time(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }
            // Producers occasionally drop the offset; treat those as UTC
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
                return Some(naive.and_utc());
            }
            s.parse::<f64>().ok().and_then(from_epoch)
        }
        Value::Number(n) => n.as_f64().and_then(from_epoch),
        _ => None,
    }
}

fn from_epoch(value: f64) -> Option<DateTime<Utc>> {
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    let millis = if value >= EPOCH_MILLIS_THRESHOLD {
        value
    } else {
        value * 1000.0
    };
    DateTime::from_timestamp_millis(millis as i64)
}
