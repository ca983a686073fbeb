//! OTLP/HTTP JSON exporter
//!
//! Posts span batches to an OpenTelemetry collector's `/v1/traces`
//! endpoint using the protobuf-JSON encoding: 128-bit trace ids and
//! 64-bit span ids as lowercase hex, timestamps as unix-nano strings,
//! attributes as keyed `AnyValue`s. Recorded exceptions become the
//! standard `exception` span event.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use url::Url;
use uuid::Uuid;

use crate::export::{ExportError, SpanExporter};
use crate::span::{SpanRecord, SpanStatus};

const EXPORT_TIMEOUT: Duration = Duration::from_secs(10);

/// Exporter for OTLP-compatible collectors (e.g., an OpenTelemetry
/// Collector or Jaeger with OTLP intake).
#[derive(Debug)]
pub struct OtlpExporter {
    client: reqwest::Client,
    endpoint: Url,
}

impl OtlpExporter {
    pub fn new(endpoint: Url) -> Result<Self, ExportError> {
        let client = reqwest::Client::builder()
            .timeout(EXPORT_TIMEOUT)
            .build()?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl SpanExporter for OtlpExporter {
    async fn export(&self, batch: Vec<SpanRecord>) -> Result<(), ExportError> {
        let payload = otlp_payload(&batch);
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExportError::Rejected {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

/// Build the OTLP `ExportTraceServiceRequest` JSON body for a batch,
/// grouping spans by originating service into one resource each.
fn otlp_payload(batch: &[SpanRecord]) -> Value {
    let mut by_service: BTreeMap<&str, Vec<&SpanRecord>> = BTreeMap::new();
    for span in batch {
        by_service.entry(span.service.as_str()).or_default().push(span);
    }

    let resource_spans: Vec<Value> = by_service
        .into_iter()
        .map(|(service, spans)| {
            json!({
                "resource": {
                    "attributes": [
                        {"key": "service.name", "value": {"stringValue": service}},
                        {"key": "service.version", "value": {"stringValue": env!("CARGO_PKG_VERSION")}},
                    ]
                },
                "scopeSpans": [{
                    "scope": {"name": "shop-trace"},
                    "spans": spans.iter().map(|s| otlp_span(s)).collect::<Vec<_>>(),
                }]
            })
        })
        .collect();

    json!({ "resourceSpans": resource_spans })
}

fn otlp_span(span: &SpanRecord) -> Value {
    let end_nanos = span
        .ended_at
        .map(unix_nanos)
        .unwrap_or_else(|| "0".to_string());

    let mut obj = serde_json::Map::new();
    obj.insert("traceId".to_string(), json!(trace_id_hex(span.trace_id)));
    obj.insert("spanId".to_string(), json!(span_id_hex(span.span_id)));
    if let Some(parent) = span.parent_span_id {
        obj.insert("parentSpanId".to_string(), json!(span_id_hex(parent)));
    }
    obj.insert("name".to_string(), json!(span.name));
    obj.insert("kind".to_string(), json!(1));
    obj.insert(
        "startTimeUnixNano".to_string(),
        json!(unix_nanos(span.started_at)),
    );
    obj.insert("endTimeUnixNano".to_string(), json!(end_nanos));
    obj.insert("attributes".to_string(), attribute_list(&span.attributes));
    obj.insert("status".to_string(), status_value(span));

    if let Some(exception) = &span.exception {
        obj.insert(
            "events".to_string(),
            json!([{
                "timeUnixNano": end_nanos,
                "name": "exception",
                "attributes": [
                    {"key": "exception.type", "value": {"stringValue": exception.kind}},
                    {"key": "exception.message", "value": {"stringValue": exception.message}},
                ]
            }]),
        );
    }
    Value::Object(obj)
}

fn status_value(span: &SpanRecord) -> Value {
    let code = match span.status {
        SpanStatus::Unset => 0,
        SpanStatus::Ok => 1,
        SpanStatus::Error => 2,
    };
    match &span.error {
        Some(message) => json!({"code": code, "message": message}),
        None => json!({"code": code}),
    }
}

fn attribute_list(attributes: &std::collections::HashMap<String, Value>) -> Value {
    let sorted: BTreeMap<&String, &Value> = attributes.iter().collect();
    Value::Array(
        sorted
            .into_iter()
            .map(|(key, value)| json!({"key": key, "value": any_value(value)}))
            .collect(),
    )
}

/// Map a JSON value to the OTLP `AnyValue` encoding. Integers use the
/// string-encoded `intValue` form required by protobuf-JSON for 64-bit
/// fields.
fn any_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({}),
        Value::Bool(b) => json!({"boolValue": b}),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                json!({"intValue": i.to_string()})
            } else if let Some(u) = n.as_u64() {
                json!({"intValue": u.to_string()})
            } else {
                json!({"doubleValue": n.as_f64().unwrap_or(0.0)})
            }
        }
        Value::String(s) => json!({"stringValue": s}),
        Value::Array(items) => json!({
            "arrayValue": {"values": items.iter().map(any_value).collect::<Vec<_>>()}
        }),
        Value::Object(map) => json!({
            "kvlistValue": {"values": map.iter()
                .map(|(k, v)| json!({"key": k, "value": any_value(v)}))
                .collect::<Vec<_>>()}
        }),
    }
}

fn trace_id_hex(id: Uuid) -> String {
    hex::encode(id.as_bytes())
}

fn span_id_hex(id: Uuid) -> String {
    hex::encode(&id.as_bytes()[..8])
}

fn unix_nanos(time: DateTime<Utc>) -> String {
    time.timestamp_nanos_opt().unwrap_or(0).to_string()
}
