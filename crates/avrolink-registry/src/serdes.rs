//! Record serializers for producer and consumer loops.
//!
//! A [`RecordSerializer`] turns values into enveloped record bytes ready for
//! the broker, and a [`RecordDeserializer`] reverses it. Both go through a
//! shared [`RegistryClient`], so enable caching on the client to keep the
//! registry off the hot path.

use std::sync::Arc;

use avrolink_core::{AvroCodec, Envelope, Value};

use crate::client::RegistryClient;
use crate::error::{RegistryError, Result};

/// Encodes record values for a single subject.
#[derive(Debug, Clone)]
pub struct RecordSerializer {
    client: Arc<RegistryClient>,
    subject: String,
    codec: Arc<AvroCodec>,
}

impl RecordSerializer {
    /// Creates a serializer for `subject` using the given writer schema.
    ///
    /// The schema is compiled here so a bad schema fails before any record is
    /// produced. Registration happens on the first serialized record.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Compile`] if the schema text is invalid.
    pub fn new(
        client: Arc<RegistryClient>,
        subject: impl Into<String>,
        schema_text: impl Into<String>,
    ) -> Result<Self> {
        let codec =
            AvroCodec::compile(schema_text).map_err(|source| RegistryError::Compile { source })?;

        Ok(Self {
            client,
            subject: subject.into(),
            codec: Arc::new(codec),
        })
    }

    /// Returns the subject records are registered under.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Returns the writer codec.
    #[must_use]
    pub const fn codec(&self) -> &Arc<AvroCodec> {
        &self.codec
    }

    /// Encodes a value and frames it with the subject's schema id.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Codec`] if the value does not fit the schema, or
    /// any error from [`RegistryClient::create_subject`].
    pub async fn serialize(&self, value: &Value) -> Result<Vec<u8>> {
        let payload = self
            .codec
            .encode(value)
            .map_err(|source| RegistryError::Codec { source })?;
        self.frame(&payload).await
    }

    /// Encodes a JSON value and frames it with the subject's schema id.
    ///
    /// # Errors
    ///
    /// Same as [`serialize`](Self::serialize).
    pub async fn serialize_json(&self, value: &serde_json::Value) -> Result<Vec<u8>> {
        let payload = self
            .codec
            .encode_json(value)
            .map_err(|source| RegistryError::Codec { source })?;
        self.frame(&payload).await
    }

    async fn frame(&self, payload: &[u8]) -> Result<Vec<u8>> {
        let schema_id = self
            .client
            .create_subject(&self.subject, self.codec.schema_text())
            .await?;
        Ok(Envelope::encode(schema_id, payload))
    }
}

/// Decodes enveloped record bytes using the schema id they carry.
#[derive(Debug, Clone)]
pub struct RecordDeserializer {
    client: Arc<RegistryClient>,
}

impl RecordDeserializer {
    /// Creates a deserializer backed by the given client.
    #[must_use]
    pub const fn new(client: Arc<RegistryClient>) -> Self {
        Self { client }
    }

    /// Decodes record bytes into an Avro value.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Envelope`] for malformed framing,
    /// [`RegistryError::Codec`] if the payload does not match the schema, or
    /// any error from [`RegistryClient::get_schema`].
    pub async fn deserialize(&self, bytes: &[u8]) -> Result<Value> {
        let envelope = Envelope::decode(bytes).map_err(|source| RegistryError::Envelope { source })?;
        let codec = self.client.get_schema(envelope.schema_id).await?;
        codec
            .decode(envelope.payload)
            .map_err(|source| RegistryError::Codec { source })
    }

    /// Decodes record bytes into a JSON value.
    ///
    /// # Errors
    ///
    /// Same as [`deserialize`](Self::deserialize).
    pub async fn deserialize_json(&self, bytes: &[u8]) -> Result<serde_json::Value> {
        let envelope = Envelope::decode(bytes).map_err(|source| RegistryError::Envelope { source })?;
        let codec = self.client.get_schema(envelope.schema_id).await?;
        codec
            .decode_json(envelope.payload)
            .map_err(|source| RegistryError::Codec { source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RegistryConfig;
    use crate::transport::{RegistryRequest, RegistryResponse, Transport};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use reqwest::{Method, StatusCode};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const ORDER_SCHEMA: &str = r#"{"type":"record","name":"Order","fields":[{"name":"id","type":"string"},{"name":"date","type":"long"},{"name":"amount","type":"double"}]}"#;

    /// Minimal registry: assigns ids in registration order.
    #[derive(Debug, Default)]
    struct FakeRegistry {
        schemas: Mutex<Vec<String>>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Transport for FakeRegistry {
        async fn send(&self, request: RegistryRequest) -> Result<RegistryResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let segments: Vec<&str> = request.segments.iter().map(String::as_str).collect();

            match segments.as_slice() {
                ["subjects", _, "versions"] if request.method == Method::POST => {
                    let body: serde_json::Value =
                        serde_json::from_slice(request.body.as_deref().unwrap_or_default())?;
                    let schema = body["schema"].as_str().unwrap_or_default().to_string();
                    let mut schemas = self.schemas.lock();
                    let id = match schemas.iter().position(|s| *s == schema) {
                        Some(index) => index + 1,
                        None => {
                            schemas.push(schema);
                            schemas.len()
                        }
                    };
                    Ok(RegistryResponse::new(
                        StatusCode::OK,
                        json!({ "id": id }).to_string(),
                    ))
                }
                ["schemas", "ids", id] if request.method == Method::GET => {
                    let schemas = self.schemas.lock();
                    let found = id
                        .parse::<usize>()
                        .ok()
                        .and_then(|id| id.checked_sub(1))
                        .and_then(|index| schemas.get(index));
                    Ok(found.map_or_else(
                        || {
                            RegistryResponse::new(
                                StatusCode::NOT_FOUND,
                                r#"{"error_code": 40403, "message": "Schema not found"}"#,
                            )
                        },
                        |schema| {
                            RegistryResponse::new(
                                StatusCode::OK,
                                json!({ "schema": schema }).to_string(),
                            )
                        },
                    ))
                }
                _ => Ok(RegistryResponse::new(StatusCode::NOT_FOUND, "")),
            }
        }
    }

    fn shared_client(registry: &Arc<FakeRegistry>) -> Arc<RegistryClient> {
        let config = RegistryConfig::new("http://registry.test").with_caching(true);
        Arc::new(RegistryClient::with_transport(
            config,
            Arc::clone(registry) as Arc<dyn Transport>,
        ))
    }

    #[tokio::test]
    async fn test_serialize_then_deserialize_json() {
        let registry = Arc::new(FakeRegistry::default());
        let client = shared_client(&registry);
        let serializer = RecordSerializer::new(Arc::clone(&client), "orders-value", ORDER_SCHEMA).unwrap();
        let deserializer = RecordDeserializer::new(client);

        let order = json!({"id": "order-1", "date": 1_700_000_000_000_i64, "amount": 12.5});
        let bytes = serializer.serialize_json(&order).await.unwrap();

        assert_eq!(bytes[0], 0x00);
        assert_eq!(avrolink_core::envelope::peek_schema_id(&bytes).unwrap(), 1);
        assert_eq!(deserializer.deserialize_json(&bytes).await.unwrap(), order);
    }

    #[tokio::test]
    async fn test_serializer_registers_once() {
        let registry = Arc::new(FakeRegistry::default());
        let client = shared_client(&registry);
        let serializer = RecordSerializer::new(client, "orders-value", ORDER_SCHEMA).unwrap();

        for i in 0..5 {
            let order = json!({"id": format!("order-{i}"), "date": i, "amount": 1.0});
            serializer.serialize_json(&order).await.unwrap();
        }

        assert_eq!(registry.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_serialize_avro_value() {
        let registry = Arc::new(FakeRegistry::default());
        let client = shared_client(&registry);
        let serializer = RecordSerializer::new(Arc::clone(&client), "orders-value", ORDER_SCHEMA).unwrap();
        let deserializer = RecordDeserializer::new(client);

        let order = Value::Record(vec![
            ("id".to_string(), Value::String("order-9".to_string())),
            ("date".to_string(), Value::Long(9)),
            ("amount".to_string(), Value::Double(9.5)),
        ]);
        let bytes = serializer.serialize(&order).await.unwrap();

        assert_eq!(deserializer.deserialize(&bytes).await.unwrap(), order);
    }

    #[test]
    fn test_serializer_rejects_bad_schema() {
        let registry = Arc::new(FakeRegistry::default());
        let result = RecordSerializer::new(shared_client(&registry), "orders-value", "{");
        assert!(matches!(result, Err(RegistryError::Compile { .. })));
    }

    #[tokio::test]
    async fn test_serialize_mismatched_record_skips_registry() {
        let registry = Arc::new(FakeRegistry::default());
        let serializer =
            RecordSerializer::new(shared_client(&registry), "orders-value", ORDER_SCHEMA).unwrap();

        let err = serializer.serialize_json(&json!({"id": 1})).await.unwrap_err();

        assert!(matches!(err, RegistryError::Codec { .. }));
        assert_eq!(registry.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_deserialize_bad_envelope() {
        let registry = Arc::new(FakeRegistry::default());
        let deserializer = RecordDeserializer::new(shared_client(&registry));

        let err = deserializer.deserialize(&[0x01, 0, 0, 0, 1]).await.unwrap_err();

        assert!(matches!(err, RegistryError::Envelope { .. }));
        assert_eq!(registry.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_deserialize_unknown_schema_id() {
        let registry = Arc::new(FakeRegistry::default());
        let deserializer = RecordDeserializer::new(shared_client(&registry));

        let err = deserializer
            .deserialize(&Envelope::encode(42, &[0x02]))
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_deserialize_payload_mismatch() {
        let registry = Arc::new(FakeRegistry::default());
        let client = shared_client(&registry);
        let id = client.create_subject("orders-value", ORDER_SCHEMA).await.unwrap();
        let deserializer = RecordDeserializer::new(client);

        let err = deserializer
            .deserialize(&Envelope::encode(id, &[0xFF]))
            .await
            .unwrap_err();

        assert!(matches!(err, RegistryError::Codec { .. }));
    }
}
