//! Compiled Avro codecs.
//!
//! An [`AvroCodec`] is built once from raw schema text and can then encode and
//! decode any number of values. Payloads are raw Avro datums (no object
//! container header), as carried inside a wire [`Envelope`](crate::Envelope).

use std::io::Cursor;

use apache_avro::rabin::Rabin;
use apache_avro::types::Value;
use apache_avro::{from_avro_datum, to_avro_datum, Schema};

use crate::error::{Error, Result};

/// A reusable encoder/decoder derived from a schema text.
#[derive(Debug, Clone)]
pub struct AvroCodec {
    schema_text: String,
    schema: Schema,
}

impl AvroCodec {
    /// Compiles raw schema text into a codec.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SchemaCompile`] if the text is not a valid Avro schema.
    ///
    /// # Examples
    ///
    /// ```
    /// use avrolink_core::AvroCodec;
    ///
    /// let codec = AvroCodec::compile(r#"{"type": "string"}"#)?;
    /// assert_eq!(codec.schema_text(), r#"{"type": "string"}"#);
    /// # Ok::<(), avrolink_core::Error>(())
    /// ```
    pub fn compile(schema_text: impl Into<String>) -> Result<Self> {
        let schema_text = schema_text.into();
        let schema =
            Schema::parse_str(&schema_text).map_err(|source| Error::SchemaCompile { source })?;

        Ok(Self {
            schema_text,
            schema,
        })
    }

    /// Returns the raw schema text this codec was compiled from.
    #[must_use]
    pub fn schema_text(&self) -> &str {
        &self.schema_text
    }

    /// Returns the parsed schema.
    #[must_use]
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the Rabin fingerprint of the schema's canonical form, hex encoded.
    ///
    /// Two schema texts that differ only in whitespace or attribute order share
    /// a fingerprint.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        hex::encode(self.schema.fingerprint::<Rabin>().bytes)
    }

    /// Encodes a value into a raw Avro datum.
    ///
    /// The value is resolved against the schema first, so a `Map` can stand in
    /// for a record and narrower numeric types are promoted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encode`] if the value does not fit the schema.
    pub fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        let resolved = value
            .clone()
            .resolve(&self.schema)
            .map_err(|e| Error::Encode {
                reason: e.to_string(),
            })?;

        to_avro_datum(&self.schema, resolved).map_err(|e| Error::Encode {
            reason: e.to_string(),
        })
    }

    /// Decodes a raw Avro datum.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the bytes cannot be read with this schema
    /// or if bytes remain after the datum.
    pub fn decode(&self, payload: &[u8]) -> Result<Value> {
        let mut reader = Cursor::new(payload);
        let value =
            from_avro_datum(&self.schema, &mut reader, None).map_err(|e| Error::Decode {
                reason: e.to_string(),
            })?;

        let consumed = usize::try_from(reader.position()).unwrap_or(usize::MAX);
        if consumed != payload.len() {
            return Err(Error::Decode {
                reason: format!(
                    "{} trailing bytes after datum",
                    payload.len().saturating_sub(consumed)
                ),
            });
        }

        Ok(value)
    }

    /// Encodes a JSON value.
    ///
    /// JSON objects resolve onto records, integers onto `int`/`long`/`double`
    /// as the schema requires.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encode`] if the value does not fit the schema.
    pub fn encode_json(&self, value: &serde_json::Value) -> Result<Vec<u8>> {
        self.encode(&Value::from(value.clone()))
    }

    /// Decodes a raw Avro datum into a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the bytes cannot be decoded or the decoded
    /// value has no JSON representation.
    pub fn decode_json(&self, payload: &[u8]) -> Result<serde_json::Value> {
        let value = self.decode(payload)?;
        serde_json::Value::try_from(value).map_err(|e| Error::Decode {
            reason: e.to_string(),
        })
    }
}
