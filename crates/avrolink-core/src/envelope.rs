//! Wire envelope framing.
//!
//! Every record value travels as:
//!
//! ```text
//! ┌───────┬──────────────────────┬──────────────────────┐
//! │ 0x00  │ schema id (u32, BE)  │ Avro datum payload   │
//! └───────┴──────────────────────┴──────────────────────┘
//!   1 byte        4 bytes              remaining bytes
//! ```

use crate::error::{Error, Result};

/// Marker byte that opens every envelope.
pub const MAGIC_BYTE: u8 = 0x00;

/// Length of the envelope header (magic byte plus schema id).
pub const HEADER_LEN: usize = 5;

/// An owned wire envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Registry-assigned schema id used to encode the payload.
    pub schema_id: u32,
    /// Codec-encoded payload.
    pub payload: Vec<u8>,
}

/// A borrowed view of an envelope inside a record value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvelopeRef<'a> {
    /// Registry-assigned schema id used to encode the payload.
    pub schema_id: u32,
    /// Codec-encoded payload.
    pub payload: &'a [u8],
}

impl Envelope {
    /// Creates a new envelope.
    #[must_use]
    pub const fn new(schema_id: u32, payload: Vec<u8>) -> Self {
        Self { schema_id, payload }
    }

    /// Frames a payload with the given schema id.
    ///
    /// # Examples
    ///
    /// ```
    /// use avrolink_core::Envelope;
    ///
    /// let bytes = Envelope::encode(258, &[0xAA]);
    /// assert_eq!(bytes, vec![0x00, 0x00, 0x00, 0x01, 0x02, 0xAA]);
    /// ```
    #[must_use]
    pub fn encode(schema_id: u32, payload: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
        bytes.push(MAGIC_BYTE);
        bytes.extend_from_slice(&schema_id.to_be_bytes());
        bytes.extend_from_slice(payload);
        bytes
    }

    /// Splits record bytes into schema id and payload without copying.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEnvelope`] if the input is shorter than the
    /// header or does not start with [`MAGIC_BYTE`].
    pub fn decode(bytes: &[u8]) -> Result<EnvelopeRef<'_>> {
        let schema_id = peek_schema_id(bytes)?;
        Ok(EnvelopeRef {
            schema_id,
            payload: &bytes[HEADER_LEN..],
        })
    }

    /// Serializes this envelope to bytes.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        Self::encode(self.schema_id, &self.payload)
    }
}

impl EnvelopeRef<'_> {
    /// Copies the view into an owned [`Envelope`].
    #[must_use]
    pub fn to_envelope(&self) -> Envelope {
        Envelope::new(self.schema_id, self.payload.to_vec())
    }
}

/// Reads the schema id from the envelope header.
///
/// # Errors
///
/// Returns [`Error::InvalidEnvelope`] if the header is truncated or the magic
/// byte is wrong.
pub fn peek_schema_id(bytes: &[u8]) -> Result<u32> {
    if bytes.len() < HEADER_LEN {
        return Err(Error::InvalidEnvelope {
            reason: format!(
                "expected at least {HEADER_LEN} bytes, got {}",
                bytes.len()
            ),
        });
    }

    if bytes[0] != MAGIC_BYTE {
        return Err(Error::InvalidEnvelope {
            reason: format!("unknown magic byte {:#04x}", bytes[0]),
        });
    }

    let mut id = [0u8; 4];
    id.copy_from_slice(&bytes[1..HEADER_LEN]);
    Ok(u32::from_be_bytes(id))
}
