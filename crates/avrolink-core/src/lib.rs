//! # Avrolink Core
//!
//! Building blocks shared by Avrolink producers and consumers.
//!
//! This crate provides the pieces that do not talk to the network:
//!
//! - [`AvroCodec`] - Schema text compiled into a reusable encoder/decoder
//! - [`Envelope`] - Wire framing (magic byte + big-endian schema id + payload)
//! - [`Properties`] - Client property-file loader
//!
//! ## Example
//!
//! ```rust
//! use avrolink_core::{AvroCodec, Envelope};
//! use serde_json::json;
//!
//! let codec = AvroCodec::compile(r#"{
//!     "type": "record",
//!     "name": "Order",
//!     "fields": [{"name": "id", "type": "string"}]
//! }"#)?;
//!
//! let payload = codec.encode_json(&json!({"id": "order-1"}))?;
//! let record = Envelope::encode(100_001, &payload);
//!
//! let envelope = Envelope::decode(&record)?;
//! assert_eq!(envelope.schema_id, 100_001);
//! assert_eq!(codec.decode_json(envelope.payload)?, json!({"id": "order-1"}));
//! # Ok::<(), avrolink_core::Error>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod codec;
pub mod envelope;
pub mod error;
pub mod properties;


// Re-export main types at crate root
pub use codec::AvroCodec;
pub use envelope::{Envelope, EnvelopeRef};
pub use error::{Error, Result};
pub use properties::Properties;

/// Re-exported Avro value type used by [`AvroCodec`].
pub use apache_avro::types::Value;
