//! # Avrolink Registry
//!
//! Caching client for Confluent-compatible Schema Registries.
//!
//! Producers register their writer schema under a subject and receive the
//! schema id to stamp into each record envelope. Consumers read that id back
//! and resolve it to a codec. Both lookups can be served from an in-process
//! cache once they have succeeded.
//!
//! ## Features
//!
//! - **Schema lookup**: `GET /schemas/ids/{id}` compiled into an [`AvroCodec`](avrolink_core::AvroCodec)
//! - **Subject registration**: `POST /subjects/{subject}/versions`
//! - **Two-way cache**: id → codec and subject → id, opt-in
//! - **Bounded calls**: every request is cut off at a short timeout
//! - **Record serdes**: envelope + codec + registry in one call
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use avrolink_registry::{RecordDeserializer, RegistryClient, RegistryConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = RegistryClient::new(RegistryConfig::new("https://registry.example.com"))?;
//!     client.set_credentials("api-key", "api-secret");
//!     client.enable_caching(true);
//!
//!     let deserializer = RecordDeserializer::new(Arc::new(client));
//!     let record = deserializer.deserialize_json(&[0, 0, 0, 0, 1, 2, 120]).await?;
//!     println!("{record}");
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    RegistryClient                           │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐  │
//! │  │  Transport  │  │ SchemaCache │  │      AvroCodec      │  │
//! │  │  (HTTP)     │  │ (id, subj)  │  │     (compiler)      │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Schema Registry                         │
//! └─────────────────────────────────────────────────────────────┘
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod cache;
mod client;
mod config;
mod error;
mod serdes;
mod transport;

pub use cache::SchemaCache;
pub use client::RegistryClient;
pub use config::{Credentials, RegistryConfig, DEFAULT_TIMEOUT};
pub use error::{RegistryError, Result};
pub use serdes::{RecordDeserializer, RecordSerializer};
pub use transport::{HttpTransport, RegistryRequest, RegistryResponse, Transport, CONTENT_TYPE};
