//! # dynotable
//!
//! A lazy-provisioning table layer over DynamoDB. Tables are plain handles
//! looked up by name; a data operation that hits a missing table creates it
//! from the handle's schema, waits for it to become active, and retries
//! exactly once. A typed [`Update`] directive translates set/push/pop/unset
//! changes into the store's update-action vocabulary.
//!
//! ## Quick start
//!
//! ```no_run
//! use dynotable::{AttributeType, GetOptions, Registry, Schema, conversions};
//! use serde_json::json;
//!
//! # async fn run() -> dynotable::Result<()> {
//! let registry = Registry::connect().await;
//!
//! let users = registry.table("users");
//! users.define(Schema::new().hash_key("user_id", AttributeType::S));
//!
//! // First use creates the table, waits for it to go active, then retries.
//! let item = conversions::to_item(&json!({"user_id": "alice", "age": 30}))?;
//! users.put(item, None).await?;
//!
//! let key = conversions::to_item(&json!({"user_id": "alice"}))?;
//! let found = users.get(key, GetOptions::default()).await?;
//! assert!(found.is_some());
//! # Ok(()) }
//! ```
//!
//! Tests inject their own [`StoreClient`] through
//! [`Registry::builder`](Registry::builder); production uses the AWS
//! SDK-backed [`DynamoStore`].

pub mod client;
pub mod conversions;
pub mod errors;
pub mod registry;
pub mod schema;
pub mod store;
pub mod table;
pub mod update;

pub use client::{ClientConfig, build_client};
pub use errors::{Error, Result};
pub use registry::{Registry, RegistryBuilder};
pub use schema::{AttributeType, Schema, Throughput};
pub use store::{DynamoStore, GetOptions, Item, StoreClient};
pub use table::{Table, Wait};
pub use update::Update;
