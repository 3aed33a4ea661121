//! Table schema model and its translation into create-table wire types.
//!
//! A [`Schema`] declares the key attributes, optional provisioned throughput,
//! and an optional KMS key for server-side encryption. The key shape is not
//! validated locally — a schema with no hash key or two range keys surfaces
//! as a store-side `ValidationException`.

use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ProvisionedThroughput,
    ScalarAttributeType, SseSpecification, SseType,
};
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// Scalar type of a key attribute: string, number, or binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeType {
    S,
    N,
    B,
}

impl From<AttributeType> for ScalarAttributeType {
    fn from(kind: AttributeType) -> Self {
        match kind {
            AttributeType::S => ScalarAttributeType::S,
            AttributeType::N => ScalarAttributeType::N,
            AttributeType::B => ScalarAttributeType::B,
        }
    }
}

/// Provisioned capacity: a single number applies to both reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Throughput {
    Single(i64),
    ReadWrite { read: i64, write: i64 },
}

impl Throughput {
    fn read(&self) -> i64 {
        match *self {
            Throughput::Single(n) => n,
            Throughput::ReadWrite { read, .. } => read,
        }
    }

    fn write(&self) -> i64 {
        match *self {
            Throughput::Single(n) => n,
            Throughput::ReadWrite { write, .. } => write,
        }
    }
}

impl From<i64> for Throughput {
    fn from(n: i64) -> Self {
        Throughput::Single(n)
    }
}

impl From<(i64, i64)> for Throughput {
    fn from((read, write): (i64, i64)) -> Self {
        Throughput::ReadWrite { read, write }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct KeyAttribute {
    name: String,
    #[serde(rename = "type")]
    kind: AttributeType,
    #[serde(default)]
    range: bool,
}

/// Declarative table definition.
///
/// Attributes keep declaration order. One attribute should be the hash
/// (partition) key and at most one the range (sort) key; this is the store's
/// rule, not enforced here.
///
/// # Examples
///
/// ```
/// use dynotable::{AttributeType, Schema};
///
/// let schema = Schema::new()
///     .hash_key("user_id", AttributeType::S)
///     .range_key("created_at", AttributeType::N)
///     .throughput((5, 10));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default)]
    attributes: Vec<KeyAttribute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    throughput: Option<Throughput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    kms: Option<String>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the partition key.
    pub fn hash_key(mut self, name: impl Into<String>, kind: AttributeType) -> Self {
        self.attributes.push(KeyAttribute {
            name: name.into(),
            kind,
            range: false,
        });
        self
    }

    /// Declare the sort key.
    pub fn range_key(mut self, name: impl Into<String>, kind: AttributeType) -> Self {
        self.attributes.push(KeyAttribute {
            name: name.into(),
            kind,
            range: true,
        });
        self
    }

    /// Use provisioned billing with the given capacity. Without this the
    /// table is created on-demand (pay per request).
    pub fn throughput(mut self, throughput: impl Into<Throughput>) -> Self {
        self.throughput = Some(throughput.into());
        self
    }

    /// Encrypt the table with the given KMS key.
    pub fn kms_key(mut self, key_id: impl Into<String>) -> Self {
        self.kms = Some(key_id.into());
        self
    }

    /// One attribute definition per declared attribute.
    pub fn attribute_definitions(&self) -> Result<Vec<AttributeDefinition>> {
        self.attributes
            .iter()
            .map(|attr| {
                AttributeDefinition::builder()
                    .attribute_name(&attr.name)
                    .attribute_type(attr.kind.into())
                    .build()
                    .map_err(|e| Error::BuildRequest(e.to_string()))
            })
            .collect()
    }

    /// One key-schema entry per declared attribute: RANGE if marked, else HASH.
    pub fn key_schema(&self) -> Result<Vec<KeySchemaElement>> {
        self.attributes
            .iter()
            .map(|attr| {
                KeySchemaElement::builder()
                    .attribute_name(&attr.name)
                    .key_type(if attr.range {
                        KeyType::Range
                    } else {
                        KeyType::Hash
                    })
                    .build()
                    .map_err(|e| Error::BuildRequest(e.to_string()))
            })
            .collect()
    }

    pub fn billing_mode(&self) -> BillingMode {
        if self.throughput.is_some() {
            BillingMode::Provisioned
        } else {
            BillingMode::PayPerRequest
        }
    }

    pub fn provisioned_throughput(&self) -> Result<Option<ProvisionedThroughput>> {
        self.throughput
            .map(|t| {
                ProvisionedThroughput::builder()
                    .read_capacity_units(t.read())
                    .write_capacity_units(t.write())
                    .build()
                    .map_err(|e| Error::BuildRequest(e.to_string()))
            })
            .transpose()
    }

    pub fn sse_specification(&self) -> Option<SseSpecification> {
        self.kms.as_ref().map(|key_id| {
            SseSpecification::builder()
                .enabled(true)
                .sse_type(SseType::Kms)
                .kms_master_key_id(key_id)
                .build()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_schema_has_one_hash_and_optional_range() {
        let schema = Schema::new()
            .hash_key("id", AttributeType::S)
            .range_key("ts", AttributeType::N);

        let keys = schema.key_schema().unwrap();
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].attribute_name(), "id");
        assert_eq!(keys[0].key_type(), &KeyType::Hash);
        assert_eq!(keys[1].attribute_name(), "ts");
        assert_eq!(keys[1].key_type(), &KeyType::Range);

        let defs = schema.attribute_definitions().unwrap();
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].attribute_type(), &ScalarAttributeType::S);
        assert_eq!(defs[1].attribute_type(), &ScalarAttributeType::N);
    }

    #[test]
    fn hash_only_schema() {
        let schema = Schema::new().hash_key("pk", AttributeType::B);
        let keys = schema.key_schema().unwrap();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].key_type(), &KeyType::Hash);
        assert_eq!(
            schema.attribute_definitions().unwrap()[0].attribute_type(),
            &ScalarAttributeType::B
        );
    }

    #[test]
    fn billing_is_on_demand_without_throughput() {
        let schema = Schema::new().hash_key("id", AttributeType::S);
        assert_eq!(schema.billing_mode(), BillingMode::PayPerRequest);
        assert!(schema.provisioned_throughput().unwrap().is_none());
    }

    #[test]
    fn single_number_throughput_applies_to_reads_and_writes() {
        let schema = Schema::new().hash_key("id", AttributeType::S).throughput(7);
        assert_eq!(schema.billing_mode(), BillingMode::Provisioned);

        let tp = schema.provisioned_throughput().unwrap().unwrap();
        assert_eq!(tp.read_capacity_units(), 7);
        assert_eq!(tp.write_capacity_units(), 7);
    }

    #[test]
    fn split_throughput() {
        let schema = Schema::new()
            .hash_key("id", AttributeType::S)
            .throughput((3, 9));
        let tp = schema.provisioned_throughput().unwrap().unwrap();
        assert_eq!(tp.read_capacity_units(), 3);
        assert_eq!(tp.write_capacity_units(), 9);
    }

    #[test]
    fn kms_key_enables_sse() {
        let schema = Schema::new()
            .hash_key("id", AttributeType::S)
            .kms_key("alias/my-key");

        let sse = schema.sse_specification().unwrap();
        assert_eq!(sse.enabled(), Some(true));
        assert_eq!(sse.sse_type(), Some(&SseType::Kms));
        assert_eq!(sse.kms_master_key_id(), Some("alias/my-key"));

        assert!(
            Schema::new()
                .hash_key("id", AttributeType::S)
                .sse_specification()
                .is_none()
        );
    }

    #[test]
    fn schema_round_trips_through_json() {
        let schema = Schema::new()
            .hash_key("id", AttributeType::S)
            .range_key("ts", AttributeType::N)
            .throughput((2, 4))
            .kms_key("alias/k");

        let json = serde_json::to_string(&schema).unwrap();
        let back: Schema = serde_json::from_str(&json).unwrap();
        assert_eq!(back, schema);
    }
}
