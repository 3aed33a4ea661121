//! The wire capability behind the table layer.
//!
//! [`StoreClient`] is the seam between table handles and DynamoDB: the eight
//! request/response exchanges the layer makes, and nothing else. The
//! production implementation [`DynamoStore`] wraps the AWS SDK client; tests
//! substitute an in-memory double.

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::{
    AttributeValue, AttributeValueUpdate, ReturnConsumedCapacity, ReturnItemCollectionMetrics,
    ReturnValue, TableStatus,
};
use std::collections::HashMap;

use crate::client::{ClientConfig, build_client};
use crate::errors::{Result, map_sdk_error};
use crate::schema::Schema;

/// An untyped item: attribute name → value, forwarded verbatim.
pub type Item = HashMap<String, AttributeValue>;

/// Options for point lookups. The one operation with caller-configurable
/// consumed-capacity reporting.
#[derive(Debug, Clone, Default)]
pub struct GetOptions {
    /// Legacy projection: plain attribute-name list.
    pub attributes: Option<Vec<String>>,
    /// Strongly consistent read.
    pub consistent: Option<bool>,
    /// Expression attribute-name aliases (`#n` → name).
    pub attribute_names: Option<HashMap<String, String>>,
    /// Projection expression.
    pub projection: Option<String>,
    /// Consumed-capacity reporting level.
    pub capacity: Option<ReturnConsumedCapacity>,
}

/// The remote store's item and table APIs, one method per wire call.
///
/// Implementations report a missing table as
/// [`Error::ResourceNotFound`](crate::Error::ResourceNotFound); the table
/// layer's lazy-provisioning retry matches on that variant.
#[async_trait]
pub trait StoreClient: Send + Sync {
    async fn create_table(&self, table: &str, schema: &Schema) -> Result<()>;
    async fn describe_table(&self, table: &str) -> Result<Option<TableStatus>>;
    async fn delete_table(&self, table: &str) -> Result<()>;
    async fn scan(&self, table: &str) -> Result<Vec<Item>>;
    async fn get_item(&self, table: &str, key: &Item, opts: &GetOptions) -> Result<Option<Item>>;
    async fn put_item(
        &self,
        table: &str,
        item: &Item,
        returns: Option<ReturnValue>,
    ) -> Result<Option<Item>>;
    async fn update_item(
        &self,
        table: &str,
        key: &Item,
        actions: &HashMap<String, AttributeValueUpdate>,
        returns: Option<ReturnValue>,
    ) -> Result<Option<Item>>;
    async fn delete_item(
        &self,
        table: &str,
        key: &Item,
        returns: Option<ReturnValue>,
    ) -> Result<Option<Item>>;
}

/// Production [`StoreClient`] over the AWS SDK DynamoDB client.
#[derive(Debug, Clone)]
pub struct DynamoStore {
    client: Client,
}

impl DynamoStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build the underlying AWS client from `config` and wrap it.
    pub async fn connect(config: ClientConfig) -> Self {
        Self::new(build_client(config).await)
    }
}

#[async_trait]
impl StoreClient for DynamoStore {
    async fn create_table(&self, table: &str, schema: &Schema) -> Result<()> {
        self.client
            .create_table()
            .table_name(table)
            .set_attribute_definitions(Some(schema.attribute_definitions()?))
            .set_key_schema(Some(schema.key_schema()?))
            .billing_mode(schema.billing_mode())
            .set_provisioned_throughput(schema.provisioned_throughput()?)
            .set_sse_specification(schema.sse_specification())
            .send()
            .await
            .map_err(|e| map_sdk_error(e, table))?;
        Ok(())
    }

    async fn describe_table(&self, table: &str) -> Result<Option<TableStatus>> {
        let output = self
            .client
            .describe_table()
            .table_name(table)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, table))?;
        Ok(output.table.and_then(|t| t.table_status))
    }

    async fn delete_table(&self, table: &str) -> Result<()> {
        self.client
            .delete_table()
            .table_name(table)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, table))?;
        Ok(())
    }

    async fn scan(&self, table: &str) -> Result<Vec<Item>> {
        // Single page only: LastEvaluatedKey is not followed.
        let output = self
            .client
            .scan()
            .table_name(table)
            .return_consumed_capacity(ReturnConsumedCapacity::None)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, table))?;
        Ok(output.items.unwrap_or_default())
    }

    async fn get_item(&self, table: &str, key: &Item, opts: &GetOptions) -> Result<Option<Item>> {
        let output = self
            .client
            .get_item()
            .table_name(table)
            .set_key(Some(key.clone()))
            .set_attributes_to_get(opts.attributes.clone())
            .set_consistent_read(opts.consistent)
            .set_expression_attribute_names(opts.attribute_names.clone())
            .set_projection_expression(opts.projection.clone())
            .set_return_consumed_capacity(opts.capacity.clone())
            .send()
            .await
            .map_err(|e| map_sdk_error(e, table))?;
        Ok(output.item)
    }

    async fn put_item(
        &self,
        table: &str,
        item: &Item,
        returns: Option<ReturnValue>,
    ) -> Result<Option<Item>> {
        let output = self
            .client
            .put_item()
            .table_name(table)
            .set_item(Some(item.clone()))
            .set_return_values(returns)
            .return_consumed_capacity(ReturnConsumedCapacity::None)
            .return_item_collection_metrics(ReturnItemCollectionMetrics::None)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, table))?;
        Ok(output.attributes)
    }

    async fn update_item(
        &self,
        table: &str,
        key: &Item,
        actions: &HashMap<String, AttributeValueUpdate>,
        returns: Option<ReturnValue>,
    ) -> Result<Option<Item>> {
        let output = self
            .client
            .update_item()
            .table_name(table)
            .set_key(Some(key.clone()))
            .set_attribute_updates(Some(actions.clone()))
            .set_return_values(returns)
            .return_consumed_capacity(ReturnConsumedCapacity::None)
            .return_item_collection_metrics(ReturnItemCollectionMetrics::None)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, table))?;
        Ok(output.attributes)
    }

    async fn delete_item(
        &self,
        table: &str,
        key: &Item,
        returns: Option<ReturnValue>,
    ) -> Result<Option<Item>> {
        let output = self
            .client
            .delete_item()
            .table_name(table)
            .set_key(Some(key.clone()))
            .set_return_values(returns)
            .return_consumed_capacity(ReturnConsumedCapacity::None)
            .return_item_collection_metrics(ReturnItemCollectionMetrics::None)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, table))?;
        Ok(output.attributes)
    }
}
