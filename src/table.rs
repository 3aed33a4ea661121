//! Table handles: per-table operations with lazy provisioning.
//!
//! A [`Table`] is a plain data structure bound to one table name and the
//! shared store client. Data operations are thin request pass-throughs; the
//! one piece of real logic is the lazy-provisioning protocol: a data
//! operation that fails because the table does not exist triggers [`init`]
//! with the stored schema and is retried exactly once.
//!
//! [`init`]: Table::init

use aws_sdk_dynamodb::types::{ReturnValue, TableStatus};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use crate::errors::{Error, Result};
use crate::schema::Schema;
use crate::store::{GetOptions, Item, StoreClient};
use crate::update::Update;

const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// How long a polling loop keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wait {
    /// Give up once the duration elapses.
    Timeout(Duration),
    /// Poll until the target state is reached.
    Forever,
}

impl Wait {
    fn expired(&self, start: Instant) -> bool {
        match self {
            Wait::Forever => false,
            Wait::Timeout(limit) => start.elapsed() >= *limit,
        }
    }
}

impl Default for Wait {
    fn default() -> Self {
        Wait::Timeout(Duration::ZERO)
    }
}

impl From<Duration> for Wait {
    fn from(limit: Duration) -> Self {
        Wait::Timeout(limit)
    }
}

/// A handle to one named table.
///
/// Handles are created by [`Registry::table`](crate::Registry::table) and
/// shared as `Arc<Table>`. Construction is free; no network call happens
/// until an operation is invoked.
pub struct Table {
    name: String,
    store: Arc<dyn StoreClient>,
    wait_for_active: Wait,
    schema: Mutex<Option<Schema>>,
}

impl Table {
    pub(crate) fn new(name: String, store: Arc<dyn StoreClient>, wait_for_active: Wait) -> Self {
        Self {
            name,
            store,
            wait_for_active,
            schema: Mutex::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attach a schema to the handle. No network call; idempotent, last
    /// writer wins.
    pub fn define(&self, schema: Schema) {
        *self.lock_schema() = Some(schema);
    }

    /// The currently attached schema, if any.
    pub fn schema(&self) -> Option<Schema> {
        self.lock_schema().clone()
    }

    /// Create the remote table and wait for it to become active.
    ///
    /// Uses `schema` if given (also storing it on the handle), else the
    /// previously [`define`](Table::define)d one; with neither, fails with
    /// [`Error::MissingSchema`]. Remote errors, including
    /// table-already-exists, propagate unmodified. Returns `Ok(true)` once
    /// the table status is ACTIVE, `Ok(false)` if `wait_for_active` elapses
    /// first.
    pub async fn init(&self, schema: Option<Schema>) -> Result<bool> {
        let schema = match schema {
            Some(schema) => {
                *self.lock_schema() = Some(schema.clone());
                schema
            }
            None => self.lock_schema().clone().ok_or_else(|| Error::MissingSchema {
                table: self.name.clone(),
            })?,
        };

        debug!(table = %self.name, "creating table");
        self.store.create_table(&self.name, &schema).await?;

        // The deadline check comes before the describe, so a zero wait does
        // no status check at all; with any longer wait the first check
        // happens immediately.
        let start = Instant::now();
        loop {
            if self.wait_for_active.expired(start) {
                debug!(table = %self.name, "timed out waiting for table to become active");
                return Ok(false);
            }
            if self.store.describe_table(&self.name).await? == Some(TableStatus::Active) {
                debug!(table = %self.name, "table active");
                return Ok(true);
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Delete the remote table.
    ///
    /// Returns `Ok(true)` if the table was already absent at call time, with
    /// no polling. Otherwise describes the table every 500ms until the
    /// describe itself fails not-found (`Ok(false)`, confirmed deleted) or
    /// `wait` elapses (`Ok(false)`). The local handle and its schema remain
    /// usable for recreation.
    pub async fn destroy(&self, wait: Wait) -> Result<bool> {
        match self.store.delete_table(&self.name).await {
            Err(Error::ResourceNotFound { .. }) => {
                debug!(table = %self.name, "table already absent");
                return Ok(true);
            }
            Err(err) => return Err(err),
            Ok(()) => {}
        }

        let start = Instant::now();
        loop {
            if wait.expired(start) {
                return Ok(false);
            }
            match self.store.describe_table(&self.name).await {
                Err(Error::ResourceNotFound { .. }) => {
                    debug!(table = %self.name, "table deletion confirmed");
                    return Ok(false);
                }
                Err(err) => return Err(err),
                Ok(_) => {}
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Full unfiltered scan. Single page only: large tables truncate at the
    /// store's page boundary and `LastEvaluatedKey` is not followed.
    pub async fn scan(&self) -> Result<Vec<Item>> {
        self.with_lazy_init(async || self.store.scan(&self.name).await)
            .await
    }

    /// Point lookup. An absent key yields `Ok(None)`, never an error.
    pub async fn get(&self, key: Item, opts: GetOptions) -> Result<Option<Item>> {
        self.with_lazy_init(async || self.store.get_item(&self.name, &key, &opts).await)
            .await
    }

    /// Unconditional upsert. `returns` controls whether the store echoes
    /// old attribute values.
    pub async fn put(&self, item: Item, returns: Option<ReturnValue>) -> Result<Option<Item>> {
        self.with_lazy_init(async || self.store.put_item(&self.name, &item, returns.clone()).await)
            .await
    }

    /// Apply an [`Update`] directive to the item at `key`.
    pub async fn update(
        &self,
        key: Item,
        update: Update,
        returns: Option<ReturnValue>,
    ) -> Result<Option<Item>> {
        let actions = update.into_actions();
        self.with_lazy_init(async || {
            self.store
                .update_item(&self.name, &key, &actions, returns.clone())
                .await
        })
        .await
    }

    /// Unconditional delete of the item at `key`.
    pub async fn delete(&self, key: Item, returns: Option<ReturnValue>) -> Result<Option<Item>> {
        self.with_lazy_init(async || self.store.delete_item(&self.name, &key, returns.clone()).await)
            .await
    }

    /// Lazy-provisioning retry: on a not-found failure, create the table
    /// from the stored schema and retry exactly once. The retry's failure,
    /// of any kind, propagates; so does any other first failure.
    async fn with_lazy_init<T>(&self, op: impl AsyncFn() -> Result<T>) -> Result<T> {
        match op().await {
            Err(Error::ResourceNotFound { .. }) => {
                debug!(table = %self.name, "table missing, provisioning");
                self.init(None).await?;
                op().await
            }
            result => result,
        }
    }

    fn lock_schema(&self) -> std::sync::MutexGuard<'_, Option<Schema>> {
        // Poison recovery: a panicked writer leaves the schema usable.
        self.schema.lock().unwrap_or_else(|e| e.into_inner())
    }
}
