//! The table registry: one handle per table name.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::client::ClientConfig;
use crate::store::{DynamoStore, StoreClient};
use crate::table::{Table, Wait};

const DEFAULT_WAIT_FOR_ACTIVE: Duration = Duration::from_millis(180_000);

/// Maps table names to [`Table`] handles, constructing on demand.
///
/// One handle exists per distinct name for the registry's lifetime. Handle
/// construction is free; nothing touches the network until an operation is
/// invoked on the handle.
pub struct Registry {
    store: Arc<dyn StoreClient>,
    wait_for_active: Wait,
    tables: Mutex<HashMap<String, Arc<Table>>>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// A registry over the default AWS client configuration.
    pub async fn connect() -> Self {
        Self::builder().build().await
    }

    /// The handle for `name`, constructing and caching it on first lookup.
    /// Any string is accepted as a name.
    pub fn table(&self, name: &str) -> Arc<Table> {
        let mut tables = self.tables.lock().unwrap_or_else(|e| e.into_inner());
        tables
            .entry(name.to_string())
            .or_insert_with(|| {
                Arc::new(Table::new(
                    name.to_string(),
                    Arc::clone(&self.store),
                    self.wait_for_active,
                ))
            })
            .clone()
    }
}

/// Configuration for a [`Registry`]: an injectable store client and the
/// `wait_for_active` limit every handle's `init` polls under.
pub struct RegistryBuilder {
    store: Option<Arc<dyn StoreClient>>,
    client: ClientConfig,
    wait_for_active: Wait,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self {
            store: None,
            client: ClientConfig::default(),
            wait_for_active: Wait::Timeout(DEFAULT_WAIT_FOR_ACTIVE),
        }
    }
}

impl RegistryBuilder {
    /// Inject a store client. Overrides [`client`](RegistryBuilder::client).
    pub fn store(mut self, store: Arc<dyn StoreClient>) -> Self {
        self.store = Some(store);
        self
    }

    /// AWS client settings used when no store client is injected.
    pub fn client(mut self, config: ClientConfig) -> Self {
        self.client = config;
        self
    }

    /// How long `init` waits for a created table to become active.
    /// Defaults to 180 seconds.
    pub fn wait_for_active(mut self, wait: impl Into<Wait>) -> Self {
        self.wait_for_active = wait.into();
        self
    }

    pub async fn build(self) -> Registry {
        let store = match self.store {
            Some(store) => store,
            None => Arc::new(DynamoStore::connect(self.client).await),
        };
        Registry {
            store,
            wait_for_active: self.wait_for_active,
            tables: Mutex::new(HashMap::new()),
        }
    }
}
