//! Lazily resolved Redis connection.
//!
//! A [`RedisConnection`] either wraps a connection handed to it or holds the
//! parameters needed to open one on first use. There are no implicit
//! defaults: without parameters or a client, resolution fails.

use crate::error::{StoreError, StoreResult};
use redis::aio::ConnectionManager;
use redis::{ConnectionInfo, IntoConnectionInfo};
use tokio::sync::Mutex;

/// Where to connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    /// Connection URL, `redis://[user[:password]@]host[:port][/database]`
    pub url: String,

    /// Logical database; zero keeps whatever the URL selects
    pub database: i64,
}

impl ConnectionParams {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            database: 0,
        }
    }

    pub fn with_database(mut self, database: i64) -> Self {
        self.database = database;
        self
    }

    /// Parse the URL and apply the database override.
    pub fn connection_info(&self) -> StoreResult<ConnectionInfo> {
        let mut info = self
            .url
            .as_str()
            .into_connection_info()
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        if self.database != 0 {
            info.redis.db = self.database;
        }
        Ok(info)
    }
}

#[derive(Default)]
struct ConnectionState {
    params: Option<ConnectionParams>,
    client: Option<ConnectionManager>,
}

/// Connection capability shared by store implementations.
///
/// The resolved [`ConnectionManager`] is multiplexed and reconnects on its
/// own, so clones handed out by [`resolve`](Self::resolve) are cheap and safe
/// to use concurrently.
pub struct RedisConnection {
    state: Mutex<ConnectionState>,
}

impl RedisConnection {
    /// A connection that opens itself from `params` on first use.
    pub fn from_params(params: ConnectionParams) -> Self {
        Self {
            state: Mutex::new(ConnectionState {
                params: Some(params),
                client: None,
            }),
        }
    }

    /// A connection wrapping an already established client.
    pub fn from_client(client: ConnectionManager) -> Self {
        Self {
            state: Mutex::new(ConnectionState {
                params: None,
                client: Some(client),
            }),
        }
    }

    /// Replace the client in use.
    pub async fn set_client(&self, client: ConnectionManager) {
        let mut state = self.state.lock().await;
        state.client = Some(client);
    }

    /// Replace the parameters, dropping any resolved client so the next
    /// [`resolve`](Self::resolve) reconnects with them.
    pub async fn set_params(&self, params: ConnectionParams) {
        let mut state = self.state.lock().await;
        state.params = Some(params);
        state.client = None;
    }

    /// Parameters the connection was configured with, if any.
    pub async fn params(&self) -> Option<ConnectionParams> {
        self.state.lock().await.params.clone()
    }

    /// Whether a client has been resolved or supplied.
    pub async fn is_resolved(&self) -> bool {
        self.state.lock().await.client.is_some()
    }

    /// Return the current client, connecting first if needed.
    pub async fn resolve(&self) -> StoreResult<ConnectionManager> {
        let mut state = self.state.lock().await;
        if let Some(client) = &state.client {
            return Ok(client.clone());
        }

        let params = state.params.as_ref().ok_or_else(|| {
            StoreError::Connection("No connection parameters or client configured".to_string())
        })?;
        let info = params.connection_info()?;
        tracing::debug!(
            addr = %info.addr,
            db = info.redis.db,
            "Opening Redis connection"
        );

        let client = redis::Client::open(info)?;
        let manager = ConnectionManager::new(client).await?;
        state.client = Some(manager.clone());
        Ok(manager)
    }
}

impl std::fmt::Debug for RedisConnection {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("RedisConnection")
            .finish_non_exhaustive()
    }
}
