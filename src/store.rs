use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::RedisError;
use thiserror::Error;

// ─── Errors ──────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot connect to sample store: {0}")]
    Connect(#[source] RedisError),

    #[error("connecting to sample store timed out after {0:?}")]
    ConnectTimeout(Duration),

    #[error("cannot select database {db}: {source}")]
    Select {
        db: i64,
        #[source]
        source: RedisError,
    },

    #[error("sample query failed: {0}")]
    Query(#[source] RedisError),

    #[error("sample query timed out after {0:?}")]
    QueryTimeout(Duration),
}

/// Coarse failure class, used to pick the HTTP response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Connectivity,
    Selection,
    Query,
}

impl StoreError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Connect(_) => FailureKind::Connectivity,
            Self::Select { .. } => FailureKind::Selection,
            // An expired deadline is a failed query, wherever it hit.
            Self::Query(_) | Self::ConnectTimeout(_) | Self::QueryTimeout(_) => {
                FailureKind::Query
            }
        }
    }
}

// ─── Store seam ──────────────────────────────────────────────────

/// One stored `duration` value as raw bytes; `None` when the record has
/// no `duration` field.
pub type RawSample = Option<Vec<u8>>;

/// Read side of the external store holding per-request samples.
#[async_trait]
pub trait SampleStore: Send + Sync {
    /// Raw `duration` values of at most `limit` records of `endpoint`,
    /// most recent `timestamp` first.
    async fn latest_durations(
        &self,
        endpoint: &str,
        limit: usize,
    ) -> Result<Vec<RawSample>, StoreError>;
}

// ─── Redis implementation ────────────────────────────────────────

/// Connection settings for [`RedisSampleStore`].
#[derive(Debug, Clone)]
pub struct RedisSettings {
    pub host: String,
    pub port: u16,
    pub db: i64,
    pub connect_timeout: Duration,
    pub query_timeout: Duration,
}

/// Opens a fresh connection for every query and drops it when the
/// query returns, whatever the outcome.
///
/// Records are laid out as a set `<endpoint>` of member ids, each with
/// a hash `<endpoint>:<id>` carrying `duration` and `timestamp` fields.
pub struct RedisSampleStore {
    client: redis::Client,
    db: i64,
    connect_timeout: Duration,
    query_timeout: Duration,
}

impl RedisSampleStore {
    /// Fails only if the address cannot form a valid Redis URL; no
    /// connection is made here.
    pub fn new(settings: &RedisSettings) -> Result<Self, RedisError> {
        let url = format!("redis://{}:{}/", settings.host, settings.port);
        let client = redis::Client::open(url)?;

        Ok(Self {
            client,
            db: settings.db,
            connect_timeout: settings.connect_timeout,
            query_timeout: settings.query_timeout,
        })
    }

    async fn connect(&self) -> Result<MultiplexedConnection, StoreError> {
        tokio::time::timeout(
            self.connect_timeout,
            self.client.get_multiplexed_async_connection(),
        )
        .await
        .map_err(|_| StoreError::ConnectTimeout(self.connect_timeout))?
        .map_err(StoreError::Connect)
    }
}

/// `SORT <endpoint> BY <endpoint>:*->timestamp DESC LIMIT 0 <limit>
/// GET <endpoint>:*->duration`
pub fn latest_durations_cmd(endpoint: &str, limit: usize) -> redis::Cmd {
    let mut cmd = redis::cmd("SORT");
    cmd.arg(endpoint)
        .arg("BY")
        .arg(format!("{endpoint}:*->timestamp"))
        .arg("DESC")
        .arg("LIMIT")
        .arg(0)
        .arg(limit)
        .arg("GET")
        .arg(format!("{endpoint}:*->duration"));
    cmd
}

#[async_trait]
impl SampleStore for RedisSampleStore {
    async fn latest_durations(
        &self,
        endpoint: &str,
        limit: usize,
    ) -> Result<Vec<RawSample>, StoreError> {
        let mut conn = self.connect().await?;

        // SELECT and SORT share one deadline.
        let query = async {
            let _: () = redis::cmd("SELECT")
                .arg(self.db)
                .query_async(&mut conn)
                .await
                .map_err(|source| StoreError::Select {
                    db: self.db,
                    source,
                })?;

            let cmd = latest_durations_cmd(endpoint, limit);
            let values: Vec<RawSample> = cmd
                .query_async(&mut conn)
                .await
                .map_err(StoreError::Query)?;
            Ok::<_, StoreError>(values)
        };

        tokio::time::timeout(self.query_timeout, query)
            .await
            .map_err(|_| StoreError::QueryTimeout(self.query_timeout))?
    }
}
