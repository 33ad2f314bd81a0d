//! Document store on top of libSQL
//!
//! Each collection is a table holding one JSON document per row:
//!
//! ```sql
//! CREATE TABLE "<collection>" (_id TEXT PRIMARY KEY, body TEXT NOT NULL)
//! ```
//!
//! Criteria are compiled to `json_extract(body, ?)` comparisons with every
//! path and value bound as a parameter. Queries never carry an `ORDER BY`, so
//! results follow SQLite's table scan order.

use crate::config::StoreConfig;
use crate::document::{is_valid_name, Document, ID_FIELD};
use crate::error::StoreError;
use crate::query::{Op, Query};
use crate::store::DocumentStore;
use dashmap::DashSet;
use libsql::{Connection, Database as LibSqlDatabase};
use serde_json::Value;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

const NO_SUCH_TABLE: &str = "no such table";

/// libSQL-backed [`DocumentStore`]
///
/// Cloning is cheap; clones share the underlying database and connection.
#[derive(Clone)]
pub struct LibSqlStore {
    db: Arc<LibSqlDatabase>,
    conn: Connection,
    name: String,
    collections: Arc<DashSet<String>>,
    timeout: Option<Duration>,
}

impl LibSqlStore {
    /// Create a new in-memory store
    #[instrument(skip_all)]
    pub async fn in_memory(name: &str) -> Result<Self, StoreError> {
        debug!("Creating in-memory store: {}", name);
        let db = libsql::Builder::new_local(":memory:").build().await?;
        Self::from_database(name, db)
    }

    /// Create or open a local file-based store
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn open_local(name: &str, path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        create_parent_dir(path)?;

        let db = libsql::Builder::new_local(path).build().await?;

        info!("Opened store '{}' at {:?}", name, path);
        Self::from_database(name, db)
    }

    /// Open a local embedded replica synced with Turso
    #[instrument(skip_all, fields(name = %name))]
    pub async fn open_with_sync(
        name: &str,
        local_path: impl AsRef<Path>,
        turso_url: &str,
        auth_token: &str,
    ) -> Result<Self, StoreError> {
        let path = local_path.as_ref();
        create_parent_dir(path)?;

        let db = libsql::Builder::new_remote_replica(
            path,
            turso_url.to_string(),
            auth_token.to_string(),
        )
        .build()
        .await?;

        info!("Opened synced store '{}' with Turso", name);
        Self::from_database(name, db)
    }

    /// Open a store as described by `config`
    pub async fn open(name: &str, config: &StoreConfig) -> Result<Self, StoreError> {
        let store = match (&config.path, &config.sync_url) {
            (Some(path), Some(url)) => {
                let token = config.auth_token.as_deref().unwrap_or_default();
                Self::open_with_sync(name, path, url, token).await?
            }
            (Some(path), None) => Self::open_local(name, path).await?,
            (None, Some(_)) => {
                return Err(StoreError::Rejected(
                    "sync_url requires a local replica path".to_string(),
                ))
            }
            (None, None) => Self::in_memory(name).await?,
        };

        Ok(match config.timeout() {
            Some(limit) => store.with_timeout(limit),
            None => store,
        })
    }

    fn from_database(name: &str, db: LibSqlDatabase) -> Result<Self, StoreError> {
        // A single connection is kept for the store's lifetime; for ":memory:"
        // every new connection would see a different, empty database.
        let conn = db.connect()?;
        Ok(Self {
            db: Arc::new(db),
            conn,
            name: name.to_string(),
            collections: Arc::new(DashSet::new()),
            timeout: None,
        })
    }

    /// Fail any single operation that takes longer than `limit`
    pub fn with_timeout(mut self, limit: Duration) -> Self {
        self.timeout = Some(limit);
        self
    }

    /// Get the store name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Create the table backing `collection` if it does not exist yet
    #[instrument(skip(self), fields(store = %self.name))]
    pub async fn ensure_collection(&self, collection: &str) -> Result<(), StoreError> {
        check_name("collection", collection)?;
        if self.collections.contains(collection) {
            return Ok(());
        }

        let sql = format!(
            r#"CREATE TABLE IF NOT EXISTS "{}" (_id TEXT PRIMARY KEY, body TEXT NOT NULL)"#,
            collection
        );
        self.bounded("create collection", self.conn.execute(&sql, ()))
            .await?;
        self.collections.insert(collection.to_string());

        debug!("Collection ready: {}", collection);
        Ok(())
    }

    /// Sync the store with Turso (only for embedded replicas)
    #[instrument(skip_all, fields(store = %self.name))]
    pub async fn sync(&self) -> Result<(), StoreError> {
        debug!("Syncing store '{}'", self.name);
        self.db.sync().await?;
        Ok(())
    }

    /// Check if the store is healthy by executing a simple query
    #[instrument(skip_all, fields(store = %self.name))]
    pub async fn health_check(&self) -> bool {
        match self.bounded("health check", self.conn.query("SELECT 1", ())).await {
            Ok(_) => true,
            Err(e) => {
                warn!("Store health check failed: {}", e);
                false
            }
        }
    }

    /// Run a libSQL call under the configured timeout, classifying its error
    async fn bounded<T, F>(&self, operation: &str, call: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, libsql::Error>>,
    {
        let Some(limit) = self.timeout else {
            return Ok(call.await?);
        };

        match tokio::time::timeout(limit, call).await {
            Ok(result) => Ok(result?),
            Err(_) => {
                warn!(store = %self.name, ?limit, "{} timed out", operation);
                Err(StoreError::Unavailable(format!(
                    "{} timed out after {:?}",
                    operation, limit
                )))
            }
        }
    }
}

impl DocumentStore for LibSqlStore {
    #[instrument(skip(self, document), fields(store = %self.name))]
    async fn insert(&self, collection: &str, mut document: Document) -> Result<String, StoreError> {
        self.ensure_collection(collection).await?;

        let id = match document.remove(ID_FIELD) {
            Some(Value::String(id)) => id,
            None | Some(Value::Null) => Uuid::now_v7().to_string(),
            Some(other) => {
                return Err(StoreError::Rejected(format!(
                    "{} must be a string, got {}",
                    ID_FIELD, other
                )))
            }
        };
        let body = serde_json::to_string(&document)?;

        let sql = format!(r#"INSERT INTO "{}" (_id, body) VALUES (?, ?)"#, collection);
        self.bounded(
            "insert",
            self.conn.execute(&sql, libsql::params![id.clone(), body]),
        )
        .await?;

        debug!("Inserted document {} into {}", id, collection);
        Ok(id)
    }

    #[instrument(skip(self, query), fields(store = %self.name))]
    async fn find(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError> {
        let (sql, params) = compile_find(collection, query)?;

        // Reads never create the collection; one that was never written is empty
        let mut rows = match self.bounded("find", self.conn.query(&sql, params)).await {
            Ok(rows) => rows,
            Err(StoreError::Rejected(reason)) if reason.contains(NO_SUCH_TABLE) => {
                debug!("Collection {} does not exist yet", collection);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let mut documents = Vec::new();
        while let Some(row) = self.bounded("read row", rows.next()).await? {
            let id: String = row.get(0)?;
            let body: String = row.get(1)?;

            let mut document: Document = serde_json::from_str(&body)?;
            document.insert(ID_FIELD.to_string(), Value::String(id));
            documents.push(document);
        }

        debug!("Found {} documents in {}", documents.len(), collection);
        Ok(documents)
    }
}

fn create_parent_dir(path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            StoreError::Unavailable(format!("Failed to create store directory: {}", e))
        })?;
    }
    Ok(())
}

fn check_name(kind: &str, name: &str) -> Result<(), StoreError> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(StoreError::Rejected(format!("invalid {} name: {:?}", kind, name)))
    }
}

fn to_sql_value(value: &Value) -> Result<libsql::Value, StoreError> {
    match value {
        Value::Null => Ok(libsql::Value::Null),
        Value::Bool(b) => Ok(libsql::Value::Integer(i64::from(*b))),
        Value::String(s) => Ok(libsql::Value::Text(s.clone())),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Ok(libsql::Value::Integer(i)),
            (None, Some(f)) => Ok(libsql::Value::Real(f)),
            (None, None) => Err(StoreError::Rejected(format!(
                "unsupported number in criteria: {}",
                n
            ))),
        },
        Value::Array(_) | Value::Object(_) => Err(StoreError::Rejected(
            "criteria values must be scalars".to_string(),
        )),
    }
}

/// Translate a query into SQL text and its bound parameters
fn compile_find(collection: &str, query: &Query) -> Result<(String, Vec<libsql::Value>), StoreError> {
    check_name("collection", collection)?;

    let mut sql = format!(r#"SELECT _id, body FROM "{}""#, collection);
    let mut clauses = Vec::new();
    let mut params = Vec::new();

    for condition in query.criteria.conditions() {
        check_name("field", &condition.field)?;

        let (operator, value) = match &condition.op {
            Op::Eq(value) => ("=", value),
            Op::Gte(value) => (">=", value),
        };

        if condition.field == ID_FIELD {
            clauses.push(format!("_id {} ?", operator));
        } else {
            clauses.push(format!("json_extract(body, ?) {} ?", operator));
            params.push(libsql::Value::Text(format!("$.{}", condition.field)));
        }
        params.push(to_sql_value(value)?);
    }

    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }

    if let Some(limit) = query.limit {
        sql.push_str(" LIMIT ?");
        params.push(libsql::Value::Integer(i64::from(limit)));
    }

    Ok((sql, params))
}
