//! Document store client for Parley
//!
//! This crate provides:
//! - Schema-flexible [`Document`]s and a store-agnostic [`Query`] model
//! - The [`DocumentStore`] trait that message persistence is written against
//! - [`LibSqlStore`], a document store on libSQL (local, in-memory or a Turso
//!   embedded replica)
//! - The [`StoreError`] taxonomy every store operation reports
//!
//! # Example
//!
//! ```ignore
//! use parley_storage::{Criteria, DocumentStore, LibSqlStore, Query};
//!
//! let store = LibSqlStore::in_memory("messages").await?;
//! let query = Query::new(Criteria::new().eq("recipient_id", "bob")).with_limit(100);
//! let documents = store.find("messages", &query).await?;
//! ```

mod config;
mod document;
mod error;
mod libsql_store;
mod query;
mod store;

pub use config::StoreConfig;
pub use document::{document_id, is_valid_name, Document, ID_FIELD};
pub use error::StoreError;
pub use libsql_store::LibSqlStore;
pub use query::{Condition, Criteria, Op, Query};
pub use store::DocumentStore;
