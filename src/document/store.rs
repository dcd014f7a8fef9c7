//! DocumentStore - the raw document database contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StoreError;

/// Named parameter of a [`SqlQuerySpec`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqlParameter {
    pub name: String,
    pub value: Value,
}

/// A parameterized SQL query, serialized the way the document database expects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqlQuerySpec {
    pub query: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<SqlParameter>,
}

impl SqlQuerySpec {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.push(SqlParameter {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Looks up the value bound to `name`.
    pub fn parameter(&self, name: &str) -> Option<&Value> {
        self.parameters
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.value)
    }
}

/// Abstract document database client.
///
/// Documents travel as raw JSON; typed conversion happens in the models.
/// `collection` is the collection link (e.g. `"dbs/notifications/colls/profiles"`).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a new document. Fails with [`StoreError::Conflict`] if a document
    /// with the same `id` already exists in the partition.
    ///
    /// Returns the stored document, including store-assigned metadata.
    async fn insert(
        &self,
        collection: &str,
        document: Value,
        partition_key: &str,
    ) -> Result<Value, StoreError>;

    /// Point-read a document by id and partition key.
    async fn read(
        &self,
        collection: &str,
        id: &str,
        partition_key: &str,
    ) -> Result<Option<Value>, StoreError>;

    /// Run a query and return its first row.
    ///
    /// Fails with [`StoreError::NotFound`] when nothing matches.
    async fn query_one(
        &self,
        collection: &str,
        query: &SqlQuerySpec,
    ) -> Result<Option<Value>, StoreError>;
}

#[async_trait]
impl<S: DocumentStore + ?Sized> DocumentStore for std::sync::Arc<S> {
    async fn insert(
        &self,
        collection: &str,
        document: Value,
        partition_key: &str,
    ) -> Result<Value, StoreError> {
        (**self).insert(collection, document, partition_key).await
    }

    async fn read(
        &self,
        collection: &str,
        id: &str,
        partition_key: &str,
    ) -> Result<Option<Value>, StoreError> {
        (**self).read(collection, id, partition_key).await
    }

    async fn query_one(
        &self,
        collection: &str,
        query: &SqlQuerySpec,
    ) -> Result<Option<Value>, StoreError> {
        (**self).query_one(collection, query).await
    }
}
