use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use versioned_documents::{
    DocumentStore, FiscalCode, InMemoryDocumentStore, Profile, SqlQuerySpec,
    StoreError,
};

pub const PROFILES: &str = "dbs/notifications/colls/profiles";

pub fn fiscal_code() -> FiscalCode {
    FiscalCode::new("RSSMRA80A01H501U").unwrap()
}

pub fn profile() -> Profile {
    Profile::new(fiscal_code())
}

/// How a [`ScriptedStore`] answers reads and queries.
#[derive(Clone, Copy)]
pub enum Answer {
    Delegate,
    NotFound,
    Unavailable,
}

/// Wraps an in-memory store, overriding reads and queries and counting inserts.
pub struct ScriptedStore {
    pub inner: InMemoryDocumentStore,
    pub reads: Answer,
    pub queries: Answer,
    pub inserts: AtomicUsize,
}

impl ScriptedStore {
    pub fn new(reads: Answer, queries: Answer) -> Self {
        Self {
            inner: InMemoryDocumentStore::new(),
            reads,
            queries,
            inserts: AtomicUsize::new(0),
        }
    }

    pub fn insert_count(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }
}

fn unavailable() -> StoreError {
    StoreError::Request {
        code: 503,
        message: "service unavailable".into(),
    }
}

#[async_trait]
impl DocumentStore for ScriptedStore {
    async fn insert(
        &self,
        collection: &str,
        document: Value,
        partition_key: &str,
    ) -> Result<Value, StoreError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        self.inner.insert(collection, document, partition_key).await
    }

    async fn read(
        &self,
        collection: &str,
        id: &str,
        partition_key: &str,
    ) -> Result<Option<Value>, StoreError> {
        match self.reads {
            Answer::Delegate => self.inner.read(collection, id, partition_key).await,
            Answer::NotFound => Err(StoreError::NotFound),
            Answer::Unavailable => Err(unavailable()),
        }
    }

    async fn query_one(
        &self,
        collection: &str,
        query: &SqlQuerySpec,
    ) -> Result<Option<Value>, StoreError> {
        match self.queries {
            Answer::Delegate => self.inner.query_one(collection, query).await,
            Answer::NotFound => Ok(None),
            Answer::Unavailable => Err(unavailable()),
        }
    }
}
