//! Documents - raw storage records and the typed glue around them.
//!
//! A [`DocumentStore`] moves raw JSON documents in and out of a collection.
//! A [`DocumentModel`] names the typed shapes of one kind of document: what
//! is written on insert and what is read back, store metadata included.
//!
//! ## Example
//!
//! ```ignore
//! use versioned_documents::{create_document, find_document, InMemoryDocumentStore};
//!
//! let store = InMemoryDocumentStore::new();
//! let created = create_document::<Note, _>(&store, "dbs/app/colls/notes", &note, "p1").await?;
//! let loaded = find_document::<Note, _>(&store, "dbs/app/colls/notes", "n1", "p1").await?;
//! ```

mod in_memory;
mod store;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::error::StoreError;

pub use in_memory::InMemoryDocumentStore;
pub use store::{DocumentStore, SqlParameter, SqlQuerySpec};

/// Metadata the store attaches to every document it persists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub id: String,
    #[serde(rename = "_rid")]
    pub rid: String,
    #[serde(rename = "_self")]
    pub self_link: String,
    #[serde(rename = "_etag")]
    pub etag: String,
    /// Last write time, in seconds since the Unix epoch.
    #[serde(rename = "_ts")]
    pub ts: i64,
}

/// The typed shapes of one kind of document.
pub trait DocumentModel {
    /// Shape written on insert (carries its own `id`).
    type New: Serialize + Send + Sync;

    /// Shape read back from the store.
    type Retrieved: DeserializeOwned + Send;

    /// Human readable name of the retrieved shape, used in fatal errors.
    const KIND: &'static str;

    /// Converts a raw stored document into [`Self::Retrieved`].
    ///
    /// # Panics
    ///
    /// Panics when the document does not match the expected shape. Stored
    /// documents are only ever written through this layer, so a mismatch
    /// means the data was tampered with or a migration was missed.
    fn to_retrieved(raw: serde_json::Value) -> Self::Retrieved {
        match serde_json::from_value(raw) {
            Ok(retrieved) => retrieved,
            Err(err) => panic!("Fatal, result is not a valid {}: {}", Self::KIND, err),
        }
    }
}

/// Inserts `document` and returns it as stored.
pub async fn create_document<M, S>(
    store: &S,
    collection: &str,
    document: &M::New,
    partition_key: &str,
) -> Result<M::Retrieved, StoreError>
where
    M: DocumentModel,
    S: DocumentStore + ?Sized,
{
    let raw = serde_json::to_value(document)?;
    let created = store.insert(collection, raw, partition_key).await?;
    Ok(M::to_retrieved(created))
}

/// Point-reads the document `id` in `partition_key`.
///
/// A missing document is `Ok(None)`, whether the store reports it as an empty
/// result or as a not-found error.
pub async fn find_document<M, S>(
    store: &S,
    collection: &str,
    id: &str,
    partition_key: &str,
) -> Result<Option<M::Retrieved>, StoreError>
where
    M: DocumentModel,
    S: DocumentStore + ?Sized,
{
    match store.read(collection, id, partition_key).await {
        Ok(found) => Ok(found.map(M::to_retrieved)),
        Err(err) if err.is_not_found() => {
            debug!(collection, id, "document not found");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// Link of a database: `"dbs/<name>"`.
pub fn database_uri(database_name: &str) -> String {
    format!("dbs/{}", database_name)
}

/// Link of a collection inside a database link: `"<database>/colls/<name>"`.
pub fn collection_uri(database_uri: &str, collection_name: &str) -> String {
    format!("{}/colls/{}", database_uri, collection_name)
}
