//! VersionedRepository - typed accessor bound to one collection.

use std::marker::PhantomData;

use serde_json::Value;

use crate::document::{find_document, DocumentStore};
use crate::error::StoreError;

use super::{operations, VersionedModel};

/// Typed repository for the versioned documents of one model type.
///
/// Owns the store client (usually an `Arc` or a clone-friendly store) and the
/// collection link; every call is a single round trip and no state is kept
/// between calls.
pub struct VersionedRepository<S, M> {
    store: S,
    collection: String,
    _marker: PhantomData<fn() -> M>,
}

impl<S: Clone, M> Clone for VersionedRepository<S, M> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            collection: self.collection.clone(),
            _marker: PhantomData,
        }
    }
}

impl<S: DocumentStore, M: VersionedModel> VersionedRepository<S, M> {
    pub fn new(store: S, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
            _marker: PhantomData,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The collection link documents are stored under.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Store the first version of an entity.
    pub async fn create(
        &self,
        entity: M::Base,
        partition_key: &str,
    ) -> Result<M::Retrieved, StoreError> {
        operations::create::<M, S>(&self.store, &self.collection, entity, partition_key).await
    }

    /// Store a mutated copy of `object_id` as the next version.
    pub async fn update<F>(
        &self,
        object_id: &str,
        partition_key: &str,
        mutate: F,
    ) -> Result<Option<M::Retrieved>, StoreError>
    where
        F: FnOnce(M::Base) -> M::Base + Send,
    {
        operations::update::<M, S, F>(
            &self.store,
            &self.collection,
            object_id,
            partition_key,
            mutate,
        )
        .await
    }

    /// Point-read one specific version by its physical id.
    pub async fn find(
        &self,
        object_id: &str,
        partition_key: &str,
    ) -> Result<Option<M::Retrieved>, StoreError> {
        find_document::<M, S>(&self.store, &self.collection, object_id, partition_key).await
    }

    /// Find the highest version whose `model_id_field` equals `model_id_value`.
    pub async fn find_last_version_by_model_id(
        &self,
        collection_name: &str,
        model_id_field: &str,
        model_id_value: impl Into<Value>,
    ) -> Result<Option<M::Retrieved>, StoreError> {
        operations::find_last_version_by_model_id::<M, S>(
            &self.store,
            &self.collection,
            collection_name,
            model_id_field,
            model_id_value,
        )
        .await
    }
}
