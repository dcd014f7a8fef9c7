use serde_json::Value;
use tracing::debug;

use crate::document::{create_document, find_document, DocumentModel, DocumentStore, SqlQuerySpec};
use crate::error::StoreError;
use crate::version::{generate_versioned_model_id, Version};

use super::{VersionedDocument, VersionedModel};

/// Name of the query parameter holding the model id value.
pub const MODEL_ID_PARAMETER: &str = "@modelId";

/// Stores the first version (0) of `entity`.
///
/// Fails with the store's conflict error if the entity already exists.
pub async fn create<M, S>(
    store: &S,
    collection: &str,
    entity: M::Base,
    partition_key: &str,
) -> Result<M::Retrieved, StoreError>
where
    M: VersionedModel,
    S: DocumentStore + ?Sized,
{
    let version = Version::INITIAL;
    let model_id = M::model_id(&entity);
    let id = generate_versioned_model_id(&model_id, version);
    debug!(%model_id, %version, id = %id, "creating versioned document");

    let document = M::versionate(entity, id, version);
    create_document::<M, S>(store, collection, &document, partition_key).await
}

/// Applies `mutate` to the document `object_id` and stores the result as the
/// next version.
///
/// Returns `Ok(None)` when there is no such document. The document that was
/// read is left untouched; a concurrent writer that already stored the next
/// version makes this call fail with the store's conflict error.
pub async fn update<M, S, F>(
    store: &S,
    collection: &str,
    object_id: &str,
    partition_key: &str,
    mutate: F,
) -> Result<Option<M::Retrieved>, StoreError>
where
    M: VersionedModel,
    S: DocumentStore + ?Sized,
    F: FnOnce(M::Base) -> M::Base + Send,
{
    let Some(current) = find_document::<M, S>(store, collection, object_id, partition_key).await?
    else {
        debug!(object_id, "nothing to update");
        return Ok(None);
    };

    let updated = mutate(M::to_base(&current));
    let model_id = M::model_id(&updated);
    let next_version = current
        .version()
        .next()
        .ok_or_else(|| StoreError::VersionExhausted {
            model_id: model_id.clone(),
            version: current.version(),
        })?;
    let id = generate_versioned_model_id(&model_id, next_version);
    debug!(%model_id, version = %next_version, id = %id, "storing next version");

    let document = M::versionate(updated, id, next_version);
    create_document::<M, S>(store, collection, &document, partition_key)
        .await
        .map(Some)
}

/// Finds the document with the highest version whose `model_id_field`
/// equals `model_id_value`.
///
/// `collection_name` is the name the query selects from. A not-found answer
/// from the store is `Ok(None)`; any other error is returned as is.
///
/// # Panics
///
/// Panics if the matching document does not have the shape of
/// [`DocumentModel::Retrieved`].
pub async fn find_last_version_by_model_id<M, S>(
    store: &S,
    collection: &str,
    collection_name: &str,
    model_id_field: &str,
    model_id_value: impl Into<Value>,
) -> Result<Option<M::Retrieved>, StoreError>
where
    M: DocumentModel,
    S: DocumentStore + ?Sized,
{
    let query = SqlQuerySpec::new(format!(
        "SELECT TOP 1 * FROM {name} m WHERE (m.{field} = {param}) ORDER BY m.version DESC",
        name = collection_name,
        field = model_id_field,
        param = MODEL_ID_PARAMETER,
    ))
    .with_parameter(MODEL_ID_PARAMETER, model_id_value);
    debug!(collection_name, model_id_field, "querying last version");

    match store.query_one(collection, &query).await {
        Ok(found) => Ok(found.map(M::to_retrieved)),
        Err(err) if err.is_not_found() => Ok(None),
        Err(err) => Err(err),
    }
}
