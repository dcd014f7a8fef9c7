//! Versioned models - append-only, optimistically versioned documents.
//!
//! Every change to an entity is written as a brand-new document whose id is
//! derived from the entity's [`ModelId`] and its [`Version`]. Nothing is ever
//! overwritten: the history of an entity is the set of documents sharing its
//! model id, and the current state is the one with the highest version.
//!
//! Two writers that both start from version N race to insert the same
//! physical id for version N+1. The store's id uniqueness lets exactly one of
//! them through; the other gets a conflict error and may re-read and retry.
//!
//! ## Example
//!
//! ```ignore
//! use versioned_documents::{InMemoryDocumentStore, VersionedRepository};
//!
//! let repo = VersionedRepository::<_, ProfileBinding>::new(store, "dbs/app/colls/profiles");
//! let v0 = repo.create(profile, "RSSMRA80A01H501U").await?;
//! let v1 = repo
//!     .update(&v0.meta.id, "RSSMRA80A01H501U", |p| Profile { email: Some(email), ..p })
//!     .await?;
//! ```

mod operations;
mod repository;

use crate::document::DocumentModel;
use crate::model_id::ModelId;
use crate::version::Version;

pub use operations::{create, find_last_version_by_model_id, update, MODEL_ID_PARAMETER};
pub use repository::VersionedRepository;

/// A retrieved document that carries its physical id and version.
pub trait VersionedDocument {
    fn id(&self) -> &str;
    fn version(&self) -> Version;
}

/// Binds an entity shape to the versioned storage operations.
///
/// Implementors supply three pure functions; the create / update / query
/// logic lives in [`create`], [`update`] and [`find_last_version_by_model_id`].
pub trait VersionedModel: DocumentModel<Retrieved: VersionedDocument> {
    /// The version-less view of the entity.
    type Base: Send;

    /// Extracts the natural key of an entity.
    fn model_id(base: &Self::Base) -> ModelId;

    /// Stamps an entity with a physical id and version, ready for insertion.
    fn versionate(base: Self::Base, id: String, version: Version) -> Self::New;

    /// Projects a retrieved document back to the base shape, dropping id,
    /// version and store metadata.
    fn to_base(retrieved: &Self::Retrieved) -> Self::Base;
}
