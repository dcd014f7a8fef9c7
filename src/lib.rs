//! Append-only, optimistically versioned document models.
//!
//! Turns a plain document database collection into a store where every change
//! to an entity is inserted as a new document (`"<model id>-<padded version>"`)
//! and the current state is the highest version. The store's id uniqueness on
//! insert is the only concurrency control.

mod config;
mod document;
mod error;
mod model_id;
mod models;
mod version;
mod versioned;

pub use config::{load_config, load_config_from_path, load_config_from_str, StorageConfig};
pub use document::{
    collection_uri, create_document, database_uri, find_document, DocumentMeta, DocumentModel,
    DocumentStore, InMemoryDocumentStore, SqlParameter, SqlQuerySpec,
};
pub use error::StoreError;
pub use model_id::{is_model_id, to_model_id, ModelId};
pub use models::{
    fiscal_code_to_model_id, EmailAddress, FiscalCode, NewProfile, NewService, NonEmptyString,
    Profile, ProfileBinding, ProfileModel, RetrievedProfile, RetrievedService, Service,
    ServiceBinding, ServiceModel, PROFILE_COLLECTION_NAME, PROFILE_MODEL_ID_FIELD,
    SERVICE_COLLECTION_NAME, SERVICE_MODEL_ID_FIELD,
};
pub use version::{generate_versioned_model_id, parse_versioned_model_id, Version, VERSION_PADDING};
pub use versioned::{
    create, find_last_version_by_model_id, update, VersionedDocument, VersionedModel,
    VersionedRepository, MODEL_ID_PARAMETER,
};
