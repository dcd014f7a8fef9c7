//! Citizen profiles.
//!
//! One logical profile per fiscal code; every change is a new version stored
//! in the `profiles` collection, partitioned by fiscal code.

use serde::{Deserialize, Serialize};

use crate::document::{DocumentMeta, DocumentModel, DocumentStore};
use crate::error::StoreError;
use crate::model_id::ModelId;
use crate::version::Version;
use crate::versioned::{VersionedDocument, VersionedModel, VersionedRepository};

use super::definitions::{fiscal_code_to_model_id, EmailAddress, FiscalCode};

pub const PROFILE_COLLECTION_NAME: &str = "profiles";
pub const PROFILE_MODEL_ID_FIELD: &str = "fiscalCode";

const NEW_PROFILE_KIND: &str = "INewProfile";

/// Base profile of a citizen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Fiscal code of the citizen this profile belongs to.
    pub fiscal_code: FiscalCode,

    /// Preferred address for email notifications. When set it overrides the
    /// default address supplied by the API client and enables email delivery.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<EmailAddress>,

    /// Whether the content of messages sent to this citizen is stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_inbox_enabled: Option<bool>,
}

impl Profile {
    pub fn new(fiscal_code: FiscalCode) -> Self {
        Self {
            fiscal_code,
            email: None,
            is_inbox_enabled: None,
        }
    }
}

/// A profile version about to be inserted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewProfile {
    #[serde(flatten)]
    pub profile: Profile,
    pub id: String,
    pub kind: &'static str,
    pub version: Version,
}

/// A profile version as read back from the store.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RetrievedProfile {
    #[serde(flatten)]
    pub profile: Profile,
    #[serde(flatten)]
    pub meta: DocumentMeta,
    pub version: Version,
}

impl VersionedDocument for RetrievedProfile {
    fn id(&self) -> &str {
        &self.meta.id
    }

    fn version(&self) -> Version {
        self.version
    }
}

/// Binds [`Profile`] to the versioned storage operations.
pub struct ProfileBinding;

impl DocumentModel for ProfileBinding {
    type New = NewProfile;
    type Retrieved = RetrievedProfile;
    const KIND: &'static str = "RetrievedProfile";
}

impl VersionedModel for ProfileBinding {
    type Base = Profile;

    fn model_id(profile: &Profile) -> ModelId {
        fiscal_code_to_model_id(&profile.fiscal_code)
    }

    fn versionate(profile: Profile, id: String, version: Version) -> NewProfile {
        NewProfile {
            profile,
            id,
            kind: NEW_PROFILE_KIND,
            version,
        }
    }

    fn to_base(retrieved: &RetrievedProfile) -> Profile {
        Profile {
            fiscal_code: retrieved.profile.fiscal_code.clone(),
            email: retrieved.profile.email.clone(),
            is_inbox_enabled: retrieved.profile.is_inbox_enabled,
        }
    }
}

/// Model for reading and writing citizen profiles.
pub struct ProfileModel<S> {
    repository: VersionedRepository<S, ProfileBinding>,
}

impl<S: DocumentStore> ProfileModel<S> {
    /// Creates a profile model over the collection at `collection_uri`.
    pub fn new(store: S, collection_uri: impl Into<String>) -> Self {
        Self {
            repository: VersionedRepository::new(store, collection_uri),
        }
    }

    /// Stores the first version of `profile`, partitioned by its fiscal code.
    pub async fn create(&self, profile: Profile) -> Result<RetrievedProfile, StoreError> {
        let partition_key = profile.fiscal_code.to_string();
        self.repository.create(profile, &partition_key).await
    }

    /// Stores `mutate` applied to the profile version `profile_id` as the next version.
    pub async fn update<F>(
        &self,
        profile_id: &str,
        fiscal_code: &FiscalCode,
        mutate: F,
    ) -> Result<Option<RetrievedProfile>, StoreError>
    where
        F: FnOnce(Profile) -> Profile + Send,
    {
        self.repository
            .update(profile_id, fiscal_code.as_str(), mutate)
            .await
    }

    /// Point-reads one specific profile version.
    pub async fn find(
        &self,
        profile_id: &str,
        fiscal_code: &FiscalCode,
    ) -> Result<Option<RetrievedProfile>, StoreError> {
        self.repository.find(profile_id, fiscal_code.as_str()).await
    }

    /// Searches for the latest profile associated to `fiscal_code`.
    pub async fn find_one_profile_by_fiscal_code(
        &self,
        fiscal_code: &FiscalCode,
    ) -> Result<Option<RetrievedProfile>, StoreError> {
        self.repository
            .find_last_version_by_model_id(
                PROFILE_COLLECTION_NAME,
                PROFILE_MODEL_ID_FIELD,
                fiscal_code.as_str(),
            )
            .await
    }

    pub fn repository(&self) -> &VersionedRepository<S, ProfileBinding> {
        &self.repository
    }
}
