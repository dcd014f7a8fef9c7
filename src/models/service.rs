//! Services allowed to send notifications.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::document::{DocumentMeta, DocumentModel, DocumentStore};
use crate::error::StoreError;
use crate::model_id::ModelId;
use crate::version::Version;
use crate::versioned::{VersionedDocument, VersionedModel, VersionedRepository};

use super::definitions::{FiscalCode, NonEmptyString};

pub const SERVICE_COLLECTION_NAME: &str = "services";
pub const SERVICE_MODEL_ID_FIELD: &str = "serviceId";

const NEW_SERVICE_KIND: &str = "INewService";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub service_id: NonEmptyString,
    pub service_name: NonEmptyString,
    pub organization_name: NonEmptyString,
    pub department_name: NonEmptyString,
    /// Citizens this service may message while in restricted mode.
    #[serde(default)]
    pub authorized_recipients: BTreeSet<FiscalCode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewService {
    #[serde(flatten)]
    pub service: Service,
    pub id: String,
    pub kind: &'static str,
    pub version: Version,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RetrievedService {
    #[serde(flatten)]
    pub service: Service,
    #[serde(flatten)]
    pub meta: DocumentMeta,
    pub version: Version,
}

impl VersionedDocument for RetrievedService {
    fn id(&self) -> &str {
        &self.meta.id
    }

    fn version(&self) -> Version {
        self.version
    }
}

pub struct ServiceBinding;

impl DocumentModel for ServiceBinding {
    type New = NewService;
    type Retrieved = RetrievedService;
    const KIND: &'static str = "RetrievedService";
}

impl VersionedModel for ServiceBinding {
    type Base = Service;

    fn model_id(service: &Service) -> ModelId {
        ModelId::from(&service.service_id)
    }

    fn versionate(service: Service, id: String, version: Version) -> NewService {
        NewService {
            service,
            id,
            kind: NEW_SERVICE_KIND,
            version,
        }
    }

    fn to_base(retrieved: &RetrievedService) -> Service {
        let s = &retrieved.service;
        Service {
            service_id: s.service_id.clone(),
            service_name: s.service_name.clone(),
            organization_name: s.organization_name.clone(),
            department_name: s.department_name.clone(),
            authorized_recipients: s.authorized_recipients.clone(),
        }
    }
}

/// Model for reading and writing services, partitioned by service id.
pub struct ServiceModel<S> {
    repository: VersionedRepository<S, ServiceBinding>,
}

impl<S: DocumentStore> ServiceModel<S> {
    pub fn new(store: S, collection_uri: impl Into<String>) -> Self {
        Self {
            repository: VersionedRepository::new(store, collection_uri),
        }
    }

    pub async fn create(&self, service: Service) -> Result<RetrievedService, StoreError> {
        let partition_key = service.service_id.to_string();
        self.repository.create(service, &partition_key).await
    }

    pub async fn update<F>(
        &self,
        object_id: &str,
        service_id: &NonEmptyString,
        mutate: F,
    ) -> Result<Option<RetrievedService>, StoreError>
    where
        F: FnOnce(Service) -> Service + Send,
    {
        self.repository
            .update(object_id, service_id.as_str(), mutate)
            .await
    }

    /// Searches for the latest version of the service `service_id`.
    pub async fn find_by_service_id(
        &self,
        service_id: &NonEmptyString,
    ) -> Result<Option<RetrievedService>, StoreError> {
        self.repository
            .find_last_version_by_model_id(
                SERVICE_COLLECTION_NAME,
                SERVICE_MODEL_ID_FIELD,
                service_id.as_str(),
            )
            .await
    }
}
