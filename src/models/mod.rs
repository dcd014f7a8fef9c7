mod definitions;
mod profile;
mod service;

pub use definitions::{fiscal_code_to_model_id, EmailAddress, FiscalCode, NonEmptyString};
pub use profile::{
    NewProfile, Profile, ProfileBinding, ProfileModel, RetrievedProfile, PROFILE_COLLECTION_NAME,
    PROFILE_MODEL_ID_FIELD,
};
pub use service::{
    NewService, RetrievedService, Service, ServiceBinding, ServiceModel, SERVICE_COLLECTION_NAME,
    SERVICE_MODEL_ID_FIELD,
};
