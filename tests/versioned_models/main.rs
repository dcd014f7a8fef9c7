//! Integration tests for versioned models (ProfileModel + InMemoryDocumentStore).

mod concurrency;
mod support;

use std::sync::Arc;

use support::{fiscal_code, profile, Answer, ScriptedStore, PROFILES};
use versioned_documents::{
    generate_versioned_model_id, EmailAddress, InMemoryDocumentStore, ModelId, Profile,
    ProfileBinding, ProfileModel, StoreError, Version, VersionedModel,
};

#[tokio::test]
async fn profile_lifecycle() {
    let store = InMemoryDocumentStore::new();
    let model = ProfileModel::new(store.clone(), PROFILES);

    // Version 0
    let created = model.create(profile()).await.unwrap();
    assert_eq!(created.meta.id, "RSSMRA80A01H501U-0000000000000000");
    assert_eq!(created.version, Version::INITIAL);

    // Set an email, producing version 1
    let email = EmailAddress::new("mario.rossi@example.com").unwrap();
    let updated = model
        .update(&created.meta.id, &fiscal_code(), |p| Profile {
            email: Some(email.clone()),
            ..p
        })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.meta.id, "RSSMRA80A01H501U-0000000000000001");
    assert_eq!(updated.version.get(), 1);

    // Latest version has the new email and the original fiscal code
    let latest = model
        .find_one_profile_by_fiscal_code(&fiscal_code())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest.version.get(), 1);
    assert_eq!(latest.profile.email, Some(email));
    assert_eq!(latest.profile.fiscal_code, fiscal_code());

    // Version 0 is still there, unchanged
    let original = model
        .find(&created.meta.id, &fiscal_code())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(original, created);
    assert_eq!(original.profile.email, None);
    assert_eq!(store.documents(PROFILES).unwrap().len(), 2);
}

#[tokio::test]
async fn created_profile_round_trips_to_base() {
    let model = ProfileModel::new(InMemoryDocumentStore::new(), PROFILES);
    let entity = Profile {
        fiscal_code: fiscal_code(),
        email: EmailAddress::new("mario.rossi@example.com"),
        is_inbox_enabled: Some(true),
    };

    model.create(entity.clone()).await.unwrap();

    let found = model
        .find_one_profile_by_fiscal_code(&fiscal_code())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(ProfileBinding::to_base(&found), entity);
}

#[tokio::test]
async fn update_keeps_every_previous_version() {
    let store = InMemoryDocumentStore::new();
    let model = ProfileModel::new(store.clone(), PROFILES);
    let mut current = model.create(profile()).await.unwrap();

    for n in 1..=5u64 {
        let inbox = n % 2 == 0;
        current = model
            .update(&current.meta.id, &fiscal_code(), |p| Profile {
                is_inbox_enabled: Some(inbox),
                ..p
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(current.version.get(), n);
        assert_eq!(
            current.meta.id,
            generate_versioned_model_id(
                &ModelId::new("RSSMRA80A01H501U").unwrap(),
                Version::new(n).unwrap()
            )
        );
    }

    let versions: Vec<u64> = store
        .documents(PROFILES)
        .unwrap()
        .iter()
        .map(|doc| doc["version"].as_u64().unwrap())
        .collect();
    assert_eq!(versions, vec![0, 1, 2, 3, 4, 5]);

    let latest = model
        .find_one_profile_by_fiscal_code(&fiscal_code())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest.version.get(), 5);
    assert_eq!(latest.profile.is_inbox_enabled, Some(false));
}

#[tokio::test]
async fn update_on_missing_profile_is_empty_success() {
    let model = ProfileModel::new(InMemoryDocumentStore::new(), PROFILES);
    let result = model
        .update("RSSMRA80A01H501U-0000000000000000", &fiscal_code(), |p| p)
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn find_unknown_profile_is_none() {
    let model = ProfileModel::new(InMemoryDocumentStore::new(), PROFILES);
    let result = model
        .find_one_profile_by_fiscal_code(&fiscal_code())
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn profiles_of_different_citizens_are_independent() {
    let model = ProfileModel::new(InMemoryDocumentStore::new(), PROFILES);
    let other = versioned_documents::FiscalCode::new("VRDGPP80A01F205X").unwrap();

    let mine = model.create(profile()).await.unwrap();
    model.create(Profile::new(other.clone())).await.unwrap();
    model
        .update(&mine.meta.id, &fiscal_code(), |p| Profile {
            is_inbox_enabled: Some(true),
            ..p
        })
        .await
        .unwrap();

    let theirs = model
        .find_one_profile_by_fiscal_code(&other)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(theirs.version, Version::INITIAL);
    assert_eq!(theirs.profile.is_inbox_enabled, None);
}

#[tokio::test]
async fn read_errors_propagate_from_update() {
    let store = Arc::new(ScriptedStore::new(Answer::Unavailable, Answer::Delegate));
    let model = ProfileModel::new(store.clone(), PROFILES);

    let err = model
        .update("RSSMRA80A01H501U-0000000000000000", &fiscal_code(), |p| p)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Request { code: 503, .. }));
    assert_eq!(store.insert_count(), 0);
}

#[tokio::test]
async fn not_found_read_makes_update_a_no_op() {
    let store = Arc::new(ScriptedStore::new(Answer::NotFound, Answer::Delegate));
    let model = ProfileModel::new(store.clone(), PROFILES);

    let result = model
        .update("RSSMRA80A01H501U-0000000000000000", &fiscal_code(), |p| p)
        .await
        .unwrap();
    assert!(result.is_none());
    assert_eq!(store.insert_count(), 0);
}

#[tokio::test]
async fn query_errors_propagate_from_find() {
    let store = Arc::new(ScriptedStore::new(Answer::Delegate, Answer::Unavailable));
    let model = ProfileModel::new(store, PROFILES);

    let err = model
        .find_one_profile_by_fiscal_code(&fiscal_code())
        .await
        .unwrap_err();
    assert_eq!(err.code(), 503);
}

#[tokio::test]
async fn empty_query_result_is_none() {
    let store = Arc::new(ScriptedStore::new(Answer::Delegate, Answer::NotFound));
    let model = ProfileModel::new(store, PROFILES);
    model.create(profile()).await.unwrap();

    let result = model
        .find_one_profile_by_fiscal_code(&fiscal_code())
        .await
        .unwrap();
    assert!(result.is_none());
}
