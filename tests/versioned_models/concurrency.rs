use std::sync::Arc;

use versioned_documents::{InMemoryDocumentStore, Profile, ProfileModel, StoreError};

use crate::support::{fiscal_code, profile, PROFILES};

#[tokio::test]
async fn racing_updates_from_same_version_one_wins() {
    let store = InMemoryDocumentStore::new();
    let model = ProfileModel::new(store.clone(), PROFILES);
    let v0 = model.create(profile()).await.unwrap();
    let code = fiscal_code();

    let (first, second) = tokio::join!(
        model.update(&v0.meta.id, &code, |p| Profile {
            is_inbox_enabled: Some(true),
            ..p
        }),
        model.update(&v0.meta.id, &code, |p| Profile {
            is_inbox_enabled: Some(false),
            ..p
        }),
    );

    let outcomes = [first, second];
    let winners: Vec<_> = outcomes
        .iter()
        .filter_map(|r| r.as_ref().ok().and_then(|doc| doc.as_ref()))
        .collect();
    assert_eq!(winners.len(), 1);
    assert_eq!(winners[0].version.get(), 1);
    assert_eq!(winners[0].meta.id, "RSSMRA80A01H501U-0000000000000001");

    let losers: Vec<&StoreError> = outcomes.iter().filter_map(|r| r.as_ref().err()).collect();
    assert_eq!(losers.len(), 1);
    assert!(losers[0].is_conflict());

    assert_eq!(store.documents(PROFILES).unwrap().len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn many_writers_from_same_version_one_wins() {
    let model = Arc::new(ProfileModel::new(InMemoryDocumentStore::new(), PROFILES));
    let v0 = model.create(profile()).await.unwrap();

    let mut handles = Vec::new();
    for writer in 0..8u32 {
        let model = Arc::clone(&model);
        let id = v0.meta.id.clone();
        handles.push(tokio::spawn(async move {
            model
                .update(&id, &fiscal_code(), move |p| Profile {
                    is_inbox_enabled: Some(writer % 2 == 0),
                    ..p
                })
                .await
        }));
    }

    let mut successes = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(Some(doc)) => {
                assert_eq!(doc.version.get(), 1);
                successes += 1;
            }
            Err(err) if err.is_conflict() => conflicts += 1,
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
    assert_eq!(successes, 1);
    assert_eq!(conflicts, 7);
}

#[tokio::test]
async fn loser_can_retry_from_latest_version() {
    let model = ProfileModel::new(InMemoryDocumentStore::new(), PROFILES);
    let v0 = model.create(profile()).await.unwrap();
    let code = fiscal_code();

    model.update(&v0.meta.id, &code, |p| p).await.unwrap();
    let err = model.update(&v0.meta.id, &code, |p| p).await.unwrap_err();
    assert!(err.is_conflict());

    // Re-read the current version and try again.
    let latest = model
        .find_one_profile_by_fiscal_code(&code)
        .await
        .unwrap()
        .unwrap();
    let retried = model
        .update(&latest.meta.id, &code, |p| Profile {
            is_inbox_enabled: Some(true),
            ..p
        })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(retried.version.get(), 2);
}

#[tokio::test]
async fn concurrent_creates_conflict() {
    let model = ProfileModel::new(InMemoryDocumentStore::new(), PROFILES);
    let (a, b) = tokio::join!(model.create(profile()), model.create(profile()));
    assert!(a.is_ok() != b.is_ok());
    let err = a.err().or(b.err()).unwrap();
    assert!(err.is_conflict());
}
