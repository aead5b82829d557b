//! Mention resolution against the in-memory users collection

use activity_mentions::{CachedUserDirectory, MentionExtractor, MentionResolver, StoreUserDirectory};
use activity_model::{User, UserId};
use activity_store::{InMemoryStore, USERS_COLLECTION};
use std::sync::Arc;

fn seeded_store() -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());
    store.seed_users(&[
        User::new(1u64, "alice"),
        User::new(2u64, "bob-smith"),
        User::new(3u64, "carol_1"),
    ]);
    store
}

fn store_resolver(store: &Arc<InMemoryStore>) -> MentionResolver {
    MentionResolver::new(Arc::new(StoreUserDirectory::new(store.clone(), USERS_COLLECTION)))
}

#[tokio::test]
async fn every_existing_username_resolves() {
    let store = seeded_store();
    let ids = store_resolver(&store)
        .resolve("ping user/alice, user/bob-smith and user/nobody; cc user/carol_1")
        .await
        .unwrap();

    assert_eq!(ids, vec![UserId(1), UserId(2), UserId(3)]);
}

#[tokio::test]
async fn html_content_resolves_profile_links() {
    let store = seeded_store();
    let html = r#"<p>Thanks <a href="https://polkadot.polkassembly.io/user/alice">@alice</a></p>"#;

    let ids = store_resolver(&store).resolve(html).await.unwrap();
    assert_eq!(ids, vec![UserId(1)]);
}

#[tokio::test]
async fn content_over_limit_resolves_nothing() {
    let store = seeded_store();
    let content = format!("user/alice {}", "user/ ".repeat(1000));

    let ids = store_resolver(&store).resolve(&content).await.unwrap();
    assert!(ids.is_empty());
    assert_eq!(store.queries_on(USERS_COLLECTION), 0);
}

#[tokio::test]
async fn custom_scan_limit_is_honoured() {
    let store = seeded_store();
    let resolver = MentionResolver::with_extractor(
        MentionExtractor::with_scan_limit(1),
        Arc::new(StoreUserDirectory::new(store.clone(), USERS_COLLECTION)),
    );

    assert!(resolver.resolve("user/alice user/bob-smith").await.unwrap().is_empty());
    assert_eq!(resolver.resolve("user/alice").await.unwrap(), vec![UserId(1)]);
}

#[tokio::test]
async fn cached_directory_avoids_repeat_queries() {
    let store = seeded_store();
    let directory = StoreUserDirectory::new(store.clone(), USERS_COLLECTION);
    let cached = Arc::new(CachedUserDirectory::new(Arc::new(directory), 1_000));
    let resolver = MentionResolver::new(cached);

    resolver.resolve("user/alice user/bob-smith").await.unwrap();
    let after_first = store.queries_on(USERS_COLLECTION);
    assert_eq!(after_first, 2);

    let ids = resolver.resolve("again user/alice and user/bob-smith").await.unwrap();
    assert_eq!(ids, vec![UserId(1), UserId(2)]);
    assert_eq!(store.queries_on(USERS_COLLECTION), after_first);
}
