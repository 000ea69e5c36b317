use adboard::accounts::session::{create_account, create_session};
use adboard::accounts::AccountId;
use adboard::adverts::{
    AdvertDraft, AdvertError, AdvertId, AdvertService, AdvertStore, Author, PageRequest,
    SqliteAdvertStore,
};
use adboard::db;
use adboard::state::DbPool;
use chrono::{DateTime, Duration, TimeZone, Utc};
use tempfile::TempDir;

struct Board {
    _dir: TempDir,
    pool: DbPool,
    store: SqliteAdvertStore,
    service: AdvertService,
}

fn board() -> Board {
    let dir = TempDir::new().unwrap();
    let pool = db::create_pool(&dir.path().join("adboard.db")).expect("Failed to create test database");
    db::run_migrations(&pool).expect("Failed to run migrations");
    Board {
        store: SqliteAdvertStore::new(pool.clone()),
        service: adboard::build_service(&pool),
        pool,
        _dir: dir,
    }
}

fn user(pool: &DbPool, name: &str, admin: bool) -> (AccountId, String) {
    let id = create_account(pool, name, admin).unwrap();
    let token = create_session(pool, id, 1).unwrap();
    (id, token)
}

fn day(n: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap() + Duration::days(n)
}

fn draft(title: &str, synopsis: &str) -> AdvertDraft {
    AdvertDraft {
        title: title.into(),
        price: "100".into(),
        location: "Brest".into(),
        synopsis: synopsis.into(),
        phone: "+375 29 000".into(),
        photos: vec![format!("{}.jpg", title.to_lowercase())],
    }
}

async fn publish(store: &SqliteAdvertStore, draft: AdvertDraft, author: Author, date: DateTime<Utc>) -> AdvertId {
    let mut advert = store.insert(draft, author, date).await.unwrap();
    advert.is_shown = true;
    store.save(&advert).await.unwrap();
    advert.id
}

#[tokio::test]
async fn pages_walk_from_newest_to_oldest() {
    let b = board();
    let mut by_day = Vec::new();
    for n in 1..=30 {
        let id = publish(&b.store, draft(&format!("Ad{}", n), ""), Author::Unauthenticated, day(n)).await;
        by_day.push(id);
    }

    let page0 = b.service.list_recent(PageRequest::page(0)).await.unwrap();
    let expected0: Vec<_> = by_day[5..].iter().rev().copied().collect();
    assert_eq!(page0.iter().map(|i| i.id).collect::<Vec<_>>(), expected0);

    let page1 = b.service.list_recent(PageRequest::page(1)).await.unwrap();
    let expected1: Vec<_> = by_day[..5].iter().rev().copied().collect();
    assert_eq!(page1.iter().map(|i| i.id).collect::<Vec<_>>(), expected1);

    assert!(b.service.list_recent(PageRequest::page(2)).await.unwrap().is_empty());

    let refreshed = b
        .service
        .list_recent(PageRequest::refresh_through(1))
        .await
        .unwrap();
    assert_eq!(refreshed.len(), 30);
    assert_eq!(refreshed[..25], page0[..]);
}

#[tokio::test]
async fn listing_twice_without_writes_is_identical() {
    let b = board();
    for n in 0..4 {
        publish(&b.store, draft("Same", ""), Author::Unauthenticated, day(n % 2)).await;
    }

    let first = b.service.list_recent(PageRequest::page(0)).await.unwrap();
    let second = b.service.list_recent(PageRequest::page(0)).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn search_finds_partial_words_in_shown_adverts() {
    let b = board();
    let laptop = publish(&b.store, draft("Laptop", "barely used"), Author::Unauthenticated, day(1)).await;
    let bag = publish(&b.store, draft("Bag", "for a LAPTOP"), Author::Unauthenticated, day(2)).await;
    publish(&b.store, draft("Chair", "oak"), Author::Unauthenticated, day(3)).await;
    b.store
        .insert(draft("Laptop stand", ""), Author::Unauthenticated, day(4))
        .await
        .unwrap();

    let found = b.service.search("lap", PageRequest::page(0)).await.unwrap();
    assert_eq!(found.iter().map(|i| i.id).collect::<Vec<_>>(), vec![bag, laptop]);

    assert!(b.service.search("a", PageRequest::page(0)).await.unwrap().is_empty());
}

#[tokio::test]
async fn only_authors_edit_and_edits_return_to_moderation() {
    let b = board();
    let (_, alice) = user(&b.pool, "alice", false);
    let (_, bob) = user(&b.pool, "bob", false);
    let (_, admin) = user(&b.pool, "admin", true);

    let id = b.service.create(Some(&alice), draft("Bike", "red")).await.unwrap();
    let pending = b
        .service
        .list_pending_moderation(Some(&admin), PageRequest::page(0))
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);

    assert!(b.service.toggle_shown(Some(&admin), id).await.unwrap());
    assert_eq!(b.service.list_recent(PageRequest::page(0)).await.unwrap().len(), 1);

    let denied = b.service.update(Some(&bob), id, draft("Stolen", "")).await;
    assert!(matches!(denied, Err(AdvertError::Forbidden)));
    let denied = b.service.delete(Some(&bob), id).await;
    assert!(matches!(denied, Err(AdvertError::Forbidden)));

    b.service
        .update(Some(&alice), id, draft("Bike", "blue"))
        .await
        .unwrap();
    assert!(b.service.list_recent(PageRequest::page(0)).await.unwrap().is_empty());

    let mine = b
        .service
        .list_mine(Some(&alice), PageRequest::page(0))
        .await
        .unwrap();
    assert_eq!(mine.len(), 1);

    b.service.delete(Some(&alice), id).await.unwrap();
    let detail = b.service.get_detail(Some(&alice), id).await.unwrap();
    assert!(detail.is_missing());
}

#[tokio::test]
async fn bookmarks_survive_round_trip_through_store() {
    let b = board();
    let (_, alice) = user(&b.pool, "alice", false);
    let (bob_id, _) = user(&b.pool, "bob", false);

    let shown = publish(&b.store, draft("Lamp", ""), Author::Account(bob_id), day(1)).await;
    let hidden = b
        .store
        .insert(draft("Desk", ""), Author::Account(bob_id), day(2))
        .await
        .unwrap()
        .id;

    assert!(b.service.toggle_bookmark(Some(&alice), shown).await.unwrap());
    assert!(b.service.toggle_bookmark(Some(&alice), hidden).await.unwrap());
    assert!(b.service.toggle_bookmark(Some(&alice), AdvertId(9999)).await.unwrap());

    let saved = b
        .service
        .list_bookmarked(Some(&alice), PageRequest::page(0))
        .await
        .unwrap();
    assert_eq!(saved.iter().map(|i| i.id).collect::<Vec<_>>(), vec![shown]);

    let detail = b.service.get_detail(Some(&alice), shown).await.unwrap();
    assert!(detail.bookmarked);
    assert_eq!(detail.username, "bob");
    assert_eq!(detail.views, 1);

    assert!(!b.service.toggle_bookmark(Some(&alice), shown).await.unwrap());
    assert!(b
        .service
        .list_bookmarked(Some(&alice), PageRequest::page(0))
        .await
        .unwrap()
        .is_empty());
}
