// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! End-to-end search and saved-search flows against a live Postgres.
//!
//! Each test seeds its own listings under a unique city name so the
//! assertions hold on a shared database.

use estate_desk::models::auth::{AuthUser, UserRole};
use estate_desk::models::property::PropertyPayload;
use estate_desk::models::search::SearchFilters;
use estate_desk::services::auth::AuthService;
use estate_desk::services::error::ApiError;
use estate_desk::services::properties::PropertyStore;
use estate_desk::services::saved_searches::{self, SavedSearchStore};
use sqlx::PgPool;
use uuid::Uuid;

async fn test_pool() -> PgPool {
    let url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "postgres://localhost/estate_desk_test".to_string());
    let pool = PgPool::connect(&url).await.expect("connect test database");
    sqlx::migrate!().run(&pool).await.expect("run migrations");
    pool
}

async fn create_broker(pool: &PgPool) -> AuthUser {
    let id = Uuid::now_v7();
    let email = format!("broker-{id}@example.com");
    let password_hash = AuthService::hash_password("test-password-1").unwrap();

    sqlx::query(
        "INSERT INTO users (id, email, password_hash, role) VALUES ($1, $2, $3, 'individual')",
    )
    .bind(id)
    .bind(&email)
    .bind(&password_hash)
    .execute(pool)
    .await
    .expect("insert broker");

    AuthUser {
        user_id: id,
        email,
        role: UserRole::Individual,
        agency_id: None,
    }
}

async fn seed_apartments(
    pool: &PgPool,
    broker: &AuthUser,
    city: &str,
    prices: &[f64],
) {
    let store = PropertyStore::new(pool.clone());
    for price in prices {
        store
            .create(
                broker,
                &PropertyPayload {
                    city: Some(city.to_string()),
                    property_type: Some("apartment".to_string()),
                    purpose: Some("sale".to_string()),
                    price: Some(*price),
                    area_m2: Some(55.0),
                    num_rooms: Some(2),
                    description: Some("bright renovated flat with balcony".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("seed listing");
    }
}

const FIXTURE_PRICES: [f64; 12] = [
    50_000.0, 75_000.0, 100_000.0, 110_000.0, 125_000.0, 150_000.0, 160_000.0, 175_000.0,
    200_000.0, 250_000.0, 275_000.0, 300_000.0,
];

#[tokio::test]
#[ignore] // Requires Postgres
async fn test_price_band_scenario() {
    let pool = test_pool().await;
    let broker = create_broker(&pool).await;
    let city = format!("Vilnius-{}", Uuid::now_v7());
    seed_apartments(&pool, &broker, &city, &FIXTURE_PRICES).await;

    let filters = SearchFilters {
        property_type: Some("apartment".to_string()),
        city: Some(city.clone()),
        min_price: Some("100000".to_string()),
        max_price: Some("200000".to_string()),
        sort_by: Some("price".to_string()),
        sort_order: Some("asc".to_string()),
        page: Some("1".to_string()),
        limit: Some("9".to_string()),
        ..Default::default()
    };

    let response = PropertyStore::new(pool.clone()).search(&filters).await.unwrap();

    // Seven of the twelve prices fall inside the inclusive band.
    assert_eq!(response.count, 7);
    assert_eq!(response.total_pages, 1);
    assert_eq!(response.properties.len(), 7);

    let prices: Vec<f64> = response
        .properties
        .iter()
        .map(|p| p.price.unwrap())
        .collect();
    let mut sorted = prices.clone();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(prices, sorted, "ascending by price");
    assert!(prices.iter().all(|p| (100_000.0..=200_000.0).contains(p)));
}

#[tokio::test]
#[ignore] // Requires Postgres
async fn test_count_reflects_full_matching_set_not_page_size() {
    let pool = test_pool().await;
    let broker = create_broker(&pool).await;
    let city = format!("Kaunas-{}", Uuid::now_v7());
    seed_apartments(&pool, &broker, &city, &FIXTURE_PRICES).await;

    let filters = SearchFilters {
        city: Some(city.clone()),
        limit: Some("5".to_string()),
        ..Default::default()
    };

    let page1 = PropertyStore::new(pool.clone()).search(&filters).await.unwrap();
    assert_eq!(page1.count, 12);
    assert_eq!(page1.properties.len(), 5);
    assert_eq!(page1.total_pages, 3);

    let last = SearchFilters {
        page: Some("3".to_string()),
        ..filters
    };
    let page3 = PropertyStore::new(pool.clone()).search(&last).await.unwrap();
    assert_eq!(page3.properties.len(), 2, "short last page");
    assert_eq!(page3.count, 12);
}

#[tokio::test]
#[ignore] // Requires Postgres
async fn test_keyword_terms_are_and_combined() {
    let pool = test_pool().await;
    let broker = create_broker(&pool).await;
    let city = format!("Klaipeda-{}", Uuid::now_v7());

    let store = PropertyStore::new(pool.clone());
    for description in ["renovated flat with balcony", "renovated flat", "balcony only"] {
        store
            .create(
                &broker,
                &PropertyPayload {
                    city: Some(city.clone()),
                    description: Some(description.to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
    }

    let filters = SearchFilters {
        city: Some(city.clone()),
        keywords: Some("renovated balcony".to_string()),
        ..Default::default()
    };
    let response = store.search(&filters).await.unwrap();
    assert_eq!(response.count, 1, "both terms must match");
}

#[tokio::test]
#[ignore] // Requires Postgres
async fn test_saved_search_save_apply_delete_round_trip() {
    let pool = test_pool().await;
    let broker = create_broker(&pool).await;
    let store = SavedSearchStore::new(pool.clone());

    let filters = SearchFilters {
        property_type: Some("apartment".to_string()),
        city: Some("Vilnius".to_string()),
        min_price: Some("100000".to_string()),
        district: Some("".to_string()), // pruned before storage
        page: Some("4".to_string()),    // never stored
        ..Default::default()
    };

    let saved = store.save(&broker, "  Vilnius hunt  ", &filters).await.unwrap();
    assert_eq!(saved.name, "Vilnius hunt");
    assert_eq!(saved.filters.0.district, None);
    assert_eq!(saved.filters.0.page, None);

    // Apply restores the snapshot at page 1; re-saving the applied filters
    // produces an identical snapshot.
    let applied = saved_searches::apply(&saved);
    assert_eq!(applied.page.as_deref(), Some("1"));
    let resaved = store.save(&broker, "again", &applied).await.unwrap();
    assert_eq!(resaved.filters.0, saved.filters.0);

    // Delete both; the list is empty afterwards.
    store.delete(&broker, saved.id).await.unwrap();
    store.delete(&broker, resaved.id).await.unwrap();
    assert!(store.list(&broker).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore] // Requires Postgres
async fn test_deleting_anothers_saved_search_fails_and_leaves_it_listed() {
    let pool = test_pool().await;
    let owner = create_broker(&pool).await;
    let intruder = create_broker(&pool).await;
    let store = SavedSearchStore::new(pool.clone());

    let saved = store
        .save(&owner, "mine", &SearchFilters::default())
        .await
        .unwrap();

    let err = store.delete(&intruder, saved.id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    let remaining = store.list(&owner).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, saved.id);

    store.delete(&owner, saved.id).await.unwrap();
}

#[tokio::test]
#[ignore] // Requires Postgres
async fn test_empty_saved_search_name_is_rejected_without_touching_storage() {
    let pool = test_pool().await;
    let broker = create_broker(&pool).await;
    let store = SavedSearchStore::new(pool.clone());

    let err = store
        .save(&broker, "   ", &SearchFilters::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    assert!(store.list(&broker).await.unwrap().is_empty());
}
