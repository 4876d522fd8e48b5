//! Test fixtures for creating test data.
//!
//! These fixtures use the model methods directly to create test data.
//! Names carry a random suffix so tests sharing the database stay apart.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use directory_core::common::StateId;
use directory_core::domains::listings::models::{Listing, NewListing};
use directory_core::domains::locations::models::{City, State};
use sqlx::PgPool;
use uuid::Uuid;

fn unique(name: &str) -> String {
    format!("{} {}", name, &Uuid::new_v4().simple().to_string()[..8])
}

pub async fn create_test_state(pool: &PgPool, name: &str) -> Result<State> {
    State::create(&unique(name), None, pool).await
}

/// City in a fresh state of its own
pub async fn create_test_city(pool: &PgPool, name: &str) -> Result<City> {
    let state = create_test_state(pool, "Minnesota").await?;
    create_test_city_in_state(pool, name, state.id).await
}

pub async fn create_test_city_in_state(pool: &PgPool, name: &str, state_id: StateId) -> Result<City> {
    City::create(name, state_id, pool).await
}

/// Creation time for the `offset`-th row: one minute apart, larger offsets are newer
pub fn created_minute(offset: i64) -> DateTime<Utc> {
    Utc::now() - Duration::minutes(60 - offset)
}

pub async fn create_test_listing(
    pool: &PgPool,
    city: &City,
    name: &str,
    address: &str,
    phone: Option<&str>,
    created_at: DateTime<Utc>,
) -> Result<Listing> {
    let input = match phone {
        Some(phone) => NewListing::builder()
            .business_name(name)
            .address(address)
            .phone(phone)
            .city_id(city.id)
            .created_at(created_at)
            .build(),
        None => NewListing::builder()
            .business_name(name)
            .address(address)
            .city_id(city.id)
            .created_at(created_at)
            .build(),
    };
    Listing::create(input, pool).await
}

pub async fn create_rated_listing(
    pool: &PgPool,
    city: &City,
    name: &str,
    rating: f64,
    phone: &str,
) -> Result<Listing> {
    Listing::create(
        NewListing::builder()
            .business_name(name)
            .phone(phone)
            .review_rating(rating)
            .city_id(city.id)
            .build(),
        pool,
    )
    .await
}
