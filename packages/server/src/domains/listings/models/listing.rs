use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use typed_builder::TypedBuilder;

use crate::common::{CityId, ListingId, Scope};

/// Listing - a business entry in the directory
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Listing {
    pub id: ListingId,
    pub business_name: String,
    pub category: String,
    pub address: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,

    // Quality signals
    pub review_rating: f64,
    pub number_of_reviews: i32,

    // Promotional placement, capped at 3 per city
    pub featured: bool,

    pub city_id: CityId,
    pub created_at: DateTime<Utc>,
}

impl Listing {
    /// Phone presence is the quality gate for automatic featuring
    pub fn has_phone(&self) -> bool {
        is_present(self.phone.as_deref())
    }

    pub fn has_website(&self) -> bool {
        is_present(self.website.as_deref())
    }

    /// Materialize a new listing without a database round trip.
    pub fn from_new(input: NewListing) -> Self {
        Self {
            id: ListingId::new(),
            business_name: input.business_name,
            category: input.category,
            address: input.address,
            phone: input.phone,
            website: input.website,
            email: input.email,
            review_rating: input.review_rating,
            number_of_reviews: input.number_of_reviews,
            featured: input.featured,
            city_id: input.city_id,
            created_at: input.created_at.unwrap_or_else(Utc::now),
        }
    }
}

fn is_present(value: Option<&str>) -> bool {
    value.map(|v| !v.trim().is_empty()).unwrap_or(false)
}

/// Input for creating a listing (import or manual entry)
#[derive(Debug, Clone, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct NewListing {
    pub business_name: String,
    pub city_id: CityId,
    #[builder(default)]
    pub category: String,
    #[builder(default)]
    pub address: String,
    #[builder(default, setter(strip_option))]
    pub phone: Option<String>,
    #[builder(default, setter(strip_option))]
    pub website: Option<String>,
    #[builder(default, setter(strip_option))]
    pub email: Option<String>,
    #[builder(default)]
    pub review_rating: f64,
    #[builder(default)]
    pub number_of_reviews: i32,
    #[builder(default)]
    pub featured: bool,
    /// Defaults to now() when unset
    #[builder(default, setter(strip_option))]
    pub created_at: Option<DateTime<Utc>>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Listing {
    pub async fn find_by_id(id: ListingId, pool: &PgPool) -> Result<Option<Self>> {
        let listing = sqlx::query_as::<_, Listing>("SELECT * FROM listings WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(listing)
    }

    /// All listings in a city, oldest first
    pub async fn find_by_city(city_id: CityId, pool: &PgPool) -> Result<Vec<Self>> {
        let listings = sqlx::query_as::<_, Listing>(
            "SELECT * FROM listings
             WHERE city_id = $1
             ORDER BY created_at ASC, id ASC",
        )
        .bind(city_id)
        .fetch_all(pool)
        .await?;
        Ok(listings)
    }

    /// All listings in a scope, oldest first
    pub async fn find_in_scope(scope: &Scope, pool: &PgPool) -> Result<Vec<Self>> {
        let listings = match scope {
            Scope::City(city_id) => return Self::find_by_city(*city_id, pool).await,
            Scope::State(state_id) => {
                sqlx::query_as::<_, Listing>(
                    "SELECT l.* FROM listings l
                     JOIN cities c ON c.id = l.city_id
                     WHERE c.state_id = $1
                     ORDER BY l.created_at ASC, l.id ASC",
                )
                .bind(state_id)
                .fetch_all(pool)
                .await?
            }
            Scope::All => {
                sqlx::query_as::<_, Listing>(
                    "SELECT * FROM listings ORDER BY created_at ASC, id ASC",
                )
                .fetch_all(pool)
                .await?
            }
        };
        Ok(listings)
    }

    pub async fn count_featured_in_city(city_id: CityId, pool: &PgPool) -> Result<i64> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM listings WHERE city_id = $1 AND featured = true",
        )
        .bind(city_id)
        .fetch_one(pool)
        .await?;
        Ok(count.0)
    }

    pub async fn create(input: NewListing, pool: &PgPool) -> Result<Self> {
        let listing = sqlx::query_as::<_, Listing>(
            r#"
            INSERT INTO listings (
                id, business_name, category, address, phone, website, email,
                review_rating, number_of_reviews, featured, city_id, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, COALESCE($12, NOW()))
            RETURNING *
            "#,
        )
        .bind(ListingId::new())
        .bind(&input.business_name)
        .bind(&input.category)
        .bind(&input.address)
        .bind(&input.phone)
        .bind(&input.website)
        .bind(&input.email)
        .bind(input.review_rating)
        .bind(input.number_of_reviews)
        .bind(input.featured)
        .bind(input.city_id)
        .bind(input.created_at)
        .fetch_one(pool)
        .await?;
        Ok(listing)
    }

    /// Hard delete in a single statement (atomic)
    pub async fn delete_many(ids: &[ListingId], pool: &PgPool) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query("DELETE FROM listings WHERE id = ANY($1)")
            .bind(ids)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn set_featured_many(ids: &[ListingId], featured: bool, pool: &PgPool) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query("UPDATE listings SET featured = $2 WHERE id = ANY($1)")
            .bind(ids)
            .bind(featured)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
