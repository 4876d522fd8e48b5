use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{CityId, Scope, StateId};

/// A city in the directory. Listings belong to exactly one city.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct City {
    pub id: CityId,
    pub name: String,
    pub state_id: StateId,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl City {
    pub async fn find_by_id(id: CityId, pool: &PgPool) -> Result<Option<Self>> {
        let city = sqlx::query_as::<_, Self>("SELECT * FROM cities WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(city)
    }

    pub async fn find_by_state(state_id: StateId, pool: &PgPool) -> Result<Vec<Self>> {
        let cities = sqlx::query_as::<_, Self>(
            "SELECT * FROM cities WHERE state_id = $1 ORDER BY name ASC",
        )
        .bind(state_id)
        .fetch_all(pool)
        .await?;
        Ok(cities)
    }

    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        let cities = sqlx::query_as::<_, Self>("SELECT * FROM cities ORDER BY name ASC")
            .fetch_all(pool)
            .await?;
        Ok(cities)
    }

    /// Cities covered by a scope
    pub async fn find_in_scope(scope: &Scope, pool: &PgPool) -> Result<Vec<Self>> {
        match scope {
            Scope::City(id) => Ok(Self::find_by_id(*id, pool).await?.into_iter().collect()),
            Scope::State(state_id) => Self::find_by_state(*state_id, pool).await,
            Scope::All => Self::find_all(pool).await,
        }
    }

    pub async fn create(name: &str, state_id: StateId, pool: &PgPool) -> Result<Self> {
        let city = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO cities (id, name, state_id)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(CityId::new())
        .bind(name)
        .bind(state_id)
        .fetch_one(pool)
        .await?;
        Ok(city)
    }
}
