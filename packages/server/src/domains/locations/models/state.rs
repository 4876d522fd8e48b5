use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::StateId;

/// Geographic grouping of cities
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct State {
    pub id: StateId,
    pub name: String,
    pub abbreviation: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl State {
    pub async fn find_by_id(id: StateId, pool: &PgPool) -> Result<Option<Self>> {
        let state = sqlx::query_as::<_, Self>("SELECT * FROM states WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(state)
    }

    pub async fn find_by_ids(ids: &[StateId], pool: &PgPool) -> Result<Vec<Self>> {
        let states = sqlx::query_as::<_, Self>(
            "SELECT * FROM states WHERE id = ANY($1) ORDER BY name ASC",
        )
        .bind(ids)
        .fetch_all(pool)
        .await?;
        Ok(states)
    }

    pub async fn create(name: &str, abbreviation: Option<&str>, pool: &PgPool) -> Result<Self> {
        let state = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO states (id, name, abbreviation)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(StateId::new())
        .bind(name)
        .bind(abbreviation)
        .fetch_one(pool)
        .await?;
        Ok(state)
    }
}
