use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

pub const SITE_NAME_KEY: &str = "site_name";
pub const NICHE_KEY: &str = "niche";
pub const COUNTRY_KEY: &str = "country";

/// A raw key/value row from `site_settings`
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SiteSetting {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

impl SiteSetting {
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        let rows = sqlx::query_as::<_, Self>("SELECT * FROM site_settings ORDER BY key ASC")
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }

    pub async fn upsert(key: &str, value: &str, pool: &PgPool) -> Result<Self> {
        let row = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO site_settings (key, value, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(key)
        .bind(value)
        .fetch_one(pool)
        .await?;
        Ok(row)
    }
}

/// Site-wide settings used when rendering directory pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
    pub site_name: String,
    pub niche: String,
    pub country: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            site_name: "Business Directory".to_string(),
            niche: "local businesses".to_string(),
            country: "United States".to_string(),
        }
    }
}

impl SiteSettings {
    /// Build from rows; missing or blank keys keep their defaults.
    pub fn from_rows(rows: &[SiteSetting]) -> Self {
        let mut settings = Self::default();
        for row in rows {
            let value = row.value.trim();
            if value.is_empty() {
                continue;
            }
            match row.key.as_str() {
                SITE_NAME_KEY => settings.site_name = value.to_string(),
                NICHE_KEY => settings.niche = value.to_string(),
                COUNTRY_KEY => settings.country = value.to_string(),
                _ => {}
            }
        }
        settings
    }

    pub async fn load(pool: &PgPool) -> Result<Self> {
        let rows = SiteSetting::find_all(pool).await?;
        Ok(Self::from_rows(&rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(key: &str, value: &str) -> SiteSetting {
        SiteSetting {
            key: key.to_string(),
            value: value.to_string(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let settings = SiteSettings::from_rows(&[row(NICHE_KEY, "pet boarding")]);
        assert_eq!(settings.niche, "pet boarding");
        assert_eq!(settings.site_name, SiteSettings::default().site_name);
    }

    #[test]
    fn test_blank_and_unknown_keys_are_ignored() {
        let settings = SiteSettings::from_rows(&[
            row(SITE_NAME_KEY, "   "),
            row("theme_color", "#ff0000"),
            row(COUNTRY_KEY, "Canada"),
        ]);
        assert_eq!(settings.site_name, SiteSettings::default().site_name);
        assert_eq!(settings.country, "Canada");
    }
}
