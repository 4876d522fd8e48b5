use axum::{extract::Extension, Json};

use crate::common::DirectoryError;
use crate::domains::settings::SiteSettings;
use crate::server::app::AxumAppState;
use crate::server::error::ApiError;

/// Current site settings, served from the TTL cache
pub async fn settings_handler(
    Extension(state): Extension<AxumAppState>,
) -> Result<Json<SiteSettings>, ApiError> {
    let settings = state
        .deps
        .settings
        .get()
        .await
        .map_err(DirectoryError::StoreRead)?;
    Ok(Json(settings))
}
