//! Admin maintenance endpoints for duplicate and featured listings

use axum::{extract::Extension, Json};

use crate::domains::listings::actions::{manage_duplicates, manage_featured};
use crate::domains::listings::{
    DuplicatesRequest, DuplicatesResponse, FeaturedRequest, FeaturedResponse,
};
use crate::server::app::AxumAppState;
use crate::server::error::ApiError;

pub async fn duplicates_handler(
    Extension(state): Extension<AxumAppState>,
    Json(request): Json<DuplicatesRequest>,
) -> Result<Json<DuplicatesResponse>, ApiError> {
    let response = manage_duplicates(request, &state.deps).await?;
    Ok(Json(response))
}

pub async fn featured_handler(
    Extension(state): Extension<AxumAppState>,
    Json(request): Json<FeaturedRequest>,
) -> Result<Json<FeaturedResponse>, ApiError> {
    let response = manage_featured(request, &state.deps).await?;
    Ok(Json(response))
}
