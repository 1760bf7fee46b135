//! Catalogue Endpoints
//!
//! `:list` is one of `global-cities`, `global-countries`, `trade-show-cities`.
//!
//! - `GET /api/catalogues/:list` - Names in a list
//! - `POST /api/catalogues/:list` - Add `{ "name": ... }` if absent
//! - `DELETE /api/catalogues/:list/:name` - Remove a name if present

use super::response::{ApiError, ApiResult, OperationResponse};
use super::AppState;
use crate::models::CatalogueList;
use crate::services::CatalogueChange;
use axum::{
    extract::{Path, State},
    response::Json,
    routing::{delete, get},
    Router,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CatalogueNameInput {
    name: String,
}

fn parse_list(raw: &str) -> Result<CatalogueList, ApiError> {
    raw.parse::<CatalogueList>().map_err(ApiError::bad_request)
}

async fn list_names(
    State(state): State<AppState>,
    Path(list): Path<String>,
) -> ApiResult<Vec<String>> {
    let list = parse_list(&list)?;
    let names = state.coordinator.catalogue().names(list).await?;
    Ok(Json(OperationResponse::ok(names)))
}

async fn add_name(
    State(state): State<AppState>,
    Path(list): Path<String>,
    Json(input): Json<CatalogueNameInput>,
) -> ApiResult<CatalogueChange> {
    let list = parse_list(&list)?;
    let change = state.coordinator.catalogue().add_name(list, &input.name).await?;
    Ok(Json(OperationResponse::ok(change)))
}

async fn remove_name(
    State(state): State<AppState>,
    Path((list, name)): Path<(String, String)>,
) -> ApiResult<CatalogueChange> {
    let list = parse_list(&list)?;
    let change = state.coordinator.catalogue().remove_name(list, &name).await?;
    Ok(Json(OperationResponse::ok(change)))
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/catalogues/:list", get(list_names).post(add_name))
        .route("/api/catalogues/:list/:name", delete(remove_name))
        .with_state(state)
}
