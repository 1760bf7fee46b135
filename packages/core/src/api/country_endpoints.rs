//! Country Endpoints
//!
//! - `GET /api/countries` - List Countries
//! - `POST /api/countries` - Create a Country (slug derived from name when blank)
//!
//! `selected_cities` is not editable here; it changes only through City flows.

use super::response::{ApiResult, OperationResponse};
use super::AppState;
use crate::models::{Country, NewCountry};
use axum::{extract::State, response::Json, routing::get, Router};

async fn list_countries(State(state): State<AppState>) -> ApiResult<Vec<Country>> {
    let countries = state.coordinator.links().list_countries().await?;
    Ok(Json(OperationResponse::ok(countries)))
}

async fn create_country(
    State(state): State<AppState>,
    Json(new_country): Json<NewCountry>,
) -> ApiResult<Country> {
    let country = state.coordinator.links().create_country(new_country).await?;
    Ok(Json(OperationResponse::ok(country)))
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/countries", get(list_countries).post(create_country))
        .with_state(state)
}
