//! City Endpoints
//!
//! - `GET /api/cities` - List Cities
//! - `GET /api/cities/availability?name=` - Uniqueness pre-check for the create form
//! - `GET /api/cities/:id` - Get a City
//! - `POST /api/cities` - Create a City (guard, insert, catalogue fan-out)
//! - `PATCH /api/cities/:id` - Edit a City, re-parenting it if `countrySlug` changed
//! - `DELETE /api/cities/:id` - Delete a City and clean Country references

use super::response::{ApiResult, OperationResponse};
use super::AppState;
use crate::models::{City, CityUpdate, NewCity};
use crate::services::GuardVerdict;
use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    name: String,
}

async fn list_cities(State(state): State<AppState>) -> ApiResult<Vec<City>> {
    let cities = state.coordinator.list_cities().await?;
    Ok(Json(OperationResponse::ok(cities)))
}

async fn city_availability(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> ApiResult<GuardVerdict> {
    let verdict = state.coordinator.can_create_city(&query.name).await?;
    Ok(Json(OperationResponse::ok(verdict)))
}

async fn get_city(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<City> {
    let city = state.coordinator.get_city(&id).await?;
    Ok(Json(OperationResponse::ok(city)))
}

async fn create_city(
    State(state): State<AppState>,
    Json(new_city): Json<NewCity>,
) -> ApiResult<City> {
    let outcome = state.coordinator.create_city(new_city).await?;
    Ok(Json(outcome.into()))
}

async fn update_city(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<CityUpdate>,
) -> ApiResult<City> {
    let outcome = state.coordinator.update_city(&id, update).await?;
    Ok(Json(outcome.into()))
}

async fn delete_city(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<bool> {
    let outcome = state.coordinator.delete_city(&id).await?;
    Ok(Json(outcome.into()))
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/cities", get(list_cities).post(create_city))
        .route("/api/cities/availability", get(city_availability))
        .route(
            "/api/cities/:id",
            get(get_city).patch(update_city).delete(delete_city),
        )
        .with_state(state)
}
