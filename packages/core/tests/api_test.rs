//! Console API Tests
//!
//! Drives the axum router in-process with `oneshot` and checks the
//! `{ data, error, warnings }` envelope and status codes.

mod common;

#[cfg(test)]
mod api_tests {
    use super::common::{seed_country, selected_cities, FlakyStore};
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
        Router,
    };
    use cityline_core::api::{create_router, AppState};
    use cityline_core::services::{CityCoordinator, RevalidationNotifier};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(store: &Arc<FlakyStore>) -> Router {
        let coordinator = CityCoordinator::new(store.clone(), RevalidationNotifier::disabled());
        create_router(AppState::new(coordinator))
    }

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn create(app: &Router, name: &str, country: &str) -> (StatusCode, Value) {
        call(
            app,
            Method::POST,
            "/api/cities",
            Some(json!({ "name": name, "countrySlug": country })),
        )
        .await
    }

    #[tokio::test]
    async fn test_health() {
        let store = FlakyStore::new();
        let (status, body) = call(&app(&store), Method::GET, "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_create_and_fetch_city() {
        let store = FlakyStore::new();
        let app = app(&store);

        let (status, body) = create(&app, "Lyon", "france").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["citySlug"], "lyon");
        assert!(body["error"].is_null());
        assert!(body.get("warnings").is_none());

        let id = body["data"]["id"].as_str().unwrap().to_string();
        let (status, body) = call(&app, Method::GET, &format!("/api/cities/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["name"], "Lyon");

        let (_, body) = call(&app, Method::GET, "/api/cities", None).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_city_is_conflict() {
        let store = FlakyStore::new();
        let app = app(&store);
        create(&app, "Lyon", "").await;

        let (status, body) = create(&app, "LYON", "").await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "DUPLICATE_CITY");
        assert!(body["data"].is_null());
    }

    #[tokio::test]
    async fn test_blank_name_is_bad_request() {
        let store = FlakyStore::new();
        let (status, body) = create(&app(&store), "   ", "").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_INPUT");
    }

    #[tokio::test]
    async fn test_availability_check() {
        let store = FlakyStore::new();
        let app = app(&store);
        create(&app, "Lyon", "").await;

        let (status, body) =
            call(&app, Method::GET, "/api/cities/availability?name=lyon", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["ok"], false);

        let (_, body) = call(&app, Method::GET, "/api/cities/availability?name=Nice", None).await;
        assert_eq!(body["data"]["ok"], true);
        assert_eq!(body["data"]["slug"], "nice");
    }

    #[tokio::test]
    async fn test_catalogue_warning_surfaces_in_envelope() {
        let store = FlakyStore::new();
        store.inject(|f| f.trade_shows_save = true);

        let (status, body) = create(&app(&store), "Lyon", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["warnings"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_reparent_via_patch() {
        let store = FlakyStore::new();
        seed_country(&store, "france", "France", &["lyon"]).await;
        seed_country(&store, "spain", "Spain", &[]).await;
        let app = app(&store);
        let (_, body) = create(&app, "Lyon", "france").await;
        let uri = format!("/api/cities/{}", body["data"]["id"].as_str().unwrap());

        let (status, body) = call(
            &app,
            Method::PATCH,
            &uri,
            Some(json!({ "countrySlug": "spain" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["countrySlug"], "spain");
        assert!(selected_cities(&store, "france").await.is_empty());
        assert_eq!(selected_cities(&store, "spain").await, vec!["lyon".to_string()]);

        let (status, body) = call(
            &app,
            Method::PATCH,
            &uri,
            Some(json!({ "countrySlug": "atlantis" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "PARTIAL_SYNC_FAILURE");
    }

    #[tokio::test]
    async fn test_delete_city() {
        let store = FlakyStore::new();
        seed_country(&store, "france", "France", &["lyon"]).await;
        let app = app(&store);
        let (_, body) = create(&app, "Lyon", "france").await;
        let uri = format!("/api/cities/{}", body["data"]["id"].as_str().unwrap());

        let (status, body) = call(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], true);
        assert!(selected_cities(&store, "france").await.is_empty());

        let (status, body) = call(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_store_failure_is_internal_error() {
        let store = FlakyStore::new();
        store.inject(|f| f.city_insert = true);

        let (status, body) = create(&app(&store), "Lyon", "").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "PERSISTENCE_ERROR");
    }

    #[tokio::test]
    async fn test_countries() {
        let store = FlakyStore::new();
        let app = app(&store);

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/countries",
            Some(json!({ "slug": "", "name": "United Kingdom" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["slug"], "united-kingdom");

        let (_, body) = call(&app, Method::GET, "/api/countries", None).await;
        assert_eq!(body["data"][0]["name"], "United Kingdom");
    }

    #[tokio::test]
    async fn test_catalogue_endpoints() {
        let store = FlakyStore::new();
        let app = app(&store);

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/catalogues/global-countries",
            Some(json!({ "name": "France" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["changed"], true);

        let (_, body) = call(&app, Method::GET, "/api/catalogues/global-countries", None).await;
        assert_eq!(body["data"], json!(["France"]));

        let (status, body) = call(
            &app,
            Method::DELETE,
            "/api/catalogues/global-countries/france",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["names"], json!([]));
    }

    #[tokio::test]
    async fn test_unknown_catalogue_is_bad_request() {
        let store = FlakyStore::new();
        let (status, body) =
            call(&app(&store), Method::GET, "/api/catalogues/favourites", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_INPUT");
    }
}
