//! Application router configuration.

use axum::{
    Json, Router,
    http::{StatusCode, Uri},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;

use crate::{
    AppState,
    analytics::{get_bar_chart, get_combined, get_pie_chart, get_statistics, get_transactions},
    endpoints,
    logging::logging_middleware,
    seed::{HttpDatasetSource, post_seed},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::TRANSACTIONS_API, get(get_transactions))
        .route(endpoints::STATISTICS_API, get(get_statistics))
        .route(endpoints::BAR_CHART_API, get(get_bar_chart))
        .route(endpoints::PIE_CHART_API, get(get_pie_chart))
        .route(endpoints::COMBINED_API, get(get_combined))
        .route(endpoints::SEED_API, post(post_seed::<HttpDatasetSource>))
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

async fn get_404_not_found(uri: Uri) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": format!("no route for {uri}"), "field": null })),
    )
        .into_response()
}

#[cfg(test)]
mod routing_tests {
    use std::time::Duration;

    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::Value;
    use time::macros::date;

    use crate::{
        AppState, analytics::AnalyticsConfig, endpoints, record::Record, seed::HttpDatasetSource,
    };

    use super::build_router;

    fn get_test_server() -> TestServer {
        let state = AppState::new(
            Connection::open_in_memory().unwrap(),
            AnalyticsConfig::default(),
            HttpDatasetSource::new("http://127.0.0.1:9/unreachable.json", Duration::from_secs(1)),
        )
        .unwrap();
        state
            .record_store
            .insert_many(vec![
                Record::build("Mug", 50.0, "A", date!(2021 - 03 - 01)).sold(true),
                Record::build("Lamp", 150.0, "B", date!(2021 - 03 - 31)),
                Record::build("Desk", 999.0, "A", date!(2021 - 04 - 01)).sold(true),
            ])
            .unwrap();

        TestServer::new(build_router(state)).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn serves_every_analytics_route() {
        let server = get_test_server();

        for endpoint in [
            endpoints::TRANSACTIONS_API,
            endpoints::STATISTICS_API,
            endpoints::BAR_CHART_API,
            endpoints::PIE_CHART_API,
            endpoints::COMBINED_API,
        ] {
            server
                .get(endpoint)
                .add_query_param("month", 3)
                .await
                .assert_status_ok();
        }
    }

    #[tokio::test]
    async fn month_window_includes_first_and_last_day_only() {
        let server = get_test_server();

        let response = server
            .get(endpoints::TRANSACTIONS_API)
            .add_query_param("month", 3)
            .await;

        let body = response.json::<Value>();
        let titles: Vec<_> = body["transactions"]
            .as_array()
            .unwrap()
            .iter()
            .map(|record| record["title"].as_str().unwrap().to_owned())
            .collect();
        assert_eq!(titles, vec!["Mug", "Lamp"]);
    }

    #[tokio::test]
    async fn seed_failure_leaves_records_untouched() {
        let server = get_test_server();

        server
            .post(endpoints::SEED_API)
            .await
            .assert_status(StatusCode::BAD_GATEWAY);

        let response = server.get(endpoints::TRANSACTIONS_API).await;
        assert_eq!(response.json::<Value>()["total"], 3);
    }

    #[tokio::test]
    async fn unknown_route_is_json_not_found() {
        let server = get_test_server();

        let response = server.get("/api/nope").await;

        response.assert_status_not_found();
        assert!(response.json::<Value>()["error"].is_string());
    }
}
