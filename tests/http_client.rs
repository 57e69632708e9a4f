use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{Json, Router, routing::get};
use reqwest::StatusCode;
use serde_json::json;
use tokio::net::TcpListener;

use course_search::client::{ClientError, HttpSearchApi, SearchApi, SearchResult};
use course_search::dataset::Dataset;
use course_search::models::CourseRecord;
use course_search::rate_limit::RateLimiter;
use course_search::server::router;
use course_search::state::AppState;

fn catalogue() -> Dataset {
    Dataset::new(vec![
        CourseRecord {
            id: 1,
            title: "Intro to Python".into(),
            description: "Learn basics".into(),
            category: "Programming".into(),
        },
        CourseRecord {
            id: 4,
            title: "Data Science with Pandas".into(),
            description: "Python for data analysis".into(),
            category: "Data".into(),
        },
        CourseRecord {
            id: 7,
            title: "Watercolour".into(),
            description: "Painting for beginners".into(),
            category: "Arts".into(),
        },
    ])
    .unwrap()
}

// Serves the app on an ephemeral port with the peer address available
async fn spawn(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    addr
}

async fn search_server(max_requests: u32) -> HttpSearchApi {
    let limiter = RateLimiter::new(max_requests, Duration::from_secs(60));
    let state = Arc::new(AppState::new(catalogue(), limiter));
    let addr = spawn(router(state)).await;

    HttpSearchApi::new(&format!("http://{addr}"), Some(Duration::from_secs(5))).unwrap()
}

#[tokio::test]
async fn results_are_mapped_to_display_shape() {
    let api = search_server(10).await;

    let results = api.search("python").await.unwrap();

    assert_eq!(
        results,
        vec![
            SearchResult {
                id: 1,
                title: "Intro to Python".into(),
                description: "Learn basics".into(),
                category: "Programming".into(),
            },
            SearchResult {
                id: 4,
                title: "Data Science with Pandas".into(),
                description: "Python for data analysis".into(),
                category: "Data".into(),
            },
        ]
    );
    assert!(api.search("   ").await.unwrap().is_empty());
}

#[tokio::test]
async fn rejections_carry_status_and_server_message() {
    let api = search_server(2).await;

    assert_eq!(api.search("python").await.unwrap().len(), 2);

    match api.search("<b>").await {
        Err(ClientError::Status { status, message }) => {
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(message, "Invalid characters in query");
        }
        other => panic!("expected 400, got {other:?}"),
    }

    match api.search("python").await {
        Err(ClientError::Status { status, message }) => {
            assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
            assert_eq!(message, "Too many requests. Please try again later.");
        }
        other => panic!("expected 429, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_server_is_a_transport_failure() {
    // grab a free port, then close it again
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = HttpSearchApi::new(&format!("http://{addr}"), Some(Duration::from_secs(5))).unwrap();

    let err = api.search("python").await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)), "{err:?}");
}

#[tokio::test]
async fn error_body_with_ok_status_is_an_api_failure() {
    let app = Router::new().route(
        "/api/search",
        get(|| async { Json(json!({ "error": "Internal server error" })) }),
    );
    let addr = spawn(app).await;
    let api = HttpSearchApi::new(&format!("http://{addr}"), None).unwrap();

    match api.search("python").await {
        Err(ClientError::Api(message)) => assert_eq!(message, "Internal server error"),
        other => panic!("expected api error, got {other:?}"),
    }
}
