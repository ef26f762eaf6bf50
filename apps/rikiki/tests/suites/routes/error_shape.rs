use actix_web::http::StatusCode;
use actix_web::{test, web, HttpResponse};
use rikiki::{AppError, AppState, ErrorCode};
use rikiki_test_support::problem_details::assert_problem_details_from_service_response;

use crate::common::body_json;
use crate::support::create_test_app;

async fn failing_handler() -> Result<HttpResponse, AppError> {
    Err(AppError::invalid(ErrorCode::InvalidHandSize, "Example failure"))
}

#[actix_web::test]
async fn errors_are_problem_details_with_trace_id() {
    let app = create_test_app(AppState::for_tests())
        .with_routes(|cfg| {
            cfg.route("/_test/error", web::get().to(failing_handler));
        })
        .build()
        .await;

    let req = test::TestRequest::get().uri("/_test/error").to_request();
    let resp = test::call_service(&app, req).await;
    let request_id = resp
        .headers()
        .get("x-request-id")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();

    let problem = assert_problem_details_from_service_response(
        resp,
        "INVALID_HAND_SIZE",
        StatusCode::BAD_REQUEST,
        Some("Example failure"),
    )
    .await;
    assert_eq!(problem.title, "Invalid Hand Size");
    assert_eq!(problem.trace_id, request_id);
}

#[actix_web::test]
async fn each_request_gets_its_own_trace_id() {
    let app = create_test_app(AppState::for_tests())
        .with_prod_routes()
        .build()
        .await;

    let mut ids = Vec::new();
    for _ in 0..3 {
        let req = test::TestRequest::get()
            .uri("/organizer/nope/game")
            .to_request();
        let resp = test::call_service(&app, req).await;
        let body = body_json(resp).await;
        ids.push(body["trace_id"].as_str().unwrap().to_string());
    }
    ids.dedup();
    assert_eq!(ids.len(), 3);
    assert!(ids.iter().all(|id| id != "unknown"));
}

#[actix_web::test]
async fn oversized_body_is_rejected() {
    let config = rikiki::Config {
        max_json_payload: 64,
        ..rikiki::Config::for_tests()
    };
    let app = create_test_app(AppState::new(config))
        .with_prod_routes()
        .build()
        .await;

    let long_list = "A very long player name\n".repeat(10);
    let req = test::TestRequest::post()
        .uri("/organizer/organizer-test-secret/game")
        .set_json(serde_json::json!({ "playerlist": long_list }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "BAD_REQUEST",
        StatusCode::PAYLOAD_TOO_LARGE,
        None,
    )
    .await;
}
