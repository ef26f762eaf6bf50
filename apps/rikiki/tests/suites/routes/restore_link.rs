use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::test;
use rikiki::AppState;
use rikiki_test_support::problem_details::assert_problem_details_from_service_response;
use serde_json::json;

use crate::common::body_json;
use crate::support::create_test_app;
use crate::support::table::{get, setup};

#[actix_web::test]
async fn lost_link_is_restored_from_the_session_cookie() {
    let app = create_test_app(AppState::for_tests())
        .with_prod_routes()
        .build()
        .await;
    let invites = setup(&app, "Ann\nBob").await;

    let req = test::TestRequest::post()
        .uri("/player/confirm")
        .set_json(json!({ "secret_id": invites[1] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == "rikiki_session_id")
        .unwrap()
        .into_owned();
    let old_secret = body_json(resp).await["secret_id"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/player/restore_link")
        .cookie(cookie.clone())
        .to_request();
    let info = body_json(test::call_service(&app, req).await).await;
    assert_eq!(info["name"], "Bob");
    let csrf = info["csrf_token"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/player/restore_link")
        .cookie(cookie.clone())
        .set_json(json!({ "csrf_token": csrf }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let new_cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == "rikiki_session_id")
        .unwrap()
        .into_owned();
    assert_ne!(new_cookie.value(), cookie.value());
    let restored = body_json(resp).await;
    let new_secret = restored["secret_id"].as_str().unwrap();
    assert_ne!(new_secret, old_secret);

    let resp = get(&app, &format!("/player/{old_secret}/api/status")).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let resp = get(&app, &format!("/player/{new_secret}/api/status")).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // The old cookie went with the old link.
    let req = test::TestRequest::get()
        .uri("/player/restore_link")
        .cookie(cookie)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn stale_csrf_token_is_rejected() {
    let app = create_test_app(AppState::for_tests())
        .with_prod_routes()
        .build()
        .await;
    let invites = setup(&app, "Ann\nBob").await;
    let req = test::TestRequest::post()
        .uri("/player/confirm")
        .set_json(json!({ "secret_id": invites[0] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == "rikiki_session_id")
        .unwrap()
        .into_owned();

    let req = test::TestRequest::post()
        .uri("/player/restore_link")
        .cookie(cookie)
        .set_json(json!({ "csrf_token": "0000" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "CSRF_MISMATCH",
        StatusCode::FORBIDDEN,
        None,
    )
    .await;
}

#[actix_web::test]
async fn missing_or_unknown_cookie_is_forbidden() {
    let app = create_test_app(AppState::for_tests())
        .with_prod_routes()
        .build()
        .await;
    setup(&app, "Ann\nBob").await;

    let resp = get(&app, "/player/restore_link").await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri("/player/restore_link")
        .cookie(Cookie::new("rikiki_session_id", "forged"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
}
