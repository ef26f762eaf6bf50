#![allow(dead_code)]

use actix_web::body::BoxBody;
use actix_web::dev::ServiceResponse;
use actix_web::test;
use serde_json::Value;

#[ctor::ctor]
fn init_logging() {
    rikiki_test_support::logging::init();
}

/// Organizer secret of `Config::for_tests`.
pub const ORGANIZER: &str = "/organizer/organizer-test-secret";

pub async fn body_json(resp: ServiceResponse<BoxBody>) -> Value {
    let body = test::read_body(resp).await;
    serde_json::from_slice(&body).expect("response body should be JSON")
}

/// Secret at the end of a player link.
pub fn secret_of(link: &str) -> String {
    link.rsplit('/').next().unwrap_or_default().to_string()
}
