//! Drives a game through the HTTP API the way browsers would.

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, Error};
use serde_json::{json, Value};

use crate::common::{body_json, secret_of, ORGANIZER};

pub async fn post_json<S>(app: &S, uri: &str, body: Value) -> ServiceResponse<BoxBody>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let req = test::TestRequest::post().uri(uri).set_json(body).to_request();
    test::call_service(app, req).await
}

pub async fn get<S>(app: &S, uri: &str) -> ServiceResponse<BoxBody>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    test::call_service(app, test::TestRequest::get().uri(uri).to_request()).await
}

/// Set up a game and return the invite secrets in list order.
pub async fn setup<S>(app: &S, playerlist: &str) -> Vec<String>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let resp = post_json(app, &format!("{ORGANIZER}/game"), json!({ "playerlist": playerlist })).await;
    assert_eq!(resp.status().as_u16(), 201);
    let view = body_json(resp).await;
    view["players"]
        .as_array()
        .expect("players array")
        .iter()
        .map(|p| secret_of(p["link"].as_str().expect("link")))
        .collect()
}

/// Confirm the seat behind `invite`; returns the replacement secret.
pub async fn confirm<S>(app: &S, invite: &str, name: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let resp = post_json(
        app,
        "/player/confirm",
        json!({ "secret_id": invite, "player_name": name }),
    )
    .await;
    assert!(resp.status().is_success(), "confirm failed: {}", resp.status());
    body_json(resp).await["secret_id"]
        .as_str()
        .expect("secret_id")
        .to_string()
}

/// Invite `names`, confirm the first `confirming` of them and start.
/// Returns the confirmed players' secrets.
pub async fn started_game<S>(app: &S, names: &[&str], confirming: usize) -> Vec<String>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let invites = setup(app, &names.join("\n")).await;
    let mut secrets = Vec::new();
    for invite in invites.iter().take(confirming) {
        secrets.push(confirm(app, invite, "").await);
    }
    let resp = post_json(app, &format!("{ORGANIZER}/game/start"), json!({})).await;
    assert!(resp.status().is_success(), "start failed: {}", resp.status());
    secrets
}

pub async fn status<S>(app: &S, secret: &str) -> Value
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let resp = get(app, &format!("/player/{secret}/api/status")).await;
    assert_eq!(resp.status().as_u16(), 200);
    body_json(resp).await
}

/// Secret and status of the player whose turn it is, if anybody's.
pub async fn turn_holder<S>(app: &S, secrets: &[String]) -> Option<(String, Value)>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    for secret in secrets {
        let st = status(app, secret).await;
        if st["your_turn"] == json!(true) {
            return Some((secret.clone(), st));
        }
    }
    None
}

/// Bid and play until the round ends. Everybody bids the lowest allowed
/// value and plays their first playable card.
pub async fn play_round<S>(app: &S, secrets: &[String])
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    while let Some((secret, st)) = turn_holder(app, secrets).await {
        if st["game_state"] != json!("PLAYING") {
            break;
        }
        let resp = if st["round"]["state"] == json!("BIDDING") {
            let bid = st["valid_bids"][0].clone();
            post_json(app, "/player/place/bid", json!({ "secret_id": secret, "bid": bid })).await
        } else {
            let card = st["playable"][0].clone();
            post_json(app, "/player/play/card", json!({ "secret_id": secret, "card": card })).await
        };
        assert_eq!(resp.status().as_u16(), 200);
        assert_eq!(body_json(resp).await["ok"], json!(true));
    }
}

pub async fn finish_round<S>(app: &S, secret: &str) -> Value
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let resp = post_json(app, "/player/finish/round", json!({ "secret_id": secret })).await;
    assert_eq!(resp.status().as_u16(), 200);
    body_json(resp).await
}
