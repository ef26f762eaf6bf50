//! Player routes, under `/player`.
//!
//! Players are identified by the secret in their private link. The
//! session cookie only serves to recover a lost link.

use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::header::{CACHE_CONTROL, ETAG};
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;

use super::SESSION_COOKIE;
use crate::domain::Card;
use crate::error::AppError;
use crate::extractors::ValidatedJson;
use crate::http::etag::{if_none_match, summary_etag};
use crate::services::players::IssuedLink;
use crate::services::PlayerService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ConfirmRequest {
    pub secret_id: String,
    #[serde(default)]
    pub player_name: String,
}

#[derive(Debug, Deserialize)]
pub struct BidRequest {
    pub secret_id: String,
    pub bid: u8,
}

#[derive(Debug, Deserialize)]
pub struct PlayRequest {
    pub secret_id: String,
    /// Deck index or a token such as "QH".
    pub card: Card,
}

#[derive(Debug, Deserialize)]
pub struct FinishRequest {
    pub secret_id: String,
}

#[derive(Debug, Deserialize)]
pub struct RestoreRequest {
    pub csrf_token: String,
}

fn session_cookie(value: &str) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, value.to_string())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .finish()
}

fn link_response(link: IssuedLink) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(session_cookie(&link.cookie))
        .json(link)
}

fn session_of(req: &HttpRequest) -> Result<String, AppError> {
    req.cookie(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or_else(AppError::forbidden)
}

/// GET /player/confirm/{secret_id}
async fn confirm_info(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let info = PlayerService::new(&app_state).confirm_info(&path)?;
    Ok(HttpResponse::Ok().json(info))
}

/// POST /player/confirm
async fn confirm(
    body: ValidatedJson<ConfirmRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let link = PlayerService::new(&app_state).confirm(&body.secret_id, &body.player_name)?;
    Ok(link_response(link))
}

/// GET /player/{secret_id}/api/status
async fn status(
    req: HttpRequest,
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (status, summary) = PlayerService::new(&app_state).status(&path)?;
    let etag = summary_etag(&summary);
    if if_none_match(&req, &etag) {
        return Ok(HttpResponse::NotModified()
            .insert_header((ETAG, etag))
            .finish());
    }
    Ok(HttpResponse::Ok()
        .insert_header((ETAG, etag))
        .insert_header((CACHE_CONTROL, "no-cache"))
        .json(status))
}

/// POST /player/place/bid
async fn place_bid(
    body: ValidatedJson<BidRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let result = PlayerService::new(&app_state).place_bid(&body.secret_id, body.bid)?;
    Ok(HttpResponse::Ok().json(result))
}

/// POST /player/play/card
async fn play_card(
    body: ValidatedJson<PlayRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let result = PlayerService::new(&app_state).play_card(&body.secret_id, body.card)?;
    Ok(HttpResponse::Ok().json(result))
}

/// POST /player/finish/round
async fn finish_round(
    body: ValidatedJson<FinishRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let result = PlayerService::new(&app_state).finish_round(&body.secret_id)?;
    Ok(HttpResponse::Ok().json(result))
}

/// GET /player/restore_link
async fn restore_info(
    req: HttpRequest,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let info = PlayerService::new(&app_state).restore_info(&session_of(&req)?)?;
    Ok(HttpResponse::Ok().json(info))
}

/// POST /player/restore_link
async fn restore(
    req: HttpRequest,
    body: ValidatedJson<RestoreRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let link = PlayerService::new(&app_state).restore(&session_of(&req)?, &body.csrf_token)?;
    Ok(link_response(link))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/confirm/{secret_id}", web::get().to(confirm_info))
        .route("/confirm", web::post().to(confirm))
        .route("/{secret_id}/api/status", web::get().to(status))
        .route("/place/bid", web::post().to(place_bid))
        .route("/play/card", web::post().to(play_card))
        .route("/finish/round", web::post().to(finish_round))
        .service(
            web::resource("/restore_link")
                .route(web::get().to(restore_info))
                .route(web::post().to(restore)),
        );
}
