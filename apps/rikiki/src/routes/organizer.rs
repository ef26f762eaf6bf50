//! Organizer routes, all under `/organizer/{organizer_secret}`.

use actix_web::http::header::{CACHE_CONTROL, ETAG};
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::error::AppError;
use crate::extractors::ValidatedJson;
use crate::http::etag::{if_none_match, summary_etag};
use crate::services::OrganizerService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SetupRequest {
    pub playerlist: String,
}

fn authorized<'a>(
    app_state: &'a AppState,
    organizer_secret: &str,
) -> Result<OrganizerService<'a>, AppError> {
    app_state.check_organizer(organizer_secret)?;
    Ok(OrganizerService::new(app_state))
}

/// POST /organizer/{secret}/game
async fn setup_game(
    path: web::Path<String>,
    body: ValidatedJson<SetupRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let view = authorized(&app_state, &path)?.setup_game(&body.playerlist)?;
    Ok(HttpResponse::Created().json(view))
}

/// GET /organizer/{secret}/game
async fn show_game(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let view = authorized(&app_state, &path)?.view()?;
    Ok(HttpResponse::Ok().json(view))
}

/// GET /organizer/{secret}/api/game_status
///
/// Polled by the dashboard; answers `304 Not Modified` while the status
/// summary is unchanged.
async fn game_status(
    req: HttpRequest,
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (status, summary) = authorized(&app_state, &path)?.status()?;
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

/// POST /organizer/{secret}/game/start
async fn start_game(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let view = authorized(&app_state, &path)?.start()?;
    Ok(HttpResponse::Ok().json(view))
}

/// POST /organizer/{secret}/game/restart
async fn restart_game(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let view = authorized(&app_state, &path)?.restart()?;
    Ok(HttpResponse::Ok().json(view))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/game")
            .route(web::get().to(show_game))
            .route(web::post().to(setup_game)),
    )
    .route("/api/game_status", web::get().to(game_status))
    .route("/game/start", web::post().to(start_game))
    .route("/game/restart", web::post().to(restart_game));
}
