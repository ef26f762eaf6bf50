use actix_web::web;

pub mod health;
pub mod organizer;
pub mod player;

/// Session cookie used to restore a lost player link.
pub const SESSION_COOKIE: &str = "rikiki_session_id";

/// Every route of the application. `main.rs` adds the middleware stack on
/// top; tests mount this directly.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/health").configure(health::configure_routes));
    cfg.service(
        web::scope("/organizer/{organizer_secret}").configure(organizer::configure_routes),
    );
    cfg.service(web::scope("/player").configure(player::configure_routes));
}
