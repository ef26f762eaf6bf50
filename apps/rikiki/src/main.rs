use actix_web::{web, App, HttpServer};
use rikiki::{
    routes, telemetry, AppState, Config, RequestTrace, SecurityHeaders, StructuredLogger,
    TraceSpan,
};
use tracing::{error, info};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    let host = config.host.clone();
    let port = config.port;
    // The only place the organizer secret is ever logged.
    info!(organizer_url = %config.organizer_url(), "Organizer page");
    info!(%host, port, seeded = config.rng_seed.is_some(), "Starting rikiki");

    let data = web::Data::new(AppState::new(config));

    HttpServer::new(move || {
        App::new()
            .wrap(SecurityHeaders)
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
