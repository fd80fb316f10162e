use actix_web::{web, App, HttpServer};
use catalog_api::config::Config;
use catalog_api::middleware::cors::cors_middleware;
use catalog_api::middleware::request_trace::RequestTrace;
use catalog_api::state::security_config::SecurityConfig;
use catalog_api::{build_state, routes, telemetry};
use tracing::info;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment
    // (docker env_file, or `set -a; . ./.env; set +a` locally).
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    let security_config = SecurityConfig::new(config.jwt_secret.as_bytes())
        .with_token_lifetime(config.token_lifetime);

    let app_state = match build_state()
        .with_database_url(&config.database_url, config.max_connections)
        .with_security(security_config)
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    let gateway = app_state.gateway.clone();
    let data = web::Data::new(app_state);
    let cors_origins = config.cors_origins.clone();

    info!(host = %config.host, port = config.port, "starting catalog api");

    let server = HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware(&cors_origins))
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run();

    let result = server.await;
    gateway.close().await;
    result
}
