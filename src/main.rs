use actix_web::{App, HttpServer, web};
use anyhow::Context;
use std::sync::Arc;
use tracing::{error, info};
use whoami_api::application::service::UserService;
use whoami_api::data::postgres::PgUserRepository;
use whoami_api::infrastructure::config::Config;
use whoami_api::infrastructure::logging::init_logging;
use whoami_api::presentation::handlers::AppState;
use whoami_api::presentation::middleware::{CorsMiddleware, RequestTracingMiddleware};
use whoami_api::presentation::routes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = Config::from_env().inspect_err(|e| error!(error = %e, "Invalid configuration"))?;
    let cors = CorsMiddleware::new(&config.cors_origin)
        .with_context(|| format!("invalid CORS origin {:?}", config.cors_origin))
        .inspect_err(|e| error!(error = %e, "Invalid configuration"))?;

    info!(max_connections = config.max_connections, "Connecting to the database");
    let repository = PgUserRepository::connect(&config.database_url, config.max_connections)
        .await
        .inspect_err(|e| error!(error = %e, "Unable to connect to the database"))
        .context("unable to connect to the database")?;

    let result = serve(&config, cors, repository.clone()).await;

    // Released on both the clean-shutdown and the bind-failure path
    repository.close().await;
    result
}

async fn serve(config: &Config, cors: CorsMiddleware, repository: PgUserRepository) -> anyhow::Result<()> {
    let state = web::Data::new(AppState {
        service: UserService::new(Arc::new(repository)),
    });

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(cors.clone())
            .wrap(RequestTracingMiddleware)
            .configure(routes::configure)
    });

    let (host, port) = config.bind_address();
    let server = server
        .bind((host, port))
        .inspect_err(|e| error!(host, port, error = %e, "Error starting server"))
        .with_context(|| format!("unable to bind {}:{}", host, port))?;

    info!(
        address = %format!("{}:{}", host, port),
        routes = %"GET /, GET /api, GET /api/user/{id}, POST /api/user",
        "Server running"
    );
    server.run().await.context("server terminated with an error")
}
