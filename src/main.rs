use axum::extract::Extension;
use crowd_ideas::config::{server::log_format_from_env, AppConfig, LogFormat};
use crowd_ideas::{handlers, migration, routes};
use sea_orm_migration::MigratorTrait;
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health_check,
        handlers::idea::list_ideas,
        handlers::idea::create_idea,
        handlers::idea::top_ideas,
        handlers::idea::get_idea,
        handlers::idea::update_idea,
        handlers::idea::delete_idea,
        handlers::idea::vote_idea,
        handlers::idea::votes_count,
    ),
    components(
        schemas(
            crowd_ideas::response::PaginatedResponse<crowd_ideas::models::IdeaView>,
            crowd_ideas::error::AppError,
            crowd_ideas::repositories::IdeaSort,
            crowd_ideas::repositories::SortOrder,
            handlers::health::HealthResponse,
            crowd_ideas::models::IdeaView,
            handlers::idea::CreateIdeaRequest,
            handlers::idea::UpdateIdeaRequest,
            handlers::idea::VoteRequest,
            handlers::idea::VoteCountResponse,
        )
    ),
    tags(
        (name = "health", description = "Service health"),
        (name = "ideas", description = "Idea management operations"),
        (name = "votes", description = "Voting operations"),
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing(log_format_from_env());

    let config = AppConfig::from_env()?;

    tracing::info!("Starting {} v{}...", config.app_name, env!("CARGO_PKG_VERSION"));

    let db = config.database.connect().await?;
    tracing::info!("Database connected successfully");

    migration::Migrator::up(&db, None).await?;
    tracing::info!("Database migrations applied successfully");

    let app = routes::create_app(&config)?
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(Extension(db))
        .layer(Extension(config.clone()));

    let addr = config.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "crowd_ideas=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, gracefully shutting down...");
}
