use crate::config::{AppConfig, RateLimitConfig, RateLimitRule, ServerConfig};
use crate::handlers;
use axum::http::{header, HeaderValue, Method};
use axum::{routing, Router};
use tower::ServiceBuilder;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Full HTTP app minus the per-request extensions (database, config), which
/// the caller layers on.
pub fn create_app(config: &AppConfig) -> anyhow::Result<Router> {
    Ok(create_routes(&config.rate_limit)?.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(build_cors_layer(&config.server)),
    ))
}

pub fn create_routes(rate_limit: &RateLimitConfig) -> anyhow::Result<Router> {
    let read = with_optional_rate_limit(read_routes(), rate_limit.enabled, rate_limit.read)?;
    let write = with_optional_rate_limit(write_routes(), rate_limit.enabled, rate_limit.write)?;

    Ok(Router::new().nest("/api/v1", read.merge(write)))
}

fn read_routes() -> Router {
    Router::new()
        .route("/health", routing::get(handlers::health::health_check))
        .route("/ideas", routing::get(handlers::idea::list_ideas))
        .route("/ideas/top", routing::get(handlers::idea::top_ideas))
        .route("/ideas/{id}", routing::get(handlers::idea::get_idea))
        .route(
            "/ideas/{id}/votes_count",
            routing::get(handlers::idea::votes_count),
        )
}

fn write_routes() -> Router {
    Router::new()
        .route("/ideas", routing::post(handlers::idea::create_idea))
        .route(
            "/ideas/{id}",
            routing::put(handlers::idea::update_idea).delete(handlers::idea::delete_idea),
        )
        .route("/ideas/{id}/vote", routing::post(handlers::idea::vote_idea))
}

fn build_cors_layer(server: &ServerConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    if server.allows_any_origin() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = server
        .cors_origins
        .iter()
        .filter_map(|s| s.parse().ok())
        .collect();
    cors.allow_origin(origins).allow_credentials(true)
}

fn with_optional_rate_limit(
    router: Router,
    enabled: bool,
    rule: RateLimitRule,
) -> anyhow::Result<Router> {
    if !enabled {
        return Ok(router);
    }

    let governor_conf = GovernorConfigBuilder::default()
        .per_second(rule.per_second)
        .burst_size(rule.burst_size)
        .finish()
        .ok_or_else(|| anyhow::anyhow!("Invalid rate limit rule {:?}", rule))?;

    Ok(router.layer(GovernorLayer::new(governor_conf)))
}
