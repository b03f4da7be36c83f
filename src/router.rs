use axum::http::{HeaderValue, Method, header};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::modules::auth::router::mount_auth_routes;
use crate::modules::courses::router::mount_courses_routes;
use crate::modules::enrollments::router::mount_enrollments_routes;
use crate::modules::health::health;
use crate::modules::users::router::mount_users_routes;
use crate::policy::{PolicyRouter, RouteTableError, Verb};
use crate::state::AppState;

/// Builds the application router. Fails when a module mounts a route that is
/// missing from the access table, or leaves a declared route unmounted.
pub fn init_router(state: AppState) -> Result<Router, RouteTableError> {
    let api = PolicyRouter::new(state.clone()).route(Verb::Get, "/health", health)?;
    let api = mount_auth_routes(api)?;
    let api = mount_users_routes(api)?;
    let api = mount_courses_routes(api)?;
    let api = mount_enrollments_routes(api)?;
    let api = api.finish()?;

    let router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .merge(api)
        .with_state(state.clone())
        .layer(cors_layer(&state))
        .layer(middleware::from_fn(logging_middleware));

    Ok(router)
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = state
        .cors_config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}
