use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use sika_core::AppError;
use tower_http::trace::TraceLayer;
use tower_sessions::SessionManagerLayer;
use tower_sessions_sqlx_store::PostgresStore;

use crate::state::AppState;
use crate::{auth, handlers, middleware};

mod cors;

use cors::build_cors_layer;

pub fn build_router(
    app_state: AppState,
    frontend_url: &str,
    session_layer: SessionManagerLayer<PostgresStore>,
) -> Result<Router, AppError> {
    let protected_routes = Router::new()
        .route(
            "/api/permits",
            get(handlers::permits::list_permits_handler)
                .post(handlers::permits::create_permit_handler),
        )
        .route(
            "/api/permits/{permit_id}",
            get(handlers::permits::get_permit_handler)
                .put(handlers::permits::update_permit_handler)
                .delete(handlers::permits::delete_permit_handler),
        )
        .route(
            "/api/permits/{permit_id}/submit",
            post(handlers::permits::submit_permit_handler),
        )
        .route(
            "/api/permits/{permit_id}/approve",
            post(handlers::permits::approve_permit_handler),
        )
        .route(
            "/api/permits/{permit_id}/reject",
            post(handlers::permits::reject_permit_handler),
        )
        .route(
            "/api/permits/{permit_id}/complete",
            post(handlers::permits::complete_permit_handler),
        )
        .route(
            "/api/permits/{permit_id}/cancel",
            post(handlers::permits::cancel_permit_handler),
        )
        .route("/api/dashboard", get(handlers::views::dashboard_handler))
        .route("/api/site-map", get(handlers::views::site_map_handler))
        .route(
            "/api/coordinates/normalize",
            post(handlers::coordinates::normalize_coordinates_handler),
        )
        .route_layer(from_fn(middleware::require_auth));

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .route("/auth/me", get(auth::me_handler))
        .merge(protected_routes)
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(frontend_url)?)
        .layer(session_layer)
        .with_state(app_state))
}
