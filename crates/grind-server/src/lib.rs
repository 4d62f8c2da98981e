pub mod error;
pub mod routes;
pub mod state;

use axum::routing::get;
use axum::Router;
use grind_core::config::Config;
use tower_http::cors::{Any, CorsLayer};

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
///
/// Must be called from within the tokio runtime that will own the
/// scheduled routine callbacks.
pub fn build_router(config: &Config) -> anyhow::Result<Router> {
    let app_state = state::AppState::new(config)?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Ok(Router::new()
        // Characters
        .route("/api/characters", get(routes::characters::list_characters))
        .route(
            "/api/characters/{name}",
            get(routes::characters::get_character),
        )
        .route(
            "/api/characters/{name}/refresh",
            axum::routing::post(routes::characters::refresh_character),
        )
        .route(
            "/api/characters/{name}/move",
            axum::routing::post(routes::characters::move_character),
        )
        .route(
            "/api/characters/{name}/gather",
            axum::routing::post(routes::characters::gather_character),
        )
        .route(
            "/api/characters/{name}/fight",
            axum::routing::post(routes::characters::fight_character),
        )
        .route(
            "/api/characters/{name}/rest",
            axum::routing::post(routes::characters::rest_character),
        )
        // Routines
        .route(
            "/api/routines/{name}",
            get(routes::routines::get_routine)
                .put(routes::routines::put_routine)
                .delete(routes::routines::delete_routine),
        )
        // Maps
        .route("/api/maps/{x}/{y}", get(routes::maps::get_tile))
        .layer(cors)
        .with_state(app_state))
}

/// Start the automation server.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let port = config.port;
    let app = build_router(&config)?;

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    tracing::info!("grind server listening on http://localhost:{port}");

    axum::serve(listener, app).await?;
    Ok(())
}
