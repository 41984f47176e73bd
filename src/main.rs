//! Sales forecast service binary

use sales_forecast_service::{build_router, AppState, ServiceConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (optional - won't fail if missing)
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "sales_forecast_service=info,sales_forecast=info,water_quality=info,tower_http=info"
                    .into()
            }),
        )
        .init();

    let config = ServiceConfig::from_env().expect("invalid service configuration");
    let addr = config.socket_addr().expect("invalid HOST:PORT configuration");

    let state = AppState::new(&config);
    state.fit_initial_model().await;

    let app = build_router(state);

    tracing::info!(
        "sales-forecast-service v{} listening on {}",
        env!("CARGO_PKG_VERSION"),
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listener");
    axum::serve(listener, app).await.expect("server error");
}
