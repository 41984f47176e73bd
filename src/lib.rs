//! # Sales Forecast Service
//!
//! HTTP front end over the sales ledgers, the forecast model and the
//! water-quality feed adapter.
//!
//! | Route                      | Purpose                                        |
//! |----------------------------|------------------------------------------------|
//! | `GET /predictAll?days=N`   | Forecast rows for the next `N` days            |
//! | `POST /sales/insert`       | Merge one branch's sales for a day             |
//! | `POST /insert/data`        | Overwrite a month of totals, refit, forecast   |
//! | `GET /water/quality`       | Graded readings for one monitoring site        |
//! | `GET /health`              | Liveness and model state                       |

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use crate::config::{ConfigError, ServiceConfig};
pub use crate::error::ApiError;
pub use crate::state::AppState;

/// Build the router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health))
        .route("/predictAll", get(routes::predict_all))
        .route("/sales/insert", post(routes::insert_sales))
        .route("/insert/data", post(routes::insert_month))
        .route("/water/quality", get(routes::water_quality))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
