use axum::{routing::get, Router};

use crate::api::handlers;

/// Конфигурация всех роутов приложения
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // D400 SALES DASHBOARD
        // ========================================
        .route(
            "/api/d400/options",
            get(handlers::d400_sales_dashboard::get_filter_options),
        )
        .route(
            "/api/d400/view",
            get(handlers::d400_sales_dashboard::get_dashboard_view),
        )
        .route(
            "/api/d400/kpis",
            get(handlers::d400_sales_dashboard::get_kpis),
        )
        .route(
            "/api/d400/top_cities",
            get(handlers::d400_sales_dashboard::get_top_cities),
        )
}
