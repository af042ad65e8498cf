use axum::{extract::Query, http::StatusCode, Json};
use contracts::dashboards::d400_sales_dashboard::{
    CitySales, FilterOptions, SalesDashboardView, SalesFilter, SalesKpis, TopCitiesRequest,
    DEFAULT_TOP_CITIES,
};

use crate::dashboards::d400_sales_dashboard::service;

const MAX_TOP_CITIES: usize = 100;

/// GET /api/d400/options
pub async fn get_filter_options() -> Result<Json<FilterOptions>, StatusCode> {
    match service::get_filter_options() {
        Ok(options) => {
            tracing::info!(
                "D400 Dashboard: Returning options ({} years, {} categories, {} segments)",
                options.years.len(),
                options.categories.len(),
                options.segments.len()
            );
            Ok(Json(options))
        }
        Err(e) => {
            tracing::error!("D400 Dashboard: Failed to get filter options: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /api/d400/view?year=2019&category=Furniture&segment=Consumer
pub async fn get_dashboard_view(
    Query(filter): Query<SalesFilter>,
) -> Result<Json<SalesDashboardView>, StatusCode> {
    tracing::info!(
        "D400 Dashboard: Rendering {} / {} / {}",
        filter.year,
        filter.category,
        filter.segment
    );

    match service::get_dashboard_view(&filter) {
        Ok(view) => {
            tracing::info!(
                "D400 Dashboard: Returning {} orders, {} cities",
                view.kpis.order_count,
                view.chart.bars.len()
            );
            Ok(Json(view))
        }
        Err(e) => {
            tracing::error!("D400 Dashboard: Failed to render view: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /api/d400/kpis?year=2019&category=Furniture&segment=Consumer
pub async fn get_kpis(Query(filter): Query<SalesFilter>) -> Result<Json<SalesKpis>, StatusCode> {
    service::get_kpis(&filter).map(Json).map_err(|e| {
        tracing::error!("D400 Dashboard: Failed to compute KPIs: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// GET /api/d400/top_cities?year=2019&category=Furniture&segment=Consumer&limit=10
pub async fn get_top_cities(
    Query(request): Query<TopCitiesRequest>,
) -> Result<Json<Vec<CitySales>>, StatusCode> {
    let limit = request
        .limit
        .unwrap_or(DEFAULT_TOP_CITIES)
        .clamp(1, MAX_TOP_CITIES);

    service::get_top_cities(&request.filter(), limit)
        .map(Json)
        .map_err(|e| {
            tracing::error!("D400 Dashboard: Failed to rank cities: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}
