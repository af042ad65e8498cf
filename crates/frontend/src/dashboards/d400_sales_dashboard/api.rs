use contracts::dashboards::d400_sales_dashboard::{FilterOptions, SalesDashboardView, SalesFilter};
use gloo_net::http::Request;

use crate::shared::api_utils::api_url;

const API_BASE: &str = "/api/d400";

/// Получить значения для селекторов (годы, категории, сегменты)
pub async fn get_filter_options() -> Result<FilterOptions, String> {
    let url = api_url(&format!("{}/options", API_BASE));

    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !response.ok() {
        return Err(format!("HTTP error: {}", response.status()));
    }

    let data: FilterOptions = response
        .json()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))?;

    Ok(data)
}

/// Получить KPI и рейтинг городов для выбранной комбинации
pub async fn get_dashboard_view(filter: &SalesFilter) -> Result<SalesDashboardView, String> {
    let query =
        serde_qs::to_string(filter).map_err(|e| format!("Failed to encode filter: {}", e))?;
    let url = api_url(&format!("{}/view?{}", API_BASE, query));

    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !response.ok() {
        return Err(format!("HTTP error: {}", response.status()));
    }

    let data: SalesDashboardView = response
        .json()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))?;

    Ok(data)
}
