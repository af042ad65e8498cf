use serde::{Deserialize, Serialize};

/// Default number of cities in the ranking
pub const DEFAULT_TOP_CITIES: usize = 10;

/// Selected year / category / segment combination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesFilter {
    pub year: i32,
    pub category: String,
    pub segment: String,
}

/// Query for the city ranking endpoint
///
/// Fields are spelled out instead of flattening [`SalesFilter`]:
/// flattened structs lose numeric parsing in url-encoded queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopCitiesRequest {
    pub year: i32,
    pub category: String,
    pub segment: String,
    /// Number of cities to return, defaults to [`DEFAULT_TOP_CITIES`]
    #[serde(default)]
    pub limit: Option<usize>,
}

impl TopCitiesRequest {
    pub fn filter(&self) -> SalesFilter {
        SalesFilter {
            year: self.year,
            category: self.category.clone(),
            segment: self.segment.clone(),
        }
    }
}

/// Values available for the three selectors
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub years: Vec<i32>,
    pub categories: Vec<String>,
    pub segments: Vec<String>,
}

impl FilterOptions {
    /// Selection shown before the user touches any selector: first value of each list
    pub fn default_filter(&self) -> Option<SalesFilter> {
        Some(SalesFilter {
            year: *self.years.first()?,
            category: self.categories.first()?.clone(),
            segment: self.segments.first()?.clone(),
        })
    }
}

/// Total sales, distinct orders and average order value of a subset
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesKpis {
    pub total_sales: f64,
    pub order_count: u64,
    pub avg_order_value: f64,
}

/// One row of the city ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitySales {
    /// Full city name (grouping key)
    pub city: String,
    /// Display label, truncated for long names
    pub label: String,
    pub sales: f64,
}

/// Formatted KPI card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiCard {
    /// "total_sales" | "order_count" | "avg_order_value"
    pub id: String,
    pub icon: String,
    pub label: String,
    /// Display value, e.g. "$12,345"
    pub value: String,
}

/// Single bar of the horizontal chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartBar {
    pub city: String,
    pub label: String,
    pub value: f64,
    /// Value label drawn outside the bar
    pub value_text: String,
    /// Colour intensity in [0, 1], relative to the largest bar
    pub intensity: f64,
}

/// Top cities chart, bars ordered from largest to smallest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityChart {
    pub title: String,
    pub bars: Vec<ChartBar>,
}

/// Everything the dashboard page needs for one selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesDashboardView {
    pub title: String,
    pub subtitle: String,
    pub filter: SalesFilter,
    pub kpis: SalesKpis,
    pub kpi_cards: Vec<KpiCard>,
    pub chart: CityChart,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_takes_first_values() {
        let options = FilterOptions {
            years: vec![2015, 2016],
            categories: vec!["Furniture".to_string(), "Technology".to_string()],
            segments: vec!["Consumer".to_string()],
        };

        let filter = options.default_filter().unwrap();
        assert_eq!(filter.year, 2015);
        assert_eq!(filter.category, "Furniture");
        assert_eq!(filter.segment, "Consumer");
    }

    #[test]
    fn test_default_filter_empty_list() {
        let options = FilterOptions {
            years: vec![2015],
            categories: vec![],
            segments: vec!["Consumer".to_string()],
        };
        assert!(options.default_filter().is_none());
        assert!(FilterOptions::default().default_filter().is_none());
    }

    #[test]
    fn test_top_cities_request_without_limit() {
        let req: TopCitiesRequest = serde_json::from_str(
            r#"{"year":2017,"category":"Technology","segment":"Corporate"}"#,
        )
        .unwrap();
        assert_eq!(req.limit, None);

        let filter = req.filter();
        assert_eq!(filter.year, 2017);
        assert_eq!(filter.category, "Technology");
        assert_eq!(filter.segment, "Corporate");
    }
}
