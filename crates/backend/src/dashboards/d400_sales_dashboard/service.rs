use anyhow::Result;
use contracts::dashboards::d400_sales_dashboard::{
    ChartBar, CityChart, CitySales, FilterOptions, KpiCard, SalesDashboardView, SalesFilter,
    SalesKpis, DEFAULT_TOP_CITIES,
};
use std::collections::{BTreeMap, HashSet};

use super::repository;
use crate::shared::data::sales_dataset::{SaleRecord, SalesDataset};
use crate::shared::format::{format_amount, format_currency, format_thousands};

const DASHBOARD_TITLE: &str = "Sales Dashboard";
const DASHBOARD_SUBTITLE: &str =
    "Explore the cities with the most sales by category, segment and year.";

/// Names longer than this are shortened for display
const CITY_LABEL_MAX: usize = 15;
const CITY_LABEL_KEEP: usize = 12;
const ELLIPSIS: &str = "...";

/// Get selector options from the loaded dataset
pub fn get_filter_options() -> Result<FilterOptions> {
    Ok(repository::filter_options(repository::dataset()?))
}

/// Get the full dashboard view for a selection
pub fn get_dashboard_view(filter: &SalesFilter) -> Result<SalesDashboardView> {
    Ok(render(repository::dataset()?, filter))
}

/// Get only the KPI triple for a selection
pub fn get_kpis(filter: &SalesFilter) -> Result<SalesKpis> {
    let subset = repository::filter(repository::dataset()?, filter);
    Ok(compute_kpis(&subset))
}

/// Get the city ranking for a selection
pub fn get_top_cities(filter: &SalesFilter, n: usize) -> Result<Vec<CitySales>> {
    let subset = repository::filter(repository::dataset()?, filter);
    Ok(top_cities(&subset, n))
}

/// Filter, aggregate and format everything the dashboard shows
pub fn render(dataset: &SalesDataset, filter: &SalesFilter) -> SalesDashboardView {
    let subset = repository::filter(dataset, filter);
    let kpis = compute_kpis(&subset);
    let ranking = top_cities(&subset, DEFAULT_TOP_CITIES);

    SalesDashboardView {
        title: DASHBOARD_TITLE.to_string(),
        subtitle: DASHBOARD_SUBTITLE.to_string(),
        filter: filter.clone(),
        kpis,
        kpi_cards: build_kpi_cards(&kpis),
        chart: build_city_chart(filter, &ranking),
    }
}

/// Total sales, distinct order ids and average order value
pub fn compute_kpis(subset: &[&SaleRecord]) -> SalesKpis {
    let total_sales: f64 = subset.iter().map(|r| r.sales_or_zero()).sum();

    let order_count = subset
        .iter()
        .filter_map(|r| r.order_id.as_deref())
        .collect::<HashSet<_>>()
        .len() as u64;

    let avg_order_value = if order_count > 0 {
        total_sales / order_count as f64
    } else {
        0.0
    };

    SalesKpis {
        total_sales,
        order_count,
        avg_order_value,
    }
}

/// Top `n` cities by summed sales, largest first; ties keep city name order
pub fn top_cities(subset: &[&SaleRecord], n: usize) -> Vec<CitySales> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for record in subset {
        if let Some(city) = record.city.as_deref() {
            *totals.entry(city).or_insert(0.0) += record.sales_or_zero();
        }
    }

    let mut ranked: Vec<(&str, f64)> = totals.into_iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    ranked
        .into_iter()
        .take(n)
        .map(|(city, sales)| CitySales {
            city: city.to_string(),
            label: truncate_city_label(city),
            sales,
        })
        .collect()
}

/// Keep names up to 15 characters, otherwise first 12 characters plus "..."
pub fn truncate_city_label(name: &str) -> String {
    if name.chars().count() <= CITY_LABEL_MAX {
        return name.to_string();
    }
    let head: String = name.chars().take(CITY_LABEL_KEEP).collect();
    format!("{}{}", head, ELLIPSIS)
}

fn build_kpi_cards(kpis: &SalesKpis) -> Vec<KpiCard> {
    vec![
        KpiCard {
            id: "total_sales".to_string(),
            icon: "💰".to_string(),
            label: "Total Sales".to_string(),
            value: format_currency(kpis.total_sales, 0),
        },
        KpiCard {
            id: "order_count".to_string(),
            icon: "🧾".to_string(),
            label: "Order Count".to_string(),
            value: format_thousands(kpis.order_count),
        },
        KpiCard {
            id: "avg_order_value".to_string(),
            icon: "📦".to_string(),
            label: "Average Ticket".to_string(),
            value: format_currency(kpis.avg_order_value, 2),
        },
    ]
}

fn build_city_chart(filter: &SalesFilter, ranking: &[CitySales]) -> CityChart {
    let max = ranking.iter().map(|c| c.sales).fold(0.0_f64, f64::max);

    let bars = ranking
        .iter()
        .map(|c| ChartBar {
            city: c.city.clone(),
            label: c.label.clone(),
            value: c.sales,
            value_text: format_amount(c.sales, 0),
            intensity: if max > 0.0 {
                (c.sales / max).clamp(0.0, 1.0)
            } else {
                0.0
            },
        })
        .collect();

    CityChart {
        title: format!(
            "Top {} Cities - {} / {} / {}",
            DEFAULT_TOP_CITIES, filter.category, filter.segment, filter.year
        ),
        bars,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::sales_dataset::tests::SAMPLE_CSV;
    use chrono::NaiveDate;

    fn record(order_id: &str, city: &str, sales: f64) -> SaleRecord {
        SaleRecord::new(
            Some(order_id.to_string()),
            NaiveDate::from_ymd_opt(2019, 5, 1),
            Some("Furniture".to_string()),
            Some("Consumer".to_string()),
            Some(city.to_string()),
            Some(sales),
        )
    }

    fn sales_filter(year: i32, category: &str, segment: &str) -> SalesFilter {
        SalesFilter {
            year,
            category: category.to_string(),
            segment: segment.to_string(),
        }
    }

    #[test]
    fn test_kpis_empty_subset() {
        let kpis = compute_kpis(&[]);
        assert_eq!(kpis.total_sales, 0.0);
        assert_eq!(kpis.order_count, 0);
        assert_eq!(kpis.avg_order_value, 0.0);
    }

    #[test]
    fn test_kpis_single_record() {
        let r = record("A-1", "Boston", 42.5);
        let kpis = compute_kpis(&[&r]);
        assert_eq!(kpis.total_sales, 42.5);
        assert_eq!(kpis.order_count, 1);
        assert_eq!(kpis.avg_order_value, 42.5);
    }

    #[test]
    fn test_kpis_count_distinct_orders() {
        let rows = [
            record("A-1", "New York City", 100.0),
            record("A-1", "New York City", 50.0),
            record("A-2", "Boston", 30.0),
        ];
        let subset: Vec<&SaleRecord> = rows.iter().collect();
        let kpis = compute_kpis(&subset);
        assert_eq!(kpis.total_sales, 180.0);
        assert_eq!(kpis.order_count, 2);
        assert_eq!(kpis.avg_order_value, 90.0);
    }

    #[test]
    fn test_kpis_rows_without_order_id() {
        let mut r = record("A-1", "Boston", 10.0);
        r.order_id = None;
        let kpis = compute_kpis(&[&r]);
        assert_eq!(kpis.total_sales, 10.0);
        assert_eq!(kpis.order_count, 0);
        assert_eq!(kpis.avg_order_value, 0.0);
    }

    #[test]
    fn test_top_cities_scenario() {
        let rows = [
            record("A-1", "New York City", 100.0),
            record("A-1", "New York City", 50.0),
            record("A-2", "Boston", 30.0),
        ];
        let subset: Vec<&SaleRecord> = rows.iter().collect();
        let ranking = top_cities(&subset, 10);

        assert_eq!(ranking.len(), 2);
        assert_eq!(ranking[0].city, "New York City");
        assert_eq!(ranking[0].sales, 150.0);
        assert_eq!(ranking[1].city, "Boston");
        assert_eq!(ranking[1].sales, 30.0);
    }

    #[test]
    fn test_top_cities_limit_and_order() {
        let rows: Vec<SaleRecord> = (0..25)
            .map(|i| record(&format!("O-{}", i), &format!("City {:02}", i % 13), (i * 7 % 11) as f64))
            .collect();
        let subset: Vec<&SaleRecord> = rows.iter().collect();

        let ranking = top_cities(&subset, 10);
        assert_eq!(ranking.len(), 10);
        assert!(ranking.windows(2).all(|w| w[0].sales >= w[1].sales));

        assert_eq!(top_cities(&subset, 3).len(), 3);
        assert!(top_cities(&subset, 0).is_empty());
        assert!(top_cities(&[], 10).is_empty());
    }

    #[test]
    fn test_top_cities_ties_ordered_by_name() {
        let rows = [
            record("A-1", "Seattle", 10.0),
            record("A-2", "Austin", 10.0),
            record("A-3", "Miami", 20.0),
        ];
        let subset: Vec<&SaleRecord> = rows.iter().collect();
        let cities: Vec<String> = top_cities(&subset, 10).into_iter().map(|c| c.city).collect();
        assert_eq!(cities, vec!["Miami", "Austin", "Seattle"]);
    }

    #[test]
    fn test_top_cities_keeps_cities_with_same_label_apart() {
        let rows = [
            record("A-1", "San Buenaventura", 10.0),
            record("A-2", "San BuenaventuraX", 5.0),
        ];
        let subset: Vec<&SaleRecord> = rows.iter().collect();
        let ranking = top_cities(&subset, 10);

        assert_eq!(ranking.len(), 2);
        assert_eq!(ranking[0].label, "San Buenaven...");
        assert_eq!(ranking[1].label, "San Buenaven...");
        assert_ne!(ranking[0].city, ranking[1].city);
    }

    #[test]
    fn test_top_cities_skips_missing_city() {
        let mut r = record("A-1", "Boston", 10.0);
        r.city = None;
        let other = record("A-2", "Denver", 3.0);
        let ranking = top_cities(&[&r, &other], 10);
        assert_eq!(ranking.len(), 1);
        assert_eq!(ranking[0].city, "Denver");
    }

    #[test]
    fn test_truncate_city_label() {
        assert_eq!(truncate_city_label("Boston"), "Boston");
        assert_eq!(truncate_city_label("New York City"), "New York City");
        // exactly 15 characters
        assert_eq!(truncate_city_label("Salt Lake Citys"), "Salt Lake Citys");

        let long = truncate_city_label("San Francisco Bay Area");
        assert_eq!(long, "San Francisc...");
        assert_eq!(long.chars().count(), 15);
    }

    #[test]
    fn test_truncate_city_label_counts_characters() {
        let label = truncate_city_label("Ciudad de México Distrito");
        assert_eq!(label, "Ciudad de Mé...");
        assert_eq!(label.chars().count(), 15);
        assert_eq!(truncate_city_label("Bogotá"), "Bogotá");
    }

    #[test]
    fn test_render_view_model() {
        let dataset = SalesDataset::from_reader(SAMPLE_CSV.as_bytes()).unwrap();
        let view = render(&dataset, &sales_filter(2019, "Furniture", "Consumer"));

        assert_eq!(view.title, "Sales Dashboard");
        assert_eq!(view.kpis.total_sales, 180.0);
        assert_eq!(view.kpis.order_count, 2);
        assert_eq!(view.kpis.avg_order_value, 90.0);

        let values: Vec<&str> = view.kpi_cards.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, vec!["$180", "2", "$90.00"]);

        assert_eq!(view.chart.title, "Top 10 Cities - Furniture / Consumer / 2019");
        assert_eq!(view.chart.bars.len(), 2);
        assert_eq!(view.chart.bars[0].city, "New York City");
        assert_eq!(view.chart.bars[0].value_text, "150");
        assert_eq!(view.chart.bars[0].intensity, 1.0);
        assert_eq!(view.chart.bars[1].city, "Boston");
        assert_eq!(view.chart.bars[1].intensity, 0.2);
    }

    #[test]
    fn test_render_empty_selection() {
        let dataset = SalesDataset::from_reader(SAMPLE_CSV.as_bytes()).unwrap();
        let view = render(&dataset, &sales_filter(2020, "Technology", "Corporate"));

        assert_eq!(view.kpis, SalesKpis::default());
        assert!(view.chart.bars.is_empty());
        let values: Vec<&str> = view.kpi_cards.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, vec!["$0", "0", "$0.00"]);
    }

    #[test]
    fn test_render_chart_uses_truncated_labels() {
        let dataset = SalesDataset::from_records(vec![
            record("A-1", "San Francisco Bay Area", 1234.4),
            record("A-2", "Boston", 617.2),
        ]);
        let view = render(&dataset, &sales_filter(2019, "Furniture", "Consumer"));

        let bar = &view.chart.bars[0];
        assert_eq!(bar.city, "San Francisco Bay Area");
        assert_eq!(bar.label, "San Francisc...");
        assert_eq!(bar.value_text, "1,234");
        assert_eq!(view.chart.bars[1].intensity, 0.5);
        assert_eq!(view.kpi_cards[0].value, "$1,852");
        assert_eq!(view.kpi_cards[2].value, "$925.80");
    }

    #[test]
    fn test_render_with_unknown_year_matches_nothing() {
        let dataset = SalesDataset::from_reader(SAMPLE_CSV.as_bytes()).unwrap();
        let view = render(&dataset, &sales_filter(1999, "Office Supplies", "Home Office"));
        assert_eq!(view.kpis.order_count, 0);
        assert!(view.chart.bars.is_empty());
    }
}
