use anyhow::Result;
use contracts::dashboards::d400_sales_dashboard::{FilterOptions, SalesFilter};
use std::collections::BTreeSet;

use crate::shared::data::sales_dataset::{get_dataset, SaleRecord, SalesDataset};

/// The loaded dataset, or an error when startup did not load it
pub fn dataset() -> Result<&'static SalesDataset> {
    get_dataset().ok_or_else(|| anyhow::anyhow!("Sales dataset has not been loaded"))
}

/// Sorted non-null distinct values of one field across the whole dataset
pub fn distinct_values<T: Ord>(
    dataset: &SalesDataset,
    field: impl Fn(&SaleRecord) -> Option<T>,
) -> Vec<T> {
    let values: BTreeSet<T> = dataset.records().iter().filter_map(field).collect();
    values.into_iter().collect()
}

/// Options for all three selectors
pub fn filter_options(dataset: &SalesDataset) -> FilterOptions {
    FilterOptions {
        years: distinct_values(dataset, |r| r.year),
        categories: distinct_values(dataset, |r| r.category.clone()),
        segments: distinct_values(dataset, |r| r.segment.clone()),
    }
}

/// Records matching year, category and segment exactly
pub fn filter<'a>(dataset: &'a SalesDataset, filter: &SalesFilter) -> Vec<&'a SaleRecord> {
    dataset
        .records()
        .iter()
        .filter(|r| matches_filter(r, filter))
        .collect()
}

fn matches_filter(record: &SaleRecord, filter: &SalesFilter) -> bool {
    record.year == Some(filter.year)
        && record.category.as_deref() == Some(filter.category.as_str())
        && record.segment.as_deref() == Some(filter.segment.as_str())
}
