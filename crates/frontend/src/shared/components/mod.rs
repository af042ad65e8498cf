pub mod bar_chart;
pub mod kpi_card;
