pub mod d400_sales_dashboard;

pub use d400_sales_dashboard::ui::SalesDashboard;
