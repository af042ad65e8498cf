use crate::dashboards::SalesDashboard;
use leptos::prelude::*;
use thaw::ConfigProvider;

#[component]
pub fn App() -> impl IntoView {
    view! {
        <ConfigProvider>
            <SalesDashboard />
        </ConfigProvider>
    }
}
