use contracts::dashboards::d400_sales_dashboard::KpiCard;
use leptos::prelude::*;

/// Card with an already formatted KPI value
#[component]
pub fn KpiCardView(card: KpiCard) -> impl IntoView {
    let class = format!("kpi-card kpi-card--{}", card.id);

    view! {
        <div class=class>
            <h2 class="kpi-card__value">
                <span class="kpi-card__icon">{card.icon}</span>
                " "
                {card.value}
            </h2>
            <p class="kpi-card__label">{card.label}</p>
        </div>
    }
}
