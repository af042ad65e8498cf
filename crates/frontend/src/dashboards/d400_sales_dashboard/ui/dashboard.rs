use crate::dashboards::d400_sales_dashboard::api;
use crate::shared::components::bar_chart::HorizontalBarChart;
use crate::shared::components::kpi_card::KpiCardView;
use contracts::dashboards::d400_sales_dashboard::{FilterOptions, SalesDashboardView, SalesFilter};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

const DEFAULT_TITLE: &str = "Sales Dashboard";

/// Top cities by sales for a year / category / segment selection
#[component]
pub fn SalesDashboard() -> impl IntoView {
    let options = RwSignal::new(None::<FilterOptions>);
    let year = RwSignal::new(String::new());
    let category = RwSignal::new(String::new());
    let segment = RwSignal::new(String::new());

    let data = RwSignal::new(None::<SalesDashboardView>);
    let loading = RwSignal::new(false);
    let error_msg = RwSignal::new(None::<String>);
    // Responses older than the latest request are dropped
    let request_seq = StoredValue::new(0_u64);

    // Load selector options on mount
    spawn_local(async move {
        match api::get_filter_options().await {
            Ok(opts) => {
                if let Some(default) = opts.default_filter() {
                    year.set(default.year.to_string());
                    category.set(default.category);
                    segment.set(default.segment);
                }
                options.set(Some(opts));
            }
            Err(err) => {
                log::error!("Failed to load D400 filter options: {}", err);
                error_msg.set(Some(err));
            }
        }
    });

    // Reload the view whenever the selection changes
    Effect::new(move |_| {
        let Some(filter) = selected_filter(&year.get(), &category.get(), &segment.get()) else {
            return;
        };

        let seq = request_seq.get_value() + 1;
        request_seq.set_value(seq);
        loading.set(true);
        error_msg.set(None);

        spawn_local(async move {
            let result = api::get_dashboard_view(&filter).await;
            if request_seq.get_value() != seq {
                return;
            }
            match result {
                Ok(view) => data.set(Some(view)),
                Err(err) => {
                    log::error!("Failed to load D400 view: {}", err);
                    error_msg.set(Some(err));
                }
            }
            loading.set(false);
        });
    });

    let years = move || options.get().map(|o| o.years).unwrap_or_default();
    let categories = move || options.get().map(|o| o.categories).unwrap_or_default();
    let segments = move || options.get().map(|o| o.segments).unwrap_or_default();

    let title = move || {
        data.get()
            .map(|v| v.title)
            .unwrap_or_else(|| DEFAULT_TITLE.to_string())
    };
    let subtitle = move || data.get().map(|v| v.subtitle).unwrap_or_default();
    let chart = Signal::derive(move || data.get().map(|v| v.chart));

    view! {
        <div id="d400_sales_dashboard--dashboard" data-page-category="dashboard" class="page page--dashboard d400-dashboard">
            <aside class="d400-dashboard__filters">
                <h3 class="d400-dashboard__filters-title">"🔍 Filters"</h3>
                <Flex vertical=true gap=FlexGap::Medium>
                    <Flex vertical=true gap=FlexGap::Small>
                        <Label>"Year"</Label>
                        <Select value=year>
                            <For
                                each=years
                                key=|y| *y
                                children=move |y: i32| view! { <option value=y.to_string()>{y}</option> }
                            />
                        </Select>
                    </Flex>
                    <Flex vertical=true gap=FlexGap::Small>
                        <Label>"Category"</Label>
                        <Select value=category>
                            <For
                                each=categories
                                key=|c| c.clone()
                                children=move |c: String| view! { <option value=c.clone()>{c.clone()}</option> }
                            />
                        </Select>
                    </Flex>
                    <Flex vertical=true gap=FlexGap::Small>
                        <Label>"Segment"</Label>
                        <Select value=segment>
                            <For
                                each=segments
                                key=|s| s.clone()
                                children=move |s: String| view! { <option value=s.clone()>{s.clone()}</option> }
                            />
                        </Select>
                    </Flex>
                </Flex>
            </aside>

            <section class="d400-dashboard__content">
                <div class="page__header">
                    <h1 class="page__title">"📊 " {title}</h1>
                    <p class="page__subtitle">{subtitle}</p>
                </div>

                {move || error_msg.get().map(|msg| view! {
                    <div class="alert alert--error">
                        <strong>"⚠ Error: "</strong>
                        {msg}
                    </div>
                })}

                {move || {
                    if loading.get() && data.get().is_none() {
                        Some(view! {
                            <Flex gap=FlexGap::Small style="align-items: center; padding: var(--spacing-lg);">
                                <Spinner />
                                <span>"Loading data..."</span>
                            </Flex>
                        })
                    } else {
                        None
                    }
                }}

                <div class="kpi-container">
                    {move || {
                        data.get()
                            .map(|v| v.kpi_cards)
                            .unwrap_or_default()
                            .into_iter()
                            .map(|card| view! { <KpiCardView card=card /> })
                            .collect_view()
                    }}
                </div>

                <HorizontalBarChart chart=chart />
            </section>
        </div>
    }
}

/// Build a filter once all three selectors hold a value
fn selected_filter(year: &str, category: &str, segment: &str) -> Option<SalesFilter> {
    if category.is_empty() || segment.is_empty() {
        return None;
    }
    Some(SalesFilter {
        year: year.parse().ok()?,
        category: category.to_string(),
        segment: segment.to_string(),
    })
}
