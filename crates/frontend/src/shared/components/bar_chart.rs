//! Horizontal bar chart drawn with plain HTML/CSS.
//!
//! Bars arrive ordered from largest to smallest and are drawn top to bottom,
//! with the formatted value outside the bar. Colour follows a light-to-dark
//! blue scale driven by `ChartBar::intensity`; no legend is drawn.

use contracts::dashboards::d400_sales_dashboard::CityChart;
use leptos::prelude::*;

/// Lightest and darkest colours of the blue scale
const BLUE_LIGHT: (f64, f64, f64) = (222.0, 235.0, 247.0);
const BLUE_DARK: (f64, f64, f64) = (8.0, 81.0, 156.0);

/// Longest bar takes this share of the track, the rest is left for the value label
const MAX_BAR_PERCENT: f64 = 80.0;

#[component]
pub fn HorizontalBarChart(
    /// Chart to draw, `None` while nothing has been loaded yet
    #[prop(into)]
    chart: Signal<Option<CityChart>>,
) -> impl IntoView {
    view! {
        <div class="bar-chart">
            {move || chart.get().map(|chart| {
                let body = if chart.bars.is_empty() {
                    view! {
                        <div class="bar-chart__empty">"No sales for this selection"</div>
                    }.into_any()
                } else {
                    chart.bars.into_iter().map(|bar| {
                        let style = format!(
                            "width: {:.1}%; background: {}; border: 0.5px solid gray;",
                            bar_width_percent(bar.intensity),
                            bar_color(bar.intensity)
                        );
                        view! {
                            <div class="bar-chart__row" title=bar.city>
                                <span class="bar-chart__label">{bar.label}</span>
                                <div class="bar-chart__track">
                                    <div class="bar-chart__bar" style=style></div>
                                    <span class="bar-chart__value">{bar.value_text}</span>
                                </div>
                            </div>
                        }
                    }).collect_view().into_any()
                };

                view! {
                    <div class="bar-chart__inner">
                        <h3 class="bar-chart__title">{chart.title}</h3>
                        {body}
                    </div>
                }
            })}
        </div>
    }
}

fn bar_width_percent(intensity: f64) -> f64 {
    let intensity = if intensity.is_finite() { intensity.clamp(0.0, 1.0) } else { 0.0 };
    (intensity * MAX_BAR_PERCENT).max(0.5)
}

/// CSS colour on the blue scale for an intensity in [0, 1]
fn bar_color(intensity: f64) -> String {
    let t = if intensity.is_finite() { intensity.clamp(0.0, 1.0) } else { 0.0 };
    let lerp = |from: f64, to: f64| (from + (to - from) * t).round() as u8;
    format!(
        "rgb({}, {}, {})",
        lerp(BLUE_LIGHT.0, BLUE_DARK.0),
        lerp(BLUE_LIGHT.1, BLUE_DARK.1),
        lerp(BLUE_LIGHT.2, BLUE_DARK.2)
    )
}
