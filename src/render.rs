//! Display updates for the dashboard page.
//!
//! Each function is idempotent and skips silently when its target node is
//! missing from the page.

use itertools::Itertools;

use crate::chart::{ChartConfig, ChartFactory, ChartHandle};
use crate::dom::{spinner, Element, Page, Selector, Tag};
use crate::locale::DateFormatter;
use crate::models::{CountryHistoryPoint, GlobalSummary, StatusCategory};

/// Number of trailing history points plotted on the chart.
pub const CHART_WINDOW: usize = 14;

const DEATHS_SPINNER_ID: &str = "deaths-spinner";
const RECOVERED_SPINNER_ID: &str = "recovered-spinner";

fn set_text(target: Option<&mut Element>, text: impl Into<String>) {
    if let Some(el) = target {
        el.set_text(text);
    }
}

/// Writes the per-country sums of confirmed, deaths and recovered.
pub fn render_global_totals(page: &mut Page, summary: &GlobalSummary) {
    let totals = summary.country_totals();
    set_text(
        page.select_mut(Selector::ConfirmedTotal),
        totals.confirmed.to_string(),
    );
    set_text(page.select_mut(Selector::Deaths), totals.deaths.to_string());
    set_text(
        page.select_mut(Selector::Recovered),
        totals.recovered.to_string(),
    );
}

pub fn render_last_updated(page: &mut Page, summary: &GlobalSummary, fmt: &DateFormatter) {
    set_text(
        page.select_mut(Selector::LastUpdatedTime),
        fmt.format_date_time(&summary.date),
    );
}

/// Lists countries by descending confirmed count, one entry per country.
/// Entries with equal counts keep their API order.
pub fn render_country_rank_list(page: &mut Page, summary: &GlobalSummary) {
    let Some(list) = page.select_mut(Selector::RankList) else {
        return;
    };
    let entries = summary
        .countries
        .iter()
        .sorted_by(|a, b| b.total_confirmed.cmp(&a.total_confirmed))
        .map(|country| {
            Element::new(Tag::Li)
                .with_id(&country.slug)
                .with_class("list-item flex align-center")
                .with_child(
                    Element::new(Tag::Span)
                        .with_class("cases")
                        .with_text(country.total_confirmed.to_string()),
                )
                .with_child(
                    Element::new(Tag::P)
                        .with_class("country")
                        .with_text(&country.country),
                )
        })
        .collect();
    list.replace_children(entries);
}

/// Most recent first; points sharing a date keep their API order.
fn sorted_by_date_desc(points: &[CountryHistoryPoint]) -> Vec<&CountryHistoryPoint> {
    points
        .iter()
        .sorted_by(|a, b| b.date.cmp(&a.date))
        .collect()
}

/// Replaces `target`'s entries with one per point, most recent first.
pub fn render_history_list(
    target: Option<&mut Element>,
    status: StatusCategory,
    points: &[CountryHistoryPoint],
    fmt: &DateFormatter,
) {
    let Some(list) = target else {
        return;
    };
    let entries = sorted_by_date_desc(points)
        .into_iter()
        .map(|point| {
            Element::new(Tag::Li)
                .with_class("list-item-b flex align-center")
                .with_child(
                    Element::new(Tag::Span)
                        .with_class(status.as_str())
                        .with_text(point.cases.to_string()),
                )
                .with_child(Element::new(Tag::P).with_text(fmt.history_date_label(&point.date)))
        })
        .collect();
    list.replace_children(entries);
}

/// Writes the case count of the most recent point. An empty series leaves
/// the target untouched.
pub fn render_country_total(target: Option<&mut Element>, points: &[CountryHistoryPoint]) {
    if let Some(latest) = sorted_by_date_desc(points).first() {
        set_text(target, latest.cases.to_string());
    }
}

/// Replaces the live chart. Without a canvas on the page nothing happens.
pub fn render_chart(
    page: &Page,
    handle: &mut ChartHandle,
    factory: &dyn ChartFactory,
    data: Vec<i64>,
    labels: Vec<String>,
) {
    if page.select(Selector::LineChart).is_none() {
        return;
    }
    handle.replace(factory, ChartConfig::line(data, labels));
}

/// Plots the last [`CHART_WINDOW`] points in the order the API sent them.
pub fn render_chart_from_history(
    page: &Page,
    handle: &mut ChartHandle,
    factory: &dyn ChartFactory,
    points: &[CountryHistoryPoint],
    fmt: &DateFormatter,
) {
    let window = &points[points.len().saturating_sub(CHART_WINDOW)..];
    let data = window.iter().map(|p| p.cases).collect();
    let labels = window.iter().map(|p| fmt.chart_date_label(&p.date)).collect();
    render_chart(page, handle, factory, data, labels);
}

pub fn start_loading_animation(page: &mut Page) {
    if let Some(list) = page.select_mut(Selector::DeathsList) {
        list.append_child(spinner(DEATHS_SPINNER_ID));
    }
    if let Some(list) = page.select_mut(Selector::RecoveredList) {
        list.append_child(spinner(RECOVERED_SPINNER_ID));
    }
}

pub fn end_loading_animation(page: &mut Page) {
    if let Some(list) = page.select_mut(Selector::DeathsList) {
        list.remove_child_by_id(DEATHS_SPINNER_ID);
    }
    if let Some(list) = page.select_mut(Selector::RecoveredList) {
        list.remove_child_by_id(RECOVERED_SPINNER_ID);
    }
}

pub fn clear_list(target: Option<&mut Element>) {
    if let Some(list) = target {
        list.clear();
    }
}
