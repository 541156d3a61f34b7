//! Dashboard session: initial load and the rank-list drill-down.

use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::chart::{ChartConfig, ChartFactory, ChartHandle};
use crate::dom::{ClickEvent, Page, Selector};
use crate::error::Result;
use crate::fetcher::CovidApi;
use crate::locale::DateFormatter;
use crate::models::StatusCategory;
use crate::render;

/// What a rank-list click ended up doing.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ClickOutcome {
    /// All three series were fetched and rendered.
    Completed { slug: String },
    /// A drill-down was already in flight; the click was dropped.
    Busy,
    /// The click did not land on an entry of the rendered rank list.
    NoCountry,
    /// The initial load never attached the click listener.
    NotListening,
}

/// Holds the page and the only mutable dashboard state: the loading flag
/// and the live chart.
///
/// The page lock is never held across a request, so readers see partial
/// states (spinners, cleared lists) while a drill-down is in flight.
pub struct Session<A> {
    api: A,
    chart_factory: Box<dyn ChartFactory>,
    fmt: DateFormatter,
    page: RwLock<Page>,
    chart: Mutex<ChartHandle>,
    loading: AtomicBool,
    listening: AtomicBool,
}

impl<A: CovidApi> Session<A> {
    pub fn new(api: A, page: Page, chart_factory: Box<dyn ChartFactory>, fmt: DateFormatter) -> Self {
        Self {
            api,
            chart_factory,
            fmt,
            page: RwLock::new(page),
            chart: Mutex::new(ChartHandle::default()),
            loading: AtomicBool::new(false),
            listening: AtomicBool::new(false),
        }
    }

    /// Loads the summary, renders it, then starts accepting rank-list clicks.
    ///
    /// On failure the listener stays detached.
    pub async fn start_app(&self) -> Result<()> {
        self.refresh_summary().await?;
        if self.page.read().await.select(Selector::RankList).is_some() {
            self.listening.store(true, Ordering::SeqCst);
            info!("Rank list click listener attached");
        }
        Ok(())
    }

    /// Fetches the summary and re-renders totals, rank list and timestamp.
    pub async fn refresh_summary(&self) -> Result<()> {
        let summary = self.api.fetch_global_summary().await?;
        info!("Fetched summary for {} countries", summary.countries.len());

        let mut page = self.page.write().await;
        render::render_global_totals(&mut page, &summary);
        render::render_country_rank_list(&mut page, &summary);
        render::render_last_updated(&mut page, &summary, &self.fmt);
        Ok(())
    }

    /// Drills down into the clicked country.
    ///
    /// The deaths, recovered and confirmed series are requested one after
    /// another. A failed request returns early and leaves the loading flag
    /// set and the spinners in place, so later clicks are refused.
    pub async fn handle_rank_list_click(&self, event: &ClickEvent) -> Result<ClickOutcome> {
        if !self.listening.load(Ordering::SeqCst) {
            return Ok(ClickOutcome::NotListening);
        }
        let Some(slug) = event.resolve_slug().map(str::to_string) else {
            debug!("Click outside of a country entry: {:?}", event.path);
            return Ok(ClickOutcome::NoCountry);
        };
        if !self.is_ranked(&slug).await {
            debug!("'{}' is not on the rank list, ignoring click", slug);
            return Ok(ClickOutcome::NoCountry);
        }
        if self
            .loading
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Drill-down in flight, dropping click on '{}'", slug);
            return Ok(ClickOutcome::Busy);
        }

        info!("Drilling down into '{}'", slug);
        {
            let mut page = self.page.write().await;
            render::clear_list(page.select_mut(Selector::DeathsList));
            render::clear_list(page.select_mut(Selector::RecoveredList));
            render::start_loading_animation(&mut page);
        }

        let deaths = self
            .api
            .fetch_country_history(&slug, StatusCategory::Deaths)
            .await?;
        let recovered = self
            .api
            .fetch_country_history(&slug, StatusCategory::Recovered)
            .await?;
        let confirmed = self
            .api
            .fetch_country_history(&slug, StatusCategory::Confirmed)
            .await?;

        {
            let mut page = self.page.write().await;
            render::end_loading_animation(&mut page);
            render::render_history_list(
                page.select_mut(Selector::DeathsList),
                StatusCategory::Deaths,
                &deaths,
                &self.fmt,
            );
            render::render_country_total(page.select_mut(Selector::Deaths), &deaths);
            render::render_history_list(
                page.select_mut(Selector::RecoveredList),
                StatusCategory::Recovered,
                &recovered,
                &self.fmt,
            );
            render::render_country_total(page.select_mut(Selector::Recovered), &recovered);

            let mut chart = self.chart.lock().unwrap_or_else(|e| e.into_inner());
            render::render_chart_from_history(
                &page,
                &mut chart,
                self.chart_factory.as_ref(),
                &confirmed,
                &self.fmt,
            );
        }

        self.loading.store(false, Ordering::SeqCst);
        Ok(ClickOutcome::Completed { slug })
    }

    /// Whether `slug` is the id of an entry currently on the rank list.
    async fn is_ranked(&self, slug: &str) -> bool {
        self.page
            .read()
            .await
            .select(Selector::RankList)
            .is_some_and(|list| list.children.iter().any(|li| li.id.as_deref() == Some(slug)))
    }

    pub async fn page(&self) -> Page {
        self.page.read().await.clone()
    }

    pub fn chart(&self) -> Option<ChartConfig> {
        self.chart
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .current()
            .cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    pub fn is_listening(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }
}
