mod chart;
mod controller;
mod dom;
mod error;
mod fetcher;
mod handlers;
mod locale;
mod models;
mod render;
mod state;

use anyhow::Context as _;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::chart::ChartJsFactory;
use crate::controller::Session;
use crate::dom::Page;
use crate::fetcher::HttpCovidApi;
use crate::state::{AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "covid_dashboard=info,tower_http=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    info!("Using COVID-19 API at {}", config.api_base);

    let tera = state::load_templates("templates/**/*.html")?;
    let session = Arc::new(Session::new(
        HttpCovidApi::new(&config.api_base)?,
        Page::complete(),
        Box::new(ChartJsFactory),
        config.date_formatter()?,
    ));

    // A failed initial load keeps serving, but without the click listener.
    if let Err(e) = session.start_app().await {
        error!("Initial summary load failed: {}", e);
    }
    if !session.is_listening() {
        warn!("Rank list clicks will be ignored");
    }

    let _scheduler = match &config.refresh_cron {
        Some(cron) => Some(schedule_refresh(cron, session.clone()).await?),
        None => None,
    };

    let state = Arc::new(AppState::new(tera, session));
    let app = handlers::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("binding {}", config.bind_address))?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

/// Re-fetches and re-renders the summary on the given cron schedule.
async fn schedule_refresh(
    cron: &str,
    session: Arc<Session<HttpCovidApi>>,
) -> Result<JobScheduler, error::DashboardError> {
    let scheduler = JobScheduler::new().await?;
    let job = Job::new_async(cron, move |_uuid, _lock| {
        let session = session.clone();
        Box::pin(async move {
            info!("Refreshing summary");
            if let Err(e) = session.refresh_summary().await {
                error!("Summary refresh failed: {}", e);
            }
        })
    })?;
    scheduler.add(job).await?;
    scheduler.start().await?;
    info!("Summary refresh scheduled with '{}'", cron);
    Ok(scheduler)
}
