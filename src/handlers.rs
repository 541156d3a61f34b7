use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tera::Context;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::error;

use crate::dom::ClickEvent;
use crate::fetcher::CovidApi;
use crate::state::AppState;

/// Builds the dashboard router around a shared state.
pub fn router<A: CovidApi + 'static>(state: Arc<AppState<A>>) -> Router {
    Router::new()
        .route("/", get(index::<A>))
        .route("/api/page", get(api_page::<A>))
        .route("/api/chart", get(api_chart::<A>))
        .route("/api/rank-list/click", post(rank_list_click::<A>))
        .nest_service("/static", ServeDir::new("static"))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn render_template(
    tera: &tera::Tera,
    template: &str,
    context: &Context,
) -> Result<Html<String>, (StatusCode, &'static str)> {
    tera.render(template, context).map(Html).map_err(|e| {
        error!("Template render error for '{}': {}", template, e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Render error")
    })
}

/// GET / - Dashboard page.
pub async fn index<A: CovidApi + 'static>(State(state): State<Arc<AppState<A>>>) -> impl IntoResponse {
    let page = state.session.page().await;

    let mut context = Context::new();
    context.insert("page", &page);
    context.insert("chart", &state.session.chart());
    context.insert("loading", &state.session.is_loading());

    render_template(&state.tera, "dashboard.html", &context)
}

/// GET /api/page - Current page model as JSON.
pub async fn api_page<A: CovidApi + 'static>(State(state): State<Arc<AppState<A>>>) -> impl IntoResponse {
    Json(state.session.page().await)
}

/// GET /api/chart - Live chart config, or null when no chart exists.
pub async fn api_chart<A: CovidApi + 'static>(State(state): State<Arc<AppState<A>>>) -> impl IntoResponse {
    Json(state.session.chart())
}

/// POST /api/rank-list/click - Forwarded click on the rank list.
///
/// The drill-down runs on its own task so a client that disconnects cannot
/// cancel it halfway.
pub async fn rank_list_click<A: CovidApi + 'static>(
    State(state): State<Arc<AppState<A>>>,
    Json(event): Json<ClickEvent>,
) -> Response {
    let session = state.session.clone();
    let drill_down =
        tokio::spawn(async move { session.handle_rank_list_click(&event).await }).await;

    match drill_down {
        Ok(Ok(outcome)) => Json(outcome).into_response(),
        Ok(Err(e)) => {
            error!("Drill-down failed: {}", e);
            (
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
        Err(e) => {
            error!("Drill-down task aborted: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Drill-down aborted").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartJsFactory;
    use crate::controller::tests::{click_on, FakeApi};
    use crate::controller::Session;
    use crate::dom::Page;
    use crate::locale::DateFormatter;
    use crate::models::StatusCategory;
    use crate::render::tests::{country, summary};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tera::Tera;
    use tokio::sync::Semaphore;
    use tower::util::ServiceExt;

    fn templates() -> Tera {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("macros.html", include_str!("../templates/macros.html")),
            ("dashboard.html", include_str!("../templates/dashboard.html")),
        ])
        .unwrap();
        tera
    }

    async fn create_test_app(api: FakeApi) -> Router {
        let session = Arc::new(Session::new(
            api,
            Page::complete(),
            Box::new(ChartJsFactory),
            DateFormatter::default(),
        ));
        session.start_app().await.unwrap();
        router(Arc::new(AppState::new(templates(), session)))
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn click_request(slug: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/rank-list/click")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&click_on(slug)).unwrap()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_index_renders_summary() {
        let app = create_test_app(FakeApi::new(summary(vec![country("CN", 100, 5, 90)]))).await;
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("Country CN"));
        assert!(body.contains("2020. 4. 5."));
    }

    #[tokio::test]
    async fn test_api_page_end_to_end() {
        let app = create_test_app(FakeApi::new(summary(vec![country("CN", 100, 5, 90)]))).await;
        let response = app
            .oneshot(Request::builder().uri("/api/page").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let page: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(page["confirmed_total"]["text"], "100");
        assert_eq!(page["deaths"]["text"], "5");
        assert_eq!(page["recovered"]["text"], "90");
        assert_eq!(page["rank_list"]["children"][0]["id"], "CN");
    }

    #[tokio::test]
    async fn test_click_drills_down() {
        let api = FakeApi::new(summary(vec![country("CN", 100, 5, 90)]));
        let app = create_test_app(api.clone()).await;

        let response = app.clone().oneshot(click_request("CN")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let outcome: serde_json::Value =
            serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(outcome["outcome"], "completed");
        assert_eq!(outcome["slug"], "CN");
        assert_eq!(api.calls().len(), 3);

        let response = app
            .oneshot(Request::builder().uri("/api/chart").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let chart: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(chart["type"], "line");
        assert_eq!(chart["data"]["datasets"][0]["data"], serde_json::json!([10, 30, 20]));
    }

    #[tokio::test]
    async fn test_page_shows_spinners_while_click_pending() {
        let mut api = FakeApi::new(summary(vec![country("CN", 100, 5, 90)]));
        let gate = Arc::new(Semaphore::new(0));
        api.gate = Some(gate.clone());
        let app = create_test_app(api.clone()).await;

        let pending = tokio::spawn(app.clone().oneshot(click_request("CN")));
        api.started.notified().await;

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/api/page").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let page: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(page["deaths_list"]["children"][0]["id"], "deaths-spinner");
        assert_eq!(page["recovered_list"]["children"][0]["id"], "recovered-spinner");

        gate.add_permits(3);
        let response = pending.await.unwrap().unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(Request::builder().uri("/api/page").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let page: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(page["deaths_list"]["children"].as_array().unwrap().len(), 3);
        assert_eq!(page["deaths_list"]["children"][0]["class"], "list-item-b flex align-center");
    }

    #[tokio::test]
    async fn test_unlisted_click_is_no_country() {
        let api = FakeApi::new(summary(vec![country("CN", 1, 0, 0)]));
        let app = create_test_app(api.clone()).await;
        let response = app.oneshot(click_request("../../summary?x=")).await.unwrap();
        let outcome: serde_json::Value =
            serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(outcome["outcome"], "no_country");
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_chart_is_null_before_drill_down() {
        let app = create_test_app(FakeApi::new(summary(vec![]))).await;
        let response = app
            .oneshot(Request::builder().uri("/api/chart").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_string(response).await, "null");
    }

    #[tokio::test]
    async fn test_failed_click_is_bad_gateway() {
        let mut api = FakeApi::new(summary(vec![country("CN", 1, 0, 0)]));
        api.fail_on = Some(StatusCategory::Deaths);
        let app = create_test_app(api).await;
        let response = app.oneshot(click_request("CN")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_malformed_click_is_rejected() {
        let app = create_test_app(FakeApi::new(summary(vec![]))).await;
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/rank-list/click")
                    .header("content-type", "application/json")
                    .body(Body::from("{\"path\": 3}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response.status().is_client_error());
    }
}
