//! Server-rendered survey page, with one JSON endpoint per chart.

use log::info;

use snafu::prelude::*;

use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;

use survey_metrics::sample_comments;

use crate::dash::cache::{fetch, WorkbookCache};
use crate::dash::io_excel::SurveyWorkbook;
use crate::dash::metrics::*;
use crate::dash::pages::{format_rate, Pages, INDEX_PAGE};
use crate::dash::schema::{Sheet, COL_ANSWER};
use crate::dash::*;

/// Comments shown per category on the page.
const INDEX_COMMENTS: usize = 5;

/// State shared by the handlers of both front ends.
pub struct AppState {
    pub cache: Arc<WorkbookCache>,
    pub pages: Pages,
}

impl AppState {
    pub fn new(cache: WorkbookCache) -> DashResult<AppState> {
        Ok(AppState {
            cache: Arc::new(cache),
            pages: Pages::new()?,
        })
    }
}

#[derive(Serialize, Debug)]
struct RateView {
    label: &'static str,
    value: String,
}

#[derive(Serialize, Debug)]
struct SectionView {
    id: String,
    title: &'static str,
    endpoint: &'static str,
    kind: &'static str,
    rows: Vec<LabelValue>,
}

#[derive(Serialize, Debug)]
struct IndexView {
    total_respondents: u64,
    rates: Vec<RateView>,
    sections: Vec<SectionView>,
    area_usefulness: Vec<LabelValue>,
    ease_comment_total: u64,
    usefulness_comment_total: u64,
    ease_comments: Vec<String>,
    usefulness_comments: Vec<String>,
}

fn chart_kind(query: ChartQuery) -> &'static str {
    match query {
        ChartQuery::Departments | ChartQuery::Objectives => "bar",
        _ => "doughnut",
    }
}

fn index_view(workbook: &SurveyWorkbook) -> DashResult<IndexView> {
    let bundle = calculate_metrics(workbook)?;

    let sections = ChartQuery::ALL
        .iter()
        .enumerate()
        .map(|(idx, q)| {
            let dist = bundle.distribution(q.metric()).cloned().unwrap_or_default();
            SectionView {
                id: format!("chart-{}", idx),
                title: q.title(),
                endpoint: q.endpoint(),
                kind: chart_kind(*q),
                rows: label_values(&q.ordered(&dist)),
            }
        })
        .collect();

    let rate = |name: &str| format_rate(bundle.rate(name).unwrap_or(0.0));
    let rates = vec![
        RateView {
            label: "Taxa de Utilidade",
            value: rate(USEFULNESS_RATE),
        },
        RateView {
            label: "Engajamento Alto",
            value: rate(ENGAGEMENT_RATE),
        },
        RateView {
            label: "Facilidade de Uso",
            value: rate(EASE_RATE),
        },
        RateView {
            label: "Utilidade da Área",
            value: rate(AREA_USEFULNESS_RATE),
        },
    ];

    Ok(IndexView {
        total_respondents: bundle.count(TOTAL_RESPONDENTS).unwrap_or(0),
        rates,
        sections,
        area_usefulness: bundle
            .distribution(AREA_USEFULNESS)
            .map(label_values)
            .unwrap_or_default(),
        ease_comment_total: bundle.count(EASE_COMMENT_TOTAL).unwrap_or(0),
        usefulness_comment_total: bundle.count(USEFULNESS_COMMENT_TOTAL).unwrap_or(0),
        ease_comments: sample_comments(
            workbook.table(Sheet::EaseComments),
            COL_ANSWER,
            INDEX_COMMENTS,
        )
        .context(MetricsSnafu {})?,
        usefulness_comments: sample_comments(
            workbook.table(Sheet::UsefulnessComments),
            COL_ANSWER,
            INDEX_COMMENTS,
        )
        .context(MetricsSnafu {})?,
    })
}

async fn index(State(state): State<Arc<AppState>>) -> DashResult<Html<String>> {
    let workbook = fetch(&state.cache).await?;
    let view = index_view(&workbook)?;
    Ok(Html(state.pages.render(INDEX_PAGE, &view)?))
}

async fn chart(state: Arc<AppState>, query: ChartQuery) -> DashResult<Json<Vec<LabelValue>>> {
    let workbook = fetch(&state.cache).await?;
    Ok(Json(query.series(&workbook)?))
}

pub fn router(state: Arc<AppState>) -> Router {
    let mut router: Router<Arc<AppState>> = Router::new().route("/", get(index));
    for query in ChartQuery::ALL {
        router = router.route(
            query.endpoint(),
            get(move |State(state): State<Arc<AppState>>| chart(state, query)),
        );
    }
    router.with_state(state)
}

pub async fn run(cache: WorkbookCache, bind: &str) -> DashResult<()> {
    info!(
        "Serving survey page for {:?} (cache enabled: {})",
        cache.path(),
        cache.is_enabled()
    );
    let state = Arc::new(AppState::new(cache)?);
    let listener = TcpListener::bind(bind)
        .await
        .context(BindSnafu { addr: bind })?;
    info!("Listening on http://{}", bind);
    axum::serve(listener, router(state))
        .await
        .context(ServeSnafu {})
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::dash::fixtures::write_survey_workbook;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::path::Path;
    use tower::ServiceExt;

    pub async fn request(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn app(path: &Path) -> Router {
        router(Arc::new(AppState::new(WorkbookCache::uncached(path)).unwrap()))
    }

    #[tokio::test]
    async fn usage_time_endpoint_is_ordered() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("survey.xlsx");
        write_survey_workbook(&path);

        let (status, body) = request(app(&path), "/api/tempo-uso").await;
        assert_eq!(status, StatusCode::OK);
        let points: Vec<LabelValue> = serde_json::from_str(&body).unwrap();
        let labels: Vec<&str> = points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Menos de 1 mês", "Entre 1 e 6 meses", "Mais de 1 ano"]);
        assert_eq!(points[2].value, 3);
    }

    #[tokio::test]
    async fn every_endpoint_answers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("survey.xlsx");
        write_survey_workbook(&path);

        for query in ChartQuery::ALL {
            let (status, body) = request(app(&path), query.endpoint()).await;
            assert_eq!(status, StatusCode::OK, "{}", query.endpoint());
            let points: Vec<LabelValue> = serde_json::from_str(&body).unwrap();
            assert!(!points.is_empty());
        }
        let (_, body) = request(app(&path), "/api/departamentos").await;
        assert!(body.starts_with(r#"[{"label":"Vendas","value":3}"#));
    }

    #[tokio::test]
    async fn index_page_shows_metrics_and_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("survey.xlsx");
        write_survey_workbook(&path);

        let (status, body) = request(app(&path), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("75.0%"));
        assert!(body.contains("Interface intuitiva"));
        assert!(body.contains("Reduz retrabalho"));
        assert!(body.contains("/api/facilidade"));
    }

    #[tokio::test]
    async fn missing_workbook_is_a_server_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.xlsx");

        let (status, body) = request(app(&path), "/api/frequencia").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.starts_with("Survey workbook not found"));
    }
}
