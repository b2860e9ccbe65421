//! Single-page survey dashboard: KPIs, charts, comments, detailed tables and
//! CSV exports.

use log::info;

use snafu::prelude::*;

use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::{Html, IntoResponse, Redirect};
use axum::routing::get;
use axum::Router;
use serde::Serialize;
use tokio::net::TcpListener;

use survey_metrics::ordering::detail_rows;
use survey_metrics::{count_distribution, sample_comments, top_n, Distribution};

use crate::dash::cache::{fetch, WorkbookCache};
use crate::dash::export::table_to_csv;
use crate::dash::io_excel::SurveyWorkbook;
use crate::dash::metrics::*;
use crate::dash::pages::{format_rate, script_json, DASHBOARD_PAGE};
use crate::dash::schema::*;
use crate::dash::server::AppState;
use crate::dash::*;

/// Comments listed per tab.
const DASHBOARD_COMMENTS: usize = 10;
/// Comments shown unfolded at the top of each tab.
const EXPANDED_COMMENTS: usize = 3;

/// The raw tables offered for download.
pub const EXPORTED_SHEETS: [Sheet; 2] = [Sheet::UsageTime, Sheet::Frequency];

#[derive(Serialize, Debug)]
struct KpiView {
    icon: &'static str,
    label: &'static str,
    value: String,
    delta: Option<String>,
    help: &'static str,
}

#[derive(Serialize, Debug)]
struct ExportLink {
    label: &'static str,
    href: String,
}

#[derive(Serialize, Debug)]
struct ChartView {
    id: String,
    title: &'static str,
    kind: &'static str,
    labels: Vec<String>,
    values: Vec<u64>,
}

#[derive(Serialize, Debug)]
struct CommentView {
    number: usize,
    text: String,
    expanded: bool,
}

#[derive(Serialize, Debug)]
struct CommentTab {
    id: &'static str,
    title: &'static str,
    total: u64,
    comments: Vec<CommentView>,
}

#[derive(Serialize, Debug)]
struct DetailRowView {
    category: String,
    count: u64,
    percent: String,
}

#[derive(Serialize, Debug)]
struct DetailView {
    title: &'static str,
    rows: Vec<DetailRowView>,
}

#[derive(Serialize, Debug)]
struct DashboardView {
    kpis: Vec<KpiView>,
    response_counts: Vec<LabelValue>,
    exports: Vec<ExportLink>,
    donuts: Vec<ChartView>,
    bars: Vec<ChartView>,
    charts_json: String,
    comment_tabs: Vec<CommentTab>,
    details: Vec<DetailView>,
}

pub fn export_path(sheet: Sheet) -> String {
    format!("/export/{}.csv", sheet.key())
}

fn chart_view(id: String, title: &'static str, kind: &'static str, dist: &Distribution) -> ChartView {
    ChartView {
        id,
        title,
        kind,
        labels: dist.labels().map(|l| l.to_string()).collect(),
        values: dist.entries().iter().map(|(_, c)| *c).collect(),
    }
}

fn kpi_rate(
    icon: &'static str,
    label: &'static str,
    rate: f64,
    help: &'static str,
) -> KpiView {
    KpiView {
        icon,
        label,
        value: format!("{}%", format_rate(rate)),
        delta: Some(format!("{:.1}% acima da média", rate - 50.0)),
        help,
    }
}

fn comment_tab(
    workbook: &SurveyWorkbook,
    sheet: Sheet,
    id: &'static str,
    title: &'static str,
) -> DashResult<CommentTab> {
    let table = workbook.table(sheet);
    let comments = sample_comments(table, COL_ANSWER, DASHBOARD_COMMENTS)
        .context(MetricsSnafu {})?
        .into_iter()
        .enumerate()
        .map(|(idx, text)| CommentView {
            number: idx + 1,
            text,
            expanded: idx < EXPANDED_COMMENTS,
        })
        .collect();
    Ok(CommentTab {
        id,
        title,
        total: table.len() as u64,
        comments,
    })
}

fn detail_view(
    workbook: &SurveyWorkbook,
    sheet: Sheet,
    column: &str,
    title: &'static str,
) -> DashResult<DetailView> {
    let table = workbook.table(sheet);
    let dist = count_distribution(table, column).context(MetricsSnafu {})?;
    let rows = detail_rows(&dist, table.len() as u64)
        .into_iter()
        .map(|r| DetailRowView {
            category: r.category,
            count: r.count,
            percent: format_rate(r.percent),
        })
        .collect();
    Ok(DetailView { title, rows })
}

fn dashboard_view(workbook: &SurveyWorkbook) -> DashResult<DashboardView> {
    let bundle = calculate_metrics(workbook)?;
    let rate = |name: &str| bundle.rate(name).unwrap_or(0.0);

    let kpis = vec![
        KpiView {
            icon: "👥",
            label: "Total de Respondentes",
            value: bundle.count(TOTAL_RESPONDENTS).unwrap_or(0).to_string(),
            delta: None,
            help: "Total de participantes da pesquisa",
        },
        kpi_rate(
            "✅",
            "Taxa de Utilidade",
            rate(USEFULNESS_RATE),
            "Percentual de usuários que consideram útil ou muito útil",
        ),
        kpi_rate(
            "⚡",
            "Engajamento Alto",
            rate(ENGAGEMENT_RATE),
            "Percentual de usuários que fazem análises diária ou semanalmente",
        ),
        kpi_rate(
            "😊",
            "Facilidade de Uso",
            rate(EASE_RATE),
            "Percentual de usuários que acham fácil ou muito fácil",
        ),
    ];

    let response_counts = [
        ("Tempo de uso", Sheet::UsageTime),
        ("Frequência", Sheet::Frequency),
        ("Facilidade", Sheet::EaseTime),
        ("Utilidade", Sheet::UsefulnessTime),
    ]
    .iter()
    .map(|(label, sheet)| LabelValue {
        label: label.to_string(),
        value: workbook.table(*sheet).len() as u64,
    })
    .collect();

    let exports = EXPORTED_SHEETS
        .iter()
        .map(|sheet| ExportLink {
            label: match sheet {
                Sheet::UsageTime => "Tempo de Uso (CSV)",
                _ => "Frequência (CSV)",
            },
            href: export_path(*sheet),
        })
        .collect();

    let mut donuts: Vec<ChartView> = Vec::new();
    for (idx, query) in [
        ChartQuery::UsageTime,
        ChartQuery::Frequency,
        ChartQuery::Ease,
        ChartQuery::Usefulness,
    ]
    .iter()
    .enumerate()
    {
        let dist = query.distribution(workbook)?;
        let shown = match query.order() {
            Some(order) => order.apply_zero_filled(&dist),
            None => dist,
        };
        donuts.push(chart_view(format!("donut-{}", idx), query.title(), "doughnut", &shown));
    }

    let departments = top_n(workbook.table(Sheet::Department), COL_DEPARTMENT, TOP_RANKING)
        .context(MetricsSnafu {})?;
    let objectives = top_n(
        workbook.table(Sheet::ObjectiveFrequency),
        COL_OBJECTIVE,
        TOP_RANKING,
    )
    .context(MetricsSnafu {})?;
    let bars = vec![
        chart_view("bar-0".to_string(), "Top 10 Departamentos", "bar", &departments),
        chart_view("bar-1".to_string(), "Objetivos da Área", "bar", &objectives),
    ];

    let charts_json = script_json(&donuts.iter().chain(bars.iter()).collect::<Vec<_>>())?;

    let comment_tabs = vec![
        comment_tab(
            workbook,
            Sheet::EaseComments,
            "tab-facilidade",
            "💭 Comentários sobre Facilidade",
        )?,
        comment_tab(
            workbook,
            Sheet::UsefulnessComments,
            "tab-utilidade",
            "✨ Comentários sobre Utilidade",
        )?,
    ];

    let details = vec![
        detail_view(workbook, Sheet::UsageTime, COL_USAGE_TIME, "Tempo de Uso")?,
        detail_view(workbook, Sheet::Frequency, COL_FREQUENCY, "Frequência de Análises")?,
        detail_view(workbook, Sheet::EaseTime, COL_EASE, "Facilidade de Uso")?,
        detail_view(workbook, Sheet::UsefulnessTime, COL_USEFULNESS, "Utilidade")?,
    ];

    Ok(DashboardView {
        kpis,
        response_counts,
        exports,
        donuts,
        bars,
        charts_json,
        comment_tabs,
        details,
    })
}

async fn dashboard(State(state): State<Arc<AppState>>) -> DashResult<Html<String>> {
    let workbook = fetch(&state.cache).await?;
    let view = dashboard_view(&workbook)?;
    Ok(Html(state.pages.render(DASHBOARD_PAGE, &view)?))
}

async fn download(state: Arc<AppState>, sheet: Sheet) -> DashResult<impl IntoResponse> {
    let workbook = fetch(&state.cache).await?;
    let body = table_to_csv(workbook.table(sheet))?;
    info!("Exporting {} ({} bytes)", sheet.key(), body.len());
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}.csv\"", sheet.key()),
            ),
        ],
        body,
    ))
}

async fn reload(State(state): State<Arc<AppState>>) -> Redirect {
    state.cache.invalidate();
    Redirect::to("/")
}

pub fn router(state: Arc<AppState>) -> Router {
    let mut router: Router<Arc<AppState>> = Router::new()
        .route("/", get(dashboard))
        .route("/reload", get(reload));
    for sheet in EXPORTED_SHEETS {
        router = router.route(
            &export_path(sheet),
            get(move |State(state): State<Arc<AppState>>| download(state, sheet)),
        );
    }
    router.with_state(state)
}

pub async fn run(cache: WorkbookCache, bind: &str) -> DashResult<()> {
    info!(
        "Serving survey dashboard for {:?} (cache enabled: {})",
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
