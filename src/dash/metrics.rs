// The survey metrics and the chart series built from them.

use log::{debug, info};

use snafu::prelude::*;

use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;

use survey_metrics::ordering::{reorder, CategoryOrder};
use survey_metrics::*;

use crate::dash::io_excel::SurveyWorkbook;
use crate::dash::schema::*;
use crate::dash::*;

pub const TOTAL_RESPONDENTS: &str = "total_respondentes";
pub const USAGE_TIME: &str = "tempo_uso";
pub const FREQUENCY: &str = "frequencia";
pub const DEPARTMENTS: &str = "departamentos";
pub const AREA_USEFULNESS: &str = "utilidade_area";
pub const OBJECTIVES: &str = "objetivos";
pub const EASE: &str = "facilidade";
pub const USEFULNESS: &str = "utilidade_geral";
pub const EASE_RATE: &str = "taxa_facilidade";
pub const USEFULNESS_RATE: &str = "taxa_utilidade";
pub const ENGAGEMENT_RATE: &str = "taxa_engajamento";
pub const AREA_USEFULNESS_RATE: &str = "taxa_utilidade_area";
pub const EASE_COMMENT_TOTAL: &str = "total_comentarios_facilidade";
pub const USEFULNESS_COMMENT_TOTAL: &str = "total_comentarios_utilidade";

/// One point of a chart.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct LabelValue {
    pub label: String,
    pub value: u64,
}

pub fn label_values(dist: &Distribution) -> Vec<LabelValue> {
    dist.entries()
        .iter()
        .map(|(label, count)| LabelValue {
            label: label.clone(),
            value: *count,
        })
        .collect()
}

fn distribution_of(workbook: &SurveyWorkbook, sheet: Sheet, column: &str) -> DashResult<Distribution> {
    count_distribution(workbook.table(sheet), column).context(MetricsSnafu {})
}

/// Computes every survey metric.
///
/// Rates are shares of the non-empty answers of their question. A question
/// without answers has a rate of 0.
pub fn calculate_metrics(workbook: &SurveyWorkbook) -> DashResult<MetricsBundle> {
    let mut bundle = MetricsBundle::new();

    let respondents = workbook.table(Sheet::UsageTime).len() as u64;
    bundle.insert(TOTAL_RESPONDENTS, Metric::Count(respondents));

    let usage_time = distribution_of(workbook, Sheet::UsageTime, COL_USAGE_TIME)?;
    let frequency = distribution_of(workbook, Sheet::Frequency, COL_FREQUENCY)?;
    let departments = top_n(workbook.table(Sheet::Department), COL_DEPARTMENT, TOP_RANKING)
        .context(MetricsSnafu {})?;
    let area_usefulness = distribution_of(workbook, Sheet::Department, COL_AREA_USEFULNESS)?;
    let objectives = distribution_of(workbook, Sheet::ObjectiveFrequency, COL_OBJECTIVE)?;
    let ease = distribution_of(workbook, Sheet::EaseTime, COL_EASE)?;
    let usefulness = distribution_of(workbook, Sheet::UsefulnessTime, COL_USEFULNESS)?;

    let ease_rate = positive_rate(&ease, &EASE_POSITIVE, ease.total());
    let usefulness_rate = positive_rate(&usefulness, &USEFULNESS_POSITIVE, usefulness.total());
    let engagement_rate = positive_rate(&frequency, &ENGAGED_FREQUENCIES, frequency.total());
    let area_usefulness_rate = positive_rate(
        &area_usefulness,
        &USEFULNESS_POSITIVE,
        area_usefulness.total(),
    );

    bundle.insert(USAGE_TIME, Metric::Distribution(usage_time));
    bundle.insert(FREQUENCY, Metric::Distribution(frequency));
    bundle.insert(DEPARTMENTS, Metric::Distribution(departments));
    bundle.insert(AREA_USEFULNESS, Metric::Distribution(area_usefulness));
    bundle.insert(OBJECTIVES, Metric::Distribution(objectives));
    bundle.insert(EASE, Metric::Distribution(ease));
    bundle.insert(USEFULNESS, Metric::Distribution(usefulness));
    bundle.insert(EASE_RATE, Metric::Rate(ease_rate));
    bundle.insert(USEFULNESS_RATE, Metric::Rate(usefulness_rate));
    bundle.insert(ENGAGEMENT_RATE, Metric::Rate(engagement_rate));
    bundle.insert(AREA_USEFULNESS_RATE, Metric::Rate(area_usefulness_rate));
    bundle.insert(
        EASE_COMMENT_TOTAL,
        Metric::Count(workbook.table(Sheet::EaseComments).len() as u64),
    );
    bundle.insert(
        USEFULNESS_COMMENT_TOTAL,
        Metric::Count(workbook.table(Sheet::UsefulnessComments).len() as u64),
    );

    info!(
        "Metrics for {} respondents: ease {}%, usefulness {}%, engagement {}%",
        respondents, ease_rate, usefulness_rate, engagement_rate
    );
    Ok(bundle)
}

/// The bundle as a JSON object. Distributions keep their order as lists of points.
pub fn bundle_to_json(bundle: &MetricsBundle) -> JSValue {
    let mut js: JSMap<String, JSValue> = JSMap::new();
    for (name, metric) in bundle.iter() {
        let value = match metric {
            Metric::Count(c) => json!(c),
            Metric::Rate(r) => json!(r),
            Metric::Distribution(d) => json!(label_values(d)),
        };
        js.insert(name.to_string(), value);
    }
    JSValue::Object(js)
}

/// The per-question series served by the JSON endpoints.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum ChartQuery {
    UsageTime,
    Frequency,
    Departments,
    Ease,
    Usefulness,
    Objectives,
}

impl ChartQuery {
    pub const ALL: [ChartQuery; 6] = [
        ChartQuery::UsageTime,
        ChartQuery::Frequency,
        ChartQuery::Departments,
        ChartQuery::Ease,
        ChartQuery::Usefulness,
        ChartQuery::Objectives,
    ];

    pub fn endpoint(self) -> &'static str {
        match self {
            ChartQuery::UsageTime => "/api/tempo-uso",
            ChartQuery::Frequency => "/api/frequencia",
            ChartQuery::Departments => "/api/departamentos",
            ChartQuery::Ease => "/api/facilidade",
            ChartQuery::Usefulness => "/api/utilidade",
            ChartQuery::Objectives => "/api/objetivos",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ChartQuery::UsageTime => "Tempo de Uso do Pipefy",
            ChartQuery::Frequency => "Frequência de Análises",
            ChartQuery::Departments => "Top 10 Departamentos",
            ChartQuery::Ease => "Facilidade de Uso",
            ChartQuery::Usefulness => "Utilidade Geral",
            ChartQuery::Objectives => "Objetivos da Área",
        }
    }

    /// The name of the metric holding the raw distribution.
    pub fn metric(self) -> &'static str {
        match self {
            ChartQuery::UsageTime => USAGE_TIME,
            ChartQuery::Frequency => FREQUENCY,
            ChartQuery::Departments => DEPARTMENTS,
            ChartQuery::Ease => EASE,
            ChartQuery::Usefulness => USEFULNESS,
            ChartQuery::Objectives => OBJECTIVES,
        }
    }

    pub fn order(self) -> Option<CategoryOrder> {
        match self {
            ChartQuery::UsageTime => Some(usage_time_order()),
            ChartQuery::Ease => Some(ease_order()),
            ChartQuery::Usefulness => Some(usefulness_order()),
            _ => None,
        }
    }

    /// The distribution in frequency order, straight from the workbook.
    pub fn distribution(self, workbook: &SurveyWorkbook) -> DashResult<Distribution> {
        match self {
            ChartQuery::UsageTime => distribution_of(workbook, Sheet::UsageTime, COL_USAGE_TIME),
            ChartQuery::Frequency => distribution_of(workbook, Sheet::Frequency, COL_FREQUENCY),
            ChartQuery::Departments => {
                top_n(workbook.table(Sheet::Department), COL_DEPARTMENT, TOP_RANKING)
                    .context(MetricsSnafu {})
            }
            ChartQuery::Ease => distribution_of(workbook, Sheet::EaseTime, COL_EASE),
            ChartQuery::Usefulness => distribution_of(workbook, Sheet::UsefulnessTime, COL_USEFULNESS),
            ChartQuery::Objectives => {
                distribution_of(workbook, Sheet::ObjectiveFrequency, COL_OBJECTIVE)
            }
        }
    }

    /// The distribution in display order.
    pub fn ordered(self, dist: &Distribution) -> Distribution {
        reorder(dist, self.order().as_ref())
    }

    /// The chart points served by the endpoint.
    pub fn series(self, workbook: &SurveyWorkbook) -> DashResult<Vec<LabelValue>> {
        let dist = self.distribution(workbook)?;
        let res = label_values(&self.ordered(&dist));
        debug!("ChartQuery::series: {:?}: {:?}", self, res);
        Ok(res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dash::fixtures::{empty_workbook, survey_workbook};

    #[test]
    fn survey_metrics() {
        let bundle = calculate_metrics(&survey_workbook()).unwrap();
        assert_eq!(bundle.len(), 14);
        assert_eq!(bundle.count(TOTAL_RESPONDENTS), Some(6));
        assert_eq!(bundle.rate(ENGAGEMENT_RATE), Some(50.0));
        assert_eq!(bundle.rate(EASE_RATE), Some(75.0));
        assert_eq!(bundle.rate(USEFULNESS_RATE), Some(66.7));
        assert_eq!(bundle.rate(AREA_USEFULNESS_RATE), Some(80.0));
        assert_eq!(bundle.count(EASE_COMMENT_TOTAL), Some(4));
        assert_eq!(bundle.count(USEFULNESS_COMMENT_TOTAL), Some(2));

        let freq = bundle.distribution(FREQUENCY).unwrap();
        let labels: Vec<&str> = freq.labels().collect();
        assert_eq!(
            labels,
            vec!["Diariamente", "Mensalmente", "Semanalmente", "Raramente"]
        );
        assert_eq!(bundle.distribution(DEPARTMENTS).unwrap().get("Vendas"), 3);
    }

    #[test]
    fn empty_survey_has_zero_rates() {
        let bundle = calculate_metrics(&empty_workbook()).unwrap();
        assert_eq!(bundle.count(TOTAL_RESPONDENTS), Some(0));
        for name in [EASE_RATE, USEFULNESS_RATE, ENGAGEMENT_RATE, AREA_USEFULNESS_RATE] {
            assert_eq!(bundle.rate(name), Some(0.0));
        }
        assert!(bundle.distribution(EASE).unwrap().is_empty());
    }

    #[test]
    fn json_keeps_distribution_order() {
        let bundle = calculate_metrics(&survey_workbook()).unwrap();
        let js = bundle_to_json(&bundle);
        assert_eq!(js[TOTAL_RESPONDENTS], 6);
        assert_eq!(js[USEFULNESS_RATE], 66.7);
        assert_eq!(
            js[USAGE_TIME],
            json!([
                {"label": "Mais de 1 ano", "value": 3},
                {"label": "Entre 1 e 6 meses", "value": 2},
                {"label": "Menos de 1 mês", "value": 1}
            ])
        );
    }

    #[test]
    fn series_use_canonical_orders() {
        let wb = survey_workbook();
        let usage = ChartQuery::UsageTime.series(&wb).unwrap();
        let labels: Vec<&str> = usage.iter().map(|lv| lv.label.as_str()).collect();
        assert_eq!(labels, vec!["Menos de 1 mês", "Entre 1 e 6 meses", "Mais de 1 ano"]);

        let ease = ChartQuery::Ease.series(&wb).unwrap();
        assert_eq!(
            ease,
            vec![
                LabelValue { label: "Muito fácil".to_string(), value: 1 },
                LabelValue { label: "Fácil".to_string(), value: 2 },
                LabelValue { label: "Neutro".to_string(), value: 1 },
            ]
        );

        // No canonical order: frequency order.
        let objectives = ChartQuery::Objectives.series(&wb).unwrap();
        assert_eq!(objectives[0].label, "Controle");
        assert_eq!(objectives.len(), 3);
    }

    #[test]
    fn series_match_the_bundle() {
        let wb = survey_workbook();
        let bundle = calculate_metrics(&wb).unwrap();
        for q in ChartQuery::ALL {
            let dist = q.distribution(&wb).unwrap();
            assert_eq!(Some(&dist), bundle.distribution(q.metric()));
            assert_eq!(q.series(&wb).unwrap().len(), dist.len());
            assert!(q.endpoint().starts_with("/api/"));
        }
    }
}
