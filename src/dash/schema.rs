//! The layout of the survey workbook: sheet names, column names, canonical
//! orders and favourable answers.
//!
//! The loader checks every sheet and required column once, so the rest of the
//! program can rely on them being present.

use survey_metrics::ordering::CategoryOrder;

pub const COL_USAGE_TIME: &str = "Tempo de Pipefy";
pub const COL_FREQUENCY: &str = "Frequência de análises";
pub const COL_DEPARTMENT: &str = "Departamento";
pub const COL_AREA_USEFULNESS: &str = "Utilidade da área";
pub const COL_OBJECTIVE: &str = "Objetivo da área";
pub const COL_EASE: &str = "Facilidade de uso";
pub const COL_USEFULNESS: &str = "Utilidade";
pub const COL_ANSWER: &str = "Answer";

pub const USAGE_TIME_ORDER: [&str; 4] = [
    "Menos de 1 mês",
    "Entre 1 e 6 meses",
    "Entre 6 meses e 1 ano",
    "Mais de 1 ano",
];
pub const EASE_ORDER: [&str; 5] = ["Muito fácil", "Fácil", "Neutro", "Difícil", "Muito difícil"];
pub const USEFULNESS_ORDER: [&str; 5] = ["Muito útil", "Útil", "Neutro", "Pouco útil", "Nada útil"];

pub const EASE_POSITIVE: [&str; 2] = ["Muito fácil", "Fácil"];
pub const USEFULNESS_POSITIVE: [&str; 2] = ["Muito útil", "Útil"];
pub const ENGAGED_FREQUENCIES: [&str; 2] = ["Diariamente", "Semanalmente"];

/// Number of entries in the department and objective rankings.
pub const TOP_RANKING: usize = 10;

/// The eight sheets of the survey workbook, one per question.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum Sheet {
    UsageTime,
    Frequency,
    Department,
    ObjectiveFrequency,
    EaseTime,
    UsefulnessTime,
    EaseComments,
    UsefulnessComments,
}

impl Sheet {
    pub const ALL: [Sheet; 8] = [
        Sheet::UsageTime,
        Sheet::Frequency,
        Sheet::Department,
        Sheet::ObjectiveFrequency,
        Sheet::EaseTime,
        Sheet::UsefulnessTime,
        Sheet::EaseComments,
        Sheet::UsefulnessComments,
    ];

    /// The name of the sheet in the workbook.
    pub fn sheet_name(self) -> &'static str {
        match self {
            Sheet::UsageTime => "tempo de uso de Pipefy",
            Sheet::Frequency => "frequência",
            Sheet::Department => "departamento",
            Sheet::ObjectiveFrequency => "objetivo da área x frequência",
            Sheet::EaseTime => "facilidade x tempo",
            Sheet::UsefulnessTime => "utilidade + tempo",
            Sheet::EaseComments => "comentários facilidade",
            Sheet::UsefulnessComments => "comentários utilidade",
        }
    }

    /// Short identifier, used as table name and export file name.
    pub fn key(self) -> &'static str {
        match self {
            Sheet::UsageTime => "tempo_uso",
            Sheet::Frequency => "frequencia",
            Sheet::Department => "departamento",
            Sheet::ObjectiveFrequency => "objetivo_freq",
            Sheet::EaseTime => "facilidade_tempo",
            Sheet::UsefulnessTime => "utilidade_tempo",
            Sheet::EaseComments => "comentarios_facilidade",
            Sheet::UsefulnessComments => "comentarios_utilidade",
        }
    }

    pub fn required_columns(self) -> &'static [&'static str] {
        match self {
            Sheet::UsageTime => &[COL_USAGE_TIME],
            Sheet::Frequency => &[COL_FREQUENCY],
            Sheet::Department => &[COL_DEPARTMENT, COL_AREA_USEFULNESS],
            Sheet::ObjectiveFrequency => &[COL_OBJECTIVE],
            Sheet::EaseTime => &[COL_EASE],
            Sheet::UsefulnessTime => &[COL_USEFULNESS],
            Sheet::EaseComments => &[COL_ANSWER],
            Sheet::UsefulnessComments => &[COL_ANSWER],
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

pub fn usage_time_order() -> CategoryOrder {
    CategoryOrder::new(Sheet::UsageTime.key(), &USAGE_TIME_ORDER)
}

pub fn ease_order() -> CategoryOrder {
    CategoryOrder::new(Sheet::EaseTime.key(), &EASE_ORDER)
}

pub fn usefulness_order() -> CategoryOrder {
    CategoryOrder::new(Sheet::UsefulnessTime.key(), &USEFULNESS_ORDER)
}
