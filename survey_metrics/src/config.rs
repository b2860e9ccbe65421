// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// A non-empty cell of a response table, with the type inferred from the source.
#[derive(PartialEq, Debug, Clone)]
pub enum Datum {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl Display for Datum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Datum::Text(s) => write!(f, "{}", s),
            Datum::Integer(i) => write!(f, "{}", i),
            // Spreadsheets store every number as a float.
            Datum::Float(x) if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e15 => {
                write!(f, "{}", *x as i64)
            }
            Datum::Float(x) => write!(f, "{}", x),
            Datum::Boolean(b) => write!(f, "{}", b),
        }
    }
}

/// The answers to one survey question: one row per respondent.
///
/// Rows always have exactly one cell per column, `None` standing for an
/// empty answer.
#[derive(PartialEq, Debug, Clone)]
pub struct Table {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<Datum>>>,
}

impl Table {
    pub fn new(name: &str, columns: &[String]) -> Table {
        Table {
            name: name.to_string(),
            columns: columns.to_vec(),
            rows: Vec::new(),
        }
    }

    /// Builds a table with a single text column.
    ///
    /// ```
    /// use survey_metrics::Table;
    ///
    /// let table = Table::single_column("frequency", "Frequency", &[Some("Daily"), None]);
    /// assert_eq!(table.len(), 2);
    /// ```
    pub fn single_column(name: &str, column: &str, values: &[Option<&str>]) -> Table {
        let mut table = Table::new(name, &[column.to_string()]);
        for v in values {
            table.push_row(vec![v.map(|s| Datum::Text(s.to_string()))]);
        }
        table
    }

    /// Adds a row, padding missing cells with `None` and dropping the extra ones.
    pub fn push_row(&mut self, mut row: Vec<Option<Datum>>) {
        row.resize(self.columns.len(), None);
        self.rows.push(row);
    }

    /// The number of respondents, including the ones who left every cell empty.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Result<usize, MetricsError> {
        self.columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| MetricsError::UnknownColumn {
                table: self.name.clone(),
                column: column.to_string(),
            })
    }

    /// The cells of one column, in source order.
    pub fn column_values<'a>(
        &'a self,
        column: &str,
    ) -> Result<impl Iterator<Item = Option<&'a Datum>> + 'a, MetricsError> {
        let idx = self.column_index(column)?;
        Ok(self.rows.iter().map(move |row| row.get(idx).and_then(|c| c.as_ref())))
    }
}

// ******** Output data structures *********

/// Category labels with their number of occurrences, in a meaningful order.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Distribution {
    entries: Vec<(String, u64)>,
}

impl Distribution {
    /// Keeps the entries in the order given.
    pub fn from_entries(entries: Vec<(String, u64)>) -> Distribution {
        Distribution { entries }
    }

    pub fn entries(&self) -> &[(String, u64)] {
        &self.entries
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(label, _)| label.as_str())
    }

    /// The count for a label. Unobserved labels count for zero.
    pub fn get(&self, label: &str) -> u64 {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.entries.iter().any(|(l, _)| l == label)
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keeps the first `n` entries.
    pub fn truncated(mut self, n: usize) -> Distribution {
        self.entries.truncate(n);
        self
    }
}

/// A single named metric.
#[derive(PartialEq, Debug, Clone)]
pub enum Metric {
    Count(u64),
    /// A percentage, rounded to one decimal.
    Rate(f64),
    Distribution(Distribution),
}

/// Named metrics, in insertion order.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct MetricsBundle {
    metrics: Vec<(String, Metric)>,
}

impl MetricsBundle {
    pub fn new() -> MetricsBundle {
        MetricsBundle::default()
    }

    /// Inserts a metric. A metric with the same name is replaced in place.
    pub fn insert(&mut self, name: &str, metric: Metric) {
        match self.metrics.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = metric,
            None => self.metrics.push((name.to_string(), metric)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Metric> {
        self.metrics
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, metric)| metric)
    }

    pub fn count(&self, name: &str) -> Option<u64> {
        match self.get(name) {
            Some(Metric::Count(c)) => Some(*c),
            _ => None,
        }
    }

    pub fn rate(&self, name: &str) -> Option<f64> {
        match self.get(name) {
            Some(Metric::Rate(r)) => Some(*r),
            _ => None,
        }
    }

    pub fn distribution(&self, name: &str) -> Option<&Distribution> {
        match self.get(name) {
            Some(Metric::Distribution(d)) => Some(d),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Metric)> {
        self.metrics.iter().map(|(n, m)| (n.as_str(), m))
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

/// Errors that prevent a metric from being computed.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum MetricsError {
    UnknownColumn { table: String, column: String },
}

impl Error for MetricsError {}

impl Display for MetricsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricsError::UnknownColumn { table, column } => {
                write!(f, "table {:?} has no column {:?}", table, column)
            }
        }
    }
}
