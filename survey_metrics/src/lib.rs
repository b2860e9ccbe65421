/*!
Tabulation of categorical survey answers.

The functions in this crate turn [`Table`]s of answers into [`Distribution`]s
(value counts), percentages and small samples of free-text answers. The
[`ordering`] module then arranges distributions for display.

```
use survey_metrics::*;

let answers = Table::single_column(
    "frequency",
    "Frequency",
    &[Some("Daily"), Some("Weekly"), Some("Daily"), None, Some("Rarely")],
);
let counts = count_distribution(&answers, "Frequency")?;
assert_eq!(counts.entries()[0], ("Daily".to_string(), 2));

let engagement = positive_rate(&counts, &["Daily", "Weekly"], counts.total());
assert_eq!(engagement, 75.0);
# Ok::<(), MetricsError>(())
```
*/

mod config;
pub mod ordering;

use log::debug;

use std::collections::HashMap;

pub use crate::config::*;

/// Counts the non-empty values of a column.
///
/// The most frequent labels come first. Labels with the same count keep the
/// order in which they first appear in the table.
pub fn count_distribution(table: &Table, column: &str) -> Result<Distribution, MetricsError> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut entries: Vec<(String, u64)> = Vec::new();
    for datum in table.column_values(column)?.flatten() {
        let label = datum.to_string();
        match positions.get(&label) {
            Some(idx) => entries[*idx].1 += 1,
            None => {
                positions.insert(label.clone(), entries.len());
                entries.push((label, 1));
            }
        }
    }
    // sort_by is stable: ties stay in first-encountered order.
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    debug!(
        "count_distribution: table {:?} column {:?}: {:?}",
        table.name, column, entries
    );
    Ok(Distribution::from_entries(entries))
}

/// The `n` most frequent values of a column.
pub fn top_n(table: &Table, column: &str, n: usize) -> Result<Distribution, MetricsError> {
    Ok(count_distribution(table, column)?.truncated(n))
}

/// The number of non-empty cells in a column.
pub fn count_non_null(table: &Table, column: &str) -> Result<u64, MetricsError> {
    Ok(table.column_values(column)?.flatten().count() as u64)
}

/// The first `n` non-empty values of a column, in source order.
pub fn sample_comments(table: &Table, column: &str, n: usize) -> Result<Vec<String>, MetricsError> {
    Ok(table
        .column_values(column)?
        .flatten()
        .take(n)
        .map(|d| d.to_string())
        .collect())
}

/// `part` as a percentage of `whole`, rounded to one decimal and kept within [0, 100].
///
/// An empty `whole` gives 0.
pub fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    let raw = (part as f64) / (whole as f64) * 100.0;
    round_one_decimal(raw.clamp(0.0, 100.0))
}

/// The share of answers that fall within the favourable labels, as a percentage.
///
/// Labels missing from the distribution count for zero. The result is 0 when
/// `total` is 0.
///
/// ```
/// use survey_metrics::{positive_rate, Distribution};
///
/// let freq = Distribution::from_entries(vec![
///     ("Daily".to_string(), 40),
///     ("Rarely".to_string(), 30),
///     ("Weekly".to_string(), 20),
///     ("Monthly".to_string(), 10),
/// ]);
/// assert_eq!(positive_rate(&freq, &["Daily", "Weekly"], 100), 60.0);
/// assert_eq!(positive_rate(&Distribution::default(), &["Daily"], 0), 0.0);
/// ```
pub fn positive_rate(counts: &Distribution, positive_labels: &[&str], total: u64) -> f64 {
    let positive: u64 = positive_labels.iter().map(|label| counts.get(label)).sum();
    percentage(positive, total)
}

fn round_one_decimal(x: f64) -> f64 {
    (x * 10.0).round_ties_even() / 10.0
}
