//! Display order of the categories of a question.

use std::collections::HashSet;

use crate::config::Distribution;
use crate::percentage;

/// A hand-specified display order for the labels of one question.
///
/// Orders are used to present answers such as durations or Likert levels in
/// their natural order rather than by frequency.
///
/// ```
/// use survey_metrics::Distribution;
/// use survey_metrics::ordering::CategoryOrder;
///
/// let order = CategoryOrder::new("ease", &["Very easy", "Easy", "Hard"]);
/// let counts = Distribution::from_entries(vec![("Hard".to_string(), 5), ("Very easy".to_string(), 2)]);
/// let ordered = order.apply(&counts);
/// assert_eq!(ordered.labels().collect::<Vec<_>>(), vec!["Very easy", "Hard"]);
/// ```
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CategoryOrder {
    pub name: String,
    pub labels: Vec<String>,
}

impl CategoryOrder {
    pub fn new(name: &str, labels: &[&str]) -> CategoryOrder {
        CategoryOrder {
            name: name.to_string(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
        }
    }

    pub fn position(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// Orders the observed labels canonically.
    ///
    /// Canonical labels that were not observed are skipped. Observed labels
    /// that the order does not know about are left out.
    pub fn apply(&self, dist: &Distribution) -> Distribution {
        self.arrange(dist, false)
    }

    /// Exactly the canonical labels, with a count of zero for the ones that
    /// were not observed.
    pub fn apply_zero_filled(&self, dist: &Distribution) -> Distribution {
        self.arrange(dist, true)
    }

    fn arrange(&self, dist: &Distribution, zero_fill: bool) -> Distribution {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut entries: Vec<(String, u64)> = Vec::new();
        for label in self.labels.iter() {
            if !seen.insert(label.as_str()) {
                continue;
            }
            if zero_fill || dist.contains(label) {
                entries.push((label.clone(), dist.get(label)));
            }
        }
        Distribution::from_entries(entries)
    }
}

/// Applies the order if there is one, otherwise keeps the distribution as is.
pub fn reorder(dist: &Distribution, order: Option<&CategoryOrder>) -> Distribution {
    match order {
        Some(o) => o.apply(dist),
        None => dist.clone(),
    }
}

/// One line of a detailed distribution table.
#[derive(PartialEq, Debug, Clone)]
pub struct DetailRow {
    pub category: String,
    pub count: u64,
    /// Share of all the rows of the table, rounded to one decimal.
    pub percent: f64,
}

/// Every observed label with its count and its share of `table_total`.
pub fn detail_rows(dist: &Distribution, table_total: u64) -> Vec<DetailRow> {
    dist.entries()
        .iter()
        .map(|(label, count)| DetailRow {
            category: label.clone(),
            count: *count,
            percent: percentage(*count, table_total),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ease_order() -> CategoryOrder {
        CategoryOrder::new(
            "facilidade",
            &["Muito fácil", "Fácil", "Neutro", "Difícil", "Muito difícil"],
        )
    }

    fn observed() -> Distribution {
        Distribution::from_entries(vec![
            ("Fácil".to_string(), 12),
            ("Neutro".to_string(), 7),
            ("Muito fácil".to_string(), 4),
        ])
    }

    #[test]
    fn apply_skips_unobserved_labels() {
        let ordered = ease_order().apply(&observed());
        assert_eq!(
            ordered.entries(),
            &[
                ("Muito fácil".to_string(), 4),
                ("Fácil".to_string(), 12),
                ("Neutro".to_string(), 7)
            ]
        );
    }

    #[test]
    fn apply_is_idempotent() {
        let once = ease_order().apply(&observed());
        let twice = ease_order().apply(&once);
        assert_eq!(once, twice);
        assert_eq!(once.total(), observed().total());
        assert_eq!(once.len(), observed().len());
    }

    #[test]
    fn stray_labels_are_not_charted() {
        let order = CategoryOrder::new("facilidade", &["Muito fácil", "Fácil"]);
        let dist = Distribution::from_entries(vec![
            ("Fácil".to_string(), 3),
            ("facil ".to_string(), 2),
        ]);
        assert_eq!(order.apply(&dist).entries(), &[("Fácil".to_string(), 3)]);
        assert_eq!(
            order.apply_zero_filled(&dist).entries(),
            &[("Muito fácil".to_string(), 0), ("Fácil".to_string(), 3)]
        );
        // The detailed table still lists every answer.
        let rows = detail_rows(&dist, 5);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].category, "facil ");
        assert_eq!(rows[1].percent, 40.0);
    }

    #[test]
    fn duplicated_canonical_labels_are_emitted_once() {
        let order = CategoryOrder::new("dup", &["Fácil", "Fácil", "Neutro"]);
        let ordered = order.apply(&observed());
        assert_eq!(ordered.len(), 3);
        assert_eq!(ordered.total(), observed().total());
    }

    #[test]
    fn zero_filled_lists_every_canonical_label() {
        let filled = ease_order().apply_zero_filled(&observed());
        assert_eq!(filled.len(), 5);
        assert_eq!(filled.get("Difícil"), 0);
        assert_eq!(filled.labels().next(), Some("Muito fácil"));
        assert_eq!(filled.total(), observed().total());
    }

    #[test]
    fn reorder_without_order_passes_through() {
        assert_eq!(reorder(&observed(), None), observed());
        assert_ne!(reorder(&observed(), Some(&ease_order())), observed());
    }

    #[test]
    fn detail_rows_use_table_total() {
        let rows = detail_rows(&observed(), 25);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].category, "Fácil");
        assert_eq!(rows[0].percent, 48.0);
        assert_eq!(rows[2].percent, 16.0);
        assert!(detail_rows(&observed(), 0).iter().all(|r| r.percent == 0.0));
    }
}
