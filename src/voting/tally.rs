use crate::i18n::Language;
use crate::models::VoteRow;
use serde::Serialize;
use std::collections::HashMap;

/// Votes counted for one option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregatedResult {
    pub option_id: String,
    pub text_pt: String,
    pub text_es: String,
    pub text_en: String,
    pub count: usize,
}

impl AggregatedResult {
    pub fn label(&self, language: Language) -> &str {
        match language {
            Language::Pt => &self.text_pt,
            Language::Es => &self.text_es,
            Language::En => &self.text_en,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    /// Options with at least one vote, most votes first.
    pub results: Vec<AggregatedResult>,
    /// Number of vote rows fetched.
    pub total: usize,
}

impl Tally {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn max_count(&self) -> usize {
        self.results.iter().map(|r| r.count).max().unwrap_or(0)
    }

    pub fn percentage_of(&self, result: &AggregatedResult) -> f64 {
        percentage(result.count, self.total)
    }
}

/// Groups joined vote rows by option. Labels come from the first row seen
/// for each option; equal counts keep first-seen order.
pub fn tally(rows: &[VoteRow]) -> Tally {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut results: Vec<AggregatedResult> = Vec::new();

    for row in rows {
        match index.get(row.vote_option_id.as_str()) {
            Some(&i) => results[i].count += 1,
            None => {
                index.insert(&row.vote_option_id, results.len());
                results.push(AggregatedResult {
                    option_id: row.vote_option_id.clone(),
                    text_pt: row.text_pt.clone(),
                    text_es: row.text_es.clone(),
                    text_en: row.text_en.clone(),
                    count: 1,
                });
            }
        }
    }

    // stable: ties stay in first-seen order
    results.sort_by(|a, b| b.count.cmp(&a.count));

    Tally {
        results,
        total: rows.len(),
    }
}

/// Share of `total` as a percentage rounded to one decimal. A zero total
/// counts as one so the result is 0.0 rather than NaN.
pub fn percentage(count: usize, total: usize) -> f64 {
    let denominator = if total == 0 { 1 } else { total };
    (count as f64 / denominator as f64 * 1000.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn row(id: &str) -> VoteRow {
        VoteRow {
            vote_option_id: id.to_string(),
            text_pt: format!("{} pt", id),
            text_es: format!("{} es", id),
            text_en: format!("{} en", id),
        }
    }

    #[test]
    fn counts_and_sorts_descending() {
        let rows = vec![row("A"), row("A"), row("B"), row("A")];
        let tally = tally(&rows);

        assert_eq!(tally.total, 4);
        assert_eq!(tally.results.len(), 2);
        assert_eq!(tally.results[0].option_id, "A");
        assert_eq!(tally.results[0].count, 3);
        assert_eq!(tally.percentage_of(&tally.results[0]), 75.0);
        assert_eq!(tally.results[1].option_id, "B");
        assert_eq!(tally.results[1].count, 1);
        assert_eq!(tally.percentage_of(&tally.results[1]), 25.0);
    }

    #[test]
    fn empty_input_gives_empty_tally() {
        let tally = tally(&[]);
        assert!(tally.is_empty());
        assert_eq!(tally.total, 0);
        assert_eq!(tally.max_count(), 0);
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let rows = vec![row("C"), row("B"), row("A"), row("B"), row("C"), row("A")];
        let ids: Vec<String> = tally(&rows).results.into_iter().map(|r| r.option_id).collect();
        assert_eq!(ids, vec!["C", "B", "A"]);
    }

    #[test]
    fn counts_sum_to_total_and_are_sorted() {
        let pattern = ["A", "B", "C", "D"];
        let rows: Vec<VoteRow> = (0..97usize)
            .map(|i| row(pattern[(i * i + 3 * i) % pattern.len()]))
            .collect();
        let tally = tally(&rows);

        let sum: usize = tally.results.iter().map(|r| r.count).sum();
        assert_eq!(sum, tally.total);
        assert!(tally.results.windows(2).all(|w| w[0].count >= w[1].count));
        assert!(tally.results.iter().all(|r| r.count >= 1));
    }

    #[test]
    fn labels_come_from_first_row() {
        let mut renamed = row("A");
        renamed.text_pt = "renamed".to_string();
        let tally = tally(&[row("A"), renamed]);
        assert_eq!(tally.results[0].label(Language::Pt), "A pt");
        assert_eq!(tally.results[0].label(Language::En), "A en");
    }

    #[rstest]
    #[case(3, 4, 75.0)]
    #[case(1, 3, 33.3)]
    #[case(2, 3, 66.7)]
    #[case(1, 8, 12.5)]
    #[case(0, 5, 0.0)]
    #[case(0, 0, 0.0)]
    #[case(7, 7, 100.0)]
    fn percentages(#[case] count: usize, #[case] total: usize, #[case] expected: f64) {
        assert_eq!(percentage(count, total), expected);
    }
}
