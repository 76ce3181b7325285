//! Read-only aggregation over the result log, plus the CSV export.

use serde::Serialize;

use crate::model::quiz_result::QuizResult;

pub const CSV_HEADER: &str = "Name,Enrollment,Score,Total,Percentage,Timestamp";

#[derive(Debug, Serialize)]
pub struct ResultsSummary {
    pub count: usize,
    pub average_percentage: f64,
    /// Descending by percentage.
    pub results: Vec<QuizResult>,
}

pub fn summarize(results: &[QuizResult]) -> ResultsSummary {
    let average_percentage = if results.is_empty() {
        0.0
    } else {
        results.iter().map(QuizResult::percentage_value).sum::<f64>() / results.len() as f64
    };

    let mut results = results.to_vec();
    results.sort_by(|a, b| b.percentage_value().total_cmp(&a.percentage_value()));

    ResultsSummary {
        count: results.len(),
        average_percentage,
        results,
    }
}

/// Renders the result log as CSV. An empty log produces no file at all, so
/// this returns `None` rather than a bare header.
pub fn results_csv(results: &[QuizResult]) -> Option<String> {
    if results.is_empty() {
        return None;
    }
    let mut csv = format!("{CSV_HEADER}\n");
    for r in results {
        csv.push_str(&format!(
            "{},{},{},{},{}%,{}\n",
            r.name, r.enroll, r.score, r.total, r.percentage, r.timestamp
        ));
    }
    Some(csv)
}
