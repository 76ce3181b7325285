use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizResult {
    pub name: String,
    pub enroll: String,
    pub score: u32,
    pub total: u32,
    /// Already rendered to two decimal places, e.g. "66.67".
    pub percentage: String,
    pub timestamp: String,
}

impl QuizResult {
    /// Numeric percentage for sorting and averaging.
    pub fn percentage_value(&self) -> f64 {
        self.percentage.parse().unwrap_or(0.0)
    }
}
