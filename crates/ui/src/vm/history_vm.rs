use quiz_core::model::AttemptRecord;

use super::time_fmt::{format_elapsed, format_optional_date};

/// One row of an attempts table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttemptRowVm {
    pub topic: String,
    pub score_label: String,
    pub percentage_label: String,
    pub date_label: String,
    pub time_label: Option<String>,
}

#[must_use]
pub fn map_attempt_rows(records: &[AttemptRecord]) -> Vec<AttemptRowVm> {
    records
        .iter()
        .map(|record| AttemptRowVm {
            topic: record.topic.clone(),
            score_label: format!("{}/{}", record.score, record.total_questions),
            percentage_label: format!("{:.1}%", record.percentage()),
            date_label: format_optional_date(record.created_at),
            time_label: record.time_spent.map(format_elapsed),
        })
        .collect()
}
