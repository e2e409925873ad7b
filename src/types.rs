use std::fmt;

use chrono::NaiveDate;
use serde::Deserialize;
use tabled::Tabled;

use crate::util::format_int;

/// One row of the input CSV, exactly as the `csv` crate hands it to us.
///
/// Every field is `Option<String>` so a column that is missing from the
/// file (or empty on a given row) deserializes to `None` instead of
/// failing the whole batch. Typing happens in `loader::normalize`.
#[derive(Debug, Deserialize)]
pub struct RawClaim {
    pub claim_id: Option<String>,
    pub branch: Option<String>,
    pub line_of_service: Option<String>,
    pub is_assignment: Option<String>,
    pub received_date: Option<String>,
    pub assigned_pm: Option<String>,
    pub assigned_date: Option<String>,
    pub status: Option<String>,
    pub dash_job_id: Option<String>,
    pub completed_date: Option<String>,
}

/// The fixed claim-status enumeration. Anything else in the status column
/// is a validation issue, not a parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimStatus {
    New,
    InProgress,
    Completed,
    OnHold,
}

impl ClaimStatus {
    pub const ALL: [ClaimStatus; 4] = [
        ClaimStatus::New,
        ClaimStatus::InProgress,
        ClaimStatus::Completed,
        ClaimStatus::OnHold,
    ];

    /// Exact-match parse of a trimmed status token.
    pub fn parse(s: &str) -> Option<ClaimStatus> {
        match s {
            "New" => Some(ClaimStatus::New),
            "In Progress" => Some(ClaimStatus::InProgress),
            "Completed" => Some(ClaimStatus::Completed),
            "On Hold" => Some(ClaimStatus::OnHold),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ClaimStatus::New => "New",
            ClaimStatus::InProgress => "In Progress",
            ClaimStatus::Completed => "Completed",
            ClaimStatus::OnHold => "On Hold",
        }
    }

    /// Active or closed claims must carry a DASH job id.
    pub fn requires_job_id(self) -> bool {
        !matches!(self, ClaimStatus::New)
    }
}

/// A normalized claim record with typed dates and a real boolean for the
/// assignment flag.
///
/// `status_raw` keeps the trimmed original token so the validator can
/// report invalid values verbatim; `status` is `None` both for an empty
/// column and for an unrecognized token. `row` is the 1-based data row in
/// the source CSV, used as the row identifier in validation issues.
#[derive(Debug, Clone)]
pub struct ClaimRecord {
    pub row: usize,
    pub claim_id: String,
    pub branch: String,
    pub line_of_service: String,
    pub is_assignment: bool,
    pub received_date: Option<NaiveDate>,
    pub assigned_pm: String,
    pub assigned_date: Option<NaiveDate>,
    pub status: Option<ClaimStatus>,
    pub status_raw: String,
    pub dash_job_id: String,
    pub completed_date: Option<NaiveDate>,
}

/// A single data-quality finding. Issues annotate the run; they never
/// abort it (the schema-level issue is the one exception, handled in main).
#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct ValidationIssue {
    #[tabled(rename = "Row")]
    pub row: String,
    #[tabled(rename = "Field")]
    pub field: String,
    #[tabled(rename = "Issue")]
    pub issue: String,
}

impl ValidationIssue {
    pub fn new(row: impl Into<String>, field: impl Into<String>, issue: impl Into<String>) -> Self {
        ValidationIssue { row: row.into(), field: field.into(), issue: issue.into() }
    }
}

/// Value of a single summary metric.
///
/// Averages over an empty set are `Undefined` rather than NaN or zero, so
/// the report can show an explicit marker instead of a misleading number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Count(usize),
    Days(f64),
    Undefined,
}

impl MetricValue {
    pub fn to_json(self) -> serde_json::Value {
        match self {
            MetricValue::Count(n) => serde_json::Value::from(n as u64),
            MetricValue::Days(d) => serde_json::Value::from(d),
            MetricValue::Undefined => serde_json::Value::Null,
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Count(n) => write!(f, "{}", format_int(*n as i64)),
            MetricValue::Days(d) => write!(f, "{:.2}", d),
            MetricValue::Undefined => write!(f, "n/a"),
        }
    }
}

/// One row of a group-by breakdown table (key, count).
#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct BreakdownRow {
    #[tabled(rename = "Group")]
    pub key: String,
    #[tabled(rename = "Count")]
    pub count: usize,
}

/// Rendered metric row for the console preview table.
#[derive(Debug, Clone, Tabled)]
pub struct SummaryRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_canonical_tokens_only() {
        assert_eq!(ClaimStatus::parse("New"), Some(ClaimStatus::New));
        assert_eq!(ClaimStatus::parse("In Progress"), Some(ClaimStatus::InProgress));
        assert_eq!(ClaimStatus::parse("completed"), None);
        assert_eq!(ClaimStatus::parse("Cancelled"), None);
        assert_eq!(ClaimStatus::parse(""), None);
    }

    #[test]
    fn job_id_required_for_active_and_closed() {
        assert!(!ClaimStatus::New.requires_job_id());
        assert!(ClaimStatus::InProgress.requires_job_id());
        assert!(ClaimStatus::Completed.requires_job_id());
        assert!(ClaimStatus::OnHold.requires_job_id());
    }

    #[test]
    fn metric_value_display() {
        assert_eq!(MetricValue::Count(1234).to_string(), "1,234");
        assert_eq!(MetricValue::Days(0.5).to_string(), "0.50");
        assert_eq!(MetricValue::Undefined.to_string(), "n/a");
    }
}
