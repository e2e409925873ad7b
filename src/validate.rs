// Business-rule validation.
//
// Two tiers: a schema-level check over the header row (fatal to the run,
// enforced by main), then per-row checks that only ever annotate. Row
// checks are independent; a single row can raise up to three issues.
use once_cell::sync::Lazy;

use crate::types::{ClaimRecord, ValidationIssue};

/// The full column set every input file must carry. Optional *values* are
/// fine; absent *columns* are not.
pub static REQUIRED_COLUMNS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "claim_id",
        "branch",
        "line_of_service",
        "is_assignment",
        "received_date",
        "assigned_pm",
        "assigned_date",
        "status",
        "dash_job_id",
        "completed_date",
    ]
});

/// Required columns absent from the input header, in schema order.
pub fn missing_columns(headers: &[String]) -> Vec<&'static str> {
    REQUIRED_COLUMNS
        .iter()
        .filter(|c| !headers.iter().any(|h| h == *c))
        .copied()
        .collect()
}

/// The single schema-level issue emitted when columns are missing. Row
/// checks are skipped in that case since no row data is usable.
pub fn schema_issue(missing: &[&str]) -> ValidationIssue {
    ValidationIssue::new("-", "schema", format!("Missing required columns: {:?}", missing))
}

/// Run the row-level checks over the week-filtered record set.
///
/// Issue order follows row order, then check order within a row:
/// status token, DASH job id, assigned PM, assigned date.
pub fn validate(records: &[ClaimRecord]) -> Vec<ValidationIssue> {
    let mut issues: Vec<ValidationIssue> = Vec::new();

    for rec in records {
        let row = rec.row.to_string();

        if !rec.status_raw.is_empty() && rec.status.is_none() {
            issues.push(ValidationIssue::new(
                row.clone(),
                "status",
                format!("Invalid status '{}'", rec.status_raw),
            ));
        }

        if rec.status.is_some_and(|s| s.requires_job_id()) && rec.dash_job_id.is_empty() {
            issues.push(ValidationIssue::new(
                row.clone(),
                "dash_job_id",
                "Missing DASH job id for active/closed claim",
            ));
        }

        if rec.is_assignment {
            if rec.assigned_pm.is_empty() {
                issues.push(ValidationIssue::new(
                    row.clone(),
                    "assigned_pm",
                    "Missing assigned PM on assignment",
                ));
            }
            if rec.assigned_date.is_none() {
                issues.push(ValidationIssue::new(
                    row.clone(),
                    "assigned_date",
                    "Missing assigned_date on assignment",
                ));
            }
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ClaimStatus;
    use chrono::NaiveDate;

    fn claim(row: usize) -> ClaimRecord {
        ClaimRecord {
            row,
            claim_id: format!("C-{}", row),
            branch: "X".into(),
            line_of_service: "Mitigation".into(),
            is_assignment: false,
            received_date: NaiveDate::from_ymd_opt(2025, 9, 22),
            assigned_pm: String::new(),
            assigned_date: None,
            status: Some(ClaimStatus::New),
            status_raw: "New".into(),
            dash_job_id: String::new(),
            completed_date: None,
        }
    }

    #[test]
    fn missing_columns_reported_in_schema_order() {
        let headers: Vec<String> =
            ["claim_id", "branch", "status"].iter().map(|s| s.to_string()).collect();
        let missing = missing_columns(&headers);
        assert_eq!(missing.first(), Some(&"line_of_service"));
        assert_eq!(missing.len(), 7);
        let issue = schema_issue(&missing);
        assert_eq!(issue.row, "-");
        assert_eq!(issue.field, "schema");
        assert!(issue.issue.contains("line_of_service"));
    }

    #[test]
    fn full_schema_has_no_missing_columns() {
        let headers: Vec<String> = REQUIRED_COLUMNS.iter().map(|s| s.to_string()).collect();
        assert!(missing_columns(&headers).is_empty());
    }

    #[test]
    fn invalid_status_is_flagged() {
        let mut rec = claim(1);
        rec.status = None;
        rec.status_raw = "Cancelled".into();
        let issues = validate(&[rec]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "status");
        assert!(issues[0].issue.contains("Cancelled"));
    }

    #[test]
    fn empty_status_is_not_flagged() {
        let mut rec = claim(1);
        rec.status = None;
        rec.status_raw = String::new();
        assert!(validate(&[rec]).is_empty());
    }

    #[test]
    fn active_claim_without_job_id_is_flagged() {
        let mut rec = claim(1);
        rec.status = Some(ClaimStatus::InProgress);
        rec.status_raw = "In Progress".into();
        let issues = validate(&[rec]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "dash_job_id");
    }

    #[test]
    fn new_claim_without_job_id_is_fine() {
        // Only active/closed statuses require a DASH job id.
        assert!(validate(&[claim(1)]).is_empty());
    }

    #[test]
    fn assignment_missing_pm_and_date_raises_both_in_order() {
        let mut rec = claim(7);
        rec.is_assignment = true;
        let issues = validate(&[rec]);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].field, "assigned_pm");
        assert_eq!(issues[1].field, "assigned_date");
        assert_eq!(issues[0].row, "7");
    }

    #[test]
    fn non_assignment_never_raises_assignment_issues() {
        let mut rec = claim(1);
        rec.is_assignment = false;
        rec.assigned_pm = String::new();
        rec.assigned_date = None;
        assert!(validate(&[rec]).is_empty());
    }

    #[test]
    fn three_row_scenario_produces_zero_issues() {
        // Rows: (X, Completed, assigned to Alex), (X, New, non-assignment),
        // (Y, In Progress, assigned to Jamie). Every rule is satisfied.
        let mut a = claim(1);
        a.status = Some(ClaimStatus::Completed);
        a.status_raw = "Completed".into();
        a.is_assignment = true;
        a.assigned_pm = "Alex".into();
        a.assigned_date = NaiveDate::from_ymd_opt(2025, 9, 22);
        a.dash_job_id = "D-1".into();

        let b = claim(2);

        let mut c = claim(3);
        c.branch = "Y".into();
        c.status = Some(ClaimStatus::InProgress);
        c.status_raw = "In Progress".into();
        c.is_assignment = true;
        c.assigned_pm = "Jamie".into();
        c.assigned_date = NaiveDate::from_ymd_opt(2025, 9, 23);
        c.dash_job_id = "D-2".into();

        assert!(validate(&[a, b, c]).is_empty());
    }

    #[test]
    fn issues_follow_row_order() {
        let mut first = claim(1);
        first.status = None;
        first.status_raw = "Weird".into();
        let mut second = claim(2);
        second.is_assignment = true;
        let issues = validate(&[first, second]);
        assert_eq!(issues.len(), 3);
        assert_eq!(issues[0].row, "1");
        assert_eq!(issues[1].row, "2");
        assert_eq!(issues[2].row, "2");
    }
}
