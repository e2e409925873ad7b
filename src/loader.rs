// CSV ingestion and record normalization.
//
// The loader is deliberately forgiving: malformed values degrade to null
// or empty fields on the typed record and get flagged by the validator,
// never here. Only a structurally unreadable file is an error.
use std::path::Path;

use csv::ReaderBuilder;

use crate::types::{ClaimRecord, ClaimStatus, RawClaim};
use crate::util::{clean_str, is_truthy_flag, parse_date_safe};

/// Diagnostics from one load, printed by the CLI.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub total_rows: usize,
    pub parse_errors: usize,
}

/// The full input batch: the header row (for the schema check) plus every
/// row the CSV reader could decode, normalized.
#[derive(Debug)]
pub struct ClaimBatch {
    pub headers: Vec<String>,
    pub records: Vec<ClaimRecord>,
    pub report: LoadReport,
}

pub fn load_claims(path: &Path) -> Result<ClaimBatch, csv::Error> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();

    let mut records: Vec<ClaimRecord> = Vec::new();
    let mut total_rows = 0usize;
    let mut parse_errors = 0usize;

    for result in rdr.deserialize::<RawClaim>() {
        total_rows += 1;
        let raw = match result {
            Ok(r) => r,
            Err(_) => {
                parse_errors += 1;
                continue;
            }
        };
        records.push(normalize(total_rows, raw));
    }

    let report = LoadReport { total_rows, parse_errors };
    Ok(ClaimBatch { headers, records, report })
}

/// Turn one raw CSV row into a typed record.
///
/// Never fails: dates that do not parse become `None`, string fields are
/// trimmed with missing input as `""`, and the assignment flag is
/// normalized to a real boolean exactly once here.
pub fn normalize(row: usize, raw: RawClaim) -> ClaimRecord {
    let status_raw = clean_str(raw.status.as_deref());
    ClaimRecord {
        row,
        claim_id: clean_str(raw.claim_id.as_deref()),
        branch: clean_str(raw.branch.as_deref()),
        line_of_service: clean_str(raw.line_of_service.as_deref()),
        is_assignment: is_truthy_flag(&clean_str(raw.is_assignment.as_deref())),
        received_date: parse_date_safe(raw.received_date.as_deref()),
        assigned_pm: clean_str(raw.assigned_pm.as_deref()),
        assigned_date: parse_date_safe(raw.assigned_date.as_deref()),
        status: ClaimStatus::parse(&status_raw),
        status_raw,
        dash_job_id: clean_str(raw.dash_job_id.as_deref()),
        completed_date: parse_date_safe(raw.completed_date.as_deref()),
    }
}
