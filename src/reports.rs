// KPI aggregation over the week-filtered record set.
//
// Everything here is a pure function of its inputs: identical records and
// thresholds produce identical output, including ordering. Breakdown
// tables break count ties by key so reruns are byte-identical.
use std::collections::HashMap;

use crate::types::{BreakdownRow, ClaimRecord, ClaimStatus, MetricValue};
use crate::util::average_days;

/// SLA thresholds in whole days. A lag strictly greater than the
/// threshold is a breach; equal is compliant.
#[derive(Debug, Clone, Copy)]
pub struct SlaThresholds {
    pub assign_days: i64,
    pub complete_days: i64,
}

/// The summary metrics, in report order.
#[derive(Debug, Clone, PartialEq)]
pub struct KpiReport {
    pub metrics: Vec<(String, MetricValue)>,
}

impl KpiReport {
    /// Look up a metric by name; test convenience mostly.
    pub fn get(&self, name: &str) -> Option<MetricValue> {
        self.metrics.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }
}

/// Days from received to assigned; `None` if either date is null.
/// May legitimately be negative when assignment predates receipt.
pub fn assign_lag_days(rec: &ClaimRecord) -> Option<i64> {
    Some((rec.assigned_date? - rec.received_date?).num_days())
}

/// Days from received to completed; `None` if either date is null.
pub fn resolution_days(rec: &ClaimRecord) -> Option<i64> {
    Some((rec.completed_date? - rec.received_date?).num_days())
}

pub fn compute_kpis(data: &[ClaimRecord], sla: &SlaThresholds) -> KpiReport {
    let mut metrics: Vec<(String, MetricValue)> = Vec::new();

    let total = data.len();
    let assignments = data.iter().filter(|r| r.is_assignment).count();
    metrics.push(("Total Claims".into(), MetricValue::Count(total)));
    metrics.push(("Assignments".into(), MetricValue::Count(assignments)));
    metrics.push(("Non-Assignments".into(), MetricValue::Count(total - assignments)));

    // Per-status counts; rows with an empty or invalid status count toward
    // none of the four.
    for status in ClaimStatus::ALL {
        let count = data.iter().filter(|r| r.status == Some(status)).count();
        metrics.push((format!("Status: {}", status.as_str()), MetricValue::Count(count)));
    }

    let assign_lags: Vec<i64> = data.iter().filter_map(assign_lag_days).collect();
    let resolutions: Vec<i64> = data.iter().filter_map(resolution_days).collect();

    metrics.push((
        "Avg Assign Lag (days)".into(),
        average_days(&assign_lags).map_or(MetricValue::Undefined, MetricValue::Days),
    ));
    metrics.push((
        "Avg Resolution (days)".into(),
        average_days(&resolutions).map_or(MetricValue::Undefined, MetricValue::Days),
    ));

    let assign_breaches = assign_lags.iter().filter(|d| **d > sla.assign_days).count();
    let complete_breaches = resolutions.iter().filter(|d| **d > sla.complete_days).count();
    metrics.push((
        format!("SLA Breaches: Assign>{}d", sla.assign_days),
        MetricValue::Count(assign_breaches),
    ));
    metrics.push((
        format!("SLA Breaches: Complete>{}d", sla.complete_days),
        MetricValue::Count(complete_breaches),
    ));

    KpiReport { metrics }
}

/// Group records by a key field and count, sorted by count descending with
/// ties broken by key ascending. Empty keys form their own bucket.
pub fn breakdown<'a, F>(data: &'a [ClaimRecord], key: F) -> Vec<BreakdownRow>
where
    F: Fn(&'a ClaimRecord) -> &'a str,
{
    let mut counts: HashMap<&'a str, usize> = HashMap::new();
    for rec in data {
        *counts.entry(key(rec)).or_insert(0) += 1;
    }
    let mut rows: Vec<BreakdownRow> = counts
        .into_iter()
        .map(|(key, count)| BreakdownRow { key: key.to_string(), count })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
    rows
}
