// Report rendering: the xlsx workbook, the optional JSON summary, and the
// console table previews. Mechanical glue only; every number written here
// was computed in `reports`.
use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Chart, ChartType, Format, Workbook, XlsxError};
use tabled::{settings::Style, Table, Tabled};

use crate::reports::KpiReport;
use crate::types::{BreakdownRow, ClaimRecord, MetricValue, ValidationIssue};
use crate::validate::REQUIRED_COLUMNS;
use crate::window::WeekWindow;

/// Write the full multi-sheet workbook and return its path.
///
/// Sheets: Summary (metrics plus the by-branch column chart), By Branch,
/// By Service, By PM, Raw Data, and Errors (only when issues exist). The
/// file name follows the `weekly_report_<end-date>.xlsx` convention.
pub fn write_workbook(
    outdir: &Path,
    window: &WeekWindow,
    kpis: &KpiReport,
    by_branch: &[BreakdownRow],
    by_service: &[BreakdownRow],
    by_pm: &[BreakdownRow],
    records: &[ClaimRecord],
    issues: &[ValidationIssue],
) -> Result<PathBuf, XlsxError> {
    let path = outdir.join(format!("weekly_report_{}.xlsx", window.end));
    let mut workbook = Workbook::new();

    let title = Format::new().set_bold();
    let header = Format::new().set_bold();

    let sheet = workbook.add_worksheet().set_name("Summary")?;
    sheet.write_with_format(0, 0, "Weekly Repair Claims — Summary", &title)?;
    sheet.write_with_format(1, 0, "Metric", &header)?;
    sheet.write_with_format(1, 1, "Value", &header)?;
    for (i, (name, value)) in kpis.metrics.iter().enumerate() {
        let row = (i + 2) as u32;
        sheet.write(row, 0, name.as_str())?;
        match value {
            MetricValue::Count(n) => sheet.write(row, 1, *n as u64)?,
            MetricValue::Days(d) => sheet.write(row, 1, *d)?,
            MetricValue::Undefined => sheet.write(row, 1, "n/a")?,
        };
    }
    sheet.set_column_width(0, 28.0)?;

    write_breakdown_sheet(&mut workbook, "By Branch", "Branch", by_branch, &header)?;
    write_breakdown_sheet(&mut workbook, "By Service", "Line of Service", by_service, &header)?;
    write_breakdown_sheet(&mut workbook, "By PM", "Assigned PM", by_pm, &header)?;
    write_raw_sheet(&mut workbook, records, &header)?;

    if !issues.is_empty() {
        let sheet = workbook.add_worksheet().set_name("Errors")?;
        sheet.write_with_format(0, 0, "Row", &header)?;
        sheet.write_with_format(0, 1, "Field", &header)?;
        sheet.write_with_format(0, 2, "Issue", &header)?;
        for (i, issue) in issues.iter().enumerate() {
            let row = (i + 1) as u32;
            sheet.write(row, 0, issue.row.as_str())?;
            sheet.write(row, 1, issue.field.as_str())?;
            sheet.write(row, 2, issue.issue.as_str())?;
        }
        sheet.set_column_width(2, 44.0)?;
    }

    // Column chart of claims per branch, embedded on the Summary sheet.
    // Nothing to chart when the week had no rows.
    if !by_branch.is_empty() {
        let last_row = by_branch.len() as u32;
        let mut chart = Chart::new(ChartType::Column);
        chart
            .add_series()
            .set_name("Claims by Branch")
            .set_categories(("By Branch", 1, 0, last_row, 0))
            .set_values(("By Branch", 1, 1, last_row, 1));
        chart.title().set_name("Claims by Branch");
        chart.x_axis().set_name("Branch");
        chart.y_axis().set_name("Count");
        let summary = workbook.worksheet_from_name("Summary")?;
        summary.insert_chart(1, 3, &chart)?;
    }

    workbook.save(&path)?;
    Ok(path)
}

fn write_breakdown_sheet(
    workbook: &mut Workbook,
    sheet_name: &str,
    key_header: &str,
    rows: &[BreakdownRow],
    header: &Format,
) -> Result<(), XlsxError> {
    let sheet = workbook.add_worksheet().set_name(sheet_name)?;
    sheet.write_with_format(0, 0, key_header, header)?;
    sheet.write_with_format(0, 1, "Count", header)?;
    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        sheet.write(r, 0, row.key.as_str())?;
        sheet.write(r, 1, row.count as u64)?;
    }
    sheet.set_column_width(0, 22.0)?;
    Ok(())
}

fn write_raw_sheet(
    workbook: &mut Workbook,
    records: &[ClaimRecord],
    header: &Format,
) -> Result<(), XlsxError> {
    let sheet = workbook.add_worksheet().set_name("Raw Data")?;
    for (col, name) in REQUIRED_COLUMNS.iter().enumerate() {
        sheet.write_with_format(0, col as u16, *name, header)?;
    }
    for (i, rec) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        sheet.write(row, 0, rec.claim_id.as_str())?;
        sheet.write(row, 1, rec.branch.as_str())?;
        sheet.write(row, 2, rec.line_of_service.as_str())?;
        sheet.write(row, 3, rec.is_assignment)?;
        sheet.write(row, 4, date_cell(rec.received_date).as_str())?;
        sheet.write(row, 5, rec.assigned_pm.as_str())?;
        sheet.write(row, 6, date_cell(rec.assigned_date).as_str())?;
        sheet.write(row, 7, rec.status_raw.as_str())?;
        sheet.write(row, 8, rec.dash_job_id.as_str())?;
        sheet.write(row, 9, date_cell(rec.completed_date).as_str())?;
    }
    Ok(())
}

fn date_cell(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_default()
}

/// Optional sidecar: the KPI metrics as a JSON array, preserving report
/// order. Undefined averages serialize as `null`.
pub fn write_json_summary(path: &Path, kpis: &KpiReport) -> std::io::Result<()> {
    let entries: Vec<serde_json::Value> = kpis
        .metrics
        .iter()
        .map(|(name, value)| serde_json::json!({ "metric": name, "value": value.to_json() }))
        .collect();
    let body = serde_json::to_string_pretty(&entries)?;
    std::fs::write(path, body)
}

/// Print the first `max_rows` rows of a table to the console as markdown.
pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}
