// Entry point and high-level CLI flow.
//
// The pipeline is a straight line: load and normalize the CSV, check the
// schema, filter to the reporting week, validate, aggregate KPIs, then
// render the workbook. Data-quality problems become rows on the Errors
// sheet; only structural failures (unreadable input, missing columns,
// unwritable output) abort the run.
mod loader;
mod output;
mod reports;
mod types;
mod util;
mod validate;
mod window;

use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;

use reports::SlaThresholds;
use types::{ClaimRecord, SummaryRow};
use window::WeekWindow;

#[derive(Parser)]
#[command(name = "claims-report")]
#[command(about = "Weekly repair claims report generator", long_about = None)]
struct Cli {
    /// Path to the input CSV
    #[arg(long, default_value = "data/claims_sample.csv")]
    input: PathBuf,

    /// Directory to write reports into
    #[arg(long, default_value = "outputs")]
    outdir: PathBuf,

    /// ISO date (YYYY-MM-DD). If omitted, uses the last full Mon-Sun week
    #[arg(long)]
    week_start: Option<NaiveDate>,

    /// Days to assign (SLA)
    #[arg(long, default_value_t = 1)]
    sla_assign_days: i64,

    /// Days to complete (SLA)
    #[arg(long, default_value_t = 7)]
    sla_complete_days: i64,

    /// Also write the KPI summary as JSON next to the workbook
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    run(&Cli::parse())
}

/// The whole pipeline, separated from argument parsing so the abort
/// behavior (schema mismatch, unreadable input) can be exercised in tests.
fn run(cli: &Cli) -> anyhow::Result<()> {
    let window = match cli.week_start {
        Some(start) => WeekWindow::from_start(start),
        None => WeekWindow::current(),
    };

    let batch = loader::load_claims(&cli.input)
        .with_context(|| format!("failed to read input CSV {}", cli.input.display()))?;

    // A missing column means no row-level check or KPI can be trusted, so
    // the run stops here instead of producing a misleading report.
    let missing = validate::missing_columns(&batch.headers);
    if !missing.is_empty() {
        let issue = validate::schema_issue(&missing);
        eprintln!("{}", issue.issue);
        anyhow::bail!("input schema is incomplete; no report written");
    }

    let week_records: Vec<ClaimRecord> = batch
        .records
        .into_iter()
        .filter(|r| window.contains(r.received_date))
        .collect();

    println!(
        "Processing dataset... ({} rows loaded, {} in week {} to {})",
        util::format_int(batch.report.total_rows as i64),
        util::format_int(week_records.len() as i64),
        window.start,
        window.end
    );
    if batch.report.parse_errors > 0 {
        println!(
            "Note: {} rows skipped because the CSV reader could not decode them.",
            util::format_int(batch.report.parse_errors as i64)
        );
    }
    println!();

    let issues = validate::validate(&week_records);
    let sla = SlaThresholds {
        assign_days: cli.sla_assign_days,
        complete_days: cli.sla_complete_days,
    };
    let kpis = reports::compute_kpis(&week_records, &sla);
    let by_branch = reports::breakdown(&week_records, |r| r.branch.as_str());
    let by_service = reports::breakdown(&week_records, |r| r.line_of_service.as_str());
    let by_pm = reports::breakdown(&week_records, |r| r.assigned_pm.as_str());

    println!("Weekly Repair Claims Summary");
    let summary_rows: Vec<SummaryRow> = kpis
        .metrics
        .iter()
        .map(|(name, value)| SummaryRow { metric: name.clone(), value: value.to_string() })
        .collect();
    output::preview_table_rows(&summary_rows, summary_rows.len());

    println!("Claims by Branch");
    output::preview_table_rows(&by_branch, 5);

    std::fs::create_dir_all(&cli.outdir)
        .with_context(|| format!("failed to create output directory {}", cli.outdir.display()))?;
    let path = output::write_workbook(
        &cli.outdir,
        &window,
        &kpis,
        &by_branch,
        &by_service,
        &by_pm,
        &week_records,
        &issues,
    )
    .context("failed to write workbook")?;

    if cli.json {
        let json_path = cli.outdir.join(format!("weekly_report_{}.json", window.end));
        output::write_json_summary(&json_path, &kpis)
            .with_context(|| format!("failed to write {}", json_path.display()))?;
        println!("Summary JSON written to: {}", json_path.display());
    }

    println!("Report written to: {}", path.display());
    println!("Week range: {} → {}", window.start, window.end);
    if !issues.is_empty() {
        println!(
            "Validation issues: {} (see 'Errors' sheet)",
            util::format_int(issues.len() as i64)
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn cli_for(input: &std::path::Path, outdir: &std::path::Path) -> Cli {
        Cli {
            input: input.to_path_buf(),
            outdir: outdir.to_path_buf(),
            week_start: NaiveDate::from_ymd_opt(2025, 9, 15),
            sla_assign_days: 1,
            sla_complete_days: 7,
            json: false,
        }
    }

    fn workbook_count(outdir: &std::path::Path) -> usize {
        std::fs::read_dir(outdir)
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .filter(|e| {
                        e.file_name().to_string_lossy().starts_with("weekly_report_")
                    })
                    .count()
            })
            .unwrap_or(0)
    }

    #[test]
    fn schema_mismatch_aborts_without_writing_a_report() {
        let mut input = tempfile::NamedTempFile::new().unwrap();
        writeln!(input, "claim_id,branch").unwrap();
        writeln!(input, "C-1,North").unwrap();
        let outdir = tempfile::tempdir().unwrap();

        let result = run(&cli_for(input.path(), outdir.path()));
        assert!(result.is_err());
        assert_eq!(workbook_count(outdir.path()), 0);
    }

    #[test]
    fn full_schema_run_writes_the_workbook() {
        let mut input = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            input,
            "claim_id,branch,line_of_service,is_assignment,received_date,\
             assigned_pm,assigned_date,status,dash_job_id,completed_date"
        )
        .unwrap();
        writeln!(input, "C-1,North,Mitigation,Yes,2025-09-16,Alex,2025-09-16,New,,").unwrap();
        let outdir = tempfile::tempdir().unwrap();

        run(&cli_for(input.path(), outdir.path())).unwrap();
        assert_eq!(workbook_count(outdir.path()), 1);
        assert!(outdir.path().join("weekly_report_2025-09-21.xlsx").exists());
    }
}

