use colored::Colorize;
use hub_service::BatchReport;

/// One summary line plus any per-member errors, teletype-friendly.
pub fn print_report(action: &str, catalogue: &str, report: &BatchReport, quiet: bool) {
    if !quiet {
        println!(
            "{} {} on '{}': {} processed, {} removed, {} failed",
            "done".green().bold(),
            action,
            catalogue,
            report.processed,
            report.removed,
            report.failed,
        );
    }
    for error in &report.errors {
        eprintln!("  {} {error}", "failed:".yellow().bold());
    }
}
