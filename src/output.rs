//! Plan and summary output.

use colored::Colorize;

use crate::directory::ServiceDirectory;
use crate::upgrade::controller::UpgradeJob;
use crate::upgrade::outcome::{RunSummary, UpgradeOutcome};

/// Print the dry-run plan. Nothing is invoked.
pub fn print_plan(jobs: &[UpgradeJob], directory: &ServiceDirectory) {
    println!();
    for job in jobs {
        match directory.resolve(&job.service_name) {
            Ok(id) => println!(
                "{} Would upgrade {} ({}) to {}",
                "[DRY RUN]".yellow(),
                job.service_name.bold(),
                id,
                job.image
            ),
            Err(_) => println!(
                "{} Would skip {}: unknown service",
                "[DRY RUN]".yellow(),
                job.service_name.bold()
            ),
        }
    }
    println!();
    println!("Dry run complete. No actions were invoked.");
}

/// Print the per-service results and totals.
pub fn print_summary(summary: &RunSummary) {
    println!();
    println!("{}", "Upgrade Results".bold());
    println!("{}", "=".repeat(50));

    for result in summary.results() {
        match &result.outcome {
            UpgradeOutcome::Succeeded => {
                println!("  {} {}", "✓".green(), result.service);
            }
            UpgradeOutcome::Skipped { reason } => {
                println!("  {} {} - {}", "⚠".yellow(), result.service, reason);
            }
            UpgradeOutcome::Failed { error } => {
                println!("  {} {} - {}", "✗".red(), result.service, error);
            }
        }
    }

    println!();
    println!(
        "Total: {} | {} | {} | {}",
        summary.total(),
        format!("{} succeeded", summary.succeeded()).green(),
        format!("{} skipped", summary.skipped()).yellow(),
        format!("{} failed", summary.failed()).red()
    );
}
