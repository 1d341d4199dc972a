//! Migrate command implementation

use anyhow::{Context, Result};
use tm_migrate::with_connection;

use crate::cli::GlobalArgs;
use crate::context::RuntimeContext;

/// Execute the migrate command
pub fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;

    let report = with_connection(ctx.db.as_ref(), |db| ctx.migrator(db).run())
        .context("Migration failed")?;

    if report.applied.is_empty() {
        println!(
            "Nothing to apply ({} script(s) already applied)",
            report.skipped
        );
    } else {
        for name in &report.applied {
            println!("  Applied: {name}");
        }
        println!(
            "Applied {} script(s), {} already applied",
            report.applied.len(),
            report.skipped
        );
    }

    if !report.missing.is_empty() {
        eprintln!(
            "Warning: {} recorded migration(s) not found in {}: {}",
            report.missing.len(),
            ctx.scripts_dir.display(),
            report.missing.join(", ")
        );
    }

    Ok(())
}
