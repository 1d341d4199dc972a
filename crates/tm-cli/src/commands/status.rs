//! Status command implementation

use anyhow::{Context, Result};
use tm_migrate::with_connection;

use crate::cli::{GlobalArgs, StatusArgs};
use crate::context::RuntimeContext;

/// Execute the status command
pub fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;

    let status = with_connection(ctx.db.as_ref(), |db| ctx.migrator(db).status())
        .context("Failed to read migration status")?;

    if !args.pending_only {
        println!("Applied ({}):", status.applied.len());
        for record in &status.applied {
            println!("  {}  {}", record.applied_at.format("%Y-%m-%d %H:%M:%S"), record.name);
        }
    }

    println!("Pending ({}):", status.pending.len());
    for name in &status.pending {
        println!("  {name}");
    }

    if !args.pending_only && !status.missing.is_empty() {
        println!("Missing from {} ({}):", ctx.scripts_dir.display(), status.missing.len());
        for name in &status.missing {
            println!("  {name}");
        }
    }

    Ok(())
}
