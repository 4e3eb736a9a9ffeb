use anyhow::{Context, Result};
use setgen_build::{FileStatus, GenerateMode};

use crate::context::ProjectContext;
use crate::output::OutputManager;

pub const CHECK_EXAMPLES: &str = "\
Examples:
  setgen check                    # Fail if any companion file is stale
  setgen --output compact check   # One-line summary";

pub fn handle_check(ctx: &ProjectContext, output: &OutputManager) -> Result<()> {
    output.progress("Checking setters");
    let report = ctx
        .generator(GenerateMode::Check)
        .run()
        .with_context(|| format!("Failed to check setters under {}", ctx.root.display()))?;
    output.clear_line();

    output.display(&report)?;

    for file in &report.files {
        if let FileStatus::Failed { message, .. } = &file.status {
            output.warning(message);
        }
    }

    let stale = report.stale();
    if stale > 0 {
        output.error(&format!("{stale} companion files are stale; run 'setgen generate'"));
        anyhow::bail!("{stale} companion files are stale");
    }

    output.success(&format!("{} companion files up to date", report.up_to_date()));
    Ok(())
}
