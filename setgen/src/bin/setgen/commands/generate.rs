use anyhow::{Context, Result};
use clap::Args;
use setgen_build::{FileStatus, GenerateMode};

use crate::context::ProjectContext;
use crate::output::OutputManager;

pub const GENERATE_EXAMPLES: &str = "\
Examples:
  setgen generate                     # Scan the current directory
  setgen --root ./internal generate   # Scan another directory
  setgen --output json generate       # Machine-readable report
  setgen generate --fail-on-error     # Exit non-zero if any file failed";

#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    /// Exit with a non-zero status when any source file failed
    #[arg(long)]
    pub fail_on_error: bool,
}

pub fn handle_generate(args: GenerateArgs, ctx: &ProjectContext, output: &OutputManager) -> Result<()> {
    output.progress("Generating setters");
    let report = ctx
        .generator(GenerateMode::Write)
        .run()
        .with_context(|| format!("Failed to generate setters under {}", ctx.root.display()))?;
    output.clear_line();

    output.display(&report)?;

    let failed = report.failed();
    if report.generated() == 0 && failed == 0 {
        output.info("No //gen:setters structs with target fields found");
    } else {
        output.success(&format!(
            "Generated {} files with {} setters",
            report.generated(),
            report.setters()
        ));
    }

    if failed > 0 {
        output.warning(&format!("{failed} files could not be processed:"));
        for file in &report.files {
            if let FileStatus::Failed { message, .. } = &file.status {
                output.bullet(message);
            }
        }
        if args.fail_on_error {
            anyhow::bail!("{failed} files failed");
        }
    }

    Ok(())
}
