mod commands;
mod context;
mod output;
mod theme;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::debug;
use std::path::PathBuf;

use commands::{
    check::{CHECK_EXAMPLES, handle_check},
    generate::{GENERATE_EXAMPLES, GenerateArgs, handle_generate},
};
use context::ProjectContext;
use output::{GlobalOptions, OutputFormat, OutputManager};

const ENVIRONMENT_HELP: &str = "\
Environment Variables:
  SETGEN_ROOT  Directory to scan when --root is not given
  RUST_LOG     Log filter, e.g. 'setgen_build=debug'

Use 'setgen <command> --help' to view examples for each command.";

#[derive(Parser)]
#[command(name = "setgen")]
#[command(version = "0.1.0")]
#[command(
    about = "Generate setter methods for annotated Go structs",
    long_about = r#"Setter generator for Go sources.

Structs whose type declaration is documented with a line starting with
//gen:setters get a SetCreatedAt / SetUpdatedAt method for each matching
field, written to <file>_setters.go next to the source."#
)]
#[command(after_long_help = ENVIRONMENT_HELP)]
#[command(subcommand_required = true, arg_required_else_help = true)]
struct Cli {
    /// Directory to scan (defaults to the current directory)
    #[arg(long, global = true, env = "SETGEN_ROOT")]
    root: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "table")]
    output: OutputFormat,

    /// Suppress output (only errors will be shown)
    #[arg(short = 'q', long, global = true)]
    quiet: bool,

    /// Log pipeline details to stderr
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write <file>_setters.go companions for annotated structs
    #[command(after_long_help = GENERATE_EXAMPLES)]
    Generate(GenerateArgs),

    /// Verify companion files match what generate would write
    #[command(after_long_help = CHECK_EXAMPLES)]
    Check,
}

/// `--verbose` lowers the default filter to `debug`; `RUST_LOG` still wins.
fn init_logging(options: &GlobalOptions) {
    let default_filter = if options.verbose {
        "debug"
    } else if options.quiet {
        "error"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = execute(cli) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn execute(cli: Cli) -> Result<()> {
    let global_options = GlobalOptions {
        output_format: cli.output,
        quiet: cli.quiet,
        verbose: cli.verbose,
        no_color: cli.no_color,
    };
    if global_options.no_color {
        colored::control::set_override(false);
    }
    init_logging(&global_options);

    let output = OutputManager::new(global_options);
    let ctx = ProjectContext::resolve(cli.root)?;
    match &ctx.config {
        Some(_) => debug!("using {}", ctx.config_path.display()),
        None => debug!("no {} found, using defaults", context::CONFIG_FILE),
    }
    debug!("scanning {:?} under {}", ctx.scan_paths(), ctx.root.display());

    match cli.command {
        Commands::Generate(args) => handle_generate(args, &ctx, &output),
        Commands::Check => handle_check(&ctx, &output),
    }
}
