use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use bideck::app::{self, BuildOptions, CheckOptions};
use bideck::output::SUFFIX_LEN;

const SUBCOMMANDS: &[&str] = &["build", "check", "help"];
const LOG_ENV: &str = "BIDECK_LOG";

#[derive(Parser)]
#[command(name = "bideck", version, about = "Bilingual Markdown to PPTX slide builder")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert every EN/CN document pair into one deck
    Build(BuildArgs),

    /// Validate configuration and pairing without writing anything
    Check(CheckArgs),
}

#[derive(clap::Args)]
struct BuildArgs {
    /// Directory containing EN/ and CN/
    source: PathBuf,

    /// Output .pptx file, or a directory for a timestamped file name
    #[arg(short, long, default_value = "")]
    output: String,

    /// Configuration file (defaults to ./bideck.yaml, then the built-in one)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(clap::Args)]
struct CheckArgs {
    /// Directory containing EN/ and CN/
    source: PathBuf,

    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // `bideck <SOURCE>` is shorthand for `bideck build <SOURCE>`.
    let mut args: Vec<String> = std::env::args().collect();
    let first_positional = args.iter().skip(1).find(|a| !a.starts_with('-'));
    if first_positional.is_some_and(|a| !SUBCOMMANDS.contains(&a.as_str())) {
        args.insert(1, "build".to_string());
    }
    let cli = Cli::parse_from(&args);

    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(e) => {
            eprintln!("error: cannot determine working directory: {e}");
            process::exit(1);
        },
    };

    let result = match cli.command {
        Command::Build(args) => run_build(args, cwd),
        Command::Check(args) => run_check(args, cwd),
    };
    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn run_build(args: BuildArgs, cwd: PathBuf) -> bideck::Result<()> {
    let report = app::build(&BuildOptions {
        source_dir: args.source,
        output: args.output,
        config_path: args.config,
        cwd,
        now: chrono::Local::now(),
        entropy: rand::random::<[u8; SUFFIX_LEN]>(),
    })?;
    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }
    println!(
        "wrote {} slides to {} (config: {})",
        report.slide_count,
        report.output_path.display(),
        report.config_source
    );
    Ok(())
}

fn run_check(args: CheckArgs, cwd: PathBuf) -> bideck::Result<()> {
    let report = app::check(&CheckOptions {
        source_dir: args.source,
        config_path: args.config,
        cwd,
    })?;
    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }
    for (index, pair) in report.pairs.iter().enumerate() {
        println!("[{:>3}] {}", index + 1, pair.rel_path);
    }
    println!("{} pairs ok (config: {})", report.pairs.len(), report.config_source);
    Ok(())
}
