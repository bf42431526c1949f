//! schema_baseline command-line tool
//!
//! Converts a schema-only PostgreSQL dump into a baseline migration file and
//! prints the verification report.

use anyhow::{bail, Context};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::process;

use schema_baseline::config::{self, Config, LoggingConfig};
use schema_baseline::utils::{init_logging, migration_file_name};
use schema_baseline::Conversion;

#[derive(Parser)]
#[command(name = "schema_baseline")]
#[command(about = "Generate a baseline Knex/Lucid migration from a pg_dump schema")]
#[command(version)]
struct Cli {
    /// Schema-only dump to read
    input: PathBuf,

    /// Migration file to write (default: <timestamp>_baseline.ts)
    output: Option<PathBuf>,

    /// TOML or YAML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Also write the verification report as JSON
    #[arg(long)]
    report_json: Option<PathBuf>,

    /// Refuse to write the migration when verification fails
    #[arg(long)]
    strict: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => config::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };

    // Without a logging section only warnings reach stderr
    let mut logging = config.logging.take().unwrap_or_else(|| LoggingConfig {
        level: "warn".to_string(),
        ..LoggingConfig::default()
    });
    if cli.verbose {
        logging.level = "debug".to_string();
    } else if cli.quiet {
        logging.level = "error".to_string();
    }
    config.logging = Some(logging);
    init_logging(&config.logging)?;

    let conversion = schema_baseline::convert_file(&cli.input, &config)
        .with_context(|| format!("converting {}", cli.input.display()))?;

    if !cli.quiet {
        print_summary(&conversion);
        println!("{}", conversion.verification);
    }

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(migration_file_name("baseline", chrono::Utc::now())));

    if let Some(report_path) = &cli.report_json {
        let report = serde_json::json!({
            "input": cli.input.display().to_string(),
            "output": output.display().to_string(),
            "digest": conversion.digest(),
            "verification": conversion.verification,
        });
        fs::write(report_path, serde_json::to_string_pretty(&report)?)
            .with_context(|| format!("writing report {}", report_path.display()))?;
    }

    if !conversion.verification.passed {
        if cli.strict || config.verification.fail_on_error {
            bail!("verification failed; migration not written");
        }
        eprintln!("Warning: verification failed, review the generated migration manually");
    }

    fs::write(&output, conversion.script())
        .with_context(|| format!("writing migration {}", output.display()))?;

    if !cli.quiet {
        println!("Migration written to {}", output.display());
    }

    Ok(())
}

fn print_summary(conversion: &Conversion) {
    let model = &conversion.model;
    println!("Extracted from dump:");
    println!("   tables             : {}", model.tables.len());
    println!("   columns            : {}", model.column_count());
    println!("   indexes            : {}", model.indexes.len());
    println!("   unique constraints : {}", model.unique_constraints.len());
    println!("   foreign keys       : {}", model.foreign_keys.len());
    println!("   enum columns       : {}", model.enum_column_count());
    println!("   check constraints  : {}", model.check_constraint_count());
    println!();
}
