use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, CommandFactory, Parser};
use log::error;
use restorer_core::{
    expand_patterns, prepare_output_root, read_input, restore_all, Disposition, InputError,
    JobError, MappingDocument, RestoreConfig, SourcePlanner, TreeWriter,
};
use serde::Serialize;

#[derive(Parser)]
#[command(
    name = "restore-source-tree",
    version,
    about = "Restores file structure from source map",
    override_usage = "restore-source-tree [OPTIONS] <FILE>..."
)]
struct Cli {
    /// Source map files or glob patterns
    #[arg(value_name = "FILE")]
    files: Vec<String>,

    /// Output directory
    #[arg(short = 'o', long = "out-dir", value_name = "DIR", default_value = "output")]
    out_dir: PathBuf,

    /// Include source files in node_modules
    #[arg(short = 'n', long)]
    include_node_modules: bool,

    /// Skip sources with this path segment (repeatable)
    #[arg(short = 'x', long = "exclude", value_name = "SEGMENT")]
    exclude: Vec<String>,

    /// Maximum concurrent writes per map and maps processed at once
    #[arg(short = 'j', long, value_name = "N", default_value_t = 8)]
    jobs: usize,

    /// Print what would be restored, write nothing
    #[arg(long)]
    list: bool,

    /// Print the --list output as JSON
    #[arg(long, requires = "list")]
    json: bool,

    /// Exit with status 2 if any map or source failed
    #[arg(long)]
    strict: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Log errors only
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn restore_config(&self) -> RestoreConfig {
        let mut config = RestoreConfig {
            output_dir: self.out_dir.clone(),
            concurrency: self.jobs.max(1),
            ..RestoreConfig::default()
        };
        config.filter.include_dependency_directories = self.include_node_modules;
        config
            .filter
            .excluded_segments
            .extend(self.exclude.iter().cloned());
        config
    }
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("cannot use output directory {path}: {source}")]
    OutputRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode listing: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct ListedSource {
    input: String,
    identifier: String,
    destination: Option<String>,
    status: &'static str,
}

fn init_logging(cli: &Cli) {
    let level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

/// Returns whether every map and every source went through cleanly.
async fn run(cli: &Cli) -> Result<bool, CliError> {
    let config = cli.restore_config();
    let inputs = expand_patterns(&cli.files)?;

    if cli.list {
        return list(&inputs, &config, cli.json).await;
    }

    prepare_output_root(&config.output_dir)
        .await
        .map_err(|source| CliError::OutputRoot {
            path: config.output_dir.clone(),
            source,
        })?;

    let reports = restore_all(&inputs, &config, &TreeWriter::new()).await;
    let mut clean = true;
    for report in &reports {
        match (&report.outcome, report.summary_line()) {
            (Ok(result), Some(line)) => {
                println!("{line}");
                clean &= result.is_clean();
            }
            _ => clean = false,
        }
    }
    Ok(clean)
}

async fn list(
    inputs: &[PathBuf],
    config: &RestoreConfig,
    json: bool,
) -> Result<bool, CliError> {
    let planner = SourcePlanner::new(config);
    let mut clean = true;
    let mut listed = Vec::new();

    for input in inputs {
        let document = match load(input).await {
            Ok(document) => document,
            Err(e) => {
                error!("{}: {e}", input.display());
                clean = false;
                continue;
            }
        };
        for entry in planner.plan(&document) {
            let status = match &entry.disposition {
                Disposition::Rejected => continue,
                Disposition::NoContent => "no-content",
                Disposition::Unresolvable(_) => {
                    clean = false;
                    "unresolvable"
                }
                Disposition::Write { .. } => "restore",
            };
            listed.push(ListedSource {
                input: input.display().to_string(),
                identifier: entry.identifier.to_string(),
                destination: entry.destination().map(|p| p.display().to_string()),
                status,
            });
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&listed)?);
    } else {
        for item in &listed {
            match &item.destination {
                Some(dest) => println!("{} -> {}", item.identifier, dest),
                None => println!("{} ({})", item.identifier, item.status),
            }
        }
    }
    Ok(clean)
}

async fn load(input: &Path) -> Result<MappingDocument, JobError> {
    let raw = read_input(input).await?;
    Ok(MappingDocument::parse(&raw)?)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if cli.files.is_empty() {
        let _ = Cli::command().print_help();
        return ExitCode::from(1);
    }
    init_logging(&cli);

    match run(&cli).await {
        Ok(clean) if clean || !cli.strict => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(2),
        Err(e) => {
            error!("{e}");
            ExitCode::from(1)
        }
    }
}
