//! naylist CLI - generate nay lists for OPC UA NodeSet2 deployments.
//!
//! Features:
//! - Any number of application nodesets, retained completely
//! - Dependency nodesets in any order, linearized by the namespace each introduces
//! - Optional retention of all reference types and data types
//! - Optional global fixpoint across dependencies
//! - Plain (one node id per line) or JSON output, to stdout or a file
//! - `naylist.toml` for project defaults

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use naylist_core::{
    find_config, init_logging, load_config, write_json, write_plain, AnalysisResult, IoResultExt,
    LogOptions, Naylist, NaylistConfig, NaylistResult,
};

/// Path shown in errors when the report goes to standard output.
const STDOUT: &str = "<stdout>";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "List the nodes of dependency nodesets that no application nodeset needs"
)]
pub struct Cli {
    /// Application nodeset files to be included completely
    #[arg(required = true, value_name = "NODESET")]
    full: Vec<PathBuf>,

    /// Nodeset file containing dependencies required by other nodesets. Can be specified multiple times.
    #[arg(short = 'd', long = "dependency", value_name = "NODESET")]
    dependencies: Vec<PathBuf>,

    /// Output file name. If none given, the output is printed to STDOUT.
    #[arg(short, long, value_name = "FILE")]
    output: Option<String>,

    /// Don't naylist any reference types, even if they are not explicitly used in the application nodesets.
    #[arg(long)]
    all_refs: bool,

    /// Don't naylist any data types, even if they are not explicitly used in the application nodesets.
    #[arg(long)]
    all_data: bool,

    /// Repeat the dependency pass until no more nodes are retained
    #[arg(long)]
    global_fixpoint: bool,

    /// Output results in JSON format
    #[arg(long)]
    json: bool,

    /// Configuration file (default: ./naylist.toml if present)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Narrate progress on stderr
    #[arg(short, long)]
    verbose: bool,

    /// Emit log lines as JSON
    #[arg(long)]
    log_json: bool,
}

/// Effective settings after merging the command line with the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Settings {
    roots: Vec<PathBuf>,
    dependencies: Vec<PathBuf>,
    all_refs: bool,
    all_data: bool,
    global_fixpoint: bool,
    json: bool,
    output: Option<PathBuf>,
}

impl Settings {
    /// Options are enabled by either source; a switch set in the config
    /// cannot be turned off from the command line.
    fn merge(cli: &Cli, config: Option<NaylistConfig>) -> Self {
        let config = config.unwrap_or_default();
        let json = cli.json || config.json_output();

        let mut dependencies = cli.dependencies.clone();
        dependencies.extend(config.dependencies.unwrap_or_default());

        Self {
            roots: cli.full.clone(),
            dependencies,
            all_refs: cli.all_refs || config.all_refs.unwrap_or(false),
            all_data: cli.all_data || config.all_data.unwrap_or(false),
            global_fixpoint: cli.global_fixpoint || config.global_fixpoint.unwrap_or(false),
            json,
            output: None,
        }
    }

    fn builder(&self) -> Naylist {
        Naylist::new(self.roots.iter().cloned())
            .dependencies(self.dependencies.iter().cloned())
            .retain_reference_types(self.all_refs)
            .retain_data_types(self.all_data)
            .global_fixpoint(self.global_fixpoint)
    }
}

/// Validates the output file path.
///
/// Rejects:
/// - Empty paths
/// - Paths with null bytes
/// - Existing directories
fn validate_output_path(path: &str) -> Result<PathBuf> {
    if path.is_empty() {
        return Err(anyhow!("Output path is empty"));
    }
    if path.contains('\0') {
        return Err(anyhow!("Output path contains null bytes"));
    }

    let p = PathBuf::from(path);
    if p.is_dir() {
        return Err(anyhow!("Output path is a directory: {}", path));
    }

    Ok(p)
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let config = match &cli.config {
        Some(path) => Some(
            load_config(path).with_context(|| format!("Failed to load config: {}", path.display()))?,
        ),
        None => {
            let cwd = std::env::current_dir().context("Cannot determine working directory")?;
            find_config(&cwd)?
        }
    };

    let mut settings = Settings::merge(cli, config);
    settings.output = cli.output.as_deref().map(validate_output_path).transpose()?;
    Ok(settings)
}

/// Renders the report into memory so nothing is written unless it is complete.
fn render(result: &AnalysisResult, json: bool) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    if json {
        write_json(&mut buf, result)?;
    } else {
        write_plain(&mut buf, &result.naylisted)?;
    }
    Ok(buf)
}

fn write_output(output: Option<&Path>, report: &[u8]) -> NaylistResult<()> {
    match output {
        Some(path) => fs::write(path, report).with_path(path),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(report)
                .and_then(|()| stdout.flush())
                .with_path(STDOUT)
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let settings = load_settings(cli)?;
    let result = settings.builder().analyze().context("Analysis failed")?;
    let report = render(&result, settings.json)?;
    write_output(settings.output.as_deref(), &report)?;
    Ok(())
}

fn main() -> Result<()> {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("[PANIC] naylist internal error: {}", info);
    }));

    let cli = Cli::parse();

    init_logging(LogOptions {
        verbose: cli.verbose,
        json: cli.log_json,
    });

    run(&cli)
}
