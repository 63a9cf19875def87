//! pipebench CLI: inspect the aggregation benchmark catalog.
//!
//! - `pipebench list [--tag TAG]`: case names
//! - `pipebench show NAME`: one case
//! - `pipebench dump [--db DB --coll COLL]`: whole catalog as JSON
//! - `pipebench populate NAME [--seed N]`: run a case's setup in memory
//! - `pipebench init [FILE]`: write a default `pipebench.toml`

mod commands;
mod format;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ArgMatches;
use pipebench_catalog::{aggregation_catalog, Registry, Settings, CONFIG_FILE_NAME};
use pipebench_core::{Error, TestCase};
use pipebench_storage::MemoryDatabase;
use tracing::{debug, Level};

use commands::build_cli;
use format::{format_case, format_names, format_report, to_json, OutputMode};

/// Database name used for in-memory populate runs.
const MEMORY_DB_NAME: &str = "pipebench";

fn main() -> Result<()> {
    let matches = build_cli().get_matches();
    init_logging(matches.get_count("verbose"));

    let mode = if matches.get_flag("json") {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    match matches.subcommand() {
        Some(("init", sub)) => run_init(sub),
        Some((name, sub)) => {
            let settings = load_settings(matches.get_one::<String>("config"))?;
            match name {
                "list" => run_list(&settings, sub, mode),
                "show" => run_show(&settings, sub, mode),
                "dump" => run_dump(&settings, sub),
                "populate" => run_populate(settings, sub, mode),
                other => anyhow::bail!("unknown command '{}'", other),
            }
        }
        None => anyhow::bail!("no command given"),
    }
}

fn log_level(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn init_logging(verbosity: u8) {
    tracing_subscriber::fmt()
        .with_max_level(log_level(verbosity))
        .with_writer(std::io::stderr)
        .init();
}

/// Explicit `--config`, else `pipebench.toml` in the working directory if
/// present, else defaults.
fn load_settings(explicit: Option<&String>) -> Result<Settings> {
    let path = match explicit {
        Some(path) => PathBuf::from(path),
        None => {
            let default = PathBuf::from(CONFIG_FILE_NAME);
            if !default.exists() {
                debug!(target: "pipebench::cli", "No settings file, using defaults");
                return Ok(Settings::default());
            }
            default
        }
    };
    debug!(target: "pipebench::cli", path = %path.display(), "Loading settings");
    Settings::from_file(&path).with_context(|| format!("loading {}", path.display()))
}

/// Look up a case by full name, falling back to the prefixed name.
fn find_case<'a>(registry: &'a Registry, settings: &Settings, name: &str) -> Result<&'a TestCase> {
    if let Some(case) = registry.get(name) {
        return Ok(case);
    }
    let prefixed = format!("{}{}", settings.name_prefix, name);
    registry
        .get(&prefixed)
        .ok_or_else(|| Error::TestCaseNotFound(name.to_string()).into())
}

fn run_list(settings: &Settings, sub: &ArgMatches, mode: OutputMode) -> Result<()> {
    let registry = aggregation_catalog(settings)?;
    let output = match sub.get_one::<String>("tag") {
        Some(tag) => format_names(registry.with_tag(tag).map(|c| c.name.as_str()), mode),
        None => format_names(registry.iter().map(|c| c.name.as_str()), mode),
    };
    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}

fn run_show(settings: &Settings, sub: &ArgMatches, mode: OutputMode) -> Result<()> {
    let registry = aggregation_catalog(settings)?;
    let name = sub
        .get_one::<String>("name")
        .context("missing case name")?;
    println!("{}", format_case(find_case(&registry, settings, name)?, mode));
    Ok(())
}

fn run_dump(settings: &Settings, sub: &ArgMatches) -> Result<()> {
    let registry = aggregation_catalog(settings)?;
    let target = sub
        .get_one::<String>("db")
        .zip(sub.get_one::<String>("coll"));

    let cases: Vec<TestCase> = match target {
        Some((db, coll)) => registry
            .into_vec()
            .into_iter()
            .map(|case| TestCase {
                ops: case.ops.iter().map(|op| op.resolve(db, coll)).collect(),
                ..case
            })
            .collect(),
        None => registry.into_vec(),
    };
    println!("{}", to_json(&cases));
    Ok(())
}

fn run_populate(mut settings: Settings, sub: &ArgMatches, mode: OutputMode) -> Result<()> {
    if let Some(seed) = sub.get_one::<u64>("seed") {
        settings.seed = Some(*seed);
    }
    let registry = aggregation_catalog(&settings)?;
    let name = sub
        .get_one::<String>("name")
        .context("missing case name")?;
    let case = find_case(&registry, &settings, name)?;

    let coll_name = sub
        .get_one::<String>("coll")
        .cloned()
        .unwrap_or_else(|| default_collection_name(&case.name, &settings.name_prefix));
    let db = MemoryDatabase::new(MEMORY_DB_NAME);
    let collection = db.collection(coll_name);

    let report = case
        .populate(&collection)
        .with_context(|| format!("populating {}", case.name))?;
    println!("{}", format_report(&case.name, &report, mode));
    Ok(())
}

/// `Aggregation.Group.TenGroups` → `group_tengroups`
fn default_collection_name(case: &str, prefix: &str) -> String {
    case.strip_prefix(prefix)
        .unwrap_or(case)
        .replace('.', "_")
        .to_lowercase()
}

fn run_init(sub: &ArgMatches) -> Result<()> {
    let path = sub
        .get_one::<String>("path")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
    write_default(&path)?;
    println!("{}", path.display());
    Ok(())
}

fn write_default(path: &Path) -> Result<()> {
    Settings::write_default_if_missing(path)
        .with_context(|| format!("writing {}", path.display()))
}
