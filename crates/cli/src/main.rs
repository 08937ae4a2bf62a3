//! kvharness CLI: run the conformance suite against the reference backends.
//!
//! Exit codes:
//! - `0`: every backend conformant
//! - `1`: at least one scenario failed
//! - `2`: nothing failed but at least one scenario was skipped
//! - `3`: usage or configuration error

mod commands;
mod format;

use std::path::PathBuf;
use std::process;

use tracing::debug;
use tracing_subscriber::EnvFilter;

use kvharness_conformance::{
    ConfigError, ConformanceConfig, ConformanceSuite, Scenario, SuiteReport, CONFIG_FILE_NAME,
};
use kvharness_storage::{EmbeddedEngine, EngineKind};

use commands::build_cli;
use format::{format_error, format_reports, format_scenarios, OutputMode};

const EXIT_CONFORMANT: i32 = 0;
const EXIT_FAILED: i32 = 1;
const EXIT_INCONCLUSIVE: i32 = 2;
const EXIT_USAGE: i32 = 3;

fn main() {
    let matches = match build_cli().try_get_matches() {
        Ok(matches) => matches,
        Err(e) => process::exit(report_parse_error(&e)),
    };

    init_tracing(matches.get_count("verbose"));

    let mode = if matches.get_flag("json") {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    let exit_code = match matches.subcommand() {
        Some(("scenarios", _)) => {
            println!("{}", format_scenarios(&Scenario::all(true), mode));
            EXIT_CONFORMANT
        }
        Some(("init-config", _)) => init_config(&matches, mode),
        Some(("run", sub)) => run(&matches, sub, mode),
        _ => EXIT_USAGE,
    };
    process::exit(exit_code);
}

fn init_tracing(verbose: u8) {
    let env_filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn config_path(matches: &clap::ArgMatches) -> PathBuf {
    matches
        .get_one::<String>("config")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
}

/// Load the config named by `--config`, else `./conformance.toml` if it
/// exists, else defaults.
fn load_config(matches: &clap::ArgMatches) -> Result<ConformanceConfig, ConfigError> {
    let explicit = matches.contains_id("config");
    let path = config_path(matches);
    if explicit || path.exists() {
        debug!(target: "kvharness::conformance", path = %path.display(), "Loading config");
        ConformanceConfig::from_file(&path)
    } else {
        Ok(ConformanceConfig::default())
    }
}

fn init_config(matches: &clap::ArgMatches, mode: OutputMode) -> i32 {
    let path = config_path(matches);
    match ConformanceConfig::write_default_if_missing(&path) {
        Ok(()) => {
            println!("{}", path.display());
            EXIT_CONFORMANT
        }
        Err(e) => {
            eprintln!("{}", format_error(&e, mode));
            EXIT_USAGE
        }
    }
}

fn selected_kinds(backend: &str) -> Vec<EngineKind> {
    match EngineKind::parse(backend) {
        Some(kind) => vec![kind],
        None => vec![EngineKind::Ordered, EngineKind::Sharded],
    }
}

fn build_suite(config: ConformanceConfig, sub: &clap::ArgMatches) -> ConformanceSuite {
    let mut config = config;
    if sub.get_flag("canonical-only") {
        config.extended = false;
    }
    let suite = ConformanceSuite::new(config);
    match sub.get_many::<String>("scenario") {
        Some(names) => suite.with_scenarios(names.filter_map(|name| Scenario::from_name(name))),
        None => suite,
    }
}

fn run(matches: &clap::ArgMatches, sub: &clap::ArgMatches, mode: OutputMode) -> i32 {
    let config = match load_config(matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", format_error(&e, mode));
            return EXIT_USAGE;
        }
    };
    let suite = build_suite(config, sub);

    let backend = sub
        .get_one::<String>("backend")
        .map(String::as_str)
        .unwrap_or("all");
    let reports: Vec<SuiteReport> = selected_kinds(backend)
        .into_iter()
        .map(|kind| {
            let engine = EmbeddedEngine::new(kind);
            suite.run_with_launcher(&engine, |handle| handle.connect())
        })
        .collect();

    println!("{}", format_reports(&reports, mode));
    exit_code(&reports)
}

/// Print a clap parse result and pick the exit code
///
/// `--help` and `--version` come through here too and go to stdout.
fn report_parse_error(e: &clap::Error) -> i32 {
    if e.use_stderr() {
        eprintln!("{}", e);
        EXIT_USAGE
    } else {
        println!("{}", e);
        EXIT_CONFORMANT
    }
}

fn exit_code(reports: &[SuiteReport]) -> i32 {
    if reports.iter().any(|r| !r.is_conformant()) {
        EXIT_FAILED
    } else if reports.iter().any(SuiteReport::is_inconclusive) {
        EXIT_INCONCLUSIVE
    } else {
        EXIT_CONFORMANT
    }
}
