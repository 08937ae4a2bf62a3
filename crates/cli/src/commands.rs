//! Clap command tree definition.

use clap::{Arg, ArgAction, Command};

use kvharness_conformance::Scenario;

/// Backend names accepted by `run --backend`
pub const BACKEND_NAMES: [&str; 3] = ["ordered", "sharded", "all"];

/// Build the complete CLI command tree.
pub fn build_cli() -> Command {
    let scenario_names: Vec<&'static str> =
        Scenario::all(true).into_iter().map(Scenario::name).collect();

    Command::new("kvharness")
        .about("Conformance harness for key-value store adapters")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Path to conformance.toml (default: ./conformance.toml if present)")
                .global(true),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("JSON output mode")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Raise log level (-v info, -vv debug)")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("run")
                .about("Run the conformance suite against reference backends")
                .arg(
                    Arg::new("backend")
                        .long("backend")
                        .short('b')
                        .help("Backend to test")
                        .value_parser(BACKEND_NAMES)
                        .default_value("all"),
                )
                .arg(
                    Arg::new("scenario")
                        .long("scenario")
                        .short('s')
                        .help("Run only the named scenario (repeatable)")
                        .value_parser(scenario_names)
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("canonical-only")
                        .long("canonical-only")
                        .help("Skip the extended scenarios")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("scenario"),
                ),
        )
        .subcommand(Command::new("scenarios").about("List available scenarios"))
        .subcommand(
            Command::new("init-config")
                .about("Write a default conformance.toml if none exists"),
        )
}
