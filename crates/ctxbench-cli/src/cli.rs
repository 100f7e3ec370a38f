//! Command line definition and configuration overrides

use clap::{value_parser, Arg, ArgAction, ArgGroup, ArgMatches, Command};
use ctxbench_core::workflows::fetch::NetworkSelector;
use ctxbench_core::{BenchConfig, BenchResult};
use std::path::PathBuf;

/// Configuration file read when `--config` is not given
pub(crate) const DEFAULT_CONFIG: &str = "/config/config.toml";

pub(crate) fn build_cli() -> Command {
    Command::new("ctxbench")
        .version(ctxbench_core::VERSION)
        .about("Context network benchmarks and GraphML symbol aggregation")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .default_value(DEFAULT_CONFIG)
                .value_parser(value_parser!(PathBuf))
                .help("Configuration file (.toml, .yaml or .yml)"),
        )
        .subcommand(
            Command::new("benchmark")
                .about("Time context creation with adaptively sampled set sizes")
                .args(loop_args())
                .arg(
                    Arg::new("combinations")
                        .long("combinations")
                        .value_delimiter(',')
                        .action(ArgAction::Append)
                        .help("Size bounds as min-max, comma separated"),
                )
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("benchmark-in-order")
                .about("Time context creation for every size in turn")
                .args(loop_args())
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("symbol-counts")
                .about("Annotate contexts with symbol counts of exported networks"),
        )
        .subcommand(
            Command::new("network-per-file")
                .about("Create one annotated context per exported network file"),
        )
        .subcommand(
            Command::new("fetch")
                .about("Download a network as GraphML")
                .arg(
                    Arg::new("uuid")
                        .long("uuid")
                        .help("Network uuid"),
                )
                .arg(
                    Arg::new("name")
                        .long("name")
                        .help("Network name"),
                )
                .group(
                    ArgGroup::new("network")
                        .args(["uuid", "name"])
                        .required(true),
                ),
        )
}

fn loop_args() -> [Arg; 3] {
    [
        Arg::new("seed")
            .long("seed")
            .value_parser(value_parser!(u64))
            .help("Random seed for reproducibility"),
        Arg::new("iterations")
            .long("iterations")
            .value_parser(value_parser!(usize))
            .help("Successful iterations per combination"),
        Arg::new("max-size")
            .long("max-size")
            .value_parser(value_parser!(usize))
            .help("Largest symbol set size"),
    ]
}

fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print the report as JSON")
}

fn value<T>(args: &ArgMatches, id: &str) -> Option<T>
where
    T: Clone + Send + Sync + 'static,
{
    args.try_get_one::<T>(id).ok().flatten().cloned()
}

/// Whether `--json` was given to a subcommand that accepts it
pub(crate) fn wants_json(args: &ArgMatches) -> bool {
    value::<bool>(args, "json").unwrap_or(false)
}

/// Apply subcommand flags to `config` and validate the result
pub(crate) fn apply_overrides(config: &mut BenchConfig, args: &ArgMatches) -> BenchResult<()> {
    if let Some(seed) = value::<u64>(args, "seed") {
        config.random.seed = seed;
    }
    if let Some(iterations) = value::<usize>(args, "iterations") {
        config.run.iterations = iterations;
    }
    if let Some(max_size) = value::<usize>(args, "max-size") {
        config.run.max_size = max_size;
    }
    if let Ok(Some(combinations)) = args.try_get_many::<String>("combinations") {
        config.run.combinations = combinations.cloned().collect();
    }
    config.validate()
}

/// Network chosen by `fetch`
pub(crate) fn selector(args: &ArgMatches) -> Option<NetworkSelector> {
    value::<String>(args, "uuid")
        .map(NetworkSelector::Uuid)
        .or_else(|| value::<String>(args, "name").map(NetworkSelector::Name))
}
