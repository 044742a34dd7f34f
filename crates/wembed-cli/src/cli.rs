//! Command-line definition and settings resolution

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use wembed_core::{EmbedConfig, MatchPolicy};

pub(crate) fn build_cli() -> Command {
    Command::new("wembed")
        .version(wembed_core::VERSION)
        .about("Embed a compiled wasm module into a JavaScript file as base64")
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML file with artifact/target/tag/expect settings"),
        )
        .arg(
            Arg::new("artifact")
                .long("artifact")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Binary artifact to embed [default: rust/pkg/strange_attractors_bg.wasm]"),
        )
        .arg(
            Arg::new("target")
                .long("target")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Document receiving the payload [default: js/wasm.js]"),
        )
        .arg(
            Arg::new("tag")
                .long("tag")
                .global(true)
                .help("Trailing comment identifying marker lines [default: // XXX]"),
        )
        .arg(
            Arg::new("expect")
                .long("expect")
                .global(true)
                .value_parser(MatchPolicy::NAMES)
                .help("Required number of marker lines [default: any]"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("Increase log verbosity"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .global(true)
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose")
                .help("Only log errors"),
        )
        .subcommand(Command::new("embed").about("Embed the artifact (default when no subcommand is given)"))
        .subcommand(
            Command::new("check")
                .about("Exit non-zero if the embedded payload does not match the artifact"),
        )
        .subcommand(
            Command::new("extract")
                .about("Decode an embedded payload back into a binary file")
                .arg(
                    Arg::new("index")
                        .long("index")
                        .default_value("0")
                        .value_parser(value_parser!(usize))
                        .help("Marker to decode, counting from 0"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Where to write the decoded bytes"),
                ),
        )
}

/// Defaults, then the config file, then flags
pub(crate) fn resolve_config(matches: &ArgMatches) -> anyhow::Result<EmbedConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => EmbedConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EmbedConfig::default(),
    };

    if let Some(artifact) = matches.get_one::<PathBuf>("artifact") {
        config = config.with_artifact(artifact);
    }
    if let Some(target) = matches.get_one::<PathBuf>("target") {
        config = config.with_target(target);
    }
    if let Some(tag) = matches.get_one::<String>("tag") {
        config = config.with_tag(tag);
    }
    if let Some(expect) = matches.get_one::<String>("expect") {
        let policy = expect.parse::<MatchPolicy>().map_err(anyhow::Error::msg)?;
        config = config.with_policy(policy);
    }
    Ok(config)
}
