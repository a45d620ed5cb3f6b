// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layering command-line flags over a configuration file.
//!
//! This example demonstrates:
//! - Loading a YAML configuration file into a `ConfigTree`
//! - Reading `clap` flags with the file as a snapshot
//! - Flag defaults yielding to file values, explicit flags overriding them
//!
//! To run this example:
//! ```bash
//! # Defaults only: "time" comes from the built-in file contents
//! cargo run --example layered_flags
//!
//! # Explicit flags win over the file
//! cargo run --example layered_flags -- --type "hello world" --server.port 9090
//!
//! # Use your own file
//! cargo run --example layered_flags -- --conf ./app.yaml
//! ```

use clap::{value_parser, Arg, Command};
use flagcfg::prelude::*;

const BUILTIN_CONFIG: &str = "\
time: 2019-01-01
server:
  host: file.example.com
";

fn command() -> Command {
    Command::new("layered_flags")
        .about("Layers command-line flags over a YAML file")
        .arg(Arg::new("conf").long("conf").help("Path to a YAML configuration file"))
        .arg(
            Arg::new("time")
                .long("time")
                .default_value("2020-01-01")
                .help("A time string"),
        )
        .arg(
            Arg::new("type")
                .long("type")
                .default_value("xxx")
                .help("Type of the app"),
        )
        .arg(
            Arg::new("server.host")
                .long("server.host")
                .default_value("localhost"),
        )
        .arg(
            Arg::new("server.port")
                .long("server.port")
                .value_parser(value_parser!(u16))
                .default_value("8080"),
        )
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let mut command = command();
    let matches = command.get_matches_mut();

    println!("=== flagcfg: Layered Flags ===\n");

    // Step 1: the file goes in first
    let content = match matches.get_one::<String>("conf") {
        Some(path) => std::fs::read_to_string(path)?,
        None => BUILTIN_CONFIG.to_string(),
    };
    let mut config = ConfigTree::from_yaml_str(&content, ".")?;
    println!("Loaded {} keys from the file", config.keys().len());

    // Step 2: flags, with the file as the snapshot
    let flags = ClapFlagSet::new(&command, &matches);
    let from_flags = FlagProvider::new(&flags, ".")
        .with_snapshot(&config)
        .read()?;
    config.merge(from_flags);

    println!("\n--- Effective configuration ---");
    for key in config.keys() {
        println!("{} = {}", key, config.value(&key)?);
    }

    Ok(())
}
