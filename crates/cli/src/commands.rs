//! Clap command tree definition.

use clap::{crate_version, Arg, ArgAction, Command};

/// Build the complete CLI command tree.
pub fn build_cli() -> Command {
    Command::new("pipebench")
        .version(crate_version!())
        .about("Aggregation pipeline benchmark catalog")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("FILE")
                .help("Settings file (default: pipebench.toml if present)")
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
                .help("More logging (default info, -v debug, -vv trace)")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(build_list())
        .subcommand(build_show())
        .subcommand(build_dump())
        .subcommand(build_populate())
        .subcommand(build_init())
}

fn build_list() -> Command {
    Command::new("list").about("List test case names").arg(
        Arg::new("tag")
            .long("tag")
            .short('t')
            .value_name("TAG")
            .help("Only cases carrying this tag"),
    )
}

fn build_show() -> Command {
    Command::new("show").about("Show one test case").arg(
        Arg::new("name")
            .required(true)
            .value_name("NAME")
            .help("Case name, with or without the name prefix"),
    )
}

fn build_dump() -> Command {
    Command::new("dump")
        .about("Dump the whole catalog as JSON")
        .arg(
            Arg::new("db")
                .long("db")
                .value_name("DB")
                .requires("coll")
                .help("Substitute this database name for the placeholder"),
        )
        .arg(
            Arg::new("coll")
                .long("coll")
                .value_name("COLL")
                .requires("db")
                .help("Substitute this collection name for the placeholder"),
        )
}

fn build_populate() -> Command {
    Command::new("populate")
        .about("Run a case's setup against an in-memory store")
        .arg(
            Arg::new("name")
                .required(true)
                .value_name("NAME")
                .help("Case name, with or without the name prefix"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_name("N")
                .value_parser(clap::value_parser!(u64))
                .help("Seed for cases that would otherwise seed freshly"),
        )
        .arg(
            Arg::new("coll")
                .long("coll")
                .value_name("COLL")
                .help("Collection name (default: derived from the case name)"),
        )
}

fn build_init() -> Command {
    Command::new("init")
        .about("Write a default settings file if none exists")
        .arg(
            Arg::new("path")
                .value_name("FILE")
                .help("Target path (default: pipebench.toml)"),
        )
}
