// SPDX-License-Identifier: MIT
// Copyright 2025. Triad National Security, LLC.

pub mod check;
pub mod df;
pub mod mdt;
pub mod migrate;
pub mod oss;
pub mod ost;
pub mod stripe;
pub mod writable;

use {
    check::CheckArgs, df::DfArgs, mdt::MdtIndexArgs, migrate::MigrateArgs, oss::OssArgs,
    ost::OstArgs, stripe::StripeArgs, writable::WritableArgs,
};

use clap::{Parser, Subcommand};

use crate::{config::Config, lfs::LfsUtils, resolve::HostResolver};

/// A `HandledError` represents an error that has already been handled. When you call a function
/// that returns a `HandledError` or `HandledResult`, you don't need to do anything with that error,
/// other than just be aware that it happened, and return it on to your caller.
///
/// `main()` has a special responsibility: since its "caller" is, in a certain sense, the operating
/// system, `main()` must return a nonzero exit status when it gets a `HandledError`.
///
/// The primary way to construct a `HandledError` is with the `handle_err()` function, which turns a
/// generic error into a `HandledError`, and also runs some caller-provided code to handle the
/// error. That provided code would normally do something like report the error to stderr.
#[derive(Debug, PartialEq)]
pub struct HandledError {}

pub type HandledResult<T> = std::result::Result<T, HandledError>;

pub fn handled_error() -> HandledResult<()> {
    HandledResult::Err(HandledError {})
}

pub trait Handle<T, F> {
    fn handle_err(self, handler: F) -> HandledResult<T>;
}

impl<T, E, F: FnOnce(E)> Handle<T, F> for std::result::Result<T, E> {
    /// Handle an error by running the provided `handler` code, giving it the error.
    ///
    /// Then, return a `HandledResult`, so that transitive callers of this function know that they
    /// do not need to do anything further to handle the error.
    fn handle_err(self, handler: F) -> HandledResult<T> {
        self.map_err(|e| {
            handler(e);
            HandledError {}
        })
    }
}

/// Map between Lustre OSS nodes and OST indexes, and query OST state.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Enable debug logging.
    #[arg(short = 'D', long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// OSS lookup by OST RangeSet
    Oss(OssArgs),
    /// OST lookup by OSS NodeSet
    Ost(OstArgs),
    /// Show MDT and OST states reported by `lfs check osts`
    Check(CheckArgs),
    /// Show the fill level of every OST
    Df(DfArgs),
    /// Show the stripe count and first OST of files
    Stripe(StripeArgs),
    /// Migrate files between OSTs
    Migrate(MigrateArgs),
    /// Test whether a file can be created on an OST
    Writable(WritableArgs),
    /// Show the MDT index of directories
    MdtIndex(MdtIndexArgs),
}

/// Everything a subcommand needs to talk to Lustre.
pub struct Context {
    pub lfs: LfsUtils,
    pub resolver: HostResolver,
}

impl Context {
    pub fn new(cli: &Cli) -> HandledResult<Self> {
        let config = Config::load(cli.config.as_deref()).handle_err(|e| eprintln!("{e}"))?;
        log::debug!("using config {config:?}");

        Ok(Context {
            lfs: LfsUtils::from_config(&config),
            resolver: HostResolver::new(config.hosts),
        })
    }
}

/// Convert multiple nodeset strings into a single, deduplicated NodeSet object.
/// A "nodeset" is a string representing shorthand notation for a group of hosts (e.g.,
/// 'oss[0-9,12-20].domain').
fn merge_nodesets(nodesets: &[String]) -> Result<nodeset::NodeSet, nodeset::NodeSetParseError> {
    let mut nodeset = nodeset::NodeSet::new();
    for nodeset_str in nodesets.iter() {
        let curr_nodeset = &nodeset_str.parse()?;
        nodeset = nodeset.union(curr_nodeset);
    }
    Ok(nodeset)
}

/// Set up logging. `LFSUTILS_LOG` controls the level; `--debug` forces debug output.
pub fn init_logging(debug: bool) {
    let env = env_logger::Env::default().filter_or("LFSUTILS_LOG", "warn");
    let mut builder = env_logger::Builder::from_env(env);
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    let _ = builder.try_init();
}

pub fn main(cli: &Cli) -> HandledResult<()> {
    log::debug!("Started");

    let context = Context::new(cli)?;

    let result = match &cli.command {
        Commands::Oss(args) => oss::oss(&context, args),
        Commands::Ost(args) => ost::ost(&context, args),
        Commands::Check(args) => check::check(&context, args),
        Commands::Df(args) => df::df(&context, args),
        Commands::Stripe(args) => stripe::stripe(&context, args),
        Commands::Migrate(args) => migrate::migrate(&context, args),
        Commands::Writable(args) => writable::writable(&context, args),
        Commands::MdtIndex(args) => mdt::mdt_index(&context, args),
    };

    log::debug!("Finished");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge() {
        let merged = merge_nodesets(&[
            "oss[01-02].example.com".to_string(),
            "oss[02-03].example.com".to_string(),
        ])
        .unwrap();
        let hosts: Vec<String> = merged.iter().collect();
        assert_eq!(
            hosts,
            vec![
                "oss01.example.com",
                "oss02.example.com",
                "oss03.example.com",
            ]
        );
    }

    #[test]
    fn cli_parses() {
        let args = ["lfsutils", "-D", "oss", "lustre", "0-3", "--hex"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.debug);
        assert!(matches!(cli.command, Commands::Oss(_)));

        let cli = Cli::try_parse_from([
            "lfsutils",
            "ost",
            "lustre",
            "oss[01-02]",
            "oss05",
            "--config",
            "/tmp/x.conf",
        ])
        .unwrap();
        assert_eq!(cli.config.as_deref(), Some("/tmp/x.conf"));

        assert!(Cli::try_parse_from(["lfsutils", "oss", "lustre"]).is_err());
    }
}
