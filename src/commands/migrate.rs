// SPDX-License-Identifier: MIT
// Copyright 2025. Triad National Security, LLC.

use clap::Args;

use crate::{
    commands::{handled_error, Context, HandledResult},
    lfs::{MigrateOptions, MigrateState},
};

#[derive(Args, Debug, Clone)]
pub struct MigrateArgs {
    #[arg(required = true)]
    files: Vec<String>,

    /// Only migrate files whose first stripe is on this OST
    #[arg(short, long)]
    source: Option<i64>,

    /// OST to migrate to
    #[arg(short, long)]
    target: Option<i64>,

    /// Use direct IO for the data copy
    #[arg(long)]
    direct_io: bool,

    /// Block file access during migration
    #[arg(long)]
    block: bool,

    /// Also migrate files striped over more than one OST
    #[arg(long)]
    no_skip: bool,
}

impl From<&MigrateArgs> for MigrateOptions {
    fn from(args: &MigrateArgs) -> Self {
        MigrateOptions {
            source_idx: args.source,
            target_idx: args.target,
            direct_io: args.direct_io,
            block: args.block,
            skip: !args.no_skip,
        }
    }
}

/// Migrate every file and print one result line per file. The command fails if any file failed
/// to migrate.
pub fn migrate(context: &Context, args: &MigrateArgs) -> HandledResult<()> {
    let opts = MigrateOptions::from(args);
    let mut failed = false;

    for file in args.files.iter() {
        match context.lfs.migrate_file(file, &opts) {
            Ok(result) => {
                if result.state == MigrateState::Failed {
                    failed = true;
                }
                println!("{result}");
            }
            Err(e) => {
                eprintln!("Could not migrate '{file}': {e}");
                failed = true;
            }
        }
    }

    if failed {
        return handled_error();
    }
    Ok(())
}
