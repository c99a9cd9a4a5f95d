// SPDX-License-Identifier: MIT
// Copyright 2025. Triad National Security, LLC.

use clap::Parser;

use lfsutils_lib::commands::{self, Cli};

/// The lfsutils binary maps OSS nodes to OST indexes and back, and wraps a few `lfs` queries.
fn main() {
    let args = Cli::parse();

    commands::init_logging(args.debug);

    if commands::main(&args).is_err() {
        std::process::exit(1);
    }
}
