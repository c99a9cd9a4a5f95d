// SPDX-License-Identifier: MIT
// Copyright 2025. Triad National Security, LLC.

use clap::Args;

use crate::commands::{Context, Handle, HandledResult};

#[derive(Args, Debug, Clone)]
pub struct WritableArgs {
    /// OST index to test
    index: i64,

    /// Path of a file that does not exist yet, on the filesystem of the OST
    path: String,
}

pub fn writable(context: &Context, args: &WritableArgs) -> HandledResult<()> {
    let writable = context
        .lfs
        .is_ost_writable(args.index, &args.path)
        .handle_err(|e| eprintln!("Could not test OST {}: {e}", args.index))?;

    println!("OST {} writable: {writable}", args.index);
    Ok(())
}
