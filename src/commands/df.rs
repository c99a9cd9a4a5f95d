// SPDX-License-Identifier: MIT
// Copyright 2025. Triad National Security, LLC.

use clap::Args;

use crate::commands::{Context, Handle, HandledResult};

#[derive(Args, Debug, Clone)]
pub struct DfArgs {
    /// Mount point of the Lustre filesystem
    fs_path: String,
}

pub fn df(context: &Context, args: &DfArgs) -> HandledResult<()> {
    let fill_levels = context
        .lfs
        .retrieve_ost_disk_usage(&args.fs_path)
        .handle_err(|e| eprintln!("Could not retrieve OST fill levels: {e}"))?;

    for (ost, fill) in fill_levels.iter() {
        println!("{ost} {fill}%");
    }

    Ok(())
}
