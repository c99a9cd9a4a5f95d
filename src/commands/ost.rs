// SPDX-License-Identifier: MIT
// Copyright 2025. Triad National Security, LLC.

use clap::Args;

use crate::{
    commands::{merge_nodesets, Context, Handle, HandledResult},
    lookup,
};

#[derive(Args, Debug, Clone)]
pub struct OstArgs {
    /// Filesystem name
    fsname: String,

    /// FQDN specified OSS as NodeSet e.g. "oss[0-9,12-20].domain". Multiple nodesets are merged.
    #[arg(required = true)]
    nodesets: Vec<String>,

    /// Print OST indexes as hexadecimal
    #[arg(short = 'x', long)]
    hex: bool,
}

pub fn ost(context: &Context, args: &OstArgs) -> HandledResult<()> {
    let nodeset = merge_nodesets(&args.nodesets)
        .handle_err(|e| eprintln!("Could not parse nodeset: {e}"))?;

    log::debug!("Lookup OST by OSS NodeSet {:?}", args.nodesets);

    let Context { lfs, resolver } = context;
    let ost_by_oss = lookup::lookup_ost_by_oss_nodeset(lfs, resolver, &args.fsname, &nodeset)
        .handle_err(|e| eprintln!("Could not look up OSTs for '{}': {e}", args.fsname))?;

    for (oss, osts) in ost_by_oss.iter() {
        if args.hex {
            println!("{oss} - {}", osts.to_hex_string());
        } else {
            println!("{oss} - {osts}");
        }
    }

    Ok(())
}
