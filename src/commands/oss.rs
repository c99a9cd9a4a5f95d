// SPDX-License-Identifier: MIT
// Copyright 2025. Triad National Security, LLC.

use clap::Args;

use crate::{
    commands::{Context, Handle, HandledResult},
    lookup,
    rangeset::{RangeSet, RangeSetParseError},
};

#[derive(Args, Debug, Clone)]
pub struct OssArgs {
    /// Filesystem name
    fsname: String,

    /// RangeSet with OST decimal indexes e.g. "30-50,100-120". For hexadecimal see -x/--hex.
    rangeset: String,

    /// Read the rangeset as hexadecimal OST indexes e.g. "0000, 00D6-00F1, 00FF-01A0"
    #[arg(short = 'x', long)]
    hex: bool,
}

pub fn oss(context: &Context, args: &OssArgs) -> HandledResult<()> {
    let rangeset = parse_rangeset(&args.rangeset, args.hex)
        .handle_err(|e| eprintln!("Could not parse rangeset: {e}"))?;

    log::debug!("Lookup OSS by OST RangeSet {rangeset}");

    let Context { lfs, resolver } = context;
    let oss_with_osts = lookup::lookup_oss_by_ost_rangeset(lfs, resolver, &args.fsname, &rangeset)
        .handle_err(|e| eprintln!("Could not look up OSS for '{}': {e}", args.fsname))?;

    for (oss, osts) in oss_with_osts.iter() {
        println!("{oss} - {osts}");
    }

    Ok(())
}

fn parse_rangeset(rangeset: &str, hex: bool) -> Result<RangeSet, RangeSetParseError> {
    if hex {
        RangeSet::parse_hex(rangeset)
    } else {
        rangeset.parse()
    }
}
