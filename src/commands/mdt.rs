// SPDX-License-Identifier: MIT
// Copyright 2025. Triad National Security, LLC.

use clap::Args;

use crate::commands::{handled_error, Context, HandledResult};

#[derive(Args, Debug, Clone)]
pub struct MdtIndexArgs {
    #[arg(required = true)]
    paths: Vec<String>,
}

pub fn mdt_index(context: &Context, args: &MdtIndexArgs) -> HandledResult<()> {
    let mut error_seen = false;

    for path in args.paths.iter() {
        match context.lfs.retrieve_mdt_idx(path) {
            Ok(Some(index)) => println!("{path} {index}"),
            Ok(None) => println!("{path} -"),
            Err(e) => {
                eprintln!("Could not determine MDT index on path '{path}': {e}");
                error_seen = true;
            }
        }
    }

    if error_seen {
        return handled_error();
    }
    Ok(())
}
