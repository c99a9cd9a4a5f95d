// SPDX-License-Identifier: MIT
// Copyright 2025. Triad National Security, LLC.

use clap::Args;

use crate::commands::{handled_error, Context, HandledResult};

#[derive(Args, Debug, Clone)]
pub struct StripeArgs {
    #[arg(required = true)]
    files: Vec<String>,
}

pub fn stripe(context: &Context, args: &StripeArgs) -> HandledResult<()> {
    let mut error_seen = false;

    for file in args.files.iter() {
        match context.lfs.stripe_info(file) {
            Ok(info) => println!("{} count={} index={}", info.filename, info.count, info.index),
            Err(e) => {
                eprintln!("Could not get stripe info for '{file}': {e}");
                error_seen = true;
            }
        }
    }

    if error_seen {
        return handled_error();
    }
    Ok(())
}
