// SPDX-License-Identifier: MIT
// Copyright 2025. Triad National Security, LLC.

use clap::Args;

use crate::{
    commands::{handled_error, Context, Handle, HandledResult},
    lfs::ComponentCollection,
};

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Only show components of this filesystem
    #[arg(short, long)]
    target: Option<String>,

    /// Only show components that are not active
    #[arg(short, long)]
    inactive: bool,
}

pub fn check(context: &Context, args: &CheckArgs) -> HandledResult<()> {
    let states = context
        .lfs
        .retrieve_component_states()
        .handle_err(|e| eprintln!("Could not retrieve component states: {e}"))?;

    if let Some(target) = &args.target {
        let Some(collection) = states.get(target) else {
            eprintln!("Filesystem '{target}' not found.");
            return handled_error();
        };
        print_collection(collection, args.inactive);
        return Ok(());
    }

    for collection in states.values() {
        print_collection(collection, args.inactive);
    }

    Ok(())
}

fn print_collection(collection: &ComponentCollection, inactive_only: bool) {
    for line in collection_lines(collection, inactive_only) {
        println!("{line}");
    }
}

fn collection_lines(collection: &ComponentCollection, inactive_only: bool) -> Vec<String> {
    collection
        .mdts
        .values()
        .chain(collection.osts.values())
        .filter(|comp| !(inactive_only && comp.active))
        .map(|comp| format!("{} {} {}", comp.target, comp.name, comp.state))
        .collect()
}
